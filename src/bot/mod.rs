//! Bot core: update polling, dispatch, and the conversation flows.
//!
//! One logical flow per incoming update; the poll loop spawns a task per
//! update and the event loop interleaves them. The cache store (inside
//! [`CachedDirectory`]) is the only state shared across those tasks besides
//! the session map.

mod gedung;
mod location;
mod session;
mod unit;

pub use session::{Session, SessionStore};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::Result;
use crate::chat::{
    CallbackChannel, CallbackQuery, ChatChannel, FreshChannel, Message, TelegramClient, Update,
};
use crate::directory::CachedDirectory;
use crate::telemetry;

/// Horizontal rule used in rendered messages.
pub(crate) const SEPARATOR: &str = "━━━━━━━━━━━━━━━━";

/// Backoff after a failed update poll.
const POLL_RETRY: Duration = Duration::from_secs(3);

const WELCOME_TEXT: &str = "👋 *Selamat datang di Pandu!*\n\n\
    🏢 Bot ini membantu Anda mencari gedung dan unit terdekat.\n\n\
    📍 *Cara Menggunakan:*\n\
    1. Klik icon 📎 (attachment)\n\
    2. Pilih *Location*\n\
    3. Kirim lokasi Anda saat ini\n\
    4. Pilih radius pencarian\n\
    5. Lihat hasil gedung terdekat\n\n\
    💡 Ketik /help untuk bantuan lebih lanjut";

const HELP_TEXT: &str = "❓ *Bantuan Pandu*\n\n\
    *Fitur Utama:*\n\
    • 📍 Cari gedung terdekat berdasarkan lokasi\n\
    • 🏢 Lihat detail gedung & unit\n\
    • 🗺️ Lihat lokasi di Google Maps\n\
    • 📊 Informasi lengkap tiap unit\n\n\
    *Command:*\n\
    /start - Mulai bot\n\
    /help - Bantuan ini\n\n\
    *Cara Pakai:*\n\
    Share lokasi Anda → Bot akan mencari gedung terdekat!";

/// The bot: chat transport, cached directory access, per-chat sessions.
pub struct Bot {
    chat: Arc<TelegramClient>,
    directory: CachedDirectory,
    sessions: SessionStore,
}

impl Bot {
    pub fn new(chat: Arc<TelegramClient>, directory: CachedDirectory, sessions: SessionStore) -> Self {
        Self {
            chat,
            directory,
            sessions,
        }
    }

    /// Poll for updates until ctrl-c, spawning one task per update.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let mut offset = None;
        info!("polling for updates");

        loop {
            let batch = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    return Ok(());
                }
                batch = self.chat.get_updates(offset) => batch,
            };

            match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let bot = Arc::clone(&self);
                        tokio::spawn(async move { bot.handle_update(update).await });
                    }
                }
                Err(err) => {
                    warn!(error = %err, "update poll failed; backing off");
                    sleep(POLL_RETRY).await;
                }
            }
        }
    }

    /// Handle one update to completion. The poll loop spawns this per
    /// update; callers embedding the bot elsewhere (e.g. a webhook server)
    /// can feed updates in directly.
    pub async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;
        let outcome = if let Some(message) = update.message {
            metrics::counter!(telemetry::UPDATES_TOTAL, "kind" => "message").increment(1);
            self.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            metrics::counter!(telemetry::UPDATES_TOTAL, "kind" => "callback").increment(1);
            self.handle_callback(callback).await
        } else {
            Ok(())
        };

        if let Err(err) = outcome {
            error!(update_id, error = %err, "update handling failed");
        }
    }

    async fn handle_message(&self, message: Message) -> Result<()> {
        let chat_id = message.chat.id;

        if let Some(location) = message.location {
            let channel = FreshChannel::new(Arc::clone(&self.chat), chat_id);
            return self.handle_location(&channel, chat_id, location).await;
        }

        match message.text.as_deref() {
            Some(text) if text.starts_with("/start") => self
                .chat
                .send_message(chat_id, WELCOME_TEXT, None)
                .await
                .map(|_| ()),
            Some(text) if text.starts_with("/help") => self
                .chat
                .send_message(chat_id, HELP_TEXT, None)
                .await
                .map(|_| ()),
            // Non-command chatter is ignored.
            _ => Ok(()),
        }
    }

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<()> {
        let Some(data) = callback.data else {
            return Ok(());
        };
        // Without the originating message there is nothing to edit or reply
        // to; just stop the client's spinner.
        let Some(message) = callback.message else {
            warn!(user = callback.from.id, "callback without originating message");
            return self
                .chat
                .answer_callback_query(&callback.id, None)
                .await
                .map(|_| ());
        };

        let chat_id = message.chat.id;
        info!(data = %data, user = callback.from.id, "callback");

        let live = CallbackChannel::new(
            Arc::clone(&self.chat),
            callback.id,
            chat_id,
            message.message_id,
        );

        match parse_route(&data) {
            Route::Radius(radius) => self.search_nearby(&live, chat_id, radius).await,
            Route::Gedung(uuid) => self.show_gedung(&live, chat_id, &uuid).await,
            Route::Unit(uuid) => self.show_unit(&live, &uuid).await,
            Route::BackResults => self.back_to_results(&live, chat_id).await,
            Route::BackGedung => {
                let fresh = FreshChannel::new(Arc::clone(&self.chat), chat_id);
                self.back_to_gedung(&live, &fresh, chat_id).await
            }
            Route::SearchAgain => self.search_again(&live).await,
            Route::NoAction => live.answer_callback(Some("Tidak ada aksi")).await,
            Route::Unknown => {
                warn!(data = %data, "unknown callback data");
                live.answer_callback(Some("Aksi tidak dikenal")).await
            }
        }
    }
}

/// Parsed callback destination.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Radius(u32),
    Gedung(String),
    Unit(String),
    BackResults,
    BackGedung,
    SearchAgain,
    NoAction,
    Unknown,
}

fn parse_route(data: &str) -> Route {
    if let Some(radius) = data.strip_prefix("radius_") {
        return radius.parse().map(Route::Radius).unwrap_or(Route::Unknown);
    }
    if let Some(uuid) = data.strip_prefix("gedung_") {
        return Route::Gedung(uuid.to_string());
    }
    if let Some(uuid) = data.strip_prefix("unit_") {
        return Route::Unit(uuid.to_string());
    }
    match data {
        "back_results" => Route::BackResults,
        "back_gedung" => Route::BackGedung,
        "search_again" => Route::SearchAgain,
        "no_action" => Route::NoAction,
        _ => Route::Unknown,
    }
}
