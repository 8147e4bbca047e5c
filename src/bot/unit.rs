//! Unit detail flow.

use serde::Deserialize;
use tracing::warn;

use super::gedung::detail_error_text;
use super::{Bot, SEPARATOR};
use crate::Result;
use crate::cache::EntityKind;
use crate::chat::{ChatChannel, InlineKeyboardButton, InlineKeyboardMarkup};

#[derive(Debug, Clone, Deserialize)]
struct UnitView {
    gedung_nama: String,
    lantai: i64,
    unit_number: String,
    #[serde(default)]
    deskripsi: Option<String>,
    #[serde(default)]
    listing_type: Option<String>,
    #[serde(default)]
    pemilik: Option<String>,
    #[serde(default)]
    agen: Option<String>,
    #[serde(default)]
    alasan_blacklist: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

impl Bot {
    /// A unit pick: fetch through the cache and render the detail view.
    pub(crate) async fn show_unit(&self, channel: &dyn ChatChannel, uuid: &str) -> Result<()> {
        channel
            .answer_callback(Some("📥 Memuat detail unit..."))
            .await?;

        let record = match self.directory.fetch(EntityKind::Unit, uuid).await {
            Ok(record) => record,
            Err(err) => {
                return channel
                    .edit_text(&detail_error_text(&err, "unit"), None)
                    .await;
            }
        };

        let view: UnitView = match serde_json::from_value(record) {
            Ok(view) => view,
            Err(err) => {
                warn!(error = %err, "malformed unit record");
                return channel
                    .edit_text("❌ *Error*\n\nData unit tidak valid.", None)
                    .await;
            }
        };

        let (caption, keyboard) = unit_caption(&view);
        match view.images.first() {
            Some(photo) => channel.send_photo(photo, &caption, Some(&keyboard)).await,
            None => channel.edit_text(&caption, Some(&keyboard)).await,
        }
    }
}

fn listing_status(listing_type: Option<&str>) -> (&'static str, String) {
    match listing_type.unwrap_or("unknown") {
        "blacklist" => ("🚫", "BLACKLIST".to_string()),
        "available" => ("✅", "AVAILABLE".to_string()),
        other => ("📋", other.to_uppercase()),
    }
}

fn unit_caption(view: &UnitView) -> (String, InlineKeyboardMarkup) {
    let (status_emoji, status_text) = listing_status(view.listing_type.as_deref());

    let mut lines = vec![
        format!("🏠 *Unit Lt {} ({})*\n", view.lantai, view.unit_number),
        format!("🏢 *{}*", view.gedung_nama),
        format!("📝 {}", view.deskripsi.as_deref().unwrap_or("N/A")),
    ];

    if let Some(alasan) = view.alasan_blacklist.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("🚫 *{alasan}*"));
    }

    lines.push(String::new());
    lines.push(format!(
        "👤 *Pemilik:* {}",
        view.pemilik.as_deref().unwrap_or("N/A")
    ));
    lines.push(format!(
        "🏢 *Agen:* {}",
        view.agen.as_deref().unwrap_or("N/A")
    ));
    lines.push(String::new());
    lines.push(format!("{status_emoji} *Status:* {status_text}"));
    lines.push(String::new());
    lines.push(SEPARATOR.to_string());
    lines.push("_Terima kasih telah melihat detail unit_".to_string());

    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![
                InlineKeyboardButton::callback("« Back", "back_gedung"),
                InlineKeyboardButton::callback("« Back to Awal", "back_results"),
            ],
            vec![InlineKeyboardButton::callback(
                "🔄 Pencarian Baru",
                "search_again",
            )],
        ],
    };

    (lines.join("\n"), keyboard)
}
