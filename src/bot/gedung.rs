//! Building detail flow.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{Bot, SEPARATOR};
use crate::cache::EntityKind;
use crate::chat::{ChatChannel, InlineKeyboardButton, InlineKeyboardMarkup};
use crate::{PanduError, Result};

/// Typed view over a gedung record, for rendering only. The raw record is
/// what gets cached and kept in the session.
#[derive(Debug, Clone, Deserialize)]
struct GedungView {
    nama_gedung: String,
    alamat: String,
    lat: f64,
    long: f64,
    total_units: u64,
    #[serde(default)]
    units: Vec<UnitRow>,
    #[serde(default)]
    primary_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UnitRow {
    uuid: String,
    lantai: i64,
    unit_number: String,
    #[serde(default)]
    deskripsi: Option<String>,
    #[serde(default)]
    alasan_blacklist: Option<String>,
}

impl Bot {
    /// A building pick: fetch through the cache and render the detail view.
    pub(crate) async fn show_gedung(
        &self,
        channel: &dyn ChatChannel,
        chat_id: i64,
        uuid: &str,
    ) -> Result<()> {
        channel
            .answer_callback(Some("📥 Memuat detail gedung..."))
            .await?;

        let record = match self.directory.fetch(EntityKind::Gedung, uuid).await {
            Ok(record) => record,
            Err(err) => {
                return channel
                    .edit_text(&detail_error_text(&err, "gedung"), None)
                    .await;
            }
        };

        self.sessions.update(chat_id, |session| {
            session.current_gedung = Some(record.clone());
        });

        self.render_gedung(channel, &record).await
    }

    /// Render a gedung record into a channel. Shared by the live detail flow
    /// and the recovery path that rebuilds the view from session state.
    pub(crate) async fn render_gedung(
        &self,
        channel: &dyn ChatChannel,
        record: &Value,
    ) -> Result<()> {
        let view: GedungView = match serde_json::from_value(record.clone()) {
            Ok(view) => view,
            Err(err) => {
                warn!(error = %err, "malformed gedung record");
                return channel
                    .edit_text("❌ *Error*\n\nData gedung tidak valid.", None)
                    .await;
            }
        };

        let (caption, keyboard) = gedung_caption(&view);
        match view.primary_image.as_deref() {
            Some(photo) => channel.send_photo(photo, &caption, Some(&keyboard)).await,
            None => channel.edit_text(&caption, Some(&keyboard)).await,
        }
    }

    /// Back from a unit view to the remembered building.
    pub(crate) async fn back_to_gedung(
        &self,
        live: &dyn ChatChannel,
        fresh: &dyn ChatChannel,
        chat_id: i64,
    ) -> Result<()> {
        live.answer_callback(None).await?;

        let Some(record) = self.sessions.get(chat_id).current_gedung else {
            return live
                .edit_text(
                    "❌ Data tidak ditemukan.\n\nSilakan lakukan pencarian baru.",
                    None,
                )
                .await;
        };

        // The current view is typically a unit photo; replace it with a
        // fresh rendering rather than editing across message types.
        live.delete().await;
        self.render_gedung(fresh, &record).await
    }
}

fn gedung_caption(view: &GedungView) -> (String, InlineKeyboardMarkup) {
    let mut lines = vec![
        format!("🏢 *{}*\n", view.nama_gedung),
        format!("📍 *{}* Unit", view.total_units),
        format!("📌 *{}*", view.alamat),
        format!(
            "[📍 Lihat di Maps](https://www.google.com/maps?q={},{})\n",
            view.lat, view.long
        ),
        SEPARATOR.to_string(),
        "🏠 *DAFTAR UNIT*".to_string(),
        format!("{SEPARATOR}\n"),
    ];

    let mut keyboard = Vec::with_capacity(view.units.len() + 2);

    if view.units.is_empty() {
        lines.push("_Tidak ada unit tersedia_\n".to_string());
        lines.push(SEPARATOR.to_string());
    } else {
        for (idx, unit) in view.units.iter().enumerate() {
            let no = idx + 1;
            let deskripsi = unit.deskripsi.as_deref().unwrap_or("N/A");
            lines.push(format!(
                "{no}. *Lt {} ({})*\n   📝 {deskripsi}",
                unit.lantai, unit.unit_number
            ));
            if let Some(alasan) = unit.alasan_blacklist.as_deref().filter(|a| !a.is_empty()) {
                lines.push(format!("   🚫 {alasan}"));
            }
            lines.push(String::new());

            keyboard.push(vec![InlineKeyboardButton::callback(
                format!("{no}. Lt {} ({})", unit.lantai, unit.unit_number),
                format!("unit_{}", unit.uuid),
            )]);
        }
        lines.push(SEPARATOR.to_string());
    }

    keyboard.push(vec![InlineKeyboardButton::callback(
        "« Back to Awal",
        "back_results",
    )]);
    keyboard.push(vec![InlineKeyboardButton::callback(
        "🔄 Pencarian Baru",
        "search_again",
    )]);

    (
        lines.join("\n"),
        InlineKeyboardMarkup {
            inline_keyboard: keyboard,
        },
    )
}

/// Error text for a failed detail fetch; `what` names the entity in the
/// user's language ("gedung" | "unit").
pub(crate) fn detail_error_text(err: &PanduError, what: &str) -> String {
    match err {
        PanduError::Api { status, .. } => {
            format!("❌ *Error {status}*\n\nGagal memuat data {what}.")
        }
        other => format!("❌ *Error*\n\n`{other}`"),
    }
}
