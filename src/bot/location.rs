//! Location intake and nearby-search flow.

use super::{Bot, SEPARATOR};
use crate::chat::{ChatChannel, InlineKeyboardButton, InlineKeyboardMarkup, Location};
use crate::directory::NearbyGedung;
use crate::{PanduError, Result};

/// Search radius presets, in meters.
const RADIUS_PRESETS: [u32; 7] = [5, 25, 50, 100, 200, 500, 1000];

/// Buildings listed per result view.
const MAX_RESULTS: usize = 10;

impl Bot {
    /// A shared location: remember the coordinates, offer the radius picker.
    pub(crate) async fn handle_location(
        &self,
        channel: &dyn ChatChannel,
        chat_id: i64,
        location: Location,
    ) -> Result<()> {
        self.sessions.update(chat_id, |session| {
            session.coords = Some((location.latitude, location.longitude));
        });

        let text = format!(
            "📍 *Lokasi Diterima*\n\n\
             📊 Koordinat:\n\
             • Latitude: `{:.6}`\n\
             • Longitude: `{:.6}`\n\n\
             🔍 Pilih radius pencarian:",
            location.latitude, location.longitude
        );
        channel.send_text(&text, Some(&radius_keyboard())).await
    }

    /// A radius pick: run the nearby search and render the building list.
    pub(crate) async fn search_nearby(
        &self,
        channel: &dyn ChatChannel,
        chat_id: i64,
        radius: u32,
    ) -> Result<()> {
        channel
            .answer_callback(Some("🔍 Mencari gedung terdekat..."))
            .await?;

        let Some((lat, long)) = self.sessions.get(chat_id).coords else {
            return channel
                .edit_text("❌ Lokasi tidak ditemukan. Silakan share lokasi lagi.", None)
                .await;
        };

        let search = match self.directory.nearby(lat, long, radius).await {
            Ok(search) => search,
            Err(err) => return channel.edit_text(&search_error_text(&err), None).await,
        };

        if !search.success {
            return channel.edit_text("❌ Pencarian gagal. Coba lagi.", None).await;
        }

        if search.results.is_empty() {
            let keyboard = InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton::callback(
                    "🔄 Coba Radius Lain",
                    "search_again",
                )]],
            };
            let text = format!(
                "🔍 *Pencarian Selesai*\n\n\
                 📏 Radius: *{}m*\n\
                 📊 Hasil: *Tidak ada gedung ditemukan*\n\n\
                 💡 Coba perbesar radius atau share lokasi berbeda.",
                search.radius
            );
            return channel.edit_text(&text, Some(&keyboard)).await;
        }

        self.sessions.update(chat_id, |session| {
            session.results = search.results.clone();
            session.radius = Some(search.radius);
        });

        let (text, keyboard) = render_results(&search.results, search.radius, search.count);
        channel.edit_text(&text, Some(&keyboard)).await
    }

    /// Back from a detail view to the remembered result list.
    pub(crate) async fn back_to_results(
        &self,
        channel: &dyn ChatChannel,
        chat_id: i64,
    ) -> Result<()> {
        channel.answer_callback(None).await?;

        let session = self.sessions.get(chat_id);
        if session.results.is_empty() {
            return channel
                .edit_text(
                    "❌ Data tidak ditemukan.\n\nSilakan share lokasi untuk pencarian baru.",
                    None,
                )
                .await;
        }

        let radius = session.radius.unwrap_or(0);
        let count = session.results.len() as u32;
        let (text, keyboard) = render_results(&session.results, radius, count);
        channel.edit_text(&text, Some(&keyboard)).await
    }

    /// Offer the radius picker again.
    pub(crate) async fn search_again(&self, channel: &dyn ChatChannel) -> Result<()> {
        channel.answer_callback(None).await?;
        channel
            .edit_text(
                "🔍 *Pencarian Baru*\n\nPilih radius pencarian:",
                Some(&radius_keyboard()),
            )
            .await
    }
}

/// Radius picker: small presets three across, larger ones two across.
fn radius_keyboard() -> InlineKeyboardMarkup {
    let button = |radius: u32| {
        InlineKeyboardButton::callback(format!("📏 {radius}m"), format!("radius_{radius}"))
    };
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            RADIUS_PRESETS[..3].iter().copied().map(button).collect(),
            RADIUS_PRESETS[3..5].iter().copied().map(button).collect(),
            RADIUS_PRESETS[5..].iter().copied().map(button).collect(),
        ],
    }
}

fn render_results(
    results: &[NearbyGedung],
    radius: u32,
    count: u32,
) -> (String, InlineKeyboardMarkup) {
    let shown = &results[..results.len().min(MAX_RESULTS)];

    let mut lines = vec![format!("🏢 Ditemukan *{count}* gedung dalam radius {radius}m\n")];
    let mut keyboard = Vec::with_capacity(shown.len() + 1);

    for (idx, gedung) in shown.iter().enumerate() {
        let no = idx + 1;
        let alamat = gedung.alamat.as_deref().unwrap_or("N/A");
        lines.push(format!(
            "{no}. *{nama}*\n   📍 {alamat}\n   📏 Jarak: *{jarak:.0}m* | {units} unit",
            nama = gedung.nama_gedung,
            jarak = gedung.distance,
            units = gedung.total_units,
        ));
        if no < shown.len() {
            lines.push(SEPARATOR.to_string());
        }

        keyboard.push(vec![InlineKeyboardButton::callback(
            format!("{no}. {} ({:.0}m)", gedung.nama_gedung, gedung.distance),
            format!("gedung_{}", gedung.uuid),
        )]);
    }

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

fn search_error_text(err: &PanduError) -> String {
    match err {
        PanduError::Api { status, message } => {
            let detail: String = message.chars().take(200).collect();
            format!("❌ *Error {status}*\n\n```\n{detail}\n```")
        }
        other => format!("❌ *Terjadi Kesalahan*\n\nDetail: `{other}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(uuid: &str, nama: &str, distance: f64) -> NearbyGedung {
        NearbyGedung {
            uuid: uuid.to_string(),
            nama_gedung: nama.to_string(),
            alamat: Some("Jl. Contoh 1".to_string()),
            distance,
            total_units: 4,
        }
    }

    #[test]
    fn radius_keyboard_covers_all_presets() {
        let keyboard = radius_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        let buttons: Vec<_> = keyboard.inline_keyboard.iter().flatten().collect();
        assert_eq!(buttons.len(), RADIUS_PRESETS.len());
        assert_eq!(buttons[0].callback_data, "radius_5");
        assert_eq!(buttons[6].callback_data, "radius_1000");
    }

    #[test]
    fn results_render_one_button_per_building() {
        let results = vec![sample("g1", "Menara A", 12.0), sample("g2", "Wisma B", 98.6)];
        let (text, keyboard) = render_results(&results, 100, 2);

        assert!(text.contains("Ditemukan *2* gedung dalam radius 100m"));
        assert!(text.contains("1. *Menara A*"));
        assert!(text.contains("Jarak: *99m*"));

        // two buildings + search-again row
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        assert_eq!(keyboard.inline_keyboard[0][0].callback_data, "gedung_g1");
        assert_eq!(keyboard.inline_keyboard[1][0].callback_data, "gedung_g2");
    }

    #[test]
    fn results_capped_at_ten() {
        let results: Vec<_> = (0..15)
            .map(|i| sample(&format!("g{i}"), &format!("Gedung {i}"), i as f64))
            .collect();
        let (text, keyboard) = render_results(&results, 500, 15);

        // count reflects the full result set, list caps at ten
        assert!(text.contains("*15* gedung"));
        assert!(!text.contains("Gedung 10"));
        assert_eq!(keyboard.inline_keyboard.len(), MAX_RESULTS + 1);
    }

    #[test]
    fn missing_alamat_renders_placeholder() {
        let mut result = sample("g1", "Menara A", 5.0);
        result.alamat = None;
        let (text, _) = render_results(&[result], 5, 1);
        assert!(text.contains("📍 N/A"));
    }

    #[test]
    fn api_error_text_truncates_body() {
        let err = PanduError::Api {
            status: 502,
            message: "x".repeat(500),
        };
        let text = search_error_text(&err);
        assert!(text.contains("*Error 502*"));
        assert!(text.len() < 300);
    }

    #[test]
    fn transport_error_text_includes_detail() {
        let err = PanduError::Http("connection refused".into());
        let text = search_error_text(&err);
        assert!(text.contains("Terjadi Kesalahan"));
        assert!(text.contains("connection refused"));
    }
}
