//! [`ChatChannel`] implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ChatChannel;
use super::telegram::{InlineKeyboardMarkup, TelegramClient};
use crate::Result;

/// Live channel bound to the message a callback query originated from.
///
/// `edit_text` edits that message in place; when the edit is rejected (the
/// message is a photo, or already gone) the old view is deleted and the text
/// goes out as a replacement message. `send_photo` always replaces, since a
/// text message cannot be edited into a photo.
pub struct CallbackChannel {
    client: Arc<TelegramClient>,
    callback_id: String,
    chat_id: i64,
    message_id: i64,
}

impl CallbackChannel {
    pub fn new(
        client: Arc<TelegramClient>,
        callback_id: impl Into<String>,
        chat_id: i64,
        message_id: i64,
    ) -> Self {
        Self {
            client,
            callback_id: callback_id.into(),
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
impl ChatChannel for CallbackChannel {
    async fn answer_callback(&self, text: Option<&str>) -> Result<()> {
        self.client
            .answer_callback_query(&self.callback_id, text)
            .await
            .map(|_| ())
    }

    async fn send_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()> {
        self.client
            .send_message(self.chat_id, text, keyboard)
            .await
            .map(|_| ())
    }

    async fn send_photo(
        &self,
        photo_url: &str,
        caption: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.delete().await;
        match self
            .client
            .send_photo(self.chat_id, photo_url, caption, keyboard)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(error = %err, "photo delivery failed; falling back to text");
                self.send_text(caption, keyboard).await
            }
        }
    }

    async fn edit_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()> {
        match self
            .client
            .edit_message_text(self.chat_id, self.message_id, text, keyboard)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                debug!(error = %err, "edit rejected; replacing message");
                self.delete().await;
                self.send_text(text, keyboard).await
            }
        }
    }

    async fn delete(&self) {
        if let Err(err) = self.client.delete_message(self.chat_id, self.message_id).await {
            debug!(error = %err, "delete failed");
        }
    }
}

/// Channel that delivers everything as new messages into a chat.
///
/// Used when there is no live message to edit — rebuilding a view from
/// session state after the original message was removed.
pub struct FreshChannel {
    client: Arc<TelegramClient>,
    chat_id: i64,
}

impl FreshChannel {
    pub fn new(client: Arc<TelegramClient>, chat_id: i64) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl ChatChannel for FreshChannel {
    async fn answer_callback(&self, _text: Option<&str>) -> Result<()> {
        // No originating interaction to acknowledge.
        Ok(())
    }

    async fn send_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()> {
        self.client
            .send_message(self.chat_id, text, keyboard)
            .await
            .map(|_| ())
    }

    async fn send_photo(
        &self,
        photo_url: &str,
        caption: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        match self
            .client
            .send_photo(self.chat_id, photo_url, caption, keyboard)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(error = %err, "photo delivery failed; falling back to text");
                self.send_text(caption, keyboard).await
            }
        }
    }

    async fn edit_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()> {
        self.send_text(text, keyboard).await
    }

    async fn delete(&self) {}
}
