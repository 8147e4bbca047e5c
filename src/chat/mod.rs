//! Chat transport.
//!
//! [`TelegramClient`] is a minimal typed client for the Bot API methods the
//! bot actually uses. [`ChatChannel`] abstracts message delivery so flows
//! don't care whether they are answering a live callback (edit in place) or
//! rebuilding a view as fresh messages — both cases implement the same
//! capability instead of one faking the other's interface.

mod channel;
mod telegram;

pub use channel::{CallbackChannel, FreshChannel};
pub use telegram::{
    CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Location, Message,
    TelegramClient, Update, User,
};

use async_trait::async_trait;

use crate::Result;

/// Delivery capability required by the bot flows.
///
/// Implemented by [`CallbackChannel`] (bound to a callback query's message)
/// and [`FreshChannel`] (everything as new messages). Photo delivery falls
/// back to plain text when the photo send is rejected, so flows never need
/// their own fallback chains.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Acknowledge the originating interaction, optionally with a toast.
    async fn answer_callback(&self, text: Option<&str>) -> Result<()>;

    /// Deliver a new text message.
    async fn send_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()>;

    /// Deliver a photo with caption, degrading to text on rejection.
    async fn send_photo(
        &self,
        photo_url: &str,
        caption: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Replace the current view with text — edited in place when the
    /// channel has a message to edit, a new message otherwise.
    async fn edit_text(&self, text: &str, keyboard: Option<&InlineKeyboardMarkup>) -> Result<()>;

    /// Remove the current view, when there is one. Best-effort.
    async fn delete(&self);
}
