use muse_dialog::DialogError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    #[error("User id out of range: {0}")]
    InvalidUserId(u64),
}
