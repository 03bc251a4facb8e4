#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Telegram transport for the dialog router.
//!
//! Messages and button presses become [`muse_dialog::InboundEvent`]s; the
//! router's replies are sent back with inline keyboards.

mod bot;
mod command;
mod error;
mod handler;
mod render;

pub use bot::{DialogRouter, TelegramBot};
pub use command::bot_commands;
pub use error::{Error, Result};
