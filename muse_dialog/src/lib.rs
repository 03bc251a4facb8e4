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

//! Per-user dialog flows with a session manager.
//!
//! An inbound event (command, free text or button press) is resolved against
//! the user's [`Session`] by the [`Router`], which runs the active flow,
//! talks to the text generator and the record store, and commits the new
//! session state only when the event completed.
//!
//! # Flows
//! - chat: free text straight to the generator
//! - talk: persona conversation with a capped, persisted history
//! - quiz: generated questions, judged answers, persisted round totals
//! - translate: auto-detect or fixed-direction translation
//! - recommend: generated recommendations with cross-session de-duplication
//!
//! Random facts, help and stats are stateless commands.

mod catalog;
mod dedup;
mod error;
mod event;
mod flows;
mod gateway;
mod history;
mod menus;
pub mod parse;
mod prompts;
mod reply;
mod router;
mod session;
mod token;

pub use catalog::{Catalog, CatalogError, Personality, QuizTopic, RecommendationCategory};
pub use dedup::{compute_exclusion_set, record_dislikes};
pub use error::{DialogError, Result};
pub use event::{Command, EventKind, Feature, InboundEvent};
pub use gateway::{FALLBACK_TEXT, Generation, GenerationConfig, TextGateway};
pub use history::{TALK_HISTORY_LIMIT, TalkHistory};
pub use reply::{Button, Menu, Reply};
pub use router::Router;
pub use session::{
    FlowKind, FlowState, QuizRound, QuizStage, QuizState, RecommendState, Session,
    SessionStore, TalkState, TranslateMode, TranslateState,
};
pub use token::{CallbackToken, MAX_TOKEN_LEN, TokenArg, TokenError};
