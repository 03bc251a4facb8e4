//! Button callback tokens.
//!
//! Every button carries an opaque string of the form `flow:action[:arg]`.
//! Arguments are catalog ids or translation modes, restricted to
//! `[a-z0-9_-]` so they can never introduce a separator, and the encoded
//! token fits the transport's 64-byte callback payload.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::event::Feature;
use crate::session::TranslateMode;

pub const MAX_TOKEN_LEN: usize = 64;

const MAX_ARG_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Unknown callback token: {0}")]
    Unknown(String),

    #[error("Invalid token argument {0:?}")]
    InvalidArgument(String),

    #[error("Callback token exceeds {MAX_TOKEN_LEN} bytes")]
    TooLong,
}

/// A validated token argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenArg(String);

impl TokenArg {
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value.len() <= MAX_ARG_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');

        if valid {
            Ok(Self(value))
        } else {
            Err(TokenError::InvalidArgument(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallbackToken {
    Open(Feature),
    Finish,
    AnotherFact,
    QuizTopic(TokenArg),
    QuizNext,
    QuizChangeTopic,
    TalkPersona(TokenArg),
    TalkChangePersona,
    TranslateMode(TranslateMode),
    TranslateChangeMode,
    RecCategory(TokenArg),
    RecGenre(TokenArg),
    RecBack,
    RecDislike,
    RecMore,
}

impl CallbackToken {
    /// Tokens honoured regardless of which menu was rendered last.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Open(_) | Self::Finish)
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(feature) => write!(f, "menu:{}", feature.key()),
            Self::Finish => f.write_str("nav:finish"),
            Self::AnotherFact => f.write_str("fact:another"),
            Self::QuizTopic(id) => write!(f, "quiz:topic:{id}"),
            Self::QuizNext => f.write_str("quiz:next"),
            Self::QuizChangeTopic => f.write_str("quiz:change"),
            Self::TalkPersona(id) => write!(f, "talk:persona:{id}"),
            Self::TalkChangePersona => f.write_str("talk:change"),
            Self::TranslateMode(mode) => write!(f, "tr:mode:{}", mode.key()),
            Self::TranslateChangeMode => f.write_str("tr:change"),
            Self::RecCategory(id) => write!(f, "rec:cat:{id}"),
            Self::RecGenre(id) => write!(f, "rec:genre:{id}"),
            Self::RecBack => f.write_str("rec:back"),
            Self::RecDislike => f.write_str("rec:dislike"),
            Self::RecMore => f.write_str("rec:more"),
        }
    }
}

impl FromStr for CallbackToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_TOKEN_LEN {
            return Err(TokenError::TooLong);
        }

        let unknown = || TokenError::Unknown(s.to_string());
        let mut parts = s.splitn(3, ':');
        let token = match (parts.next(), parts.next(), parts.next()) {
            (Some("menu"), Some(key), None) => {
                Self::Open(Feature::from_key(key).ok_or_else(unknown)?)
            }
            (Some("nav"), Some("finish"), None) => Self::Finish,
            (Some("fact"), Some("another"), None) => Self::AnotherFact,
            (Some("quiz"), Some("topic"), Some(arg)) => Self::QuizTopic(TokenArg::new(arg)?),
            (Some("quiz"), Some("next"), None) => Self::QuizNext,
            (Some("quiz"), Some("change"), None) => Self::QuizChangeTopic,
            (Some("talk"), Some("persona"), Some(arg)) => Self::TalkPersona(TokenArg::new(arg)?),
            (Some("talk"), Some("change"), None) => Self::TalkChangePersona,
            (Some("tr"), Some("mode"), Some(arg)) => {
                Self::TranslateMode(TranslateMode::from_key(arg).ok_or_else(unknown)?)
            }
            (Some("tr"), Some("change"), None) => Self::TranslateChangeMode,
            (Some("rec"), Some("cat"), Some(arg)) => Self::RecCategory(TokenArg::new(arg)?),
            (Some("rec"), Some("genre"), Some(arg)) => Self::RecGenre(TokenArg::new(arg)?),
            (Some("rec"), Some("back"), None) => Self::RecBack,
            (Some("rec"), Some("dislike"), None) => Self::RecDislike,
            (Some("rec"), Some("more"), None) => Self::RecMore,
            _ => return Err(unknown()),
        };

        Ok(token)
    }
}
