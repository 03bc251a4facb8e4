//! One module per flow. Every handler receives the checked-out session and
//! returns the replies for the event; an `Err` aborts the event before the
//! session is committed.

pub mod chat;
pub mod fact;
pub mod quiz;
pub mod recommend;
pub mod start;
pub mod talk;
pub mod translate;
