//! sea-orm entities for the four durable tables.

pub mod conversations;
pub mod quiz_scores;
pub mod recommendations;
pub mod user_preferences;
