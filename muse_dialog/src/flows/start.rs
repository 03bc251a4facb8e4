use std::fmt::Write;

use muse_core::{LLMProvider, RecordStore, UserId};
use tracing::info;

use crate::error::Result;
use crate::event::Command;
use crate::menus;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::Session;

fn name_or_default(display_name: Option<&str>) -> &str {
    display_name.filter(|name| !name.trim().is_empty()).unwrap_or("there")
}

pub fn welcome<P, S>(
    svc: &Services<P, S>,
    session: &mut Session,
    display_name: Option<&str>,
) -> Vec<Reply> {
    session.reset();
    let name = name_or_default(display_name);
    info!("User {} opened the main menu", session.user_id);

    vec![
        Reply::text(format!(
            "👋 Welcome, {name}!\n\n\
             I'm your personal assistant. I can share random facts, chat, \
             let you talk to famous personalities, quiz you, translate text \
             and recommend movies and books.\n\n\
             Choose what you'd like to do:"
        ))
        .with_photo(svc.catalog.image("start"))
        .with_menu(menus::main_menu()),
    ]
}

/// Leave whatever flow is active and go back to the main menu.
pub fn finish(session: &mut Session, display_name: Option<&str>) -> Vec<Reply> {
    info!(
        "User {} finished {:?}",
        session.user_id,
        session.active_flow()
    );
    session.reset();
    let name = name_or_default(display_name);

    vec![
        Reply::text(format!(
            "Welcome back, {name}! What would you like to do next?"
        ))
        .with_menu(menus::main_menu()),
    ]
}

pub fn help() -> Vec<Reply> {
    let mut text = String::from("📖 Available commands:\n\n");
    for command in Command::all() {
        let _ = writeln!(text, "/{} - {}", command.name(), command.description());
    }
    vec![Reply::text(text.trim_end())]
}

/// Per-topic and overall quiz totals. Leaves the session alone.
pub async fn stats<P, S>(svc: &Services<P, S>, user_id: UserId) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let overall = svc.store.quiz_stats(user_id, None).await?;
    if overall.total == 0 {
        return Ok(vec![Reply::text(
            "📊 You haven't answered any quiz questions yet. Try /quiz!",
        )]);
    }

    let mut text = String::from("📊 Your quiz statistics:\n\n");
    for topic in &svc.catalog.quiz_topics {
        let stats = svc.store.quiz_stats(user_id, Some(&topic.id)).await?;
        if stats.total > 0 {
            let _ = writeln!(
                text,
                "{}: {}/{} ({:.2}%)",
                topic.name,
                stats.correct,
                stats.total,
                stats.percentage()
            );
        }
    }
    let _ = write!(
        text,
        "\nOverall: {}/{} ({:.2}%)",
        overall.correct,
        overall.total,
        overall.percentage()
    );

    Ok(vec![Reply::text(text)])
}
