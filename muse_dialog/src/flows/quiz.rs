//! Quiz: pick a topic, answer generated questions, keep a running score.
//!
//! A round starts when a topic is chosen. After every judged answer the
//! round's cumulative totals are written to its own row, so stored stats are
//! the sum over rounds and never count an answer twice.

use muse_core::{LLMProvider, RecordStore, UserId};
use tracing::{debug, info};

use crate::error::Result;
use crate::gateway::Generation;
use crate::menus;
use crate::parse::{self, QuizQuestion};
use crate::prompts;
use crate::reply::Reply;
use crate::router::Services;
use crate::session::{FlowState, QuizRound, QuizState, Session};

pub fn enter<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Quiz(QuizState::default());
    info!("User {} started quiz", session.user_id);

    vec![
        Reply::text("🧠 Quiz Time!\n\nChoose a topic to test your knowledge:")
            .with_photo(svc.catalog.image("quiz"))
            .with_menu(menus::quiz_topics_menu(&svc.catalog)),
    ]
}

async fn ask<P, S>(svc: &Services<P, S>, topic_id: &str, asked: &[String]) -> Option<QuizQuestion>
where
    P: LLMProvider,
    S: RecordStore,
{
    let topic_name = svc
        .catalog
        .quiz_topic(topic_id)
        .map_or(topic_id, |topic| topic.name.as_str());

    let text = svc
        .gateway
        .generate(&prompts::quiz_question(topic_name, asked), None)
        .await
        .text()?;

    let question = parse::parse_quiz_question(&text);
    if question.question.is_empty() || question.answer.is_empty() {
        debug!("Quiz question without labels: {text:?}");
    }
    Some(question)
}

fn question_reply(number: u32, question: &QuizQuestion) -> Reply {
    Reply::text(format!(
        "❓ Question {number}:\n\n{}\n\nType your answer:",
        question.question
    ))
}

/// Start a new round on `topic_id` with its first question.
pub async fn select_topic<P, S>(
    svc: &Services<P, S>,
    session: &mut Session,
    topic_id: &str,
) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    let Some(topic) = svc.catalog.quiz_topic(topic_id) else {
        debug!("Unknown quiz topic {topic_id}");
        return Vec::new();
    };

    let Some(question) = ask(svc, &topic.id, &[]).await else {
        return vec![Reply::apology()];
    };

    info!("User {} selected quiz topic {}", session.user_id, topic.name);
    let reply = question_reply(1, &question);
    session.flow = FlowState::Quiz(QuizState {
        round: Some(QuizRound::start(topic.id.clone(), question)),
    });
    vec![reply]
}

pub async fn next_question<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply>
where
    P: LLMProvider,
    S: RecordStore,
{
    let FlowState::Quiz(QuizState { round: Some(round) }) = &mut session.flow else {
        return Vec::new();
    };

    let Some(question) = ask(svc, &round.topic, &round.asked).await else {
        return vec![Reply::apology()];
    };

    let reply = question_reply(round.attempts + 1, &question);
    round.ask(question);
    vec![reply]
}

/// Judge an answer against the current question and persist the round.
///
/// Answering again before asking for the next question judges the same
/// question once more and counts as another attempt.
pub async fn on_text<P, S>(
    svc: &Services<P, S>,
    user_id: UserId,
    state: &mut QuizState,
    answer: &str,
) -> Result<Vec<Reply>>
where
    P: LLMProvider,
    S: RecordStore,
{
    let Some(round) = state.round.as_mut() else {
        debug!("User {user_id} typed while choosing a quiz topic");
        return Ok(Vec::new());
    };

    let prompt = prompts::quiz_verdict(&round.current.question, &round.current.answer, answer);
    let Generation::Text(verdict) = svc.gateway.generate(&prompt, None).await else {
        return Ok(vec![Reply::apology()]);
    };

    let correct = parse::is_correct_verdict(&verdict);
    round.record_answer(correct);
    svc.store.upsert_score(&round.score_record(user_id)).await?;

    let stats = round.stats();
    info!(
        "User {} answered on {}: correct={} ({}/{})",
        user_id, round.topic, correct, stats.correct, stats.total
    );

    let mark = if correct { "✅" } else { "❌" };
    Ok(vec![
        Reply::text(format!(
            "{mark} {verdict}\n\n📊 Current Score: {}/{} ({:.2}%)",
            stats.correct,
            stats.total,
            stats.percentage()
        ))
        .with_menu(menus::quiz_continue_menu()),
    ])
}

/// End the round and return to topic selection. Stored rows stay.
pub fn change_topic<P, S>(svc: &Services<P, S>, session: &mut Session) -> Vec<Reply> {
    session.flow = FlowState::Quiz(QuizState::default());

    vec![
        Reply::text("🔄 Choose a new topic:")
            .with_menu(menus::quiz_topics_menu(&svc.catalog)),
    ]
}
