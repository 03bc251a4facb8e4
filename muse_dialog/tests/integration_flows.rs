//! Integration tests for the dialog router.
//!
//! These tests drive whole conversations through the router and verify:
//! - Quiz rounds persist cumulative totals under one row per round
//! - Free text with no active flow is ignored
//! - Unknown slash commands never become flow input
//! - Failed generation answers with an apology and changes nothing
//! - Failed storage aborts the event and rolls the session back
//! - Stale buttons are ignored
//! - Persona history stays bounded and is restored per persona
//! - Recommendations never repeat shown or disliked items

mod common;

use std::sync::Arc;

use common::{Harness, MemoryStore, ScriptedProvider, USER, only_text};
use muse_core::Role;
use muse_dialog::{
    CallbackToken, Catalog, FALLBACK_TEXT, FlowKind, FlowState, GenerationConfig, InboundEvent,
    QuizState, Router, TALK_HISTORY_LIMIT, TranslateMode,
};

const WATER: &str = "Question: What is H2O?\nAnswer: Water";

async fn start_quiz(h: &Harness, topic: &str) -> anyhow::Result<()> {
    h.command("/quiz").await?;
    h.provider.reply(WATER);
    h.press(&format!("quiz:topic:{topic}")).await?;
    Ok(())
}

async fn quiz_round(h: &Harness) -> anyhow::Result<muse_dialog::QuizRound> {
    match h.session().await?.flow {
        FlowState::Quiz(QuizState { round: Some(round) }) => Ok(round),
        other => anyhow::bail!("no quiz round in {other:?}"),
    }
}

#[tokio::test]
async fn test_quiz_answers_rewrite_the_round_row() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/quiz").await?;

    h.provider.reply(WATER);
    let replies = h.press("quiz:topic:science").await?;
    assert!(only_text(&replies)?.contains("Question 1:\n\nWhat is H2O?"));

    h.provider.reply("Correct! Water is H2O.");
    let replies = h.text("water").await?;
    assert!(only_text(&replies)?.contains("Current Score: 1/1 (100.00%)"));

    // A second answer re-judges the same question as a new attempt.
    h.provider.reply("Incorrect. The answer is water.");
    let replies = h.text("ice").await?;
    assert!(only_text(&replies)?.contains("Current Score: 1/2 (50.00%)"));
    assert!(h.provider.last_prompt().contains("Question: What is H2O?"));
    assert!(h.provider.last_prompt().contains("User's answer: ice"));

    let scores = h.store.scores();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].topic, "science");
    assert_eq!((scores[0].correct_answers, scores[0].total_questions), (1, 2));
    assert_eq!(scores[0].round_id, quiz_round(&h).await?.id);
    Ok(())
}

#[tokio::test]
async fn test_next_question_avoids_repeats() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;
    h.provider.reply("Correct!");
    h.text("water").await?;

    h.provider.reply("Question: Largest planet?\nAnswer: Jupiter");
    let replies = h.press("quiz:next").await?;
    assert!(only_text(&replies)?.contains("Question 2:"));
    assert!(
        h.provider
            .last_prompt()
            .contains("Do not repeat these questions: What is H2O?")
    );

    let round = quiz_round(&h).await?;
    assert_eq!(round.current.answer, "Jupiter");
    assert_eq!(round.asked.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unlabelled_question_still_awaits_an_answer() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/quiz").await?;
    h.provider.reply("What is the capital of France?");
    h.press("quiz:topic:geography").await?;

    let round = quiz_round(&h).await?;
    assert_eq!(round.current.question, "");
    assert_eq!(round.current.answer, "");
    Ok(())
}

#[tokio::test]
async fn test_stats_sum_rounds_per_topic() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let replies = h.command("/stats").await?;
    assert!(only_text(&replies)?.contains("haven't answered"));

    start_quiz(&h, "science").await?;
    h.provider.reply("Correct!").reply("Incorrect.");
    h.text("water").await?;
    h.text("ice").await?;
    let first_round = quiz_round(&h).await?.id;

    h.press("quiz:change").await?;
    h.provider.reply("Question: Who built the pyramids?\nAnswer: Egyptians");
    h.press("quiz:topic:history").await?;
    assert_ne!(quiz_round(&h).await?.id, first_round);
    h.provider.reply("Correct, well done.");
    h.text("egyptians").await?;

    assert_eq!(h.store.scores().len(), 2);

    let before = h.session().await?;
    let replies = h.command("/stats").await?;
    let text = only_text(&replies)?;
    assert!(text.contains("Science: 1/2 (50.00%)"));
    assert!(text.contains("History: 1/1 (100.00%)"));
    assert!(text.contains("Overall: 2/3 (66.67%)"));
    assert_eq!(h.session().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_idle_text_is_ignored() -> anyhow::Result<()> {
    let h = Harness::new()?;
    assert!(h.text("hello?").await?.is_empty());
    assert_eq!(h.provider.request_count(), 0);
    assert!(h.router.session(USER).await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_leaves_state_unchanged() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;
    let before = h.session().await?;

    h.provider.fail();
    let replies = h.text("water").await?;
    assert_eq!(only_text(&replies)?, FALLBACK_TEXT);
    assert_eq!(h.session().await?, before);
    assert!(h.store.scores().is_empty());

    // Picking a topic again fails before a new round starts.
    h.provider.fail();
    let replies = h.press("quiz:topic:history").await?;
    assert_eq!(only_text(&replies)?, FALLBACK_TEXT);
    assert_eq!(h.session().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_storage_failure_rolls_back_the_event() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    h.press("talk:persona:einstein").await?;
    let before = h.session().await?;

    h.store.set_failing(true);
    h.provider.reply("Time is relative.");
    let result = h
        .router
        .handle(InboundEvent::text(USER, "What is time?"))
        .await;
    assert!(result.is_err());
    assert_eq!(h.session().await?, before);

    h.store.set_failing(false);
    h.provider.reply("Time is relative.");
    let replies = h.text("What is time?").await?;
    assert_eq!(only_text(&replies)?, "Time is relative.");
    let stored = h.store.context(USER).map(|c| c.history.len());
    assert_eq!(stored, Some(2));
    Ok(())
}

#[tokio::test]
async fn test_quiz_storage_failure_does_not_count_the_answer() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;

    h.store.set_failing(true);
    h.provider.reply("Correct!");
    assert!(h.router.handle(InboundEvent::text(USER, "water")).await.is_err());
    h.store.set_failing(false);

    let round = quiz_round(&h).await?;
    assert_eq!((round.score, round.attempts), (0, 0));
    Ok(())
}

#[tokio::test]
async fn test_stale_buttons_are_ignored() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;
    h.provider.reply("Correct!");
    h.text("water").await?;
    let before = h.session().await?;

    // The topic menu was replaced by the continue menu.
    assert!(h.press("quiz:topic:history").await?.is_empty());
    // Never offered in this conversation.
    assert!(h.press("talk:change").await?.is_empty());
    assert!(h.press("rec:more").await?.is_empty());
    // Not a token at all.
    assert!(h.press("quiz_topic_history").await?.is_empty());

    assert_eq!(h.session().await?, before);
    assert_eq!(h.provider.request_count(), 2);

    // Navigation works from anywhere.
    let replies = h.press("menu:translate").await?;
    assert_eq!(replies.len(), 1);
    assert_eq!(h.session().await?.active_flow(), FlowKind::Translate);
    Ok(())
}

#[tokio::test]
async fn test_finish_returns_to_main_menu() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;

    let replies = h.press("nav:finish").await?;
    assert!(only_text(&replies)?.contains("Welcome back, Ada!"));
    let menu = replies[0].menu.clone().unwrap_or_default();
    assert_eq!(menu.tokens().count(), 6);
    assert_eq!(h.session().await?.active_flow(), FlowKind::None);

    h.command("/gpt").await?;
    h.command("/cancel").await?;
    assert_eq!(h.session().await?.active_flow(), FlowKind::None);
    Ok(())
}

#[tokio::test]
async fn test_start_and_help() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;

    let replies = h.command("/start").await?;
    assert!(only_text(&replies)?.starts_with("👋 Welcome, Ada!"));
    assert_eq!(replies[0].photo.as_deref(), Some("images/start.png"));
    assert_eq!(h.session().await?.active_flow(), FlowKind::None);

    let replies = h.command("/help").await?;
    let text = only_text(&replies)?;
    for name in ["/start", "/random", "/gpt", "/talk", "/quiz", "/translate", "/recommend"] {
        assert!(text.contains(name), "help lists {name}");
    }
    Ok(())
}

#[tokio::test]
async fn test_random_fact_is_stateless() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;

    h.provider.reply("Octopuses have three hearts.");
    let replies = h.command("/random").await?;
    assert_eq!(replies.len(), 2);
    assert!(replies[1].text.contains("Octopuses have three hearts."));
    assert_eq!(h.session().await?.active_flow(), FlowKind::None);

    h.provider.fail();
    let replies = h.press("fact:another").await?;
    assert_eq!(replies[1].text, FALLBACK_TEXT);
    assert!(replies[1].menu.is_some());
    Ok(())
}

#[tokio::test]
async fn test_chat_answers_each_message() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/gpt").await?;

    h.provider.reply("Paris.");
    let replies = h.text("Capital of France?").await?;
    assert_eq!(only_text(&replies)?, "Paris.");

    let requests = h.provider.requests();
    let request = &requests[0];
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.model, "gpt-4.1");
    Ok(())
}

#[tokio::test]
async fn test_talk_history_is_bounded_and_persisted() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    let replies = h.press("talk:persona:einstein").await?;
    assert!(only_text(&replies)?.contains("You're now talking to Albert Einstein"));

    for i in 0..12 {
        h.provider.reply(&format!("a{i}"));
        h.text(&format!("q{i}")).await?;
    }

    let request = h.provider.requests().pop().ok_or_else(|| anyhow::anyhow!("no request"))?;
    assert_eq!(request.messages[0].role, Role::System);
    assert!(request.messages[0].content.starts_with("You are Albert Einstein"));
    assert_eq!(request.messages.len(), TALK_HISTORY_LIMIT + 2);

    let stored = h.store.context(USER).ok_or_else(|| anyhow::anyhow!("no context"))?;
    assert_eq!(stored.personality, "einstein");
    assert_eq!(stored.history.len(), TALK_HISTORY_LIMIT);
    assert_eq!(stored.history[0].content, "q2");
    assert_eq!(stored.history[19].content, "a11");
    Ok(())
}

#[tokio::test]
async fn test_talk_restores_only_the_same_persona() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    h.press("talk:persona:einstein").await?;
    h.provider.reply("Imagination is more important than knowledge.");
    h.text("Advice?").await?;

    h.command("/talk").await?;
    let replies = h.press("talk:persona:jobs").await?;
    assert!(only_text(&replies)?.contains("You're now talking to Steve Jobs"));
    match h.session().await?.flow {
        FlowState::Talk(state) => assert!(state.history.is_empty()),
        other => anyhow::bail!("not talking: {other:?}"),
    }

    h.command("/talk").await?;
    let replies = h.press("talk:persona:einstein").await?;
    assert!(only_text(&replies)?.contains("Continuing your conversation with Albert Einstein"));
    match h.session().await?.flow {
        FlowState::Talk(state) => assert_eq!(state.history.len(), 2),
        other => anyhow::bail!("not talking: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_change_personality_resets_the_session() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    h.press("talk:persona:einstein").await?;
    h.provider.reply("Hello.");
    h.text("Hi").await?;

    let replies = h.press("talk:change").await?;
    assert_eq!(replies.len(), 1);
    assert_eq!(h.session().await?.active_flow(), FlowKind::None);

    assert!(h.text("Are you there?").await?.is_empty());
    assert_eq!(h.provider.request_count(), 1);

    h.press("talk:persona:shakespeare").await?;
    assert_eq!(h.session().await?.active_flow(), FlowKind::Talk);
    Ok(())
}

#[tokio::test]
async fn test_unknown_commands_never_reach_a_flow() -> anyhow::Result<()> {
    let h = Harness::new()?;
    start_quiz(&h, "science").await?;
    let before = h.session().await?;

    assert!(h.message("/settings").await?.is_empty());
    assert!(h.message("/start@otherbot").await?.is_empty());
    assert_eq!(h.session().await?, before);
    assert_eq!(quiz_round(&h).await?.attempts, 0);
    assert_eq!(h.provider.request_count(), 1);

    h.command("/talk").await?;
    h.press("talk:persona:einstein").await?;
    assert!(h.message("/foo bar").await?.is_empty());
    assert!(h.store.context(USER).is_none());
    assert_eq!(h.provider.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_command_mid_talk_moves_text_to_the_new_flow() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    h.press("talk:persona:einstein").await?;
    h.provider.reply("Hello, my friend.");
    h.message("Hi").await?;
    assert_eq!(h.store.context(USER).map(|c| c.history.len()), Some(2));

    h.message("/quiz@muse_bot").await?;
    assert_eq!(h.session().await?.active_flow(), FlowKind::Quiz);
    h.provider.reply(WATER);
    h.press("quiz:topic:science").await?;

    h.provider.reply("Correct! Water is H2O.");
    let replies = h.message("water").await?;
    assert!(only_text(&replies)?.contains("Current Score: 1/1"));
    assert!(h.provider.last_prompt().contains("User's answer: water"));

    assert_eq!(quiz_round(&h).await?.attempts, 1);
    assert_eq!(h.store.context(USER).map(|c| c.history.len()), Some(2));
    Ok(())
}

#[tokio::test]
async fn test_generation_failure_does_not_grow_history() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/talk").await?;
    h.press("talk:persona:jobs").await?;

    h.provider.fail();
    let replies = h.text("Design?").await?;
    assert_eq!(only_text(&replies)?, FALLBACK_TEXT);
    assert!(h.store.context(USER).is_none());
    match h.session().await?.flow {
        FlowState::Talk(state) => assert!(state.history.is_empty()),
        other => anyhow::bail!("not talking: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_translate_modes() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/translate").await?;
    assert!(h.text("too early").await?.is_empty());

    h.press("tr:mode:auto").await?;
    h.provider.reply("Detected: English\nTranslation: Привет, мир");
    let replies = h.text("Hello, world").await?;
    let text = only_text(&replies)?;
    assert!(text.contains("Detected: English"));
    assert!(text.contains("Привет, мир"));

    h.provider.reply("Bonjour");
    let replies = h.text("Hello").await?;
    assert!(only_text(&replies)?.contains("Bonjour"));

    h.press("tr:change").await?;
    assert!(h.text("ignored").await?.is_empty());
    assert_eq!(h.provider.request_count(), 2);

    h.press(&CallbackToken::TranslateMode(TranslateMode::EnglishToRussian).to_string())
        .await?;
    h.provider.reply("Доброе утро");
    let replies = h.text("Good morning").await?;
    assert!(only_text(&replies)?.starts_with("📝 Translation to Russian"));
    assert!(h.provider.last_prompt().starts_with("Translate the following text to Russian"));
    Ok(())
}

const FIRST_BATCH: &str = "**Dune (2021)** - sand.\n**Arrival (2016)** - language.\n**Heat (1995)**";
const SECOND_BATCH: &str = "**Alien (1979)**\n**Moon (2009)**\n**Solaris (1972)**";

async fn browse_scifi(h: &Harness) -> anyhow::Result<()> {
    h.command("/recommend").await?;
    h.press("rec:cat:movies").await?;
    h.provider.reply(FIRST_BATCH);
    h.press("rec:genre:sci-fi").await?;
    Ok(())
}

#[tokio::test]
async fn test_recommendations_exclude_shown_items() -> anyhow::Result<()> {
    let h = Harness::new()?;
    browse_scifi(&h).await?;
    assert!(!h.provider.last_prompt().contains("Do NOT recommend"));

    h.provider.reply(SECOND_BATCH);
    let replies = h.press("rec:more").await?;
    assert!(only_text(&replies)?.contains("Alien (1979)"));
    assert!(
        h.provider
            .last_prompt()
            .ends_with("is not interested: Arrival, Dune, Heat")
    );

    h.provider.reply("**Gravity (2013)**");
    h.press("rec:more").await?;
    assert!(
        h.provider
            .last_prompt()
            .ends_with("is not interested: Alien, Arrival, Dune, Heat, Moon, Solaris")
    );

    match h.session().await?.flow {
        FlowState::Recommend(state) => {
            assert_eq!(state.shown_in("movies").len(), 7);
            assert_eq!(state.last_batch, vec!["Gravity"]);
        }
        other => anyhow::bail!("not recommending: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_back_offers_categories_again() -> anyhow::Result<()> {
    let h = Harness::new()?;
    h.command("/recommend").await?;
    h.press("rec:cat:books").await?;

    let replies = h.press("rec:back").await?;
    assert!(only_text(&replies)?.contains("What would you like recommendations for?"));

    h.press("rec:cat:movies").await?;
    h.provider.reply("**Emma (1815)**");
    let replies = h.press("rec:genre:drama").await?;
    assert!(only_text(&replies)?.starts_with("🎬 Movies Recommendations - Drama"));
    assert!(h.provider.last_prompt().starts_with("Recommend 3 Drama movies."));
    Ok(())
}

#[tokio::test]
async fn test_dislike_persists_the_whole_batch() -> anyhow::Result<()> {
    let h = Harness::new()?;
    browse_scifi(&h).await?;

    h.provider.reply(SECOND_BATCH);
    h.press("rec:dislike").await?;
    assert_eq!(h.store.dislikes(USER, "movies"), vec!["Arrival", "Dune", "Heat"]);
    assert!(h.store.dislikes(USER, "books").is_empty());

    // A fresh session still avoids the dislikes but not the items only shown.
    let provider = ScriptedProvider::default();
    let router = Router::new(
        provider.clone(),
        Arc::<MemoryStore>::clone(&h.store),
        Catalog::default(),
        GenerationConfig::default(),
    )?;
    router.handle(InboundEvent::button(USER, "menu:recommend")).await?;
    router.handle(InboundEvent::button(USER, "rec:cat:movies")).await?;
    provider.reply("**Contact (1997)**");
    router.handle(InboundEvent::button(USER, "rec:genre:sci-fi")).await?;

    let prompt = provider.last_prompt();
    assert!(prompt.ends_with("is not interested: Arrival, Dune, Heat"));
    assert!(!prompt.contains("Alien"));
    Ok(())
}

#[tokio::test]
async fn test_recommend_generation_failure_keeps_batch() -> anyhow::Result<()> {
    let h = Harness::new()?;
    browse_scifi(&h).await?;
    let before = h.session().await?;

    h.provider.fail();
    let replies = h.press("rec:more").await?;
    assert_eq!(only_text(&replies)?, FALLBACK_TEXT);
    assert_eq!(h.session().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_users_do_not_share_sessions() -> anyhow::Result<()> {
    let h = Harness::new()?;
    let other = USER + 1;

    let (mine, theirs) = tokio::join!(
        h.router.handle(InboundEvent::button(USER, "menu:quiz")),
        h.router.handle(InboundEvent::button(other, "menu:translate")),
    );
    mine?;
    theirs?;

    assert_eq!(h.session().await?.active_flow(), FlowKind::Quiz);
    let theirs = h
        .router
        .session(other)
        .await
        .ok_or_else(|| anyhow::anyhow!("no session"))?;
    assert_eq!(theirs.active_flow(), FlowKind::Translate);
    Ok(())
}
