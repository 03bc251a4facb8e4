//! Inline menus offered by each flow.
//!
//! Catalog ids are validated when the router is built, so a rejected id
//! here only drops its button.

use crate::catalog::{Catalog, RecommendationCategory};
use crate::event::Feature;
use crate::reply::{Button, Menu};
use crate::session::TranslateMode;
use crate::token::{CallbackToken, TokenArg};

fn finish_button(label: &str) -> Button {
    Button::new(label, CallbackToken::Finish)
}

fn arg_button(
    label: &str,
    id: &str,
    token: impl FnOnce(TokenArg) -> CallbackToken,
) -> Option<Button> {
    TokenArg::new(id).ok().map(|arg| Button::new(label, token(arg)))
}

pub fn main_menu() -> Menu {
    Feature::ALL
        .chunks(2)
        .fold(Menu::new(), |menu, pair| {
            menu.row(
                pair.iter()
                    .map(|feature| Button::new(feature.label(), CallbackToken::Open(*feature)))
                    .collect(),
            )
        })
}

pub fn finish_menu() -> Menu {
    Menu::new().row(vec![finish_button("🏁 Finish")])
}

pub fn fact_menu() -> Menu {
    Menu::new()
        .button("🎲 Another Fact", CallbackToken::AnotherFact)
        .row(vec![finish_button("🏁 Finish")])
}

pub fn quiz_topics_menu(catalog: &Catalog) -> Menu {
    catalog
        .quiz_topics
        .iter()
        .filter_map(|topic| arg_button(&topic.name, &topic.id, CallbackToken::QuizTopic))
        .fold(Menu::new(), |menu, button| menu.row(vec![button]))
        .row(vec![finish_button("🏁 Back to Menu")])
}

pub fn quiz_continue_menu() -> Menu {
    Menu::new()
        .button("➡️ Next Question", CallbackToken::QuizNext)
        .button("🔄 Change Topic", CallbackToken::QuizChangeTopic)
        .row(vec![finish_button("🏁 Finish Quiz")])
}

pub fn personalities_menu(catalog: &Catalog) -> Menu {
    catalog
        .personalities
        .iter()
        .filter_map(|persona| arg_button(&persona.name, &persona.id, CallbackToken::TalkPersona))
        .fold(Menu::new(), |menu, button| menu.row(vec![button]))
        .row(vec![finish_button("🏁 Back to Menu")])
}

pub fn talk_menu() -> Menu {
    Menu::new()
        .button("🔄 Change Personality", CallbackToken::TalkChangePersona)
        .row(vec![finish_button("🏁 Finish")])
}

pub fn translate_modes_menu() -> Menu {
    TranslateMode::ALL
        .into_iter()
        .fold(Menu::new(), |menu, mode| {
            menu.button(mode.label(), CallbackToken::TranslateMode(mode))
        })
        .row(vec![finish_button("🏁 Back to Menu")])
}

pub fn translate_continue_menu() -> Menu {
    Menu::new()
        .button("🔄 Change Mode", CallbackToken::TranslateChangeMode)
        .row(vec![finish_button("🏁 Finish")])
}

pub fn categories_menu(catalog: &Catalog) -> Menu {
    catalog
        .recommendation_categories
        .iter()
        .filter_map(|category| {
            arg_button(
                &format!("{} {}", category.icon, category.name),
                &category.id,
                CallbackToken::RecCategory,
            )
        })
        .fold(Menu::new(), |menu, button| menu.row(vec![button]))
        .row(vec![finish_button("🏁 Back to Menu")])
}

/// Genres two per row, then a way back to the categories.
pub fn genres_menu(category: &RecommendationCategory) -> Menu {
    let buttons: Vec<Button> = category
        .genres
        .iter()
        .filter_map(|label| {
            arg_button(
                label,
                &RecommendationCategory::genre_id(label),
                CallbackToken::RecGenre,
            )
        })
        .collect();

    buttons
        .chunks(2)
        .fold(Menu::new(), |menu, pair| menu.row(pair.to_vec()))
        .button("🏁 Back", CallbackToken::RecBack)
}

pub fn feedback_menu() -> Menu {
    Menu::new()
        .button("👎 Not Interested", CallbackToken::RecDislike)
        .button("🔄 More Recommendations", CallbackToken::RecMore)
        .row(vec![finish_button("🏁 Finish")])
}
