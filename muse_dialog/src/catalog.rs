//! Configured topics, personas, recommendation categories and images.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::TokenArg;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no {0}")]
    Empty(&'static str),

    #[error("Recommendation category {0:?} has no genres")]
    NoGenres(String),

    #[error("Catalog id {0:?} must be 1-40 characters of [a-z0-9_-]")]
    InvalidId(String),

    #[error("Duplicate catalog id {0:?}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizTopic {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub id: String,
    pub name: String,
    /// System prompt used for every turn with this persona.
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Plural noun used in prompts, e.g. "movies".
    pub item_noun: String,
    /// What each recommended item should include.
    pub item_details: Vec<String>,
    pub genres: Vec<String>,
}

impl RecommendationCategory {
    /// Token-safe id of a genre label.
    #[must_use]
    pub fn genre_id(label: &str) -> String {
        label
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Look up a genre label by its id.
    #[must_use]
    pub fn genre(&self, id: &str) -> Option<&str> {
        self.genres
            .iter()
            .find(|label| Self::genre_id(label) == id)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub quiz_topics: Vec<QuizTopic>,
    pub personalities: Vec<Personality>,
    pub recommendation_categories: Vec<RecommendationCategory>,
    /// Image references keyed by `start` or a feature key.
    #[serde(default)]
    pub images: BTreeMap<String, String>,
}

impl Catalog {
    #[must_use]
    pub fn quiz_topic(&self, id: &str) -> Option<&QuizTopic> {
        self.quiz_topics.iter().find(|topic| topic.id == id)
    }

    #[must_use]
    pub fn personality(&self, id: &str) -> Option<&Personality> {
        self.personalities.iter().find(|persona| persona.id == id)
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&RecommendationCategory> {
        self.recommendation_categories
            .iter()
            .find(|category| category.id == id)
    }

    #[must_use]
    pub fn image(&self, key: &str) -> Option<String> {
        self.images.get(key).cloned()
    }

    /// Check that every id can be carried by a callback token and that no
    /// list is empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.quiz_topics.is_empty() {
            return Err(CatalogError::Empty("quiz topics"));
        }
        if self.personalities.is_empty() {
            return Err(CatalogError::Empty("personalities"));
        }
        if self.recommendation_categories.is_empty() {
            return Err(CatalogError::Empty("recommendation categories"));
        }

        check_ids(self.quiz_topics.iter().map(|topic| topic.id.clone()))?;
        check_ids(self.personalities.iter().map(|persona| persona.id.clone()))?;
        check_ids(
            self.recommendation_categories
                .iter()
                .map(|category| category.id.clone()),
        )?;

        for category in &self.recommendation_categories {
            if category.genres.is_empty() {
                return Err(CatalogError::NoGenres(category.id.clone()));
            }
            check_ids(
                category
                    .genres
                    .iter()
                    .map(|label| RecommendationCategory::genre_id(label)),
            )?;
        }

        Ok(())
    }
}

fn check_ids(ids: impl Iterator<Item = String>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if TokenArg::new(id.as_str()).is_err() {
            return Err(CatalogError::InvalidId(id));
        }
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id));
        }
    }
    Ok(())
}

fn topic(id: &str, name: &str) -> QuizTopic {
    QuizTopic {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn persona(id: &str, name: &str, prompt: &str) -> Personality {
    Personality {
        id: id.to_string(),
        name: name.to_string(),
        prompt: prompt.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        let images = ["start", "random", "gpt", "talk", "quiz", "translate", "recommend"]
            .into_iter()
            .map(|key| (key.to_string(), format!("images/{key}.png")))
            .collect();

        Self {
            quiz_topics: vec![
                topic("science", "Science"),
                topic("history", "History"),
                topic("geography", "Geography"),
                topic("literature", "Literature"),
                topic("movies", "Movies"),
                topic("technology", "Technology"),
            ],
            personalities: vec![
                persona(
                    "einstein",
                    "Albert Einstein",
                    "You are Albert Einstein, the physicist. Answer with his wit, curiosity \
                     and warmth, reference your theories and life when it fits, and explain \
                     hard ideas in plain words.",
                ),
                persona(
                    "shakespeare",
                    "William Shakespeare",
                    "You are William Shakespeare, playwright and poet. Answer in modern English \
                     seasoned with Elizabethan turns of phrase, be dramatic and reflective, and \
                     allude to your plays and sonnets when relevant.",
                ),
                persona(
                    "jobs",
                    "Steve Jobs",
                    "You are Steve Jobs, co-founder of Apple. Be direct and passionate, insist \
                     on simplicity and great design, draw on your years at Apple, and push back \
                     on conventional thinking.",
                ),
            ],
            recommendation_categories: vec![
                RecommendationCategory {
                    id: "movies".to_string(),
                    name: "Movies".to_string(),
                    icon: "🎬".to_string(),
                    item_noun: "movies".to_string(),
                    item_details: strings(&[
                        "Title (with year)",
                        "Brief plot summary (2-3 sentences)",
                        "Why it's worth watching",
                    ]),
                    genres: strings(&[
                        "Action",
                        "Comedy",
                        "Drama",
                        "Horror",
                        "Sci-Fi",
                        "Fantasy",
                        "Romance",
                        "Thriller",
                        "Western",
                        "Documentary",
                        "Animation",
                    ]),
                },
                RecommendationCategory {
                    id: "books".to_string(),
                    name: "Books".to_string(),
                    icon: "📚".to_string(),
                    item_noun: "books".to_string(),
                    item_details: strings(&[
                        "Title and author",
                        "Brief summary (2-3 sentences)",
                        "Why it's worth reading",
                    ]),
                    genres: strings(&[
                        "Fiction",
                        "Non-fiction",
                        "Mystery",
                        "Sci-Fi",
                        "Fantasy",
                        "Biography",
                        "History",
                        "Self-help",
                    ]),
                },
            ],
            images,
        }
    }
}
