use std::collections::BTreeSet;
use std::fmt::Write;

use crate::catalog::RecommendationCategory;

pub const RANDOM_FACT_PROMPT: &str = "Generate an interesting and surprising random fact. \
The fact should be educational, engaging, and suitable for all ages. \
Keep it to 2-3 sentences. It can be about science, history, nature, technology \
or any other fascinating subject.";

pub fn quiz_question(topic: &str, asked: &[String]) -> String {
    let mut prompt = format!(
        "Generate a single trivia question about {topic}.\n\
         The question should be moderately difficult and have a clear, factual answer.\n\
         Format your response as:\n\
         Question: [your question]\n\
         Answer: [the correct answer]\n\n\
         Keep the answer brief (1-5 words when possible)."
    );
    if !asked.is_empty() {
        let _ = write!(prompt, "\nDo not repeat these questions: {}", asked.join(", "));
    }
    prompt
}

pub fn quiz_verdict(question: &str, answer: &str, user_answer: &str) -> String {
    format!(
        "Question: {question}\n\
         Correct answer: {answer}\n\
         User's answer: {user_answer}\n\n\
         Is the user's answer correct? Accept minor spelling mistakes and equivalent phrasing.\n\
         Start your reply with \"Correct\" or \"Incorrect\", then explain briefly."
    )
}

pub fn translation(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {target_language}.\n\
         Provide only the translation without any additional explanation:\n\n\
         {text}"
    )
}

pub fn auto_translation(text: &str) -> String {
    format!(
        "Detect the language of the following text and translate it:\n\
         - If it's in English, translate to Russian\n\
         - If it's in Russian, translate to English\n\
         - If it's in another language, translate to Russian\n\n\
         Format your response as:\n\
         Detected: [language]\n\
         Translation: [translated text]\n\n\
         Text: {text}"
    )
}

pub fn recommendation(
    category: &RecommendationCategory,
    genre: &str,
    excluded: &BTreeSet<String>,
) -> String {
    let mut prompt = format!(
        "Recommend 3 {genre} {}. For each one, provide:\n",
        category.item_noun
    );
    for detail in &category.item_details {
        let _ = writeln!(prompt, "- {detail}");
    }
    prompt.push_str("\nFormat each recommendation clearly with the title in bold.");

    if !excluded.is_empty() {
        let items: Vec<&str> = excluded.iter().map(String::as_str).collect();
        let _ = write!(
            prompt,
            "\n\nDo NOT recommend these items, the user has already seen them or is not interested: {}",
            items.join(", ")
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn quiz_prompt_lists_previous_questions() {
        let fresh = quiz_question("Science", &[]);
        assert!(!fresh.contains("Do not repeat"));

        let repeat = quiz_question("Science", &["H2O?".to_string(), "Largest planet?".to_string()]);
        assert!(repeat.ends_with("Do not repeat these questions: H2O?, Largest planet?"));
    }

    #[test]
    fn recommendation_prompt_carries_exclusions() -> anyhow::Result<()> {
        let catalog = Catalog::default();
        let movies = catalog
            .category("movies")
            .ok_or_else(|| anyhow::anyhow!("movies missing"))?;

        let prompt = recommendation(movies, "Sci-Fi", &BTreeSet::new());
        assert!(prompt.starts_with("Recommend 3 Sci-Fi movies."));
        assert!(prompt.contains("- Title (with year)"));
        assert!(!prompt.contains("Do NOT recommend"));

        let excluded: BTreeSet<String> = ["Dune", "Alien"].map(String::from).into();
        let prompt = recommendation(movies, "Sci-Fi", &excluded);
        assert!(prompt.ends_with("is not interested: Alien, Dune"));
        Ok(())
    }
}
