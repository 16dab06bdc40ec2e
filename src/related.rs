use crate::config::{RelatedConfig, TOPIC_PLACEHOLDER};
use crate::model::MAX_SUGGESTIONS;

/// Build up to three follow-up questions from an entry's keywords.
///
/// Priority keywords are preferred when any are present; otherwise the raw
/// keyword list is used. Keyword `i` is rendered with template `i mod n`, and
/// any remaining slots are filled from the default questions in order.
pub fn generate_related<S: AsRef<str>>(keywords: &[S], config: &RelatedConfig) -> Vec<String> {
    let prioritized: Vec<&str> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|k| is_priority(k, &config.priority_keywords))
        .collect();
    let source: Vec<&str> = if prioritized.is_empty() {
        keywords.iter().map(AsRef::as_ref).collect()
    } else {
        prioritized
    };

    let mut questions: Vec<String> = if config.templates.is_empty() {
        Vec::new()
    } else {
        source
            .iter()
            .take(MAX_SUGGESTIONS)
            .enumerate()
            .map(|(i, keyword)| {
                config.templates[i % config.templates.len()].replace(TOPIC_PLACEHOLDER, keyword)
            })
            .collect()
    };

    let missing = MAX_SUGGESTIONS.saturating_sub(questions.len());
    questions.extend(config.default_questions.iter().take(missing).cloned());
    questions
}

fn is_priority(keyword: &str, priority: &[String]) -> bool {
    let keyword = keyword.trim().to_lowercase();
    priority.iter().any(|p| p.trim().to_lowercase() == keyword)
}
