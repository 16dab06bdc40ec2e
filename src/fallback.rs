use crate::model::{KnowledgeEntry, MAX_SUGGESTIONS, ScoredEntry};

/// Words of this many characters or fewer carry no ranking signal.
const MIN_SIGNIFICANT_LEN: usize = 3;
const KEYWORD_POINTS: u32 = 2;
const TRIGGER_POINTS: u32 = 1;

/// Rank entries against the query's significant words and return the first
/// trigger of the top three. `query` must already be normalized.
pub fn rank_fallback(query: &str, entries: &[KnowledgeEntry]) -> Vec<String> {
    score_entries(query, entries)
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .filter_map(|scored| scored.entry.first_trigger())
        .filter(|trigger| !trigger.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Every entry with a positive score, highest first; ties keep store order.
pub fn score_entries<'a>(query: &str, entries: &'a [KnowledgeEntry]) -> Vec<ScoredEntry<'a>> {
    let words = significant_words(query);
    if words.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredEntry<'a>> = entries
        .iter()
        .map(|entry| ScoredEntry {
            entry,
            score: score_entry(entry, &words),
        })
        .filter(|scored| scored.score > 0)
        .collect();

    // sort_by is stable.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

fn significant_words(query: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for token in query.split_whitespace() {
        if token.chars().count() <= MIN_SIGNIFICANT_LEN {
            continue;
        }
        let token = token.to_lowercase();
        if !words.contains(&token) {
            words.push(token);
        }
    }
    words
}

fn score_entry(entry: &KnowledgeEntry, words: &[String]) -> u32 {
    let keyword_score: u32 = entry
        .keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| words.contains(k))
        .map(|_| KEYWORD_POINTS)
        .sum();

    // Summed over every (trigger, word) pair; similar triggers on one entry each count.
    let trigger_score: u32 = entry
        .triggers
        .iter()
        .map(|t| t.to_lowercase())
        .map(|trigger| {
            words
                .iter()
                .filter(|w| trigger.contains(w.as_str()))
                .map(|_| TRIGGER_POINTS)
                .sum::<u32>()
        })
        .sum();

    keyword_score + trigger_score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_entry(triggers: &[&str], keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            response: String::new(),
            source: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn short_words_are_ignored() {
        assert_eq!(significant_words("how do i use erp"), Vec::<String>::new());
        assert_eq!(significant_words("what does cloud cost"), vec!["what", "does", "cloud", "cost"]);
    }

    #[test]
    fn keyword_hits_outweigh_trigger_hits() {
        let entries = vec![
            mk_entry(&["cloud hosting options"], &[]),
            mk_entry(&["deployment choices"], &["cloud"]),
        ];
        let ranked = rank_fallback("private cloud", &entries);
        assert_eq!(ranked, vec!["deployment choices", "cloud hosting options"]);
    }

    #[test]
    fn every_trigger_word_pair_counts() {
        let entries = vec![
            mk_entry(&["sap support"], &["support"]),
            mk_entry(
                &["support hours", "support contact", "support portal", "support plans"],
                &[],
            ),
        ];
        let scored = score_entries("support", &entries);
        assert_eq!(scored[0].score, 4);
        assert_eq!(scored[0].entry.first_trigger(), Some("support hours"));
        assert_eq!(scored[1].score, 3);
    }

    #[test]
    fn ties_keep_store_order_and_scores_do_not_increase() {
        let entries = vec![
            mk_entry(&["alpha"], &["data"]),
            mk_entry(&["beta"], &["data"]),
            mk_entry(&["data migration"], &["data"]),
            mk_entry(&["gamma"], &["data"]),
        ];
        let scored = score_entries("data", &entries);
        let scores: Vec<u32> = scored.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        let ranked = rank_fallback("data", &entries);
        assert_eq!(ranked, vec!["data migration", "alpha", "beta"]);
    }

    #[test]
    fn zero_scores_are_dropped() {
        let entries = vec![mk_entry(&["erp"], &["erp"]), mk_entry(&["widgets"], &[])];
        assert_eq!(rank_fallback("quantum widgets", &entries), vec!["widgets"]);
        assert!(rank_fallback("xyz123 quantum", &entries).is_empty());
    }

    #[test]
    fn blank_first_trigger_is_never_suggested() {
        let entries = vec![mk_entry(&[" ", "support plans"], &[])];
        assert_eq!(score_entries("support", &entries)[0].score, 1);
        assert!(rank_fallback("support", &entries).is_empty());
    }

    #[test]
    fn empty_base_yields_no_suggestions() {
        assert!(rank_fallback("anything at all", &[]).is_empty());
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let entries = vec![mk_entry(&["licensing"], &["Licences"])];
        let scored = score_entries("licences", &entries);
        assert_eq!(scored[0].score, 2);
    }
}
