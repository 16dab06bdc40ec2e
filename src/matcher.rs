use crate::model::{KnowledgeEntry, MatchResult, MatchTier};
use crate::normalize::normalize;

/// Two-tier, precedence-ordered scan over the knowledge base.
///
/// Tier 1 (exact trigger equality) runs across every entry before tier 2
/// (substring inclusion) is attempted, so an exact hit late in the store always
/// outranks a containment hit earlier in it. `query` must already be normalized.
pub fn match_knowledge_base<'a>(
    query: &str,
    entries: &'a [KnowledgeEntry],
) -> Option<MatchResult<'a>> {
    find_exact(query, entries)
        .map(|entry| hit(entry, MatchTier::Exact))
        .or_else(|| find_contained(query, entries).map(|entry| hit(entry, MatchTier::Substring)))
}

fn hit(entry: &KnowledgeEntry, tier: MatchTier) -> MatchResult<'_> {
    MatchResult {
        entry,
        tier,
        confidence: tier.confidence(),
    }
}

fn find_exact<'a>(query: &str, entries: &'a [KnowledgeEntry]) -> Option<&'a KnowledgeEntry> {
    entries
        .iter()
        .find(|entry| {
            entry.triggers.iter().any(|t| {
                let trigger = normalize(t);
                !trigger.is_empty() && trigger == query
            })
        })
}

fn find_contained<'a>(query: &str, entries: &'a [KnowledgeEntry]) -> Option<&'a KnowledgeEntry> {
    entries.iter().find(|entry| {
        entry.triggers.iter().any(|t| {
            let trigger = normalize(t);
            // An empty needle is contained in everything.
            !trigger.is_empty() && query.contains(&trigger)
        })
    })
}
