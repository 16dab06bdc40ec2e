use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ResolverError, Result};
use crate::model::KnowledgeEntry;

/// Read-only, ordered view over the knowledge base. Iteration order is match precedence.
pub trait KnowledgeBase {
    fn entries(&self) -> &[KnowledgeEntry];
}

impl<K: KnowledgeBase + ?Sized> KnowledgeBase for &K {
    fn entries(&self) -> &[KnowledgeEntry] {
        (**self).entries()
    }
}

impl<K: KnowledgeBase + ?Sized> KnowledgeBase for std::sync::Arc<K> {
    fn entries(&self) -> &[KnowledgeEntry] {
        (**self).entries()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticKnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl StaticKnowledgeBase {
    /// Build a store, rejecting entries without a usable trigger.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        for (idx, entry) in entries.iter().enumerate() {
            validate_entry(idx + 1, entry)?;
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `.json` (array of entries) or `.jsonl` (one entry per line).
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let entries = match ext {
            "json" => load_entries_json(path)?,
            "jsonl" => load_entries_jsonl(path)?,
            other => {
                return Err(ResolverError::InvalidArg(format!(
                    "unsupported knowledge base format '.{other}' (expected .json or .jsonl)"
                )));
            }
        };
        let store = Self::new(entries)?;
        tracing::debug!(
            path = %path.display(),
            entries = store.len(),
            "loaded knowledge base"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KnowledgeBase for StaticKnowledgeBase {
    fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }
}

fn validate_entry(position: usize, entry: &KnowledgeEntry) -> Result<()> {
    // The first trigger doubles as the suggested question in fallback ranking.
    if entry.first_trigger().is_none_or(|t| t.trim().is_empty()) {
        return Err(ResolverError::InvalidKnowledgeBase {
            entry: position,
            reason: "first trigger must be a non-blank phrase".into(),
        });
    }
    if entry.response.trim().is_empty() {
        return Err(ResolverError::InvalidKnowledgeBase {
            entry: position,
            reason: "response must not be empty".into(),
        });
    }
    Ok(())
}

pub fn load_entries_json(path: &Path) -> Result<Vec<KnowledgeEntry>> {
    let file = File::open(path)?;
    let entries: Vec<KnowledgeEntry> = serde_json::from_reader(BufReader::new(file))?;
    Ok(entries)
}

pub fn load_entries_jsonl(path: &Path) -> Result<Vec<KnowledgeEntry>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mk_entry(trigger: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            triggers: vec![trigger.to_string()],
            response: format!("answer-{trigger}"),
            source: None,
            keywords: Vec::new(),
        }
    }

    #[test]
    fn rejects_entry_without_triggers() {
        let mut bad = mk_entry("x");
        bad.triggers.clear();
        let err = StaticKnowledgeBase::new(vec![mk_entry("ok"), bad]).unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidKnowledgeBase { entry: 2, .. }
        ));
    }

    #[test]
    fn rejects_blank_triggers() {
        let err = StaticKnowledgeBase::new(vec![mk_entry("   ")]).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidKnowledgeBase { .. }));
    }

    #[test]
    fn rejects_blank_first_trigger() {
        let mut bad = mk_entry(" ");
        bad.triggers.push("support plans".into());
        let err = StaticKnowledgeBase::new(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            ResolverError::InvalidKnowledgeBase { entry: 1, .. }
        ));
    }

    #[test]
    fn loads_jsonl_skipping_blank_lines() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("kb.jsonl");
        let mut file = File::create(&path).expect("create");
        writeln!(file, r#"{{"triggers":["hours"],"response":"9 to 5"}}"#).expect("write");
        writeln!(file).expect("write");
        writeln!(
            file,
            r#"{{"triggers":["erp"],"response":"ERP answer","source":"docs","keywords":["erp"]}}"#
        )
        .expect("write");

        let store = StaticKnowledgeBase::load(&path).expect("load");
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[1].source.as_deref(), Some("docs"));
    }

    #[test]
    fn loads_json_array() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("kb.json");
        std::fs::write(
            &path,
            r#"[{"triggers":["a"],"response":"A"},{"triggers":["b"],"response":"B"}]"#,
        )
        .expect("write");

        let store = StaticKnowledgeBase::load(&path).expect("load");
        let triggers: Vec<_> = store
            .entries()
            .iter()
            .filter_map(KnowledgeEntry::first_trigger)
            .collect();
        assert_eq!(triggers, vec!["a", "b"]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = StaticKnowledgeBase::load(Path::new("kb.csv")).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArg(_)));
    }
}
