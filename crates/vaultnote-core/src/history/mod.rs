//! Per-note, per-branch commit history.
//!
//! [`VersionStore`] owns the mapping of note id to [`NoteHistory`] and keeps
//! it under [`HISTORY_KEY`] in a durable [`KeyValueStore`]. Loading and
//! persisting are explicit. Every public operation loads first, so two
//! stores over the same backend observe each other's writes; the last
//! writer wins.
//!
//! History is auxiliary data. Malformed or unreadable state is logged and
//! treated as empty, and none of the history operations fail.

pub mod diff;
pub mod message;
pub mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::storage::KeyValueStore;

pub use diff::{diff_words, has_differences, DiffKind, DiffSpan};
pub use message::{auto_message, detect_title, format_commit_time};
pub use types::{BranchSummary, Commit, CommitView, NoteHistory, RetentionPolicy, DEFAULT_BRANCH};

/// Durable store key holding the whole note-id to history mapping.
pub const HISTORY_KEY: &str = "vaultnote-version-history";

const HASH_LENGTH: usize = 7;

pub struct VersionStore {
    store: Arc<dyn KeyValueStore>,
    retention: RetentionPolicy,
    notes: BTreeMap<String, NoteHistory>,
    // entries that failed to parse; written back untouched on persist
    unreadable: serde_json::Map<String, serde_json::Value>,
}

impl VersionStore {
    /// Open the history kept in `store` and load it.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let mut versions = Self {
            store,
            retention: RetentionPolicy::default(),
            notes: BTreeMap::new(),
            unreadable: serde_json::Map::new(),
        };
        versions.load();
        versions
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Replace the in-memory mapping with the persisted one.
    ///
    /// Missing, unreadable or non-object data loads as empty. Individual
    /// notes that do not parse are skipped with a warning.
    pub fn load(&mut self) {
        self.notes.clear();
        self.unreadable.clear();

        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read version history");
                return;
            }
        };

        let entries = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Object(entries)) => entries,
            Ok(_) => {
                tracing::warn!("Version history is not an object; starting empty");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Version history is not valid JSON; starting empty");
                return;
            }
        };

        for (note_id, value) in entries {
            match serde_json::from_value::<NoteHistory>(value.clone()) {
                Ok(history) => {
                    self.notes.insert(note_id, history);
                }
                Err(e) => {
                    tracing::warn!(note_id = %note_id, error = %e, "Skipping unreadable note history");
                    self.unreadable.insert(note_id, value);
                }
            }
        }
    }

    /// Write the in-memory mapping back to the store.
    pub fn persist(&self) -> Result<()> {
        let mut entries = self.unreadable.clone();
        for (note_id, history) in &self.notes {
            entries.insert(note_id.clone(), serde_json::to_value(history)?);
        }
        let raw = serde_json::to_string(&serde_json::Value::Object(entries))?;
        self.store.set(HISTORY_KEY, &raw)
    }

    /// The loaded history of `note_id`, without reloading.
    pub fn history(&self, note_id: &str) -> Option<&NoteHistory> {
        self.notes.get(note_id)
    }

    /// Ids of all loaded notes.
    pub fn note_ids(&self) -> impl Iterator<Item = &str> {
        self.notes.keys().map(String::as_str)
    }

    /// Record `content` as a new commit on the note's current branch.
    ///
    /// Returns the new HEAD hash, or `None` when `note_id` or `content` is
    /// empty. Content identical to the branch's latest commit is not
    /// recorded again; that commit's hash is returned instead. Without a
    /// `message`, one is generated from the first line of `content`.
    pub fn save_version(
        &mut self,
        note_id: &str,
        content: &str,
        message: Option<&str>,
    ) -> Option<String> {
        if note_id.is_empty() || content.is_empty() {
            return None;
        }
        self.load();

        let retention = self.retention;
        let history = self.notes.entry(note_id.to_string()).or_default();
        if history.current_branch.is_empty() {
            history.current_branch = DEFAULT_BRANCH.to_string();
        }
        let branch_name = history.current_branch.clone();

        if let Some(last) = history.branch(&branch_name).and_then(|commits| commits.last()) {
            if last.content == content && !last.hash.is_empty() {
                tracing::debug!(note_id, hash = %last.hash, "Content unchanged; not committing");
                return Some(last.hash.clone());
            }
        }

        let now = Utc::now();
        let hash = unique_hash(history);
        let message = match message {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => auto_message(content, &now.with_timezone(&Local)),
        };
        let commit = Commit {
            hash: hash.clone(),
            content: content.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            message,
            parent: history.head.clone(),
        };

        history.branch_mut(&branch_name).push(commit);
        history.head = Some(hash.clone());
        history.apply_retention(&retention);

        tracing::debug!(note_id, branch = %branch_name, hash = %hash, "Commit saved");
        self.persist_or_warn();
        Some(hash)
    }

    /// Commits on the note's current branch, newest first.
    ///
    /// Reloads from the store. Unknown notes, empty branches and malformed
    /// state all yield an empty list.
    pub fn get_versions(&mut self, note_id: &str) -> Vec<CommitView> {
        self.load();

        let Some(history) = self.notes.get(note_id) else {
            return Vec::new();
        };
        if history.current_branch.is_empty() {
            return Vec::new();
        }
        let Some(commits) = history.branch(&history.current_branch) else {
            return Vec::new();
        };

        let head = history.head.as_deref();
        commits
            .iter()
            .rev()
            .map(|commit| commit_view(commit, head))
            .collect()
    }

    /// Fork a new branch at the current HEAD and switch to it.
    ///
    /// Returns `false` without changing anything if the note has no
    /// history, `branch_name` is empty or the default branch, the branch
    /// already exists, or HEAD does not resolve to a commit.
    pub fn create_branch(&mut self, note_id: &str, branch_name: &str) -> bool {
        self.load();

        let Some(history) = self.notes.get_mut(note_id) else {
            return false;
        };
        if branch_name.trim().is_empty()
            || branch_name == DEFAULT_BRANCH
            || history.branches.contains_key(branch_name)
        {
            return false;
        }
        let Some(head_commit) = history
            .head
            .as_deref()
            .and_then(|head| history.find(head))
            .cloned()
        else {
            return false;
        };

        history
            .branches
            .insert(branch_name.to_string(), vec![head_commit]);
        history.current_branch = branch_name.to_string();

        tracing::debug!(note_id, branch = branch_name, "Branch created");
        self.persist_or_warn();
        true
    }

    /// Make `branch_name` current and move HEAD to its latest commit.
    ///
    /// Returns that commit, or `None` without changing anything if the note
    /// has no history or the branch is unknown or empty.
    pub fn switch_branch(&mut self, note_id: &str, branch_name: &str) -> Option<Commit> {
        self.load();

        let history = self.notes.get_mut(note_id)?;
        let latest = history.branch(branch_name)?.last()?.clone();

        history.current_branch = branch_name.to_string();
        history.head = Some(latest.hash.clone());

        tracing::debug!(note_id, branch = branch_name, hash = %latest.hash, "Switched branch");
        self.persist_or_warn();
        Some(latest)
    }

    /// Look up a commit of `note_id` on any branch.
    pub fn find_commit(&mut self, note_id: &str, hash: &str) -> Option<Commit> {
        self.load();
        self.notes.get(note_id)?.find(hash).cloned()
    }

    /// The commit HEAD points at, on any branch.
    pub fn head_commit(&mut self, note_id: &str) -> Option<Commit> {
        self.load();
        let history = self.notes.get(note_id)?;
        history.find(history.head.as_deref()?).cloned()
    }

    /// The note's current branch, `None` if the note has no history.
    pub fn current_branch(&mut self, note_id: &str) -> Option<String> {
        self.load();
        let history = self.notes.get(note_id)?;
        if history.current_branch.is_empty() {
            Some(DEFAULT_BRANCH.to_string())
        } else {
            Some(history.current_branch.clone())
        }
    }

    /// Every branch of the note, default branch first.
    pub fn branches(&mut self, note_id: &str) -> Vec<BranchSummary> {
        self.load();
        let Some(history) = self.notes.get(note_id) else {
            return Vec::new();
        };

        let current = if history.current_branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            history.current_branch.as_str()
        };
        std::iter::once((DEFAULT_BRANCH, &history.master))
            .chain(
                history
                    .branches
                    .iter()
                    .map(|(name, commits)| (name.as_str(), commits)),
            )
            .map(|(name, commits)| BranchSummary {
                name: name.to_string(),
                commits: commits.len(),
                is_current: name == current,
            })
            .collect()
    }

    /// Drop the history of every note, including unreadable entries.
    pub fn clear_all(&mut self) -> Result<()> {
        self.notes.clear();
        self.unreadable.clear();
        self.store.remove(HISTORY_KEY)?;
        tracing::debug!("Version history cleared");
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "Failed to persist version history");
        }
    }
}

impl std::fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore")
            .field("retention", &self.retention)
            .field("notes", &self.notes.len())
            .field("unreadable", &self.unreadable.len())
            .finish_non_exhaustive()
    }
}

fn commit_view(commit: &Commit, head: Option<&str>) -> CommitView {
    let hash = if commit.hash.is_empty() {
        "unknown".to_string()
    } else {
        commit.hash.clone()
    };
    let timestamp = if commit.timestamp.is_empty() {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    } else {
        commit.timestamp.clone()
    };
    let message = if commit.message.is_empty() {
        "Untitled change".to_string()
    } else {
        commit.message.clone()
    };

    CommitView {
        id: hash.clone(),
        is_current: !commit.hash.is_empty() && head == Some(commit.hash.as_str()),
        hash,
        content: commit.content.clone(),
        timestamp,
        message,
    }
}

/// Seven lowercase alphanumerics, not already used in `history`.
fn unique_hash(history: &NoteHistory) -> String {
    loop {
        let simple = Uuid::new_v4().simple().to_string();
        let candidate = simple[..HASH_LENGTH].to_string();
        if !history.contains_hash(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn open() -> (Arc<MemoryStore>, VersionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = VersionStore::open(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_first_commit_has_no_parent() {
        let (_, mut store) = open();
        let hash = store.save_version("n1", "Hello", Some("init")).unwrap();

        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

        let commit = store.find_commit("n1", &hash).unwrap();
        assert_eq!(commit.parent, None);
        assert_eq!(commit.message, "init");
        assert!(commit.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_head_commit_follows_checkout() {
        let (_, mut store) = open();
        assert_eq!(store.head_commit("n1"), None);

        let first = store.save_version("n1", "one", None).unwrap();
        let second = store.save_version("n1", "two", None).unwrap();
        assert_eq!(store.head_commit("n1").unwrap().hash, second);

        assert!(store.create_branch("n1", "draft"));
        store.save_version("n1", "three", None).unwrap();
        store.switch_branch("n1", DEFAULT_BRANCH).unwrap();
        let head = store.head_commit("n1").unwrap();
        assert_eq!(head.hash, second);
        assert_eq!(head.parent.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_empty_inputs_are_not_committed() {
        let (backend, mut store) = open();
        assert_eq!(store.save_version("", "content", None), None);
        assert_eq!(store.save_version("n1", "", None), None);
        assert!(backend.get(HISTORY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_content_returns_existing_hash() {
        let (_, mut store) = open();
        let first = store.save_version("n1", "same content", None).unwrap();
        let second = store.save_version("n1", "same content", None).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get_versions("n1").len(), 1);
    }

    #[test]
    fn test_scenario_two_commits() {
        let (_, mut store) = open();
        let h1 = store.save_version("N1", "Hello", Some("init")).unwrap();
        let h2 = store.save_version("N1", "Hello world", None).unwrap();

        let versions = store.get_versions("N1");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].hash, h2);
        assert!(versions[0].is_current);
        assert_eq!(versions[1].hash, h1);
        assert!(!versions[1].is_current);
        assert!(versions[0]
            .message
            .starts_with("Update note \"Hello world\" - "));

        let second = store.find_commit("N1", &h2).unwrap();
        assert_eq!(second.parent.as_deref(), Some(h1.as_str()));
    }

    #[test]
    fn test_default_branch_retention() {
        let (_, mut store) = open();
        let mut hashes = Vec::new();
        for i in 0..105 {
            hashes.push(store.save_version("n1", &format!("v{}", i), None).unwrap());
        }

        let versions = store.get_versions("n1");
        assert_eq!(versions.len(), 100);
        let expected: Vec<_> = hashes.iter().rev().take(100).cloned().collect();
        let actual: Vec<_> = versions.into_iter().map(|v| v.hash).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_custom_retention() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = VersionStore::open(backend).with_retention(RetentionPolicy {
            default_branch_limit: 3,
            branch_limit: 2,
        });
        for i in 0..5 {
            store.save_version("n1", &format!("v{}", i), None);
        }
        assert_eq!(store.get_versions("n1").len(), 3);

        assert!(store.create_branch("n1", "feature"));
        for i in 0..5 {
            store.save_version("n1", &format!("f{}", i), None);
        }
        assert_eq!(store.get_versions("n1").len(), 2);
    }

    #[test]
    fn test_branch_isolation_and_switch_back() {
        let (_, mut store) = open();
        store.save_version("n1", "base", None).unwrap();
        let master_head = store.save_version("n1", "base 2", None).unwrap();

        assert!(store.create_branch("n1", "feature"));
        assert_eq!(store.current_branch("n1").as_deref(), Some("feature"));

        let seeded = store.get_versions("n1");
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].hash, master_head);

        let feature_head = store.save_version("n1", "experiment", None).unwrap();
        let feature_commit = store.find_commit("n1", &feature_head).unwrap();
        assert_eq!(feature_commit.parent.as_deref(), Some(master_head.as_str()));

        let restored = store.switch_branch("n1", DEFAULT_BRANCH).unwrap();
        assert_eq!(restored.hash, master_head);

        let master = store.get_versions("n1");
        assert_eq!(master.len(), 2);
        assert!(master.iter().all(|v| v.hash != feature_head));
        assert!(master[0].is_current);
    }

    #[test]
    fn test_create_branch_rejections() {
        let (_, mut store) = open();
        assert!(!store.create_branch("missing", "feature"));

        store.save_version("n1", "base", None).unwrap();
        assert!(!store.create_branch("n1", DEFAULT_BRANCH));
        assert!(!store.create_branch("n1", ""));
        assert!(store.create_branch("n1", "feature"));
        assert!(!store.create_branch("n1", "feature"));
    }

    #[test]
    fn test_switch_branch_rejections_leave_state() {
        let (_, mut store) = open();
        assert!(store.switch_branch("missing", DEFAULT_BRANCH).is_none());

        store.save_version("n1", "base", None).unwrap();
        assert!(store.switch_branch("n1", "nope").is_none());
        assert_eq!(store.current_branch("n1").as_deref(), Some(DEFAULT_BRANCH));
    }

    #[test]
    fn test_branches_listing() {
        let (_, mut store) = open();
        assert!(store.branches("n1").is_empty());

        store.save_version("n1", "base", None).unwrap();
        store.create_branch("n1", "feature");

        let branches = store.branches("n1");
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].name, DEFAULT_BRANCH);
        assert!(!branches[0].is_current);
        assert_eq!(branches[1].name, "feature");
        assert!(branches[1].is_current);
        assert_eq!(branches[1].commits, 1);
    }

    #[test]
    fn test_get_versions_never_fails() {
        let (backend, mut store) = open();
        assert!(store.get_versions("nothing").is_empty());

        backend.set(HISTORY_KEY, "not json at all").unwrap();
        assert!(store.get_versions("n1").is_empty());

        backend.set(HISTORY_KEY, "[1,2,3]").unwrap();
        assert!(store.get_versions("n1").is_empty());

        backend
            .set(HISTORY_KEY, r#"{"n1":{"master":[{"content":"x"}]}}"#)
            .unwrap();
        // no currentBranch recorded
        assert!(store.get_versions("n1").is_empty());
    }

    #[test]
    fn test_view_defaults_for_sparse_commits() {
        let (backend, mut store) = open();
        backend
            .set(
                HISTORY_KEY,
                r#"{"n1":{"master":[{"content":"x"}],"currentBranch":"master","HEAD":null}}"#,
            )
            .unwrap();

        let versions = store.get_versions("n1");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].hash, "unknown");
        assert_eq!(versions[0].message, "Untitled change");
        assert!(!versions[0].timestamp.is_empty());
        assert!(!versions[0].is_current);
    }

    #[test]
    fn test_unreadable_notes_survive_writes() {
        let (backend, mut store) = open();
        backend
            .set(HISTORY_KEY, r#"{"broken":{"master":"nope"}}"#)
            .unwrap();

        store.save_version("n1", "fresh", None).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&backend.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["broken"]["master"], "nope");
        assert!(raw["n1"].is_object());
    }

    #[test]
    fn test_two_stores_share_backend() {
        let backend = Arc::new(MemoryStore::new());
        let mut writer = VersionStore::open(backend.clone());
        let mut reader = VersionStore::open(backend);

        let hash = writer.save_version("n1", "shared", None).unwrap();
        let versions = reader.get_versions("n1");
        assert_eq!(versions[0].hash, hash);
    }

    #[test]
    fn test_clear_all() {
        let (backend, mut store) = open();
        store.save_version("n1", "a", None).unwrap();
        store.clear_all().unwrap();

        assert!(backend.get(HISTORY_KEY).unwrap().is_none());
        assert!(store.get_versions("n1").is_empty());
        assert_eq!(store.note_ids().count(), 0);
    }
}
