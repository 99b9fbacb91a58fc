//! Persisted shapes of the version history and the views handed to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the branch every note starts on.
pub const DEFAULT_BRANCH: &str = "master";

/// One recorded snapshot of a note body.
///
/// Every field defaults when missing so histories written by older
/// releases still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub hash: String,
    /// The note body as stored at commit time (usually an envelope).
    #[serde(default)]
    pub content: String,
    /// ISO-8601 UTC with millisecond precision.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
    /// HEAD at the time this commit was made.
    #[serde(default)]
    pub parent: Option<String>,
}

/// All branches of one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteHistory {
    #[serde(default)]
    pub master: Vec<Commit>,
    #[serde(default)]
    pub branches: BTreeMap<String, Vec<Commit>>,
    #[serde(rename = "currentBranch", default)]
    pub current_branch: String,
    #[serde(rename = "HEAD", default)]
    pub head: Option<String>,
}

impl Default for NoteHistory {
    fn default() -> Self {
        Self {
            master: Vec::new(),
            branches: BTreeMap::new(),
            current_branch: DEFAULT_BRANCH.to_string(),
            head: None,
        }
    }
}

impl NoteHistory {
    /// Commits of `name`, or `None` for an unknown named branch.
    pub fn branch(&self, name: &str) -> Option<&Vec<Commit>> {
        if name == DEFAULT_BRANCH {
            Some(&self.master)
        } else {
            self.branches.get(name)
        }
    }

    /// Commits of `name`, creating a named branch if it does not exist.
    pub(crate) fn branch_mut(&mut self, name: &str) -> &mut Vec<Commit> {
        if name == DEFAULT_BRANCH {
            &mut self.master
        } else {
            self.branches.entry(name.to_string()).or_default()
        }
    }

    /// First commit with `hash`, searching the default branch before the
    /// named ones.
    pub fn find(&self, hash: &str) -> Option<&Commit> {
        self.master
            .iter()
            .chain(self.branches.values().flatten())
            .find(|commit| commit.hash == hash)
    }

    pub(crate) fn contains_hash(&self, hash: &str) -> bool {
        self.find(hash).is_some()
    }

    /// Trim every branch to the newest commits allowed by `policy`.
    pub(crate) fn apply_retention(&mut self, policy: &RetentionPolicy) {
        trim_to(&mut self.master, policy.default_branch_limit);
        for commits in self.branches.values_mut() {
            trim_to(commits, policy.branch_limit);
        }
    }
}

fn trim_to(commits: &mut Vec<Commit>, limit: usize) {
    let limit = limit.max(1);
    if commits.len() > limit {
        let excess = commits.len() - limit;
        commits.drain(..excess);
    }
}

/// Per-branch caps on retained commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub default_branch_limit: usize,
    pub branch_limit: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            default_branch_limit: 100,
            branch_limit: 50,
        }
    }
}

/// A commit as returned by `get_versions`, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitView {
    pub id: String,
    pub hash: String,
    pub content: String,
    pub timestamp: String,
    pub message: String,
    pub is_current: bool,
}

/// One row of a note's branch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub name: String,
    pub commits: usize,
    pub is_current: bool,
}
