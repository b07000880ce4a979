//! Commit identity record decoded from git metadata

use std::hash::{Hash, Hasher};

use crate::date::Date;

/// Metadata for one commit: content hash, author line, and commit date.
///
/// Equality and hashing delegate to `id` alone. Two differently-annotated
/// views of the same commit (fetched at different times, different author
/// normalization) must collapse to one entity in any set or map keyed by
/// `CommitInfo`.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    id: String,
    author: String,
    date: Date,
}

impl CommitInfo {
    /// Construct from an already-validated lowercase hex id.
    pub fn new(id: String, author: String, date: Date) -> Self {
        Self { id, author, date }
    }

    /// The commit's content hash, lowercase hex.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The author line as printed by git, `Name <email>`.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The commit date.
    pub fn date(&self) -> Date {
        self.date
    }
}

impl PartialEq for CommitInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CommitInfo {}

impl Hash for CommitInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for CommitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.date, self.id, self.author)
    }
}
