use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::errors::EnlargeError;

/// Registry of identifiers that synthetic tables may no longer take.
///
/// Matching is ASCII case-insensitive because SQLite resolves table names
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct UsedNames {
    names: HashSet<String>,
}

impl UsedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// Register `name`; returns false when it was already taken.
    pub fn claim(&mut self, name: &str) -> bool {
        self.names.insert(name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One-shot allocator over a ranked candidate word list.
///
/// Words are used exactly as given (only an empty word is rejected outright)
/// and consumed strictly front to back; a rejected word is dropped, an
/// accepted word is claimed in the [`UsedNames`] registry before it is
/// returned. Nothing is ever handed out twice.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    db_id: String,
    candidates: VecDeque<String>,
    allocated: usize,
}

impl NameAllocator {
    pub fn new(db_id: impl Into<String>, candidates: impl IntoIterator<Item = String>) -> Self {
        Self {
            db_id: db_id.into(),
            candidates: candidates.into_iter().collect(),
            allocated: 0,
        }
    }

    /// Pop candidates until one is free and claim it.
    pub fn next_fresh_name(&mut self, used: &mut UsedNames) -> Result<String, EnlargeError> {
        while let Some(word) = self.candidates.pop_front() {
            if word.is_empty() || used.contains(&word) {
                debug!(db_id = %self.db_id, word = %word, "candidate rejected");
                continue;
            }
            used.claim(&word);
            self.allocated += 1;
            return Ok(word);
        }

        Err(EnlargeError::ExhaustedCandidates {
            db_id: self.db_id.clone(),
            allocated: self.allocated,
        })
    }

    /// Candidates not yet consumed.
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }

    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
