use std::collections::HashSet;

use tabula_domain::AuditLogEntry;
use uuid::Uuid;

/// Client-side view of the audit trail that merges the initial page with
/// change-feed echoes.
///
/// Delivery is at least once and may race with the initiating client's own
/// optimistic insert, so entries are keyed by id and applied once.
#[derive(Debug, Clone, Default)]
pub struct AuditFeed {
    entries: Vec<AuditLogEntry>,
    seen: HashSet<Uuid>,
}

impl AuditFeed {
    /// Starts a feed from an already loaded page.
    #[must_use]
    pub fn from_page(entries: Vec<AuditLogEntry>) -> Self {
        let mut feed = Self::default();
        for entry in entries {
            feed.apply(entry);
        }
        feed
    }

    /// Applies an entry. Returns `false` when the entry was already present.
    pub fn apply(&mut self, entry: AuditLogEntry) -> bool {
        if !self.seen.insert(entry.id()) {
            return false;
        }

        let position = self
            .entries
            .iter()
            .position(|existing| existing.performed_at() < entry.performed_at())
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
        true
    }

    /// Returns entries newest first.
    #[must_use]
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    /// Returns the number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the feed holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
