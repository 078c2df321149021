//! Allow/deny filtering of categories.
//!
//! A non-empty allow list is exclusive: anything not listed is rejected, and
//! the deny list is not consulted. Only without an allow list does the deny
//! list take effect.

use std::collections::BTreeSet;

/// Borrowed view over an allow list and a deny list.
#[derive(Debug, Clone, Copy)]
pub struct FilterPolicy<'a> {
    allow: &'a BTreeSet<String>,
    deny: &'a BTreeSet<String>,
}

impl<'a> FilterPolicy<'a> {
    pub fn new(allow: &'a BTreeSet<String>, deny: &'a BTreeSet<String>) -> Self {
        Self { allow, deny }
    }

    /// Decides whether `category` takes part in tracking.
    pub fn accepts(&self, category: &str) -> bool {
        if !self.allow.is_empty() {
            return self.allow.contains(category);
        }
        !self.deny.contains(category)
    }
}
