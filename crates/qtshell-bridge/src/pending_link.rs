// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Single-slot hand-off of the last deep link to the embedded UI.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Holds at most one deep link until the UI takes it.
///
/// A newer link replaces an unconsumed one; there is no queue. `take` reads
/// and clears under one lock, so each link is delivered at most once even
/// if the OS-callback thread and the UI thread differ.
#[derive(Debug, Default)]
pub struct PendingLinkSlot {
    link: Mutex<Option<String>>,
}

impl PendingLinkSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `uri`, returning the unconsumed link it replaced.
    pub fn offer(&self, uri: impl Into<String>) -> Option<String> {
        let replaced = self.lock().replace(uri.into());
        if replaced.is_some() {
            tracing::debug!("pending deep link replaced before it was consumed");
        }
        replaced
    }

    /// Return the pending link and clear the slot.
    pub fn take(&self) -> Option<String> {
        self.lock().take()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        // A poisoned lock still guards a whole Option.
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn empty_at_start() {
        let slot = PendingLinkSlot::new();
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn second_take_is_none() {
        let slot = PendingLinkSlot::new();
        slot.offer("https://example.com/x");
        assert!(slot.is_pending());
        assert_eq!(slot.take().as_deref(), Some("https://example.com/x"));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn newer_link_overwrites() {
        let slot = PendingLinkSlot::new();
        assert_eq!(slot.offer("app://first"), None);
        assert_eq!(slot.offer("app://second").as_deref(), Some("app://first"));
        assert_eq!(slot.take().as_deref(), Some("app://second"));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn concurrent_takers_get_one_delivery() {
        let slot = Arc::new(PendingLinkSlot::new());
        slot.offer("app://once");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || slot.take())
            })
            .collect();

        let delivered = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();
        assert_eq!(delivered, 1);
    }
}
