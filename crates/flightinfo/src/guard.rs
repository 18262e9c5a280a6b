//! Stale-response guard.
//!
//! When the same key is queried again before an earlier query settles, the
//! earlier result must not overwrite the newer one. Every query takes a
//! [`QueryTicket`] from a [`QueryBoard`] before it starts and hands it back
//! when publishing; only the most recently issued ticket for a key may
//! publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Proof that a query was started, used to publish its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    key: String,
    sequence: u64,
}

impl QueryTicket {
    /// The key this ticket was issued for.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Monotonic sequence number of the ticket.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug)]
struct Slot<T> {
    issued: u64,
    published: Option<(u64, T)>,
}

/// Latest published result per key.
///
/// Shared by reference between concurrent queries; the internal lock is only
/// held for bookkeeping, never across an await.
#[derive(Debug)]
pub struct QueryBoard<T> {
    next_sequence: AtomicU64,
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for QueryBoard<T> {
    fn default() -> Self {
        Self {
            next_sequence: AtomicU64::new(0),
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> QueryBoard<T> {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot<T>>> {
        // The map stays consistent even if a holder panicked.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a query for `key`, superseding any query still in flight.
    pub fn begin(&self, key: &str) -> QueryTicket {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.slots()
            .entry(key.to_string())
            .and_modify(|slot| slot.issued = sequence)
            .or_insert(Slot {
                issued: sequence,
                published: None,
            });

        QueryTicket {
            key: key.to_string(),
            sequence,
        }
    }

    /// Whether `ticket` is still the newest query for its key.
    #[must_use]
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.slots()
            .get(&ticket.key)
            .is_some_and(|slot| slot.issued == ticket.sequence)
    }

    /// Publish a result.
    ///
    /// Returns `false` and drops `value` if a newer query for the same key
    /// was started, or a newer result was already published.
    pub fn publish(&self, ticket: QueryTicket, value: T) -> bool {
        let mut slots = self.slots();
        let Some(slot) = slots.get_mut(&ticket.key) else {
            return false;
        };

        let superseded = slot.issued != ticket.sequence
            || slot
                .published
                .as_ref()
                .is_some_and(|(seq, _)| *seq >= ticket.sequence);
        if superseded {
            debug!(
                key = %ticket.key,
                ticket = ticket.sequence,
                latest = slot.issued,
                "Discarding stale result"
            );
            return false;
        }

        slot.published = Some((ticket.sequence, value));
        true
    }

    /// Number of keys that have been queried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Whether no key has been queried yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}

impl<T: Clone> QueryBoard<T> {
    /// The last published result for `key`.
    #[must_use]
    pub fn latest(&self, key: &str) -> Option<T> {
        self.slots()
            .get(key)
            .and_then(|slot| slot.published.as_ref())
            .map(|(_, value)| value.clone())
    }
}
