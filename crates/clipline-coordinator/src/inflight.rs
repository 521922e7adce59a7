use clipline_core::{ClientId, ConnectionHandle, Pid};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Outcome of registering interest in a pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// No crawl was in flight; the caller must delegate one.
    Leader,
    /// A crawl is already in flight; the caller was attached as a
    /// subscriber and must not delegate.
    Joined,
}

#[derive(Debug)]
struct InFlight {
    subscribers: Vec<ConnectionHandle>,
}

/// Table of delegated crawls, keyed by pid.
///
/// At most one entry exists per pid at any instant; all concurrent
/// requesters for the same pid share it. `register` performs the
/// check-and-insert through a single map entry so no suspension point can
/// interleave between "check" and "insert" — this is what upholds the
/// at-most-one-crawl-per-pid invariant.
#[derive(Debug, Default)]
pub struct InFlightTable {
    entries: DashMap<Pid, InFlight>,
}

impl InFlightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for `pid`, creating the entry if absent.
    ///
    /// Re-registering the same client for the same pid is idempotent.
    pub fn register(&self, pid: Pid, subscriber: ConnectionHandle) -> Registration {
        match self.entries.entry(pid) {
            Entry::Occupied(mut entry) => {
                let subscribers = &mut entry.get_mut().subscribers;
                if !subscribers
                    .iter()
                    .any(|s| s.client_id() == subscriber.client_id())
                {
                    subscribers.push(subscriber);
                }
                Registration::Joined
            }
            Entry::Vacant(entry) => {
                entry.insert(InFlight {
                    subscribers: vec![subscriber],
                });
                Registration::Leader
            }
        }
    }

    /// Removes the entry for `pid`, returning its subscribers.
    pub fn remove(&self, pid: &Pid) -> Vec<ConnectionHandle> {
        self.entries
            .remove(pid)
            .map(|(_, entry)| entry.subscribers)
            .unwrap_or_default()
    }

    /// Strips a disconnected client from every subscriber set. The crawls
    /// themselves are left running; other subscribers and future cache
    /// reads still benefit from their results.
    pub fn forget(&self, client_id: &ClientId) {
        for mut entry in self.entries.iter_mut() {
            entry.subscribers.retain(|s| s.client_id() != client_id);
        }
    }

    pub fn contains(&self, pid: &Pid) -> bool {
        self.entries.contains_key(pid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
