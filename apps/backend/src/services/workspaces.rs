//! One workspace per signed-in owner.
//!
//! Each workspace sits behind its own async mutex so requests for the same
//! owner run one at a time. A sign-out published on [`SessionEvents`] flips
//! the workspace's teardown flag and drops it from the registry; requests
//! still holding it see `CoreError::Discarded` on their next remote result.
//! Owners who never sign out are evicted by [`WorkspaceRegistry::sweep_idle`].

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;
use vocab_core::{
    EventSubscription, Session, SessionChange, SessionEvents, Teardown, VocabularyWorkspace,
};

type SharedWorkspace = Arc<AsyncMutex<VocabularyWorkspace>>;

struct Entry {
    workspace: SharedWorkspace,
    teardown: Teardown,
    last_used: Instant,
}

impl Entry {
    fn is_idle(&self, max_idle: Duration) -> bool {
        // A locked workspace is serving a request.
        self.last_used.elapsed() >= max_idle && self.workspace.try_lock().is_ok()
    }

    fn tear_down(self, user_id: Uuid) {
        self.teardown.trigger();
        // Busy workspaces are dropped by their last holder.
        if let Ok(mut workspace) = self.workspace.try_lock() {
            workspace.tear_down();
        }
        tracing::info!(owner = %user_id, "workspace torn down");
    }
}

type Entries = Arc<Mutex<HashMap<Uuid, Entry>>>;

pub struct WorkspaceRegistry {
    entries: Entries,
    events: SessionEvents,
    _subscription: EventSubscription,
}

impl WorkspaceRegistry {
    /// Create a registry that tears workspaces down on sign-out.
    pub fn new(events: &SessionEvents) -> Self {
        let entries: Entries = Arc::default();
        let watched = entries.clone();
        let subscription = events.subscribe(move |change| {
            if let SessionChange::SignedOut { user_id } = change {
                discard(&watched, *user_id);
            }
        });

        Self {
            entries,
            events: events.clone(),
            _subscription: subscription,
        }
    }

    /// Lock the owner's workspace, creating it on first use. The stored
    /// session is refreshed with `session`'s token.
    pub async fn acquire(&self, session: &Session) -> OwnedMutexGuard<VocabularyWorkspace> {
        let workspace = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(session.user_id).or_insert_with(|| {
                tracing::info!(owner = %session.user_id, "creating workspace");
                let teardown = Teardown::default();
                Entry {
                    workspace: Arc::new(AsyncMutex::new(VocabularyWorkspace::new(
                        session.clone(),
                        teardown.clone(),
                    ))),
                    teardown,
                    last_used: Instant::now(),
                }
            });
            entry.last_used = Instant::now();
            entry.workspace.clone()
        };

        let mut guard = workspace.lock_owned().await;
        guard.refresh_session(session.clone());
        guard
    }

    /// Tear down and forget the owner's workspace. Returns whether one existed.
    pub fn remove(&self, user_id: Uuid) -> bool {
        discard(&self.entries, user_id)
    }

    /// Tear down every workspace unused for at least `max_idle` and forget
    /// its owner's session token. Returns how many were evicted.
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let evicted: Vec<(Uuid, Entry)> = {
            let mut entries = self.entries.lock();
            let idle: Vec<Uuid> = entries
                .iter()
                .filter(|(_, entry)| entry.is_idle(max_idle))
                .map(|(user_id, _)| *user_id)
                .collect();
            idle.into_iter()
                .filter_map(|user_id| entries.remove(&user_id).map(|entry| (user_id, entry)))
                .collect()
        };

        let count = evicted.len();
        for (user_id, entry) in evicted {
            entry.tear_down(user_id);
            // The entry is already gone, so our own sign-out handler is a no-op.
            self.events.publish(user_id, None);
        }
        if count > 0 {
            tracing::info!(count, "evicted idle workspaces");
        }
        count
    }

    /// Run [`sweep_idle`](Self::sweep_idle) periodically until the registry
    /// is dropped.
    pub fn spawn_idle_sweep(registry: &Arc<Self>, max_idle: Duration) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(registry);
        let period = (max_idle / 4).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                registry.sweep_idle(max_idle);
            }
        })
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.entries.lock().contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn discard(entries: &Entries, user_id: Uuid) -> bool {
    let Some(entry) = entries.lock().remove(&user_id) else {
        return false;
    };

    entry.tear_down(user_id);
    true
}
