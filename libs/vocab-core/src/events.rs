//! Session-change notifications and workspace change events.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::entitlement::EntitlementSnapshot;
use crate::flashcard::DrillSnapshot;
use crate::types::Session;

/// A sign-in or sign-out for one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    SignedIn(Session),
    SignedOut { user_id: Uuid },
}

impl SessionChange {
    pub fn user_id(&self) -> Uuid {
        match self {
            Self::SignedIn(session) => session.user_id,
            Self::SignedOut { user_id } => *user_id,
        }
    }
}

type Handler = Arc<dyn Fn(&SessionChange) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
    tokens: HashMap<Uuid, String>,
}

/// Fan-out of session changes to subscribers.
///
/// Handlers fire at most once per actual change: publishing the same token
/// twice, or signing out an owner that is not signed in, is silent.
#[derive(Clone, Default)]
pub struct SessionEvents {
    registry: Arc<Mutex<Registry>>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; it stays registered until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&SessionChange) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, Arc::new(handler)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Record the owner's current session. Returns whether a change was
    /// published.
    pub fn publish(&self, user_id: Uuid, session: Option<Session>) -> bool {
        let (change, handlers) = {
            let mut registry = self.registry.lock();
            let change = match session {
                Some(session) => {
                    if registry.tokens.get(&user_id) == Some(&session.access_token) {
                        return false;
                    }
                    registry.tokens.insert(user_id, session.access_token.clone());
                    SessionChange::SignedIn(session)
                }
                None => {
                    if registry.tokens.remove(&user_id).is_none() {
                        return false;
                    }
                    SessionChange::SignedOut { user_id }
                }
            };
            let handlers: Vec<Handler> = registry.handlers.iter().map(|(_, h)| h.clone()).collect();
            (change, handlers)
        };

        // Handlers run outside the lock so they may publish or subscribe.
        for handler in handlers {
            handler(&change);
        }
        true
    }

    pub fn is_signed_in(&self, user_id: Uuid) -> bool {
        self.registry.lock().tokens.contains_key(&user_id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().handlers.len()
    }
}

/// Handle returned by [`SessionEvents::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().handlers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionChange {
    Loaded,
    Added,
    Removed,
}

/// Changes a workspace reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    CollectionChanged {
        change: CollectionChange,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Uuid>,
        count: usize,
    },
    DrillChanged {
        snapshot: DrillSnapshot,
    },
    LookupResolved {
        word: String,
    },
    LookupFailed {
        message: String,
    },
    EntitlementChanged {
        snapshot: EntitlementSnapshot,
    },
}
