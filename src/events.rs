//! Document/editor events and the subscription registry that routes them.
//!
//! Every `subscribe` call returns a `Subscription` handle. Dropping the handle
//! unregisters it, so an owner that keeps its handles in a `Disposables` list
//! releases all of them on disposal, on deletion, or when it is dropped.

use crate::text::{ContentChange, Selection};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use url::Url;

/// Events emitted by the edit, selection and visibility sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    ContentChanged {
        uri: Url,
        change: ContentChange,
    },
    SelectionChanged {
        uri: Url,
        selections: Vec<Selection>,
    },
    ActiveEditorChanged {
        uri: Option<Url>,
    },
    VisibleEditorsChanged {
        uris: Vec<Url>,
    },
}

impl DocumentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DocumentEvent::ContentChanged { .. } => EventKind::ContentChanged,
            DocumentEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
            DocumentEvent::ActiveEditorChanged { .. } => EventKind::ActiveEditorChanged,
            DocumentEvent::VisibleEditorsChanged { .. } => EventKind::VisibleEditorsChanged,
        }
    }

    /// The document this event is scoped to, for per-document events.
    pub fn uri(&self) -> Option<&Url> {
        match self {
            DocumentEvent::ContentChanged { uri, .. }
            | DocumentEvent::SelectionChanged { uri, .. } => Some(uri),
            DocumentEvent::ActiveEditorChanged { .. }
            | DocumentEvent::VisibleEditorsChanged { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ContentChanged,
    SelectionChanged,
    ActiveEditorChanged,
    VisibleEditorsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// What a subscription listens for. `uri: None` matches every document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Interest {
    kind: EventKind,
    uri: Option<Url>,
}

impl Interest {
    fn matches(&self, event: &DocumentEvent) -> bool {
        if self.kind != event.kind() {
            return false;
        }
        match (&self.uri, event.uri()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    entries: HashMap<SubscriptionId, Interest>,
}

/// Shared, single-threaded subscription registry.
///
/// Cloning an `EventBus` yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `kind` events, optionally scoped to one document.
    pub fn subscribe(&self, kind: EventKind, uri: Option<&Url>) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.entries.insert(
            id,
            Interest {
                kind,
                uri: uri.cloned(),
            },
        );

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Resolve the recipients of `event` and package them for dispatch.
    pub fn publish(&self, event: DocumentEvent) -> Delivery {
        let registry = self.registry.borrow();
        let recipients = registry
            .entries
            .iter()
            .filter(|(_, interest)| interest.matches(&event))
            .map(|(id, _)| *id)
            .collect();

        log::trace!(
            target: "scopetrack::events",
            "Publishing {:?} to {} subscribers",
            event.kind(),
            registry.entries.len()
        );

        Delivery { event, recipients }
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.registry.borrow().entries.contains_key(&id)
    }

    /// Number of live subscriptions; a leak shows up as a count that never drops.
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Number of live subscriptions scoped to `uri`.
    pub fn subscriber_count_for(&self, uri: &Url) -> usize {
        self.registry
            .borrow()
            .entries
            .values()
            .filter(|interest| interest.uri.as_ref() == Some(uri))
            .count()
    }
}

/// A published event together with the subscriptions it is addressed to.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub event: DocumentEvent,
    recipients: HashSet<SubscriptionId>,
}

impl Delivery {
    pub fn is_addressed_to(&self, id: SubscriptionId) -> bool {
        self.recipients.contains(&id)
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }
}

/// RAII registration handle. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Bus already gone means there is nothing left to unregister from
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.remove(&self.id);
        }
    }
}

/// An owner's resource list of subscriptions.
#[derive(Debug, Default)]
pub struct Disposables {
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

impl Disposables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        if self.disposed {
            // Late registrations on a torn-down owner are released immediately
            drop(subscription);
            return;
        }
        self.subscriptions.push(subscription);
    }

    /// True if any held subscription is among the delivery's recipients.
    pub fn receives(&self, delivery: &Delivery) -> bool {
        self.subscriptions
            .iter()
            .any(|subscription| delivery.is_addressed_to(subscription.id()))
    }

    /// Release every held subscription. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.subscriptions.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Position;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///test/{}.rs", name)).unwrap()
    }

    fn change_event(name: &str) -> DocumentEvent {
        DocumentEvent::ContentChanged {
            uri: uri(name),
            change: ContentChange::insert(Position::new(0, 0), "x"),
        }
    }

    #[test]
    fn test_publish_routes_by_kind_and_uri() {
        let bus = EventBus::new();
        let a = bus.subscribe(EventKind::ContentChanged, Some(&uri("a")));
        let b = bus.subscribe(EventKind::ContentChanged, Some(&uri("b")));
        let any = bus.subscribe(EventKind::ActiveEditorChanged, None);

        let delivery = bus.publish(change_event("a"));
        assert!(delivery.is_addressed_to(a.id()));
        assert!(!delivery.is_addressed_to(b.id()));
        assert!(!delivery.is_addressed_to(any.id()));

        let delivery = bus.publish(DocumentEvent::ActiveEditorChanged { uri: None });
        assert_eq!(delivery.recipient_count(), 1);
        assert!(delivery.is_addressed_to(any.id()));
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let bus = EventBus::new();
        let subscription = bus.subscribe(EventKind::SelectionChanged, Some(&uri("a")));
        let id = subscription.id();
        assert!(bus.is_subscribed(id));
        assert_eq!(bus.subscriber_count(), 1);

        drop(subscription);
        assert!(!bus.is_subscribed(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_disposables_release_all_and_stay_disposed() {
        let bus = EventBus::new();
        let mut disposables = Disposables::new();
        disposables.push(bus.subscribe(EventKind::ContentChanged, Some(&uri("a"))));
        disposables.push(bus.subscribe(EventKind::SelectionChanged, Some(&uri("a"))));
        assert_eq!(bus.subscriber_count_for(&uri("a")), 2);

        disposables.dispose();
        disposables.dispose();
        assert!(disposables.is_disposed());
        assert_eq!(bus.subscriber_count(), 0);

        disposables.push(bus.subscribe(EventKind::ContentChanged, None));
        assert!(disposables.is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_bus_is_harmless() {
        let bus = EventBus::new();
        let subscription = bus.subscribe(EventKind::ContentChanged, None);
        drop(bus);
        drop(subscription);
    }

    #[test]
    fn test_receives_checks_held_ids() {
        let bus = EventBus::new();
        let mut disposables = Disposables::new();
        disposables.push(bus.subscribe(EventKind::ContentChanged, Some(&uri("a"))));

        assert!(disposables.receives(&bus.publish(change_event("a"))));
        assert!(!disposables.receives(&bus.publish(change_event("b"))));
    }
}
