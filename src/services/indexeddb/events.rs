// ============================================================================
// EVENTOS DE DIAGNÓSTICO - Canal lateral con cada evento nativo observado
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Tipo de evento nativo de IndexedDB
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEventKind {
    Success,
    Error,
    UpgradeNeeded,
    Blocked,
    Complete,
    Abort,
    Close,
    VersionChange,
}

impl DbEventKind {
    /// Mapear `Event.type` al tipo conocido
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            "upgradeneeded" => Some(Self::UpgradeNeeded),
            "blocked" => Some(Self::Blocked),
            "complete" => Some(Self::Complete),
            "abort" => Some(Self::Abort),
            "close" => Some(Self::Close),
            "versionchange" => Some(Self::VersionChange),
            _ => None,
        }
    }

    pub fn as_event_type(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::UpgradeNeeded => "upgradeneeded",
            Self::Blocked => "blocked",
            Self::Complete => "complete",
            Self::Abort => "abort",
            Self::Close => "close",
            Self::VersionChange => "versionchange",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Abort | Self::Blocked)
    }
}

/// Objeto nativo que disparó el evento
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventSource {
    OpenRequest,
    DeleteRequest,
    Request,
    Transaction,
    Database,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OpenRequest => "open-request",
            Self::DeleteRequest => "delete-request",
            Self::Request => "request",
            Self::Transaction => "transaction",
            Self::Database => "database",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DbEvent {
    pub kind: DbEventKind,
    pub source: EventSource,
    pub database: String,
    pub store: Option<String>,
    pub detail: String,
    pub at: DateTime<Utc>,
}

impl DbEvent {
    pub fn new(kind: DbEventKind, source: EventSource, database: &str) -> Self {
        Self {
            kind,
            source,
            database: database.to_string(),
            store: None,
            detail: String::new(),
            at: Utc::now(),
        }
    }

    pub fn with_store(mut self, store: &str) -> Self {
        self.store = Some(store.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

impl fmt::Display for DbEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ({}",
            self.at.format("%H:%M:%S%.3f"),
            self.source,
            self.kind.as_event_type(),
            self.database
        )?;
        if let Some(store) = &self.store {
            write!(f, "/{}", store)?;
        }
        f.write_str(")")?;
        if !self.detail.is_empty() {
            write!(f, " {}", self.detail)?;
        }
        Ok(())
    }
}

/// Stream de eventos de diagnóstico (nunca completa mientras viva el bus)
pub type EventSubscription = UnboundedReceiver<DbEvent>;

/// Difusión de `DbEvent` a todos los suscriptores vivos
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Rc<RefCell<Vec<UnboundedSender<DbEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    /// Publicar evento; los suscriptores cerrados se descartan
    pub fn publish(&self, event: DbEvent) {
        log::debug!("🛰️ [IDB-EVENT] {}", event);
        self.subscribers
            .borrow_mut()
            .retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn event_types_map_both_ways() {
        for kind in [
            DbEventKind::Success,
            DbEventKind::Error,
            DbEventKind::UpgradeNeeded,
            DbEventKind::Blocked,
            DbEventKind::Complete,
            DbEventKind::Abort,
            DbEventKind::Close,
            DbEventKind::VersionChange,
        ] {
            assert_eq!(DbEventKind::from_event_type(kind.as_event_type()), Some(kind));
        }
        assert_eq!(DbEventKind::from_event_type("click"), None);
    }

    #[test]
    fn failures_are_error_abort_blocked() {
        assert!(DbEventKind::Error.is_failure());
        assert!(DbEventKind::Abort.is_failure());
        assert!(DbEventKind::Blocked.is_failure());
        assert!(!DbEventKind::Complete.is_failure());
    }

    #[test]
    fn every_subscriber_receives_published_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(
            DbEvent::new(DbEventKind::Complete, EventSource::Transaction, "Alerts")
                .with_store("messages"),
        );

        let a = futures::executor::block_on(first.next()).unwrap();
        let b = futures::executor::block_on(second.next()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.store.as_deref(), Some("messages"));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DbEvent::new(DbEventKind::Success, EventSource::OpenRequest, "SampleDb"));
        assert_eq!(bus.subscriber_count(), 1);
        drop(keep);
    }

    #[test]
    fn display_includes_store_and_detail() {
        let event = DbEvent::new(DbEventKind::Error, EventSource::Request, "Customers")
            .with_store("customers")
            .with_detail("ConstraintError");
        let text = event.to_string();
        assert!(text.contains("request error (Customers/customers) ConstraintError"));
    }
}
