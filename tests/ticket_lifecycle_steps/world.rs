//! World state for ticket lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use qualidesk::audit::adapters::InMemoryAuditSink;
use qualidesk::notify::{TicketEventKind, TicketNotifier, TicketSubscription};
use qualidesk::ticket::{
    adapters::memory::InMemoryTicketRepository,
    domain::{Ticket, TicketId, WorkOrderId},
    services::{TicketLifecycleService, TicketServiceError},
};
use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;

pub type TestLifecycleService = TicketLifecycleService<InMemoryTicketRepository, DefaultClock>;

/// World state for ticket lifecycle scenarios.
pub struct LifecycleWorld {
    pub repository: Arc<InMemoryTicketRepository>,
    pub service: TestLifecycleService,
    pub work_orders: HashMap<String, WorkOrderId>,
    pub events: TicketSubscription,
    pub seen_events: Vec<TicketEventKind>,
    pub current: Option<Ticket>,
    pub last_error: Option<TicketServiceError>,
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        let repository = Arc::new(InMemoryTicketRepository::new());
        let notifier = TicketNotifier::default();
        let events = notifier.subscribe();
        let service = TicketLifecycleService::new(
            Arc::clone(&repository),
            Arc::new(DefaultClock),
            notifier,
            Arc::new(InMemoryAuditSink::new()),
        );
        Self {
            repository,
            service,
            work_orders: HashMap::new(),
            events,
            seen_events: Vec::new(),
            current: None,
            last_error: None,
        }
    }
}

impl LifecycleWorld {
    /// Returns the id of the ticket under test.
    pub fn current_id(&self) -> Result<TicketId, eyre::Report> {
        self.current
            .as_ref()
            .map(Ticket::id)
            .ok_or_else(|| eyre!("no ticket in scenario world"))
    }

    /// Resolves a seeded work order by number.
    pub fn work_order(&self, number: &str) -> Result<WorkOrderId, eyre::Report> {
        self.work_orders
            .get(number)
            .copied()
            .ok_or_else(|| eyre!("work order {number} was not seeded"))
    }

    /// Records the outcome of a service call.
    pub fn record(&mut self, result: Result<Ticket, TicketServiceError>) {
        match result {
            Ok(ticket) => {
                self.current = Some(ticket);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }

    /// Moves every published event kind into `seen_events`.
    pub fn drain_events(&mut self) {
        while let Some(Ok(event)) = self.events.try_recv() {
            self.seen_events.push(event.kind());
        }
    }
}

#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
