//! Shared handler state.

use crate::attachment::{AttachmentService, BlobStore};
use crate::audit::AuditSink;
use crate::auth::IdentityProvider;
use crate::notify::TicketNotifier;
use crate::ticket::{
    ports::TicketRepository,
    services::{TicketLifecycleService, WorkOrderAggregator},
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Services and infrastructure handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Ticket lifecycle operations.
    pub tickets: Arc<TicketLifecycleService<dyn TicketRepository, DefaultClock>>,
    /// Work order roll-ups.
    pub work_orders: Arc<WorkOrderAggregator<dyn TicketRepository>>,
    /// Attachment operations.
    pub attachments: Arc<AttachmentService<dyn TicketRepository, DefaultClock>>,
    /// Change notifier feeding the event stream.
    pub notifier: TicketNotifier,
    /// Bearer credential resolver.
    pub identities: Arc<dyn IdentityProvider>,
}

/// Infrastructure the application state is assembled from.
pub struct AppComponents {
    /// Ticket storage.
    pub repository: Arc<dyn TicketRepository>,
    /// Attachment content storage.
    pub blobs: Arc<dyn BlobStore>,
    /// Bearer credential resolver.
    pub identities: Arc<dyn IdentityProvider>,
    /// Audit destination.
    pub audit: Arc<dyn AuditSink>,
    /// Change notifier.
    pub notifier: TicketNotifier,
}

impl AppState {
    /// Wires the services over the given components.
    #[must_use]
    pub fn new(components: AppComponents) -> Self {
        let AppComponents {
            repository,
            blobs,
            identities,
            audit,
            notifier,
        } = components;
        let clock = Arc::new(DefaultClock);
        Self {
            tickets: Arc::new(TicketLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
                notifier.clone(),
                Arc::clone(&audit),
            )),
            work_orders: Arc::new(WorkOrderAggregator::new(Arc::clone(&repository))),
            attachments: Arc::new(AttachmentService::new(
                repository,
                blobs,
                clock,
                notifier.clone(),
                audit,
            )),
            notifier,
            identities,
        }
    }
}
