//! Background persistence of visit events.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::services::StatsService;
use crate::domain::storage::StorageBackend;
use crate::domain::visit_event::VisitEvent;

/// Drains `rx` into `stats` until every sender is dropped.
///
/// Recording is best-effort: a failed write is logged and the event dropped.
pub async fn run_visit_worker<B: StorageBackend>(
    mut rx: mpsc::Receiver<VisitEvent<B::UserId>>,
    stats: Arc<StatsService<B>>,
) {
    while let Some(event) = rx.recv().await {
        match stats
            .record_visit(&event.short_code, &event.headers, &event.owner)
            .await
        {
            Ok(id) => debug!(visit_id = id, code = %event.short_code, "Visit recorded"),
            Err(e) => warn!(
                code = %event.short_code,
                error = %e,
                "Failed to record visit, dropping"
            ),
        }
    }

    info!("Visit worker stopped");
}
