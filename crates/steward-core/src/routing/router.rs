//! Destination table and the publishing router.

use std::collections::HashMap;
use std::sync::Arc;

use strum::IntoEnumIterator;
use tokio::sync::RwLock;

use crate::routing::LogCategory;
use crate::traits::NotificationSurface;
use crate::types::{DestinationId, LogField, LogRecord, RecordId};

/// Mapping from category to destination.
///
/// Categories without an explicit mapping fall back to the primary
/// destination. The configuration collaborator remaps entries through
/// [`RoutingTable::set_destination`]; readers tolerate concurrent updates
/// (last write wins).
#[derive(Debug, Clone)]
pub struct RoutingTable {
    primary: DestinationId,
    overrides: HashMap<LogCategory, DestinationId>,
}

impl RoutingTable {
    /// Create a table routing every category to `primary`.
    pub fn new(primary: DestinationId) -> Self {
        Self {
            primary,
            overrides: HashMap::new(),
        }
    }

    /// Destination for a category, falling back to the primary.
    pub fn destination(&self, category: LogCategory) -> DestinationId {
        self.overrides.get(&category).copied().unwrap_or(self.primary)
    }

    /// Remap one category.
    pub fn set_destination(&mut self, category: LogCategory, destination: DestinationId) {
        self.overrides.insert(category, destination);
    }

    /// The fully resolved table, one entry per category.
    pub fn table(&self) -> HashMap<LogCategory, DestinationId> {
        LogCategory::iter()
            .map(|category| (category, self.destination(category)))
            .collect()
    }
}

/// Publishes formatted records to routed destinations.
///
/// Publication failures never propagate: they are logged locally and the
/// caller receives `None` instead of a record id. Delivery is best-effort,
/// at most once; there is no retry loop.
pub struct Router {
    surface: Arc<dyn NotificationSurface>,
    table: Arc<RwLock<RoutingTable>>,
}

impl Router {
    pub fn new(surface: Arc<dyn NotificationSurface>, table: RoutingTable) -> Self {
        Self {
            surface,
            table: Arc::new(RwLock::new(table)),
        }
    }

    /// Publish a record for `category`, resolving its destination and color.
    ///
    /// Returns the durable record id on success, `None` on failure.
    pub async fn publish(
        &self,
        category: LogCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<LogField>,
    ) -> Option<RecordId> {
        let destination = self.table.read().await.destination(category);
        let record = LogRecord::new(title, description)
            .with_fields(fields)
            .with_color(category.color());

        match self.surface.publish(destination, record).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    category = %category,
                    destination = %destination,
                    error = %e,
                    "Failed to publish log record"
                );
                None
            }
        }
    }

    /// Snapshot of the fully resolved routing table.
    pub async fn routing_table(&self) -> HashMap<LogCategory, DestinationId> {
        self.table.read().await.table()
    }

    /// Remap a category's destination.
    pub async fn set_destination(&self, category: LogCategory, destination: DestinationId) {
        self.table.write().await.set_destination(category, destination);
        tracing::info!(category = %category, destination = %destination, "Log destination remapped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StewardError;
    use crate::traits::MockNotificationSurface;
    use mockall::predicate::eq;

    #[test]
    fn test_table_falls_back_to_primary() {
        let mut table = RoutingTable::new(DestinationId::new(1));
        assert_eq!(table.destination(LogCategory::Moderation), DestinationId::new(1));

        table.set_destination(LogCategory::Moderation, DestinationId::new(9));
        assert_eq!(table.destination(LogCategory::Moderation), DestinationId::new(9));
        assert_eq!(table.destination(LogCategory::Points), DestinationId::new(1));
    }

    #[test]
    fn test_table_snapshot_covers_every_category() {
        let table = RoutingTable::new(DestinationId::new(1));
        let snapshot = table.table();
        assert!(snapshot.contains_key(&LogCategory::VoiceJoin));
        assert!(snapshot.contains_key(&LogCategory::General));
        assert!(snapshot.values().all(|d| *d == DestinationId::new(1)));
    }

    #[tokio::test]
    async fn test_publish_routes_and_colors() {
        let mut surface = MockNotificationSurface::new();
        surface
            .expect_publish()
            .with(
                eq(DestinationId::new(5)),
                mockall::predicate::function(|record: &LogRecord| {
                    record.color == LogCategory::VoiceJoin.color()
                }),
            )
            .times(1)
            .returning(|_, _| Ok(RecordId::new(77)));

        let mut table = RoutingTable::new(DestinationId::new(1));
        table.set_destination(LogCategory::VoiceJoin, DestinationId::new(5));
        let router = Router::new(Arc::new(surface), table);

        let id = router
            .publish(LogCategory::VoiceJoin, "Voice Channel Join", "joined", vec![])
            .await;
        assert_eq!(id, Some(RecordId::new(77)));
    }

    #[tokio::test]
    async fn test_publish_failure_yields_none() {
        let mut surface = MockNotificationSurface::new();
        surface
            .expect_publish()
            .returning(|destination, _| Err(StewardError::UnresolvedDestination(destination)));

        let router = Router::new(Arc::new(surface), RoutingTable::new(DestinationId::new(1)));
        let id = router
            .publish(LogCategory::General, "Engine Started", "running", vec![])
            .await;
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_set_destination_takes_effect() {
        let mut surface = MockNotificationSurface::new();
        surface
            .expect_publish()
            .with(eq(DestinationId::new(3)), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(RecordId::new(1)));

        let router = Router::new(
            Arc::new(surface),
            RoutingTable::new(DestinationId::new(1)),
        );
        router
            .set_destination(LogCategory::Leaderboard, DestinationId::new(3))
            .await;
        assert_eq!(
            router.routing_table().await[&LogCategory::Leaderboard],
            DestinationId::new(3)
        );

        router
            .publish(LogCategory::Leaderboard, "Leaderboard", "top", vec![])
            .await;
    }
}
