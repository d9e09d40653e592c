use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Event, EventEntryRow};
use crate::repository::{entry::EntryRepository, event::EventRepository};

/// Data access the reconciler needs. Postgres in production.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn load_event(&self, event_id: Uuid) -> Result<Option<Event>>;

    /// Snapshot of every entry of the event, taken once per run.
    async fn load_entries(&self, event_id: Uuid) -> Result<Vec<EventEntryRow>>;

    async fn update_calculated_fee(&self, entry_id: Uuid, fee: Decimal) -> Result<()>;
}

pub struct PgEntryStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgEntryStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore<'_> {
    async fn load_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        EventRepository::new(self.pool).find_optional(event_id).await
    }

    async fn load_entries(&self, event_id: Uuid) -> Result<Vec<EventEntryRow>> {
        EntryRepository::new(self.pool).list_for_event(event_id).await
    }

    async fn update_calculated_fee(&self, entry_id: Uuid, fee: Decimal) -> Result<()> {
        EntryRepository::new(self.pool)
            .update_calculated_fee(entry_id, fee)
            .await
    }
}
