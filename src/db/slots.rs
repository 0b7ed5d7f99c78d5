//! Key/value slots holding JSON-serialized collections.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{seed_dataset, seed_events, seed_help, Dataset};

/// Slot holding the events collection.
pub const EVENTS_SLOT: &str = "invahelp_events";
/// Slot holding the help offers collection.
pub const HELP_SLOT: &str = "invahelp_services";

const UPSERT_SLOT: &str = "INSERT INTO local_slots (key, value, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Local fallback copy of the dataset, one slot per collection.
#[derive(Clone)]
pub struct LocalSlots {
    pool: SqlitePool,
}

impl LocalSlots {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read a raw slot value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM local_slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Load the locally persisted dataset.
    ///
    /// A missing slot falls back to the seed for that collection; an unreadable
    /// slot falls back to the whole seed dataset.
    pub async fn load_dataset(&self) -> Dataset {
        match self.try_load_dataset().await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::warn!("Local fallback unreadable, using seed data: {}", e);
                seed_dataset()
            }
        }
    }

    async fn try_load_dataset(&self) -> Result<Dataset, AppError> {
        let events = match self.get(EVENTS_SLOT).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => seed_events(),
        };
        let help = match self.get(HELP_SLOT).await? {
            Some(json) => serde_json::from_str(&json)?,
            None => seed_help(),
        };
        Ok(Dataset::new(events, help))
    }

    /// Persist both collections in one transaction.
    pub async fn save_dataset(&self, dataset: &Dataset) -> Result<(), AppError> {
        let events = serde_json::to_string(&dataset.events)?;
        let help = serde_json::to_string(&dataset.help)?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        for (key, value) in [(EVENTS_SLOT, &events), (HELP_SLOT, &help)] {
            sqlx::query(UPSERT_SLOT)
                .bind(key)
                .bind(value)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}
