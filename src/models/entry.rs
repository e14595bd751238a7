use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemSummary;

/// A dated journal entry joining the meals eaten and routines performed
/// that day. References are ids into the meals/routines tables but are not
/// existence-checked at creation and may dangle after a delete.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meals: Vec<Uuid>,
    pub routines: Vec<Uuid>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(date: NaiveDate, meals: Vec<Uuid>, routines: Vec<Uuid>, author: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            meals,
            routines,
            author,
            created_at: Utc::now(),
        }
    }
}

/// An entry with its references resolved to `{id, name}` for display.
/// References that no longer resolve are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct PopulatedEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub meals: Vec<ItemSummary>,
    pub routines: Vec<ItemSummary>,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Partial update for an entry; provided fields overwrite without
/// re-running the non-empty checks from creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub meals: Option<Vec<Uuid>>,
    pub routines: Option<Vec<Uuid>>,
}
