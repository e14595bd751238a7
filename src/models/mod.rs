mod entry;
mod meal;
mod routine;
mod user;

pub use entry::{Entry, EntryPatch, PopulatedEntry};
pub use meal::{Meal, MealCategory, MealPatch};
pub use routine::{BodyPart, Routine, RoutinePatch, WorkoutType};
pub use user::User;

use serde::Serialize;

/// Reduced `{id, name}` projection used for selection lists and for
/// resolving entry references in populated listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
}
