use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Meal category. The client's `"none"` placeholder is not a variant; it is
/// rejected at the boundary before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    #[serde(rename = "Main Course")]
    MainCourse,
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealCategory::Breakfast => write!(f, "Breakfast"),
            MealCategory::Lunch => write!(f, "Lunch"),
            MealCategory::Dinner => write!(f, "Dinner"),
            MealCategory::Snack => write!(f, "Snack"),
            MealCategory::Dessert => write!(f, "Dessert"),
            MealCategory::MainCourse => write!(f, "Main Course"),
        }
    }
}

impl FromStr for MealCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealCategory::Breakfast),
            "lunch" => Ok(MealCategory::Lunch),
            "dinner" => Ok(MealCategory::Dinner),
            "snack" => Ok(MealCategory::Snack),
            "dessert" => Ok(MealCategory::Dessert),
            "main course" => Ok(MealCategory::MainCourse),
            _ => Err(format!("Invalid category '{}'", s)),
        }
    }
}

/// A meal authored by a user.
#[derive(Debug, Clone, Serialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub recipe: String,
    pub time: i64,
    pub category: MealCategory,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Meal {
    pub fn new(
        name: String,
        description: String,
        recipe: String,
        time: i64,
        category: MealCategory,
        author: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            recipe,
            time,
            category,
            author,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a meal. Fields left out of the request body are kept
/// as-is; provided fields overwrite without re-running create-time
/// validation. `author` is immutable and deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub recipe: Option<String>,
    pub time: Option<i64>,
    pub category: Option<MealCategory>,
}
