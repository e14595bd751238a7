use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutType {
    #[serde(rename = "Strength Training")]
    StrengthTraining,
    Cardio,
    Flexibility,
    Balance,
    Endurance,
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutType::StrengthTraining => write!(f, "Strength Training"),
            WorkoutType::Cardio => write!(f, "Cardio"),
            WorkoutType::Flexibility => write!(f, "Flexibility"),
            WorkoutType::Balance => write!(f, "Balance"),
            WorkoutType::Endurance => write!(f, "Endurance"),
        }
    }
}

impl FromStr for WorkoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strength training" => Ok(WorkoutType::StrengthTraining),
            "cardio" => Ok(WorkoutType::Cardio),
            "flexibility" => Ok(WorkoutType::Flexibility),
            "balance" => Ok(WorkoutType::Balance),
            "endurance" => Ok(WorkoutType::Endurance),
            _ => Err(format!("Invalid workout type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyPart {
    Chest,
    Back,
    Legs,
    Arms,
    Shoulders,
    Core,
    #[serde(rename = "Full Body")]
    FullBody,
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyPart::Chest => write!(f, "Chest"),
            BodyPart::Back => write!(f, "Back"),
            BodyPart::Legs => write!(f, "Legs"),
            BodyPart::Arms => write!(f, "Arms"),
            BodyPart::Shoulders => write!(f, "Shoulders"),
            BodyPart::Core => write!(f, "Core"),
            BodyPart::FullBody => write!(f, "Full Body"),
        }
    }
}

impl FromStr for BodyPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chest" => Ok(BodyPart::Chest),
            "back" => Ok(BodyPart::Back),
            "legs" => Ok(BodyPart::Legs),
            "arms" => Ok(BodyPart::Arms),
            "shoulders" => Ok(BodyPart::Shoulders),
            "core" => Ok(BodyPart::Core),
            "full body" => Ok(BodyPart::FullBody),
            _ => Err(format!("Invalid body part '{}'", s)),
        }
    }
}

/// A workout routine authored by a user.
#[derive(Debug, Clone, Serialize)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub workout_type: WorkoutType,
    pub body_part: BodyPart,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Routine {
    pub fn new(
        name: String,
        link: String,
        workout_type: WorkoutType,
        body_part: BodyPart,
        author: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            link,
            workout_type,
            body_part,
            author,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a routine; same overwrite semantics as [`MealPatch`].
///
/// [`MealPatch`]: super::MealPatch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub link: Option<String>,
    pub workout_type: Option<WorkoutType>,
    pub body_part: Option<BodyPart>,
}
