//! Core domain types for the workout timer.
//!
//! This module defines the persisted entities:
//! - Exercises (catalog entries, predefined or custom)
//! - Training exercises (per-training instances with duration overrides)
//! - Trainings (ordered instances plus a rest period)
//!
//! Field names serialize in camelCase to stay compatible with stored data.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest duration, in seconds, an exercise or rest period may be given
pub const MAX_DURATION_SECONDS: u32 = 24 * 60 * 60;

/// Rest time given to stored trainings saved before `restTime` existed
pub const MIGRATED_REST_SECONDS: u32 = 30;

/// Mint a fresh identifier for a new entity
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reject exercise durations outside `1..=MAX_DURATION_SECONDS`
pub fn check_duration(seconds: u32) -> Result<()> {
    if seconds == 0 {
        return Err(Error::Validation(
            "Exercise duration must be at least one second".into(),
        ));
    }
    check_rest_time(seconds)
}

/// Reject rest or exercise durations longer than `MAX_DURATION_SECONDS`
pub fn check_rest_time(seconds: u32) -> Result<()> {
    if seconds > MAX_DURATION_SECONDS {
        return Err(Error::Validation(format!(
            "Durations are limited to {} seconds (24 hours)",
            MAX_DURATION_SECONDS
        )));
    }
    Ok(())
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A reusable exercise with a default duration in seconds
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub duration: u32,
    #[serde(default)]
    pub is_rest: bool,
    #[serde(default)]
    pub custom: bool,
}

// ============================================================================
// Training Types
// ============================================================================

/// One exercise instance inside a training
///
/// `duration` overrides the catalog default for this instance only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingExercise {
    pub id: String,
    pub exercise_id: String,
    pub duration: u32,
}

impl TrainingExercise {
    /// Create an instance of a catalog exercise using its default duration
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            id: new_id(),
            exercise_id: exercise.id.clone(),
            duration: exercise.duration,
        }
    }
}

/// A named workout: exercises in execution order plus rest between them
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub name: String,
    /// Rest inserted between consecutive exercises; absent in old data
    #[serde(default = "migrated_rest_time")]
    pub rest_time: u32,
    #[serde(default)]
    pub exercises: Vec<TrainingExercise>,
}

fn migrated_rest_time() -> u32 {
    MIGRATED_REST_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_uses_camel_case() {
        let training = Training {
            id: "t1".into(),
            name: "Leg Day".into(),
            rest_time: 15,
            exercises: vec![TrainingExercise {
                id: "te1".into(),
                exercise_id: "squats".into(),
                duration: 30,
            }],
        };

        let json = serde_json::to_string(&training).unwrap();
        assert!(json.contains("\"restTime\":15"));
        assert!(json.contains("\"exerciseId\":\"squats\""));
    }

    #[test]
    fn test_missing_rest_time_defaults_to_thirty() {
        let json = r#"{"id":"t1","name":"Old","exercises":[]}"#;
        let training: Training = serde_json::from_str(json).unwrap();
        assert_eq!(training.rest_time, MIGRATED_REST_SECONDS);
    }

    #[test]
    fn test_duration_bounds() {
        assert!(check_duration(1).is_ok());
        assert!(check_duration(MAX_DURATION_SECONDS).is_ok());
        assert!(matches!(check_duration(0), Err(Error::Validation(_))));
        assert!(matches!(
            check_duration(MAX_DURATION_SECONDS + 1),
            Err(Error::Validation(_))
        ));

        assert!(check_rest_time(0).is_ok());
        assert!(matches!(
            check_rest_time(3_000_000_000),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_zero_rest_time_is_kept() {
        let json = r#"{"id":"t1","name":"Tabata","restTime":0,"exercises":[]}"#;
        let training: Training = serde_json::from_str(json).unwrap();
        assert_eq!(training.rest_time, 0);
    }

    #[test]
    fn test_instance_takes_catalog_duration() {
        let exercise = Exercise {
            id: "plank".into(),
            name: "Plank".into(),
            duration: 60,
            is_rest: false,
            custom: false,
        };
        let instance = TrainingExercise::from_exercise(&exercise);
        assert_eq!(instance.exercise_id, "plank");
        assert_eq!(instance.duration, 60);
        assert!(Uuid::parse_str(&instance.id).is_ok());
    }
}
