//! Exercise catalog: built-in exercises plus user-created ones.
//!
//! Predefined entries always come first, custom entries follow in the
//! order they were created.

use crate::{Error, Exercise, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Name shown for an exercise reference that no longer resolves
pub const UNKNOWN_EXERCISE: &str = "Unknown Exercise";

/// Cached predefined exercises - built once and reused
static DEFAULT_EXERCISES: Lazy<Vec<Exercise>> = Lazy::new(build_default_exercises);

/// Get a reference to the cached predefined exercises
pub fn default_exercises() -> &'static [Exercise] {
    &DEFAULT_EXERCISES
}

fn predefined(id: &str, name: &str, duration: u32, is_rest: bool) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        duration,
        is_rest,
        custom: false,
    }
}

fn build_default_exercises() -> Vec<Exercise> {
    vec![
        predefined("jumping_jacks", "Jumping Jacks", 30, false),
        predefined("push_ups", "Push-ups", 30, false),
        predefined("squats", "Squats", 45, false),
        predefined("lunges", "Lunges", 45, false),
        predefined("plank", "Plank", 60, false),
        predefined("side_plank", "Side Plank", 30, false),
        predefined("burpees", "Burpees", 30, false),
        predefined("mountain_climbers", "Mountain Climbers", 30, false),
        predefined("high_knees", "High Knees", 30, false),
        predefined("crunches", "Crunches", 45, false),
        predefined("glute_bridge", "Glute Bridge", 45, false),
        predefined("wall_sit", "Wall Sit", 60, false),
        predefined("stretching", "Stretching", 60, true),
        predefined("rest", "Rest", 30, true),
    ]
}

/// The combined set of exercises a training may reference
#[derive(Clone, Debug)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_custom(Vec::new())
    }
}

impl Catalog {
    /// Build a catalog from the predefined exercises plus `custom`
    pub fn with_custom(custom: Vec<Exercise>) -> Self {
        let mut exercises = default_exercises().to_vec();
        exercises.extend(custom);
        Self { exercises }
    }

    /// Build a catalog from an explicit list, without the predefined entries
    pub fn from_exercises(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    pub fn all(&self) -> &[Exercise] {
        &self.exercises
    }

    /// User-created entries only, in creation order
    pub fn custom(&self) -> Vec<Exercise> {
        self.exercises.iter().filter(|e| e.custom).cloned().collect()
    }

    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn display_name(&self, id: &str) -> &str {
        self.find(id).map_or(UNKNOWN_EXERCISE, |e| e.name.as_str())
    }

    /// Case-insensitive substring match on exercise names
    pub fn search(&self, term: &str) -> Vec<&Exercise> {
        let needle = term.trim().to_lowercase();
        self.exercises
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Create a custom exercise and append it to the catalog
    pub fn add_custom(&mut self, name: &str, duration: u32) -> Result<Exercise> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Please enter an exercise name".into()));
        }
        crate::check_duration(duration)?;

        let exercise = Exercise {
            id: crate::new_id(),
            name: name.to_string(),
            duration,
            is_rest: false,
            custom: true,
        };
        tracing::info!("Added custom exercise '{}' ({})", exercise.name, exercise.id);
        self.exercises.push(exercise.clone());
        Ok(exercise)
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if exercise.id.is_empty() {
                errors.push(format!("Exercise '{}' has empty ID", exercise.name));
            } else if !seen.insert(exercise.id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", exercise.id));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id));
            }
            if exercise.duration == 0 {
                errors.push(format!("Exercise '{}' has zero duration", exercise.id));
            } else if exercise.duration > crate::MAX_DURATION_SECONDS {
                errors.push(format!("Exercise '{}' is longer than a day", exercise.id));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let catalog = Catalog::default();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_predefined_come_first() {
        let custom = Exercise {
            id: "c1".into(),
            name: "Kettlebell Halo".into(),
            duration: 40,
            is_rest: false,
            custom: true,
        };
        let catalog = Catalog::with_custom(vec![custom]);

        assert_eq!(catalog.all().len(), default_exercises().len() + 1);
        assert_eq!(catalog.all().last().unwrap().id, "c1");
        assert_eq!(catalog.custom().len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::default();
        let hits = catalog.search("PLANK");
        let names: Vec<_> = hits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Plank", "Side Plank"]);
        assert_eq!(catalog.search("").len(), catalog.all().len());
    }

    #[test]
    fn test_add_custom() {
        let mut catalog = Catalog::default();
        let created = catalog.add_custom("  Bear Crawl ", 50).unwrap();

        assert_eq!(created.name, "Bear Crawl");
        assert!(created.custom);
        assert!(!created.is_rest);
        assert_eq!(catalog.find(&created.id), Some(&created));
    }

    #[test]
    fn test_add_custom_rejects_blank_name() {
        let mut catalog = Catalog::default();
        let before = catalog.all().len();

        assert!(matches!(
            catalog.add_custom("   ", 30),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            catalog.add_custom("Skipping", 0),
            Err(Error::Validation(_))
        ));
        assert_eq!(catalog.all().len(), before);
    }

    #[test]
    fn test_add_custom_rejects_oversized_duration() {
        let mut catalog = Catalog::default();
        let before = catalog.all().len();

        assert!(matches!(
            catalog.add_custom("Ultramarathon", 3_000_000_000),
            Err(Error::Validation(_))
        ));
        assert!(catalog
            .add_custom("Long Walk", crate::MAX_DURATION_SECONDS)
            .is_ok());
        assert_eq!(catalog.all().len(), before + 1);
    }

    #[test]
    fn test_display_name_falls_back() {
        let catalog = Catalog::default();
        assert_eq!(catalog.display_name("squats"), "Squats");
        assert_eq!(catalog.display_name("gone"), UNKNOWN_EXERCISE);
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let catalog = Catalog::from_exercises(vec![
            predefined("a", "A", 10, false),
            predefined("a", "Again", 10, false),
            predefined("b", "", 0, false),
            predefined("c", "Forever", u32::MAX, false),
        ]);
        let errors = catalog.validate();
        assert_eq!(errors.len(), 4, "{:?}", errors);
    }
}
