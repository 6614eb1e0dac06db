//! Training editor: an in-progress draft of a new or existing training.

use crate::{check_duration, check_rest_time, Catalog, Error, Exercise, Result, Training, TrainingExercise};

/// Direction for moving an exercise within the draft
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Editable state of a training before it is saved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingDraft {
    editing: Option<String>,
    pub name: String,
    pub rest_time: u32,
    exercises: Vec<TrainingExercise>,
}

impl TrainingDraft {
    /// Blank draft for a new training
    pub fn new(default_rest: u32) -> Self {
        Self {
            editing: None,
            name: String::new(),
            rest_time: default_rest,
            exercises: Vec::new(),
        }
    }

    /// Draft pre-filled from an existing training; saving keeps its id
    pub fn from_training(training: &Training) -> Self {
        Self {
            editing: Some(training.id.clone()),
            name: training.name.clone(),
            rest_time: training.rest_time,
            exercises: training.exercises.clone(),
        }
    }

    /// Id of the training being edited, if any
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn exercises(&self) -> &[TrainingExercise] {
        &self.exercises
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_rest_time(&mut self, seconds: u32) {
        self.rest_time = seconds;
    }

    /// Append an instance of a catalog exercise with its default duration
    pub fn add_exercise(&mut self, catalog: &Catalog, exercise_id: &str) -> Result<&TrainingExercise> {
        let exercise = catalog
            .find(exercise_id)
            .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
        Ok(self.push(exercise))
    }

    /// Create a custom exercise in the catalog, then append it to the draft
    ///
    /// The returned exercise is what the caller must persist.
    pub fn create_custom_exercise(
        &mut self,
        catalog: &mut Catalog,
        name: &str,
        duration: u32,
    ) -> Result<Exercise> {
        let exercise = catalog.add_custom(name, duration)?;
        self.push(&exercise);
        Ok(exercise)
    }

    fn push(&mut self, exercise: &Exercise) -> &TrainingExercise {
        self.exercises.push(TrainingExercise::from_exercise(exercise));
        &self.exercises[self.exercises.len() - 1]
    }

    /// Remove the exercise at `index`; out of range is a no-op
    pub fn remove_exercise(&mut self, index: usize) -> Option<TrainingExercise> {
        (index < self.exercises.len()).then(|| self.exercises.remove(index))
    }

    /// Swap the exercise at `index` with its neighbour
    ///
    /// Returns false when the move would leave the list.
    pub fn move_exercise(&mut self, index: usize, direction: Direction) -> bool {
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match target {
            Some(target) if index < self.exercises.len() && target < self.exercises.len() => {
                self.exercises.swap(index, target);
                true
            }
            _ => false,
        }
    }

    /// Override the duration of one exercise instance
    pub fn set_duration(&mut self, index: usize, seconds: u32) -> Result<()> {
        check_duration(seconds)?;
        let len = self.exercises.len();
        let instance = self.exercises.get_mut(index).ok_or_else(|| {
            Error::Validation(format!("No exercise at position {} (have {})", index + 1, len))
        })?;
        instance.duration = seconds;
        Ok(())
    }

    /// Validate and produce the training
    ///
    /// Durations are checked again here since drafts opened from stored data
    /// never went through `set_duration`.
    pub fn finish(&self) -> Result<Training> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Please enter a training name".into()));
        }
        if self.exercises.is_empty() {
            return Err(Error::Validation("Please add at least one exercise".into()));
        }
        check_rest_time(self.rest_time)?;
        for instance in &self.exercises {
            check_duration(instance.duration)?;
        }

        Ok(Training {
            id: self.editing.clone().unwrap_or_else(crate::new_id),
            name: name.to_string(),
            rest_time: self.rest_time,
            exercises: self.exercises.clone(),
        })
    }
}
