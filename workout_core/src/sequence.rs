//! Flattening a training into the timed sequence a session plays back.
//!
//! Each resolvable training exercise becomes one item; a synthetic rest item
//! follows every exercise except the training's last one when the rest time
//! is positive.

use crate::{Catalog, Training};

/// Display name of the synthetic rest items
pub const REST_NAME: &str = "Rest";

/// One timed step of a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceItem {
    pub id: String,
    pub name: String,
    pub duration: u32,
    pub is_rest: bool,
    /// Position in the training's own exercise list; `None` for rest items
    pub original_index: Option<usize>,
}

/// The flattened, rest-interleaved playback order of a training
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sequence {
    items: Vec<SequenceItem>,
    total_time: u32,
    exercise_count: usize,
    unresolved: Vec<String>,
}

impl Sequence {
    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&SequenceItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every item's duration, rest included; saturates at `u32::MAX`
    pub fn total_time(&self) -> u32 {
        self.total_time
    }

    /// Number of exercises in the source training, resolved or not
    pub fn exercise_count(&self) -> usize {
        self.exercise_count
    }

    /// Exercise ids that could not be found in the catalog
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    fn push(&mut self, item: SequenceItem) {
        self.total_time = self.total_time.saturating_add(item.duration);
        self.items.push(item);
    }
}

/// Build the playback sequence for `training` against `catalog`
///
/// Exercises whose catalog entry is missing are dropped together with the
/// rest that would follow them, and reported through
/// [`Sequence::unresolved`].
pub fn build_sequence(training: &Training, catalog: &Catalog) -> Sequence {
    let mut sequence = Sequence {
        exercise_count: training.exercises.len(),
        ..Sequence::default()
    };
    let last = training.exercises.len().saturating_sub(1);

    for (index, instance) in training.exercises.iter().enumerate() {
        let Some(exercise) = catalog.find(&instance.exercise_id) else {
            tracing::warn!(
                "Training '{}' references unknown exercise '{}', skipping it",
                training.name,
                instance.exercise_id
            );
            sequence.unresolved.push(instance.exercise_id.clone());
            continue;
        };

        sequence.push(SequenceItem {
            id: instance.id.clone(),
            name: exercise.name.clone(),
            duration: instance.duration,
            is_rest: exercise.is_rest,
            original_index: Some(index),
        });

        if index < last && training.rest_time > 0 {
            sequence.push(SequenceItem {
                id: format!("rest-{}", index),
                name: REST_NAME.into(),
                duration: training.rest_time,
                is_rest: true,
                original_index: None,
            });
        }
    }

    tracing::debug!(
        "Built sequence of {} items ({}s) for '{}'",
        sequence.len(),
        sequence.total_time,
        training.name
    );
    sequence
}
