//! The user's trainings and catalog, kept in sync with storage.
//!
//! [`Library`] owns the collections and persists a full snapshot after
//! every mutation. [`Shell`] layers navigation on top: which training is
//! selected and whether the editor or a session is showing.

use crate::editor::TrainingDraft;
use crate::sequence::{build_sequence, Sequence};
use crate::store::{Snapshot, Storage};
use crate::{Catalog, Error, Exercise, Result, Training};

/// Trainings plus catalog, backed by a [`Storage`]
pub struct Library {
    trainings: Vec<Training>,
    catalog: Catalog,
    store: Box<dyn Storage>,
}

impl Library {
    /// Load everything from `store`
    pub fn open(store: Box<dyn Storage>) -> Result<Self> {
        let snapshot = store.load()?;
        let catalog = Catalog::with_custom(snapshot.custom_exercises);

        let errors = catalog.validate();
        for error in &errors {
            tracing::warn!("Catalog problem: {}", error);
        }

        tracing::info!(
            "Opened library with {} trainings and {} exercises",
            snapshot.trainings.len(),
            catalog.all().len()
        );
        Ok(Self {
            trainings: snapshot.trainings,
            catalog,
            store,
        })
    }

    pub fn trainings(&self) -> &[Training] {
        &self.trainings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn find(&self, id: &str) -> Option<&Training> {
        self.trainings.iter().find(|t| t.id == id)
    }

    /// Look a training up by id, or failing that by case-insensitive name
    pub fn resolve(&self, key: &str) -> Result<&Training> {
        self.find(key)
            .or_else(|| {
                self.trainings
                    .iter()
                    .find(|t| t.name.eq_ignore_ascii_case(key.trim()))
            })
            .ok_or_else(|| Error::UnknownTraining(key.to_string()))
    }

    /// Playback sequence for a training against the current catalog
    pub fn sequence_for(&self, training: &Training) -> Sequence {
        build_sequence(training, &self.catalog)
    }

    /// Insert or replace a training; returns true when it was new
    pub fn save_training(&mut self, training: Training) -> Result<bool> {
        let created = match self.trainings.iter_mut().find(|t| t.id == training.id) {
            Some(existing) => {
                *existing = training;
                false
            }
            None => {
                self.trainings.push(training);
                true
            }
        };
        self.persist()?;
        Ok(created)
    }

    /// Remove a training by id
    pub fn delete_training(&mut self, id: &str) -> Result<Training> {
        let index = self
            .trainings
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::UnknownTraining(id.to_string()))?;
        let removed = self.trainings.remove(index);
        self.persist()?;
        tracing::info!("Deleted training '{}'", removed.name);
        Ok(removed)
    }

    /// Create and persist a custom exercise
    pub fn add_custom_exercise(&mut self, name: &str, duration: u32) -> Result<Exercise> {
        let exercise = self.catalog.add_custom(name, duration)?;
        self.persist()?;
        Ok(exercise)
    }

    /// Mutable catalog access for a draft; call [`Library::persist`] after
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Write the full snapshot to storage
    pub fn persist(&self) -> Result<()> {
        self.store.save(&Snapshot {
            trainings: self.trainings.clone(),
            custom_exercises: self.catalog.custom(),
        })
    }
}

/// What the shell is currently showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    Welcome,
    /// Editing an existing training (`Some(id)`) or creating one
    Editor { editing: Option<String> },
    /// Running a session for a training id
    Session(String),
}

/// Navigation state over a [`Library`]
pub struct Shell {
    library: Library,
    view: View,
    default_rest: u32,
}

impl Shell {
    pub fn new(library: Library, default_rest: u32) -> Self {
        Self {
            library,
            view: View::Welcome,
            default_rest,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut Library {
        &mut self.library
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn selected(&self) -> Option<&Training> {
        match &self.view {
            View::Session(id) => self.library.find(id),
            _ => None,
        }
    }

    /// Header text for the current view
    pub fn title(&self) -> String {
        match &self.view {
            View::Welcome => "Select or create a training".into(),
            View::Editor { editing: Some(_) } => "Edit training".into(),
            View::Editor { editing: None } => "Create new training".into(),
            View::Session(id) => self
                .library
                .find(id)
                .map_or_else(|| "Select or create a training".into(), |t| t.name.clone()),
        }
    }

    /// Show the session view for a training
    pub fn select(&mut self, key: &str) -> Result<&Training> {
        let id = self.library.resolve(key)?.id.clone();
        self.view = View::Session(id.clone());
        self.library.resolve(&id)
    }

    /// Open the editor and return a draft for it
    pub fn open_editor(&mut self, key: Option<&str>) -> Result<TrainingDraft> {
        let draft = match key {
            Some(key) => TrainingDraft::from_training(self.library.resolve(key)?),
            None => TrainingDraft::new(self.default_rest),
        };
        self.view = View::Editor {
            editing: draft.editing().map(str::to_string),
        };
        Ok(draft)
    }

    /// Validate and save the draft, then show the saved training
    ///
    /// On validation failure nothing is saved and the editor stays open.
    pub fn save_from_editor(&mut self, draft: &TrainingDraft) -> Result<Training> {
        let training = draft.finish()?;
        let created = self.library.save_training(training.clone())?;
        tracing::info!(
            "{} training '{}'",
            if created { "Created" } else { "Updated" },
            training.name
        );
        self.view = View::Session(training.id.clone());
        Ok(training)
    }

    /// Delete a training; returns to the welcome view if it was selected
    pub fn delete(&mut self, key: &str) -> Result<Training> {
        let id = self.library.resolve(key)?.id.clone();
        let removed = self.library.delete_training(&id)?;
        if self.view == View::Session(id) {
            self.view = View::Welcome;
        }
        Ok(removed)
    }
}
