#![forbid(unsafe_code)]

//! Core domain model and session engine for the wtimer workout timer.
//!
//! This crate provides:
//! - Domain types (exercises, trainings)
//! - The exercise catalog
//! - Sequence building and the countdown session engine
//! - Timer scheduling and audio cue ports
//! - The training editor
//! - Persistence (JSON store) and the library/navigation model

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod sequence;
pub mod timer;
pub mod cues;
pub mod session;
pub mod editor;
pub mod store;
pub mod library;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_exercises, Catalog};
pub use config::Config;
pub use sequence::{build_sequence, Sequence, SequenceItem};
pub use timer::{Scheduler, ThreadScheduler, TimerEvent, TimerHandle, TimerKind};
pub use cues::{Cue, CuePlayer};
pub use session::{format_time, Session, SessionSettings, SessionState, SessionView};
pub use editor::{Direction, TrainingDraft};
pub use store::{JsonStore, Snapshot, Storage};
pub use library::{Library, Shell, View};
