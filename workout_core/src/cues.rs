//! Audio cues fired at session transitions.
//!
//! Playback is fire-and-forget: players never report back.

use std::cell::RefCell;
use std::rc::Rc;

/// A sound played by the session engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// A sequence item begins
    ItemStart,
    /// The whole session is done
    Finish,
}

/// Plays cues on behalf of a session
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    fn play(&mut self, cue: Cue) {
        tracing::trace!("Cue {:?} (silent)", cue);
    }
}

/// Remembers every cue it was asked to play; clones share the record
#[derive(Clone, Debug, Default)]
pub struct RecordingPlayer {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }
}

impl CuePlayer for RecordingPlayer {
    fn play(&mut self, cue: Cue) {
        self.played.borrow_mut().push(cue);
    }
}
