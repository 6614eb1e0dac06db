//! Countdown session engine.
//!
//! A [`Session`] plays a [`Sequence`] one item at a time. It owns at most one
//! repeating tick timer and one celebration timer; every transition that
//! stops the countdown disarms the tick before anything else happens, and
//! every arm disarms the previous handle first.
//!
//! State machine:
//!
//! ```text
//!   Idle ──start──▶ Running ──pause──▶ Paused
//!    ▲               │  ▲                │
//!    │               │  └─────start──────┘
//!    │          last item done / skipped
//!    │               ▼
//!    └───reset─── Complete
//! ```
//!
//! `reset` is valid from every state and always lands in `Idle`.

use crate::config::SessionConfig;
use crate::cues::{Cue, CuePlayer};
use crate::sequence::{Sequence, SequenceItem};
use crate::timer::{Scheduler, TimerEvent, TimerHandle, TimerKind};
use std::time::Duration;

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Complete,
}

/// Timing parameters for a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub tick: Duration,
    pub celebration: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            celebration: Duration::from_secs(5),
        }
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            tick: config.tick_interval(),
            celebration: config.celebration(),
        }
    }
}

struct LiveTimer {
    handle: TimerHandle,
    generation: u64,
}

/// A single run-through of a training's sequence
pub struct Session {
    sequence: Sequence,
    state: SessionState,
    current_index: usize,
    time_remaining: u32,
    elapsed_time: u32,
    celebrating: bool,
    settings: SessionSettings,
    next_generation: u64,
    ticker: Option<LiveTimer>,
    celebration: Option<LiveTimer>,
    scheduler: Box<dyn Scheduler>,
    cues: Box<dyn CuePlayer>,
}

impl Session {
    pub fn new(
        sequence: Sequence,
        settings: SessionSettings,
        scheduler: Box<dyn Scheduler>,
        cues: Box<dyn CuePlayer>,
    ) -> Self {
        let mut session = Self {
            sequence,
            state: SessionState::Idle,
            current_index: 0,
            time_remaining: 0,
            elapsed_time: 0,
            celebrating: false,
            settings,
            next_generation: 0,
            ticker: None,
            celebration: None,
            scheduler,
            cues,
        };
        session.reset();
        session
    }

    /// Replace the sequence, e.g. after the training or catalog changed
    ///
    /// Any pending timer is disarmed and the session returns to its
    /// untouched initial state.
    pub fn rebuild(&mut self, sequence: Sequence) {
        tracing::debug!("Sequence rebuilt ({} items), resetting session", sequence.len());
        self.sequence = sequence;
        self.reset();
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Begin or resume the countdown
    ///
    /// No-op when already running, complete, or the sequence is empty.
    pub fn start(&mut self) {
        match self.state() {
            SessionState::Idle | SessionState::Paused => {}
            SessionState::Running => {
                tracing::debug!("start() while running ignored");
                return;
            }
            SessionState::Complete => return,
        }
        if self.current_index >= self.sequence.len() {
            return;
        }

        self.arm_ticker();
        self.state = SessionState::Running;
        tracing::info!(
            "Session running at item {} with {}s left",
            self.current_index,
            self.time_remaining
        );
        self.cues.play(Cue::ItemStart);
    }

    /// Stop the countdown, keeping position and remaining time
    pub fn pause(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.disarm_ticker();
        self.state = SessionState::Paused;
        tracing::info!("Session paused with {}s left", self.time_remaining);
    }

    /// Pause when running, otherwise start
    pub fn toggle(&mut self) {
        if self.state == SessionState::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Return to the untouched initial state from anywhere
    pub fn reset(&mut self) {
        self.disarm_ticker();
        self.celebration = None;
        self.celebrating = false;
        self.current_index = 0;
        self.elapsed_time = 0;
        self.time_remaining = self.sequence.get(0).map_or(0, |item| item.duration);
        self.state = SessionState::Idle;
    }

    /// Jump to the next item, counting the current one as fully done
    ///
    /// Skipping the last item completes the session. The item-start cue is
    /// not played for the item skipped into.
    pub fn skip(&mut self) {
        // Past the end (complete) or nothing to play
        let Some(duration) = self.current_item().map(|item| item.duration) else {
            return;
        };

        self.elapsed_time = self.elapsed_time.saturating_add(duration);
        if self.current_index + 1 >= self.sequence.len() {
            self.complete();
            return;
        }

        self.current_index += 1;
        self.time_remaining = self.current_duration();
        if self.state == SessionState::Idle {
            self.state = SessionState::Paused;
        }
        tracing::debug!("Skipped to item {}", self.current_index);
    }

    /// Advance the countdown by one tick
    ///
    /// Ignored unless running.
    pub fn tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        if self.time_remaining > 1 {
            self.time_remaining -= 1;
            return;
        }

        self.elapsed_time = self.elapsed_time.saturating_add(self.current_duration());
        if self.current_index + 1 >= self.sequence.len() {
            self.complete();
        } else {
            self.current_index += 1;
            self.time_remaining = self.current_duration();
            tracing::debug!("Advanced to item {}", self.current_index);
            self.cues.play(Cue::ItemStart);
        }
    }

    /// Route a timer event from the event loop
    ///
    /// Events from timers that have since been disarmed are dropped.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event.kind {
            TimerKind::Tick => {
                if is_current(&self.ticker, event.generation) {
                    self.tick();
                } else {
                    tracing::trace!("Dropping stale tick (generation {})", event.generation);
                }
            }
            TimerKind::Celebration => {
                if is_current(&self.celebration, event.generation) {
                    self.celebration = None;
                    self.celebrating = false;
                    tracing::debug!("Celebration finished");
                }
            }
        }
    }

    fn complete(&mut self) {
        self.disarm_ticker();
        self.current_index = self.sequence.len();
        self.time_remaining = 0;
        self.state = SessionState::Complete;
        tracing::info!("Session complete after {}s", self.elapsed_time);
        self.cues.play(Cue::Finish);

        self.celebrating = true;
        let event = self.next_event(TimerKind::Celebration);
        let handle = self.scheduler.once(self.settings.celebration, event);
        self.celebration = Some(LiveTimer {
            handle,
            generation: event.generation,
        });
    }

    fn arm_ticker(&mut self) {
        self.disarm_ticker();
        let event = self.next_event(TimerKind::Tick);
        let handle = self.scheduler.repeating(self.settings.tick, event);
        self.ticker = Some(LiveTimer {
            handle,
            generation: event.generation,
        });
    }

    fn disarm_ticker(&mut self) {
        if let Some(timer) = self.ticker.take() {
            timer.handle.cancel();
        }
    }

    fn next_event(&mut self, kind: TimerKind) -> TimerEvent {
        self.next_generation += 1;
        TimerEvent {
            kind,
            generation: self.next_generation,
        }
    }

    fn current_duration(&self) -> u32 {
        self.current_item().map_or(0, |item| item.duration)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Current state; an empty sequence always reads as complete
    pub fn state(&self) -> SessionState {
        if self.sequence.is_empty() {
            SessionState::Complete
        } else {
            self.state
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&SequenceItem> {
        self.sequence.get(self.current_index)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn elapsed_time(&self) -> u32 {
        self.elapsed_time
    }

    pub fn total_time(&self) -> u32 {
        self.sequence.total_time()
    }

    /// Fraction of the total time consumed, 0.0 for an empty sequence
    pub fn progress(&self) -> f64 {
        let total = self.total_time();
        if total == 0 {
            0.0
        } else {
            f64::from(self.elapsed_time) / f64::from(total)
        }
    }

    pub fn percent(&self) -> u32 {
        (self.progress() * 100.0).round() as u32
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    /// Whether nothing has happened since the last reset
    pub fn is_untouched(&self) -> bool {
        self.current_index == 0
            && self
                .sequence
                .get(0)
                .is_some_and(|item| item.duration == self.time_remaining)
    }

    pub fn has_live_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Snapshot for rendering
    pub fn view(&self) -> SessionView {
        let items = self
            .sequence
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| ItemView {
                name: item.name.clone(),
                duration: item.duration,
                is_rest: item.is_rest,
                status: match index.cmp(&self.current_index) {
                    std::cmp::Ordering::Less => ItemStatus::Done,
                    std::cmp::Ordering::Equal => ItemStatus::Current,
                    std::cmp::Ordering::Greater => ItemStatus::Upcoming,
                },
            })
            .collect();

        let (title, label) = match self.current_item() {
            _ if self.is_complete() => (None, COMPLETE_LABEL.to_string()),
            Some(item) if item.is_rest => (Some(item.name.clone()), REST_LABEL.to_string()),
            Some(item) => (
                Some(item.name.clone()),
                format!(
                    "Exercise {} of {}",
                    item.original_index.unwrap_or(0) + 1,
                    self.sequence.exercise_count()
                ),
            ),
            None => (None, COMPLETE_LABEL.to_string()),
        };

        SessionView {
            state: self.state(),
            title,
            label,
            time_remaining: self.time_remaining,
            percent: self.percent(),
            untouched: self.is_untouched(),
            celebrating: self.celebrating,
            items,
        }
    }
}

fn is_current(timer: &Option<LiveTimer>, generation: u64) -> bool {
    timer.as_ref().is_some_and(|t| t.generation == generation)
}

const REST_LABEL: &str = "Rest time";
const COMPLETE_LABEL: &str = "Training complete!";

/// Where an item sits relative to the session position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Done,
    Current,
    Upcoming,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView {
    pub name: String,
    pub duration: u32,
    pub is_rest: bool,
    pub status: ItemStatus,
}

/// Everything a front end needs to draw a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub state: SessionState,
    /// Name of the current item; `None` once complete
    pub title: Option<String>,
    /// "Exercise N of M", "Rest time", or the completion message
    pub label: String,
    pub time_remaining: u32,
    pub percent: u32,
    pub untouched: bool,
    pub celebrating: bool,
    pub items: Vec<ItemView>,
}

/// Render seconds as `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
