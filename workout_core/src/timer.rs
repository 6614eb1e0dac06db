//! Cancelable timer scheduling for countdown sessions.
//!
//! A [`Scheduler`] arms timers that deliver [`TimerEvent`]s back to the
//! owner's event loop. Every armed timer is represented by a [`TimerHandle`];
//! cancelling or dropping the handle disarms it. Events carry the generation
//! they were armed with so a late delivery from a disarmed timer can be
//! recognised and dropped.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What an armed timer is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// The repeating countdown tick
    Tick,
    /// The one-shot that ends the completion celebration
    Celebration,
}

/// Delivered to the event loop each time a timer fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Owned handle to an armed timer; disarms on cancel or drop
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Create a handle and the flag the timer side polls
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let cancelled = Arc::new(AtomicBool::new(false));
        (
            Self {
                cancelled: Arc::clone(&cancelled),
            },
            cancelled,
        )
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Arms timers on behalf of a session
pub trait Scheduler {
    /// Fire `event` every `period` until the handle is cancelled
    fn repeating(&mut self, period: Duration, event: TimerEvent) -> TimerHandle;

    /// Fire `event` once after `delay` unless cancelled first
    fn once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;
}

/// Scheduler backed by sleeping threads that post into a channel
///
/// `E` is the event loop's message type; timer events are converted into it.
pub struct ThreadScheduler<E> {
    tx: Sender<E>,
}

impl<E> ThreadScheduler<E> {
    pub fn new(tx: Sender<E>) -> Self {
        Self { tx }
    }
}

impl<E> Scheduler for ThreadScheduler<E>
where
    E: From<TimerEvent> + Send + 'static,
{
    fn repeating(&mut self, period: Duration, event: TimerEvent) -> TimerHandle {
        let (handle, cancelled) = TimerHandle::new();
        let tx = self.tx.clone();

        thread::spawn(move || loop {
            thread::sleep(period);
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(E::from(event)).is_err() {
                // Receiver gone, nobody left to tick
                break;
            }
        });

        handle
    }

    fn once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let (handle, cancelled) = TimerHandle::new();
        let tx = self.tx.clone();

        thread::spawn(move || {
            thread::sleep(delay);
            if !cancelled.load(Ordering::SeqCst) {
                let _ = tx.send(E::from(event));
            }
        });

        handle
    }
}

/// A timer armed through [`ManualScheduler`]
#[derive(Clone, Debug)]
pub struct ArmedTimer {
    pub event: TimerEvent,
    pub interval: Duration,
    pub repeating: bool,
    cancelled: Arc<AtomicBool>,
}

impl ArmedTimer {
    pub fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
    }
}

/// Scheduler that never fires on its own; callers drive time explicitly
///
/// Clones share the same record of armed timers, so a test can keep one
/// clone while the session owns the other.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    armed: Rc<RefCell<Vec<ArmedTimer>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every timer ever armed, in arming order
    pub fn armed(&self) -> Vec<ArmedTimer> {
        self.armed.borrow().clone()
    }

    /// Events of timers that have not been cancelled
    pub fn live(&self) -> Vec<TimerEvent> {
        self.armed
            .borrow()
            .iter()
            .filter(|t| t.is_live())
            .map(|t| t.event)
            .collect()
    }

    pub fn live_count(&self, kind: TimerKind) -> usize {
        self.live().iter().filter(|e| e.kind == kind).count()
    }

    fn arm(&mut self, interval: Duration, event: TimerEvent, repeating: bool) -> TimerHandle {
        let (handle, cancelled) = TimerHandle::new();
        self.armed.borrow_mut().push(ArmedTimer {
            event,
            interval,
            repeating,
            cancelled,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn repeating(&mut self, period: Duration, event: TimerEvent) -> TimerHandle {
        self.arm(period, event, true)
    }

    fn once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.arm(delay, event, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn tick(generation: u64) -> TimerEvent {
        TimerEvent {
            kind: TimerKind::Tick,
            generation,
        }
    }

    #[test]
    fn test_handle_cancels_on_drop() {
        let (handle, flag) = TimerHandle::new();
        assert!(!handle.is_cancelled());
        drop(handle);
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_manual_scheduler_tracks_live_timers() {
        let mut scheduler = ManualScheduler::new();
        let observer = scheduler.clone();

        let first = scheduler.repeating(Duration::from_secs(1), tick(1));
        let _second = scheduler.once(
            Duration::from_secs(5),
            TimerEvent {
                kind: TimerKind::Celebration,
                generation: 2,
            },
        );
        assert_eq!(observer.live().len(), 2);

        first.cancel();
        assert_eq!(observer.live_count(TimerKind::Tick), 0);
        assert_eq!(observer.live_count(TimerKind::Celebration), 1);
        assert_eq!(observer.armed().len(), 2);
        assert!(observer.armed()[0].repeating);
    }

    #[test]
    fn test_thread_scheduler_delivers_until_cancelled() {
        let (tx, rx) = mpsc::channel::<TimerEvent>();
        let mut scheduler = ThreadScheduler::new(tx);

        let handle = scheduler.repeating(Duration::from_millis(5), tick(7));
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, tick(7));

        handle.cancel();
        // Drain anything already in flight, then expect silence
        thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_thread_scheduler_once_can_be_cancelled() {
        let (tx, rx) = mpsc::channel::<TimerEvent>();
        let mut scheduler = ThreadScheduler::new(tx);

        let handle = scheduler.once(Duration::from_millis(50), tick(1));
        drop(handle);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
