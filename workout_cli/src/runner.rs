//! Terminal front end for a countdown session.
//!
//! One event loop receives both timer events and keyboard commands over a
//! single channel, so the session is only ever touched from this thread.

use chrono::{DateTime, Local};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;
use workout_core::session::ItemStatus;
use workout_core::*;

/// Everything the event loop reacts to
enum Event {
    Timer(TimerEvent),
    Input(Command),
    InputClosed,
}

impl From<TimerEvent> for Event {
    fn from(event: TimerEvent) -> Self {
        Event::Timer(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Toggle,
    Skip,
    Reset,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "" | "p" => Some(Command::Toggle),
        "s" => Some(Command::Skip),
        "r" => Some(Command::Reset),
        "q" => Some(Command::Quit),
        _ => None,
    }
}

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
    NothingToPlay,
}

/// Rings the terminal bell for cues
struct TerminalCues {
    enabled: bool,
}

impl CuePlayer for TerminalCues {
    fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let bell = match cue {
            Cue::ItemStart => "\x07",
            Cue::Finish => "\x07\x07\x07",
        };
        print!("{}", bell);
        let _ = io::stdout().flush();
    }
}

/// Play `sequence` for `training` until it completes or the user quits
///
/// With `auto` the session starts immediately, stdin is ignored, and the
/// run ends as soon as the session completes.
pub fn run(training: &Training, sequence: Sequence, config: &Config, auto: bool) -> Result<Outcome> {
    for id in sequence.unresolved() {
        println!("  ! Unknown exercise '{}' left out of this session", id);
    }

    let (tx, rx) = mpsc::channel::<Event>();
    let scheduler = ThreadScheduler::new(tx.clone());
    let cues = TerminalCues {
        enabled: config.sound.enabled,
    };
    let mut session = Session::new(
        sequence,
        SessionSettings::from(&config.session),
        Box::new(scheduler),
        Box::new(cues),
    );

    print_overview(training, &session);

    if session.is_complete() {
        println!("\nNothing to play: this training has no exercises.");
        return Ok(Outcome::NothingToPlay);
    }

    if auto {
        drop(tx);
        session.start();
    } else {
        spawn_input(tx);
        print_controls();
    }

    let started_at = Local::now();
    let mut display = Display::default();
    display.render(&session, started_at)?;

    let outcome = loop {
        let Ok(event) = rx.recv() else {
            break Outcome::Quit;
        };

        match event {
            Event::Timer(timer) => session.handle_timer(timer),
            Event::Input(Command::Toggle) => session.toggle(),
            Event::Input(Command::Skip) => session.skip(),
            Event::Input(Command::Reset) => {
                session.reset();
                display = Display::default();
                println!("\n↺ Reset");
            }
            Event::Input(Command::Quit) | Event::InputClosed => {
                break if session.is_complete() {
                    Outcome::Completed
                } else {
                    Outcome::Quit
                };
            }
        }

        display.render(&session, started_at)?;

        if auto && session.is_complete() {
            break Outcome::Completed;
        }
    };

    tracing::info!("Session for '{}' ended: {:?}", training.name, outcome);
    Ok(outcome)
}

fn spawn_input(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(Event::Input(command)).is_err() {
                        return;
                    }
                }
                None => println!("  ? Unknown command '{}'", line.trim()),
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

fn print_overview(training: &Training, session: &Session) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", training.name);
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  {} items, total {}",
        session.sequence().len(),
        format_time(session.total_time())
    );
    for item in session.view().items {
        let marker = if item.is_rest { "·" } else { "•" };
        println!("  {} {:<28} {:>4}s", marker, item.name, item.duration);
    }
}

fn print_controls() {
    println!("─────────────────────────────────────────");
    println!("Enter or 'p' to start/pause, 's' skip, 'r' reset, 'q' quit");
}

/// Tracks what has already been printed
#[derive(Default)]
struct Display {
    shown_index: Option<usize>,
    announced: bool,
}

impl Display {
    fn render(&mut self, session: &Session, started_at: DateTime<Local>) -> Result<()> {
        let view = session.view();

        if view.state == SessionState::Complete {
            if !self.announced {
                self.announced = true;
                println!("\n\n🎉 {}", view.label);
                println!("  Great work! You finished your training.");
                println!(
                    "  {} of {} done, started at {}",
                    format_time(session.elapsed_time()),
                    format_time(session.total_time()),
                    started_at.format("%H:%M")
                );
            }
            return Ok(());
        }

        if self.shown_index != Some(session.current_index()) {
            self.shown_index = Some(session.current_index());
            let upcoming = view
                .items
                .iter()
                .find(|i| i.status == ItemStatus::Upcoming)
                .map(|i| i.name.as_str());
            println!(
                "\n▶ {} ({})",
                view.title.as_deref().unwrap_or_default(),
                view.label
            );
            if let Some(next) = upcoming {
                println!("  next: {}", next);
            }
        }

        let status = match view.state {
            SessionState::Idle if view.untouched => "ready",
            SessionState::Idle | SessionState::Paused => "paused",
            SessionState::Running => "running",
            SessionState::Complete => "done",
        };
        print!(
            "\r  {}  [{:<7}] {:>3}%  ",
            format_time(view.time_remaining),
            status,
            view.percent
        );
        io::stdout().flush()?;
        Ok(())
    }
}
