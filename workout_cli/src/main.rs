mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workout_core::*;

#[derive(Parser)]
#[command(name = "wtimer")]
#[command(about = "Interval workout timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved trainings (default)
    List,

    /// Show the playback sequence of a training
    Show {
        /// Training id or name
        training: String,
    },

    /// List catalog exercises
    Exercises {
        /// Only show exercises whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a custom exercise to the catalog
    AddExercise {
        #[arg(long)]
        name: String,

        /// Default duration in seconds
        #[arg(long)]
        duration: u32,
    },

    /// Create a new training
    Create {
        #[arg(long)]
        name: String,

        /// Rest between exercises in seconds
        #[arg(long)]
        rest: Option<u32>,

        /// Catalog exercise as ID or ID:SECONDS (repeatable)
        #[arg(long = "exercise")]
        exercises: Vec<String>,

        /// New custom exercise as NAME:SECONDS, appended after --exercise entries
        #[arg(long = "new-exercise")]
        new_exercises: Vec<String>,
    },

    /// Edit an existing training
    Edit {
        /// Training id or name
        training: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        rest: Option<u32>,

        /// Remove the exercise at this position (1-based)
        #[arg(long)]
        remove: Option<usize>,

        /// Move the exercise at this position up one place
        #[arg(long)]
        up: Option<usize>,

        /// Move the exercise at this position down one place
        #[arg(long)]
        down: Option<usize>,

        /// Set a duration as POSITION:SECONDS (repeatable)
        #[arg(long = "duration")]
        durations: Vec<String>,

        /// Append a catalog exercise as ID or ID:SECONDS (repeatable)
        #[arg(long = "add")]
        additions: Vec<String>,

        /// Append a new custom exercise as NAME:SECONDS (repeatable)
        #[arg(long = "new-exercise")]
        new_exercises: Vec<String>,
    },

    /// Delete a training
    Delete {
        /// Training id or name
        training: String,
    },

    /// Run a training session
    Run {
        /// Training id or name
        training: String,

        /// Start immediately and run to completion without reading input
        #[arg(long)]
        auto: bool,

        /// Override the countdown tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    workout_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    let library = Library::open(Box::new(JsonStore::new(&data_dir)))?;
    let mut shell = Shell::new(library, config.session.default_rest_seconds);

    match cli.command {
        Some(Commands::List) | None => cmd_list(&shell),
        Some(Commands::Show { training }) => cmd_show(&shell, &training),
        Some(Commands::Exercises { search }) => cmd_exercises(&shell, search.as_deref()),
        Some(Commands::AddExercise { name, duration }) => {
            let exercise = shell.library_mut().add_custom_exercise(&name, duration)?;
            println!("✓ Added exercise '{}' ({}s)", exercise.name, exercise.duration);
            println!("  id: {}", exercise.id);
            Ok(())
        }
        Some(Commands::Create {
            name,
            rest,
            exercises,
            new_exercises,
        }) => {
            let mut draft = shell.open_editor(None)?;
            draft.set_name(name);
            if let Some(rest) = rest {
                draft.set_rest_time(rest);
            }
            add_exercises(&mut shell, &mut draft, &exercises, &new_exercises)?;

            let training = shell.save_from_editor(&draft)?;
            println!("✓ Created training '{}'", training.name);
            println!("  id: {}", training.id);
            Ok(())
        }
        Some(Commands::Edit {
            training,
            name,
            rest,
            remove,
            up,
            down,
            durations,
            additions,
            new_exercises,
        }) => {
            let mut draft = shell.open_editor(Some(training.as_str()))?;
            if let Some(name) = name {
                draft.set_name(name);
            }
            if let Some(rest) = rest {
                draft.set_rest_time(rest);
            }
            if let Some(position) = remove {
                draft
                    .remove_exercise(to_index(position)?)
                    .ok_or_else(|| no_exercise_at(position))?;
            }
            if let Some(position) = up {
                if !draft.move_exercise(to_index(position)?, Direction::Up) {
                    println!("  (exercise {} is already first)", position);
                }
            }
            if let Some(position) = down {
                if !draft.move_exercise(to_index(position)?, Direction::Down) {
                    println!("  (exercise {} is already last)", position);
                }
            }
            for spec in &durations {
                let (position, seconds) = parse_position_duration(spec)?;
                draft.set_duration(to_index(position)?, seconds)?;
            }
            add_exercises(&mut shell, &mut draft, &additions, &new_exercises)?;

            let training = shell.save_from_editor(&draft)?;
            println!("✓ Updated training '{}'", training.name);
            Ok(())
        }
        Some(Commands::Delete { training }) => {
            let removed = shell.delete(&training)?;
            println!("✓ Deleted training '{}'", removed.name);
            Ok(())
        }
        Some(Commands::Run {
            training,
            auto,
            tick_ms,
        }) => {
            if let Some(tick_ms) = tick_ms {
                if tick_ms == 0 {
                    return Err(Error::Validation("--tick-ms must be positive".into()));
                }
                config.session.tick_millis = tick_ms;
            }
            let training = shell.select(&training)?.clone();
            let sequence = shell.library().sequence_for(&training);
            runner::run(&training, sequence, &config, auto)?;
            Ok(())
        }
    }
}

fn cmd_list(shell: &Shell) -> Result<()> {
    let library = shell.library();
    if library.trainings().is_empty() {
        println!("No trainings yet. Create one!");
        return Ok(());
    }

    for training in library.trainings() {
        let sequence = library.sequence_for(training);
        println!(
            "  {:<24} {} exercises, rest {}s, total {}",
            training.name,
            training.exercises.len(),
            training.rest_time,
            format_time(sequence.total_time())
        );
        println!("    id: {}", training.id);
    }
    Ok(())
}

fn cmd_show(shell: &Shell, key: &str) -> Result<()> {
    let library = shell.library();
    let training = library.resolve(key)?;
    let sequence = library.sequence_for(training);

    println!("{}", training.name);
    println!("  rest between exercises: {}s", training.rest_time);
    println!();
    for (position, instance) in training.exercises.iter().enumerate() {
        println!(
            "  {:>2}. {:<28} {:>4}s",
            position + 1,
            library.catalog().display_name(&instance.exercise_id),
            instance.duration
        );
    }
    println!();
    println!(
        "  Sequence: {} items, total {}",
        sequence.len(),
        format_time(sequence.total_time())
    );
    for id in sequence.unresolved() {
        println!("  ! Unknown exercise '{}' is left out of sessions", id);
    }
    Ok(())
}

fn cmd_exercises(shell: &Shell, search: Option<&str>) -> Result<()> {
    let catalog = shell.library().catalog();
    let exercises = catalog.search(search.unwrap_or_default());
    if exercises.is_empty() {
        println!("No exercises found.");
        return Ok(());
    }

    for exercise in exercises {
        let mut tags = Vec::new();
        if exercise.custom {
            tags.push("custom");
        }
        if exercise.is_rest {
            tags.push("rest");
        }
        println!(
            "  {:<20} {:<24} {:>4}s  {}",
            exercise.id,
            exercise.name,
            exercise.duration,
            tags.join(", ")
        );
    }
    Ok(())
}

/// Append `--exercise`/`--add` entries, then any new custom exercises
fn add_exercises(
    shell: &mut Shell,
    draft: &mut TrainingDraft,
    existing: &[String],
    new_exercises: &[String],
) -> Result<()> {
    for spec in existing {
        let (id, seconds) = parse_exercise_ref(spec)?;
        draft.add_exercise(shell.library().catalog(), id)?;
        if let Some(seconds) = seconds {
            draft.set_duration(draft.exercises().len() - 1, seconds)?;
        }
    }

    for spec in new_exercises {
        let (name, seconds) = parse_named_duration(spec)?;
        let exercise =
            draft.create_custom_exercise(shell.library_mut().catalog_mut(), name, seconds)?;
        // Custom exercises are kept even if the training itself fails to save
        shell.library().persist()?;
        println!("✓ Added exercise '{}' ({}s)", exercise.name, exercise.duration);
    }
    Ok(())
}

/// `ID` or `ID:SECONDS`
fn parse_exercise_ref(spec: &str) -> Result<(&str, Option<u32>)> {
    match spec.rsplit_once(':') {
        Some((id, seconds)) => Ok((id.trim(), Some(parse_seconds(seconds, spec)?))),
        None => Ok((spec.trim(), None)),
    }
}

/// `NAME:SECONDS`
fn parse_named_duration(spec: &str) -> Result<(&str, u32)> {
    let (name, seconds) = spec
        .rsplit_once(':')
        .ok_or_else(|| Error::Validation(format!("Expected NAME:SECONDS, got '{}'", spec)))?;
    Ok((name, parse_seconds(seconds, spec)?))
}

/// `POSITION:SECONDS`
fn parse_position_duration(spec: &str) -> Result<(usize, u32)> {
    let (position, seconds) = spec
        .split_once(':')
        .ok_or_else(|| Error::Validation(format!("Expected POSITION:SECONDS, got '{}'", spec)))?;
    let position = position
        .trim()
        .parse()
        .map_err(|_| Error::Validation(format!("Invalid position in '{}'", spec)))?;
    Ok((position, parse_seconds(seconds, spec)?))
}

fn parse_seconds(text: &str, spec: &str) -> Result<u32> {
    text.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("Invalid seconds in '{}'", spec)))
}

fn to_index(position: usize) -> Result<usize> {
    position.checked_sub(1).ok_or_else(|| no_exercise_at(position))
}

fn no_exercise_at(position: usize) -> Error {
    Error::Validation(format!("No exercise at position {}", position))
}
