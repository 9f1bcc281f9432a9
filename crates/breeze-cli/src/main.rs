use clap::{Parser, Subcommand};

use breeze_core::{builtin_rhythms, get_rhythm, FlowState, MoodScore, MoodSessionFlow, Narrator};
use breeze_store::HistoryStore;

#[derive(Parser)]
#[command(name = "breeze", about = "Breathing-session timer")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in breathing rhythms
    Rhythms {},
    /// Run a scripted session over simulated one-second ticks
    Demo {
        #[arg(long, default_value = "3-6")]
        rhythm: String,
        #[arg(long, default_value_t = 1)]
        minutes: u32,
        /// Persist the finished record to this history database
        #[arg(long)]
        db: Option<String>,
        /// Print the narration a voice guide would speak
        #[arg(long)]
        voice: bool,
    },
    /// Print the session history, most recent first
    History { db: String },
    /// Remove all history records
    Clear { db: String },
}

/// Narrator that prints what speech synthesis would say
struct ConsoleNarrator;

impl Narrator for ConsoleNarrator {
    fn speak(&mut self, text: &str) {
        println!("  voice: {}", text);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Rhythms {} => {
            let mut rhythms: Vec<_> = builtin_rhythms().into_values().collect();
            rhythms.sort_by(|a, b| a.id.cmp(&b.id));
            for rhythm in rhythms {
                println!("{:8} {:16} {}", rhythm.id, rhythm.name, rhythm.description);
            }
        }
        Commands::Demo {
            rhythm,
            minutes,
            db,
            voice,
        } => {
            let rhythm =
                get_rhythm(&rhythm).ok_or_else(|| format!("unknown rhythm: {}", rhythm))?;
            println!("Session: {} for {} min", rhythm.name, minutes);

            let mut flow = MoodSessionFlow::new(rhythm, minutes);
            if voice {
                flow.set_voice(true);
                flow.set_narrator(Box::new(ConsoleNarrator));
            }
            if let Some(path) = &db {
                flow.set_history(Box::new(HistoryStore::open(path)?));
            }

            flow.request_start();
            flow.select_mood(MoodScore::new(3)?, 0);

            let total_secs = minutes as i64 * 60;
            let mut last_label = String::new();
            if let Some(step) = flow.current_step() {
                last_label = step.label.clone();
                println!("[{:4}s] {}", 0, step.label);
            }
            for s in 1..=total_secs {
                flow.tick(s * 1_000_000);
                if flow.state() != FlowState::Running {
                    break;
                }
                if let Some(step) = flow.current_step() {
                    if step.label != last_label {
                        last_label = step.label.clone();
                        println!("[{:4}s] {}", s, step.label);
                    }
                }
            }

            let record = flow
                .select_mood(MoodScore::new(4)?, (total_secs + 1) * 1_000_000)
                .ok_or("session did not complete")?;
            println!(
                "Finished: {}s of {}, mood {} -> {}",
                record.duration_seconds,
                record.rhythm_id,
                record.mood_before.get(),
                record.mood_after.get()
            );
        }
        Commands::History { db } => {
            let store = HistoryStore::open(&db)?;
            if store.list().is_empty() {
                println!("No sessions recorded");
            }
            for record in store.list() {
                println!(
                    "{}  {:8} {:4}s  mood {} -> {}",
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.rhythm_id,
                    record.duration_seconds,
                    record.mood_before.get(),
                    record.mood_after.get()
                );
            }
        }
        Commands::Clear { db } => {
            let mut store = HistoryStore::open(&db)?;
            store.clear()?;
            println!("History cleared");
        }
    }
    Ok(())
}
