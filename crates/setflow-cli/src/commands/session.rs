use std::path::PathBuf;
use std::time::Duration;

use clap::Subcommand;
use setflow_core::storage::CompletionStore;
use setflow_core::{
    lookup_or_none, Config, Database, Event, NoVideo, SessionEngine, VideoDirectory, VideoLookup,
};

use super::load_plan;

const ENGINE_KEY: &str = "session_engine";
const LAST_TICK_KEY: &str = "session_last_tick_ms";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a session from a plan file
    Start {
        /// Path to a JSON plan file
        #[arg(long)]
        file: PathBuf,
    },
    /// Advance the countdowns and print current state as JSON
    Status,
    /// Count one rep of the active exercise
    Rep,
    /// Complete the current set
    CompleteSet,
    /// Force-complete the current set without meeting the rep target
    SkipSet,
    /// End the current exercise now
    CompleteExercise,
    /// Begin the next exercise (from rest)
    Next,
    /// Skip the rest period
    SkipRest,
    /// Pause the session
    Pause,
    /// Resume a paused session
    Resume,
    /// Exit the session, saving a partial completion record
    Abandon {
        /// Optional 1-5 rating stored with the record
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Look up a guidance video for the current exercise
    Video,
}

fn load_engine(db: &Database) -> Result<Option<SessionEngine>, Box<dyn std::error::Error>> {
    match db.kv_get(ENGINE_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn require_engine(db: &Database) -> Result<SessionEngine, Box<dyn std::error::Error>> {
    load_engine(db)?
        .ok_or_else(|| "no active session; run 'setflow session start --file <plan.json>'".into())
}

fn save_engine(db: &Database, engine: &SessionEngine) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(ENGINE_KEY, &serde_json::to_string(engine)?)?;
    Ok(())
}

fn clear_engine(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_delete(ENGINE_KEY)?;
    db.kv_delete(LAST_TICK_KEY)?;
    Ok(())
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Feed wall-clock time elapsed since the last invocation into the
/// engine, in whole seconds. The sub-second remainder stays banked in
/// the kv store so no time is lost between invocations.
fn tick_elapsed(
    db: &Database,
    engine: &mut SessionEngine,
) -> Result<Option<Event>, Box<dyn std::error::Error>> {
    let now = now_ms();
    let last = db
        .kv_get(LAST_TICK_KEY)?
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(now);
    let delta_secs = (now.saturating_sub(last) / 1000) as u32;
    let event = if delta_secs > 0 {
        engine.tick(delta_secs)
    } else {
        None
    };
    db.kv_set(LAST_TICK_KEY, &(last + u64::from(delta_secs) * 1000).to_string())?;
    Ok(event)
}

/// When a command drove the session to completion: persist (if
/// configured) and drop the stored engine. Returns true if finalized.
fn finalize_if_completed(
    db: &Database,
    config: &Config,
    engine: &SessionEngine,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !engine.is_completed() {
        return Ok(false);
    }
    if config.session.auto_save {
        if let Some(data) = engine.completion_data() {
            db.save_completion(&config.user.id, &data)?;
        }
    }
    clear_engine(db)?;
    Ok(true)
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Apply a simple engine command, print the resulting event (or the
/// current snapshot when the command was a no-op), and store the engine
/// back -- or finalize it if the command completed the session.
fn apply(
    db: &Database,
    config: &Config,
    mut engine: SessionEngine,
    command: impl FnOnce(&mut SessionEngine) -> Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command(&mut engine) {
        Some(event) => print_event(&event)?,
        None => {
            eprintln!("note: command not valid in the current phase; ignored");
            print_event(&engine.snapshot())?;
        }
    }
    if !finalize_if_completed(db, config, &engine)? {
        save_engine(db, &engine)?;
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        SessionAction::Start { file } => {
            if load_engine(&db)?.is_some() {
                return Err("a session is already active; abandon it first".into());
            }
            let plan = load_plan(&file)?;
            let mut engine = SessionEngine::new(plan)?;
            if let Some(event) = engine.start() {
                print_event(&event)?;
            }
            save_engine(&db, &engine)?;
            db.kv_set(LAST_TICK_KEY, &now_ms().to_string())?;
        }
        SessionAction::Status => {
            let mut engine = require_engine(&db)?;
            let completed = tick_elapsed(&db, &mut engine)?;
            print_event(&engine.snapshot())?;
            if let Some(event) = completed {
                print_event(&event)?;
            }
            if !finalize_if_completed(&db, &config, &engine)? {
                save_engine(&db, &engine)?;
            }
        }
        SessionAction::Rep => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::increment_rep)?;
        }
        SessionAction::CompleteSet => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::complete_set)?;
        }
        SessionAction::SkipSet => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::skip_current_set)?;
        }
        SessionAction::CompleteExercise => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::complete_exercise)?;
        }
        SessionAction::Next => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::start_next_exercise)?;
        }
        SessionAction::SkipRest => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::skip_rest)?;
        }
        SessionAction::Pause => {
            let engine = require_engine(&db)?;
            apply(&db, &config, engine, SessionEngine::pause)?;
        }
        SessionAction::Resume => {
            let mut engine = require_engine(&db)?;
            let event = engine.resume();
            match event {
                Some(event) => print_event(&event)?,
                None => eprintln!("note: session is not paused"),
            }
            // Restart the wall clock so paused time is not replayed.
            db.kv_set(LAST_TICK_KEY, &now_ms().to_string())?;
            save_engine(&db, &engine)?;
        }
        SessionAction::Abandon { rating } => {
            let engine = require_engine(&db)?;
            match engine.partial_completion() {
                Some(mut partial) => {
                    partial.rating = rating;
                    db.save_completion(&config.user.id, &partial)?;
                    println!("{}", serde_json::to_string_pretty(&partial)?);
                }
                None => eprintln!("note: nothing to save; session never started"),
            }
            clear_engine(&db)?;
        }
        SessionAction::Video => {
            let engine = require_engine(&db)?;
            let exercise = engine
                .current_exercise()
                .map(|e| e.name.clone())
                .ok_or("no active exercise")?;
            let lookup: Box<dyn VideoLookup> = match &config.video.base_url {
                Some(url) => Box::new(VideoDirectory::new(url.clone())),
                None => Box::new(NoVideo),
            };
            let timeout = Duration::from_secs(config.video.lookup_timeout_secs);
            let rt = tokio::runtime::Runtime::new()?;
            let video = rt.block_on(lookup_or_none(lookup.as_ref(), &exercise, timeout));
            println!("{}", serde_json::to_string_pretty(&video)?);
        }
    }
    Ok(())
}
