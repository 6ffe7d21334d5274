use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use learn_core::model::exercise::{self, ExerciseSession};
use learn_core::model::{AppSettingsDraft, ContentBlock, Theme};
use services::{AppServices, Clock, LessonView};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum ArgsError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("no exercise number {index} (there are {count})")]
    UnknownExercise { index: usize, count: usize },
}

#[derive(Debug, Parser)]
#[command(name = "learn", version, about = "Lessons, progress and streaks from the terminal")]
struct Cli {
    /// SQLite database holding settings and progress.
    #[arg(long, global = true, env = "LEARN_DB_URL", default_value = "sqlite://learn.sqlite3")]
    db: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List modules with completion.
    Modules,
    /// Show a lesson.
    Lesson { id: String },
    /// Mark a lesson complete.
    Complete { id: String },
    /// Add or remove a bookmark.
    Bookmark { id: String },
    /// Overall completion, streak and XP.
    Stats,
    /// Show the lesson to continue with.
    Resume,
    /// Forget all progress.
    Reset,
    /// Show or change settings.
    Settings {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        font_size: Option<u8>,
    },
    /// Check an answer for one of the built-in exercises (numbered from 1).
    Exercise { index: usize, code: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid().into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn print_blocks(blocks: &[ContentBlock]) {
    for block in blocks {
        match block {
            ContentBlock::Heading { level, text } => {
                println!("{} {text}", "#".repeat(*level));
            }
            ContentBlock::Paragraph { text } => println!("{text}"),
            ContentBlock::Code { text } => {
                for line in text.lines() {
                    println!("    {line}");
                }
            }
            ContentBlock::List { .. } => println!("{}", block.plain_text()),
        }
        println!();
    }
}

fn print_lesson(view: &LessonView) {
    let module = view.module_title.as_deref().unwrap_or("?");
    println!("{} / {} ({} min)", module, view.lesson.title, view.lesson.duration_minutes);
    let mut flags = Vec::new();
    if view.is_completed {
        flags.push("completed");
    }
    if view.is_bookmarked {
        flags.push("bookmarked");
    }
    if !flags.is_empty() {
        println!("[{}]", flags.join(", "));
    }
    println!();

    print_blocks(&view.blocks);

    if let Some(code) = view.lesson.code_example.as_deref() {
        println!("Example:");
        print_blocks(&[ContentBlock::code(code)]);
    }
    if let Some(previous) = &view.previous {
        println!("previous: {previous}");
    }
    if let Some(next) = &view.next {
        println!("next: {next}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;
    tracing::debug!(db = %db_url, "opening database");

    let app = AppServices::new_sqlite(&db_url, Clock::default_clock()).await?;
    execute(&app, cli.command.unwrap_or(Command::Stats)).await
}

/// Runs one command, then waits for queued writes whether or not it failed.
async fn execute(app: &AppServices, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let result = dispatch(app, command);
    app.flush().await;
    result
}

fn dispatch(app: &AppServices, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let lessons = app.lessons();
    let progress = app.progress();

    match command {
        Command::Modules => {
            for overview in lessons.modules_overview() {
                let lock = if overview.module.is_locked { " (locked)" } else { "" };
                println!(
                    "{:<20} {:>3}%  {}/{}  {}{lock}",
                    overview.module.id.as_str(),
                    overview.stats.rounded_percentage(),
                    overview.stats.completed,
                    overview.stats.total,
                    overview.module.title,
                );
            }
        }
        Command::Lesson { id } => {
            let view = lessons.open_lesson(&id.into())?;
            print_lesson(&view);
        }
        Command::Complete { id } => {
            if lessons.complete_lesson(&id.clone().into())? {
                println!("completed {id} (+{} XP)", services::LESSON_XP);
            } else {
                println!("{id} was already completed");
            }
        }
        Command::Bookmark { id } => {
            let state = if lessons.toggle_bookmark(&id.clone().into())? {
                "bookmarked"
            } else {
                "removed bookmark for"
            };
            println!("{state} {id}");
        }
        Command::Stats => {
            let stats = lessons.overall_completion();
            let snapshot = progress.snapshot();
            println!(
                "{} of {} lessons completed ({}%)",
                stats.completed,
                stats.total,
                stats.rounded_percentage()
            );
            println!("streak: {} day(s)", snapshot.streak_days());
            println!("xp: {}", snapshot.xp());
            if !snapshot.bookmarked_lessons().is_empty() {
                let ids: Vec<&str> = snapshot
                    .bookmarked_lessons()
                    .iter()
                    .map(|id| id.as_str())
                    .collect();
                println!("bookmarks: {}", ids.join(", "));
            }
        }
        Command::Resume => match lessons.resume() {
            Some(lesson) => println!("continue with {} ({})", lesson.title, lesson.id),
            None => println!("no lessons available"),
        },
        Command::Reset => {
            progress.reset_progress();
            println!("progress reset");
        }
        Command::Settings {
            theme,
            notifications,
            font_size,
        } => {
            let settings_service = app.app_settings();
            let current = settings_service.settings();
            let settings = if theme.is_some() || notifications.is_some() || font_size.is_some() {
                let defaults = AppSettingsDraft::from_settings(&current);
                settings_service.save(AppSettingsDraft {
                    theme: theme.map(Theme::from).or(defaults.theme),
                    notifications: notifications.or(defaults.notifications),
                    code_editor_font_size: font_size.or(defaults.code_editor_font_size),
                })?
            } else {
                current
            };
            println!("theme: {:?}", settings.theme());
            println!("notifications: {}", settings.notifications());
            println!("code font size: {}", settings.code_editor_font_size());
        }
        Command::Exercise { index, code } => {
            let exercises = exercise::bundled_exercises();
            let count = exercises.len();
            if index == 0 || index > count {
                return Err(ArgsError::UnknownExercise { index, count }.into());
            }
            let mut session = ExerciseSession::new(exercises)
                .ok_or(ArgsError::UnknownExercise { index, count })?;
            for _ in 1..index {
                session.advance();
            }
            let current = session.current();
            println!("{} ({:?})", current.title, current.difficulty);
            println!("{}", session.submit(&code).feedback());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
