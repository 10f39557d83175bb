#![forbid(unsafe_code)]

mod commands;
mod source;
mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clap::builder::BoolishValueParser;
use quiz_core::{BuiltinBank, Clock, QuestionSource, QuizSettings, QuizSettingsDraft};
use services::SessionController;
use storage::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{Command, HELP};
use source::JsonFileSource;
use terminal::TerminalView;

/// Terminal quiz with resumable progress and a persistent high score.
#[derive(Debug, Parser)]
#[command(name = "quiz", version)]
struct Args {
    /// SQLite database holding saved progress and the high score.
    #[arg(long, env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    db: String,

    /// JSON question bank to use instead of the bundled one.
    #[arg(long, env = "QUIZ_QUESTIONS")]
    questions: Option<PathBuf>,

    /// Hours a saved quiz stays resumable.
    #[arg(long, env = "QUIZ_SNAPSHOT_TTL_HOURS")]
    snapshot_ttl_hours: Option<u32>,

    /// Present questions in a random order. The env var accepts 1/0, yes/no, on/off.
    #[arg(long, env = "QUIZ_SHUFFLE", value_parser = BoolishValueParser::new())]
    shuffle: bool,

    /// Start a new quiz right away, ignoring saved progress.
    #[arg(long)]
    fresh: bool,
}

#[derive(Debug)]
struct InvalidDbUrl {
    raw: String,
}

impl fmt::Display for InvalidDbUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid --db value: {}", self.raw)
    }
}

impl std::error::Error for InvalidDbUrl {}

fn build_settings(args: &Args) -> Result<QuizSettings, quiz_core::Error> {
    let draft = QuizSettingsDraft {
        snapshot_ttl_hours: args.snapshot_ttl_hours,
        shuffle_questions: Some(args.shuffle),
    };
    Ok(draft.validate()?)
}

fn normalize_sqlite_url(raw: &str) -> Result<String, InvalidDbUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidDbUrl {
            raw: raw.to_string(),
        });
    }
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return Ok(trimmed.to_string());
    }

    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// Make sure the database file and its directory exist before connecting.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .map(|rest| rest.split('?').next().unwrap_or(rest))
        .filter(|path| !path.is_empty())
        .ok_or_else(|| InvalidDbUrl {
            raw: db_url.to_string(),
        })?;

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let settings = build_settings(&args)?;

    let db_url = normalize_sqlite_url(&args.db)?;
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    info!(db = %db_url, "storage ready");

    let source: Box<dyn QuestionSource> = match &args.questions {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(BuiltinBank),
    };

    let mut controller = SessionController::new(
        source.as_ref(),
        Arc::clone(&storage.kv),
        settings,
        Clock::default_clock(),
    )
    .with_view(Box::new(TerminalView::new()));

    println!("High score: {}", controller.high_score().await);
    if args.fresh {
        controller.start(false).await;
    } else {
        controller.saved_progress().await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(&line);
        debug!(?command, "input");
        match command {
            Command::Start { resume } => {
                controller.start(resume).await;
            }
            Command::Select(index) => {
                if let Err(err) = controller.select_answer(index) {
                    println!("{err}");
                }
            }
            Command::Submit => {
                if controller.submit_answer().await.is_none() {
                    println!("Select an option first.");
                }
            }
            Command::Next => {
                controller.next_question().await;
            }
            Command::Reset => controller.reset().await,
            Command::Report => {
                if controller.errors().is_empty() {
                    println!("No errors recorded.");
                } else {
                    println!("{}", controller.error_report(user_agent()));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown => println!("Unknown command. Type `h` for help."),
        }
    }

    Ok(())
}

fn user_agent() -> &'static str {
    concat!("quiz/", env!("CARGO_PKG_VERSION"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("quiz").chain(extra.iter().copied()))
    }

    #[test]
    fn defaults_to_local_sqlite_file() {
        let args = args(&[]);
        assert_eq!(args.db, "sqlite://quiz.sqlite3");
        assert!(!args.fresh);
        assert_eq!(build_settings(&args).unwrap(), QuizSettings::default());
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        let err = build_settings(&args(&["--snapshot-ttl-hours", "0"])).unwrap_err();
        assert!(matches!(err, quiz_core::Error::Settings(_)));
    }

    #[test]
    fn shuffle_flag_reaches_settings() {
        let settings = build_settings(&args(&["--shuffle"])).unwrap();
        assert!(settings.shuffle_questions());
    }

    #[test]
    fn shuffle_env_accepts_boolish_values() {
        use clap::CommandFactory;
        use std::ffi::OsStr;

        let cmd = Args::command();
        let shuffle = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "shuffle")
            .unwrap();
        assert_eq!(shuffle.get_env(), Some(OsStr::new("QUIZ_SHUFFLE")));

        let parse = |raw: &str| {
            shuffle
                .get_value_parser()
                .parse_ref(&cmd, Some(shuffle), OsStr::new(raw))
        };
        for raw in ["1", "yes", "on", "true", "0", "no", "off", "false"] {
            assert!(parse(raw).is_ok(), "{raw} should parse");
        }
        assert!(parse("maybe").is_err());
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/quiz.db").unwrap();
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(normalize_sqlite_url("  ").is_err());
    }

    #[test]
    fn prepares_missing_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/quiz.sqlite3");
        let url = format!("sqlite://{}", path.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(path.exists());
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }
}
