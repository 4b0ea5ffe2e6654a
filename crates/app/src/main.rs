use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use services::{
    ApiConfig, AppServices, AttemptAccess, AttemptFlowService, AuthGate, Clock, QuizService,
    SessionService,
};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn auth_gate(&self) -> AuthGate {
        self.services.auth_gate()
    }

    fn session(&self) -> Arc<SessionService> {
        self.services.session()
    }

    fn quizzes(&self) -> Arc<QuizService> {
        self.services.quizzes()
    }

    fn attempt_flow(&self) -> Arc<AttemptFlowService> {
        self.services.attempt_flow()
    }
}

struct Args {
    db_url: String,
    api: ApiConfig,
    attempt_access: AttemptAccess,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--api <base_url>] [--require-auth-attempts]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quizdesk.sqlite3");
    eprintln!("  --api {}", services::api::DEFAULT_BASE_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZDESK_DB_URL, QUIZDESK_API_URL, QUIZDESK_ANON_ATTEMPTS");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZDESK_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quizdesk.sqlite3".into(), normalize_sqlite_url);
        let mut api_url = std::env::var("QUIZDESK_API_URL")
            .ok()
            .unwrap_or_else(|| services::api::DEFAULT_BASE_URL.to_owned());
        let mut attempt_access = match std::env::var("QUIZDESK_ANON_ATTEMPTS").ok().as_deref() {
            Some("0" | "false" | "no") => AttemptAccess::RequiresAuth,
            _ => AttemptAccess::Public,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => {
                    api_url = require_value(args, "--api")?;
                }
                "--require-auth-attempts" => {
                    attempt_access = AttemptAccess::RequiresAuth;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let api = ApiConfig::parse(&api_url).map_err(|_| ArgsError::InvalidApiUrl {
            raw: api_url.clone(),
        })?;

        Ok(Self {
            db_url,
            api,
            attempt_access,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        &parsed.api,
        Clock::default_clock(),
        parsed.attempt_access,
    )
    .await?;

    // Restore a persisted session before the first render. A transient
    // reconciliation failure keeps the stored token; the UI simply starts
    // signed out.
    if let Err(err) = services.session().restore().await {
        tracing::warn!(error = %err, "could not restore the previous session");
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quizdesk")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_leaves_memory_and_full_urls_alone() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3".into()),
            "sqlite:///tmp/x.sqlite3"
        );
    }

    #[test]
    fn normalize_absolutizes_bare_paths() {
        let normalized = normalize_sqlite_url("sqlite:relative.sqlite3".into());
        assert!(normalized.starts_with("sqlite://"));
        assert!(normalized.ends_with("relative.sqlite3"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let mut args = ["--frobnicate".to_owned()].into_iter();
        assert!(matches!(
            Args::parse(&mut args),
            Err(ArgsError::UnknownArg(_))
        ));
    }
}
