use anyhow::{Context, Result};
use chirpy_core::config::Config;
use chirpy_core::core_auth::{Authenticator, TokenPurpose};
use chirpy_core::core_store::{ChirpId, Store, UpgradeEvent, UserId};
use chirpy_core::logging::init_logging_with_config;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "chirpy")]
#[command(author, version, about = "Operator tool for a Chirpy database", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides the configured store path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database file if it does not exist
    Init,
    /// Show record counts
    Status,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage chirps
    #[command(subcommand)]
    Chirp(ChirpCommand),
    /// Issue, check and revoke tokens
    #[command(subcommand)]
    Token(TokenCommand),
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Update {
        #[arg(required_unless_present = "token", conflicts_with = "token")]
        id: Option<u64>,
        /// Access token identifying the user to update
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Grant Chirpy Red, by id or from a webhook payload
    Upgrade {
        #[arg(required_unless_present = "event", conflicts_with = "event")]
        id: Option<u64>,
        /// Raw webhook JSON, e.g. '{"event":"user.upgraded","data":{"user_id":1}}'
        #[arg(long)]
        event: Option<String>,
    },
    Get {
        id: u64,
    },
    List,
    /// Check credentials and print a fresh token pair
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum ChirpCommand {
    Create {
        body: String,
        /// Author id
        #[arg(long, required_unless_present = "token", conflicts_with = "token")]
        author: Option<u64>,
        /// Access token identifying the author
        #[arg(long)]
        token: Option<String>,
    },
    Delete {
        id: u64,
        /// Id of the user asking for the delete
        #[arg(long = "as", required_unless_present = "token", conflicts_with = "token")]
        requester: Option<u64>,
        /// Access token identifying the requester
        #[arg(long)]
        token: Option<String>,
    },
    Get {
        id: u64,
    },
    List {
        /// Only chirps by this author
        #[arg(long)]
        author: Option<u64>,
        /// Newest first
        #[arg(long)]
        desc: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Sign a token for a user without checking credentials
    Issue {
        user_id: u64,
        #[arg(long, value_enum, default_value_t = Purpose::Access)]
        purpose: Purpose,
        /// Lifetime, e.g. "15m" (defaults to the configured TTL)
        #[arg(long, value_parser = humantime::parse_duration)]
        ttl: Option<Duration>,
    },
    /// Exchange a refresh token for a new access token
    Refresh {
        token: String,
    },
    /// Revoke a refresh token
    Revoke {
        token: String,
    },
    /// Verify a token and print its claims
    Check {
        token: String,
        #[arg(long, value_enum, default_value_t = Purpose::Access)]
        purpose: Purpose,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration (secret redacted)
    Show,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Access,
    Refresh,
}

impl From<Purpose> for TokenPurpose {
    fn from(purpose: Purpose) -> Self {
        match purpose {
            Purpose::Access => TokenPurpose::Access,
            Purpose::Refresh => TokenPurpose::Refresh,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging_with_config(config.logging.to_log_config()?)?;
    debug!(store = %config.store.path.display(), "Configuration loaded");

    match args.command {
        Command::Init => {
            let store = open_store(&config)?;
            info!(path = %store.path().display(), "Database ready");
            print_json(&json!({
                "path": store.path(),
                "stats": store.stats()?,
            }))
        }
        Command::Status => {
            let store = open_store(&config)?;
            print_json(&store.stats()?)
        }
        Command::User(cmd) => run_user(&config, cmd),
        Command::Chirp(cmd) => run_chirp(&config, cmd),
        Command::Token(cmd) => run_token(&config, cmd),
        Command::Config(ConfigCommand::Show) => {
            let mut shown = config.clone();
            if !shown.auth.jwt_secret.is_empty() {
                shown.auth.jwt_secret = "<redacted>".to_string();
            }
            print_json(&shown)
        }
    }
}

/// File (or defaults), then `CHIRPY_*` environment, then command-line flags
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;

    if let Some(db) = &args.db {
        config.store.path = db.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.to_lowercase();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

fn open_store(config: &Config) -> Result<Arc<Store>> {
    let store = Store::open(config.store.path.clone())
        .with_context(|| format!("failed to open database {}", config.store.path.display()))?;
    Ok(Arc::new(store))
}

fn authenticator(config: &Config) -> Result<Authenticator> {
    let signer = config.auth.signer()?;
    Ok(Authenticator::new(open_store(config)?, signer)
        .with_ttls(config.auth.access_token_ttl, config.auth.refresh_token_ttl))
}

/// Resolve the acting user from an explicit id or an access token
fn acting_user(config: &Config, id: Option<u64>, token: Option<&str>) -> Result<UserId> {
    match (id, token) {
        (Some(id), _) => Ok(UserId(id)),
        (None, Some(token)) => Ok(authenticator(config)?
            .authenticate(token)
            .context("access token rejected")?),
        (None, None) => anyhow::bail!("either a user id or an access token is required"),
    }
}

fn run_user(config: &Config, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Create { email, password } => {
            let user = open_store(config)?.create_user(&email, &password)?;
            print_json(&user)
        }
        UserCommand::Update { id, token, email, password } => {
            let id = acting_user(config, id, token.as_deref())?;
            let user = open_store(config)?.update_user(id, &email, &password)?;
            print_json(&user)
        }
        UserCommand::Upgrade { id, event } => {
            let event = match (id, event) {
                (_, Some(raw)) => serde_json::from_str::<UpgradeEvent>(&raw)
                    .context("webhook payload is not a valid upgrade event")?,
                (Some(id), None) => UpgradeEvent::user_upgraded(UserId(id)),
                (None, None) => anyhow::bail!("either a user id or --event is required"),
            };
            match open_store(config)?.apply_upgrade_event(&event)? {
                Some(user) => print_json(&user.view()),
                None => print_json(&json!({ "ignored": event.event })),
            }
        }
        UserCommand::Get { id } => {
            let user = open_store(config)?.get_user(UserId(id))?;
            print_json(&user.view())
        }
        UserCommand::List => {
            let users: Vec<_> = open_store(config)?
                .list_users()?
                .iter()
                .map(|u| u.view())
                .collect();
            print_json(&users)
        }
        UserCommand::Login { email, password } => {
            let session = authenticator(config)?.login(&email, &password)?;
            print_json(&session)
        }
    }
}

fn run_chirp(config: &Config, cmd: ChirpCommand) -> Result<()> {
    match cmd {
        ChirpCommand::Create { body, author, token } => {
            let author = acting_user(config, author, token.as_deref())?;
            let body = config.content.filter().clean(&body)?;
            let chirp = open_store(config)?.create_chirp(&body, author)?;
            print_json(&chirp)
        }
        ChirpCommand::Delete { id, requester, token } => {
            let requester = acting_user(config, requester, token.as_deref())?;
            open_store(config)?.delete_chirp(ChirpId(id), requester)?;
            print_json(&json!({ "deleted": id }))
        }
        ChirpCommand::Get { id } => {
            let chirp = open_store(config)?.get_chirp(ChirpId(id))?;
            print_json(&chirp)
        }
        ChirpCommand::List { author, desc } => {
            let mut chirps = open_store(config)?.list_chirps(author.map(UserId))?;
            if desc {
                chirps.reverse();
            }
            print_json(&chirps)
        }
    }
}

fn run_token(config: &Config, cmd: TokenCommand) -> Result<()> {
    match cmd {
        TokenCommand::Issue { user_id, purpose, ttl } => {
            let purpose = TokenPurpose::from(purpose);
            let ttl = ttl.unwrap_or(match purpose {
                TokenPurpose::Access => config.auth.access_token_ttl,
                TokenPurpose::Refresh => config.auth.refresh_token_ttl,
            });
            let token = config.auth.signer()?.issue(UserId(user_id), purpose, ttl)?;
            print_json(&json!({ "token": token }))
        }
        TokenCommand::Refresh { token } => {
            let token = authenticator(config)?.refresh(&token)?;
            print_json(&json!({ "token": token }))
        }
        TokenCommand::Revoke { token } => {
            authenticator(config)?.revoke(&token)?;
            print_json(&json!({ "revoked": true }))
        }
        TokenCommand::Check { token, purpose } => {
            let claims = config.auth.signer()?.validate(&token, purpose.into())?;
            let revoked = open_store(config)?.is_revoked(&token)?;
            print_json(&json!({ "claims": claims, "revoked": revoked }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
