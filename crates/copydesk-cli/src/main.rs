use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use copydesk::collection::{Collection, Editable};
use copydesk::{
    Action, ClipIntent, Config, ConfigError, ContentKind, Desk, FjallBackend, IdeationSession,
    Metadata, StorageError, Timeframe, TransformSession,
};

mod logging;
mod output;

use output::Listing;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "copydesk.toml";

/// CLI-specific errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Library error (wraps all copydesk errors)
    #[error(transparent)]
    Library(#[from] copydesk::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging setup error
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),

    /// No record with the given id
    #[error("No {collection} record with id '{id}'")]
    NotFound { collection: &'static str, id: String },

    /// The content is already a favorite
    #[error("Content is already starred")]
    AlreadyStarred,

    /// The ledger already holds this (content, action) pair
    #[error("Already recorded as {0}")]
    DuplicateEvent(Action),

    /// The store refused a write
    #[error("Failed to {0}")]
    WriteFailed(&'static str),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        Self::Library(e.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Library(e.into())
    }
}

#[derive(Parser)]
#[command(name = "copydesk")]
#[command(about = "Drafts, favorites, idea clips, streaks and engagement analytics for marketing copy")]
struct Cli {
    /// Store path (overrides the config file)
    #[arg(long, global = true, env = "COPYDESK_PATH")]
    path: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store if it does not exist
    Init,

    /// Check in for today and show the daily streak
    Streak {
        /// Show the stored streak without checking in
        #[arg(long)]
        peek: bool,
    },

    /// Recent drafts (newest three)
    #[command(subcommand)]
    Drafts(DraftCommand),

    /// Starred favorites (newest twenty)
    #[command(subcommand)]
    Favorites(FavoriteCommand),

    /// Clipped ideas (newest fifty)
    #[command(subcommand)]
    Clips(ClipCommand),

    /// Copy/star analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommand),

    /// In-progress form snapshots
    #[command(subcommand)]
    Session(SessionCommand),

    /// Show today's spotlight product
    Spotlight,

    /// Remove every copydesk key from the store
    Reset,
}

/// Operations shared by every record collection.
#[derive(Subcommand)]
enum RecordCommand {
    /// List records, newest first
    List,

    /// Show one record in full
    Show {
        /// Record id
        id: String,
    },

    /// Replace a record's text
    Edit {
        /// Record id
        id: String,

        /// New text
        content: String,
    },

    /// Mark a record as posted
    Posted {
        /// Record id
        id: String,

        /// Clear the posted flag instead
        #[arg(long)]
        undo: bool,
    },

    /// Delete one or more records
    Delete {
        /// Record ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DraftCommand {
    /// Save a draft
    Add {
        /// Draft text
        content: String,

        /// Content type (daily-idea, adaptation, translation, raw-idea)
        #[arg(short, long, default_value = "raw-idea")]
        kind: ContentKind,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    #[command(flatten)]
    Record(RecordCommand),
}

#[derive(Subcommand)]
enum FavoriteCommand {
    /// Star content: save it as a favorite and record a `starred` event
    Add {
        /// Content to star
        content: String,

        /// Content type (daily-idea, adaptation, translation, raw-idea)
        #[arg(short, long, default_value = "raw-idea")]
        kind: ContentKind,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Check whether exact content is already a favorite
    Check {
        /// Content to look up
        content: String,
    },

    #[command(flatten)]
    Record(RecordCommand),
}

#[derive(Subcommand)]
enum ClipCommand {
    /// Clip an idea for later
    Add {
        /// Clipped text
        text: String,

        /// Source link
        #[arg(long)]
        url: Option<String>,

        /// What to turn the clip into
        #[arg(short, long, default_value = "general_rewrite")]
        intent: ClipIntent,

        /// Short note (cut to 100 characters)
        #[arg(long)]
        notes: Option<String>,
    },

    /// Replace or clear a clip's notes
    Notes {
        /// Clip id
        id: String,

        /// New notes; omit to clear
        notes: Option<String>,
    },

    #[command(flatten)]
    Record(RecordCommand),
}

/// Optional draft/favorite metadata fields.
#[derive(clap::Args)]
struct MetadataArgs {
    /// Target platform
    #[arg(long)]
    platform: Option<String>,

    /// Target audience
    #[arg(long)]
    audience: Option<String>,

    /// Featured product
    #[arg(long)]
    product: Option<String>,
}

impl MetadataArgs {
    fn into_metadata(self) -> Metadata {
        let mut metadata = Metadata::new();
        let fields = [
            ("platform", self.platform),
            ("audience", self.audience),
            ("product", self.product),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                metadata.insert(key.to_string(), serde_json::Value::String(value));
            }
        }
        metadata
    }
}

#[derive(Subcommand)]
enum AnalyticsCommand {
    /// Log an action on a piece of content
    Record {
        /// copied or starred
        action: Action,

        /// The content acted on
        content: String,

        /// Source label
        #[arg(short, long, default_value = "Raw Idea")]
        kind: String,

        /// Platform the content was copied for
        #[arg(long)]
        platform: Option<String>,

        /// Product the content features
        #[arg(long)]
        product: Option<String>,
    },

    /// Share of copies per platform
    Platforms {
        #[arg(short, long, default_value_t = Timeframe::Month)]
        timeframe: Timeframe,
    },

    /// Most and least attended products
    Products {
        #[arg(short, long, default_value_t = Timeframe::Month)]
        timeframe: Timeframe,
    },

    /// Number of unique assets touched
    Output {
        #[arg(short, long, default_value_t = Timeframe::Month)]
        timeframe: Timeframe,
    },

    /// Activity chart
    Activity {
        #[arg(short, long, default_value_t = Timeframe::Month)]
        timeframe: Timeframe,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Slot {
    Ideation,
    Transform,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Store a snapshot given as JSON (`-` reads stdin)
    Save { slot: Slot, snapshot: String },

    /// Print the stored snapshot
    Show { slot: Slot },

    /// Drop the stored snapshot
    Clear { slot: Slot },
}

/// Format an error for user-friendly display
fn format_error(err: &AppError) -> String {
    use std::io::IsTerminal;

    let use_colors = std::io::stderr().is_terminal();

    let (red, yellow, reset) = if use_colors {
        ("\x1b[0;31m", "\x1b[0;33m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let mut output = format!("{}Error:{} {}\n", red, reset, err);

    // Add hints for common errors
    if let Some(hint) = get_error_hint(err) {
        output.push_str(&format!("{}Hint:{} {}\n", yellow, reset, hint));
    }

    output
}

/// Get a helpful hint for common errors
fn get_error_hint(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Library(copydesk::Error::Storage(StorageError::InvalidFormat(_))) => {
            Some("The directory holds a store written by another version; pick a different --path")
        }
        AppError::Library(copydesk::Error::Storage(StorageError::QuotaExceeded { .. })) => {
            Some("Delete old records or run 'copydesk reset' to free space")
        }
        AppError::Library(copydesk::Error::Config(ConfigError::Parse(_))) => {
            Some("Check copydesk.toml: tables are [store], [catalog] and [logging]")
        }
        AppError::NotFound { .. } => {
            Some("Use 'copydesk <drafts|favorites|clips> list' to see available ids")
        }
        AppError::AlreadyStarred => {
            Some("Use 'copydesk favorites list' to find the existing favorite")
        }
        AppError::DuplicateEvent(_) => {
            Some("Each piece of content is counted once per action")
        }
        AppError::Json(_) => {
            Some("Session snapshots use camelCase fields, e.g. {\"sourceText\": \"...\"}")
        }
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprint!("{}", format_error(&err));
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, AppError> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Ok(Config::from_file(DEFAULT_CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

fn open_desk(path: &Path, config: &Config) -> Result<Desk, AppError> {
    let backend = FjallBackend::open(path)?;
    Ok(Desk::from_config(Arc::new(backend), config))
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.logging)?;

    let path = cli.path.clone().unwrap_or_else(|| config.store.path.clone());
    tracing::debug!(path = %path.display(), "opening store");
    let desk = open_desk(&path, &config)?;

    execute(&desk, &path, cli.command, cli.json)
}

fn execute(desk: &Desk, path: &Path, command: Commands, json: bool) -> Result<(), AppError> {
    match command {
        Commands::Init => {
            println!("Initialized copydesk store at {}", path.display());
            Ok(())
        }
        Commands::Streak { peek } => {
            let streak = desk.streak();
            let count = if peek { streak.peek() } else { streak.touch() };
            let state = streak.state();
            output::emit(json, &state, |state| output::streak(count, state.as_ref()))
        }
        Commands::Drafts(command) => match command {
            DraftCommand::Add {
                content,
                kind,
                metadata,
            } => {
                let drafts = desk.drafts();
                if !drafts.save(kind, &content, metadata.into_metadata()) {
                    return Err(AppError::WriteFailed("save draft"));
                }
                announce_newest(&drafts, json)
            }
            DraftCommand::Record(command) => run_record_command(&desk.drafts(), "draft", command, json),
        },
        Commands::Favorites(command) => match command {
            FavoriteCommand::Add {
                content,
                kind,
                metadata,
            } => {
                if desk.favorites().is_favorited(&content) {
                    return Err(AppError::AlreadyStarred);
                }
                if !desk.star(&content, kind, metadata.into_metadata()) {
                    return Err(AppError::WriteFailed("save favorite"));
                }
                announce_newest(&desk.favorites(), json)
            }
            FavoriteCommand::Check { content } => {
                let id = desk.favorites().find_id_by_content(&content);
                output::emit(json, &id, |id| match id {
                    Some(id) => format!("Starred as {id}"),
                    None => "Not starred".to_string(),
                })
            }
            FavoriteCommand::Record(command) => {
                run_record_command(&desk.favorites(), "favorite", command, json)
            }
        },
        Commands::Clips(command) => match command {
            ClipCommand::Add {
                text,
                url,
                intent,
                notes,
            } => {
                let clips = desk.clips();
                if !clips.save(&text, url.as_deref(), intent, notes.as_deref()) {
                    return Err(AppError::WriteFailed("save clip"));
                }
                announce_newest(&clips, json)
            }
            ClipCommand::Notes { id, notes } => {
                let clips = desk.clips();
                require(&clips, "clip", &id)?;
                if !clips.update_notes(&id, notes.as_deref()) {
                    return Err(AppError::WriteFailed("update notes"));
                }
                show(&clips, "clip", &id, json)
            }
            ClipCommand::Record(command) => run_record_command(&desk.clips(), "clip", command, json),
        },
        Commands::Analytics(command) => run_analytics(desk, command, json),
        Commands::Session(command) => run_session(desk, command, json),
        Commands::Spotlight => {
            let dashboard = desk.dashboard();
            if dashboard.is_first_visit() {
                if !json {
                    println!("Welcome to copydesk!");
                }
                dashboard.mark_visited();
            }
            let product = dashboard.product_of_day();
            output::emit(json, &product, |product| match product {
                Some(product) => format!("Today's spotlight: {product}"),
                None => "No products configured".to_string(),
            })
        }
        Commands::Reset => {
            if !desk.reset() {
                return Err(AppError::WriteFailed("remove every key"));
            }
            println!("Removed all copydesk data under prefix '{}'", desk.keys().prefix());
            Ok(())
        }
    }
}

fn require<R: Editable>(store: &Collection<'_, R>, collection: &'static str, id: &str) -> Result<R, AppError> {
    store.get_by_id(id).ok_or_else(|| AppError::NotFound {
        collection,
        id: id.to_string(),
    })
}

fn show<R: Editable + Listing>(
    store: &Collection<'_, R>,
    collection: &'static str,
    id: &str,
    json: bool,
) -> Result<(), AppError> {
    let record = require(store, collection, id)?;
    output::emit(json, &record, |r| r.detail())
}

fn announce_newest<R: Editable + Listing>(store: &Collection<'_, R>, json: bool) -> Result<(), AppError> {
    match store.list().first() {
        Some(record) => output::emit(json, record, |r| format!("Saved {}", r.line())),
        None => Err(AppError::WriteFailed("read back the saved record")),
    }
}

fn run_record_command<R: Editable + Listing>(
    store: &Collection<'_, R>,
    collection: &'static str,
    command: RecordCommand,
    json: bool,
) -> Result<(), AppError> {
    match command {
        RecordCommand::List => {
            let records = store.list();
            output::emit(json, &records, |records| output::records(records))
        }
        RecordCommand::Show { id } => show(store, collection, &id, json),
        RecordCommand::Edit { id, content } => {
            require(store, collection, &id)?;
            if !store.update_content(&id, &content) {
                return Err(AppError::WriteFailed("update record"));
            }
            show(store, collection, &id, json)
        }
        RecordCommand::Posted { id, undo } => {
            require(store, collection, &id)?;
            if !store.mark_posted(&id, !undo) {
                return Err(AppError::WriteFailed("update record"));
            }
            show(store, collection, &id, json)
        }
        RecordCommand::Delete { ids } => {
            let deleted = match ids.as_slice() {
                [id] => store.delete(id),
                ids => store.bulk_delete(ids),
            };
            if !deleted {
                let id = ids.first().cloned().unwrap_or_default();
                return Err(AppError::NotFound { collection, id });
            }
            println!("Deleted {} {collection} record(s)", ids.len());
            Ok(())
        }
    }
}

fn run_analytics(desk: &Desk, command: AnalyticsCommand, json: bool) -> Result<(), AppError> {
    let ledger = desk.analytics();
    match command {
        AnalyticsCommand::Record {
            action,
            content,
            kind,
            platform,
            product,
        } => {
            if !ledger.record(action, &content, &kind, platform.as_deref(), product.as_deref()) {
                return Err(AppError::DuplicateEvent(action));
            }
            println!("Recorded {action}");
            Ok(())
        }
        AnalyticsCommand::Platforms { timeframe } => {
            let shares = ledger.platform_distribution(timeframe);
            output::emit(json, &shares, |shares| output::platforms(shares))
        }
        AnalyticsCommand::Products { timeframe } => {
            let attention = ledger.product_attention(timeframe);
            output::emit(json, &attention, output::attention)
        }
        AnalyticsCommand::Output { timeframe } => {
            let count = ledger.creative_output(timeframe);
            output::emit(json, &count, |count| format!("{count} unique assets ({timeframe})"))
        }
        AnalyticsCommand::Activity { timeframe } => {
            let buckets = ledger.activity(timeframe);
            output::emit(json, &buckets, |buckets| output::activity(buckets))
        }
    }
}

fn read_snapshot(arg: &str) -> Result<String, AppError> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn print_snapshot<T: Serialize>(snapshot: Option<T>) -> Result<(), AppError> {
    match snapshot {
        Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        None => println!("null"),
    }
    Ok(())
}

fn run_session(desk: &Desk, command: SessionCommand, json: bool) -> Result<(), AppError> {
    match command {
        SessionCommand::Save { slot, snapshot } => {
            let raw = read_snapshot(&snapshot)?;
            let saved = match slot {
                Slot::Ideation => {
                    let session: IdeationSession = serde_json::from_str(&raw)?;
                    desk.ideation_session().save(session)
                }
                Slot::Transform => {
                    let session: TransformSession = serde_json::from_str(&raw)?;
                    desk.transform_session().save(session)
                }
            };
            if !saved {
                return Err(AppError::WriteFailed("save session"));
            }
            if !json {
                println!("Session saved");
            }
            Ok(())
        }
        // Snapshots are JSON documents, so both modes print JSON
        SessionCommand::Show { slot } => match slot {
            Slot::Ideation => print_snapshot(desk.ideation_session().load()),
            Slot::Transform => print_snapshot(desk.transform_session().load()),
        },
        SessionCommand::Clear { slot } => {
            let cleared = match slot {
                Slot::Ideation => desk.ideation_session().clear(),
                Slot::Transform => desk.transform_session().clear(),
            };
            if !cleared {
                return Err(AppError::WriteFailed("clear session"));
            }
            if !json {
                println!("Session cleared");
            }
            Ok(())
        }
    }
}
