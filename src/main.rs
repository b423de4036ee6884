use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doctag::store::DocumentSource;
use doctag::tagger::PromptBuilder;
use doctag::utils::{parse_variants, resolve_workspace_path};
use doctag::{ChatClientBuilder, Pipeline, StorageError, Workspace};
use time::OffsetDateTime;
use tracing::{debug, info};

/// doctag - tag plain-text documents against a controlled vocabulary with an LLM
#[derive(Parser)]
#[command(name = "doctag")]
#[command(about = "Batch-tag text documents with an LLM and normalize variant spellings")]
#[command(version)]
struct Cli {
    /// Workspace directory (defaults to $DOCTAG_HOME, then the user data dir)
    #[arg(short, long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Copy .txt files into the inputs folder
    Add(AddCommand),
    /// List input documents that have no output yet
    Pending,
    /// Tag every pending document
    Run,
    /// Browse or delete tagged outputs
    #[command(subcommand)]
    Outputs(OutputsCommand),
    /// Manage the tag vocabulary
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Show or change model settings and the prompt template
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Add documents
#[derive(Parser)]
struct AddCommand {
    /// Files to add; only names ending in .txt are accepted
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum OutputsCommand {
    /// List output names
    List,
    /// Print an output
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Delete an output so its input is tagged again on the next run
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand)]
enum TagsCommand {
    /// List tags with their variants
    List,
    /// Add or replace a tag
    Set {
        /// Canonical tag name
        #[arg(value_name = "NAME")]
        name: String,

        /// Comma-separated variant spellings
        #[arg(long, value_name = "VARIANTS", default_value = "")]
        variants: String,
    },
    /// Delete a tag
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings (API key masked)
    Show,
    /// Update selected settings fields
    Set(SettingsSetCommand),
}

#[derive(Parser)]
struct SettingsSetCommand {
    /// Chat-completion API base URL
    #[arg(long, value_name = "URL")]
    api_base: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Model name sent with each request
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// System prompt template (%TAGS% and %DATE% are substituted)
    #[arg(long, value_name = "TEXT", conflicts_with = "system_prompt_file")]
    system_prompt: Option<String>,

    /// Read the system prompt template from a file
    #[arg(long, value_name = "FILE")]
    system_prompt_file: Option<PathBuf>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = resolve_workspace_path(cli.workspace.clone())
        .and_then(|root| {
            Workspace::open(&root)
                .with_context(|| format!("Failed to open workspace {}", root.display()))
        })
        .and_then(|workspace| {
            debug!(root = %workspace.root().display(), "opened workspace");
            dispatch(&cli.command, &workspace)
        });

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Installs the tracing subscriber. Logs go to stderr.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "doctag=info",
        1 => "doctag=debug",
        _ => "doctag=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are rejected input: empty tag names, bad or unknown document
/// names, and add calls with no acceptable file.
fn is_user_error(error: &anyhow::Error) -> bool {
    let storage_user_error = error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<StorageError>(),
            Some(
                StorageError::EmptyTagName
                    | StorageError::InvalidDocumentName(_)
                    | StorageError::NotFound(_)
            )
        )
    });
    storage_user_error || error.to_string().contains("no .txt files")
}

fn dispatch(command: &Commands, workspace: &Workspace) -> Result<()> {
    match command {
        Commands::Add(cmd) => handle_add(cmd, workspace),
        Commands::Pending => handle_pending(workspace),
        Commands::Run => handle_run(workspace),
        Commands::Outputs(cmd) => handle_outputs(cmd, workspace),
        Commands::Tags(cmd) => handle_tags(cmd, workspace),
        Commands::Settings(cmd) => handle_settings(cmd, workspace),
    }
}

fn handle_add(cmd: &AddCommand, workspace: &Workspace) -> Result<()> {
    let mut added = Vec::new();
    for file in &cmd.files {
        if let Some(name) = workspace
            .documents()
            .add_file(file)
            .with_context(|| format!("Failed to add {}", file.display()))?
        {
            added.push(name);
        }
    }

    if added.is_empty() {
        anyhow::bail!("no .txt files were given");
    }
    println!("{} file(s) added: {}", added.len(), added.join(", "));
    Ok(())
}

fn handle_pending(workspace: &Workspace) -> Result<()> {
    let pending = workspace
        .documents()
        .pending()
        .context("Failed to list pending documents")?;
    for name in pending {
        println!("{name}");
    }
    Ok(())
}

/// Runs one batch over everything pending.
///
/// Settings and vocabulary are loaded here, once, and passed into the pipeline.
fn handle_run(workspace: &Workspace) -> Result<()> {
    let (settings, vocabulary) = workspace
        .load_batch_inputs()
        .context("Failed to load settings or vocabulary")?;

    let client = ChatClientBuilder::from_settings(&settings)
        .build()
        .context("Failed to create model client")?;
    info!(endpoint = %client.endpoint(), model = client.model(), "using model endpoint");

    let started_at = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let pipeline = Pipeline::from_settings(Arc::new(client), vocabulary, &settings, started_at);

    let processed = pipeline
        .run_pending(workspace.documents(), workspace.documents())
        .context("Tagging failed")?;

    println!("{processed} file(s) tagged");
    Ok(())
}

fn handle_outputs(cmd: &OutputsCommand, workspace: &Workspace) -> Result<()> {
    let documents = workspace.documents();
    match cmd {
        OutputsCommand::List => {
            for name in documents.list_outputs().context("Failed to list outputs")? {
                println!("{name}");
            }
        }
        OutputsCommand::Show { name } => {
            let content = documents
                .read_output(name)
                .with_context(|| format!("Failed to read output {name}"))?;
            println!("{content}");
        }
        OutputsCommand::Delete { name } => {
            if documents.delete_output(name)? {
                println!("Deleted {name}");
            } else {
                println!("No output named {name}");
            }
        }
    }
    Ok(())
}

fn handle_tags(cmd: &TagsCommand, workspace: &Workspace) -> Result<()> {
    let store = workspace.vocabulary();
    match cmd {
        TagsCommand::List => {
            let vocabulary = store.load().context("Failed to load vocabulary")?;
            print!("{}", PromptBuilder::tag_listing(&vocabulary));
        }
        TagsCommand::Set { name, variants } => {
            let tag = store.upsert(name, parse_variants(variants))?;
            println!("Tag saved: {}", tag.listing_line());
        }
        TagsCommand::Delete { name } => {
            let name = name.trim();
            if store.delete(name)? {
                println!("Tag deleted: {name}");
            } else {
                println!("No tag named {name}");
            }
        }
    }
    Ok(())
}

fn handle_settings(cmd: &SettingsCommand, workspace: &Workspace) -> Result<()> {
    let store = workspace.settings();
    let mut settings = store.load().context("Failed to load settings")?;

    match cmd {
        SettingsCommand::Show => {
            println!("api_base: {}", settings.api_base);
            println!("api_key:  {}", settings.masked_api_key());
            println!("model:    {}", settings.model);
            println!("system_prompt:\n{}", settings.system_prompt);
        }
        SettingsCommand::Set(set) => {
            if let Some(api_base) = &set.api_base {
                settings.api_base = api_base.clone();
            }
            if let Some(api_key) = &set.api_key {
                settings.api_key = api_key.clone();
            }
            if let Some(model) = &set.model {
                settings.model = model.clone();
            }
            if let Some(prompt) = &set.system_prompt {
                settings.system_prompt = prompt.clone();
            }
            if let Some(path) = &set.system_prompt_file {
                settings.system_prompt = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
            }
            store.save(&settings).context("Failed to save settings")?;
            println!("Settings saved");
        }
    }
    Ok(())
}
