mod transport;


use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lps2_client::net::api::ApiClient;
use lps2_client::net::config::ClientConfig;
use lps2_client::net::error::ApiError;
use lps2_client::net::types::Attachment;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::transport::{ReqwestTransport, TerminalAlert};

type Api = ApiClient<ReqwestTransport, TerminalAlert>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("login needs both --user and --password")]
    IncompleteCredentials,
}

#[derive(Parser, Debug)]
#[command(name = "lps2", about = "Command-line client for the LPS2 chat server")]
struct Cli {
    #[arg(long, env = "LPS2_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Bearer key for sessionless calls.
    #[arg(long, env = "LPS2_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Log in as this user before running the command.
    #[arg(long, env = "LPS2_USER")]
    user: Option<String>,

    #[arg(long, env = "LPS2_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip confirmation prompts.
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Health {
        /// Include upstream, memory and knowledge checks.
        #[arg(long)]
        full: bool,
    },
    /// Show the session status.
    Status,
    Model,
    Chat(ChatCommand),
    Memory(MemoryCommand),
    Kb(KbCommand),
    Security(SecurityCommand),
    Admin(AdminCommand),
}

/// Send one chat turn, or `chat clear` to drop the session's history.
#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct ChatCommand {
    #[command(subcommand)]
    command: Option<ChatSubcommand>,

    #[command(flatten)]
    turn: ChatTurn,
}

#[derive(Args, Debug)]
struct ChatTurn {
    #[arg(required_unless_present = "file")]
    prompt: Option<String>,
    #[arg(long)]
    extended: bool,
    /// Attach a file (image, PDF or text).
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ChatSubcommand {
    /// Forget the conversation history kept for this session.
    Clear,
}

#[derive(Args, Debug)]
struct MemoryCommand {
    #[command(subcommand)]
    command: MemorySubcommand,
}

#[derive(Subcommand, Debug)]
enum MemorySubcommand {
    Search {
        query: String,
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: u32,
    },
    List {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct KbCommand {
    #[command(subcommand)]
    command: KbSubcommand,
}

#[derive(Subcommand, Debug)]
enum KbSubcommand {
    Stats,
    Search {
        query: String,
        #[arg(short = 'k', long, default_value_t = 5)]
        top_k: u32,
    },
    Documents,
    Ingest {
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
        /// Source label for inline text.
        #[arg(long, default_value = "cli")]
        source: String,
        /// Ask the server to OCR scanned PDFs.
        #[arg(long)]
        ocr: bool,
    },
    Delete {
        #[arg(required = true)]
        doc_ids: Vec<String>,
    },
    /// Replace a document's content under the same id.
    Reingest {
        doc_id: String,
        /// Read the replacement text from a UTF-8 file.
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        source: Option<String>,
    },
    Rebuild {
        /// Re-embed chunks that are already current.
        #[arg(long)]
        force: bool,
    },
    RebuildStatus,
    Quarantine(QuarantineCommand),
}

#[derive(Args, Debug)]
struct QuarantineCommand {
    #[command(subcommand)]
    command: QuarantineSubcommand,
}

#[derive(Subcommand, Debug)]
enum QuarantineSubcommand {
    List,
    /// Release a document; its content must be re-ingested afterwards.
    Approve {
        doc_id: String,
    },
    Discard {
        doc_id: String,
    },
}

#[derive(Args, Debug)]
struct SecurityCommand {
    #[command(subcommand)]
    command: SecuritySubcommand,
}

#[derive(Subcommand, Debug)]
enum SecuritySubcommand {
    /// Suspicious memory and knowledge counts.
    Stats,
    Audit {
        #[arg(long, default_value_t = 200)]
        limit: u32,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    /// Show or change the upstream LLM endpoint.
    Endpoint {
        #[arg(long)]
        set: Option<String>,
        #[arg(long, requires = "set")]
        persist: bool,
    },
    Profiles(ProfilesCommand),
}

#[derive(Args, Debug)]
struct ProfilesCommand {
    #[command(subcommand)]
    command: ProfilesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfilesSubcommand {
    List,
    Test {
        endpoint: String,
    },
    Save {
        name: String,
        endpoint: String,
        #[arg(long)]
        persist: bool,
    },
    Activate {
        name: String,
        #[arg(long)]
        persist: bool,
    },
    Delete {
        name: String,
        #[arg(long)]
        persist: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let api = connect(&cli).await?;
    let assume_yes = cli.yes;
    match cli.command {
        Command::Health { full: false } => print_json(&api.health().await?),
        Command::Health { full: true } => print_json(&api.full_health().await?),
        Command::Status => print_json(&api.auth_status().await),
        Command::Model => print_json(&api.model().await?),
        Command::Chat(ChatCommand {
            command: Some(ChatSubcommand::Clear),
            ..
        }) => print_json(&api.clear_conversation().await?),
        Command::Chat(ChatCommand { command: None, turn }) => run_chat(&api, turn).await,
        Command::Memory(memory) => run_memory(&api, memory, assume_yes).await,
        Command::Kb(kb) => run_kb(&api, kb, assume_yes).await,
        Command::Security(security) => match security.command {
            SecuritySubcommand::Stats => print_json(&api.security_stats().await?),
            SecuritySubcommand::Audit { limit } => print_json(&api.security_audit(limit).await?),
        },
        Command::Admin(admin) => run_admin(&api, admin, assume_yes).await,
    }
}

async fn connect(cli: &Cli) -> Result<Api, CliError> {
    let transport = ReqwestTransport::new(Duration::from_secs(cli.timeout_secs))?;
    let config = ClientConfig::new(cli.base_url.clone()).with_api_key(cli.api_key.clone());
    let api = ApiClient::new(transport, TerminalAlert, config);

    match (&cli.user, &cli.password) {
        (Some(user), Some(password)) => {
            let resp = api.login(user, password).await?;
            tracing::info!(user = resp.user.as_deref().unwrap_or(user), "logged in");
        }
        (None, None) => {}
        _ => return Err(CliError::IncompleteCredentials),
    }
    Ok(api)
}

async fn run_chat(api: &Api, turn: ChatTurn) -> Result<(), CliError> {
    let attachment = turn.file.as_deref().map(read_attachment).transpose()?;
    let prompt = turn.prompt.unwrap_or_default();
    let reply = api.chat(&prompt, turn.extended, attachment).await?;
    if reply.refusal {
        eprintln!("(answer withheld: insufficient knowledge)");
    }
    println!("{}", reply.response.unwrap_or_default());
    if !reply.citations.is_empty() {
        eprintln!("citations:");
        print_json(&reply.citations)?;
    }
    Ok(())
}

async fn run_memory(api: &Api, memory: MemoryCommand, assume_yes: bool) -> Result<(), CliError> {
    match memory.command {
        MemorySubcommand::Search { query, top_k } => print_json(&api.memory_search(&query, top_k).await?),
        MemorySubcommand::List { limit } => print_json(&api.memory_list(limit).await?),
        MemorySubcommand::Delete { ids } => {
            let prompt = format!("Delete {} memory entr{}?", ids.len(), if ids.len() == 1 { "y" } else { "ies" });
            if !confirm(&prompt, assume_yes)? {
                return Ok(());
            }
            print_json(&api.memory_delete(ids).await?)
        }
    }
}

async fn run_kb(api: &Api, kb: KbCommand, assume_yes: bool) -> Result<(), CliError> {
    match kb.command {
        KbSubcommand::Stats => print_json(&api.kb_stats().await?),
        KbSubcommand::Search { query, top_k } => print_json(&api.kb_search(&query, top_k).await?),
        KbSubcommand::Documents => print_json(&api.kb_documents().await?),
        KbSubcommand::Ingest {
            file,
            text,
            source,
            ocr,
        } => {
            let result = match (file, text) {
                (Some(path), _) => api.kb_ingest_file(read_attachment(&path)?, ocr).await?,
                (None, text) => api.kb_ingest_text(text.as_deref().unwrap_or_default(), &source).await?,
            };
            print_json(&result)
        }
        KbSubcommand::Delete { doc_ids } => {
            let prompt = format!("Delete {} document(s) from the knowledge base?", doc_ids.len());
            if !confirm(&prompt, assume_yes)? {
                return Ok(());
            }
            print_json(&api.kb_delete(doc_ids).await?)
        }
        KbSubcommand::Reingest {
            doc_id,
            file,
            text,
            source,
        } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => text.unwrap_or_default(),
            };
            print_json(&api.kb_reingest(&doc_id, &text, source.as_deref()).await?)
        }
        KbSubcommand::Rebuild { force } => {
            if !confirm("Rebuild the knowledge index?", assume_yes)? {
                return Ok(());
            }
            print_json(&api.kb_rebuild(force).await?)
        }
        KbSubcommand::RebuildStatus => print_json(&api.kb_rebuild_status().await?),
        KbSubcommand::Quarantine(quarantine) => match quarantine.command {
            QuarantineSubcommand::List => print_json(&api.kb_quarantine().await?),
            QuarantineSubcommand::Approve { doc_id } => print_json(&api.kb_quarantine_approve(&doc_id).await?),
            QuarantineSubcommand::Discard { doc_id } => {
                if !confirm(&format!("Discard quarantined document {doc_id}?"), assume_yes)? {
                    return Ok(());
                }
                print_json(&api.kb_quarantine_discard(&doc_id).await?)
            }
        },
    }
}

async fn run_admin(api: &Api, admin: AdminCommand, assume_yes: bool) -> Result<(), CliError> {
    match admin.command {
        AdminSubcommand::Endpoint { set: None, .. } => print_json(&api.llm_endpoint().await?),
        AdminSubcommand::Endpoint {
            set: Some(endpoint),
            persist,
        } => print_json(&api.set_llm_endpoint(&endpoint, persist).await?),
        AdminSubcommand::Profiles(profiles) => match profiles.command {
            ProfilesSubcommand::List => print_json(&api.list_profiles().await?),
            ProfilesSubcommand::Test { endpoint } => print_json(&api.test_profile_endpoint(&endpoint).await?),
            ProfilesSubcommand::Save {
                name,
                endpoint,
                persist,
            } => print_json(&api.save_profile(&name, &endpoint, persist).await?),
            ProfilesSubcommand::Activate { name, persist } => {
                print_json(&api.activate_profile(&name, persist).await?)
            }
            ProfilesSubcommand::Delete { name, persist } => {
                if !confirm(&format!("Delete profile {name}?"), assume_yes)? {
                    return Ok(());
                }
                print_json(&api.delete_profile(&name, persist).await?)
            }
        },
    }
}

fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(Attachment {
        content_type: content_type_for(path).to_owned(),
        file_name,
        bytes,
    })
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    let answer = confirm_with(io::stdin().lock(), io::stderr(), prompt)?;
    if !answer {
        eprintln!("aborted");
    }
    Ok(answer)
}

/// Ask `prompt` and read one line; only `y`/`yes` (any case) confirms.
fn confirm_with(mut input: impl BufRead, mut output: impl Write, prompt: &str) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
