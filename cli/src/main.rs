mod http;
mod render;
mod repl;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use conversations::{ConversationStore, FileStore, StateStore};

use crate::http::HttpTransport;
use crate::repl::ReplCommand;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing to send")]
    EmptyQuestion,
    #[error("no conversation matches `{0}`")]
    UnknownConversation(String),
    #[error("no answer: {0}")]
    AnswerFailed(String),
}

#[derive(Parser, Debug)]
#[command(name = "docchat-cli", about = "Terminal client for the docchat document-search proxy")]
struct Cli {
    #[arg(long, env = "DOCCHAT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Where conversations are persisted between runs.
    #[arg(long, env = "DOCCHAT_STORE", default_value = ".docchat/conversations.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the proxy is up.
    Ping,
    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that open the local conversation store.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Interactive session on the active conversation.
    Chat,
    /// Ask one question and print the answer.
    Ask {
        /// Start a new conversation first.
        #[arg(long)]
        new: bool,
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// List stored conversations.
    List,
    /// Start a new conversation and make it active.
    New,
    /// Clear the active conversation.
    Clear,
    /// Delete every conversation.
    ClearAll,
}

struct Session {
    store: ConversationStore<FileStore>,
    transport: HttpTransport,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Ping => run_ping(&client, &cli.base_url).await,
        Command::Store(command) => {
            let storage = FileStore::new(cli.store);
            debug!(path = %storage.path().display(), "opening conversation store");
            let mut session = Session {
                store: ConversationStore::open(storage),
                transport: HttpTransport::new(client, &cli.base_url),
            };
            run_store_command(&mut session, command).await
        }
    }
}

async fn run_store_command(session: &mut Session, command: StoreCommand) -> Result<(), CliError> {
    match command {
        StoreCommand::Chat => run_chat(session).await,
        StoreCommand::Ask { new, question } => run_ask(session, new, &question.join(" ")).await,
        StoreCommand::List => {
            print_list(&session.store);
            Ok(())
        }
        StoreCommand::New => {
            let id = session.store.create_conversation();
            println!("{id}");
            Ok(())
        }
        StoreCommand::Clear => {
            session.store.clear_active();
            Ok(())
        }
        StoreCommand::ClearAll => {
            session.store.clear_all();
            Ok(())
        }
    }
}

async fn run_ping(client: &reqwest::Client, base_url: &str) -> Result<(), CliError> {
    let status = http::ping(client, base_url).await?;
    if !(200..300).contains(&status) {
        return Err(CliError::Unhealthy(status));
    }
    println!("ok");
    Ok(())
}

async fn run_ask(session: &mut Session, new: bool, question: &str) -> Result<(), CliError> {
    if question.trim().is_empty() {
        return Err(CliError::EmptyQuestion);
    }
    if new {
        session.store.create_conversation();
    }
    if !session
        .store
        .send_message(question, &session.transport)
        .await
    {
        return Err(CliError::EmptyQuestion);
    }
    print_last_message(&session.store);
    answer_outcome(&session.store)
}

/// Fails when the active conversation ends in an error-flagged answer.
fn answer_outcome<S: StateStore>(store: &ConversationStore<S>) -> Result<(), CliError> {
    let Some(conversation) = store.active() else {
        return Ok(());
    };
    match conversation.messages.last() {
        Some(last) if last.is_error => {
            warn!(conversation = %conversation.id, "ask: answer failed");
            Err(CliError::AnswerFailed(last.content.clone()))
        }
        _ => Ok(()),
    }
}

async fn run_chat(session: &mut Session) -> Result<(), CliError> {
    if let Some(active) = session.store.active() {
        print!("{}", render::transcript(active));
    }
    println!("Type a question, or /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match repl::parse_line(&line) {
            ReplCommand::Send(text) => {
                session.store.send_message(&text, &session.transport).await;
                print_last_message(&session.store);
            }
            ReplCommand::New => {
                session.store.create_conversation();
                println!("Started a new conversation.");
            }
            ReplCommand::List => print_list(&session.store),
            ReplCommand::Switch(target) => match resolve_conversation(&session.store, &target) {
                Ok(id) => {
                    session.store.select_conversation(&id);
                    if let Some(active) = session.store.active() {
                        print!("{}", render::transcript(active));
                    }
                }
                Err(e) => println!("{e}"),
            },
            ReplCommand::Clear => {
                session.store.clear_active();
                println!("Conversation cleared.");
            }
            ReplCommand::ClearAll => {
                session.store.clear_all();
                println!("All conversations deleted.");
            }
            ReplCommand::Help => println!("{}", repl::HELP),
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Unknown(command) => println!("unknown command: {command} (try /help)"),
        }
    }
    Ok(())
}

/// Accepts a 1-based list number or a unique id prefix.
fn resolve_conversation<S: StateStore>(store: &ConversationStore<S>, target: &str) -> Result<String, CliError> {
    let conversations = store.conversations();
    if let Ok(index) = target.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| conversations.get(i))
            .map(|c| c.id.clone())
            .ok_or_else(|| CliError::UnknownConversation(target.to_owned()));
    }
    let mut matches = conversations.iter().filter(|c| c.id.starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id.clone()),
        _ => Err(CliError::UnknownConversation(target.to_owned())),
    }
}

fn print_list<S: StateStore>(store: &ConversationStore<S>) {
    print!("{}", render::conversation_list(store.conversations(), store.active_id(), chrono::Utc::now()));
}

fn print_last_message<S: StateStore>(store: &ConversationStore<S>) {
    if let Some(last) = store.active().and_then(|c| c.messages.last()) {
        print!("{}", render::message(last));
    }
}
