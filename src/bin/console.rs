//! Text console for a Thought Chat session
//!
//! Runs a session against a running backend, connected to the repository
//! and installation given on the command line.

use clap::Parser;
use std::sync::Arc;
use thought_chat::client::{HttpChatClient, HttpGitHubClient, LoggingChatClient};
use thought_chat::config::SessionConfig;
use thought_chat::context::RepoContext;
use thought_chat::dispatch::Dispatcher;
use thought_chat::message::Sender;
use thought_chat::runtime::{Session, SessionHandle, SessionUpdate, TextOnlySpeech};
use thought_chat::state_machine::{FormSubmission, PendingAction};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
#[command(name = "thought-chat-console", version, about = "Text console for Thought Chat")]
struct Cli {
    /// Repository owner
    #[arg(long)]
    repo_owner: Option<String>,
    /// Repository name
    #[arg(long)]
    repo_name: Option<String>,
    /// GitHub App installation id
    #[arg(long)]
    installation_id: Option<String>,
}

impl Cli {
    fn repo_context(&self) -> RepoContext {
        let params = [
            ("repo_owner", &self.repo_owner),
            ("repo_name", &self.repo_name),
            ("installation_id", &self.installation_id),
        ];
        RepoContext::from_launch_params(
            params
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (key, v))),
        )
    }
}

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Say(String),
    Submit(FormSubmission),
    Cancel,
    Quit,
    Usage(&'static str),
}

const ISSUE_USAGE: &str = "usage: /issue <title> | <body>";
const COMMENT_USAGE: &str = "usage: /comment <issue number> <text>";
const REVIEW_USAGE: &str = "usage: /review <pull request number>";

fn parse_line(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match head {
        "/quit" | "/exit" => Command::Quit,
        "/cancel" => Command::Cancel,
        "/issue" => {
            let (title, body) = rest.split_once('|').unwrap_or((rest, ""));
            if title.trim().is_empty() {
                return Command::Usage(ISSUE_USAGE);
            }
            Command::Submit(FormSubmission::Issue {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
            })
        }
        "/comment" => {
            let (number, body) = rest.split_once(' ').unwrap_or((rest, ""));
            match number.trim_start_matches('#').parse() {
                Ok(issue_number) => Command::Submit(FormSubmission::Comment {
                    issue_number,
                    body: body.trim().to_string(),
                }),
                Err(_) => Command::Usage(COMMENT_USAGE),
            }
        }
        "/review" => match rest.trim_start_matches('#').parse() {
            Ok(pr_number) => Command::Submit(FormSubmission::Review { pr_number }),
            Err(_) => Command::Usage(REVIEW_USAGE),
        },
        _ => Command::Say(line.to_string()),
    }
}

fn pending_hint(action: PendingAction) -> &'static str {
    match action {
        PendingAction::IssueForm => ISSUE_USAGE,
        PendingAction::CommentPrompt => COMMENT_USAGE,
        PendingAction::ReviewPrompt => REVIEW_USAGE,
    }
}

async fn print_updates(mut updates: broadcast::Receiver<SessionUpdate>) {
    loop {
        match updates.recv().await {
            Ok(SessionUpdate::Message { message }) => match message.sender {
                Sender::User => {}
                Sender::Assistant => println!("assistant> {}", message.text),
            },
            Ok(SessionUpdate::Status { text }) => tracing::debug!(status = %text, "Status"),
            Ok(SessionUpdate::PendingAction {
                action: Some(action),
            }) => println!("  ({})", pending_hint(action)),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Console fell behind session updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn read_input(handle: SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let sent = match parse_line(&line) {
            Command::Quit => break,
            Command::Usage(usage) => {
                println!("  ({usage})");
                continue;
            }
            Command::Cancel => handle.cancel_form().await,
            Command::Submit(submission) => handle.submit_form(submission).await,
            Command::Say(text) => handle.submit_text(text).await,
        };
        sent?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thought_chat=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let repo = cli.repo_context();
    let config = SessionConfig::from_env()?;

    let chat = LoggingChatClient::new(HttpChatClient::new(&config.backend_url)?, "backend");
    let github = Arc::new(HttpGitHubClient::new(&config.backend_url)?);
    let dispatcher = Dispatcher::new(chat, github).with_timeout(config.collaborator_timeout);

    println!("🧠 Thought Chat ({})", repo.describe());
    let (session, handle) = Session::new(&config, repo, dispatcher, TextOnlySpeech);
    let printer = tokio::spawn(print_updates(handle.subscribe()));
    for message in session.messages() {
        println!("assistant> {}", message.text);
    }
    let runner = tokio::spawn(session.run());

    read_input(handle).await?;

    runner.await?;
    printer.await?;
    Ok(())
}
