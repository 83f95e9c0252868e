//! Interactive setup for the Thought Chat GitHub App
//!
//! Collects the App credentials, generates secrets, and writes the `.env`
//! file the server reads its environment from.

use rand::RngCore;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const WEBHOOK_SECRET_BYTES: usize = 32;
const SESSION_SECRET_BYTES: usize = 64;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
enum SetupError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unable to read private key file {path}: {source}")]
    PrivateKey { path: PathBuf, source: io::Error },
    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SetupOutcome {
    Written(PathBuf),
    Cancelled,
}

/// Answers collected from the user
#[derive(Debug, Clone, PartialEq, Eq)]
struct AppSettings {
    app_id: String,
    client_id: String,
    client_secret: String,
    private_key: String,
    port: u16,
    app_url: String,
}

fn generate_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn render_env(settings: &AppSettings, webhook_secret: &str, session_secret: &str) -> String {
    let private_key = settings.private_key.trim_end().replace('\n', "\\n");
    format!(
        "# GitHub App Configuration
GITHUB_APP_ID={app_id}
GITHUB_CLIENT_ID={client_id}
GITHUB_CLIENT_SECRET={client_secret}
GITHUB_WEBHOOK_SECRET={webhook_secret}
GITHUB_PRIVATE_KEY=\"{private_key}\"

# Server Configuration
PORT={port}
APP_URL={app_url}

# Security
SESSION_SECRET={session_secret}

# GitHub API access
# GITHUB_TOKEN=ghs_your_installation_token
# GITHUB_API_URL=https://api.github.com

# Sessions
# THOUGHT_CHAT_URL={app_url}
# THOUGHT_CHAT_AUTO_SPEAK=true
# THOUGHT_CHAT_TIMEOUT_SECS=15

RUST_LOG=thought_chat=info
",
        app_id = settings.app_id,
        client_id = settings.client_id,
        client_secret = settings.client_secret,
        port = settings.port,
        app_url = settings.app_url,
    )
}

fn print_instructions<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output, "\n🧠 Thought Chat GitHub App Setup\n")?;
    writeln!(output, "📝 Step 1: GitHub App Information")?;
    writeln!(
        output,
        "First, create your GitHub App at: https://github.com/settings/apps/new\n"
    )?;
    writeln!(output, "Use these settings:")?;
    writeln!(output, "  App name: Thought Chat Interface")?;
    writeln!(output, "  Webhook URL: https://your-domain.com/webhooks/github")?;
    writeln!(output, "  Webhook secret: (generated below)\n")?;
    writeln!(output, "Permissions needed:")?;
    writeln!(output, "  - Issues: Read & Write")?;
    writeln!(output, "  - Pull requests: Read & Write")?;
    writeln!(output, "  - Contents: Read")?;
    writeln!(output, "  - Metadata: Read\n")?;
    writeln!(output, "Subscribe to events:")?;
    writeln!(output, "  - Issues, Issue comment, Pull request review comment\n")?;
    Ok(())
}

fn run<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dir: &Path,
) -> Result<SetupOutcome, SetupError> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        let answer = ask(
            input,
            output,
            "⚠️  .env file already exists. Overwrite it? (y/N): ",
        )?;
        if !answer.eq_ignore_ascii_case("y") {
            writeln!(output, "Setup cancelled.")?;
            return Ok(SetupOutcome::Cancelled);
        }
    }

    print_instructions(output)?;
    let app_id = ask(input, output, "Enter your GitHub App ID: ")?;
    let client_id = ask(input, output, "Enter your GitHub App Client ID: ")?;
    let client_secret = ask(input, output, "Enter your GitHub App Client Secret: ")?;

    writeln!(output, "\n📋 Step 2: Private Key")?;
    let key_path = PathBuf::from(ask(
        input,
        output,
        "Enter the path to your private key file (.pem): ",
    )?);
    let private_key = std::fs::read_to_string(&key_path).map_err(|source| {
        SetupError::PrivateKey {
            path: key_path.clone(),
            source,
        }
    })?;

    writeln!(output, "\n🔧 Step 3: Additional Configuration")?;
    let port = ask(input, output, &format!("Enter the port ({DEFAULT_PORT}): "))?;
    let port = if port.is_empty() {
        DEFAULT_PORT
    } else {
        port.parse().map_err(|_| SetupError::InvalidPort(port))?
    };
    let app_url = ask(input, output, "Enter your app URL (e.g., https://your-domain.com): ")?;
    let app_url = if app_url.is_empty() {
        format!("http://localhost:{port}")
    } else {
        app_url
    };

    let settings = AppSettings {
        app_id,
        client_id,
        client_secret,
        private_key,
        port,
        app_url,
    };
    let webhook_secret = generate_secret(WEBHOOK_SECRET_BYTES);
    let session_secret = generate_secret(SESSION_SECRET_BYTES);

    std::fs::write(
        &env_path,
        render_env(&settings, &webhook_secret, &session_secret),
    )?;

    writeln!(output, "\n✅ Setup Complete!\n")?;
    writeln!(output, "📁 Created {}", env_path.display())?;
    writeln!(output, "🔐 Generated webhook secret: {webhook_secret}\n")?;
    writeln!(output, "🚀 Next steps:")?;
    writeln!(
        output,
        "1. Update your GitHub App webhook secret with: {webhook_secret}"
    )?;
    writeln!(output, "2. Export the .env file and start the server: thought-chat")?;
    writeln!(output, "3. Install your app on a repository to test\n")?;
    writeln!(output, "🌐 Your app will be available at: {}", settings.app_url)?;

    Ok(SetupOutcome::Written(env_path))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::current_dir()?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    if let Err(e) = run(&mut input, &mut output, &dir) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
    Ok(())
}
