//! relevai — command-line access to the AI Lang API.
//!
//! Usage:
//!   relevai chat <model> <prompt>        Send one user message and print the reply
//!   relevai embed <model> <text>...      Print embedding dimensions for each text
//!   relevai token                        Show token expiry and subject
//!
//! Credentials and configuration come from `RELEVAI_*` environment variables.

use anyhow::{bail, Context};
use relevai::auth::BlockingTokenManager;
use relevai::types::{ChatRequest, EmbedRequest, Message};
use relevai::{AiLangClientBuilder, BlockingAiLangClient, ClientConfig, Credential};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "chat" => cmd_chat(&args[2..]),
        "embed" => cmd_embed(&args[2..]),
        "token" => cmd_token(),
        "version" | "--version" | "-V" => {
            println!("relevai {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"relevai — RelevAI command-line client

USAGE:
    relevai <COMMAND> [ARGS]

COMMANDS:
    chat <model> <prompt>       Send one user message and print the reply
    embed <model> <text>...     Print embedding dimensions for each text
    token                       Show token expiry and subject (never the token)
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    RELEVAI_AUTH_URL            Token endpoint
    RELEVAI_CLIENT_ID           OAuth client id
    RELEVAI_API_KEY             API key (refresh-token grant)
    RELEVAI_CLIENT_SECRET       Client secret (client-credentials grant)
    RELEVAI_BASE_URL            AI Lang API root
    RELEVAI_SERIALIZER          json | compressed | compact
    RUST_LOG                    Log filter (e.g. relevai=debug)"#
    );
}

fn client() -> anyhow::Result<BlockingAiLangClient> {
    let credential = Credential::from_env().context("reading credentials")?;
    let client = AiLangClientBuilder::new()
        .config(ClientConfig::from_env()?)
        .credential(credential)
        .build_blocking()?;
    Ok(client)
}

fn cmd_chat(args: &[String]) -> anyhow::Result<()> {
    let [model, prompt @ ..] = args else {
        bail!("usage: relevai chat <model> <prompt>");
    };
    if prompt.is_empty() {
        bail!("usage: relevai chat <model> <prompt>");
    }
    let request = ChatRequest::new(model.as_str(), vec![Message::user(prompt.join(" "))]);
    let reply = client()?.chat(&request)?;
    println!("{}", reply.content());
    Ok(())
}

fn cmd_embed(args: &[String]) -> anyhow::Result<()> {
    let [model, texts @ ..] = args else {
        bail!("usage: relevai embed <model> <text>...");
    };
    if texts.is_empty() {
        bail!("usage: relevai embed <model> <text>...");
    }
    let request = EmbedRequest::batch(model.as_str(), texts.to_vec());
    let reply = client()?.embed(&request)?;
    for (text, vector) in texts.iter().zip(&reply.embeddings) {
        println!("{:>5} dims  {}", vector.len(), text);
    }
    Ok(())
}

fn cmd_token() -> anyhow::Result<()> {
    let credential = Credential::from_env().context("reading credentials")?;
    let config = ClientConfig::from_env()?;
    let manager = BlockingTokenManager::from_config(credential, &config)?;
    let token = manager.token()?;
    println!("grant:      {}", manager.credential().grant_type());
    println!("expires_at: {}", token.expires_at().to_rfc3339());
    println!("expires_in: {}s", token.expires_in().num_seconds());
    println!(
        "subject:    {}",
        token.subject().unwrap_or_else(|| "unknown".to_string())
    );
    Ok(())
}
