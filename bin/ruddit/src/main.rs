//! # Ruddit Binary
//!
//! Assembles a gateway based on compile-time features and runs one command:
//!
//! ```text
//! ruddit [feed [TOPIC]]
//! ruddit post TITLE TOPIC [BODY]
//! ruddit vote POST_ID up|down
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rd_config::{LogSettings, Settings};
use rd_core::{
    cast_vote, entries, load_feed, AppError, FeedGateway, Notice, PostComposer, PostId, ViewerId, VoteDirection,
    VoteOutcome,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(not(any(feature = "gateway-graphql", feature = "gateway-memory")))]
compile_error!("enable at least one of the `gateway-graphql` or `gateway-memory` features");

enum Command {
    Feed { topic: Option<String> },
    Post { title: String, topic: String, body: String },
    Vote { post_id: PostId, direction: VoteDirection },
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.next().as_deref() {
            None | Some("feed") => Ok(Command::Feed { topic: args.next() }),
            Some("post") => {
                let (Some(title), Some(topic)) = (args.next(), args.next()) else {
                    bail!("usage: ruddit post TITLE TOPIC [BODY]");
                };
                Ok(Command::Post { title, topic, body: args.next().unwrap_or_default() })
            }
            Some("vote") => {
                let (Some(id), Some(dir)) = (args.next(), args.next()) else {
                    bail!("usage: ruddit vote POST_ID up|down");
                };
                let post_id = PostId::from(id);
                let direction = match dir.as_str() {
                    "up" => VoteDirection::Up,
                    "down" => VoteDirection::Down,
                    other => bail!("vote direction must be `up` or `down`, got {other:?}"),
                };
                Ok(Command::Vote { post_id, direction })
            }
            Some(other) => bail!("unknown command {other:?}; expected feed, post, or vote"),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = std::env::var_os("RUDDIT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ruddit.toml"));
    let settings = Settings::load(Some(&config_path)).context("failed to load configuration")?;

    init_tracing(&settings.log)?;

    let command = Command::parse(std::env::args().skip(1))?;
    let viewer = settings.viewer.as_deref().map(ViewerId::new);
    let gateway = build_gateway(&settings)?;

    match command {
        Command::Feed { topic } => {
            let posts = load_feed(gateway.as_ref(), topic.as_deref()).await?;
            for entry in entries(posts, viewer.as_ref()) {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
        Command::Post { title, topic, body } => {
            let mut composer = PostComposer::new();
            let form = composer.form_mut();
            form.title = title;
            form.topic = topic;
            form.body = body;

            let result = composer
                .submit_with(gateway.as_ref(), viewer.as_ref(), print_notice)
                .await;
            match result {
                Ok(_) => {}
                Err(AppError::Validation(errors)) => {
                    for e in errors.errors() {
                        eprintln!("- {}", e.message);
                    }
                    bail!("post was not submitted");
                }
                Err(AppError::Unauthenticated(_)) => bail!("Sign in to post (set RUDDIT__VIEWER)"),
                Err(err) => return Err(err.into()),
            }
        }
        Command::Vote { post_id, direction } => {
            match cast_vote(gateway.as_ref(), &post_id, viewer.as_ref(), direction).await? {
                VoteOutcome::SignInRequired => println!("You'll need to sign in to vote!"),
                VoteOutcome::Recorded(summary) => println!("{}", serde_json::to_string(&summary)?),
            }
        }
    }

    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::Success { post_id } => println!("{notice} ({post_id})"),
        Notice::Pending => println!("{notice}"),
        Notice::Failure => eprintln!("{notice}"),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log.filter))?;
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output; logs go to stderr
    if log.json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()?;
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).try_init()?;
    }
    Ok(())
}

#[cfg(feature = "gateway-memory")]
fn build_gateway(_settings: &Settings) -> Result<Box<dyn FeedGateway>> {
    info!("using in-memory gateway");
    Ok(Box::new(rd_gateway_memory::MemoryGateway::new()))
}

#[cfg(all(feature = "gateway-graphql", not(feature = "gateway-memory")))]
fn build_gateway(settings: &Settings) -> Result<Box<dyn FeedGateway>> {
    let gateway = &settings.gateway;
    info!(endpoint = %gateway.endpoint, "using GraphQL gateway");
    let client = rd_gateway_graphql::GraphqlGateway::new(
        gateway.endpoint.clone(),
        gateway.api_key.as_ref(),
        gateway.timeout(),
    )?;
    Ok(Box::new(client))
}
