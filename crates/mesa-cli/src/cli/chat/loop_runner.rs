//! Main chat loop orchestration.
//!
//! Resolves credentials, builds the chat surface with terminal targets,
//! binds it to an event channel, then feeds it readline input until the user
//! exits. Sends run in the background, so typing while a reply is pending
//! shows the "already sending" status instead of queueing.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use console::style;
use secrecy::SecretString;
use tokio::sync::mpsc;
use tracing::info;

use mesa_core::chat::provider::SharedContext;
use mesa_core::chat::surface::{ChatSurface, SurfaceConfig, SurfaceEvent};
use mesa_infra::auth::{AuthClient, SessionTokenProvider, StaticTokenProvider, TokenProvider};
use mesa_infra::jwt;
use mesa_infra::transport::HttpChatTransport;
use mesa_types::chat::{ChatContext, ChatRole};
use mesa_types::config::ClientConfig;

use crate::cli::ChatArgs;

use super::banner::{BannerInfo, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::terminal::{Console, TerminalViews};

/// Apply command-line overrides on top of `config.toml`.
fn apply_overrides(mut config: ClientConfig, args: &ChatArgs) -> ClientConfig {
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(limit) = args.history_limit {
        config.history_limit = limit.max(1);
    }
    if args.no_stream {
        config.stream_replies = false;
    }
    if args.no_auth {
        config.require_auth = false;
    }
    config
}

fn initial_context(args: &ChatArgs) -> ChatContext {
    match &args.restaurant_id {
        Some(id) => ChatContext::new(id.clone(), args.restaurant_name.clone().unwrap_or_default()),
        None => ChatContext::empty(),
    }
}

/// Build the token provider, prompting for a password when `--email` is set.
///
/// Returns the provider and the current access token, if any.
async fn resolve_auth(config: &ClientConfig, args: &ChatArgs) -> anyhow::Result<(TokenProvider, Option<String>)> {
    let Some(email) = &args.email else {
        let provider = StaticTokenProvider::new(args.token.clone());
        let token = provider.expose().map(str::to_string);
        return Ok((TokenProvider::Static(provider), token));
    };

    let password = dialoguer::Password::new()
        .with_prompt(format!("Password for {email}"))
        .interact()
        .context("Failed to read password")?;

    let client = AuthClient::new(config)?;
    if !client.can_refresh() {
        eprintln!(
            "  {} auth.auth_url / auth.anon_key not set: expired sessions cannot be refreshed",
            style("!").yellow().bold()
        );
    }
    let provider = SessionTokenProvider::new(client);
    provider
        .login(email, &SecretString::from(password))
        .await
        .context("Sign-in failed")?;
    let token = provider.access_token().await;
    Ok((TokenProvider::Session(provider), token))
}

fn print_history(out: &mut impl Write, entries: &[mesa_types::chat::ConversationEntry]) -> std::io::Result<()> {
    writeln!(out)?;
    if entries.is_empty() {
        writeln!(out, "  {}", style("No messages yet.").dim())?;
    }
    for entry in entries {
        let label = match entry.role {
            ChatRole::User => style("You").green().bold(),
            ChatRole::Assistant => style("Assistant").cyan().bold(),
        };
        writeln!(out, "  {label}: {}", entry.content)?;
    }
    writeln!(out)
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(config: ClientConfig, args: ChatArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let context = SharedContext::new(initial_context(&args));
    let (auth, token) = resolve_auth(&config, &args).await?;
    let transport = HttpChatTransport::from_config(&config).context("Failed to create HTTP client")?;

    let current = initial_context(&args);
    let subject = token.as_deref().and_then(jwt::subject);
    print_welcome_banner(&BannerInfo {
        restaurant: current.has_identity().then(|| current.display_name()),
        restaurant_id: current.identity(),
        base_url: &config.base_url,
        signed_in_as: subject.as_deref(),
        require_auth: config.require_auth,
        streaming: config.stream_replies,
    });

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut input, writer) = ChatInput::new(prompt).context("Failed to initialize input")?;
    let mut out = Console::new(writer);

    let views = TerminalViews::new(out.clone(), context.clone(), console::user_attended());
    let surface = Arc::new(ChatSurface::new(
        SurfaceConfig::from_client_config(&config),
        views.targets(),
        context.clone(),
        auth,
        transport,
    ));
    surface.mount();
    if !views.input.is_enabled() {
        out.line(format!("  {}", style(views.input.placeholder()).yellow()));
    }

    let (events, receiver) = mpsc::channel(16);
    let listener = surface.bind(receiver);
    info!(restaurant_id = ?current.identity(), "Chat started");

    loop {
        match input.read_line().await {
            InputEvent::Eof | InputEvent::Interrupted => break,
            InputEvent::Empty => continue,
            InputEvent::Message(line) => {
                events.send(SurfaceEvent::Submit(Some(line))).await?;
            }
            InputEvent::Command(command) => match command {
                ChatCommand::Help => commands::print_help(&mut out)?,
                ChatCommand::Reset => events.send(SurfaceEvent::Reset).await?,
                ChatCommand::History => print_history(&mut out, &surface.history())?,
                ChatCommand::Session => {
                    let session = surface
                        .session_id()
                        .unwrap_or_else(|| "(starts with the first message)".to_string());
                    out.line(format!("  {} {}", style("Session:").bold(), style(session).dim()));
                }
                ChatCommand::Restaurant { id, name } => {
                    context.set(ChatContext::new(id, name.unwrap_or_default()));
                    events.send(SurfaceEvent::ContextChanged).await?;
                }
                ChatCommand::Exit => break,
                ChatCommand::Unknown(message) => {
                    out.line(format!("  {} {message}", style("?").yellow().bold()));
                }
            },
        }
    }

    let _ = events.send(SurfaceEvent::Close).await;
    listener.await?;
    input.flush();
    out.line(format!("\n  {}", style("Chat ended.").dim()));
    Ok(())
}
