use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ragchat_application::{
    ChatApp, LoginForm, SelectOutcome, SendOutcome, SignupForm, Screen,
};
use ragchat_core::conversation::{ChatView, Conversation, DeliveryState, Message, MessageRole};
use ragchat_core::error::ChatError;
use ragchat_core::session::SessionStore;
use ragchat_infrastructure::{load_document, ConfigService, FileCredentialStorage, RagChatPaths};
use ragchat_interaction::ApiClient;

mod command;
mod helper;

use command::{help_text, Command};
use helper::CliHelper;

type ChatEditor = Editor<CliHelper, DefaultHistory>;

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(about = "Terminal client for a retrieval-augmented chat backend", long_about = None)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000
    #[arg(long, env = "RAGCHAT_BASE_URL")]
    base_url: Option<String>,

    /// Config file (defaults to ~/.config/ragchat/config.toml)
    #[arg(long, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn build_app(cli: &Cli) -> Result<ChatApp> {
    let mut config = ConfigService::with_path(cli.config.clone())
        .get_config()
        .context("failed to load configuration")?;
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }

    let storage = Arc::new(
        FileCredentialStorage::new(config.credential_key.clone())
            .context("failed to locate credential storage")?,
    );
    let store = Arc::new(SessionStore::hydrate(storage));
    let client = Arc::new(ApiClient::from_config(&config, store.clone())?);
    tracing::info!("Using backend {}", client.base_url());

    Ok(ChatApp::new(client.clone(), client, store, &config))
}

fn print_error(err: &ChatError) {
    eprintln!("{}", format!("Error: {}", err.user_message()).red());
    if err.is_auth() {
        eprintln!("{}", "Use /login to sign in again.".bright_black());
    }
}

fn print_message(message: &Message) {
    let body = match message.role {
        MessageRole::User => message.content.green(),
        MessageRole::Assistant => message.content.bright_blue(),
        MessageRole::System => message.content.bright_black(),
    };
    match message.delivery {
        DeliveryState::Delivered => println!("{body}"),
        DeliveryState::Pending => println!("{body} {}", "(sending)".bright_black()),
        DeliveryState::Failed => println!("{body} {}", "(failed)".red()),
    }
}

fn print_conversations(view: &ChatView) {
    if view.conversations.is_empty() {
        println!("{}", "No conversations yet. Type a message or /new.".bright_black());
        return;
    }
    for Conversation { id, title } in &view.conversations {
        let title = if title.is_empty() { "(untitled)" } else { title.as_str() };
        let line = format!("{id:>5}  {title}");
        if view.is_selected(*id) {
            println!("{}", format!("* {line}").bright_magenta());
        } else {
            println!("  {line}");
        }
    }
}

async fn show_selection(app: &ChatApp) {
    let view = app.conversations.view().await;
    if view.sidebar_open {
        print_conversations(&view);
        println!();
    }
    for message in &view.messages {
        print_message(message);
    }
}

fn prompt_credentials(rl: &mut ChatEditor) -> Result<(String, String)> {
    let email = rl.readline("email: ")?;
    let password = rl.readline("password: ")?;
    Ok((email.trim().to_string(), password))
}

/// Listing runs after the login succeeded, so its failure is reported on its own.
async fn enter_chat(app: &ChatApp) {
    println!("{}", "Logged in.".bright_green());
    match app.conversations.load_conversations().await {
        Ok(_) => show_selection(app).await,
        Err(e) => print_error(&e),
    }
}

async fn handle(app: &mut ChatApp, rl: &mut ChatEditor, command: Command) -> Result<bool> {
    let needs_login = matches!(
        command,
        Command::WhoAmI
            | Command::List
            | Command::New
            | Command::Select(_)
            | Command::Upload(_)
            | Command::Send(_)
    );
    if needs_login && app.screen() == Screen::Landing {
        println!("{}", "Log in first with /login or /signup.".yellow());
        return Ok(true);
    }

    match command {
        Command::Quit => return Ok(false),
        Command::Help => println!("{}", help_text().bright_black()),
        Command::Invalid(reason) => println!("{}", reason.yellow()),
        Command::Login => {
            app.popups.show_login();
            let (email, password) = prompt_credentials(rl)?;
            match app.login(&LoginForm::new(email, password)).await {
                Ok(_) => enter_chat(app).await,
                Err(e) => print_error(&e),
            }
        }
        Command::Signup => {
            app.popups.show_signup();
            let (email, password) = prompt_credentials(rl)?;
            match app.signup(&SignupForm::new(email, password)).await {
                Ok(_) if app.session.is_authenticated() => enter_chat(app).await,
                Ok(_) => println!("{}", "Account created. Log in with /login.".bright_green()),
                Err(e) => print_error(&e),
            }
        }
        Command::Logout => {
            app.logout().await;
            println!("{}", "Logged out.".bright_green());
        }
        Command::WhoAmI => match app.session.current_user().await {
            Ok(user) => println!("{} (id {})", user.email.bright_green(), user.id),
            Err(e) => print_error(&e),
        },
        Command::List => match app.conversations.load_conversations().await {
            Ok(_) => print_conversations(&app.conversations.view().await),
            Err(e) => print_error(&e),
        },
        Command::New => match app.conversations.start_new_conversation().await {
            Ok(conversation) => println!(
                "{}",
                format!("Started conversation {}", conversation.id).bright_green()
            ),
            Err(e) => print_error(&e),
        },
        Command::Select(id) => {
            let view = app.conversations.view().await;
            let conversation = view
                .conversations
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .unwrap_or(Conversation {
                    id,
                    title: String::new(),
                });
            match app.conversations.select_conversation(&conversation).await {
                Ok(SelectOutcome::Applied) => show_selection(app).await,
                Ok(SelectOutcome::Discarded) => {}
                Err(e) => print_error(&e),
            }
        }
        Command::Upload(path) => {
            println!("{}", format!("Uploading {}...", path.display()).bright_black());
            let controller = Arc::clone(&app.conversations);
            tokio::spawn(async move {
                let result = match load_document(&path).await {
                    Ok(document) => controller.upload_document(&document).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(receipt) => println!(
                        "{}",
                        receipt
                            .message
                            .unwrap_or_else(|| format!("Uploaded {}", path.display()))
                            .bright_green()
                    ),
                    Err(e) => print_error(&e),
                }
            });
        }
        Command::Sidebar => {
            let status = if app.conversations.toggle_sidebar().await {
                "Sidebar shown."
            } else {
                "Sidebar hidden."
            };
            println!("{}", status.bright_black());
        }
        Command::Send(text) => match app.conversations.send_message(&text).await {
            Ok(SendOutcome::Sent { reply, .. }) => print_message(&reply),
            Ok(SendOutcome::Ignored) => {}
            Err(e) => print_error(&e),
        },
    }

    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut app = build_app(&cli)?;

    let mut rl: ChatEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));
    let history_file = RagChatPaths::history_file().ok();
    if let Some(ref path) = history_file {
        let _ = rl.load_history(path);
    }

    println!("{}", "=== ragchat ===".bright_magenta().bold());
    println!("{}", "Type /help for commands, or 'quit' to exit.".bright_black());
    println!();

    if app.screen() == Screen::Chat {
        match app.conversations.load_conversations().await {
            Ok(_) => show_selection(&app).await,
            Err(e) => print_error(&e),
        }
    } else {
        println!("{}", "Not logged in. Use /login or /signup.".yellow());
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match handle(&mut app, &mut rl, Command::parse(trimmed)).await {
                    Ok(true) => {}
                    Ok(false) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = rl.save_history(path) {
            tracing::debug!("Failed to save history: {}", e);
        }
    }

    Ok(())
}
