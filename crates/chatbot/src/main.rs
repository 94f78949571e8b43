//! Chat with the chatbot service and manage your account from the terminal.

#[macro_use]
extern crate tracing;

use std::fmt::Display;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chatbot::core::{
    AccountSession, ChatController, ChatControllerBuilder, KeyPress, Role,
};
use chatbot::{
    FileTokenStore, InputReader, PrintEvent, TranscriptPrinter, account_rows,
};
use chatbot_backend::{Credentials, OAuthProvider, Plan, Registration};
use chatbot_http_backend::{HttpBackend, HttpBackendConfigBuilder};
use clap::{Args, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, BufReader, Stdin};
use tokio::select;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[derive(Parser)]
#[command(name = "chatbot", version, about)]
struct Cli {
    /// Base URL of the chatbot service.
    #[arg(
        long,
        global = true,
        env = "CHATBOT_BASE_URL",
        default_value = "http://localhost:8000"
    )]
    base_url: String,

    /// Where to keep the access token. Defaults to the user config
    /// directory.
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the bot (default).
    Chat(ChatArgs),
    /// Sign in with email and password.
    Login {
        email: String,
        #[arg(long, env = "CHATBOT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account.
    Register {
        /// Full name, also used as the client name.
        name: String,
        email: String,
        #[arg(long, env = "CHATBOT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// One of `free`, `basic` or `pro`.
        #[arg(long, default_value_t = Plan::RECOMMENDED)]
        plan: Plan,
    },
    /// List the available plans.
    Plans,
    /// Print the URL that starts an OAuth login.
    Oauth { provider: OAuthProvider },
    /// Finish an OAuth login with the URL the browser was redirected to.
    OauthCallback { url: String },
    /// Show the signed-in account and its API key.
    Dashboard,
    /// Sign out.
    Logout,
}

#[derive(Args)]
struct ChatArgs {
    /// API key to chat with. Defaults to the signed-in account's key.
    #[arg(long, env = "CHATBOT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Start with the service's greeting.
    #[arg(long)]
    greeting: bool,
    /// Reply shown when the service cannot be reached.
    #[arg(long)]
    fallback: Option<String>,
    /// Delay between revealed characters, in milliseconds.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: u64,
    /// How long to wait for a reply, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl ChatArgs {
    /// Arguments of a bare `chatbot` invocation: clap defaults plus
    /// environment fallbacks.
    fn from_env() -> Result<Self, clap::Error> {
        let matches = Self::augment_args(clap::Command::new("chat"))
            .try_get_matches_from(["chat"])?;
        Self::from_arg_matches(&matches)
    }
}

type Session = AccountSession<HttpBackend, FileTokenStore>;
type Input = InputReader<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = match cli.token_file {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::in_config_dir()?,
    };
    let config = HttpBackendConfigBuilder::with_base_url(&cli.base_url).build();
    let mut session = AccountSession::new(HttpBackend::new(config), store);
    let mut input = InputReader::stdin();

    let command = match cli.command {
        Some(command) => command,
        None => Command::Chat(ChatArgs::from_env()?),
    };
    match command {
        Command::Chat(args) => chat(&mut session, &mut input, args).await?,
        Command::Login { email, password } => {
            let password = password_or_prompt(&mut input, password).await?;
            let account = session.login(Credentials::new(email, password)).await?;
            success(format_args!("Signed in to {}", account.client.name));
        }
        Command::Register {
            name,
            email,
            password,
            plan,
        } => {
            let password = password_or_prompt(&mut input, password).await?;
            let account = session
                .register(Registration {
                    name,
                    email,
                    password,
                    plan,
                })
                .await?;
            success(format_args!(
                "Created {} on the {} plan",
                account.client.name,
                account.client.plan.name()
            ));
        }
        Command::Plans => print_plans(),
        Command::Oauth { provider } => {
            let url = provider.login_url(&cli.base_url)?;
            println!("Open this URL in a browser to continue with {provider}:");
            println!("  {}", url.bright_white().underline());
            println!("Then run `chatbot oauth-callback <redirected URL>`.");
        }
        Command::OauthCallback { url } => {
            let account = session.complete_oauth(&url).await?;
            success(format_args!("Signed in as {}", account.user.email));
        }
        Command::Dashboard => {
            session.hydrate().await?;
            let Some(account) = session.account() else {
                println!("Not signed in. Run `chatbot login` first.");
                return Ok(());
            };
            let bar = BAR_CHAR.bright_cyan();
            for (label, value) in account_rows(account) {
                println!("{bar}{:>8}  {}", label.dimmed(), value.bright_white());
            }
            println!();
            println!("Full API key: {}", account.api_key.bright_yellow());
        }
        Command::Logout => {
            session.logout()?;
            success("Signed out");
        }
    }
    Ok(())
}

async fn chat(
    session: &mut Session,
    input: &mut Input,
    args: ChatArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = match args.api_key {
        Some(api_key) => api_key,
        None => {
            session.hydrate().await?;
            session
                .api_key()
                .ok_or("not signed in, pass --api-key or run `chatbot login`")?
                .to_owned()
        }
    };

    let backend = session.backend().with_api_key(api_key);
    let mut builder = ChatControllerBuilder::with_backend(backend)
        .with_greeting(args.greeting)
        .with_reveal_interval(Duration::from_millis(args.interval_ms))
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(fallback) = args.fallback {
        builder = builder.with_fallback_reply(fallback);
    }
    let controller = builder.build();
    debug!(session_id = %controller.session_id(), "chat started");

    let mut printer = TranscriptPrinter::starting_at(&controller.view());
    if args.greeting && !wait_for_reply(&controller, &mut printer, 0).await {
        return Ok(());
    }

    'outer: loop {
        let mut draft = String::new();
        let mut prompt = "> ";
        // A trailing backslash continues the message on the next line, like
        // Shift+Enter in the widget.
        loop {
            print!("{prompt}");
            std::io::stdout().flush().ok();
            let Some(line) = input.next_input().await else {
                break 'outer;
            };
            draft.push_str(&line.text);
            if !line.continues {
                break;
            }
            draft.push('\n');
            controller.set_draft(draft.as_str())?;
            controller.handle_key(KeyPress::enter().with_shift(true))?;
            prompt = ". ";
        }
        if draft.trim().is_empty() {
            continue;
        }

        let committed = controller.view().transcript.len();
        controller.set_draft(draft)?;
        controller.handle_key(KeyPress::enter())?;
        if !wait_for_reply(&controller, &mut printer, committed + 2).await {
            break;
        }
    }

    controller.dispose();
    Ok(())
}

/// Prints view updates until the controller is idle with at least
/// `messages` committed. Returns `false` if the controller went away.
async fn wait_for_reply(
    controller: &ChatController,
    printer: &mut TranscriptPrinter,
    messages: usize,
) -> bool {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut view_rx = controller.subscribe();
    let mut progress_bar: Option<ProgressBar> = None;

    loop {
        let view = view_rx.borrow_and_update().clone();

        if view.is_loading() {
            progress_bar.get_or_insert_with(|| {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.set_style(progress_style.clone());
                progress_bar.set_message("💬 Waiting for a reply...");
                progress_bar
            });
        } else if let Some(progress_bar) = progress_bar.take() {
            // Clear the spinner before printing anything else.
            progress_bar.finish_and_clear();
        }

        for event in printer.update(&view) {
            print_event(event);
        }
        if view.input_enabled() && view.transcript.len() >= messages {
            return true;
        }

        loop {
            select! {
                changed = view_rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                    break;
                },
                _ = sleep(Duration::from_millis(100)) => {
                    if let Some(progress_bar) = &progress_bar {
                        progress_bar.inc(1);
                    }
                }
            }
        }
    }
}

fn print_event(event: PrintEvent) {
    match event {
        PrintEvent::Begin => print!("{}🤖 ", BAR_CHAR.bright_cyan()),
        PrintEvent::Delta(text) => print!("{}", text.bright_white()),
        PrintEvent::End => println!(),
        PrintEvent::Message(message) => {
            // The user's own input is already on screen.
            if message.role() == Role::Assistant {
                println!(
                    "{}🤖 {}",
                    BAR_CHAR.bright_cyan(),
                    message.content().bright_white()
                );
            }
        }
    }
    std::io::stdout().flush().ok();
}

fn print_plans() {
    for plan in Plan::ALL {
        let bar = BAR_CHAR.bright_cyan();
        let popular = if plan.is_popular() { " ★ popular" } else { "" };
        println!(
            "{bar}{} ({}) {}{}",
            plan.name().bright_white().bold(),
            plan.id(),
            plan.price(),
            popular.bright_yellow()
        );
        for feature in plan.features() {
            println!("{bar}  • {feature}");
        }
        println!();
    }
}

fn success(message: impl Display) {
    println!("{} {message}", "✓".bright_green());
}

async fn password_or_prompt<R: AsyncBufRead + Unpin>(
    input: &mut InputReader<R>,
    password: Option<String>,
) -> std::io::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    print!("Password: ");
    std::io::stdout().flush()?;
    input.next_line().await.ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no password given")
    })
}
