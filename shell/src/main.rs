use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use subspace_config::{ConfigLoader, LogFormat, LoggingConfig, ShellConfig, SubspaceConfig};
use subspace_shell::{CliResult, ShellSession, User};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod completer;

/// subspace - Shell for a simulated multi-user machine
#[derive(Parser, Debug)]
#[command(name = "subspace", version, about)]
struct Args {
    /// Configuration file (replaces the default search paths)
    #[arg(long)]
    config: Option<PathBuf>,

    /// User to log in as
    #[arg(short, long)]
    user: Option<String>,

    /// Hostname of the simulated machine
    #[arg(long)]
    hostname: Option<String>,

    /// Execute command and exit
    #[arg(short = 'c')]
    command: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("subspace: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> CliResult<()> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::new().with_file(path).load()?,
        None => subspace_config::load()?,
    };
    apply_args(&mut config, &args);

    init_logging(&config.logging);

    let mut session = ShellSession::new(&config.server)?;
    let user = session.user(&config.shell.user)?;

    if let Some(command) = args.command {
        let output = session.submit_command(&user, &command);
        if !output.is_empty() {
            println!("{}", output);
        }
        return Ok(());
    }

    run_repl(&mut session, &user, &config.shell)
}

/// Command-line flags win over the configuration. The login user is
/// created on the machine if the configuration doesn't already list it.
fn apply_args(config: &mut SubspaceConfig, args: &Args) {
    if let Some(hostname) = &args.hostname {
        config.server.hostname = hostname.clone();
    }
    if let Some(user) = &args.user {
        config.shell.user = user.clone();
    }
    if !config.server.users.contains(&config.shell.user) {
        config.server.users.push(config.shell.user.clone());
    }
}

fn init_logging(config: &LoggingConfig) {
    let fmt_layer = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(tracing_subscriber::EnvFilter::new(config.directive()))
        .init();
}

fn run_repl(session: &mut ShellSession, user: &User, shell_config: &ShellConfig) -> CliResult<()> {
    use completer::SubspaceHelper;
    use rustyline::error::ReadlineError;
    use rustyline::history::DefaultHistory;
    use rustyline::{CompletionType, Config, Editor};

    let history = &shell_config.history;
    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .max_history_size(history.max_entries)?
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .build();

    let mut rl: Editor<SubspaceHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(SubspaceHelper::new(session, user)));

    let history_path = history.resolved_path();
    if history.enabled {
        if let Err(e) = rl.load_history(&history_path) {
            tracing::debug!(path = %history_path.display(), error = %e, "no history loaded");
        }
    }

    println!("subspace v{} - {}", env!("CARGO_PKG_VERSION"), session.hostname());
    println!("Type 'exit' to quit, 'help' for a list of programs.");
    println!();

    loop {
        if let Some(helper) = rl.helper_mut() {
            helper.refresh(session, user);
        }

        let prompt = session.prompt(user, &shell_config.prompt);

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if history.enabled {
                    let _ = rl.add_history_entry(line);
                }

                if line == "exit" || line == "quit" {
                    break;
                }

                let output = session.submit_command(user, line);
                if !output.is_empty() {
                    println!("{}", output);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if history.enabled {
        if let Err(e) = rl.save_history(&history_path) {
            tracing::warn!(path = %history_path.display(), error = %e, "failed to save history");
        }
    }

    Ok(())
}
