mod simulate;
mod stdio;

use {
    clap::{Parser, Subcommand},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "reprise", about = "Reprise — adaptive message repetition engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "REPRISE_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine against newline-delimited JSON events on stdin
    /// (default when no subcommand is provided).
    Run,
    /// Validate the configuration and print diagnostics.
    Check,
    /// Feed one channel a repeated message and report when the echo fires.
    Simulate {
        /// Channel identifier to simulate.
        #[arg(long, default_value = "sim")]
        channel: String,
        /// Message content to repeat.
        #[arg(short, long, default_value = "hi")]
        message: String,
        /// Number of messages to feed.
        #[arg(short = 'n', long, default_value_t = 20)]
        count: u32,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout is the outbound message wire in `run` mode.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> reprise_config::RepriseConfig {
    match &cli.config {
        Some(path) => match reprise_config::load_config(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                reprise_config::RepriseConfig::default()
            },
        },
        None => reprise_config::discover_and_load(),
    }
}

fn check(cli: &Cli) -> anyhow::Result<()> {
    let path = cli
        .config
        .clone()
        .or_else(reprise_config::find_config_file);

    let Some(path) = path else {
        println!("no config file found; running on defaults");
        return Ok(());
    };

    let result = reprise_config::validate_file(&path)?;
    for d in &result.diagnostics {
        println!("{}: [{}] {}: {}", d.severity, d.category, d.path, d.message);
    }

    if result.has_errors() {
        anyhow::bail!(
            "{}: {} error(s)",
            path.display(),
            result.count(reprise_config::Severity::Error)
        );
    }

    println!("{}: ok", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "reprise starting");

    match cli.command {
        // Default: run the stdin transport when no subcommand is provided
        None | Some(Commands::Run) => {
            let config = load_config(&cli);
            stdio::run(config.repeater.effective_factor()).await
        },
        Some(Commands::Check) => check(&cli),
        Some(Commands::Simulate {
            ref channel,
            ref message,
            count,
        }) => {
            let config = load_config(&cli);
            simulate::run(&config, channel, message, count);
            Ok(())
        },
    }
}
