use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use kerzh_demo::config::{
    self,
    AppConfig,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

mod client;
mod ui;

const LOG_FILE_PREFIX: &str = "kerzh-demo.log";

struct CliArgs {
    config: AppConfig,
    config_path: Option<PathBuf>,
    print_config: bool,
}

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: kerzh-demo [--config <path>] [--log-dir <path>] [--print-config]\n\
         \n\
         Flags:\n\
           --config <path>   JSON file overriding balances, limits and labels\n\
           --log-dir <path>  Directory for the daily log file (default {})\n\
           --print-config    Print the effective config as JSON and exit\n\
         \n\
         Log verbosity follows RUST_LOG (default info).",
        config::DEFAULT_LOG_DIR,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut config_path: Option<String> = None;
    let mut log_dir: Option<String> = None;
    let mut print_config = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--config requires a path argument"))?;
                if config_path.is_some() {
                    return Err(eyre!("--config may only be specified once"));
                }
                config_path = Some(path);
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--print-config" => print_config = true,
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let config_path = config_path.map(|raw| config::expand_path(&raw));
    let mut config = match &config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = log_dir {
        config.log_dir = config::expand_path(&dir);
    }
    Ok(CliArgs {
        config,
        config_path,
        print_config,
    })
}

// The terminal belongs to the UI, so logs go to a daily file instead of stdout.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir).wrap_err_with(|| {
        format!("Failed to create log directory {}", log_dir.display())
    })?;
    let (writer, guard) =
        tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("Failed to install tracing subscriber: {e}"))?;
    Ok(guard)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = parse_cli_args()?;
    if args.print_config {
        println!("{}", args.config.to_pretty_json()?);
        return Ok(());
    }
    let _guard = init_tracing(&args.config.log_dir)?;
    if let Some(path) = &args.config_path {
        tracing::info!(path = %path.display(), "loaded config");
    }
    tracing::info!(log_dir = %args.config.log_dir.display(), "starting kerzh-demo");
    client::run_app(args.config).await
}
