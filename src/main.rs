use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use unbound_forwards::config::{DEFAULT_CONTROL, DEFAULT_SOURCE};
use unbound_forwards::{
    ConsoleReporter, ForwardError, ForwardsConfig, Reconciler, Reporter, SyslogAlert,
    UnboundControl, write_plan,
};

/// Synchronize Unbound forward zones with config files without reloading Unbound
#[derive(Parser, Debug)]
#[command(name = "unbound-forwards", author, version, about, long_about = None)]
struct Cli {
    /// Config files holding forward-zone stanzas
    #[arg(value_name = "SOURCE", default_value = DEFAULT_SOURCE)]
    sources: Vec<PathBuf>,

    /// Path to unbound-control
    #[arg(long, env = "UNBOUND_FORWARDS_CONTROL", default_value = DEFAULT_CONTROL)]
    control: PathBuf,

    /// Print the planned changes without applying them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Exit non-zero when the live config still differs after applying
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

impl Cli {
    fn config(&self) -> ForwardsConfig {
        ForwardsConfig::default()
            .with_sources(self.sources.iter().cloned())
            .with_control(&self.control)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let config = cli.config();
    let reconciler = Reconciler::new(UnboundControl::new(&config.control), config.sources);

    if cli.dry_run {
        return match reconciler.plan() {
            Ok(delta) => {
                if let Err(e) = write_plan(&mut std::io::stdout().lock(), &delta) {
                    tracing::warn!(error = %e, "Failed to write plan");
                }
                ExitCode::SUCCESS
            }
            Err(e) => fail(&e),
        };
    }

    let result = match reconciler.reconcile() {
        Ok(result) => result,
        Err(e) => return fail(&e),
    };

    let stdout = std::io::stdout();
    let interactive = stdout.is_terminal();
    ConsoleReporter::new(stdout.lock(), SyslogAlert::new("unbound-forwards"), interactive)
        .report(&result);

    if cli.strict {
        if let Err(e) = result.ensure_converged() {
            return fail(&e);
        }
    }
    ExitCode::SUCCESS
}

/// Drift under `--strict` exits 2; aborted runs exit 1.
fn fail(error: &ForwardError) -> ExitCode {
    eprintln!("Error: {error}");
    exit_code(error)
}

fn exit_code(error: &ForwardError) -> ExitCode {
    if error.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::from(2)
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
