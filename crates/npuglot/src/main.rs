//! npuglot - Airoha NPU / SoC status viewer.
//!
//! Polls the router's LuCI JSON-RPC endpoint and shows CPU frequency,
//! NPU state and the PPE flow-offload table in the terminal. With
//! `--controls` the governor, maximum frequency and overclock can be set.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::File;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use npuglot_core::config::{
    ANONYMOUS_SESSION, DEFAULT_ENDPOINT, DEFAULT_FLOW_ROW_CAP, DEFAULT_OBJECT, DashboardConfig,
};
use npuglot_core::provider::{LiveProvider, SnapshotProvider};
use npuglot_core::rpc::{MockRpc, NpuRpc, UbusClient};
use npuglot_core::tui::App;
use npuglot_core::view::{Capabilities, render_initial, render_plain};

/// Redraw rate of the terminal UI. Polling runs on its own interval.
const UI_TICK: Duration = Duration::from_millis(250);

/// Airoha NPU / SoC status viewer.
#[derive(Parser)]
#[command(name = "npuglot", about = "Airoha NPU / SoC status viewer", version)]
struct Args {
    /// LuCI ubus JSON-RPC endpoint.
    #[arg(short, long, env = "NPUGLOT_URL", default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// ubus session id (from a LuCI login). Anonymous by default.
    #[arg(short, long, env = "NPUGLOT_SESSION", default_value = ANONYMOUS_SESSION, hide_env_values = true)]
    session: String,

    /// ubus object providing the status procedures.
    #[arg(long, env = "NPUGLOT_OBJECT", default_value = DEFAULT_OBJECT)]
    object: String,

    /// Poll interval in seconds.
    #[arg(short, long, env = "NPUGLOT_INTERVAL", default_value = "5", value_parser = parse_interval)]
    interval: Duration,

    /// Timeout of each remote call in seconds.
    #[arg(long, env = "NPUGLOT_TIMEOUT", default_value = "5", value_parser = parse_interval)]
    timeout: Duration,

    /// Enable governor / max-frequency / overclock controls.
    #[arg(short, long, env = "NPUGLOT_CONTROLS")]
    controls: bool,

    /// Maximum number of flow rows shown.
    #[arg(long, default_value_t = DEFAULT_FLOW_ROW_CAP)]
    rows: usize,

    /// Fetch one snapshot, print it as text and exit.
    #[arg(long)]
    once: bool,

    /// Use a built-in simulated device instead of the network.
    #[arg(long)]
    demo: bool,

    /// Write logs to this file (the TUI never logs to the terminal).
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn config(&self) -> DashboardConfig {
        DashboardConfig {
            endpoint: self.url.clone(),
            session: self.session.clone(),
            object: self.object.clone(),
            poll_interval: self.interval,
            rpc_timeout: self.timeout,
            flow_row_cap: self.rows,
            controls: self.controls,
        }
    }
}

/// Parses a whole number of seconds, at least 1.
fn parse_interval(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid seconds '{}': {}", s, e))?;
    if secs == 0 {
        return Err("interval must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Where log lines go.
enum LogTarget {
    Stderr,
    File(File),
    Discard,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool, target: LogTarget) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for crate_name in ["npuglot", "npuglot_core"] {
        if let Ok(directive) = format!("{}={}", crate_name, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
}

/// Headless mode: one snapshot as plain text on stdout.
fn dump_once<R: NpuRpc + 'static>(rpc: Arc<R>, config: &DashboardConfig) -> ExitCode {
    let mut provider = LiveProvider::new(rpc);
    let snapshot = provider.advance();
    let surface = render_initial(
        &snapshot,
        Capabilities {
            controls: config.controls,
        },
        config.flow_row_cap,
    );
    print!("{}", render_plain(&surface));

    match provider.last_error() {
        Some(e) => {
            error!(error = %e, "snapshot incomplete");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

fn run<R: NpuRpc + 'static>(rpc: Arc<R>, args: &Args, config: &DashboardConfig) -> ExitCode {
    if args.once {
        return dump_once(rpc, config);
    }
    match App::new(rpc, config, !args.demo).run(UI_TICK) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terminal error");
            eprintln!("npuglot: terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let target = match (&args.log_file, args.once) {
        (Some(path), _) => match File::create(path) {
            Ok(file) => LogTarget::File(file),
            Err(e) => {
                eprintln!("npuglot: cannot open log file {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Discard,
    };
    init_logging(args.verbose, args.quiet, target);

    let config = args.config();
    info!(
        version = npuglot_core::VERSION,
        endpoint = %config.endpoint,
        object = %config.object,
        interval_s = config.poll_interval.as_secs(),
        controls = config.controls,
        demo = args.demo,
        "npuglot starting"
    );

    if args.demo {
        return run(Arc::new(MockRpc::typical_device()), &args, &config);
    }

    match UbusClient::new(&config) {
        Ok(client) => run(Arc::new(client), &args, &config),
        Err(e) => {
            error!(error = %e, "cannot create RPC client");
            eprintln!("npuglot: {}", e);
            ExitCode::FAILURE
        }
    }
}
