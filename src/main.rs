use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ibc_denom_tracker::ibc::client::DEFAULT_TIMEOUT_SECS;
use ibc_denom_tracker::ibc::validate_address;
use ibc_denom_tracker::{
    log_error, log_info, trace_hops, BalanceSource, BalanceTracker, ChainName, LcdClient,
    Registry, Report, ReportFormat, StaticBalances,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ibc-denom-tracker",
    version,
    about = "Find every wrapped form of a token held by an account across IBC-connected chains"
)]
struct Cli {
    /// JSON registry file narrowing or overriding the built-in topology
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track balances of one or more denoms originating on the origin chain
    Track {
        /// Account address on the origin chain
        #[arg(long)]
        account: String,

        /// Base denom to track; repeat to track several
        #[arg(long = "denom", required = true)]
        denoms: Vec<String>,

        /// Replay balances from a JSON file instead of querying the chains
        #[arg(long)]
        balances: Option<PathBuf>,

        /// HTTP timeout for balance queries
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,

        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the denom trace of a base denom after a sequence of hops
    Denom {
        #[arg(long)]
        base: String,

        /// Hop as `source:destination`; repeat in travel order
        #[arg(long = "hop", value_parser = parse_hop)]
        hops: Vec<(ChainName, ChainName)>,
    },
    /// Print an origin account's address on every registered chain
    Address {
        #[arg(long)]
        account: String,
    },
    /// List the registered chains
    Chains,
}

fn parse_hop(s: &str) -> Result<(ChainName, ChainName), String> {
    let (src, dest) = s
        .split_once(':')
        .ok_or_else(|| format!("hop '{}' must look like source:destination", s))?;
    Ok((src.parse()?, dest.parse()?))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(path: Option<&PathBuf>) -> Result<Registry> {
    match path {
        Some(path) => Registry::load(path)
            .with_context(|| format!("failed to load registry from {}", path.display())),
        None => Registry::builtin().context("built-in registry is invalid"),
    }
}

async fn run_track<S: BalanceSource>(
    tracker: BalanceTracker<S>,
    account: &str,
    denoms: &[String],
    format: ReportFormat,
    output: Option<&PathBuf>,
) -> Result<()> {
    let runs = tracker.track_many(denoms, account).await?;
    let report = Report::merge(account, runs)?;

    match output {
        Some(path) => {
            report.write_to(path, format)?;
            log_info!(
                "cli",
                "Report written",
                path = path.display(),
                records = report.record_count(),
            );
        }
        None => print!("{}", report.render(format)?),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let registry = Arc::new(load_registry(cli.registry.as_ref())?);

    match cli.command {
        Command::Track {
            account,
            denoms,
            balances,
            timeout_secs,
            format,
            output,
        } => match balances {
            Some(path) => {
                let source = StaticBalances::load(&path)
                    .with_context(|| format!("failed to load balances from {}", path.display()))?;
                let tracker = BalanceTracker::new(registry, source);
                run_track(tracker, &account, &denoms, format, output.as_ref()).await
            }
            None => {
                let source = LcdClient::new(Duration::from_secs(timeout_secs))?;
                let tracker = BalanceTracker::new(registry, source);
                run_track(tracker, &account, &denoms, format, output.as_ref()).await
            }
        },
        Command::Denom { base, hops } => {
            let traces = trace_hops(&registry, &base, &hops)?;
            println!("{}", base);
            for ((src, dest), trace) in hops.iter().zip(&traces) {
                println!("{} -> {}: {} {}", src, dest, trace.denom, trace.trace);
            }
            Ok(())
        }
        Command::Address { account } => {
            let origin = registry.origin_chain()?;
            validate_address(&account, &origin.bech32_prefix)?;
            for chain in registry.chains() {
                println!("{}: {}", chain.name, registry.address_for(chain.name, &account)?);
            }
            Ok(())
        }
        Command::Chains => {
            for chain in registry.chains() {
                let marker = if chain.name == registry.origin() { " (origin)" } else { "" };
                println!(
                    "{}{} chain_id={} prefix={} rest={}",
                    chain.name, marker, chain.chain_id, chain.bech32_prefix, chain.rest_endpoint
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        log_error!("cli", "Run failed", error = format!("{:#}", e));
        return Err(e);
    }
    Ok(())
}
