use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crossbeam_channel::RecvTimeoutError;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docunlock::config::Config;
use docunlock::oracle::{DigestOracle, Outcome, PasswordOracle};
use docunlock::oracle::digest::password_digest;
use docunlock::search::candidate::estimate_keyspace;
use docunlock::search::result::format_duration;
use docunlock::search::{
    CharsetSpec, LengthRange, SearchCoordinator, SearchEvent, SessionReport, StrategyKind,
    StrategyParams,
};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "docunlock")]
#[command(about = "docunlock - password recovery for locked documents")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<CliLogFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// CLI log format selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliLogFormat {
    /// Human-readable text
    Text,
    /// One JSON object per line
    Json,
}

impl CliLogFormat {
    fn as_str(self) -> &'static str {
        match self {
            CliLogFormat::Text => "text",
            CliLogFormat::Json => "json",
        }
    }
}

/// Character classes of the incremental alphabet
#[derive(clap::Args, Clone, Copy, Debug)]
struct CharsetArgs {
    /// Include digits 0-9
    #[arg(long)]
    numbers: bool,
    /// Include the special characters !@#$%^&*()
    #[arg(long)]
    special_chars: bool,
    /// Include lowercase and uppercase letters
    #[arg(long)]
    letters: bool,
}

impl From<CharsetArgs> for CharsetSpec {
    fn from(args: CharsetArgs) -> Self {
        CharsetSpec::default()
            .with_numbers(args.numbers)
            .with_special_chars(args.special_chars)
            .with_letters(args.letters)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the password of a locked document
    Crack {
        /// Locked document (holds the SHA-256 digest of its password)
        document: PathBuf,
        /// Replay passwords from this wordlist, one per line
        #[arg(long)]
        wordlist: Option<PathBuf>,
        /// Enumerate every string over the selected character classes
        #[arg(long)]
        incremental: bool,
        #[command(flatten)]
        charset: CharsetArgs,
        /// Try random letters+digits strings until stopped
        #[arg(long)]
        random: bool,
        /// Shortest random candidate
        #[arg(long, default_value_t = 4)]
        min_length: usize,
        /// Longest random candidate
        #[arg(long, default_value_t = 8)]
        max_length: usize,
        /// Seed for the random strategy
        #[arg(long)]
        seed: Option<u64>,
        /// Stop every strategy after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Print the size of an incremental keyspace
    Estimate {
        #[command(flatten)]
        charset: CharsetArgs,
        /// Shortest length (defaults to the configured value)
        #[arg(long)]
        min_length: Option<usize>,
        /// Longest length (defaults to the configured value)
        #[arg(long)]
        max_length: Option<usize>,
    },
    /// Measure how many passwords per second the oracle checks
    Benchmark {
        /// Locked document to check against
        document: PathBuf,
        /// Number of attempts to time
        #[arg(long, default_value_t = 100_000)]
        count: u64,
    },
    /// Print the digest a locked document stores for a password
    Digest {
        /// Password to hash
        password: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let format = args
        .log_format
        .map(CliLogFormat::as_str)
        .unwrap_or(config.logging.format.as_str());
    setup_tracing(&config.logging.level, format, args.verbose)?;

    match args.command {
        Commands::Crack {
            document,
            wordlist,
            incremental,
            charset,
            random,
            min_length,
            max_length,
            seed,
            timeout,
        } => {
            let mut plan = Vec::new();
            if let Some(path) = wordlist {
                plan.push(StrategyParams::Wordlist { path });
            }
            if incremental {
                let mut charset = CharsetSpec::from(charset);
                if charset.is_empty() {
                    charset = charset.with_letters(true);
                }
                plan.push(StrategyParams::Incremental { charset });
            }
            if random {
                plan.push(StrategyParams::Random {
                    lengths: LengthRange {
                        min: min_length,
                        max: max_length,
                    },
                });
            }
            if plan.is_empty() {
                bail!("select at least one strategy: --wordlist, --incremental or --random");
            }

            let timeout = timeout.map(Duration::from_secs);
            let found = crack(&config, document, plan, seed, timeout)?;
            if !found {
                std::process::exit(1);
            }
        }
        Commands::Estimate {
            charset,
            min_length,
            max_length,
        } => {
            let alphabet = CharsetSpec::from(charset).alphabet();
            if alphabet.is_empty() {
                bail!(docunlock::SearchError::EmptyAlphabet);
            }
            let lengths = LengthRange::new(
                min_length.unwrap_or(config.search.incremental_min_length),
                max_length.unwrap_or(config.search.incremental_max_length),
            )?;

            println!("Alphabet: {} ({} characters)", alphabet, alphabet.len());
            println!("Lengths: {}", lengths);
            println!(
                "Keyspace: {}",
                estimate_keyspace(alphabet.len(), lengths.as_range())
            );
        }
        Commands::Benchmark { document, count } => {
            benchmark(document, count)?;
        }
        Commands::Digest { password } => {
            println!("{}", password_digest(&password));
        }
    }

    Ok(())
}

/// Install the global subscriber
fn setup_tracing(level: &str, format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("docunlock=debug,warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("docunlock={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}

/// Run the planned strategies concurrently and print the report.
/// Returns whether the password was found.
fn crack(
    config: &Config,
    document: PathBuf,
    plan: Vec<StrategyParams>,
    seed: Option<u64>,
    timeout: Option<Duration>,
) -> Result<bool> {
    let mut coordinator_config = config.coordinator_config()?;
    if seed.is_some() {
        coordinator_config = coordinator_config.with_seed_option(seed);
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("failed to install interrupt handler")?;
    }

    println!("Cracking: {}", document.display());
    let coordinator = SearchCoordinator::new(DigestOracle::new(document), coordinator_config);
    let events = coordinator.events();

    let kinds: Vec<StrategyKind> = plan.iter().map(StrategyParams::kind).collect();
    for params in plan {
        let kind = params.kind();
        describe(&params, &coordinator);
        if let Err(e) = coordinator.start(params) {
            // Stopping any strategy stops the ones already launched.
            coordinator.stop(kind);
            coordinator.wait();
            return Err(e).with_context(|| format!("failed to start {kind} search"));
        }
    }

    println!("Press Ctrl+C to stop.");
    let deadline = timeout.map(|t| Instant::now() + t);
    let mut stopping = false;
    while coordinator.is_running() {
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => print_event(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if stopping {
            continue;
        }
        if interrupted.load(Ordering::SeqCst) {
            println!("\nInterrupted, stopping all strategies...");
            tracing::warn!("interrupted, stopping search");
            coordinator.stop(kinds[0]);
            stopping = true;
        } else if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            tracing::warn!(timeout = ?timeout, "timeout reached, stopping search");
            coordinator.stop(kinds[0]);
            stopping = true;
        }
    }
    for event in events.try_iter() {
        print_event(&event);
    }

    let report = coordinator.wait();
    print_report(&report);
    Ok(report.found.is_some())
}

fn describe(params: &StrategyParams, coordinator: &SearchCoordinator) {
    match params {
        StrategyParams::Wordlist { path } => {
            println!("  Wordlist: {}", path.display());
        }
        StrategyParams::Incremental { charset } => {
            let alphabet = charset.alphabet();
            let lengths = coordinator.config().incremental_lengths;
            println!(
                "  Incremental: {} characters, lengths {}, keyspace {}",
                alphabet.len(),
                lengths,
                estimate_keyspace(alphabet.len(), lengths.as_range())
            );
        }
        StrategyParams::Random { lengths } => {
            println!("  Random: lengths {}", lengths);
            if let Some(seed) = coordinator.config().seed {
                println!("  Seed: {}", seed);
            }
        }
    }
}

fn print_event(event: &SearchEvent) {
    match event {
        SearchEvent::Started { strategy } => println!("[{}] started", strategy),
        SearchEvent::Progress(progress) => eprintln!(
            "[{}] {} attempts, {} elapsed, trying {:?}",
            progress.strategy,
            progress.attempts,
            format_duration(progress.elapsed),
            progress.candidate
        ),
        SearchEvent::Finished {
            strategy, status, ..
        } => println!("[{}] {}", strategy, status),
    }
}

fn print_report(report: &SessionReport) {
    match &report.found {
        Some(found) => {
            println!("\nPassword found: {}", found.password);
            println!("  Found by: {}", found.strategy);
            println!("  Time: {}", format_duration(found.elapsed));
        }
        None => println!("\nPassword not found."),
    }

    println!("\nSearch Statistics:");
    let mut total_attempts = 0u64;
    for (kind, outcome) in &report.strategies {
        match outcome {
            Ok(strategy) => {
                println!(
                    "  {} [{}]",
                    strategy.statistics.format_summary(),
                    strategy.result
                );
                total_attempts += strategy.statistics.attempts;
            }
            Err(e) => println!("  {:<12} error: {}", kind, e),
        }
    }
    println!("\nTotal attempts: {}", total_attempts);
}

/// Time `count` rejected attempts against the document's oracle.
fn benchmark(document: PathBuf, count: u64) -> Result<()> {
    println!("Benchmarking: {}", document.display());
    let oracle = DigestOracle::new(document);

    let start = Instant::now();
    for i in 0..count {
        if let Outcome::Malformed(reason) = oracle.try_password(&format!("test{i}")) {
            bail!("document cannot be checked: {reason}");
        }
    }
    let elapsed = start.elapsed();

    let rate = if elapsed.as_secs_f64() > 0.0 {
        count as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    println!("Attempts: {} in {}", count, format_duration(elapsed));
    println!("Rate: {:.0} passwords/second", rate);
    Ok(())
}
