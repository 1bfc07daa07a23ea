//! tubewire CLI Client
//!
//! Command-line interface for interacting with a beanstalkd server.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use tubewire::{Address, BodyCodec, Client, Config, Job, Stats, TubeError};

/// tubewire CLI
#[derive(Parser, Debug)]
#[command(name = "tubewire-cli")]
#[command(about = "CLI for beanstalkd work queues")]
#[command(version)]
struct Args {
    /// Server address (host:port or unix:/path)
    #[arg(short, long, default_value = "127.0.0.1:11300")]
    server: Address,

    /// Tube to use and watch
    #[arg(short, long, default_value = tubewire::DEFAULT_TUBE)]
    tube: String,

    /// Body codec (utf8, ascii, raw)
    #[arg(long, default_value = "utf8")]
    codec: BodyCodec,

    /// Output format for jobs, stats and tube lists
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a job
    Put {
        /// Job body
        body: String,

        #[arg(short, long, default_value_t = tubewire::DEFAULT_PRIORITY)]
        priority: u32,

        /// Delay in seconds
        #[arg(short, long, default_value_t = 0)]
        delay: u64,

        /// Time to run in seconds
        #[arg(long, default_value_t = 60)]
        ttr: u64,
    },

    /// Reserve a job
    Reserve {
        /// Seconds to wait; blocks indefinitely when omitted
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Delete a job
    Delete { id: u64 },

    /// Bury a reserved job
    Bury { id: u64 },

    /// Kick up to BOUND buried or delayed jobs
    Kick { bound: u64 },

    /// Kick a single job
    KickJob { id: u64 },

    /// Show a job by id
    Peek { id: u64 },

    /// Show the next ready job
    PeekReady,

    /// Show the next delayed job
    PeekDelayed,

    /// Show the oldest buried job
    PeekBuried,

    /// Server statistics
    Stats,

    /// Tube statistics
    StatsTube { tube: String },

    /// Job statistics
    StatsJob { id: u64 },

    /// List all tubes
    Tubes,

    /// Pause a tube for DELAY seconds
    PauseTube { tube: String, delay: u64 },
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,tubewire=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(TubeError::TimedOut) => {
            println!("no job ready");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> tubewire::Result<()> {
    let config = Config::builder()
        .address(args.server)
        .use_tube(args.tube.clone())
        .watch([args.tube])
        .codec(args.codec)
        .build();
    let client = Client::connect(config)?;
    let output = args.output;

    match args.command {
        Commands::Put {
            body,
            priority,
            delay,
            ttr,
        } => {
            let id = client.put_with(
                body,
                priority,
                Duration::from_secs(delay),
                Duration::from_secs(ttr),
            )?;
            println!("{}", id);
        }
        Commands::Reserve { timeout } => {
            let job = match timeout {
                Some(secs) => client.reserve_with_timeout(Duration::from_secs(secs))?,
                None => client.reserve()?,
            };
            print_job(&job, output)?;
        }
        Commands::Delete { id } => client.delete(id)?,
        Commands::Bury { id } => client.bury(id)?,
        Commands::Kick { bound } => println!("{}", client.kick(bound)?),
        Commands::KickJob { id } => client.kick_job(id)?,
        Commands::Peek { id } => print_job(&client.peek(id)?, output)?,
        Commands::PeekReady => print_job(&client.peek_ready()?, output)?,
        Commands::PeekDelayed => print_job(&client.peek_delayed()?, output)?,
        Commands::PeekBuried => print_job(&client.peek_buried()?, output)?,
        Commands::Stats => print_stats(&client.stats()?, output)?,
        Commands::StatsTube { tube } => print_stats(&client.stats_tube(&tube)?, output)?,
        Commands::StatsJob { id } => print_stats(&client.stats_job(id)?, output)?,
        Commands::Tubes => {
            let tubes = client.tubes()?;
            match output {
                OutputFormat::Text => {
                    for tube in &tubes {
                        println!("{}", tube);
                    }
                }
                OutputFormat::Json => print_json(&tubes)?,
            }
        }
        Commands::PauseTube { tube, delay } => {
            client.pause_tube(&tube, Duration::from_secs(delay))?
        }
    }

    client.close()
}

fn print_job(job: &Job, output: OutputFormat) -> tubewire::Result<()> {
    match output {
        OutputFormat::Text => println!("{}\t{}", job.id, job.body),
        OutputFormat::Json => print_json(job)?,
    }
    Ok(())
}

fn print_stats(stats: &Stats, output: OutputFormat) -> tubewire::Result<()> {
    match output {
        OutputFormat::Text => {
            for (key, value) in stats {
                println!("{}: {}", key, value);
            }
        }
        OutputFormat::Json => print_json(stats)?,
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> tubewire::Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| TubeError::Encoding(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
