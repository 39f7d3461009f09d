use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use memset_dns01::challenge::{ChallengeProvider, challenge_record};
use memset_dns01::error::Result;
use memset_dns01::provider::DnsProvider;

mod config;

#[derive(Parser)]
#[clap(about = "Solve ACME DNS-01 challenges with Memset DNS")]
struct Args {
    /// YAML config file, the MEMSET_* environment is used when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print how long to wait for the record to propagate
    Timeout,

    /// Create the challenge record, keep it until stdin sees a line or EOF,
    /// then remove it again
    Present {
        #[clap(long)]
        domain: String,

        #[clap(long, default_value = "")]
        token: String,

        #[clap(long)]
        key_auth: String,
    },

    /// Show the zone the challenge record for a domain would be created in
    Zone {
        #[clap(long)]
        domain: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = config::Parser::load(args.config)?;
    let provider = DnsProvider::new(cfg)?;

    match args.command {
        Command::Timeout => {
            let (timeout, interval) = provider.timeout();
            println!("timeout={}s interval={}s", timeout.as_secs(), interval.as_secs());
        }
        Command::Present {
            domain,
            token,
            key_auth,
        } => {
            let (fqdn, value) = challenge_record(&domain, &key_auth);
            provider.present(&domain, &token, &key_auth).await?;

            let (timeout, interval) = provider.timeout();
            println!("{} TXT \"{}\"", fqdn, value);
            println!("timeout={}s interval={}s", timeout.as_secs(), interval.as_secs());

            // The record ID only lives in this process, so hold on to it
            // until the caller is done validating.
            let mut line = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await?;

            info!("removing challenge record for {}", domain);
            provider.clean_up(&domain, &token, &key_auth).await?;
        }
        Command::Zone { domain } => {
            let (fqdn, _) = challenge_record(&domain, "");
            let (apex, zone) = provider.find_zone(&fqdn).await?;
            println!("{} zone_id={}", apex, zone.id);
        }
    }

    Ok(())
}
