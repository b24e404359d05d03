//! Agegate Client CLI
//!
//! Seals synthetic measurement payloads and submits them to the
//! verification API.

use agegate_client::{
    config::Config,
    device::{BrowserSnapshot, MediaDeviceInfo},
    entropy::OsSecureRandom,
    pipeline,
    signal::{GaussianSampler, SignalGenerator},
    transport::SubmissionRequest,
    VERSION,
};
use clap::{Parser, Subcommand};

#[cfg(feature = "transport")]
use agegate_client::transport::{BlockingTransportClient, TransportConfig};

#[derive(Parser)]
#[command(name = "agegate")]
#[command(version = VERSION)]
#[command(about = "Client-side sealing pipeline for age verification payloads", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a payload and print the transport request body
    Seal {
        /// Pretty-print the request JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Seal a payload and submit it (requires transport feature)
    Send {
        /// Override the configured API endpoint
        #[arg(long)]
        url: Option<String>,
    },

    /// Generate a signal set and print summary statistics
    Signals {
        /// Number of raw readings to generate
        #[arg(long)]
        count: Option<usize>,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Seal { pretty } => cmd_seal(pretty),
        Commands::Send { url } => cmd_send(url),
        Commands::Signals { count } => cmd_signals(count),
        Commands::Config => cmd_config(),
    }
}

fn cmd_seal(pretty: bool) {
    let submission = match pipeline::run_with_defaults() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let request = SubmissionRequest::encode(&submission);
    let json = if pretty {
        serde_json::to_string_pretty(&request)
    } else {
        serde_json::to_string(&request)
    };

    match json {
        Ok(body) => println!("{body}"),
        Err(e) => {
            eprintln!("Error serializing request: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(unused_variables)]
fn cmd_send(url: Option<String>) {
    #[cfg(not(feature = "transport"))]
    {
        eprintln!("Error: this build has no transport support.");
        eprintln!("Rebuild with `--features transport` to submit payloads.");
        std::process::exit(1);
    }

    #[cfg(feature = "transport")]
    {
        let config = Config::load().unwrap_or_default();
        let api_url = url.unwrap_or(config.api_url);

        println!("Agegate Client v{VERSION}");
        println!("Endpoint: {api_url}");

        let submission = match pipeline::run_with_defaults() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
        println!("Transaction: {}", submission.transaction_id);

        let transport_config = TransportConfig::new(api_url, config.timeout_secs);
        let client = match BlockingTransportClient::new(transport_config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };

        match client.submit(&submission) {
            Ok(response) => match response.verification_webview_url {
                Some(webview_url) => println!("Verification webview: {webview_url}"),
                None => println!("Submission accepted, no webview issued."),
            },
            Err(e) => {
                eprintln!("Submission failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn cmd_signals(count: Option<usize>) {
    let config = Config::load().unwrap_or_default();
    let count = count.unwrap_or(config.sample_count);

    let mut generator = SignalGenerator::new(GaussianSampler::from_entropy());
    let set = generator.generate(count);

    println!("Raw readings:     {}", set.raw_readings.len());
    println!("Mapped outputs:   {}", set.mapped_outputs.len());
    println!("After 1 pass:     {}", set.filtered_once.len());
    println!("After 2 passes:   {}", set.filtered_twice.len());

    if !set.raw_readings.is_empty() {
        let sum: u32 = set.raw_readings.iter().map(|&r| u32::from(r)).sum();
        let mean = f64::from(sum) / set.raw_readings.len() as f64;
        println!("Raw mean:         {mean:.2}");
    }

    // Exercise the crypto side too so a dry run covers the whole pipeline.
    let mut entropy = OsSecureRandom;
    let mut crypto_generator = SignalGenerator::new(GaussianSampler::from_entropy());
    match pipeline::run(
        &mut crypto_generator,
        &mut entropy,
        BrowserSnapshot::detect(),
        MediaDeviceInfo::default(),
    ) {
        Ok(submission) => println!(
            "Seal check:       ok ({} ciphertext bytes)",
            submission.sealed.ciphertext.len()
        ),
        Err(e) => eprintln!("Seal check:       failed ({e})"),
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}
