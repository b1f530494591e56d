//! Component L — CLI entry point.
//!
//! Wires the track loader, timeline rewriter, payload builder, injection client, query
//! rectangle planner, observer adapter, and evaluator together into two subcommands.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use rid_qualifier_harness::auth::{AuthProvider, StaticTokenProvider};
use rid_qualifier_harness::config::load_config;
use rid_qualifier_harness::error::{HarnessError, Result};
use rid_qualifier_harness::findings::Findings;
use rid_qualifier_harness::geometry::HaversineGeoMath;
use rid_qualifier_harness::injected::InjectedFlight;
use rid_qualifier_harness::injection::InjectionClient;
use rid_qualifier_harness::log_format::TargetFirstFormat;
use rid_qualifier_harness::observer::HttpObserver;
use rid_qualifier_harness::payload::build_test_payloads;
use rid_qualifier_harness::scheduler::{run_polling_loop, NamedObserver};
use rid_qualifier_harness::track::load_tracks;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rid-harness", about = "RID conformance-testing harness")]
struct Cli {
    #[arg(long = "log-level", default_value = "info", global = true)]
    log_level: String,

    #[arg(long = "bearer-token", global = true)]
    bearer_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and submit injection payloads to every configured USS.
    Inject {
        #[arg(long)]
        config: PathBuf,
        #[arg(long = "tracks-root")]
        tracks_root: PathBuf,
    },
    /// Re-derive the injected flight set and poll observers until t_end.
    Evaluate {
        #[arg(long)]
        config: PathBuf,
        #[arg(long = "tracks-root")]
        tracks_root: PathBuf,
        /// `<name>=<url>`, repeatable.
        #[arg(long = "observer", value_parser = parse_observer)]
        observers: Vec<(String, String)>,
    },
}

fn parse_observer(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, url)| (name.to_string(), url.to_string()))
        .ok_or_else(|| format!("expected <name>=<url>, got '{raw}'"))
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(TargetFirstFormat)
        .init();
}

fn resolve_token(cli_token: &Option<String>) -> Box<dyn AuthProvider> {
    let token = cli_token
        .clone()
        .or_else(|| std::env::var("RID_HARNESS_TOKEN").ok())
        .unwrap_or_default();
    Box::new(StaticTokenProvider::new(token))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Command::Inject { config, tracks_root } => run_inject(config, tracks_root, &cli.bearer_token).await,
        Command::Evaluate {
            config,
            tracks_root,
            observers,
        } => run_evaluate(config, tracks_root, observers, &cli.bearer_token).await,
    }
}

async fn run_inject(
    config_path: PathBuf,
    tracks_root: PathBuf,
    bearer_token: &Option<String>,
) -> Result<()> {
    let harness_config = load_config(&config_path)?;
    let tracks = load_tracks(&tracks_root, &harness_config.test.locale)?;
    let payloads = build_test_payloads(&harness_config.test, &tracks)?;

    let client = InjectionClient::new(harness_config.rid_version.injection_scope, resolve_token(bearer_token));
    let mut findings = Findings::new();
    client.submit_all(&payloads, &mut findings).await?;

    for payload in &payloads {
        println!(
            "{} -> test_id={}",
            payload.uss.name, payload.injection_payload.test_id
        );
    }

    Ok(())
}

async fn run_evaluate(
    config_path: PathBuf,
    tracks_root: PathBuf,
    observer_args: Vec<(String, String)>,
    bearer_token: &Option<String>,
) -> Result<()> {
    let harness_config = load_config(&config_path)?;
    let tracks = load_tracks(&tracks_root, &harness_config.test.locale)?;
    let payloads = build_test_payloads(&harness_config.test, &tracks)?;

    let injected_flights: Vec<InjectedFlight> = payloads
        .iter()
        .flat_map(|payload| {
            payload
                .injection_payload
                .requested_flights
                .iter()
                .cloned()
                .map(|flight| InjectedFlight {
                    uss_name: payload.uss.name.clone(),
                    flight,
                })
        })
        .collect();

    if observer_args.is_empty() {
        return Err(HarnessError::Config(
            "evaluate requires at least one --observer <name>=<url>".to_string(),
        ));
    }

    let observers: Vec<NamedObserver> = observer_args
        .into_iter()
        .map(|(name, url)| NamedObserver {
            observer: Box::new(HttpObserver::new(
                url,
                harness_config.rid_version.read_scope,
                resolve_token(bearer_token),
            )),
            name,
        })
        .collect();

    let geo_math = HaversineGeoMath;
    let cancelled = Arc::new(AtomicBool::new(false));
    let mut findings = Findings::new();

    let ctrl_c_cancelled = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received interrupt, stopping after the current poll");
            ctrl_c_cancelled.store(true, Ordering::SeqCst);
        }
    });

    run_polling_loop(
        &injected_flights,
        &observers,
        &harness_config.rid_version,
        &harness_config.evaluation,
        &geo_math,
        &cancelled,
        &mut findings,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&findings).expect("Findings always serializes"));

    Ok(())
}
