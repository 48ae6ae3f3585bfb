use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use prospect_ai::config::AppConfig;
use prospect_ai::demo;
use prospect_ai::error::AppError;
use prospect_ai::infra::{
    InMemoryCandidateStore, InMemoryEnrichmentStore, RecordingAlertPublisher,
};
use prospect_ai::telemetry;
use prospect_ai::workflows::enrichment::{enrichment_router, EnrichmentCache};
use prospect_ai::workflows::icp::{
    breakdown, fit_score, rescore_candidates, FactorBreakdown, IcpProfile, RescoreError,
};
use prospect_ai::workflows::sourcing::ProspectCsvImporter;
use prospect_ai::workflows::triage::{triage_router, Candidate, TriageError, TriageQueue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Prospecting Orchestrator",
    about = "Run the prospecting triage service or score company exports from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with prospect exports offline
    Prospects {
        #[command(subcommand)]
        command: ProspectsCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Seed the in-memory store with demo candidates and a canned provider
    #[arg(long)]
    demo: bool,
}

#[derive(Subcommand, Debug)]
enum ProspectsCommand {
    /// Score a provider company export against an ICP profile
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// ICP profile as JSON
    #[arg(long)]
    icp: PathBuf,
    /// Provider company export CSV
    #[arg(long)]
    csv: PathBuf,
    /// Include the full scored table in the output
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Prospects {
            command: ProspectsCommand::Score(args),
        } => run_score_report(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let candidate_store = Arc::new(InMemoryCandidateStore::default());
    if args.demo {
        let seeded = demo::seed(&candidate_store).map_err(TriageError::from)?;
        info!(seeded, "demo backlog loaded");
    }

    let alerts = Arc::new(RecordingAlertPublisher::default());
    let queue = TriageQueue::open(
        candidate_store.clone(),
        alerts,
        config.triage,
        Utc::now().date_naive(),
    )?;
    let queue = Arc::new(Mutex::new(queue));

    let enrichment_store = Arc::new(InMemoryEnrichmentStore::default());
    let provider = Arc::new(demo::CannedEnrichmentProvider);
    let cache = EnrichmentCache::new(enrichment_store, provider);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let rescore_store = candidate_store.clone();
    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/prospects/score", post(score_endpoint))
        .route(
            "/api/v1/prospects/rescore",
            post(move |Json(profile): Json<IcpProfile>| {
                let store = rescore_store.clone();
                async move { rescore_endpoint(&store, profile) }
            }),
        )
        .with_state(state)
        .merge(triage_router(queue))
        .merge(enrichment_router(
            candidate_store,
            cache,
            config.enrichment,
        ))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "prospecting orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ScoreRequest {
    profile: IcpProfile,
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
struct ScoredCandidateView {
    id: String,
    name: String,
    fit_score: u8,
    breakdown: FactorBreakdown,
}

#[derive(Debug, Serialize)]
struct ScoreResponse {
    scored: Vec<ScoredCandidateView>,
}

async fn score_endpoint(
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    payload.profile.validate()?;

    let mut scored: Vec<ScoredCandidateView> = payload
        .candidates
        .iter()
        .map(|candidate| ScoredCandidateView {
            id: candidate.id.0.clone(),
            name: candidate.name.clone(),
            fit_score: fit_score(candidate, &payload.profile),
            breakdown: breakdown(candidate, &payload.profile),
        })
        .collect();
    scored.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));

    Ok(Json(ScoreResponse { scored }))
}

fn rescore_endpoint(
    store: &InMemoryCandidateStore,
    profile: IcpProfile,
) -> axum::response::Response {
    match rescore_candidates(store, &profile) {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({ "scored": summary.scored, "changed": summary.changed })),
        )
            .into_response(),
        Err(RescoreError::Weights(err)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(RescoreError::Store(err)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string(), "action": "retry" })),
        )
            .into_response(),
    }
}

fn run_score_report(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { icp, csv, list } = args;

    let profile_raw = std::fs::read_to_string(icp)?;
    let profile: IcpProfile = serde_json::from_str(&profile_raw)?;
    profile.validate()?;

    let mut candidates = ProspectCsvImporter::from_path(csv)?;
    for candidate in &mut candidates {
        candidate.fit_score = fit_score(candidate, &profile);
    }
    candidates.sort_by(|a, b| b.fit_score.cmp(&a.fit_score));

    render_score_report(&profile, &candidates, list);
    Ok(())
}

fn render_score_report(profile: &IcpProfile, candidates: &[Candidate], list: bool) {
    println!("Prospect scoring report");
    println!(
        "ICP: {} industries, {} locations{}, weights {}/{}/{}/{}",
        profile.industries.len(),
        profile.locations.len(),
        if profile.is_nationwide {
            " (nationwide)"
        } else {
            ""
        },
        profile.weights.industry,
        profile.weights.location,
        profile.weights.employee_size,
        profile.weights.revenue
    );
    println!("Candidates scored: {}", candidates.len());

    println!("\nTop candidates");
    for candidate in candidates.iter().take(10) {
        println!(
            "- {} ({}) score {}",
            candidate.name, candidate.id.0, candidate.fit_score
        );
    }

    if list {
        println!("\nFull breakdown");
        for candidate in candidates {
            let parts = breakdown(candidate, profile);
            println!(
                "- {} | {} | industry {} | location {} | size {} | revenue {} | total {}",
                candidate.id.0,
                candidate.name,
                parts.industry,
                parts.location,
                parts.employee_size,
                parts.revenue,
                candidate.fit_score
            );
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
