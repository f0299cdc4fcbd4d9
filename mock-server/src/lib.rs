//! In-memory stand-in for the parts of the Zencoder API the client speaks.
//!
//! Every route except account creation requires the `Zencoder-Api-Key`
//! header to equal `API_KEY`. Inputs share their job's id; outputs get ids of
//! their own from the same counter.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Key accepted by the mock.
pub const API_KEY: &str = "abcd123";

const API_KEY_HEADER: &str = "zencoder-api-key";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: u64,
    pub label: Option<String>,
    pub url: String,
    pub state: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: u64,
    pub state: String,
    pub input: Option<String>,
    pub test: bool,
    pub live_stream: bool,
    pub outputs: Vec<OutputRecord>,
}

#[derive(Debug)]
pub struct Store {
    jobs: BTreeMap<u64, JobRecord>,
    next_id: u64,
    integration_mode: bool,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            jobs: BTreeMap::new(),
            next_id: 1,
            integration_mode: false,
        }
    }
}

impl Store {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn output(&self, id: u64) -> Option<(&JobRecord, &OutputRecord)> {
        self.jobs
            .values()
            .find_map(|job| job.outputs.iter().find(|o| o.id == id).map(|o| (job, o)))
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the service's `{"errors": [...]}` shape.
pub struct ApiError(StatusCode, &'static str);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "errors": [self.1] }))).into_response()
    }
}

const NOT_FOUND: ApiError = ApiError(StatusCode::NOT_FOUND, "Not Found");

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", get(job_details))
        .route("/jobs/{id}/progress", get(job_progress))
        .route("/jobs/{id}/resubmit", put(resubmit_job))
        .route("/jobs/{id}/cancel", get(cancel_job).put(cancel_job))
        .route("/jobs/{id}/finish", put(finish_job))
        .route("/inputs/{id}", get(input_details))
        .route("/inputs/{id}/progress", get(input_progress))
        .route("/outputs/{id}", get(output_details))
        .route("/outputs/{id}/progress", get(output_progress))
        .route("/account", post(create_account).get(account_details))
        .route("/account/integration", put(account_integration))
        .route("/account/live", put(account_live))
        .route("/reports/{report}", get(report))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(key) if key == API_KEY => Ok(()),
        _ => Err(ApiError(StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

// --- jobs ---

async fn create_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    authorize(&headers)?;

    let source = input["input"].as_str().map(str::to_string);
    let live_stream = input["live_stream"].as_bool().unwrap_or(false);
    if source.is_none() && !live_stream {
        return Err(ApiError(StatusCode::UNPROCESSABLE_ENTITY, "Input must be provided"));
    }

    let mut store = db.write().await;
    let id = store.allocate_id();
    let definitions = input["outputs"].as_array().cloned().unwrap_or_else(|| vec![json!({})]);
    let mut outputs = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let output_id = store.allocate_id();
        outputs.push(OutputRecord {
            id: output_id,
            label: definition["label"].as_str().map(str::to_string),
            url: definition["url"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("s3://zencoder-temp/{output_id}.mp4")),
            state: "waiting".to_string(),
        });
    }

    let job = JobRecord {
        id,
        state: "waiting".to_string(),
        input: source,
        test: input["test"].as_bool().unwrap_or(false),
        live_stream,
        outputs,
    };
    debug!(id, live_stream = job.live_stream, "job created");

    let body = json!({
        "id": job.id,
        "outputs": job.outputs.iter().map(|o| json!({ "id": o.id, "label": o.label, "url": o.url })).collect::<Vec<_>>(),
    });
    store.jobs.insert(id, job);
    Ok((StatusCode::CREATED, Json(body)))
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    50
}

async fn list_jobs(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let skip = params.page.saturating_sub(1) * params.per_page;
    let jobs: Vec<Value> = store
        .jobs
        .values()
        .rev()
        .skip(skip)
        .take(params.per_page)
        .map(|job| json!({ "job": job_json(job) }))
        .collect();
    Ok(Json(jobs))
}

fn job_json(job: &JobRecord) -> Value {
    json!({
        "id": job.id,
        "state": job.state,
        "test": job.test,
        "live_stream": job.live_stream,
        "input_media_file": { "id": job.id, "url": job.input, "state": job.state },
        "output_media_files": job.outputs,
    })
}

async fn job_details(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or(NOT_FOUND)?;
    Ok(Json(json!({ "job": job_json(job) })))
}

async fn job_progress(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or(NOT_FOUND)?;
    Ok(Json(json!({
        "state": job.state,
        "input": { "id": job.id, "state": job.state },
        "outputs": job.outputs.iter().map(|o| json!({ "id": o.id, "state": o.state })).collect::<Vec<_>>(),
    })))
}

async fn set_job_state(db: &Db, id: u64, state: &str) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    let job = store.jobs.get_mut(&id).ok_or(NOT_FOUND)?;
    job.state = state.to_string();
    for output in &mut job.outputs {
        output.state = state.to_string();
    }
    debug!(id, state, "job state changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn resubmit_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    set_job_state(&db, id, "processing").await
}

async fn cancel_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    set_job_state(&db, id, "cancelled").await
}

async fn finish_job(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    let is_live = db.read().await.jobs.get(&id).ok_or(NOT_FOUND)?.live_stream;
    if !is_live {
        return Err(ApiError(StatusCode::UNPROCESSABLE_ENTITY, "Job is not a live stream"));
    }
    set_job_state(&db, id, "finished").await
}

// --- inputs / outputs ---

async fn input_details(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or(NOT_FOUND)?;
    Ok(Json(json!({ "id": job.id, "url": job.input, "state": job.state })))
}

async fn input_progress(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let job = store.jobs.get(&id).ok_or(NOT_FOUND)?;
    Ok(Json(json!({ "state": job.state, "current_event": "Downloading" })))
}

async fn output_details(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let (_, output) = store.output(id).ok_or(NOT_FOUND)?;
    Ok(Json(json!(output)))
}

async fn output_progress(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    let (job, output) = store.output(id).ok_or(NOT_FOUND)?;
    Ok(Json(json!({ "state": output.state, "job_id": job.id, "current_event": "Transcoding" })))
}

// --- account ---

#[derive(Deserialize)]
pub struct CreateAccount {
    pub email: String,
    pub terms_of_service: String,
    pub password: Option<String>,
}

async fn create_account(Json(input): Json<CreateAccount>) -> Result<(StatusCode, Json<Value>), ApiError> {
    if input.terms_of_service != "1" {
        return Err(ApiError(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Terms of service must be accepted",
        ));
    }
    debug!(email = %input.email, "account created");
    let password = input
        .password
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "api_key": Uuid::new_v4().simple().to_string(), "password": password })),
    ))
}

async fn account_details(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let store = db.read().await;
    Ok(Json(json!({
        "account_state": "active",
        "plan": "Growth",
        "minutes_used": 12549,
        "minutes_included": 25000,
        "billing_state": "active",
        "integration_mode": store.integration_mode,
    })))
}

async fn account_integration(State(db): State<Db>, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    db.write().await.integration_mode = true;
    Ok(StatusCode::NO_CONTENT)
}

/// The mock account has no billing information, so going live is refused
/// with an empty 402, as the real service does.
async fn account_live(headers: HeaderMap) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    Ok(StatusCode::PAYMENT_REQUIRED)
}

// --- reports ---

#[derive(Deserialize)]
pub struct ReportParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub grouping: Option<String>,
}

async fn report(
    headers: HeaderMap,
    Path(report): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Value>, ApiError> {
    authorize(&headers)?;
    let statistic = |totals: Value| {
        let mut stat = json!({
            "grouping": params.grouping,
            "collected_on": params.from.as_deref().unwrap_or("2013-05-13"),
        });
        if let (Some(stat), Some(totals)) = (stat.as_object_mut(), totals.as_object()) {
            stat.extend(totals.clone());
        }
        stat
    };
    let vod = json!({ "encoded_minutes": 6, "billable_minutes": 8 });
    let live = json!({ "stream_hours": 5, "encoded_hours": 5 });

    let body = match report.as_str() {
        "minutes" | "vod" => json!({ "statistics": [statistic(vod.clone())], "total": vod }),
        "live" => json!({ "statistics": [statistic(live.clone())], "total": live }),
        "all" => json!({
            "statistics": { "vod": [statistic(vod.clone())], "live": [statistic(live.clone())] },
            "total": { "vod": vod, "live": live },
        }),
        _ => return Err(NOT_FOUND),
    };
    debug!(report = %report, from = ?params.from, to = ?params.to, "report generated");
    Ok(Json(body))
}
