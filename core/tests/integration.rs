//! End-to-end tests against the mock server over real HTTP.
//!
//! # Design
//! Starts the mock server on a random port, then drives every resource
//! client through the default `UreqTransport`, checking that headers,
//! bodies and status handling survive an actual round trip.

use serde_json::json;
use zencoder::{CreateAccount, CreateJob, Pagination, ReportQuery, Zencoder};

/// Start the mock server in a background thread and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/")
}

fn client(base_url: &str, api_key: &str) -> Zencoder {
    Zencoder::builder()
        .api_key(api_key)
        .base_url(base_url)
        .test_mode(true)
        .build_client()
        .unwrap()
}

#[test]
fn job_lifecycle() {
    let base_url = start_server();
    let zen = client(&base_url, mock_server::API_KEY);

    // Step 1: list — should be empty.
    let resp = zen.job.list(Pagination::default()).unwrap();
    assert_eq!(resp.status_code(), 200);
    assert!(resp.body().unwrap().as_array().unwrap().is_empty());

    // Step 2: create a job with two outputs.
    let job = CreateJob::from_input("s3://zencodertesting/test.mov")
        .outputs(json!([{ "label": "web" }, { "label": "mobile" }]));
    let resp = zen.job.create(&job).unwrap();
    assert_eq!(resp.status_code(), 201);
    let created = resp.into_body().unwrap();
    let job_id = created["id"].as_u64().unwrap();
    let output_id = created["outputs"][0]["id"].as_u64().unwrap();

    // Step 3: details reflect test mode and outputs.
    let resp = zen.job.details(job_id).unwrap();
    let details = resp.body().unwrap();
    assert_eq!(details["job"]["test"], true);
    assert_eq!(details["job"]["output_media_files"].as_array().unwrap().len(), 2);

    // Step 4: progress of job, input and output.
    assert_eq!(zen.job.progress(job_id).unwrap().body().unwrap()["state"], "waiting");
    assert_eq!(zen.input.details(job_id).unwrap().body().unwrap()["url"], "s3://zencodertesting/test.mov");
    assert_eq!(zen.input.progress(job_id).unwrap().status_code(), 200);
    assert_eq!(zen.output.details(output_id).unwrap().body().unwrap()["label"], "web");
    assert_eq!(zen.output.progress(output_id).unwrap().body().unwrap()["job_id"], job_id);

    // Step 5: resubmit and cancel answer 204 with no body.
    let resp = zen.job.resubmit(job_id).unwrap();
    assert_eq!(resp.status_code(), 204);
    assert!(resp.body().is_none());

    let resp = zen.job.cancel(job_id).unwrap();
    assert_eq!(resp.status_code(), 204);
    assert!(resp.body().is_none());
    assert_eq!(zen.job.progress(job_id).unwrap().body().unwrap()["state"], "cancelled");

    // Step 6: a one-item page.
    let resp = zen.job.list(Pagination::new(1, 1)).unwrap();
    assert_eq!(resp.body().unwrap().as_array().unwrap().len(), 1);

    // Step 7: unknown ids come back as 404 responses, not errors.
    let resp = zen.job.details(987_654).unwrap();
    assert_eq!(resp.status_code(), 404);
    assert_eq!(resp.body().unwrap()["errors"][0], "Not Found");
}

#[test]
fn live_stream_job() {
    let base_url = start_server();
    let zen = client(&base_url, mock_server::API_KEY);

    let resp = zen.job.create(&CreateJob::live_stream()).unwrap();
    assert_eq!(resp.status_code(), 201);
    let job_id = resp.body().unwrap()["id"].as_u64().unwrap();

    let resp = zen.job.finish(job_id).unwrap();
    assert_eq!(resp.status_code(), 204);
    assert_eq!(zen.job.progress(job_id).unwrap().body().unwrap()["state"], "finished");
}

#[test]
fn account_operations() {
    let base_url = start_server();
    let zen = client(&base_url, mock_server::API_KEY);

    let resp = zen
        .account
        .create(&CreateAccount::new("test@example.com").option("password", json!("foo")))
        .unwrap();
    assert_eq!(resp.status_code(), 201);
    assert_eq!(resp.body().unwrap()["password"], "foo");

    let resp = zen.account.details().unwrap();
    assert_eq!(resp.body().unwrap()["account_state"], "active");
    assert_eq!(resp.body().unwrap()["integration_mode"], false);

    assert_eq!(zen.account.integration().unwrap().status_code(), 204);
    assert_eq!(zen.account.details().unwrap().body().unwrap()["integration_mode"], true);

    // The mock answers 402 with an empty body; the client fills it in.
    let resp = zen.account.live().unwrap();
    assert_eq!(resp.status_code(), 402);
    assert!(resp.raw_body().is_empty());
    assert_eq!(resp.body().unwrap()["message"], "Payment Required");
    assert_eq!(resp.body().unwrap()["status"], "error");
}

#[test]
fn reports() {
    let base_url = start_server();
    let zen = client(&base_url, mock_server::API_KEY);
    let report = zen.report.as_ref().unwrap();

    let query = ReportQuery::new()
        .start_date("2013-05-01".parse().unwrap())
        .grouping("key-customer");

    let resp = report.vod(&query).unwrap();
    assert_eq!(resp.body().unwrap()["total"]["encoded_minutes"], 6);
    assert_eq!(resp.body().unwrap()["statistics"][0]["collected_on"], "2013-05-01");
    assert_eq!(resp.body().unwrap()["statistics"][0]["grouping"], "key-customer");

    let resp = report.live(&ReportQuery::new()).unwrap();
    assert_eq!(resp.body().unwrap()["total"]["stream_hours"], 5);

    let resp = report.all(&ReportQuery::new()).unwrap();
    assert_eq!(resp.body().unwrap()["total"]["vod"]["billable_minutes"], 8);
    assert_eq!(resp.body().unwrap()["total"]["live"]["encoded_hours"], 5);

    assert_eq!(report.minutes(&ReportQuery::new()).unwrap().status_code(), 200);
}

#[test]
fn wrong_api_key_is_a_401_response() {
    let base_url = start_server();
    let zen = client(&base_url, "not-the-key");

    let resp = zen.account.details().unwrap();
    assert_eq!(resp.status_code(), 401);
    assert_eq!(resp.body().unwrap()["errors"][0], "Invalid API key");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let zen = client(&format!("http://{addr}/"), mock_server::API_KEY);

    let err = zen.account.details().unwrap_err();
    assert!(matches!(err, zencoder::ZencoderError::Transport(_)));
}
