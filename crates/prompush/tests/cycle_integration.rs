use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use chrono::{TimeZone, Utc};
use prompush::{run_cycle_once, ConstantValue, Config, CycleError, CycleStats, FailurePolicy, Pusher};
use prompush_core::{Exemplar, Label, Sample, WriteRequest};
use prompush_remote_write::{decode_compressed, TransmitError};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Receiver {
    status: StatusCode,
    requests: Arc<Mutex<Vec<WriteRequest>>>,
}

async fn receive(State(receiver): State<Receiver>, body: Bytes) -> StatusCode {
    let request = decode_compressed(&body).expect("body should decode");
    receiver.requests.lock().unwrap().push(request);
    receiver.status
}

async fn spawn_receiver(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<WriteRequest>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/v1/push", post(receive))
        .with_state(Receiver {
            status,
            requests: requests.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, requests)
}

fn config_for(addr: SocketAddr) -> Config {
    let mut config = Config::default();
    config.push.host = addr.to_string();
    config.push.username = "alice".to_string();
    config.push.password = "secret".to_string();
    config
}

#[tokio::test]
async fn cycle_pushes_expected_write_request() {
    let (addr, requests) = spawn_receiver(StatusCode::NO_CONTENT).await;
    let mut pusher = Pusher::with_values(config_for(addr), ConstantValue(0.42)).unwrap();
    let t0 = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    let series = pusher.run_cycle_at(t0).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].timeseries.len(), 1);

    let received = &requests[0].timeseries[0];
    assert_eq!(received, &series);
    assert_eq!(
        received.labels,
        vec![
            Label::new("__name__", "prompush_series"),
            Label::new("job", "prompush"),
            Label::new("user", "alice"),
        ]
    );
    assert_eq!(
        received.samples,
        vec![Sample {
            value: 0.42,
            timestamp: 1_700_000_000_000
        }]
    );
    assert_eq!(
        received.exemplars,
        vec![Exemplar {
            labels: vec![Label::new("trace_id", "1234")],
            value: 0.42,
            timestamp: 1_700_000_000_000,
        }]
    );
}

#[tokio::test]
async fn rejected_cycle_surfaces_status() {
    let (addr, requests) = spawn_receiver(StatusCode::UNAUTHORIZED).await;
    let mut pusher = Pusher::with_values(config_for(addr), ConstantValue(0.1)).unwrap();

    let err = pusher.run_cycle_once().await.unwrap_err();
    match err {
        CycleError::Transmit(TransmitError::UnexpectedStatus { status, .. }) => {
            assert_eq!(status, 401)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn run_stops_after_max_cycles() {
    let (addr, requests) = spawn_receiver(StatusCode::OK).await;
    let mut config = config_for(addr);
    config.push.interval_ms = 20;
    config.push.max_cycles = Some(3);

    let mut pusher = Pusher::new(config).unwrap();
    let stats = pusher.run().await.unwrap();

    assert_eq!(
        stats,
        CycleStats {
            cycles: 3,
            succeeded: 3,
            failed: 0
        }
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    for request in requests.iter() {
        let series = &request.timeseries[0];
        assert_eq!(series.exemplars[0].value, series.samples[0].value);
        assert_eq!(series.exemplars[0].timestamp, series.samples[0].timestamp);
    }
}

#[tokio::test]
async fn fail_fast_returns_first_rejection() {
    let (addr, requests) = spawn_receiver(StatusCode::SERVICE_UNAVAILABLE).await;
    let mut config = config_for(addr);
    config.push.interval_ms = 20;
    config.push.max_cycles = Some(5);
    config.failure = FailurePolicy::FailFast;

    let mut pusher = Pusher::new(config).unwrap();
    let err = pusher.run().await.unwrap_err();

    assert!(matches!(
        err,
        CycleError::Transmit(TransmitError::UnexpectedStatus { status: 503, .. })
    ));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn one_shot_cycle() {
    let (addr, requests) = spawn_receiver(StatusCode::NO_CONTENT).await;

    run_cycle_once(&config_for(addr)).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].timeseries[0].metric_name(), Some("prompush_series"));
}
