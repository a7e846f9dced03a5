//! Integration Tests - Live Feed Client End-to-end
//!
//! Drives `LiveFeedClient` through scripted transports, a recording
//! scheduler and a real local WebSocket server. Uses mockall for the
//! status sink and tokio::test for async tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::SinkExt;
use mockall::mock;
use mockall::predicate::*;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use pos_live_feed::adapters::feeds::WsTransport;
use pos_live_feed::adapters::metrics::FeedMetrics;
use pos_live_feed::domain::connection::ConnectionState;
use pos_live_feed::domain::error::FeedError;
use pos_live_feed::ports::{FeedConnection, FeedTransport, Frame, Scheduler};
use pos_live_feed::usecases::LiveFeedClient;

// ---- Mock Definitions ----

mock! {
    pub Status {}

    impl pos_live_feed::ports::StatusSink for Status {
        fn report(&self, connected: bool);
    }
}

/// One scripted connection attempt.
enum Attempt {
    /// Dial fails.
    Refuse,
    /// Dial succeeds and replays these frames, then the stream ends.
    Open(Vec<Result<Frame, FeedError>>),
}

struct ScriptedConnection {
    frames: VecDeque<Result<Frame, FeedError>>,
    closed: Arc<Mutex<u32>>,
}

#[async_trait]
impl FeedConnection for ScriptedConnection {
    async fn next_frame(&mut self) -> Option<Result<Frame, FeedError>> {
        self.frames.pop_front()
    }

    async fn close(&mut self) {
        *self.closed.lock().unwrap() += 1;
    }
}

/// Transport replaying a script of attempts; refuses once exhausted.
struct ScriptedTransport {
    attempts: Mutex<VecDeque<Attempt>>,
    dials: Mutex<u32>,
    closed: Arc<Mutex<u32>>,
}

impl ScriptedTransport {
    fn new(attempts: Vec<Attempt>) -> Arc<Self> {
        Arc::new(Self {
            attempts: Mutex::new(attempts.into()),
            dials: Mutex::new(0),
            closed: Arc::new(Mutex::new(0)),
        })
    }
}

#[async_trait]
impl FeedTransport for ScriptedTransport {
    async fn connect(&self, url: &str) -> Result<Box<dyn FeedConnection>, FeedError> {
        *self.dials.lock().unwrap() += 1;
        match self.attempts.lock().unwrap().pop_front() {
            Some(Attempt::Open(frames)) => Ok(Box::new(ScriptedConnection {
                frames: frames.into(),
                closed: Arc::clone(&self.closed),
            })),
            Some(Attempt::Refuse) | None => Err(FeedError::Connect {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

/// Records every requested delay; parks forever after `limit` waits.
struct RecordingScheduler {
    delays: Mutex<Vec<u64>>,
    limit: usize,
}

impl RecordingScheduler {
    fn new(limit: usize) -> Arc<Self> {
        Arc::new(Self {
            delays: Mutex::new(Vec::new()),
            limit,
        })
    }

    fn delays(&self) -> Vec<u64> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn wait(&self, delay: Duration) {
        let parked = {
            let mut delays = self.delays.lock().unwrap();
            delays.push(u64::try_from(delay.as_millis()).unwrap());
            delays.len() >= self.limit
        };
        if parked {
            std::future::pending::<()>().await;
        }
    }
}

type Seen = Arc<Mutex<Vec<Value>>>;

fn collector() -> (Seen, Arc<dyn pos_live_feed::ports::EventHandler>) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler: Arc<dyn pos_live_feed::ports::EventHandler> =
        Arc::new(move |event: Value| sink.lock().unwrap().push(event));
    (seen, handler)
}

fn text(s: &str) -> Result<Frame, FeedError> {
    Ok(Frame::Text(s.to_string()))
}

/// Run the client until the scheduler parks. Tests run on a paused
/// clock, so the timeout fires as soon as the client is idle.
async fn run_until_parked(client: &mut LiveFeedClient) {
    let finished = tokio::time::timeout(Duration::from_secs(5), client.run()).await;
    assert!(finished.is_err(), "run() must never return");
}

// ---- Integration Tests ----

#[tokio::test(start_paused = true)]
async fn test_sale_event_reaches_handler_once() {
    let transport = ScriptedTransport::new(vec![Attempt::Open(vec![text(
        r#"{"id":1,"total":500}"#,
    )])]);
    let scheduler = RecordingScheduler::new(1);
    let (seen, handler) = collector();
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport, scheduler, handler);

    run_until_parked(&mut client).await;

    assert_eq!(*seen.lock().unwrap(), vec![json!({"id": 1, "total": 500})]);
}

#[tokio::test(start_paused = true)]
async fn test_non_json_is_dropped_and_connection_stays_open() {
    let transport = ScriptedTransport::new(vec![Attempt::Open(vec![
        text("<html>oops</html>"),
        text(r#"{"id":7}"#),
    ])]);
    let scheduler = RecordingScheduler::new(1);
    let (seen, handler) = collector();

    let metrics = Arc::new(FeedMetrics::new().unwrap());
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport.clone(), scheduler, handler)
        .with_telemetry(metrics.clone());

    run_until_parked(&mut client).await;

    // The event after the malformed one still arrived on the same connection.
    assert_eq!(*seen.lock().unwrap(), vec![json!({"id": 7})]);
    assert_eq!(*transport.dials.lock().unwrap(), 1);
    assert_eq!(metrics.decode_failures.get(), 1);
    assert_eq!(metrics.events.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_three_closes_without_open_back_off() {
    let transport = ScriptedTransport::new(vec![Attempt::Refuse, Attempt::Refuse, Attempt::Refuse]);
    let scheduler = RecordingScheduler::new(3);
    let (_seen, handler) = collector();
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport, scheduler.clone(), handler);

    run_until_parked(&mut client).await;

    assert_eq!(scheduler.delays(), vec![1000, 2000, 4000]);
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_never_exceeds_ceiling() {
    let transport = ScriptedTransport::new(vec![]);
    let scheduler = RecordingScheduler::new(8);
    let (_seen, handler) = collector();
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport, scheduler.clone(), handler);

    run_until_parked(&mut client).await;

    assert_eq!(
        scheduler.delays(),
        vec![1000, 2000, 4000, 8000, 16000, 30000, 30000, 30000]
    );
}

#[tokio::test(start_paused = true)]
async fn test_successful_open_resets_backoff() {
    let transport = ScriptedTransport::new(vec![
        Attempt::Refuse,
        Attempt::Refuse,
        Attempt::Refuse,
        Attempt::Open(vec![]),
        Attempt::Refuse,
    ]);
    let scheduler = RecordingScheduler::new(5);
    let (_seen, handler) = collector();
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport, scheduler.clone(), handler);

    run_until_parked(&mut client).await;

    assert_eq!(scheduler.delays(), vec![1000, 2000, 4000, 1000, 2000]);
}

#[tokio::test(start_paused = true)]
async fn test_transport_error_force_closes_once() {
    let transport = ScriptedTransport::new(vec![Attempt::Open(vec![
        text(r#"{"id":1}"#),
        Err(FeedError::Transport("connection reset".to_string())),
        text(r#"{"id":2}"#),
    ])]);
    let scheduler = RecordingScheduler::new(1);
    let (seen, handler) = collector();
    let mut client =
        LiveFeedClient::new("ws://pos/ws/sales", transport.clone(), scheduler.clone(), handler);

    run_until_parked(&mut client).await;

    assert_eq!(*seen.lock().unwrap(), vec![json!({"id": 1})]);
    assert_eq!(*transport.closed.lock().unwrap(), 1);
    assert_eq!(scheduler.delays(), vec![1000]);
}

#[tokio::test(start_paused = true)]
async fn test_status_sink_sees_live_then_reconnecting() {
    let mut status = MockStatus::new();
    let mut seq = mockall::Sequence::new();
    status
        .expect_report()
        .with(eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    status
        .expect_report()
        .with(eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let transport = ScriptedTransport::new(vec![Attempt::Open(vec![Ok(Frame::Close(Some(
        "going away".to_string(),
    )))])]);
    let scheduler = RecordingScheduler::new(1);
    let (_seen, handler) = collector();
    let mut client = LiveFeedClient::new("ws://pos/ws/sales", transport, scheduler, handler)
        .with_status_sink(Arc::new(status));

    run_until_parked(&mut client).await;
}

#[tokio::test]
async fn test_websocket_server_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        ws.send(Message::Text(r#"{"id":1,"total":500}"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text("not json".into())).await.unwrap();
        ws.send(Message::Text(r#"{"id":2,"total":1250}"#.into()))
            .await
            .unwrap();
        ws.close(None).await.unwrap();
    });

    let (seen, handler) = collector();
    let mut client = LiveFeedClient::new(
        format!("ws://{addr}/ws/sales"),
        Arc::new(WsTransport),
        RecordingScheduler::new(1),
        handler,
    );

    let delay = tokio::time::timeout(Duration::from_secs(5), client.run_once())
        .await
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![json!({"id": 1, "total": 500}), json!({"id": 2, "total": 1250})]
    );
    assert_eq!(delay, Some(Duration::from_millis(1000)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
    server.await.unwrap();
}
