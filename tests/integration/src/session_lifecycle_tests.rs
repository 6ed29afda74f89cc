//! Session lifecycle tests - scripted transport, paused tokio clock
//!
//! `handle.snapshot()` is used as a barrier: the driver answers it only
//! after every message queued before it has been reduced.

use crate::test_utils::{camel_record, init_test_logging, RecordingPresenter, ScriptedTransport};
use fleetglass_core::{Classification, SessionConfig, StatusSeverity};
use fleetglass_link::{
    ConnectionState, ExponentialBackoff, LinkError, SessionDriver, SessionHandle,
    TelemetrySession, TransportEvent,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

struct Harness {
    transport: ScriptedTransport,
    presenter: RecordingPresenter,
    handle: SessionHandle,
    task: JoinHandle<TelemetrySession>,
}

impl Harness {
    async fn start(session: TelemetrySession) -> Self {
        init_test_logging();
        let transport = ScriptedTransport::default();
        let presenter = RecordingPresenter::default();
        let driver = SessionDriver::new(session, transport.clone(), presenter.clone());
        let handle = driver.handle();
        let task = tokio::spawn(driver.run());
        handle.snapshot().await.unwrap();
        Self {
            transport,
            presenter,
            handle,
            task,
        }
    }

    async fn with_config(config: SessionConfig) -> Self {
        Self::start(TelemetrySession::new(config).unwrap()).await
    }

    async fn settle(&self) {
        self.handle.snapshot().await.unwrap();
    }

    fn count(&self, severity: StatusSeverity) -> usize {
        self.presenter
            .severities()
            .into_iter()
            .filter(|s| *s == severity)
            .count()
    }
}

#[tokio::test(start_paused = true)]
async fn test_single_close_reconnects_exactly_once_after_fixed_delay() {
    let h = Harness::with_config(SessionConfig::default()).await;
    assert_eq!(h.transport.opens(), 1);

    let sink = h.transport.latest();
    sink.emit(TransportEvent::Opened);
    sink.emit(TransportEvent::Closed);
    h.settle().await;
    assert_eq!(h.handle.snapshot().await.unwrap().state, ConnectionState::Closed);

    sleep(Duration::from_millis(4_900)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 1);

    sleep(Duration::from_millis(200)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.state, ConnectionState::Connecting);
    assert_eq!(snapshot.attempt, 2);

    sleep(Duration::from_secs(120)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_close_for_same_attempt_schedules_one_connect() {
    let h = Harness::with_config(SessionConfig::default()).await;

    let sink = h.transport.latest();
    sink.emit(TransportEvent::Opened);
    sink.emit(TransportEvent::Closed);
    sink.emit(TransportEvent::Closed);
    h.settle().await;

    sleep(Duration::from_secs(30)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);
    assert_eq!(h.count(StatusSeverity::Disconnected), 1);
}

#[tokio::test(start_paused = true)]
async fn test_error_then_close_reconnects_once() {
    let h = Harness::with_config(SessionConfig::default()).await;

    let sink = h.transport.latest();
    sink.emit(TransportEvent::Error("connection refused".into()));
    h.settle().await;
    assert_eq!(h.handle.snapshot().await.unwrap().state, ConnectionState::Errored);

    sink.emit(TransportEvent::Closed);
    h.settle().await;

    sleep(Duration::from_millis(5_100)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);
    assert_eq!(h.count(StatusSeverity::Error), 1);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_liveness_timer_is_ignored() {
    let config = SessionConfig {
        reconnect_delay_ms: 1_000,
        ..SessionConfig::default()
    };
    let h = Harness::with_config(config).await;

    // Attempt 1 arms its liveness timer for t=5000, then drops at once
    let first = h.transport.latest();
    first.emit(TransportEvent::Opened);
    first.emit(TransportEvent::Closed);
    h.settle().await;

    // Attempt 2 opens at t=1000 and stays silent
    sleep(Duration::from_millis(1_100)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);
    h.transport.latest().emit(TransportEvent::Opened);
    h.settle().await;

    sleep(Duration::from_millis(4_000)).await;
    h.settle().await;
    assert_eq!(h.count(StatusSeverity::Warning), 0);

    sleep(Duration::from_millis(1_200)).await;
    h.settle().await;
    assert_eq!(h.count(StatusSeverity::Warning), 1);
}

#[tokio::test(start_paused = true)]
async fn test_events_from_previous_attempt_are_discarded() {
    let config = SessionConfig {
        reconnect_delay_ms: 1_000,
        ..SessionConfig::default()
    };
    let h = Harness::with_config(config).await;

    let first = h.transport.latest();
    first.emit(TransportEvent::Opened);
    first.emit(TransportEvent::Closed);
    h.settle().await;
    sleep(Duration::from_millis(1_100)).await;
    h.settle().await;

    let stale = h.transport.sink(0);
    stale.emit(TransportEvent::Message(camel_record("ghost", false).to_string()));
    stale.emit(TransportEvent::Closed);
    h.settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.messages_received, 0);
    assert_eq!(snapshot.state, ConnectionState::Connecting);
    assert!(h.handle.select("ghost").await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_messages_update_views_status_and_detail() {
    let h = Harness::with_config(SessionConfig::default()).await;

    let sink = h.transport.latest();
    sink.emit(TransportEvent::Opened);
    sink.emit(TransportEvent::Message(camel_record("veh-1", false).to_string()));
    sink.emit(TransportEvent::Message(camel_record("veh-2", true).to_string()));
    sink.emit(TransportEvent::Message("not json".into()));
    h.settle().await;

    let rows = h.presenter.rows();
    let views: Vec<Classification> = rows.iter().map(|(view, _, _)| *view).collect();
    assert_eq!(
        views,
        vec![
            Classification::Normal,
            Classification::Anomaly,
            Classification::Normal
        ]
    );
    assert!(rows[2].1.is_diagnostic());
    assert_eq!(rows[2].2.normal, 2);
    assert_eq!(rows[2].2.anomaly, 1);

    let last = h.presenter.statuses().pop().unwrap();
    assert_eq!(last.severity, StatusSeverity::Error);

    let detail = h.handle.select("veh-2").await.unwrap().unwrap();
    assert_eq!(detail.record["anomalyType"], "speeding");

    // Messages arrived, so the liveness timer stays quiet
    sleep(Duration::from_secs(6)).await;
    h.settle().await;
    assert_eq!(h.count(StatusSeverity::Warning), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_silences_session() {
    let h = Harness::with_config(SessionConfig::default()).await;

    let sink = h.transport.latest();
    sink.emit(TransportEvent::Opened);
    sink.emit(TransportEvent::Closed);
    h.settle().await;
    let statuses_before = h.presenter.statuses().len();

    h.handle.dispose().await.unwrap();
    let session = h.task.await.unwrap();
    assert_eq!(session.state(), ConnectionState::Disposed);

    assert!(!sink.emit(TransportEvent::Opened));
    sleep(Duration::from_secs(60)).await;

    assert_eq!(h.transport.opens(), 1);
    assert_eq!(h.presenter.statuses().len(), statuses_before);
    assert!(matches!(
        h.handle.snapshot().await,
        Err(LinkError::DriverStopped)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_exponential_backoff_grows_between_failed_attempts() {
    let policy = ExponentialBackoff::new(Duration::from_secs(1), Duration::from_secs(8));
    let session =
        TelemetrySession::with_retry_policy(SessionConfig::default(), Box::new(policy)).unwrap();
    let h = Harness::start(session).await;

    // First failure: 1 s
    h.transport.latest().emit(TransportEvent::Closed);
    h.settle().await;
    sleep(Duration::from_millis(1_050)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);

    // Second failure in a row: 2 s
    h.transport.latest().emit(TransportEvent::Closed);
    h.settle().await;
    sleep(Duration::from_millis(1_500)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 2);
    sleep(Duration::from_millis(600)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 3);

    // A successful open resets the backoff
    let sink = h.transport.latest();
    sink.emit(TransportEvent::Opened);
    sink.emit(TransportEvent::Closed);
    h.settle().await;
    sleep(Duration::from_millis(1_050)).await;
    h.settle().await;
    assert_eq!(h.transport.opens(), 4);
}
