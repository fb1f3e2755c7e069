//! Confirmation polling timing and outcome tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use custody_client::gateway::TransactionStatus;
use custody_client::{CancelToken, ConfirmationPoller, CoordinatorError, TransactionRecord};

mod common;
use common::{polling_config, Reply, ScriptedGateway};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Timer wheel resolution is 1ms; allow a little slack.
fn assert_near(actual: Duration, expected: Duration) {
    let diff = if actual > expected { actual - expected } else { expected - actual };
    assert!(diff <= ms(5), "expected ~{:?}, got {:?}", expected, actual);
}

fn assert_offsets(actual: Vec<Duration>, expected: &[u64]) {
    assert_eq!(actual.len(), expected.len(), "poll offsets {:?}", actual);
    for (got, want) in actual.into_iter().zip(expected) {
        assert_near(got, ms(*want));
    }
}

#[tokio::test(start_paused = true)]
async fn test_settles_after_pending_polls() {
    let gateway = ScriptedGateway::new("T1")
        .on_poll(Reply::Status("pending"))
        .on_poll(Reply::Status("pending"))
        .on_poll(Reply::Status("success"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let start = Instant::now();
    let record = poller.wait("T1", ms(5000)).await.unwrap();

    assert_eq!(record.status, TransactionStatus::Success);
    assert_eq!(gateway.poll_count(), 3);
    assert_offsets(gateway.poll_offsets(), &[1000, 2000, 3000]);
    assert!(start.elapsed() < ms(5000));
}

#[tokio::test(start_paused = true)]
async fn test_times_out_when_always_pending() {
    let gateway = ScriptedGateway::new("T1").into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let start = Instant::now();
    let err = poller.wait("T1", ms(2500)).await.unwrap_err();
    let elapsed = start.elapsed();

    match &err {
        CoordinatorError::Timeout {
            transaction_id,
            timeout,
        } => {
            assert_eq!(transaction_id, "T1");
            assert_eq!(*timeout, ms(2500));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(err.to_string().contains("2.5 seconds"));
    assert!(elapsed >= ms(2500) && elapsed < ms(3000));
    assert_offsets(gateway.poll_offsets(), &[1000, 2000]);

    // Nothing keeps polling once the wait has failed.
    tokio::time::sleep(ms(5000)).await;
    assert_eq!(gateway.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_is_settled_not_error() {
    let gateway = ScriptedGateway::new("T9")
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Status("failed"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let record = poller.wait("T9", ms(10_000)).await.unwrap();
    assert_eq!(record.status, TransactionStatus::Failed);
    assert_eq!(gateway.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_is_terminal() {
    let gateway = ScriptedGateway::new("T2")
        .on_poll(Reply::Status("reverted"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let record = poller.wait("T2", ms(10_000)).await.unwrap();
    assert_eq!(record.status.as_str(), "reverted");
}

#[tokio::test(start_paused = true)]
async fn test_read_error_propagates_by_default() {
    let gateway = ScriptedGateway::new("T1")
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Fail("connection reset"))
        .on_poll(Reply::Status("success"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let start = Instant::now();
    let err = poller.wait("T1", ms(10_000)).await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("connection reset"));
    assert_near(start.elapsed(), ms(2000));
    assert_eq!(gateway.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_read_error_retried_when_configured() {
    let gateway = ScriptedGateway::new("T1")
        .on_poll(Reply::Fail("502 from proxy"))
        .on_poll(Reply::Status("success"))
        .into_arc();
    let mut config = polling_config();
    config.retry_transient_errors = true;
    let poller = ConfirmationPoller::new(gateway.clone(), &config);

    let record = poller.wait("T1", ms(10_000)).await.unwrap();
    assert_eq!(record.status, TransactionStatus::Success);
    assert_offsets(gateway.poll_offsets(), &[1000, 2000]);
}

#[tokio::test(start_paused = true)]
async fn test_progress_reported_for_pending_polls() {
    let gateway = ScriptedGateway::new("T1")
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Status("success"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway, &polling_config());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let record = poller
        .wait_with_progress("T1", ms(10_000), move |record: &TransactionRecord, attempt| {
            sink.lock().unwrap().push((record.status.clone(), attempt));
        })
        .await
        .unwrap();

    assert_eq!(record.status, TransactionStatus::Success);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(TransactionStatus::Created, 1), (TransactionStatus::Created, 2)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_panicking_progress_callback_does_not_change_outcome() {
    let gateway = ScriptedGateway::new("T1")
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Status("success"))
        .into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());

    let record = poller
        .wait_with_progress("T1", ms(10_000), |_: &TransactionRecord, _| {
            panic!("observer failure");
        })
        .await
        .unwrap();

    assert_eq!(record.status, TransactionStatus::Success);
    assert_eq!(gateway.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_polling() {
    let gateway = ScriptedGateway::new("T1").into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());
    let cancel = CancelToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ms(1500)).await;
        trigger.cancel();
    });

    let err = poller.wait_with_cancel("T1", ms(20_000), &cancel).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Cancelled { ref transaction_id } if transaction_id == "T1"));
    assert_eq!(gateway.poll_count(), 1);

    tokio::time::sleep(ms(5000)).await;
    assert_eq!(gateway.poll_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_token_ends_wait_immediately() {
    let gateway = ScriptedGateway::new("T1").into_arc();
    let poller = ConfirmationPoller::new(gateway.clone(), &polling_config());
    let cancel = CancelToken::new();
    cancel.cancel();

    let start = Instant::now();
    let err = poller.wait_with_cancel("T1", ms(3000), &cancel).await.unwrap_err();

    assert!(matches!(err, CoordinatorError::Cancelled { .. }));
    assert!(start.elapsed() < ms(1000));
    assert_eq!(gateway.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waits_are_independent() {
    let gateway_a = ScriptedGateway::new("A")
        .on_poll(Reply::Status("created"))
        .on_poll(Reply::Record(
            TransactionRecord::new("A", "success").with_transaction_hash("0xA1"),
        ))
        .into_arc();
    let gateway_b = ScriptedGateway::new("B")
        .on_poll(Reply::Status("failed"))
        .into_arc();

    let poller_a = ConfirmationPoller::new(gateway_a.clone(), &polling_config());
    let poller_b = ConfirmationPoller::new(gateway_b.clone(), &polling_config());

    let (a, b) = tokio::join!(poller_a.wait("A", ms(5000)), poller_b.wait("B", ms(5000)));

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.id, "A");
    assert_eq!(a.transaction_hash.as_deref(), Some("0xA1"));
    assert_eq!(b.id, "B");
    assert_eq!(b.status, TransactionStatus::Failed);

    assert_eq!(gateway_a.polled_ids(), vec!["A", "A"]);
    assert_eq!(gateway_b.polled_ids(), vec!["B"]);
}
