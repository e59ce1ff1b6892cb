use dsf_core::{cancellation, FetchError, PollResult, ReasonCode, SetupConfig, VerificationPoller, MIN_POLL_INTERVAL};
use dsf_kernel::Mode;
use dsf_test_utils::{foreign_ns_snapshot, wpcom_ns_snapshot, FakeDomainApi};
use std::time::Duration;

fn config(interval_secs: u64, max_secs: u64) -> SetupConfig {
    SetupConfig::default()
        .with_poll_interval(Duration::from_secs(interval_secs))
        .with_max_poll_duration(Duration::from_secs(max_secs))
}

#[tokio::test(start_paused = true)]
async fn stops_on_first_success() {
    let api = FakeDomainApi::new()
        .with_snapshot(Ok(foreign_ns_snapshot()))
        .with_snapshot(Ok(foreign_ns_snapshot()))
        .with_snapshot(Ok(wpcom_ns_snapshot()));
    let (_handle, signal) = cancellation();

    let report = VerificationPoller::new(&api, &SetupConfig::default())
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::Connected);
    assert_eq!(report.attempts, 3);
    assert_eq!(api.snapshot_calls(), 3);
    assert!(report.last_outcome.unwrap().is_success());
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_makes_no_request() {
    let api = FakeDomainApi::new().with_snapshot(Ok(wpcom_ns_snapshot()));
    let (handle, signal) = cancellation();
    handle.cancel();
    assert!(signal.is_cancelled());

    let report = VerificationPoller::new(&api, &config(30, 100))
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::Cancelled);
    assert_eq!(report.attempts, 0);
    assert_eq!(api.snapshot_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_stops_polling() {
    let api = FakeDomainApi::new().with_snapshot(Ok(foreign_ns_snapshot()));
    let (handle, signal) = cancellation();
    let poller = VerificationPoller::new(&api, &config(30, 600));

    let (report, ()) = tokio::join!(poller.run("example.com", Mode::Suggested, signal), async {
        tokio::time::sleep(Duration::from_secs(45)).await;
        handle.cancel();
    });

    assert_eq!(report.result, PollResult::Cancelled);
    assert_eq!(report.attempts, 2);
}

#[tokio::test(start_paused = true)]
async fn gives_up_at_deadline() {
    let api = FakeDomainApi::new().with_snapshot(Ok(foreign_ns_snapshot()));
    let (_handle, signal) = cancellation();

    let report = VerificationPoller::new(&api, &config(30, 100))
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::TimedOut);
    assert_eq!(report.attempts, 4);
    assert_eq!(
        report.last_outcome.and_then(|outcome| outcome.reason_code()),
        Some(ReasonCode::NameServersNotWpcom)
    );
}

#[tokio::test(start_paused = true)]
async fn fetch_errors_are_retried_not_treated_as_success() {
    let api = FakeDomainApi::new()
        .with_snapshot(Err(FetchError::Timeout))
        .with_snapshot(Ok(wpcom_ns_snapshot()));
    let (_handle, signal) = cancellation();

    let report = VerificationPoller::new(&api, &SetupConfig::default())
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::Connected);
    assert_eq!(report.attempts, 2);
    assert_eq!(report.last_error, Some(FetchError::Timeout));
}

#[tokio::test(start_paused = true)]
async fn dropped_handle_does_not_cancel() {
    let api = FakeDomainApi::new().with_snapshot(Err(FetchError::Transport("refused".into())));
    let (handle, signal) = cancellation();
    drop(handle);

    let report = VerificationPoller::new(&api, &config(30, 50))
        .run("example.com", Mode::Advanced, signal)
        .await;

    assert_eq!(report.result, PollResult::TimedOut);
    assert_eq!(report.attempts, 2);
    assert!(report.last_outcome.is_none());
}

#[tokio::test(start_paused = true)]
async fn sub_second_interval_from_config_is_honored() {
    let api = FakeDomainApi::new().with_snapshot(Ok(foreign_ns_snapshot()));
    let (_handle, signal) = cancellation();
    let config = SetupConfig::default()
        .with_poll_interval(Duration::from_millis(500))
        .with_max_poll_duration(Duration::from_secs(2));

    let report = VerificationPoller::new(&api, &config)
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::TimedOut);
    assert_eq!(report.attempts, 4);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_raised_to_minimum() {
    let api = FakeDomainApi::new().with_snapshot(Ok(foreign_ns_snapshot()));
    let (_handle, signal) = cancellation();
    let config = SetupConfig::default().with_poll_interval(Duration::ZERO);
    assert_eq!(config.poll_interval(), Duration::ZERO);

    let report = VerificationPoller::new(&api, &config)
        .with_max_duration(MIN_POLL_INTERVAL * 5)
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::TimedOut);
    assert!((1..=6).contains(&report.attempts), "attempts: {}", report.attempts);
}

#[tokio::test(start_paused = true)]
async fn explicit_zero_interval_does_not_panic() {
    let api = FakeDomainApi::new().with_snapshot(Ok(wpcom_ns_snapshot()));
    let (_handle, signal) = cancellation();

    let report = VerificationPoller::new(&api, &SetupConfig::default())
        .with_interval(Duration::ZERO)
        .run("example.com", Mode::Suggested, signal)
        .await;

    assert_eq!(report.result, PollResult::Connected);
    assert_eq!(report.attempts, 1);
}
