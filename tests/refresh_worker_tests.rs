// Refresh worker test: immediate first cycle, clean shutdown

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::StubSource;
use pricefeed::models::Provider;
use pricefeed::refresh_worker::{WorkerConfig, WorkerDeps, spawn};

#[tokio::test]
async fn worker_runs_startup_cycle_and_shuts_down() {
    let aws = StubSource::new(
        Provider::Aws,
        vec![common::record(Provider::Aws, "a", 0.01)],
    );
    let aws_calls = aws.calls.clone();
    let azure = StubSource::new(
        Provider::Azure,
        vec![common::record(Provider::Azure, "b", 0.02)],
    );
    let gcp = StubSource::new(Provider::Gcp, vec![common::record(Provider::Gcp, "g", 0.03)]);
    let (cache, aggregator, _query) =
        common::stub_stack(aws, azure, gcp, Duration::from_secs(3600));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = spawn(
        WorkerDeps {
            aggregator,
            cache: cache.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            refresh_interval_secs: 3600,
            sweep_interval_secs: 3600,
        },
    );

    // first tick is immediate; give it a moment to land
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert_eq!(aws_calls.load(Ordering::SeqCst), 1);
    let snapshot = cache.aggregate_snapshot().await.expect("startup cycle cached");
    assert_eq!(snapshot.total_records(), 3);
}
