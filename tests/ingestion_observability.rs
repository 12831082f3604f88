use std::sync::{Arc, Mutex};

use school_dashboard::ingestion::{
    ingest_from_path, CompositeObserver, IngestionContext, IngestionFormat, IngestionObserver,
    IngestionOptions, IngestionSeverity, IngestionStats, LogObserver,
};
use school_dashboard::model::lunch_hints;
use school_dashboard::PipelineError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_success(&self, _ctx: &IngestionContext, stats: IngestionStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &PipelineError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &PipelineError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(obs: Arc<dyn IngestionObserver>) -> IngestionOptions {
    IngestionOptions {
        format: Some(IngestionFormat::Csv),
        observer: Some(obs),
        alert_at_or_above: IngestionSeverity::Critical,
    }
}

#[test]
fn observer_receives_stats_on_success() {
    let obs = Arc::new(RecordingObserver::default());
    ingest_from_path("tests/fixtures/frpl.csv", &lunch_hints(), &options(obs.clone())).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes, vec![IngestionStats { rows: 12, columns: 3 }]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_and_alert_on_missing_file() {
    let obs = Arc::new(RecordingObserver::default());
    let _ = ingest_from_path(
        "tests/fixtures/does_not_exist.csv",
        &lunch_hints(),
        &options(obs.clone()),
    )
    .unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![IngestionSeverity::Critical]);
}

#[test]
fn malformed_file_fails_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let _ = ingest_from_path("tests/fixtures/malformed.csv", &lunch_hints(), &options(obs.clone()))
        .unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn composite_fans_out_to_every_observer() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn IngestionObserver>> =
        vec![a.clone(), b.clone(), Arc::new(LogObserver)];
    let composite = CompositeObserver::new(observers);

    ingest_from_path("tests/fixtures/frpl.tsv", &lunch_hints(), &IngestionOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(a.successes.lock().unwrap().len(), 1);
    assert_eq!(b.successes.lock().unwrap().len(), 1);
}
