// Integration tests for the shared fetch-once caches under concurrent callers.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use anyhow::{bail, Result};
use serde_json::json;
use slackmap::{DocumentSource, GroupDirectory, MapConfig, MapSession, PointIndex};

const URL: &str = "mem://clustersMain.geojson";

/// Serves one document slowly and counts how often it was asked.
struct SlowSource {
    body: Vec<u8>,
    delay: Duration,
    fetches: AtomicUsize,
    fail: bool,
}

impl SlowSource {
    fn new(body: Vec<u8>) -> Self {
        Self { body, delay: Duration::from_millis(50), fetches: AtomicUsize::new(0), fail: false }
    }

    fn fetches(&self) -> usize { self.fetches.load(Ordering::SeqCst) }
}

impl DocumentSource for SlowSource {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        if self.fail {
            bail!("connection reset");
        }
        Ok(self.body.clone())
    }
}

fn points_document() -> Vec<u8> {
    json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }, "properties": { "id": "a" } },
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [3.0, 4.0] }, "properties": { "id": 42 } }
        ]
    })
    .to_string()
    .into_bytes()
}

#[test]
fn concurrent_loads_share_one_fetch() {
    let source = SlowSource::new(points_document());
    let index = PointIndex::new();

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| index.ensure_loaded(&source, URL).unwrap());
        }
    });

    assert_eq!(source.fetches(), 1);
    assert_eq!(index.len(), 2);
    assert!(index.lookup("42").is_some());
}

#[test]
fn concurrent_callers_share_one_failed_fetch() {
    let mut failing = SlowSource::new(points_document());
    failing.fail = true;
    failing.delay = Duration::from_millis(200);
    let index = PointIndex::new();

    let failures = thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| index.ensure_loaded(&failing, URL).is_err())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).filter(|failed| *failed).count()
    });

    assert_eq!(failures, 4);
    assert_eq!(failing.fetches(), 1);
    assert!(index.is_empty());
}

#[test]
fn failed_load_is_retried_by_the_next_caller() {
    let mut failing = SlowSource::new(points_document());
    failing.fail = true;
    let index = PointIndex::new();

    assert!(index.ensure_loaded(&failing, URL).is_err());
    assert!(index.is_empty());

    let working = SlowSource::new(points_document());
    index.ensure_loaded(&working, URL).unwrap();
    assert_eq!(working.fetches(), 1);
    assert_eq!(index.len(), 2);
}

#[test]
fn sessions_sharing_caches_fetch_once() {
    let config = MapConfig::default();
    let source = Arc::new(SlowSource::new(points_document()));
    let points = Arc::new(PointIndex::new());
    let groups = Arc::new(GroupDirectory::new());

    let first = MapSession::with_caches(config.clone(), source.clone(), points.clone(), groups.clone());
    let second = MapSession::with_caches(config, source.clone(), points.clone(), groups);

    thread::scope(|scope| {
        scope.spawn(|| first.load_points().unwrap());
        scope.spawn(|| second.load_points().unwrap());
    });

    assert_eq!(source.fetches(), 1);
    assert!(second.zoom_to_feature("a", None).is_some());
}
