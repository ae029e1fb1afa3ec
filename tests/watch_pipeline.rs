use std::time::{Duration, Instant};

use hashwatch::fingerprint::compute_fingerprint;
use hashwatch::store::FingerprintStore;
use hashwatch::watch::spawn_watcher;
use hashwatch_test_utils::init_tracing;
use tempfile::tempdir;
use tokio::time::sleep;

/// Give the platform watcher a moment to finish registering.
async fn settle() {
    sleep(Duration::from_millis(150)).await;
}

/// Poll the store until it holds at least `want` records or the deadline
/// passes. Returns the final count.
async fn wait_for_records(store: &FingerprintStore, want: u64, deadline: Duration) -> u64 {
    let start = Instant::now();
    loop {
        let count = store.record_count().unwrap();
        if count >= want || start.elapsed() > deadline {
            return count;
        }
        sleep(Duration::from_millis(50)).await;
    }
}

fn fetch_rows(store: &FingerprintStore) -> Vec<(String, String, i64)> {
    store
        .with_connection(|conn| {
            let mut stmt =
                conn.prepare("SELECT file_hash, binary_type, file_size FROM file_analysis")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .unwrap()
}

#[tokio::test]
async fn modified_file_is_fingerprinted_and_recorded() {
    init_tracing();

    let dir = tempdir().unwrap();
    let store = FingerprintStore::in_memory().unwrap();
    let watcher = spawn_watcher(dir.path(), store.clone()).unwrap();
    settle().await;

    let content = b"first weights payload";
    tokio::fs::write(dir.path().join("model.bin"), content)
        .await
        .unwrap();

    let count = wait_for_records(&store, 1, Duration::from_secs(5)).await;
    assert!(count >= 1, "no record appeared for the modified file");

    let expected = compute_fingerprint(content);
    let rows = fetch_rows(&store);
    assert!(
        rows.iter()
            .any(|(hash, label, size)| *hash == expected
                && label == "binary"
                && *size == content.len() as i64),
        "no row matched the expected digest/label/size: {rows:?}"
    );

    watcher.shutdown().await;
}

#[tokio::test]
async fn subdirectory_changes_are_not_observed() {
    init_tracing();

    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested");
    std::fs::create_dir(&sub).unwrap();

    let store = FingerprintStore::in_memory().unwrap();
    let watcher = spawn_watcher(dir.path(), store.clone()).unwrap();
    settle().await;

    // A change below the top level must not produce a record; a sibling
    // change at the top level proves the pipeline itself is alive.
    tokio::fs::write(sub.join("inner.bin"), b"hidden")
        .await
        .unwrap();
    tokio::fs::write(dir.path().join("alive.bin"), b"visible")
        .await
        .unwrap();

    let count = wait_for_records(&store, 1, Duration::from_secs(5)).await;
    assert!(count >= 1, "top-level change was not recorded");
    // Allow any late subdirectory events to surface before checking.
    sleep(Duration::from_millis(300)).await;

    let visible = compute_fingerprint(b"visible");
    for (hash, _, _) in fetch_rows(&store) {
        assert_eq!(hash, visible, "a subdirectory change produced a record");
    }

    watcher.shutdown().await;
}

#[tokio::test]
async fn store_inside_watched_dir_does_not_feed_back() {
    init_tracing();

    let dir = tempdir().unwrap();
    let store = FingerprintStore::open(dir.path().join("hashwatch.db")).unwrap();
    let watcher = spawn_watcher(dir.path(), store.clone()).unwrap();
    settle().await;

    let content = b"observed payload";
    tokio::fs::write(dir.path().join("artifact.bin"), content)
        .await
        .unwrap();

    let count = wait_for_records(&store, 1, Duration::from_secs(5)).await;
    assert!(count >= 1);

    // Every append touches the database file in the watched directory; if
    // those events were observed the count would keep climbing.
    sleep(Duration::from_millis(400)).await;
    let settled = store.record_count().unwrap();
    sleep(Duration::from_millis(400)).await;
    assert_eq!(
        store.record_count().unwrap(),
        settled,
        "record count kept growing without new file changes"
    );

    let expected = compute_fingerprint(content);
    for (hash, label, _) in fetch_rows(&store) {
        assert_eq!(hash, expected, "a store-owned file was recorded");
        assert_eq!(label, "binary");
    }

    watcher.shutdown().await;
}

#[tokio::test]
async fn shutdown_waits_for_picked_up_events() {
    init_tracing();

    let dir = tempdir().unwrap();
    let store = FingerprintStore::in_memory().unwrap();
    let watcher = spawn_watcher(dir.path(), store.clone()).unwrap();
    settle().await;

    tokio::fs::write(dir.path().join("last-write.bin"), b"going down")
        .await
        .unwrap();
    // Long enough for notify to deliver the event, short enough that
    // processing may still be in flight when shutdown starts.
    sleep(Duration::from_millis(200)).await;

    watcher.shutdown().await;

    assert!(
        store.record_count().unwrap() >= 1,
        "event picked up before shutdown was not flushed"
    );
}
