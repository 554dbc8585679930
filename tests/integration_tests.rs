use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use dirpoll::{
    ConsoleListener, DirectoryTracker, DirectoryWatcher, PollOutcome, RecordingListener, Snapshot,
    WatchError,
};

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "").expect("Failed to write test file");
}

#[test]
fn test_scenario_replace_one_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_path = temp_dir.path();
    touch(temp_path, "a.txt");
    touch(temp_path, "b.txt");

    let mut tracker = DirectoryTracker::initialize(temp_path).expect("Failed to initialize tracker");

    fs::remove_file(temp_path.join("b.txt")).expect("Failed to delete test file");
    touch(temp_path, "c.txt");

    match tracker.poll() {
        PollOutcome::Changed { delta, failed_listeners } => {
            assert_eq!(delta.added, vec!["c.txt"]);
            assert_eq!(delta.removed, vec!["b.txt"]);
            assert!(failed_listeners.is_empty());
        }
        other => panic!("Expected a change, got {:?}", other),
    }

    let expected: Snapshot = ["a.txt", "c.txt"].into_iter().collect();
    assert_eq!(tracker.snapshot(), &expected);
}

#[test]
fn test_idempotent_polls() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), "f1");

    let mut tracker = DirectoryTracker::initialize(temp_dir.path()).expect("Failed to initialize tracker");
    let recorder = RecordingListener::new();
    tracker.register_listener(recorder.clone());

    touch(temp_dir.path(), "f2");
    assert!(tracker.poll().delta().is_some());
    assert!(matches!(tracker.poll(), PollOutcome::Unchanged));
    assert!(matches!(tracker.poll(), PollOutcome::Unchanged));
    assert_eq!(recorder.calls().len(), 1);
}

#[test]
fn test_two_listeners_same_call_in_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut tracker = DirectoryTracker::initialize(temp_dir.path()).expect("Failed to initialize tracker");

    let log = Arc::new(Mutex::new(Vec::new()));
    for id in ["first", "second"] {
        let log = log.clone();
        tracker.register_listener(move |dir: &Path, added: &[String], removed: &[String]| -> anyhow::Result<()> {
            log.lock().unwrap().push((id, dir.to_path_buf(), added.to_vec(), removed.to_vec()));
            Ok(())
        });
    }

    touch(temp_dir.path(), "x.log");
    tracker.poll();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "first");
    assert_eq!(log[1].0, "second");
    assert_eq!(log[0].1, log[1].1);
    assert_eq!(log[0].2, log[1].2);
    assert_eq!(log[0].3, log[1].3);
    assert_eq!(log[0].2, vec!["x.log".to_string()]);
}

#[test]
fn test_directory_removed_while_watching() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let watched = temp_dir.path().join("lab151");
    fs::create_dir(&watched).expect("Failed to create watched dir");
    touch(&watched, "keep.txt");

    let mut tracker = DirectoryTracker::initialize(&watched).expect("Failed to initialize tracker");
    let before = tracker.snapshot().clone();

    fs::remove_dir_all(&watched).expect("Failed to remove watched dir");

    match tracker.poll() {
        PollOutcome::Failed(err) => {
            assert!(matches!(err, WatchError::TransientListing { .. }));
            assert!(err.is_recoverable());
        }
        other => panic!("Expected a failed poll, got {:?}", other),
    }
    assert_eq!(tracker.snapshot(), &before);
}

#[test]
fn test_console_output_through_tracker() {
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), "old.txt");

    let buffer = SharedBuffer::default();
    let mut tracker = DirectoryTracker::initialize(temp_dir.path()).expect("Failed to initialize tracker");
    tracker.register_listener(ConsoleListener::new(buffer.clone()));

    fs::remove_file(temp_dir.path().join("old.txt")).expect("Failed to delete test file");
    touch(temp_dir.path(), "b.txt");
    touch(temp_dir.path(), "a.txt");
    tracker.poll();

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).expect("Output is not UTF-8");
    let expected = format!(
        "\nChanges in directory: {}\n    New files created: a.txt, b.txt\n    Files deleted: old.txt\n",
        temp_dir.path().display()
    );
    assert_eq!(output, expected);
}

#[test]
fn test_watcher_reports_deletion() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    touch(temp_dir.path(), "delete_me.rs");

    let mut tracker = DirectoryTracker::initialize(temp_dir.path()).expect("Failed to initialize tracker");
    let recorder = RecordingListener::new();
    tracker.register_listener(recorder.clone());

    let mut watcher = DirectoryWatcher::start(tracker, Duration::from_millis(25)).expect("Failed to start watcher");

    fs::remove_file(temp_dir.path().join("delete_me.rs")).expect("Failed to delete test file");

    let deadline = Instant::now() + Duration::from_secs(5);
    while recorder.calls().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    watcher.stop();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1, "Did not receive deletion");
    assert!(calls[0].1.is_empty());
    assert_eq!(calls[0].2, vec!["delete_me.rs".to_string()]);
    assert!(watcher.with_tracker(|t| t.snapshot().is_empty()));
}
