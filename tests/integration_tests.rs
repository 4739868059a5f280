/*
 * Integration tests for Ideactl
 *
 * These tests drive the app loop the way the TUI does: toggle, let the
 * background write land, drain outcomes, and check that the visible state
 * always reconciles with the file on disk.
 */

use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use ideactl::app::App;
use ideactl::config::Settings;
use ideactl::notify::NotificationSink;
use ideactl::options;
use ideactl::writer::{perform_write, WriteRequest, WriteStrategy};

/// Notification sink whose record outlives the App that owns it.
#[derive(Clone, Default)]
struct SharedSink {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl SharedSink {
    fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for SharedSink {
    fn notify(&self, title: &str, body: &str) {
        self.messages.lock().unwrap().push((title.to_string(), body.to_string()));
    }
}

fn seeded_device(entries: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (id, content) in entries {
        fs::write(dir.path().join(id), content).unwrap();
    }
    dir
}

fn settings_for(dir: &TempDir) -> Settings {
    Settings {
        sysfs_path: dir.path().to_string_lossy().to_string(),
        use_pkexec: false,
        send_success_notifications: true,
        ..Settings::default()
    }
}

fn wait_for(mut pred: impl FnMut() -> bool) {
    for _ in 0..100 {
        if pred() {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("condition not reached within timeout");
}

// Scenario A: camera_power holds "0\n", direct strategy; toggling on writes
// "1", a re-read reports enabled, and a success notification fires.
#[test]
fn toggle_on_direct_write_round_trip() {
    let dir = seeded_device(&[("camera_power", "0\n")]);
    let sink = SharedSink::default();
    let mut app = App::with_settings(settings_for(&dir), Box::new(sink.clone()));

    app.toggle_selected();
    assert!(app.controllers[0].displayed, "toggle flips optimistically");

    let file = dir.path().join("camera_power");
    wait_for(|| fs::read_to_string(&file).unwrap() == "1");
    wait_for(|| {
        app.drain_outcomes();
        !sink.messages().is_empty()
    });

    let root = dir.path().to_string_lossy().to_string();
    assert!(options::read_option(&root, "camera_power"));
    assert!(app.controllers[0].displayed);
    let messages = sink.messages();
    assert_eq!(messages[0].0, "Ideapad Controls");
    assert_eq!(messages[0].1, "Enabled Camera Power");
}

// Scenario B: the write path fails; the toggle reverts to the pre-toggle
// ground truth and a failure notification names the option.
#[test]
fn failed_write_rolls_back_and_notifies() {
    let dir = seeded_device(&[("camera_power", "0\n")]);
    let sink = SharedSink::default();
    let mut app = App::with_settings(settings_for(&dir), Box::new(sink.clone()));

    // Make the target unwritable for everyone, root included: replace the
    // file with a directory so the write fails with EISDIR
    fs::remove_file(dir.path().join("camera_power")).unwrap();
    fs::create_dir(dir.path().join("camera_power")).unwrap();

    app.toggle_selected();
    assert!(app.controllers[0].displayed, "optimistic until the outcome lands");

    wait_for(|| {
        app.drain_outcomes();
        !sink.messages().is_empty()
    });

    assert!(!app.controllers[0].displayed, "UI reverted to ground truth");
    let messages = sink.messages();
    assert_eq!(messages[0].1, "Could not change Camera Power");
}

// Idempotence: when the file already holds the requested state, no write is
// issued. The seeded trailing newline survives because nothing rewrote the
// file.
#[test]
fn matching_state_issues_no_write() {
    let dir = seeded_device(&[("camera_power", "1\n")]);
    let sink = SharedSink::default();
    let mut app = App::with_settings(settings_for(&dir), Box::new(sink.clone()));

    // Stale cache drifted in the correct direction
    app.controllers[0].displayed = false;
    app.toggle_selected();

    thread::sleep(Duration::from_millis(200));
    app.drain_outcomes();

    assert!(app.controllers[0].displayed);
    assert_eq!(fs::read_to_string(dir.path().join("camera_power")).unwrap(), "1\n");
    assert!(sink.messages().is_empty());
}

// Scenario C: two options toggled before either resolves; both writes land
// and each row reflects its own outcome.
#[test]
fn concurrent_toggles_resolve_independently() {
    let dir = seeded_device(&[("camera_power", "0\n"), ("usb_charging", "0\n")]);
    let sink = SharedSink::default();
    let mut app = App::with_settings(settings_for(&dir), Box::new(sink.clone()));

    app.toggle_selected();
    app.select_next();
    app.toggle_selected();

    let cam = dir.path().join("camera_power");
    let usb = dir.path().join("usb_charging");
    wait_for(|| {
        fs::read_to_string(&cam).unwrap() == "1" && fs::read_to_string(&usb).unwrap() == "1"
    });
    wait_for(|| {
        app.drain_outcomes();
        sink.messages().len() == 2
    });

    assert!(app.controllers[0].displayed);
    assert!(app.controllers[1].displayed);
}

// Round trip through the writer boundary: write(true) reads back enabled,
// write(false) reads back disabled.
#[test]
fn writer_round_trip() {
    let dir = seeded_device(&[("fn_lock", "0\n")]);
    let root = dir.path().to_string_lossy().to_string();

    let mut req = WriteRequest {
        option: "fn_lock".to_string(),
        device_path: root.clone(),
        requested: true,
        previous: false,
        strategy: WriteStrategy::Direct,
    };
    assert!(perform_write(&req));
    assert!(options::read_option(&root, "fn_lock"));

    req.requested = false;
    req.previous = true;
    assert!(perform_write(&req));
    assert!(!options::read_option(&root, "fn_lock"));
}

// Fail-safe default at the read boundary: a deleted backing file reads as
// disabled rather than erroring.
#[test]
fn unreadable_option_reads_disabled() {
    let dir = seeded_device(&[("camera_power", "1\n")]);
    let root = dir.path().to_string_lossy().to_string();
    assert!(options::read_option(&root, "camera_power"));

    fs::remove_file(dir.path().join("camera_power")).unwrap();
    assert!(!options::read_option(&root, "camera_power"));
}

// Opt-in serialization: a toggle arriving while a write is in flight parks
// in the single-slot queue and dispatches after the outcome, so the final
// state matches the last user request.
#[test]
fn serialized_writes_apply_last_request() {
    let dir = seeded_device(&[("camera_power", "0\n")]);
    let mut settings = settings_for(&dir);
    settings.serialize_writes = true;
    settings.send_success_notifications = false;
    let sink = SharedSink::default();
    let mut app = App::with_settings(settings, Box::new(sink.clone()));

    app.toggle_selected(); // on, dispatched
    app.toggle_selected(); // off, parked

    let file = dir.path().join("camera_power");
    wait_for(|| fs::read_to_string(&file).unwrap() == "1");
    // Draining the first outcome dispatches the parked request
    wait_for(|| {
        app.drain_outcomes();
        fs::read_to_string(&file).unwrap() == "0"
    });
    wait_for(|| {
        app.drain_outcomes();
        !app.controllers[0].displayed
    });
}
