/*
 * Test utilities and mock helpers for Ideactl
 *
 * Shared fixtures used across the unit-test modules: a recording
 * notification sink and a temp-dir-backed fake device directory.
 */

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::notify::NotificationSink;

/// Captures every notification for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, title: &str, body: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

/// Build a fake device directory with the given option files and initial
/// states.
pub fn fake_device(options: &[(&str, bool)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (id, enabled) in options {
        write_option_file(dir.path(), id, *enabled);
    }
    dir
}

pub fn write_option_file(root: &Path, option_id: &str, enabled: bool) {
    fs::write(root.join(option_id), if enabled { "1\n" } else { "0\n" }).unwrap();
}
