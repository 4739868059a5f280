/*
 * This file is part of Ideactl.
 *
 * Copyright (C) 2025 Ideactl contributors
 *
 * Ideactl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Ideactl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Ideactl. If not, see <https://www.gnu.org/licenses/>.
 */

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Where the toggle panel renders relative to the status area.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Top,
    Bottom,
}

fn default_sysfs_path() -> String {
    // ideapad-laptop platform device on current kernels
    "/sys/bus/platform/devices/VPC2004:00/".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Device root under which the option files live.
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: String,
    /// Escalate writes through pkexec instead of writing with the
    /// process's own permissions. Read fresh on every write attempt.
    #[serde(default = "default_true")]
    pub use_pkexec: bool,
    #[serde(default = "default_true")]
    pub send_success_notifications: bool,
    /// Opt-in single-slot per-option write queueing; off preserves the
    /// documented last-completion-wins behavior for rapid toggles.
    #[serde(default)]
    pub serialize_writes: bool,
    #[serde(default)]
    pub placement: Placement,
    /// Per-option visibility keyed by the derived config key, e.g.
    /// "camera-power-option". Missing entries mean visible.
    #[serde(default)]
    pub option_visibility: HashMap<String, bool>,
    /// Show the settings-file footer row in the UI.
    #[serde(default = "default_true")]
    pub settings_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sysfs_path: default_sysfs_path(),
            use_pkexec: true,
            send_success_notifications: true,
            serialize_writes: false,
            placement: Placement::Top,
            option_visibility: HashMap::new(),
            settings_hint: true,
        }
    }
}

impl Settings {
    pub fn option_visible(&self, config_key: &str) -> bool {
        self.option_visibility.get(config_key).copied().unwrap_or(true)
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("ideactl").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("ideactl")
            .join("config.json");
    }
    PathBuf::from("/etc/ideactl/config.json")
}

pub fn load_saved_settings() -> Option<Settings> {
    load_settings_from(&config_path())
}

pub fn load_settings_from(path: &Path) -> Option<Settings> {
    let data = fs::read_to_string(path).ok()?;
    let settings: Settings = serde_json::from_str(&data).ok()?;
    validate_settings(&settings).ok()?;
    Some(settings)
}

pub fn save_settings(settings: &Settings) -> io::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(settings).unwrap_or_else(|_| "{}".to_string());
    fs::write(path, json)
}

/// Modification stamp of the config file, polled by the app loop as the
/// change subscription: a stamp change triggers a settings reload and a
/// full rebuild of the toggle menu.
pub fn settings_stamp() -> Option<SystemTime> {
    fs::metadata(config_path()).ok()?.modified().ok()
}

fn is_safe_key(s: &str) -> bool {
    if s.is_empty() || s.len() > 128 {
        return false;
    }
    s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_settings(settings: &Settings) -> Result<(), String> {
    if settings.sysfs_path.is_empty() || settings.sysfs_path.len() > 512 {
        return Err("sysfs_path must be non-empty and at most 512 characters".to_string());
    }
    if !settings.sysfs_path.starts_with('/') {
        return Err("sysfs_path must be absolute".to_string());
    }
    if settings.option_visibility.len() > 256 {
        return Err("too many option visibility entries (max 256)".to_string());
    }
    for key in settings.option_visibility.keys() {
        if !is_safe_key(key) {
            return Err(format!("invalid option visibility key '{}'", key));
        }
        if !key.ends_with("-option") {
            return Err(format!("option visibility key '{}' must end with '-option'", key));
        }
    }
    Ok(())
}
