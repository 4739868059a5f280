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

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::logger;

/// Toggles the ideapad-laptop driver is known to expose. Discovery filters
/// this list against the files actually present under the device path, so
/// older kernels that lack an attribute simply don't show it.
pub const KNOWN_OPTIONS: &[&str] = &[
    "camera_power",
    "conservation_mode",
    "fn_lock",
    "usb_charging",
];

/// Human-readable name for an option token: underscores become spaces and
/// each word is capitalized ("camera_power" -> "Camera Power").
pub fn display_name(option_id: &str) -> String {
    option_id
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Settings key for an option token: lowercased, underscores replaced by
/// hyphens, suffixed "-option" ("camera_power" -> "camera-power-option").
pub fn config_key(option_id: &str) -> String {
    format!("{}-option", option_id.to_lowercase().replace('_', "-"))
}

/// Full path of the backing file for an option under the device root.
pub fn option_path(device_path: &str, option_id: &str) -> PathBuf {
    Path::new(device_path).join(option_id)
}

fn read_trimmed<P: AsRef<Path>>(p: P) -> io::Result<String> {
    let mut s = String::new();
    fs::File::open(p)?.read_to_string(&mut s)?;
    Ok(s.trim().to_string())
}

/// Read the current value of an option file.
///
/// Any failure (missing file, permission denied, undecodable content) is
/// logged and reported as disabled. Callers can always treat the result as
/// ground truth for display purposes; they cannot distinguish "confirmed
/// off" from "unreadable" without the log, which is accepted.
pub fn read_option(device_path: &str, option_id: &str) -> bool {
    let path = option_path(device_path, option_id);
    match read_trimmed(&path) {
        Ok(raw) => raw == "1",
        Err(e) => {
            logger::log_event(
                "option_read_failed",
                json!({ "option": option_id, "path": path.display().to_string(), "error": e.to_string() }),
            );
            false
        }
    }
}

/// Enumerate the options supported by the driver instance at `device_path`.
///
/// The list is ordered like `KNOWN_OPTIONS` and stable for as long as the
/// directory contents don't change; callers run this once per menu rebuild.
pub fn supported_options(device_path: &str) -> Vec<String> {
    KNOWN_OPTIONS
        .iter()
        .filter(|id| option_path(device_path, id).is_file())
        .map(|id| id.to_string())
        .collect()
}
