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

//! Ideactl - hardware toggle TUI for Linux IdeaPad laptops
//!
//! This library keeps boolean hardware features (camera power, conservation
//! mode, fn-lock, USB charging) exposed by the ideapad-laptop driver in sync
//! with a user-facing toggle menu, writing either directly or through pkexec
//! when the sysfs attribute needs elevated rights.

pub mod app;
pub mod config;
pub mod controller;
pub mod events;
pub mod logger;
pub mod notify;
pub mod options;
pub mod ui;
pub mod writer;

#[cfg(test)]
pub mod test_utils;
