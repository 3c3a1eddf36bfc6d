// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log file location.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use logbook_core::FILE_NAME_FORMAT;

use crate::error::{LogbookError, Result};
use crate::settings::Settings;

pub const LOG_EXTENSION: &str = "log";

/// `<local data dir>/logbook/logs`
pub fn default_log_dir() -> Result<PathBuf> {
	dirs::data_local_dir()
		.map(|dir| dir.join("logbook").join("logs"))
		.ok_or(LogbookError::StorageDirNotFound)
}

/// Directory configured in `settings`, or the platform default.
pub fn log_dir(settings: &Settings) -> Result<PathBuf> {
	match &settings.log_dir {
		Some(dir) => Ok(dir.clone()),
		None => default_log_dir(),
	}
}

/// `2025-06-13 12.34.56.789.log`
pub fn session_file_name(now: &DateTime<Local>) -> String {
	format!("{}.{LOG_EXTENSION}", now.format(FILE_NAME_FORMAT))
}

/// A fresh per-session file path inside `dir`.
pub fn session_file_path(dir: &Path) -> PathBuf {
	dir.join(session_file_name(&Local::now()))
}

pub fn is_log_file(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
}
