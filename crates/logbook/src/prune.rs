// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Startup pruning of old session log files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::error::{LogbookError, Result};
use crate::paths::is_log_file;

/// Delete the oldest `*.log` files in `dir` until at most `max` remain.
///
/// Only the top level of `dir` is considered. Files are ordered by creation
/// time, falling back to modification time where the platform has no birth
/// time. A file that cannot be deleted is skipped. Returns how many files
/// were removed; a missing directory removes nothing.
pub fn prune_log_files(dir: &Path, max: usize) -> Result<usize> {
	let entries = match fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
		Err(source) => {
			return Err(LogbookError::Prune {
				path: dir.to_path_buf(),
				source,
			})
		}
	};

	let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|source| LogbookError::Prune {
			path: dir.to_path_buf(),
			source,
		})?;
		let path = entry.path();
		if !is_log_file(&path) {
			continue;
		}
		let metadata = match entry.metadata() {
			Ok(m) if m.is_file() => m,
			Ok(_) => continue,
			Err(e) => {
				warn!(path = %path.display(), error = %e, "skipping unreadable log file");
				continue;
			}
		};
		let created = metadata
			.created()
			.or_else(|_| metadata.modified())
			.unwrap_or(SystemTime::UNIX_EPOCH);
		files.push((created, path));
	}

	if files.len() <= max {
		return Ok(0);
	}

	files.sort();
	let excess = files.len() - max;
	let mut removed = 0;
	for (_, path) in files.into_iter().take(excess) {
		match fs::remove_file(&path) {
			Ok(()) => {
				debug!(path = %path.display(), "pruned log file");
				removed += 1;
			}
			Err(e) => warn!(path = %path.display(), error = %e, "failed to prune log file"),
		}
	}
	Ok(removed)
}
