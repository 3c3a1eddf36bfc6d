// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Draining the intake queue into the log file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{LogbookError, Result};
use crate::paths::session_file_path;
use crate::queue::IntakeQueue;

/// Where the current log file lives.
#[derive(Debug, Default)]
struct FileTarget {
	/// Directory used to re-derive a session path when `path` is lost.
	dir: Option<PathBuf>,
	path: Option<PathBuf>,
}

/// Appends drained batches to the current log file.
///
/// The mutex around the target is the file lock: it serializes flushes
/// and path resolution. Producers never take it.
#[derive(Debug, Default)]
pub struct FlushEngine {
	target: Mutex<FileTarget>,
}

impl FlushEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Point the engine at `path`, or at a fresh session file in `dir`.
	pub fn configure(&self, dir: PathBuf, path: Option<PathBuf>) -> Result<PathBuf> {
		let mut target = self.target.lock();
		target.dir = Some(dir);
		target.path = path;
		resolve(&mut target)
	}

	/// Use `path` for subsequent flushes. `None` forgets the current path so
	/// the next flush re-derives one.
	pub fn set_path(&self, path: Option<PathBuf>) {
		self.target.lock().path = path;
	}

	/// Current file path, if resolved.
	pub fn path(&self) -> Option<PathBuf> {
		self.target.lock().path.clone()
	}

	/// Current file path, deriving a session file when none is set.
	pub fn resolve(&self) -> Result<PathBuf> {
		resolve(&mut self.target.lock())
	}

	pub fn forget_path(&self) {
		self.set_path(None);
	}

	/// Directory the engine derives session paths from.
	pub fn dir(&self) -> Option<PathBuf> {
		self.target.lock().dir.clone()
	}

	/// Drain `queue` and append everything to the log file in one write.
	///
	/// Returns the number of entries written. On failure the drained batch
	/// is put back at the front of the queue before the error is returned.
	pub fn flush(&self, queue: &IntakeQueue) -> Result<usize> {
		let mut target = self.target.lock();

		let batch = queue.drain();
		if batch.is_empty() {
			return Ok(0);
		}

		let path = match resolve(&mut target) {
			Ok(path) => path,
			Err(e) => {
				queue.restore(batch);
				return Err(e);
			}
		};

		match append(&path, &batch.render()) {
			Ok(()) => {
				debug!(count = batch.len(), path = %path.display(), "flushed log batch");
				Ok(batch.len())
			}
			Err(source) => {
				warn!(count = batch.len(), path = %path.display(), error = %source, "log append failed, batch re-queued");
				queue.restore(batch);
				Err(LogbookError::Write { path, source })
			}
		}
	}
}

// Self-healing: a lost path is re-derived from the directory.
fn resolve(target: &mut FileTarget) -> Result<PathBuf> {
	if let Some(path) = &target.path {
		return Ok(path.clone());
	}

	let dir = match &target.dir {
		Some(dir) => dir.clone(),
		None => crate::paths::default_log_dir()?,
	};
	fs::create_dir_all(&dir).map_err(|source| LogbookError::CreateDir {
		path: dir.clone(),
		source,
	})?;

	let path = session_file_path(&dir);
	debug!(path = %path.display(), "resolved log file path");
	target.dir = Some(dir);
	target.path = Some(path.clone());
	Ok(path)
}

fn append(path: &Path, text: &str) -> std::io::Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	let mut file = OpenOptions::new().create(true).append(true).open(path)?;
	file.write_all(text.as_bytes())?;
	file.flush()
}

#[cfg(test)]
mod tests {
	use super::*;
	use logbook_core::LogEntry;

	#[test]
	fn test_flush_appends_in_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("session.log");
		let engine = FlushEngine::new();
		engine
			.configure(dir.path().to_path_buf(), Some(path.clone()))
			.unwrap();

		let queue = IntakeQueue::new();
		queue.push(LogEntry::from("one"));
		queue.push(LogEntry::from("two"));
		assert_eq!(engine.flush(&queue).unwrap(), 2);

		queue.push(LogEntry::from("three"));
		assert_eq!(engine.flush(&queue).unwrap(), 1);

		assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\nthree\n");
		assert!(queue.is_empty());
		assert_eq!(queue.pending(), 0);
	}

	#[test]
	fn test_empty_queue_is_noop() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("session.log");
		let engine = FlushEngine::new();
		engine
			.configure(dir.path().to_path_buf(), Some(path.clone()))
			.unwrap();

		assert_eq!(engine.flush(&IntakeQueue::new()).unwrap(), 0);
		assert!(!path.exists());
	}

	#[test]
	fn test_lost_path_is_rederived() {
		let dir = tempfile::tempdir().unwrap();
		let engine = FlushEngine::new();
		engine.configure(dir.path().to_path_buf(), None).unwrap();
		engine.forget_path();
		assert!(engine.path().is_none());

		let queue = IntakeQueue::new();
		queue.push(LogEntry::from("healed"));
		engine.flush(&queue).unwrap();

		let path = engine.path().unwrap();
		assert_eq!(path.parent(), Some(dir.path()));
		assert_eq!(fs::read_to_string(path).unwrap(), "healed\n");
	}

	#[test]
	fn test_write_failure_requeues_batch() {
		let dir = tempfile::tempdir().unwrap();
		// A directory cannot be opened for appending.
		let blocked = dir.path().join("blocked.log");
		fs::create_dir(&blocked).unwrap();

		let engine = FlushEngine::new();
		engine
			.configure(dir.path().to_path_buf(), Some(blocked))
			.unwrap();

		let queue = IntakeQueue::new();
		queue.push(LogEntry::from("keep me"));
		let result = engine.flush(&queue);

		assert!(matches!(result, Err(LogbookError::Write { .. })));
		assert_eq!(queue.len(), 1);
		assert_eq!(queue.pending(), 1);
		assert_eq!(queue.drain().render(), "keep me\n");
	}
}
