// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The logbook handle and its lifecycle.
//!
//! ```text
//! Uninitialized --initialize--> Ready <--set_enabled--> Disabled
//!                                 |                        |
//!                                 +-------shutdown---------+--> ShuttingDown
//! ```
//!
//! Entries are accepted only while `Ready`. Disabling stops the flush timer
//! but keeps whatever is already queued; enabling again restarts the timer
//! with an immediate tick.

use std::path::PathBuf;
use std::sync::{Arc, Weak};
use std::thread::ThreadId;

use logbook_core::LogEntry;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::dispatch::{ConsoleSink, Dispatcher, StderrConsole};
use crate::error::{LogbookError, Result};
use crate::flush::FlushEngine;
use crate::paths::log_dir;
use crate::policy::{self, FlushDecision};
use crate::prune::prune_log_files;
use crate::queue::IntakeQueue;
use crate::settings::Settings;
use crate::timer::FlushTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
	Uninitialized,
	Ready,
	Disabled,
	/// Terminal.
	ShuttingDown,
}

/// Builder for constructing a [`Logbook`].
pub struct LogbookBuilder {
	settings: Option<Settings>,
	file_path: Option<PathBuf>,
	sink: Option<Arc<dyn ConsoleSink>>,
	main_thread: Option<ThreadId>,
}

impl LogbookBuilder {
	pub fn new() -> Self {
		Self {
			settings: None,
			file_path: None,
			sink: None,
			main_thread: None,
		}
	}

	/// Settings installed by [`LogbookBuilder::init`]. Defaults when unset.
	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Write to this file instead of a per-session file in the log directory.
	pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.file_path = Some(path.into());
		self
	}

	/// Where console output goes. Colored stderr by default.
	pub fn console(mut self, sink: Arc<dyn ConsoleSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	/// Thread that emits console output. The building thread by default.
	pub fn main_thread(mut self, id: ThreadId) -> Self {
		self.main_thread = Some(id);
		self
	}

	/// Build an uninitialized logbook.
	pub fn build(self) -> Logbook {
		let sink = self.sink.unwrap_or_else(|| Arc::new(StderrConsole));
		let dispatcher = match self.main_thread {
			Some(id) => Dispatcher::with_main_thread(id, sink),
			None => Dispatcher::new(sink),
		};

		Logbook {
			inner: Arc::new(Inner {
				settings: RwLock::new(Arc::new(Settings::default())),
				state: RwLock::new(LifecycleState::Uninitialized),
				queue: IntakeQueue::new(),
				engine: FlushEngine::new(),
				timer: Mutex::new(None),
				dispatcher,
			}),
		}
	}

	/// Build and initialize with the configured settings and file path.
	pub fn init(mut self) -> Result<Logbook> {
		let settings = self.settings.take();
		let file_path = self.file_path.take();
		let logbook = self.build();
		logbook.initialize(settings, file_path)?;
		Ok(logbook)
	}
}

impl Default for LogbookBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct Inner {
	/// Swapped whole; readers clone the `Arc` and never see a torn snapshot.
	settings: RwLock<Arc<Settings>>,
	state: RwLock<LifecycleState>,
	queue: IntakeQueue,
	engine: FlushEngine,
	timer: Mutex<Option<FlushTimer>>,
	dispatcher: Dispatcher,
}

impl Inner {
	fn settings(&self) -> Arc<Settings> {
		Arc::clone(&self.settings.read())
	}

	fn state(&self) -> LifecycleState {
		*self.state.read()
	}

	fn timer_tick(&self) {
		if self.state() != LifecycleState::Ready {
			return;
		}
		if !policy::timer_should_flush(&self.settings()) {
			return;
		}
		// Nobody is waiting on a timer flush, so the error ends here.
		if let Err(e) = self.engine.flush(&self.queue) {
			error!(error = %e, "timer flush failed");
		}
	}

	fn schedule_timer(&self, settings: &Settings, immediately: bool) {
		let timer = self.timer.lock();
		let Some(timer) = timer.as_ref() else {
			return;
		};
		if !settings.buffer.enabled {
			timer.stop();
		} else if immediately {
			timer.restart_now(settings.buffer.interval());
		} else {
			timer.start(settings.buffer.interval());
		}
	}
}

/// Handle to a buffered logbook. Clones share the same queue, file and timer.
///
/// # Example
///
/// ```ignore
/// let logbook = Logbook::builder()
///     .settings(logbook::load_settings(None)?)
///     .init()?;
///
/// logbook.info(Some("Network"), "connected");
///
/// // Main loop
/// logbook.dispatcher().run_pending();
///
/// logbook.shutdown()?;
/// ```
#[derive(Clone)]
pub struct Logbook {
	inner: Arc<Inner>,
}

impl Logbook {
	pub fn builder() -> LogbookBuilder {
		LogbookBuilder::new()
	}

	/// (Re)initialize: clear the queue, install `settings` (defaults when
	/// `None`), resolve the log file, prune old files and start the flush
	/// timer if buffering is on.
	///
	/// Safe to call repeatedly; each call replaces the previous settings and
	/// drops anything still queued.
	pub fn initialize(&self, settings: Option<Settings>, file_path: Option<PathBuf>) -> Result<()> {
		if self.state() == LifecycleState::ShuttingDown {
			return Err(LogbookError::ShutDown);
		}

		let settings = Arc::new(settings.unwrap_or_default().normalized());

		self.inner.queue.clear();
		*self.inner.settings.write() = Arc::clone(&settings);

		// A custom file path only redirects writes; pruning stays in the
		// storage directory.
		let dir = log_dir(&settings)?;
		let path = self.inner.engine.configure(dir.clone(), file_path)?;

		let pruned = prune_log_files(&dir, settings.max_file_count)?;
		if pruned > 0 {
			debug!(count = pruned, dir = %dir.display(), "pruned old log files");
		}

		self.ensure_timer()?;
		self.inner.schedule_timer(&settings, false);

		*self.inner.state.write() = LifecycleState::Ready;
		info!(
			path = %path.display(),
			buffered = settings.buffer.enabled,
			buffer_size = settings.buffer.size,
			interval_ms = settings.buffer.interval_ms,
			"logbook initialized"
		);
		Ok(())
	}

	fn ensure_timer(&self) -> Result<()> {
		let mut timer = self.inner.timer.lock();
		if timer.is_none() {
			let weak: Weak<Inner> = Arc::downgrade(&self.inner);
			*timer = Some(FlushTimer::spawn(move || {
				if let Some(inner) = weak.upgrade() {
					inner.timer_tick();
				}
			})?);
		}
		Ok(())
	}

	/// Queue an entry and flush synchronously if the buffer policy says so.
	///
	/// Returns `Ok(false)` without queuing unless the logbook is ready. A
	/// failed flush leaves every entry queued and returns the error.
	pub fn enqueue(&self, entry: impl Into<LogEntry>) -> Result<bool> {
		if self.state() != LifecycleState::Ready {
			return Ok(false);
		}

		let pending = self.inner.queue.push(entry.into());
		let settings = self.settings();
		if policy::persistence_allowed(&settings)
			&& policy::after_enqueue(&settings, pending) == FlushDecision::Now
		{
			self.inner.engine.flush(&self.inner.queue)?;
		}
		Ok(true)
	}

	/// Flush if persistence is enabled. Returns the number of entries written.
	pub fn flush(&self) -> Result<usize> {
		self.check_open()?;
		if !policy::persistence_allowed(&self.settings()) {
			return Ok(0);
		}
		self.inner.engine.flush(&self.inner.queue)
	}

	/// Flush regardless of the persistence and buffering toggles.
	pub fn force_flush(&self) -> Result<usize> {
		self.check_open()?;
		self.inner.engine.flush(&self.inner.queue)
	}

	/// Drop everything queued. Ignored unless the logbook is ready.
	pub fn clear_pending(&self) {
		if self.state() == LifecycleState::Ready {
			self.inner.queue.clear();
		}
	}

	/// Pause or resume. Queued entries survive either way.
	pub fn set_enabled(&self, enabled: bool) {
		let mut state = self.inner.state.write();
		match (*state, enabled) {
			(LifecycleState::Ready, false) => {
				*state = LifecycleState::Disabled;
				drop(state);
				if let Some(timer) = self.inner.timer.lock().as_ref() {
					timer.stop();
				}
				debug!("logbook disabled");
			}
			(LifecycleState::Disabled, true) => {
				*state = LifecycleState::Ready;
				drop(state);
				self.inner.schedule_timer(&self.settings(), true);
				debug!("logbook enabled");
			}
			(current, _) => {
				debug!(state = ?current, enabled, "enable toggle ignored");
			}
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.state() == LifecycleState::Ready
	}

	pub fn state(&self) -> LifecycleState {
		self.inner.state()
	}

	/// Current settings snapshot.
	pub fn settings(&self) -> Arc<Settings> {
		self.inner.settings()
	}

	/// Swap in a new snapshot. Applies from the next event on; the timer is
	/// rescheduled with the new interval.
	pub fn replace_settings(&self, settings: Settings) {
		let settings = Arc::new(settings.normalized());
		*self.inner.settings.write() = Arc::clone(&settings);
		if self.state() == LifecycleState::Ready {
			self.inner.schedule_timer(&settings, false);
		}
	}

	/// Change how many log files pruning keeps, clamped to [1, 100].
	/// Takes effect at the next initialization.
	pub fn set_max_file_count(&self, count: usize) {
		let mut settings = self.inner.settings.write();
		*settings = Arc::new(settings.with_max_file_count(count));
	}

	/// One final forced flush, then stop the timer. Later calls are no-ops.
	pub fn shutdown(&self) -> Result<()> {
		{
			let mut state = self.inner.state.write();
			if *state == LifecycleState::ShuttingDown {
				return Ok(());
			}
			*state = LifecycleState::ShuttingDown;
		}

		let flushed = self.inner.engine.flush(&self.inner.queue);
		if let Some(timer) = self.inner.timer.lock().take() {
			timer.dispose();
		}

		match flushed {
			Ok(count) => {
				info!(count, "logbook shut down");
				Ok(())
			}
			Err(e) => {
				warn!(error = %e, "final flush failed during shutdown");
				Err(e)
			}
		}
	}

	/// Entries waiting to be flushed.
	pub fn pending_len(&self) -> usize {
		self.inner.queue.len()
	}

	/// Entries queued since the last flush.
	pub fn buffer_count(&self) -> usize {
		self.inner.queue.pending()
	}

	pub fn file_path(&self) -> Option<PathBuf> {
		self.inner.engine.path()
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.inner.dispatcher
	}

	fn check_open(&self) -> Result<()> {
		if self.state() == LifecycleState::ShuttingDown {
			return Err(LogbookError::ShutDown);
		}
		Ok(())
	}
}

impl std::fmt::Debug for Logbook {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Logbook")
			.field("state", &self.state())
			.field("pending", &self.pending_len())
			.field("file_path", &self.file_path())
			.finish()
	}
}
