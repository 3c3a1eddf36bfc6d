// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic flush timer.
//!
//! A dedicated thread waits on a command channel with a deadline. Stopping
//! the timer moves its due time to "never"; a tick already running is not
//! interrupted.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::{LogbookError, Result};

/// Shortest period the timer runs at; shorter requests are raised to it.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
enum TimerCommand {
	Schedule { first: Duration, period: Duration },
	Stop,
	Shutdown,
}

pub struct FlushTimer {
	sender: Sender<TimerCommand>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl FlushTimer {
	/// Spawn the timer thread, initially stopped. `tick` runs on that thread
	/// every time the timer fires.
	pub fn spawn<F>(tick: F) -> Result<Self>
	where
		F: Fn() + Send + 'static,
	{
		let (sender, receiver) = unbounded::<TimerCommand>();

		let handle = thread::Builder::new()
			.name("logbook-flush".to_string())
			.spawn(move || {
				let mut schedule: Option<(Instant, Duration)> = None;
				loop {
					let command = match schedule {
						Some((due, _)) => receiver.recv_deadline(due),
						None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
					};

					match command {
						Ok(TimerCommand::Schedule { first, period }) => {
							schedule = Some((Instant::now() + first, period.max(MIN_PERIOD)));
						}
						Ok(TimerCommand::Stop) => schedule = None,
						Ok(TimerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
						Err(RecvTimeoutError::Timeout) => {
							if let Some((due, period)) = schedule {
								trace!("flush timer fired");
								tick();
								// Missed periods are skipped, not replayed.
								let next = due + period;
								let now = Instant::now();
								schedule = Some((if next < now { now + period } else { next }, period));
							}
						}
					}
				}
				debug!("flush timer stopped");
			})
			.map_err(LogbookError::Spawn)?;

		Ok(Self {
			sender,
			handle: Mutex::new(Some(handle)),
		})
	}

	/// Fire after one `period`, then every `period`.
	pub fn start(&self, period: Duration) {
		self.send(TimerCommand::Schedule {
			first: period,
			period,
		});
	}

	/// Fire immediately, then every `period`.
	pub fn restart_now(&self, period: Duration) {
		self.send(TimerCommand::Schedule {
			first: Duration::ZERO,
			period,
		});
	}

	/// Suppress future firings.
	pub fn stop(&self) {
		self.send(TimerCommand::Stop);
	}

	/// Stop the thread and wait for it to exit. Later calls are no-ops.
	pub fn dispose(&self) {
		self.send(TimerCommand::Shutdown);
		let Some(handle) = self.handle.lock().take() else {
			return;
		};
		// A tick that disposes its own timer cannot join itself.
		if handle.thread().id() != thread::current().id() {
			let _ = handle.join();
		}
	}

	fn send(&self, command: TimerCommand) {
		// Only fails once the thread has exited, when there is nothing to control.
		let _ = self.sender.send(command);
	}
}

impl Drop for FlushTimer {
	fn drop(&mut self) {
		let _ = self.sender.send(TimerCommand::Shutdown);
	}
}

impl std::fmt::Debug for FlushTimer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FlushTimer")
			.field("running", &self.handle.lock().is_some())
			.finish()
	}
}
