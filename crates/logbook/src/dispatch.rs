// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Console output on the main thread.
//!
//! Console emission always happens on one designated thread. Calls made on
//! that thread emit directly; calls from anywhere else post a
//! [`ConsoleMessage`] to a work queue which the main thread drains with
//! [`Dispatcher::run_pending`] at its own cadence. Posting is
//! fire-and-forget.

use std::io::Write;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender};
use logbook_core::{decorate, Severity};
use tracing::warn;

/// One rendered console line waiting to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
	pub severity: Severity,
	pub channel: Option<String>,
	pub text: String,
}

impl ConsoleMessage {
	pub fn new(severity: Severity, channel: Option<&str>, text: impl Into<String>) -> Self {
		Self {
			severity,
			channel: channel.map(str::to_string),
			text: text.into(),
		}
	}
}

/// Destination for console output.
pub trait ConsoleSink: Send + Sync {
	fn emit(&self, message: &ConsoleMessage);
}

/// Colored output on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrConsole;

impl ConsoleSink for StderrConsole {
	fn emit(&self, message: &ConsoleMessage) {
		let line = decorate::console_line(message.severity, message.channel.as_deref(), &message.text);
		let _ = writeln!(std::io::stderr().lock(), "{line}");
	}
}

#[derive(Clone)]
pub struct Dispatcher {
	main: ThreadId,
	sender: Sender<ConsoleMessage>,
	receiver: Receiver<ConsoleMessage>,
	sink: Arc<dyn ConsoleSink>,
}

impl Dispatcher {
	/// Dispatcher whose main thread is the calling thread.
	pub fn new(sink: Arc<dyn ConsoleSink>) -> Self {
		Self::with_main_thread(thread::current().id(), sink)
	}

	pub fn with_main_thread(main: ThreadId, sink: Arc<dyn ConsoleSink>) -> Self {
		let (sender, receiver) = unbounded();
		Self {
			main,
			sender,
			receiver,
			sink,
		}
	}

	pub fn main_thread(&self) -> ThreadId {
		self.main
	}

	pub fn is_main_thread(&self) -> bool {
		thread::current().id() == self.main
	}

	/// Emit now on the main thread, otherwise post to the work queue.
	pub fn emit(&self, message: ConsoleMessage) {
		if self.is_main_thread() {
			self.sink.emit(&message);
		} else {
			// The receiver lives in `self`, so the channel cannot be disconnected.
			let _ = self.sender.send(message);
		}
	}

	/// Emit everything posted from other threads, in posting order.
	///
	/// Must be called on the main thread; elsewhere it does nothing and
	/// returns 0.
	pub fn run_pending(&self) -> usize {
		if !self.is_main_thread() {
			warn!("console work queue drained off the main thread, ignoring");
			return 0;
		}
		let mut emitted = 0;
		for message in self.receiver.try_iter() {
			self.sink.emit(&message);
			emitted += 1;
		}
		emitted
	}

	/// Messages posted but not yet emitted.
	pub fn pending(&self) -> usize {
		self.receiver.len()
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("main", &self.main)
			.field("pending", &self.receiver.len())
			.finish()
	}
}
