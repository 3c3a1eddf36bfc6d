// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Thread-safe intake queue of formatted entries.

use std::collections::VecDeque;

use logbook_core::LogEntry;
use parking_lot::Mutex;

/// Unbounded FIFO of entries waiting to be flushed, plus the number of
/// entries appended since the last drain.
///
/// Producers only ever take this lock; it is never held across disk I/O.
#[derive(Debug, Default)]
pub struct IntakeQueue {
	state: Mutex<QueueState>,
}

#[derive(Debug, Default)]
struct QueueState {
	entries: VecDeque<LogEntry>,
	/// Entries appended since the last drain.
	pending: usize,
}

/// Entries claimed by one drain, in queue order.
#[derive(Debug, Default)]
pub struct Batch {
	entries: Vec<LogEntry>,
}

impl Batch {
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> &[LogEntry] {
		&self.entries
	}

	/// Every line of every entry, each terminated by `\n`.
	pub fn render(&self) -> String {
		let mut out = String::new();
		for line in self.entries.iter().flat_map(|e| e.lines()) {
			out.push_str(line);
			out.push('\n');
		}
		out
	}
}

impl IntakeQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one entry and return the pending count after the append.
	pub fn push(&self, entry: LogEntry) -> usize {
		let mut state = self.state.lock();
		state.entries.push_back(entry);
		state.pending += 1;
		state.pending
	}

	/// Take everything currently queued and reset the pending count.
	pub fn drain(&self) -> Batch {
		let mut state = self.state.lock();
		state.pending = 0;
		Batch {
			entries: state.entries.drain(..).collect(),
		}
	}

	/// Put a batch that could not be written back at the front, ahead of
	/// anything queued since it was drained.
	pub fn restore(&self, batch: Batch) {
		if batch.is_empty() {
			return;
		}
		let mut state = self.state.lock();
		state.pending += batch.entries.len();
		for entry in batch.entries.into_iter().rev() {
			state.entries.push_front(entry);
		}
	}

	/// Drop everything queued and reset the pending count.
	pub fn clear(&self) {
		let mut state = self.state.lock();
		state.entries.clear();
		state.pending = 0;
	}

	/// Number of queued entries.
	pub fn len(&self) -> usize {
		self.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().entries.is_empty()
	}

	/// Entries appended since the last drain.
	pub fn pending(&self) -> usize {
		self.state.lock().pending
	}
}
