// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity of the calling thread for thread-info lines.

use std::thread;

use logbook_core::ThreadInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentThread {
	pub id: u64,
	pub name: Option<String>,
}

impl CurrentThread {
	pub fn capture() -> Self {
		let current = thread::current();
		Self {
			id: thread_number(&format!("{:?}", current.id())),
			name: current.name().map(str::to_string),
		}
	}

	pub fn info(&self) -> ThreadInfo<'_> {
		ThreadInfo {
			id: self.id,
			name: self.name.as_deref(),
		}
	}
}

// `ThreadId` only exposes its number through Debug: `ThreadId(7)`.
// Real ids start at 1, so 0 (written as `[Thread ID | 0000]`) means the
// Debug format changed and the number could not be parsed.
fn thread_number(debug: &str) -> u64 {
	debug
		.chars()
		.filter(char::is_ascii_digit)
		.collect::<String>()
		.parse()
		.unwrap_or(0)
}
