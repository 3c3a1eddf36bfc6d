// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Formatted entries.

/// One logical event rendered as an ordered group of lines.
///
/// Line order inside an entry is fixed (header, thread info, stack trace,
/// closing line). Entries are immutable once built and are queued and
/// written as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
	lines: Vec<String>,
}

impl LogEntry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, line: impl Into<String>) {
		self.lines.push(line.into());
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}

	/// Number of lines in the entry.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// First line of the entry, normally the header.
	pub fn header(&self) -> Option<&str> {
		self.lines.first().map(String::as_str)
	}

	/// All lines joined with `\n`, without a trailing newline.
	pub fn render(&self) -> String {
		self.lines.join("\n")
	}
}

impl From<String> for LogEntry {
	fn from(line: String) -> Self {
		Self { lines: vec![line] }
	}
}

impl From<&str> for LogEntry {
	fn from(line: &str) -> Self {
		Self::from(line.to_string())
	}
}

impl From<Vec<String>> for LogEntry {
	fn from(lines: Vec<String>) -> Self {
		Self { lines }
	}
}

impl Extend<String> for LogEntry {
	fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
		self.lines.extend(iter);
	}
}

impl IntoIterator for LogEntry {
	type Item = String;
	type IntoIter = std::vec::IntoIter<String>;

	fn into_iter(self) -> Self::IntoIter {
		self.lines.into_iter()
	}
}
