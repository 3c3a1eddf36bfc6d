// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Finalized settings snapshot.
//!
//! A [`Settings`] value is never mutated while shared: the lifecycle
//! controller swaps whole snapshots, so readers see either the old or the
//! new one.

use std::path::PathBuf;
use std::time::Duration;

use logbook_core::Severity;
use serde::{Deserialize, Serialize};

pub const MIN_FILE_COUNT: usize = 1;
pub const MAX_FILE_COUNT: usize = 100;

/// Size and time thresholds for flushing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BufferSettings {
	pub enabled: bool,
	/// Entries queued since the last flush that force a flush.
	pub size: usize,
	/// Period of the flush timer.
	pub interval_ms: u64,
}

impl BufferSettings {
	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}
}

impl Default for BufferSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			size: 64,
			interval_ms: 5_000,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackTraceSettings {
	/// Attach the host's stack trace to host exceptions.
	pub from_host: bool,
	pub save_to_file: bool,
	/// Write a thread info line before each stack trace.
	pub thread_info: bool,
	pub show_in_console: bool,
}

impl Default for StackTraceSettings {
	fn default() -> Self {
		Self {
			from_host: true,
			save_to_file: true,
			thread_info: true,
			show_in_console: false,
		}
	}
}

/// Per-category toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelSettings {
	pub show_in_console: bool,
	pub save_to_file: bool,
	pub save_stack_trace: bool,
}

impl Default for ChannelSettings {
	fn default() -> Self {
		Self {
			show_in_console: true,
			save_to_file: true,
			save_stack_trace: true,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
	pub buffer: BufferSettings,
	/// Log files kept in the directory after pruning, within [1, 100].
	pub max_file_count: usize,
	/// Directory for session log files; platform data dir when unset.
	pub log_dir: Option<PathBuf>,
	/// Console output is suppressed entirely in non-debug builds.
	pub debug_build: bool,
	pub show_in_console: bool,
	pub save_to_file: bool,
	pub stack_trace: StackTraceSettings,
	pub line: ChannelSettings,
	pub log: ChannelSettings,
	pub info: ChannelSettings,
	pub warning: ChannelSettings,
	pub error: ChannelSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			buffer: BufferSettings::default(),
			max_file_count: 10,
			log_dir: None,
			debug_build: true,
			show_in_console: true,
			save_to_file: true,
			stack_trace: StackTraceSettings::default(),
			line: ChannelSettings {
				save_stack_trace: false,
				..ChannelSettings::default()
			},
			log: ChannelSettings::default(),
			info: ChannelSettings::default(),
			warning: ChannelSettings::default(),
			error: ChannelSettings::default(),
		}
	}
}

impl Settings {
	/// Clamp every bounded field: `max_file_count` to [1, 100], buffer size
	/// and flush interval to at least 1.
	pub fn normalized(mut self) -> Self {
		self.max_file_count = clamp_file_count(self.max_file_count);
		self.buffer.size = self.buffer.size.max(1);
		self.buffer.interval_ms = self.buffer.interval_ms.max(1);
		self
	}

	/// Normalized copy with `max_file_count` replaced.
	pub fn with_max_file_count(&self, count: usize) -> Self {
		Self {
			max_file_count: count,
			..self.clone()
		}
		.normalized()
	}

	/// Whether any console output is allowed at all.
	pub fn console_allowed(&self) -> bool {
		self.debug_build && self.show_in_console
	}

	/// Toggles of the convenience channel for `severity`, if it has one.
	pub fn channel(&self, severity: Severity) -> Option<&ChannelSettings> {
		match severity {
			Severity::Line => Some(&self.line),
			Severity::Log => Some(&self.log),
			Severity::Info => Some(&self.info),
			Severity::Warning => Some(&self.warning),
			Severity::Error => Some(&self.error),
			Severity::Exception | Severity::StackTrace | Severity::Separator => None,
		}
	}
}

pub fn clamp_file_count(count: usize) -> usize {
	count.clamp(MIN_FILE_COUNT, MAX_FILE_COUNT)
}
