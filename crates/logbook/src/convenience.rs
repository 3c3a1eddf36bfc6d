// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-severity entry points.
//!
//! Each call formats one event, queues it when the channel persists to file
//! and mirrors it to the console when the channel shows in the console.
//! Everything is a no-op unless the logbook is enabled.

use chrono::Local;
use logbook_core::{console_stack_trace_lines, format_event, Event, LogEntry, Severity, RULE};
use tracing::error;

use crate::backtrace;
use crate::dispatch::ConsoleMessage;
use crate::lifecycle::Logbook;
use crate::settings::Settings;
use crate::thread::CurrentThread;

impl Logbook {
	/// An aligned line without time or severity.
	pub fn line(&self, channel: Option<&str>, message: &str) {
		self.record(Severity::Line, channel, message);
	}

	pub fn log(&self, channel: Option<&str>, message: &str) {
		self.record(Severity::Log, channel, message);
	}

	pub fn info(&self, channel: Option<&str>, message: &str) {
		self.record(Severity::Info, channel, message);
	}

	pub fn warning(&self, channel: Option<&str>, message: &str) {
		self.record(Severity::Warning, channel, message);
	}

	pub fn error(&self, channel: Option<&str>, message: &str) {
		self.record(Severity::Error, channel, message);
	}

	/// A horizontal rule.
	pub fn separator(&self) {
		if !self.is_enabled() {
			return;
		}
		let settings = self.settings();
		if settings.save_to_file {
			self.submit(LogEntry::from(RULE));
		}
		if settings.console_allowed() {
			self.dispatcher()
				.emit(ConsoleMessage::new(Severity::Separator, None, RULE));
		}
	}

	/// The caller's current stack. Only recorded in debug builds.
	pub fn stack_trace(&self) {
		if !self.is_enabled() {
			return;
		}
		let settings = self.settings();
		if !settings.debug_build {
			return;
		}

		let trace = backtrace::capture();
		if settings.save_to_file && settings.stack_trace.save_to_file {
			self.submit(build_entry(&settings, Severity::StackTrace, None, None, Some(&trace)));
		}
		if settings.show_in_console && settings.stack_trace.show_in_console {
			let text = console_stack_trace_lines(&trace).collect::<Vec<_>>().join("\n");
			self.dispatcher()
				.emit(ConsoleMessage::new(Severity::StackTrace, None, text));
		}
	}

	fn record(&self, severity: Severity, channel: Option<&str>, message: &str) {
		if !self.is_enabled() {
			return;
		}
		let settings = self.settings();
		let Some(toggles) = settings.channel(severity) else {
			return;
		};

		if settings.save_to_file && toggles.save_to_file {
			let trace = (settings.stack_trace.save_to_file && toggles.save_stack_trace)
				.then(backtrace::capture);
			self.submit(build_entry(
				&settings,
				severity,
				channel,
				Some(message),
				trace.as_deref(),
			));
		}

		if settings.console_allowed() && toggles.show_in_console {
			self.dispatcher()
				.emit(ConsoleMessage::new(severity, channel, message));
		}
	}

	/// Queue an entry built by this layer. Flush failures have no caller to
	/// return to, so they are reported and the entries stay queued.
	pub(crate) fn submit(&self, entry: LogEntry) {
		if let Err(e) = self.enqueue(entry) {
			error!(error = %e, "failed to flush log entries");
		}
	}
}

/// Lay out one event stamped with the local time, adding the calling
/// thread's identity when a stack trace is attached and thread info is on.
pub(crate) fn build_entry(
	settings: &Settings,
	severity: Severity,
	title: Option<&str>,
	message: Option<&str>,
	stack_trace: Option<&str>,
) -> LogEntry {
	let thread = settings.stack_trace.thread_info.then(CurrentThread::capture);

	let mut event = Event::new(Local::now().time(), severity);
	event.title = title;
	event.message = message;
	event.stack_trace = stack_trace;
	event.thread = thread.as_ref().map(CurrentThread::info);
	format_event(&event)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dispatch::ConsoleSink;
	use crate::settings::BufferSettings;
	use logbook_core::{LEFT_MARGIN, SEPARATOR};
	use parking_lot::Mutex;
	use std::fs;
	use std::sync::Arc;

	#[derive(Default)]
	struct Recorder {
		seen: Mutex<Vec<ConsoleMessage>>,
	}

	impl ConsoleSink for Recorder {
		fn emit(&self, message: &ConsoleMessage) {
			self.seen.lock().push(message.clone());
		}
	}

	fn unbuffered(dir: &std::path::Path) -> Settings {
		Settings {
			buffer: BufferSettings {
				enabled: false,
				..BufferSettings::default()
			},
			log_dir: Some(dir.to_path_buf()),
			..Settings::default()
		}
	}

	fn logbook(settings: Settings) -> (Logbook, Arc<Recorder>) {
		let recorder = Arc::new(Recorder::default());
		let logbook = Logbook::builder()
			.settings(settings)
			.console(recorder.clone())
			.init()
			.unwrap();
		(logbook, recorder)
	}

	fn file_lines(logbook: &Logbook) -> Vec<String> {
		fs::read_to_string(logbook.file_path().unwrap())
			.unwrap_or_default()
			.lines()
			.map(str::to_string)
			.collect()
	}

	#[test]
	fn test_info_persists_and_mirrors() {
		let dir = tempfile::tempdir().unwrap();
		let mut settings = unbuffered(dir.path());
		settings.info.save_stack_trace = false;
		let (logbook, recorder) = logbook(settings);

		logbook.info(Some("Network"), "connected");

		let lines = file_lines(&logbook);
		assert_eq!(lines.len(), 1);
		assert!(lines[0].contains("| Info       | Network"));
		assert!(lines[0].ends_with(" | connected"));

		let seen = recorder.seen.lock();
		assert_eq!(
			*seen,
			vec![ConsoleMessage::new(Severity::Info, Some("Network"), "connected")]
		);
	}

	#[test]
	fn test_stack_trace_follows_entry() {
		let dir = tempfile::tempdir().unwrap();
		let (logbook, _) = logbook(unbuffered(dir.path()));

		logbook.error(None, "boom");

		let lines = file_lines(&logbook);
		assert!(lines[0].contains("| Error      |"));
		assert!(lines[1].contains("[Thread ID | "));
		let closing = format!("{}{}", " ".repeat(LEFT_MARGIN), SEPARATOR);
		assert_eq!(lines.last().unwrap(), &closing);
	}

	#[test]
	fn test_channel_toggles() {
		let dir = tempfile::tempdir().unwrap();
		let mut settings = unbuffered(dir.path());
		settings.warning.save_to_file = false;
		settings.log.show_in_console = false;
		settings.log.save_stack_trace = false;
		let (logbook, recorder) = logbook(settings);

		logbook.warning(None, "console only");
		logbook.log(None, "file only");

		let lines = file_lines(&logbook);
		assert_eq!(lines.len(), 1);
		assert!(lines[0].ends_with("file only"));
		let seen = recorder.seen.lock();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].text, "console only");
	}

	#[test]
	fn test_release_build_is_silent_on_console() {
		let dir = tempfile::tempdir().unwrap();
		let mut settings = unbuffered(dir.path());
		settings.debug_build = false;
		let (logbook, recorder) = logbook(settings);

		logbook.info(None, "quiet");
		logbook.separator();

		assert!(recorder.seen.lock().is_empty());
	}

	#[test]
	fn test_separator_and_line() {
		let dir = tempfile::tempdir().unwrap();
		let (logbook, recorder) = logbook(unbuffered(dir.path()));

		logbook.separator();
		logbook.line(None, "aligned");

		let lines = file_lines(&logbook);
		assert_eq!(lines[0], RULE);
		assert_eq!(lines[1], format!("{}{}aligned", " ".repeat(LEFT_MARGIN), SEPARATOR));
		assert_eq!(recorder.seen.lock().len(), 2);
	}

	#[test]
	fn test_disabled_is_a_noop() {
		let dir = tempfile::tempdir().unwrap();
		let (logbook, recorder) = logbook(unbuffered(dir.path()));
		logbook.set_enabled(false);

		logbook.info(None, "ignored");
		logbook.separator();
		logbook.stack_trace();

		assert_eq!(logbook.pending_len(), 0);
		assert!(file_lines(&logbook).is_empty());
		assert!(recorder.seen.lock().is_empty());
	}

	#[test]
	fn test_explicit_stack_trace() {
		let dir = tempfile::tempdir().unwrap();
		let mut settings = unbuffered(dir.path());
		settings.stack_trace.show_in_console = true;
		let (logbook, recorder) = logbook(settings);

		logbook.stack_trace();

		let lines = file_lines(&logbook);
		assert!(lines[0].contains("| StackTrace |"));
		let seen = recorder.seen.lock();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0].severity, Severity::StackTrace);
	}
}
