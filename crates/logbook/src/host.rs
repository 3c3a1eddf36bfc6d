// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Events reported by the host environment.
//!
//! Only exceptions are written to the file; everything else the host reports
//! is either already logged through this facility or console noise. Two
//! producers feed [`Logbook::on_host_event`]: [`HostLayer`], a tracing layer
//! for the host's own diagnostics, and the panic hook.

use std::fmt;
use std::panic;

use logbook_core::Severity;
use tracing::field::{Field, Visit};
use tracing::{info, Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::backtrace;
use crate::convenience::build_entry;
use crate::lifecycle::Logbook;

/// Title of entries recorded from host exceptions.
pub const HOST_TITLE: &str = "Host Runtime";

/// Field marking a tracing event as an exception.
pub const EXCEPTION_FIELD: &str = "exception";

/// Field carrying a pre-rendered stack trace on a tracing event.
pub const STACK_TRACE_FIELD: &str = "stack_trace";

/// Targets this facility reports its own diagnostics under.
const OWN_TARGETS: &[&str] = &["logbook", "logbook_core"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEventKind {
	Error,
	Assert,
	Warning,
	Log,
	Exception,
}

/// One event from the host, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
	pub kind: HostEventKind,
	pub condition: Option<String>,
	pub stack_trace: Option<String>,
}

impl Logbook {
	/// Record a host event. Only exceptions are persisted, titled
	/// [`HOST_TITLE`], with the host's stack trace attached when
	/// `stack_trace.from_host` and `stack_trace.save_to_file` are both on.
	pub fn on_host_event(&self, kind: HostEventKind, condition: Option<&str>, stack_trace: Option<&str>) {
		if kind != HostEventKind::Exception || !self.is_enabled() {
			return;
		}
		let settings = self.settings();
		if !settings.save_to_file {
			return;
		}

		let trace = stack_trace.filter(|_| settings.stack_trace.from_host && settings.stack_trace.save_to_file);
		self.submit(build_entry(
			&settings,
			Severity::Exception,
			Some(HOST_TITLE),
			condition,
			trace,
		));
	}

	pub fn record_host_event(&self, event: &HostEvent) {
		self.on_host_event(event.kind, event.condition.as_deref(), event.stack_trace.as_deref());
	}

	/// Record panics as host exceptions and flush before the previous hook
	/// runs.
	pub fn install_panic_hook(&self) {
		let logbook = self.clone();
		let previous = panic::take_hook();
		panic::set_hook(Box::new(move |panic_info| {
			let payload = panic_info.payload();
			let message = payload
				.downcast_ref::<&str>()
				.map(|s| s.to_string())
				.or_else(|| payload.downcast_ref::<String>().cloned())
				.unwrap_or_else(|| "Unknown panic".to_string());
			let condition = match panic_info.location() {
				Some(location) => format!("panicked at {location}:\n{message}"),
				None => format!("panicked:\n{message}"),
			};

			let trace = backtrace::capture();
			logbook.on_host_event(HostEventKind::Exception, Some(&condition), Some(&trace));
			let _ = logbook.force_flush();

			previous(panic_info);
		}));
		info!("panic hook installed");
	}
}

/// Tracing layer that forwards the host's events to a [`Logbook`].
///
/// Events with an `exception` field become exceptions; a `stack_trace`
/// field is used as their trace, otherwise one is captured on the spot.
/// Events from this facility's own targets are skipped.
#[derive(Clone)]
pub struct HostLayer {
	logbook: Logbook,
}

impl HostLayer {
	pub fn new(logbook: Logbook) -> Self {
		Self { logbook }
	}
}

fn is_own_target(target: &str) -> bool {
	OWN_TARGETS.iter().any(|own| {
		target
			.strip_prefix(own)
			.is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
	})
}

impl<S> Layer<S> for HostLayer
where
	S: Subscriber,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();
		if is_own_target(metadata.target()) {
			return;
		}

		let mut visitor = HostEventVisitor::default();
		event.record(&mut visitor);

		let kind = if visitor.exception.is_some() {
			HostEventKind::Exception
		} else {
			match *metadata.level() {
				Level::ERROR => HostEventKind::Error,
				Level::WARN => HostEventKind::Warning,
				_ => HostEventKind::Log,
			}
		};

		let condition = match (visitor.message, visitor.exception) {
			(Some(message), Some(exception)) => format!("{message}\n{exception}"),
			(Some(text), None) | (None, Some(text)) => text,
			(None, None) => String::new(),
		};
		let stack_trace = visitor.stack_trace.or_else(|| {
			(kind == HostEventKind::Exception && self.logbook.settings().stack_trace.from_host)
				.then(backtrace::capture)
		});

		self.logbook.record_host_event(&HostEvent {
			kind,
			condition: Some(condition),
			stack_trace,
		});
	}
}

#[derive(Default)]
struct HostEventVisitor {
	message: Option<String>,
	exception: Option<String>,
	stack_trace: Option<String>,
}

impl HostEventVisitor {
	fn record(&mut self, field: &Field, value: String) {
		match field.name() {
			"message" => self.message = Some(value),
			EXCEPTION_FIELD => self.exception = Some(value),
			STACK_TRACE_FIELD => self.stack_trace = Some(value),
			_ => {}
		}
	}
}

impl Visit for HostEventVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		self.record(field, format!("{value:?}"));
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		self.record(field, value.to_string());
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		self.record(field, value.to_string());
	}
}
