// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core text model for the logbook facility.
//!
//! This crate is pure: no shared state and no I/O. It provides:
//! - [`Severity`] - the category of an entry
//! - [`LogEntry`] - an ordered group of formatted lines produced by one event
//! - [`format_event`] - fixed-column layout of headers, thread info and stack traces
//! - [`stack_trace_lines`] / [`console_stack_trace_lines`] - frame filtering and reshaping
//! - [`decorate`] - console-only styling helpers
//!
//! # Layout
//!
//! ```text
//! 12:34:56.789 | Error      | Network                        | connection refused
//!                                                            |     [Thread ID | 0003: worker]
//!                                                            |     app::net::connect
//!                                                            |     src/net.rs:42:9
//!                                                            |
//! ```

pub mod decorate;
pub mod entry;
pub mod layout;
pub mod severity;
pub mod stack;

pub use entry::LogEntry;
pub use layout::{
	fit, format_event, format_separator, thread_info_line, Event, ThreadInfo, BOLD_RULE,
	FILE_NAME_FORMAT, FULL_TIME_FORMAT, LEFT_MARGIN, MISSING_MESSAGE, RULE, SEPARATOR,
	SEPARATOR_WIDTH, SEVERITY_WIDTH, STACK_MARGIN, TIME_FORMAT, TIME_WIDTH, TITLE_WIDTH,
};
pub use severity::Severity;
pub use stack::{
	console_stack_trace_lines, format_stack_trace, is_denied_frame, split_frame,
	stack_trace_lines, StackTraceLines, FRAME_DENYLIST,
};
