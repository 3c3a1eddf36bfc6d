// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Buffered, thread-safe file logging with console mirroring on the main
//! thread.
//!
//! This crate provides:
//! - [`Logbook`] - the handle owning settings, intake queue, flush timer and lifecycle
//! - [`IntakeQueue`] / [`FlushEngine`] - the queue producers append to and its single drain
//! - [`Dispatcher`] - console output marshaled onto the main thread
//! - [`HostLayer`] - a tracing Layer recording the host's exceptions
//! - [`load_settings`] - layered settings from defaults, TOML and `LOGBOOK_*` env vars
//!
//! # Usage
//!
//! ```ignore
//! use logbook::{HostLayer, Logbook};
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! let logbook = Logbook::builder()
//!     .settings(logbook::load_settings(None)?)
//!     .init()?;
//! logbook.install_panic_hook();
//!
//! tracing_subscriber::registry()
//!     .with(HostLayer::new(logbook.clone()))
//!     .init();
//!
//! logbook.warning(Some("Renderer"), "frame took 40ms");
//!
//! // Once per iteration of the main loop
//! logbook.dispatcher().run_pending();
//!
//! logbook.shutdown()?;
//! ```

pub mod backtrace;
pub mod config;
mod convenience;
pub mod dispatch;
pub mod error;
pub mod flush;
pub mod global;
pub mod host;
pub mod lifecycle;
pub mod paths;
pub mod policy;
pub mod prune;
pub mod queue;
pub mod settings;
pub mod thread;
pub mod timer;

pub use config::{load_settings, ConfigRegistry, ConfigSource, Precedence, SettingsLayer};
pub use dispatch::{ConsoleMessage, ConsoleSink, Dispatcher, StderrConsole};
pub use error::{LogbookError, Result};
pub use flush::FlushEngine;
pub use host::{HostEvent, HostEventKind, HostLayer, HOST_TITLE};
pub use lifecycle::{LifecycleState, Logbook, LogbookBuilder};
pub use policy::FlushDecision;
pub use prune::prune_log_files;
pub use queue::{Batch, IntakeQueue};
pub use settings::{BufferSettings, ChannelSettings, Settings, StackTraceSettings};
pub use timer::FlushTimer;

pub use logbook_core::{LogEntry, Severity};

const NAME: &str = "logbook";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name and version of this facility, e.g. `logbook 0.1.0`.
pub fn information() -> String {
	format!("{NAME} {VERSION}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_information() {
		assert_eq!(information(), format!("logbook {}", env!("CARGO_PKG_VERSION")));
	}
}
