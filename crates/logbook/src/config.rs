// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered settings: built-in defaults, a TOML file, then `LOGBOOK_*`
//! environment variables.
//!
//! ```toml
//! debug_build = true
//! save_to_file = true
//!
//! [buffer]
//! enabled = true
//! size = 64
//! interval_ms = 5000
//!
//! [files]
//! max_count = 10
//! directory = "/var/log/myapp"
//!
//! [stack_trace]
//! thread_info = false
//!
//! [warning]
//! save_stack_trace = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{LogbookError, Result};
use crate::settings::{ChannelSettings, Settings};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for settings sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SettingsLayer>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BufferLayer {
	pub enabled: Option<bool>,
	pub size: Option<usize>,
	pub interval_ms: Option<u64>,
}

impl BufferLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.size.is_some() {
			self.size = other.size;
		}
		if other.interval_ms.is_some() {
			self.interval_ms = other.interval_ms;
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilesLayer {
	pub max_count: Option<usize>,
	pub directory: Option<PathBuf>,
}

impl FilesLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_count.is_some() {
			self.max_count = other.max_count;
		}
		if other.directory.is_some() {
			self.directory = other.directory;
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StackTraceLayer {
	pub from_host: Option<bool>,
	pub save_to_file: Option<bool>,
	pub thread_info: Option<bool>,
	pub show_in_console: Option<bool>,
}

impl StackTraceLayer {
	pub fn merge(&mut self, other: Self) {
		if other.from_host.is_some() {
			self.from_host = other.from_host;
		}
		if other.save_to_file.is_some() {
			self.save_to_file = other.save_to_file;
		}
		if other.thread_info.is_some() {
			self.thread_info = other.thread_info;
		}
		if other.show_in_console.is_some() {
			self.show_in_console = other.show_in_console;
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelLayer {
	pub show_in_console: Option<bool>,
	pub save_to_file: Option<bool>,
	pub save_stack_trace: Option<bool>,
}

impl ChannelLayer {
	pub fn merge(&mut self, other: Self) {
		if other.show_in_console.is_some() {
			self.show_in_console = other.show_in_console;
		}
		if other.save_to_file.is_some() {
			self.save_to_file = other.save_to_file;
		}
		if other.save_stack_trace.is_some() {
			self.save_stack_trace = other.save_stack_trace;
		}
	}

	fn finalize(self, defaults: ChannelSettings) -> ChannelSettings {
		ChannelSettings {
			show_in_console: self.show_in_console.unwrap_or(defaults.show_in_console),
			save_to_file: self.save_to_file.unwrap_or(defaults.save_to_file),
			save_stack_trace: self.save_stack_trace.unwrap_or(defaults.save_stack_trace),
		}
	}
}

/// Partial settings from one source. Unset fields fall through to lower
/// precedence sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsLayer {
	pub debug_build: Option<bool>,
	pub show_in_console: Option<bool>,
	pub save_to_file: Option<bool>,
	pub buffer: BufferLayer,
	pub files: FilesLayer,
	pub stack_trace: StackTraceLayer,
	pub line: ChannelLayer,
	pub log: ChannelLayer,
	pub info: ChannelLayer,
	pub warning: ChannelLayer,
	pub error: ChannelLayer,
}

impl SettingsLayer {
	pub fn merge(&mut self, other: Self) {
		if other.debug_build.is_some() {
			self.debug_build = other.debug_build;
		}
		if other.show_in_console.is_some() {
			self.show_in_console = other.show_in_console;
		}
		if other.save_to_file.is_some() {
			self.save_to_file = other.save_to_file;
		}
		self.buffer.merge(other.buffer);
		self.files.merge(other.files);
		self.stack_trace.merge(other.stack_trace);
		self.line.merge(other.line);
		self.log.merge(other.log);
		self.info.merge(other.info);
		self.warning.merge(other.warning);
		self.error.merge(other.error);
	}

	/// Fill gaps from [`Settings::default`] and clamp out-of-range values.
	pub fn finalize(self) -> Settings {
		let defaults = Settings::default();
		Settings {
			buffer: crate::settings::BufferSettings {
				enabled: self.buffer.enabled.unwrap_or(defaults.buffer.enabled),
				size: self.buffer.size.unwrap_or(defaults.buffer.size),
				interval_ms: self.buffer.interval_ms.unwrap_or(defaults.buffer.interval_ms),
			},
			max_file_count: self.files.max_count.unwrap_or(defaults.max_file_count),
			log_dir: self.files.directory.or(defaults.log_dir),
			debug_build: self.debug_build.unwrap_or(defaults.debug_build),
			show_in_console: self.show_in_console.unwrap_or(defaults.show_in_console),
			save_to_file: self.save_to_file.unwrap_or(defaults.save_to_file),
			stack_trace: crate::settings::StackTraceSettings {
				from_host: self
					.stack_trace
					.from_host
					.unwrap_or(defaults.stack_trace.from_host),
				save_to_file: self
					.stack_trace
					.save_to_file
					.unwrap_or(defaults.stack_trace.save_to_file),
				thread_info: self
					.stack_trace
					.thread_info
					.unwrap_or(defaults.stack_trace.thread_info),
				show_in_console: self
					.stack_trace
					.show_in_console
					.unwrap_or(defaults.stack_trace.show_in_console),
			},
			line: self.line.finalize(defaults.line),
			log: self.log.finalize(defaults.log),
			info: self.info.finalize(defaults.info),
			warning: self.warning.finalize(defaults.warning),
			error: self.error.finalize(defaults.error),
		}
		.normalized()
	}
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SettingsLayer> {
		debug!("loading defaults");
		Ok(SettingsLayer::default())
	}
}

/// TOML file settings source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// `<config dir>/logbook/logbook.toml`
	pub fn user() -> Option<Self> {
		dirs::config_dir().map(|dir| Self::new(dir.join("logbook").join("logbook.toml")))
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SettingsLayer> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SettingsLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content =
			std::fs::read_to_string(&self.path).map_err(|e| LogbookError::ConfigRead {
				path: self.path.clone(),
				source: e,
			})?;

		let layer: SettingsLayer =
			toml::from_str(&content).map_err(|e| LogbookError::ConfigParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed settings layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LOGBOOK_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SettingsLayer> {
		debug!("loading environment variables");
		layer_from_env(|name| std::env::var(name).ok())
	}
}

/// Build a layer from `LOGBOOK_*` variables resolved through `lookup`.
pub fn layer_from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<SettingsLayer> {
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());
	let flag = |name: &str| var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1");

	Ok(SettingsLayer {
		debug_build: flag("LOGBOOK_DEBUG_BUILD"),
		show_in_console: flag("LOGBOOK_SHOW_IN_CONSOLE"),
		save_to_file: flag("LOGBOOK_SAVE_TO_FILE"),
		buffer: BufferLayer {
			enabled: flag("LOGBOOK_BUFFER_ENABLED"),
			size: parse_number("LOGBOOK_BUFFER_SIZE", var("LOGBOOK_BUFFER_SIZE"))?,
			interval_ms: parse_number(
				"LOGBOOK_BUFFER_INTERVAL_MS",
				var("LOGBOOK_BUFFER_INTERVAL_MS"),
			)?,
		},
		files: FilesLayer {
			max_count: parse_number("LOGBOOK_MAX_FILE_COUNT", var("LOGBOOK_MAX_FILE_COUNT"))?,
			directory: var("LOGBOOK_LOG_DIR").map(PathBuf::from),
		},
		stack_trace: StackTraceLayer {
			from_host: flag("LOGBOOK_STACK_TRACE_FROM_HOST"),
			save_to_file: flag("LOGBOOK_STACK_TRACE_SAVE_TO_FILE"),
			thread_info: flag("LOGBOOK_STACK_TRACE_THREAD_INFO"),
			show_in_console: flag("LOGBOOK_STACK_TRACE_SHOW_IN_CONSOLE"),
		},
		..SettingsLayer::default()
	})
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
	match value {
		Some(v) => v.parse().map(Some).map_err(|_| {
			LogbookError::invalid_value(key, format!("invalid {} value '{v}'", std::any::type_name::<T>()))
		}),
		None => Ok(None),
	}
}

/// Holds sources and merges them in precedence order.
#[derive(Default)]
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		self.sources.push(source);
	}

	pub fn load(mut self) -> Result<Settings> {
		self.sources.sort_by_key(|s| s.precedence());

		let mut merged = SettingsLayer::default();
		for source in &self.sources {
			trace!(source = source.name(), "merging settings source");
			merged.merge(source.load()?);
		}
		Ok(merged.finalize())
	}
}

/// Load settings from defaults, `path` (or the user config file when
/// `None`), and the environment.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
	let mut registry = ConfigRegistry::new();
	registry.register(Box::new(DefaultsSource));
	match path {
		Some(path) => registry.register(Box::new(TomlSource::new(path))),
		None => {
			if let Some(user) = TomlSource::user() {
				registry.register(Box::new(user));
			}
		}
	}
	registry.register(Box::new(EnvSource));
	registry.load()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_empty_layer_finalizes_to_defaults() {
		assert_eq!(SettingsLayer::default().finalize(), Settings::default());
	}

	#[test]
	fn test_toml_layer_parses_sections() {
		let layer: SettingsLayer = toml::from_str(
			r#"
save_to_file = false

[buffer]
size = 3
interval_ms = 250

[files]
max_count = 500
directory = "/tmp/logs"

[warning]
save_stack_trace = false
"#,
		)
		.unwrap();

		let settings = layer.finalize();
		assert!(!settings.save_to_file);
		assert_eq!(settings.buffer.size, 3);
		assert_eq!(settings.buffer.interval_ms, 250);
		assert_eq!(settings.max_file_count, 100);
		assert_eq!(settings.log_dir, Some(PathBuf::from("/tmp/logs")));
		assert!(!settings.warning.save_stack_trace);
		assert!(settings.error.save_stack_trace);
	}

	#[test]
	fn test_zero_thresholds_are_raised() {
		let layer = SettingsLayer {
			buffer: BufferLayer {
				size: Some(0),
				interval_ms: Some(0),
				..BufferLayer::default()
			},
			..SettingsLayer::default()
		};
		let settings = layer.finalize();
		assert_eq!(settings.buffer.size, 1);
		assert_eq!(settings.buffer.interval_ms, 1);
	}

	#[test]
	fn test_env_layer() {
		let layer = layer_from_env(lookup(&[
			("LOGBOOK_BUFFER_ENABLED", "false"),
			("LOGBOOK_BUFFER_SIZE", "12"),
			("LOGBOOK_MAX_FILE_COUNT", "3"),
			("LOGBOOK_SAVE_TO_FILE", "1"),
			("LOGBOOK_LOG_DIR", ""),
		]))
		.unwrap();

		assert_eq!(layer.buffer.enabled, Some(false));
		assert_eq!(layer.buffer.size, Some(12));
		assert_eq!(layer.files.max_count, Some(3));
		assert_eq!(layer.save_to_file, Some(true));
		assert_eq!(layer.files.directory, None);
	}

	#[test]
	fn test_env_layer_rejects_bad_numbers() {
		let result = layer_from_env(lookup(&[("LOGBOOK_BUFFER_SIZE", "lots")]));
		assert!(matches!(result, Err(LogbookError::InvalidValue { key, .. }) if key == "LOGBOOK_BUFFER_SIZE"));
	}

	#[test]
	fn test_merge_prefers_higher_layer() {
		let mut base: SettingsLayer = toml::from_str("[buffer]\nsize = 10\nenabled = true").unwrap();
		base.merge(SettingsLayer {
			buffer: BufferLayer {
				size: Some(20),
				..BufferLayer::default()
			},
			..SettingsLayer::default()
		});
		assert_eq!(base.buffer.size, Some(20));
		assert_eq!(base.buffer.enabled, Some(true));
	}

	#[test]
	fn test_toml_source_missing_file_is_empty() {
		let dir = tempfile::tempdir().unwrap();
		let source = TomlSource::new(dir.path().join("absent.toml"));
		assert_eq!(source.load().unwrap(), SettingsLayer::default());
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("logbook.toml");
		std::fs::write(&path, "[buffer\nsize = ").unwrap();

		let result = TomlSource::new(&path).load();
		assert!(matches!(result, Err(LogbookError::ConfigParse { .. })));
	}

	#[test]
	fn test_registry_orders_by_precedence() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("logbook.toml");
		std::fs::write(&path, "[files]\nmax_count = 4\n").unwrap();

		let mut registry = ConfigRegistry::new();
		registry.register(Box::new(TomlSource::new(&path)));
		registry.register(Box::new(DefaultsSource));

		let settings = registry.load().unwrap();
		assert_eq!(settings.max_file_count, 4);
	}
}
