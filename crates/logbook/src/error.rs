// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the logbook pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for logbook operations.
pub type Result<T> = std::result::Result<T, LogbookError>;

/// Errors that can occur while configuring or flushing the logbook.
#[derive(Debug, Error)]
pub enum LogbookError {
	/// Appending a batch to the log file failed. The batch was re-queued.
	#[error("failed to append to {path}: {source}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The log directory could not be created.
	#[error("failed to create log directory {path}: {source}")]
	CreateDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The log directory could not be listed while pruning.
	#[error("failed to list log directory {path}: {source}")]
	Prune {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A config file exists but could not be read.
	#[error("failed to read config file {path}: {source}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error.
	#[error("TOML parse error in {path}: {source}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Invalid value in a config file or environment variable.
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	/// No platform data directory to place log files in.
	#[error("could not determine a directory for log files")]
	StorageDirNotFound,

	/// The flush timer thread could not be started.
	#[error("failed to spawn flush timer thread: {0}")]
	Spawn(#[source] std::io::Error),

	/// The logbook has been shut down.
	#[error("logbook has been shut down")]
	ShutDown,
}

impl LogbookError {
	/// Create an invalid value error
	pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}

	/// Whether the error came from disk I/O on the log file or directory.
	pub fn is_io(&self) -> bool {
		matches!(
			self,
			LogbookError::Write { .. } | LogbookError::CreateDir { .. } | LogbookError::Prune { .. }
		)
	}
}
