use std::path::PathBuf;

use thiserror::Error;

use crate::blend::BlendError;

/// Result alias for fatal export failures.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Failures that abort an export run before anything is written.
#[derive(Debug, Error)]
pub enum ExportError {
	/// Source file could not be opened or parsed.
	#[error(transparent)]
	Blend(#[from] BlendError),
	/// Output directory could not be created.
	#[error("cannot create output directory {path}: {source}")]
	CreateDir {
		/// Directory that was requested.
		path: PathBuf,
		/// Underlying IO failure.
		source: std::io::Error,
	},
	/// Output document could not be written.
	#[error("cannot write {path}: {source}")]
	Write {
		/// File that was requested.
		path: PathBuf,
		/// Underlying IO failure.
		source: std::io::Error,
	},
	/// Payload could not be serialized.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
}
