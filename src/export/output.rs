use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{ExportError, ExportPayload, Result};

/// Default root directory for written documents.
pub const DEFAULT_OUT_DIR: &str = "Material Outputs";

/// Reduce a requested output name to a bare file name, adding `.json` when it has no extension.
pub fn clean_output_filename(name: &str) -> Option<String> {
	let file_name = Path::new(name).file_name()?.to_string_lossy().into_owned();
	if Path::new(&file_name).extension().is_none() {
		return Some(format!("{file_name}.json"));
	}
	Some(file_name)
}

/// `<out_dir>/<blend stem>/<output name>`.
pub fn resolve_output_path(out_dir: &Path, blend_path: &Path, output: Option<&str>) -> PathBuf {
	let stem = blend_path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_else(|| "blend".to_owned());
	let name = output.and_then(clean_output_filename).unwrap_or_else(|| format!("{stem}.json"));
	out_dir.join(stem).join(name)
}

/// Create parent directories and write the pretty-printed document.
pub fn write_payload(path: &Path, payload: &ExportPayload) -> Result<()> {
	let text = serde_json::to_string_pretty(payload)?;
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
			path: parent.to_path_buf(),
			source,
		})?;
	}
	fs::write(path, text).map_err(|source| ExportError::Write {
		path: path.to_path_buf(),
		source,
	})
}
