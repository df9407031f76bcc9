use std::path::Path;

use chrono::{Local, SecondsFormat};
use rayon::prelude::*;

use crate::blend::{BlendContext, BlendFile};
use crate::export::material::build_material;
use crate::export::{Diagnostics, ExportPayload, Material, Result};

/// Version of the emitted document layout.
pub const SCHEMA_VERSION: &str = "3.0.0";

/// Knobs for one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
	/// Build materials on the rayon pool.
	pub parallel: bool,
	/// Fixed `exported_at` value instead of the current local time.
	pub exported_at: Option<String>,
}

/// Open `path` and build its payload.
pub fn export_file(path: &Path, options: &ExportOptions) -> Result<ExportPayload> {
	let file = BlendFile::open(path)?;
	tracing::debug!(path = %path.display(), compression = file.compression.as_str(), version = file.header.version, "opened blend file");
	let ctx = BlendContext::new(&file)?;
	build_export_payload(&ctx, path, options)
}

/// Build the payload for every `MA` record in storage order.
pub fn build_export_payload(ctx: &BlendContext<'_>, blend_path: &Path, options: &ExportOptions) -> Result<ExportPayload> {
	let scan = ctx.records_with_code(*b"MA")?;
	let records = scan.records;

	let built: Vec<(Material, Diagnostics)> = if options.parallel {
		records.par_iter().map(|record| build_one(ctx, record)).collect()
	} else {
		records.iter().map(|record| build_one(ctx, record)).collect()
	};

	let mut diagnostics = Diagnostics::new();
	for skipped in &scan.skipped {
		diagnostics.push(format!("Skipped unreadable material block at {:#x}: {}", skipped.addr, skipped.error));
	}
	let mut materials = Vec::with_capacity(built.len());
	for (material, local) in built {
		diagnostics.extend(local);
		materials.push(material);
	}
	tracing::info!(materials = materials.len(), warnings = diagnostics.len(), parallel = options.parallel, "built export payload");

	Ok(ExportPayload {
		schema_version: SCHEMA_VERSION.to_owned(),
		blender_version: ctx.version_string(),
		exported_at: options.exported_at.clone().unwrap_or_else(|| Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)),
		blend: blend_path.display().to_string(),
		warnings: diagnostics.into_vec(),
		materials,
	})
}

fn build_one(ctx: &BlendContext<'_>, record: &crate::blend::Record) -> (Material, Diagnostics) {
	let mut diagnostics = Diagnostics::new();
	let material = build_material(ctx, record, &mut diagnostics);
	(material, diagnostics)
}
