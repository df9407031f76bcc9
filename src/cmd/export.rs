use std::path::PathBuf;

use blendmat::export::{DEFAULT_OUT_DIR, ExportOptions, export_file, resolve_output_path, write_payload};

#[derive(clap::Args)]
pub struct Args {
	/// Source .blend file.
	pub blend: PathBuf,
	/// Output file name; directories are dropped and `.json` is added when missing.
	pub output: Option<String>,
	/// Root directory; the document lands in `<out-dir>/<blend stem>/`.
	#[arg(long = "out-dir", env = "BLENDMAT_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
	pub out_dir: PathBuf,
	/// Build materials in parallel.
	#[arg(long)]
	pub parallel: bool,
}

/// Extract materials from one file and write the JSON snapshot.
pub fn run(args: Args) -> blendmat::export::Result<()> {
	let Args {
		blend,
		output,
		out_dir,
		parallel,
	} = args;

	let options = ExportOptions {
		parallel,
		..ExportOptions::default()
	};
	let payload = export_file(&blend, &options)?;

	let out_path = resolve_output_path(&out_dir, &blend, output.as_deref());
	write_payload(&out_path, &payload)?;
	println!("Wrote {}", out_path.display());
	Ok(())
}
