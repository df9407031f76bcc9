#![allow(missing_docs)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "blendmat", about = "Snapshot Blender materials and shader node graphs as JSON")]
struct Cli {
	#[command(flatten)]
	export: cmd::export::Args,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> blendmat::export::Result<()> {
	let cli = Cli::parse();
	cmd::export::run(cli.export)
}
