mod diag;
pub mod enums;
mod error;
mod links;
mod material;
mod model;
mod node;
mod output;
mod payload;
mod reference;
mod socket;
mod tree;

/// Append-only diagnostics sink.
pub use diag::Diagnostics;
/// Fatal error and result aliases.
pub use error::{ExportError, Result};
/// Link collection and per-socket aggregates.
pub use links::{LinkTopology, collect_links};
/// Material entry builders.
pub use material::{MA_BL_CULL_BACKFACE, build_material, render_settings};
/// Serialized document types.
pub use model::{
	ActiveOutput, Direction, ExportPayload, FlaggedNode, GradientRamp, IdRef, ImageInfo, Link, Material, Node, NodeRef, NodeTree, OutputTarget, RampStop,
	RenderSettings, Socket, SocketRef, TypeProperties,
};
/// Node decoding entry points and constants.
pub use node::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, DecodedNode, NODE_DO_OUTPUT, NODE_MUTED, decode_node, decode_ramp};
/// Output location and writing helpers.
pub use output::{DEFAULT_OUT_DIR, clean_output_filename, resolve_output_path, write_payload};
/// Top-level payload construction.
pub use payload::{ExportOptions, SCHEMA_VERSION, build_export_payload, export_file};
/// ID reference resolution.
pub use reference::{display_name, id_ref, resolve_ref, strip_id_code};
/// Socket decoding.
pub use socket::{decode_socket, subtype_name};
/// Node tree assembly and active-output selection.
pub use tree::{MATERIAL_OUTPUT, build_node_tree, flagged_kind, output_targets, select_active_output};
