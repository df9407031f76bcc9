//! Serialized shape of the exported document.
//!
//! Field order here is the key order in the emitted JSON.

use std::collections::BTreeMap;

use serde::Serialize;

/// Root document for one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPayload {
	/// Document schema version; bumped on any key change.
	pub schema_version: String,
	/// Version of the Blender build that saved the source file.
	pub blender_version: String,
	/// Local time of the run, RFC 3339 with seconds precision.
	pub exported_at: String,
	/// Source path as given.
	pub blend: String,
	/// Recoverable problems in file order.
	pub warnings: Vec<String>,
	/// Materials in file storage order.
	pub materials: Vec<Material>,
}

/// One `MA` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
	/// Name without ID prefix.
	pub name: String,
	/// Whether a node tree was resolved.
	pub has_node_graph: bool,
	/// Node tree name when resolved.
	pub node_graph_name: Option<String>,
	/// Viewport/render settings.
	pub render_settings: RenderSettings,
	/// Node tree snapshot.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub node_graph: Option<NodeTree>,
}

/// Material settings that need explicit mapping downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSettings {
	/// Decoded `blend_method`, null when the field is absent.
	pub blend_method: Option<String>,
	/// `alpha_threshold`, null when absent.
	pub alpha_threshold: Option<f64>,
	/// Backface culling bit of `blend_flag`.
	pub use_backface_culling: bool,
}

/// One shader node tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeTree {
	/// Name without ID prefix.
	pub name: String,
	/// Two-letter ID code of the tree.
	pub kind_code: String,
	/// Links in stored order.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub links: Vec<Link>,
	/// Nodes in stored order.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub nodes: Vec<Node>,
	/// Nodes glTF would drop.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub flagged_nodes: Vec<FlaggedNode>,
	/// Selected material output.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active_output: Option<ActiveOutput>,
	/// Active-output inputs keyed by lower-cased identifier.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub output_targets: BTreeMap<String, OutputTarget>,
}

/// Node whose behavior glTF cannot carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedNode {
	/// Node address.
	pub ptr: u64,
	/// Node type id.
	pub type_name: String,
	/// Node name.
	pub ui_name: String,
	/// Human label such as `Color Ramp`.
	pub kind: String,
}

/// One graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
	/// Stored address; stable only within one run.
	pub ptr: u64,
	/// Node type id such as `ShaderNodeValToRGB`.
	pub type_name: String,
	/// Unique node name within the tree.
	pub ui_name: String,
	/// User label, often empty.
	pub label: String,
	/// Legacy integer node type.
	pub type_code: Option<i64>,
	/// `[x, y]` of the top-left corner.
	pub position: [f64; 2],
	/// `[width, height]`.
	pub size: [f64; 2],
	/// Mute bit of the node flag.
	pub muted: bool,
	/// Input sockets in stored order.
	pub inputs: Vec<Socket>,
	/// Output sockets in stored order.
	pub outputs: Vec<Socket>,
	/// ID the node points at.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub referenced_asset: Option<IdRef>,
	/// Image metadata when the asset is an image.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<ImageInfo>,
	/// Type-specific settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub type_properties: Option<TypeProperties>,
}

/// ID reference: two-letter code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRef {
	/// Two-letter ID code (`IM`, `NT`, ...).
	pub code: String,
	/// Name without the code prefix.
	pub name: String,
}

/// Image asset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
	/// Stored file path, else the image name.
	pub filepath: String,
	/// Whether pixel data is packed into the file.
	pub is_packed: bool,
	/// Color space name.
	pub colorspace: Option<String>,
}

/// Settings only some node types carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeProperties {
	/// Toon BSDF component.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub component: Option<String>,
	/// Mix blend mode.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub blend_type: Option<String>,
	/// Mix result clamping.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub use_clamp: Option<bool>,
	/// Legacy mix alpha usage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub use_alpha: Option<bool>,
	/// Color ramp settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ramp_settings: Option<GradientRamp>,
}

impl TypeProperties {
	/// Whether no setting was decoded.
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

/// Color ramp settings and stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientRamp {
	/// Color interpolation.
	pub interpolation: String,
	/// Color space of interpolation.
	pub color_mode: String,
	/// Hue direction for HSV/HSL modes.
	pub hue_interpolation: String,
	/// Stops in stored order.
	pub stops: Vec<RampStop>,
}

/// One color ramp stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RampStop {
	/// Stop position in `0..=1`.
	pub position: f64,
	/// Stop color.
	pub rgba: [f64; 4],
}

/// Socket direction: a known name or the raw stored code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Direction {
	/// `INPUT` or `OUTPUT`.
	Named(&'static str),
	/// Unmapped code.
	Raw(i64),
}

/// One node socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Socket {
	/// Socket address.
	pub ptr: u64,
	/// Display name.
	pub name: String,
	/// Stable identifier.
	pub identifier: String,
	/// Socket data type code.
	pub type_code: Option<i64>,
	/// Property subtype name.
	pub subtype: String,
	/// Input or output.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub direction: Option<Direction>,
	/// Whether any link touches the socket.
	pub is_linked: bool,
	/// Number of links touching the socket.
	pub link_count: u32,
	/// Unlinked value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_value: Option<serde_json::Value>,
	/// Hard minimum.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<serde_json::Value>,
	/// Hard maximum.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<serde_json::Value>,
	/// UI minimum.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub soft_min: Option<serde_json::Value>,
	/// UI maximum.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub soft_max: Option<serde_json::Value>,
}

/// One link between two sockets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
	/// Link address.
	pub ptr: u64,
	/// Upstream node.
	pub from_node: Option<NodeRef>,
	/// Upstream socket.
	pub from_socket: Option<SocketRef>,
	/// Downstream node.
	pub to_node: Option<NodeRef>,
	/// Downstream socket.
	pub to_socket: Option<SocketRef>,
	/// Raw link flag.
	pub flag: Option<i64>,
}

/// Link endpoint node summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
	/// Node address.
	pub ptr: u64,
	/// Node name.
	pub ui_name: String,
	/// Node type id.
	pub type_name: String,
	/// Legacy integer node type.
	pub type_code: Option<i64>,
}

/// Link endpoint socket summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocketRef {
	/// Socket address.
	pub ptr: u64,
	/// Display name.
	pub name: String,
	/// Stable identifier.
	pub identifier: String,
	/// Input or output.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub direction: Option<Direction>,
	/// Socket data type code.
	pub type_code: Option<i64>,
}

/// The material output node that drives rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveOutput {
	/// Address of the selected node.
	pub node_ptr: u64,
	/// Identifier of the surface input.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surface_socket_identifier: Option<String>,
	/// Identifier of the volume input.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub volume_socket_identifier: Option<String>,
	/// Identifier of the displacement input.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub displacement_socket_identifier: Option<String>,
}

/// Upstream source of one active-output input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTarget {
	/// Upstream node address.
	pub from_node_ptr: Option<u64>,
	/// Upstream socket identifier.
	pub from_socket_identifier: Option<String>,
}
