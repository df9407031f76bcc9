//! Synthetic `.blend` writer for tests.
//!
//! Builds small but structurally real files: a header, addressed blocks
//! encoded against an SDNA schema, a `DNA1` block, and `ENDB`. The schema
//! defaults to a trimmed Blender 4.2 layout and individual structs can be
//! redefined to mimic other versions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Byte order of the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
	/// `v` marker.
	Little,
	/// `V` marker.
	Big,
}

/// Header flavor of the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
	/// 12-byte `BLENDER-v402` style header.
	Legacy {
		/// 4 or 8.
		pointer_size: usize,
	},
	/// 17-byte `BLENDER17-01v0500` header with 64-bit pointers.
	V1,
}

/// Value assigned to one field of a struct instance.
///
/// Fields not assigned are written as zeros; assignments to fields the
/// schema does not declare are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
	/// Integer of the field's declared width.
	Int(i64),
	/// `float`.
	Float(f32),
	/// `float[N]`, zero-filled past the given values.
	Floats(Vec<f32>),
	/// Pointer.
	Ptr(u64),
	/// `char[N]`, NUL-terminated.
	Str(String),
	/// Inline struct.
	Struct(Fields),
	/// Inline struct array, zero-filled past the given elements.
	Structs(Vec<Fields>),
}

/// Field assignments for one struct instance.
pub type Fields = Vec<(&'static str, Field)>;

/// Shorthand for [`Field::Str`].
pub fn text(value: &str) -> Field {
	Field::Str(value.to_owned())
}

const PRIMITIVES: &[(&str, usize)] = &[
	("char", 1),
	("uchar", 1),
	("short", 2),
	("ushort", 2),
	("int", 4),
	("float", 4),
	("double", 8),
	("int64_t", 8),
	("uint64_t", 8),
	("void", 0),
];

const DEFAULT_SCHEMA: &[(&str, &[(&str, &str)])] = &[
	("ID", &[("void", "*next"), ("void", "*prev"), ("char", "name[66]"), ("short", "flag"), ("int", "tag")]),
	("ListBase", &[("void", "*first"), ("void", "*last")]),
	(
		"Material",
		&[
			("ID", "id"),
			("char", "blend_method"),
			("char", "blend_flag"),
			("char", "_pad[2]"),
			("float", "alpha_threshold"),
			("bNodeTree", "*nodetree"),
		],
	),
	("bNodeTree", &[("ID", "id"), ("ListBase", "nodes"), ("ListBase", "links"), ("int", "type"), ("char", "idname[64]")]),
	(
		"bNode",
		&[
			("bNode", "*next"),
			("bNode", "*prev"),
			("ListBase", "inputs"),
			("ListBase", "outputs"),
			("char", "name[64]"),
			("char", "label[64]"),
			("char", "idname[64]"),
			("ID", "*id"),
			("void", "*storage"),
			("short", "type"),
			("short", "custom1"),
			("short", "custom2"),
			("char", "_pad[2]"),
			("int", "flag"),
			("float", "locx"),
			("float", "locy"),
			("float", "width"),
			("float", "height"),
		],
	),
	(
		"bNodeSocket",
		&[
			("bNodeSocket", "*next"),
			("bNodeSocket", "*prev"),
			("void", "*default_value"),
			("char", "name[64]"),
			("char", "identifier[64]"),
			("short", "type"),
			("short", "in_out"),
			("int", "flag"),
		],
	),
	(
		"bNodeLink",
		&[
			("bNodeLink", "*next"),
			("bNodeLink", "*prev"),
			("bNode", "*fromnode"),
			("bNode", "*tonode"),
			("bNodeSocket", "*fromsock"),
			("bNodeSocket", "*tosock"),
			("int", "flag"),
		],
	),
	("bNodeSocketValueFloat", &[("int", "subtype"), ("float", "value"), ("float", "min"), ("float", "max")]),
	("bNodeSocketValueVector", &[("int", "subtype"), ("float", "value[3]"), ("float", "min"), ("float", "max")]),
	("bNodeSocketValueRGBA", &[("float", "value[4]")]),
	("CBData", &[("float", "r"), ("float", "g"), ("float", "b"), ("float", "a"), ("float", "pos"), ("int", "cur")]),
	(
		"ColorBand",
		&[
			("short", "tot"),
			("short", "cur"),
			("char", "ipotype"),
			("char", "ipotype_hue"),
			("char", "color_mode"),
			("char", "_pad[1]"),
			("CBData", "data[32]"),
		],
	),
	(
		"NodeShaderMix",
		&[
			("char", "data_type"),
			("char", "factor_mode"),
			("char", "clamp_factor"),
			("char", "clamp_result"),
			("char", "blend_type"),
			("char", "_pad[3]"),
		],
	),
	("ColorManagedColorspaceSettings", &[("char", "name[64]")]),
	(
		"Image",
		&[
			("ID", "id"),
			("char", "filepath[1024]"),
			("PackedFile", "*packedfile"),
			("ListBase", "packedfiles"),
			("ColorManagedColorspaceSettings", "colorspace_settings"),
		],
	),
	("FileGlobal", &[("char", "subvstr[4]"), ("short", "subversion"), ("short", "minversion")]),
];

const FIRST_ADDR: u64 = 0x0010_0000;
const PACKED_DATA_ADDR: u64 = 0x00FF_0000;
const ADDR_STRIDE: u64 = 0x0001_0000;

/// Node type ids used across tests.
pub mod idname {
	/// Material output.
	pub const OUTPUT_MATERIAL: &str = "ShaderNodeOutputMaterial";
	/// Color ramp.
	pub const COLOR_RAMP: &str = "ShaderNodeValToRGB";
	/// Toon BSDF.
	pub const TOON: &str = "ShaderNodeBsdfToon";
	/// Shader to RGB.
	pub const SHADER_TO_RGB: &str = "ShaderNodeShaderToRGB";
	/// Legacy mix.
	pub const MIX_RGB: &str = "ShaderNodeMixRGB";
	/// Generic mix.
	pub const MIX: &str = "ShaderNodeMix";
	/// Principled BSDF.
	pub const PRINCIPLED: &str = "ShaderNodeBsdfPrincipled";
	/// Image texture.
	pub const TEX_IMAGE: &str = "ShaderNodeTexImage";
}

/// `bNodeSocket.type` codes.
pub mod socket_type {
	/// Float.
	pub const FLOAT: i64 = 0;
	/// Vector.
	pub const VECTOR: i64 = 1;
	/// Color.
	pub const RGBA: i64 = 2;
	/// Shader closure.
	pub const SHADER: i64 = 3;
}

/// How an image's pixel data is packed into the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
	/// External file only.
	None,
	/// Legacy single `packedfile` pointer.
	File,
	/// Non-empty `packedfiles` list (multi-view and tiled images).
	List,
}

/// One socket to write.
#[derive(Debug, Clone)]
pub struct SocketSpec {
	/// Display name.
	pub name: String,
	/// Identifier.
	pub identifier: String,
	/// `bNodeSocket.type`.
	pub type_code: i64,
	/// Default-value struct type and fields.
	pub default_value: Option<(&'static str, Fields)>,
}

impl SocketSpec {
	/// Socket without a default value.
	pub fn new(name: &str, identifier: &str, type_code: i64) -> Self {
		Self {
			name: name.to_owned(),
			identifier: identifier.to_owned(),
			type_code,
			default_value: None,
		}
	}

	/// Attach a default-value struct.
	pub fn with_default(mut self, type_name: &'static str, fields: Fields) -> Self {
		self.default_value = Some((type_name, fields));
		self
	}

	/// Float socket with `value`, `min`, `max`, `subtype`.
	pub fn float(name: &str, value: f32, subtype: i64) -> Self {
		Self::new(name, name, socket_type::FLOAT).with_default(
			"bNodeSocketValueFloat",
			vec![
				("subtype", Field::Int(subtype)),
				("value", Field::Float(value)),
				("min", Field::Float(0.0)),
				("max", Field::Float(1.0)),
			],
		)
	}

	/// Color socket with an RGBA default.
	pub fn color(name: &str, rgba: [f32; 4]) -> Self {
		Self::new(name, name, socket_type::RGBA).with_default("bNodeSocketValueRGBA", vec![("value", Field::Floats(rgba.to_vec()))])
	}

	/// Shader closure socket.
	pub fn shader(name: &str) -> Self {
		Self::new(name, name, socket_type::SHADER)
	}
}

/// One node to write.
#[derive(Debug, Clone)]
pub struct NodeSpec {
	/// `bNode.idname`.
	pub idname: String,
	/// `bNode.name`.
	pub name: String,
	/// `bNode.flag`.
	pub flag: i64,
	/// Written to `type` or `type_legacy`, whichever the schema has.
	pub type_code: Option<i64>,
	/// Input sockets.
	pub inputs: Vec<SocketSpec>,
	/// Output sockets.
	pub outputs: Vec<SocketSpec>,
	/// Storage struct type and fields.
	pub storage: Option<(&'static str, Fields)>,
	/// Target of `bNode.id`.
	pub id: Option<u64>,
	/// Extra assignments such as `locx`, `custom1`, `width`.
	pub extra: Fields,
}

impl NodeSpec {
	/// Node with no sockets.
	pub fn new(idname: &str, name: &str) -> Self {
		Self {
			idname: idname.to_owned(),
			name: name.to_owned(),
			flag: 0,
			type_code: None,
			inputs: Vec::new(),
			outputs: Vec::new(),
			storage: None,
			id: None,
			extra: Vec::new(),
		}
	}

	/// Material output with Surface/Volume/Displacement inputs.
	pub fn material_output(name: &str, flag: i64) -> Self {
		let mut node = Self::new(idname::OUTPUT_MATERIAL, name);
		node.flag = flag;
		node.inputs = vec![
			SocketSpec::shader("Surface"),
			SocketSpec::shader("Volume"),
			SocketSpec::new("Displacement", "Displacement", socket_type::VECTOR),
		];
		node
	}

	/// Color ramp with the given `(position, rgba)` stops.
	pub fn color_ramp(name: &str, interpolation: i64, stops: &[(f32, [f32; 4])]) -> Self {
		let mut node = Self::new(idname::COLOR_RAMP, name);
		node.inputs = vec![SocketSpec::float("Fac", 0.5, 15)];
		node.outputs = vec![SocketSpec::color("Color", [0.0, 0.0, 0.0, 1.0]), SocketSpec::float("Alpha", 1.0, 0)];
		let data = stops
			.iter()
			.map(|(pos, rgba)| {
				vec![
					("r", Field::Float(rgba[0])),
					("g", Field::Float(rgba[1])),
					("b", Field::Float(rgba[2])),
					("a", Field::Float(rgba[3])),
					("pos", Field::Float(*pos)),
				]
			})
			.collect();
		node.storage = Some((
			"ColorBand",
			vec![
				("tot", Field::Int(stops.len() as i64)),
				("ipotype", Field::Int(interpolation)),
				("data", Field::Structs(data)),
			],
		));
		node
	}

	/// Set `bNode.flag`.
	pub fn flag(mut self, flag: i64) -> Self {
		self.flag = flag;
		self
	}

	/// Add an extra field assignment.
	pub fn set(mut self, field: &'static str, value: Field) -> Self {
		self.extra.push((field, value));
		self
	}
}

/// Link from `(node, output socket)` to `(node, input socket)`, by index.
#[derive(Debug, Clone, Copy)]
pub struct LinkSpec {
	/// Upstream node and output socket index.
	pub from: (usize, usize),
	/// Downstream node and input socket index.
	pub to: (usize, usize),
}

/// One node tree to write.
#[derive(Debug, Clone, Default)]
pub struct TreeSpec {
	/// Tree name without prefix.
	pub name: String,
	/// Nodes in list order.
	pub nodes: Vec<NodeSpec>,
	/// Links in list order.
	pub links: Vec<LinkSpec>,
}

/// Addresses assigned to one written node.
#[derive(Debug, Clone, Default)]
pub struct BuiltNode {
	/// Node address.
	pub addr: u64,
	/// Input socket addresses.
	pub inputs: Vec<u64>,
	/// Output socket addresses.
	pub outputs: Vec<u64>,
}

/// Addresses assigned to one written material.
#[derive(Debug, Clone, Default)]
pub struct BuiltMaterial {
	/// Material address.
	pub addr: u64,
	/// Node tree address.
	pub tree: Option<u64>,
	/// Nodes in list order.
	pub nodes: Vec<BuiltNode>,
	/// Links in list order.
	pub links: Vec<u64>,
}

struct PendingBlock {
	code: [u8; 4],
	type_name: String,
	addr: u64,
	elems: Vec<Fields>,
	raw: Option<Vec<u8>>,
}

/// Incremental writer for one synthetic file.
pub struct BlendBuilder {
	header: HeaderKind,
	endian: Endian,
	version: u16,
	schema: Vec<(String, Vec<(String, String)>)>,
	blocks: Vec<PendingBlock>,
	subversion: Option<i64>,
	next_addr: u64,
}

impl Default for BlendBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl BlendBuilder {
	/// Little-endian, 64-bit pointers, legacy header, version 4.2.
	pub fn new() -> Self {
		let schema = DEFAULT_SCHEMA
			.iter()
			.map(|(name, fields)| {
				let fields = fields.iter().map(|(ty, decl)| ((*ty).to_owned(), (*decl).to_owned())).collect();
				((*name).to_owned(), fields)
			})
			.collect();
		Self {
			header: HeaderKind::Legacy { pointer_size: 8 },
			endian: Endian::Little,
			version: 402,
			schema,
			blocks: Vec::new(),
			subversion: None,
			next_addr: FIRST_ADDR,
		}
	}

	/// Select the header flavor.
	pub fn header(mut self, header: HeaderKind) -> Self {
		self.header = header;
		self
	}

	/// Select the byte order.
	pub fn endian(mut self, endian: Endian) -> Self {
		self.endian = endian;
		self
	}

	/// Set the header version digits (`402`, `500`, ...).
	pub fn version(mut self, version: u16) -> Self {
		self.version = version;
		self
	}

	/// Write a `GLOB` block carrying `subversion`.
	pub fn subversion(mut self, subversion: i64) -> Self {
		self.subversion = Some(subversion);
		self
	}

	/// Add or replace one struct definition as `(type, declarator)` pairs.
	pub fn define(mut self, name: &str, fields: &[(&str, &str)]) -> Self {
		let fields = fields.iter().map(|(ty, decl)| ((*ty).to_owned(), (*decl).to_owned())).collect();
		match self.schema.iter_mut().find(|(existing, _)| existing == name) {
			Some(slot) => slot.1 = fields,
			None => self.schema.push((name.to_owned(), fields)),
		}
		self
	}

	/// Allocate an address for a block written later.
	pub fn reserve(&mut self) -> u64 {
		let addr = self.next_addr;
		self.next_addr += ADDR_STRIDE;
		addr
	}

	/// Write one struct instance at a reserved address.
	pub fn push_at(&mut self, addr: u64, code: [u8; 4], type_name: &str, fields: Fields) {
		self.blocks.push(PendingBlock {
			code,
			type_name: type_name.to_owned(),
			addr,
			elems: vec![fields],
			raw: None,
		});
	}

	/// Write a block of `type_name` whose payload is `payload` verbatim.
	pub fn push_raw(&mut self, code: [u8; 4], type_name: &str, payload: Vec<u8>) -> u64 {
		let addr = self.reserve();
		self.blocks.push(PendingBlock {
			code,
			type_name: type_name.to_owned(),
			addr,
			elems: Vec::new(),
			raw: Some(payload),
		});
		addr
	}

	/// Write one struct instance at a fresh address.
	pub fn push(&mut self, code: [u8; 4], type_name: &str, fields: Fields) -> u64 {
		let addr = self.reserve();
		self.push_at(addr, code, type_name, fields);
		addr
	}

	/// Write an image ID.
	pub fn add_image(&mut self, name: &str, filepath: &str, packing: Packing, colorspace: &str) -> u64 {
		let mut fields = vec![
			("id", id_fields("IM", name)),
			("filepath", text(filepath)),
			("colorspace_settings", Field::Struct(vec![("name", text(colorspace))])),
		];
		match packing {
			Packing::None => {}
			Packing::File => fields.push(("packedfile", Field::Ptr(PACKED_DATA_ADDR))),
			Packing::List => fields.push(("packedfiles", list_base(&[PACKED_DATA_ADDR]))),
		}
		self.push(*b"IM\0\0", "Image", fields)
	}

	/// Write a material, its node tree, nodes, sockets, and links.
	pub fn add_material(&mut self, name: &str, settings: Fields, tree: Option<TreeSpec>) -> BuiltMaterial {
		let material_addr = self.reserve();
		let mut built = BuiltMaterial {
			addr: material_addr,
			..BuiltMaterial::default()
		};

		let mut fields = vec![("id", id_fields("MA", name))];
		if let Some(tree) = tree {
			let tree_addr = self.add_tree(&tree, &mut built);
			built.tree = Some(tree_addr);
			fields.push(("nodetree", Field::Ptr(tree_addr)));
			fields.push(("node_tree", Field::Ptr(tree_addr)));
		}
		fields.extend(settings);
		self.push_at(material_addr, *b"MA\0\0", "Material", fields);
		built
	}

	fn add_tree(&mut self, tree: &TreeSpec, built: &mut BuiltMaterial) -> u64 {
		let tree_addr = self.reserve();
		built.nodes = tree
			.nodes
			.iter()
			.map(|node| BuiltNode {
				addr: self.reserve(),
				inputs: node.inputs.iter().map(|_| self.reserve()).collect(),
				outputs: node.outputs.iter().map(|_| self.reserve()).collect(),
			})
			.collect();
		built.links = tree.links.iter().map(|_| self.reserve()).collect();

		for (idx, (spec, node)) in tree.nodes.iter().zip(built.nodes.clone()).enumerate() {
			self.write_sockets(&spec.inputs, &node.inputs, 1);
			self.write_sockets(&spec.outputs, &node.outputs, 2);

			let mut fields = vec![
				("next", Field::Ptr(neighbor(&built.nodes, idx, 1))),
				("prev", Field::Ptr(if idx == 0 { 0 } else { built.nodes[idx - 1].addr })),
				("inputs", list_base(&node.inputs)),
				("outputs", list_base(&node.outputs)),
				("name", text(&spec.name)),
				("idname", text(&spec.idname)),
				("flag", Field::Int(spec.flag)),
			];
			if let Some(code) = spec.type_code {
				fields.push(("type", Field::Int(code)));
				fields.push(("type_legacy", Field::Int(code)));
			}
			if let Some(id) = spec.id {
				fields.push(("id", Field::Ptr(id)));
			}
			if let Some((type_name, storage)) = &spec.storage {
				let storage_addr = self.push(*b"DATA", type_name, storage.clone());
				fields.push(("storage", Field::Ptr(storage_addr)));
			}
			fields.extend(spec.extra.iter().cloned());
			self.push_at(node.addr, *b"DATA", "bNode", fields);
		}

		for (idx, (link, addr)) in tree.links.iter().zip(built.links.clone()).enumerate() {
			let from = &built.nodes[link.from.0];
			let to = &built.nodes[link.to.0];
			let fields = vec![
				("next", Field::Ptr(built.links.get(idx + 1).copied().unwrap_or(0))),
				("prev", Field::Ptr(if idx == 0 { 0 } else { built.links[idx - 1] })),
				("fromnode", Field::Ptr(from.addr)),
				("tonode", Field::Ptr(to.addr)),
				("fromsock", Field::Ptr(from.outputs[link.from.1])),
				("tosock", Field::Ptr(to.inputs[link.to.1])),
				("flag", Field::Int(1)),
			];
			self.push_at(addr, *b"DATA", "bNodeLink", fields);
		}

		let node_addrs: Vec<u64> = built.nodes.iter().map(|node| node.addr).collect();
		let fields = vec![
			("id", id_fields("NT", &tree.name)),
			("nodes", list_base(&node_addrs)),
			("links", list_base(&built.links)),
			("idname", text("ShaderNodeTree")),
		];
		self.push_at(tree_addr, *b"NT\0\0", "bNodeTree", fields);
		tree_addr
	}

	fn write_sockets(&mut self, specs: &[SocketSpec], addrs: &[u64], in_out: i64) {
		for (idx, (spec, addr)) in specs.iter().zip(addrs).enumerate() {
			let mut fields = vec![
				("next", Field::Ptr(addrs.get(idx + 1).copied().unwrap_or(0))),
				("prev", Field::Ptr(if idx == 0 { 0 } else { addrs[idx - 1] })),
				("name", text(&spec.name)),
				("identifier", text(&spec.identifier)),
				("type", Field::Int(spec.type_code)),
				("in_out", Field::Int(in_out)),
			];
			if let Some((type_name, value)) = &spec.default_value {
				let value_addr = self.push(*b"DATA", type_name, value.clone());
				fields.push(("default_value", Field::Ptr(value_addr)));
			}
			self.push_at(*addr, *b"DATA", "bNodeSocket", fields);
		}
	}

	/// Serialize the file.
	pub fn build(&self) -> Vec<u8> {
		let layout = Layout::new(&self.schema, self.pointer_size());
		let mut out = Vec::new();
		self.write_header(&mut out);

		if let Some(subversion) = self.subversion {
			let fields = vec![("subvstr", text("")), ("subversion", Field::Int(subversion))];
			self.write_block(&mut out, &layout, *b"GLOB", "FileGlobal", 0x0000_F000, &[fields]);
		}
		for block in &self.blocks {
			match &block.raw {
				Some(payload) => {
					let sdna = layout.sdna(&block.type_name).unwrap_or(0);
					self.write_bhead(&mut out, block.code, payload.len(), block.addr, sdna, 1);
					out.extend_from_slice(payload);
				}
				None => self.write_block(&mut out, &layout, block.code, &block.type_name, block.addr, &block.elems),
			}
		}

		let dna = layout.dna_payload(self.endian);
		self.write_bhead(&mut out, *b"DNA1", dna.len(), 0, 0, 1);
		out.extend_from_slice(&dna);
		self.write_bhead(&mut out, *b"ENDB", 0, 0, 0, 0);
		out
	}

	/// Serialize the file into `dir/name` and return the path.
	pub fn write_to(&self, dir: &Path, name: &str) -> std::io::Result<PathBuf> {
		let path = dir.join(name);
		std::fs::write(&path, self.build())?;
		Ok(path)
	}

	fn pointer_size(&self) -> usize {
		match self.header {
			HeaderKind::Legacy { pointer_size } => pointer_size,
			HeaderKind::V1 => 8,
		}
	}

	fn write_header(&self, out: &mut Vec<u8>) {
		let marker = match self.endian {
			Endian::Little => 'v',
			Endian::Big => 'V',
		};
		let header = match self.header {
			HeaderKind::Legacy { pointer_size } => {
				let width = if pointer_size == 4 { '_' } else { '-' };
				format!("BLENDER{width}{marker}{:03}", self.version)
			}
			HeaderKind::V1 => format!("BLENDER17-01{marker}{:04}", self.version),
		};
		out.extend_from_slice(header.as_bytes());
	}

	fn write_block(&self, out: &mut Vec<u8>, layout: &Layout, code: [u8; 4], type_name: &str, addr: u64, elems: &[Fields]) {
		let Some(sdna) = layout.sdna(type_name) else {
			panic!("struct {type_name} is not in the schema");
		};
		let mut payload = Vec::new();
		for elem in elems {
			layout.encode(&mut payload, type_name, elem, self.endian);
		}
		self.write_bhead(out, code, payload.len(), addr, sdna, elems.len());
		out.extend_from_slice(&payload);
	}

	fn write_bhead(&self, out: &mut Vec<u8>, code: [u8; 4], len: usize, old: u64, sdna: usize, nr: usize) {
		out.extend_from_slice(&code);
		match self.header {
			HeaderKind::Legacy { pointer_size } => {
				put_uint(out, len as u64, 4, self.endian);
				put_uint(out, old, pointer_size, self.endian);
				put_uint(out, sdna as u64, 4, self.endian);
				put_uint(out, nr as u64, 4, self.endian);
			}
			HeaderKind::V1 => {
				put_uint(out, sdna as u64, 4, self.endian);
				put_uint(out, old, 8, self.endian);
				put_uint(out, len as u64, 8, self.endian);
				put_uint(out, nr as u64, 8, self.endian);
			}
		}
	}
}

fn id_fields(code: &str, name: &str) -> Field {
	Field::Struct(vec![("name", text(&format!("{code}{name}")))])
}

fn list_base(addrs: &[u64]) -> Field {
	Field::Struct(vec![
		("first", Field::Ptr(addrs.first().copied().unwrap_or(0))),
		("last", Field::Ptr(addrs.last().copied().unwrap_or(0))),
	])
}

fn neighbor(nodes: &[BuiltNode], idx: usize, step: usize) -> u64 {
	nodes.get(idx + step).map(|node| node.addr).unwrap_or(0)
}

fn put_uint(out: &mut Vec<u8>, value: u64, width: usize, endian: Endian) {
	let bytes = value.to_le_bytes();
	let slice = &bytes[..width];
	match endian {
		Endian::Little => out.extend_from_slice(slice),
		Endian::Big => out.extend(slice.iter().rev()),
	}
}

struct Decl {
	ident: String,
	is_ptr: bool,
	count: usize,
}

fn parse_decl(raw: &str) -> Decl {
	let is_ptr = raw.starts_with('*') || raw.starts_with("(*");
	let trimmed = raw.trim_start_matches(['*', '(']);
	let ident_end = trimmed.find(['[', ')']).unwrap_or(trimmed.len());
	let mut count = 1;
	let mut rest = &trimmed[ident_end..];
	while let Some(start) = rest.find('[') {
		let Some(end) = rest[start..].find(']') else {
			break;
		};
		count *= rest[start + 1..start + end].parse::<usize>().unwrap_or(1);
		rest = &rest[start + end + 1..];
	}
	Decl {
		ident: trimmed[..ident_end].to_owned(),
		is_ptr,
		count,
	}
}

struct Layout<'a> {
	schema: &'a [(String, Vec<(String, String)>)],
	pointer_size: usize,
	types: Vec<String>,
	sizes: HashMap<String, usize>,
}

impl<'a> Layout<'a> {
	fn new(schema: &'a [(String, Vec<(String, String)>)], pointer_size: usize) -> Self {
		let mut types: Vec<String> = PRIMITIVES.iter().map(|(name, _)| (*name).to_owned()).collect();
		for (name, _) in schema {
			types.push(name.clone());
		}
		for (_, fields) in schema {
			for (ty, _) in fields {
				if !types.contains(ty) {
					types.push(ty.clone());
				}
			}
		}

		let mut layout = Self {
			schema,
			pointer_size,
			types,
			sizes: PRIMITIVES.iter().map(|(name, size)| ((*name).to_owned(), *size)).collect(),
		};
		for (name, _) in schema {
			let size = layout.struct_size(name);
			layout.sizes.insert(name.clone(), size);
		}
		layout
	}

	fn fields(&self, name: &str) -> Option<&'a [(String, String)]> {
		self.schema.iter().find(|(existing, _)| existing == name).map(|(_, fields)| fields.as_slice())
	}

	fn sdna(&self, name: &str) -> Option<usize> {
		self.schema.iter().position(|(existing, _)| existing == name)
	}

	fn type_size(&self, name: &str) -> usize {
		if let Some(size) = self.sizes.get(name) {
			return *size;
		}
		self.struct_size(name)
	}

	fn struct_size(&self, name: &str) -> usize {
		let Some(fields) = self.fields(name) else {
			return 0;
		};
		fields
			.iter()
			.map(|(ty, raw)| {
				let decl = parse_decl(raw);
				let element = if decl.is_ptr { self.pointer_size } else { self.type_size(ty) };
				element * decl.count
			})
			.sum()
	}

	fn encode(&self, out: &mut Vec<u8>, type_name: &str, values: &Fields, endian: Endian) {
		let Some(fields) = self.fields(type_name) else {
			return;
		};
		for (ty, raw) in fields {
			let decl = parse_decl(raw);
			let element = if decl.is_ptr { self.pointer_size } else { self.type_size(ty) };
			let start = out.len();
			let value = values.iter().rev().find(|(name, _)| *name == decl.ident).map(|(_, value)| value);
			match value {
				Some(Field::Ptr(addr)) if decl.is_ptr => put_uint(out, *addr, self.pointer_size, endian),
				Some(Field::Int(value)) if !decl.is_ptr => put_uint(out, *value as u64, element, endian),
				Some(Field::Float(value)) => put_uint(out, u64::from(value.to_bits()), 4, endian),
				Some(Field::Floats(values)) => {
					for value in values.iter().take(decl.count) {
						put_uint(out, u64::from(value.to_bits()), 4, endian);
					}
				}
				Some(Field::Str(value)) => {
					let bytes = value.as_bytes();
					out.extend_from_slice(&bytes[..bytes.len().min(decl.count.saturating_sub(1))]);
				}
				Some(Field::Struct(nested)) => self.encode(out, ty, nested, endian),
				Some(Field::Structs(items)) => {
					for item in items.iter().take(decl.count) {
						self.encode(out, ty, item, endian);
					}
				}
				_ => {}
			}
			out.resize(start + element * decl.count, 0);
		}
	}

	fn dna_payload(&self, endian: Endian) -> Vec<u8> {
		let mut names: Vec<&str> = Vec::new();
		for (_, fields) in self.schema {
			for (_, decl) in fields {
				if !names.contains(&decl.as_str()) {
					names.push(decl);
				}
			}
		}
		let name_idx = |decl: &str| names.iter().position(|name| *name == decl).unwrap_or(0);
		let type_idx = |ty: &str| self.types.iter().position(|name| name == ty).unwrap_or(0);

		let mut out = Vec::new();
		out.extend_from_slice(b"SDNANAME");
		put_uint(&mut out, names.len() as u64, 4, endian);
		for name in &names {
			out.extend_from_slice(name.as_bytes());
			out.push(0);
		}
		align4(&mut out);

		out.extend_from_slice(b"TYPE");
		put_uint(&mut out, self.types.len() as u64, 4, endian);
		for ty in &self.types {
			out.extend_from_slice(ty.as_bytes());
			out.push(0);
		}
		align4(&mut out);

		out.extend_from_slice(b"TLEN");
		for ty in &self.types {
			put_uint(&mut out, self.sizes.get(ty).copied().unwrap_or(0) as u64, 2, endian);
		}
		align4(&mut out);

		out.extend_from_slice(b"STRC");
		put_uint(&mut out, self.schema.len() as u64, 4, endian);
		for (name, fields) in self.schema {
			put_uint(&mut out, type_idx(name) as u64, 2, endian);
			put_uint(&mut out, fields.len() as u64, 2, endian);
			for (ty, decl) in fields {
				put_uint(&mut out, type_idx(ty) as u64, 2, endian);
				put_uint(&mut out, name_idx(decl) as u64, 2, endian);
			}
		}
		out
	}
}

fn align4(out: &mut Vec<u8>) {
	while out.len() % 4 != 0 {
		out.push(0);
	}
}
