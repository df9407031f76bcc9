use super::{output_targets, select_active_output};
use crate::export::node::{DecodedNode, NODE_DO_OUTPUT};
use crate::export::{Link, Node, NodeRef, Socket, SocketRef};

fn socket(ptr: u64, name: &str, identifier: &str) -> Socket {
	Socket {
		ptr,
		name: name.into(),
		identifier: identifier.into(),
		type_code: Some(3),
		subtype: "SHADER".into(),
		direction: None,
		is_linked: false,
		link_count: 0,
		default_value: None,
		min: None,
		max: None,
		soft_min: None,
		soft_max: None,
	}
}

fn node(ptr: u64, type_name: &str, flag: i64) -> DecodedNode {
	DecodedNode {
		node: Node {
			ptr,
			type_name: type_name.into(),
			ui_name: format!("node_{ptr:x}"),
			label: String::new(),
			type_code: None,
			position: [0.0, 0.0],
			size: [140.0, 100.0],
			muted: false,
			inputs: vec![socket(ptr + 1, "Surface", "Surface"), socket(ptr + 2, "Volume", "Volume"), socket(ptr + 3, "Displacement", "")],
			outputs: Vec::new(),
			referenced_asset: None,
			image: None,
			type_properties: None,
		},
		flag,
	}
}

fn link(ptr: u64, from: (u64, &str), to: (u64, &str, &str)) -> Link {
	let node_ref = |ptr: u64| NodeRef {
		ptr,
		ui_name: String::new(),
		type_name: String::new(),
		type_code: None,
	};
	let socket_ref = |ptr: u64, name: &str, identifier: &str| SocketRef {
		ptr,
		name: name.into(),
		identifier: identifier.into(),
		direction: None,
		type_code: None,
	};
	Link {
		ptr,
		from_node: Some(node_ref(from.0)),
		from_socket: Some(socket_ref(from.0 + 8, from.1, from.1)),
		to_node: Some(node_ref(to.0)),
		to_socket: Some(socket_ref(to.0 + 1, to.1, to.2)),
		flag: None,
	}
}

#[test]
fn do_output_bit_beats_traversal_order() {
	let nodes = vec![
		node(0x100, "ShaderNodeOutputMaterial", 0),
		node(0x200, "ShaderNodeBsdfPrincipled", NODE_DO_OUTPUT),
		node(0x300, "ShaderNodeOutputMaterial", NODE_DO_OUTPUT),
	];
	let active = select_active_output(&nodes).expect("active output");
	assert_eq!(active.node_ptr, 0x300);
}

#[test]
fn first_output_wins_without_do_output_bit() {
	let nodes = vec![node(0x100, "ShaderNodeOutputMaterial", 0), node(0x300, "ShaderNodeOutputMaterial", 0)];
	let active = select_active_output(&nodes).expect("active output");
	assert_eq!(active.node_ptr, 0x100);
	assert_eq!(active.surface_socket_identifier.as_deref(), Some("Surface"));
	assert_eq!(active.volume_socket_identifier.as_deref(), Some("Volume"));
	assert_eq!(active.displacement_socket_identifier, None);
}

#[test]
fn no_output_node_means_no_active_output() {
	assert!(select_active_output(&[node(0x100, "ShaderNodeBsdfToon", NODE_DO_OUTPUT)]).is_none());
}

#[test]
fn targets_key_by_lowercased_identifier_and_later_links_win() {
	let links = vec![
		link(0x10, (0x500, "BSDF"), (0x100, "Surface", "Surface")),
		link(0x20, (0x600, "Color"), (0x900, "Surface", "Surface")),
		link(0x30, (0x700, "Color"), (0x100, "Surface", "Surface")),
		link(0x40, (0x800, "Vector"), (0x100, "Height Map", "")),
	];
	let targets = output_targets(0x100, &links);
	assert_eq!(targets.len(), 2);
	assert_eq!(targets["surface"].from_node_ptr, Some(0x700));
	assert_eq!(targets["surface"].from_socket_identifier.as_deref(), Some("Color"));
	assert_eq!(targets["height map"].from_node_ptr, Some(0x800));
}
