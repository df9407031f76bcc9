use std::collections::{BTreeMap, HashMap};

use crate::blend::{BlendContext, Record};
use crate::export::links::collect_links;
use crate::export::node::{DecodedNode, NODE_DO_OUTPUT, decode_node};
use crate::export::reference::display_name;
use crate::export::{ActiveOutput, Diagnostics, FlaggedNode, Link, NodeTree, OutputTarget};

/// Node type of material output nodes.
pub const MATERIAL_OUTPUT: &str = "ShaderNodeOutputMaterial";

/// Human label for node types whose behavior glTF drops.
pub fn flagged_kind(type_name: &str) -> Option<&'static str> {
	match type_name {
		"ShaderNodeBsdfToon" => Some("Toon BSDF"),
		"ShaderNodeShaderToRGB" => Some("Shader to RGB"),
		"ShaderNodeValToRGB" => Some("Color Ramp"),
		_ => None,
	}
}

/// Snapshot one `bNodeTree`.
///
/// Links are collected first so every socket sees final link aggregates.
pub fn build_node_tree(ctx: &BlendContext<'_>, tree: &Record, diagnostics: &mut Diagnostics) -> NodeTree {
	let topology = collect_links(ctx, tree);

	let head = tree.ptr("nodes.first").unwrap_or(0);
	let decoded: Vec<DecodedNode> = ctx.walk_list(head).iter().map(|node| decode_node(ctx, node, &topology, diagnostics)).collect();

	let flagged_nodes = decoded
		.iter()
		.filter_map(|entry| {
			let kind = flagged_kind(&entry.node.type_name)?;
			Some(FlaggedNode {
				ptr: entry.node.ptr,
				type_name: entry.node.type_name.clone(),
				ui_name: entry.node.ui_name.clone(),
				kind: kind.to_owned(),
			})
		})
		.collect();

	let links = topology.into_links();
	let active_output = select_active_output(&decoded);
	let output_targets = active_output.as_ref().map(|active| output_targets(active.node_ptr, &links)).unwrap_or_default();

	NodeTree {
		name: display_name(tree),
		kind_code: tree.id_name().and_then(|name| name.get(..2)).unwrap_or_default().to_owned(),
		links,
		nodes: decoded.into_iter().map(|entry| entry.node).collect(),
		flagged_nodes,
		active_output,
		output_targets,
	}
}

/// First material output with `NODE_DO_OUTPUT` set, else the first material output.
pub fn select_active_output(nodes: &[DecodedNode]) -> Option<ActiveOutput> {
	let mut outputs = nodes.iter().filter(|entry| entry.node.type_name == MATERIAL_OUTPUT);
	let first = outputs.clone().next()?;
	let active = outputs.find(|entry| entry.flag & NODE_DO_OUTPUT != 0).unwrap_or(first);

	let mut by_key = HashMap::new();
	for socket in &active.node.inputs {
		let name = socket.name.trim().to_lowercase();
		if !name.is_empty() {
			by_key.insert(name, socket.identifier.as_str());
		}
		if !socket.identifier.is_empty() {
			by_key.insert(socket.identifier.trim().to_lowercase(), socket.identifier.as_str());
		}
	}
	let identifier = |key: &str| by_key.get(key).filter(|value| !value.is_empty()).map(|value| (*value).to_owned());

	Some(ActiveOutput {
		node_ptr: active.node.ptr,
		surface_socket_identifier: identifier("surface"),
		volume_socket_identifier: identifier("volume"),
		displacement_socket_identifier: identifier("displacement"),
	})
}

/// Upstream source of every link into `active`, keyed by lower-cased socket identifier or name.
///
/// A later link into the same key replaces an earlier one.
pub fn output_targets(active: u64, links: &[Link]) -> BTreeMap<String, OutputTarget> {
	let mut targets = BTreeMap::new();
	for link in links {
		if link.to_node.as_ref().map(|node| node.ptr) != Some(active) {
			continue;
		}
		let key = link
			.to_socket
			.as_ref()
			.map(|socket| if socket.identifier.is_empty() { &socket.name } else { &socket.identifier })
			.map(|key| key.trim().to_lowercase())
			.unwrap_or_default();
		if key.is_empty() {
			continue;
		}
		targets.insert(
			key,
			OutputTarget {
				from_node_ptr: link.from_node.as_ref().map(|node| node.ptr),
				from_socket_identifier: link.from_socket.as_ref().map(|socket| socket.identifier.clone()),
			},
		);
	}
	targets
}

#[cfg(test)]
mod tests;
