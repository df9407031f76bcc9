#![allow(missing_docs)]

use std::collections::HashMap;
use std::path::Path;

use blendmat::blend::{BlendContext, BlendFile};
use blendmat::export::{ExportOptions, ExportPayload, NODE_DO_OUTPUT, build_export_payload};
use blendmat_testkit::{BlendBuilder, Field, LinkSpec, NodeSpec, SocketSpec, TreeSpec, idname, socket_type};

fn export(builder: &BlendBuilder, parallel: bool) -> ExportPayload {
	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");
	let options = ExportOptions {
		parallel,
		exported_at: Some("2024-01-01T00:00:00+00:00".to_owned()),
	};
	build_export_payload(&ctx, Path::new("library.blend"), &options).expect("payload builds")
}

fn library() -> BlendBuilder {
	let mut builder = BlendBuilder::new().subversion(2);
	for idx in 0..6 {
		let mut toon = NodeSpec::new(idname::TOON, "Toon BSDF").set("custom1", Field::Int(idx % 2));
		toon.inputs = vec![SocketSpec::color("Color", [0.5, 0.5, 0.5, 1.0]), SocketSpec::float("Size", 0.5, 15)];
		toon.outputs = vec![SocketSpec::shader("BSDF")];
		let mut to_rgb = NodeSpec::new(idname::SHADER_TO_RGB, "Shader to RGB");
		to_rgb.inputs = vec![SocketSpec::shader("Shader")];
		to_rgb.outputs = vec![SocketSpec::new("Color", "Color", socket_type::RGBA), SocketSpec::float("Alpha", 1.0, 0)];
		let ramp = NodeSpec::color_ramp("Ramp", idx % 5, &[(0.0, [0.0, 0.0, 0.0, 1.0]), (0.4, [1.0, 1.0, 1.0, 1.0])]);
		let mut emission = NodeSpec::new("ShaderNodeEmission", "Emission");
		emission.inputs = vec![SocketSpec::color("Color", [1.0, 1.0, 1.0, 1.0])];
		emission.outputs = vec![SocketSpec::shader("Emission")];

		let tree = TreeSpec {
			name: format!("Tree {idx}"),
			nodes: vec![toon, to_rgb, ramp, emission, NodeSpec::material_output("Output", NODE_DO_OUTPUT)],
			links: vec![
				LinkSpec { from: (0, 0), to: (1, 0) },
				LinkSpec { from: (1, 0), to: (2, 0) },
				LinkSpec { from: (2, 0), to: (3, 0) },
				LinkSpec { from: (3, 0), to: (4, 0) },
				LinkSpec { from: (1, 1), to: (4, 2) },
			],
		};
		let settings = vec![("blend_method", Field::Int(idx))];
		let tree = (idx != 4).then_some(tree);
		builder.add_material(&format!("Material {idx}"), settings, tree);
	}
	builder
}

#[test]
fn socket_link_aggregates_match_links() {
	let payload = export(&library(), false);
	for material in &payload.materials {
		assert_eq!(material.has_node_graph, material.node_graph.is_some(), "{}", material.name);
		let Some(graph) = &material.node_graph else {
			continue;
		};

		let mut touches: HashMap<u64, u32> = HashMap::new();
		for link in &graph.links {
			for socket in [&link.from_socket, &link.to_socket].into_iter().flatten() {
				*touches.entry(socket.ptr).or_default() += 1;
			}
		}

		let mut seen = 0;
		for node in &graph.nodes {
			for socket in node.inputs.iter().chain(&node.outputs) {
				assert_eq!(socket.is_linked, socket.link_count > 0, "{}", socket.name);
				assert_eq!(socket.link_count, touches.get(&socket.ptr).copied().unwrap_or(0), "{}", socket.name);
				seen += socket.link_count;
			}
		}
		assert_eq!(seen as usize, graph.links.len() * 2);

		for link in &graph.links {
			let from = link.from_node.as_ref().expect("from node");
			let node = graph.nodes.iter().find(|node| node.ptr == from.ptr).expect("from node listed");
			let socket = link.from_socket.as_ref().expect("from socket");
			assert!(node.outputs.iter().any(|candidate| candidate.ptr == socket.ptr));
		}

		let kinds: Vec<_> = graph.flagged_nodes.iter().map(|node| node.kind.as_str()).collect();
		assert_eq!(kinds, ["Toon BSDF", "Shader to RGB", "Color Ramp"]);
	}
}

#[test]
fn materials_keep_storage_order() {
	let payload = export(&library(), false);
	let names: Vec<_> = payload.materials.iter().map(|material| material.name.as_str()).collect();
	assert_eq!(names, ["Material 0", "Material 1", "Material 2", "Material 3", "Material 4", "Material 5"]);
	assert!(!payload.materials[4].has_node_graph);
	assert!(payload.warnings.is_empty(), "{:?}", payload.warnings);
}

#[test]
fn repeated_and_parallel_runs_are_identical() {
	let builder = library();
	let first = export(&builder, false);
	let second = export(&builder, false);
	let parallel = export(&builder, true);

	assert_eq!(first, second);
	assert_eq!(first, parallel);
	assert_eq!(
		serde_json::to_string_pretty(&first).expect("serializes"),
		serde_json::to_string_pretty(&parallel).expect("serializes")
	);
}
