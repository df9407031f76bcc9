#![allow(missing_docs)]

use std::path::Path;

use blendmat::blend::{BlendContext, BlendFile};
use blendmat::export::{ExportOptions, ExportPayload, NODE_MUTED, build_export_payload};
use blendmat_testkit::{BlendBuilder, Field, NodeSpec, Packing, TreeSpec, idname};

fn export(builder: &BlendBuilder) -> ExportPayload {
	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");
	let options = ExportOptions {
		exported_at: Some("2024-01-01T00:00:00+00:00".to_owned()),
		..ExportOptions::default()
	};
	build_export_payload(&ctx, Path::new("diag.blend"), &options).expect("payload builds")
}

fn tree(nodes: Vec<NodeSpec>) -> Option<TreeSpec> {
	Some(TreeSpec {
		name: "Tree".to_owned(),
		nodes,
		links: Vec::new(),
	})
}

#[test]
fn unknown_codes_warn_once_each_in_file_order() {
	let mut builder = BlendBuilder::new();
	let toon = NodeSpec::new(idname::TOON, "Toon BSDF").set("custom1", Field::Int(7));
	let ramp = NodeSpec::color_ramp("Ramp", 8, &[(0.0, [0.0; 4])]);
	builder.add_material("First", vec![("blend_method", Field::Int(9))], tree(vec![toon, ramp]));
	let mix = NodeSpec::new(idname::MIX_RGB, "Mix").set("custom1", Field::Int(40));
	builder.add_material("Second", Vec::new(), tree(vec![mix]));

	let payload = export(&builder);
	assert_eq!(
		payload.warnings,
		[
			"Unknown Material.blend_method enum value: 9",
			"Unknown ToonBSDF.component enum value: 7",
			"Unknown ColorRamp.interpolation enum value: 8",
			"Unknown MixRGB.blend_type enum value: 40",
		]
	);

	let first = payload.materials[0].node_graph.as_ref().expect("graph");
	assert_eq!(payload.materials[0].render_settings.blend_method.as_deref(), Some("UNKNOWN_9"));
	let props = first.nodes[0].type_properties.as_ref().expect("toon props");
	assert_eq!(props.component.as_deref(), Some("UNKNOWN_7"));
	let ramp = first.nodes[1].type_properties.as_ref().and_then(|props| props.ramp_settings.as_ref()).expect("ramp");
	assert_eq!(ramp.interpolation, "UNKNOWN_8");
	assert_eq!(ramp.stops.len(), 1);
}

#[test]
fn known_codes_decode_without_warnings() {
	let mut builder = BlendBuilder::new();
	let toon = NodeSpec::new(idname::TOON, "Toon BSDF").set("custom1", Field::Int(1));
	let mix_rgb = NodeSpec::new(idname::MIX_RGB, "Legacy Mix").set("custom1", Field::Int(2)).set("custom2", Field::Int(3));
	let mut mix = NodeSpec::new(idname::MIX, "Mix");
	mix.storage = Some(("NodeShaderMix", vec![("blend_type", Field::Int(4)), ("clamp_result", Field::Int(1))]));
	builder.add_material("Mat", vec![("blend_method", Field::Int(3))], tree(vec![toon, mix_rgb, mix]));

	let payload = export(&builder);
	assert!(payload.warnings.is_empty(), "{:?}", payload.warnings);
	let graph = payload.materials[0].node_graph.as_ref().expect("graph");

	let toon = graph.nodes[0].type_properties.as_ref().expect("toon");
	assert_eq!(toon.component.as_deref(), Some("GLOSSY"));

	let legacy = graph.nodes[1].type_properties.as_ref().expect("mix rgb");
	assert_eq!(legacy.blend_type.as_deref(), Some("MULTIPLY"));
	assert_eq!(legacy.use_clamp, Some(true));
	assert_eq!(legacy.use_alpha, Some(true));

	let mix = graph.nodes[2].type_properties.as_ref().expect("mix");
	assert_eq!(mix.blend_type.as_deref(), Some("SCREEN"));
	assert_eq!(mix.use_clamp, Some(true));
	assert_eq!(mix.use_alpha, None);

	assert_eq!(graph.flagged_nodes.len(), 1);
	assert_eq!(graph.flagged_nodes[0].kind, "Toon BSDF");
}

#[test]
fn image_nodes_carry_asset_metadata() {
	let mut builder = BlendBuilder::new();
	let packed = builder.add_image("wood.png", "//textures/wood.png", Packing::File, "sRGB");
	let bare = builder.add_image("noise", "", Packing::None, "");
	let tiled = builder.add_image("tiles.<UDIM>.png", "//textures/tiles.<UDIM>.png", Packing::List, "Non-Color");
	let mut first = NodeSpec::new(idname::TEX_IMAGE, "Wood");
	first.id = Some(packed);
	let mut second = NodeSpec::new(idname::TEX_IMAGE, "Noise");
	second.id = Some(bare);
	let mut third = NodeSpec::new(idname::TEX_IMAGE, "Tiles");
	third.id = Some(tiled);
	builder.add_material("Mat", Vec::new(), tree(vec![first, second, third]));

	let payload = export(&builder);
	let graph = payload.materials[0].node_graph.as_ref().expect("graph");

	let asset = graph.nodes[0].referenced_asset.as_ref().expect("asset");
	assert_eq!((asset.code.as_str(), asset.name.as_str()), ("IM", "wood.png"));
	let image = graph.nodes[0].image.as_ref().expect("image");
	assert_eq!(image.filepath, "//textures/wood.png");
	assert!(image.is_packed);
	assert_eq!(image.colorspace.as_deref(), Some("sRGB"));

	let image = graph.nodes[1].image.as_ref().expect("image");
	assert_eq!(image.filepath, "noise");
	assert!(!image.is_packed);
	assert_eq!(image.colorspace, None);
	assert!(graph.nodes[1].type_properties.is_none());

	let image = graph.nodes[2].image.as_ref().expect("image");
	assert_eq!(image.filepath, "//textures/tiles.<UDIM>.png");
	assert!(image.is_packed, "a non-empty packedfiles list marks the image packed");
	assert_eq!(image.colorspace.as_deref(), Some("Non-Color"));
}

#[test]
fn unreadable_material_blocks_become_warnings() {
	let mut builder = BlendBuilder::new();
	builder.add_material("Before", Vec::new(), None);
	let broken = builder.push_raw(*b"MA\0\0", "Material", vec![0; 8]);
	builder.add_material("After", Vec::new(), None);

	let payload = export(&builder);
	let names: Vec<_> = payload.materials.iter().map(|material| material.name.as_str()).collect();
	assert_eq!(names, ["Before", "After"]);
	assert_eq!(payload.warnings.len(), 1, "{:?}", payload.warnings);
	let warning = &payload.warnings[0];
	assert!(warning.starts_with(&format!("Skipped unreadable material block at {broken:#x}: ")), "{warning}");
	assert!(warning.contains("decode payload too small"), "{warning}");
}

#[test]
fn node_flags_and_geometry() {
	let mut builder = BlendBuilder::new();
	let muted = NodeSpec::new(idname::PRINCIPLED, "Muted")
		.flag(NODE_MUTED)
		.set("locx", Field::Float(-300.0))
		.set("locy", Field::Float(120.0))
		.set("width", Field::Float(240.0));
	let plain = NodeSpec::new(idname::PRINCIPLED, "Plain").set("height", Field::Float(80.0));
	builder.add_material("Mat", Vec::new(), tree(vec![muted, plain]));

	let payload = export(&builder);
	let graph = payload.materials[0].node_graph.as_ref().expect("graph");

	assert!(graph.nodes[0].muted);
	assert_eq!(graph.nodes[0].position, [-300.0, 120.0]);
	assert_eq!(graph.nodes[0].size, [240.0, 100.0]);
	assert!(!graph.nodes[1].muted);
	assert_eq!(graph.nodes[1].size, [140.0, 80.0]);
	assert!(graph.flagged_nodes.is_empty());
}
