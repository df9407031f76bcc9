use crate::blend::{BlendContext, FieldChain, Record, Value};
use crate::export::enums::BLEND_METHOD;
use crate::export::reference::display_name;
use crate::export::tree::build_node_tree;
use crate::export::{Diagnostics, Material, RenderSettings};

/// `MA_BL_CULL_BACKFACE` bit of `Material.blend_flag`.
pub const MA_BL_CULL_BACKFACE: i64 = 1;

const NODE_TREE: FieldChain = FieldChain::new(&["nodetree", "node_tree"]);

/// Build one material entry, including its node tree when one resolves.
pub fn build_material(ctx: &BlendContext<'_>, material: &Record, diagnostics: &mut Diagnostics) -> Material {
	let render_settings = render_settings(material, diagnostics);
	let tree = ctx.deref(material, NODE_TREE);
	let node_graph = tree.as_ref().map(|tree| build_node_tree(ctx, tree, diagnostics));

	Material {
		name: display_name(material),
		has_node_graph: node_graph.is_some(),
		node_graph_name: node_graph.as_ref().map(|graph| graph.name.clone()),
		render_settings,
		node_graph,
	}
}

/// Read each setting independently; any of them may be absent.
pub fn render_settings(material: &Record, diagnostics: &mut Diagnostics) -> RenderSettings {
	RenderSettings {
		blend_method: material.int("blend_method").map(|code| BLEND_METHOD.resolve(code, diagnostics)),
		alpha_threshold: material.get("alpha_threshold").and_then(Value::as_f64),
		use_backface_culling: material.int("blend_flag").unwrap_or(0) & MA_BL_CULL_BACKFACE != 0,
	}
}

#[cfg(test)]
mod tests {
	use super::render_settings;
	use crate::blend::{FieldValue, Record, StructValue, Value};
	use crate::export::Diagnostics;

	fn material(fields: Vec<(&str, Value)>) -> Record {
		Record {
			addr: 0x80,
			code: *b"MA\0\0",
			value: StructValue {
				type_name: "Material".into(),
				fields: fields.into_iter().map(|(name, value)| FieldValue { name: name.into(), value }).collect(),
			},
		}
	}

	#[test]
	fn settings_decode_independently() {
		let mut diagnostics = Diagnostics::new();
		let settings = render_settings(&material(vec![("blend_method", Value::I64(3)), ("blend_flag", Value::I64(1))]), &mut diagnostics);
		assert_eq!(settings.blend_method.as_deref(), Some("CLIP"));
		assert_eq!(settings.alpha_threshold, None);
		assert!(settings.use_backface_culling);
		assert!(diagnostics.is_empty());
	}

	#[test]
	fn missing_blend_method_is_null_not_unknown() {
		let mut diagnostics = Diagnostics::new();
		let settings = render_settings(&material(vec![("alpha_threshold", Value::F32(0.5))]), &mut diagnostics);
		assert_eq!(settings.blend_method, None);
		assert_eq!(settings.alpha_threshold, Some(0.5));
		assert!(!settings.use_backface_culling);
		assert!(diagnostics.is_empty());
	}

	#[test]
	fn unknown_blend_method_is_reported() {
		let mut diagnostics = Diagnostics::new();
		let settings = render_settings(&material(vec![("blend_method", Value::I64(7))]), &mut diagnostics);
		assert_eq!(settings.blend_method.as_deref(), Some("UNKNOWN_7"));
		assert_eq!(diagnostics.entries(), ["Unknown Material.blend_method enum value: 7"]);
	}
}
