use crate::blend::{BlendContext, FieldChain, Record, StructValue, Value};
use crate::export::enums::{MIX_BLEND_TYPE, MIXRGB_BLEND_TYPE, RAMP_COLOR_MODE, RAMP_HUE_INTERPOLATION, RAMP_INTERPOLATION, TOON_COMPONENT};
use crate::export::links::LinkTopology;
use crate::export::reference::{id_ref, strip_id_code};
use crate::export::socket::decode_socket;
use crate::export::{Diagnostics, GradientRamp, ImageInfo, Node, RampStop, TypeProperties};

/// Width used when a node stores none.
pub const DEFAULT_NODE_WIDTH: f64 = 140.0;
/// Height used when a node stores none.
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

/// `NODE_MUTED` bit of `bNode.flag`.
pub const NODE_MUTED: i64 = 1 << 9;
/// `NODE_DO_OUTPUT` bit of `bNode.flag`.
pub const NODE_DO_OUTPUT: i64 = 1 << 6;

const SHD_MIXRGB_USE_ALPHA: i64 = 1;
const SHD_MIXRGB_CLAMP: i64 = 2;

pub(crate) const TYPE_CODE: FieldChain = FieldChain::new(&["type", "type_legacy"]);
const LOC_X: FieldChain = FieldChain::new(&["locx", "location[0]"]);
const LOC_Y: FieldChain = FieldChain::new(&["locy", "location[1]"]);
const STORAGE: FieldChain = FieldChain::new(&["storage"]);
const ASSET: FieldChain = FieldChain::new(&["id"]);
const IMAGE_PATH: FieldChain = FieldChain::new(&["filepath", "name"]);

/// A decoded node and its raw flag word.
#[derive(Debug, Clone)]
pub struct DecodedNode {
	/// Serialized node.
	pub node: Node,
	/// `bNode.flag`, kept for active-output selection.
	pub flag: i64,
}

/// Decode one `bNode`, its sockets, asset reference, and type settings.
pub fn decode_node(ctx: &BlendContext<'_>, raw: &Record, topology: &LinkTopology, diagnostics: &mut Diagnostics) -> DecodedNode {
	let type_name = raw.string("idname").unwrap_or_default().to_owned();
	let flag = raw.int("flag").unwrap_or(0);
	let sockets = |list: &str| -> Vec<_> {
		let head = raw.ptr(&format!("{list}.first")).unwrap_or(0);
		ctx.walk_list(head).iter().map(|socket| decode_socket(ctx, socket, topology)).collect()
	};

	let asset = ctx.deref(raw, ASSET);
	let referenced_asset = asset.as_ref().and_then(id_ref);
	let image = match (&asset, &referenced_asset) {
		(Some(record), Some(reference)) if reference.code == "IM" => Some(decode_image(record)),
		_ => None,
	};

	let node = Node {
		ptr: raw.addr,
		ui_name: raw.string("name").unwrap_or_default().to_owned(),
		label: raw.string("label").unwrap_or_default().to_owned(),
		type_code: raw.read(TYPE_CODE, Value::as_i64),
		position: [
			raw.read(LOC_X, Value::as_f64).unwrap_or(0.0),
			raw.read(LOC_Y, Value::as_f64).unwrap_or(0.0),
		],
		size: [dimension(raw, "width", DEFAULT_NODE_WIDTH), dimension(raw, "height", DEFAULT_NODE_HEIGHT)],
		muted: flag & NODE_MUTED != 0,
		inputs: sockets("inputs"),
		outputs: sockets("outputs"),
		referenced_asset,
		image,
		type_properties: type_properties(ctx, raw, &type_name, diagnostics),
		type_name,
	};
	DecodedNode { node, flag }
}

fn dimension(raw: &Record, field: &str, fallback: f64) -> f64 {
	raw.float(field).filter(|value| *value != 0.0).unwrap_or(fallback)
}

fn decode_image(image: &Record) -> ImageInfo {
	let filepath = image
		.read(IMAGE_PATH, |value| value.as_str().filter(|path| !path.is_empty()).map(str::to_owned))
		.or_else(|| image.id_name().map(|name| strip_id_code(name).to_owned()))
		.unwrap_or_default();
	ImageInfo {
		filepath,
		is_packed: image.ptr("packedfile").is_some() || image.ptr("packedfiles.first").is_some(),
		colorspace: image.string("colorspace_settings.name").filter(|name| !name.is_empty()).map(str::to_owned),
	}
}

fn type_properties(ctx: &BlendContext<'_>, raw: &Record, type_name: &str, diagnostics: &mut Diagnostics) -> Option<TypeProperties> {
	let mut props = TypeProperties::default();
	let custom = |field: &str| raw.int(field).unwrap_or(0);

	match type_name {
		"ShaderNodeBsdfToon" => {
			props.component = Some(TOON_COMPONENT.resolve(custom("custom1"), diagnostics));
		}
		"ShaderNodeMixRGB" => {
			let options = custom("custom2");
			props.blend_type = Some(MIXRGB_BLEND_TYPE.resolve(custom("custom1"), diagnostics));
			props.use_clamp = Some(options & SHD_MIXRGB_CLAMP != 0);
			props.use_alpha = Some(options & SHD_MIXRGB_USE_ALPHA != 0);
		}
		"ShaderNodeMix" => {
			if let Some(storage) = ctx.deref(raw, STORAGE).filter(|record| record.type_name() == "NodeShaderMix") {
				let enabled = |field: &str| storage.get(field).is_some_and(Value::is_truthy);
				props.blend_type = Some(MIX_BLEND_TYPE.resolve(storage.int("blend_type").unwrap_or(0), diagnostics));
				props.use_clamp = Some(enabled("clamp_result") || enabled("clamp_factor"));
			}
		}
		"ShaderNodeValToRGB" => {
			if let Some(band) = ctx.deref(raw, STORAGE).filter(|record| record.type_name() == "ColorBand") {
				props.ramp_settings = Some(decode_ramp(&band, diagnostics));
			}
		}
		_ => {}
	}

	(!props.is_empty()).then_some(props)
}

/// Decode a `ColorBand` into settings and its first `tot` stops.
pub fn decode_ramp(band: &Record, diagnostics: &mut Diagnostics) -> GradientRamp {
	let code = |field: &str| band.int(field).unwrap_or(0);
	let interpolation = RAMP_INTERPOLATION.resolve(code("ipotype"), diagnostics);
	let color_mode = RAMP_COLOR_MODE.resolve(code("color_mode"), diagnostics);
	let hue_interpolation = RAMP_HUE_INTERPOLATION.resolve(code("ipotype_hue"), diagnostics);

	let total = usize::try_from(code("tot")).unwrap_or(0);
	let stops = match band.get("data") {
		Some(Value::Array(items)) => items.iter().take(total).filter_map(Value::as_struct).map(ramp_stop).collect(),
		Some(Value::Struct(item)) if total > 0 => vec![ramp_stop(item)],
		_ => Vec::new(),
	};

	GradientRamp {
		interpolation,
		color_mode,
		hue_interpolation,
		stops,
	}
}

fn ramp_stop(data: &StructValue) -> RampStop {
	let channel = |name: &str, fallback: f64| data.field(name).and_then(Value::as_f64).unwrap_or(fallback);
	RampStop {
		position: channel("pos", 0.0),
		rgba: [channel("r", 0.0), channel("g", 0.0), channel("b", 0.0), channel("a", 1.0)],
	}
}
