//! Integer enum tables with a uniform unknown-code policy.
//!
//! Codes follow Blender's DNA headers (`DNA_material_types.h`,
//! `DNA_node_types.h`, `DNA_color_types.h`) and RNA `PropertySubType`.

use crate::export::Diagnostics;

/// Mapping from stored integer codes to stable names.
#[derive(Debug, Clone, Copy)]
pub struct EnumTable {
	label: &'static str,
	entries: &'static [(i64, &'static str)],
}

impl EnumTable {
	/// Table named `label` in diagnostics.
	pub const fn new(label: &'static str, entries: &'static [(i64, &'static str)]) -> Self {
		Self { label, entries }
	}

	/// Name for `code`, without recording anything.
	pub fn name(&self, code: i64) -> Option<&'static str> {
		self.entries.iter().find(|(known, _)| *known == code).map(|(_, name)| *name)
	}

	/// Name for `code`, or `UNKNOWN_<code>` plus one diagnostic.
	pub fn resolve(&self, code: i64, diagnostics: &mut Diagnostics) -> String {
		if let Some(name) = self.name(code) {
			return name.to_owned();
		}
		tracing::warn!(label = self.label, code, "unknown enum value");
		diagnostics.push(format!("Unknown {} enum value: {code}", self.label));
		unknown_name(code)
	}
}

/// Placeholder name for an unmapped code.
pub fn unknown_name(code: i64) -> String {
	format!("UNKNOWN_{code}")
}

/// `Material.blend_method`.
pub const BLEND_METHOD: EnumTable = EnumTable::new(
	"Material.blend_method",
	&[(0, "OPAQUE"), (1, "ADD"), (2, "MULTIPLY"), (3, "CLIP"), (4, "HASHED"), (5, "BLEND")],
);

/// `custom1` of `ShaderNodeBsdfToon`.
pub const TOON_COMPONENT: EnumTable = EnumTable::new("ToonBSDF.component", &[(0, "DIFFUSE"), (1, "GLOSSY")]);

const MIX_BLEND_ENTRIES: &[(i64, &str)] = &[
	(0, "MIX"),
	(1, "ADD"),
	(2, "MULTIPLY"),
	(3, "SUBTRACT"),
	(4, "SCREEN"),
	(5, "DIVIDE"),
	(6, "DIFFERENCE"),
	(7, "DARKEN"),
	(8, "LIGHTEN"),
	(9, "OVERLAY"),
	(10, "DODGE"),
	(11, "BURN"),
	(12, "HUE"),
	(13, "SATURATION"),
	(14, "VALUE"),
	(15, "COLOR"),
	(16, "SOFT_LIGHT"),
	(17, "LINEAR_LIGHT"),
	(18, "EXCLUSION"),
];

/// `custom1` of the legacy `ShaderNodeMixRGB`.
pub const MIXRGB_BLEND_TYPE: EnumTable = EnumTable::new("MixRGB.blend_type", MIX_BLEND_ENTRIES);

/// `NodeShaderMix.blend_type` of `ShaderNodeMix`.
pub const MIX_BLEND_TYPE: EnumTable = EnumTable::new("Mix.blend_type", MIX_BLEND_ENTRIES);

/// `ColorBand.ipotype`.
pub const RAMP_INTERPOLATION: EnumTable = EnumTable::new(
	"ColorRamp.interpolation",
	&[(0, "LINEAR"), (1, "EASE"), (2, "B_SPLINE"), (3, "CARDINAL"), (4, "CONSTANT")],
);

/// `ColorBand.color_mode`.
pub const RAMP_COLOR_MODE: EnumTable = EnumTable::new("ColorRamp.color_mode", &[(0, "RGB"), (1, "HSV"), (2, "HSL")]);

/// `ColorBand.ipotype_hue`.
pub const RAMP_HUE_INTERPOLATION: EnumTable = EnumTable::new("ColorRamp.hue_interpolation", &[(0, "NEAR"), (1, "FAR"), (2, "CW"), (3, "CCW")]);

/// `bNodeSocket.in_out`. Lookup only.
pub const SOCKET_DIRECTION: EnumTable = EnumTable::new("Socket.in_out", &[(1, "INPUT"), (2, "OUTPUT")]);

/// RNA `PropertySubType` stored on socket default values. Lookup only.
pub const SOCKET_SUBTYPE: EnumTable = EnumTable::new(
	"Socket.subtype",
	&[
		(0, "NONE"),
		(1, "FILE_PATH"),
		(2, "DIR_PATH"),
		(3, "FILE_NAME"),
		(4, "BYTE_STRING"),
		(6, "PASSWORD"),
		(12, "PIXEL"),
		(13, "UNSIGNED"),
		(14, "PERCENTAGE"),
		(15, "FACTOR"),
		(16, "ANGLE"),
		(17, "TIME"),
		(18, "TIME_ABSOLUTE"),
		(19, "DISTANCE"),
		(20, "DISTANCE_CAMERA"),
		(21, "COLOR"),
		(22, "TRANSLATION"),
		(23, "DIRECTION"),
		(24, "VELOCITY"),
		(25, "ACCELERATION"),
		(26, "MATRIX"),
		(27, "EULER"),
		(28, "QUATERNION"),
		(29, "AXISANGLE"),
		(30, "XYZ"),
		(31, "XYZ_LENGTH"),
		(32, "COLOR_GAMMA"),
		(33, "COORDINATES"),
	],
);

/// Subtype guess from `bNodeSocket.type` when no explicit subtype is stored. Lookup only.
pub const SOCKET_TYPE_SUBTYPE: EnumTable = EnumTable::new(
	"Socket.type",
	&[(0, "FLOAT"), (1, "VECTOR"), (2, "COLOR"), (3, "SHADER"), (4, "BOOLEAN"), (6, "INT"), (7, "STRING")],
);
