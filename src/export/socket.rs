use crate::blend::{BlendContext, FieldChain, Record, Value};
use crate::export::enums::{SOCKET_DIRECTION, SOCKET_SUBTYPE, SOCKET_TYPE_SUBTYPE};
use crate::export::links::LinkTopology;
use crate::export::{Direction, Socket};

const DEFAULT_VALUE: FieldChain = FieldChain::new(&["default_value"]);
const SOFT_MIN: FieldChain = FieldChain::new(&["soft_min", "softmin"]);
const SOFT_MAX: FieldChain = FieldChain::new(&["soft_max", "softmax"]);

/// Decode one `bNodeSocket`. Never fails; absent bounds are omitted.
pub fn decode_socket(ctx: &BlendContext<'_>, raw: &Record, topology: &LinkTopology) -> Socket {
	let type_code = raw.int("type");
	let default = ctx.deref(raw, DEFAULT_VALUE);
	let json = |chain: FieldChain| default.as_ref().and_then(|value| value.read(chain, |value| Some(to_json(value))));

	Socket {
		ptr: raw.addr,
		name: raw.string("name").unwrap_or_default().to_owned(),
		identifier: raw.string("identifier").unwrap_or_default().to_owned(),
		type_code,
		subtype: subtype_name(type_code, default.as_ref().and_then(|value| value.int("subtype"))),
		direction: direction(raw),
		is_linked: topology.is_linked(raw.addr),
		link_count: topology.link_count(raw.addr),
		default_value: json(FieldChain::new(&["value"])),
		min: json(FieldChain::new(&["min"])),
		max: json(FieldChain::new(&["max"])),
		soft_min: json(SOFT_MIN),
		soft_max: json(SOFT_MAX),
	}
}

/// Explicit subtype when known, else the socket type's default, else `UNKNOWN`.
pub fn subtype_name(type_code: Option<i64>, subtype_code: Option<i64>) -> String {
	subtype_code
		.and_then(|code| SOCKET_SUBTYPE.name(code))
		.or_else(|| type_code.and_then(|code| SOCKET_TYPE_SUBTYPE.name(code)))
		.unwrap_or("UNKNOWN")
		.to_owned()
}

/// `in_out` as a name, or the raw code when unmapped.
pub(crate) fn direction(raw: &Record) -> Option<Direction> {
	let code = raw.int("in_out")?;
	Some(match SOCKET_DIRECTION.name(code) {
		Some(name) => Direction::Named(name),
		None => Direction::Raw(code),
	})
}

/// Convert a decoded field into plain JSON.
pub(crate) fn to_json(value: &Value) -> serde_json::Value {
	use serde_json::Value as Json;

	match value {
		Value::Null => Json::Null,
		Value::Bool(value) => Json::Bool(*value),
		Value::I64(value) => Json::from(*value),
		Value::U64(value) | Value::Ptr(value) => Json::from(*value),
		Value::F32(value) => float(f64::from(*value)),
		Value::F64(value) => float(*value),
		Value::String(value) => Json::String(value.to_string()),
		Value::Bytes(bytes) => {
			let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
			Json::String(String::from_utf8_lossy(&bytes[..end]).into_owned())
		}
		Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
		Value::Struct(item) => Json::Object(item.fields.iter().map(|field| (field.name.to_string(), to_json(&field.value))).collect()),
	}
}

fn float(value: f64) -> serde_json::Value {
	serde_json::Number::from_f64(value).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{subtype_name, to_json};
	use crate::blend::Value;

	#[test]
	fn explicit_subtype_wins_over_type_default() {
		assert_eq!(subtype_name(Some(0), Some(15)), "FACTOR");
		assert_eq!(subtype_name(Some(2), None), "COLOR");
		assert_eq!(subtype_name(Some(0), Some(5)), "FLOAT");
		assert_eq!(subtype_name(Some(42), Some(5)), "UNKNOWN");
		assert_eq!(subtype_name(None, None), "UNKNOWN");
	}

	#[test]
	fn values_convert_to_plain_json() {
		let color = Value::Array(vec![Value::F32(0.5), Value::F32(0.25), Value::F32(0.0), Value::F32(1.0)]);
		assert_eq!(to_json(&color), json!([0.5, 0.25, 0.0, 1.0]));
		assert_eq!(to_json(&Value::I64(-4)), json!(-4));
		assert_eq!(to_json(&Value::String("uv".into())), json!("uv"));
		assert_eq!(to_json(&Value::F32(f32::NAN)), json!(null));
	}
}
