use crate::blend::{FieldPath, PathStep};

/// Decoded runtime value of one SDNA field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Zero-sized or undecodable storage.
	Null,
	/// C `bool`.
	Bool(bool),
	/// Signed integer of any width.
	I64(i64),
	/// Unsigned integer of any width.
	U64(u64),
	/// `float`.
	F32(f32),
	/// `double`.
	F64(f64),
	/// Bytes of an unrecognized primitive.
	Bytes(Vec<u8>),
	/// `char[N]` decoded up to the first NUL.
	String(Box<str>),
	/// Raw stored address.
	Ptr(u64),
	/// Inline array.
	Array(Vec<Value>),
	/// Nested struct.
	Struct(StructValue),
}

/// Decoded struct instance.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// SDNA struct type name.
	pub type_name: Box<str>,
	/// Fields in declaration order.
	pub fields: Vec<FieldValue>,
}

/// One named field of a decoded struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier without pointer or array decoration.
	pub name: Box<str>,
	/// Decoded value.
	pub value: Value,
}

impl Value {
	/// Integer view; floats and pointers are not coerced.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			Self::U64(value) => i64::try_from(*value).ok(),
			Self::Bool(value) => Some(i64::from(*value)),
			_ => None,
		}
	}

	/// Floating point view, widening integers.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::F32(value) => Some(f64::from(*value)),
			Self::F64(value) => Some(*value),
			Self::I64(value) => Some(*value as f64),
			Self::U64(value) => Some(*value as f64),
			_ => None,
		}
	}

	/// String view for decoded `char[N]` fields.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Address view for pointer fields.
	pub fn as_ptr(&self) -> Option<u64> {
		match self {
			Self::Ptr(value) => Some(*value),
			_ => None,
		}
	}

	/// Struct view.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match self {
			Self::Struct(value) => Some(value),
			_ => None,
		}
	}

	/// Truthiness in the C sense: non-zero numbers, non-null pointers, non-empty strings.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(value) => *value,
			Self::I64(value) => *value != 0,
			Self::U64(value) | Self::Ptr(value) => *value != 0,
			Self::F32(value) => *value != 0.0,
			Self::F64(value) => *value != 0.0,
			Self::Bytes(value) => value.iter().any(|byte| *byte != 0),
			Self::String(value) => !value.is_empty(),
			Self::Array(items) => !items.is_empty(),
			Self::Struct(_) => true,
		}
	}

	/// Follow a field path through nested structs and inline arrays.
	pub fn lookup(&self, path: &FieldPath) -> Option<&Value> {
		let mut current = self;
		for step in &path.steps {
			current = match (step, current) {
				(PathStep::Field(name), Self::Struct(item)) => item.field(name)?,
				(PathStep::Index(index), Self::Array(items)) => items.get(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}
}

impl StructValue {
	/// Find a direct field by identifier.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|candidate| candidate.name.as_ref() == name).map(|field| &field.value)
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldValue, StructValue, Value};
	use crate::blend::FieldPath;

	fn field(name: &str, value: Value) -> FieldValue {
		FieldValue { name: name.into(), value }
	}

	fn sample() -> Value {
		Value::Struct(StructValue {
			type_name: "Image".into(),
			fields: vec![
				field("packedfile", Value::Ptr(0)),
				field(
					"colorspace_settings",
					Value::Struct(StructValue {
						type_name: "ColorManagedColorspaceSettings".into(),
						fields: vec![field("name", Value::String("sRGB".into()))],
					}),
				),
				field("gen_color", Value::Array(vec![Value::F32(0.25), Value::F32(0.5)])),
			],
		})
	}

	#[test]
	fn lookup_walks_nested_structs_and_arrays() {
		let value = sample();
		let path = FieldPath::parse("colorspace_settings.name").expect("path parses");
		assert_eq!(value.lookup(&path).and_then(Value::as_str), Some("sRGB"));

		let path = FieldPath::parse("gen_color[1]").expect("path parses");
		assert_eq!(value.lookup(&path).and_then(Value::as_f64), Some(0.5));
	}

	#[test]
	fn lookup_of_missing_field_is_none() {
		let value = sample();
		let path = FieldPath::parse("filepath").expect("path parses");
		assert!(value.lookup(&path).is_none());

		let path = FieldPath::parse("gen_color[7]").expect("path parses");
		assert!(value.lookup(&path).is_none());
	}

	#[test]
	fn truthiness_matches_c_semantics() {
		assert!(!Value::Ptr(0).is_truthy());
		assert!(Value::Ptr(0x10).is_truthy());
		assert!(!Value::I64(0).is_truthy());
		assert!(!Value::String("".into()).is_truthy());
		assert!(Value::F32(0.5).is_truthy());
	}
}
