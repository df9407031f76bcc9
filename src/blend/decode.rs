use crate::blend::bytes::Cursor;
use crate::blend::decl::{FieldDecl, parse_field_decl};
use crate::blend::value::{FieldValue, StructValue, Value};
use crate::blend::{BlendError, Dna, Endianness, PointerIndex, Result};

/// Runtime limits and behavior switches for SDNA decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum recursive struct nesting depth.
	pub max_depth: u32,
	/// Maximum allowed array element count.
	pub max_array_elems: usize,
	/// Keep padding-like fields instead of skipping them.
	pub include_padding: bool,
	/// Convert `char[N]` fields to strings when possible.
	pub decode_char_arrays_as_string: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 16,
			max_array_elems: 4096,
			include_padding: false,
			decode_char_arrays_as_string: true,
		}
	}
}

/// Decode one struct instance from raw bytes using SDNA index.
pub fn decode_struct_instance(dna: &Dna, sdna_nr: u32, bytes: &[u8], opt: &DecodeOptions) -> Result<StructValue> {
	decode_struct_impl(dna, sdna_nr, bytes, opt, 0)
}

/// Resolve a pointer and decode the struct element it lands in.
///
/// Returns the canonical element address together with the decoded value.
pub fn decode_ptr_instance(dna: &Dna, index: &PointerIndex<'_>, ptr: u64, opt: &DecodeOptions) -> Result<(u64, StructValue)> {
	let typed = index.resolve_typed(dna, ptr).ok_or(BlendError::UnresolvedPtr { ptr })?;
	let element_index = typed.element_index.ok_or(BlendError::PtrOutOfBounds { ptr })?;
	let payload = typed.base.payload();

	let oob = |start: usize| BlendError::SliceOob {
		start,
		size: typed.struct_size,
		payload: payload.len(),
	};
	let start = element_index.checked_mul(typed.struct_size).ok_or_else(|| oob(usize::MAX))?;
	let end = start.checked_add(typed.struct_size).ok_or_else(|| oob(start))?;
	let bytes = payload.get(start..end).ok_or_else(|| oob(start))?;

	let value = decode_struct_instance(dna, typed.base.entry.block.head.sdna_nr, bytes, opt)?;
	Ok((typed.base.entry.start_old + start as u64, value))
}

fn decode_struct_impl(dna: &Dna, sdna_nr: u32, bytes: &[u8], opt: &DecodeOptions, depth: u32) -> Result<StructValue> {
	if depth >= opt.max_depth {
		return Err(BlendError::DecodeDepthExceeded { max_depth: opt.max_depth });
	}

	let item = dna.struct_by_sdna(sdna_nr).ok_or(BlendError::DecodeMissingSdna { sdna_nr })?;

	let mut cursor = Cursor::new(bytes);
	let mut fields = Vec::with_capacity(item.fields.len());

	for field in &item.fields {
		let type_name = dna.type_name(field.type_idx);
		let decl = parse_field_decl(dna.field_name(field.name_idx));

		if !opt.include_padding && is_padding_field(decl.ident, type_name, decl.inline_array) {
			skip_field_storage(&mut cursor, dna, type_name, field.type_idx, &decl)?;
			continue;
		}

		let value = decode_field_value(&mut cursor, dna, field.type_idx, type_name, &decl, opt, depth + 1)?;
		fields.push(FieldValue {
			name: decl.ident.to_owned().into_boxed_str(),
			value,
		});
	}

	Ok(StructValue {
		type_name: dna.type_name(item.type_idx).to_owned().into_boxed_str(),
		fields,
	})
}

fn decode_field_value(
	cursor: &mut Cursor<'_>,
	dna: &Dna,
	field_type_idx: u16,
	type_name: &str,
	decl: &FieldDecl<'_>,
	opt: &DecodeOptions,
	depth: u32,
) -> Result<Value> {
	let element_count = decl.inline_array;
	if element_count == 0 {
		return Ok(Value::Array(Vec::new()));
	}
	if element_count > opt.max_array_elems {
		return Err(BlendError::DecodeArrayTooLarge {
			count: element_count,
			max: opt.max_array_elems,
		});
	}

	if decl.ptr_depth > 0 || decl.is_func_ptr {
		return collect(element_count, || Ok(Value::Ptr(cursor.read_ptr(dna.pointer_size, dna.endianness)?)));
	}

	let size = usize::from(dna.tlen.get(field_type_idx as usize).copied().unwrap_or(0));
	if let Some(sdna_idx) = dna.struct_for_type.get(field_type_idx as usize).copied().flatten() {
		if size == 0 {
			return Ok(Value::Null);
		}
		return collect(element_count, || {
			let bytes = cursor.read_exact(size)?;
			Ok(Value::Struct(decode_struct_impl(dna, sdna_idx, bytes, opt, depth)?))
		});
	}

	if opt.decode_char_arrays_as_string && type_name == "char" && element_count > 1 {
		let bytes = cursor.read_exact(element_count)?;
		let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
		return Ok(Value::String(String::from_utf8_lossy(&bytes[..end]).into_owned().into_boxed_str()));
	}

	collect(element_count, || Ok(decode_primitive(type_name, cursor.read_exact(size)?, dna.endianness)))
}

/// Read `count` values; a single element collapses to the bare value.
fn collect(count: usize, mut read: impl FnMut() -> Result<Value>) -> Result<Value> {
	let mut values = Vec::with_capacity(count);
	for _ in 0..count {
		values.push(read()?);
	}
	if count == 1 {
		Ok(values.pop().unwrap_or(Value::Null))
	} else {
		Ok(Value::Array(values))
	}
}

fn decode_primitive(type_name: &str, bytes: &[u8], endianness: Endianness) -> Value {
	let mut buf = [0_u8; 8];
	let width = bytes.len();
	if width == 0 || width > 8 {
		return Value::Bytes(bytes.to_vec());
	}
	match endianness {
		Endianness::Little => buf[..width].copy_from_slice(bytes),
		Endianness::Big => {
			for (slot, byte) in buf.iter_mut().zip(bytes.iter().rev()) {
				*slot = *byte;
			}
		}
	}
	let raw = u64::from_le_bytes(buf);

	match (type_name, width) {
		("float", 4) => Value::F32(f32::from_bits(raw as u32)),
		("double", 8) => Value::F64(f64::from_bits(raw)),
		("bool", 1) => Value::Bool(raw != 0),
		(_, 1 | 2 | 4 | 8) => decode_int(type_name, raw, width as u32 * 8),
		_ => Value::Bytes(bytes.to_vec()),
	}
}

fn decode_int(type_name: &str, value: u64, bits: u32) -> Value {
	if is_unsigned_type(type_name) {
		return Value::U64(value);
	}

	let signed = match bits {
		8 => (value as i8) as i64,
		16 => (value as i16) as i64,
		32 => (value as i32) as i64,
		_ => value as i64,
	};
	Value::I64(signed)
}

fn is_unsigned_type(type_name: &str) -> bool {
	type_name.starts_with('u') || type_name.contains("uint") || type_name.contains("uchar")
}

fn skip_field_storage(cursor: &mut Cursor<'_>, dna: &Dna, type_name: &str, field_type_idx: u16, decl: &FieldDecl<'_>) -> Result<()> {
	let count = decl.inline_array;
	if count == 0 {
		return Ok(());
	}
	let element_size = if decl.ptr_depth > 0 || decl.is_func_ptr {
		dna.pointer_size
	} else if type_name == "void" {
		1
	} else {
		let size = usize::from(dna.tlen.get(field_type_idx as usize).copied().unwrap_or(0));
		if size == 0 { 1 } else { size }
	};
	let _ = cursor.read_exact(element_size.saturating_mul(count))?;
	Ok(())
}

fn is_padding_field(ident: &str, type_name: &str, inline_array: usize) -> bool {
	(ident.starts_with("_pad") || ident.starts_with("pad")) && inline_array > 0 && matches!(type_name, "char" | "uchar" | "uint8_t")
}

#[cfg(test)]
mod tests {
	use super::{DecodeOptions, decode_struct_instance};
	use crate::blend::{Dna, DnaField, DnaStruct, Endianness, Value};

	fn socket_value_dna(endianness: Endianness, pointer_size: usize) -> Dna {
		let ptr = pointer_size as u16;
		Dna {
			names: vec!["subtype".into(), "value[3]".into(), "*next".into(), "_pad[4]".into(), "name[8]".into()],
			types: vec!["int".into(), "float".into(), "char".into(), "Probe".into()],
			tlen: vec![4, 4, 1, 4 + 12 + ptr + 4 + 8],
			structs: vec![DnaStruct {
				type_idx: 3,
				fields: vec![
					DnaField { type_idx: 0, name_idx: 0 },
					DnaField { type_idx: 1, name_idx: 1 },
					DnaField { type_idx: 3, name_idx: 2 },
					DnaField { type_idx: 2, name_idx: 3 },
					DnaField { type_idx: 2, name_idx: 4 },
				],
			}],
			struct_for_type: vec![None, None, None, Some(0)],
			endianness,
			pointer_size,
		}
	}

	#[test]
	fn decodes_little_endian_fields_and_skips_padding() {
		let dna = socket_value_dna(Endianness::Little, 8);
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&(-3_i32).to_le_bytes());
		for value in [0.25_f32, 0.5, 1.0] {
			bytes.extend_from_slice(&value.to_le_bytes());
		}
		bytes.extend_from_slice(&0x4000_u64.to_le_bytes());
		bytes.extend_from_slice(&[0xFF; 4]);
		bytes.extend_from_slice(b"Probe\0\0\0");

		let value = decode_struct_instance(&dna, 0, &bytes, &DecodeOptions::default()).expect("decodes");
		assert_eq!(value.type_name.as_ref(), "Probe");
		assert_eq!(value.field("subtype"), Some(&Value::I64(-3)));
		assert_eq!(value.field("value"), Some(&Value::Array(vec![Value::F32(0.25), Value::F32(0.5), Value::F32(1.0)])));
		assert_eq!(value.field("next"), Some(&Value::Ptr(0x4000)));
		assert!(value.field("_pad").is_none());
		assert_eq!(value.field("name").and_then(Value::as_str), Some("Probe"));
	}

	#[test]
	fn decodes_big_endian_with_narrow_pointers() {
		let dna = socket_value_dna(Endianness::Big, 4);
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&7_i32.to_be_bytes());
		for value in [2.0_f32, 4.0, 8.0] {
			bytes.extend_from_slice(&value.to_be_bytes());
		}
		bytes.extend_from_slice(&0x1234_u32.to_be_bytes());
		bytes.extend_from_slice(&[0; 4]);
		bytes.extend_from_slice(b"Big\0\0\0\0\0");

		let value = decode_struct_instance(&dna, 0, &bytes, &DecodeOptions::default()).expect("decodes");
		assert_eq!(value.field("subtype"), Some(&Value::I64(7)));
		assert_eq!(value.field("value"), Some(&Value::Array(vec![Value::F32(2.0), Value::F32(4.0), Value::F32(8.0)])));
		assert_eq!(value.field("next"), Some(&Value::Ptr(0x1234)));
	}

	#[test]
	fn truncated_payload_is_an_error() {
		let dna = socket_value_dna(Endianness::Little, 8);
		assert!(decode_struct_instance(&dna, 0, &[0_u8; 6], &DecodeOptions::default()).is_err());
	}
}
