use crate::blend::bytes::Cursor;
use crate::blend::{BlendError, Endianness, Result};

/// Parsed SDNA schema tables.
#[derive(Debug)]
pub struct Dna {
	/// Field name strings from `NAME`.
	pub names: Vec<Box<str>>,
	/// Type name strings from `TYPE`.
	pub types: Vec<Box<str>>,
	/// Type byte sizes from `TLEN`.
	pub tlen: Vec<u16>,
	/// Struct declarations from `STRC`.
	pub structs: Vec<DnaStruct>,
	/// Fast mapping `type_idx -> sdna_struct_idx`.
	pub struct_for_type: Vec<Option<u32>>,
	/// Byte order of every value described by these tables.
	pub endianness: Endianness,
	/// Width of pointer fields in bytes.
	pub pointer_size: usize,
}

/// One struct declaration from SDNA.
#[derive(Debug)]
pub struct DnaStruct {
	/// Type index for this struct's name.
	pub type_idx: u16,
	/// Field declarations in source order.
	pub fields: Vec<DnaField>,
}

/// One SDNA field declaration.
#[derive(Debug, Clone, Copy)]
pub struct DnaField {
	/// Type table index for field type.
	pub type_idx: u16,
	/// Name table index for field declarator text.
	pub name_idx: u16,
}

impl Dna {
	/// Parse `DNA1` payload bytes into SDNA tables.
	pub fn parse(payload: &[u8], endianness: Endianness, pointer_size: usize) -> Result<Self> {
		let mut cursor = Cursor::new(payload);

		expect_tag(&mut cursor, *b"SDNA")?;
		expect_tag(&mut cursor, *b"NAME")?;

		let name_count = cursor.read_u32(endianness)? as usize;
		let mut names = Vec::with_capacity(name_count.min(payload.len()));
		for _ in 0..name_count {
			names.push(read_lossy_string(&mut cursor)?);
		}
		cursor.align4()?;

		expect_tag(&mut cursor, *b"TYPE")?;
		let type_count = cursor.read_u32(endianness)? as usize;
		let mut types = Vec::with_capacity(type_count.min(payload.len()));
		for _ in 0..type_count {
			types.push(read_lossy_string(&mut cursor)?);
		}
		cursor.align4()?;

		expect_tag(&mut cursor, *b"TLEN")?;
		let mut tlen = Vec::with_capacity(type_count.min(payload.len()));
		for _ in 0..type_count {
			tlen.push(cursor.read_u16(endianness)?);
		}
		cursor.align4()?;

		expect_tag(&mut cursor, *b"STRC")?;
		let struct_count = cursor.read_u32(endianness)? as usize;
		let mut structs = Vec::with_capacity(struct_count.min(payload.len()));

		for _ in 0..struct_count {
			let type_idx = cursor.read_u16(endianness)?;
			check_index("struct.type_idx", u32::from(type_idx), types.len())?;

			let field_count = cursor.read_u16(endianness)? as usize;
			let mut fields = Vec::with_capacity(field_count);
			for _ in 0..field_count {
				let field_type_idx = cursor.read_u16(endianness)?;
				let field_name_idx = cursor.read_u16(endianness)?;
				check_index("field.type_idx", u32::from(field_type_idx), types.len())?;
				check_index("field.name_idx", u32::from(field_name_idx), names.len())?;
				fields.push(DnaField {
					type_idx: field_type_idx,
					name_idx: field_name_idx,
				});
			}

			structs.push(DnaStruct { type_idx, fields });
		}

		let mut struct_for_type = vec![None; types.len()];
		for (idx, item) in structs.iter().enumerate() {
			let slot = &mut struct_for_type[item.type_idx as usize];
			if let Some(first) = *slot {
				return Err(BlendError::DnaDuplicateStructType {
					type_idx: item.type_idx,
					first,
					second: idx as u32,
				});
			}
			*slot = Some(idx as u32);
		}

		Ok(Self {
			names,
			types,
			tlen,
			structs,
			struct_for_type,
			endianness,
			pointer_size,
		})
	}

	/// Look up struct declaration by SDNA struct index.
	pub fn struct_by_sdna(&self, sdna_nr: u32) -> Option<&DnaStruct> {
		self.structs.get(sdna_nr as usize)
	}

	/// Return the struct type name for an SDNA struct index.
	pub fn struct_name(&self, sdna_nr: u32) -> Option<&str> {
		self.struct_by_sdna(sdna_nr).map(|item| self.type_name(item.type_idx))
	}

	/// Return the byte size of one SDNA struct instance.
	pub fn struct_size(&self, sdna_nr: u32) -> Option<usize> {
		let item = self.struct_by_sdna(sdna_nr)?;
		self.tlen.get(item.type_idx as usize).map(|len| usize::from(*len))
	}

	/// Find the SDNA struct index for a struct type name.
	pub fn sdna_for_name(&self, name: &str) -> Option<u32> {
		let type_idx = self.types.iter().position(|item| item.as_ref() == name)?;
		self.struct_for_type.get(type_idx).copied().flatten()
	}

	/// Return type name by type index.
	pub fn type_name(&self, type_idx: u16) -> &str {
		self.types.get(type_idx as usize).map(|item| item.as_ref()).unwrap_or("<unknown>")
	}

	/// Return field name/declarator by name index.
	pub fn field_name(&self, name_idx: u16) -> &str {
		self.names.get(name_idx as usize).map(|item| item.as_ref()).unwrap_or("<unknown>")
	}
}

fn expect_tag(cursor: &mut Cursor<'_>, expected: [u8; 4]) -> Result<()> {
	let at = cursor.pos();
	let got = cursor.read_code4()?;
	if got != expected {
		return Err(BlendError::DnaBadTag { expected, got, at });
	}
	Ok(())
}

fn read_lossy_string(cursor: &mut Cursor<'_>) -> Result<Box<str>> {
	let bytes = cursor.read_cstring_bytes()?;
	Ok(String::from_utf8_lossy(bytes).into_owned().into_boxed_str())
}

fn check_index(kind: &'static str, idx: u32, len: usize) -> Result<()> {
	if (idx as usize) >= len {
		return Err(BlendError::DnaIndexOutOfRange {
			kind,
			idx,
			max: len.saturating_sub(1) as u32,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::Dna;
	use crate::blend::{BlendError, Endianness};

	fn sdna_payload(endianness: Endianness) -> Vec<u8> {
		let u32b = |value: u32| match endianness {
			Endianness::Little => value.to_le_bytes(),
			Endianness::Big => value.to_be_bytes(),
		};
		let u16b = |value: u16| match endianness {
			Endianness::Little => value.to_le_bytes(),
			Endianness::Big => value.to_be_bytes(),
		};

		let mut out = Vec::new();
		out.extend_from_slice(b"SDNANAME");
		out.extend_from_slice(&u32b(2));
		out.extend_from_slice(b"*next\0value\0");
		out.extend_from_slice(b"TYPE");
		out.extend_from_slice(&u32b(2));
		out.extend_from_slice(b"float\0Link\0");
		while out.len() % 4 != 0 {
			out.push(0);
		}
		out.extend_from_slice(b"TLEN");
		out.extend_from_slice(&u16b(4));
		out.extend_from_slice(&u16b(16));
		out.extend_from_slice(b"STRC");
		out.extend_from_slice(&u32b(1));
		out.extend_from_slice(&u16b(1));
		out.extend_from_slice(&u16b(2));
		out.extend_from_slice(&u16b(1));
		out.extend_from_slice(&u16b(0));
		out.extend_from_slice(&u16b(0));
		out.extend_from_slice(&u16b(1));
		out
	}

	#[test]
	fn parses_little_endian_tables() {
		let dna = Dna::parse(&sdna_payload(Endianness::Little), Endianness::Little, 8).expect("sdna parses");
		assert_eq!(dna.names.len(), 2);
		assert_eq!(dna.type_name(1), "Link");
		assert_eq!(dna.tlen, vec![4, 16]);
		assert_eq!(dna.sdna_for_name("Link"), Some(0));
		assert_eq!(dna.struct_name(0), Some("Link"));
		assert_eq!(dna.struct_size(0), Some(16));
		assert_eq!(dna.sdna_for_name("float"), None);
	}

	#[test]
	fn parses_big_endian_tables() {
		let dna = Dna::parse(&sdna_payload(Endianness::Big), Endianness::Big, 4).expect("sdna parses");
		assert_eq!(dna.tlen, vec![4, 16]);
		assert_eq!(dna.structs[0].fields.len(), 2);
		assert_eq!(dna.pointer_size, 4);
	}

	#[test]
	fn rejects_bad_leading_tag() {
		let err = Dna::parse(b"XXXXNAME", Endianness::Little, 8).expect_err("bad tag");
		assert!(matches!(err, BlendError::DnaBadTag { at: 0, .. }));
	}
}
