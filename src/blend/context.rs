use crate::blend::walk::{WalkOptions, walk_list};
use crate::blend::{BlendError, BlendFile, DecodeOptions, Dna, FieldChain, PointerIndex, Record, Result, decode_ptr_instance, decode_struct_instance};

/// Result of scanning ID blocks of one code.
#[derive(Debug, Default)]
pub struct IdRecords {
	/// Decoded records in storage order.
	pub records: Vec<Record>,
	/// Blocks that carried the code but did not decode.
	pub skipped: Vec<SkippedBlock>,
}

/// An ID block left out of a scan.
#[derive(Debug)]
pub struct SkippedBlock {
	/// Stored address of the block.
	pub addr: u64,
	/// File offset of the block header.
	pub offset: usize,
	/// Why the block was skipped.
	pub error: BlendError,
}

/// Read-side view over one opened file: schema, address index, and decode limits.
///
/// All lookups are tolerant. Addresses that do not resolve, or elements that
/// fail to decode, read as absent rather than erroring.
pub struct BlendContext<'a> {
	file: &'a BlendFile,
	dna: Dna,
	index: PointerIndex<'a>,
	decode: DecodeOptions,
}

impl<'a> BlendContext<'a> {
	/// Parse the schema and index every addressed block of `file`.
	pub fn new(file: &'a BlendFile) -> Result<Self> {
		let dna = file.dna()?;
		let index = file.pointer_index()?;
		tracing::debug!(structs = dna.structs.len(), blocks = index.len(), "indexed blend file");
		Ok(Self {
			file,
			dna,
			index,
			decode: DecodeOptions::default(),
		})
	}

	/// Decode the element stored at `addr`.
	pub fn record_at(&self, addr: u64) -> Option<Record> {
		if addr == 0 {
			return None;
		}
		let code = self.index.resolve(addr)?.entry.block.head.code;
		match decode_ptr_instance(&self.dna, &self.index, addr, &self.decode) {
			Ok((canonical, value)) => Some(Record { addr: canonical, code, value }),
			Err(err) => {
				tracing::debug!(addr = format_args!("{addr:#x}"), %err, "address did not decode");
				None
			}
		}
	}

	/// Follow the first pointer field of `chain` that resolves to a decodable element.
	pub fn deref(&self, record: &Record, chain: FieldChain) -> Option<Record> {
		chain.first(|path| record.ptr(path).and_then(|addr| self.record_at(addr)))
	}

	/// Elements of the `ListBase` whose `first` pointer is `head`, in list order.
	pub fn walk_list(&self, head: u64) -> Vec<Record> {
		walk_list(self, head, &WalkOptions::default()).items
	}

	/// Every ID-root element with a two-letter code (`MA`, `NT`, ...), in storage order.
	///
	/// Blocks whose first element cannot be decoded are reported in
	/// [`IdRecords::skipped`] instead of failing the scan.
	pub fn records_with_code(&self, code: [u8; 2]) -> Result<IdRecords> {
		let mut scan = IdRecords::default();
		for block in self.file.blocks() {
			let block = block?;
			if block.head.id_code() != Some(code) {
				continue;
			}
			let sdna_nr = block.head.sdna_nr;
			let decoded = self
				.dna
				.struct_size(sdna_nr)
				.ok_or(BlendError::DecodeMissingSdna { sdna_nr })
				.and_then(|size| {
					block.payload.get(..size).ok_or(BlendError::DecodePayloadTooSmall {
						need: size,
						have: block.payload.len(),
					})
				})
				.and_then(|bytes| decode_struct_instance(&self.dna, sdna_nr, bytes, &self.decode));

			match decoded {
				Ok(value) => scan.records.push(Record {
					addr: block.head.old,
					code: block.head.code,
					value,
				}),
				Err(error) => {
					tracing::warn!(offset = block.file_offset, %error, "skipping undecodable ID block");
					scan.skipped.push(SkippedBlock {
						addr: block.head.old,
						offset: block.file_offset,
						error,
					});
				}
			}
		}
		Ok(scan)
	}

	/// `major.minor.subversion` of the Blender build that saved the file.
	///
	/// Subversion comes from the `GLOB` block and reads as `0` when absent.
	pub fn version_string(&self) -> String {
		let (major, minor) = self.file.header.major_minor();
		format!("{major}.{minor}.{}", self.subversion().unwrap_or(0))
	}

	fn subversion(&self) -> Option<i64> {
		let block = self.file.find_first_block_by_code(*b"GLOB").ok()??;
		let size = self.dna.struct_size(block.head.sdna_nr)?;
		let bytes = block.payload.get(..size)?;
		let value = decode_struct_instance(&self.dna, block.head.sdna_nr, bytes, &self.decode).ok()?;
		value.field("subversion").and_then(|value| value.as_i64())
	}
}
