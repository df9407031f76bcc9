use std::fs;
use std::path::Path;

use crate::blend::compression::decode_bytes;
use crate::blend::{BlendError, BlendHeader, Block, BlockIter, Compression, Dna, PointerIndex, Result};

/// Opened blend container with decoded bytes and parsed header.
pub struct BlendFile {
	/// Parsed file header.
	pub header: BlendHeader,
	/// Compression mode detected for source bytes.
	pub compression: Compression,
	bytes: Vec<u8>,
	blocks_offset: usize,
}

impl BlendFile {
	/// Read, decode, and parse a blend file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_bytes(fs::read(path)?)
	}

	/// Decode and parse an in-memory blend stream.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		let header = BlendHeader::parse(&bytes)?;
		if header.header_size > bytes.len() {
			return Err(BlendError::InvalidHeader);
		}

		Ok(Self {
			header,
			compression,
			bytes,
			blocks_offset: header.header_size,
		})
	}

	/// Iterate all blocks starting at header-defined offset.
	pub fn blocks(&self) -> BlockIter<'_> {
		BlockIter::new(&self.bytes, self.blocks_offset, self.header)
	}

	/// Parse and return the first `DNA1` block as SDNA tables.
	pub fn dna(&self) -> Result<Dna> {
		let block = self.find_first_block_by_code(*b"DNA1")?.ok_or(BlendError::DnaNotFound)?;
		Dna::parse(block.payload, self.header.endianness, self.header.pointer_size)
	}

	/// Find the first block matching a four-byte code.
	pub fn find_first_block_by_code(&self, code: [u8; 4]) -> Result<Option<Block<'_>>> {
		for block in self.blocks() {
			let block = block?;
			if block.head.code == code {
				return Ok(Some(block));
			}
		}
		Ok(None)
	}

	/// Build an index for stored-address resolution.
	pub fn pointer_index(&self) -> Result<PointerIndex<'_>> {
		PointerIndex::build(self)
	}
}
