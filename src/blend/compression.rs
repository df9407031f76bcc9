use std::io::Read;

use crate::blend::{BlendError, Result};

const BLEND_MAGIC: &[u8] = b"BLENDER";
const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
/// zstd frame magic used by compressed `.blend` files (Blender 3.0+).
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
/// gzip member magic used by compressed `.blend` files before Blender 3.0.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compression mode detected for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed stream.
	None,
	/// zstd-compressed stream.
	Zstd,
	/// gzip-compressed stream.
	Gzip,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
			Self::Gzip => "gzip",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(BLEND_MAGIC) {
		return Ok((Compression::None, raw));
	}

	if raw.starts_with(&ZSTD_MAGIC) {
		let decoder = zstd::stream::read::Decoder::new(raw.as_slice())?;
		return Ok((Compression::Zstd, read_bounded(decoder)?));
	}

	if raw.starts_with(&GZIP_MAGIC) {
		let decoder = flate2::read::GzDecoder::new(raw.as_slice());
		return Ok((Compression::Gzip, read_bounded(decoder)?));
	}

	Err(BlendError::UnknownMagic { magic: first4(&raw) })
}

fn read_bounded(mut decoder: impl Read) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(BlendError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	if !out.starts_with(BLEND_MAGIC) {
		return Err(BlendError::NotBlendAfterDecompress);
	}

	Ok(out)
}

fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::{Compression, decode_bytes};
	use crate::blend::BlendError;

	#[test]
	fn raw_stream_passes_through() {
		let (mode, bytes) = decode_bytes(b"BLENDER-v402rest".to_vec()).expect("raw decodes");
		assert_eq!(mode, Compression::None);
		assert_eq!(bytes, b"BLENDER-v402rest");
	}

	#[test]
	fn gzip_stream_is_inflated() {
		let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
		encoder.write_all(b"BLENDER-v279payload").expect("gzip write");
		let packed = encoder.finish().expect("gzip finish");

		let (mode, bytes) = decode_bytes(packed).expect("gzip decodes");
		assert_eq!(mode, Compression::Gzip);
		assert_eq!(mode.as_str(), "gzip");
		assert_eq!(bytes, b"BLENDER-v279payload");
	}

	#[test]
	fn zstd_stream_is_decoded() {
		let packed = zstd::encode_all(&b"BLENDER-v402payload"[..], 3).expect("zstd encode");
		let (mode, bytes) = decode_bytes(packed).expect("zstd decodes");
		assert_eq!(mode, Compression::Zstd);
		assert_eq!(bytes, b"BLENDER-v402payload");
	}

	#[test]
	fn unknown_magic_is_rejected() {
		let err = decode_bytes(b"PK\x03\x04zip".to_vec()).expect_err("zip is not a blend");
		assert!(matches!(err, BlendError::UnknownMagic { magic } if magic == *b"PK\x03\x04"));
	}
}
