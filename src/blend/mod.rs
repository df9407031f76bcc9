mod bhead;
mod block;
mod bytes;
mod compression;
mod context;
mod decl;
mod decode;
mod dna;
mod error;
mod file;
mod header;
mod path;
mod pointer;
mod record;
mod value;
mod walk;

/// Parsed block header record.
pub use bhead::BHead;
/// Block container and iterator types.
pub use block::{Block, BlockIter};
/// Compression detection result.
pub use compression::Compression;
/// Tolerant read-side view used by extraction.
pub use context::{BlendContext, IdRecords, SkippedBlock};
/// SDNA-driven decoding entry points and options.
pub use decode::{DecodeOptions, decode_ptr_instance, decode_struct_instance};
/// SDNA schema representation.
pub use dna::{Dna, DnaField, DnaStruct};
/// Error and result aliases.
pub use error::{BlendError, Result};
/// File abstraction.
pub use file::BlendFile;
/// File header representation.
pub use header::{BlendHeader, Endianness};
/// Field path parser types.
pub use path::{FieldPath, PathStep};
/// Pointer index and resolution types.
pub use pointer::{PointerIndex, PtrEntry, ResolvedPtr, TypedResolvedPtr};
/// Decoded element records and field fallback chains.
pub use record::{FieldChain, Record};
/// Decoded runtime value types.
pub use value::{FieldValue, StructValue, Value};
/// Linked-list walk types and entry points.
pub use walk::{WalkOptions, WalkResult, WalkStop, WalkStopReason, walk_list};
