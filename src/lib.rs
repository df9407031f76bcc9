//! Material and shader node graph extraction for Blender `.blend` files.
//!
//! [`blend`] reads the container, SDNA schema, and address-keyed records.
//! [`export`] walks materials and node trees into a versioned JSON document.

/// Blend container parsing, SDNA decoding, and record access.
pub mod blend;
/// Material snapshot extraction and serialization.
pub mod export;
