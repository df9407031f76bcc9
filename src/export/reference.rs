use crate::blend::{BlendContext, Record};
use crate::export::IdRef;

/// Resolve an address to the ID record that owns it.
///
/// `None` for null, unindexed, or non-ID targets.
pub fn resolve_ref(ctx: &BlendContext<'_>, addr: u64) -> Option<IdRef> {
	let record = ctx.record_at(addr)?;
	id_ref(&record)
}

/// `{code, name}` of an ID record.
pub fn id_ref(record: &Record) -> Option<IdRef> {
	let full = record.id_name()?;
	let code = full.get(..2)?;
	Some(IdRef {
		code: code.to_owned(),
		name: strip_id_code(full).to_owned(),
	})
}

/// Display name of an ID record, `<unknown>` when it has none.
pub fn display_name(record: &Record) -> String {
	record.id_name().map(strip_id_code).unwrap_or("<unknown>").to_owned()
}

/// Drop the two-letter ID code from a stored ID name.
pub fn strip_id_code(full: &str) -> &str {
	full.get(2..).unwrap_or("")
}
