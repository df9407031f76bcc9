/// Parsed SDNA field declarator details.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldDecl<'a> {
	/// Identifier portion of the declarator.
	pub ident: &'a str,
	/// Pointer nesting depth (`*`, `**`, ...).
	pub ptr_depth: u8,
	/// Flattened inline array element count.
	pub inline_array: usize,
	/// Whether declarator looks like a function pointer.
	pub is_func_ptr: bool,
}

/// Parse SDNA declarator text (`*next`, `data[32]`, `(*execfunc)()`) into layout metadata.
pub(crate) fn parse_field_decl(raw: &str) -> FieldDecl<'_> {
	let trimmed = raw.trim();
	let mut decl = FieldDecl {
		ident: trimmed,
		ptr_depth: 0,
		inline_array: 1,
		is_func_ptr: trimmed.contains(")("),
	};

	if let Some(start) = trimmed.find("(*") {
		let after = &trimmed[start + 2..];
		if let Some(close_idx) = after.find(')') {
			let inside = &after[..close_idx];
			let stars = inside.chars().take_while(|c| *c == '*').count();
			decl.ptr_depth = (stars as u8).saturating_add(1);
			let ident = inside.trim_start_matches('*').trim();
			if !ident.is_empty() {
				decl.ident = ident;
			}
			return decl;
		}
	}

	let stars = trimmed.chars().take_while(|c| *c == '*').count();
	decl.ptr_depth = stars as u8;
	let tail = &trimmed[stars..];

	let ident_end = tail.find('[').unwrap_or(tail.len());
	let ident = tail[..ident_end].trim();
	if !ident.is_empty() {
		decl.ident = ident;
	}

	if !decl.is_func_ptr {
		let mut dims = &tail[ident_end..];
		let mut total = 1_usize;
		while let Some(start) = dims.find('[') {
			let Some(end) = dims[start + 1..].find(']') else {
				break;
			};
			let end = start + 1 + end;
			let dim = dims[start + 1..end].trim().parse::<usize>().unwrap_or(1);
			total = total.saturating_mul(dim);
			dims = &dims[end + 1..];
		}
		decl.inline_array = total;
	}

	decl
}

#[cfg(test)]
mod tests {
	use super::parse_field_decl;

	#[test]
	fn plain_pointer_field() {
		let decl = parse_field_decl("*default_value");
		assert_eq!(decl.ident, "default_value");
		assert_eq!(decl.ptr_depth, 1);
		assert_eq!(decl.inline_array, 1);
	}

	#[test]
	fn inline_arrays_are_flattened() {
		assert_eq!(parse_field_decl("data[32]").inline_array, 32);
		assert_eq!(parse_field_decl("mat[4][4]").inline_array, 16);
		assert_eq!(parse_field_decl("weights[0]").inline_array, 0);
		assert_eq!(parse_field_decl("location[2]").ident, "location");
	}

	#[test]
	fn function_pointers_are_pointers() {
		let decl = parse_field_decl("(*execfunc)()");
		assert!(decl.is_func_ptr);
		assert_eq!(decl.ptr_depth, 1);
		assert_eq!(decl.ident, "execfunc");
	}
}
