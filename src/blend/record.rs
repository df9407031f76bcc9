use crate::blend::{FieldPath, StructValue, Value};

/// One decoded struct element together with the address it was stored at.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	/// Canonical stored address of the element.
	pub addr: u64,
	/// Code of the owning block (`MA\0\0`, `DATA`, ...).
	pub code: [u8; 4],
	/// Decoded element.
	pub value: StructValue,
}

/// Ordered candidate field paths for one logical field.
///
/// Blender renames and moves fields between versions; readers try each
/// candidate in order and keep the first that is present.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain(&'static [&'static str]);

impl FieldChain {
	/// Chain over the given candidate paths, most preferred first.
	pub const fn new(candidates: &'static [&'static str]) -> Self {
		Self(candidates)
	}

	/// Return the first candidate for which `attempt` succeeds.
	pub fn first<T>(&self, mut attempt: impl FnMut(&str) -> Option<T>) -> Option<T> {
		self.0.iter().find_map(|candidate| attempt(candidate))
	}
}

impl Record {
	/// SDNA struct type name of the element.
	pub fn type_name(&self) -> &str {
		&self.value.type_name
	}

	/// Look up a field by dotted path; `None` when any step is absent.
	pub fn get(&self, path: &str) -> Option<&Value> {
		let path = FieldPath::parse(path).ok()?;
		let mut steps = path.steps.iter();
		let first = match steps.next()? {
			crate::blend::PathStep::Field(name) => self.value.field(name)?,
			crate::blend::PathStep::Index(_) => return None,
		};
		let rest = FieldPath {
			steps: steps.cloned().collect(),
		};
		first.lookup(&rest)
	}

	/// Read the first present candidate of `chain` through `convert`.
	pub fn read<T>(&self, chain: FieldChain, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
		chain.first(|path| self.get(path).and_then(&convert))
	}

	/// Integer field.
	pub fn int(&self, path: &str) -> Option<i64> {
		self.get(path).and_then(Value::as_i64)
	}

	/// Float field, widened to `f64`.
	pub fn float(&self, path: &str) -> Option<f64> {
		self.get(path).and_then(Value::as_f64)
	}

	/// `char[N]` string field.
	pub fn string(&self, path: &str) -> Option<&str> {
		self.get(path).and_then(Value::as_str)
	}

	/// Non-null pointer field.
	pub fn ptr(&self, path: &str) -> Option<u64> {
		self.get(path).and_then(Value::as_ptr).filter(|ptr| *ptr != 0)
	}

	/// Full `ID.name` (code prefix included) for ID-root elements.
	pub fn id_name(&self) -> Option<&str> {
		self.string("id.name")
	}
}
