/// Append-only sink for recoverable extraction problems.
///
/// One sink is threaded through a material build; parallel runs give each
/// material its own sink and concatenate them in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
	entries: Vec<String>,
}

impl Diagnostics {
	/// Empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one message.
	pub fn push(&mut self, message: impl Into<String>) {
		self.entries.push(message.into());
	}

	/// Append every message of `other`, keeping its order.
	pub fn extend(&mut self, other: Diagnostics) {
		self.entries.extend(other.entries);
	}

	/// Messages in the order they were recorded.
	pub fn entries(&self) -> &[String] {
		&self.entries
	}

	/// Number of recorded messages.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Consume the sink into its messages.
	pub fn into_vec(self) -> Vec<String> {
		self.entries
	}
}
