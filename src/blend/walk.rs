use std::collections::HashSet;

use crate::blend::{BlendContext, Record};

/// Stop reason for linked-list walk traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStopReason {
	/// Next pointer was null.
	NullNext,
	/// Next pointer was non-zero but unresolved.
	UnresolvedNext(u64),
	/// Canonical next element was already visited.
	Cycle(u64),
	/// Step limit reached before the list ended.
	StepLimit,
}

/// Stop metadata with traversal step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStop {
	/// Item index where stop occurred.
	pub step: usize,
	/// Structured stop reason.
	pub reason: WalkStopReason,
}

/// Linked-list traversal options.
#[derive(Debug, Clone)]
pub struct WalkOptions {
	/// Field holding the next pointer.
	pub next_field: &'static str,
	/// Maximum number of items to visit.
	pub max_steps: usize,
}

impl Default for WalkOptions {
	fn default() -> Self {
		Self {
			next_field: "next",
			max_steps: 1 << 16,
		}
	}
}

/// Result of walking a `ListBase` chain.
#[derive(Debug, Clone)]
pub struct WalkResult {
	/// Visited elements in list order.
	pub items: Vec<Record>,
	/// Why traversal ended.
	pub stop: WalkStop,
}

/// Walk a pointer chain from `head` by repeatedly following `next_field`.
///
/// Never fails: a null or unresolvable head yields an empty walk, and
/// cycles or dangling links end traversal with the elements seen so far.
pub fn walk_list(ctx: &BlendContext<'_>, head: u64, options: &WalkOptions) -> WalkResult {
	let mut items = Vec::new();
	let mut visited = HashSet::new();
	let stop = |step, reason| WalkStop { step, reason };

	if head == 0 {
		return WalkResult {
			items,
			stop: stop(0, WalkStopReason::NullNext),
		};
	}

	let mut current = head;
	for step in 0..options.max_steps {
		let Some(record) = ctx.record_at(current) else {
			return WalkResult {
				items,
				stop: stop(step, WalkStopReason::UnresolvedNext(current)),
			};
		};
		if !visited.insert(record.addr) {
			return WalkResult {
				items,
				stop: stop(step, WalkStopReason::Cycle(record.addr)),
			};
		}

		let next = record.ptr(options.next_field);
		items.push(record);
		match next {
			Some(next) => current = next,
			None => {
				return WalkResult {
					items,
					stop: stop(step, WalkStopReason::NullNext),
				};
			}
		}
	}

	tracing::debug!(head, max_steps = options.max_steps, "list walk hit step limit");
	WalkResult {
		items,
		stop: stop(options.max_steps, WalkStopReason::StepLimit),
	}
}
