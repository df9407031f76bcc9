#![allow(missing_docs)]

use blendmat::blend::{BlendContext, BlendFile, WalkOptions, WalkStopReason, walk_list};
use blendmat_testkit::{BlendBuilder, Field, text};

fn socket(builder: &mut BlendBuilder, addr: u64, name: &str, next: u64) {
	builder.push_at(addr, *b"DATA", "bNodeSocket", vec![("name", text(name)), ("next", Field::Ptr(next))]);
}

#[test]
fn walk_follows_chain_and_stops_on_null() {
	let mut builder = BlendBuilder::new();
	let (a, b, c) = (builder.reserve(), builder.reserve(), builder.reserve());
	socket(&mut builder, a, "A", b);
	socket(&mut builder, b, "B", c);
	socket(&mut builder, c, "C", 0);

	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");
	let walk = walk_list(&ctx, a, &WalkOptions::default());

	let names: Vec<_> = walk.items.iter().filter_map(|item| item.string("name")).collect();
	assert_eq!(names, ["A", "B", "C"]);
	assert_eq!(walk.stop.reason, WalkStopReason::NullNext);
	assert_eq!(walk.stop.step, 2);
}

#[test]
fn walk_stops_on_cycle_without_repeating() {
	let mut builder = BlendBuilder::new();
	let (a, b) = (builder.reserve(), builder.reserve());
	socket(&mut builder, a, "A", b);
	socket(&mut builder, b, "B", a);

	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");
	let walk = walk_list(&ctx, a, &WalkOptions::default());

	assert_eq!(walk.items.len(), 2);
	assert_eq!(walk.stop.reason, WalkStopReason::Cycle(a));
}

#[test]
fn null_and_dangling_heads_yield_empty_lists() {
	let mut builder = BlendBuilder::new();
	let a = builder.reserve();
	socket(&mut builder, a, "A", 0xDEAD_0000);

	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");

	assert!(ctx.walk_list(0).is_empty());
	assert!(ctx.walk_list(0x0BAD_0000).is_empty());

	let walk = walk_list(&ctx, a, &WalkOptions::default());
	assert_eq!(walk.items.len(), 1);
	assert_eq!(walk.stop.reason, WalkStopReason::UnresolvedNext(0xDEAD_0000));
}

#[test]
fn step_limit_bounds_long_lists() {
	let mut builder = BlendBuilder::new();
	let addrs: Vec<u64> = (0..5).map(|_| builder.reserve()).collect();
	for (idx, addr) in addrs.iter().enumerate() {
		socket(&mut builder, *addr, "S", addrs.get(idx + 1).copied().unwrap_or(0));
	}

	let file = BlendFile::from_bytes(builder.build()).expect("file parses");
	let ctx = BlendContext::new(&file).expect("context builds");
	let walk = walk_list(&ctx, addrs[0], &WalkOptions { max_steps: 3, ..WalkOptions::default() });

	assert_eq!(walk.items.len(), 3);
	assert_eq!(walk.stop.reason, WalkStopReason::StepLimit);
}
