use std::collections::{HashMap, HashSet};

use crate::blend::{BlendContext, Record};
use crate::export::socket::direction;
use crate::export::{Link, NodeRef, SocketRef};

/// Serialized links plus per-socket aggregates for one node tree.
#[derive(Debug, Clone, Default)]
pub struct LinkTopology {
	links: Vec<Link>,
	linked: HashSet<u64>,
	counts: HashMap<u64, u32>,
}

impl LinkTopology {
	/// Whether any link touches `socket`.
	pub fn is_linked(&self, socket: u64) -> bool {
		self.linked.contains(&socket)
	}

	/// Number of links touching `socket`.
	pub fn link_count(&self, socket: u64) -> u32 {
		self.counts.get(&socket).copied().unwrap_or(0)
	}

	/// Take the links, dropping the aggregates.
	pub fn into_links(self) -> Vec<Link> {
		self.links
	}

	fn touch(&mut self, socket: Option<u64>) {
		if let Some(socket) = socket {
			self.linked.insert(socket);
			*self.counts.entry(socket).or_default() += 1;
		}
	}
}

/// Walk `tree.links` once.
pub fn collect_links(ctx: &BlendContext<'_>, tree: &Record) -> LinkTopology {
	let mut topology = LinkTopology::default();
	let head = tree.ptr("links.first").unwrap_or(0);

	for link in ctx.walk_list(head) {
		let from_socket = link.ptr("fromsock");
		let to_socket = link.ptr("tosock");
		topology.touch(from_socket);
		topology.touch(to_socket);

		topology.links.push(Link {
			ptr: link.addr,
			from_node: link.ptr("fromnode").and_then(|addr| node_ref(ctx, addr)),
			from_socket: from_socket.and_then(|addr| socket_ref(ctx, addr)),
			to_node: link.ptr("tonode").and_then(|addr| node_ref(ctx, addr)),
			to_socket: to_socket.and_then(|addr| socket_ref(ctx, addr)),
			flag: link.int("flag"),
		});
	}

	tracing::debug!(links = topology.links.len(), sockets = topology.linked.len(), "collected links");
	topology
}

fn node_ref(ctx: &BlendContext<'_>, addr: u64) -> Option<NodeRef> {
	let node = ctx.record_at(addr)?;
	Some(NodeRef {
		ptr: node.addr,
		ui_name: node.string("name").unwrap_or_default().to_owned(),
		type_name: node.string("idname").unwrap_or_default().to_owned(),
		type_code: node.read(crate::export::node::TYPE_CODE, |value| value.as_i64()),
	})
}

fn socket_ref(ctx: &BlendContext<'_>, addr: u64) -> Option<SocketRef> {
	let socket = ctx.record_at(addr)?;
	Some(SocketRef {
		ptr: socket.addr,
		name: socket.string("name").unwrap_or_default().to_owned(),
		identifier: socket.string("identifier").unwrap_or_default().to_owned(),
		direction: direction(&socket),
		type_code: socket.int("type"),
	})
}
