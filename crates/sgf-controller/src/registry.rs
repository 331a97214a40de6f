//! Registry of known nodes.
//!
//! Keyed by short (network) address. The long (hardware) address is the
//! durable identity: a node that rejoins under a new short address is moved,
//! not duplicated. Entries are never expired.

use serde::Serialize;
use sgf_frame::{Destination, LongAddress, NodeDescriptor, ShortAddress};
use std::collections::BTreeMap;

/// Display name used for addresses that are not registered.
pub const UNKNOWN_NODE: &str = "UNKNOWN";

/// A node known to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Network address (registry key).
    pub short_address: ShortAddress,
    /// Hardware address.
    pub long_address: LongAddress,
    /// Operator-facing node identifier.
    pub node_id: String,
    /// Network address of the parent router.
    pub parent_short_address: ShortAddress,
    /// ZigBee device type.
    pub device_type: u8,
    /// What caused the node to announce itself.
    pub source_event: u8,
    /// Digi profile identifier.
    pub profile_id: u16,
    /// Manufacturer identifier.
    pub manufacturer_id: u16,
}

impl Node {
    /// Where transmissions to this node go.
    pub fn destination(&self) -> Destination {
        Destination {
            short_address: self.short_address,
            long_address: self.long_address,
        }
    }
}

impl From<NodeDescriptor> for Node {
    fn from(d: NodeDescriptor) -> Self {
        Node {
            short_address: d.short_address,
            long_address: d.long_address,
            node_id: d.node_id,
            parent_short_address: d.parent_short_address,
            device_type: d.device_type,
            source_event: d.source_event,
            profile_id: d.profile_id,
            manufacturer_id: d.manufacturer_id,
        }
    }
}

/// What an [`Registry::upsert`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// First sighting of this node.
    Inserted,
    /// The address reported a different node id; the record was replaced.
    Renamed {
        /// Node id before the update.
        previous: String,
    },
    /// A known hardware address rejoined under a new short address.
    Readdressed {
        /// Short address the node used to have.
        previous: ShortAddress,
    },
    /// Same node id at the same address; nothing changed.
    Unchanged,
}

impl UpsertOutcome {
    /// Whether the node was not known before.
    pub fn is_new(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted)
    }
}

/// In-memory view of the nodes on the network.
///
/// Iteration is ordered by short address so broadcasts go out in a stable
/// order.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: BTreeMap<ShortAddress, Node>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a node, keyed by its short address.
    ///
    /// A hardware address is held by at most one entry. A node seen under a
    /// new short address is moved there, displacing whatever held that
    /// address. Otherwise a record at the same address is only touched when
    /// the node id differs, in which case it is replaced wholesale.
    pub fn upsert(&mut self, node: Node) -> UpsertOutcome {
        let moved = self
            .nodes
            .values()
            .find(|n| n.long_address == node.long_address && n.short_address != node.short_address)
            .map(|n| n.short_address);

        if let Some(previous) = moved {
            self.nodes.remove(&previous);
            self.nodes.insert(node.short_address, node);
            return UpsertOutcome::Readdressed { previous };
        }

        match self.nodes.get_mut(&node.short_address) {
            Some(existing) if existing.node_id == node.node_id => UpsertOutcome::Unchanged,
            Some(existing) => {
                let previous = std::mem::replace(existing, node).node_id;
                UpsertOutcome::Renamed { previous }
            }
            None => {
                self.nodes.insert(node.short_address, node);
                UpsertOutcome::Inserted
            }
        }
    }

    /// Look up a node by short address.
    pub fn lookup(&self, short_address: &ShortAddress) -> Option<&Node> {
        self.nodes.get(short_address)
    }

    /// Node id for an address, or [`UNKNOWN_NODE`].
    pub fn display_name(&self, short_address: &ShortAddress) -> &str {
        self.lookup(short_address)
            .map_or(UNKNOWN_NODE, |n| n.node_id.as_str())
    }

    /// Nodes whose id contains `pattern` (case-sensitive).
    ///
    /// No match is an empty iterator, not an error. An empty pattern matches
    /// every node.
    pub fn find_by_node_id_substring<'a>(
        &'a self,
        pattern: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.node_id.contains(pattern))
    }

    /// All nodes, ordered by short address.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// JSON snapshot of all nodes, for logging.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.nodes.values().collect::<Vec<_>>())
    }
}
