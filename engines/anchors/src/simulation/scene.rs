use std::num::NonZeroU64;

use indexmap::IndexMap;
use lib_geometry::Pose;

use crate::scene::{NodeId, Parent, PrefabId, Scene};

struct SimulatedNode {
    prefab: PrefabId,
    parent: Parent,
    pose: Pose,
    active: bool,
}

/// Scene graph that only records what was instantiated where.
pub struct SimulatedScene {
    nodes: IndexMap<NodeId, SimulatedNode>,
    next_id: NonZeroU64,
    selected: Option<NodeId>,
}

impl SimulatedScene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            next_id: NonZeroU64::MIN,
            selected: None,
        }
    }

    /// number of live nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<Parent> {
        self.nodes.get(&node).map(|simulated| simulated.parent)
    }

    #[must_use]
    pub fn pose_of(&self, node: NodeId) -> Option<Pose> {
        self.nodes.get(&node).map(|simulated| simulated.pose)
    }

    #[must_use]
    pub fn prefab_of(&self, node: NodeId) -> Option<PrefabId> {
        self.nodes.get(&node).map(|simulated| simulated.prefab.clone())
    }

    #[must_use]
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// number of live instances of `prefab`
    #[must_use]
    pub fn count_instances(&self, prefab: &PrefabId) -> usize {
        self.nodes
            .values()
            .filter(|simulated| &simulated.prefab == prefab)
            .count()
    }

    /// `node` followed by all of its descendants, parents before children
    fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut subtree = vec![node];
        let mut next = 0;
        while let Some(&current) = subtree.get(next) {
            subtree.extend(
                self.nodes
                    .iter()
                    .filter(|(_, simulated)| simulated.parent == Parent::Node(current))
                    .map(|(&child, _)| child),
            );
            next += 1;
        }
        subtree
    }
}

impl Default for SimulatedScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SimulatedScene {
    fn instantiate(&mut self, prefab: &PrefabId, parent: Parent, pose: Pose) -> NodeId {
        let node = NodeId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.nodes.insert(
            node,
            SimulatedNode {
                prefab: prefab.clone(),
                parent,
                pose,
                active: true,
            },
        );
        node
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        for doomed in self.subtree(node) {
            self.nodes.shift_remove(&doomed);
            if self.selected == Some(doomed) {
                self.selected = None;
            }
        }
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(simulated) = self.nodes.get_mut(&node) {
            simulated.active = active;
        }
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|simulated| simulated.active)
    }

    fn select(&mut self, node: NodeId) {
        if self.is_alive(node) {
            self.selected = Some(node);
        }
    }
}
