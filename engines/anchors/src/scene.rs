use std::{
    borrow::Cow,
    fmt::{self, Display},
    num::NonZeroU64,
};

use lib_geometry::Pose;
use serde::{Deserialize, Serialize};

use crate::session::AnchorId;

/// Name of a template the scene knows how to instantiate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabId(pub Cow<'static, str>);

impl PrefabId {
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for PrefabId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for PrefabId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl Display for PrefabId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub NonZeroU64);

impl Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "node#{}", self.0)
    }
}

/// Where a new node is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parent {
    Root,
    /// follows the anchor's world transform as tracking refines it
    Anchor(AnchorId),
    Node(NodeId),
}

/// The scene graph holding the visual content.
pub trait Scene {
    /// Instantiates `prefab` under `parent`, placed at the world space `pose`.
    fn instantiate(&mut self, prefab: &PrefabId, parent: Parent, pose: Pose) -> NodeId;

    /// Removes `node` together with all of its descendants. Unknown nodes are ignored.
    fn destroy(&mut self, node: NodeId);

    fn is_alive(&self, node: NodeId) -> bool;

    fn set_active(&mut self, node: NodeId, active: bool);

    /// `false` for nodes that are not alive
    fn is_active(&self, node: NodeId) -> bool;

    /// makes `node` the current selection for manipulation gestures
    fn select(&mut self, node: NodeId);
}
