use lib_geometry::Pose;

use crate::{
    scene::{NodeId, Parent, PrefabId, Scene},
    session::{AnchorId, Session},
    trackable::TrackableId,
};

/// Visual content pinned to a trackable.
///
/// A proxy owns its anchor and its scene nodes; they are created together by [`Proxy::spawn`]
/// and released together by [`Proxy::destroy`]. The node hierarchy is
/// `anchor -> [wrapper ->] model`.
#[derive(Debug, PartialEq, Eq)]
pub struct Proxy {
    trackable: TrackableId,
    anchor: AnchorId,
    wrapper: Option<NodeId>,
    model: NodeId,
}

impl Proxy {
    /// Anchors `pose` to `trackable` and instantiates `model` below the anchor, inside an
    /// instance of `wrapper` if one is given.
    ///
    /// Returns `None` without touching the scene if the session refuses the anchor.
    pub fn spawn(
        session: &mut dyn Session,
        scene: &mut dyn Scene,
        trackable: TrackableId,
        pose: Pose,
        model: &PrefabId,
        wrapper: Option<&PrefabId>,
    ) -> Option<Self> {
        let anchor = session.create_anchor(trackable, pose)?;
        let wrapper = wrapper.map(|prefab| scene.instantiate(prefab, Parent::Anchor(anchor), pose));
        let parent = wrapper.map_or(Parent::Anchor(anchor), Parent::Node);
        let model = scene.instantiate(model, parent, pose);

        Some(Self {
            trackable,
            anchor,
            wrapper,
            model,
        })
    }

    /// Removes the whole chain from the scene and releases the anchor.
    ///
    /// Nodes that are already gone are not touched.
    pub fn destroy(self, session: &mut dyn Session, scene: &mut dyn Scene) -> AnchorId {
        if let Some(wrapper) = self.wrapper.filter(|&wrapper| scene.is_alive(wrapper)) {
            scene.destroy(wrapper);
        }
        // also covers a wrapper that was already gone
        if scene.is_alive(self.model) {
            scene.destroy(self.model);
        }
        session.detach_anchor(self.anchor);
        self.anchor
    }

    /// `false` if the model was removed from the scene behind our back
    #[must_use]
    pub fn is_intact(&self, scene: &dyn Scene) -> bool {
        scene.is_alive(self.model)
    }

    #[must_use]
    pub fn trackable(&self) -> TrackableId {
        self.trackable
    }

    #[must_use]
    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    #[must_use]
    pub fn wrapper(&self) -> Option<NodeId> {
        self.wrapper
    }

    #[must_use]
    pub fn model(&self) -> NodeId {
        self.model
    }
}
