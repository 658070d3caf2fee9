use crate::scene::{NodeId, Scene};

/// Guide telling the user to point the camera at a marker or surface.
///
/// Shown as long as no controller has placed anything.
pub struct FitToScanOverlay {
    node: NodeId,
}

impl FitToScanOverlay {
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Shows or hides the overlay and returns whether it is visible now.
    pub fn update(&self, scene: &mut dyn Scene, any_instances: bool) -> bool {
        let visible = !any_instances;
        scene.set_active(self.node, visible);
        visible
    }
}
