use crate::{session::AnchorId, trackable::TrackableId};

/// Identifies a proxy within the controller that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProxyKey {
    /// marker proxies are keyed by the database index of their image
    Marker(usize),
    /// placed proxies are keyed by their anchor, several may share a trackable
    Placement(AnchorId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyReason {
    /// the trackable reported that it is no longer confidently tracked
    TrackingLost,
    /// no update was received for longer than the configured timeout
    Stale,
    /// the trackable the proxy was placed on stopped tracking
    TrackableStopped,
    /// the model was removed from the scene by someone else
    ModelLost,
}

/// Why a tap did not place anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapRejection {
    PointerOverUi,
    NoHit,
    /// the hit was on the back side of a detected plane
    BackFace,
    /// the session refused to create an anchor on the hit trackable
    AnchorUnavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Created {
    pub key: ProxyKey,
    pub trackable: TrackableId,
    pub anchor: AnchorId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destroyed {
    pub key: ProxyKey,
    pub anchor: AnchorId,
    pub reason: DestroyReason,
}

/// Summary of what the controllers did during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub created: Vec<Created>,
    /// marker proxies whose last-seen time was refreshed
    pub refreshed: Vec<ProxyKey>,
    pub destroyed: Vec<Destroyed>,
    pub rejected_taps: Vec<TapRejection>,
    /// state of the fit-to-scan overlay after the frame, `None` without overlay
    pub overlay_visible: Option<bool>,
}

impl FrameReport {
    /// `true` if no proxy was created or destroyed
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }

    pub(crate) fn destroyed_with(
        &mut self,
        key: ProxyKey,
        anchor: AnchorId,
        reason: DestroyReason,
    ) {
        self.destroyed.push(Destroyed {
            key,
            anchor,
            reason,
        });
    }
}
