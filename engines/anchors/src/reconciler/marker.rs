use std::time::Duration;

use log::{debug, info, trace, warn};

use crate::{
    config::MarkerConfig,
    controller::Controller,
    frame::Frame,
    proxy::Proxy,
    report::{Created, DestroyReason, FrameReport, ProxyKey},
    scene::PrefabId,
    session::SessionStatus,
    trackable::{Trackable, TrackableQueryFilter},
};

/// Markers that were not updated for this long lose their proxy.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5);

struct MarkerSlot {
    proxy: Proxy,
    /// frame time of the latest confident tracking report
    last_seen: Duration,
}

/// Places one proxy on every tracked image marker.
///
/// Markers are identified by their index in the image database. The prefab at the same index is
/// instantiated when the marker starts being tracked, so there is at most one proxy per marker.
/// Indices without a prefab are ignored.
///
/// The tracking system rarely reports markers as paused or stopped once they left the camera's
/// view. Proxies of markers that were not updated for [`MarkerReconciler::stale_after`] are
/// therefore removed regardless of their last reported state.
pub struct MarkerReconciler {
    prefabs: Vec<PrefabId>,
    slots: Vec<Option<MarkerSlot>>,
    stale_after: Duration,
    require_full_tracking: bool,
}

impl MarkerReconciler {
    /// `prefabs` is indexed by database index
    #[must_use]
    pub fn new(prefabs: Vec<PrefabId>) -> Self {
        let slots = prefabs.iter().map(|_| None).collect();
        Self {
            prefabs,
            slots,
            stale_after: DEFAULT_STALE_AFTER,
            require_full_tracking: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &MarkerConfig) -> Self {
        Self::new(config.prefabs.clone())
            .with_stale_after(config.stale_after())
            .with_full_tracking_required(config.require_full_tracking)
    }

    #[must_use]
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// whether markers tracked at their last known pose count as tracked
    #[must_use]
    pub fn with_full_tracking_required(mut self, require_full_tracking: bool) -> Self {
        self.require_full_tracking = require_full_tracking;
        self
    }

    #[must_use]
    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// number of markers that can have a proxy
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn proxy(&self, database_index: usize) -> Option<&Proxy> {
        self.slot(database_index).map(|slot| &slot.proxy)
    }

    #[must_use]
    pub fn last_seen(&self, database_index: usize) -> Option<Duration> {
        self.slot(database_index).map(|slot| slot.last_seen)
    }

    /// number of markers that currently have a proxy
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn slot(&self, database_index: usize) -> Option<&MarkerSlot> {
        self.slots.get(database_index).and_then(Option::as_ref)
    }

    /// Runs one reconciliation step: handles the markers updated since the previous frame, then
    /// removes stale proxies.
    pub fn reconcile(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        if frame.session.status() == SessionStatus::Tracking {
            for trackable in frame.session.trackables(TrackableQueryFilter::Updated) {
                self.observe(frame, &trackable, report);
            }
        }

        self.remove_stale(frame, report);
    }

    fn observe(&mut self, frame: &mut Frame<'_>, trackable: &Trackable, report: &mut FrameReport) {
        let Some(database_index) = trackable.database_index() else {
            return;
        };
        let (Some(slot), Some(prefab)) = (
            self.slots.get_mut(database_index),
            self.prefabs.get(database_index),
        ) else {
            trace!(
                "ignoring marker {database_index}, only {} prefabs are configured",
                self.prefabs.len()
            );
            return;
        };

        let tracked = trackable.is_confidently_tracked(self.require_full_tracking);
        match (tracked, slot.as_mut()) {
            (true, Some(occupied)) => {
                occupied.last_seen = frame.time;
                report.refreshed.push(ProxyKey::Marker(database_index));
            }
            (true, None) => {
                let Some(proxy) = Proxy::spawn(
                    frame.session,
                    frame.scene,
                    trackable.id,
                    trackable.pose,
                    prefab,
                    None,
                ) else {
                    warn!("session refused an anchor on marker {database_index}");
                    return;
                };
                info!(
                    "created `{prefab}` on marker {database_index} ({})",
                    proxy.anchor()
                );
                report.created.push(Created {
                    key: ProxyKey::Marker(database_index),
                    trackable: trackable.id,
                    anchor: proxy.anchor(),
                });
                *slot = Some(MarkerSlot {
                    proxy,
                    last_seen: frame.time,
                });
            }
            (false, Some(_)) => {
                if let Some(occupied) = slot.take() {
                    release(
                        frame,
                        database_index,
                        occupied,
                        DestroyReason::TrackingLost,
                        report,
                    );
                }
            }
            (false, None) => {
                debug!(
                    "marker {database_index} is {:?} / {:?}",
                    trackable.state, trackable.method
                );
            }
        }
    }

    fn remove_stale(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        let stale_after = self.stale_after;
        for (database_index, slot) in self.slots.iter_mut().enumerate() {
            let is_stale = slot.as_ref().is_some_and(|occupied| {
                frame.time.saturating_sub(occupied.last_seen) > stale_after
            });
            if !is_stale {
                continue;
            }
            if let Some(occupied) = slot.take() {
                debug!("marker {database_index} was not seen for {stale_after:?}");
                release(frame, database_index, occupied, DestroyReason::Stale, report);
            }
        }
    }
}

fn release(
    frame: &mut Frame<'_>,
    database_index: usize,
    slot: MarkerSlot,
    reason: DestroyReason,
    report: &mut FrameReport,
) {
    let anchor = slot.proxy.destroy(frame.session, frame.scene);
    info!("destroyed proxy of marker {database_index} ({anchor}, {reason:?})");
    report.destroyed_with(ProxyKey::Marker(database_index), anchor, reason);
}

impl Controller for MarkerReconciler {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn update(&mut self, frame: &mut Frame<'_>, report: &mut FrameReport) {
        self.reconcile(frame, report);
    }

    fn has_instances(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }
}
