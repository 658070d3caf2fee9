//! Random marker tracking histories must never leak anchors or scene nodes.

use std::time::Duration;

use engine_anchors::{
    simulation::SimulatedWorld, Controller, MarkerReconciler, PrefabId, SessionStatus,
    TrackableKind, TrackingMethod, TrackingState,
};
use lib_geometry::Pose;
use proptest::prelude::*;

const PREFABS: usize = 3;
const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug)]
enum Event {
    /// marker becomes fully tracked
    Show(usize),
    Observe(usize),
    Pause(usize),
    Stop(usize),
    LastKnownPose(usize),
    SessionTracking(bool),
    Wait(Duration),
}

fn event() -> impl Strategy<Value = Event> {
    // one index beyond the configured prefabs
    let index = 0..=PREFABS;
    prop_oneof![
        3 => index.clone().prop_map(Event::Show),
        3 => index.clone().prop_map(Event::Observe),
        1 => index.clone().prop_map(Event::Pause),
        1 => index.clone().prop_map(Event::Stop),
        1 => index.prop_map(Event::LastKnownPose),
        1 => any::<bool>().prop_map(Event::SessionTracking),
        2 => (0..8_000_u64).prop_map(|millis| Event::Wait(Duration::from_millis(millis))),
    ]
}

fn apply(world: &mut SimulatedWorld, event: &Event, time: &mut Duration) {
    match *event {
        Event::Show(index) => match world.session.image(index) {
            Some(image) => {
                world.session.set_tracking_state(image, TrackingState::Tracking);
                world
                    .session
                    .set_tracking_method(image, TrackingMethod::FullTracking);
            }
            None => {
                world.session.add_trackable(
                    TrackableKind::AugmentedImage {
                        database_index: index,
                    },
                    Pose::IDENTITY,
                );
            }
        },
        Event::Observe(index) => {
            if let Some(image) = world.session.image(index) {
                world.session.observe(image);
            }
        }
        Event::Pause(index) => {
            if let Some(image) = world.session.image(index) {
                world.session.set_tracking_state(image, TrackingState::Paused);
            }
        }
        Event::Stop(index) => {
            if let Some(image) = world.session.image(index) {
                world.session.set_tracking_state(image, TrackingState::Stopped);
            }
        }
        Event::LastKnownPose(index) => {
            if let Some(image) = world.session.image(index) {
                world
                    .session
                    .set_tracking_method(image, TrackingMethod::LastKnownPose);
            }
        }
        Event::SessionTracking(tracking) => world.session.set_status(if tracking {
            SessionStatus::Tracking
        } else {
            SessionStatus::LostTracking
        }),
        Event::Wait(duration) => *time += duration,
    }
}

proptest! {
    #[test]
    fn proxies_match_anchors_and_nodes(events in prop::collection::vec(event(), 1..64)) {
        let mut world = SimulatedWorld::new();
        let prefabs = (0..PREFABS).map(|index| PrefabId::from(format!("marker_{index}"))).collect();
        let mut markers = MarkerReconciler::new(prefabs);
        let mut time = Duration::ZERO;
        let mut created = 0;
        let mut destroyed = 0;

        for event in &events {
            apply(&mut world, event, &mut time);
            time += FRAME;
            let report = world.run_controller(&mut markers, time);
            created += report.created.len();
            destroyed += report.destroyed.len();

            let live = markers.live_count();
            prop_assert_eq!(created - destroyed, live);
            prop_assert_eq!(world.session.live_anchors().len(), live);
            prop_assert_eq!(world.scene.node_count(), live);
            prop_assert_eq!(markers.has_instances(), live > 0);
            prop_assert_eq!(
                world.session.anchors_created() - world.session.anchors_detached(),
                live
            );

            for index in 0..markers.capacity() {
                let Some(proxy) = markers.proxy(index) else {
                    continue;
                };
                prop_assert_eq!(world.session.image(index), Some(proxy.trackable()));
                prop_assert_eq!(
                    world.session.anchor_target(proxy.anchor()),
                    Some(proxy.trackable())
                );
                let last_seen = markers.last_seen(index).unwrap_or_default();
                prop_assert!(time - last_seen <= markers.stale_after());
            }
            prop_assert!(markers.proxy(PREFABS).is_none());
        }
    }
}
