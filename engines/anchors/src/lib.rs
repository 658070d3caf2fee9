//! Keeps virtual content anchored to the real-world features an AR tracking system reports.
//!
//! The tracking system, the scene graph, user input and the operating system are reached through
//! the [`Session`], [`Scene`], [`Input`] and [`Platform`] traits. A [`FrameLoop`] runs a list of
//! [`Controller`]s once per frame against those collaborators:
//!
//! - [`MarkerReconciler`] puts one proxy on each tracked image marker
//! - [`PlacementReconciler`] puts proxies where the user taps on a plane or feature point
//! - [`LifecycleController`] reacts to session errors and the back button
//! - [`AutofocusController`] and [`ShadowQuadController`] are small helpers
//!
//! [`simulation`] provides in-memory implementations of all collaborators.

#![allow(missing_docs, reason = "most items are self-explanatory")]

mod autofocus;
mod config;
mod controller;
mod error;
mod frame;
mod frame_loop;
mod input;
mod lifecycle;
mod overlay;
mod platform;
mod proxy;
mod reconciler;
mod report;
mod scene;
mod session;
mod shadow;
pub mod simulation;
mod trackable;

pub use autofocus::AutofocusController;
pub use config::{ArConfig, MarkerConfig, PlacementConfig};
pub use controller::Controller;
pub use error::{LoadError, LoadResult};
pub use frame::{Backend, Frame};
pub use frame_loop::{FrameLoop, LoopStats, FIT_TO_SCAN_PREFAB, SHADOW_QUAD_PREFAB};
pub use input::{Input, PointerId, TapGesture, Touch, TouchPhase};
pub use lifecycle::{LifecycleController, DEFAULT_QUIT_DELAY, DEFAULT_TARGET_FRAME_RATE};
pub use overlay::FitToScanOverlay;
pub use platform::{Platform, SleepTimeout};
pub use proxy::Proxy;
pub use reconciler::{MarkerReconciler, PlacementReconciler, PlacementTrigger, DEFAULT_STALE_AFTER};
pub use report::{Created, DestroyReason, Destroyed, FrameReport, ProxyKey, TapRejection};
pub use scene::{NodeId, Parent, PrefabId, Scene};
pub use session::{
    AnchorId, DepthMode, FocusMode, RaycastFilter, RaycastHit, Session, SessionConfig,
    SessionStatus,
};
pub use shadow::ShadowQuadController;
pub use trackable::{
    Trackable, TrackableId, TrackableKind, TrackableQueryFilter, TrackingMethod, TrackingState,
};
