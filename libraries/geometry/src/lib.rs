#![allow(missing_docs, reason = "TODO document remaining accessors")]

mod camera;
mod pose;

pub use camera::Camera;
pub use pose::Pose;
