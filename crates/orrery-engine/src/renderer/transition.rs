//! Camera fly-to state machine.
//!
//! `CameraRig` owns the perspective camera and at most one in-flight
//! `CameraTransition`. A new fly-to overwrites the current one and starts
//! from wherever the camera is at that moment.

use log::debug;
use crate::extensions::easing::{Easing, ease_vec3};
use super::camera::{CameraPose, PerspectiveCamera};

/// One interpolation from a start pose to an end pose.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    pub from: CameraPose,
    pub to: CameraPose,
    /// Clock time (ms) when the transition started.
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl CameraTransition {
    /// Normalized progress in [0, 1] at clock time `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Pose at normalized progress `t`. Position and look-at are
    /// interpolated independently, per axis.
    pub fn sample(&self, t: f32) -> CameraPose {
        CameraPose {
            position: ease_vec3(self.from.position, self.to.position, t, self.easing),
            look_at: ease_vec3(self.from.look_at, self.to.look_at, t, self.easing),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CameraState {
    #[default]
    Idle,
    Animating(CameraTransition),
}

/// Camera plus its transition state.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: PerspectiveCamera,
    state: CameraState,
    home: CameraPose,
    duration_ms: f64,
    easing: Easing,
}

impl CameraRig {
    /// Create a rig resting at `home`.
    pub fn new(mut camera: PerspectiveCamera, home: CameraPose, duration_ms: f64, easing: Easing) -> Self {
        camera.set_pose(home);
        Self {
            camera,
            state: CameraState::Idle,
            home,
            duration_ms,
            easing,
        }
    }

    /// Start flying toward `target`, replacing any transition in flight.
    pub fn fly_to(&mut self, target: CameraPose, now_ms: f64) {
        let from = self.camera.pose();
        debug!(
            "camera: fly from {:?} to {:?} over {}ms",
            from.position, target.position, self.duration_ms
        );
        self.state = CameraState::Animating(CameraTransition {
            from,
            to: target,
            start_ms: now_ms,
            duration_ms: self.duration_ms,
            easing: self.easing,
        });
    }

    /// Fly back to the default pose.
    pub fn reset(&mut self, now_ms: f64) {
        self.fly_to(self.home, now_ms);
    }

    /// Advance the transition to clock time `now_ms` and apply it to the
    /// camera. Returns whether the rig is still animating.
    pub fn step(&mut self, now_ms: f64) -> bool {
        let CameraState::Animating(transition) = &self.state else {
            return false;
        };
        let t = transition.progress(now_ms);
        let pose = transition.sample(t);
        self.camera.set_pose(pose);
        if t >= 1.0 {
            self.state = CameraState::Idle;
            return false;
        }
        true
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, CameraState::Animating(_))
    }

    pub fn home(&self) -> CameraPose {
        self.home
    }
}
