/// Frame loop scheduler: the single gate every frame request goes through.
///
/// The host asks `request()` before calling `requestAnimationFrame`; at most
/// one frame is ever pending, so calling Resume twice (or scheduling from
/// several callbacks) cannot start a second loop. A frame that was already
/// pending when the loop got paused is skipped by `begin_frame()`.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    paused: bool,
    frame_pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the caller must request a new frame from the host.
    pub fn request(&mut self) -> bool {
        if self.paused || self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Called at the top of the frame callback. Returns whether the frame
    /// should update and render: it must have been requested and the loop
    /// must not be paused.
    pub fn begin_frame(&mut self) -> bool {
        let requested = std::mem::replace(&mut self.frame_pending, false);
        requested && !self.paused
    }

    /// Stop rescheduling. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        let changed = !self.paused;
        self.paused = true;
        changed
    }

    /// Allow rescheduling again. Returns false if not paused.
    /// The caller still goes through `request()` to re-enter the loop.
    pub fn resume(&mut self) -> bool {
        let changed = self.paused;
        self.paused = false;
        changed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
