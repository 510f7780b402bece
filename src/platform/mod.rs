//! Platform abstraction layer
//!
//! Browser frame callbacks can't be cancelled reliably once queued, so the loop
//! hands out tokens instead. A callback carrying a token from a stopped (or
//! restarted) loop is simply ignored.
//!
//! Also tracks a rolling FPS over the last 60 frames for the HUD.

/// Frames in the FPS window
pub const FPS_WINDOW: usize = 60;

/// Proof that a scheduled frame callback belongs to the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken {
    generation: u64,
    frame: u64,
}

impl FrameToken {
    /// Frame number within its run (0 for the first frame)
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Start/stop state of the per-frame loop
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    generation: u64,
    /// Frame the next accepted token must carry
    next_frame: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin a new run. Returns the token for the first frame, or `None` if
    /// the loop is already running.
    pub fn start(&mut self) -> Option<FrameToken> {
        if self.running {
            return None;
        }
        self.running = true;
        self.generation += 1;
        self.next_frame = 0;
        Some(FrameToken {
            generation: self.generation,
            frame: 0,
        })
    }

    /// End the current run. Idempotent; every outstanding token goes stale.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Validate a frame callback's token. On success the frame should run and
    /// the returned token is the one to schedule next.
    pub fn accept(&mut self, token: FrameToken) -> Option<FrameToken> {
        if !self.running || token.generation != self.generation || token.frame != self.next_frame {
            return None;
        }
        self.next_frame += 1;
        Some(FrameToken {
            generation: self.generation,
            frame: self.next_frame,
        })
    }
}

/// Rolling frame timing
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame timestamp (ms)
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest slot is the one we'll overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    /// Frames per second over the last full window (0 until it fills)
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Forget all history (loop restarted)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_twice_is_noop() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        assert!(first.is_some());
        assert!(frames.start().is_none());
        assert!(frames.is_running());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut frames = FrameLoop::new();
        frames.stop();
        assert!(!frames.is_running());

        let token = frames.start().unwrap();
        frames.stop();
        frames.stop();
        assert!(!frames.is_running());
        assert!(frames.accept(token).is_none());
    }

    #[test]
    fn test_tokens_chain_frame_by_frame() {
        let mut frames = FrameLoop::new();
        let t0 = frames.start().unwrap();
        let t1 = frames.accept(t0).unwrap();
        assert_eq!(t1.frame(), 1);
        // Replaying an already-consumed token does nothing
        assert!(frames.accept(t0).is_none());
        let t2 = frames.accept(t1).unwrap();
        assert_eq!(t2.frame(), 2);
    }

    #[test]
    fn test_restart_invalidates_old_callbacks() {
        let mut frames = FrameLoop::new();
        let old = frames.start().unwrap();
        let old_next = frames.accept(old).unwrap();
        frames.stop();
        let fresh = frames.start().unwrap();

        assert!(frames.accept(old_next).is_none());
        assert!(frames.accept(fresh).is_some());
    }

    #[test]
    fn test_fps_from_full_window() {
        let mut stats = FrameStats::new();
        for i in 0..FPS_WINDOW - 1 {
            stats.record(1000.0 + i as f64 * 16.0);
        }
        assert_eq!(stats.fps(), 0);
        stats.record(1000.0 + (FPS_WINDOW - 1) as f64 * 16.0);
        // 60 frames spanning 944 ms
        assert_eq!(stats.fps(), 64);
        stats.record(1000.0 + FPS_WINDOW as f64 * 16.0);
        assert_eq!(stats.fps(), 64);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut stats = FrameStats::new();
        for i in 0..FPS_WINDOW {
            stats.record(500.0 + i as f64 * 20.0);
        }
        assert!(stats.fps() > 0);
        stats.reset();
        assert_eq!(stats.fps(), 0);
        // A fresh window has to fill again before FPS is reported
        stats.record(6000.0);
        assert_eq!(stats.fps(), 0);
    }
}
