//! The overlay engine: virtual clock, burst scheduling, and per-tick frame
//! planning, independent of any browser surface.

use rand::Rng;

use crate::config::{ColorOverrides, OverlayConfig, RangeOverrides};
use crate::frame::{aberration_blobs, glitch_bars, noise_patches, FramePlan, Viewport};
use crate::scheduler::{BurstScheduler, Timing, TICK_STEP};

#[derive(Debug)]
pub struct OverlayEngine {
    config: OverlayConfig,
    scheduler: BurstScheduler,
    /// Virtual clock, advanced by [`TICK_STEP`] per tick regardless of real
    /// elapsed time.
    glitch_time: f64,
    scanline_position: f64,
    /// Intensity to restore when the pending burst ends, if one is pending.
    burst_restore: Option<f64>,
    /// Monotonic counter; a burst restoration only applies while its
    /// generation is still the latest, so overlapping bursts cannot restore
    /// a stale forced value.
    burst_generation: u64,
}

impl OverlayEngine {
    pub fn new<R: Rng>(config: OverlayConfig, rng: &mut R) -> Self {
        let mut engine = Self {
            config,
            scheduler: BurstScheduler::new(),
            glitch_time: 0.0,
            scanline_position: 0.0,
            burst_restore: None,
            burst_generation: 0,
        };
        let timing = engine.timing();
        engine.scheduler.schedule_next(0.0, timing, rng);
        engine
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    fn timing(&self) -> Timing {
        if self.config.random_timing {
            Timing::Randomized(self.config.random_range)
        } else {
            Timing::Fixed {
                frequency: self.config.glitch_frequency,
            }
        }
    }

    /// Run one tick of the render pass: advance the virtual clock, evaluate
    /// burst membership, and plan this frame's draw calls. Returns `None`
    /// when the engine is disabled, in which case nothing is drawn and no
    /// further tick should be scheduled.
    pub fn tick<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) -> Option<FramePlan> {
        if !self.config.enabled {
            return None;
        }

        self.glitch_time += TICK_STEP;
        let burst_active = self.scheduler.in_burst(self.glitch_time);

        let (bars, noise) = if burst_active {
            (
                glitch_bars(&self.config, viewport, rng),
                noise_patches(&self.config, viewport, rng),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        let timing = self.timing();
        self.scheduler.close_out_if_past(self.glitch_time, timing, rng);

        self.scanline_position += self.config.scanline_speed;
        if self.scanline_position > viewport.height {
            self.scanline_position = 0.0;
        }

        let blobs = if self.config.color_shift {
            aberration_blobs(viewport, rng)
        } else {
            Vec::new()
        };

        Some(FramePlan {
            burst_active,
            bars,
            noise,
            scanline_y: self.scanline_position,
            blobs,
        })
    }

    /// Clamped to [0, 1].
    pub fn set_intensity(&mut self, intensity: f64) {
        self.config.intensity = intensity.clamp(0.0, 1.0);
    }

    /// Shallow-merge new colors; effective next tick.
    pub fn set_colors(&mut self, overrides: &ColorOverrides) {
        self.config.apply_colors(overrides);
    }

    /// Shallow-merge new timing bounds; effective next tick.
    pub fn set_random_range(&mut self, overrides: &RangeOverrides) {
        self.config.apply_range(overrides);
    }

    /// Force intensity to 1, capturing the pre-burst value the first time.
    /// Returns the generation the caller must pass back to [`end_burst`]
    /// when the real-time window elapses.
    ///
    /// [`end_burst`]: OverlayEngine::end_burst
    pub fn begin_burst(&mut self) -> u64 {
        if self.burst_restore.is_none() {
            self.burst_restore = Some(self.config.intensity);
        }
        self.config.intensity = 1.0;
        self.burst_generation += 1;
        self.burst_generation
    }

    /// Restore the captured intensity, unless a newer burst has superseded
    /// this one.
    pub fn end_burst(&mut self, generation: u64) {
        if generation == self.burst_generation {
            if let Some(previous) = self.burst_restore.take() {
                self.config.intensity = previous;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn clock(&self) -> f64 {
        self.glitch_time
    }
}
