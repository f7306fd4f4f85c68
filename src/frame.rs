//! Pure description of one tick's draw calls.
//!
//! The engine builds a [`FramePlan`] from the configuration and a random
//! source; the wasm layer translates it into canvas calls. Keeping the plan
//! free of browser types makes every draw decision testable on the host.

use rand::Rng;

use crate::config::OverlayConfig;

/// Logical (CSS-pixel) viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Everything the render pass draws this tick, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Whether this tick fell inside a burst window.
    pub burst_active: bool,
    /// Horizontal RGB-split bars; empty outside a burst.
    pub bars: Vec<GlitchBar>,
    /// Pixel-noise patches; empty outside a burst.
    pub noise: Vec<NoisePatch>,
    /// Top of the moving scan-line band.
    pub scanline_y: f64,
    /// Chromatic-aberration blobs; empty when `color_shift` is off.
    pub blobs: Vec<AberrationBlob>,
}

/// One glitch bar: a trio of full-width rectangles in the glitch R/G/B
/// colors, drawn at `offset`, `offset + 2` and `offset - 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlitchBar {
    pub y: f64,
    pub height: f64,
    pub offset: f64,
}

/// A rectangular patch of per-pixel random noise, as a ready-to-blit RGBA
/// buffer of `width * height` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct NoisePatch {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A radial-gradient blob splitting the aberration color into offset
/// channel rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AberrationBlob {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

pub fn glitch_bars<R: Rng>(config: &OverlayConfig, viewport: Viewport, rng: &mut R) -> Vec<GlitchBar> {
    let bar_count = (5.0 + rng.gen::<f64>() * 10.0) as usize;
    (0..bar_count)
        .map(|_| GlitchBar {
            y: rng.gen::<f64>() * viewport.height,
            height: 2.0 + rng.gen::<f64>() * 8.0,
            offset: (rng.gen::<f64>() - 0.5) * 20.0 * config.intensity,
        })
        .collect()
}

pub fn noise_patches<R: Rng>(
    config: &OverlayConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Vec<NoisePatch> {
    let patch_count = if config.random_timing {
        (2.0 + rng.gen::<f64>() * 8.0) as usize
    } else {
        5
    };
    (0..patch_count)
        .map(|_| {
            let width = (50.0 + rng.gen::<f64>() * 100.0) as u32;
            let height = (20.0 + rng.gen::<f64>() * 40.0) as u32;
            NoisePatch {
                x: rng.gen::<f64>() * viewport.width,
                y: rng.gen::<f64>() * viewport.height,
                width,
                height,
                pixels: noise_pixels(config, width, height, rng),
            }
        })
        .collect()
}

/// Per-pixel random brightness of the noise color, per-pixel random alpha
/// in 0..50.
fn noise_pixels<R: Rng>(config: &OverlayConfig, width: u32, height: u32, rng: &mut R) -> Vec<u8> {
    let color = config.colors.noise;
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        let brightness = rng.gen::<f64>() * config.noise_amount;
        pixels.push((f64::from(color.r) * brightness) as u8);
        pixels.push((f64::from(color.g) * brightness) as u8);
        pixels.push((f64::from(color.b) * brightness) as u8);
        pixels.push((rng.gen::<f64>() * 50.0) as u8);
    }
    pixels
}

pub fn aberration_blobs<R: Rng>(viewport: Viewport, rng: &mut R) -> Vec<AberrationBlob> {
    (0..3)
        .map(|_| AberrationBlob {
            x: rng.gen::<f64>() * viewport.width,
            y: rng.gen::<f64>() * viewport.height,
            radius: 50.0 + rng.gen::<f64>() * 100.0,
        })
        .collect()
}
