//! Overlay configuration: documented defaults, partial overrides from the
//! host page, and key-wise merging for the nested color/range groups.

use serde::Deserialize;

use crate::color::Rgb;

/// Fully resolved overlay configuration. Every field always holds a value;
/// partial input is resolved against the defaults below.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Overall visual strength, 0..1.
    pub intensity: f64,
    /// Per-pixel noise brightness scale, 0..1.
    pub noise_amount: f64,
    /// Interval between bursts (virtual ms); only used with fixed timing.
    pub glitch_frequency: f64,
    /// Scan-line advance in px per frame.
    pub scanline_speed: f64,
    /// Enable the chromatic-aberration pass.
    pub color_shift: bool,
    /// Randomize burst interval and duration from `random_range`.
    pub random_timing: bool,
    /// Master on/off; a disabled tick draws nothing and stops rescheduling.
    pub enabled: bool,
    pub colors: ColorConfig,
    pub random_range: RandomRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    pub scanline: Rgb,
    pub noise: Rgb,
    pub glitch_r: Rgb,
    pub glitch_g: Rgb,
    pub glitch_b: Rgb,
    pub aberration: Rgb,
}

/// Bounds for randomized burst timing. Min ≤ max is assumed, not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRange {
    pub frequency_min: f64,
    pub frequency_max: f64,
    pub duration_min: f64,
    pub duration_max: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            noise_amount: 0.1,
            glitch_frequency: 2000.0,
            scanline_speed: 0.5,
            color_shift: true,
            random_timing: true,
            enabled: true,
            colors: ColorConfig::default(),
            random_range: RandomRange::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            scanline: Rgb::new(0x00, 0xff, 0x00),
            noise: Rgb::new(0xff, 0xff, 0xff),
            glitch_r: Rgb::new(0xff, 0x00, 0x00),
            glitch_g: Rgb::new(0x00, 0xff, 0x00),
            glitch_b: Rgb::new(0x00, 0x00, 0xff),
            aberration: Rgb::new(0xff, 0x00, 0xff),
        }
    }
}

impl Default for RandomRange {
    fn default() -> Self {
        Self {
            frequency_min: 1000.0,
            frequency_max: 4000.0,
            duration_min: 100.0,
            duration_max: 500.0,
        }
    }
}

/// Partial configuration as supplied by the page (camelCase JSON). Any leaf
/// left out keeps its default; nested groups merge key-by-key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub intensity: Option<f64>,
    pub noise_amount: Option<f64>,
    pub glitch_frequency: Option<f64>,
    pub scanline_speed: Option<f64>,
    pub color_shift: Option<bool>,
    pub random_timing: Option<bool>,
    pub enabled: Option<bool>,
    pub colors: Option<ColorOverrides>,
    pub random_range: Option<RangeOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorOverrides {
    pub scanline: Option<Rgb>,
    pub noise: Option<Rgb>,
    pub glitch_r: Option<Rgb>,
    pub glitch_g: Option<Rgb>,
    pub glitch_b: Option<Rgb>,
    pub aberration: Option<Rgb>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeOverrides {
    pub frequency_min: Option<f64>,
    pub frequency_max: Option<f64>,
    pub duration_min: Option<f64>,
    pub duration_max: Option<f64>,
}

impl OverlayConfig {
    /// Resolve a partial configuration against the defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = overrides.intensity {
            cfg.intensity = v;
        }
        if let Some(v) = overrides.noise_amount {
            cfg.noise_amount = v;
        }
        if let Some(v) = overrides.glitch_frequency {
            cfg.glitch_frequency = v;
        }
        if let Some(v) = overrides.scanline_speed {
            cfg.scanline_speed = v;
        }
        if let Some(v) = overrides.color_shift {
            cfg.color_shift = v;
        }
        if let Some(v) = overrides.random_timing {
            cfg.random_timing = v;
        }
        if let Some(v) = overrides.enabled {
            cfg.enabled = v;
        }
        if let Some(colors) = overrides.colors {
            cfg.apply_colors(&colors);
        }
        if let Some(range) = overrides.random_range {
            cfg.apply_range(&range);
        }
        cfg
    }

    /// Key-wise merge of a partial color set; unspecified colors are kept.
    pub fn apply_colors(&mut self, overrides: &ColorOverrides) {
        let c = &mut self.colors;
        if let Some(v) = overrides.scanline {
            c.scanline = v;
        }
        if let Some(v) = overrides.noise {
            c.noise = v;
        }
        if let Some(v) = overrides.glitch_r {
            c.glitch_r = v;
        }
        if let Some(v) = overrides.glitch_g {
            c.glitch_g = v;
        }
        if let Some(v) = overrides.glitch_b {
            c.glitch_b = v;
        }
        if let Some(v) = overrides.aberration {
            c.aberration = v;
        }
    }

    /// Key-wise merge of partial timing bounds; unspecified bounds are kept.
    pub fn apply_range(&mut self, overrides: &RangeOverrides) {
        let r = &mut self.random_range;
        if let Some(v) = overrides.frequency_min {
            r.frequency_min = v;
        }
        if let Some(v) = overrides.frequency_max {
            r.frequency_max = v;
        }
        if let Some(v) = overrides.duration_min {
            r.duration_min = v;
        }
        if let Some(v) = overrides.duration_max {
            r.duration_max = v;
        }
    }
}
