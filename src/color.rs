//! 24-bit RGB colors and their CSS string forms.

use serde::Deserialize;

/// A 24-bit RGB color, parsed from `#rrggbb` strings at the config boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lenient `#rrggbb` parse. Missing or malformed digits read as 0, so bad
    /// input produces wrong colors rather than an error.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let chan = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0)
        };
        Self {
            r: chan(0..2),
            g: chan(2..4),
            b: chan(4..6),
        }
    }

    /// CSS `rgba(r, g, b, a)` string for canvas fill styles.
    pub fn rgba(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }

    /// Like [`Rgb::rgba`] but keeping only one channel, used by the glitch
    /// and aberration passes to split a color into its R/G/B components.
    pub fn channel_rgba(&self, channel: Channel, alpha: f64) -> String {
        match channel {
            Channel::R => format!("rgba({}, 0, 0, {})", self.r, alpha),
            Channel::G => format!("rgba(0, {}, 0, {})", self.g, alpha),
            Channel::B => format!("rgba(0, 0, {}, {})", self.b, alpha),
        }
    }
}

/// One of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Rgb::from_hex(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#ff00aa"), Rgb::new(255, 0, 170));
        assert_eq!(Rgb::from_hex("00ff00"), Rgb::new(0, 255, 0));
    }

    #[test]
    fn malformed_hex_degrades_to_zeroed_channels() {
        assert_eq!(Rgb::from_hex("#zzff00"), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hex("#ff"), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hex(""), Rgb::new(0, 0, 0));
    }

    #[test]
    fn rgba_strings() {
        let c = Rgb::new(255, 0, 255);
        assert_eq!(c.rgba(0.5), "rgba(255, 0, 255, 0.5)");
        assert_eq!(c.channel_rgba(Channel::G, 0.03), "rgba(0, 0, 0, 0.03)");
        assert_eq!(
            Rgb::new(10, 20, 30).channel_rgba(Channel::B, 1.0),
            "rgba(0, 0, 30, 1)"
        );
    }
}
