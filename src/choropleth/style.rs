use serde::{Serialize, Serializer};
use std::fmt;

/// 24-bit sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::hex(0xffffff);
    pub const BLACK: Rgb = Rgb::hex(0x000000);

    /// Build a color from a packed `0xRRGGBB` literal
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Alpha-composite this color over `base`
    pub fn blend_over(self, base: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgb {
            r: mix(self.r, base.r),
            g: mix(self.g, base.g),
            b: mix(self.b, base.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Visual style for one department polygon.
///
/// Field names serialize to the keys Leaflet's `setStyle` expects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StyleResult {
    #[serde(rename = "fillColor")]
    pub fill_color: Rgb,
    #[serde(rename = "color")]
    pub border_color: Rgb,
    #[serde(rename = "weight")]
    pub border_weight: u8,
    #[serde(rename = "fillOpacity")]
    pub fill_opacity: f32,
}

impl StyleResult {
    /// Style for a department with a case count
    pub const fn matched(fill_color: Rgb) -> Self {
        Self {
            fill_color,
            border_color: Rgb::BLACK,
            border_weight: 1,
            fill_opacity: 0.6,
        }
    }

    /// Style for a department with no row (or no value) for the year
    pub const UNMATCHED: StyleResult = StyleResult {
        fill_color: Rgb::WHITE,
        border_color: Rgb::BLACK,
        border_weight: 1,
        fill_opacity: 0.1,
    };

    pub fn is_unmatched(&self) -> bool {
        *self == Self::UNMATCHED
    }

    /// Fill color as seen over `base` once opacity is applied
    pub fn composited_fill(&self, base: Rgb) -> Rgb {
        self.fill_color.blend_over(base, self.fill_opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::hex(0xFF5900).to_string(), "#ff5900");
        assert_eq!(Rgb::WHITE.to_string(), "#ffffff");
    }

    #[test]
    fn test_blend_extremes() {
        let red = Rgb::hex(0xff0000);
        assert_eq!(red.blend_over(Rgb::WHITE, 1.0), red);
        assert_eq!(red.blend_over(Rgb::WHITE, 0.0), Rgb::WHITE);
        assert_eq!(red.blend_over(Rgb::BLACK, 0.5), Rgb { r: 128, g: 0, b: 0 });
    }

    #[test]
    fn test_style_serializes_with_leaflet_keys() {
        let json = serde_json::to_value(StyleResult::UNMATCHED).unwrap();
        assert_eq!(json["fillColor"], "#ffffff");
        assert_eq!(json["color"], "#000000");
        assert_eq!(json["weight"], 1);
        assert!((json["fillOpacity"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }
}
