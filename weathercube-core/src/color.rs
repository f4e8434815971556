//! Mapping from current conditions to cube colors.
//!
//! The summary code picks a base color for the whole cube. The apparent
//! temperature may add a tip color, blended into positions 1, 3 and 5.

use palette::{Mix, Srgb};

use crate::model::{ColorPalette, HexColor};

/// Base color for summary codes missing from [`BASE_COLORS`].
pub const FALLBACK_COLOR: HexColor = HexColor::from_u32(0xcccccc);

/// Opacity, in percent, of the tip color over the base color.
pub const TIP_OPACITY: u8 = 95;

/// Positions that receive the tip color.
pub const TIP_POSITIONS: [usize; 3] = [1, 3, 5];

pub const BASE_COLORS: &[(&str, HexColor)] = &[
    ("clear-day", HexColor::from_u32(0x3ec3f5)),
    ("clear-night", HexColor::from_u32(0x1b2a6b)),
    ("rain", HexColor::from_u32(0x1f5fbf)),
    ("snow", HexColor::from_u32(0xf2f6ff)),
    ("sleet", HexColor::from_u32(0x9fb8d0)),
    ("wind", HexColor::from_u32(0xbfe3d9)),
    ("fog", HexColor::from_u32(0x8e9aa6)),
    ("cloudy", HexColor::from_u32(0x6f7d8c)),
    ("partly-cloudy-day", HexColor::from_u32(0x8dcdf0)),
    ("partly-cloudy-night", HexColor::from_u32(0x34476e)),
];

pub const COLD: HexColor = HexColor::from_u32(0x1200da);
pub const PLEASANT: HexColor = HexColor::from_u32(0x27d06c);
pub const WARM: HexColor = HexColor::from_u32(0xf5d100);
pub const HOT: HexColor = HexColor::from_u32(0xf57c00);
pub const SCORCHING: HexColor = HexColor::from_u32(0xe0201b);

pub fn base_color(summary: &str) -> HexColor {
    BASE_COLORS
        .iter()
        .find(|(code, _)| *code == summary)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Tip color for an apparent temperature in °F.
///
/// Buckets: `(-inf, 32]`, `[60, 75)`, `[75, 85)`, `[85, 95)`, `[95, inf)`.
/// Anything in `(32, 60)`, and NaN, has no tip.
pub fn tip_color(temperature: f64) -> Option<HexColor> {
    match temperature {
        t if t <= 32.0 => Some(COLD),
        t if (60.0..75.0).contains(&t) => Some(PLEASANT),
        t if (75.0..85.0).contains(&t) => Some(WARM),
        t if (85.0..95.0).contains(&t) => Some(HOT),
        t if t >= 95.0 => Some(SCORCHING),
        _ => None,
    }
}

/// Blends `mask` over `base` at `opacity` percent, linearly in sRGB.
///
/// Opacity is clamped to `0..=100`; 0 yields `base` and 100 yields `mask`.
pub fn hex_blend(mask: HexColor, base: HexColor, opacity: u8) -> HexColor {
    let op = f32::from(opacity.min(100)) / 100.0;
    let mask: Srgb = mask.0.into_format();
    let base: Srgb = base.0.into_format();

    HexColor(base.mix(mask, op).into_format())
}

pub fn colors_for(summary: &str, temperature: f64) -> ColorPalette {
    let base = base_color(summary);
    let mut palette = ColorPalette::filled(base);

    if let Some(tip) = tip_color(temperature) {
        let blended = hex_blend(tip, base, TIP_OPACITY);
        for i in TIP_POSITIONS {
            palette.0[i] = blended;
        }
    }

    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_fill_base_in_the_gap() {
        for (code, color) in BASE_COLORS {
            let palette = colors_for(code, 45.0);
            assert_eq!(palette, ColorPalette::filled(*color), "code {code}");
        }
    }

    #[test]
    fn unknown_code_gets_gray_without_tip() {
        assert_eq!(colors_for("tornado", 50.0), ColorPalette::filled(FALLBACK_COLOR));
        assert_eq!(colors_for("", 33.0), ColorPalette::filled(FALLBACK_COLOR));
    }

    #[test]
    fn tip_bucket_boundaries() {
        let cases = [
            (-40.0, Some(COLD)),
            (32.0, Some(COLD)),
            (32.5, None),
            (59.99, None),
            (60.0, Some(PLEASANT)),
            (74.9, Some(PLEASANT)),
            (75.0, Some(WARM)),
            (85.0, Some(HOT)),
            (94.9, Some(HOT)),
            (95.0, Some(SCORCHING)),
            (120.0, Some(SCORCHING)),
        ];

        for (temp, expected) in cases {
            assert_eq!(tip_color(temp), expected, "temperature {temp}");
        }
    }

    #[test]
    fn nan_temperature_has_no_tip() {
        assert_eq!(tip_color(f64::NAN), None);
    }

    #[test]
    fn tip_only_touches_odd_positions() {
        for temp in [0.0, 32.0, 45.0, 60.0, 80.0, 90.0, 100.0] {
            for code in ["clear-day", "rain", "unknown"] {
                let palette = colors_for(code, temp);
                let base = base_color(code);
                for i in [0, 2, 4] {
                    assert_eq!(palette.0[i], base, "code {code}, temp {temp}, pos {i}");
                }
            }
        }
    }

    #[test]
    fn blend_boundaries() {
        let mask = HexColor::from_u32(0x27d06c);
        let base = HexColor::from_u32(0x3ec3f5);

        assert_eq!(hex_blend(mask, base, 0), base);
        assert_eq!(hex_blend(mask, base, 100), mask);
        assert_eq!(hex_blend(mask, base, 250), mask);
    }

    #[test]
    fn blend_is_directional() {
        let a = HexColor::from_u32(0x000000);
        let b = HexColor::from_u32(0xffffff);

        // 0.95 * 255 = 242.25
        assert_eq!(hex_blend(b, a, 95), HexColor::new(242, 242, 242));
        // 0.05 * 255 = 12.75
        assert_eq!(hex_blend(a, b, 95), HexColor::new(13, 13, 13));
    }

    #[test]
    fn clear_day_at_seventy() {
        let palette = colors_for("clear-day", 70.0);
        let base = HexColor::from_u32(0x3ec3f5);
        // 27d06c over 3ec3f5 at 95%
        let blended = HexColor::new(0x28, 0xcf, 0x73);

        assert_eq!(hex_blend(PLEASANT, base, TIP_OPACITY), blended);
        assert_eq!(
            palette,
            ColorPalette([base, blended, base, blended, base, blended])
        );
    }

    #[test]
    fn unknown_code_when_freezing_still_gets_cold_tip() {
        let palette = colors_for("nonexistent-code", 10.0);
        let blended = hex_blend(COLD, FALLBACK_COLOR, TIP_OPACITY);

        assert_eq!(
            palette,
            ColorPalette([
                FALLBACK_COLOR,
                blended,
                FALLBACK_COLOR,
                blended,
                FALLBACK_COLOR,
                blended
            ])
        );
    }
}
