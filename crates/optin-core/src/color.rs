//! Hex color validation and the hex ⇄ HSB conversion used by the color picker.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("valid hex color regex")
});

/// Hue in degrees `0..=360`, saturation and brightness in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsb {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

/// `true` for `#RGB` and `#RRGGBB` (either case).
#[must_use]
pub fn is_valid_hex(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

/// Expand `#RGB` to `#RRGGBB` and upper-case the result.
#[must_use]
pub fn normalize_hex(value: &str) -> Option<String> {
    if !is_valid_hex(value) {
        return None;
    }
    let digits = &value[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    Some(format!("#{}", expanded.to_ascii_uppercase()))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a hex color to HSB. Returns `None` for anything [`is_valid_hex`]
/// rejects.
#[must_use]
pub fn hex_to_hsb(value: &str) -> Option<Hsb> {
    let hex = normalize_hex(value)?;
    let channel = |range: std::ops::Range<usize>| -> Option<f64> {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|c| f64::from(c) / 255.0)
    };
    let r = channel(1..3)?;
    let g = channel(3..5)?;
    let b = channel(5..7)?;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut hue = if delta == 0.0 {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        ((g - b) / delta) % 6.0
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    hue = (hue * 60.0).round();
    if hue < 0.0 {
        hue += 360.0;
    }

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    Some(Hsb {
        hue,
        saturation: round2(saturation),
        brightness: round2(max),
    })
}

/// Convert HSB back to an upper-case `#RRGGBB` string.
#[must_use]
pub fn hsb_to_hex(hsb: Hsb) -> String {
    let h = hsb.hue / 360.0;
    let s = hsb.saturation.clamp(0.0, 1.0);
    let v = hsb.brightness.clamp(0.0, 1.0);

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    #[allow(clippy::cast_possible_truncation)]
    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_byte = |c: f64| -> u8 { (c * 255.0).round().clamp(0.0, 255.0) as u8 };

    format!("#{:02X}{:02X}{:02X}", to_byte(r), to_byte(g), to_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_and_long_forms() {
        assert!(is_valid_hex("#FFF"));
        assert!(is_valid_hex("#112233"));
        assert!(is_valid_hex("#abcdef"));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(!is_valid_hex("112233"));
        assert!(!is_valid_hex("#12345"));
        assert!(!is_valid_hex("#GGGGGG"));
        assert!(!is_valid_hex("red"));
        assert!(!is_valid_hex(""));
    }

    #[test]
    fn normalize_expands_short_form() {
        assert_eq!(normalize_hex("#abc").as_deref(), Some("#AABBCC"));
        assert_eq!(normalize_hex("nope"), None);
    }

    #[test]
    fn primary_colors_convert_to_hsb() {
        let red = hex_to_hsb("#FF0000").expect("valid");
        assert!((red.hue - 0.0).abs() < f64::EPSILON);
        assert!((red.saturation - 1.0).abs() < f64::EPSILON);
        assert!((red.brightness - 1.0).abs() < f64::EPSILON);

        let blue = hex_to_hsb("#0000FF").expect("valid");
        assert!((blue.hue - 240.0).abs() < f64::EPSILON);

        let magenta_ish = hex_to_hsb("#FF00FF").expect("valid");
        assert!((magenta_ish.hue - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn grey_has_zero_saturation() {
        let grey = hex_to_hsb("#666666").expect("valid");
        assert!((grey.hue - 0.0).abs() < f64::EPSILON);
        assert!((grey.saturation - 0.0).abs() < f64::EPSILON);
        assert!((grey.brightness - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn hsb_to_hex_is_upper_case() {
        let hex = hsb_to_hex(Hsb {
            hue: 120.0,
            saturation: 1.0,
            brightness: 1.0,
        });
        assert_eq!(hex, "#00FF00");
    }

    #[test]
    fn black_and_white_survive_conversion() {
        for hex in ["#000000", "#FFFFFF", "#FF0000", "#0000FF"] {
            let hsb = hex_to_hsb(hex).expect("valid");
            assert_eq!(hsb_to_hex(hsb), hex);
        }
    }

    #[test]
    fn invalid_hex_has_no_hsb() {
        assert!(hex_to_hsb("#12").is_none());
    }
}
