//! Hex colour parsing and conversion to the HSLuv perceptual colour space.
//!
//! Highlight colours are blended in HSLuv rather than sRGB so that a fade between two saturated
//! hues stays saturated instead of passing through grey.

use crate::animation::track::Lerp;
use crate::foundation::error::{ScoreError, ScoreResult};

/// Straight (non-premultiplied) sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Rgb8 = Rgb8 {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
pub fn parse_hex(s: &str) -> ScoreResult<Rgb8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return Err(ScoreError::config(format!(
            "hex color \"{s}\" must be #RRGGBB"
        )));
    }

    fn hex_byte(pair: &str) -> ScoreResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| ScoreError::config(format!("invalid hex byte \"{pair}\"")))
    }

    Ok(Rgb8 {
        r: hex_byte(&s[0..2])?,
        g: hex_byte(&s[2..4])?,
        b: hex_byte(&s[4..6])?,
    })
}

/// HSLuv coordinates: hue in degrees, saturation and lightness in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsluv {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Per-channel linear blend; hue does not wrap around 360.
impl Lerp for Hsluv {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            h: a.h + (b.h - a.h) * t,
            s: a.s + (b.s - a.s) * t,
            l: a.l + (b.l - a.l) * t,
        }
    }
}

impl From<Rgb8> for Hsluv {
    fn from(c: Rgb8) -> Self {
        let unit = |v: u8| f64::from(v) / 255.0;
        let (h, s, l) = hsluv::rgb_to_hsluv(unit(c.r), unit(c.g), unit(c.b));
        Self { h, s, l }
    }
}

/// Channels are rounded to nearest and clamped, so an anchor colour survives the round trip.
impl From<Hsluv> for Rgb8 {
    fn from(c: Hsluv) -> Self {
        let (r, g, b) = hsluv::hsluv_to_rgb(c.h, c.s, c.l);
        let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb8 {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }
}
