// SPDX-License-Identifier: MIT
//
// Terminal colors and color-capability profiles.
//
// Themes are authored in 24-bit RGB. Not every terminal can show that, so
// the renderer downgrades each cell color through a `ColorProfile` at output
// time: TrueColor passes through, 256- and 16-color terminals get the
// perceptually nearest palette entry (Oklab distance), and `NoColor` drops
// colors entirely so only attributes remain.
//
// Single-letter names (r, g, b, l, m, s) are the usual color-science
// notation and are kept that way on purpose.
#![allow(clippy::many_single_char_names)]

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A color as stored in a cell and written to the terminal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit color.
    Rgb(u8, u8, u8),
    /// Palette index; 0–15 are the terminal's own ANSI colors.
    Ansi256(u8),
    /// Whatever the terminal's configured default is.
    #[default]
    Default,
}

impl CellColor {
    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let digits = s.as_bytes();
        match digits.len() {
            3 => {
                let r = hex_digit(digits[0])?;
                let g = hex_digit(digits[1])?;
                let b = hex_digit(digits[2])?;
                Some(Self::Rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => Some(Self::Rgb(
                hex_byte(digits[0], digits[1])?,
                hex_byte(digits[2], digits[3])?,
                hex_byte(digits[4], digits[5])?,
            )),
            _ => None,
        }
    }

    /// RGB components, or `None` for [`CellColor::Default`].
    #[must_use]
    pub fn to_rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Self::Rgb(r, g, b) => Some((r, g, b)),
            Self::Ansi256(idx) => Some(ansi::ansi256_to_rgb(idx)),
            Self::Default => None,
        }
    }

    /// Nearest entry in the 256-color palette.
    #[must_use]
    pub fn to_ansi256(self) -> Self {
        match self {
            Self::Rgb(r, g, b) => Self::Ansi256(ansi::nearest_ansi256(r, g, b)),
            other => other,
        }
    }

    /// Nearest of the 16 basic ANSI colors.
    #[must_use]
    pub fn to_ansi16(self) -> Self {
        match self {
            Self::Ansi256(idx) if idx < 16 => self,
            Self::Default => Self::Default,
            other => match other.to_rgb() {
                Some((r, g, b)) => Self::Ansi256(ansi::nearest_ansi16(r, g, b)),
                None => Self::Default,
            },
        }
    }

    /// WCAG relative luminance in `[0, 1]`; `None` for the terminal default.
    #[must_use]
    pub fn luminance(self) -> Option<f32> {
        let (r, g, b) = self.to_rgb()?;
        let lin = |v: u8| srgb_to_linear(f32::from(v) / 255.0);
        Some(0.2126f32.mul_add(lin(r), 0.7152f32.mul_add(lin(g), 0.0722 * lin(b))))
    }

    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(hi: u8, lo: u8) -> Option<u8> {
    Some(hex_digit(hi)? << 4 | hex_digit(lo)?)
}

// ─── Color Profile ───────────────────────────────────────────────────────────

/// How many colors the attached terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorProfile {
    #[default]
    TrueColor,
    Ansi256,
    Ansi16,
    /// No colors at all; attributes only.
    NoColor,
}

impl ColorProfile {
    /// Detect the profile from environment variables.
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    ///
    /// - `NO_COLOR` set and non-empty → `NoColor`
    /// - `COLORTERM` containing `truecolor`/`24bit`, `TERM_PROGRAM=vhs`, or
    ///   `VHS` set → `TrueColor`
    /// - `COLORTERM` or `TERM` containing `256` → `Ansi256`
    /// - `TERM=dumb` → `NoColor`
    /// - anything else → `Ansi16`
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if var("NO_COLOR").is_some() {
            return Self::NoColor;
        }

        let colorterm = var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
        let term = var("TERM").unwrap_or_default().to_ascii_lowercase();
        let term_program = var("TERM_PROGRAM").unwrap_or_default().to_ascii_lowercase();

        if colorterm.contains("truecolor")
            || colorterm.contains("24bit")
            || term_program == "vhs"
            || var("VHS").is_some()
        {
            Self::TrueColor
        } else if colorterm.contains("256") || term.contains("256") {
            Self::Ansi256
        } else if term == "dumb" {
            Self::NoColor
        } else {
            Self::Ansi16
        }
    }

    /// Bring `color` within this profile's capabilities.
    #[must_use]
    pub fn apply(self, color: CellColor) -> CellColor {
        match self {
            Self::TrueColor => color,
            Self::Ansi256 => color.to_ansi256(),
            Self::Ansi16 => color.to_ansi16(),
            Self::NoColor => CellColor::Default,
        }
    }
}

// ─── sRGB / Oklab ────────────────────────────────────────────────────────────

/// Remove the sRGB transfer curve from one component in `[0, 1]`.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// 8-bit sRGB to Oklab `(L, a, b)`.
fn rgb_to_oklab(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let lr = srgb_to_linear(f32::from(r) / 255.0);
    let lg = srgb_to_linear(f32::from(g) / 255.0);
    let lb = srgb_to_linear(f32::from(b) / 255.0);

    let l = 0.051_457_565f32.mul_add(lb, 0.412_221_47f32.mul_add(lr, 0.536_332_55 * lg));
    let m = 0.107_406_58f32.mul_add(lb, 0.211_903_5f32.mul_add(lr, 0.680_699_5 * lg));
    let s = 0.629_978_7f32.mul_add(lb, 0.088_302_46f32.mul_add(lr, 0.281_718_85 * lg));

    let (l_, m_, s_) = (l.cbrt(), m.cbrt(), s.cbrt());

    (
        0.004_072_047f32.mul_add(-s_, 0.210_454_26f32.mul_add(l_, 0.793_617_8 * m_)),
        0.450_593_7f32.mul_add(s_, 1.977_998_5f32.mul_add(l_, -(2.428_592_2 * m_))),
        0.808_675_77f32.mul_add(-s_, 0.025_904_037f32.mul_add(l_, 0.782_771_77 * m_)),
    )
}

// ─── ANSI Palette ────────────────────────────────────────────────────────────

pub mod ansi {
    //! The xterm palette and perceptual nearest-match into it.

    use super::rgb_to_oklab;

    /// xterm defaults for the 16 basic colors.
    pub const ANSI16_RGB: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (128, 0, 0),
        (0, 128, 0),
        (128, 128, 0),
        (0, 0, 128),
        (128, 0, 128),
        (0, 128, 128),
        (192, 192, 192),
        (128, 128, 128),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (0, 0, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];

    /// RGB value of a 256-color palette index.
    #[must_use]
    pub fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
        match idx {
            0..=15 => ANSI16_RGB[idx as usize],
            16..=231 => {
                let i = idx - 16;
                let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
                (level(i / 36), level((i % 36) / 6), level(i % 6))
            }
            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                (v, v, v)
            }
        }
    }

    fn nearest(r: u8, g: u8, b: u8, candidates: impl Iterator<Item = u8>) -> u8 {
        let (l1, a1, b1) = rgb_to_oklab(r, g, b);
        let mut best = (0u8, f32::MAX);
        for idx in candidates {
            let (cr, cg, cb) = ansi256_to_rgb(idx);
            let (l2, a2, b2) = rgb_to_oklab(cr, cg, cb);
            let (dl, da, db) = (l1 - l2, a1 - a2, b1 - b2);
            let dist = db.mul_add(db, dl.mul_add(dl, da * da));
            if dist < best.1 {
                best = (idx, dist);
            }
        }
        best.0
    }

    /// Nearest 256-color index by Oklab distance.
    ///
    /// Only the cube and grayscale ramp are searched: indices 0–15 are
    /// remapped by most user color schemes, so matching them would be a guess.
    #[must_use]
    pub fn nearest_ansi256(r: u8, g: u8, b: u8) -> u8 {
        nearest(r, g, b, 16..=255)
    }

    /// Nearest basic ANSI color by Oklab distance.
    #[must_use]
    pub fn nearest_ansi16(r: u8, g: u8, b: u8) -> u8 {
        nearest(r, g, b, 0..16)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    // ── Hex ─────────────────────────────────────────────────────────────

    #[test]
    fn hex_long_and_short() {
        assert_eq!(CellColor::hex("#2E8B57"), Some(CellColor::Rgb(0x2e, 0x8b, 0x57)));
        assert_eq!(CellColor::hex("ffd700"), Some(CellColor::Rgb(255, 215, 0)));
        assert_eq!(CellColor::hex("#fff"), Some(CellColor::Rgb(255, 255, 255)));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(CellColor::hex("#12345"), None);
        assert_eq!(CellColor::hex("#gg0000"), None);
        assert_eq!(CellColor::hex(""), None);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", CellColor::Rgb(1, 2, 255)), "#0102ff");
        assert_eq!(format!("{}", CellColor::Ansi256(42)), "ansi(42)");
        assert_eq!(format!("{}", CellColor::Default), "default");
    }

    // ── Palette ─────────────────────────────────────────────────────────

    #[test]
    fn palette_cube_and_ramp() {
        assert_eq!(ansi::ansi256_to_rgb(16), (0, 0, 0));
        assert_eq!(ansi::ansi256_to_rgb(231), (255, 255, 255));
        assert_eq!(ansi::ansi256_to_rgb(196), (255, 0, 0));
        assert_eq!(ansi::ansi256_to_rgb(232), (8, 8, 8));
        assert_eq!(ansi::ansi256_to_rgb(255), (238, 238, 238));
    }

    #[test]
    fn exact_cube_colors_match_themselves() {
        assert_eq!(ansi::nearest_ansi256(255, 0, 0), 196);
        assert_eq!(ansi::nearest_ansi256(0, 0, 255), 21);
        assert_eq!(ansi::nearest_ansi256(95, 135, 175), 67);
    }

    #[test]
    fn nearest_16_for_primaries() {
        assert_eq!(ansi::nearest_ansi16(250, 5, 5), 9);
        assert_eq!(ansi::nearest_ansi16(0, 0, 0), 0);
        assert_eq!(ansi::nearest_ansi16(255, 255, 255), 15);
    }

    #[test]
    fn downgrade_keeps_default() {
        assert_eq!(CellColor::Default.to_ansi256(), CellColor::Default);
        assert_eq!(CellColor::Default.to_ansi16(), CellColor::Default);
    }

    #[test]
    fn ansi16_passes_basic_indices_through() {
        assert_eq!(CellColor::Ansi256(3).to_ansi16(), CellColor::Ansi256(3));
        let CellColor::Ansi256(idx) = CellColor::Ansi256(196).to_ansi16() else {
            panic!("expected palette color");
        };
        assert!(idx < 16);
    }

    #[test]
    fn luminance_extremes() {
        assert_eq!(CellColor::Rgb(0, 0, 0).luminance(), Some(0.0));
        let white = CellColor::Rgb(255, 255, 255).luminance().unwrap();
        assert!((white - 1.0).abs() < 1e-4);
        assert_eq!(CellColor::Default.luminance(), None);
    }

    // ── Profile ─────────────────────────────────────────────────────────

    #[test]
    fn detect_truecolor() {
        assert_eq!(
            ColorProfile::detect(env(&[("COLORTERM", "truecolor")])),
            ColorProfile::TrueColor
        );
        assert_eq!(
            ColorProfile::detect(env(&[("COLORTERM", "24bit")])),
            ColorProfile::TrueColor
        );
    }

    #[test]
    fn detect_vhs_forces_truecolor() {
        assert_eq!(
            ColorProfile::detect(env(&[("TERM_PROGRAM", "vhs")])),
            ColorProfile::TrueColor
        );
        assert_eq!(
            ColorProfile::detect(env(&[("VHS", "1"), ("TERM", "xterm")])),
            ColorProfile::TrueColor
        );
    }

    #[test]
    fn detect_256() {
        assert_eq!(
            ColorProfile::detect(env(&[("TERM", "xterm-256color")])),
            ColorProfile::Ansi256
        );
        assert_eq!(
            ColorProfile::detect(env(&[("COLORTERM", "256")])),
            ColorProfile::Ansi256
        );
    }

    #[test]
    fn detect_no_color_wins() {
        assert_eq!(
            ColorProfile::detect(env(&[("NO_COLOR", "1"), ("COLORTERM", "truecolor")])),
            ColorProfile::NoColor
        );
    }

    #[test]
    fn detect_empty_no_color_is_ignored() {
        assert_eq!(
            ColorProfile::detect(env(&[("NO_COLOR", ""), ("TERM", "xterm")])),
            ColorProfile::Ansi16
        );
    }

    #[test]
    fn detect_dumb_and_fallback() {
        assert_eq!(ColorProfile::detect(env(&[("TERM", "dumb")])), ColorProfile::NoColor);
        assert_eq!(ColorProfile::detect(env(&[])), ColorProfile::Ansi16);
    }

    #[test]
    fn apply_per_profile() {
        let gold = CellColor::Rgb(255, 215, 0);
        assert_eq!(ColorProfile::TrueColor.apply(gold), gold);
        assert!(matches!(ColorProfile::Ansi256.apply(gold), CellColor::Ansi256(i) if i >= 16));
        assert!(matches!(ColorProfile::Ansi16.apply(gold), CellColor::Ansi256(i) if i < 16));
        assert_eq!(ColorProfile::NoColor.apply(gold), CellColor::Default);
    }
}
