//! Hex color parsing, RGB distance and brand palette matching.

use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Distance below which a color counts as a brand color.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 15.0;

/// A `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(Srgb<u8>);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexColorParseError {
    #[error("expected 6 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("'{0}' contains non-hex characters")]
    InvalidDigits(String),
}

impl HexColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn components(&self) -> (u8, u8, u8) {
        (self.0.red, self.0.green, self.0.blue)
    }

    /// Euclidean distance in RGB space, in 0..=255 units per channel.
    pub fn distance(&self, other: &HexColor) -> f64 {
        let dr = f64::from(self.0.red) - f64::from(other.0.red);
        let dg = f64::from(self.0.green) - f64::from(other.0.green);
        let db = f64::from(self.0.blue) - f64::from(other.0.blue);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl FromStr for HexColor {
    type Err = HexColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexColorParseError::InvalidDigits(s.to_string()));
        }
        if digits.len() != 6 {
            return Err(HexColorParseError::InvalidLength(digits.len()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| HexColorParseError::InvalidDigits(s.to_string()))
        };
        Ok(HexColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

pub fn parse_hex(value: &str) -> Option<HexColor> {
    value.parse().ok()
}

/// RGB distance between two hex strings; `INFINITY` when either fails to parse.
pub fn color_distance(a: &str, b: &str) -> f64 {
    match (parse_hex(a), parse_hex(b)) {
        (Some(a), Some(b)) => a.distance(&b),
        _ => f64::INFINITY,
    }
}

/// Ordered set of brand colors. Insertion order decides nearest-match ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandPalette {
    colors: Vec<String>,
    threshold: f64,
}

impl BrandPalette {
    pub fn new(threshold: f64) -> Self {
        Self {
            colors: Vec::new(),
            threshold,
        }
    }

    pub fn from_colors<I, S>(colors: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut palette = Self::new(threshold);
        for color in colors {
            palette.insert(color.as_ref());
        }
        palette
    }

    /// Adds a color unless it is blank or already present (case-insensitive).
    pub fn insert(&mut self, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() || self.colors.iter().any(|c| c.eq_ignore_ascii_case(color)) {
            return false;
        }
        self.colors.push(color.to_string());
        true
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Exact (case-insensitive) match, or closer than the threshold to any entry.
    pub fn contains(&self, color: &str) -> bool {
        let Some(parsed) = parse_hex(color) else {
            return false;
        };
        let color = color.trim();
        self.colors.iter().any(|brand| {
            brand.eq_ignore_ascii_case(color)
                || parse_hex(brand)
                    .map(|b| b.distance(&parsed) < self.threshold)
                    .unwrap_or(false)
        })
    }

    pub fn needs_correction(&self, color: &str) -> bool {
        !self.contains(color)
    }

    /// Minimum-distance brand color; the first-inserted entry wins ties.
    pub fn nearest(&self, color: &str) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for brand in &self.colors {
            let distance = color_distance(color, brand);
            match best {
                Some((_, current)) if distance >= current => {}
                _ => best = Some((brand.as_str(), distance)),
            }
        }
        best.map(|(brand, _)| brand)
    }
}
