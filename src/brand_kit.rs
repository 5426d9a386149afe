//! Brand kit model: approved colors, fonts and spacing for one owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{BrandPalette, HexColor};
use crate::error::{BrandError, Result};

/// Font size at or above which text is treated as a heading.
pub const DEFAULT_HEADING_FONT_SIZE: f32 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedColor {
    pub name: String,
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKit {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default)]
    pub colors: Vec<NamedColor>,
    pub heading_font: String,
    pub body_font: String,
    /// Grid unit in pixels; 0 disables alignment checks.
    #[serde(default)]
    pub spacing_unit: f64,
    #[serde(default)]
    pub enforce_strict: bool,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BrandKit {
    /// The five named colors followed by the free-form list, blanks and
    /// duplicates dropped.
    pub fn palette(&self, threshold: f64) -> BrandPalette {
        let named = [
            Some(&self.primary_color),
            self.secondary_color.as_ref(),
            self.accent_color.as_ref(),
            self.background_color.as_ref(),
            self.text_color.as_ref(),
        ];

        let mut palette = BrandPalette::new(threshold);
        for color in named.into_iter().flatten() {
            palette.insert(color);
        }
        for color in &self.colors {
            palette.insert(&color.hex);
        }
        palette
    }

    pub fn is_brand_font(&self, font_family: &str) -> bool {
        let font = font_family.trim();
        font.eq_ignore_ascii_case(self.heading_font.trim())
            || font.eq_ignore_ascii_case(self.body_font.trim())
    }

    /// Heading font for large text, body font otherwise. Unknown sizes count as body text.
    pub fn suggested_font(&self, font_size: Option<f32>, heading_size: f32) -> &str {
        match font_size {
            Some(size) if size >= heading_size => &self.heading_font,
            _ => &self.body_font,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BrandError::invalid_kit("name must not be empty"));
        }
        if self.heading_font.trim().is_empty() || self.body_font.trim().is_empty() {
            return Err(BrandError::invalid_kit(
                "heading and body fonts must not be empty",
            ));
        }
        if !self.spacing_unit.is_finite() || self.spacing_unit < 0.0 {
            return Err(BrandError::invalid_kit(format!(
                "spacing unit must be finite and >= 0, got {}",
                self.spacing_unit
            )));
        }

        validate_color("primary", &self.primary_color)?;
        let optional = [
            ("secondary", &self.secondary_color),
            ("accent", &self.accent_color),
            ("background", &self.background_color),
            ("text", &self.text_color),
        ];
        for (label, color) in optional {
            if let Some(color) = color.as_deref().filter(|c| !c.trim().is_empty()) {
                validate_color(label, color)?;
            }
        }
        for named in &self.colors {
            validate_color(&named.name, &named.hex)?;
        }
        Ok(())
    }
}

fn validate_color(label: &str, value: &str) -> Result<()> {
    value.parse::<HexColor>().map(|_| ()).map_err(|e| {
        BrandError::invalid_kit(format!("{label} color '{value}' is not a #rrggbb value ({e})"))
    })
}

/// Fields supplied when creating a kit; identity and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKitDraft {
    pub name: String,
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub colors: Vec<NamedColor>,
    pub heading_font: String,
    pub body_font: String,
    #[serde(default)]
    pub spacing_unit: f64,
    #[serde(default)]
    pub enforce_strict: bool,
    #[serde(default)]
    pub is_default: bool,
}

/// Partial update. `Some(None)` on an optional color clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandKitPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub secondary_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub accent_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub background_color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub text_color: Option<Option<String>>,
    #[serde(default)]
    pub colors: Option<Vec<NamedColor>>,
    #[serde(default)]
    pub heading_font: Option<String>,
    #[serde(default)]
    pub body_font: Option<String>,
    #[serde(default)]
    pub spacing_unit: Option<f64>,
    #[serde(default)]
    pub enforce_strict: Option<bool>,
}

/// Distinguishes an explicit `null` (clear) from an absent field (keep).
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl BrandKitPatch {
    pub fn apply_to(self, kit: &mut BrandKit) {
        if let Some(name) = self.name {
            kit.name = name;
        }
        if let Some(primary) = self.primary_color {
            kit.primary_color = primary;
        }
        if let Some(secondary) = self.secondary_color {
            kit.secondary_color = secondary;
        }
        if let Some(accent) = self.accent_color {
            kit.accent_color = accent;
        }
        if let Some(background) = self.background_color {
            kit.background_color = background;
        }
        if let Some(text) = self.text_color {
            kit.text_color = text;
        }
        if let Some(colors) = self.colors {
            kit.colors = colors;
        }
        if let Some(font) = self.heading_font {
            kit.heading_font = font;
        }
        if let Some(font) = self.body_font {
            kit.body_font = font;
        }
        if let Some(unit) = self.spacing_unit {
            kit.spacing_unit = unit;
        }
        if let Some(strict) = self.enforce_strict {
            kit.enforce_strict = strict;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.primary_color.is_none()
            && self.secondary_color.is_none()
            && self.accent_color.is_none()
            && self.background_color.is_none()
            && self.text_color.is_none()
            && self.colors.is_none()
            && self.heading_font.is_none()
            && self.body_font.is_none()
            && self.spacing_unit.is_none()
            && self.enforce_strict.is_none()
    }
}

#[cfg(test)]
pub(crate) fn sample_kit() -> BrandKit {
    let now = Utc::now();
    BrandKit {
        id: "kit-1".to_string(),
        owner_id: "user-1".to_string(),
        name: "Lumina".to_string(),
        primary_color: "#6366f1".to_string(),
        secondary_color: Some("#10b981".to_string()),
        accent_color: None,
        background_color: Some("#ffffff".to_string()),
        text_color: Some("#111827".to_string()),
        colors: vec![NamedColor {
            name: "warning".to_string(),
            hex: "#f59e0b".to_string(),
        }],
        heading_font: "Poppins".to_string(),
        body_font: "Inter".to_string(),
        spacing_unit: 8.0,
        enforce_strict: false,
        is_default: false,
        created_at: now,
        updated_at: now,
    }
}
