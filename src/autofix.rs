use serde::{Deserialize, Serialize};

use crate::brand_kit::BrandKit;
use crate::color::BrandPalette;
use crate::config::MatchingConfig;
use crate::element::{DesignElement, ElementKind};

/// One attribute rewritten by [`auto_fix`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFix {
    pub element_id: String,
    pub property: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixOutcome {
    pub elements: Vec<DesignElement>,
    pub fixes: Vec<AppliedFix>,
}

impl AutoFixOutcome {
    pub fn changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

/// Returns a copy of `forest` with off-brand colors replaced by the nearest
/// brand color and off-brand text fonts replaced by the heading or body font.
/// Positions are left as they are.
pub fn auto_fix(
    forest: &[DesignElement],
    kit: &BrandKit,
    matching: &MatchingConfig,
) -> AutoFixOutcome {
    let palette = kit.palette(matching.color_threshold);
    let mut elements = forest.to_vec();
    let mut fixes = Vec::new();

    let mut stack: Vec<&mut DesignElement> = elements.iter_mut().rev().collect();
    while let Some(element) = stack.pop() {
        fix_paint(&mut element.fill, "fill", &element.id, &palette, &mut fixes);
        fix_paint(&mut element.stroke, "stroke", &element.id, &palette, &mut fixes);

        if let ElementKind::Text {
            font_family: Some(font),
            font_size,
        } = &mut element.kind
        {
            if !kit.is_brand_font(font) {
                let replacement = kit.suggested_font(*font_size, matching.heading_font_size);
                fixes.push(AppliedFix {
                    element_id: element.id.clone(),
                    property: "fontFamily".to_string(),
                    from: font.clone(),
                    to: replacement.to_string(),
                });
                *font = replacement.to_string();
            }
        }

        stack.extend(element.children.iter_mut().rev());
    }

    tracing::debug!(kit = %kit.id, fixes = fixes.len(), "auto-fix applied");
    AutoFixOutcome { elements, fixes }
}

fn fix_paint(
    paint: &mut Option<String>,
    property: &str,
    element_id: &str,
    palette: &BrandPalette,
    fixes: &mut Vec<AppliedFix>,
) {
    let Some(color) = paint.as_mut() else { return };
    if !palette.needs_correction(color) {
        return;
    }
    let Some(nearest) = palette.nearest(color) else {
        return;
    };
    fixes.push(AppliedFix {
        element_id: element_id.to_string(),
        property: property.to_string(),
        from: color.clone(),
        to: nearest.to_string(),
    });
    *color = nearest.to_string();
}
