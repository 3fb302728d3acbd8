use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            to_color32(rgb)
        })
        .collect()
}

/// Convert a diagram node colour to an egui colour.
pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps unique values of a chosen column to distinct colours (card accents).
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    /// `Null` never gets a hue of its own.
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let values: Vec<&CellValue> = unique_values.iter().filter(|v| !v.is_null()).collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<CellValue, Color32> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.to_string(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sankey::MethodFamily;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn family_colour_converts_exactly() {
        assert_eq!(
            to_color32(MethodFamily::FeatureBased.color()),
            Color32::from_rgb(227, 109, 109)
        );
    }

    #[test]
    fn color_map_skips_null_and_defaults_to_gray() {
        let values: BTreeSet<CellValue> =
            [CellValue::Null, CellValue::from("Biology"), CellValue::from("Statistics")].into();
        let map = ColorMap::new("Community (standardized)", &values);

        assert_eq!(map.legend_entries().len(), 2);
        assert_eq!(map.color_for(&CellValue::Null), Color32::GRAY);
        assert_ne!(map.color_for(&CellValue::from("Biology")), Color32::GRAY);
    }
}
