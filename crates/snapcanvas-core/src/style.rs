//! Style properties for shapes.
//!
//! Numeric properties are stored as bare numbers in logical units. Units are
//! only attached when the style is turned into draw-time declarations.

use serde::{Deserialize, Serialize};

/// Multiple of the grid unit used for a new shape's width and height.
pub const SPAWN_SIZE_UNITS: f64 = 8.0;

/// Horizontal text alignment inside a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    /// CSS keyword for this alignment.
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// Style properties of a rectangle.
///
/// Missing fields fall back to their defaults when deserializing, so older
/// or partially written records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    pub border_width: f64,
    pub border_radius: f64,
    pub border_color: String,
    pub border_style: String,
    /// Text color.
    pub color: String,
    pub font_size: f64,
    pub line_height: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub text_align: TextAlign,
    /// Stacking order. Assigned once at creation.
    pub z_index: i64,
    /// Opacity on a 0-100 scale.
    pub opacity: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::for_unit(crate::store::DEFAULT_UNIT, 0)
    }
}

impl ShapeStyle {
    /// Default style for a freshly spawned shape on a grid of `unit`.
    pub fn for_unit(unit: f64, z_index: i64) -> Self {
        Self {
            width: unit * SPAWN_SIZE_UNITS,
            height: unit * SPAWN_SIZE_UNITS,
            background_color: "white".to_string(),
            border_width: 0.0,
            border_radius: 0.0,
            border_color: "#000".to_string(),
            border_style: "solid".to_string(),
            color: "#000".to_string(),
            font_size: 12.0,
            line_height: 12.0,
            padding_left: 0.0,
            padding_right: 0.0,
            padding_top: 0.0,
            padding_bottom: 0.0,
            text_align: TextAlign::Left,
            z_index,
            opacity: 100.0,
        }
    }

    /// Return a copy with a new size, keeping every other property.
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    /// Clamp values that must stay inside their valid ranges.
    pub(crate) fn normalize(&mut self, min_size: f64) {
        if !self.width.is_finite() || self.width < min_size {
            self.width = min_size;
        }
        if !self.height.is_finite() || self.height < min_size {
            self.height = min_size;
        }
        self.opacity = if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 100.0)
        } else {
            100.0
        };
    }

    /// Opacity on the 0-1 scale used when drawing.
    pub fn alpha(&self) -> f64 {
        self.opacity / 100.0
    }

    /// Render the style as ordered `(property, value)` declarations.
    ///
    /// Pixel properties get a `px` suffix here and nowhere else.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let px = |value: f64| format!("{value}px");
        vec![
            ("width", px(self.width)),
            ("height", px(self.height)),
            ("min-width", px(self.padding_left + self.padding_right)),
            ("min-height", px(self.padding_top + self.padding_bottom)),
            ("background-color", self.background_color.clone()),
            ("border-width", px(self.border_width)),
            ("border-radius", px(self.border_radius)),
            ("border-color", self.border_color.clone()),
            ("border-style", self.border_style.clone()),
            ("color", self.color.clone()),
            ("font-size", px(self.font_size)),
            ("line-height", px(self.line_height)),
            ("padding-left", px(self.padding_left)),
            ("padding-right", px(self.padding_right)),
            ("padding-top", px(self.padding_top)),
            ("padding-bottom", px(self.padding_bottom)),
            ("text-align", self.text_align.as_str().to_string()),
            ("z-index", self.z_index.to_string()),
            ("opacity", self.alpha().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(decls: &'a [(&'static str, String)], name: &str) -> &'a str {
        decls
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_default_style_for_unit() {
        let style = ShapeStyle::for_unit(14.0, 3);
        assert!((style.width - 112.0).abs() < f64::EPSILON);
        assert!((style.height - 112.0).abs() < f64::EPSILON);
        assert_eq!(style.z_index, 3);
        assert_eq!(style.background_color, "white");
        assert_eq!(style.text_align, TextAlign::Left);
        assert!((style.opacity - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_declarations_append_units_at_draw_time() {
        let mut style = ShapeStyle::for_unit(14.0, 1);
        style.padding_left = 4.0;
        style.padding_right = 6.0;
        style.opacity = 50.0;

        let decls = style.declarations();
        assert_eq!(lookup(&decls, "width"), "112px");
        assert_eq!(lookup(&decls, "min-width"), "10px");
        assert_eq!(lookup(&decls, "opacity"), "0.5");
        assert_eq!(lookup(&decls, "z-index"), "1");
        assert_eq!(lookup(&decls, "text-align"), "left");
        // Stored value stays a bare number.
        assert!((style.width - 112.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_enforces_floor_and_opacity_range() {
        let mut style = ShapeStyle::for_unit(14.0, 1);
        style.width = 2.0;
        style.height = f64::NAN;
        style.opacity = 140.0;
        style.normalize(10.0);
        assert!((style.width - 10.0).abs() < f64::EPSILON);
        assert!((style.height - 10.0).abs() < f64::EPSILON);
        assert!((style.opacity - 100.0).abs() < f64::EPSILON);

        style.opacity = -3.0;
        style.normalize(10.0);
        assert!(style.opacity.abs() < f64::EPSILON);
    }

    #[test]
    fn test_camel_case_serialization() {
        let style = ShapeStyle::for_unit(14.0, 2);
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["backgroundColor"], "white");
        assert_eq!(json["zIndex"], 2);
        assert_eq!(json["textAlign"], "left");
        assert_eq!(json["width"], 112.0);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let style: ShapeStyle = serde_json::from_str(r#"{"width": 40, "zIndex": 7}"#).unwrap();
        assert!((style.width - 40.0).abs() < f64::EPSILON);
        assert_eq!(style.z_index, 7);
        assert_eq!(style.border_style, "solid");
    }
}
