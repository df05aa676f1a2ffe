//! Text and paragraph style payloads shared by requests and document reads.
//!
//! The remote service applies a style update only to the fields named in the
//! request's `fields` mask, so every style type here can report which of its
//! fields are populated, in declaration order.

use serde::{Deserialize, Serialize};

/// A length with a unit, e.g. `{"magnitude": 18, "unit": "PT"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub magnitude: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Dimension {
    pub fn pt(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: Unit::Pt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    #[default]
    UnitUnspecified,
    Pt,
}

/// RGB channels in `0.0..=1.0`. The service omits channels that are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RgbColor {
    pub fn gray(level: f64) -> Self {
        Self {
            red: level,
            green: level,
            blue: level,
        }
    }

    /// True when every channel is at least `min`.
    pub fn all_channels_at_least(&self, min: f64) -> bool {
        self.red >= min && self.green >= min && self.blue >= min
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Color {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<RgbColor>,
}

/// A color that may be absent (transparent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalColor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl OptionalColor {
    pub fn rgb(rgb: RgbColor) -> Self {
        Self {
            color: Some(Color {
                rgb_color: Some(rgb),
            }),
        }
    }

    pub fn rgb_color(&self) -> Option<&RgbColor> {
        self.color.as_ref()?.rgb_color.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl WeightedFontFamily {
    pub fn regular(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            weight: Some(400),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Character-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
}

impl TextStyle {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::default()
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            link: Some(Link {
                url: Some(url.into()),
            }),
            ..Self::default()
        }
    }

    pub fn font_family(family: WeightedFontFamily) -> Self {
        Self {
            weighted_font_family: Some(family),
            ..Self::default()
        }
    }

    /// Names of the populated fields, in the order the service expects them
    /// in a `fields` mask.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.link.is_some() {
            fields.push("link");
        }
        if self.weighted_font_family.is_some() {
            fields.push("weightedFontFamily");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

/// The service's built-in paragraph styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedStyleType {
    #[default]
    #[serde(rename = "NORMAL_TEXT")]
    NormalText,
    #[serde(rename = "TITLE")]
    Title,
    #[serde(rename = "SUBTITLE")]
    Subtitle,
    #[serde(rename = "HEADING_1")]
    Heading1,
    #[serde(rename = "HEADING_2")]
    Heading2,
    #[serde(rename = "HEADING_3")]
    Heading3,
    #[serde(rename = "HEADING_4")]
    Heading4,
    #[serde(rename = "HEADING_5")]
    Heading5,
    #[serde(rename = "HEADING_6")]
    Heading6,
    #[serde(rename = "NAMED_STYLE_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

impl NamedStyleType {
    /// Heading style for a markdown heading level; levels above 6 clamp to 6.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            5 => Self::Heading5,
            _ => Self::Heading6,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            Self::Heading4 => Some(4),
            Self::Heading5 => Some(5),
            Self::Heading6 => Some(6),
            _ => None,
        }
    }
}

/// Paragraph-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<NamedStyleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_end: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_above: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_below: Option<Dimension>,
}

impl ParagraphStyle {
    pub fn named(named_style_type: NamedStyleType) -> Self {
        Self {
            named_style_type: Some(named_style_type),
            ..Self::default()
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.named_style_type.is_some() {
            fields.push("namedStyleType");
        }
        if self.indent_start.is_some() {
            fields.push("indentStart");
        }
        if self.indent_end.is_some() {
            fields.push("indentEnd");
        }
        if self.space_above.is_some() {
            fields.push("spaceAbove");
        }
        if self.space_below.is_some() {
            fields.push("spaceBelow");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    pub fn heading_level(&self) -> Option<u8> {
        self.named_style_type.and_then(NamedStyleType::heading_level)
    }
}
