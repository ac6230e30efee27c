//! Template variables and their zones.
//!
//! A template variable zone generalizes the OCR zone: the same rectangle,
//! plus the template page it sits on, the data path it renders, and how to
//! render it. Variable paths are a closed enumeration with an explicit
//! parser, so an unresolvable path is a typed outcome instead of a runtime
//! lookup miss.

use serde::{Deserialize, Serialize};

use crate::zone::{MetricCategory, Zone};

/// How a zone renders its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Text,
    Image,
}

/// Which field of a KPI entry a path targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiField {
    Current,
    Previous,
    Analysis,
}

impl KpiField {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Previous => "previous",
            Self::Analysis => "analysis",
        }
    }
}

/// A resolvable path into the report dataset.
///
/// Serialized as the dotted string the configuration stores
/// (`kpis.calls.current`, `client.name`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariablePath {
    ClientName,
    ClientLogo,
    PeriodLabel,
    Kpi(MetricCategory, KpiField),
}

impl VariablePath {
    /// Every path the editor can offer, in menu order.
    pub fn all() -> Vec<VariablePath> {
        let mut paths = vec![Self::ClientName, Self::ClientLogo, Self::PeriodLabel];
        for category in MetricCategory::ALL {
            for field in [KpiField::Current, KpiField::Previous, KpiField::Analysis] {
                paths.push(Self::Kpi(category, field));
            }
        }
        paths
    }

    /// The rendering kind this variable requires. Only the logo is an image.
    pub fn kind(&self) -> VariableKind {
        match self {
            Self::ClientLogo => VariableKind::Image,
            _ => VariableKind::Text,
        }
    }

    /// Parses a dotted path. Accepts the legacy French category segments
    /// still present in older saved configurations.
    pub fn parse(s: &str) -> Option<Self> {
        let segments: Vec<&str> = s.split('.').collect();
        match segments.as_slice() {
            ["client", "name"] => Some(Self::ClientName),
            ["client", "logo"] => Some(Self::ClientLogo),
            ["period", "label"] => Some(Self::PeriodLabel),
            ["kpis", category, field] => {
                let category = parse_category_segment(category)?;
                let field = match *field {
                    "current" => KpiField::Current,
                    "previous" => KpiField::Previous,
                    "analysis" => KpiField::Analysis,
                    _ => return None,
                };
                Some(Self::Kpi(category, field))
            }
            _ => None,
        }
    }
}

fn parse_category_segment(s: &str) -> Option<MetricCategory> {
    match s {
        "overview" | "vue_ensemble" => Some(MetricCategory::Overview),
        "calls" | "appels" => Some(MetricCategory::Calls),
        "web_clicks" | "clics_web" | "clics" => Some(MetricCategory::WebClicks),
        "directions" | "itineraires" => Some(MetricCategory::Directions),
        _ => None,
    }
}

impl std::fmt::Display for VariablePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientName => write!(f, "client.name"),
            Self::ClientLogo => write!(f, "client.logo"),
            Self::PeriodLabel => write!(f, "period.label"),
            Self::Kpi(category, field) => write!(f, "kpis.{}.{}", category, field.as_str()),
        }
    }
}

impl Serialize for VariablePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VariablePath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown variable path: {s}")))
    }
}

/// Horizontal alignment of stamped text inside its zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Text rendering options for a text zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(rename = "fontSize", default = "default_font_size")]
    pub font_size: f32,
    /// CSS-style hex color (`#rrggbb`).
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub align: Align,
}

fn default_font_size() -> f32 {
    16.0
}

fn default_color() -> String {
    "#000000".to_string()
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            color: default_color(),
            align: Align::default(),
        }
    }
}

impl TextStyle {
    /// Parses the hex color; malformed values fall back to black.
    pub fn rgba(&self) -> [u8; 4] {
        parse_hex_color(&self.color).unwrap_or([0, 0, 0, 255])
    }
}

fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b, 255])
        }
        3 => {
            let component = |c: &str| u8::from_str_radix(c, 16).ok().map(|v| v * 17);
            Some([
                component(&hex[0..1])?,
                component(&hex[1..2])?,
                component(&hex[2..3])?,
                255,
            ])
        }
        _ => None,
    }
}

/// A zone on a template page bound to one variable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateVariableZone {
    #[serde(flatten)]
    pub zone: Zone,
    /// 1-based page index into the template's page list.
    pub page: usize,
    pub variable: VariablePath,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    /// Present for text zones only.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

/// The persisted shape with the style fields flattened beside the rectangle.
/// Read back as individual options so a record with no style fields yields
/// `style: None` rather than a defaulted style on an image zone.
#[derive(Deserialize)]
struct WireVariableZone {
    #[serde(flatten)]
    zone: Zone,
    page: usize,
    variable: VariablePath,
    #[serde(rename = "type")]
    kind: VariableKind,
    #[serde(rename = "fontSize")]
    font_size: Option<f32>,
    color: Option<String>,
    align: Option<Align>,
}

impl<'de> Deserialize<'de> for TemplateVariableZone {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireVariableZone::deserialize(deserializer)?;
        let style = if wire.font_size.is_none() && wire.color.is_none() && wire.align.is_none() {
            None
        } else {
            Some(TextStyle {
                font_size: wire.font_size.unwrap_or_else(default_font_size),
                color: wire.color.unwrap_or_else(default_color),
                align: wire.align.unwrap_or_default(),
            })
        };
        Ok(Self {
            zone: wire.zone,
            page: wire.page,
            variable: wire.variable,
            kind: wire.kind,
            style,
        })
    }
}

impl TemplateVariableZone {
    /// True when the kind matches what the variable requires.
    pub fn kind_is_consistent(&self) -> bool {
        self.kind == self.variable.kind()
    }
}
