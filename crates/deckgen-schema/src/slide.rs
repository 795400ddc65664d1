//! Slide records, the typed intermediate representation of a deck.
//!
//! A deck is an ordered `Vec<SlideRecord>` with dense, zero-based indices.
//! The record is a tagged union keyed by `type`; the tag set is closed at
//! this layer because synthesis normalizes any unknown or missing tag to
//! `content` before a record enters the deck.

use serde::{Deserialize, Serialize};

/// Chart geometry family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Line,
}

impl ChartKind {
    /// Parse a loosely supplied chart type, defaulting to bar.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pie" => ChartKind::Pie,
            "line" => ChartKind::Line,
            _ => ChartKind::Bar,
        }
    }
}

/// Labeled numeric series for chart slides.
///
/// `labels.len() == values.len()` must hold before rendering; when it does
/// not, the renderer skips the plot and falls back to a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,

    /// Optional per-series colors extending the theme palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ChartData {
    /// Number of renderable points (shorter of labels/values).
    pub fn point_count(&self) -> usize {
        self.labels.len().min(self.values.len())
    }

    /// True when the length invariant holds and there is data to draw.
    pub fn is_balanced(&self) -> bool {
        !self.labels.is_empty() && self.labels.len() == self.values.len()
    }
}

/// One column of a two-column or comparison slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnBlock {
    pub header: String,
    pub items: Vec<String>,
}

/// Variant-specific slide content, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlideBody {
    #[serde(rename = "title", rename_all = "camelCase")]
    Title {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },

    #[serde(rename = "agenda")]
    Agenda { bullets: Vec<String> },

    #[serde(rename = "content")]
    Content { bullets: Vec<String> },

    /// Exactly two columns is the contract; the renderer degrades when a
    /// hand-edited deck carries a different count.
    #[serde(rename = "two-column")]
    TwoColumn { columns: Vec<ColumnBlock> },

    #[serde(rename = "comparison")]
    Comparison { columns: Vec<ColumnBlock> },

    #[serde(rename = "chart", rename_all = "camelCase")]
    Chart {
        chart_type: ChartKind,
        chart_data: ChartData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bullets: Option<Vec<String>>,
    },

    #[serde(rename = "image-text", rename_all = "camelCase")]
    ImageText {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_number: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_number_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bullets: Option<Vec<String>>,
        /// Embedded raster payload (`data:image/...;base64,...`), supplied
        /// externally and never regenerated by the model
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_data_url: Option<String>,
    },

    #[serde(rename = "summary")]
    Summary { bullets: Vec<String> },

    /// Catch-all for unrecognized type tags in hand-edited decks. Keeps
    /// whatever bullets were present; rendered with the content template.
    #[serde(untagged)]
    Other {
        #[serde(default)]
        bullets: Vec<String>,
    },
}

impl SlideBody {
    /// The wire name of this variant's tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            SlideBody::Title { .. } => "title",
            SlideBody::Agenda { .. } => "agenda",
            SlideBody::Content { .. } => "content",
            SlideBody::TwoColumn { .. } => "two-column",
            SlideBody::Comparison { .. } => "comparison",
            SlideBody::Chart { .. } => "chart",
            SlideBody::ImageText { .. } => "image-text",
            SlideBody::Summary { .. } => "summary",
            SlideBody::Other { .. } => "content",
        }
    }

    /// Bullets carried by this variant, if any.
    pub fn bullets(&self) -> Option<&[String]> {
        match self {
            SlideBody::Agenda { bullets }
            | SlideBody::Content { bullets }
            | SlideBody::Summary { bullets }
            | SlideBody::Other { bullets } => Some(bullets),
            SlideBody::Chart { bullets, .. } | SlideBody::ImageText { bullets, .. } => {
                bullets.as_deref()
            }
            _ => None,
        }
    }

    /// Mutable bullets, for the manual-edit path.
    pub fn bullets_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            SlideBody::Agenda { bullets }
            | SlideBody::Content { bullets }
            | SlideBody::Summary { bullets }
            | SlideBody::Other { bullets } => Some(bullets),
            SlideBody::Chart { bullets, .. } | SlideBody::ImageText { bullets, .. } => {
                bullets.as_mut()
            }
            _ => None,
        }
    }

    /// Externally supplied image payload, if this variant carries one.
    pub fn image_data_url(&self) -> Option<&str> {
        match self {
            SlideBody::ImageText { image_data_url, .. } => image_data_url.as_deref(),
            _ => None,
        }
    }
}

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Position in the deck: 0-based, dense, unique
    pub index: usize,

    pub title: String,

    /// Speaker notes, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub body: SlideBody,
}

impl SlideRecord {
    /// Create a content slide (the default/fallback variant).
    pub fn content(index: usize, title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            index,
            title: title.into(),
            notes: None,
            body: SlideBody::Content { bullets },
        }
    }

    /// Create a title slide.
    pub fn title_slide(index: usize, title: impl Into<String>, subtitle: Option<String>) -> Self {
        Self {
            index,
            title: title.into(),
            notes: None,
            body: SlideBody::Title { subtitle },
        }
    }

    /// Create a summary slide.
    pub fn summary(index: usize, title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            index,
            title: title.into(),
            notes: None,
            body: SlideBody::Summary { bullets },
        }
    }

    /// Attach speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_serialization() {
        let slide = SlideRecord::title_slide(0, "Welcome", Some("Q3 review".to_string()));
        let json = serde_json::to_value(&slide).unwrap();

        assert_eq!(json["type"], "title");
        assert_eq!(json["index"], 0);
        assert_eq!(json["subtitle"], "Q3 review");
    }

    #[test]
    fn test_camel_case_chart_fields() {
        let slide = SlideRecord {
            index: 2,
            title: "Sales".to_string(),
            notes: None,
            body: SlideBody::Chart {
                chart_type: ChartKind::Pie,
                chart_data: ChartData {
                    labels: vec!["A".into(), "B".into()],
                    values: vec![75.0, 25.0],
                    colors: None,
                },
                bullets: None,
            },
        };
        let json = serde_json::to_value(&slide).unwrap();

        assert_eq!(json["chartType"], "pie");
        assert_eq!(json["chartData"]["labels"][0], "A");
    }

    #[test]
    fn test_deck_round_trip() {
        let deck = vec![
            SlideRecord::title_slide(0, "T", None),
            SlideRecord::content(1, "C", vec!["one".into(), "two".into()]),
            SlideRecord {
                index: 2,
                title: "Img".to_string(),
                notes: Some("speak slowly".to_string()),
                body: SlideBody::ImageText {
                    key_number: Some("42%".to_string()),
                    key_number_label: Some("growth".to_string()),
                    bullets: Some(vec!["a".into()]),
                    image_data_url: None,
                },
            },
        ];

        let json = serde_json::to_string(&deck).unwrap();
        let back: Vec<SlideRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_unknown_type_tag_still_deserializes() {
        let json = r#"{"index": 3, "title": "Mystery", "type": "quote",
                        "bullets": ["kept"]}"#;
        let slide: SlideRecord = serde_json::from_str(json).unwrap();

        assert_eq!(slide.title, "Mystery");
        assert_eq!(slide.body.type_name(), "content");
        assert_eq!(slide.body.bullets(), Some(&["kept".to_string()][..]));
    }

    #[test]
    fn test_chart_kind_lenient() {
        assert_eq!(ChartKind::parse_lenient("PIE"), ChartKind::Pie);
        assert_eq!(ChartKind::parse_lenient(" line "), ChartKind::Line);
        assert_eq!(ChartKind::parse_lenient("donut"), ChartKind::Bar);
    }

    #[test]
    fn test_chart_data_balance() {
        let balanced = ChartData {
            labels: vec!["a".into(), "b".into()],
            values: vec![1.0, 2.0],
            colors: None,
        };
        assert!(balanced.is_balanced());
        assert_eq!(balanced.point_count(), 2);

        let lopsided = ChartData {
            labels: vec!["a".into(), "b".into(), "c".into()],
            values: vec![1.0],
            colors: None,
        };
        assert!(!lopsided.is_balanced());
        assert_eq!(lopsided.point_count(), 1);
    }

    #[test]
    fn test_bullets_accessor() {
        let slide = SlideRecord::content(0, "C", vec!["x".into()]);
        assert_eq!(slide.body.bullets(), Some(&["x".to_string()][..]));

        let title = SlideRecord::title_slide(0, "T", None);
        assert!(title.body.bullets().is_none());
    }
}
