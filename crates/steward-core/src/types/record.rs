//! Presentation records handed to the notification surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Presentation color for a published record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Red,
    Fuchsia,
    Gold,
    Yellow,
    Purple,
    Blue,
    #[default]
    Neutral,
}

impl Color {
    /// RGB value used when rendering the record.
    pub fn rgb(&self) -> u32 {
        match self {
            Self::Green => 0x57F287,
            Self::Red => 0xED4245,
            Self::Fuchsia => 0xEB459E,
            Self::Gold => 0xF1C40F,
            Self::Yellow => 0xFEE75C,
            Self::Purple => 0x9B59B6,
            Self::Blue => 0x3498DB,
            Self::Neutral => 0x000000,
        }
    }
}

/// A single name/value field on a log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogField {
    pub name: String,
    pub value: String,
}

impl LogField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Formatted notification record.
///
/// This is the unit handed to the notification surface: a title, a free-form
/// description, optional fields, a presentation color, and the time the
/// record was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub fields: Vec<LogField>,
    #[serde(default)]
    pub color: Color,
    pub logged_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            color: Color::Neutral,
            logged_at: Utc::now(),
        }
    }

    /// Builder: append a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(LogField::new(name, value));
        self
    }

    /// Builder: replace all fields.
    pub fn with_fields(mut self, fields: Vec<LogField>) -> Self {
        self.fields = fields;
        self
    }

    /// Builder: set the presentation color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = LogRecord::new("Points Updated", "gained 2 points")
            .with_field("Total Points", "7")
            .with_color(Color::Green);

        assert_eq!(record.title, "Points Updated");
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.fields[0].name, "Total Points");
        assert_eq!(record.color, Color::Green);
    }

    #[test]
    fn test_color_rgb() {
        assert_eq!(Color::Green.rgb(), 0x57F287);
        assert_eq!(Color::Neutral.rgb(), 0x000000);
    }

    #[test]
    fn test_record_serde_roundtrip_defaults() {
        let json = r#"{"title":"t","description":"d","logged_at":"2026-08-26T00:00:00Z"}"#;
        let record: LogRecord = serde_json::from_str(json).unwrap();
        assert!(record.fields.is_empty());
        assert_eq!(record.color, Color::Neutral);
    }
}
