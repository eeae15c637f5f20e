// Field-oriented frames relayed to stream subscribers
use super::telemetry::TelemetryRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fields a subscriber may select, in the order they appear in a frame.
pub const SELECTABLE_FIELDS: [&str; 9] = [
    "altitude",
    "latitude",
    "longitude",
    "state",
    "pitch",
    "roll",
    "yaw",
    "gforce",
    "signal",
];

/// Allow-list of record fields to forward downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<&'static str>,
}

impl FieldSelection {
    /// Build a selection from requested names. Unknown names are dropped;
    /// an empty result selects every field.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            match SELECTABLE_FIELDS.iter().find(|f| **f == name) {
                Some(field) if !fields.contains(field) => fields.push(*field),
                Some(_) => {}
                None if name.is_empty() => {}
                None => tracing::debug!("Ignoring unknown field selection: {}", name),
            }
        }
        Self { fields }
    }

    /// Parse a comma-separated list such as `altitude,latitude`.
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    pub fn includes(&self, field: &str) -> bool {
        self.fields.is_empty() || self.fields.iter().any(|f| *f == field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Time(DateTime<Utc>),
    Float(f64),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameField {
    pub name: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub name: &'static str,
    pub fields: Vec<FrameField>,
}

impl TelemetryFrame {
    pub fn from_record(record: &TelemetryRecord, selection: &FieldSelection) -> Self {
        // Out-of-range timestamps collapse to the epoch
        let time = DateTime::from_timestamp_millis(record.timestamp).unwrap_or_default();
        let mut fields = vec![FrameField {
            name: "time",
            value: FieldValue::Time(time),
        }];

        for name in SELECTABLE_FIELDS {
            if !selection.includes(name) {
                continue;
            }
            let value = match name {
                "altitude" => FieldValue::Float(record.altitude),
                "latitude" => FieldValue::Float(record.position.latitude),
                "longitude" => FieldValue::Float(record.position.longitude),
                "state" => FieldValue::Int(record.phase.code()),
                "pitch" => FieldValue::Float(record.pitch),
                "roll" => FieldValue::Float(record.roll),
                "yaw" => FieldValue::Float(record.yaw),
                "gforce" => FieldValue::Float(record.gforce),
                "signal" => FieldValue::Int(i64::from(record.signal)),
                _ => continue,
            };
            fields.push(FrameField { name, value });
        }

        Self {
            name: "response",
            fields,
        }
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}
