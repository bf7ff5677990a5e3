use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json::str_field;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDescriptor {
    #[serde(rename = "type")]
    pub event_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventDescriptor {
    pub fn new(event_type: impl Into<String>) -> Self {
        let event_type = event_type.into();
        Self {
            label: event_type.clone(),
            event_type,
            description: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

pub fn normalize_events(raw: &Value) -> Vec<EventDescriptor> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| {
            let object = entry.as_object()?;
            let event_type = str_field(object, &["type"])?.to_string();
            let label = str_field(object, &["name", "label"])
                .map(str::to_string)
                .unwrap_or_else(|| event_type.clone());
            Some(EventDescriptor {
                event_type,
                label,
                description: str_field(object, &["description"]).map(str::to_string),
            })
        })
        .filter(|event| {
            let fresh = seen.insert(event.event_type.clone());
            if !fresh {
                tracing::debug!(event = %event.event_type, "duplicate event dropped");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_become_labels() {
        let events = normalize_events(&json!([
            { "type": "http.request", "name": "HTTP request" },
            { "type": "mcp.call" },
            { "name": "missing type" },
            { "type": "http.request", "name": "dup" },
        ]));
        assert_eq!(
            events,
            vec![
                EventDescriptor::new("http.request").with_label("HTTP request"),
                EventDescriptor::new("mcp.call"),
            ]
        );
    }
}
