use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::domain::repositories::Fields;

/// The caller-editable part of a car
///
/// Written in full on creation and overwritten in full on every update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CarDetails {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl CarDetails {
    /// Builds the field patch for an update, stamping `updatedAt`
    ///
    /// # Example
    /// ```
    /// use carlist_api::domain::car::CarDetails;
    ///
    /// let patch = CarDetails::default().into_update("2024-05-01T12:00:00.000Z");
    /// assert_eq!(patch["updatedAt"], "2024-05-01T12:00:00.000Z");
    /// assert!(!patch.contains_key("userId"));
    /// ```
    pub fn into_update(self, updated_at: impl Into<String>) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".into(), Value::from(self.title));
        fields.insert("description".into(), Value::from(self.description));
        fields.insert("tags".into(), Value::from(self.tags));
        fields.insert("images".into(), Value::from(self.images));
        fields.insert("updatedAt".into(), Value::from(updated_at.into()));
        fields
    }
}

/// Current UTC time as an RFC 3339 string with millisecond precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn update_overwrites_editable_fields_only() {
        let details = CarDetails {
            title: "Wagon".into(),
            description: "Roomy".into(),
            tags: vec!["family".into()],
            images: vec!["w.png".into()],
        };

        let patch = details.into_update("2024-03-03T03:03:03.000Z");
        assert_eq!(patch.len(), 5);
        assert_eq!(patch["title"], json!("Wagon"));
        assert_eq!(patch["tags"], json!(["family"]));
        assert_eq!(patch["images"], json!(["w.png"]));
        assert!(!patch.contains_key("userId"));
        assert!(!patch.contains_key("createdAt"));
    }

    #[test]
    fn timestamp_is_utc_rfc3339_millis() {
        let stamp = timestamp_now();

        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
