use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::car::value_objects::CarDetails;
use crate::domain::repositories::{Document, Fields};

/// Collection holding car documents
pub const CARS_COLLECTION: &str = "cars";

/// Errors raised when a stored document cannot be read as a car
#[derive(Debug, Error, PartialEq)]
pub enum CarValidationError {
    #[error("Car {id} is missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("Car {id} has invalid field `{field}`: expected {expected}")]
    InvalidField {
        id: String,
        field: &'static str,
        expected: &'static str,
    },
}

/// A single car listing
///
/// # Invariants
/// - `id` is the store key and is echoed into the stored body
/// - `user_id` is the identity that created the car and never changes
/// - `updated_at` is absent until the first update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Car {
    /// Creates a new car owned by `owner`
    pub fn create(
        id: impl Into<String>,
        details: CarDetails,
        owner: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: details.title,
            description: details.description,
            tags: details.tags,
            images: details.images,
            user_id: owner.into(),
            created_at: Some(created_at.into()),
            updated_at: None,
        }
    }

    /// Normalizes a stored document into a car
    ///
    /// `title` and `description` default to an empty string, `tags` and
    /// `images` to an empty list. Non-string list entries are dropped.
    /// The owner must be present as a string.
    ///
    /// # Example
    /// ```
    /// use carlist_api::domain::car::Car;
    /// use carlist_api::domain::repositories::Document;
    /// use serde_json::json;
    ///
    /// let fields = json!({ "userId": "user-1", "tags": "not-a-list" });
    /// let document = Document::new("car-1", fields.as_object().unwrap().clone());
    ///
    /// let car = Car::from_document(&document).expect("valid car");
    /// assert_eq!(car.title, "");
    /// assert!(car.tags.is_empty());
    /// ```
    pub fn from_document(document: &Document) -> Result<Self, CarValidationError> {
        let fields = &document.fields;

        let user_id = match fields.get("userId") {
            Some(Value::String(user_id)) => user_id.clone(),
            Some(_) => {
                return Err(CarValidationError::InvalidField {
                    id: document.id.clone(),
                    field: "userId",
                    expected: "a string",
                })
            }
            None => {
                return Err(CarValidationError::MissingField {
                    id: document.id.clone(),
                    field: "userId",
                })
            }
        };

        Ok(Self {
            id: document.id.clone(),
            title: text_or_default(fields, "title"),
            description: text_or_default(fields, "description"),
            tags: text_list_or_default(fields, "tags"),
            images: text_list_or_default(fields, "images"),
            user_id,
            created_at: optional_text(document, "createdAt")?,
            updated_at: optional_text(document, "updatedAt")?,
        })
    }

    /// Returns the full document body for this car, including its id
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("id".into(), Value::from(self.id.as_str()));
        fields.insert("title".into(), Value::from(self.title.as_str()));
        fields.insert("description".into(), Value::from(self.description.as_str()));
        fields.insert("tags".into(), Value::from(self.tags.clone()));
        fields.insert("images".into(), Value::from(self.images.clone()));
        fields.insert("userId".into(), Value::from(self.user_id.as_str()));
        if let Some(created_at) = &self.created_at {
            fields.insert("createdAt".into(), Value::from(created_at.as_str()));
        }
        if let Some(updated_at) = &self.updated_at {
            fields.insert("updatedAt".into(), Value::from(updated_at.as_str()));
        }
        fields
    }
}

fn text_or_default(fields: &Fields, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

fn text_list_or_default(fields: &Fields, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn optional_text(
    document: &Document,
    key: &'static str,
) -> Result<Option<String>, CarValidationError> {
    match document.fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(CarValidationError::InvalidField {
            id: document.id.clone(),
            field: key,
            expected: "a timestamp string",
        }),
    }
}
