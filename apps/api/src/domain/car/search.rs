use crate::domain::car::Car;

/// Case-insensitive substring filter over a car's title, description and tags
///
/// Filtering runs in-process after the store returns the candidate set,
/// since the store only supports equality queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Parses a raw query value; empty input means no filter
    ///
    /// # Example
    /// ```
    /// use carlist_api::domain::car::SearchTerm;
    ///
    /// assert!(SearchTerm::parse("").is_none());
    /// assert_eq!(SearchTerm::parse("SeDaN").unwrap().as_str(), "sedan");
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the lowercased title, description or any tag
    /// contains the term
    pub fn matches(&self, car: &Car) -> bool {
        let term = self.0.as_str();
        car.title.to_lowercase().contains(term)
            || car.description.to_lowercase().contains(term)
            || car.tags.iter().any(|tag| tag.to_lowercase().contains(term))
    }
}
