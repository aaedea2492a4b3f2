use super::{parse_object_id, StoreError, ID_FIELD};
use bson::{Bson, Document};

/// Builds a store filter from optional parameters.
///
/// Every present parameter adds one predicate and all predicates are AND-ed.
/// Absent parameters add nothing, so an untouched builder matches every
/// document.
#[derive(Debug, Default, Clone)]
pub struct FilterBuilder {
    filter: Document,
}

impl FilterBuilder {
    /// Create a new, unconstrained filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the filter to one identifier.
    ///
    /// A malformed identifier fails the whole build rather than being
    /// ignored.
    pub fn id(mut self, raw: Option<&str>) -> Result<Self, StoreError> {
        if let Some(raw) = raw {
            self.filter.insert(ID_FIELD, parse_object_id(raw)?);
        }
        Ok(self)
    }

    /// Add an exact match condition
    pub fn eq<V: Into<Bson>>(mut self, field: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.filter.insert(field, value.into());
        }
        self
    }

    /// Strictly greater than
    pub fn gt<V: Into<Bson>>(self, field: &str, value: Option<V>) -> Self {
        self.range(field, "$gt", value)
    }

    /// Greater than or equal
    pub fn gte<V: Into<Bson>>(self, field: &str, value: Option<V>) -> Self {
        self.range(field, "$gte", value)
    }

    fn range<V: Into<Bson>>(mut self, field: &str, operator: &str, value: Option<V>) -> Self {
        let Some(value) = value else {
            return self;
        };

        // Operators on the same field share one operator document.
        if let Some(Bson::Document(operators)) = self.filter.get_mut(field) {
            operators.insert(operator, value.into());
            return self;
        }

        let mut operators = Document::new();
        operators.insert(operator, value.into());
        self.filter.insert(field, operators);
        self
    }

    /// Build the final filter document
    pub fn build(self) -> Document {
        self.filter
    }
}
