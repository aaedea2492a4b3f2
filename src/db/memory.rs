use super::{DocumentCollection, DocumentStore, GroupCount, StoreError, ID_FIELD};
use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock as StdRwLock};
use tokio::sync::RwLock;

/// Process-local document store.
///
/// Evaluates the same query subset as the MongoDB backend so that the
/// service layer behaves identically against either one.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: StdRwLock<HashMap<String, Arc<InMemoryCollection>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "in-memory"
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(InMemoryCollection::new(name)))
            .clone()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct InMemoryCollection {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl InMemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn document_id(document: &Document) -> Option<ObjectId> {
    document.get_object_id(ID_FIELD).ok()
}

#[async_trait]
impl DocumentCollection for InMemoryCollection {
    async fn insert_one(&self, mut document: Document) -> Result<ObjectId, StoreError> {
        let id = match document.get(ID_FIELD) {
            None => {
                let id = ObjectId::new();
                document.insert(ID_FIELD, id);
                id
            }
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(StoreError::UnexpectedResponse(format!(
                    "document id must be an ObjectId, got {other}"
                )))
            }
        };

        let mut documents = self.documents.write().await;
        if documents.iter().any(|existing| document_id(existing) == Some(id)) {
            return Err(StoreError::UnexpectedResponse(format!(
                "duplicate key {id} in collection {}",
                self.name
            )));
        }
        documents.push(document);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|document| document_id(document) == Some(id))
            .cloned())
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        let mut matched = Vec::new();
        for document in documents.iter() {
            if matches_filter(document, &filter)? {
                matched.push(document.clone());
            }
        }
        Ok(matched)
    }

    async fn update_by_id(&self, id: ObjectId, fields: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|document| document_id(document) == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        for (key, value) in fields {
            if key != ID_FIELD {
                document.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let position = documents
            .iter()
            .position(|document| document_id(document) == Some(id))
            .ok_or(StoreError::NotFound(id))?;
        documents.remove(position);
        Ok(())
    }

    async fn count_by_field(&self, field: &str) -> Result<Vec<GroupCount>, StoreError> {
        let documents = self.documents.read().await;
        let mut groups: Vec<GroupCount> = Vec::new();
        for document in documents.iter() {
            let key = document.get(field).cloned().unwrap_or(Bson::Null);
            match groups.iter_mut().find(|group| values_equal(&group.key, &key)) {
                Some(group) => group.count += 1,
                None => groups.push(GroupCount { key, count: 1 }),
            }
        }
        Ok(groups)
    }
}

fn is_operator_document(condition: &Document) -> bool {
    condition
        .keys()
        .next()
        .map_or(false, |key| key.starts_with('$'))
}

/// Evaluates an AND of field predicates against a document.
pub fn matches_filter(document: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (field, condition) in filter {
        let value = document.get(field);
        let matched = match condition {
            Bson::Document(operators) if is_operator_document(operators) => {
                let mut all = true;
                for (operator, operand) in operators {
                    if !apply_operator(operator, value, operand)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            expected => equals_field(value, expected),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn apply_operator(operator: &str, value: Option<&Bson>, operand: &Bson) -> Result<bool, StoreError> {
    let ordering = || value.and_then(|value| compare_values(value, operand));
    let matched = match operator {
        "$eq" => equals_field(value, operand),
        "$gt" => ordering() == Some(Ordering::Greater),
        "$gte" => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
        "$lt" => ordering() == Some(Ordering::Less),
        "$lte" => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
        other => return Err(StoreError::UnsupportedQuery(other.to_string())),
    };
    Ok(matched)
}

// A missing field only equals null.
fn equals_field(value: Option<&Bson>, expected: &Bson) -> bool {
    match value {
        Some(value) => values_equal(value, expected),
        None => matches!(expected, Bson::Null),
    }
}

fn values_equal(left: &Bson, right: &Bson) -> bool {
    match compare_values(left, right) {
        Some(ordering) => ordering == Ordering::Equal,
        None => left == right,
    }
}

enum Number {
    Int(i64),
    Float(f64),
}

fn as_number(value: &Bson) -> Option<Number> {
    match value {
        Bson::Int32(n) => Some(Number::Int(i64::from(*n))),
        Bson::Int64(n) => Some(Number::Int(*n)),
        Bson::Double(n) => Some(Number::Float(*n)),
        _ => None,
    }
}

/// Orders two values of the same type bracket; values of different
/// brackets are incomparable, as in MongoDB query semantics.
fn compare_values(left: &Bson, right: &Bson) -> Option<Ordering> {
    if let (Some(left), Some(right)) = (as_number(left), as_number(right)) {
        return match (left, right) {
            (Number::Int(l), Number::Int(r)) => Some(l.cmp(&r)),
            (Number::Int(l), Number::Float(r)) => (l as f64).partial_cmp(&r),
            (Number::Float(l), Number::Int(r)) => l.partial_cmp(&(r as f64)),
            (Number::Float(l), Number::Float(r)) => l.partial_cmp(&r),
        };
    }

    match (left, right) {
        (Bson::String(l), Bson::String(r)) => Some(l.cmp(r)),
        (Bson::DateTime(l), Bson::DateTime(r)) => Some(l.cmp(r)),
        (Bson::ObjectId(l), Bson::ObjectId(r)) => Some(l.cmp(r)),
        (Bson::Boolean(l), Bson::Boolean(r)) => Some(l.cmp(r)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
