use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied document fields, as parsed from a JSON object body.
pub type Payload = Map<String, Value>;

/// One stored record: a string identifier plus arbitrary caller-defined
/// fields. Serializes flat, as `{"id": "...", ...fields}`.
///
/// `fields` never holds an `"id"` key; constructors and merges strip it so
/// the flattened serialization cannot emit the key twice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Payload,
}

impl Document {
    /// Build a document from a generated id and a caller payload.
    /// A payload-supplied `id` is discarded; the generated one wins.
    pub fn from_payload(id: String, mut fields: Payload) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// Shallow merge: payload values win on same-named fields, fields only
    /// in the payload are added, everything else survives unchanged. The
    /// identifier is never touched, even by a payload `id` field.
    pub fn merge(&mut self, payload: Payload) {
        for (key, value) in payload {
            if key == "id" {
                continue;
            }
            self.fields.insert(key, value);
        }
    }
}

/// The whole database: two fixed collections, persisted together as one
/// JSON object. A key missing from the file reads as an empty collection.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<Document>,
    #[serde(default)]
    pub records: Vec<Document>,
}

impl Database {
    pub fn collection(&self, collection: Collection) -> &[Document] {
        match collection {
            Collection::Users => &self.users,
            Collection::Records => &self.records,
        }
    }

    pub fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Document> {
        match collection {
            Collection::Users => &mut self.users,
            Collection::Records => &mut self.records,
        }
    }
}

/// Names the collections a `Database` holds. The set is fixed; an unknown
/// name simply is not a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Users,
    Records,
}

impl Collection {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "users" => Some(Self::Users),
            "records" => Some(Self::Records),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Records => "records",
        }
    }

    /// Entity name for error messages ("user not found").
    pub fn singular(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Records => "record",
        }
    }
}
