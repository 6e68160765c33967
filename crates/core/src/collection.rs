use serde::{Deserialize, Serialize};

/// Collection record as returned by the Zotero collections endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ApiCollection {
    pub data: ApiCollectionData,
}

/// The `data` object of an upstream collection record
///
/// Zotero reports top-level collections with `parentCollection: false`, so the
/// parent is kept as a raw JSON value and narrowed in [`transform_collections`].
#[derive(Debug, Deserialize, Clone)]
pub struct ApiCollectionData {
    pub key: String,
    pub name: String,
    #[serde(rename = "parentCollection", default)]
    pub parent_collection: serde_json::Value,
}

/// A named node in the group's collection hierarchy
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Collection {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl Collection {
    pub fn new(key: &str, name: &str, parent: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
        }
    }
}

/// A collection together with its nested sub-collections
///
/// Serializes flat, so a node reads `{"key", "name", "parent"?, "children"}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CollectionMap {
    #[serde(flatten)]
    pub collection: Collection,
    pub children: Vec<CollectionMap>,
}

impl CollectionMap {
    pub fn leaf(collection: Collection) -> Self {
        Self {
            collection,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including the root
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

/// Narrow an upstream `parentCollection` value to a key
///
/// Only a non-empty string names a parent; `false`, `null`, an empty string or
/// a missing field all mean the collection is a root.
pub fn parent_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(key) if !key.is_empty() => Some(key.clone()),
        _ => None,
    }
}

/// Transform upstream collection records into collections, preserving order
pub fn transform_collections(records: Vec<ApiCollection>) -> Vec<Collection> {
    records
        .into_iter()
        .map(|record| Collection {
            parent: parent_key(&record.data.parent_collection),
            key: record.data.key,
            name: record.data.name,
        })
        .collect()
}

/// Parse the body of the collections endpoint
pub fn parse_collections(body: &str) -> Result<Vec<Collection>, serde_json::Error> {
    let records: Vec<ApiCollection> = serde_json::from_str(body)?;
    Ok(transform_collections(records))
}
