//! Wire types of the content API's `blogs` collection.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RecordShape")]
pub struct Record {
    pub id: String,
    pub attributes: Attributes,
}

/// Records arrive either flat or with their fields under `attributes`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordShape {
    Nested {
        id: RecordId,
        attributes: Attributes,
    },
    Flat {
        id: RecordId,
        #[serde(flatten)]
        attributes: Attributes,
    },
}

impl From<RecordShape> for Record {
    fn from(shape: RecordShape) -> Self {
        let (id, attributes) = match shape {
            RecordShape::Nested { id, attributes } => (id, attributes),
            RecordShape::Flat { id, attributes } => (id, attributes),
        };
        Self {
            id: id.to_string(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Either a plain name or a populated relation
    #[serde(default)]
    pub author: Option<Value>,
    pub created_at: String,
}

impl Attributes {
    pub fn author_name(&self) -> Option<String> {
        const NAME_PATHS: [&str; 4] = ["/data/attributes/username", "/data/username", "/username", "/name"];

        let name = match self.author.as_ref()? {
            Value::String(name) => Some(name.as_str()),
            author @ Value::Object(_) => NAME_PATHS
                .iter()
                .find_map(|path| author.pointer(path).and_then(Value::as_str)),
            _ => None,
        };
        name.filter(|name| !name.is_empty()).map(str::to_string)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBlog<'a> {
    pub data: CreateBlogData<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBlogData<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub author: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_flat_and_nested_records() {
        let collection: Collection = serde_json::from_value(json!({
            "data": [
                { "id": 7, "title": "Flat", "content": "a", "author": "Ann", "createdAt": "2024-02-01T10:00:00.000Z" },
                { "id": "abc", "attributes": { "title": "Nested", "content": "b", "createdAt": "2024-02-02T10:00:00.000Z" } }
            ],
            "meta": {}
        }))
        .unwrap();

        assert_eq!(collection.data.len(), 2);
        assert_eq!(collection.data[0].id, "7");
        assert_eq!(collection.data[0].attributes.title.as_deref(), Some("Flat"));
        assert_eq!(collection.data[0].attributes.author_name().as_deref(), Some("Ann"));
        assert_eq!(collection.data[1].id, "abc");
        assert_eq!(collection.data[1].attributes.title.as_deref(), Some("Nested"));
        assert_eq!(collection.data[1].attributes.author_name(), None);
    }

    #[test]
    fn null_title_does_not_sink_the_collection() {
        let collection: Collection = serde_json::from_value(json!({
            "data": [
                { "id": 1, "title": null, "content": "a", "createdAt": "2024-02-01T10:00:00.000Z" },
                { "id": 2, "attributes": { "title": null, "content": "b", "createdAt": "2024-02-02T10:00:00.000Z" } },
                { "id": 3, "title": "Kept", "content": "c", "createdAt": "2024-02-03T10:00:00.000Z" }
            ]
        }))
        .unwrap();

        assert_eq!(collection.data.len(), 3);
        assert_eq!(collection.data[0].attributes.title, None);
        assert_eq!(collection.data[1].attributes.title, None);
        assert_eq!(collection.data[2].attributes.title.as_deref(), Some("Kept"));
    }

    #[test]
    fn reads_populated_author_relation() {
        let record: Record = serde_json::from_value(json!({
            "id": 1,
            "attributes": {
                "title": "t",
                "content": "c",
                "createdAt": "2024-02-02T10:00:00.000Z",
                "author": { "data": { "id": 3, "attributes": { "username": "kim" } } }
            }
        }))
        .unwrap();
        assert_eq!(record.attributes.author_name().as_deref(), Some("kim"));
    }

    #[test]
    fn empty_author_counts_as_missing() {
        let record: Record = serde_json::from_value(json!({
            "id": 1, "title": "t", "content": "c", "author": "", "createdAt": "2024-02-02"
        }))
        .unwrap();
        assert_eq!(record.attributes.author_name(), None);
    }

    #[test]
    fn create_body_is_wrapped_in_data() {
        let body = CreateBlog {
            data: CreateBlogData {
                title: "t",
                content: "c",
                author: "kim",
            },
        };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "data": { "title": "t", "content": "c", "author": "kim" } })
        );
    }
}
