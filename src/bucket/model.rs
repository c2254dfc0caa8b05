use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Website,
    Document,
    Youtube,
    Note,
}

impl SourceType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Document => "document",
            Self::Youtube => "youtube",
            Self::Note => "note",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl Source {
    /// Size metric used for radius scaling; absent sizes count as zero.
    pub fn size_metric(&self) -> f32 {
        self.size
            .filter(|size| size.is_finite())
            .map(|size| size as f32)
            .unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    pub from_source_id: String,
    pub to_source_id: String,
    #[serde(default)]
    pub data: ConnectionData,
}

impl Connection {
    pub fn touches(&self, source_id: &str) -> bool {
        self.from_source_id == source_id || self.to_source_id == source_id
    }
}
