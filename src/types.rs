use serde::{Deserialize, Serialize};
use std::fmt;

/// IIIF endpoint serving artwork images by `image_id`
pub const IIIF_BASE: &str = "https://www.artic.edu/iiif/2";

/// Record identifier. The collection API sends numbers, but strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Pagination metadata attached to every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One fetched page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Museum exhibition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibition {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

impl Exhibition {
    /// "See more" is only offered when the exhibition has a non-empty web page
    pub fn link(&self) -> Option<&str> {
        self.web_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Artwork from the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub image_id: Option<String>,
}

impl Artwork {
    pub fn description(&self) -> Option<&str> {
        self.thumbnail.as_ref()?.alt_text.as_deref()
    }

    pub fn image_url(&self) -> Option<String> {
        let image_id = self.image_id.as_deref()?;
        Some(format!("{}/{}/full/1680,/0/default.jpg", IIIF_BASE, image_id))
    }
}
