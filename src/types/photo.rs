use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A photo in the user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub ai_generated_tags: Vec<String>,
    #[serde(default)]
    pub custom_tags: Vec<String>,
    #[serde(default)]
    pub color_palette: Vec<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Photo {
    /// All tags, AI-generated first.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.ai_generated_tags
            .iter()
            .chain(self.custom_tags.iter())
            .map(String::as_str)
    }
}

/// A ranked hit from photo search or a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub image_url: String,
    pub score: f64,
    #[serde(default)]
    pub ai_generated_tags: Vec<String>,
    #[serde(default)]
    pub color_palette: Vec<String>,
}

/// A past search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub id: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

/// A photo with the backend's recommendations for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoDetail {
    pub photo: Photo,
    #[serde(default)]
    pub recommendations: Vec<SearchResult>,
}

/// Which tag list a tag belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TagKind {
    Ai,
    Custom,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn photo_parses_camel_case_with_missing_tag_lists() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "p1",
            "imageUrl": "https://img.example/p1.jpg",
            "aiGeneratedTags": ["beach"],
            "userId": "u1",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(photo.image_url, "https://img.example/p1.jpg");
        assert!(photo.custom_tags.is_empty());
        assert_eq!(photo.tags().collect::<Vec<_>>(), vec!["beach"]);
    }

    #[test]
    fn tag_kind_uses_lowercase_on_wire_and_display() {
        assert_eq!(serde_json::to_value(TagKind::Ai).unwrap(), json!("ai"));
        assert_eq!(TagKind::Custom.to_string(), "custom");
        assert_eq!("custom".parse::<TagKind>().unwrap(), TagKind::Custom);
    }
}
