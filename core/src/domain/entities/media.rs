//! Images and videos attached to an article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    pub article_id: Uuid,
    pub media_type: MediaType,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedia {
    pub article_id: Uuid,
    pub media_type: MediaType,
    pub url: String,
    pub alt_text: Option<String>,
    pub now: DateTime<Utc>,
}

impl NewMedia {
    pub fn into_media(self, id: i64) -> Media {
        Media {
            id,
            article_id: self.article_id,
            media_type: self.media_type,
            url: self.url,
            alt_text: self.alt_text,
            created_at: self.now,
        }
    }
}
