use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::StorageRef;

/// Video metadata record, as stored in the metadata store.
///
/// `video_url` holds a `bucket,key` composite (see [StorageRef]) once the
/// upload pipeline has published and persisted an object; it is never a
/// directly-dereferenceable URL. `thumbnail_url` is a plain asset URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// The stored object reference, when the record has one in composite form.
    pub fn storage_ref(&self) -> Option<StorageRef> {
        self.video_url.as_deref().and_then(StorageRef::parse)
    }
}

/// API representation of a video record. `video_url` carries a freshly
/// presigned URL instead of the stored reference; callers never see the raw
/// `bucket,key` form.
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id,
            owner_id: video.owner_id,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            video_url: video.video_url,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_video(video_url: Option<&str>) -> Video {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "boots footage".to_string(),
            description: None,
            thumbnail_url: None,
            video_url: video_url.map(String::from),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_storage_ref_from_composite() {
        let video = test_video(Some("my-bucket,portrait/xyz.mp4"));
        let stored = video.storage_ref().unwrap();
        assert_eq!(stored.bucket, "my-bucket");
        assert_eq!(stored.key, "portrait/xyz.mp4");
    }

    #[test]
    fn test_storage_ref_absent_for_draft_records() {
        assert!(test_video(None).storage_ref().is_none());
    }

    #[test]
    fn test_response_omits_unset_urls() {
        let response = VideoResponse::from(test_video(None));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("video_url").is_none());
        assert!(json.get("thumbnail_url").is_none());
        assert_eq!(json["title"], "boots footage");
    }
}
