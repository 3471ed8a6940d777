//! Mock Google Photos tools.
//!
//! The Photos API searches by content category rather than free text, so a
//! query is first mapped to a category.

use crate::record;
use async_trait::async_trait;
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult, parse_arguments};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentCategory {
    Documents,
    Receipts,
    All,
}

const DOCUMENT_WORDS: &[&str] = &["license", "passport", "insurance", "document", "id"];

/// Map a free-text query to a Photos content category.
pub fn category_for(query: &str) -> ContentCategory {
    let q = query.to_lowercase();
    if DOCUMENT_WORDS.iter().any(|w| q.contains(w)) {
        ContentCategory::Documents
    } else if q.contains("receipt") {
        ContentCategory::Receipts
    } else {
        ContentCategory::All
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub id: &'static str,
    pub filename: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub creation_time: &'static str,
    pub base_url: &'static str,
    #[serde(skip)]
    category: ContentCategory,
    #[serde(skip)]
    album: &'static str,
}

const MEDIA: &[MediaItem] = &[
    MediaItem {
        id: "photo_001",
        filename: "drivers_license_front.jpg",
        description: "Driver's license (front)",
        mime_type: "image/jpeg",
        creation_time: "2021-12-20T10:30:00Z",
        base_url: "https://photos.google.com/mock/photo_001",
        category: ContentCategory::Documents,
        album: "album_documents",
    },
    MediaItem {
        id: "photo_002",
        filename: "passport_scan.jpg",
        description: "Passport photo page",
        mime_type: "image/jpeg",
        creation_time: "2019-05-25T14:00:00Z",
        base_url: "https://photos.google.com/mock/photo_002",
        category: ContentCategory::Documents,
        album: "album_documents",
    },
    MediaItem {
        id: "photo_003",
        filename: "geico_insurance_card.jpg",
        description: "Auto insurance card",
        mime_type: "image/jpeg",
        creation_time: "2023-12-02T09:15:00Z",
        base_url: "https://photos.google.com/mock/photo_003",
        category: ContentCategory::Documents,
        album: "album_documents",
    },
    MediaItem {
        id: "photo_004",
        filename: "receipt_dmv_fee.jpg",
        description: "DMV renewal fee receipt",
        mime_type: "image/jpeg",
        creation_time: "2021-12-15T11:45:00Z",
        base_url: "https://photos.google.com/mock/photo_004",
        category: ContentCategory::Receipts,
        album: "album_receipts",
    },
    MediaItem {
        id: "photo_005",
        filename: "receipt_gym_annual.jpg",
        description: "Gym membership receipt",
        mime_type: "image/jpeg",
        creation_time: "2025-01-02T18:20:00Z",
        base_url: "https://photos.google.com/mock/photo_005",
        category: ContentCategory::Receipts,
        album: "album_receipts",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct PhotoSearch {
    pub query: String,
    pub category: ContentCategory,
    pub count: usize,
    pub media_items: Vec<MediaItem>,
}

pub fn search_photos(query: &str, max_results: usize) -> PhotoSearch {
    let category = category_for(query);
    info!(query, ?category, "Searching photos");

    let media_items: Vec<MediaItem> = MEDIA
        .iter()
        .filter(|m| category == ContentCategory::All || m.category == category)
        .take(max_results)
        .cloned()
        .collect();

    PhotoSearch {
        query: query.to_string(),
        category,
        count: media_items.len(),
        media_items,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Album {
    pub id: &'static str,
    pub title: &'static str,
    pub media_items_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumList {
    pub count: usize,
    pub albums: Vec<Album>,
}

const ALBUMS: &[(&str, &str)] = &[
    ("album_documents", "Important Documents"),
    ("album_receipts", "Receipts"),
];

pub fn list_albums() -> AlbumList {
    let albums: Vec<Album> = ALBUMS
        .iter()
        .map(|&(id, title)| Album {
            id,
            title,
            media_items_count: MEDIA.iter().filter(|m| m.album == id).count(),
        })
        .collect();
    AlbumList {
        count: albums.len(),
        albums,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumPhotos {
    pub album_id: String,
    pub count: usize,
    pub media_items: Vec<MediaItem>,
}

pub fn photos_from_album(album_id: &str, max_results: usize) -> Result<AlbumPhotos, String> {
    if !ALBUMS.iter().any(|(id, _)| *id == album_id) {
        return Err(format!("Album not found: {album_id}"));
    }
    let media_items: Vec<MediaItem> = MEDIA
        .iter()
        .filter(|m| m.album == album_id)
        .take(max_results)
        .cloned()
        .collect();
    Ok(AlbumPhotos {
        album_id: album_id.to_string(),
        count: media_items.len(),
        media_items,
    })
}

fn default_max_results() -> usize {
    10
}

// --- Tool wrappers ---

pub struct SearchGooglePhotosTool;

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

#[async_trait]
impl Tool for SearchGooglePhotosTool {
    fn name(&self) -> &str {
        "search_google_photos"
    }

    fn description(&self) -> &str {
        "Searches Google Photos for document photos (license, passport, insurance), receipts, or everything. Include the photo URL when showing results."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "What to look for, e.g. 'driver's license' or 'receipts'" },
                "max_results": { "type": "integer", "description": "Maximum number of photos (default: 10)" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SearchArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&search_photos(&args.query, args.max_results)))
    }
}

pub struct ListPhotoAlbumsTool;

#[async_trait]
impl Tool for ListPhotoAlbumsTool {
    fn name(&self) -> &str {
        "list_photo_albums"
    }

    fn description(&self) -> &str {
        "Lists Google Photos albums."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(&list_albums()))
    }
}

pub struct GetPhotosFromAlbumTool;

#[derive(Deserialize)]
struct AlbumArgs {
    album_id: String,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

#[async_trait]
impl Tool for GetPhotosFromAlbumTool {
    fn name(&self) -> &str {
        "get_photos_from_album"
    }

    fn description(&self) -> &str {
        "Gets the photos in a Google Photos album."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "album_id": { "type": "string", "description": "Album id from list_photo_albums" },
                "max_results": { "type": "integer", "description": "Maximum number of photos (default: 10)" }
            },
            "required": ["album_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: AlbumArgs = parse_arguments(arguments)?;
        Ok(record(photos_from_album(&args.album_id, args.max_results)))
    }
}
