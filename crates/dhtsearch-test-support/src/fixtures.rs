//! Canned JSON bodies for the search API.

use serde_json::{Value, json};

/// Deterministic 40-character info-hash for row `n`.
#[must_use]
pub fn info_hash(n: u32) -> String {
    format!("{n:08x}{}", "0".repeat(32))
}

/// One torrent row as the server serialises it.
#[must_use]
pub fn torrent_json(n: u32) -> Value {
    json!({
        "info_hash": info_hash(n),
        "name": format!("ubuntu-24.04.{n}-desktop-amd64.iso"),
        "total_size": 6_114_656_256_u64 + u64::from(n),
        "file_count": 1,
        "health_score": 87.5,
        "has_video": false,
        "has_audio": false,
        "created_at": "2024-04-25 12:00:00"
    })
}

/// Successful search body with `rows` results.
#[must_use]
pub fn search_body(rows: u32, total: u64, total_pages: u64) -> String {
    let results: Vec<Value> = (0..rows).map(torrent_json).collect();
    json!({
        "results": results,
        "total": total,
        "page": 1,
        "total_pages": total_pages,
        "keyword": "ubuntu"
    })
    .to_string()
}

/// Error body with a plain-text `detail`.
#[must_use]
pub fn error_body(detail: &str) -> String {
    json!({ "detail": detail }).to_string()
}

/// Error body with a structured `detail` object, as used for banned keywords.
#[must_use]
pub fn structured_error_body(message: &str) -> String {
    json!({
        "detail": {
            "error": "banned_keyword",
            "message": message,
            "category": "illegal"
        }
    })
    .to_string()
}
