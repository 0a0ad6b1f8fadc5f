//! Landing page and asset directory listing

use crate::handlers::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use std::path::Path;

/// Landing page file name inside the template directory
pub const INDEX_FILE: &str = "index.html";

/// GET / handler
///
/// Serves `<template_dir>/index.html`. When it is missing, answers 500 with
/// an HTML page naming the expected path and what the directory holds.
pub async fn index(State(state): State<AppState>) -> Response {
    let template_dir = &state.config().assets.template_dir;
    let index_path = template_dir.join(INDEX_FILE);

    match tokio::fs::read_to_string(&index_path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!(
                path = %index_path.display(),
                error = %e,
                "Landing page not found"
            );
            let listing = match list_dir(template_dir).await {
                Some(entries) => format!("{:?}", entries),
                None => "missing".to_string(),
            };
            let body = format!(
                "<h2>{} not found in templates folder</h2>\
                 <p>Expected at: {}</p>\
                 <pre>Templates dir listing: {}</pre>",
                INDEX_FILE,
                escape_html(&index_path.display().to_string()),
                escape_html(&listing),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
        }
    }
}

/// Response for GET /_debug/list
#[derive(Debug, Serialize)]
pub struct DebugListing {
    pub template_dir: String,
    pub static_dir: String,
    pub templates: Vec<String>,
    #[serde(rename = "static")]
    pub static_files: Vec<String>,
}

/// GET /_debug/list handler
pub async fn debug_list(State(state): State<AppState>) -> Json<DebugListing> {
    let assets = &state.config().assets;

    Json(DebugListing {
        template_dir: assets.template_dir.display().to_string(),
        static_dir: assets.static_dir.display().to_string(),
        templates: list_dir(&assets.template_dir).await.unwrap_or_default(),
        static_files: list_dir(&assets.static_dir).await.unwrap_or_default(),
    })
}

/// Sorted entry names of `dir`, or `None` if it cannot be read
async fn list_dir(dir: &Path) -> Option<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Some(names)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_dir_sorts_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.css"), "").unwrap();
        std::fs::write(dir.path().join("a.js"), "").unwrap();

        let names = list_dir(dir.path()).await.expect("should list");
        assert_eq!(names, vec!["a.js".to_string(), "b.css".to_string()]);
    }

    #[tokio::test]
    async fn test_list_dir_missing_is_none() {
        assert!(list_dir(Path::new("/nonexistent/chatrelay/dir")).await.is_none());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a&b>"), "&lt;a&amp;b&gt;");
    }
}
