// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image search API response types. Only the fields read are modelled.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub value: Vec<ImageResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub content_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl ImageResult {
    /// Full-size URL, or the thumbnail when the full image is missing.
    pub fn best_url(&self) -> Option<&str> {
        self.content_url
            .as_deref()
            .or(self.thumbnail_url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}
