// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visual-request detection and `[[IMAGE: phrase]]` marker handling.
//!
//! The reasoning service is told to append a marker when the user asked to
//! see something. Markers are always stripped from the visible reply; the
//! first one is only acted on when the user text itself asked for a picture.

use std::sync::LazyLock;

use regex::Regex;

static VISUAL_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(ver|foto|fotos|imagen|imágenes|muéstrame|muestrame|enséñame|ensename|pásame|pasame|show|image|picture|photo)\b",
    )
    .unwrap()
});

static IMAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\[IMAGE:\s*(.*?)\]\]").unwrap());

/// Whether `text` contains a visual-request keyword as a whole word.
pub fn has_visual_request(text: &str) -> bool {
    VISUAL_REQUEST.is_match(text)
}

/// A model reply with its image markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMarkers {
    /// Reply text with every marker stripped and surrounding space trimmed.
    pub text: String,
    /// Search phrases in order of appearance; empty phrases are skipped.
    pub phrases: Vec<String>,
}

impl ImageMarkers {
    pub fn first_phrase(&self) -> Option<&str> {
        self.phrases.first().map(String::as_str)
    }
}

/// Strips every `[[IMAGE: ...]]` marker from `reply`.
pub fn extract_image_markers(reply: &str) -> ImageMarkers {
    let phrases = IMAGE_MARKER
        .captures_iter(reply)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    let text = IMAGE_MARKER.replace_all(reply, "").trim().to_string();
    ImageMarkers { text, phrases }
}
