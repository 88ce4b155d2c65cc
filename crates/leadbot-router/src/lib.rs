// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for free-form messages.
//!
//! This crate provides:
//! - [`IntentClassifier`]: keyword heuristics (greeting, scheduling, image request)
//! - [`IntentRouter`]: heuristics plus an optional reasoning-service label
//!   for messages the keywords could not place
//! - [`prompt`]: the persona system prompt sent with every free-form query
//! - [`images`]: visual-request detection and `[[IMAGE: ...]]` marker handling

pub mod classifier;
pub mod images;
pub mod prompt;
pub mod router;

pub use classifier::{ClassificationResult, Intent, IntentClassifier};
pub use images::{extract_image_markers, has_visual_request, ImageMarkers};
pub use prompt::build_system_prompt;
pub use router::{IntentRouter, RoutingDecision, RoutingSource};
