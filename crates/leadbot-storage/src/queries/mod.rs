// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions. Each takes `&Database` and runs on the single
//! writer thread.

pub mod catalog;
pub mod contacts;
pub mod leads;
pub mod sessions;
