// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery). The SQL under `migrations/` is
//! compiled into the binary and applied whenever a database is opened.

use leadbot_core::LeadbotError;
use tracing::info;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies every migration not yet recorded in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LeadbotError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| LeadbotError::Storage {
            source: Box::new(e),
        })?;
    for migration in report.applied_migrations() {
        info!(version = migration.version(), name = migration.name(), "applied migration");
    }
    Ok(())
}
