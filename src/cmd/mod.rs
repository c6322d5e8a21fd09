// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> JSON on stdout
//!   config, repo, auth
//! ```

pub mod auth;
pub mod config;
pub mod repo;

use serde::Serialize;
use std::io::Write;

use crate::error::Result;

/// Writes `value` as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Prints `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    write_json(&mut std::io::stdout().lock(), value)
}

#[cfg(test)]
mod tests;
