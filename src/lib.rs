// amandus: Browser-Based Git Workspace Service
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |                     |
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |   service::Amandus        |
//!              '--+--------------------+---'
//!                 |                    |
//!                 v                    v
//!               sync                 auth
//!      mirror/branch/commit/push   broker/session/provider
//!                 |                    |
//!          +------+------+             v
//!          v             v            net
//!      workspace        git          HTTP
//!   locator/locks   gix/CLI
//!
//!   +-----------------------------------------+
//!   |  foundation   config, error, logging    |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod net;
pub mod service;
pub mod sync;
pub mod workspace;

#[cfg(test)]
mod testutil;
