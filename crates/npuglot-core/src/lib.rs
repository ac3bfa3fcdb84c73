//! npuglot-core — shared library for the npuglot SoC status viewer.
//!
//! Provides:
//! - `fmt` — unit formatting helpers (bytes, packets, frequency, memory)
//! - `metrics` — frequency bar normalization with overclock override
//! - `model` — status and flow-offload snapshots as delivered by the device
//! - `rpc` — transport abstraction for the device's remote procedures
//! - `provider` — per-tick snapshot source (concurrent status + flow reads)
//! - `poll` — periodic scheduler contract and the fetch-and-reconcile hookup
//! - `surface` — addressable display nodes kept alive for the view lifetime
//! - `view` — initial renderer and in-place reconciliation of the surface
//! - `control` — write path: overclock guard and command execution
//! - `config` — runtime configuration defaults
//!
//! With `tui` feature (default):
//! - `tui` — terminal rendering of the surface (ratatui/crossterm)

pub mod config;
pub mod control;
pub mod fmt;
pub mod metrics;
pub mod model;
pub mod poll;
pub mod provider;
pub mod rpc;
pub mod surface;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;

/// Crate version, shown in `--version` and the header bar.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
