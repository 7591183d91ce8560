//! # Shopfloor Rust Backend
//!
//! Business-calendar time arithmetic for a furniture production line.
//!
//! Orders move through seven stages (cut, customize, edge-band, machine,
//! panel, assemble, pack), each recorded as a start/end timestamp pair. This
//! crate measures how long stages take in working time and projects when the
//! unfinished ones will be done.
//!
//! ## Features
//!
//! - **Work Calendar**: weekly work window and working-minute arithmetic
//! - **Durations**: working durations, per-stage means and percentage breakdowns
//! - **Imputation**: fill missing stage timestamps from mean stage durations
//! - **Ingestion**: parse JSON exports of per-order stage timestamps
//! - **Reports**: statistics plus forecasts, emitted as JSON by the
//!   `production-report` binary
//!
//! ## Architecture
//!
//! - [`models`]: timestamps, stages, columns and per-order records
//! - [`algorithms`]: calendar, duration and imputation core
//! - [`services`]: forecast, statistics and report orchestration
//! - [`parsing`]: JSON record ingestion
//! - [`config`]: `production.toml` loading
//! - [`error`]: error type shared by every module

pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

pub use error::{TimelineError, TimelineResult};
