//! FCPXML to project graph converter
//!
//! # Architecture
//!
//! ```text
//! FCPXML String
//!   ↓ [Parse with roxmltree]
//! XML DOM
//!   ↓ [Pass 1: formats + asset/media resources]
//! Resource table
//!   ↓ [Pass 2: events → projects → spine → clips]
//!   ↓   audition → active child
//!   ↓   clip → resource → effective rate (+ conform-rate)
//!   ↓   markers → timeline-absolute time
//! ProjectFile
//! ```

pub mod audition;
pub mod clip;
pub mod conform;
pub mod markers;
pub mod parser;
pub mod resources;
pub mod time;

pub use conform::{conformed_frame_rate, ConformRate};
pub use parser::parse_fcpxml;
pub use resources::{FormatInfo, FormatTable, INTERNAL_PATH};
