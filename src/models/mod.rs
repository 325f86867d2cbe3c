//! Models module for the FCPXML marker resolver
//!
//! This module contains the exact time model and the project graph
//! (resources, containers, timelines, clips, markers) the parser produces.

pub mod marker;
pub mod project;
pub mod smpte;
pub mod timecode;

// Re-export commonly used types
pub use marker::{Marker, MarkerKind, MarkerMetadata};
pub use project::{
    Clip, ClipKind, Container, ContainerChild, Diagnostic, ProjectFile, Resource, ResourceKind,
    Timeline,
};
pub use smpte::TimecodeFields;
pub use timecode::{
    FrameRate, FrameTime, HasTimecode, NominalRate, Rational, RationalTime, ScanMode, TimeSpec,
    TimecodeInfo,
};
