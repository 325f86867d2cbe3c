//! Markers and their kinds

use crate::errors::{FcpxError, Result};
use crate::models::timecode::{HasTimecode, RationalTime, TimecodeInfo};
use serde::{Deserialize, Serialize};

/// Marker kind. A completion flag exists only on to-do markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Standard,
    Chapter,
    ToDo { completed: bool },
}

impl MarkerKind {
    /// Resolve a marker type name plus an optional completed flag.
    ///
    /// Accepts the element tags ("marker", "chapter-marker") as well as the
    /// short names ("standard", "chapter", "to-do").
    pub fn resolve(type_name: &str, completed: Option<bool>) -> Result<Self> {
        match (type_name, completed) {
            ("to-do", Some(completed)) => Ok(MarkerKind::ToDo { completed }),
            ("to-do", None) => Err(FcpxError::InvalidMarkerState(
                "to-do marker requires a completed flag".to_string(),
            )),
            ("marker" | "standard", None) => Ok(MarkerKind::Standard),
            ("chapter-marker" | "chapter", None) => Ok(MarkerKind::Chapter),
            ("marker" | "standard" | "chapter-marker" | "chapter", Some(_)) => {
                Err(FcpxError::InvalidMarkerState(format!(
                    "completed flag is only valid on to-do markers, not '{}'",
                    type_name
                )))
            }
            (other, _) => Err(FcpxError::InvalidMarkerState(format!(
                "unknown marker type '{}'",
                other
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            MarkerKind::Standard => "standard",
            MarkerKind::Chapter => "chapter",
            MarkerKind::ToDo { .. } => "to-do",
        }
    }

    pub fn completed(&self) -> Option<bool> {
        match self {
            MarkerKind::ToDo { completed } => Some(*completed),
            _ => None,
        }
    }
}

/// Optional extras carried by some markers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerMetadata {
    /// Free-text note
    pub note: Option<String>,
    /// Chapter-marker poster frame, relative to the marker start
    pub poster_offset: Option<RationalTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub kind: MarkerKind,
    pub timecode_info: TimecodeInfo,
    pub metadata: Option<MarkerMetadata>,
}

impl Marker {
    pub fn new(name: impl Into<String>, kind: MarkerKind, timecode_info: TimecodeInfo) -> Self {
        Marker {
            name: name.into(),
            kind,
            timecode_info,
            metadata: None,
        }
    }

    /// Build from a type name and optional completed flag, validating the pair
    pub fn from_parts(
        name: impl Into<String>,
        type_name: &str,
        completed: Option<bool>,
        timecode_info: TimecodeInfo,
    ) -> Result<Self> {
        let kind = MarkerKind::resolve(type_name, completed)?;
        Ok(Marker::new(name, kind, timecode_info))
    }

    pub fn with_metadata(mut self, metadata: MarkerMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn completed(&self) -> Option<bool> {
        self.kind.completed()
    }

    /// Copy of this marker moved to `timecode_info`; `self` is untouched
    pub fn relocated(&self, timecode_info: TimecodeInfo) -> Marker {
        Marker {
            timecode_info,
            ..self.clone()
        }
    }
}

impl HasTimecode for Marker {
    fn timecode_info(&self) -> &TimecodeInfo {
        &self.timecode_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timecode::{FrameRate, TimeSpec};

    fn timing() -> TimecodeInfo {
        TimecodeInfo::new(
            FrameRate::new(25, 1),
            TimeSpec::Frames(0),
            TimeSpec::Frames(1),
            TimeSpec::Frames(0),
            true,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_to_do_requires_completed() {
        let result = Marker::from_parts("fix", "to-do", None, timing());
        assert!(matches!(result, Err(FcpxError::InvalidMarkerState(_))));
    }

    #[test]
    fn test_completed_rejected_on_other_kinds() {
        for type_name in ["standard", "chapter", "marker", "chapter-marker"] {
            let result = Marker::from_parts("m", type_name, Some(true), timing());
            assert!(matches!(result, Err(FcpxError::InvalidMarkerState(_))), "{}", type_name);
        }
    }

    #[test]
    fn test_to_do_with_either_flag() {
        let done = Marker::from_parts("a", "to-do", Some(true), timing()).unwrap();
        let open = Marker::from_parts("b", "to-do", Some(false), timing()).unwrap();
        assert_eq!(done.completed(), Some(true));
        assert_eq!(open.completed(), Some(false));
        assert_eq!(open.kind.type_name(), "to-do");
    }

    #[test]
    fn test_tags_map_to_kinds() {
        assert_eq!(MarkerKind::resolve("marker", None).unwrap(), MarkerKind::Standard);
        assert_eq!(MarkerKind::resolve("chapter-marker", None).unwrap(), MarkerKind::Chapter);
        assert!(MarkerKind::resolve("analysis-marker", None).is_err());
        assert_eq!(MarkerKind::Chapter.completed(), None);
    }

    #[test]
    fn test_relocated_leaves_original() {
        let marker = Marker::new("Intro", MarkerKind::Chapter, timing());
        let moved = marker.relocated(
            timing()
                .rebased(RationalTime::new(2, 1), FrameRate::new(25, 1), true)
                .unwrap(),
        );
        assert_eq!(moved.timecode_info.start.frame, 50);
        assert_eq!(marker.timecode_info.start.frame, 0);
        assert_eq!(moved.name, "Intro");
    }
}
