//! Conform-rate retiming
//!
//! When a clip's native rate differs from its timeline's, FCPX records a
//! `<conform-rate>` child. With scaling enabled the clip's start is counted at
//! a conformed rate taken from a fixed table.

use crate::models::{FrameRate, NominalRate, ScanMode};
use roxmltree::Node;

/// Parsed `<conform-rate>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConformRate {
    pub scale_enabled: bool,
    pub source: Option<NominalRate>,
}

impl ConformRate {
    /// Read the clip's `<conform-rate>` child, if any.
    ///
    /// A missing `scaleEnabled` counts as enabled; only "0" disables it.
    pub fn of_clip(clip: Node) -> Option<Self> {
        let element = clip
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "conform-rate")?;

        let scale_enabled = element.attribute("scaleEnabled").map_or(true, |v| v.trim() != "0");
        let source = element.attribute("srcFrameRate").and_then(NominalRate::from_label);

        if source.is_none() {
            log::debug!(
                "conform-rate with unrecognized srcFrameRate {:?}",
                element.attribute("srcFrameRate")
            );
        }

        Some(ConformRate { scale_enabled, source })
    }

    /// Rate to count the clip's start at, or `None` when scaling is off.
    ///
    /// Falls back to the timeline's own rate when the table has no entry.
    pub fn resolve(&self, timeline_rate: FrameRate, timeline_scan: ScanMode) -> Option<FrameRate> {
        if !self.scale_enabled {
            return None;
        }

        let conformed = timeline_rate
            .nominal()
            .zip(self.source)
            .and_then(|(timeline, source)| conformed_frame_rate(timeline, timeline_scan, source));

        Some(conformed.unwrap_or(timeline_rate))
    }
}

/// Fixed FCPX conform table: (timeline rate + scan, source rate) → conformed rate
pub fn conformed_frame_rate(
    timeline: NominalRate,
    scan: ScanMode,
    source: NominalRate,
) -> Option<FrameRate> {
    use NominalRate::*;
    use ScanMode::*;

    let (numerator, denominator) = match (timeline, scan, source) {
        (Fps23_98, Progressive, Fps24) => (2400, 100),
        (Fps23_98, Progressive, Fps25) => (2500, 100),
        (Fps23_98, Progressive, Fps50) => (2500, 100),

        (Fps24, Progressive, Fps23_98) => (24000, 1001),
        (Fps24, Progressive, Fps25) => (2500, 100),
        (Fps24, Progressive, Fps50) => (2500, 100),

        (Fps25, Progressive, Fps23_98) => (24000, 1001),
        (Fps25, Progressive, Fps24) => (2400, 100),

        (Fps29_97, Progressive, Fps30) => (3000, 100),
        (Fps29_97, Progressive, Fps60) => (3000, 100),

        (Fps30, Progressive, Fps29_97) => (30000, 1001),
        (Fps30, Progressive, Fps59_94) => (30000, 1001),

        (Fps50, Progressive, Fps23_98) => (48000, 1001),
        (Fps50, Progressive, Fps24) => (4800, 100),

        (Fps59_94, Progressive, Fps30) => (6000, 100),
        (Fps59_94, Progressive, Fps60) => (6000, 100),

        (Fps60, Progressive, Fps29_97) => (60000, 1001),
        (Fps60, Progressive, Fps59_94) => (60000, 1001),

        (Fps25, Interlaced, Fps23_98) => (48000, 1001),
        (Fps25, Interlaced, Fps24) => (4800, 100),

        (Fps29_97, Interlaced, Fps30) => (6000, 100),
        (Fps29_97, Interlaced, Fps60) => (6000, 100),

        _ => return None,
    };

    Some(FrameRate::new(numerator, denominator))
}
