//! Clip resolution
//!
//! Works out a clip's resource, effective frame rate and timing. Effective
//! rate priority: the clip's own `format`, then its resource's rate, then the
//! enclosing timeline's rate.

use crate::converters::fcpxml::audition::ClipElement;
use crate::converters::fcpxml::conform::ConformRate;
use crate::converters::fcpxml::resources::{find_resource, FormatInfo, FormatTable};
use crate::converters::fcpxml::time::{parse_non_drop_frame, parse_time};
use crate::converters::ParseSettings;
use crate::errors::{FcpxError, Result};
use crate::models::{
    Clip, ClipKind, FrameRate, RationalTime, Resource, ScanMode, TimeSpec, TimecodeInfo,
};

/// Timing of the timeline a clip is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineContext {
    pub frame_rate: FrameRate,
    pub scan: ScanMode,
    pub non_drop_frame: bool,
}

/// Lookup tables shared by every clip of a document
pub struct ClipResolver<'t> {
    pub formats: &'t FormatTable,
    pub resources: &'t [Resource],
    pub settings: &'t ParseSettings,
}

/// The clip's own `ref`, else the `ref` of its first non-conform-rate child:
/// a nested `<video>`, or the `<audio>` a gap wraps.
pub fn resource_id_of<'a>(clip: &ClipElement<'a, '_>) -> Option<&'a str> {
    if let Some(reference) = clip.attribute("ref") {
        return Some(reference);
    }

    let child = clip
        .children()
        .find(|n| n.tag_name().name() != "conform-rate")?;

    match (clip.tag(), child.tag_name().name()) {
        (_, "video") => child.attribute("ref"),
        ("gap", "audio") => child.attribute("ref"),
        _ => None,
    }
}

/// Raw `start` attribute of a clip
pub fn clip_start(clip: &ClipElement) -> Result<RationalTime> {
    parse_time(clip.attribute("start"))
}

/// Raw `offset` attribute of a clip (in its parent's time)
pub fn clip_offset(clip: &ClipElement) -> Result<RationalTime> {
    parse_time(clip.attribute("offset"))
}

/// Lane number; spine clips have none
pub fn clip_lane(clip: &ClipElement) -> i32 {
    match clip.attribute("lane") {
        Some(lane) => lane.trim().parse().unwrap_or_else(|_| {
            log::warn!("unparsable lane '{}' on <{}>, using 0", lane, clip.tag());
            0
        }),
        None => 0,
    }
}

impl<'t> ClipResolver<'t> {
    /// Resolve a clip placed at `offset` (already in timeline time for
    /// timeline clips). Markers are not attached here.
    ///
    /// A `ref` that names no asset/media resource fails with
    /// `UnresolvableReference`; callers drop the clip with a diagnostic.
    pub fn resolve(
        &self,
        clip: &ClipElement,
        offset: RationalTime,
        timeline: Option<&TimelineContext>,
    ) -> Result<Clip> {
        let tag = clip.tag();
        let kind = ClipKind::from_tag(tag).ok_or_else(|| {
            FcpxError::UnsupportedFormat(format!("<{}> is not a clip element", tag))
        })?;

        let resource_id = resource_id_of(clip);
        let resource = match resource_id {
            Some(id) => Some(find_resource(self.resources, id).ok_or_else(|| {
                FcpxError::UnresolvableReference {
                    element: tag.to_string(),
                    reference: id.to_string(),
                }
            })?),
            None => None,
        };

        let native = self.native_format(clip, resource, timeline);
        let non_drop_frame = parse_non_drop_frame(clip.attribute("tcFormat"))
            .or(resource.map(|r| r.timecode_info.non_drop_frame))
            .or(timeline.map(|t| t.non_drop_frame))
            .unwrap_or(true);

        let conformed = timeline.and_then(|timeline| self.conformed_rate(clip, timeline));
        if let Some(rate) = conformed {
            log::debug!(
                "<{}> '{}' start conformed to {} (native {})",
                tag,
                clip.name().unwrap_or_default(),
                rate,
                native.frame_rate
            );
        }

        // Start counts at the conformed rate; the clip otherwise keeps its native rate
        let timecode_info = TimecodeInfo::new(
            native.frame_rate,
            clip_start(clip)?.into(),
            parse_time(clip.attribute("duration"))?.into(),
            TimeSpec::from(offset),
            non_drop_frame,
            conformed,
        )?;

        Ok(Clip {
            name: clip.name().unwrap_or_default().to_string(),
            kind,
            timecode_info,
            interlaced: native.scan.is_interlaced(),
            resource_id: resource_id.map(str::to_string),
            lane: clip_lane(clip),
            markers: Vec::new(),
        })
    }

    fn native_format(
        &self,
        clip: &ClipElement,
        resource: Option<&Resource>,
        timeline: Option<&TimelineContext>,
    ) -> FormatInfo {
        if let Some(format_id) = clip.attribute("format") {
            return self.formats.frame_rate_from_format(Some(format_id));
        }
        if let Some(resource) = resource {
            return FormatInfo {
                frame_rate: resource.timecode_info.frame_rate,
                scan: if resource.interlaced {
                    ScanMode::Interlaced
                } else {
                    ScanMode::Progressive
                },
            };
        }
        match timeline {
            Some(timeline) => FormatInfo {
                frame_rate: timeline.frame_rate,
                scan: timeline.scan,
            },
            None => FormatInfo::default(),
        }
    }

    fn conformed_rate(&self, clip: &ClipElement, timeline: &TimelineContext) -> Option<FrameRate> {
        if !self.settings.apply_conform_rate {
            return None;
        }
        ConformRate::of_clip(clip.node)?.resolve(timeline.frame_rate, timeline.scan)
    }
}
