//! Marker extraction and projection onto timelines

use crate::converters::fcpxml::audition::ClipElement;
use crate::converters::fcpxml::time::{parse_flag, parse_time};
use crate::errors::Result;
use crate::models::{
    Clip, Diagnostic, HasTimecode, Marker, MarkerKind, MarkerMetadata, TimeSpec, TimecodeInfo,
};
use roxmltree::Node;

fn is_marker_tag(tag: &str) -> bool {
    tag.ends_with("marker")
}

/// Read the markers of a resolved clip, in clip-local time at the clip's
/// effective (conformed, when active) rate.
///
/// Markers of an unknown kind or with an invalid completed flag are skipped
/// and reported in `diagnostics`; malformed times fail the parse.
pub fn extract_markers(
    clip_element: &ClipElement,
    clip: &Clip,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Marker>> {
    let rate = clip.timecode_info.effective_frame_rate();
    let non_drop_frame = clip.timecode_info.non_drop_frame;
    let mut markers = Vec::new();

    for node in clip_element
        .children()
        .filter(|n| is_marker_tag(n.tag_name().name()))
    {
        let tag = node.tag_name().name();
        let name = node.attribute("value").unwrap_or_default();
        let completed = node.attribute("completed").map(parse_flag);

        // Any marker carrying a completed attribute is a to-do
        let type_name = match completed {
            Some(_) => "to-do",
            None => tag,
        };

        let kind = match MarkerKind::resolve(type_name, completed) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("skipping <{}> '{}' on '{}': {}", tag, name, clip.name, e);
                diagnostics.push(Diagnostic {
                    element: tag.to_string(),
                    name: Some(name.to_string()),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let timecode_info = TimecodeInfo::new(
            rate,
            parse_time(node.attribute("start"))?.into(),
            parse_time(node.attribute("duration"))?.into(),
            TimeSpec::Frames(0),
            non_drop_frame,
            None,
        )?;

        let mut marker = Marker::new(name, kind, timecode_info);
        if let Some(metadata) = marker_metadata(node)? {
            marker = marker.with_metadata(metadata);
        }
        markers.push(marker);
    }

    Ok(markers)
}

fn marker_metadata(node: Node) -> Result<Option<MarkerMetadata>> {
    let note = node.attribute("note").map(str::to_string);
    let poster_offset = match node.attribute("posterOffset") {
        Some(value) => Some(parse_time(Some(value))?),
        None => None,
    };

    if note.is_none() && poster_offset.is_none() {
        return Ok(None);
    }
    Ok(Some(MarkerMetadata { note, poster_offset }))
}

/// Project one clip-local marker into timeline time.
///
/// `start = (marker.start - clip.start) + clip.offset`, kept only when it
/// falls in `[clip.offset, clip.offset + clip.duration)`. Returns a copy at
/// the timeline's rate; the clip's marker is left as is. Arithmetic overflow
/// is an `InvalidTimeValue`.
pub fn project_marker(
    marker: &Marker,
    clip: &Clip,
    timeline: &TimecodeInfo,
) -> Result<Option<Marker>> {
    let start = marker.start().try_sub(clip.start())?.try_add(clip.offset())?;
    let end = clip.timecode_info.end()?;

    if start < clip.offset() || start >= end {
        log::debug!(
            "marker '{}' at {} outside '{}' [{}, {})",
            marker.name,
            start,
            clip.name,
            clip.offset(),
            end
        );
        return Ok(None);
    }

    let timecode_info =
        marker
            .timecode_info
            .rebased(start, timeline.frame_rate, timeline.non_drop_frame)?;
    Ok(Some(marker.relocated(timecode_info)))
}

/// Every marker of `clip` that lands on the timeline, in clip order
pub fn project_markers(clip: &Clip, timeline: &TimecodeInfo) -> Result<Vec<Marker>> {
    let mut projected = Vec::new();
    for marker in &clip.markers {
        if let Some(marker) = project_marker(marker, clip, timeline)? {
            projected.push(marker);
        }
    }
    Ok(projected)
}
