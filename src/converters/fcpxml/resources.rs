//! Format and resource resolution
//!
//! Built in the first pass over `<resources>`, before any clip `ref` is read.
//! Both tables are flat and searched linearly by id.

use crate::converters::fcpxml::time::{parse_frame_duration, parse_non_drop_frame, parse_time};
use crate::errors::Result;
use crate::models::{
    FrameRate, RationalTime, Resource, ResourceKind, ScanMode, TimeSpec, TimecodeInfo,
};
use roxmltree::Node;

/// Path recorded for resources with no media file
pub const INTERNAL_PATH: &str = "internal";

/// Rate and scan of a `<format>` resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub frame_rate: FrameRate,
    pub scan: ScanMode,
}

impl Default for FormatInfo {
    /// Missing and rate-undefined formats run at 60 fps progressive in FCPX
    fn default() -> Self {
        FormatInfo {
            frame_rate: FrameRate::DEFAULT,
            scan: ScanMode::Progressive,
        }
    }
}

#[derive(Debug, Clone)]
struct FormatEntry {
    id: String,
    info: FormatInfo,
}

/// All `<format>` resources of a document
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    formats: Vec<FormatEntry>,
}

impl FormatTable {
    pub fn from_resources(resources: Node) -> Self {
        let formats = resources
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "format")
            .filter_map(|format| {
                let id = format.attribute("id")?;
                Some(FormatEntry {
                    id: id.to_string(),
                    info: format_info(format),
                })
            })
            .collect();

        FormatTable { formats }
    }

    /// Rate and scan for a format id. Unknown ids get the 60 fps default.
    pub fn frame_rate_from_format(&self, format_id: Option<&str>) -> FormatInfo {
        let Some(format_id) = format_id else {
            return FormatInfo::default();
        };

        match self.formats.iter().find(|entry| entry.id == format_id) {
            Some(entry) => entry.info,
            None => {
                log::warn!("format '{}' not found, assuming 60 fps", format_id);
                FormatInfo::default()
            }
        }
    }

    pub fn contains(&self, format_id: &str) -> bool {
        self.formats.iter().any(|entry| entry.id == format_id)
    }
}

fn format_info(format: Node) -> FormatInfo {
    let scan = ScanMode::from_field_order(format.attribute("fieldOrder"));
    let rate_undefined = format
        .attribute("name")
        .map_or(false, |name| name.contains("RateUndefined"));

    let frame_rate = match format.attribute("frameDuration") {
        Some(duration) if !rate_undefined => match parse_frame_duration(duration) {
            Ok(rate) => rate,
            Err(e) => {
                log::warn!("format '{}': {}, assuming 60 fps", format.attribute("id").unwrap_or("?"), e);
                FrameRate::DEFAULT
            }
        },
        // Audio-only and still-image formats carry no rate
        _ => FrameRate::DEFAULT,
    };

    FormatInfo { frame_rate, scan }
}

/// Build the resource table from every `<asset>` and `<media>` element
pub fn build_resources(resources: Node, formats: &FormatTable) -> Result<Vec<Resource>> {
    let mut table = Vec::new();

    for element in resources.children().filter(|n| n.is_element()) {
        let resource = match element.tag_name().name() {
            "asset" => asset_resource(element, formats)?,
            "media" => media_resource(element, formats)?,
            _ => continue,
        };
        log::debug!(
            "resource '{}' ({}) at {}",
            resource.id,
            resource.name,
            resource.timecode_info.frame_rate
        );
        table.push(resource);
    }

    Ok(table)
}

fn asset_resource(asset: Node, formats: &FormatTable) -> Result<Resource> {
    let format = formats.frame_rate_from_format(asset.attribute("format"));
    let start = parse_time(asset.attribute("start"))?;
    let duration = parse_time(asset.attribute("duration"))?;

    // Assets carry no DF/NDF information
    let timecode_info = TimecodeInfo::new(
        format.frame_rate,
        start.into(),
        duration.into(),
        TimeSpec::Frames(0),
        true,
        None,
    )?;

    Ok(Resource {
        id: asset.attribute("id").unwrap_or_default().to_string(),
        name: asset.attribute("name").unwrap_or_default().to_string(),
        kind: ResourceKind::Asset,
        path: asset_path(asset),
        timecode_info,
        interlaced: format.scan.is_interlaced(),
    })
}

/// `media-rep` (original media preferred), then the older `src` attribute
fn asset_path(asset: Node) -> String {
    let reps: Vec<Node> = asset
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "media-rep")
        .collect();

    reps.iter()
        .find(|rep| rep.attribute("kind") == Some("original-media"))
        .or_else(|| reps.first())
        .and_then(|rep| rep.attribute("src"))
        .or_else(|| asset.attribute("src"))
        .unwrap_or(INTERNAL_PATH)
        .to_string()
}

/// Compound clips and multicams take their timing from their first child
/// (`sequence` or `multicam`).
fn media_resource(media: Node, formats: &FormatTable) -> Result<Resource> {
    let definition = media.children().find(|n| n.is_element());

    let (format, start, duration, non_drop_frame) = match definition {
        Some(child) => {
            let format = formats.frame_rate_from_format(child.attribute("format"));
            let start = parse_time(child.attribute("tcStart"))?;
            // Multicam duration is not exposed on the element
            let duration = if child.tag_name().name() == "multicam" {
                RationalTime::ZERO
            } else {
                parse_time(child.attribute("duration"))?
            };
            let ndf = parse_non_drop_frame(child.attribute("tcFormat")).unwrap_or(true);
            (format, start, duration, ndf)
        }
        None => (FormatInfo::default(), RationalTime::ZERO, RationalTime::ZERO, true),
    };

    let timecode_info = TimecodeInfo::new(
        format.frame_rate,
        start.into(),
        duration.into(),
        TimeSpec::Frames(0),
        non_drop_frame,
        None,
    )?;

    Ok(Resource {
        id: media.attribute("id").unwrap_or_default().to_string(),
        name: media.attribute("name").unwrap_or_default().to_string(),
        kind: ResourceKind::Media,
        path: INTERNAL_PATH.to_string(),
        timecode_info,
        interlaced: format.scan.is_interlaced(),
    })
}

/// Linear lookup by id
pub fn find_resource<'r>(resources: &'r [Resource], id: &str) -> Option<&'r Resource> {
    resources.iter().find(|resource| resource.id == id)
}
