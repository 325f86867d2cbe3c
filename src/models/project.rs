//! Project graph: resources, containers, timelines and clips

use crate::models::marker::Marker;
use crate::models::timecode::{HasTimecode, TimecodeInfo};
use serde::{Deserialize, Serialize};

/// One parsed project file. Built once per parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub path: String,
    pub resources: Vec<Resource>,
    pub root: Container,
    /// Elements that were dropped during the parse, and why
    pub diagnostics: Vec<Diagnostic>,
}

impl ProjectFile {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        ProjectFile {
            root: Container::new(name.clone()),
            name,
            path: path.into(),
            resources: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Linear lookup by id
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Every timeline in the container tree, depth-first in document order
    pub fn timelines(&self) -> Vec<&Timeline> {
        let mut timelines = Vec::new();
        self.root.collect_timelines(&mut timelines);
        timelines
    }
}

/// Where a resource came from in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    /// `<asset>`: a media file
    Asset,
    /// `<media>`: compound clip or multicam definition
    Media,
}

/// An addressable asset or compound-clip definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
    /// Media path, or "internal" for resources with no file
    pub path: String,
    pub timecode_info: TimecodeInfo,
    pub interlaced: bool,
}

impl HasTimecode for Resource {
    fn timecode_info(&self) -> &TimecodeInfo {
        &self.timecode_info
    }
}

/// Pure grouping node (library, event)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub children: Vec<ContainerChild>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerChild {
    Container(Container),
    Timeline(Timeline),
    Clip(Clip),
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Container {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: ContainerChild) {
        self.children.push(child);
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.children.iter().filter_map(|child| match child {
            ContainerChild::Container(container) => Some(container),
            _ => None,
        })
    }

    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.children.iter().filter_map(|child| match child {
            ContainerChild::Clip(clip) => Some(clip),
            _ => None,
        })
    }

    /// First timeline with this name anywhere below this container
    pub fn find_timeline(&self, name: &str) -> Option<&Timeline> {
        let mut timelines = Vec::new();
        self.collect_timelines(&mut timelines);
        timelines.into_iter().find(|timeline| timeline.name == name)
    }

    fn collect_timelines<'a>(&'a self, out: &mut Vec<&'a Timeline>) {
        for child in &self.children {
            match child {
                ContainerChild::Container(container) => container.collect_timelines(out),
                ContainerChild::Timeline(timeline) => out.push(timeline),
                ContainerChild::Clip(_) => {}
            }
        }
    }
}

/// A project sequence with its markers already in timeline time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    pub timecode_info: TimecodeInfo,
    pub interlaced: bool,
    /// Spine order, each primary clip followed by its connected clips
    pub clips: Vec<Clip>,
    pub markers: Vec<Marker>,
}

impl Timeline {
    pub fn new(name: impl Into<String>, timecode_info: TimecodeInfo, interlaced: bool) -> Self {
        Timeline {
            name: name.into(),
            timecode_info,
            interlaced,
            clips: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn add_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

impl HasTimecode for Timeline {
    fn timecode_info(&self) -> &TimecodeInfo {
        &self.timecode_info
    }
}

/// Clip element variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipKind {
    Clip,
    AssetClip,
    SyncClip,
    McClip,
    RefClip,
    Gap,
}

impl ClipKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "clip" => Some(ClipKind::Clip),
            "asset-clip" => Some(ClipKind::AssetClip),
            "sync-clip" => Some(ClipKind::SyncClip),
            "mc-clip" => Some(ClipKind::McClip),
            "ref-clip" => Some(ClipKind::RefClip),
            "gap" => Some(ClipKind::Gap),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ClipKind::Clip => "clip",
            ClipKind::AssetClip => "asset-clip",
            ClipKind::SyncClip => "sync-clip",
            ClipKind::McClip => "mc-clip",
            ClipKind::RefClip => "ref-clip",
            ClipKind::Gap => "gap",
        }
    }
}

/// A clip, either in an event or placed on a timeline.
///
/// Markers stay in clip-local time; the timeline holds the projected copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    pub kind: ClipKind,
    pub timecode_info: TimecodeInfo,
    pub interlaced: bool,
    pub resource_id: Option<String>,
    /// 0 for spine clips, the lane number for connected clips
    pub lane: i32,
    pub markers: Vec<Marker>,
}

impl Clip {
    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

impl HasTimecode for Clip {
    fn timecode_info(&self) -> &TimecodeInfo {
        &self.timecode_info
    }
}

/// Record of an element skipped during the parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Element tag (e.g. "asset-clip", "marker")
    pub element: String,
    /// Name attribute of the element, when it had one
    pub name: Option<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timecode::{FrameRate, RationalTime, TimeSpec};

    fn timing(start: i64, duration: i64, offset: i64) -> TimecodeInfo {
        TimecodeInfo::new(
            FrameRate::new(25, 1),
            TimeSpec::Frames(start),
            TimeSpec::Frames(duration),
            TimeSpec::Frames(offset),
            true,
            None,
        )
        .unwrap()
    }

    fn resource(id: &str) -> Resource {
        Resource {
            id: id.to_string(),
            name: format!("{} media", id),
            kind: ResourceKind::Asset,
            path: "internal".to_string(),
            timecode_info: timing(0, 250, 0),
            interlaced: false,
        }
    }

    #[test]
    fn test_new_project_is_empty() {
        let mut project = ProjectFile::new("Show.fcpbundle", "file:///Show.fcpbundle/");
        assert_eq!(project.root.name, "Show.fcpbundle");
        assert!(project.timelines().is_empty());

        project.add_resource(resource("r2"));
        project.add_resource(resource("r3"));
        assert_eq!(project.resource("r3").unwrap().name, "r3 media");
        assert!(project.resource("r4").is_none());
    }

    #[test]
    fn test_clip_kind_tags() {
        for tag in ["clip", "asset-clip", "sync-clip", "mc-clip", "ref-clip", "gap"] {
            assert_eq!(ClipKind::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(ClipKind::from_tag("audition"), None);
        assert_eq!(ClipKind::from_tag("title"), None);
    }

    #[test]
    fn test_timing_accessors() {
        let clip = Clip {
            name: "A".to_string(),
            kind: ClipKind::AssetClip,
            timecode_info: timing(25, 50, 100),
            interlaced: false,
            resource_id: Some("r2".to_string()),
            lane: 0,
            markers: Vec::new(),
        };

        assert_eq!(clip.frame_rate(), FrameRate::new(25, 1));
        assert_eq!(clip.start(), RationalTime::new(1, 1));
        assert_eq!(clip.duration(), RationalTime::new(2, 1));
        assert_eq!(clip.offset(), RationalTime::new(4, 1));
        assert_eq!(resource("r2").duration(), RationalTime::new(10, 1));
    }

    #[test]
    fn test_find_timeline_searches_nested_containers() {
        let mut event = Container::new("Day 1");
        let cut = Timeline::new("Cut", timing(0, 250, 0), false);
        event.add_child(ContainerChild::Timeline(cut));
        let mut root = Container::new("Library");
        root.add_child(ContainerChild::Container(event));

        assert!(root.find_timeline("Cut").is_some());
        assert!(root.find_timeline("Missing").is_none());
        assert_eq!(root.containers().count(), 1);
        assert_eq!(root.clips().count(), 0);
    }
}
