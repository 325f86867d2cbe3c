//! FCPXML project tree builder
//!
//! Two passes over one document: first the `<resources>` table, then the
//! library's events, projects and clips. Every clip `ref` is resolved against
//! the finished table.

use crate::converters::fcpxml::audition::{is_clip_tag, resolve_audition, ClipElement};
use crate::converters::fcpxml::clip::{clip_offset, clip_start, ClipResolver, TimelineContext};
use crate::converters::fcpxml::markers::{extract_markers, project_markers};
use crate::converters::fcpxml::resources::{build_resources, FormatTable};
use crate::converters::fcpxml::time::{parse_non_drop_frame, parse_time};
use crate::converters::ParseSettings;
use crate::errors::{FcpxError, Result};
use crate::models::{
    Clip, Container, ContainerChild, Diagnostic, ProjectFile, RationalTime, TimeSpec, TimecodeInfo,
    Timeline,
};
use roxmltree::{Document, Node};

const UNTITLED_LIBRARY: &str = "Untitled Library";

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
}

/// Parse an `<fcpxml>` document into a [`ProjectFile`]
pub fn parse_fcpxml(doc: &Document, settings: &ParseSettings) -> Result<ProjectFile> {
    let root = doc.root_element();

    let resources_node =
        child(root, "resources").ok_or_else(|| FcpxError::MalformedDocument("resources".to_string()))?;
    let library =
        child(root, "library").ok_or_else(|| FcpxError::MalformedDocument("library".to_string()))?;

    // Pass 1: resources
    let formats = FormatTable::from_resources(resources_node);
    let resources = build_resources(resources_node, &formats)?;
    log::info!(
        "fcpxml {}: {} formats, {} resources",
        root.attribute("version").unwrap_or("?"),
        resources_node
            .children()
            .filter(|n| n.tag_name().name() == "format")
            .count(),
        resources.len()
    );

    // Pass 2: events and projects
    let (name, path) = library_identity(library);
    let mut builder = TreeBuilder {
        resolver: ClipResolver {
            formats: &formats,
            resources: &resources,
            settings,
        },
        diagnostics: Vec::new(),
    };

    let mut project = ProjectFile::new(name, path);
    for event in library
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "event")
    {
        project
            .root
            .add_child(ContainerChild::Container(builder.build_event(event)?));
    }
    project.diagnostics = builder.diagnostics;
    for resource in resources {
        project.add_resource(resource);
    }

    log::info!(
        "parsed '{}': {} timelines, {} diagnostics",
        project.name,
        project.timelines().len(),
        project.diagnostics.len()
    );
    Ok(project)
}

/// Library name (last path component of `location`) and location
fn library_identity(library: Node) -> (String, String) {
    let Some(location) = library.attribute("location") else {
        return (UNTITLED_LIBRARY.to_string(), String::new());
    };

    let name = location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.ends_with(':'))
        .unwrap_or(UNTITLED_LIBRARY)
        .to_string();

    (name, location.to_string())
}

struct TreeBuilder<'t> {
    resolver: ClipResolver<'t>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> TreeBuilder<'t> {
    fn build_event(&mut self, event: Node) -> Result<Container> {
        let mut container = Container::new(event.attribute("name").unwrap_or_default());

        for item in event.children().filter(|n| n.is_element()) {
            let tag = item.tag_name().name();
            if tag == "project" {
                if let Some(timeline) = self.build_timeline(item)? {
                    container.add_child(ContainerChild::Timeline(timeline));
                }
            } else if is_clip_tag(tag) {
                if let Some(clip) = self.build_event_clip(item)? {
                    container.add_child(ContainerChild::Clip(clip));
                }
            } else {
                log::debug!("event '{}': skipping <{}>", container.name, tag);
            }
        }

        Ok(container)
    }

    /// Browser clip: no timeline, markers stay clip-local
    fn build_event_clip(&mut self, node: Node) -> Result<Option<Clip>> {
        let Some(element) = self.active_clip(node) else {
            return Ok(None);
        };

        let offset = clip_offset(&element)?;
        self.resolve_with_markers(&element, offset, None)
    }

    fn build_timeline(&mut self, project: Node) -> Result<Option<Timeline>> {
        let name = project.attribute("name").unwrap_or_default();
        let Some(sequence) = child(project, "sequence") else {
            self.skip("project", Some(name), "project has no <sequence>".to_string());
            return Ok(None);
        };

        let format = self
            .resolver
            .formats
            .frame_rate_from_format(sequence.attribute("format"));
        let non_drop_frame = parse_non_drop_frame(sequence.attribute("tcFormat")).unwrap_or(true);
        let timecode_info = TimecodeInfo::new(
            format.frame_rate,
            parse_time(sequence.attribute("tcStart"))?.into(),
            parse_time(sequence.attribute("duration"))?.into(),
            TimeSpec::Frames(0),
            non_drop_frame,
            None,
        )?;

        let context = TimelineContext {
            frame_rate: format.frame_rate,
            scan: format.scan,
            non_drop_frame,
        };
        let mut timeline = Timeline::new(name, timecode_info, format.scan.is_interlaced());
        log::debug!(
            "timeline '{}' at {} {}{}",
            name,
            format.frame_rate.smpte_label(),
            timeline.timecode_info.format_label(),
            format.scan.suffix()
        );

        if let Some(spine) = child(sequence, "spine") {
            for node in spine.children().filter(|n| n.is_element()) {
                self.place_primary_clip(node, &context, &mut timeline)?;
            }
        }

        Ok(Some(timeline))
    }

    /// Place a spine clip and then its connected clips, in that order
    fn place_primary_clip(
        &mut self,
        node: Node,
        context: &TimelineContext,
        timeline: &mut Timeline,
    ) -> Result<()> {
        if !is_clip_tag(node.tag_name().name()) {
            log::debug!("spine: skipping <{}>", node.tag_name().name());
            return Ok(());
        }
        let Some(primary) = self.active_clip(node) else {
            return Ok(());
        };

        let primary_offset = clip_offset(&primary)?;
        let primary_start = clip_start(&primary)?;
        if let Some(clip) = self.resolve_with_markers(&primary, primary_offset, Some(context))? {
            attach(clip, timeline)?;
        }

        if !self.resolver.settings.include_connected_clips {
            return Ok(());
        }

        for connected in primary.children().filter(|n| n.attribute("lane").is_some()) {
            let tag = connected.tag_name().name();
            if tag == "spine" {
                self.skip(
                    "spine",
                    connected.attribute("name"),
                    "connected storylines are not walked; their markers are dropped".to_string(),
                );
                continue;
            }
            if !is_clip_tag(tag) {
                log::debug!(
                    "lane {}: skipping <{}>",
                    connected.attribute("lane").unwrap_or_default(),
                    tag
                );
                continue;
            }

            let Some(element) = self.active_clip(connected) else {
                continue;
            };
            // Connected offsets are in the primary clip's local time
            let offset = primary_offset.try_add(clip_offset(&element)?.try_sub(primary_start)?)?;
            if let Some(clip) = self.resolve_with_markers(&element, offset, Some(context))? {
                attach(clip, timeline)?;
            }
        }

        Ok(())
    }

    fn active_clip<'a, 'input>(&mut self, node: Node<'a, 'input>) -> Option<ClipElement<'a, 'input>> {
        let element = resolve_audition(node);
        if element.is_none() {
            self.skip(
                "audition",
                node.attribute("name"),
                "audition has no clip children".to_string(),
            );
        }
        element
    }

    /// Resolve a clip and read its markers. A dangling `ref` drops the clip
    /// with a diagnostic instead of failing the parse.
    fn resolve_with_markers(
        &mut self,
        element: &ClipElement,
        offset: RationalTime,
        context: Option<&TimelineContext>,
    ) -> Result<Option<Clip>> {
        let mut clip = match self.resolver.resolve(element, offset, context) {
            Ok(clip) => clip,
            Err(e @ FcpxError::UnresolvableReference { .. }) => {
                self.skip(element.tag(), element.name(), e.to_string());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        clip.markers = extract_markers(element, &clip, &mut self.diagnostics)?;
        Ok(Some(clip))
    }

    fn skip(&mut self, element: &str, name: Option<&str>, reason: String) {
        log::warn!("dropping <{}> {:?}: {}", element, name.unwrap_or_default(), reason);
        self.diagnostics.push(Diagnostic {
            element: element.to_string(),
            name: name.map(str::to_string),
            reason,
        });
    }
}

/// Place a clip on the timeline along with its projected markers
fn attach(clip: Clip, timeline: &mut Timeline) -> Result<()> {
    let markers = project_markers(&clip, &timeline.timecode_info)?;
    log::debug!(
        "<{}> '{}' lane {}: {} of {} markers on '{}'",
        clip.kind.tag(),
        clip.name,
        clip.lane,
        markers.len(),
        clip.markers.len(),
        timeline.name
    );
    for marker in markers {
        timeline.add_marker(marker);
    }
    timeline.add_clip(clip);
    Ok(())
}
