//! Audition resolution
//!
//! An `<audition>` wraps alternate clips; the first child is the active pick.
//! Everything downstream (ref extraction, conform lookup, markers) expects a
//! normal clip, so auditions are swapped for their active child first. The
//! source tree is never touched: the result is a [`ClipElement`] that reads
//! `offset` and `lane` from the audition and everything else from the child.

use roxmltree::Node;

/// Tags handled as clips: everything ending in "clip", plus gaps and auditions
pub fn is_clip_tag(tag: &str) -> bool {
    tag.ends_with("clip") || tag == "gap" || tag == "audition"
}

/// A clip element with attribute overrides applied
#[derive(Debug, Clone, Copy)]
pub struct ClipElement<'a, 'input> {
    pub node: Node<'a, 'input>,
    offset: Option<&'a str>,
    lane: Option<&'a str>,
}

impl<'a, 'input> ClipElement<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        ClipElement {
            node,
            offset: node.attribute("offset"),
            lane: node.attribute("lane"),
        }
    }

    pub fn tag(&self) -> &'a str {
        self.node.tag_name().name()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        match name {
            "offset" => self.offset,
            "lane" => self.lane,
            _ => self.node.attribute(name),
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.attribute("name")
    }

    /// Element children of the underlying clip
    pub fn children(&self) -> impl Iterator<Item = Node<'a, 'input>> {
        self.node.children().filter(|n| n.is_element())
    }
}

/// Replace an audition with its active child, which takes over the
/// audition's `offset` and `lane` whatever it carried itself. Other clips pass
/// through unchanged. Returns `None` for an audition with no clip children.
pub fn resolve_audition<'a, 'input>(node: Node<'a, 'input>) -> Option<ClipElement<'a, 'input>> {
    if node.tag_name().name() != "audition" {
        return Some(ClipElement::new(node));
    }

    let active = node
        .children()
        .find(|n| n.is_element() && is_clip_tag(n.tag_name().name()))?;

    log::debug!(
        "audition resolved to <{}> '{}'",
        active.tag_name().name(),
        active.attribute("name").unwrap_or_default()
    );

    Some(ClipElement {
        node: active,
        offset: node.attribute("offset"),
        lane: node.attribute("lane"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_active_child_inherits_offset() {
        let xml = r#"<audition offset="50s">
            <asset-clip name="Take 1" ref="r2" offset="10s" lane="3"/>
            <asset-clip name="Take 2" ref="r3" offset="20s"/>
        </audition>"#;
        let doc = Document::parse(xml).unwrap();
        let clip = resolve_audition(doc.root_element()).unwrap();

        assert_eq!(clip.name(), Some("Take 1"));
        assert_eq!(clip.tag(), "asset-clip");
        assert_eq!(clip.attribute("offset"), Some("50s"));
        assert_eq!(clip.attribute("lane"), None);
        assert_eq!(clip.attribute("ref"), Some("r2"));
        // Source tree is unchanged
        assert_eq!(clip.node.attribute("offset"), Some("10s"));
    }

    #[test]
    fn test_lane_comes_from_audition() {
        let xml = r#"<audition lane="2" offset="5s"><clip name="A" lane="1"/></audition>"#;
        let doc = Document::parse(xml).unwrap();
        let clip = resolve_audition(doc.root_element()).unwrap();
        assert_eq!(clip.attribute("lane"), Some("2"));
    }

    #[test]
    fn test_plain_clip_passes_through() {
        let xml = r#"<gap name="Gap" offset="3s" lane="1"/>"#;
        let doc = Document::parse(xml).unwrap();
        let clip = resolve_audition(doc.root_element()).unwrap();
        assert_eq!(clip.tag(), "gap");
        assert_eq!(clip.attribute("offset"), Some("3s"));
        assert_eq!(clip.attribute("lane"), Some("1"));
    }

    #[test]
    fn test_empty_audition() {
        let doc = Document::parse(r#"<audition offset="1s"><marker/></audition>"#).unwrap();
        assert!(resolve_audition(doc.root_element()).is_none());
    }

    #[test]
    fn test_clip_tags() {
        for tag in ["clip", "asset-clip", "sync-clip", "mc-clip", "ref-clip", "gap", "audition"] {
            assert!(is_clip_tag(tag), "{}", tag);
        }
        assert!(!is_clip_tag("transition"));
        assert!(!is_clip_tag("title"));
    }
}
