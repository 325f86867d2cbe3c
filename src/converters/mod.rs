//! Project XML converters
//!
//! Dispatches on the document's root tag: `<fcpxml>` goes to the FCPXML
//! parser, `<xmeml>` to the legacy stub. Anything else is rejected.

pub mod fcpxml;
pub mod xmeml;

use crate::errors::{FcpxError, Result};
use crate::models::ProjectFile;
use roxmltree::{Document, ParsingOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration options for a parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Count clip starts at the conformed rate when a clip's conform-rate has
    /// scaling enabled
    pub apply_conform_rate: bool,

    /// Walk lane-connected clips under each spine clip
    pub include_connected_clips: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            apply_conform_rate: true,
            include_connected_clips: true,
        }
    }
}

/// XML dialects recognized by root tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlDialect {
    /// Final Cut Pro X interchange format
    Fcpxml,
    /// Final Cut Pro 7 XML
    Xmeml,
}

impl XmlDialect {
    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "fcpxml" => Some(XmlDialect::Fcpxml),
            "xmeml" => Some(XmlDialect::Xmeml),
            _ => None,
        }
    }
}

/// Parse a project document with default settings
pub fn parse_document(xml: &str) -> Result<ProjectFile> {
    parse_document_with(xml, &ParseSettings::default())
}

/// Parse a project document
pub fn parse_document_with(xml: &str, settings: &ParseSettings) -> Result<ProjectFile> {
    // FCPXML files open with <!DOCTYPE fcpxml>
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| FcpxError::InvalidXml(e.to_string()))?;

    let root_tag = doc.root_element().tag_name().name();
    match XmlDialect::from_root_tag(root_tag) {
        Some(XmlDialect::Fcpxml) => fcpxml::parse_fcpxml(&doc, settings),
        Some(XmlDialect::Xmeml) => xmeml::parse_xmeml(&doc, settings),
        None => Err(FcpxError::UnsupportedFormat(format!(
            "XML type '{}' not recognized",
            root_tag
        ))),
    }
}

/// A `.fcpxmld` bundle directory holds its document in `Info.fcpxml`
pub fn resolve_input_path(path: &Path) -> PathBuf {
    let is_bundle = path.extension().map_or(false, |ext| ext == "fcpxmld");
    let info = path.join("Info.fcpxml");
    if is_bundle && info.is_file() {
        info
    } else {
        path.to_path_buf()
    }
}

/// Read and parse a project file or `.fcpxmld` bundle
pub fn parse_file(path: impl AsRef<Path>) -> Result<ProjectFile> {
    parse_file_with(path, &ParseSettings::default())
}

pub fn parse_file_with(path: impl AsRef<Path>, settings: &ParseSettings) -> Result<ProjectFile> {
    let input = resolve_input_path(path.as_ref());
    log::info!("reading {}", input.display());

    let xml = std::fs::read_to_string(&input).map_err(|e| FcpxError::Io {
        path: input.display().to_string(),
        message: e.to_string(),
    })?;
    parse_document_with(&xml, settings)
}
