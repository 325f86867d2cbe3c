//! Legacy Final Cut Pro 7 `xmeml` dialect
//!
//! Recognized so the dispatcher can report it, but not parsed: the dialect
//! shares the ProjectFile contract and nothing else is built for it yet.

use crate::converters::ParseSettings;
use crate::errors::{FcpxError, Result};
use crate::models::ProjectFile;
use roxmltree::Document;

pub fn parse_xmeml(doc: &Document, _settings: &ParseSettings) -> Result<ProjectFile> {
    let version = doc.root_element().attribute("version").unwrap_or("?");
    log::warn!("xmeml {} document rejected: dialect not implemented", version);
    Err(FcpxError::UnsupportedFormat(
        "legacy xmeml dialect is not implemented".to_string(),
    ))
}
