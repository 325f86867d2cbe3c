//! WASM API for the marker resolver
//!
//! Thin JavaScript-facing wrappers around [`crate::converters`]. The project
//! graph crosses the boundary either as a JS object or as a JSON string for
//! the chapter-list / timecode-list formatters on the JS side.

use crate::converters::{parse_document_with, ParseSettings};
use crate::models::ProjectFile;
use wasm_bindgen::prelude::*;

/// Pretty JSON rendering of a parsed project
pub fn project_to_json(project: &ProjectFile) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

fn settings_from_js(settings: JsValue) -> Result<ParseSettings, JsValue> {
    if settings.is_undefined() || settings.is_null() {
        return Ok(ParseSettings::default());
    }
    serde_wasm_bindgen::from_value(settings)
        .map_err(|e| JsValue::from_str(&format!("Invalid parse settings: {}", e)))
}

fn parse(xml: &str, settings: &ParseSettings) -> Result<ProjectFile, JsValue> {
    parse_document_with(xml, settings).map_err(|e| {
        log::error!("FCPXML parse failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

/// Parse an FCPXML document into a project object
///
/// # Parameters
/// - `xml`: the FCPXML document text
/// - `settings`: optional `{ apply_conform_rate, include_connected_clips }`
#[wasm_bindgen(js_name = parseFcpxml)]
pub fn parse_fcpxml(xml: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let project = parse(xml, &settings)?;
    log::info!(
        "parseFcpxml: '{}' with {} timelines",
        project.name,
        project.timelines().len()
    );

    serde_wasm_bindgen::to_value(&project)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Parse an FCPXML document and return the project as JSON
#[wasm_bindgen(js_name = parseFcpxmlJson)]
pub fn parse_fcpxml_json(xml: &str) -> Result<String, JsValue> {
    let project = parse(xml, &ParseSettings::default())?;
    project_to_json(&project).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
