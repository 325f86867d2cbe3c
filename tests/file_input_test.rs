// Reading projects from disk: plain .fcpxml files and .fcpxmld bundles

use fcpx_markers::converters::{parse_file_with, resolve_input_path};
use fcpx_markers::{parse_file, FcpxError, ParseSettings};
use std::fs;

const PAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE fcpxml>
<fcpxml version="1.10">
  <resources>
    <format id="r1" name="FFVideoFormat1080p25" frameDuration="100/2500s"/>
    <asset id="r2" name="Clip" start="0s" duration="10s" format="r1" src="file:///clip.mov"/>
  </resources>
  <library location="file:///Projects/Promo.fcpbundle/">
    <event name="Promo">
      <project name="Promo v1">
        <sequence format="r1" tcStart="0s" duration="10s" tcFormat="NDF">
          <spine>
            <asset-clip ref="r2" offset="0s" duration="10s" name="Clip">
              <chapter-marker start="2s" duration="100/2500s" value="Intro"/>
              <asset-clip ref="r2" lane="1" offset="4s" duration="2s" name="Insert">
                <marker start="1s" duration="100/2500s" value="Insert note"/>
              </asset-clip>
            </asset-clip>
          </spine>
        </sequence>
      </project>
    </event>
  </library>
</fcpxml>"#;

#[test]
fn test_plain_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Promo.fcpxml");
    fs::write(&path, PAL).expect("write fcpxml");

    let project = parse_file(&path).expect("file should parse");
    let timeline = project.timelines()[0];

    assert_eq!(project.name, "Promo.fcpbundle");
    assert_eq!(timeline.markers.len(), 2);
    assert_eq!(timeline.markers[0].name, "Intro");
    assert_eq!(timeline.markers[0].timecode_info.start.frame, 50);
    assert_eq!(timeline.markers[0].timecode_info.start_timecode(), "00:00:02:00");
    assert_eq!(timeline.markers[1].timecode_info.start.frame, 125);
}

#[test]
fn test_bundle_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bundle = dir.path().join("Promo.fcpxmld");
    fs::create_dir(&bundle).expect("create bundle");
    fs::write(bundle.join("Info.fcpxml"), PAL).expect("write Info.fcpxml");

    assert_eq!(resolve_input_path(&bundle), bundle.join("Info.fcpxml"));

    let project = parse_file(&bundle).expect("bundle should parse");
    assert_eq!(project.timelines()[0].name, "Promo v1");
}

#[test]
fn test_settings_apply_to_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Promo.fcpxml");
    fs::write(&path, PAL).expect("write fcpxml");

    let settings = ParseSettings {
        include_connected_clips: false,
        ..ParseSettings::default()
    };
    let project = parse_file_with(&path, &settings).expect("file should parse");
    assert_eq!(project.timelines()[0].markers.len(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = parse_file(dir.path().join("missing.fcpxml"));
    assert!(matches!(result, Err(FcpxError::Io { .. })));
}

#[test]
fn test_bundle_without_info_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bundle = dir.path().join("Empty.fcpxmld");
    fs::create_dir(&bundle).expect("create bundle");

    assert_eq!(resolve_input_path(&bundle), bundle);
    assert!(matches!(parse_file(&bundle), Err(FcpxError::Io { .. })));
}
