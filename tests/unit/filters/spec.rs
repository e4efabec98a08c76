use super::*;
use crate::canvas::BarCanvas;
use crate::filters::{Filter, FilterContext, MusicalSpan};
use crate::foundation::core::FrameIndex;

fn ctx() -> FilterContext {
    FilterContext {
        span: MusicalSpan::new(FrameIndex(0), FrameIndex(29)).unwrap(),
        width: 20,
        height: 10,
        default_seed: 11,
    }
}

#[test]
fn kind_aliases_resolve() {
    assert_eq!(
        FilterKind::parse("FilterOpacityRoundedRectangle").unwrap(),
        FilterKind::RoundedRectangleMask
    );
    assert_eq!(
        FilterKind::parse(" RoundedRectangle ").unwrap(),
        FilterKind::RoundedRectangleMask
    );
    assert_eq!(
        FilterKind::parse("FilterSmoothColorAndOpacity").unwrap(),
        FilterKind::SmoothColorOpacity
    );
    assert_eq!(
        FilterKind::parse("FilterRandomOpacityHoles").unwrap(),
        FilterKind::RandomOpacityHoles
    );
    assert!(matches!(
        FilterKind::parse("Sparkle").unwrap_err(),
        ScoreError::Config(_)
    ));
    assert!(FilterKind::parse("  ").is_err());
}

#[test]
fn document_parses_camel_case_and_legacy_fields() {
    let json = r##"[
        {"filters": [
            {"kind": "SmoothColorOpacity", "beatAnchors": ["1/4", "3/4"],
             "colors": ["#ff0000", "#00ff00"], "opacities": [0.0, 1.0]},
            {"kind": "RoundedRectangleMask", "beatAnchors": ["1/4"], "radiusRatio": 0.2}
        ]},
        {"filter_list": [
            {"name": "FilterRandomOpacityHoles", "relative_beat_str_list": ["1/4", "2/4", "3/4"],
             "opacity_list": [0.0, 0.5], "hole_radius_ratio": 0.1, "random_seed": 5}
        ]},
        {}
    ]"##;
    let doc = FilterDocument::from_reader(json.as_bytes()).unwrap();
    assert_eq!(doc.bars.len(), 3);
    assert_eq!(doc.bars[0].filters.len(), 2);
    assert!(doc.bars[2].filters.is_empty());

    let holes = &doc.bars[1].filters[0];
    assert_eq!(holes.kind().unwrap(), FilterKind::RandomOpacityHoles);
    let p: HolesParams = holes.decode_params().unwrap();
    assert_eq!(p.seed, Some(5));
    assert_eq!(p.opacities, vec![0.0, 0.5]);
}

#[test]
fn unknown_parameters_are_rejected() {
    let spec = FilterSpec::new("RoundedRectangleMask", &["1/4"])
        .with_param("radiusRatio", serde_json::json!(0.2))
        .with_param("radius", serde_json::json!(3));
    let err = spec.decode_params::<RoundedRectParams>().unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
}

#[test]
fn malformed_document_is_a_config_error() {
    let err = FilterDocument::from_reader("{\"filters\": 3}".as_bytes()).unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
}

#[test]
fn from_spec_builds_each_kind() {
    let smooth = FilterSpec::new("SmoothColorOpacity", &["3/4", "1/4"])
        .with_param("colors", serde_json::json!(["#000000", "#ffffff"]))
        .with_param("opacities", serde_json::json!([0.0, 1.0]));
    let f = Filter::from_spec(&smooth, ctx()).unwrap();
    assert_eq!(f.kind(), FilterKind::SmoothColorOpacity);
    // Anchors are sorted; values stay aligned with the sorted list.
    assert_eq!(f.anchors(), &[FrameIndex(0), FrameIndex(15)]);
    let mut canvas = BarCanvas::blank(20, 10);
    f.apply(&mut canvas, FrameIndex(0));
    assert_eq!(canvas.opacity[0], 0.0);
    assert_eq!(canvas.color[0], crate::color::Rgb8::new(0, 0, 0));

    let mask = FilterSpec::new("RoundedRectangle", &["1/4"])
        .with_param("circle_radius_ratio", serde_json::json!(0.5));
    assert_eq!(
        Filter::from_spec(&mask, ctx()).unwrap().kind(),
        FilterKind::RoundedRectangleMask
    );

    let holes = FilterSpec::new("RandomOpacityHoles", &["1/4", "3/4"])
        .with_param("opacities", serde_json::json!([0.0]))
        .with_param("radiusRatio", serde_json::json!(0.3));
    let a = Filter::from_spec(&holes, ctx()).unwrap();
    let b = Filter::from_spec(&holes, ctx()).unwrap();
    match (a, b) {
        (Filter::Holes(a), Filter::Holes(b)) => assert_eq!(a.hole_centers(), b.hole_centers()),
        other => panic!("expected hole filters, got {other:?}"),
    }
}

#[test]
fn from_spec_reports_bad_input() {
    let bad_beat = FilterSpec::new("RoundedRectangleMask", &["x/4"])
        .with_param("radiusRatio", serde_json::json!(0.2));
    assert!(matches!(
        Filter::from_spec(&bad_beat, ctx()).unwrap_err(),
        ScoreError::Config(_)
    ));

    let bad_color = FilterSpec::new("SmoothColorOpacity", &["1/4"])
        .with_param("colors", serde_json::json!(["#12"]))
        .with_param("opacities", serde_json::json!([0.5]));
    assert!(Filter::from_spec(&bad_color, ctx()).is_err());

    let missing = FilterSpec::new("RandomOpacityHoles", &["1/4", "2/4"]);
    assert!(Filter::from_spec(&missing, ctx()).is_err());
}
