use super::*;
use crate::filters::{BarFilterSpec, FilterSpec};
use crate::layout::{Bar, StaveGroup};
use serde_json::json;

fn layout() -> PageLayout {
    let mut page = PageLayout::new(100, 60).unwrap();
    let mut g = StaveGroup::new(20, 39).unwrap();
    g.add_bar(Bar::new(11, 49, 10, 50).unwrap()).unwrap();
    g.add_bar(Bar::new(51, 89, 50, 90).unwrap()).unwrap();
    page.add_stave_group(g).unwrap();
    page
}

fn two_groups() -> PageLayout {
    let mut page = PageLayout::new(100, 200).unwrap();
    for (top, bottom) in [(20, 59), (120, 159)] {
        let mut g = StaveGroup::new(top, bottom).unwrap();
        g.add_bar(Bar::new(11, 49, 10, 50).unwrap()).unwrap();
        g.add_bar(Bar::new(51, 89, 50, 90).unwrap()).unwrap();
        page.add_stave_group(g).unwrap();
    }
    page
}

fn builder(layout: PageLayout) -> TimelineBuilder {
    let page = PageRaster::filled(layout.width, layout.height, [255, 255, 255]).unwrap();
    TimelineBuilder::new(page, layout).opts(TimelineOpts {
        window_height: 40,
        ..TimelineOpts::default()
    })
}

fn smooth(anchors: &[&str], opacities: &[f64]) -> FilterSpec {
    FilterSpec::new("SmoothColorOpacity", anchors)
        .with_param("colors", json!(vec!["#ffd700"; anchors.len()]))
        .with_param("opacities", json!(opacities))
}

fn doc(bars: Vec<Vec<FilterSpec>>) -> FilterDocument {
    FilterDocument {
        bars: bars
            .into_iter()
            .map(|filters| BarFilterSpec { filters })
            .collect(),
    }
}

#[test]
fn musical_spans_follow_timestamps() {
    let t = builder(layout())
        .timestamps(vec![0.0, 1.0, 2.0])
        .build()
        .unwrap();
    let spans: Vec<(i64, i64)> = t
        .overlays()
        .iter()
        .map(|o| (o.span().start.0, o.span().end.0))
        .collect();
    assert_eq!(spans, vec![(0, 29), (30, 59)]);
    assert_eq!(t.frame_range(), FrameRange::new(FrameIndex(0), FrameIndex(59)).unwrap());

    // Single group: the band reaches both page edges; columns are the inner span.
    let r = t.overlays()[1].region();
    assert_eq!((r.top, r.bottom, r.left, r.right), (0, 59, 51, 89));
    assert_eq!(t.window_size(), (100, 40));
}

#[test]
fn filters_widen_actual_interval_and_frame_range() {
    let t = builder(layout())
        .timestamps(vec![0.5, 1.5, 2.5])
        .filters(doc(vec![
            vec![smooth(&["-1/4", "5/4"], &[0.0, 1.0])],
            vec![smooth(&["1/4", "9/4"], &[1.0, 0.0])],
        ]))
        .build()
        .unwrap();
    let b0 = &t.overlays()[0];
    assert_eq!(b0.span().start, FrameIndex(15));
    assert!(b0.actual_start() < b0.span().start);
    assert!(b0.actual_end() > b0.span().end);
    for o in t.overlays() {
        assert!(o.actual_start() <= o.span().start);
        assert!(o.actual_end() >= o.span().end);
    }
    assert_eq!(t.frame_range().start, FrameIndex(0));
    assert_eq!(t.frame_range().end, t.overlays()[1].actual_end());
}

#[test]
fn count_mismatches_are_config_errors() {
    let err = builder(layout()).timestamps(vec![0.0, 1.0]).build().unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));

    let err = builder(layout())
        .timestamps(vec![0.0, 1.0, 2.0])
        .filters(doc(vec![vec![]]))
        .build()
        .unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
}

#[test]
fn non_increasing_timestamps_are_rejected() {
    let err = builder(layout())
        .timestamps(vec![0.0, 1.0, 1.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
    assert!(builder(layout()).timestamps(vec![0.0, f64::NAN, 2.0]).build().is_err());
}

#[test]
fn sub_frame_bar_is_rejected() {
    let err = builder(layout())
        .timestamps(vec![0.0, 0.01, 2.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
}

#[test]
fn unknown_filter_kind_names_the_bar() {
    let err = builder(layout())
        .timestamps(vec![0.0, 1.0, 2.0])
        .filters(doc(vec![vec![], vec![FilterSpec::new("Glow", &["1/4"])]]))
        .build()
        .unwrap_err();
    match err {
        ScoreError::Config(msg) => assert!(msg.contains("bar 1, filter 0"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn page_size_must_match_layout() {
    let page = PageRaster::filled(10, 10, [255, 255, 255]).unwrap();
    let err = TimelineBuilder::new(page, layout())
        .timestamps(vec![0.0, 1.0, 2.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ScoreError::Geometry(_)));
}

#[test]
fn layout_edited_off_the_page_is_a_geometry_error() {
    let mut shrunk = layout();
    shrunk.width = 20;
    let err = builder(shrunk)
        .timestamps(vec![0.0, 1.0, 2.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ScoreError::Geometry(_)), "{err}");
}

#[test]
fn viewport_pans_from_group_to_group() {
    let t = builder(two_groups())
        .timestamps(vec![0.0, 1.0, 2.0, 3.0, 4.0])
        .build()
        .unwrap();
    // Bands: first group rows 0..=89, second 90..=189 (half of the 61-row gap each side).
    assert_eq!(t.overlays()[0].region().top, 0);
    assert_eq!(t.overlays()[2].region().top, 90);

    let v = t.viewport();
    assert_eq!(v.top_row(FrameIndex(0)), 0);
    assert_eq!(v.top_row(FrameIndex(30)), 45);
    assert_eq!(v.top_row(FrameIndex(60)), 90);
    assert_eq!(v.top_row(FrameIndex(119)), 90);
}

#[test]
fn hole_seeds_are_stable_per_bar_and_filter() {
    assert_eq!(filter_seed(7, 1, 2), filter_seed(7, 1, 2));
    assert_ne!(filter_seed(7, 1, 2), filter_seed(7, 2, 1));
    assert_ne!(filter_seed(7, 1, 2), filter_seed(8, 1, 2));
}
