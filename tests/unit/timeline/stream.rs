use super::*;
use crate::filters::{BarFilterSpec, FilterDocument, FilterSpec};
use crate::foundation::core::FrameRange;
use crate::foundation::error::ScoreError;
use crate::layout::{Bar, PageLayout, StaveGroup};
use crate::timeline::builder::{TimelineBuilder, TimelineOpts};
use serde_json::json;

fn timeline() -> Timeline {
    let mut layout = PageLayout::new(60, 30).unwrap();
    let mut g = StaveGroup::new(10, 19).unwrap();
    g.add_bar(Bar::new(1, 28, 0, 29).unwrap()).unwrap();
    g.add_bar(Bar::new(31, 58, 30, 59).unwrap()).unwrap();
    layout.add_stave_group(g).unwrap();

    let fade = FilterSpec::new("SmoothColorOpacity", &["1/4", "3/4"])
        .with_param("colors", json!(["#000000", "#000000"]))
        .with_param("opacities", json!([0.0, 1.0]));
    let doc = FilterDocument {
        bars: vec![
            BarFilterSpec {
                filters: vec![fade],
            },
            BarFilterSpec::default(),
        ],
    };
    let page = PageRaster::filled(60, 30, [255, 255, 255]).unwrap();
    TimelineBuilder::new(page, layout)
        .timestamps(vec![0.0, 1.0, 2.0])
        .filters(doc)
        .opts(TimelineOpts {
            window_height: 20,
            ..TimelineOpts::default()
        })
        .build()
        .unwrap()
}

#[test]
fn fade_reaches_expected_opacity() {
    let t = timeline();
    let mut stream = FrameStream::new(&t);
    let view = stream.advance(FrameIndex(7)).unwrap();
    // (1 - 7/15) * 255 = 136, truncated.
    assert_eq!(view.page.pixel(15, 10), [136, 136, 136]);
    assert_eq!(view.frame, FrameIndex(7));

    let row = 15 * 60 + 10;
    let op = stream.compositor().overlay_opacity()[row];
    assert!((op - 7.0 / 15.0).abs() < 1e-12);
    // Bar 1 is untouched.
    assert_eq!(stream.raster().pixel(15, 40), [255, 255, 255]);
    assert_eq!(stream.active_bars(), &[0]);
}

#[test]
fn step_walks_the_whole_range() {
    let t = timeline();
    assert_eq!(t.frame_range(), FrameRange::new(FrameIndex(0), FrameIndex(59)).unwrap());
    let mut stream = FrameStream::new(&t);
    let mut frames = Vec::new();
    while let Some(view) = stream.step() {
        let view = view.unwrap();
        frames.push(view.frame.0);
        assert_eq!(view.window_rgb(20).len(), 60 * 20 * 3);
    }
    assert_eq!(frames, (0..=59).collect::<Vec<_>>());
    // The bar's end frame renders blank, so the page is back to white.
    assert_eq!(stream.raster(), t.page());
}

#[test]
fn going_back_needs_a_restart() {
    let t = timeline();
    let mut stream = FrameStream::new(&t);
    stream.advance(FrameIndex(10)).unwrap();
    let err = stream.advance(FrameIndex(7)).unwrap_err();
    assert!(matches!(err, ScoreError::Range(_)));

    stream.restart();
    assert_eq!(stream.current(), None);
    let page = stream.advance(FrameIndex(7)).unwrap().page.clone();

    let mut fresh = FrameStream::new(&t);
    assert_eq!(fresh.advance(FrameIndex(7)).unwrap().page, &page);
}

#[test]
fn parallel_bars_do_not_change_output() {
    let t = timeline();
    let mut seq = FrameStream::new(&t);
    let mut par = FrameStream::new(&t).with_parallel_bars(true);
    for f in [3, 12, 29, 31, 45] {
        let a = seq.advance(FrameIndex(f)).unwrap().page.clone();
        let b = par.advance(FrameIndex(f)).unwrap().page.clone();
        assert_eq!(a, b, "frame {f}");
    }
}

#[test]
fn viewport_stays_within_page() {
    let t = timeline();
    let mut stream = FrameStream::new(&t);
    while let Some(view) = stream.step() {
        assert!(view.unwrap().top_row <= 10);
    }
}
