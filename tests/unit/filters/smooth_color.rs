use super::*;
use crate::color::parse_hex;

fn filter(anchors: &[i64], colors: &[&str], opacities: &[f64]) -> SmoothColorOpacity {
    let colors: Vec<Rgb8> = colors.iter().map(|c| parse_hex(c).unwrap()).collect();
    SmoothColorOpacity::new(
        anchors.iter().copied().map(FrameIndex).collect(),
        &colors,
        opacities,
    )
    .unwrap()
}

#[test]
fn exact_anchor_reproduces_keyframe() {
    let f = filter(&[0, 15, 40], &["#ffd700", "#1e90ff", "#7f3f9a"], &[0.0, 0.6, 0.3]);
    assert_eq!(f.sample(FrameIndex(0)), (parse_hex("#ffd700").unwrap(), 0.0));
    assert_eq!(f.sample(FrameIndex(15)), (parse_hex("#1e90ff").unwrap(), 0.6));
    assert_eq!(f.sample(FrameIndex(40)), (parse_hex("#7f3f9a").unwrap(), 0.3));
}

#[test]
fn outside_anchors_holds_boundary_values() {
    let f = filter(&[10, 20], &["#ff0000", "#0000ff"], &[0.2, 0.9]);
    assert_eq!(f.sample(FrameIndex(-50)), (parse_hex("#ff0000").unwrap(), 0.2));
    assert_eq!(f.sample(FrameIndex(9)), (parse_hex("#ff0000").unwrap(), 0.2));
    assert_eq!(f.sample(FrameIndex(21)), (parse_hex("#0000ff").unwrap(), 0.9));
}

#[test]
fn opacity_is_linear_between_anchors() {
    let f = filter(&[0, 15], &["#ffffff", "#ffffff"], &[0.0, 1.0]);
    let (_, op) = f.sample(FrameIndex(7));
    assert!((op - 7.0 / 15.0).abs() < 1e-12);
}

#[test]
fn hue_blend_avoids_muddy_grey() {
    let f = filter(&[0, 10], &["#ff0000", "#00ff00"], &[1.0, 1.0]);
    let (mid, _) = f.sample(FrameIndex(5));
    // A straight RGB blend would give (127, 127, 0); HSLuv keeps the midpoint saturated.
    let max = mid.r.max(mid.g).max(mid.b);
    let min = mid.r.min(mid.g).min(mid.b);
    assert!(max - min > 150, "{mid:?}");
}

#[test]
fn apply_overwrites_the_whole_canvas() {
    let f = filter(&[0, 10], &["#102030", "#102030"], &[0.5, 0.5]);
    let mut canvas = BarCanvas::blank(4, 3);
    canvas.opacity[0] = 1.0;
    f.apply(&mut canvas, FrameIndex(3));
    assert!(canvas.opacity.iter().all(|&o| o == 0.5));
    assert!(canvas.color.iter().all(|&c| c == Rgb8::new(0x10, 0x20, 0x30)));
}

#[test]
fn mismatched_lists_are_config_errors() {
    let colors = [Rgb8::WHITE];
    let err = SmoothColorOpacity::new(vec![FrameIndex(0), FrameIndex(1)], &colors, &[0.0, 1.0])
        .unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));

    let err = SmoothColorOpacity::new(vec![FrameIndex(0)], &colors, &[f64::NAN]).unwrap_err();
    assert!(matches!(err, ScoreError::Config(_)));
}

#[test]
fn out_of_range_opacity_is_kept_for_the_compositor_to_clamp() {
    let f = filter(&[0, 10], &["#ffffff", "#ffffff"], &[-0.5, 1.5]);
    assert_eq!(f.sample(FrameIndex(0)).1, -0.5);
    assert_eq!(f.sample(FrameIndex(5)).1, 0.5);
    assert_eq!(f.sample(FrameIndex(10)).1, 1.5);
}
