use super::*;

fn tracker() -> ViewportTracker {
    ViewportTracker::new(
        &[
            (FrameIndex(0), 0),
            (FrameIndex(100), 300),
            (FrameIndex(200), 700),
            (FrameIndex(260), 700),
        ],
        1000,
        400,
    )
    .unwrap()
}

#[test]
fn interpolates_between_anchors() {
    let v = tracker();
    assert_eq!(v.top_row(FrameIndex(0)), 0);
    assert_eq!(v.top_row(FrameIndex(50)), 150);
    assert_eq!(v.top_row(FrameIndex(101)), 304);
    assert_eq!(v.top_row(FrameIndex(150)), 500);
}

#[test]
fn clamps_to_page_and_nearest_anchor() {
    let v = tracker();
    assert_eq!(v.furthest_row(), 600);
    assert_eq!(v.top_row(FrameIndex(200)), 600);
    assert_eq!(v.top_row(FrameIndex(-20)), 0);
    assert_eq!(v.top_row(FrameIndex(5000)), 600);
    assert!(!v.in_domain(FrameIndex(-1)));
    assert!(v.in_domain(FrameIndex(260)));
    assert!(!v.in_domain(FrameIndex(261)));
}

#[test]
fn top_row_is_monotonic_and_bounded() {
    let v = tracker();
    let mut prev = 0;
    for f in -10..300 {
        let row = v.top_row(FrameIndex(f));
        assert!(row >= prev);
        assert!(row <= 600);
        prev = row;
    }
}

#[test]
fn window_taller_than_page_pins_to_top() {
    let v = ViewportTracker::new(&[(FrameIndex(0), 0), (FrameIndex(10), 80)], 100, 400).unwrap();
    assert_eq!(v.top_row(FrameIndex(5)), 0);
}

#[test]
fn rejects_empty_anchor_list() {
    assert!(matches!(
        ViewportTracker::new(&[], 100, 10).unwrap_err(),
        ScoreError::Config(_)
    ));
}
