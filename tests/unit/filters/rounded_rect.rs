use super::*;

fn frames(v: &[i64]) -> Vec<FrameIndex> {
    v.iter().copied().map(FrameIndex).collect()
}

#[test]
fn schedule_alternates_and_holds_last_state() {
    let mask = RoundedRectMask::new(frames(&[10, 20, 30, 40]), 0.2, 20, 10).unwrap();
    assert!(!mask.is_active(FrameIndex(9)));
    assert!(mask.is_active(FrameIndex(10)));
    assert!(mask.is_active(FrameIndex(19)));
    assert!(!mask.is_active(FrameIndex(20)));
    assert!(mask.is_active(FrameIndex(30)));
    assert!(!mask.is_active(FrameIndex(40)));
    assert!(!mask.is_active(FrameIndex(400)));
}

#[test]
fn odd_anchor_count_stays_on_after_last() {
    let mask = RoundedRectMask::new(frames(&[0, 5, 9]), 0.2, 20, 10).unwrap();
    assert!(mask.is_active(FrameIndex(9)));
    assert!(mask.is_active(FrameIndex(1_000)));
}

#[test]
fn corners_are_cut_and_centre_kept() {
    let (w, h) = (30u32, 20u32);
    let mask = RoundedRectMask::new(frames(&[0]), 0.25, w, h).unwrap();
    assert_eq!(mask.radius(), 5);
    let corners = mask.corners();
    let at = |row: u32, col: u32| corners[(row * w + col) as usize];
    assert!(at(0, 0));
    assert!(at(0, w - 1));
    assert!(at(h - 1, 0));
    assert!(at(h - 1, w - 1));
    assert!(!at(h / 2, w / 2));
    assert!(!at(0, w / 2));
    assert!(!at(h / 2, 0));
    // Corner mask is symmetric left/right and top/bottom.
    for row in 0..h {
        for col in 0..w {
            assert_eq!(at(row, col), at(row, w - 1 - col));
            assert_eq!(at(row, col), at(h - 1 - row, col));
        }
    }
}

#[test]
fn zero_radius_cuts_nothing() {
    let mask = RoundedRectMask::new(frames(&[0]), 0.0, 8, 8).unwrap();
    assert!(mask.corners().iter().all(|&c| !c));
}

#[test]
fn apply_only_touches_corner_opacity_while_active() {
    let mask = RoundedRectMask::new(frames(&[5, 10]), 0.5, 12, 10).unwrap();
    let mut canvas = BarCanvas::blank(12, 10);
    canvas.opacity.fill(0.5);

    mask.apply(&mut canvas, FrameIndex(4));
    assert!(canvas.opacity.iter().all(|&o| o == 0.5));

    mask.apply(&mut canvas, FrameIndex(7));
    for (o, &cut) in canvas.opacity.iter().zip(mask.corners()) {
        assert_eq!(*o, if cut { 0.0 } else { 0.5 });
    }
    assert!(mask.corners().iter().any(|&c| c));
}

#[test]
fn negative_ratio_is_rejected() {
    assert!(RoundedRectMask::new(frames(&[0]), -0.1, 8, 8).is_err());
    assert!(RoundedRectMask::new(frames(&[0]), f64::NAN, 8, 8).is_err());
}

#[test]
fn huge_radius_ratio_is_capped_and_cuts_everything() {
    let mask = RoundedRectMask::new(frames(&[0]), 4.2e7, 4, 100).unwrap();
    assert_eq!(mask.radius(), 208);
    assert!(mask.corners().iter().all(|&c| c));
    assert!(RoundedRectMask::new(frames(&[0]), f64::INFINITY, 4, 100).is_err());
}
