use super::*;
use crate::foundation::core::Fps;

fn tmp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scorelight_png_{}_{name}", std::process::id()))
}

#[test]
fn writes_numbered_files() {
    let dir = tmp_dir("numbered");
    let mut sink = PngSequenceSink::new(&dir).with_prefix("bar_");
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        fps: Fps { num: 30, den: 1 },
        audio: None,
    })
    .unwrap();
    let frame = WindowFrame {
        width: 2,
        height: 1,
        top_row: 0,
        data: vec![10, 20, 30, 40, 50, 60],
    };
    sink.push_frame(FrameIndex(7), &frame).unwrap();
    sink.end().unwrap();

    let path = dir.join("bar_000007.png");
    assert_eq!(sink.written(), &[path.clone()]);
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(1, 0).0, [40, 50, 60]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn size_mismatch_is_rejected() {
    let dir = tmp_dir("mismatch");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
        fps: Fps { num: 30, den: 1 },
        audio: None,
    })
    .unwrap();
    let frame = WindowFrame {
        width: 2,
        height: 1,
        top_row: 0,
        data: vec![0; 6],
    };
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame).unwrap_err(),
        ScoreError::Render(_)
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
