use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FrameError::geometry("x")
            .to_string()
            .contains("invalid geometry:")
    );
    assert!(
        FrameError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FrameError::decoder("x").to_string().contains("decoder error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FrameError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn frame_context_names_file_and_stage() {
    let err = FrameError::geometry("zero width").in_frame(7, "007.png", Stage::Compose);
    let msg = err.to_string();
    assert!(msg.contains("007.png"));
    assert!(msg.contains("compose"));
    assert!(msg.contains("frame 7"));
    assert_eq!(err.stage(), Some(Stage::Compose));
}

#[test]
fn frame_context_is_not_nested_twice() {
    let err = FrameError::geometry("x")
        .in_frame(1, "001.png", Stage::Load)
        .in_frame(2, "002.png", Stage::Store);
    match err {
        FrameError::Frame { index, stage, .. } => {
            assert_eq!(index, 1);
            assert_eq!(stage, Stage::Load);
        }
        other => panic!("unexpected error: {other}"),
    }
}
