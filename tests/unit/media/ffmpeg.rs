use super::*;

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

#[test]
fn filter_chain_prepends_scale_when_present() {
    assert_eq!(video_filter(40, None), "fps=40");
    assert_eq!(
        video_filter(40, Some(ScaleTarget::exact(750, 1504))),
        "scale=750:1504,fps=40"
    );
    let width_only = ScaleTarget {
        width: Some(750),
        height: None,
    };
    assert_eq!(video_filter(30, Some(width_only)), "scale=750:-1,fps=30");
}

#[test]
fn filter_chain_ignores_empty_scale() {
    let empty = ScaleTarget {
        width: Some(0),
        height: None,
    };
    assert_eq!(video_filter(24, Some(empty)), "fps=24");
}

#[test]
fn extraction_args_number_from_zero() {
    let args = strings(&extraction_args(
        Path::new("in.mp4"),
        Path::new("tmp"),
        40,
        Some(ScaleTarget::exact(750, 1624)),
    ));
    let pattern = Path::new("tmp").join("%03d.png");
    assert_eq!(
        args,
        vec![
            "-v",
            "error",
            "-i",
            "in.mp4",
            "-vf",
            "scale=750:1624,fps=40",
            "-start_number",
            "0",
            "-y",
            pattern.to_str().unwrap(),
        ]
    );
}

#[test]
fn single_frame_args_seek_before_input() {
    let args = strings(&single_frame_args(
        Path::new("in.mp4"),
        2.5,
        Path::new("preview.png"),
        None,
    ));
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(ss < input);
    assert_eq!(args[ss + 1], "2.500");
    assert!(args.windows(2).any(|w| w == ["-vframes", "1"]));
    assert!(!args.iter().any(|a| a == "-vf"));
    assert_eq!(args.last().map(String::as_str), Some("preview.png"));
}

#[test]
fn single_frame_args_carry_scale() {
    let target = ScaleTarget {
        width: None,
        height: Some(1624),
    };
    let args = strings(&single_frame_args(
        Path::new("in.mp4"),
        -1.0,
        Path::new("p.png"),
        Some(target),
    ));
    assert!(args.windows(2).any(|w| w == ["-vf", "scale=-1:1624"]));
    assert!(args.windows(2).any(|w| w == ["-ss", "0.000"]));
}

#[test]
fn extract_rejects_zero_fps() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_frames(Path::new("in.mp4"), dir.path(), 0, None).unwrap_err();
    assert!(matches!(err, FrameError::Validation(_)));
}

#[test]
fn probe_missing_file_fails_when_ffprobe_present() {
    if !is_ffprobe_on_path() {
        eprintln!("skipping: ffprobe not on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let err = probe_dimensions(&dir.path().join("nope.mp4")).unwrap_err();
    assert!(matches!(err, FrameError::Decoder(_)), "{err}");
}
