mod util;

use std::fs;

use loudtag::api;
use loudtag::ContainerKind;
use tempfile::tempdir;

use crate::util::*;

#[test]
fn opus_r128_gains() {
    init_logger();
    let dir = tempdir().unwrap();
    let path = opus(&dir);

    let s = scan(&path).with_album(album());
    assert!(api::write_ogg_opus(&s, true, false, "LUFS"));
    // relative to -23 LUFS, Q7.8
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "R128_TRACK_GAIN").as_deref(),
        Some("-2944")
    );
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "R128_ALBUM_GAIN").as_deref(),
        Some("-3136")
    );
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "REPLAYGAIN_TRACK_GAIN"),
        None
    );
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "REPLAYGAIN_TRACK_PEAK"),
        None
    );
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "TITLE").as_deref(),
        Some("x")
    );

    assert!(api::clear_ogg_opus(&path));
    assert_eq!(
        keys(ContainerKind::OggOpus, &path),
        vec![String::from("TITLE")]
    );
}

#[test]
fn opus_replaygain_comments() {
    init_logger();
    let dir = tempdir().unwrap();
    let path = opus(&dir);

    assert!(api::write_ogg_opus(&scan(&path), false, false, "LUFS"));
    assert!(api::write_ogg_opus_non_standard(
        &scan(&path),
        false,
        false,
        "LUFS"
    ));
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "REPLAYGAIN_TRACK_GAIN").as_deref(),
        Some("-6.50 dB")
    );
    assert_eq!(
        get(ContainerKind::OggOpus, &path, "REPLAYGAIN_TRACK_PEAK").as_deref(),
        Some("0.988553")
    );
    assert_eq!(get(ContainerKind::OggOpus, &path, "R128_TRACK_GAIN"), None);

    assert!(api::clear_ogg_opus(&path));
    assert_eq!(
        keys(ContainerKind::OggOpus, &path),
        vec![String::from("TITLE")]
    );
}

#[test]
fn ogg_flac_pages_are_renumbered() {
    init_logger();
    let dir = tempdir().unwrap();
    // the stale value spans two pages, the rewritten comments fit in one
    let stale = format!("REPLAYGAIN_TRACK_GAIN={}", "9".repeat(70_000));
    let path = ogg_flac_with(&dir, &["TITLE=x", stale.as_str()], 3, true);
    assert_eq!(ogg_pages(&path).len(), 7);

    assert!(api::write_ogg_flac(&scan(&path), false, false, "LUFS"));
    assert_eq!(
        ogg_pages(&path),
        vec![
            (OGG_SERIAL, 0),
            (OGG_SERIAL, 1),
            (OGG_SERIAL, 2),
            (OTHER_SERIAL, 7),
            (OGG_SERIAL, 3),
            (OGG_SERIAL, 4),
        ]
    );
    assert!(fs::read(&path)
        .unwrap()
        .ends_with(&[0xFF, 0xF8, 0x69, 0x08, 0, 0]));
    assert!(contains(&path, &other_stream_page(7)));
    assert_eq!(
        get(ContainerKind::OggFlac, &path, "REPLAYGAIN_TRACK_GAIN").as_deref(),
        Some("-6.50 dB")
    );
    assert_eq!(
        get(ContainerKind::OggFlac, &path, "TITLE").as_deref(),
        Some("x")
    );
}

#[test]
fn ogg_flac_keeps_trailing_tag() {
    init_logger();
    let dir = tempdir().unwrap();
    let path = ogg_flac(&dir);
    let mut trailer = b"TAG".to_vec();
    trailer.resize(128, b' ');
    let mut bytes = fs::read(&path).unwrap();
    bytes.extend_from_slice(&trailer);
    fs::write(&path, &bytes).unwrap();

    assert!(api::write_ogg_flac(&scan(&path), false, false, "LUFS"));
    assert!(fs::read(&path).unwrap().ends_with(&trailer));
    assert_eq!(ogg_pages(&path).len(), 3);
    assert!(contains(&path, &[0xFF, 0xF8, 0x69, 0x08]));
    assert_eq!(
        get(ContainerKind::OggFlac, &path, "REPLAYGAIN_TRACK_GAIN").as_deref(),
        Some("-6.50 dB")
    );

    assert!(api::clear_ogg_flac(&path));
    assert!(fs::read(&path).unwrap().ends_with(&trailer));
}

#[test]
fn ogg_flac_short_last_page_is_left_alone() {
    init_logger();
    let dir = tempdir().unwrap();
    let path = ogg_flac_with(&dir, &["TITLE=x"], 2, false);
    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 2);
    fs::write(&path, &bytes).unwrap();

    assert!(!api::write_ogg_flac(&scan(&path), false, false, "LUFS"));
    assert_eq!(fs::read(&path).unwrap(), bytes);
    assert!(!api::clear_ogg_flac(&path));
    assert_eq!(fs::read(&path).unwrap(), bytes);
}
