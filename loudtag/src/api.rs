//! Flat entry points, one write and one clear per container format.
//!
//! Failures are logged at `warn` and reported as `false`; use [`crate::dispatch`]
//! to get the error itself.
//!
//! `id3v2version` takes 2, 3 or 4. ID3v2.2 cannot be written, a request for it
//! writes ID3v2.3 frames and logs a warning.

use std::path::Path;

use log::warn;

use crate::container::ContainerKind;
use crate::dispatch;
use crate::error::Error;
use crate::options::{ClearOptions, Id3v2version, WriteOptions};
use crate::replay_gain::Scan;

fn report(what: &str, result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("{what} failed ({}): {e}", e.kind());
            false
        }
    }
}

fn options(do_album: bool, extended: bool, unit: &str) -> WriteOptions {
    WriteOptions {
        do_album,
        extended,
        unit: unit.to_owned(),
        ..Default::default()
    }
}

#[allow(clippy::too_many_arguments)]
fn write_id3v2(
    kind: ContainerKind,
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
    id3v2version: i32,
) -> bool {
    let result = Id3v2version::try_from(id3v2version).and_then(|id3v2_version| {
        let o = WriteOptions {
            lowercase,
            strip,
            id3v2_version,
            ..options(do_album, extended, unit)
        };
        dispatch::write(kind, scan, &o)
    });
    report(&format!("write_{kind}"), result)
}

fn clear_id3v2(kind: ContainerKind, file: &Path, strip: bool, id3v2version: i32) -> bool {
    let result = Id3v2version::try_from(id3v2version).and_then(|id3v2_version| {
        let o = ClearOptions {
            strip,
            id3v2_version,
        };
        dispatch::clear(kind, file, &o)
    });
    report(&format!("clear_{kind}"), result)
}

fn write_plain(kind: ContainerKind, scan: &Scan, o: WriteOptions) -> bool {
    report(&format!("write_{kind}"), dispatch::write(kind, scan, &o))
}

fn clear_plain(kind: ContainerKind, file: &Path, strip: bool) -> bool {
    let o = ClearOptions {
        strip,
        ..Default::default()
    };
    report(&format!("clear_{kind}"), dispatch::clear(kind, file, &o))
}

/// Writes ID3v2.3 when `id3v2version` is 2
#[allow(clippy::too_many_arguments)]
pub fn write_mp3(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
    id3v2version: i32,
) -> bool {
    write_id3v2(
        ContainerKind::Mp3,
        scan,
        do_album,
        extended,
        unit,
        lowercase,
        strip,
        id3v2version,
    )
}

/// Writes ID3v2.3 when `id3v2version` is 2
#[allow(clippy::too_many_arguments)]
pub fn write_wav(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
    id3v2version: i32,
) -> bool {
    write_id3v2(
        ContainerKind::Wav,
        scan,
        do_album,
        extended,
        unit,
        lowercase,
        strip,
        id3v2version,
    )
}

/// Writes ID3v2.3 when `id3v2version` is 2
#[allow(clippy::too_many_arguments)]
pub fn write_aiff(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
    id3v2version: i32,
) -> bool {
    write_id3v2(
        ContainerKind::Aiff,
        scan,
        do_album,
        extended,
        unit,
        lowercase,
        strip,
        id3v2version,
    )
}

pub fn write_flac(scan: &Scan, do_album: bool, extended: bool, unit: &str) -> bool {
    write_plain(ContainerKind::Flac, scan, options(do_album, extended, unit))
}

pub fn write_ogg_vorbis(scan: &Scan, do_album: bool, extended: bool, unit: &str) -> bool {
    write_plain(ContainerKind::OggVorbis, scan, options(do_album, extended, unit))
}

pub fn write_ogg_flac(scan: &Scan, do_album: bool, extended: bool, unit: &str) -> bool {
    write_plain(ContainerKind::OggFlac, scan, options(do_album, extended, unit))
}

pub fn write_ogg_speex(scan: &Scan, do_album: bool, extended: bool, unit: &str) -> bool {
    write_plain(ContainerKind::OggSpeex, scan, options(do_album, extended, unit))
}

/// `R128_*` gains relative to -23 LUFS
pub fn write_ogg_opus(scan: &Scan, do_album: bool, extended: bool, unit: &str) -> bool {
    write_plain(ContainerKind::OggOpus, scan, options(do_album, extended, unit))
}

/// `REPLAYGAIN_*` comments, like any other Vorbis comment file
pub fn write_ogg_opus_non_standard(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
) -> bool {
    let o = WriteOptions {
        non_standard_opus: true,
        ..options(do_album, extended, unit)
    };
    write_plain(ContainerKind::OggOpus, scan, o)
}

pub fn write_mp4(scan: &Scan, do_album: bool, extended: bool, unit: &str, lowercase: bool) -> bool {
    let o = WriteOptions {
        lowercase,
        ..options(do_album, extended, unit)
    };
    write_plain(ContainerKind::Mp4, scan, o)
}

pub fn write_asf(scan: &Scan, do_album: bool, extended: bool, unit: &str, lowercase: bool) -> bool {
    let o = WriteOptions {
        lowercase,
        ..options(do_album, extended, unit)
    };
    write_plain(ContainerKind::Asf, scan, o)
}

pub fn write_wavpack(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
) -> bool {
    let o = WriteOptions {
        lowercase,
        strip,
        ..options(do_album, extended, unit)
    };
    write_plain(ContainerKind::WavPack, scan, o)
}

pub fn write_ape(
    scan: &Scan,
    do_album: bool,
    extended: bool,
    unit: &str,
    lowercase: bool,
    strip: bool,
) -> bool {
    let o = WriteOptions {
        lowercase,
        strip,
        ..options(do_album, extended, unit)
    };
    write_plain(ContainerKind::Ape, scan, o)
}

pub fn clear_mp3(file: impl AsRef<Path>, strip: bool, id3v2version: i32) -> bool {
    clear_id3v2(ContainerKind::Mp3, file.as_ref(), strip, id3v2version)
}

pub fn clear_wav(file: impl AsRef<Path>, strip: bool, id3v2version: i32) -> bool {
    clear_id3v2(ContainerKind::Wav, file.as_ref(), strip, id3v2version)
}

pub fn clear_aiff(file: impl AsRef<Path>, strip: bool, id3v2version: i32) -> bool {
    clear_id3v2(ContainerKind::Aiff, file.as_ref(), strip, id3v2version)
}

pub fn clear_flac(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::Flac, file.as_ref(), false)
}

pub fn clear_ogg_vorbis(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::OggVorbis, file.as_ref(), false)
}

pub fn clear_ogg_flac(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::OggFlac, file.as_ref(), false)
}

pub fn clear_ogg_speex(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::OggSpeex, file.as_ref(), false)
}

/// Removes both the `R128_*` and the `REPLAYGAIN_*` keys
pub fn clear_ogg_opus(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::OggOpus, file.as_ref(), false)
}

pub fn clear_mp4(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::Mp4, file.as_ref(), false)
}

pub fn clear_asf(file: impl AsRef<Path>) -> bool {
    clear_plain(ContainerKind::Asf, file.as_ref(), false)
}

pub fn clear_wavpack(file: impl AsRef<Path>, strip: bool) -> bool {
    clear_plain(ContainerKind::WavPack, file.as_ref(), strip)
}

pub fn clear_ape(file: impl AsRef<Path>, strip: bool) -> bool {
    clear_plain(ContainerKind::Ape, file.as_ref(), strip)
}

pub use crate::gain::gain_to_fixedpoint;

/// Version of this engine as (major, minor, patch)
pub fn engine_version() -> (u32, u32, u32) {
    (
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or_default(),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or_default(),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or_default(),
    )
}
