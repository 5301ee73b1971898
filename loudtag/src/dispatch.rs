//! Routes a write or clear request to the container and tagger of a format.

use std::path::Path;

use log::debug;

use crate::container::{self, ContainerKind, TagContainer};
use crate::error::Error;
use crate::options::{ClearOptions, WriteOptions};
use crate::replay_gain::Scan;
use crate::taggers::{
    ApeTagger, AsfTagger, Id3v2Tagger, Mp4Tagger, NonStandardOpusTagger, OpusTagger, Tagger,
    VorbisTagger,
};

/// Tagger used for the files of `kind`
pub fn tagger_for(kind: ContainerKind, non_standard_opus: bool) -> &'static dyn Tagger {
    match kind {
        ContainerKind::Mp3 | ContainerKind::Wav | ContainerKind::Aiff => &Id3v2Tagger,
        ContainerKind::Flac
        | ContainerKind::OggVorbis
        | ContainerKind::OggFlac
        | ContainerKind::OggSpeex => &VorbisTagger,
        ContainerKind::OggOpus if non_standard_opus => &NonStandardOpusTagger,
        ContainerKind::OggOpus => &OpusTagger,
        ContainerKind::Mp4 => &Mp4Tagger,
        ContainerKind::Asf => &AsfTagger,
        ContainerKind::WavPack | ContainerKind::Ape => &ApeTagger,
    }
}

/// Writes the loudness tags of `scan` into an already opened container
pub fn write_to(
    tag: &mut dyn TagContainer,
    scan: &Scan,
    options: &WriteOptions,
) -> Result<(), Error> {
    let tagger = tagger_for(tag.kind(), options.non_standard_opus);
    debug!(
        "{}: writing {:?} tags to {} container",
        scan.file.display(),
        tagger.format(),
        tag.kind()
    );
    tagger.write(tag, scan, options)
}

/// Removes the loudness tags from an already opened container
pub fn clear_from(tag: &mut dyn TagContainer, options: &ClearOptions) -> Result<(), Error> {
    // both Opus taggers clear both conventions
    let tagger = tagger_for(tag.kind(), false);
    debug!(
        "{}: clearing {:?} tags of {} container",
        tag.path().display(),
        tagger.format(),
        tag.kind()
    );
    tagger.clear(tag, options)
}

/// Opens `scan.file` as `kind` and writes its loudness tags
pub fn write(kind: ContainerKind, scan: &Scan, options: &WriteOptions) -> Result<(), Error> {
    if options.do_album && scan.album.is_none() {
        return Err(Error::MissingAlbumData(scan.file.clone()));
    }
    let mut tag = container::open(kind, &scan.file)?;
    write_to(tag.as_mut(), scan, options)
}

/// Opens `path` as `kind` and removes its loudness tags
pub fn clear(kind: ContainerKind, path: &Path, options: &ClearOptions) -> Result<(), Error> {
    let mut tag = container::open(kind, path)?;
    clear_from(tag.as_mut(), options)
}

/// Like [`write`], with the kind given by name (`"mp3"`, `"ogg_opus"`, ...)
pub fn write_named(kind: &str, scan: &Scan, options: &WriteOptions) -> Result<(), Error> {
    write(kind.parse()?, scan, options)
}

/// Like [`clear`], with the kind given by name
pub fn clear_named(kind: &str, path: &Path, options: &ClearOptions) -> Result<(), Error> {
    clear(kind.parse()?, path, options)
}

/// Like [`write`], with the kind detected from the file content
pub fn write_detected(scan: &Scan, options: &WriteOptions) -> Result<ContainerKind, Error> {
    let kind = container::detect(&scan.file)?;
    write(kind, scan, options)?;
    Ok(kind)
}

/// Like [`clear`], with the kind detected from the file content
pub fn clear_detected(path: &Path, options: &ClearOptions) -> Result<ContainerKind, Error> {
    let kind = container::detect(path)?;
    clear(kind, path, options)?;
    Ok(kind)
}
