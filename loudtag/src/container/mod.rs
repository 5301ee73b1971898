//! Tag containers: the stores the taggers read from and write to.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use lofty::file::FileType;
use lofty::probe::Probe;

use crate::error::{ContainerError, Error};
use crate::keys::TagFormat;
use crate::options::Id3v2version;

mod asf;
mod lofty_tag;
pub mod memory;
mod ogg_flac;

pub use memory::MemoryContainer;

/// Container formats the engine can tag
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Mp3,
    Flac,
    OggVorbis,
    OggFlac,
    OggSpeex,
    OggOpus,
    Mp4,
    Asf,
    Wav,
    Aiff,
    WavPack,
    Ape,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 12] = [
        ContainerKind::Mp3,
        ContainerKind::Flac,
        ContainerKind::OggVorbis,
        ContainerKind::OggFlac,
        ContainerKind::OggSpeex,
        ContainerKind::OggOpus,
        ContainerKind::Mp4,
        ContainerKind::Asf,
        ContainerKind::Wav,
        ContainerKind::Aiff,
        ContainerKind::WavPack,
        ContainerKind::Ape,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            ContainerKind::Mp3 => "mp3",
            ContainerKind::Flac => "flac",
            ContainerKind::OggVorbis => "ogg_vorbis",
            ContainerKind::OggFlac => "ogg_flac",
            ContainerKind::OggSpeex => "ogg_speex",
            ContainerKind::OggOpus => "ogg_opus",
            ContainerKind::Mp4 => "mp4",
            ContainerKind::Asf => "asf",
            ContainerKind::Wav => "wav",
            ContainerKind::Aiff => "aiff",
            ContainerKind::WavPack => "wavpack",
            ContainerKind::Ape => "ape",
        }
    }

    /// Native tag system of the container
    pub const fn tag_format(&self) -> TagFormat {
        match self {
            ContainerKind::Mp3 | ContainerKind::Wav | ContainerKind::Aiff => TagFormat::Id3v2,
            ContainerKind::Flac
            | ContainerKind::OggVorbis
            | ContainerKind::OggFlac
            | ContainerKind::OggSpeex => TagFormat::Vorbis,
            ContainerKind::OggOpus => TagFormat::OpusR128,
            ContainerKind::Mp4 => TagFormat::Mp4,
            ContainerKind::Asf => TagFormat::Asf,
            ContainerKind::WavPack | ContainerKind::Ape => TagFormat::Ape,
        }
    }

    pub fn from_file_type(ft: FileType) -> Result<Self, Error> {
        Ok(match ft {
            FileType::Mpeg => ContainerKind::Mp3,
            FileType::Flac => ContainerKind::Flac,
            FileType::Vorbis => ContainerKind::OggVorbis,
            FileType::Speex => ContainerKind::OggSpeex,
            FileType::Opus => ContainerKind::OggOpus,
            FileType::Mp4 => ContainerKind::Mp4,
            FileType::Wav => ContainerKind::Wav,
            FileType::Aiff => ContainerKind::Aiff,
            FileType::WavPack => ContainerKind::WavPack,
            FileType::Ape => ContainerKind::Ape,
            other => return Err(Error::UnsupportedFormat(format!("{other:?}"))),
        })
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ContainerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // also takes FFmpeg container short names
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "mp3" | "mp2" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "ogg_vorbis" | "vorbis" | "ogg" => Ok(Self::OggVorbis),
            "ogg_flac" | "oga" => Ok(Self::OggFlac),
            "ogg_speex" | "speex" | "spx" => Ok(Self::OggSpeex),
            "ogg_opus" | "opus" => Ok(Self::OggOpus),
            "mp4" | "m4a" | "mov,mp4,m4a,3gp,3g2,mj2" => Ok(Self::Mp4),
            "asf" | "wma" => Ok(Self::Asf),
            "wav" => Ok(Self::Wav),
            "aiff" | "aif" => Ok(Self::Aiff),
            "wavpack" | "wv" => Ok(Self::WavPack),
            "ape" => Ok(Self::Ape),
            _ => Err(Error::UnsupportedFormat(s.to_owned())),
        }
    }
}

/// How a container is persisted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    pub id3v2_version: Id3v2version,
}

/// One opened tag store.
///
/// Keys are compared the way the native tag system does it:
/// case-insensitive for Vorbis comments and APE, exact otherwise.
pub trait TagContainer {
    fn kind(&self) -> ContainerKind;

    fn path(&self) -> &Path;

    fn get(&self, key: &str) -> Option<String>;

    /// Replaces every value stored under `key`
    fn set(&mut self, key: &str, value: String) -> Result<(), ContainerError>;

    fn remove(&mut self, key: &str);

    fn keys(&self) -> Vec<String>;

    /// Drops the native tag contents and every foreign tag section
    fn strip(&mut self) -> Result<(), ContainerError> {
        Err(ContainerError::StripUnsupported(self.kind().name()))
    }

    /// Commits the tag state to its backing store
    fn save(&mut self, options: &SaveOptions) -> Result<(), ContainerError>;
}

const ASF_HEADER_GUID: [u8; 16] = [
    0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

/// Guess the container kind from the file content
pub fn detect(path: &Path) -> Result<ContainerKind, Error> {
    let mut magic = [0u8; 16];
    let read = File::open(path)
        .and_then(|mut f| f.read(&mut magic))
        .map_err(|e| Error::open_failed(path, e))?;
    let magic = &magic[..read];

    if magic == ASF_HEADER_GUID {
        return Ok(ContainerKind::Asf);
    }
    if magic.starts_with(b"OggS") && ogg_flac::is_ogg_flac(path).unwrap_or(false) {
        return Ok(ContainerKind::OggFlac);
    }

    let ft = Probe::open(path)
        .map_err(|e| Error::open_failed(path, e))?
        .guess_file_type()
        .map_err(|e| Error::open_failed(path, e))?
        .file_type()
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    debug!("{} detected as {ft:?}", path.display());
    ContainerKind::from_file_type(ft)
}

/// Open `path` as a container of `kind`
pub fn open(kind: ContainerKind, path: &Path) -> Result<Box<dyn TagContainer>, Error> {
    let opened: Result<Box<dyn TagContainer>, ContainerError> = match kind {
        ContainerKind::OggFlac => ogg_flac::OggFlacTag::open(path).map(|t| Box::new(t) as _),
        ContainerKind::Asf => asf::AsfTag::open(path).map(|t| Box::new(t) as _),
        _ => lofty_tag::LoftyTag::open(kind, path).map(|t| Box::new(t) as _),
    };
    opened.map_err(|e| Error::open_failed(path, e))
}
