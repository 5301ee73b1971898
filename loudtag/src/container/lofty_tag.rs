use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use lofty::ape::{ApeFile, ApeItem, ApeTag};
use lofty::config::{ParseOptions, WriteOptions as LoftyWriteOptions};
use lofty::file::AudioFile;
use lofty::flac::FlacFile;
use lofty::id3::v2::{ExtendedTextFrame, Frame, Id3v2Tag};
use lofty::iff::aiff::AiffFile;
use lofty::iff::wav::WavFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::mpeg::MpegFile;
use lofty::ogg::{OpusFile, SpeexFile, VorbisComments, VorbisFile};
use lofty::tag::{ItemValue, TagExt, TagType};
use lofty::wavpack::WavPackFile;
use lofty::TextEncoding;

use super::{ContainerKind, SaveOptions, TagContainer};
use crate::error::ContainerError;
use crate::options::Id3v2version;

/// The tag a lofty-backed file is edited through
enum Native {
    Id3v2(Id3v2Tag),
    Vorbis(VorbisComments),
    Ape(ApeTag),
    Ilst(Ilst),
}

/// Files whose tags are read and written by lofty
pub(crate) struct LoftyTag {
    kind: ContainerKind,
    path: PathBuf,
    file: File,
    native: Native,
    stripped: bool,
}

impl LoftyTag {
    pub(crate) fn open(kind: ContainerKind, path: &Path) -> Result<Self, ContainerError> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;
        let parse = ParseOptions::new().read_properties(false);
        let native = match kind {
            ContainerKind::Mp3 => {
                let mut f = MpegFile::read_from(&mut file, parse)?;
                Native::Id3v2(f.remove_id3v2().unwrap_or_default())
            }
            ContainerKind::Wav => {
                let mut f = WavFile::read_from(&mut file, parse)?;
                Native::Id3v2(f.remove_id3v2().unwrap_or_default())
            }
            ContainerKind::Aiff => {
                let mut f = AiffFile::read_from(&mut file, parse)?;
                Native::Id3v2(f.remove_id3v2().unwrap_or_default())
            }
            ContainerKind::Flac => {
                let mut f = FlacFile::read_from(&mut file, parse)?;
                Native::Vorbis(f.remove_vorbis_comments().unwrap_or_default())
            }
            ContainerKind::OggVorbis => {
                let mut f = VorbisFile::read_from(&mut file, parse)?;
                Native::Vorbis(f.remove_vorbis_comments())
            }
            ContainerKind::OggSpeex => {
                let mut f = SpeexFile::read_from(&mut file, parse)?;
                Native::Vorbis(f.remove_vorbis_comments())
            }
            ContainerKind::OggOpus => {
                let mut f = OpusFile::read_from(&mut file, parse)?;
                Native::Vorbis(f.remove_vorbis_comments())
            }
            ContainerKind::Mp4 => {
                let mut f = Mp4File::read_from(&mut file, parse)?;
                Native::Ilst(f.remove_ilst().unwrap_or_default())
            }
            ContainerKind::WavPack => {
                let mut f = WavPackFile::read_from(&mut file, parse)?;
                Native::Ape(f.remove_ape().unwrap_or_default())
            }
            ContainerKind::Ape => {
                let mut f = ApeFile::read_from(&mut file, parse)?;
                Native::Ape(f.remove_ape().unwrap_or_default())
            }
            ContainerKind::OggFlac | ContainerKind::Asf => {
                return Err(ContainerError::malformed(
                    kind.name(),
                    "not a lofty-backed container",
                ))
            }
        };
        debug!("{} opened as {kind}", path.display());
        Ok(Self {
            kind,
            path: path.to_owned(),
            file,
            native,
            stripped: false,
        })
    }

    /// Tag types that are not the native one and go away on strip
    fn foreign_tags(&self) -> &'static [TagType] {
        match self.kind {
            ContainerKind::Mp3 => &[TagType::Id3v1, TagType::Ape],
            ContainerKind::Wav => &[TagType::RiffInfo],
            ContainerKind::Aiff => &[TagType::AiffText],
            ContainerKind::WavPack => &[TagType::Id3v1],
            ContainerKind::Ape => &[TagType::Id3v1, TagType::Id3v2],
            _ => &[],
        }
    }
}

fn user_text(description: &str, content: String) -> Frame<'static> {
    let encoding = if description.is_ascii() && content.is_ascii() {
        TextEncoding::Latin1
    } else {
        TextEncoding::UTF16
    };
    Frame::UserText(ExtendedTextFrame::new(
        encoding,
        description.to_owned(),
        content,
    ))
}

fn is_user_text(frame: &Frame<'_>, key: &str) -> bool {
    matches!(frame, Frame::UserText(ExtendedTextFrame { description, .. }) if description == key)
}

/// `----:mean:name` or a FOURCC
fn atom_ident(key: &str) -> Option<AtomIdent<'static>> {
    if let Some(rest) = key.strip_prefix("----:") {
        let (mean, name) = rest.split_once(':')?;
        return Some(AtomIdent::Freeform {
            mean: Cow::Owned(mean.to_owned()),
            name: Cow::Owned(name.to_owned()),
        });
    }
    let fourcc: [u8; 4] = key.as_bytes().try_into().ok()?;
    Some(AtomIdent::Fourcc(fourcc))
}

fn atom_key(ident: &AtomIdent<'_>) -> String {
    match ident {
        AtomIdent::Freeform { mean, name } => format!("----:{mean}:{name}"),
        AtomIdent::Fourcc(f) => String::from_utf8_lossy(f).into_owned(),
    }
}

impl TagContainer for LoftyTag {
    fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn get(&self, key: &str) -> Option<String> {
        match &self.native {
            Native::Id3v2(t) => t.into_iter().find_map(|f| match f {
                Frame::UserText(ExtendedTextFrame {
                    description,
                    content,
                    ..
                }) if description == key => Some(content.to_string()),
                _ => None,
            }),
            Native::Vorbis(t) => t.get(key).map(str::to_owned),
            Native::Ape(t) => match t.get(key)?.value() {
                ItemValue::Text(s) => Some(s.clone()),
                _ => None,
            },
            Native::Ilst(t) => t.get(&atom_ident(key)?)?.data().find_map(|d| match d {
                AtomData::UTF8(s) => Some(s.clone()),
                _ => None,
            }),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ContainerError> {
        trace!("{}: {key}={value}", self.path.display());
        match &mut self.native {
            Native::Id3v2(t) => {
                t.retain(|f| !is_user_text(f, key));
                let _ = t.insert(user_text(key, value));
            }
            Native::Vorbis(t) => t.insert(key.to_owned(), value),
            Native::Ape(t) => {
                let item = ApeItem::new(key.to_owned(), ItemValue::Text(value)).map_err(|e| {
                    ContainerError::InvalidItem {
                        key: key.to_owned(),
                        reason: e.to_string(),
                    }
                })?;
                t.insert(item);
            }
            Native::Ilst(t) => {
                let ident = atom_ident(key).ok_or_else(|| ContainerError::InvalidItem {
                    key: key.to_owned(),
                    reason: String::from("not a FOURCC or freeform atom"),
                })?;
                t.replace_atom(Atom::new(ident, AtomData::UTF8(value)));
            }
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        match &mut self.native {
            Native::Id3v2(t) => t.retain(|f| !is_user_text(f, key)),
            Native::Vorbis(t) => {
                let _ = t.remove(key);
            }
            Native::Ape(t) => t.remove(key),
            Native::Ilst(t) => {
                if let Some(ident) = atom_ident(key) {
                    let _ = t.remove(&ident);
                }
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match &self.native {
            Native::Id3v2(t) => t
                .into_iter()
                .filter_map(|f| match f {
                    Frame::UserText(ExtendedTextFrame { description, .. }) => {
                        Some(description.to_string())
                    }
                    _ => None,
                })
                .collect(),
            Native::Vorbis(t) => t.items().map(|(k, _)| k.to_owned()).collect(),
            Native::Ape(t) => t.into_iter().map(|i| i.key().to_owned()).collect(),
            Native::Ilst(t) => t.into_iter().map(|a| atom_key(a.ident())).collect(),
        };
        keys.dedup();
        keys
    }

    fn strip(&mut self) -> Result<(), ContainerError> {
        self.native = match self.native {
            Native::Id3v2(_) => Native::Id3v2(Id3v2Tag::new()),
            Native::Ape(_) => Native::Ape(ApeTag::new()),
            Native::Vorbis(_) | Native::Ilst(_) => {
                return Err(ContainerError::StripUnsupported(self.kind.name()))
            }
        };
        self.stripped = true;
        Ok(())
    }

    fn save(&mut self, options: &SaveOptions) -> Result<(), ContainerError> {
        if options.id3v2_version == Id3v2version::V2 && matches!(self.native, Native::Id3v2(_)) {
            warn!(
                "{}: ID3v2.2 cannot be written, using ID3v2.3",
                self.path.display()
            );
        }
        let write_options = LoftyWriteOptions::new()
            .use_id3v23(options.id3v2_version != Id3v2version::V4);

        self.file.rewind()?;
        match &self.native {
            Native::Id3v2(t) => t.save_to(&mut self.file, write_options)?,
            Native::Vorbis(t) => t.save_to(&mut self.file, write_options)?,
            Native::Ape(t) => t.save_to(&mut self.file, write_options)?,
            Native::Ilst(t) => t.save_to(&mut self.file, write_options)?,
        }

        if self.stripped {
            for tag_type in self.foreign_tags() {
                debug!("{}: removing {tag_type:?}", self.path.display());
                self.file.rewind()?;
                tag_type.remove_from(&mut self.file)?;
            }
            self.stripped = false;
        }
        self.file.flush()?;
        Ok(())
    }
}
