//! Tag key names per tag format.

use crate::error::Error;

/// Namespace of iTunes-style freeform atoms
pub const MP4_FREEFORM_PREFIX: &str = "----:com.apple.iTunes:";

/// Logical loudness fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TrackGain,
    TrackPeak,
    TrackRange,
    AlbumGain,
    AlbumPeak,
    AlbumRange,
    ReferenceLoudness,
}

impl Field {
    pub const STANDARD: [Field; 4] = [
        Field::TrackGain,
        Field::TrackPeak,
        Field::AlbumGain,
        Field::AlbumPeak,
    ];
    pub const EXTENDED: [Field; 3] = [
        Field::ReferenceLoudness,
        Field::TrackRange,
        Field::AlbumRange,
    ];

    pub const fn is_album(&self) -> bool {
        matches!(self, Field::AlbumGain | Field::AlbumPeak | Field::AlbumRange)
    }

    const fn replaygain_name(&self) -> &'static str {
        match self {
            Field::TrackGain => "REPLAYGAIN_TRACK_GAIN",
            Field::TrackPeak => "REPLAYGAIN_TRACK_PEAK",
            Field::TrackRange => "REPLAYGAIN_TRACK_RANGE",
            Field::AlbumGain => "REPLAYGAIN_ALBUM_GAIN",
            Field::AlbumPeak => "REPLAYGAIN_ALBUM_PEAK",
            Field::AlbumRange => "REPLAYGAIN_ALBUM_RANGE",
            Field::ReferenceLoudness => "REPLAYGAIN_REFERENCE_LOUDNESS",
        }
    }
}

/// Tag systems, as far as key naming goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFormat {
    Id3v2,
    Vorbis,
    /// Opus with RFC 7845 `R128_*` gains
    OpusR128,
    Ape,
    Mp4,
    Asf,
}

impl TagFormat {
    /// Whether readers of this format tell `KEY` and `key` apart
    pub const fn case_significant(&self) -> bool {
        matches!(
            self,
            TagFormat::Id3v2 | TagFormat::Ape | TagFormat::Mp4 | TagFormat::Asf
        )
    }

    fn key(&self, field: Field, lowercase: bool) -> Option<String> {
        let name = match (self, field) {
            (TagFormat::OpusR128, Field::TrackGain) => "R128_TRACK_GAIN",
            (TagFormat::OpusR128, Field::AlbumGain) => "R128_ALBUM_GAIN",
            (TagFormat::OpusR128, Field::TrackPeak | Field::AlbumPeak) => return None,
            (_, f) => f.replaygain_name(),
        };
        let name = if lowercase && self.case_significant() {
            name.to_ascii_lowercase()
        } else {
            name.to_owned()
        };
        Some(match self {
            TagFormat::Mp4 => format!("{MP4_FREEFORM_PREFIX}{name}"),
            _ => name,
        })
    }
}

/// Concrete keys of one (format, extended, lowercase) combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKeySet {
    format: TagFormat,
    keys: Vec<(Field, String)>,
}

impl TagKeySet {
    pub fn format(&self) -> TagFormat {
        self.format
    }

    pub fn key(&self, field: Field) -> Result<&str, Error> {
        self.keys
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, k)| k.as_str())
            .ok_or(Error::UnsupportedField {
                field,
                format: self.format,
            })
    }

    pub fn contains(&self, field: Field) -> bool {
        self.keys.iter().any(|(f, _)| *f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.keys.iter().map(|(f, k)| (*f, k.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub fn keys_for(format: TagFormat, extended: bool, lowercase: bool) -> TagKeySet {
    let extra: &[Field] = if extended { &Field::EXTENDED } else { &[] };
    let keys = Field::STANDARD
        .iter()
        .chain(extra)
        .filter_map(|&field| format.key(field, lowercase).map(|k| (field, k)))
        .collect();
    TagKeySet { format, keys }
}

/// Every key a writer of `format` could have produced, in any casing
pub fn all_keys(format: TagFormat) -> Vec<String> {
    let mut v: Vec<String> = Vec::new();
    for lowercase in [false, true] {
        for (_, k) in keys_for(format, true, lowercase).iter() {
            if !v.iter().any(|x| x == k) {
                v.push(k.to_owned());
            }
        }
    }
    v
}
