use super::Tagger;
use crate::keys::TagFormat;

/// `TXXX` user text frames, for MP3, WAV and AIFF
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3v2Tagger;

impl Tagger for Id3v2Tagger {
    fn format(&self) -> TagFormat {
        TagFormat::Id3v2
    }

    fn supports_strip(&self) -> bool {
        true
    }
}
