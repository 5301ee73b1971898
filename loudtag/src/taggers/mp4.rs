use super::Tagger;
use crate::keys::TagFormat;

/// iTunes freeform atoms
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4Tagger;

impl Tagger for Mp4Tagger {
    fn format(&self) -> TagFormat {
        TagFormat::Mp4
    }
}
