use super::Tagger;
use crate::keys::TagFormat;

/// APEv2 items, for WavPack and Monkey's Audio
#[derive(Debug, Clone, Copy, Default)]
pub struct ApeTagger;

impl Tagger for ApeTagger {
    fn format(&self) -> TagFormat {
        TagFormat::Ape
    }

    fn supports_strip(&self) -> bool {
        true
    }
}
