use super::Tagger;
use crate::keys::TagFormat;

/// Extended Content Description attributes of ASF/WMA
#[derive(Debug, Clone, Copy, Default)]
pub struct AsfTagger;

impl Tagger for AsfTagger {
    fn format(&self) -> TagFormat {
        TagFormat::Asf
    }
}
