use super::{render_text, Tagger};
use crate::error::Error;
use crate::gain::Q78;
use crate::keys::{all_keys, Field, TagFormat};
use crate::options::WriteOptions;
use crate::replay_gain::ReplayGain;

/// Vorbis comments, for FLAC, Ogg FLAC, Ogg Vorbis and Speex
#[derive(Debug, Clone, Copy, Default)]
pub struct VorbisTagger;

impl Tagger for VorbisTagger {
    fn format(&self) -> TagFormat {
        TagFormat::Vorbis
    }
}

/// Both Opus conventions; a file only ever carries one of them
fn opus_keys() -> Vec<String> {
    let mut keys = all_keys(TagFormat::OpusR128);
    for k in all_keys(TagFormat::Vorbis) {
        if !keys.contains(&k) {
            keys.push(k);
        }
    }
    keys
}

/// `R128_TRACK_GAIN`/`R128_ALBUM_GAIN` as Q7.8 relative to -23 LUFS.
///
/// Output gain in the Opus header is left alone, players add the two.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpusTagger;

impl Tagger for OpusTagger {
    fn format(&self) -> TagFormat {
        TagFormat::OpusR128
    }

    fn owned_keys(&self) -> Vec<String> {
        opus_keys()
    }

    fn render(&self, field: Field, rg: &ReplayGain, options: &WriteOptions) -> Result<String, Error> {
        match field {
            Field::TrackGain | Field::AlbumGain => Ok(Q78::encode(rg.r128_gain())?.to_string()),
            _ => render_text(field, rg, options),
        }
    }
}

/// `REPLAYGAIN_*` comments in Opus files, for players that ignore `R128_*`
#[derive(Debug, Clone, Copy, Default)]
pub struct NonStandardOpusTagger;

impl Tagger for NonStandardOpusTagger {
    fn format(&self) -> TagFormat {
        TagFormat::Vorbis
    }

    fn owned_keys(&self) -> Vec<String> {
        opus_keys()
    }
}
