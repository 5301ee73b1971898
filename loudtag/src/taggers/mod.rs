use log::{debug, info};

use crate::container::{SaveOptions, TagContainer};
use crate::error::{ContainerError, Error};
use crate::keys::{all_keys, keys_for, Field, TagFormat};
use crate::options::{ClearOptions, WriteOptions};
use crate::replay_gain::{ReplayGain, Scan};

mod ape;
mod asf;
mod id3v2;
mod mp4;
mod vorbis;

pub use ape::ApeTagger;
pub use asf::AsfTagger;
pub use id3v2::Id3v2Tagger;
pub use mp4::Mp4Tagger;
pub use vorbis::{NonStandardOpusTagger, OpusTagger, VorbisTagger};

/// Writes and clears loudness tags of one tag family.
///
/// The provided `write` and `clear` are the whole contract; families only
/// say which keys they own, how values look and whether they can strip.
pub trait Tagger {
    fn format(&self) -> TagFormat;

    fn supports_strip(&self) -> bool {
        false
    }

    /// Keys removed before writing and on clear
    fn owned_keys(&self) -> Vec<String> {
        all_keys(self.format())
    }

    fn render(&self, field: Field, rg: &ReplayGain, options: &WriteOptions) -> Result<String, Error> {
        render_text(field, rg, options)
    }

    fn write(
        &self,
        tag: &mut dyn TagContainer,
        scan: &Scan,
        options: &WriteOptions,
    ) -> Result<(), Error> {
        if options.do_album && scan.album.is_none() {
            return Err(Error::MissingAlbumData(scan.file.clone()));
        }

        // everything is rendered before the tag is touched
        let keys = keys_for(self.format(), options.extended, options.lowercase);
        let mut values = Vec::with_capacity(keys.len());
        for (field, key) in keys.iter() {
            let rg = match (field.is_album(), &scan.album) {
                (false, _) => &scan.track,
                (true, Some(album)) if options.do_album => album,
                _ => continue,
            };
            values.push((key, self.render(field, rg, options)?));
        }

        let path = tag.path().to_owned();
        let failed = |source: ContainerError| Error::WriteFailed {
            path: path.clone(),
            source,
        };
        if options.strip {
            strip(self, tag).map_err(failed)?;
        }
        for key in self.owned_keys() {
            tag.remove(&key);
        }
        let written = values.len();
        for (key, value) in values {
            tag.set(key, value).map_err(failed)?;
        }
        tag.save(&SaveOptions {
            id3v2_version: options.id3v2_version,
        })
        .map_err(failed)?;

        info!(
            "{}: wrote {written} {:?} loudness tags",
            path.display(),
            self.format()
        );
        Ok(())
    }

    fn clear(&self, tag: &mut dyn TagContainer, options: &ClearOptions) -> Result<(), Error> {
        let path = tag.path().to_owned();
        let failed = |source: ContainerError| Error::ClearFailed {
            path: path.clone(),
            source,
        };
        if options.strip && self.supports_strip() {
            strip(self, tag).map_err(failed)?;
        } else {
            for key in self.owned_keys() {
                tag.remove(&key);
            }
        }
        tag.save(&SaveOptions {
            id3v2_version: options.id3v2_version,
        })
        .map_err(failed)?;

        info!("{}: cleared {:?} loudness tags", path.display(), self.format());
        Ok(())
    }
}

fn strip<T: Tagger + ?Sized>(tagger: &T, tag: &mut dyn TagContainer) -> Result<(), ContainerError> {
    if tagger.supports_strip() {
        debug!("{}: stripping tags", tag.path().display());
        tag.strip()
    } else {
        debug!(
            "{}: {:?} tags cannot be stripped, ignoring",
            tag.path().display(),
            tagger.format()
        );
        Ok(())
    }
}

/// Human readable values, e.g. `-6.50 dB` or `0.988553`
pub(crate) fn render_text(
    field: Field,
    rg: &ReplayGain,
    options: &WriteOptions,
) -> Result<String, Error> {
    let value = match field {
        Field::TrackGain | Field::AlbumGain => rg.gain,
        Field::TrackPeak | Field::AlbumPeak => rg.peak,
        Field::TrackRange | Field::AlbumRange => rg.loudness_range,
        Field::ReferenceLoudness => rg.loudness_reference,
    };
    if !value.is_finite() {
        return Err(Error::InvalidGainValue(value));
    }
    Ok(match field {
        Field::TrackPeak | Field::AlbumPeak => format!("{value:.6}"),
        Field::ReferenceLoudness => format!("{value:.2} {}", options.unit),
        _ => format!("{value:.2} {}", options.gain_unit),
    })
}
