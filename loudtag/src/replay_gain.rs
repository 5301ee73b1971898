use std::path::{Path, PathBuf};

/// ReplayGain 2 reference loudness
pub const RG2_REFERENCE: f64 = -18.0;
/// EBU R128 reference loudness, used by Opus R128_* tags
pub const R128_REFERENCE: f64 = -23.0;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ReplayGain {
    // dB
    pub gain: f64,
    // linear true peak
    pub peak: f64,
    // This two are only written in extended mode
    pub loudness_range: f64,
    pub loudness_reference: f64,
    // This field is not written to files
    pub loudness: f64,
}

impl std::fmt::Display for ReplayGain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Loudness: {:8.2} LUFS", self.loudness)?;
        writeln!(f, "Range:    {:8.2} dB", self.loudness_range)?;
        writeln!(
            f,
            "Peak:     {:8.6} ({:.2} dBTP)",
            self.peak,
            lufs_to_dbtp(self.peak)
        )?;
        write!(f, "Gain:     {:8.2} dB", self.gain)
    }
}

impl ReplayGain {
    /// Gain relative to the R128 reference instead of the RG2 one
    pub fn r128_gain(&self) -> f64 {
        self.gain + (R128_REFERENCE - RG2_REFERENCE)
    }
}

/// Loudness measurements of one file, optionally with its album aggregates
#[derive(Clone, Debug, PartialEq)]
pub struct Scan {
    pub file: PathBuf,
    pub track: ReplayGain,
    pub album: Option<ReplayGain>,
}

impl Scan {
    pub fn new(file: impl Into<PathBuf>, track: ReplayGain) -> Self {
        Self {
            file: file.into(),
            track,
            album: None,
        }
    }

    pub fn with_album(mut self, album: ReplayGain) -> Self {
        self.album = Some(album);
        self
    }

    pub fn path(&self) -> &Path {
        &self.file
    }
}

#[inline]
pub fn lufs_to_rg(l: f64) -> f64 {
    RG2_REFERENCE - l
}

#[inline]
/// The equation to convert to dBTP is: 20 * log10(n)
pub fn lufs_to_dbtp(n: f64) -> f64 {
    20.0 * (n).log10()
}

#[inline]
/// The equation to convert to LUFS is: 10 ** (n / 20.0)
pub fn dbtp_to_lufs(n: f64) -> f64 {
    10.0_f64.powf(n / 20.0)
}
