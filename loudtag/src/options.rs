use crate::error::Error;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Id3v2version {
    V2 = 2,
    V3 = 3,
    #[default]
    V4 = 4,
}

impl TryFrom<i32> for Id3v2version {
    type Error = Error;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            _ => Err(Error::InvalidId3Version(v)),
        }
    }
}

impl std::str::FromStr for Id3v2version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("2.").unwrap_or(s);
        match s.parse::<i32>() {
            Ok(v) => Self::try_from(v),
            Err(_) => Err(Error::InvalidId3Version(-1)),
        }
    }
}

/// Unit written after gain and range values
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum GainUnit {
    #[default]
    Db,
    Lu,
}

impl GainUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GainUnit::Db => "dB",
            GainUnit::Lu => "LU",
        }
    }
}

impl std::fmt::Display for GainUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GainUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "db" => Ok(Self::Db),
            "lu" => Ok(Self::Lu),
            _ => Err(Error::UnsupportedFormat(format!("gain unit {s}"))),
        }
    }
}

/// Options of one write call
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// write album gain/peak (and range) next to the track values
    pub do_album: bool,
    /// also write reference loudness and loudness ranges
    pub extended: bool,
    /// unit label of the reference loudness
    pub unit: String,
    pub gain_unit: GainUnit,
    /// lowercase keys where key case is significant (ID3v2, APE, MP4, ASF)
    pub lowercase: bool,
    /// drop the whole tag section (and foreign tag types) before writing
    pub strip: bool,
    pub id3v2_version: Id3v2version,
    /// write REPLAYGAIN_* instead of R128_* to Opus files
    pub non_standard_opus: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            do_album: false,
            extended: false,
            unit: String::from("LUFS"),
            gain_unit: GainUnit::Db,
            lowercase: false,
            strip: false,
            id3v2_version: Id3v2version::V4,
            non_standard_opus: false,
        }
    }
}

/// Options of one clear call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClearOptions {
    pub strip: bool,
    pub id3v2_version: Id3v2version,
}

impl From<&WriteOptions> for ClearOptions {
    fn from(w: &WriteOptions) -> Self {
        Self {
            strip: w.strip,
            id3v2_version: w.id3v2_version,
        }
    }
}
