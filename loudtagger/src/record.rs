//! Rows of a loudgain `-O` (`--output-new`) report.

use std::io::Read;
use std::path::{Path, PathBuf};

use loudtag::options::GainUnit;
use loudtag::replay_gain::{ReplayGain, Scan};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::LoudtaggerError;

#[derive(Debug, Clone)]
pub enum Aile {
    Album,
    Track(PathBuf),
}

impl Aile {
    pub fn maybe_path(&self) -> Option<&Path> {
        match self {
            Aile::Album => None,
            Aile::Track(x) => Some(x),
        }
    }
}

impl std::fmt::Display for Aile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aile::Album => write!(f, "Album"),
            Aile::Track(p) => write!(f, "{}", p.display()),
        }
    }
}

impl PartialEq for Aile {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Track(l0), Self::Track(r0)) => l0.file_name() == r0.file_name(),
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl<'de> Deserialize<'de> for Aile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("album") {
            Ok(Aile::Album)
        } else if s.is_empty() {
            Err(D::Error::custom("Empty file name"))
        } else {
            Ok(Aile::Track(PathBuf::from(s)))
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[allow(non_snake_case)]
pub struct Record {
    pub File: Aile,
    pub Loudness: Num,
    pub Range: Num,
    pub True_Peak: f64,
    pub True_Peak_dBTP: Num,
    pub Reference: Num,
    #[serde(deserialize_with = "from_yn")]
    pub Will_clip: bool,
    #[serde(deserialize_with = "from_yn")]
    pub Clip_prevent: bool,
    pub Gain: Num,
    pub New_Peak: f64,
    pub New_Peak_dBTP: Num,
}

impl Record {
    pub fn file(&self) -> Option<&Path> {
        self.File.maybe_path()
    }

    pub fn is_album(&self) -> bool {
        self.File == Aile::Album
    }

    /// Values as they go into the tags; the peak is the measured true peak
    pub fn replay_gain(&self) -> ReplayGain {
        ReplayGain {
            gain: self.Gain.numeral,
            peak: self.True_Peak,
            loudness_range: self.Range.numeral,
            loudness_reference: self.Reference.numeral,
            loudness: self.Loudness.numeral,
        }
    }
}

fn yn(b: bool) -> char {
    if b {
        'Y'
    } else {
        'N'
    }
}

impl std::fmt::Display for Record {
    /// new style list: File;Loudness;Range;True_Peak;True_Peak_dBTP;Reference;Will_clip;Clip_prevent;Gain;New_Peak;New_Peak_dBTP
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.File,
            self.Loudness,
            self.Range,
            self.True_Peak,
            self.True_Peak_dBTP,
            self.Reference,
            yn(self.Will_clip),
            yn(self.Clip_prevent),
            self.Gain,
            self.New_Peak,
            self.New_Peak_dBTP
        )
    }
}

/// Number with its unit, e.g. `-6.50 dB`
#[derive(Debug, PartialEq, Clone)]
pub struct Num {
    numeral: f64,
    unit: String,
}

impl Num {
    pub fn new(numeral: f64, unit: &str) -> Self {
        Self {
            numeral,
            unit: unit.to_owned(),
        }
    }

    pub fn numeral(&self) -> f64 {
        self.numeral
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl std::fmt::Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.numeral, self.unit)
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut wi = s.split_ascii_whitespace();
        if let Some(numeral) = wi.next() {
            Ok(Num {
                numeral: numeral.parse().map_err(D::Error::custom)?,
                unit: wi.next().unwrap_or_default().to_owned(),
            })
        } else {
            Err(D::Error::custom("Empty loudgain number"))
        }
    }
}

fn from_yn<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.chars().next() {
        Some('Y' | 'y') => Ok(true),
        Some('N' | 'n') => Ok(false),
        Some(_) => Err(D::Error::custom("Parsing loudgain bool field failed")),
        None => Err(D::Error::custom("Empty loudgain bool field")),
    }
}

/// Parses a tab separated report with its header line
pub fn read_report<R: Read>(rdr: R) -> Result<Vec<Record>, csv::Error> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
        .deserialize()
        .collect()
}

/// One file to tag
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub scan: Scan,
    pub will_clip: bool,
    /// unit the report printed gains in
    pub gain_unit: GainUnit,
}

/// Turns report rows into per-file jobs; an `Album` row applies to every track
pub fn jobs(records: &[Record]) -> Result<Vec<Job>, LoudtaggerError> {
    let album = records
        .iter()
        .find(|r| r.is_album())
        .map(Record::replay_gain);

    records
        .iter()
        .filter_map(|r| r.file().map(|f| (r, f)))
        .map(|(r, file)| -> Result<Job, LoudtaggerError> {
            let mut scan = Scan::new(file, r.replay_gain());
            scan.album = album;
            Ok(Job {
                scan,
                will_clip: r.Will_clip,
                gain_unit: r.Gain.unit().parse()?,
            })
        })
        .collect()
}
