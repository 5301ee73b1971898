use std::process::exit;
use std::str::FromStr;

use gumdrop::Options;
use loudtag::options::{ClearOptions, GainUnit, Id3v2version, WriteOptions};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Output {
    #[default]
    /// Progress bar with per file results
    Tui,
    /// Just PrettyPrint nothing very fancy
    PrettyPrint,
    /// Log that you can pipe
    Log,
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "t" | "tui" | "ui" => Ok(Self::Tui),
            "p" | "pp" | "prettyprint" => Ok(Self::PrettyPrint),
            "l" | "log" => Ok(Self::Log),
            _ => Err(format!("Invalid output mode: {s}")),
        }
    }
}

/// loudgain compatible `-s` tag modes
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Tagmode {
    /// Write ReplayGain 2.0 tags
    #[default]
    I,
    /// like 'i', plus extra tags (reference, ranges)
    E,
    /// like 'e', but LU units instead of dB
    L,
}

impl FromStr for Tagmode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Ok(Self::I),
            "e" => Ok(Self::E),
            "l" => Ok(Self::L),
            _ => Err(format!("Invalid tag mode: {s} (use i, e or l; delete with the delete command)")),
        }
    }
}

/// loudtagger writes ReplayGain 2.0 tags from loudgain `-O` reports.
///
/// Reports are read from files, or from stdin with `-`.
#[derive(Debug, Options)]
pub struct LoudtaggerOptions {
    #[options(help = "Show help")]
    help: bool,

    #[options(command)]
    pub command: Option<Command>,
}

impl LoudtaggerOptions {
    pub fn parse() -> LoudtaggerOptions {
        LoudtaggerOptions::parse_args_default_or_exit()
    }
}

#[derive(Debug, Options)]
pub enum Command {
    #[options(help = "Show help for a command")]
    Help(HelpOpts),
    #[options(help = "Write tags from loudgain reports")]
    Write(WriteOpts),
    #[options(help = "Delete ReplayGain tags from files")]
    Delete(DeleteOpts),
    #[options(help = "Show version numbers")]
    Version(HelpOpts),
}

#[derive(Debug, Options)]
pub struct HelpOpts {
    #[options(free)]
    free: Vec<String>,
}

impl HelpOpts {
    pub fn help(&self) -> ! {
        match self.free.first() {
            None => {
                println!("{}", LoudtaggerOptions::usage());
                if let Some(commands) = LoudtaggerOptions::command_list() {
                    println!("Available commands:\n{commands}");
                }
            }
            Some(command) => match LoudtaggerOptions::command_usage(command) {
                Some(usage) => println!("{usage}"),
                None => {
                    eprintln!("Unknown command: {command}");
                    exit(2)
                }
            },
        }
        exit(0)
    }
}

#[derive(Debug, Options)]
pub struct WriteOpts {
    /// loudgain reports, `-` is stdin
    #[options(free)]
    pub reports: Vec<String>,

    #[options(help = "Show help")]
    pub help: bool,

    #[options(help = "Max number of parallel jobs", default_expr = "num_cpus::get()")]
    pub jobs: usize,

    #[options(help = "Outputing mode (Tui, PrettyPrint or Log if you want to pipe output)")]
    pub output: Output,

    #[options(
        short = "s",
        help = "Tag mode: i = ReplayGain 2.0 tags, e = also reference and ranges, l = like e with LU units",
        meta = "MODE"
    )]
    pub tagmode: Tagmode,

    #[options(
        short = "L",
        help = "Force lowercase tags (MP2/MP3/MP4/ASF/WMA/WAV/AIFF/APE). This is non-standard, but sometimes needed"
    )]
    pub lowercase: bool,

    #[options(
        short = "S",
        help = "Strip tag types other than ID3v2 from MP2/MP3/WAV/AIFF files and other than APEv2 from WavPack/APE files"
    )]
    pub striptags: bool,

    #[options(
        short = "I",
        help = "Write ID3v2.X tags to MP2/MP3/WAV/AIFF files (2 is written as 3)",
        meta = "X"
    )]
    pub id3v2version: Id3v2version,

    #[options(no_short, help = "Write REPLAYGAIN_* instead of R128_* tags to Opus files")]
    pub non_standard_opus: bool,

    #[options(no_short, help = "Ignore the Album row of reports")]
    pub no_album: bool,
}

impl WriteOpts {
    /// Engine options for a report whose gains are in `report_unit`
    pub fn write_options(&self, report_unit: GainUnit, has_album: bool) -> WriteOptions {
        WriteOptions {
            do_album: has_album && !self.no_album,
            extended: self.tagmode != Tagmode::I,
            unit: String::from("LUFS"),
            gain_unit: if self.tagmode == Tagmode::L {
                GainUnit::Lu
            } else {
                report_unit
            },
            lowercase: self.lowercase,
            strip: self.striptags,
            id3v2_version: self.id3v2version,
            non_standard_opus: self.non_standard_opus,
        }
    }
}

#[derive(Debug, Options)]
pub struct DeleteOpts {
    /// files to clear
    #[options(free)]
    pub files: Vec<String>,

    #[options(help = "Show help")]
    pub help: bool,

    #[options(help = "Max number of parallel jobs", default_expr = "num_cpus::get()")]
    pub jobs: usize,

    #[options(help = "Outputing mode (Tui, PrettyPrint or Log if you want to pipe output)")]
    pub output: Output,

    #[options(
        short = "S",
        help = "Remove the whole ID3v2/APEv2 tag and other tag types instead of only ReplayGain tags"
    )]
    pub striptags: bool,

    #[options(
        short = "I",
        help = "Write ID3v2.X tags to MP2/MP3/WAV/AIFF files (2 is written as 3)",
        meta = "X"
    )]
    pub id3v2version: Id3v2version,
}

impl DeleteOpts {
    pub fn clear_options(&self) -> ClearOptions {
        ClearOptions {
            strip: self.striptags,
            id3v2_version: self.id3v2version,
        }
    }
}

pub fn version() -> ! {
    let (major, minor, patch) = loudtag::version::engine_version();
    println!("loudtagger version {VERSION} - using:");
    println!("\tloudtag {major}.{minor}.{patch}");
    println!("\tlofty {}", loudtag::version::LOFTY_VERSION);
    exit(0)
}
