use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use loudtag::dispatch;
use loudtag::options::{ClearOptions, GainUnit, WriteOptions};
use loudtag::ContainerKind;
use thiserror::Error as SuperError;

use crate::options::WriteOpts;
use crate::record::{jobs, read_report, Job};

pub mod options;
pub mod printe;
pub mod record;

#[derive(SuperError, Debug)]
pub enum LoudtaggerError {
    #[error("Couldn't read report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Tag(#[from] loudtag::Error),
    #[error("Couldn't start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("{0} file(s) failed")]
    Failed(usize),
}

/// Reads one report, `-` being stdin
pub fn load_report(report: &str) -> Result<Vec<Job>, LoudtaggerError> {
    let path = PathBuf::from(report);
    let rdr: Box<dyn Read> = if report == "-" {
        Box::new(std::io::stdin())
    } else {
        Box::new(File::open(&path)?)
    };
    let records = read_report(rdr).map_err(|source| LoudtaggerError::Report { path, source })?;
    debug!("{report}: {} rows", records.len());
    jobs(&records)
}

/// Every job of every report with the engine options it is written with
pub fn plan(opts: &WriteOpts) -> Result<Vec<(Job, WriteOptions)>, LoudtaggerError> {
    let mut planned = Vec::new();
    for report in &opts.reports {
        for job in load_report(report)? {
            let options = opts.write_options(job.gain_unit, job.scan.album.is_some());
            planned.push((job, options));
        }
    }
    Ok(planned)
}

pub fn write_job(job: &Job, options: &WriteOptions) -> Result<ContainerKind, loudtag::Error> {
    if job.will_clip {
        warn!("{}: this track will clip!", job.scan.file.display());
    }
    if options.gain_unit != job.gain_unit {
        debug!(
            "{}: report gains are in {}, tagging as {}",
            job.scan.file.display(),
            job.gain_unit,
            options.gain_unit
        );
    }
    dispatch::write_detected(&job.scan, options)
}

pub fn delete_file(file: &Path, options: &ClearOptions) -> Result<ContainerKind, loudtag::Error> {
    dispatch::clear_detected(file, options)
}

pub fn build_thread_pool(jobs: usize) -> Result<(), LoudtaggerError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()?;
    Ok(())
}
