use gumdrop::Options;
use std::path::Path;

use indicatif::ParallelProgressIterator;
use log::debug;
use loudtagger::options::{self, Command, LoudtaggerOptions};
use loudtagger::printe::MOutput;
use loudtagger::{build_thread_pool, delete_file, plan, write_job, LoudtaggerError};
use rayon::prelude::*;

fn main() -> Result<(), LoudtaggerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = LoudtaggerOptions::parse();
    debug!("{:#?}", opts);

    let failed = match &opts.command {
        None => {
            println!("{}", LoudtaggerOptions::usage());
            return Ok(());
        }
        Some(Command::Help(h)) => h.help(),
        Some(Command::Version(_)) => options::version(),
        Some(Command::Write(w)) => {
            let planned = plan(w)?;
            build_thread_pool(w.jobs)?;
            let out = MOutput::new(w.output, planned.len());
            let failed = planned
                .par_iter()
                .progress_with(out.progress())
                .filter(|(job, options)| {
                    let result = write_job(job, options).map(|kind| kind.to_string());
                    out.report(&job.scan.file, &result);
                    result.is_err()
                })
                .count();
            out.finish();
            failed
        }
        Some(Command::Delete(d)) => {
            build_thread_pool(d.jobs)?;
            let options = d.clear_options();
            let out = MOutput::new(d.output, d.files.len());
            // this is very fast on per file basis
            // so the only relevant progress bar is overall status
            let failed = d
                .files
                .par_iter()
                .progress_with(out.progress())
                .filter(|file| {
                    let file = Path::new(file.as_str());
                    let result = delete_file(file, &options).map(|kind| kind.to_string());
                    out.report(file, &result);
                    result.is_err()
                })
                .count();
            out.finish();
            failed
        }
    };

    if failed > 0 {
        return Err(LoudtaggerError::Failed(failed));
    }
    Ok(())
}
