use std::io::Write;
use std::path::Path;

use console::{style, Color};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::options::Output;

// from dano
pub fn print_err<S: AsRef<str>>(err_buf: S) {
    // mutex keeps threads from writing over each other
    let err = std::io::stderr();
    let mut err_locked = err.lock();
    let _ = err_locked.write_all(err_buf.as_ref().as_bytes());
    let _ = err_locked.flush();
}

pub fn print_out<S: AsRef<str>>(output_buf: S) {
    // mutex keeps threads from writing over each other
    let out = std::io::stdout();
    let mut out_locked = out.lock();
    let _ = out_locked.write_all(output_buf.as_ref().as_bytes());
    let _ = out_locked.flush();
}

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{wide_msg} {pos}/{len} [{bar:40.cyan/blue}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Where per file results go
#[derive(Debug, Clone)]
pub enum MOutput {
    Tui(ProgressBar),
    PrettyPrint,
    Log,
}

impl MOutput {
    pub fn new(output: Output, len: usize) -> Self {
        match output {
            Output::Tui => MOutput::Tui(
                ProgressBar::new(len as u64)
                    .with_style(progress_style())
                    .with_message("Tagging"),
            ),
            Output::PrettyPrint => MOutput::PrettyPrint,
            Output::Log => MOutput::Log,
        }
    }

    pub fn progress(&self) -> ProgressBar {
        match self {
            MOutput::Tui(p) => p.clone(),
            _ => ProgressBar::hidden(),
        }
    }

    fn print(&self, status: char, color: Color, msg: &str, err: bool) {
        let line = format!("[{}] {msg}\n", style(status).fg(color).bold());
        match self {
            MOutput::Tui(p) => p.println(line.trim_end()),
            _ if err => print_err(line),
            _ => print_out(line),
        }
    }

    /// One line per file, `what` is e.g. the container kind
    pub fn report<E: std::fmt::Display>(&self, file: &Path, result: &Result<String, E>) {
        match (self, result) {
            (MOutput::Log, Ok(what)) => info!("{}: {what}", file.display()),
            (MOutput::Log, Err(e)) => warn!("{}: {e}", file.display()),
            (_, Ok(what)) => self.print('✔', Color::Green, &format!("{} ({what})", file.display()), false),
            (_, Err(e)) => self.print(
                'x',
                Color::Red,
                &format!("{} {}", file.display(), style(e.to_string()).red()),
                true,
            ),
        }
    }

    pub fn finish(&self) {
        if let MOutput::Tui(p) = self {
            p.finish_and_clear();
        }
    }
}
