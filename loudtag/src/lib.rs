/* Exporting */
mod error;
pub use error::*;
// options of the write and clear calls
pub mod options;
pub mod replay_gain;

pub mod api;
pub mod container;
pub mod dispatch;
pub mod gain;
pub mod keys;
pub mod taggers;

pub use container::{detect, ContainerKind, TagContainer};
pub use dispatch::{clear, write};
pub use options::{ClearOptions, WriteOptions};
pub use replay_gain::{ReplayGain, Scan};

pub mod version {
    pub use crate::api::engine_version;

    pub fn engine_version_major() -> u32 {
        engine_version().0
    }

    pub fn engine_version_minor() -> u32 {
        engine_version().1
    }

    pub fn engine_version_patch() -> u32 {
        engine_version().2
    }

    /// Version of the lofty crate the engine was built against
    pub const LOFTY_VERSION: &str = "0.22";
}
