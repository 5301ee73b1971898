//! Q7.8 fixed-point gains, as stored by Opus `R128_*` tags.

use log::warn;

use crate::error::Error;

/// 2^8
const ONE: f64 = 256.0;

/// Signed 16-bit gain with 8 fractional bits
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q78(i16);

impl Q78 {
    pub const MIN: Q78 = Q78(i16::MIN);
    pub const MAX: Q78 = Q78(i16::MAX);

    /// Q = round(dB * 2^8), half away from zero, clamped to i16.
    pub fn encode(gain_db: f64) -> Result<Q78, Error> {
        if !gain_db.is_finite() {
            return Err(Error::InvalidGainValue(gain_db));
        }
        let q = (gain_db * ONE).round();
        let q = q.clamp(f64::from(i16::MIN), f64::from(i16::MAX));
        Ok(Q78(q as i16))
    }

    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i16 {
        self.0
    }

    pub fn to_db(&self) -> f64 {
        f64::from(self.0) / ONE
    }
}

impl std::fmt::Display for Q78 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inverse of [`Q78::encode`], within 1/256 dB
pub fn decode(q: Q78) -> f64 {
    q.to_db()
}

/// Gain in Q7.8; non-finite input yields 0.
pub fn gain_to_fixedpoint(gain_db: f64) -> i32 {
    match Q78::encode(gain_db) {
        Ok(q) => i32::from(q.raw()),
        Err(e) => {
            warn!("{e}");
            0
        }
    }
}
