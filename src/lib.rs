//! Bit stream re-chunking and square QAM modulation.
//!
//! [`BitStream`] converts between fixed-width words and a flat bit sequence.
//! [`Modulator`] uses it to cut bytes into symbols, maps the symbols onto a
//! peak-normalized square QAM constellation, and reverses the trip.
//!
//! ```
//! use bitqam::Modulator;
//!
//! let mut modulator = Modulator::new(16).unwrap();
//! modulator.rotation = std::f64::consts::PI / 8f64;
//!
//! let data = [1u8, 2, 3, 5, 129];
//! let samples = modulator.modulate(data).unwrap();
//! assert_eq!(modulator.demodulate(samples).unwrap(), data);
//! ```

pub mod bitstream;
mod error;
pub mod iq_mod;
#[cfg(feature = "python")]
pub mod python;
pub mod qam;

pub use crate::{
    bitstream::{BitStream, ReadAll},
    error::{ModemError, ModemResult},
    iq_mod::Modulator,
    qam::QamConstellation,
};

pub type Bit = bool;

/// Index of a constellation point.
pub type Symbol = u64;
