
use num_complex::Complex;
use thiserror::Error;

pub mod gnss;
pub mod io;

pub mod utils;

#[derive(Debug, Clone)]
pub struct Sample {
	pub val: Complex<f64>,
	pub idx: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum DigSigProcErr {
	#[error("insufficient input: needed {needed} symbols, got {got}")]
	InsufficientInput{ needed:usize, got:usize },
	#[error("CRC mismatch: computed {computed:06X}, transmitted {transmitted:06X}")]
	CrcMismatch{ computed:u32, transmitted:u32 },
	#[error("format violation: {0}")]
	FormatViolation(&'static str),
	#[error("invalid telemetry data: {0}")]
	InvalidTelemetryData(&'static str),
}

impl DigSigProcErr {

	/// Negative sentinel for callers that still work with integer return codes; non-negative
	/// values are reserved for decoded word types
	pub fn code(&self) -> i32 {
		match self {
			DigSigProcErr::CrcMismatch{ .. }       => -1,
			DigSigProcErr::InsufficientInput{ .. } => -2,
			DigSigProcErr::FormatViolation(_) | DigSigProcErr::InvalidTelemetryData(_) => -3,
		}
	}

}
