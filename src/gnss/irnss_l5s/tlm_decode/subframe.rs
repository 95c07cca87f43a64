
use std::convert::TryFrom;
use std::fmt::Write;

use ::serde::{Serialize, Deserialize};

use crate::DigSigProcErr;
use crate::utils::bits;
use crate::gnss::irnss_l5s::{SUBFRAME_BITS, SUBFRAME_BYTES, SUBFRAME_PERIOD_SEC};

use super::error_detection;

// Common header, see IRNSS SPS ICD Figure 12
const TOWC_OFFSET:usize = 8;
const TOWC_LEN:usize = 17;
const WORD_TYPE_OFFSET:usize = 27;
const WORD_TYPE_LEN:usize = 2;

// Subframe 1 only
const WEEK_NUMBER_OFFSET:usize = 30;
const WEEK_NUMBER_LEN:usize = 10;

/// One decoded subframe: 286 bits, MSB first from bit 0 of the first byte.  The last two bits of the
/// 36-byte buffer are never part of the message and are kept clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subframe {
	bytes: [u8; SUBFRAME_BYTES],
}

impl Subframe {

	pub fn from_bytes(bytes:[u8; SUBFRAME_BYTES]) -> Self {
		let mut bytes = bytes;
		bytes[SUBFRAME_BYTES-1] &= 0xFFu8 << (8*SUBFRAME_BYTES - SUBFRAME_BITS);
		Self{ bytes }
	}

	pub fn as_bytes(&self) -> &[u8; SUBFRAME_BYTES] { &self.bytes }

	pub fn read(&self, pos:usize, len:usize) -> Result<u32, DigSigProcErr> {
		if pos + len > SUBFRAME_BITS { return Err(DigSigProcErr::FormatViolation("Field extends past the 286 subframe bits")); }
		bits::read_unsigned_bits(&self.bytes, pos, len)
	}

	pub fn set(&mut self, pos:usize, len:usize, data:u32) -> Result<(), DigSigProcErr> {
		if pos + len > SUBFRAME_BITS { return Err(DigSigProcErr::FormatViolation("Field extends past the 286 subframe bits")); }
		bits::set_unsigned_bits(&mut self.bytes, pos, len, data)
	}

	// The field is two bits wide, so every value is a legal word type
	pub fn word_type(&self) -> WordType {
		WordType::from_bits(self.bytes[WORD_TYPE_OFFSET/8] >> (8 - (WORD_TYPE_OFFSET%8) - WORD_TYPE_LEN))
	}

	pub fn time_of_week_count(&self) -> Result<u32, DigSigProcErr> { self.read(TOWC_OFFSET, TOWC_LEN) }

	pub fn to_hex(&self) -> String {
		let mut ans = String::with_capacity(2*SUBFRAME_BYTES);
		for b in self.bytes.iter() { let _ = write!(ans, "{:02X}", b); }
		ans
	}

}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordType {
	Subframe1,
	Subframe2,
	Subframe3,
	Subframe4,
}

impl WordType {

	pub const ALL:[WordType; 4] = [WordType::Subframe1, WordType::Subframe2, WordType::Subframe3, WordType::Subframe4];

	/// Uses the low two bits only
	pub fn from_bits(x:u8) -> Self {
		match x & 0b11 {
			0 => WordType::Subframe1,
			1 => WordType::Subframe2,
			2 => WordType::Subframe3,
			_ => WordType::Subframe4,
		}
	}

	pub fn id(&self) -> u8 {
		match self {
			WordType::Subframe1 => 0,
			WordType::Subframe2 => 1,
			WordType::Subframe3 => 2,
			WordType::Subframe4 => 3,
		}
	}

	fn extract(&self, sf:&Subframe) -> Result<SubframeBody, DigSigProcErr> {
		match self {
			WordType::Subframe1 => {
				let week_number:u16 = sf.read(WEEK_NUMBER_OFFSET, WEEK_NUMBER_LEN)? as u16;
				Ok(SubframeBody::Subframe1{ week_number })
			},
			// Ephemeris and almanac content of the other subframes is not decoded yet
			WordType::Subframe2 => Ok(SubframeBody::Subframe2),
			WordType::Subframe3 => Ok(SubframeBody::Subframe3),
			WordType::Subframe4 => Ok(SubframeBody::Subframe4),
		}
	}

}

// Ids from outside the 2-bit field (e.g. caller-supplied integers) are rejected instead of wrapped
impl TryFrom<u8> for WordType {
	type Error = DigSigProcErr;

	fn try_from(id:u8) -> Result<Self, Self::Error> {
		if id <= 3 { Ok(WordType::from_bits(id)) }
		else { Err(DigSigProcErr::InvalidTelemetryData("Word type id outside 0 through 3")) }
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SubframeBody {
	Subframe1{ week_number:u16 },
	Subframe2,
	Subframe3,
	Subframe4,
}

impl SubframeBody {

	pub fn word_type(&self) -> WordType {
		match self {
			SubframeBody::Subframe1{ .. } => WordType::Subframe1,
			SubframeBody::Subframe2       => WordType::Subframe2,
			SubframeBody::Subframe3       => WordType::Subframe3,
			SubframeBody::Subframe4       => WordType::Subframe4,
		}
	}

}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DecodedSubframe {
	pub time_of_week_count:u32,
	pub body:SubframeBody,
}

impl DecodedSubframe {

	pub fn word_type(&self) -> WordType { self.body.word_type() }

	pub fn time_of_week(&self) -> f64 { (self.time_of_week_count as f64) * SUBFRAME_PERIOD_SEC }

	/// Inverse of `decode`: lays the fields out in an otherwise zero subframe and appends the CRC.
	/// Values that don't fit their field are rejected rather than truncated.
	pub fn to_subframe(&self) -> Result<Subframe, DigSigProcErr> {
		if self.time_of_week_count >= (1 << TOWC_LEN) {
			return Err(DigSigProcErr::FormatViolation("Time of week count does not fit in 17 bits"));
		}
		if let SubframeBody::Subframe1{ week_number } = self.body {
			if (week_number as u32) >= (1 << WEEK_NUMBER_LEN) {
				return Err(DigSigProcErr::FormatViolation("Week number does not fit in 10 bits"));
			}
		}

		let mut sf = Subframe::from_bytes([0u8; SUBFRAME_BYTES]);
		sf.set(TOWC_OFFSET, TOWC_LEN, self.time_of_week_count)?;
		sf.set(WORD_TYPE_OFFSET, WORD_TYPE_LEN, self.word_type().id() as u32)?;
		if let SubframeBody::Subframe1{ week_number } = self.body {
			sf.set(WEEK_NUMBER_OFFSET, WEEK_NUMBER_LEN, week_number as u32)?;
		}
		error_detection::append_crc(&mut sf)?;
		Ok(sf)
	}

}

/// Dispatches on the word type and extracts its fields.  The subframe must already have passed the CRC check.
pub fn decode(sf:&Subframe) -> Result<DecodedSubframe, DigSigProcErr> {
	let time_of_week_count:u32 = sf.time_of_week_count()?;
	let body = sf.word_type().extract(sf)?;
	Ok(DecodedSubframe{ time_of_week_count, body })
}
