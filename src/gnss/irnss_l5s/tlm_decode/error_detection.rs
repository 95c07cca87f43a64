
use crate::DigSigProcErr;
use crate::utils::bits::{self, Alignment};
use crate::utils::crc24q;
use crate::gnss::irnss_l5s::{SUBFRAME_BITS, SUBFRAME_BYTES, CRC_OFFSET, CRC_LEN, CRC_BYTES};

use super::subframe::Subframe;

/// CRC-24Q over the data bits of a subframe.  The 286 bits are right-aligned into 36 bytes first, which puts two
/// zero bits ahead of the data so that the 262 data bits fill exactly the first 33 bytes.
pub fn compute_crc(subframe:&Subframe) -> Result<u32, DigSigProcErr> {
	let crc_bits:Vec<i8> = bits::unpack_sign_coded(subframe.as_bytes(), SUBFRAME_BITS)?;
	let mut crc_bins = [0u8; SUBFRAME_BYTES];
	bits::pack_sign_coded(&crc_bits, &mut crc_bins, Alignment::Right)?;
	Ok(crc24q::crc24q(&crc_bins[..CRC_BYTES]))
}

pub fn transmitted_crc(subframe:&Subframe) -> Result<u32, DigSigProcErr> {
	subframe.read(CRC_OFFSET, CRC_LEN)
}

/// Ok(()) when the computed and transmitted CRCs agree; there is no partial match and no correction
pub fn check_crc(subframe:&Subframe) -> Result<(), DigSigProcErr> {
	let computed:u32    = compute_crc(subframe)?;
	let transmitted:u32 = transmitted_crc(subframe)?;
	if computed == transmitted { Ok(()) }
	else { Err(DigSigProcErr::CrcMismatch{ computed, transmitted }) }
}

pub fn append_crc(subframe:&mut Subframe) -> Result<(), DigSigProcErr> {
	let crc:u32 = compute_crc(subframe)?;
	subframe.set(CRC_OFFSET, CRC_LEN, crc)
}
