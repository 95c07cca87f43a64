//! Bit-level helpers for navigation message buffers.  Bit positions are zero-indexed from the
//! most significant bit of the first byte, so bit 0 is `buff[0] & 0x80`.

use crate::DigSigProcErr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
	Left,
	Right,
}

fn check_span(buff:&[u8], pos:usize, len:usize) -> Result<(), DigSigProcErr> {
	if len > 32 { return Err(DigSigProcErr::FormatViolation("Bit field wider than 32 bits")); }
	if pos + len > 8*buff.len() { return Err(DigSigProcErr::FormatViolation("Bit field extends past the end of the buffer")); }
	Ok(())
}

pub fn read_unsigned_bits(buff:&[u8], pos:usize, len:usize) -> Result<u32, DigSigProcErr> {
	check_span(buff, pos, len)?;
	Ok((pos..pos+len).fold(0u32, |acc, i| (acc << 1) | (((buff[i/8] >> (7 - i%8)) & 1) as u32)))
}

/// Writes the low `len` bits of `data` at `pos`; higher bits of `data` are ignored
pub fn set_unsigned_bits(buff:&mut [u8], pos:usize, len:usize, data:u32) -> Result<(), DigSigProcErr> {
	check_span(buff, pos, len)?;
	for i in 0..len {
		let mask:u8 = 0x80 >> ((pos + i) % 8);
		if (data >> (len - i - 1)) & 1 == 1 { buff[(pos + i)/8] |= mask; }
		else                                { buff[(pos + i)/8] &= !mask; }
	}
	Ok(())
}

/// Expands the first `nbits` bits of `buff` into sign-coded values: a set bit becomes -1 and a clear bit becomes +1
pub fn unpack_sign_coded(buff:&[u8], nbits:usize) -> Result<Vec<i8>, DigSigProcErr> {
	if nbits > 8*buff.len() { return Err(DigSigProcErr::FormatViolation("Requested more bits than the buffer holds in bits::unpack_sign_coded")); }
	Ok((0..nbits).map(|i| if (buff[i/8] << (i%8)) & 0x80 != 0 { -1 } else { 1 }).collect())
}

/// Packs sign-coded values (negative means a set bit) into `out`.  With `Alignment::Right` the last value lands
/// in the least significant bit of the last byte and the unused leading bits are zero.
pub fn pack_sign_coded(bits:&[i8], out:&mut [u8], alignment:Alignment) -> Result<(), DigSigProcErr> {
	let capacity:usize = 8*out.len();
	if bits.len() > capacity { return Err(DigSigProcErr::FormatViolation("Too many bits for the output buffer in bits::pack_sign_coded")); }

	let offset:usize = match alignment {
		Alignment::Left  => 0,
		Alignment::Right => capacity - bits.len(),
	};

	for b in out.iter_mut() { *b = 0; }
	for (i, b) in bits.iter().enumerate() {
		if *b < 0 { out[(offset + i)/8] |= 0x80 >> ((offset + i) % 8); }
	}

	Ok(())
}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn read_spans_byte_boundaries() {
		let buff:[u8; 4] = [0b1010_0000, 0b0000_1111, 0xFF, 0x01];
		assert_eq!(read_unsigned_bits(&buff, 0, 3).unwrap(), 0b101);
		assert_eq!(read_unsigned_bits(&buff, 4, 8).unwrap(), 0);
		assert_eq!(read_unsigned_bits(&buff, 12, 8).unwrap(), 0xFF);
		assert_eq!(read_unsigned_bits(&buff, 0, 32).unwrap(), 0xA00F_FF01);
		assert_eq!(read_unsigned_bits(&buff, 31, 1).unwrap(), 1);
		assert_eq!(read_unsigned_bits(&buff, 5, 0).unwrap(), 0);
	}

	#[test]
	fn read_rejects_out_of_range_fields() {
		let buff:[u8; 2] = [0xFF, 0xFF];
		assert!(read_unsigned_bits(&buff, 10, 7).is_err());
		assert!(read_unsigned_bits(&[0u8; 8], 0, 33).is_err());
	}

	#[test]
	fn set_then_read() {
		let mut buff:[u8; 5] = [0xFF; 5];
		set_unsigned_bits(&mut buff, 3, 17, 0x1_2345).unwrap();
		assert_eq!(read_unsigned_bits(&buff, 3, 17).unwrap(), 0x1_2345);
		// Neighbors untouched
		assert_eq!(read_unsigned_bits(&buff, 0, 3).unwrap(), 0b111);
		assert_eq!(read_unsigned_bits(&buff, 20, 20).unwrap(), 0xF_FFFF);
	}

	#[test]
	fn right_aligned_packing() {
		// Ten bits "1100000001" right-aligned into two bytes: 000000 1100000001
		let bits:Vec<i8> = vec![-1, -1, 1, 1, 1, 1, 1, 1, 1, -1];
		let mut out = [0xAAu8; 2];
		pack_sign_coded(&bits, &mut out, Alignment::Right).unwrap();
		assert_eq!(out, [0b0000_0011, 0b0000_0001]);

		pack_sign_coded(&bits, &mut out, Alignment::Left).unwrap();
		assert_eq!(out, [0b1100_0000, 0b0100_0000]);
	}

	#[test]
	fn unpack_matches_pack() {
		let buff:[u8; 3] = [0x5A, 0xC3, 0x80];
		let bits = unpack_sign_coded(&buff, 17).unwrap();
		assert_eq!(bits.len(), 17);
		assert_eq!(&bits[..4], &[1, -1, 1, -1]);

		let mut out = [0u8; 3];
		pack_sign_coded(&bits, &mut out, Alignment::Left).unwrap();
		assert_eq!(out, buff);
	}

}
