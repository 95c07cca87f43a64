
// Generator polynomial for CRC-24Q, including the x^24 term
pub const CRC_24Q_POLYNOMIAL:u32 = 0x1864CFB;

/// CRC-24Q with a zero initial register, no reflection, and no final XOR
pub fn crc24q(buff:&[u8]) -> u32 {
	let mut crc:u32 = 0;
	for b in buff {
		crc ^= (*b as u32) << 16;
		for _ in 0..8 {
			crc <<= 1;
			if crc & 0x100_0000 != 0 { crc ^= CRC_24Q_POLYNOMIAL; }
		}
	}
	crc & 0xFF_FFFF
}
