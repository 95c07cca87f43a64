//! Rate 1/2, constraint length 7 convolutional code (G1 = 171, G2 = 133 octal) and a soft-decision Viterbi
//! decoder for it.  The register layout puts the newest input bit in bit 6, so a 6-bit trellis state holds the
//! previous six inputs with the most recent one in bit 5.

use crate::DigSigProcErr;

pub const CONSTRAINT_LEN:usize = 7;
pub const NUM_STATES:usize = 1 << (CONSTRAINT_LEN - 1);
const STATE_MASK:usize = NUM_STATES - 1;

// Larger than any metric a full block can accumulate (292 steps * 510), small enough never to overflow
const UNREACHABLE_METRIC:u32 = 1 << 24;

// Ideal soft byte for each encoder output bit; 0 is the most confident one and 255 the most confident zero
const SOFT_ONE:i32 = 0;
const SOFT_ZERO:i32 = 255;
pub const SOFT_ERASURE:u8 = 128;

fn conv_fec(x:usize) -> (bool, bool) {

	let bit6:bool = (x & 0x40) != 0;
	let bit5:bool = (x & 0x20) != 0;
	let bit4:bool = (x & 0x10) != 0;
	let bit3:bool = (x & 0x08) != 0;

	// Both G1 and G2 skip bit2

	let bit1:bool = (x & 0x02) != 0;
	let bit0:bool = (x & 0x01) != 0;

	let g1:bool = bit6 ^ bit5 ^ bit4 ^ bit3 ^        bit0;
	let g2:bool = bit6 ^        bit4 ^ bit3 ^ bit1 ^ bit0;

	(g1, g2)

}

/// Encodes `bits` starting from the all-zero state.  No tail is added; callers append `TAIL_BITS` zeros to
/// terminate the trellis.
pub fn encode(bits:&[bool]) -> Vec<bool> {
	let mut state:usize = 0;
	let mut ans:Vec<bool> = Vec::with_capacity(2*bits.len());
	for b in bits {
		let reg:usize = (if *b { 0x40 } else { 0 }) | state;
		let (g1, g2) = conv_fec(reg);
		ans.push(g1);
		ans.push(g2);
		state = reg >> 1;
	}
	ans
}

/// Maps a normalized symbol decision to the decoder's soft byte scale; a zero symbol carries no information
pub fn soft_decision(symbol:i8) -> u8 {
	if symbol > 0 { SOFT_ONE as u8 }
	else if symbol < 0 { SOFT_ZERO as u8 }
	else { SOFT_ERASURE }
}

fn branch_metric(soft:u8, expected:bool) -> u32 {
	let ideal:i32 = if expected { SOFT_ONE } else { SOFT_ZERO };
	(soft as i32 - ideal).abs() as u32
}

/// Trellis state for one channel.  Path metrics and the survivor decisions accumulated since the last
/// `initialize` live here, so every channel needs its own instance and every codeword needs a fresh
/// `initialize`.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
	metrics: [u32; NUM_STATES],
	// One word per trellis step; bit n holds the low bit of the predecessor chosen for state n
	decisions: Vec<u64>,
}

impl ViterbiDecoder {

	pub fn new() -> Self {
		let mut ans = Self{ metrics: [UNREACHABLE_METRIC; NUM_STATES], decisions: Vec::with_capacity(super::super::ENCODED_BITS) };
		ans.initialize(0);
		ans
	}

	pub fn initialize(&mut self, start_state:u8) {
		self.metrics = [UNREACHABLE_METRIC; NUM_STATES];
		self.metrics[(start_state as usize) & STATE_MASK] = 0;
		self.decisions.clear();
	}

	pub fn num_decoded(&self) -> usize { self.decisions.len() }

	/// Runs `nbits` trellis steps over `symbols`, two soft bytes per step
	pub fn update_blk(&mut self, symbols:&[u8], nbits:usize) -> Result<(), DigSigProcErr> {
		if symbols.len() < 2*nbits {
			return Err(DigSigProcErr::InsufficientInput{ needed: 2*nbits, got: symbols.len() });
		}

		for pair in symbols[..2*nbits].chunks_exact(2) {
			let mut next_metrics = [0u32; NUM_STATES];
			let mut decision:u64 = 0;

			for next_state in 0..NUM_STATES {
				let input:usize = next_state >> 5;
				let mut best:(u32, usize) = (u32::MAX, 0);

				for low_bit in 0..2 {
					let prev_state:usize = ((next_state << 1) & STATE_MASK) | low_bit;
					let (g1, g2) = conv_fec((input << 6) | prev_state);
					let m:u32 = self.metrics[prev_state] + branch_metric(pair[0], g1) + branch_metric(pair[1], g2);
					if m < best.0 { best = (m, low_bit); }
				}

				next_metrics[next_state] = best.0;
				if best.1 == 1 { decision |= 1u64 << next_state; }
			}

			self.metrics = next_metrics;
			self.decisions.push(decision);
		}

		Ok(())
	}

	/// Traces back from `end_state` after `nbits + TAIL_BITS` steps and writes the first `nbits` decoded bits into
	/// `data`, MSB first.  Unused trailing bits of `data` are cleared.
	pub fn chainback(&self, data:&mut [u8], nbits:usize, end_state:u8) -> Result<(), DigSigProcErr> {
		let steps:usize = nbits + super::super::TAIL_BITS;
		if self.decisions.len() < steps {
			return Err(DigSigProcErr::InsufficientInput{ needed: steps, got: self.decisions.len() });
		}
		if 8*data.len() < nbits {
			return Err(DigSigProcErr::FormatViolation("Output buffer too small in ViterbiDecoder::chainback"));
		}

		for b in data.iter_mut() { *b = 0; }

		let mut state:usize = (end_state as usize) & STATE_MASK;
		for t in (0..steps).rev() {
			if t < nbits && (state >> 5) == 1 {
				data[t/8] |= 0x80 >> (t % 8);
			}
			let low_bit:usize = ((self.decisions[t] >> state) & 1) as usize;
			state = ((state << 1) & STATE_MASK) | low_bit;
		}

		Ok(())
	}

}

#[cfg(test)]
mod tests {

	use rand::{Rng, SeedableRng};
	use rand::rngs::StdRng;

	use super::*;
	use crate::gnss::irnss_l5s::{TAIL_BITS, SUBFRAME_BITS, SUBFRAME_BYTES, ENCODED_BITS, CODEWORD_LEN};

	fn random_message(rng:&mut StdRng) -> Vec<bool> {
		(0..SUBFRAME_BITS).map(|_| rng.gen::<bool>()).collect()
	}

	fn to_soft(encoded:&[bool]) -> Vec<u8> {
		encoded.iter().map(|b| soft_decision(if *b { 1 } else { -1 })).collect()
	}

	fn decode(soft:&[u8], dec:&mut ViterbiDecoder) -> Vec<bool> {
		let mut data = [0u8; SUBFRAME_BYTES];
		dec.initialize(0);
		dec.update_blk(soft, ENCODED_BITS).unwrap();
		dec.chainback(&mut data, SUBFRAME_BITS, 0).unwrap();
		(0..SUBFRAME_BITS).map(|i| (data[i/8] << (i%8)) & 0x80 != 0).collect()
	}

	fn terminated(msg:&[bool]) -> Vec<bool> {
		let mut ans = msg.to_vec();
		ans.extend_from_slice(&[false; TAIL_BITS]);
		ans
	}

	#[test]
	fn encoder_impulse_response() {
		// A single one walks through the register and reproduces the generator taps
		let encoded = encode(&[true, false, false, false, false, false, false]);
		let g1:Vec<bool> = encoded.iter().step_by(2).cloned().collect();
		let g2:Vec<bool> = encoded.iter().skip(1).step_by(2).cloned().collect();
		assert_eq!(g1, vec![true, true, true, true, false, false, true]);		// 171 octal
		assert_eq!(g2, vec![true, false, true, true, false, true, true]);		// 133 octal
	}

	#[test]
	fn clean_codeword_round_trip() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut dec = ViterbiDecoder::new();
		for _ in 0..5 {
			let msg = random_message(&mut rng);
			let encoded = encode(&terminated(&msg));
			assert_eq!(encoded.len(), CODEWORD_LEN);
			assert_eq!(decode(&to_soft(&encoded), &mut dec), msg);
		}
	}

	#[test]
	fn corrects_scattered_symbol_errors() {
		let mut rng = StdRng::seed_from_u64(11);
		let mut dec = ViterbiDecoder::new();
		let msg = random_message(&mut rng);
		let mut soft = to_soft(&encode(&terminated(&msg)));

		// Flip isolated symbols far enough apart that each error sits in its own constraint span
		for idx in (10..CODEWORD_LEN).step_by(40) {
			soft[idx] = 255 - soft[idx];
		}
		assert_eq!(decode(&soft, &mut dec), msg);
	}

	#[test]
	fn erasures_are_tolerated() {
		let mut rng = StdRng::seed_from_u64(13);
		let mut dec = ViterbiDecoder::new();
		let msg = random_message(&mut rng);
		let mut soft = to_soft(&encode(&terminated(&msg)));
		for idx in (3..CODEWORD_LEN).step_by(25) {
			soft[idx] = SOFT_ERASURE;
		}
		assert_eq!(decode(&soft, &mut dec), msg);
	}

	#[test]
	fn initialize_clears_previous_block() {
		let mut rng = StdRng::seed_from_u64(17);
		let mut dec = ViterbiDecoder::new();
		let first  = random_message(&mut rng);
		let second = random_message(&mut rng);

		assert_eq!(decode(&to_soft(&encode(&terminated(&first))), &mut dec), first);
		assert_eq!(decode(&to_soft(&encode(&terminated(&second))), &mut dec), second);
		assert_eq!(dec.num_decoded(), ENCODED_BITS);
	}

	#[test]
	fn short_input_is_an_error() {
		let mut dec = ViterbiDecoder::new();
		assert_eq!(dec.update_blk(&[0u8; 10], 6), Err(DigSigProcErr::InsufficientInput{ needed: 12, got: 10 }));

		let mut data = [0u8; SUBFRAME_BYTES];
		dec.update_blk(&[0u8; 20], 10).unwrap();
		assert!(dec.chainback(&mut data, SUBFRAME_BITS, 0).is_err());
	}

}
