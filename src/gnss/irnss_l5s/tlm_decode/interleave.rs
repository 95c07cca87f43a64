
use crate::DigSigProcErr;
use super::super::{INTERLEAVER_ROWS, INTERLEAVER_COLS};

/// Row/column block interleaver.  The transmitter writes the codeword in by rows and reads it out by columns, so
/// adjacent code symbols end up `rows` positions apart on the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInterleaver {
	pub rows: usize,
	pub cols: usize,
}

pub const L5S_INTERLEAVER:BlockInterleaver = BlockInterleaver{ rows: INTERLEAVER_ROWS, cols: INTERLEAVER_COLS };

impl BlockInterleaver {

	pub fn len(&self) -> usize { self.rows * self.cols }

	fn check_len(&self, n:usize) -> Result<(), DigSigProcErr> {
		if n == self.len() { Ok(()) }
		else { Err(DigSigProcErr::FormatViolation("Block length does not match the interleaver dimensions")) }
	}

	// out[r*cols + c] = in[c*rows + r]
	pub fn deinterleave<T:Copy>(&self, input:&[T]) -> Result<Vec<T>, DigSigProcErr> {
		self.check_len(input.len())?;
		let (rows, cols) = (self.rows, self.cols);
		Ok((0..rows).flat_map(|r| (0..cols).map(move |c| input[c*rows + r])).collect())
	}

	pub fn interleave<T:Copy>(&self, input:&[T]) -> Result<Vec<T>, DigSigProcErr> {
		self.check_len(input.len())?;
		let (rows, cols) = (self.rows, self.cols);
		Ok((0..cols).flat_map(|c| (0..rows).map(move |r| input[r*cols + c])).collect())
	}

}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn deinterleave_undoes_interleave() {
		let original:Vec<usize> = (0..584).collect();
		let on_air = L5S_INTERLEAVER.interleave(&original).unwrap();
		assert_ne!(on_air, original);
		assert_eq!(L5S_INTERLEAVER.deinterleave(&on_air).unwrap(), original);

		// Also the other way around, since both are permutations of the same block
		assert_eq!(L5S_INTERLEAVER.interleave(&L5S_INTERLEAVER.deinterleave(&original).unwrap()).unwrap(), original);
	}

	#[test]
	fn deinterleave_is_a_permutation() {
		let input:Vec<usize> = (0..584).collect();
		let mut out = L5S_INTERLEAVER.deinterleave(&input).unwrap();
		assert_eq!(out[0], 0);
		assert_eq!(out[1], 73);
		assert_eq!(out[8], 1);
		out.sort();
		assert_eq!(out, input);
	}

	#[test]
	fn wrong_length_is_rejected() {
		let short = vec![0i8; 583];
		assert_eq!(L5S_INTERLEAVER.deinterleave(&short), Err(DigSigProcErr::FormatViolation("Block length does not match the interleaver dimensions")));
		assert!(L5S_INTERLEAVER.interleave(&vec![0i8; 585]).is_err());
	}

}
