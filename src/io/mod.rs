
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_complex::Complex;

use crate::Sample;

pub const BUFFER_SIZE:usize = 2048;

/// Symbol decisions stored one signed byte per symbol
pub struct SymbolSource<S: Read> {
	src: BufReader<S>,
	idx: usize,
}

impl<S: Read> SymbolSource<S> {

	pub fn new(src:S) -> Self {
		Self{ src: BufReader::with_capacity(BUFFER_SIZE, src), idx: 0 }
	}

}

impl<S: Read> Iterator for SymbolSource<S> {
	type Item = (i8, usize);

	fn next(&mut self) -> Option<(i8, usize)> {
		// Any read failure, including a clean EOF, ends the stream
		let x = self.src.read_i8().ok()?;
		let ans = (x, self.idx);
		self.idx += 1;
		Some(ans)
	}
}

/// Prompt correlator outputs stored as interleaved little-endian i16 I/Q pairs, one pair per symbol
pub struct PromptSource<S: Read> {
	src: BufReader<S>,
	idx: usize,
}

impl<S: Read> PromptSource<S> {

	pub fn new(src:S) -> Self {
		Self{ src: BufReader::with_capacity(BUFFER_SIZE, src), idx: 0 }
	}

}

impl<S: Read> Iterator for PromptSource<S> {
	type Item = Sample;

	fn next(&mut self) -> Option<Sample> {
		let re = self.src.read_i16::<LittleEndian>().ok()?;
		let im = self.src.read_i16::<LittleEndian>().ok()?;
		let ans = Sample{ val: Complex{ re: re as f64, im: im as f64 }, idx: self.idx };
		self.idx += 1;
		Some(ans)
	}
}

/// Hard decision on the in-phase component of a prompt correlator output
pub fn prompt_to_symbol(prompt:&Complex<f64>) -> i8 {
	if prompt.re > 0.0 { 1 } else if prompt.re < 0.0 { -1 } else { 0 }
}

pub fn file_source_i8<P: AsRef<Path>>(fname:P) -> io::Result<SymbolSource<File>> {
	Ok(SymbolSource::new(File::open(fname)?))
}

pub fn file_source_i16_complex<P: AsRef<Path>>(fname:P) -> io::Result<PromptSource<File>> {
	Ok(PromptSource::new(File::open(fname)?))
}

pub fn write_symbols_i8<W: Write>(dst:W, symbols:&[i8]) -> io::Result<()> {
	let mut w = BufWriter::with_capacity(BUFFER_SIZE, dst);
	for s in symbols { w.write_i8(*s)?; }
	w.flush()
}

// Symbols go on the in-phase axis with the given amplitude and zero quadrature
pub fn write_prompts_i16_complex<W: Write>(dst:W, symbols:&[i8], amplitude:i16) -> io::Result<()> {
	let mut w = BufWriter::with_capacity(BUFFER_SIZE, dst);
	for s in symbols {
		w.write_i16::<LittleEndian>((*s as i16).saturating_mul(amplitude))?;
		w.write_i16::<LittleEndian>(0)?;
	}
	w.flush()
}
