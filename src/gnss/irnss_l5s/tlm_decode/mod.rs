
use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::DigSigProcErr;
use crate::gnss::irnss_l5s::{ENCODED_BITS, FRAME_LEN, PREAMBLE, PREAMBLE_LEN, SUBFRAME_BITS, SUBFRAME_BYTES, TAIL_BITS};
use crate::gnss::irnss_l5s::ephemeris::Ephemeris;

/*	IRNSS L5/S Telemetry Decoding Pipeline:
	- Polarity normalization
	- Deinterleaving (73 x 8)
	- Viterbi decoding (rate 1/2, K = 7)
	- CRC-24Q check
	- Dispatch by word type and field extraction
*/

pub mod error_correction;
pub mod error_detection;
pub mod interleave;
pub mod polarity;
pub mod preamble_detection;
pub mod subframe;


use self::error_correction::ViterbiDecoder;
use self::interleave::L5S_INTERLEAVER;
use self::polarity::Polarity;
use self::subframe::{DecodedSubframe, Subframe};

/// Symbol decisions for at least one frame, starting at the preamble, with the polarity estimated by the caller
#[derive(Debug, Clone, Copy)]
pub struct SymbolStream<'a> {
	pub symbols: &'a [i8],
	pub polarity: Polarity,
}

impl<'a> SymbolStream<'a> {

	pub fn new(symbols:&'a [i8], polarity:Polarity) -> Self { Self{ symbols, polarity } }

	pub fn len(&self) -> usize { self.symbols.len() }

}

/// Runs everything up to (not including) the CRC check: polarity, deinterleaving and Viterbi decoding of the
/// first frame in `stream`.  The decoder is reinitialized here, so state from earlier frames can't leak in.
pub fn decode_symbols(stream:&SymbolStream, fec:&mut ViterbiDecoder) -> Result<Subframe, DigSigProcErr> {
	if stream.len() < FRAME_LEN {
		return Err(DigSigProcErr::InsufficientInput{ needed: FRAME_LEN, got: stream.len() });
	}

	let symbols:Vec<i8> = polarity::normalize(&stream.symbols[..FRAME_LEN], stream.polarity);

	fec.initialize(0);

	let codeword:Vec<i8> = L5S_INTERLEAVER.deinterleave(&symbols[PREAMBLE_LEN..])?;
	let soft:Vec<u8> = codeword.iter().map(|s| error_correction::soft_decision(*s)).collect();

	fec.update_blk(&soft, ENCODED_BITS)?;

	let mut data = [0u8; SUBFRAME_BYTES];
	fec.chainback(&mut data, SUBFRAME_BITS, 0)?;

	Ok(Subframe::from_bytes(data))
}

// CRC gate, field extraction and ephemeris update for a subframe that came out of the Viterbi decoder
fn check_and_extract(sf:&Subframe, eph:&mut Ephemeris) -> Result<DecodedSubframe, DigSigProcErr> {
	error_detection::check_crc(sf)?;

	let decoded:DecodedSubframe = subframe::decode(sf)?;
	debug!(word_type = decoded.word_type().id(), tow = decoded.time_of_week(), "Decoded IRNSS L5/S subframe");

	eph.update(&decoded);
	Ok(decoded)
}

/// One full decode cycle.  Fields are written into `eph` only after the CRC passes.
pub fn decode_frame(stream:&SymbolStream, fec:&mut ViterbiDecoder, eph:&mut Ephemeris) -> Result<(DecodedSubframe, Subframe), DigSigProcErr> {
	let sf:Subframe = decode_symbols(stream, fec)?;
	match check_and_extract(&sf, eph) {
		Ok(decoded) => Ok((decoded, sf)),
		Err(e) => {
			warn!("IRNSS L5/S {}", e);
			Err(e)
		}
	}
}

/// Word type id (0 through 3) on success, a negative sentinel otherwise
pub fn return_code<T>(result:&Result<(DecodedSubframe, T), DigSigProcErr>) -> i32 {
	match result {
		Ok((decoded, _)) => decoded.word_type().id() as i32,
		Err(e) => e.code(),
	}
}

/// Builds the on-air symbols for one subframe: encoder flushed with zero tail bits, interleaved, preamble in
/// front, and everything multiplied by `polarity`.
pub fn encode_frame(sf:&Subframe, polarity:Polarity) -> Result<Vec<i8>, DigSigProcErr> {
	let mut msg:Vec<bool> = (0..SUBFRAME_BITS).map(|i| sf.read(i, 1).map(|b| b == 1)).collect::<Result<Vec<bool>, DigSigProcErr>>()?;
	msg.extend_from_slice(&[false; TAIL_BITS]);

	let symbols:Vec<i8> = error_correction::encode(&msg).iter().map(|b| if *b { 1 } else { -1 }).collect();
	let codeword:Vec<i8> = L5S_INTERLEAVER.interleave(&symbols)?;

	Ok(PREAMBLE.iter().chain(codeword.iter()).map(|s| polarity.apply(*s)).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Searching,
	Synced{ polarity:Polarity },
}

#[derive(Debug)]
pub enum TelemetryDecoderResult {
	NotReady,
	Ok(DecodedSubframe, Subframe, usize),
	Err(DigSigProcErr),
}

/// Frame synchronization and decoding for one channel.  While searching, a frame is decoded once the preamble
/// of the following frame is also in the buffer, which confirms both alignment and polarity.  Once synced, frame
/// boundaries are trusted and the CRC alone decides whether sync is kept.
pub struct TelemetryDecoder {
	buffer: VecDeque<i8>,
	state: State,
	fec: ViterbiDecoder,
	ephemeris: Ephemeris,
}

impl TelemetryDecoder {

	pub fn new() -> Self {
		Self{ buffer: VecDeque::with_capacity(FRAME_LEN + PREAMBLE_LEN), state: State::Searching, fec: ViterbiDecoder::new(),
			ephemeris: Ephemeris::new() }
	}

	// The ephemeris is kept across reinitialization since it belongs to the satellite, not the lock
	pub fn initialize(&mut self) {
		self.buffer.clear();
		self.state = State::Searching;
	}

	pub fn polarity(&self) -> Option<Polarity> {
		match self.state {
			State::Synced{ polarity } => Some(polarity),
			State::Searching => None,
		}
	}

	pub fn ephemeris(&self) -> &Ephemeris { &self.ephemeris }

	/// Takes one symbol decision and its index in the stream.  Indices are expected to be consecutive.
	pub fn apply(&mut self, s:(i8, usize)) -> TelemetryDecoderResult {
		let (symbol, idx) = s;
		self.buffer.push_back(symbol);

		let polarity:Polarity = match self.state {
			State::Synced{ polarity } => {
				if self.buffer.len() < FRAME_LEN { return TelemetryDecoderResult::NotReady; }
				polarity
			},
			State::Searching => {
				if self.buffer.len() < FRAME_LEN + PREAMBLE_LEN { return TelemetryDecoderResult::NotReady; }
				// The buffer never grows past one frame plus a preamble here, so offset 0 is the only candidate
				match preamble_detection::find_preamble(self.buffer.make_contiguous()) {
					Some((0, p)) => p,
					_ => {
						self.buffer.pop_front();
						return TelemetryDecoderResult::NotReady;
					}
				}
			}
		};

		let was_synced:bool = self.state != State::Searching;
		let start_idx:usize = (idx + 1).saturating_sub(self.buffer.len());

		let stream = SymbolStream::new(self.buffer.make_contiguous(), polarity);
		let result:Result<(DecodedSubframe, Subframe), DigSigProcErr> = match decode_symbols(&stream, &mut self.fec) {
			Ok(sf) => match check_and_extract(&sf, &mut self.ephemeris) {
				Ok(decoded) => Ok((decoded, sf)),
				Err(e) => Err(e),
			},
			Err(e) => Err(e),
		};

		match result {
			Ok((decoded, sf)) => {
				if !was_synced {
					debug!(?polarity, start_idx, "Acquired IRNSS L5/S frame sync");
				}
				self.state = State::Synced{ polarity };
				self.buffer.drain(..FRAME_LEN);
				TelemetryDecoderResult::Ok(decoded, sf, start_idx)
			},
			Err(e) => {
				self.state = State::Searching;
				self.buffer.pop_front();
				// A preamble look-alike that fails the CRC while searching is not worth reporting
				if was_synced {
					warn!(start_idx, "Lost IRNSS L5/S frame sync: {}", e);
					TelemetryDecoderResult::Err(e)
				} else {
					debug!(start_idx, "Rejected IRNSS L5/S preamble candidate: {}", e);
					TelemetryDecoderResult::NotReady
				}
			}
		}
	}

}
