
use crate::gnss::irnss_l5s::{FRAME_LEN, PREAMBLE, PREAMBLE_LEN};

use super::polarity::Polarity;

/// Compares signs only.  A zero symbol matches neither polarity.
pub fn preamble_match(symbols:&[i8]) -> Option<Polarity> {
	if symbols.len() != PREAMBLE_LEN { return None; }

	if symbols.iter().zip(PREAMBLE.iter()).all(|(s, p)| s.signum() == *p) {
		Some(Polarity::Normal)
	} else if symbols.iter().zip(PREAMBLE.iter()).all(|(s, p)| s.signum() == -*p) {
		Some(Polarity::Inverted)
	} else {
		None
	}
}

/// Finds the start of the first complete frame by requiring the preamble at some offset and again one frame
/// later with the same polarity.  Returns None unless exactly one offset within the first frame qualifies.
pub fn find_preamble(symbols:&[i8]) -> Option<(usize, Polarity)> {
	if symbols.len() < FRAME_LEN + PREAMBLE_LEN { return None; }

	let last_start:usize = (symbols.len() - FRAME_LEN - PREAMBLE_LEN).min(FRAME_LEN - 1);
	let candidates:Vec<(usize, Polarity)> = (0..=last_start).filter_map(|i| {
		match (preamble_match(&symbols[i..i+PREAMBLE_LEN]), preamble_match(&symbols[i+FRAME_LEN..i+FRAME_LEN+PREAMBLE_LEN])) {
			(Some(a), Some(b)) if a == b => Some((i, a)),
			(_, _) => None,
		}
	}).collect();

	if candidates.len() == 1 { Some(candidates[0]) } else { None }
}
