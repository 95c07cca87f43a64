
use ::serde::{Serialize, Deserialize};

use super::tlm_decode::subframe::{DecodedSubframe, SubframeBody, WordType};

/// Navigation data accumulated across subframes for one satellite.  Each field holds whatever the most recent
/// subframe carrying it said; nothing is cleared and nothing is cross-checked between subframes, so a field may
/// be stale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Ephemeris {
	pub tow: f64,							// [sec]
	pub week_number: u16,
	pub last_word_type: Option<WordType>,
	pub subframe_counts: [u32; 4],			// indexed by word type id
}

impl Ephemeris {

	pub fn new() -> Self { Self::default() }

	pub fn update(&mut self, sf:&DecodedSubframe) {
		self.tow = sf.time_of_week();
		if let SubframeBody::Subframe1{ week_number } = sf.body {
			self.week_number = week_number;
		}

		let wt = sf.word_type();
		self.subframe_counts[wt.id() as usize] += 1;
		self.last_word_type = Some(wt);
	}

	pub fn num_subframes(&self) -> u32 { self.subframe_counts.iter().sum() }

}

#[cfg(test)]
mod tests {

	use super::*;

	#[test]
	fn week_number_survives_other_word_types() {
		let mut eph = Ephemeris::new();
		eph.update(&DecodedSubframe{ time_of_week_count: 10, body: SubframeBody::Subframe1{ week_number: 777 } });
		assert_eq!(eph.week_number, 777);
		assert_eq!(eph.tow, 120.0);

		for body in &[SubframeBody::Subframe2, SubframeBody::Subframe3, SubframeBody::Subframe4] {
			eph.update(&DecodedSubframe{ time_of_week_count: 11, body: *body });
			assert_eq!(eph.week_number, 777);
			assert_eq!(eph.tow, 132.0);
			assert_eq!(eph.last_word_type, Some(body.word_type()));
		}

		assert_eq!(eph.subframe_counts, [1, 1, 1, 1]);
		assert_eq!(eph.num_subframes(), 4);
	}

}
