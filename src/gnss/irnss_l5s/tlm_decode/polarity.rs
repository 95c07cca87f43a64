
use ::serde::{Serialize, Deserialize};

/// Global sign of the recovered symbols relative to the transmitted ones.  A Costas-type carrier loop can lock
/// half a cycle off, which inverts every symbol.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
	Normal,
	Inverted,
}

impl Polarity {

	pub fn sign(&self) -> i8 {
		match self {
			Polarity::Normal   =>  1,
			Polarity::Inverted => -1,
		}
	}

	pub fn inverse(&self) -> Self {
		match self {
			Polarity::Normal   => Polarity::Inverted,
			Polarity::Inverted => Polarity::Normal,
		}
	}

	/// Product of two signs; normalizing with `a` then `b` is the same as normalizing once with `a.compose(b)`
	pub fn compose(&self, other:Polarity) -> Self {
		if self == &other { Polarity::Normal } else { Polarity::Inverted }
	}

	// -128 has no positive counterpart, so inversion saturates at +127
	pub fn apply(&self, symbol:i8) -> i8 {
		match self {
			Polarity::Normal   => symbol,
			Polarity::Inverted => symbol.saturating_neg(),
		}
	}

}

pub fn normalize(symbols:&[i8], polarity:Polarity) -> Vec<i8> {
	symbols.iter().map(|s| polarity.apply(*s)).collect()
}

#[cfg(test)]
mod tests {

	use rand::{Rng, SeedableRng};
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn normalize_multiplies_by_sign() {
		let symbols:Vec<i8> = vec![1, -1, 1, 1, -3, 0, 127];
		assert_eq!(normalize(&symbols, Polarity::Normal), symbols);
		assert_eq!(normalize(&symbols, Polarity::Inverted), vec![-1, 1, -1, -1, 3, 0, -127]);
	}

	#[test]
	fn normalizing_twice_is_identity() {
		let mut rng = StdRng::seed_from_u64(0x1F5);
		let symbols:Vec<i8> = (0..600).map(|_| rng.gen_range(-127i8, 127i8)).collect();

		for p in &[Polarity::Normal, Polarity::Inverted] {
			let twice = normalize(&normalize(&symbols, *p), *p);
			assert_eq!(twice, symbols);
			assert_eq!(p.compose(*p), Polarity::Normal);
		}
	}

	#[test]
	fn sign_and_inverse() {
		assert_eq!(Polarity::Normal.sign(), 1);
		assert_eq!(Polarity::Inverted.sign(), -1);
		assert_eq!(Polarity::Normal.inverse(), Polarity::Inverted);
		assert_eq!(Polarity::Inverted.compose(Polarity::Normal), Polarity::Inverted);
		assert_eq!(Polarity::Inverted.apply(-128), 127);
	}

}
