
extern crate clap;
extern crate colored;
extern crate navic_radio;

use std::fs::File;

use clap::{Arg, App, ArgMatches};
use colored::*;
use navic_radio::{io, DigSigProcErr};
use navic_radio::gnss::irnss_l5s::{PREAMBLE, SUBFRAME_PERIOD_SEC};
use navic_radio::gnss::irnss_l5s::tlm_decode::encode_frame;
use navic_radio::gnss::irnss_l5s::tlm_decode::polarity::Polarity;
use navic_radio::gnss::irnss_l5s::tlm_decode::subframe::{DecodedSubframe, SubframeBody, WordType};

// Largest count the 17-bit TOWC field holds
const MAX_TOWC:u32 = (1 << 17) - 1;

fn frames(week_number:u16, first_towc:u32, n:usize, polarity:Polarity) -> Result<Vec<i8>, DigSigProcErr> {
	let mut ans:Vec<i8> = vec![];
	for k in 0..n {
		let body = match WordType::ALL[k % 4] {
			WordType::Subframe1 => SubframeBody::Subframe1{ week_number },
			WordType::Subframe2 => SubframeBody::Subframe2,
			WordType::Subframe3 => SubframeBody::Subframe3,
			WordType::Subframe4 => SubframeBody::Subframe4,
		};
		let time_of_week_count:u32 = (first_towc + k as u32) % (MAX_TOWC + 1);
		let sf = DecodedSubframe{ time_of_week_count, body }.to_subframe()?;
		ans.extend(encode_frame(&sf, polarity)?);
	}

	// Trailing preamble so a decoder can confirm the alignment of the last frame
	ans.extend(PREAMBLE.iter().map(|s| polarity.apply(*s)));
	Ok(ans)
}

struct Options {
	fname:String,
	output_type:String,
	week:u16,
	first_towc:u32,
	n:usize,
	polarity:Polarity,
	leading:usize,
}

fn app<'a, 'b>() -> App<'a, 'b> {
	App::new("IRNSS L5/S Symbol Synthesizer")
		.version("0.1.0")
		.author("John Stanford (johnwstanford@gmail.com)")
		.about("Writes encoded and interleaved IRNSS L5/S navigation symbols for loopback testing of the decoder")
		.arg(Arg::with_name("output")
			.short("o").long("output")
			.help("Output filename")
			.required(true).takes_value(true))
		.arg(Arg::with_name("output_type")
			.short("t").long("type")
			.takes_value(true)
			.possible_values(&["i8", "i16"])
			.default_value("i8"))
		.arg(Arg::with_name("week")
			.long("week")
			.takes_value(true).default_value("0"))
		.arg(Arg::with_name("tow")
			.long("tow")
			.help("Time of week of the first subframe [sec], rounded down to a multiple of 12")
			.takes_value(true).default_value("0"))
		.arg(Arg::with_name("frames")
			.short("n").long("frames")
			.takes_value(true).default_value("4"))
		.arg(Arg::with_name("polarity")
			.long("polarity")
			.takes_value(true)
			.possible_values(&["normal", "inverted"])
			.default_value("normal"))
		.arg(Arg::with_name("leading")
			.long("leading")
			.help("Number of filler symbols ahead of the first preamble")
			.takes_value(true).default_value("0"))
}

fn parse<T: std::str::FromStr>(matches:&ArgMatches, name:&str) -> Result<T, String> {
	let raw:&str = matches.value_of(name).ok_or_else(|| format!("Missing value for --{}", name))?;
	raw.parse().map_err(|_| format!("Invalid value for --{}: {}", name, raw))
}

fn options(matches:&ArgMatches) -> Result<Options, String> {
	let fname:String = matches.value_of("output").ok_or("Missing output filename")?.to_string();
	let output_type:String = matches.value_of("output_type").unwrap_or("i8").to_string();
	let week:u16 = parse(matches, "week")?;
	let tow:f64 = parse(matches, "tow")?;
	let n:usize = parse(matches, "frames")?;
	let leading:usize = parse(matches, "leading")?;
	let polarity = match matches.value_of("polarity") {
		Some("inverted") => Polarity::Inverted,
		_ => Polarity::Normal,
	};

	if week > 1023 || tow < 0.0 || (tow / SUBFRAME_PERIOD_SEC) as u32 > MAX_TOWC {
		return Err("Week must fit in 10 bits and TOW in 17 bits of 12-second counts".to_string());
	}

	Ok(Options{ fname, output_type, week, first_towc: (tow / SUBFRAME_PERIOD_SEC) as u32, n, polarity, leading })
}

fn main() {

	let matches = app().get_matches();
	let opts = match options(&matches) {
		Ok(opts) => opts,
		Err(msg) => { eprintln!("{}", msg.red()); std::process::exit(1); }
	};

	let mut symbols:Vec<i8> = (0..opts.leading).map(|i| if i % 2 == 0 { 1 } else { -1 }).collect();
	match frames(opts.week, opts.first_towc, opts.n, opts.polarity) {
		Ok(s) => symbols.extend(s),
		Err(e) => { eprintln!("{}", format!("Unable to build frames: {}", e).red()); std::process::exit(1); }
	}

	let written = File::create(&opts.fname).and_then(|f| match opts.output_type.as_str() {
		"i16" => io::write_prompts_i16_complex(f, &symbols, 1000),
		_ => io::write_symbols_i8(f, &symbols),
	});

	match written {
		Ok(()) => eprintln!("{}", format!("Wrote {} frames ({} symbols) to {}", opts.n, symbols.len(), opts.fname).green()),
		Err(e) => { eprintln!("{}", format!("Unable to write {}: {}", opts.fname, e).red()); std::process::exit(1); }
	}
}

#[cfg(test)]
mod tests {

	use super::*;

	fn options_from(args:&[&str]) -> Result<Options, String> {
		let mut argv:Vec<&str> = vec!["irnss_l5s_synthesize"];
		argv.extend_from_slice(args);
		let matches = app().get_matches_from_safe(argv).map_err(|e| e.message)?;
		options(&matches)
	}

	#[test]
	fn every_argument_is_parsed() {
		let opts = options_from(&["-o", "out.bin", "-t", "i16", "--week", "1023", "--tow", "1200",
			"-n", "8", "--polarity", "inverted", "--leading", "37"]).unwrap();
		assert_eq!(opts.fname, "out.bin");
		assert_eq!(opts.output_type, "i16");
		assert_eq!(opts.week, 1023);
		assert_eq!(opts.first_towc, 100);
		assert_eq!(opts.n, 8);
		assert_eq!(opts.polarity, Polarity::Inverted);
		assert_eq!(opts.leading, 37);
	}

	#[test]
	fn defaults_apply() {
		let opts = options_from(&["-o", "out.bin"]).unwrap();
		assert_eq!(opts.output_type, "i8");
		assert_eq!((opts.week, opts.first_towc, opts.n, opts.leading), (0, 0, 4, 0));
		assert_eq!(opts.polarity, Polarity::Normal);
	}

	#[test]
	fn bad_values_are_reported() {
		assert!(options_from(&["-o", "out.bin", "--week", "1024"]).is_err());
		assert!(options_from(&["-o", "out.bin", "--week", "abc"]).is_err());
		assert!(options_from(&["-o", "out.bin", "--tow", "-12"]).is_err());
		assert!(options_from(&["-o", "out.bin", "-n", "2.5"]).is_err());
		assert!(options_from(&["--week", "3"]).is_err());
	}

	#[test]
	fn towc_wraps_and_trailing_preamble_is_added() {
		let symbols = frames(5, MAX_TOWC, 2, Polarity::Normal).unwrap();
		assert_eq!(symbols.len(), 2 * 600 + 16);
	}

}
