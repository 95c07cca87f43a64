
extern crate clap;
extern crate colored;
extern crate navic_radio;
extern crate serde;

use clap::{Arg, App, ArgMatches};
use colored::*;
use navic_radio::io;
use navic_radio::gnss::irnss_l5s::ephemeris::Ephemeris;
use navic_radio::gnss::irnss_l5s::tlm_decode::{TelemetryDecoder, TelemetryDecoderResult};
use navic_radio::gnss::irnss_l5s::tlm_decode::polarity::Polarity;
use navic_radio::gnss::irnss_l5s::tlm_decode::subframe::DecodedSubframe;
use serde::{Serialize, Deserialize};
use tracing_subscriber::EnvFilter;

#[derive(Serialize, Deserialize, Debug)]
struct Result {
	prn: Option<usize>,
	polarity: Option<Polarity>,
	crc_failures: usize,
	nav_data: Vec<(String, DecodedSubframe, usize)>,
	ephemeris: Ephemeris,
}

struct Options {
	fname:String,
	input_type:String,
	prn:Option<usize>,
}

fn app<'a, 'b>() -> App<'a, 'b> {
	App::new("IRNSS L5/S Subframe Decode")
		.version("0.1.0")
		.author("John Stanford (johnwstanford@gmail.com)")
		.about("Takes IRNSS L5/S navigation symbols from a tracking loop and decodes them by subframe")
		.arg(Arg::with_name("filename")
			.short("f").long("filename")
			.help("Input filename")
			.required(true).takes_value(true))
		.arg(Arg::with_name("input_type")
			.short("t").long("type")
			.help("i8: one symbol decision per byte, i16: little-endian I/Q prompt correlator outputs")
			.takes_value(true)
			.possible_values(&["i8", "i16"])
			.default_value("i8"))
		.arg(Arg::with_name("prn")
			.long("prn")
			.help("PRN used to label the output")
			.takes_value(true))
}

fn options(matches:&ArgMatches) -> std::result::Result<Options, String> {
	let fname:String = matches.value_of("filename").ok_or("Missing input filename")?.to_string();
	let input_type:String = matches.value_of("input_type").unwrap_or("i8").to_string();
	let prn:Option<usize> = match matches.value_of("prn") {
		Some(raw) => Some(raw.parse().map_err(|_| format!("Invalid value for --prn: {}", raw))?),
		None => None,
	};
	Ok(Options{ fname, input_type, prn })
}

fn main() {

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let matches = app().get_matches();
	let opts = match options(&matches) {
		Ok(opts) => opts,
		Err(msg) => { eprintln!("{}", msg.red()); std::process::exit(1); }
	};
	let fname:&str = &opts.fname;
	let prn:Option<usize> = opts.prn;

	eprintln!("Decoding {} as {} symbols", &fname, opts.input_type);

	let symbols:Box<dyn Iterator<Item=(i8, usize)>> = match opts.input_type.as_str() {
		"i16" => match io::file_source_i16_complex(fname) {
			Ok(src) => Box::new(src.map(|s| (io::prompt_to_symbol(&s.val), s.idx))),
			Err(e) => { eprintln!("{}", format!("Unable to open {}: {}", fname, e).red()); std::process::exit(1); }
		},
		_ => match io::file_source_i8(fname) {
			Ok(src) => Box::new(src),
			Err(e) => { eprintln!("{}", format!("Unable to open {}: {}", fname, e).red()); std::process::exit(1); }
		},
	};

	let mut tlm = TelemetryDecoder::new();
	let mut nav_data:Vec<(String, DecodedSubframe, usize)> = vec![];
	let mut crc_failures:usize = 0;

	for s in symbols {
		match tlm.apply(s) {
			TelemetryDecoderResult::Ok(decoded, sf, start_idx) => {
				eprintln!("  {}", format!("{:8} [sym] {:?} TOW {:9.1} [sec]", start_idx, decoded.word_type(), decoded.time_of_week()).blue());
				nav_data.push((sf.to_hex(), decoded, start_idx));
			},
			TelemetryDecoderResult::Err(e) => {
				crc_failures += 1;
				eprintln!("{}", format!("  {:8} [sym] Error due to {}", s.1, e).red());
			},
			TelemetryDecoderResult::NotReady => {},
		}
	}

	let ephemeris:Ephemeris = *tlm.ephemeris();
	if nav_data.len() > 0 {
		eprintln!("{}", format!("Decoded {} subframes, week {}, TOW {:.1} [sec]", nav_data.len(), ephemeris.week_number, ephemeris.tow).green());
	} else {
		eprintln!("{}", "No subframes decoded".yellow());
	}

	let result = Result{ prn, polarity: tlm.polarity(), crc_failures, nav_data, ephemeris };

	// This is the only output to STDOUT.  This allows you to pipe the results to a JSON file, but still see the status updates through STDERR as the code runs.
	match serde_json::to_string(&result) {
		Ok(s) => println!("{}", s),
		Err(e) => { eprintln!("{}", format!("Unable to serialize results: {}", e).red()); std::process::exit(1); }
	}
}

#[cfg(test)]
mod tests {

	use super::*;

	fn options_from(args:&[&str]) -> std::result::Result<Options, String> {
		let mut argv:Vec<&str> = vec!["irnss_l5s_subframe_decode"];
		argv.extend_from_slice(args);
		let matches = app().get_matches_from_safe(argv).map_err(|e| e.message)?;
		options(&matches)
	}

	#[test]
	fn every_argument_is_parsed() {
		let opts = options_from(&["-f", "syms.bin", "-t", "i16", "--prn", "7"]).unwrap();
		assert_eq!(opts.fname, "syms.bin");
		assert_eq!(opts.input_type, "i16");
		assert_eq!(opts.prn, Some(7));
	}

	#[test]
	fn defaults_apply() {
		let opts = options_from(&["--filename", "syms.bin"]).unwrap();
		assert_eq!(opts.input_type, "i8");
		assert_eq!(opts.prn, None);
	}

	#[test]
	fn bad_values_are_reported() {
		assert!(options_from(&["-f", "syms.bin", "--prn", "seven"]).is_err());
		assert!(options_from(&["-f", "syms.bin", "-t", "f32"]).is_err());
		assert!(options_from(&["--prn", "7"]).is_err());
	}

}
