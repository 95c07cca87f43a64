
// Frame structure, see IRNSS SPS ICD section 5.  One 600-symbol frame carries one 12-second subframe.
pub const SYMBOL_PERIOD_SEC:f64 = 20.0e-3;
pub const SUBFRAME_PERIOD_SEC:f64 = 12.0;

pub const PREAMBLE_LEN:usize = 16;
pub const CODEWORD_LEN:usize = 584;
pub const FRAME_LEN:usize = PREAMBLE_LEN + CODEWORD_LEN;

// Sync word 0xEB90, transmitted uncoded ahead of each codeword (channel bit 1 is a +1 symbol)
pub const PREAMBLE:[i8; PREAMBLE_LEN] = [1, 1, 1, -1, 1, -1, 1, 1, 1, -1, -1, 1, -1, -1, -1, -1];

pub const INTERLEAVER_ROWS:usize = 73;
pub const INTERLEAVER_COLS:usize = 8;

// Rate 1/2 code: 584 symbols carry 292 bits, the last 6 of which flush the encoder
pub const ENCODED_BITS:usize = CODEWORD_LEN / 2;
pub const TAIL_BITS:usize = 6;
pub const SUBFRAME_BITS:usize = ENCODED_BITS - TAIL_BITS;
pub const SUBFRAME_BYTES:usize = 36;

// CRC covers the 262 data bits; right-aligned these fill 33 bytes
pub const CRC_OFFSET:usize = 262;
pub const CRC_LEN:usize = 24;
pub const CRC_BYTES:usize = 33;

pub mod ephemeris;
pub mod tlm_decode;
