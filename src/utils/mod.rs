
pub mod bits;
pub mod crc24q;
