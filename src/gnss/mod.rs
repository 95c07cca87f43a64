
/// Telemetry decoding for the IRNSS (NavIC) L5/S SPS navigation message
pub mod irnss_l5s;
