//! Signal processor (§4.2, component B): conversions between waveform,
//! harmonic and processed representations of a periodic electrical signal.

pub mod processor;
pub mod waveform;
