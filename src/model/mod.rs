//! The data model (§3): the plain, validated structs every other module
//! reads and writes.

pub mod bobbin;
pub mod bounded_value;
pub mod coil;
pub mod core;
pub mod insulation_spec;
pub mod magnetic;
pub mod mas;
pub mod requirement;
pub mod wire;
