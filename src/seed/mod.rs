//! Out-of-band import of planets and characters from the public SWAPI catalog.

pub mod services;
pub mod swapi;

pub use services::{run, SeedReport};
pub use swapi::SwapiClient;
