//! Response models for the upstream API
//!
//! Only the fields the Pokedex commands read are modelled; everything else in
//! the upstream payloads is ignored on decode.

pub mod pokeapi;

// Re-export commonly used types
pub use pokeapi::{
    Encounter, LocationAreaDetail, LocationAreaPage, NamedResource, Pokemon, PokemonStat,
    PokemonType,
};
