pub mod config;
pub mod pet;
pub mod score;
pub mod session;
pub mod sprites;
