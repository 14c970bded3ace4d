pub mod board;
pub mod controller;
pub mod display_format;
pub mod error;
pub mod game;
pub mod location;
pub mod piece;
pub mod rules;
pub mod search;
pub mod snapshot;
