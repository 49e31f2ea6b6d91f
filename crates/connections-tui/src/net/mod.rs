mod client;

pub use client::{server_url, PuzzleRequest};
