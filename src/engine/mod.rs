pub mod autoplay;
pub mod grid;
pub mod hex;
pub mod scoring;
pub mod session;
pub mod solver;
pub mod tables;
pub mod target;
