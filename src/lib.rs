pub mod advisor;
pub mod game;
pub mod solver;
pub mod wordle;
