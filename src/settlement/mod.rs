pub mod calculator;
pub mod solver;
