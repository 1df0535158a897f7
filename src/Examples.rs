//! examples of usage of RustedODEgen
/// generation, evaluation and rendering of random ODE systems
pub mod generator_examples;
