// Assignment drawing

pub mod generator;

pub use generator::AssignmentGenerator;
