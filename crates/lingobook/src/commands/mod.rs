pub mod build;
pub mod languages;
pub mod serve;
