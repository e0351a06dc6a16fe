pub mod checks;
pub mod config;
pub mod fit;
pub mod harmonic;
pub mod notebook;
pub mod report;
pub mod stats;
