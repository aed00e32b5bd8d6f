pub mod config;
pub mod growth;
pub mod run;
pub mod stats;
pub mod timer;
