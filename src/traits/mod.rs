pub mod runner;

pub use runner::StageRunner;
