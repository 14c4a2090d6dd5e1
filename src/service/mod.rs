mod benchmark;
mod dbms;
pub mod simulated;

pub use benchmark::{Benchmark, BenchmarkStats};
pub use dbms::Dbms;
pub use simulated::{load_model, SimulatedBenchmark, SimulatedDbms, SimulationModel};
