//! Core analysis engines

pub mod cancel;
pub mod cycles;
pub mod dependents;
pub mod orchestrator;
pub mod parallel;
pub mod preview;
pub mod risk;
pub mod scanner;

pub use cancel::CancelToken;
pub use cycles::{find_cycles, Cycle};
pub use dependents::{dependents, dependents_of_name};
pub use orchestrator::Orchestrator;
pub use preview::PreviewEngine;
pub use risk::assess;
pub use scanner::{ScanOutcome, Scanner};
