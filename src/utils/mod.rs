pub mod constants;
pub mod filename;
pub mod progress;
pub mod rounding;

pub use constants::*;
pub use filename::derived_filename_for;
pub use progress::ProgressReporter;
pub use rounding::{round_2dp, round_half_up, round_to_int};
