mod ids;
mod log_entry;

pub use ids::*;
pub use log_entry::*;
