mod logbook;

pub use logbook::*;
