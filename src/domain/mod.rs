pub mod channel;
pub mod outcome;

pub use channel::{Channel, Directive, Enclosure, Item};
pub use outcome::{outcome_header, FetchSummary, Outcome};
