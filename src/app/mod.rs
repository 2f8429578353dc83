pub mod bootstrap;
pub mod report;

pub use bootstrap::{bootstrap, run, strip_line_ending};
pub use report::{OutputFormat, SentimentReport};
