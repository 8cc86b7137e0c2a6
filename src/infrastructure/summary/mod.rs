//! Summary infrastructure - article preprocessing

mod markdown;

pub use markdown::flatten_markdown;
