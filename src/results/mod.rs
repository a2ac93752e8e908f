//! Result types returned by search engines

mod types;

pub use types::*;
