pub mod error;
pub mod opts;

mod dump;
mod generate;
mod input;
mod model;

pub use dump::{dump, write_dump};
pub use generate::{sample, sweep, write_sample, Draw};
pub use input::read_text;
pub use model::{Model, Row};
