mod expense;
mod summary;

pub use expense::*;
pub use summary::*;
