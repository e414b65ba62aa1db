pub mod note;
pub mod patient;

pub use note::*;
pub use patient::*;
