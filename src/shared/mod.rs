pub mod colors;
pub mod names;
