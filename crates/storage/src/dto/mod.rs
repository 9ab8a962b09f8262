pub mod catalog;

pub use catalog::{NewPrice, NewSku, NewTerm};
