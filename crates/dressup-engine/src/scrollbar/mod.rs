pub mod binding;

pub use binding::{ScrollbarBinding, ThumbGeometry};
