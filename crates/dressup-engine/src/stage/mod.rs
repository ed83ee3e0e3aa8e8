pub mod transform;
pub mod trash;

pub use transform::{LayoutMetrics, StageTransform};
pub use trash::{place_trash, TrashContext};
