pub mod engine;
pub mod item;

pub use engine::{ActiveDrag, DragEngine, DragState, DropOutcome, Tracking};
pub use item::{DraggableItem, Placement};
