pub mod api;
pub mod core;
pub mod conveyor;
pub mod drag;
pub mod input;
pub mod scrollbar;
pub mod stage;

// Re-export key types at crate root for convenience
pub use api::config::{
    ConfigError, ConveyorConfig, LayoutPadding, ScrollbarConfig, SurfaceConfig, TrashPlacement,
};
pub use api::runner::SurfaceRunner;
pub use api::surface::{ClosetGroup, HostEnvironment, ScrollbarNodes, Surface, SurfaceNodes, TrayNodes};
pub use api::types::{Axis, Cue, ItemId, LayoutMode, NodeId, PlacementRecord};
pub use core::scene::{Insert, ItemStyle, Rect, SceneGraph, ScrollMetrics, StageAnchor, Unsupported};
pub use core::time::FrameClock;
pub use conveyor::{ConveyorLane, Direction, LaneRole, PauseFlag, PauseState, TickReport};
pub use drag::{DragEngine, DragState, DraggableItem, DropOutcome, Placement};
pub use input::queue::{InputEvent, InputQueue, Pointer, PointerKind, PointerTarget, TrayRegion};
pub use scrollbar::{ScrollbarBinding, ThumbGeometry};
pub use stage::{place_trash, LayoutMetrics, StageTransform, TrashContext};
