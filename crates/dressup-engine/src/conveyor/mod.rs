pub mod lane;
pub mod pause;

pub use lane::{ConveyorLane, Direction, LaneRole, TickReport};
pub use pause::{PauseFlag, PauseState};
