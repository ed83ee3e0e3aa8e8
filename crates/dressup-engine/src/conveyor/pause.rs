use crate::api::types::LayoutMode;

/// Independent reasons to hold the conveyor belts still.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseFlag {
    LeftHover,
    RightHover,
    /// Finger down inside the mobile drawer.
    DrawerHold,
    /// An item drag is in progress.
    Dragging,
    /// Finger or mouse down on the drawer scrollbar.
    ScrollbarHold,
}

/// Aggregated pause flags, passed into every frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PauseState {
    pub left_hover: bool,
    pub right_hover: bool,
    pub drawer_hold: bool,
    pub dragging: bool,
    pub scrollbar_hold: bool,
}

impl PauseState {
    pub fn set(&mut self, flag: PauseFlag, on: bool) {
        let slot = match flag {
            PauseFlag::LeftHover => &mut self.left_hover,
            PauseFlag::RightHover => &mut self.right_hover,
            PauseFlag::DrawerHold => &mut self.drawer_hold,
            PauseFlag::Dragging => &mut self.dragging,
            PauseFlag::ScrollbarHold => &mut self.scrollbar_hold,
        };
        *slot = on;
    }

    /// Desktop lanes stop on tray hover, the mobile lane on touch holds.
    /// A drag stops everything.
    pub fn is_paused(&self, mode: LayoutMode) -> bool {
        if self.dragging {
            return true;
        }
        match mode {
            LayoutMode::Desktop => self.left_hover || self.right_hover,
            LayoutMode::Mobile => self.drawer_hold || self.scrollbar_hold,
        }
    }

    /// Window-level release: clears every press-originated hold.
    pub fn release_holds(&mut self) {
        self.drawer_hold = false;
        self.scrollbar_hold = false;
    }
}
