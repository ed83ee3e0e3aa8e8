use glam::DVec2;

use crate::api::config::TrashPlacement;
use crate::api::types::LayoutMode;
use crate::core::scene::Rect;

/// Geometry the trash placement depends on, all in viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct TrashContext {
    pub viewport: DVec2,
    pub trash: Rect,
    pub left_tray: Option<Rect>,
    pub stage: Option<Rect>,
    pub drawer_height: f64,
}

/// Fixed-position top-left corner for the trash icon, rounded to whole pixels.
///
/// Desktop: just right of the left tray, near the viewport bottom.
/// Mobile: left of the stage, aligned with its bottom, kept above the drawer.
/// Returns `None` when the reference element isn't laid out yet.
pub fn place_trash(mode: LayoutMode, ctx: &TrashContext, cfg: &TrashPlacement) -> Option<DVec2> {
    let size = ctx.trash.size();
    match mode {
        LayoutMode::Desktop => {
            let left_tray = ctx.left_tray?;
            Some(DVec2::new(
                (left_tray.max.x + cfg.desktop_gap).round(),
                (ctx.viewport.y - size.y - cfg.desktop_bottom_pad).round(),
            ))
        }
        LayoutMode::Mobile => {
            let stage = ctx.stage?;
            let pad = cfg.mobile_pad;
            let drawer_top = ctx.viewport.y - ctx.drawer_height;
            let max_top = pad.max(drawer_top - size.y - pad);
            let preferred_left = stage.min.x - size.x - cfg.mobile_side_gap;
            let left = pad.max((ctx.viewport.x - size.x - pad).min(preferred_left));
            let desired_top = stage.max.y - size.y - cfg.mobile_bottom_lift;
            let top = max_top.min(pad.max(desired_top));
            Some(DVec2::new(left.round(), top.round()))
        }
    }
}
