//! The dress-up surface: stage, trays, trash and drawer wired together.
//!
//! Events are routed by [`Surface::handle`]; lanes advance and the drawer
//! scrollbar follows in [`Surface::frame`]. Anything that changes the
//! layout mode or the viewport goes through [`Surface::refresh_layout`],
//! which tears the lanes down and rebuilds them for the active mode.

use glam::DVec2;

use crate::api::config::SurfaceConfig;
use crate::api::types::{Axis, Cue, ItemId, LayoutMode, NodeId, PlacementRecord};
use crate::conveyor::lane::{ConveyorLane, Direction, LaneRole};
use crate::conveyor::pause::{PauseFlag, PauseState};
use crate::core::scene::{Insert, SceneGraph};
use crate::core::time::FrameClock;
use crate::drag::engine::{DragEngine, DropOutcome};
use crate::input::queue::{InputEvent, Pointer, PointerKind, PointerTarget, TrayRegion};
use crate::scrollbar::binding::ScrollbarBinding;
use crate::stage::transform::{LayoutMetrics, StageTransform};
use crate::stage::trash::{place_trash, TrashContext};

/// The drawer: the element that scrolls and the element holding the groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayNodes {
    pub scroller: NodeId,
    pub content: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarNodes {
    pub track: NodeId,
    pub thumb: NodeId,
}

/// A closet group (hats, tops, ...). On desktop it lives in one of the side
/// trays; on mobile every group moves into the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosetGroup {
    pub node: NodeId,
    pub side: TrayRegion,
}

/// Host handles for every part of the surface. Only the stage and its
/// background are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceNodes {
    pub stage: NodeId,
    pub background: NodeId,
    pub trash: Option<NodeId>,
    pub header: Option<NodeId>,
    pub left_tray: Option<NodeId>,
    pub right_tray: Option<NodeId>,
    pub drawer: Option<TrayNodes>,
    pub scrollbar: Option<ScrollbarNodes>,
    /// Groups in the order they are laid out, left tray first.
    pub groups: Vec<ClosetGroup>,
}

impl SurfaceNodes {
    pub fn new(stage: NodeId, background: NodeId) -> Self {
        Self {
            stage,
            background,
            trash: None,
            header: None,
            left_tray: None,
            right_tray: None,
            drawer: None,
            scrollbar: None,
            groups: Vec::new(),
        }
    }
}

/// What the host tells us about the viewport and user preferences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEnvironment {
    pub viewport: DVec2,
    /// Desktop bottom padding provided by the page (a CSS variable in the browser).
    pub stage_bottom_offset: f64,
    /// Result of the host's layout media query, when it has one.
    pub mobile_override: Option<bool>,
    pub reduced_motion: bool,
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            viewport: DVec2::new(1280.0, 800.0),
            stage_bottom_offset: 0.0,
            mobile_override: None,
            reduced_motion: false,
        }
    }
}

pub struct Surface {
    config: SurfaceConfig,
    nodes: SurfaceNodes,
    env: HostEnvironment,
    mode: LayoutMode,
    stage: StageTransform,
    drag: DragEngine,
    pause: PauseState,
    lanes: Vec<ConveyorLane>,
    scrollbar: Option<ScrollbarBinding>,
    clock: FrameClock,
    cues: Vec<Cue>,
}

impl Surface {
    pub fn new(config: SurfaceConfig, nodes: SurfaceNodes, env: HostEnvironment) -> Self {
        let [w, h] = config.fallback_logical_size;
        let stage = StageTransform::new(DVec2::new(w, h));
        let drag = DragEngine::new(nodes.stage, nodes.trash, config.first_z_index);
        let clock = FrameClock::new(config.conveyor.max_dt);
        let scrollbar = match (nodes.scrollbar, nodes.drawer) {
            (Some(bar), Some(drawer)) => Some(ScrollbarBinding::new(
                bar.track,
                bar.thumb,
                drawer.scroller,
                drawer.content,
                config.scrollbar.min_thumb,
            )),
            _ => None,
        };
        let mut surface = Self {
            config,
            nodes,
            env,
            mode: LayoutMode::Desktop,
            stage,
            drag,
            pause: PauseState::default(),
            lanes: Vec::new(),
            scrollbar,
            clock,
            cues: Vec::new(),
        };
        surface.mode = surface.detect_mode();
        surface
    }

    /// First layout pass. Picks up the background size if it's already loaded.
    pub fn start<S: SceneGraph>(&mut self, scene: &mut S) {
        self.stage.measure_background(scene.natural_size(self.nodes.background));
        self.refresh_layout(scene);
        log::info!("surface: started in {:?} layout, scale {:.3}", self.mode, self.stage.scale());
    }

    pub fn register_item<S: SceneGraph>(&mut self, scene: &S, node: NodeId, scale_mult: f64) -> ItemId {
        self.drag.register_item(scene, node, scale_mult)
    }

    pub fn item_for_node(&self, node: NodeId) -> Option<ItemId> {
        self.drag.item_for_node(node)
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn stage(&self) -> &StageTransform {
        &self.stage
    }

    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    pub fn pause(&self) -> &PauseState {
        &self.pause
    }

    pub fn lanes(&self) -> &[ConveyorLane] {
        &self.lanes
    }

    pub fn scrollbar(&self) -> Option<&ScrollbarBinding> {
        self.scrollbar.as_ref()
    }

    /// Cues raised since the last [`Surface::take_cues`].
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn placements(&self, out: &mut Vec<PlacementRecord>) {
        self.drag.placements(out);
    }

    /// Route one input or environment event.
    pub fn handle<S: SceneGraph>(&mut self, scene: &mut S, event: InputEvent) {
        match event {
            InputEvent::PointerDown { target, pointer } => self.pointer_down(scene, target, &pointer),
            InputEvent::PointerMove(pointer) => {
                self.drag.pointer_move(scene, &self.stage, &pointer);
                if let Some(bar) = &mut self.scrollbar {
                    bar.pointer_move(scene, &pointer);
                }
            }
            InputEvent::PointerUp(pointer) => {
                let outcome = self.drag.pointer_up(scene, &pointer);
                self.pointer_released(scene, &pointer, outcome);
            }
            InputEvent::PointerCancel(pointer) => {
                let outcome = self.drag.pointer_cancel(scene, &pointer);
                self.pointer_released(scene, &pointer, outcome);
            }
            InputEvent::HoverEnter(region) => self.pause.set(hover_flag(region), true),
            InputEvent::HoverLeave(region) => self.pause.set(hover_flag(region), false),
            InputEvent::Resize { viewport, stage_bottom_offset } => {
                self.env.viewport = viewport;
                self.env.stage_bottom_offset = stage_bottom_offset;
                self.refresh_layout(scene);
            }
            InputEvent::MediaChange { mobile, reduced_motion } => {
                self.env.mobile_override = mobile;
                self.env.reduced_motion = reduced_motion;
                self.refresh_layout(scene);
            }
            InputEvent::PageShow => self.refresh_layout(scene),
            InputEvent::BackgroundLoaded => {
                if self.stage.measure_background(scene.natural_size(self.nodes.background)) {
                    self.layout_stage(scene);
                }
            }
            InputEvent::LaneScrolled | InputEvent::ContentChanged => self.sync_scrollbar(scene),
        }
        self.pause.set(PauseFlag::Dragging, self.drag.is_dragging());
    }

    /// Advance every running lane, then bring the scrollbar up to date.
    pub fn frame<S: SceneGraph>(&mut self, scene: &mut S, now_ms: f64) {
        let dt = self.clock.advance(now_ms);
        if !self.pause.is_paused(self.mode) {
            for lane in self.lanes.iter_mut().filter(|l| l.role().mode() == self.mode) {
                lane.tick(scene, dt);
            }
        }
        self.sync_scrollbar(scene);
    }

    /// Tear down and rebuild everything that depends on the viewport.
    pub fn refresh_layout<S: SceneGraph>(&mut self, scene: &mut S) {
        self.teardown(scene);
        let mode = self.detect_mode();
        if mode != self.mode {
            log::debug!("surface: layout {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
        self.arrange_groups(scene);
        self.layout_stage(scene);
        self.build_lanes(scene);
        match self.mode {
            LayoutMode::Mobile => self.sync_scrollbar(scene),
            LayoutMode::Desktop => {
                if let Some(bar) = &mut self.scrollbar {
                    bar.hide(scene);
                }
            }
        }
        self.clock.reset();
    }

    /// Stop every lane and drop scrollbar drag state. Drags on items survive.
    pub fn teardown<S: SceneGraph>(&mut self, scene: &mut S) {
        self.lanes.clear();
        if let Some(bar) = &mut self.scrollbar {
            bar.reset(scene);
        }
        self.pause.release_holds();
    }

    /// Full stop for unmount: teardown plus abandoning any item drag.
    pub fn shutdown<S: SceneGraph>(&mut self, scene: &mut S) {
        self.teardown(scene);
        self.drag.reset(scene);
        self.pause = PauseState::default();
    }

    fn detect_mode(&self) -> LayoutMode {
        match self.env.mobile_override {
            Some(true) => LayoutMode::Mobile,
            Some(false) => LayoutMode::Desktop,
            None => LayoutMode::from_viewport(self.env.viewport.x, self.config.mobile_breakpoint),
        }
    }

    fn pointer_down<S: SceneGraph>(&mut self, scene: &mut S, target: PointerTarget, pointer: &Pointer) {
        if pointer.is_primary_press() {
            self.cues.push(Cue::Click);
        }
        let touch_hold = pointer.kind != PointerKind::Mouse && pointer.is_primary;
        match target {
            PointerTarget::Item(id) => {
                let in_drawer = match (self.nodes.drawer, self.drag.item(id)) {
                    (Some(drawer), Some(item)) => scene.contains(drawer.scroller, item.node),
                    _ => false,
                };
                if touch_hold && in_drawer {
                    self.pause.set(PauseFlag::DrawerHold, true);
                }
                self.drag.pointer_down(scene, &self.stage, id, pointer);
            }
            PointerTarget::Drawer => {
                if touch_hold {
                    self.pause.set(PauseFlag::DrawerHold, true);
                }
            }
            PointerTarget::ScrollbarThumb | PointerTarget::ScrollbarTrack => {
                if !self.mode.is_mobile() {
                    return;
                }
                if touch_hold {
                    self.pause.set(PauseFlag::DrawerHold, true);
                }
                let Some(bar) = &mut self.scrollbar else {
                    return;
                };
                let started = if target == PointerTarget::ScrollbarThumb {
                    bar.thumb_down(scene, pointer)
                } else {
                    bar.track_down(scene, pointer)
                };
                if started {
                    self.pause.set(PauseFlag::ScrollbarHold, true);
                }
            }
            PointerTarget::Other => {}
        }
    }

    fn pointer_released<S: SceneGraph>(&mut self, scene: &mut S, pointer: &Pointer, outcome: Option<DropOutcome>) {
        if let Some(DropOutcome::Trashed(_)) = outcome {
            self.cues.push(Cue::Trash);
        }
        if let Some(bar) = &mut self.scrollbar {
            bar.pointer_up(scene, pointer);
        }
        match &self.scrollbar {
            Some(bar) if bar.is_dragging() => self.pause.set(PauseFlag::DrawerHold, false),
            _ => self.pause.release_holds(),
        }
    }

    /// Move closet groups into the drawer on mobile and back to their side
    /// trays on desktop, keeping the configured order.
    fn arrange_groups<S: SceneGraph>(&self, scene: &mut S) {
        for group in &self.nodes.groups {
            let target = match self.mode {
                LayoutMode::Mobile => self.nodes.drawer.map(|d| d.content),
                LayoutMode::Desktop => match group.side {
                    TrayRegion::Left => self.nodes.left_tray,
                    TrayRegion::Right => self.nodes.right_tray,
                },
            };
            if let Some(target) = target {
                scene.reparent(group.node, target, Insert::Last);
            }
        }
    }

    fn measure<S: SceneGraph>(&self, scene: &S) -> LayoutMetrics {
        let width = |node: Option<NodeId>| node.and_then(|n| scene.bounding_box(n)).map_or(0.0, |r| r.width());
        let height = |node: Option<NodeId>| node.and_then(|n| scene.bounding_box(n)).map_or(0.0, |r| r.height());
        LayoutMetrics {
            viewport: self.env.viewport,
            header_height: height(self.nodes.header),
            left_tray_width: width(self.nodes.left_tray),
            right_tray_width: width(self.nodes.right_tray),
            trash_width: width(self.nodes.trash),
            drawer_height: height(self.nodes.drawer.map(|d| d.scroller)),
            stage_bottom_offset: self.env.stage_bottom_offset,
        }
    }

    fn layout_stage<S: SceneGraph>(&mut self, scene: &mut S) {
        let metrics = self.measure(scene);
        let scale = self.stage.recompute(&metrics, self.mode, self.config.padding(self.mode));
        self.stage.apply(scene, self.nodes.stage);
        log::debug!("surface: stage scale {:.4} ({:?})", scale, self.mode);
        self.position_trash(scene, &metrics);
    }

    fn position_trash<S: SceneGraph>(&self, scene: &mut S, metrics: &LayoutMetrics) {
        let Some(trash) = self.nodes.trash else {
            return;
        };
        let Some(trash_box) = scene.bounding_box(trash) else {
            log::debug!("surface: trash not laid out, skipping placement");
            return;
        };
        let ctx = TrashContext {
            viewport: metrics.viewport,
            trash: trash_box,
            left_tray: self.nodes.left_tray.and_then(|n| scene.bounding_box(n)),
            stage: scene.bounding_box(self.nodes.stage),
            drawer_height: metrics.drawer_height,
        };
        if let Some(pos) = place_trash(self.mode, &ctx, &self.config.trash) {
            scene.set_fixed_position(trash, pos);
        }
    }

    fn build_lanes<S: SceneGraph>(&mut self, scene: &S) {
        let speed = self.config.conveyor.speed_for(self.mode, self.env.reduced_motion);
        match self.mode {
            LayoutMode::Desktop => {
                // Left tray drifts top to bottom, right tray bottom to top.
                if let Some(left) = self.nodes.left_tray {
                    self.lanes.push(ConveyorLane::new(
                        scene, LaneRole::Left, left, left, Axis::Vertical, Direction::Reverse, speed,
                    ));
                }
                if let Some(right) = self.nodes.right_tray {
                    self.lanes.push(ConveyorLane::new(
                        scene, LaneRole::Right, right, right, Axis::Vertical, Direction::Forward, speed,
                    ));
                }
            }
            LayoutMode::Mobile => {
                if let Some(drawer) = self.nodes.drawer {
                    self.lanes.push(ConveyorLane::new(
                        scene,
                        LaneRole::Drawer,
                        drawer.scroller,
                        drawer.content,
                        Axis::Horizontal,
                        Direction::Forward,
                        speed,
                    ));
                }
            }
        }
    }

    fn sync_scrollbar<S: SceneGraph>(&mut self, scene: &mut S) {
        if !self.mode.is_mobile() {
            return;
        }
        if let Some(bar) = &mut self.scrollbar {
            bar.sync(scene);
        }
    }
}

fn hover_flag(region: TrayRegion) -> PauseFlag {
    match region {
        TrayRegion::Left => PauseFlag::LeftHover,
        TrayRegion::Right => PauseFlag::RightHover,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::MockScene;
    use crate::core::scene::{Rect, StageAnchor};

    struct Fixture {
        scene: MockScene,
        surface: Surface,
        nodes: SurfaceNodes,
        items: Vec<ItemId>,
    }

    fn pointer(id: i32, kind: PointerKind, x: f64, y: f64) -> Pointer {
        Pointer { id, kind, is_primary: true, button: 0, client: DVec2::new(x, y) }
    }

    fn down(target: PointerTarget, p: Pointer) -> InputEvent {
        InputEvent::PointerDown { target, pointer: p }
    }

    /// Desktop viewport 1280x800. Three 200 px groups on the left, two on the
    /// right; each tray shows 300 px. The drawer shows 300 px of 500 px.
    fn fixture(viewport: DVec2) -> Fixture {
        let mut scene = MockScene::new();
        let stage = scene.add_sized(None, Rect::new(300.0, 40.0, 400.0, 600.0));
        let background = scene.add(Some(stage));
        scene.node_mut(background).natural = Some(DVec2::new(800.0, 1200.0));
        let trash = scene.add_sized(None, Rect::new(0.0, 0.0, 64.0, 80.0));

        let left = scene.add_sized(None, Rect::new(0.0, 0.0, 200.0, 800.0));
        scene.node_mut(left).client = DVec2::new(200.0, 300.0);
        let right = scene.add_sized(None, Rect::new(1080.0, 0.0, 200.0, 800.0));
        scene.node_mut(right).client = DVec2::new(200.0, 300.0);

        let drawer_scroller = scene.add_sized(None, Rect::new(0.0, 680.0, 300.0, 120.0));
        let drawer_content = scene.add(Some(drawer_scroller));
        scene.node_mut(drawer_scroller).client = DVec2::new(300.0, 120.0);
        scene.node_mut(drawer_scroller).content = Some(DVec2::new(500.0, 120.0));

        let track = scene.add_sized(None, Rect::new(0.0, 670.0, 300.0, 8.0));
        let thumb = scene.add(Some(track));

        let mut groups = Vec::new();
        for side in [TrayRegion::Left, TrayRegion::Left, TrayRegion::Left, TrayRegion::Right, TrayRegion::Right] {
            let parent = if side == TrayRegion::Left { left } else { right };
            let node = scene.add_sized(Some(parent), Rect::new(0.0, 0.0, 100.0, 200.0));
            groups.push(ClosetGroup { node, side });
        }

        let nodes = SurfaceNodes {
            trash: Some(trash),
            left_tray: Some(left),
            right_tray: Some(right),
            drawer: Some(TrayNodes { scroller: drawer_scroller, content: drawer_content }),
            scrollbar: Some(ScrollbarNodes { track, thumb }),
            groups,
            ..SurfaceNodes::new(stage, background)
        };
        let env = HostEnvironment { viewport, ..Default::default() };
        let mut surface = Surface::new(SurfaceConfig::default(), nodes.clone(), env);

        let mut items = Vec::new();
        for group in &nodes.groups {
            let item = scene.add_sized(Some(group.node), Rect::new(10.0, 10.0, 80.0, 80.0));
            scene.node_mut(item).natural = Some(DVec2::new(160.0, 160.0));
            items.push(surface.register_item(&scene, item, 1.0));
        }
        surface.start(&mut scene);
        Fixture { scene, surface, nodes, items }
    }

    fn offsets(f: &Fixture) -> Vec<f64> {
        f.surface.lanes().iter().map(|l| l.offset()).collect()
    }

    #[test]
    fn starts_in_desktop_with_two_lanes() {
        let f = fixture(DVec2::new(1280.0, 800.0));
        assert_eq!(f.surface.mode(), LayoutMode::Desktop);
        let roles: Vec<LaneRole> = f.surface.lanes().iter().map(|l| l.role()).collect();
        assert_eq!(roles, vec![LaneRole::Left, LaneRole::Right]);
        assert_eq!(f.scene.logical_size, Some(DVec2::new(800.0, 1200.0)));
        assert_eq!(f.scene.transforms.last().map(|t| t.1), Some(StageAnchor::CenterX));
        assert!(!f.scene.node(f.nodes.scrollbar.unwrap().track).visible);
        assert!(f.scene.node(f.nodes.trash.unwrap()).fixed_pos.is_some());
    }

    #[test]
    fn lanes_advance_with_clamped_dt() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        f.surface.frame(&mut f.scene, 1000.0);
        f.surface.frame(&mut f.scene, 2000.0);
        // Right lane runs forward; one second clamps to 0.05 s at 30 px/s.
        assert!((offsets(&f)[1] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn dragging_freezes_every_lane() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        f.surface.frame(&mut f.scene, 0.0);
        let before = offsets(&f);

        let item = f.items[4];
        f.surface.handle(&mut f.scene, down(PointerTarget::Item(item), pointer(1, PointerKind::Mouse, 20.0, 20.0)));
        assert!(f.surface.pause().dragging);
        f.surface.frame(&mut f.scene, 50.0);
        f.surface.frame(&mut f.scene, 100.0);
        assert_eq!(offsets(&f), before);

        f.surface.handle(&mut f.scene, InputEvent::PointerUp(pointer(1, PointerKind::Mouse, 500.0, 300.0)));
        assert!(!f.surface.pause().dragging);
        f.surface.frame(&mut f.scene, 150.0);
        assert_ne!(offsets(&f)[1], before[1]);
    }

    #[test]
    fn drag_survives_resize_and_follows_new_scale() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        let item = f.items[4];
        let node = f.surface.drag().item(item).map(|i| i.node).unwrap();
        f.surface.handle(&mut f.scene, down(PointerTarget::Item(item), pointer(1, PointerKind::Mouse, 20.0, 20.0)));
        let before = f.surface.stage().scale();

        f.surface.handle(&mut f.scene, InputEvent::Resize { viewport: DVec2::new(1100.0, 700.0), stage_bottom_offset: 0.0 });
        let after = f.surface.stage().scale();
        assert!((after - before).abs() > 1e-3);
        assert!(f.surface.drag().is_dragging());
        assert!(f.surface.pause().dragging);
        assert_eq!(f.scene.parent(node), Some(f.nodes.stage));

        f.surface.handle(&mut f.scene, InputEvent::PointerMove(pointer(1, PointerKind::Mouse, 500.0, 300.0)));
        let a = f.scene.node(node).style.unwrap().pos;
        f.surface.handle(&mut f.scene, InputEvent::PointerMove(pointer(1, PointerKind::Mouse, 530.0, 276.0)));
        let b = f.scene.node(node).style.unwrap().pos;
        assert!((b - a - DVec2::new(30.0, -24.0) / after).length() < 1e-9);
    }

    #[test]
    fn shutdown_abandons_drag_and_lanes() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        let item = f.items[4];
        f.surface.handle(&mut f.scene, down(PointerTarget::Item(item), pointer(1, PointerKind::Mouse, 20.0, 20.0)));
        assert!(f.surface.drag().is_dragging());

        f.surface.shutdown(&mut f.scene);
        assert!(!f.surface.drag().is_dragging());
        assert!(f.surface.lanes().is_empty());
        assert_eq!(*f.surface.pause(), PauseState::default());
    }

    #[test]
    fn hover_freezes_desktop_lanes() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        f.surface.frame(&mut f.scene, 0.0);
        f.surface.handle(&mut f.scene, InputEvent::HoverEnter(TrayRegion::Right));
        let before = offsets(&f);
        f.surface.frame(&mut f.scene, 50.0);
        assert_eq!(offsets(&f), before);
        f.surface.handle(&mut f.scene, InputEvent::HoverLeave(TrayRegion::Right));
        f.surface.frame(&mut f.scene, 100.0);
        assert_ne!(offsets(&f), before);
    }

    #[test]
    fn narrow_resize_switches_to_drawer() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        f.surface.handle(
            &mut f.scene,
            InputEvent::Resize { viewport: DVec2::new(390.0, 800.0), stage_bottom_offset: 0.0 },
        );
        assert_eq!(f.surface.mode(), LayoutMode::Mobile);
        let drawer = f.nodes.drawer.unwrap();
        let groups: Vec<NodeId> = f.nodes.groups.iter().map(|g| g.node).collect();
        assert_eq!(f.scene.children(drawer.content), groups);
        assert_eq!(f.surface.lanes().len(), 1);
        assert_eq!(f.surface.lanes()[0].role(), LaneRole::Drawer);
        assert!(f.scene.node(f.nodes.scrollbar.unwrap().track).visible);
        assert_eq!(f.scene.transforms.last().map(|t| t.1), Some(StageAnchor::Center));

        f.surface.handle(
            &mut f.scene,
            InputEvent::Resize { viewport: DVec2::new(1280.0, 800.0), stage_bottom_offset: 0.0 },
        );
        assert_eq!(f.surface.mode(), LayoutMode::Desktop);
        assert_eq!(f.scene.children(f.nodes.left_tray.unwrap()), groups[..3].to_vec());
        assert_eq!(f.scene.children(f.nodes.right_tray.unwrap()), groups[3..].to_vec());
        assert!(!f.scene.node(f.nodes.scrollbar.unwrap().track).visible);
    }

    #[test]
    fn media_query_overrides_width() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        f.surface.handle(&mut f.scene, InputEvent::MediaChange { mobile: Some(true), reduced_motion: true });
        assert_eq!(f.surface.mode(), LayoutMode::Mobile);
        assert!((f.surface.lanes()[0].speed() - 22.0 * 0.55).abs() < 1e-12);
    }

    #[test]
    fn touch_in_drawer_holds_mobile_lane_until_release() {
        let mut f = fixture(DVec2::new(390.0, 800.0));
        f.surface.frame(&mut f.scene, 0.0);
        f.surface.handle(&mut f.scene, down(PointerTarget::Drawer, pointer(2, PointerKind::Touch, 50.0, 700.0)));
        assert!(f.surface.pause().is_paused(LayoutMode::Mobile));
        let before = offsets(&f);
        f.surface.frame(&mut f.scene, 50.0);
        assert_eq!(offsets(&f), before);

        f.surface.handle(&mut f.scene, InputEvent::PointerUp(pointer(2, PointerKind::Touch, 50.0, 700.0)));
        assert!(!f.surface.pause().is_paused(LayoutMode::Mobile));
        f.surface.frame(&mut f.scene, 100.0);
        assert_ne!(offsets(&f), before);
    }

    #[test]
    fn mouse_in_drawer_does_not_hold() {
        let mut f = fixture(DVec2::new(390.0, 800.0));
        f.surface.handle(&mut f.scene, down(PointerTarget::Drawer, pointer(1, PointerKind::Mouse, 50.0, 700.0)));
        assert!(!f.surface.pause().is_paused(LayoutMode::Mobile));
    }

    #[test]
    fn thumb_drag_holds_lane_and_scrolls() {
        let mut f = fixture(DVec2::new(390.0, 800.0));
        let drawer = f.nodes.drawer.unwrap();
        f.surface.handle(&mut f.scene, down(PointerTarget::ScrollbarThumb, pointer(3, PointerKind::Mouse, 10.0, 672.0)));
        assert!(f.surface.pause().scrollbar_hold);
        f.surface.handle(&mut f.scene, InputEvent::PointerMove(pointer(3, PointerKind::Mouse, 40.0, 672.0)));
        assert!(f.scene.node(drawer.scroller).scroll.x > 0.0);
        f.surface.handle(&mut f.scene, InputEvent::PointerUp(pointer(3, PointerKind::Mouse, 40.0, 672.0)));
        assert!(!f.surface.pause().scrollbar_hold);
    }

    #[test]
    fn trash_drop_raises_click_and_trash_cues() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        let item = f.items[0];
        let home = f.surface.drag().item(item).and_then(|i| i.home);
        f.surface.handle(&mut f.scene, down(PointerTarget::Item(item), pointer(1, PointerKind::Mouse, 20.0, 20.0)));
        f.surface.handle(&mut f.scene, InputEvent::PointerUp(pointer(1, PointerKind::Mouse, 30.0, 30.0)));
        assert_eq!(f.surface.cues(), &[Cue::Click, Cue::Trash]);
        let node = f.surface.drag().item(item).map(|i| i.node).unwrap();
        assert_eq!(f.scene.parent(node), home);
        assert_eq!(f.surface.take_cues().len(), 2);
        assert!(f.surface.cues().is_empty());
    }

    #[test]
    fn right_button_gives_no_click_cue() {
        let mut f = fixture(DVec2::new(1280.0, 800.0));
        let mut p = pointer(1, PointerKind::Mouse, 5.0, 5.0);
        p.button = 2;
        f.surface.handle(&mut f.scene, down(PointerTarget::Other, p));
        assert!(f.surface.cues().is_empty());
    }

    #[test]
    fn background_load_fixes_logical_size() {
        let mut scene = MockScene::new();
        let stage = scene.add_sized(None, Rect::new(0.0, 0.0, 400.0, 600.0));
        let background = scene.add(Some(stage));
        let nodes = SurfaceNodes::new(stage, background);
        let mut surface = Surface::new(SurfaceConfig::default(), nodes, HostEnvironment::default());
        surface.start(&mut scene);
        assert!(!surface.stage().is_measured());
        assert_eq!(scene.logical_size, None);

        scene.node_mut(background).natural = Some(DVec2::new(1000.0, 1000.0));
        surface.handle(&mut scene, InputEvent::BackgroundLoaded);
        assert_eq!(surface.stage().logical_size(), DVec2::new(1000.0, 1000.0));
        assert_eq!(scene.logical_size, Some(DVec2::new(1000.0, 1000.0)));
    }
}
