use std::cell::RefCell;

use dressup_engine::{Axis, Insert, ItemStyle, NodeId, Rect, SceneGraph, ScrollMetrics, StageAnchor, Unsupported};
use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlImageElement, Window};

/// Class toggled on the trash icon while a dragged item hovers it.
const ARMED_CLASS: &str = "is-active";

/// [`SceneGraph`] over live DOM elements.
///
/// Elements are registered lazily: any element the engine sees (as a child
/// or parent of a known node) gets the next free [`NodeId`].
pub struct DomScene {
    window: Window,
    nodes: RefCell<Vec<HtmlElement>>,
}

impl DomScene {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            nodes: RefCell::new(Vec::new()),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Id for `el`, registering it on first sight.
    pub fn register(&self, el: HtmlElement) -> NodeId {
        if let Some(id) = self.find(el.as_ref()) {
            return id;
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(el);
        NodeId(nodes.len() as u32 - 1)
    }

    /// Id of an already registered element.
    pub fn find(&self, target: &JsValue) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| {
                let v: &JsValue = n.as_ref();
                v == target
            })
            .map(|i| NodeId(i as u32))
    }

    pub fn element(&self, id: NodeId) -> Option<HtmlElement> {
        self.nodes.borrow().get(id.0 as usize).cloned()
    }

    fn id_of(&self, el: Element) -> Option<NodeId> {
        el.dyn_into::<HtmlElement>().ok().map(|el| self.register(el))
    }

    fn with_el<R>(&self, id: NodeId, f: impl FnOnce(&HtmlElement) -> R) -> Option<R> {
        let nodes = self.nodes.borrow();
        nodes.get(id.0 as usize).map(f)
    }
}

fn px(v: f64) -> String {
    format!("{v}px")
}

fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    if let Err(err) = el.style().set_property(prop, value) {
        log::warn!("dom: could not set {prop}: {err:?}");
    }
}

fn clear_style(el: &HtmlElement, prop: &str) {
    let _ = el.style().remove_property(prop);
}

/// Parse a computed pixel length such as `"12px"`; `normal` and junk give 0.
pub(crate) fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn scroll_key(axis: Axis) -> &'static str {
    match axis {
        Axis::Horizontal => "scrollLeft",
        Axis::Vertical => "scrollTop",
    }
}

/// `scrollTop`/`scrollLeft` through the property rather than the integer
/// web-sys getters, so fractional offsets written by a lane read back intact.
fn read_scroll_offset(el: &HtmlElement, axis: Axis) -> f64 {
    js_sys::Reflect::get(el, &JsValue::from_str(scroll_key(axis)))
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

impl SceneGraph for DomScene {
    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        self.with_el(node, |el| {
            let r = el.get_bounding_client_rect();
            Rect::new(r.x(), r.y(), r.width(), r.height())
        })
    }

    fn natural_size(&self, node: NodeId) -> Option<DVec2> {
        self.with_el(node, |el| {
            let img = el.dyn_ref::<HtmlImageElement>()?;
            if !img.complete() || img.natural_width() == 0 {
                return None;
            }
            Some(DVec2::new(f64::from(img.natural_width()), f64::from(img.natural_height())))
        })
        .flatten()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.with_el(node, |el| el.parent_element()).flatten()?;
        self.id_of(parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Some(children) = self.with_el(node, |el| el.children()) else {
            return Vec::new();
        };
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|child| self.id_of(child))
            .collect()
    }

    fn reparent(&mut self, node: NodeId, parent: NodeId, at: Insert) {
        let (Some(child), Some(parent)) = (self.element(node), self.element(parent)) else {
            return;
        };
        let result = match at {
            Insert::Last => parent.append_child(&child),
            Insert::First => parent.insert_before(&child, parent.first_child().as_ref()),
        };
        if let Err(err) = result {
            log::warn!("dom: reparent failed: {err:?}");
        }
    }

    fn set_logical_size(&mut self, stage: NodeId, size: DVec2) {
        self.with_el(stage, |el| {
            set_style(el, "width", &px(size.x));
            set_style(el, "height", &px(size.y));
        });
    }

    fn set_transform(&mut self, stage: NodeId, scale: f64, anchor: StageAnchor) {
        let transform = match anchor {
            StageAnchor::CenterX => format!("translateX(-50%) scale({scale})"),
            StageAnchor::Center => format!("translate(-50%, -50%) scale({scale})"),
        };
        self.with_el(stage, |el| {
            set_style(el, "transform", &transform);
            let _ = el.set_attribute("data-scale", &scale.to_string());
        });
    }

    fn set_item_style(&mut self, node: NodeId, style: &ItemStyle) {
        self.with_el(node, |el| {
            set_style(el, "position", "absolute");
            set_style(el, "left", &px(style.pos.x));
            set_style(el, "top", &px(style.pos.y));
            set_style(el, "width", &px(style.size.x));
            set_style(el, "height", &px(style.size.y));
            set_style(el, "z-index", &style.z_index.to_string());
        });
    }

    fn clear_item_style(&mut self, node: NodeId) {
        self.with_el(node, |el| {
            for prop in ["position", "left", "top", "right", "bottom", "margin", "width", "height", "z-index"] {
                clear_style(el, prop);
            }
        });
    }

    fn set_fixed_position(&mut self, node: NodeId, pos: DVec2) {
        self.with_el(node, |el| {
            set_style(el, "position", "fixed");
            set_style(el, "left", &px(pos.x));
            set_style(el, "top", &px(pos.y));
        });
    }

    fn set_armed(&mut self, node: NodeId, armed: bool) {
        self.with_el(node, |el| {
            let _ = el.class_list().toggle_with_force(ARMED_CLASS, armed);
        });
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.with_el(node, |el| set_style(el, "display", if visible { "block" } else { "none" }));
    }

    fn scroll_metrics(&self, node: NodeId, axis: Axis) -> Option<ScrollMetrics> {
        self.with_el(node, |el| {
            let (client_extent, scroll_extent) = match axis {
                Axis::Horizontal => (el.client_width(), el.scroll_width()),
                Axis::Vertical => (el.client_height(), el.scroll_height()),
            };
            ScrollMetrics {
                offset: read_scroll_offset(el, axis),
                client_extent: f64::from(client_extent),
                scroll_extent: f64::from(scroll_extent),
            }
        })
    }

    fn set_scroll_offset(&mut self, node: NodeId, axis: Axis, offset: f64) {
        self.with_el(node, |el| {
            let _ = js_sys::Reflect::set(el, &JsValue::from_str(scroll_key(axis)), &JsValue::from_f64(offset));
        });
    }

    fn gap(&self, node: NodeId, axis: Axis) -> f64 {
        let prop = match axis {
            Axis::Horizontal => "column-gap",
            Axis::Vertical => "row-gap",
        };
        self.with_el(node, |el| {
            self.window
                .get_computed_style(el)
                .ok()
                .flatten()
                .and_then(|cs| cs.get_property_value(prop).ok())
                .map_or(0.0, |v| parse_px(&v))
        })
        .unwrap_or(0.0)
    }

    fn place_thumb(&mut self, thumb: NodeId, offset: f64, width: f64) {
        self.with_el(thumb, |el| {
            set_style(el, "width", &px(width));
            set_style(el, "left", &px(offset));
        });
    }

    fn set_pointer_capture(&mut self, node: NodeId, pointer_id: i32) -> Result<(), Unsupported> {
        self.with_el(node, |el| el.set_pointer_capture(pointer_id).map_err(|_| Unsupported))
            .unwrap_or(Err(Unsupported))
    }

    fn release_pointer_capture(&mut self, node: NodeId, pointer_id: i32) -> Result<(), Unsupported> {
        self.with_el(node, |el| el.release_pointer_capture(pointer_id).map_err(|_| Unsupported))
            .unwrap_or(Err(Unsupported))
    }
}
