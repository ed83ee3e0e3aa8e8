use dressup_engine::{
    ClosetGroup, HostEnvironment, InputEvent, NodeId, Pointer, PointerKind, PointerTarget, ScrollbarNodes,
    SceneGraph, Surface, SurfaceConfig, SurfaceNodes, SurfaceRunner, TrayNodes, TrayRegion,
};
use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, PointerEvent, Window};

use crate::dom::{parse_px, DomScene};
use crate::listeners::ListenerSet;
use crate::with_runner;

/// Closet groups in layout order, with the side tray each one lives in on desktop.
const GROUPS: [(&str, TrayRegion); 5] = [
    ("group-hats", TrayRegion::Left),
    ("group-tops", TrayRegion::Left),
    ("group-socks", TrayRegion::Left),
    ("group-fullbody", TrayRegion::Right),
    ("group-bottoms", TrayRegion::Right),
];

/// Nodes pointer-downs are classified against, besides registered items.
#[derive(Debug, Clone, Copy, Default)]
struct HitTargets {
    drawer: Option<NodeId>,
    track: Option<NodeId>,
    thumb: Option<NodeId>,
}

/// The mounted surface: engine runner over the live DOM plus every
/// listener feeding it.
pub struct WebRunner {
    runner: SurfaceRunner<DomScene>,
    listeners: ListenerSet,
    /// `load`/`error` on drawer images; rebuilt whenever the drawer's children change.
    image_listeners: ListenerSet,
    nodes: SurfaceNodes,
    hits: HitTargets,
    mobile_query: String,
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document.get_element_by_id(id).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn pointer_from(ev: &PointerEvent) -> Pointer {
    Pointer {
        id: ev.pointer_id(),
        kind: PointerKind::from_dom(&ev.pointer_type()),
        is_primary: ev.is_primary(),
        button: ev.button(),
        client: DVec2::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
    }
}

fn media_matches(window: &Window, query: &str) -> Option<bool> {
    window.match_media(query).ok().flatten().map(|mq| mq.matches())
}

/// Viewport, CSS bottom offset and media-query state as the page sees them now.
fn read_environment(window: &Window, mobile_query: &str) -> HostEnvironment {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let stage_bottom_offset = window
        .document()
        .and_then(|d| d.document_element())
        .and_then(|root| window.get_computed_style(&root).ok().flatten())
        .and_then(|cs| cs.get_property_value("--stage-bottom-offset").ok())
        .map_or(0.0, |v| parse_px(&v));
    HostEnvironment {
        viewport: DVec2::new(size(window.inner_width()), size(window.inner_height())),
        stage_bottom_offset,
        mobile_override: media_matches(window, mobile_query),
        reduced_motion: media_matches(window, "(prefers-reduced-motion: reduce)").unwrap_or(false),
    }
}

impl WebRunner {
    /// Find the page's elements, register every `.draggable` item and run
    /// the first layout pass. Only `#stage` and `#model` are required.
    pub fn mount(window: Window, config: SurfaceConfig) -> Result<Self, JsValue> {
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let stage = by_id(&document, "stage").ok_or_else(|| JsValue::from_str("missing #stage"))?;
        let model = by_id(&document, "model").ok_or_else(|| JsValue::from_str("missing #model"))?;

        let scene = DomScene::new(window.clone());
        let id = |id: &str| by_id(&document, id).map(|el| scene.register(el));
        let header = document
            .query_selector("header")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| scene.register(el));
        let drawer = match (id("closet-drawer"), id("closet-drawer-content")) {
            (Some(scroller), Some(content)) => Some(TrayNodes { scroller, content }),
            _ => None,
        };
        let scrollbar = match (id("drawer-scrollbar"), id("drawer-scrollbar-thumb")) {
            (Some(track), Some(thumb)) => Some(ScrollbarNodes { track, thumb }),
            _ => None,
        };
        let groups = GROUPS
            .iter()
            .filter_map(|(name, side)| id(name).map(|node| ClosetGroup { node, side: *side }))
            .collect();
        let nodes = SurfaceNodes {
            trash: id("trashcan"),
            header,
            left_tray: id("items-left"),
            right_tray: id("items-right"),
            drawer,
            scrollbar,
            groups,
            ..SurfaceNodes::new(scene.register(stage), scene.register(model))
        };
        let hits = HitTargets {
            drawer: drawer.map(|d| d.scroller),
            track: scrollbar.map(|s| s.track),
            thumb: scrollbar.map(|s| s.thumb),
        };

        let mobile_query = format!("(max-width: {}px)", config.mobile_breakpoint);
        let env = read_environment(&window, &mobile_query);
        let surface = Surface::new(config, nodes.clone(), env);
        let mut runner = SurfaceRunner::new(surface, scene);

        let items = document.query_selector_all(".draggable")?;
        let (surface, scene) = runner.surface_mut();
        for i in 0..items.length() {
            let Some(el) = items.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let scale = el
                .get_attribute("data-scale")
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(1.0);
            let node = scene.register(el);
            surface.register_item(scene, node, scale);
        }
        log::info!("dressup: {} item(s) registered", items.length());

        runner.start();
        Ok(Self {
            runner,
            listeners: ListenerSet::new(),
            image_listeners: ListenerSet::new(),
            nodes,
            hits,
            mobile_query,
        })
    }

    pub fn push(&mut self, event: InputEvent) {
        self.runner.push_input(event);
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.runner.tick(now_ms);
    }

    pub fn runner(&self) -> &SurfaceRunner<DomScene> {
        &self.runner
    }

    /// Walk up from the event target to the nearest node the surface cares about.
    fn classify(&self, target: Option<EventTarget>) -> PointerTarget {
        let scene = self.runner.scene();
        let mut current = target.and_then(|t| t.dyn_into::<Element>().ok());
        while let Some(el) = current {
            if let Some(id) = scene.find(el.as_ref()) {
                if let Some(item) = self.runner.surface().item_for_node(id) {
                    return PointerTarget::Item(item);
                }
                if Some(id) == self.hits.thumb {
                    return PointerTarget::ScrollbarThumb;
                }
                if Some(id) == self.hits.track {
                    return PointerTarget::ScrollbarTrack;
                }
                if Some(id) == self.hits.drawer {
                    return PointerTarget::Drawer;
                }
            }
            current = el.parent_element();
        }
        PointerTarget::Other
    }

    fn target(&self, node: Option<NodeId>) -> Option<EventTarget> {
        node.and_then(|n| self.runner.scene().element(n)).map(EventTarget::from)
    }

    /// Wire DOM events into the input queue. Call once the runner is mounted;
    /// handlers reach it through the thread-local slot.
    pub fn install_listeners(&mut self) {
        let window = self.runner.scene().window().clone();
        let mut listeners = ListenerSet::new();

        if let Some(document) = window.document() {
            listeners.listen(&document, "pointerdown", |ev: Event| {
                let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let pointer = pointer_from(ev);
                with_runner(|r| {
                    let target = r.classify(ev.target());
                    if !matches!(target, PointerTarget::Other | PointerTarget::Drawer) {
                        ev.prevent_default();
                    }
                    r.push(InputEvent::PointerDown { target, pointer });
                });
            });
        }

        let pointer_events: [(&'static str, fn(Pointer) -> InputEvent); 3] = [
            ("pointermove", InputEvent::PointerMove),
            ("pointerup", InputEvent::PointerUp),
            ("pointercancel", InputEvent::PointerCancel),
        ];
        for (name, wrap) in pointer_events {
            listeners.listen(&window, name, move |ev: Event| {
                if let Some(ev) = ev.dyn_ref::<PointerEvent>() {
                    let pointer = pointer_from(ev);
                    with_runner(|r| r.push(wrap(pointer)));
                }
            });
        }

        for (node, region) in [(self.nodes.left_tray, TrayRegion::Left), (self.nodes.right_tray, TrayRegion::Right)] {
            if let Some(tray) = self.target(node) {
                listeners.listen(&tray, "mouseenter", move |_| {
                    with_runner(|r| r.push(InputEvent::HoverEnter(region)));
                });
                listeners.listen(&tray, "mouseleave", move |_| {
                    with_runner(|r| r.push(InputEvent::HoverLeave(region)));
                });
            }
        }

        let env_window = window.clone();
        let mobile_query = self.mobile_query.clone();
        listeners.listen(&window, "resize", move |_| {
            let env = read_environment(&env_window, &mobile_query);
            with_runner(|r| {
                r.push(InputEvent::Resize { viewport: env.viewport, stage_bottom_offset: env.stage_bottom_offset })
            });
        });
        listeners.listen(&window, "pageshow", |_| {
            with_runner(|r| r.push(InputEvent::PageShow));
        });

        for query in [self.mobile_query.as_str(), "(prefers-reduced-motion: reduce)"] {
            let Some(mq) = window.match_media(query).ok().flatten() else {
                continue;
            };
            let env_window = window.clone();
            let mobile_query = self.mobile_query.clone();
            listeners.listen(&mq, "change", move |_| {
                let env = read_environment(&env_window, &mobile_query);
                with_runner(|r| {
                    r.push(InputEvent::MediaChange { mobile: env.mobile_override, reduced_motion: env.reduced_motion })
                });
            });
        }

        if let Some(model) = self.target(Some(self.nodes.background)) {
            listeners.listen(&model, "load", |_| {
                with_runner(|r| r.push(InputEvent::BackgroundLoaded));
            });
        }

        if let Some(drawer) = self.nodes.drawer {
            if let Some(scroller) = self.target(Some(drawer.scroller)) {
                listeners.listen(&scroller, "scroll", |_| {
                    with_runner(|r| r.push(InputEvent::LaneScrolled));
                });
            }
            self.watch_drawer_content(&mut listeners, drawer);
        }

        self.listeners.teardown();
        self.listeners = listeners;
        log::debug!("dressup: {} listener(s) installed", self.listeners.len());
    }

    /// Keep the scrollbar honest while drawer images load and groups move.
    fn watch_drawer_content(&mut self, listeners: &mut ListenerSet, drawer: TrayNodes) {
        self.bind_image_loads();
        let scene = self.runner.scene();
        let Some(content) = scene.element(drawer.content) else {
            return;
        };

        let mut observed: Vec<Element> = vec![content.clone().into()];
        observed.extend(scene.element(drawer.scroller).map(Element::from));
        observed.extend(self.hits.track.and_then(|t| scene.element(t)).map(Element::from));
        listeners.observe_resize(&observed, || {
            with_runner(|r| r.push(InputEvent::ContentChanged));
        });
        listeners.observe_children(&content, || {
            with_runner(|r| {
                r.bind_image_loads();
                r.push(InputEvent::ContentChanged);
            });
        });
    }

    /// Listen for `load`/`error` on every image currently inside the drawer.
    fn bind_image_loads(&mut self) {
        self.image_listeners.teardown();
        let Some(content) = self.nodes.drawer.and_then(|d| self.runner.scene().element(d.content)) else {
            return;
        };
        let Ok(images) = content.query_selector_all("img") else {
            return;
        };
        for i in 0..images.length() {
            let Some(img) = images.item(i) else {
                continue;
            };
            let img = EventTarget::from(JsValue::from(img));
            for event in ["load", "error"] {
                self.image_listeners.listen(&img, event, |_| {
                    with_runner(|r| r.push(InputEvent::ContentChanged));
                });
            }
        }
        log::trace!("dressup: watching {} drawer image(s)", images.length());
    }

    pub fn teardown(&mut self) {
        self.listeners.teardown();
        self.image_listeners.teardown();
        let (surface, scene) = self.runner.surface_mut();
        surface.shutdown(scene);
        let track = self.nodes.scrollbar.map(|s| s.track);
        if let Some(track) = track {
            scene.set_visible(track, false);
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    use crate::{surface_destroy, surface_init, with_runner};

    wasm_bindgen_test_configure!(run_in_browser);

    /// Let pending observer callbacks run.
    async fn next_task(window: &web_sys::Window) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0);
        });
        let _ = JsFuture::from(promise).await;
    }

    #[wasm_bindgen_test(async)]
    async fn images_added_to_drawer_are_watched() {
        let window = web_sys::window().expect("window");
        let document = window.document().expect("document");
        let body = document.body().expect("body");
        body.set_inner_html(
            r#"<div id="stage"><img id="model"></div>
               <div id="closet-drawer"><div id="closet-drawer-content"></div></div>"#,
        );
        surface_init("{}").expect("mount");
        assert_eq!(with_runner(|r| r.image_listeners.len()), Some(0));

        let content = document.get_element_by_id("closet-drawer-content").expect("drawer content");
        let group = document.create_element("div").expect("group");
        group.set_inner_html(r#"<img class="draggable"><img class="draggable">"#);
        content.append_child(&group).expect("append");
        next_task(&window).await;

        // load + error on each new image.
        assert_eq!(with_runner(|r| r.image_listeners.len()), Some(4));
        surface_destroy();
        body.set_inner_html("");
    }
}
