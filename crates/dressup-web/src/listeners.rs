use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, MutationObserver, MutationObserverInit, Node, ResizeObserver};

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Every DOM listener and observer the bridge installs, removed together on
/// [`teardown`](ListenerSet::teardown) or drop.
///
/// Observer APIs may be missing in older engines; construction failures are
/// logged and the bridge keeps running on plain listeners.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Listener>,
    resize: Option<(ResizeObserver, Closure<dyn FnMut(JsValue)>)>,
    mutation: Option<(MutationObserver, Closure<dyn FnMut(JsValue)>)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&mut self, target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener {
                target: target.clone(),
                event,
                closure,
            }),
            Err(err) => log::warn!("listeners: could not listen for {event}: {err:?}"),
        }
    }

    /// Watch the boxes of `targets`; `handler` runs once per batch of entries.
    pub fn observe_resize(&mut self, targets: &[Element], mut handler: impl FnMut() + 'static) {
        let closure = Closure::wrap(Box::new(move |_entries: JsValue| handler()) as Box<dyn FnMut(JsValue)>);
        match ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                for target in targets {
                    observer.observe(target);
                }
                self.resize = Some((observer, closure));
            }
            Err(err) => log::warn!("listeners: ResizeObserver unavailable: {err:?}"),
        }
    }

    /// Watch `target`'s subtree for added and removed children.
    pub fn observe_children(&mut self, target: &Node, mut handler: impl FnMut() + 'static) {
        let closure = Closure::wrap(Box::new(move |_records: JsValue| handler()) as Box<dyn FnMut(JsValue)>);
        let observer = match MutationObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::warn!("listeners: MutationObserver unavailable: {err:?}");
                return;
            }
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if let Err(err) = observer.observe_with_options(target, &init) {
            log::warn!("listeners: could not observe children: {err:?}");
            return;
        }
        self.mutation = Some((observer, closure));
    }

    pub fn len(&self) -> usize {
        self.listeners.len() + usize::from(self.resize.is_some()) + usize::from(self.mutation.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener
                .target
                .remove_event_listener_with_callback(listener.event, listener.closure.as_ref().unchecked_ref());
        }
        if let Some((observer, _closure)) = self.resize.take() {
            observer.disconnect();
        }
        if let Some((observer, _closure)) = self.mutation.take() {
            observer.disconnect();
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.teardown();
    }
}
