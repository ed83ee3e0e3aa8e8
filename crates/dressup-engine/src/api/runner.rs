use crate::api::surface::Surface;
use crate::api::types::PlacementRecord;
use crate::core::scene::SceneGraph;
use crate::input::queue::{InputEvent, InputQueue};

/// Frame runner that owns the surface and its scene.
///
/// Host callbacks only enqueue events; everything is applied in order at
/// the start of the next [`tick`](Self::tick), so a pointer handler never
/// mutates the scene while a frame is half done.
pub struct SurfaceRunner<S: SceneGraph> {
    surface: Surface,
    scene: S,
    input: InputQueue,
    /// Flat buffer of cue IDs raised during the last tick.
    cue_buffer: Vec<u8>,
    placements: Vec<PlacementRecord>,
    started: bool,
}

impl<S: SceneGraph> SurfaceRunner<S> {
    pub fn new(surface: Surface, scene: S) -> Self {
        Self {
            surface,
            scene,
            input: InputQueue::new(),
            cue_buffer: Vec::with_capacity(8),
            placements: Vec::new(),
            started: false,
        }
    }

    /// Run the first layout pass. Call once after every item is registered.
    pub fn start(&mut self) {
        self.surface.start(&mut self.scene);
        self.started = true;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply queued events, advance the lanes and publish cues and placements.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.started {
            return;
        }
        if !self.input.is_empty() {
            log::trace!("runner: applying {} event(s)", self.input.len());
            for event in self.input.drain() {
                self.surface.handle(&mut self.scene, event);
            }
        }
        self.surface.frame(&mut self.scene, now_ms);

        self.cue_buffer.clear();
        self.cue_buffer.extend(self.surface.take_cues().into_iter().map(|cue| cue as u8));
        self.surface.placements(&mut self.placements);
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access for registration before [`start`](Self::start).
    pub fn surface_mut(&mut self) -> (&mut Surface, &mut S) {
        (&mut self.surface, &mut self.scene)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn cues(&self) -> &[u8] {
        &self.cue_buffer
    }

    pub fn pending_inputs(&self) -> usize {
        self.input.len()
    }

    // ---- Pointer accessors for zero-copy host reads ----

    pub fn cues_ptr(&self) -> *const u8 {
        self.cue_buffer.as_ptr()
    }

    pub fn cues_len(&self) -> u32 {
        self.cue_buffer.len() as u32
    }

    pub fn placements_ptr(&self) -> *const f32 {
        self.placements.as_ptr() as *const f32
    }

    pub fn placements_len(&self) -> u32 {
        (self.placements.len() * PlacementRecord::FLOATS) as u32
    }
}
