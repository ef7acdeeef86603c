//! Per-frame callbacks from the host.
//!
//! The host drives the addon by ticking a [`FrameClock`] once per rendered
//! frame. Listeners are attached by name and run in attach order. The clock
//! records how long each listener took in [`FrameDiagnostics`].
//!
//! Everything here is single-threaded: listeners are shared as
//! `Rc<RefCell<dyn FrameListener>>` and the addon keeps its own handle so it
//! can keep using the listener between frames.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use dobj_host::math::Vec2;

// ---------------------------------------------------------------------------
// FrameInfo
// ---------------------------------------------------------------------------

/// What the host knows about the frame being produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frames ticked before this one.
    pub frame: u64,
    /// Size of the main viewport in screen units.
    pub viewport: Vec2,
}

/// Something the host calls once per frame.
pub trait FrameListener {
    fn on_frame(&mut self, frame: &FrameInfo);
}

/// Handle returned by [`FrameClock::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

// ---------------------------------------------------------------------------
// FrameDiagnostics
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDiagnostics {
    /// Wall-clock time per listener, in call order.
    pub listener_times: Vec<(String, Duration)>,
    /// Total time for the frame.
    pub total_time: Duration,
    /// Listeners skipped because they were already borrowed.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

struct Attached {
    id: ListenerId,
    name: String,
    listener: Rc<RefCell<dyn FrameListener>>,
}

/// Fans one host frame out to every attached listener.
#[derive(Default)]
pub struct FrameClock {
    listeners: Vec<Attached>,
    next_id: u64,
    frame_counter: u64,
    last_diagnostics: FrameDiagnostics,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener`; it runs after every listener attached before it.
    pub fn attach(&mut self, name: &str, listener: Rc<RefCell<dyn FrameListener>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Attached {
            id,
            name: name.to_owned(),
            listener,
        });
        tracing::debug!(listener = name, id = id.0, "frame listener attached");
        id
    }

    /// Detach a listener. Returns `false` if `id` was not attached.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|l| l.id == id) {
            Some(idx) => {
                let removed = self.listeners.remove(idx);
                tracing::debug!(listener = %removed.name, id = id.0, "frame listener detached");
                true
            }
            None => {
                tracing::warn!(id = id.0, "detach of unknown frame listener");
                false
            }
        }
    }

    pub fn is_attached(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    pub fn last_diagnostics(&self) -> &FrameDiagnostics {
        &self.last_diagnostics
    }

    /// Run one frame.
    pub fn tick(&mut self, viewport: Vec2) {
        let frame_start = Instant::now();
        let info = FrameInfo {
            frame: self.frame_counter,
            viewport,
        };

        let mut listener_times = Vec::with_capacity(self.listeners.len());
        let mut skipped = 0;
        for attached in &self.listeners {
            let start = Instant::now();
            match attached.listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_frame(&info),
                Err(_) => {
                    tracing::warn!(listener = %attached.name, "frame listener busy, skipped");
                    skipped += 1;
                    continue;
                }
            }
            listener_times.push((attached.name.clone(), start.elapsed()));
        }

        self.frame_counter += 1;
        self.last_diagnostics = FrameDiagnostics {
            listener_times,
            total_time: frame_start.elapsed(),
            skipped,
        };
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.listeners.iter().map(|l| l.name.as_str()).collect();
        f.debug_struct("FrameClock")
            .field("listeners", &names)
            .field("frame_counter", &self.frame_counter)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<FrameInfo>,
    }

    impl FrameListener for Recorder {
        fn on_frame(&mut self, frame: &FrameInfo) {
            self.frames.push(*frame);
        }
    }

    #[test]
    fn listeners_see_every_frame() {
        let mut clock = FrameClock::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        clock.attach("recorder", recorder.clone());

        clock.tick(Vec2::new(800.0, 600.0));
        clock.tick(Vec2::new(1024.0, 768.0));

        let recorded = recorder.borrow();
        let frames = &recorded.frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].frame, 0);
        assert_eq!(frames[1].frame, 1);
        assert_eq!(frames[1].viewport, Vec2::new(1024.0, 768.0));
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn detached_listener_stops_receiving() {
        let mut clock = FrameClock::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = clock.attach("recorder", recorder.clone());

        clock.tick(Vec2::ZERO);
        assert!(clock.detach(id));
        assert!(!clock.is_attached(id));
        clock.tick(Vec2::ZERO);

        assert_eq!(recorder.borrow().frames.len(), 1);
        assert!(!clock.detach(id), "second detach is a no-op");
    }

    #[test]
    fn diagnostics_list_listeners_in_order() {
        let mut clock = FrameClock::new();
        clock.attach("a", Rc::new(RefCell::new(Recorder::default())));
        clock.attach("b", Rc::new(RefCell::new(Recorder::default())));
        clock.tick(Vec2::ZERO);

        let names: Vec<&str> = clock
            .last_diagnostics()
            .listener_times
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(clock.last_diagnostics().skipped, 0);
    }

    #[test]
    fn busy_listener_is_skipped() {
        let mut clock = FrameClock::new();
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        clock.attach("recorder", recorder.clone());

        let guard = recorder.borrow_mut();
        clock.tick(Vec2::ZERO);
        drop(guard);

        assert_eq!(clock.last_diagnostics().skipped, 1);
        assert!(recorder.borrow().frames.is_empty());
    }
}
