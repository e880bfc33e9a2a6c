//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use crate::core::Mode;
use crate::time::LoopHandle;

/// Ordered log of hook calls, entries formatted as `"<tag>:<hook>"`.
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

fn note(journal: &Journal, tag: &str, hook: impl Display) {
    journal.borrow_mut().push(format!("{tag}:{hook}"));
}

/// Mode that records every lifecycle call.
pub(crate) struct Recorder {
    tag: &'static str,
    journal: Journal,
}

impl Recorder {
    pub(crate) fn new(tag: &'static str, journal: &Journal) -> Self {
        Self { tag, journal: journal.clone() }
    }
}

impl Mode for Recorder {
    fn enter(&mut self) {
        note(&self.journal, self.tag, "enter");
    }

    fn tick(&mut self, dt: f64) {
        note(&self.journal, self.tag, format_args!("tick({dt})"));
    }

    fn draw(&mut self) {
        note(&self.journal, self.tag, "draw");
    }

    fn exit(&mut self) {
        note(&self.journal, self.tag, "exit");
    }
}

/// Mode tagged `stopper` that stops the loop on its n-th tick.
pub(crate) struct StopOnTick {
    remaining: u32,
    handle: LoopHandle,
    inner: Recorder,
}

impl StopOnTick {
    pub(crate) fn new(nth: u32, handle: LoopHandle, journal: &Journal) -> Self {
        Self {
            remaining: nth,
            handle,
            inner: Recorder::new("stopper", journal),
        }
    }
}

impl Mode for StopOnTick {
    fn enter(&mut self) {
        self.inner.enter();
    }

    fn tick(&mut self, dt: f64) {
        self.inner.tick(dt);
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.handle.stop();
        }
    }

    fn draw(&mut self) {
        self.inner.draw();
    }

    fn exit(&mut self) {
        self.inner.exit();
    }
}
