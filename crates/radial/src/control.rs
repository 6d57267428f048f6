use crate::DEFAULT_SIZE;
use crate::color::{Accent, Theme};
use crate::error::RadialError;
use crate::event::{Gesture, PointerEvent};
use crate::geometry::{Layout, Point, Range};
use crate::render::Frame;
use std::fmt;

/// Source of viewport-wide move/release events.
pub trait PointerHost {
    /// Starts routing move and release events to the control. Routing stops when
    /// the returned guard is dropped.
    fn capture(&self) -> CaptureGuard;
}

pub struct CaptureGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl CaptureGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Host for callers that already receive every event, e.g. a CLI or a replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl PointerHost for Detached {
    fn capture(&self) -> CaptureGuard {
        CaptureGuard::detached()
    }
}

/// Everything the caller supplies on each update. `value` stays owned by the
/// caller and is drawn as given, even outside `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlProps {
    pub value: f64,
    pub range: Range,
    pub accent: Accent,
    pub disabled: bool,
    pub size: f64,
}

impl ControlProps {
    pub fn new(value: f64, range: Range, accent: Accent) -> Self {
        Self {
            value,
            range,
            accent,
            disabled: false,
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Whether the host should stop its default handling of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Consumed,
    Ignored,
}

#[derive(Debug)]
struct Drag {
    _capture: CaptureGuard,
    tracked: bool,
}

#[derive(Debug)]
pub struct RadialControl {
    props: ControlProps,
    layout: Layout,
    drag: Option<Drag>,
    swallow_click: bool,
}

impl RadialControl {
    pub fn new(props: ControlProps) -> Result<Self, RadialError> {
        let layout = Layout::new(props.size)?;
        Ok(Self {
            props,
            layout,
            drag: None,
            swallow_click: false,
        })
    }

    pub fn set_props(&mut self, props: ControlProps) -> Result<(), RadialError> {
        self.layout = Layout::new(props.size)?;
        self.props = props;
        if self.props.disabled {
            self.end_drag();
        }
        Ok(())
    }

    pub fn props(&self) -> &ControlProps {
        &self.props
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn frame(&self, theme: Theme) -> Frame {
        Frame::new(&self.props, self.layout, theme, self.is_dragging())
    }

    pub fn handle(
        &mut self,
        event: &PointerEvent,
        host: &dyn PointerHost,
        on_change: &mut dyn FnMut(f64),
    ) -> Outcome {
        let Some(gesture) = event.gesture() else {
            return Outcome::Ignored;
        };

        match gesture {
            Gesture::Press(p) => self.press(p, host),
            Gesture::Track(p) => self.track(p, on_change),
            Gesture::Release => self.release(),
            Gesture::Tap(p) => self.tap(p, on_change),
        }
    }

    fn press(&mut self, p: Point, host: &dyn PointerHost) -> Outcome {
        self.swallow_click = false;

        if self.props.disabled || !self.layout.in_hit_area(p) {
            return Outcome::Ignored;
        }
        if self.drag.is_none() {
            log::debug!("drag started at ({:.1}, {:.1})", p.x, p.y);
            self.drag = Some(Drag {
                _capture: host.capture(),
                tracked: false,
            });
        }
        Outcome::Consumed
    }

    fn track(&mut self, p: Point, on_change: &mut dyn FnMut(f64)) -> Outcome {
        if self.props.disabled {
            return Outcome::Ignored;
        }
        let Some(drag) = self.drag.as_mut() else {
            return Outcome::Ignored;
        };

        drag.tracked = true;
        on_change(self.layout.value_at(&self.props.range, p));
        Outcome::Consumed
    }

    fn release(&mut self) -> Outcome {
        match self.drag.take() {
            Some(drag) => {
                self.swallow_click = drag.tracked;
                log::debug!("drag ended");
                Outcome::Consumed
            }
            None => Outcome::Ignored,
        }
    }

    fn tap(&mut self, p: Point, on_change: &mut dyn FnMut(f64)) -> Outcome {
        let swallowed = std::mem::take(&mut self.swallow_click);

        if swallowed || self.props.disabled || !self.layout.in_surface(p) {
            return Outcome::Ignored;
        }
        on_change(self.layout.value_at(&self.props.range, p));
        Outcome::Consumed
    }

    fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("drag cancelled");
        }
    }
}
