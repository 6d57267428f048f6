use crate::gui::theme::{self, ThemeColors};
use cairo::Context;
use gdk4::prelude::*;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use radial::{
    ArcShape, CaptureGuard, ControlProps, Frame, Layout, Outcome, Point, PointerEvent,
    PointerHost, RadialControl, RadialError, Theme, Transition,
};
use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Instant;

const GLOW_SPREAD: f64 = 8.0; // extra line width under the indicator while dragging
const CARD_INSET: f64 = 6.0; // gap between the ring and the readout disc

struct DialState {
    control: RadialControl,
    theme: Theme,
    transition: Transition,
    started: Instant,
}

impl DialState {
    fn shown(&self) -> f64 {
        self.transition.sample(self.started.elapsed())
    }

    /// A drag shows the value directly, so any running tween is cut short.
    fn settle_on_drag_start(&mut self, was_dragging: bool) -> bool {
        let started = !was_dragging && self.control.is_dragging();
        if started {
            self.transition = Transition::settled(self.transition.target());
        }
        started
    }

    fn frame(&self) -> Frame {
        Frame::showing(
            self.control.props(),
            self.shown(),
            *self.control.layout(),
            self.theme,
            self.control.is_dragging(),
        )
    }
}

/// Claims the gesture's event sequence, so GTK keeps delivering motion and
/// release to the dial after the pointer leaves it.
struct GestureHost<'a> {
    gesture: &'a gtk::GestureDrag,
    area: &'a gtk::DrawingArea,
}

impl PointerHost for GestureHost<'_> {
    fn capture(&self) -> CaptureGuard {
        self.gesture.set_state(gtk::EventSequenceState::Claimed);
        self.area.set_cursor_from_name(Some("grabbing"));
        let area = self.area.clone();
        CaptureGuard::new(move || area.set_cursor_from_name(Some("pointer")))
    }
}

/// The radial control bound to a `gtk::DrawingArea`.
#[derive(Clone)]
pub struct Dial {
    area: gtk::DrawingArea,
    state: Rc<RefCell<DialState>>,
}

impl Dial {
    pub fn attach(
        area: &gtk::DrawingArea,
        props: ControlProps,
        theme: Theme,
        on_change: impl Fn(f64) + 'static,
    ) -> Result<Self, RadialError> {
        let value = props.value;
        let state = DialState {
            control: RadialControl::new(props)?,
            theme,
            transition: Transition::settled(value),
            started: Instant::now(),
        };

        let dial = Self {
            area: area.clone(),
            state: Rc::new(RefCell::new(state)),
        };
        dial.connect_draw();
        dial.connect_gestures(Rc::new(on_change));
        dial.sync_size();
        Ok(dial)
    }

    /// Feeds the caller's current props back in; changes of value outside a drag
    /// are eased.
    pub fn update(&self, props: ControlProps, theme: Theme) -> Result<(), RadialError> {
        let animate = {
            let mut state = self.state.borrow_mut();
            let target = props.value;
            let previous = state.transition.target();
            state.control.set_props(props)?;
            state.theme = theme;

            if state.control.is_dragging() {
                state.transition = Transition::settled(target);
                false
            } else if target != previous {
                state.transition = Transition::new(state.shown(), target);
                state.started = Instant::now();
                true
            } else {
                false
            }
        };

        self.sync_size();
        if animate {
            self.run_transition();
        }
        self.area.queue_draw();
        Ok(())
    }

    fn sync_size(&self) {
        let state = self.state.borrow();
        let props = state.control.props();
        self.area.set_content_width(props.size.ceil() as i32);
        self.area.set_content_height(props.size.ceil() as i32);
        let cursor = if props.disabled { "default" } else { "pointer" };
        if !state.control.is_dragging() {
            self.area.set_cursor_from_name(Some(cursor));
        }
    }

    fn run_transition(&self) {
        let state = self.state.clone();
        self.area.add_tick_callback(move |area, _clock| {
            area.queue_draw();
            let state = state.borrow();
            if state.transition.is_finished(state.started.elapsed()) {
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
    }

    fn connect_draw(&self) {
        let state = self.state.clone();
        self.area.set_draw_func(move |area, cr, width, height| {
            let state = state.borrow();
            let colors = ThemeColors::from_context(&area.style_context(), state.theme);
            let frame = state.frame();
            let (dx, dy) = surface_offset(&frame.layout, width, height);
            cr.translate(dx, dy);
            if let Err(e) = draw(cr, &frame, &colors) {
                log::error!("Drawing error: {}", e);
            }
        });
    }

    fn connect_gestures(&self, on_change: Rc<dyn Fn(f64)>) {
        let drag = gtk::GestureDrag::new();

        drag.connect_drag_begin(glib::clone!(
            #[weak(rename_to = area)]
            self.area,
            #[strong(rename_to = state)]
            self.state,
            #[strong]
            on_change,
            move |gesture, x, y| {
                let p = to_surface(&state, &area, x, y);
                let event = if is_touch(gesture) {
                    PointerEvent::TouchStart(vec![p])
                } else {
                    PointerEvent::Down(p)
                };
                dispatch(&state, &area, gesture, &event, on_change.as_ref());
            }
        ));

        drag.connect_drag_update(glib::clone!(
            #[weak(rename_to = area)]
            self.area,
            #[strong(rename_to = state)]
            self.state,
            #[strong]
            on_change,
            move |gesture, off_x, off_y| {
                let Some((x, y)) = gesture.start_point() else {
                    return;
                };
                let p = to_surface(&state, &area, x + off_x, y + off_y);
                let event = if is_touch(gesture) {
                    PointerEvent::TouchMove(vec![p])
                } else {
                    PointerEvent::Move(p)
                };
                dispatch(&state, &area, gesture, &event, on_change.as_ref());
            }
        ));

        drag.connect_drag_end(glib::clone!(
            #[weak(rename_to = area)]
            self.area,
            #[strong(rename_to = state)]
            self.state,
            #[strong]
            on_change,
            move |gesture, off_x, off_y| {
                let release = if is_touch(gesture) {
                    PointerEvent::TouchEnd
                } else {
                    PointerEvent::Up
                };
                dispatch(&state, &area, gesture, &release, on_change.as_ref());

                if let Some((x, y)) = gesture.start_point() {
                    let p = to_surface(&state, &area, x + off_x, y + off_y);
                    dispatch(&state, &area, gesture, &PointerEvent::Click(p), on_change.as_ref());
                }
            }
        ));

        self.area.add_controller(drag);
    }
}

fn is_touch(gesture: &gtk::GestureDrag) -> bool {
    gesture
        .current_event_device()
        .is_some_and(|d| d.source() == gdk::InputSource::Touchscreen)
}

/// Runs one event through the control. Values are handed to `on_change` after
/// the state borrow ends, so the callback may update the dial again.
fn dispatch(
    state: &RefCell<DialState>,
    area: &gtk::DrawingArea,
    gesture: &gtk::GestureDrag,
    event: &PointerEvent,
    on_change: &dyn Fn(f64),
) -> Outcome {
    let host = GestureHost { gesture, area };
    let mut emitted = Vec::new();

    let outcome = {
        let mut state = state.borrow_mut();
        let was_dragging = state.control.is_dragging();
        let outcome = state
            .control
            .handle(event, &host, &mut |v| emitted.push(v));
        let ended = was_dragging && !state.control.is_dragging();
        if state.settle_on_drag_start(was_dragging) || ended {
            area.queue_draw();
        }
        outcome
    };

    emitted.into_iter().for_each(on_change);
    outcome
}

/// The ring is centered in the drawing area, which may be larger than the
/// control's own surface.
fn surface_offset(layout: &Layout, width: i32, height: i32) -> (f64, f64) {
    (
        (f64::from(width) - layout.size) / 2.0,
        (f64::from(height) - layout.size) / 2.0,
    )
}

/// Widget coordinates to the control's own `size × size` surface.
fn surface_point(layout: &Layout, width: i32, height: i32, x: f64, y: f64) -> Point {
    let (dx, dy) = surface_offset(layout, width, height);
    Point::new(x - dx, y - dy)
}

fn to_surface(state: &RefCell<DialState>, area: &gtk::DrawingArea, x: f64, y: f64) -> Point {
    let state = state.borrow();
    surface_point(state.control.layout(), area.width(), area.height(), x, y)
}

pub fn draw(cr: &Context, frame: &Frame, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let layout = &frame.layout;
    let (cx, cy) = (layout.center.x, layout.center.y);

    cr.set_line_cap(cairo::LineCap::Round);
    cr.set_line_width(layout.stroke_width);
    set_source(cr, theme::rgba(frame.track, 1.0));
    cr.new_path();
    cr.arc(cx, cy, layout.radius, 0.0, 2.0 * PI);
    cr.stroke()?;

    if let Some(glow) = frame.glow {
        cr.set_line_width(layout.stroke_width + GLOW_SPREAD);
        set_source(cr, theme::rgba(glow.color, f64::from(glow.alpha) / 255.0));
        indicator_path(cr, frame);
        cr.stroke()?;
        cr.set_line_width(layout.stroke_width);
    }

    set_source(cr, theme::rgba(frame.indicator, 1.0));
    indicator_path(cr, frame);
    cr.stroke()?;

    draw_card(cr, layout, colors)
}

fn indicator_path(cr: &Context, frame: &Frame) {
    let layout = &frame.layout;
    let (cx, cy) = (layout.center.x, layout.center.y);
    let top = -PI / 2.0; // cairo measures from 3 o'clock

    cr.new_path();
    match frame.shape {
        ArcShape::Closed => cr.arc(cx, cy, layout.radius, 0.0, 2.0 * PI),
        ArcShape::Open { sweep, .. } => {
            cr.arc(cx, cy, layout.radius, top, top + sweep.to_radians());
        }
    }
}

fn draw_card(cr: &Context, layout: &Layout, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let r = layout.radius - layout.stroke_width / 2.0 - CARD_INSET;
    if r <= 0.0 {
        return Ok(());
    }

    cr.new_path();
    cr.arc(layout.center.x, layout.center.y, r, 0.0, 2.0 * PI);
    set_source(cr, colors.card);
    cr.fill_preserve()?;
    cr.set_line_width(1.0);
    set_source(cr, colors.card_edge);
    cr.stroke()
}

fn set_source(cr: &Context, color: palette::Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use radial::{Accent, Detached, Range};
    use std::time::Duration;

    fn state(value: f64) -> DialState {
        let props = ControlProps::new(value, Range::new(0.0, 100.0).unwrap(), Accent::Cool)
            .with_size(200.0);
        DialState {
            control: RadialControl::new(props).unwrap(),
            theme: Theme::Dark,
            transition: Transition::settled(value),
            started: Instant::now(),
        }
    }

    #[test]
    fn test_surface_is_centered_in_larger_area() {
        let layout = Layout::new(200.0).unwrap();
        assert_eq!(surface_offset(&layout, 300, 240), (50.0, 20.0));
        assert_eq!(surface_point(&layout, 300, 240, 150.0, 120.0), layout.center);
        assert_eq!(surface_point(&layout, 200, 200, 12.5, 7.0), Point::new(12.5, 7.0));
    }

    #[test]
    fn test_surface_offset_goes_negative_when_squeezed() {
        let layout = Layout::new(200.0).unwrap();
        assert_eq!(surface_point(&layout, 100, 100, 0.0, 0.0), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_press_cuts_running_transition() {
        let mut s = state(10.0);
        s.transition = Transition::new(10.0, 80.0);
        s.started = Instant::now();
        assert!(!s.transition.is_finished(Duration::ZERO));

        let top = s.control.layout().arc_start();
        s.control
            .handle(&PointerEvent::Down(top), &Detached, &mut |_| {});
        assert!(s.settle_on_drag_start(false));
        assert!(s.transition.is_finished(Duration::ZERO));
        assert_eq!(s.shown(), 80.0);

        // already dragging: nothing more to settle
        assert!(!s.settle_on_drag_start(true));
    }

    #[test]
    fn test_press_outside_leaves_transition_running() {
        let mut s = state(10.0);
        s.transition = Transition::new(10.0, 80.0);
        s.control
            .handle(&PointerEvent::Down(Point::new(0.0, 0.0)), &Detached, &mut |_| {});
        assert!(!s.settle_on_drag_start(false));
        assert_eq!(s.transition.target(), 80.0);
        assert!(!s.transition.is_finished(Duration::ZERO));
    }
}
