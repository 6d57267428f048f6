//! Circular value control: maps pointer positions around a ring onto a bounded
//! value and describes the arc that displays it.

pub mod animation;
pub mod color;
pub mod control;
pub mod error;
pub mod event;
pub mod geometry;
pub mod render;

pub use animation::Transition;
pub use color::{Accent, Theme};
pub use control::{CaptureGuard, ControlProps, Detached, Outcome, PointerHost, RadialControl};
pub use error::RadialError;
pub use event::PointerEvent;
pub use geometry::{Degrees, Layout, Point, Range};
pub use render::{ArcShape, Frame};

pub const DEFAULT_SIZE: f64 = 300.0;
pub const RADIUS_FACTOR: f64 = 0.38; // ring radius relative to size
pub const STROKE_WIDTH: f64 = 24.0;
pub const FULL_TURN: f64 = 360.0;
pub const GLOW_ALPHA: u8 = 0x99;
pub const GLOW_BLUR: f64 = 4.0;
pub const TRANSITION_MS: u64 = 300;
