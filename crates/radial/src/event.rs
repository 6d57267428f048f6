use crate::geometry::Point;

/// Input delivered to the control, in the control's own surface coordinates.
///
/// `Move`/`Up` and their touch counterparts come from the whole viewport while a
/// drag is in progress, not just from the area over the ring.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Click(Point),
    TouchStart(Vec<Point>),
    TouchMove(Vec<Point>),
    TouchEnd,
}

/// Pointer and touch input folded into one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Gesture {
    Press(Point),
    Track(Point),
    Release,
    Tap(Point),
}

impl PointerEvent {
    /// `None` for touch events that carry no touch points.
    pub(crate) fn gesture(&self) -> Option<Gesture> {
        match self {
            Self::Down(p) => Some(Gesture::Press(*p)),
            Self::Move(p) => Some(Gesture::Track(*p)),
            Self::Up | Self::TouchEnd => Some(Gesture::Release),
            Self::Click(p) => Some(Gesture::Tap(*p)),
            Self::TouchStart(touches) => touches.first().copied().map(Gesture::Press),
            Self::TouchMove(touches) => touches.first().copied().map(Gesture::Track),
        }
    }
}
