use crate::color::{Theme, hex, hex_with_alpha};
use crate::control::ControlProps;
use crate::geometry::{Degrees, Layout, Point, Range};
use crate::{GLOW_ALPHA, GLOW_BLUR, TRANSITION_MS};
use palette::{Srgb, Srgba, WithAlpha};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcShape {
    /// Value at the maximum: a complete ring. A single arc segment cannot
    /// express a full turn.
    Closed,
    Open {
        start: Point,
        end: Point,
        sweep: Degrees,
        large_arc: bool,
    },
}

impl ArcShape {
    pub fn resolve(layout: &Layout, range: &Range, value: f64) -> Self {
        if value == range.max() {
            return Self::Closed;
        }
        let sweep = range.angle_from_value(value);
        Self::Open {
            start: layout.arc_start(),
            end: layout.point_at(sweep),
            sweep,
            large_arc: range.percentage(value) > 50.0,
        }
    }
}

/// Everything needed to draw one state of the control.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub layout: Layout,
    pub track: Srgb<u8>,
    pub indicator: Srgb<u8>,
    pub shape: ArcShape,
    pub animate: bool,
    pub glow: Option<Srgba<u8>>,
}

impl Frame {
    pub fn new(props: &ControlProps, layout: Layout, theme: Theme, dragging: bool) -> Self {
        Self::showing(props, props.value, layout, theme, dragging)
    }

    /// Like `new`, but draws `shown` instead of `props.value`, for callers
    /// animating between values.
    pub fn showing(
        props: &ControlProps,
        shown: f64,
        layout: Layout,
        theme: Theme,
        dragging: bool,
    ) -> Self {
        let indicator = if props.disabled {
            theme.muted()
        } else {
            props.accent.rgb()
        };
        let glow = (dragging && !props.disabled).then(|| indicator.with_alpha(GLOW_ALPHA));

        Self {
            layout,
            track: theme.track(),
            indicator,
            shape: ArcShape::resolve(&layout, &props.range, shown),
            animate: !dragging,
            glow,
        }
    }

    pub fn to_svg(&self) -> String {
        self.to_string()
    }

    fn style(&self) -> String {
        let transition = if !self.animate {
            "none".to_string()
        } else if matches!(self.shape, ArcShape::Closed) {
            format!("stroke {TRANSITION_MS}ms ease")
        } else {
            format!("d {TRANSITION_MS}ms ease, stroke {TRANSITION_MS}ms ease")
        };
        let filter = match self.glow {
            Some(glow) => format!(
                "drop-shadow(0 0 {GLOW_BLUR}px {})",
                hex_with_alpha(glow.color, glow.alpha)
            ),
            None => "none".to_string(),
        };
        format!("transition: {transition}; filter: {filter}")
    }
}

/// Writes the frame as a standalone SVG document of `size × size`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Layout {
            size,
            center,
            radius,
            stroke_width,
            hit_radius,
        } = self.layout;
        let (cx, cy) = (center.x, center.y);

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        )?;
        writeln!(
            f,
            r#"  <circle cx="{cx}" cy="{cy}" r="{hit_radius}" fill="transparent"/>"#
        )?;
        writeln!(
            f,
            r#"  <circle cx="{cx}" cy="{cy}" r="{radius}" fill="none" stroke="{}" stroke-width="{stroke_width}" stroke-linecap="round"/>"#,
            hex(self.track)
        )?;

        let stroke = hex(self.indicator);
        let style = self.style();
        match self.shape {
            ArcShape::Closed => writeln!(
                f,
                r#"  <circle cx="{cx}" cy="{cy}" r="{radius}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}" stroke-linecap="round" style="{style}"/>"#
            )?,
            ArcShape::Open {
                start,
                end,
                large_arc,
                ..
            } => writeln!(
                f,
                r#"  <path d="M {} {} A {radius} {radius} 0 {} 1 {} {}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}" stroke-linecap="round" style="{style}"/>"#,
                start.x,
                start.y,
                u8::from(large_arc),
                end.x,
                end.y
            )?,
        }
        write!(f, "</svg>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Accent;

    fn props(min: f64, max: f64, value: f64) -> ControlProps {
        ControlProps::new(value, Range::new(min, max).unwrap(), Accent::Cool).with_size(288.0)
    }

    fn frame(props: &ControlProps, dragging: bool) -> Frame {
        Frame::new(props, Layout::new(props.size).unwrap(), Theme::Light, dragging)
    }

    #[test]
    fn test_maximum_renders_closed_ring() {
        let f = frame(&props(0.0, 100.0, 100.0), false);
        assert_eq!(f.shape, ArcShape::Closed);
        let svg = f.to_svg();
        assert!(!svg.contains("<path"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_thermostat_arc_takes_large_flag() {
        let f = frame(&props(16.0, 30.0, 24.0), false);
        let ArcShape::Open {
            sweep, large_arc, ..
        } = f.shape
        else {
            panic!("expected an open arc");
        };
        assert!(large_arc);
        assert!((*sweep - 205.714).abs() < 1e-3);
        assert!(f.to_svg().contains(" 0 1 1 "));
    }

    #[test]
    fn test_small_arc_geometry() {
        let f = frame(&props(0.0, 100.0, 25.0), false);
        let ArcShape::Open {
            start,
            end,
            large_arc,
            ..
        } = f.shape
        else {
            panic!("expected an open arc");
        };
        assert!(!large_arc);
        assert_eq!(start, f.layout.arc_start());
        assert!((end.x - (144.0 + f.layout.radius)).abs() < 1e-9);
        assert!((end.y - 144.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_is_not_large() {
        let ArcShape::Open { large_arc, .. } = frame(&props(0.0, 100.0, 50.0), false).shape else {
            panic!("expected an open arc");
        };
        assert!(!large_arc);
    }

    #[test]
    fn test_out_of_range_value_is_drawn_unclamped() {
        let f = frame(&props(0.0, 100.0, 120.0), false);
        let ArcShape::Open { sweep, .. } = f.shape else {
            panic!("expected an open arc");
        };
        assert!((*sweep - 432.0).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_uses_muted_color_without_glow() {
        let p = props(0.0, 100.0, 30.0).with_disabled(true);
        let f = frame(&p, true);
        assert_eq!(f.indicator, Theme::Light.muted());
        assert_eq!(f.glow, None);
    }

    #[test]
    fn test_dragging_turns_off_transitions_and_adds_glow() {
        let p = props(0.0, 100.0, 30.0);
        let idle = frame(&p, false).to_svg();
        assert!(idle.contains("transition: d 300ms ease"));
        assert!(idle.contains("filter: none"));

        let dragging = frame(&p, true).to_svg();
        assert!(dragging.contains("transition: none"));
        assert!(dragging.contains("drop-shadow(0 0 4px #3b82f699)"));
    }

    #[test]
    fn test_svg_surface_matches_size() {
        let svg = frame(&props(0.0, 10.0, 3.0), false).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="288" height="288" viewBox="0 0 288 288""#));
        assert!(svg.contains(r##"stroke="#e5e7eb""##));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_showing_overrides_drawn_value() {
        let p = props(0.0, 100.0, 100.0);
        let layout = Layout::new(p.size).unwrap();
        let f = Frame::showing(&p, 60.0, layout, Theme::Dark, false);
        assert!(matches!(f.shape, ArcShape::Open { large_arc: true, .. }));
    }
}
