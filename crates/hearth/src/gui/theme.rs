use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::{Srgb, Srgba, WithAlpha};
use radial::Theme;

pub struct ThemeColors {
    /// Disc behind the dial readout.
    pub card: Srgba<f64>,
    pub card_edge: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext, theme: Theme) -> Self {
        let (card, edge) = match theme {
            Theme::Light => (Srgba::new(1.0, 1.0, 1.0, 1.0), Srgba::new(0.0, 0.0, 0.0, 0.1)),
            Theme::Dark => (
                Srgba::new(0.12, 0.15, 0.2, 1.0),
                Srgba::new(0.0, 0.0, 0.0, 0.3),
            ),
        };
        Self {
            card: Self::lookup_color(context, "card_bg_color", card, Some(1.0)),
            card_edge: edge,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn rgba(color: Srgb<u8>, alpha: f64) -> Srgba<f64> {
    color.into_format::<f64>().with_alpha(alpha)
}

/// Switches the whole application between the light and dark variants.
pub fn apply(theme: Theme) {
    if let Some(settings) = gtk::Settings::default() {
        settings.set_gtk_application_prefer_dark_theme(theme == Theme::Dark);
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.sidebar button.active, .mode-list button.active {
    background-color: alpha(@accent_bg_color, 0.85);
    color: @accent_fg_color;
}
.dial-readout {
    font-size: 48px;
    font-weight: 300;
}
.power.on {
    background-color: @accent_bg_color;
    color: @accent_fg_color;
}
.dashboard-list {
    font-size: 15px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
