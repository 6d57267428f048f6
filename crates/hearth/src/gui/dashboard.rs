use crate::devices::{DeviceKind, DeviceSummary};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::RelmWidgetExt;
use relm4::factory::{DynamicIndex, FactoryComponent, FactorySender};

/// One dashboard line: name, state and a power switch.
pub struct DeviceRow {
    summary: DeviceSummary,
}

#[derive(Debug)]
pub enum DeviceRowOutput {
    TogglePower(DeviceKind, usize),
    Open(DeviceKind, usize),
}

#[relm4::factory(pub)]
impl FactoryComponent for DeviceRow {
    type Init = DeviceSummary;
    type Input = ();
    type Output = DeviceRowOutput;
    type CommandOutput = ();
    type ParentWidget = gtk::ListBox;

    view! {
        gtk::Box {
            set_spacing: 12,
            set_margin_all: 8,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_hexpand: true,

                gtk::Label {
                    set_xalign: 0.0,
                    add_css_class: "heading",
                    set_label: &self.summary.title(),
                },
                gtk::Label {
                    set_xalign: 0.0,
                    add_css_class: "dim-label",
                    set_label: &self.summary.detail(),
                },
            },

            gtk::Switch {
                set_valign: gtk::Align::Center,
                set_tooltip_text: Some("Power"),
                set_active: self.summary.power,
                connect_state_set[sender, kind = self.summary.kind, index = self.summary.index, power = self.summary.power] => move |_, state| {
                    if state != power
                        && sender.output(DeviceRowOutput::TogglePower(kind, index)).is_err()
                    {
                        log::debug!("dashboard closed before power change");
                    }
                    glib::Propagation::Proceed
                },
            },

            gtk::Button {
                set_icon_name: "go-next-symbolic",
                set_valign: gtk::Align::Center,
                set_tooltip_text: Some("Open"),
                add_css_class: "flat",
                connect_clicked[sender, kind = self.summary.kind, index = self.summary.index] => move |_| {
                    let _ = sender.output(DeviceRowOutput::Open(kind, index));
                },
            },
        }
    }

    fn init_model(summary: Self::Init, _index: &DynamicIndex, _sender: FactorySender<Self>) -> Self {
        Self { summary }
    }
}
