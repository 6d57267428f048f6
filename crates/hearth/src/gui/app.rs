use crate::config::{self, Config};
use crate::devices::{
    AirconMode, DashboardTab, Device, DeviceError, DeviceKind, DeviceSummary, Home, LightMode,
};
use crate::events::AppEvent;
use crate::gui::dashboard::{DeviceRow, DeviceRowOutput};
use crate::gui::dial::Dial;
use crate::gui::theme;
use crate::session::{Session, SessionStore};
use gtk::prelude::*;
use gtk4 as gtk;
use radial::{Accent, ControlProps, Theme};
use relm4::factory::FactoryVecDeque;
use relm4::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Device(DeviceKind),
}

/// Which device of each kind the device page shows.
#[derive(Debug, Clone, Copy, Default)]
struct Selection {
    aircon: usize,
    tv: usize,
    light: usize,
}

impl Selection {
    fn get(&self, kind: DeviceKind) -> usize {
        match kind {
            DeviceKind::Aircon => self.aircon,
            DeviceKind::Tv => self.tv,
            DeviceKind::Light => self.light,
        }
    }

    fn set(&mut self, kind: DeviceKind, index: usize) {
        match kind {
            DeviceKind::Aircon => self.aircon = index,
            DeviceKind::Tv => self.tv = index,
            DeviceKind::Light => self.light = index,
        }
    }
}

pub struct AppModel {
    config: Config,
    session: Session,
    home: Home,
    page: Page,
    last_kind: DeviceKind,
    selection: Selection,
    tab: DashboardTab,
    rows: FactoryVecDeque<DeviceRow>,
    listed: Vec<DeviceSummary>,
    theme: Theme,
    username: String,
    password: String,
    login_error: Option<String>,
    signing_in: bool,
    dial: Option<Dial>,
}

#[derive(Debug)]
pub enum AppMsg {
    Username(String),
    Password(String),
    Submit,
    LoginChecked,
    Logout,
    ToggleTheme,
    Open(Page),
    Tab(DashboardTab),
    AllPower,
    DevicePower(DeviceKind, usize),
    OpenDevice(DeviceKind, usize),
    PreviousDevice,
    NextDevice,
    AddDevice,
    TogglePower,
    Step(i32),
    Channel(i32),
    AirconMode(AirconMode),
    LightMode(LightMode),
    DialChanged(f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    /// The kind shown on the device page; the dashboard keeps the last one.
    fn current_kind(&self) -> DeviceKind {
        match self.page {
            Page::Device(kind) => kind,
            Page::Dashboard => self.last_kind,
        }
    }

    fn selected_index(&self) -> usize {
        self.selection.get(self.current_kind())
    }

    fn device_count(&self) -> usize {
        self.home.count(self.current_kind())
    }

    fn current(&self) -> Option<&dyn Device> {
        self.home
            .device(self.current_kind(), self.selected_index())
            .ok()
    }

    fn with_current(&mut self, action: impl FnOnce(&mut dyn Device) -> Result<(), DeviceError>) {
        let kind = self.current_kind();
        let index = self.selection.get(kind);
        if let Err(e) = self.home.device_mut(kind, index).and_then(action) {
            log::debug!("ignored change to {} #{}: {}", kind, index, e);
        }
    }

    fn device_title(&self) -> String {
        match self.current() {
            Some(device) => format!("{} · {}", self.current_kind().label(), device.name()),
            None => format!("No {}", self.current_kind().label().to_lowercase()),
        }
    }

    fn readout(&self) -> String {
        self.current()
            .map(|d| d.readout())
            .unwrap_or_else(|| "–".to_string())
    }

    fn caption(&self) -> &'static str {
        self.current_kind().dial_caption()
    }

    fn device_power(&self) -> bool {
        self.current().is_some_and(|d| d.power())
    }

    fn channel_label(&self) -> String {
        self.home
            .tvs
            .get(self.selection.tv)
            .map(|tv| format!("Channel {}", tv.channel))
            .unwrap_or_default()
    }

    fn aircon_mode(&self) -> Option<AirconMode> {
        self.home.aircons.get(self.selection.aircon).map(|ac| ac.mode)
    }

    fn light_mode(&self) -> Option<LightMode> {
        self.home.lights.get(self.selection.light).map(|l| l.mode)
    }

    /// Rebuilds the dashboard rows when what they show has changed.
    fn refresh_rows(&mut self) {
        let summaries = self.home.summaries(self.tab);
        if summaries == self.listed {
            return;
        }
        let mut rows = self.rows.guard();
        rows.clear();
        for summary in &summaries {
            rows.push_back(summary.clone());
        }
        drop(rows);
        self.listed = summaries;
    }

    /// Props for the dial; an empty kind shows a disabled dial at its minimum.
    fn dial_props(&self) -> Result<ControlProps, DeviceError> {
        let size = self.config.dial_size;
        match self.current() {
            Some(device) => device.dial_props(size),
            None => {
                let range = self.current_kind().dial_range()?;
                Ok(ControlProps::new(range.min(), range, Accent::default())
                    .with_size(size)
                    .with_disabled(true))
            }
        }
    }

    fn build_dial(
        &self,
        area: &gtk::DrawingArea,
        sender: ComponentSender<Self>,
    ) -> Result<Dial, DeviceError> {
        let props = self.dial_props()?;
        let dial = Dial::attach(area, props, self.theme, move |value| {
            sender.input(AppMsg::DialChanged(value));
        })?;
        Ok(dial)
    }

    fn sync_dial(&self) {
        let Some(dial) = &self.dial else {
            return;
        };
        let result = self
            .dial_props()
            .and_then(|props| dial.update(props, self.theme).map_err(DeviceError::from));
        if let Err(e) = result {
            log::error!("Failed to update dial: {}", e);
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Hearth"),
            set_default_size: (1100, 560),

            #[wrap(Some)]
            set_titlebar = &gtk::HeaderBar {
                pack_end = &gtk::Button {
                    #[watch]
                    set_icon_name: if model.theme == Theme::Dark {
                        "weather-clear-symbolic"
                    } else {
                        "weather-clear-night-symbolic"
                    },
                    set_tooltip_text: Some("Switch between light and dark"),
                    connect_clicked => AppMsg::ToggleTheme,
                },
                pack_end = &gtk::Button {
                    set_icon_name: "system-log-out-symbolic",
                    set_tooltip_text: Some("Sign out"),
                    #[watch]
                    set_visible: model.session.is_logged_in(),
                    connect_clicked => AppMsg::Logout,
                },
            },

            gtk::Stack {
                set_transition_type: gtk::StackTransitionType::Crossfade,

                add_named[Some("login")] = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 12,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Center,
                    set_width_request: 320,

                    gtk::Label {
                        set_label: "Home control",
                        add_css_class: "title-1",
                    },
                    gtk::Label {
                        set_label: "Sign in to manage your devices",
                        add_css_class: "dim-label",
                    },
                    gtk::Entry {
                        set_placeholder_text: Some("Username"),
                        #[watch]
                        set_sensitive: !model.signing_in,
                        connect_changed[sender] => move |entry| {
                            sender.input(AppMsg::Username(entry.text().to_string()));
                        },
                        connect_activate => AppMsg::Submit,
                    },
                    gtk::PasswordEntry {
                        set_show_peek_icon: true,
                        #[watch]
                        set_sensitive: !model.signing_in,
                        connect_changed[sender] => move |entry| {
                            sender.input(AppMsg::Password(entry.text().to_string()));
                        },
                        connect_activate => AppMsg::Submit,
                    },
                    gtk::Label {
                        add_css_class: "error",
                        #[watch]
                        set_label: model.login_error.as_deref().unwrap_or_default(),
                        #[watch]
                        set_visible: model.login_error.is_some(),
                    },
                    gtk::Button {
                        add_css_class: "suggested-action",
                        #[watch]
                        set_sensitive: !model.signing_in,
                        connect_clicked => AppMsg::Submit,

                        gtk::Box {
                            set_spacing: 8,
                            set_halign: gtk::Align::Center,

                            gtk::Spinner {
                                #[watch]
                                set_spinning: model.signing_in,
                                #[watch]
                                set_visible: model.signing_in,
                            },
                            gtk::Label {
                                #[watch]
                                set_label: if model.signing_in { "Signing in…" } else { "Sign in" },
                            },
                        },
                    },
                },

                add_named[Some("panel")] = &gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,

                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 6,
                        set_margin_all: 12,
                        set_width_request: 200,
                        add_css_class: "sidebar",

                        gtk::Button {
                            set_label: "Dashboard",
                            #[watch]
                            set_class_active: ("active", model.page == Page::Dashboard),
                            connect_clicked => AppMsg::Open(Page::Dashboard),
                        },
                        gtk::Button {
                            set_label: DeviceKind::Aircon.label(),
                            #[watch]
                            set_class_active: ("active", model.page == Page::Device(DeviceKind::Aircon)),
                            connect_clicked => AppMsg::Open(Page::Device(DeviceKind::Aircon)),
                        },
                        gtk::Button {
                            set_label: DeviceKind::Tv.label(),
                            #[watch]
                            set_class_active: ("active", model.page == Page::Device(DeviceKind::Tv)),
                            connect_clicked => AppMsg::Open(Page::Device(DeviceKind::Tv)),
                        },
                        gtk::Button {
                            set_label: DeviceKind::Light.label(),
                            #[watch]
                            set_class_active: ("active", model.page == Page::Device(DeviceKind::Light)),
                            connect_clicked => AppMsg::Open(Page::Device(DeviceKind::Light)),
                        },
                    },

                    gtk::Separator {
                        set_orientation: gtk::Orientation::Vertical,
                    },

                    gtk::Stack {
                        set_hexpand: true,
                        set_transition_type: gtk::StackTransitionType::SlideUpDown,

                        add_named[Some("dashboard")] = &gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 12,
                            set_margin_all: 16,

                            gtk::Box {
                                set_spacing: 6,

                                gtk::Button {
                                    set_label: DashboardTab::All.label(),
                                    #[watch]
                                    set_class_active: ("active", model.tab == DashboardTab::All),
                                    connect_clicked => AppMsg::Tab(DashboardTab::All),
                                },
                                gtk::Button {
                                    set_label: DashboardTab::Aircon.label(),
                                    #[watch]
                                    set_class_active: ("active", model.tab == DashboardTab::Aircon),
                                    connect_clicked => AppMsg::Tab(DashboardTab::Aircon),
                                },
                                gtk::Button {
                                    set_label: DashboardTab::Tv.label(),
                                    #[watch]
                                    set_class_active: ("active", model.tab == DashboardTab::Tv),
                                    connect_clicked => AppMsg::Tab(DashboardTab::Tv),
                                },
                                gtk::Button {
                                    set_label: DashboardTab::Light.label(),
                                    #[watch]
                                    set_class_active: ("active", model.tab == DashboardTab::Light),
                                    connect_clicked => AppMsg::Tab(DashboardTab::Light),
                                },
                                gtk::Box {
                                    set_hexpand: true,
                                },
                                gtk::Button {
                                    #[watch]
                                    set_label: if model.home.all_on() {
                                        "Turn everything off"
                                    } else {
                                        "Turn everything on"
                                    },
                                    connect_clicked => AppMsg::AllPower,
                                },
                            },

                            gtk::Label {
                                set_label: "No devices",
                                add_css_class: "dim-label",
                                #[watch]
                                set_visible: model.listed.is_empty(),
                            },

                            gtk::ScrolledWindow {
                                set_vexpand: true,

                                #[local_ref]
                                device_list -> gtk::ListBox {
                                    set_selection_mode: gtk::SelectionMode::None,
                                    add_css_class: "boxed-list",
                                    add_css_class: "dashboard-list",
                                },
                            },
                        },

                        add_named[Some("device")] = &gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 24,
                            set_margin_all: 16,

                            gtk::Box {
                                set_orientation: gtk::Orientation::Vertical,
                                set_spacing: 12,
                                set_hexpand: true,
                                set_halign: gtk::Align::Center,
                                set_valign: gtk::Align::Center,

                                gtk::Box {
                                    set_spacing: 8,
                                    set_halign: gtk::Align::Center,

                                    gtk::Button {
                                        set_icon_name: "go-previous-symbolic",
                                        #[watch]
                                        set_sensitive: model.selected_index() > 0,
                                        connect_clicked => AppMsg::PreviousDevice,
                                    },
                                    gtk::Label {
                                        add_css_class: "title-3",
                                        #[watch]
                                        set_label: &model.device_title(),
                                    },
                                    gtk::Button {
                                        set_icon_name: "go-next-symbolic",
                                        #[watch]
                                        set_sensitive: model.selected_index() + 1 < model.device_count(),
                                        connect_clicked => AppMsg::NextDevice,
                                    },
                                    gtk::Button {
                                        set_icon_name: "list-add-symbolic",
                                        set_tooltip_text: Some("Add device"),
                                        connect_clicked => AppMsg::AddDevice,
                                    },
                                },

                                gtk::Box {
                                    set_spacing: 12,

                                    gtk::Button {
                                        set_label: "−",
                                        set_valign: gtk::Align::Center,
                                        add_css_class: "circular",
                                        #[watch]
                                        set_sensitive: model.device_power(),
                                        connect_clicked => AppMsg::Step(-1),
                                    },

                                    gtk::Overlay {
                                        #[name = "dial_area"]
                                        gtk::DrawingArea {
                                            add_css_class: "dial",
                                        },

                                        add_overlay = &gtk::Box {
                                            set_orientation: gtk::Orientation::Vertical,
                                            set_halign: gtk::Align::Center,
                                            set_valign: gtk::Align::Center,
                                            set_can_target: false,

                                            gtk::Label {
                                                add_css_class: "dial-readout",
                                                #[watch]
                                                set_label: &model.readout(),
                                            },
                                            gtk::Label {
                                                add_css_class: "dim-label",
                                                #[watch]
                                                set_label: model.caption(),
                                            },
                                        },
                                    },

                                    gtk::Button {
                                        set_label: "+",
                                        set_valign: gtk::Align::Center,
                                        add_css_class: "circular",
                                        #[watch]
                                        set_sensitive: model.device_power(),
                                        connect_clicked => AppMsg::Step(1),
                                    },
                                },

                                gtk::Box {
                                    set_spacing: 8,
                                    set_halign: gtk::Align::Center,
                                    #[watch]
                                    set_visible: model.current_kind() == DeviceKind::Tv,

                                    gtk::Button {
                                        set_icon_name: "go-down-symbolic",
                                        #[watch]
                                        set_sensitive: model.device_power(),
                                        connect_clicked => AppMsg::Channel(-1),
                                    },
                                    gtk::Label {
                                        #[watch]
                                        set_label: &model.channel_label(),
                                    },
                                    gtk::Button {
                                        set_icon_name: "go-up-symbolic",
                                        #[watch]
                                        set_sensitive: model.device_power(),
                                        connect_clicked => AppMsg::Channel(1),
                                    },
                                },
                            },

                            gtk::Box {
                                set_orientation: gtk::Orientation::Vertical,
                                set_spacing: 8,
                                set_width_request: 220,

                                gtk::Label {
                                    set_label: "Mode",
                                    set_xalign: 0.0,
                                    add_css_class: "heading",
                                    #[watch]
                                    set_visible: model.current_kind() != DeviceKind::Tv,
                                },

                                gtk::Box {
                                    set_orientation: gtk::Orientation::Vertical,
                                    set_spacing: 6,
                                    add_css_class: "mode-list",
                                    #[watch]
                                    set_visible: model.current_kind() == DeviceKind::Aircon,
                                    #[watch]
                                    set_sensitive: model.device_power(),

                                    gtk::Button {
                                        set_label: AirconMode::Cool.label(),
                                        #[watch]
                                        set_class_active: ("active", model.aircon_mode() == Some(AirconMode::Cool)),
                                        connect_clicked => AppMsg::AirconMode(AirconMode::Cool),
                                    },
                                    gtk::Button {
                                        set_label: AirconMode::Heat.label(),
                                        #[watch]
                                        set_class_active: ("active", model.aircon_mode() == Some(AirconMode::Heat)),
                                        connect_clicked => AppMsg::AirconMode(AirconMode::Heat),
                                    },
                                    gtk::Button {
                                        set_label: AirconMode::Fan.label(),
                                        #[watch]
                                        set_class_active: ("active", model.aircon_mode() == Some(AirconMode::Fan)),
                                        connect_clicked => AppMsg::AirconMode(AirconMode::Fan),
                                    },
                                    gtk::Button {
                                        set_label: AirconMode::Dry.label(),
                                        #[watch]
                                        set_class_active: ("active", model.aircon_mode() == Some(AirconMode::Dry)),
                                        connect_clicked => AppMsg::AirconMode(AirconMode::Dry),
                                    },
                                },

                                gtk::Box {
                                    set_orientation: gtk::Orientation::Vertical,
                                    set_spacing: 6,
                                    add_css_class: "mode-list",
                                    #[watch]
                                    set_visible: model.current_kind() == DeviceKind::Light,
                                    #[watch]
                                    set_sensitive: model.device_power(),

                                    gtk::Button {
                                        set_label: LightMode::Normal.label(),
                                        #[watch]
                                        set_class_active: ("active", model.light_mode() == Some(LightMode::Normal)),
                                        connect_clicked => AppMsg::LightMode(LightMode::Normal),
                                    },
                                    gtk::Button {
                                        set_label: LightMode::Night.label(),
                                        #[watch]
                                        set_class_active: ("active", model.light_mode() == Some(LightMode::Night)),
                                        connect_clicked => AppMsg::LightMode(LightMode::Night),
                                    },
                                },

                                gtk::Box {
                                    set_vexpand: true,
                                },

                                gtk::Button {
                                    set_icon_name: "system-shutdown-symbolic",
                                    set_halign: gtk::Align::Center,
                                    set_tooltip_text: Some("Power"),
                                    add_css_class: "circular",
                                    add_css_class: "power",
                                    #[watch]
                                    set_class_active: ("on", model.device_power()),
                                    #[watch]
                                    set_sensitive: model.current().is_some(),
                                    connect_clicked => AppMsg::TogglePower,
                                },
                            },
                        },

                        #[watch]
                        set_visible_child_name: if model.page == Page::Dashboard {
                            "dashboard"
                        } else {
                            "device"
                        },
                    },
                },

                #[watch]
                set_visible_child_name: if model.session.is_logged_in() { "panel" } else { "login" },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        theme::apply(config.theme);

        let session = match config::get_session_path() {
            Ok(path) => Session::restored(SessionStore::new(path)),
            Err(e) => {
                log::warn!("Sign-in will not be remembered: {}", e);
                Session::default()
            }
        };

        let rows = FactoryVecDeque::builder()
            .launch(gtk::ListBox::default())
            .forward(sender.input_sender(), |output| match output {
                DeviceRowOutput::TogglePower(kind, index) => AppMsg::DevicePower(kind, index),
                DeviceRowOutput::Open(kind, index) => AppMsg::OpenDevice(kind, index),
            });

        let mut model = AppModel {
            home: Home::seeded(&config.devices),
            theme: config.theme,
            config,
            session,
            page: Page::Device(DeviceKind::Aircon),
            last_kind: DeviceKind::Aircon,
            selection: Selection::default(),
            tab: DashboardTab::All,
            rows,
            listed: Vec::new(),
            username: String::new(),
            password: String::new(),
            login_error: None,
            signing_in: false,
            dial: None,
        };

        model.refresh_rows();

        let device_list = model.rows.widget();
        let widgets = view_output!();

        match model.build_dial(&widgets.dial_area, sender.clone()) {
            Ok(dial) => model.dial = Some(dial),
            Err(e) => log::error!("Failed to set up dial: {}", e),
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Username(username) => self.username = username,
            AppMsg::Password(password) => self.password = password,
            AppMsg::Submit => {
                if self.signing_in {
                    return;
                }
                if let Err(e) = Session::precheck(&self.username, &self.password) {
                    self.login_error = Some(e.to_string());
                    return;
                }
                self.login_error = None;
                self.signing_in = true;
                let delay = Duration::from_millis(self.config.login_delay_ms);
                glib::timeout_add_local_once(delay, move || {
                    sender.input(AppMsg::LoginChecked);
                });
            }
            AppMsg::LoginChecked => {
                self.signing_in = false;
                self.login_error = self
                    .session
                    .login(&self.username, &self.password, &self.config.login)
                    .err()
                    .map(|e| e.to_string());
            }
            AppMsg::Logout => self.session.logout(),
            AppMsg::ToggleTheme => {
                self.theme = self.theme.toggled();
                theme::apply(self.theme);
            }
            AppMsg::Open(page) => {
                if let Page::Device(kind) = page {
                    self.last_kind = kind;
                }
                self.page = page;
            }
            AppMsg::Tab(tab) => self.tab = tab,
            AppMsg::AllPower => {
                let on = self.home.toggle_all();
                log::info!("all devices switched {}", if on { "on" } else { "off" });
            }
            AppMsg::DevicePower(kind, index) => {
                if let Err(e) = self.home.toggle_power(kind, index) {
                    log::debug!("ignored power change: {}", e);
                }
            }
            AppMsg::OpenDevice(kind, index) => {
                if index < self.home.count(kind) {
                    self.selection.set(kind, index);
                    self.last_kind = kind;
                    self.page = Page::Device(kind);
                }
            }
            AppMsg::PreviousDevice => {
                let kind = self.current_kind();
                let index = self.selection.get(kind).saturating_sub(1);
                self.selection.set(kind, index);
            }
            AppMsg::NextDevice => {
                let kind = self.current_kind();
                let index = self.selection.get(kind) + 1;
                if index < self.home.count(kind) {
                    self.selection.set(kind, index);
                }
            }
            AppMsg::AddDevice => {
                let kind = self.current_kind();
                let index = self.home.add(kind);
                self.selection.set(kind, index);
            }
            AppMsg::TogglePower => self.with_current(|device| {
                device.set_power(!device.power());
                Ok(())
            }),
            AppMsg::Step(direction) => self.with_current(|device| device.step(direction)),
            AppMsg::DialChanged(value) => {
                self.with_current(|device| device.set_level(value.round() as i32))
            }
            AppMsg::Channel(delta) => {
                let index = self.selection.tv;
                if let Err(e) = self
                    .home
                    .tv_mut(index)
                    .and_then(|tv| tv.change_channel(delta))
                {
                    log::debug!("ignored channel change: {}", e);
                }
            }
            AppMsg::AirconMode(mode) => {
                if let Ok(ac) = self.home.aircon_mut(self.selection.aircon) {
                    ac.set_mode(mode);
                }
            }
            AppMsg::LightMode(mode) => {
                if let Ok(light) = self.home.light_mut(self.selection.light) {
                    light.set_mode(mode);
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(config) => {
                    log::info!("configuration reloaded");
                    self.theme = config.theme;
                    theme::apply(self.theme);
                    self.config = config;
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }

        self.refresh_rows();
        self.sync_dial();
    }
}
