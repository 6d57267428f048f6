use super::DeviceKind;
use super::model::{Device, DeviceName, Home};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    All,
    Aircon,
    Tv,
    Light,
}

impl DashboardTab {
    pub fn includes(&self, kind: DeviceKind) -> bool {
        match self {
            Self::All => true,
            Self::Aircon => kind == DeviceKind::Aircon,
            Self::Tv => kind == DeviceKind::Tv,
            Self::Light => kind == DeviceKind::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Aircon => "Air conditioners",
            Self::Tv => "Televisions",
            Self::Light => "Lights",
        }
    }
}

/// One dashboard card.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    pub kind: DeviceKind,
    pub index: usize,
    pub name: DeviceName,
    pub power: bool,
    pub status: String,
    pub readout: String,
}

impl DeviceSummary {
    fn of(device: &dyn Device, index: usize) -> Self {
        Self {
            kind: device.kind(),
            index,
            name: device.name().clone(),
            power: device.power(),
            status: device.status(),
            readout: device.readout(),
        }
    }

    pub fn title(&self) -> String {
        format!("{} · {}", self.kind.label(), self.name)
    }

    /// Status and level, or "Off".
    pub fn detail(&self) -> String {
        if self.power {
            format!("{} · {}", self.status, self.readout)
        } else {
            "Off".to_string()
        }
    }
}

impl fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.detail())
    }
}

impl Home {
    pub fn summaries(&self, tab: DashboardTab) -> Vec<DeviceSummary> {
        let aircons = self.aircons.iter().map(|d| d as &dyn Device);
        let tvs = self.tvs.iter().map(|d| d as &dyn Device);
        let lights = self.lights.iter().map(|d| d as &dyn Device);

        [
            aircons.enumerate().collect::<Vec<_>>(),
            tvs.enumerate().collect(),
            lights.enumerate().collect(),
        ]
        .into_iter()
        .flatten()
        .filter(|(_, device)| tab.includes(device.kind()))
        .map(|(index, device)| DeviceSummary::of(device, index))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_all_tab_lists_every_device() {
        let mut home = Home::seeded(&Config::default().devices);
        home.add(DeviceKind::Aircon);
        let summaries = home.summaries(DashboardTab::All);
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[1].index, 1);
        assert_eq!(summaries[1].kind, DeviceKind::Aircon);
    }

    #[test]
    fn test_tab_filters_by_kind() {
        let mut home = Home::seeded(&Config::default().devices);
        home.add(DeviceKind::Light);
        let lights = home.summaries(DashboardTab::Light);
        assert_eq!(lights.len(), 2);
        assert!(lights.iter().all(|s| s.kind == DeviceKind::Light));
    }

    #[test]
    fn test_summary_lines() {
        let mut home = Home::seeded(&Config::default().devices);
        let line = home.summaries(DashboardTab::Aircon)[0].to_string();
        assert_eq!(line, "Air conditioner · Living: Cooling · 24°");

        home.set_all_power(false);
        let line = home.summaries(DashboardTab::Tv)[0].to_string();
        assert_eq!(line, "Television · Living: Off");
    }
}
