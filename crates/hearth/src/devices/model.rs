use super::{
    AirconMode, BRIGHTNESS_RANGE, BRIGHTNESS_STEP, CHANNEL_RANGE, DeviceError, DeviceKind,
    LightMode, TEMPERATURE_RANGE, TEMPERATURE_STEP, VOLUME_RANGE, VOLUME_STEP, checked,
};
use crate::config::DeviceConfig;
use derive_more::{AsRef, Deref, Display, From, Into};
use radial::{Accent, ControlProps};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct DeviceId(String);

crate::impl_string_newtype!(DeviceId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct DeviceName(String);

crate::impl_string_newtype!(DeviceName);

/// A simulated appliance whose main setting is driven by the dial.
pub trait Device {
    fn kind(&self) -> DeviceKind;
    fn id(&self) -> &DeviceId;
    fn name(&self) -> &DeviceName;
    fn power(&self) -> bool;
    fn set_power(&mut self, on: bool);
    fn level(&self) -> i32;
    fn set_level(&mut self, level: i32) -> Result<(), DeviceError>;
    /// One press of the -/+ buttons; `direction` is -1 or 1.
    fn step(&mut self, direction: i32) -> Result<(), DeviceError>;
    fn accent(&self) -> Accent;
    /// Short state line, e.g. the active mode.
    fn status(&self) -> String;
    /// Dial readout, e.g. "24°".
    fn readout(&self) -> String;

    fn dial_props(&self, size: f64) -> Result<ControlProps, DeviceError> {
        let range = self.kind().dial_range()?;
        Ok(ControlProps::new(f64::from(self.level()), range, self.accent())
            .with_size(size)
            .with_disabled(!self.power()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirConditioner {
    pub id: DeviceId,
    pub name: DeviceName,
    pub power: bool,
    pub temperature: i32,
    pub mode: AirconMode,
}

impl AirConditioner {
    pub fn set_mode(&mut self, mode: AirconMode) {
        self.mode = mode;
    }
}

impl Device for AirConditioner {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Aircon
    }

    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn name(&self) -> &DeviceName {
        &self.name
    }

    fn power(&self) -> bool {
        self.power
    }

    fn set_power(&mut self, on: bool) {
        self.power = on;
    }

    fn level(&self) -> i32 {
        self.temperature
    }

    fn set_level(&mut self, level: i32) -> Result<(), DeviceError> {
        self.temperature = checked(level, TEMPERATURE_RANGE)?;
        Ok(())
    }

    fn step(&mut self, direction: i32) -> Result<(), DeviceError> {
        self.set_level(self.temperature + direction * TEMPERATURE_STEP)
    }

    fn accent(&self) -> Accent {
        match self.mode {
            AirconMode::Heat => Accent::Heat,
            _ => Accent::Cool,
        }
    }

    fn status(&self) -> String {
        self.mode.label().to_string()
    }

    fn readout(&self) -> String {
        format!("{}°", self.temperature)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Television {
    pub id: DeviceId,
    pub name: DeviceName,
    pub power: bool,
    pub volume: i32,
    pub channel: i32,
}

impl Television {
    pub fn change_channel(&mut self, delta: i32) -> Result<(), DeviceError> {
        self.channel = checked(self.channel + delta, CHANNEL_RANGE)?;
        Ok(())
    }
}

impl Device for Television {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Tv
    }

    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn name(&self) -> &DeviceName {
        &self.name
    }

    fn power(&self) -> bool {
        self.power
    }

    fn set_power(&mut self, on: bool) {
        self.power = on;
    }

    fn level(&self) -> i32 {
        self.volume
    }

    fn set_level(&mut self, level: i32) -> Result<(), DeviceError> {
        self.volume = checked(level, VOLUME_RANGE)?;
        Ok(())
    }

    fn step(&mut self, direction: i32) -> Result<(), DeviceError> {
        let volume = (self.volume + direction * VOLUME_STEP)
            .clamp(*VOLUME_RANGE.start(), *VOLUME_RANGE.end());
        self.set_level(volume)
    }

    fn accent(&self) -> Accent {
        Accent::Media
    }

    fn status(&self) -> String {
        format!("Channel {}", self.channel)
    }

    fn readout(&self) -> String {
        self.volume.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub id: DeviceId,
    pub name: DeviceName,
    pub power: bool,
    pub brightness: i32,
    pub mode: LightMode,
}

impl Light {
    pub fn set_mode(&mut self, mode: LightMode) {
        self.mode = mode;
    }
}

impl Device for Light {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Light
    }

    fn id(&self) -> &DeviceId {
        &self.id
    }

    fn name(&self) -> &DeviceName {
        &self.name
    }

    fn power(&self) -> bool {
        self.power
    }

    fn set_power(&mut self, on: bool) {
        self.power = on;
    }

    fn level(&self) -> i32 {
        self.brightness
    }

    fn set_level(&mut self, level: i32) -> Result<(), DeviceError> {
        self.brightness = checked(level, BRIGHTNESS_RANGE)?;
        Ok(())
    }

    fn step(&mut self, direction: i32) -> Result<(), DeviceError> {
        let brightness = (self.brightness + direction * BRIGHTNESS_STEP)
            .clamp(*BRIGHTNESS_RANGE.start(), *BRIGHTNESS_RANGE.end());
        self.set_level(brightness)
    }

    fn accent(&self) -> Accent {
        Accent::Amber
    }

    fn status(&self) -> String {
        self.mode.label().to_string()
    }

    fn readout(&self) -> String {
        format!("{}%", self.brightness)
    }
}

/// Every simulated device, grouped by kind. Indices are per kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Home {
    pub aircons: Vec<AirConditioner>,
    pub tvs: Vec<Television>,
    pub lights: Vec<Light>,
}

impl Home {
    /// Devices from configuration start powered on with their usual settings.
    pub fn seeded(seeds: &[DeviceConfig]) -> Self {
        let mut home = Self::default();
        for seed in seeds {
            let index = home.add(seed.kind);
            match seed.kind {
                DeviceKind::Aircon => {
                    let ac = &mut home.aircons[index];
                    ac.power = true;
                    ac.temperature = 24;
                    if let Some(name) = &seed.name {
                        ac.name = name.clone();
                    }
                }
                DeviceKind::Tv => {
                    let tv = &mut home.tvs[index];
                    tv.power = true;
                    tv.volume = 30;
                    if let Some(name) = &seed.name {
                        tv.name = name.clone();
                    }
                }
                DeviceKind::Light => {
                    let light = &mut home.lights[index];
                    light.power = true;
                    light.brightness = 60;
                    if let Some(name) = &seed.name {
                        light.name = name.clone();
                    }
                }
            }
        }
        home
    }

    pub fn count(&self, kind: DeviceKind) -> usize {
        match kind {
            DeviceKind::Aircon => self.aircons.len(),
            DeviceKind::Tv => self.tvs.len(),
            DeviceKind::Light => self.lights.len(),
        }
    }

    /// Appends a powered-off device with default settings and returns its index.
    pub fn add(&mut self, kind: DeviceKind) -> usize {
        let number = self.count(kind) + 1;
        let id = DeviceId::new(format!("{kind}-{number}"));
        let name = DeviceName::new(format!("{} {number}", kind.label()));

        match kind {
            DeviceKind::Aircon => self.aircons.push(AirConditioner {
                id,
                name,
                power: false,
                temperature: 25,
                mode: AirconMode::Cool,
            }),
            DeviceKind::Tv => self.tvs.push(Television {
                id,
                name,
                power: false,
                volume: 20,
                channel: 1,
            }),
            DeviceKind::Light => self.lights.push(Light {
                id,
                name,
                power: false,
                brightness: 50,
                mode: LightMode::Normal,
            }),
        }
        log::debug!("added {kind} #{number}");
        number - 1
    }

    pub fn device(&self, kind: DeviceKind, index: usize) -> Result<&dyn Device, DeviceError> {
        let device: Option<&dyn Device> = match kind {
            DeviceKind::Aircon => self.aircons.get(index).map(|d| d as &dyn Device),
            DeviceKind::Tv => self.tvs.get(index).map(|d| d as &dyn Device),
            DeviceKind::Light => self.lights.get(index).map(|d| d as &dyn Device),
        };
        device.ok_or(DeviceError::NoSuchDevice { kind, index })
    }

    pub fn device_mut(
        &mut self,
        kind: DeviceKind,
        index: usize,
    ) -> Result<&mut dyn Device, DeviceError> {
        let device: Option<&mut dyn Device> = match kind {
            DeviceKind::Aircon => self.aircons.get_mut(index).map(|d| d as &mut dyn Device),
            DeviceKind::Tv => self.tvs.get_mut(index).map(|d| d as &mut dyn Device),
            DeviceKind::Light => self.lights.get_mut(index).map(|d| d as &mut dyn Device),
        };
        device.ok_or(DeviceError::NoSuchDevice { kind, index })
    }

    pub fn aircon_mut(&mut self, index: usize) -> Result<&mut AirConditioner, DeviceError> {
        self.aircons.get_mut(index).ok_or(DeviceError::NoSuchDevice {
            kind: DeviceKind::Aircon,
            index,
        })
    }

    pub fn tv_mut(&mut self, index: usize) -> Result<&mut Television, DeviceError> {
        self.tvs.get_mut(index).ok_or(DeviceError::NoSuchDevice {
            kind: DeviceKind::Tv,
            index,
        })
    }

    pub fn light_mut(&mut self, index: usize) -> Result<&mut Light, DeviceError> {
        self.lights.get_mut(index).ok_or(DeviceError::NoSuchDevice {
            kind: DeviceKind::Light,
            index,
        })
    }

    /// Flips one device's power and returns its new state.
    pub fn toggle_power(&mut self, kind: DeviceKind, index: usize) -> Result<bool, DeviceError> {
        let device = self.device_mut(kind, index)?;
        let on = !device.power();
        device.set_power(on);
        log::info!("{} switched {}", device.id(), if on { "on" } else { "off" });
        Ok(on)
    }

    pub fn devices(&self) -> impl Iterator<Item = &dyn Device> {
        let aircons = self.aircons.iter().map(|d| d as &dyn Device);
        let tvs = self.tvs.iter().map(|d| d as &dyn Device);
        let lights = self.lights.iter().map(|d| d as &dyn Device);
        aircons.chain(tvs).chain(lights)
    }

    pub fn all_on(&self) -> bool {
        self.devices().all(|d| d.power())
    }

    pub fn set_all_power(&mut self, on: bool) {
        self.aircons.iter_mut().for_each(|d| d.power = on);
        self.tvs.iter_mut().for_each(|d| d.power = on);
        self.lights.iter_mut().for_each(|d| d.power = on);
    }

    /// Master switch: everything off when all are on, otherwise everything on.
    pub fn toggle_all(&mut self) -> bool {
        let on = !self.all_on();
        self.set_all_power(on);
        on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn home() -> Home {
        Home::seeded(&Config::default().devices)
    }

    #[test]
    fn test_default_seed() {
        let home = home();
        assert_eq!(home.count(DeviceKind::Aircon), 1);
        assert_eq!(home.count(DeviceKind::Tv), 1);
        assert_eq!(home.count(DeviceKind::Light), 1);
        let ac = &home.aircons[0];
        assert_eq!(ac.id.as_str(), "aircon-1");
        assert_eq!(ac.name.as_str(), "Living");
        assert!(ac.power);
        assert_eq!(ac.temperature, 24);
        assert_eq!(home.tvs[0].volume, 30);
        assert_eq!(home.lights[0].brightness, 60);
        assert!(home.all_on());
    }

    #[test]
    fn test_add_appends_powered_off_defaults() {
        let mut home = home();
        let index = home.add(DeviceKind::Tv);
        assert_eq!(index, 1);
        let tv = &home.tvs[1];
        assert_eq!(tv.id.as_str(), "tv-2");
        assert_eq!(tv.name.as_str(), "Television 2");
        assert!(!tv.power);
        assert_eq!((tv.volume, tv.channel), (20, 1));
        assert!(!home.all_on());
    }

    #[test]
    fn test_temperature_rejects_out_of_range() {
        let mut home = home();
        let ac = home.device_mut(DeviceKind::Aircon, 0).unwrap();
        assert!(ac.set_level(31).is_err());
        assert_eq!(ac.level(), 24);
        ac.set_level(30).unwrap();
        assert!(ac.step(1).is_err());
        ac.step(-1).unwrap();
        assert_eq!(ac.level(), 29);
    }

    #[test]
    fn test_volume_and_brightness_steps_clamp() {
        let mut home = home();
        let tv = home.device_mut(DeviceKind::Tv, 0).unwrap();
        tv.set_level(98).unwrap();
        tv.step(1).unwrap();
        assert_eq!(tv.level(), 100);

        let light = home.device_mut(DeviceKind::Light, 0).unwrap();
        light.set_level(12).unwrap();
        light.step(-1).unwrap();
        assert_eq!(light.level(), 10);
    }

    #[test]
    fn test_channel_bounds() {
        let mut home = home();
        let tv = home.tv_mut(0).unwrap();
        assert!(tv.change_channel(-1).is_err());
        tv.change_channel(1).unwrap();
        assert_eq!(tv.channel, 2);
    }

    #[test]
    fn test_accent_follows_mode() {
        let mut home = home();
        assert_eq!(home.aircons[0].accent(), Accent::Cool);
        home.aircon_mut(0).unwrap().set_mode(AirconMode::Heat);
        assert_eq!(home.aircons[0].accent(), Accent::Heat);
        assert_eq!(home.lights[0].accent(), Accent::Amber);
    }

    #[test]
    fn test_dial_props_disable_when_off() {
        let mut home = home();
        let props = home.device(DeviceKind::Light, 0).unwrap().dial_props(288.0).unwrap();
        assert_eq!(props.value, 60.0);
        assert!(!props.disabled);
        assert_eq!(props.range.min(), 10.0);

        home.device_mut(DeviceKind::Light, 0).unwrap().set_power(false);
        let props = home.device(DeviceKind::Light, 0).unwrap().dial_props(288.0).unwrap();
        assert!(props.disabled);
    }

    #[test]
    fn test_missing_device() {
        let home = home();
        assert_eq!(
            home.device(DeviceKind::Tv, 3).err(),
            Some(DeviceError::NoSuchDevice {
                kind: DeviceKind::Tv,
                index: 3
            })
        );
    }

    #[test]
    fn test_toggle_power_touches_one_device() {
        let mut home = home();
        home.add(DeviceKind::Light);
        home.set_all_power(true);
        assert!(home.all_on());

        assert_eq!(home.toggle_power(DeviceKind::Light, 1), Ok(false));
        assert!(!home.lights[1].power);
        assert!(home.lights[0].power);
        assert!(home.aircons[0].power && home.tvs[0].power);
        assert!(!home.all_on());

        assert_eq!(home.toggle_power(DeviceKind::Light, 1), Ok(true));
        assert!(home.all_on());
        assert!(home.toggle_power(DeviceKind::Tv, 4).is_err());
    }

    #[test]
    fn test_toggle_all() {
        let mut home = home();
        home.add(DeviceKind::Light);
        assert!(home.toggle_all());
        assert!(home.all_on());
        assert!(!home.toggle_all());
        assert!(home.devices().all(|d| !d.power()));
    }
}
