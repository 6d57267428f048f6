use radial::{RadialError, Range};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::ops::RangeInclusive;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub mod dashboard;
pub mod model;

pub use dashboard::{DashboardTab, DeviceSummary};
pub use model::{AirConditioner, Device, DeviceId, DeviceName, Home, Light, Television};

pub const TEMPERATURE_RANGE: RangeInclusive<i32> = 16..=30;
pub const VOLUME_RANGE: RangeInclusive<i32> = 0..=100;
pub const CHANNEL_RANGE: RangeInclusive<i32> = 1..=100;
pub const BRIGHTNESS_RANGE: RangeInclusive<i32> = 10..=100;
pub const TEMPERATURE_STEP: i32 = 1;
pub const VOLUME_STEP: i32 = 5;
pub const BRIGHTNESS_STEP: i32 = 5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[strum(to_string = "aircon", serialize = "ac", serialize = "AirConditioner")]
    Aircon,
    #[strum(to_string = "tv", serialize = "Television")]
    Tv,
    #[strum(to_string = "light", serialize = "Lighting")]
    Light,
}

impl DeviceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aircon => "Air conditioner",
            Self::Tv => "Television",
            Self::Light => "Light",
        }
    }

    pub fn dial_caption(&self) -> &'static str {
        match self {
            Self::Aircon => "Temperature",
            Self::Tv => "Volume",
            Self::Light => "Brightness",
        }
    }

    /// Bounds of the value the dial controls.
    pub fn level_range(&self) -> RangeInclusive<i32> {
        match self {
            Self::Aircon => TEMPERATURE_RANGE,
            Self::Tv => VOLUME_RANGE,
            Self::Light => BRIGHTNESS_RANGE,
        }
    }

    pub fn dial_range(&self) -> Result<Range, RadialError> {
        let levels = self.level_range();
        Range::new(f64::from(*levels.start()), f64::from(*levels.end()))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AirconMode {
    #[default]
    #[strum(to_string = "cool")]
    Cool,
    #[strum(to_string = "heat")]
    Heat,
    #[strum(to_string = "fan")]
    Fan,
    #[strum(to_string = "dry")]
    Dry,
}

impl AirconMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cool => "Cooling",
            Self::Heat => "Heating",
            Self::Fan => "Fan",
            Self::Dry => "Dry",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    #[default]
    #[strum(to_string = "normal")]
    Normal,
    #[strum(to_string = "night")]
    Night,
}

impl LightMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Night => "Night",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("No {kind} at index {index}")]
    NoSuchDevice { kind: DeviceKind, index: usize },
    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: i32, min: i32, max: i32 },
    #[error(transparent)]
    Dial(#[from] RadialError),
}

/// `value` if it lies in `range`.
pub fn checked(value: i32, range: RangeInclusive<i32>) -> Result<i32, DeviceError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(DeviceError::OutOfRange {
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
