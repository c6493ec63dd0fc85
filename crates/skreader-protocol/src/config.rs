//! 测量配置
//!
//! 测量开始前推送给设备的写入型配置。只有 C-800 / C-7000 支持，
//! 视场角与曝光时间还要求 C-7000 固件版本 > 25。

use std::fmt;

/// 测量模式（`MMw,<mode>`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum MeasuringMode {
    /// 环境光（目前唯一支持解码的模式）
    #[default]
    Ambient = 0,
    /// 无线闪光
    CordlessFlash = 1,
    /// 有线闪光
    CordFlash = 2,
}

/// 视场角（`AGw,<fov>`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FieldOfView {
    /// 2°
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "2deg"))]
    TwoDegrees = 0,
    /// 10°
    #[cfg_attr(feature = "serde", serde(rename = "10deg"))]
    TenDegrees = 1,
}

/// 曝光时间（`AMw,<exposure>`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ExposureTime {
    /// 自动
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "auto"))]
    Auto = 0,
    /// 0.1 s
    #[cfg_attr(feature = "serde", serde(rename = "100ms"))]
    Millis100 = 1,
    /// 1 s
    #[cfg_attr(feature = "serde", serde(rename = "1s"))]
    Seconds1 = 2,
}

/// 快门速度（`SSw,0,<code>`），设备使用两位数字代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShutterSpeed {
    #[cfg_attr(feature = "serde", serde(rename = "1s"))]
    Seconds1,
    #[cfg_attr(feature = "serde", serde(rename = "2s"))]
    Seconds2,
    #[cfg_attr(feature = "serde", serde(rename = "4s"))]
    Seconds4,
    #[cfg_attr(feature = "serde", serde(rename = "8s"))]
    Seconds8,
    #[cfg_attr(feature = "serde", serde(rename = "15s"))]
    Seconds15,
    #[cfg_attr(feature = "serde", serde(rename = "30s"))]
    Seconds30,
    #[cfg_attr(feature = "serde", serde(rename = "1/60"))]
    Sixtieth,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "1/125"))]
    OneTwentyFifth,
    #[cfg_attr(feature = "serde", serde(rename = "1/250"))]
    TwoFiftieth,
    #[cfg_attr(feature = "serde", serde(rename = "1/500"))]
    FiveHundredth,
}

impl ShutterSpeed {
    /// 设备协议中的两位代码
    pub fn code(self) -> &'static str {
        match self {
            ShutterSpeed::Seconds1 => "01",
            ShutterSpeed::Seconds2 => "02",
            ShutterSpeed::Seconds4 => "03",
            ShutterSpeed::Seconds8 => "04",
            ShutterSpeed::Seconds15 => "05",
            ShutterSpeed::Seconds30 => "06",
            ShutterSpeed::Sixtieth => "07",
            ShutterSpeed::OneTwentyFifth => "08",
            ShutterSpeed::TwoFiftieth => "09",
            ShutterSpeed::FiveHundredth => "10",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let speed = match code {
            "01" => ShutterSpeed::Seconds1,
            "02" => ShutterSpeed::Seconds2,
            "03" => ShutterSpeed::Seconds4,
            "04" => ShutterSpeed::Seconds8,
            "05" => ShutterSpeed::Seconds15,
            "06" => ShutterSpeed::Seconds30,
            "07" => ShutterSpeed::Sixtieth,
            "08" => ShutterSpeed::OneTwentyFifth,
            "09" => ShutterSpeed::TwoFiftieth,
            "10" => ShutterSpeed::FiveHundredth,
            _ => return None,
        };
        Some(speed)
    }
}

impl fmt::Display for ShutterSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShutterSpeed::Seconds1 => "1 s",
            ShutterSpeed::Seconds2 => "2 s",
            ShutterSpeed::Seconds4 => "4 s",
            ShutterSpeed::Seconds8 => "8 s",
            ShutterSpeed::Seconds15 => "15 s",
            ShutterSpeed::Seconds30 => "30 s",
            ShutterSpeed::Sixtieth => "1/60 s",
            ShutterSpeed::OneTwentyFifth => "1/125 s",
            ShutterSpeed::TwoFiftieth => "1/250 s",
            ShutterSpeed::FiveHundredth => "1/500 s",
        };
        f.write_str(label)
    }
}

/// 测量配置
///
/// 默认值为厂商文档推荐值：环境光、2°、自动曝光、1/125 s。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasurementConfig {
    pub measuring_mode: MeasuringMode,
    pub field_of_view: FieldOfView,
    pub exposure_time: ExposureTime,
    pub shutter_speed: ShutterSpeed,
}
