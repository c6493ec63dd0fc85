//! # JSON 报告
//!
//! 测量结果的可序列化视图。字段名与桌面端工具使用的 JSON 格式保持一致，
//! 数值只输出原始值（`DecimalValue::value`），不携带量程状态。

use serde::Serialize;
use skreader_protocol::{DecimalValue, DeviceState, Measurement};

/// 设备信息 + 测量结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceReport {
    pub device: String,
    pub model: String,
    pub firmware: String,
    pub status: String,
    pub remote: String,
    pub button: String,
    pub ring: String,
    pub measurements: Vec<MeasurementReport>,
}

impl DeviceReport {
    const NOT_AVAILABLE: &'static str = "n/a";

    pub fn new(device: &str, model: &str, firmware: Option<i32>, state: &DeviceState) -> Self {
        Self {
            device: device.to_string(),
            model: model.to_string(),
            firmware: firmware.map_or_else(|| Self::NOT_AVAILABLE.to_string(), |v| v.to_string()),
            status: state.status.to_string(),
            remote: state.remote.to_string(),
            button: state.buttons.to_string(),
            ring: state.ring.to_string(),
            measurements: Vec::new(),
        }
    }

    /// 离线（`--fake-device`）模式下的占位设备信息
    pub fn fake() -> Self {
        let na = || Self::NOT_AVAILABLE.to_string();
        Self {
            device: "fake-device".to_string(),
            model: na(),
            firmware: na(),
            status: na(),
            remote: na(),
            button: na(),
            ring: na(),
            measurements: Vec::new(),
        }
    }

    pub fn with_measurement(mut self, report: MeasurementReport) -> Self {
        self.measurements.push(report);
        self
    }
}

/// 单次测量
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeasurementReport {
    pub name: String,
    pub note: String,
    /// Unix 时间戳（秒）
    pub timestamp: i64,
    pub illuminance: IlluminanceReport,
    pub color_temperature: ColorTemperatureReport,
    pub tristimulus: TristimulusReport,
    #[serde(rename = "CIE1931")]
    pub cie1931: Cie1931Report,
    #[serde(rename = "CIE1976")]
    pub cie1976: Cie1976Report,
    #[serde(rename = "DWL")]
    pub dwl: DwlReport,
    #[serde(rename = "CRI")]
    pub cri: CriReport,
    pub wave_lengths: Vec<WaveLengthGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IlluminanceReport {
    #[serde(rename = "LUX")]
    pub lux: f64,
    #[serde(rename = "Fc")]
    pub foot_candle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorTemperatureReport {
    #[serde(rename = "CCT")]
    pub cct: f64,
    #[serde(rename = "CCT DeltaUV")]
    pub delta_uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct TristimulusReport {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Cie1931Report {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cie1976Report {
    #[serde(rename = "Ud")]
    pub u_prime: f64,
    #[serde(rename = "Vd")]
    pub v_prime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DwlReport {
    pub wavelength: f64,
    pub excitation_purity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriReport {
    #[serde(rename = "RA")]
    pub ra: f64,
    #[serde(rename = "Ri")]
    pub ri: Vec<RiEntry>,
}

/// 特殊显色指数 R1..R15
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiEntry {
    #[serde(rename = "Ri")]
    pub index: u8,
    pub value: f64,
}

/// 一组光谱数据（`1nm` 或 `5nm`）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveLengthGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub waves: Vec<Wave>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wave {
    #[serde(rename = "Nm")]
    pub nm: u16,
    pub value: f64,
}

impl WaveLengthGroup {
    fn new(kind: &str, wavelengths: impl Iterator<Item = u16>, values: &[DecimalValue]) -> Self {
        Self {
            kind: kind.to_string(),
            waves: wavelengths
                .zip(values)
                .map(|(nm, v)| Wave { nm, value: v.value })
                .collect(),
        }
    }
}

impl MeasurementReport {
    pub fn new(measurement: &Measurement, name: &str, note: &str, timestamp: i64) -> Self {
        let m = measurement;
        Self {
            name: name.to_string(),
            note: note.to_string(),
            timestamp,
            illuminance: IlluminanceReport {
                lux: m.illuminance.lux.value,
                foot_candle: m.illuminance.foot_candle.value,
            },
            color_temperature: ColorTemperatureReport {
                cct: m.color_temperature.tcp.value,
                delta_uv: m.color_temperature.delta_uv.value,
            },
            tristimulus: TristimulusReport {
                x: m.tristimulus.x.value,
                y: m.tristimulus.y.value,
                z: m.tristimulus.z.value,
            },
            cie1931: Cie1931Report {
                x: m.cie1931.x.value,
                y: m.cie1931.y.value,
            },
            cie1976: Cie1976Report {
                u_prime: m.cie1976.u_prime.value,
                v_prime: m.cie1976.v_prime.value,
            },
            dwl: DwlReport {
                wavelength: m.dominant_wavelength.wavelength.value,
                excitation_purity: m.dominant_wavelength.excitation_purity.value,
            },
            cri: CriReport {
                ra: m.color_rendition.ra.value,
                ri: (1u8..)
                    .zip(&m.color_rendition.ri)
                    .map(|(index, v)| RiEntry {
                        index,
                        value: v.value,
                    })
                    .collect(),
            },
            wave_lengths: vec![
                WaveLengthGroup::new("1nm", Measurement::wavelengths_1nm(), &m.spectral_1nm),
                WaveLengthGroup::new("5nm", Measurement::wavelengths_5nm(), &m.spectral_5nm),
            ],
        }
    }
}
