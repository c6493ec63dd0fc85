//! 测量结果（NR 命令）解码
//!
//! 响应帧以 `NR` 回显开头，之后是固定偏移的大端 IEEE-754 字段。
//! 偏移量从帧首字节算起，布局在 C-700 / C-800 / C-7000 上一致。
//!
//! 解码分两步：先按字段表解析所有标量，再按固定顺序执行跨字段的
//! 量程修正。修正步骤之间有依赖，后一步读取前一步修改后的量程，
//! 因此必须严格按 [`Measurement::decode`] 中的顺序执行。

use crate::{
    DecimalValue, ProtocolError, ValueRange, f32_from_be_at, f64_from_be_at, illuminance_value,
};
use std::fmt;

/// 测量结果最小长度
pub const MEASUREMENT_DATA_MIN_LEN: usize = 2380;

/// 光谱起始波长（nm）
pub const SPECTRUM_START_NM: u16 = 380;

/// 1nm 光谱点数（380..=780）
pub const SPECTRUM_1NM_LEN: usize = 401;

/// 5nm 光谱点数（380..=780，步长 5）
pub const SPECTRUM_5NM_LEN: usize = 81;

/// 特殊显色指数个数（R1..R15）
pub const RI_COUNT: usize = 15;

/// 照度超量程时光谱数据的固定值
pub const SPECTRUM_OVER_VALUE: f64 = 9999.9;

/// 低照度阈值：低于该值时色度类数据不可信
pub const LOW_LIGHT_LUX: f64 = 5.0;

// 字段偏移
const OFFSET_CCT: usize = 50;
const OFFSET_DELTA_UV: usize = 55;
const OFFSET_LUX: usize = 271;
const OFFSET_FOOT_CANDLE: usize = 276;
const OFFSET_TRISTIMULUS_X: usize = 281;
const OFFSET_TRISTIMULUS_Y: usize = 290;
const OFFSET_TRISTIMULUS_Z: usize = 299;
const OFFSET_CIE1931_X: usize = 308;
const OFFSET_CIE1931_Y: usize = 313;
const OFFSET_CIE1976_U: usize = 328;
const OFFSET_CIE1976_V: usize = 333;
const OFFSET_DWL: usize = 338;
const OFFSET_PURITY: usize = 343;
const OFFSET_RA: usize = 348;
const OFFSET_RI: usize = 353;
const STRIDE_RI: usize = 5;
const OFFSET_SPECTRUM_5NM: usize = 428;
const OFFSET_SPECTRUM_1NM: usize = 753;
const STRIDE_SPECTRUM: usize = 4;
const OFFSET_PPFD: usize = 2376;

// 字段量程
const CCT_RANGE: (f64, f64) = (1563.0, 100_000.0);
const DELTA_UV_RANGE: (f64, f64) = (-0.1, 0.1);
const LUX_RANGE: (f64, f64) = (100.0, 200_000.0);
const FOOT_CANDLE_LOW: f32 = 0.093;
const FOOT_CANDLE_HIGH: f64 = 18_580.607_421_875;
const TRISTIMULUS_RANGE: (f64, f64) = (0.0, 1_000_000.0);
const UNIT_RANGE: (f64, f64) = (0.0, 1.0);
const DWL_RANGE: (f64, f64) = (-780.0, 780.0);
const PURITY_RANGE: (f64, f64) = (0.0, 100.0);
const CRI_RANGE: (f64, f64) = (-100.0, 100.0);
const SPECTRUM_RANGE: (f64, f64) = (0.0, SPECTRUM_OVER_VALUE);

/// 三刺激值 XYZ
#[derive(Debug, Clone, PartialEq)]
pub struct Tristimulus {
    pub x: DecimalValue,
    pub y: DecimalValue,
    pub z: DecimalValue,
}

/// 相关色温与普朗克轨迹偏差
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTemperature {
    /// 相关色温 Tcp（K）
    pub tcp: DecimalValue,
    /// ΔUv
    pub delta_uv: DecimalValue,
}

/// 照度（lx / fc）
#[derive(Debug, Clone, PartialEq)]
pub struct Illuminance {
    pub lux: DecimalValue,
    pub foot_candle: DecimalValue,
}

/// CIE 1931 色度坐标 (x, y, z)
#[derive(Debug, Clone, PartialEq)]
pub struct Cie1931 {
    pub x: DecimalValue,
    pub y: DecimalValue,
    /// 由 `1 - x - y` 推导
    pub z: DecimalValue,
}

/// CIE 1976 色度坐标 (u', v')
#[derive(Debug, Clone, PartialEq)]
pub struct Cie1976 {
    pub u_prime: DecimalValue,
    pub v_prime: DecimalValue,
}

/// 主波长（nm）与兴奋纯度（%）
#[derive(Debug, Clone, PartialEq)]
pub struct DominantWavelength {
    pub wavelength: DecimalValue,
    pub excitation_purity: DecimalValue,
}

/// 显色指数 Ra 与 R1..R15
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRendition {
    pub ra: DecimalValue,
    pub ri: [DecimalValue; RI_COUNT],
}

/// 一次环境光测量的完整结果
///
/// 解码后不再修改，由请求方独占。
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub tristimulus: Tristimulus,
    pub color_temperature: ColorTemperature,
    pub illuminance: Illuminance,
    pub cie1931: Cie1931,
    pub cie1976: Cie1976,
    pub dominant_wavelength: DominantWavelength,
    /// 光合光子通量密度
    pub ppfd: DecimalValue,
    pub color_rendition: ColorRendition,
    /// 380..=780 nm，步长 5
    pub spectral_5nm: [DecimalValue; SPECTRUM_5NM_LEN],
    /// 380..=780 nm，步长 1
    pub spectral_1nm: [DecimalValue; SPECTRUM_1NM_LEN],
    /// 峰值波长（nm），照度超量程时为 `None`；没有正值时为 380
    pub peak_wavelength: Option<u16>,
}

fn field(data: &[u8], offset: usize, (low, high): (f64, f64), precision: usize) -> DecimalValue {
    DecimalValue::new(f32_from_be_at(data, offset), low, high, precision)
}

fn field_f64(data: &[u8], offset: usize, (low, high): (f64, f64), precision: usize) -> DecimalValue {
    DecimalValue::new(f64_from_be_at(data, offset), low, high, precision)
}

/// 1 - x - y；x、y 任一超量程时继承其量程（x 优先）
fn derive_z(x: &DecimalValue, y: &DecimalValue) -> DecimalValue {
    if !x.is_ok() {
        DecimalValue::out_of_range(0.0, x.range)
    } else if !y.is_ok() {
        DecimalValue::out_of_range(0.0, y.range)
    } else {
        DecimalValue::new(1.0 - x.value - y.value, UNIT_RANGE.0, UNIT_RANGE.1, 4)
    }
}

impl Measurement {
    /// 从 NR 响应帧解码
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < MEASUREMENT_DATA_MIN_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: MEASUREMENT_DATA_MIN_LEN,
                actual: data.len(),
            });
        }

        let mut m = Self::parse_fields(data);

        // 修正顺序不可调整
        m.sync_cct_with_delta_uv();
        m.derive_cie1931_z();
        m.resolve_spectra(data);
        m.invalidate_low_light();
        m.propagate_cct_range();

        Ok(m)
    }

    /// 按字段表解析所有标量，光谱暂时置为空值
    fn parse_fields(data: &[u8]) -> Self {
        let ri = std::array::from_fn(|i| field(data, OFFSET_RI + i * STRIDE_RI, CRI_RANGE, 1));

        Self {
            tristimulus: Tristimulus {
                x: field_f64(data, OFFSET_TRISTIMULUS_X, TRISTIMULUS_RANGE, 4),
                y: field_f64(data, OFFSET_TRISTIMULUS_Y, TRISTIMULUS_RANGE, 4),
                z: field_f64(data, OFFSET_TRISTIMULUS_Z, TRISTIMULUS_RANGE, 4),
            },
            color_temperature: ColorTemperature {
                tcp: field(data, OFFSET_CCT, CCT_RANGE, 0),
                delta_uv: field(data, OFFSET_DELTA_UV, DELTA_UV_RANGE, 4),
            },
            illuminance: Illuminance {
                lux: illuminance_value(f32_from_be_at(data, OFFSET_LUX), LUX_RANGE.0, LUX_RANGE.1),
                foot_candle: illuminance_value(
                    f32_from_be_at(data, OFFSET_FOOT_CANDLE),
                    f64::from(FOOT_CANDLE_LOW),
                    FOOT_CANDLE_HIGH,
                ),
            },
            cie1931: Cie1931 {
                x: field(data, OFFSET_CIE1931_X, UNIT_RANGE, 4),
                y: field(data, OFFSET_CIE1931_Y, UNIT_RANGE, 4),
                z: DecimalValue::default(),
            },
            cie1976: Cie1976 {
                u_prime: field(data, OFFSET_CIE1976_U, UNIT_RANGE, 4),
                v_prime: field(data, OFFSET_CIE1976_V, UNIT_RANGE, 4),
            },
            dominant_wavelength: DominantWavelength {
                wavelength: field(data, OFFSET_DWL, DWL_RANGE, 0),
                excitation_purity: field(data, OFFSET_PURITY, PURITY_RANGE, 1),
            },
            ppfd: field(data, OFFSET_PPFD, SPECTRUM_RANGE, 1),
            color_rendition: ColorRendition {
                ra: field(data, OFFSET_RA, CRI_RANGE, 1),
                ri,
            },
            spectral_5nm: std::array::from_fn(|_| DecimalValue::default()),
            spectral_1nm: std::array::from_fn(|_| DecimalValue::default()),
            peak_wavelength: None,
        }
    }

    /// ΔUv 超量程时 CCT 跟随（部分型号会返回钳位后的 CCT 数值而不是超量程标记）
    fn sync_cct_with_delta_uv(&mut self) {
        let range = self.color_temperature.delta_uv.range;
        self.color_temperature.tcp.invalidate(range);
    }

    fn derive_cie1931_z(&mut self) {
        self.cie1931.z = derive_z(&self.cie1931.x, &self.cie1931.y);
    }

    /// 根据照度量程决定光谱数据：欠量程全部 Under，超量程全部 Over（9999.9），
    /// 否则正常解析并计算峰值波长
    fn resolve_spectra(&mut self, data: &[u8]) {
        match self.illuminance.lux.range {
            ValueRange::Under => {
                let under = DecimalValue::out_of_range(0.0, ValueRange::Under);
                self.spectral_5nm = std::array::from_fn(|_| under.clone());
                self.spectral_1nm = std::array::from_fn(|_| under.clone());
            },
            ValueRange::Over => {
                let over = DecimalValue::out_of_range(SPECTRUM_OVER_VALUE, ValueRange::Over);
                self.spectral_5nm = std::array::from_fn(|_| over.clone());
                self.spectral_1nm = std::array::from_fn(|_| over.clone());
            },
            ValueRange::Ok => {
                self.spectral_5nm = std::array::from_fn(|i| {
                    field(data, OFFSET_SPECTRUM_5NM + i * STRIDE_SPECTRUM, SPECTRUM_RANGE, 8)
                });
                self.spectral_1nm = std::array::from_fn(|i| {
                    field(data, OFFSET_SPECTRUM_1NM + i * STRIDE_SPECTRUM, SPECTRUM_RANGE, 8)
                });
                self.peak_wavelength = Some(peak_wavelength(&self.spectral_1nm));
            },
        }
    }

    /// 照度在量程内但低于 5 lx 时，色度类数据全部标记为 Under
    fn invalidate_low_light(&mut self) {
        let lux = &self.illuminance.lux;
        if !lux.is_ok() || lux.value >= LOW_LIGHT_LUX {
            return;
        }

        let under = ValueRange::Under;
        self.color_temperature.tcp.invalidate(under);
        self.color_temperature.delta_uv.invalidate(under);
        self.cie1931.x.invalidate(under);
        self.cie1931.y.invalidate(under);
        self.cie1931.z.invalidate(under);
        self.cie1976.u_prime.invalidate(under);
        self.cie1976.v_prime.invalidate(under);
        self.dominant_wavelength.wavelength.invalidate(under);
        self.dominant_wavelength.excitation_purity.invalidate(under);
        self.color_rendition.ra.invalidate(under);
        for ri in &mut self.color_rendition.ri {
            ri.invalidate(under);
        }
    }

    /// CCT 不可用时，ΔUv 与显色指数随之不可用
    fn propagate_cct_range(&mut self) {
        let range = self.color_temperature.tcp.range;
        if range.is_ok() {
            return;
        }

        self.color_temperature.delta_uv.invalidate(range);
        self.color_rendition.ra.invalidate(range);
        for ri in &mut self.color_rendition.ri {
            ri.invalidate(range);
        }
    }

    /// 1nm 光谱各点对应的波长
    pub fn wavelengths_1nm() -> impl Iterator<Item = u16> {
        (0..SPECTRUM_1NM_LEN as u16).map(|i| SPECTRUM_START_NM + i)
    }

    /// 5nm 光谱各点对应的波长
    pub fn wavelengths_5nm() -> impl Iterator<Item = u16> {
        (0..SPECTRUM_5NM_LEN as u16).map(|i| SPECTRUM_START_NM + i * 5)
    }
}

/// 最大的严格正值所在波长，相同最大值取波长最短者，没有正值时为起始波长
fn peak_wavelength(spectrum: &[DecimalValue]) -> u16 {
    let mut peak: Option<(usize, f64)> = None;
    for (i, v) in spectrum.iter().enumerate() {
        if v.value <= 0.0 {
            continue;
        }
        match peak {
            Some((_, max)) if v.value <= max => {},
            _ => peak = Some((i, v.value)),
        }
    }
    SPECTRUM_START_NM + peak.map_or(0, |(i, _)| i as u16)
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lux={} x={} y={} CCT={}",
            self.illuminance.lux,
            self.cie1931.x,
            self.cie1931.y,
            self.color_temperature.tcp
        )
    }
}
