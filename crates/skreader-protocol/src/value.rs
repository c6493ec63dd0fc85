//! 带量程校验的十进制数值
//!
//! 设备对每个测量字段都声明了合法量程。超出量程的值不再以数字显示，
//! 而是显示为 `Under` / `Over`。

use std::fmt;

/// 数值量程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueRange {
    /// 在量程内
    #[default]
    Ok,
    /// 低于量程下限
    Under,
    /// 高于量程上限
    Over,
}

impl ValueRange {
    pub fn is_ok(self) -> bool {
        self == ValueRange::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueRange::Ok => "Ok",
            ValueRange::Under => "Under",
            ValueRange::Over => "Over",
        }
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 十进制数值
///
/// 不变量：`range != Ok` 时，`formatted` 等于量程名称（`"Under"` / `"Over"`），
/// 而不是数字文本。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecimalValue {
    /// 原始数值
    pub value: f64,
    /// 按精度格式化后的文本
    pub formatted: String,
    /// 量程状态
    pub range: ValueRange,
}

impl DecimalValue {
    /// 根据量程 `[low, high]` 和小数位数构造数值
    pub fn new(value: f64, low: f64, high: f64, precision: usize) -> Self {
        let range = if value < low {
            ValueRange::Under
        } else if value > high {
            ValueRange::Over
        } else {
            ValueRange::Ok
        };

        let formatted = match range {
            ValueRange::Ok => format!("{:.*}", precision, value),
            _ => range.to_string(),
        };

        Self {
            value,
            formatted,
            range,
        }
    }

    /// 构造一个未解析、直接标记为超量程的数值
    pub fn out_of_range(value: f64, range: ValueRange) -> Self {
        let mut v = Self {
            value,
            formatted: String::new(),
            range: ValueRange::Ok,
        };
        v.invalidate(range);
        v
    }

    /// 强制设置量程状态（`Ok` 不做任何修改）
    ///
    /// `value` 保持不变，`formatted` 改写为量程名称。
    pub fn invalidate(&mut self, range: ValueRange) {
        if range.is_ok() {
            return;
        }
        self.range = range;
        self.formatted = range.to_string();
    }

    pub fn is_ok(&self) -> bool {
        self.range.is_ok()
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted)
    }
}

/// 四舍五入到指定小数位（远离零方向）
pub fn round_to(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale).round() / scale
}

/// 照度类数值（lx / fc）的分级舍入
///
/// 阈值来自设备 SDK 的 binary32 常量。
pub fn round_illuminance(value: f64) -> f64 {
    if value < f64::from(9.95_f32) {
        round_to(value, 2)
    } else if value < f64::from(99.95_f32) {
        round_to(value, 1)
    } else if value < 999.5 {
        round_to(value, 0)
    } else if value < 9995.0 {
        round_to(value / 10.0, 0) * 10.0
    } else if value < 99950.0 {
        round_to(value / 100.0, 0) * 100.0
    } else {
        round_to(value / 1000.0, 0) * 1000.0
    }
}

/// 照度类数值：先分级舍入，再做量程分类
///
/// 舍入后小于 100 时显示 1 位小数，否则显示整数。
pub fn illuminance_value(raw: f64, low: f64, high: f64) -> DecimalValue {
    let value = round_illuminance(raw);
    let precision = if value < 100.0 { 1 } else { 0 };
    DecimalValue::new(value, low, high, precision)
}
