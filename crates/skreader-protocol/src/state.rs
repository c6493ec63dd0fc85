//! 设备状态（ST 命令）
//!
//! 响应数据示例（字节）：
//!
//! ```text
//! [83  84  64  64  64]
//!  S   T   st1 st2 key
//! ```
//!
//! 三个原始字节每次查询都重新解析，不做缓存。

use bilge::prelude::*;
use std::fmt;

// ============================================================================
// 原始位域
// ============================================================================

/// 状态字节 1（st1）
///
/// - Bit 0: 忙（细分见 st2）
/// - Bit 1: 远程模式
/// - Bit 2: 未使用
/// - Bit 3: 空闲但超出测量范围
/// - Bit 4: 硬件错误
/// - Bit 5-7: 保留
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct StatusFlags {
    pub busy: bool,           // Bit 0
    pub remote: bool,         // Bit 1
    pub unused: bool,         // Bit 2
    pub out_of_range: bool,   // Bit 3
    pub hardware_error: bool, // Bit 4
    pub reserved: u3,         // Bit 5-7
}

/// 状态字节 2（st2），仅在 st1 忙标志置位时有意义
///
/// - Bit 0: 初始化中
/// - Bit 1: 未使用
/// - Bit 2: 暗校准中
/// - Bit 3: 测量中
/// - Bit 4: 闪光待机
/// - Bit 5-7: 保留
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct BusyFlags {
    pub initializing: bool,     // Bit 0
    pub unused: bool,           // Bit 1
    pub dark_calibration: bool, // Bit 2
    pub measuring: bool,        // Bit 3
    pub flash_standby: bool,    // Bit 4
    pub reserved: u3,           // Bit 5-7
}

/// 量程环位置（key 字节 Bit 5-6）
#[bitsize(2)]
#[derive(FromBits, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPosition {
    Unpositioned = 0,
    Cal = 1,
    Low = 2,
    High = 3,
}

/// 按键字节（key）
///
/// - Bit 0-4: 按键位掩码
/// - Bit 5-6: 量程环位置
/// - Bit 7: 保留
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy)]
pub struct KeyFlags {
    pub buttons: u5,          // Bit 0-4
    pub ring: RingPosition,   // Bit 5-6
    pub reserved: u1,         // Bit 7
}

// ============================================================================
// 解析后的状态
// ============================================================================

/// 设备工作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Idle,
    IdleOutOfMeasuringRange,
    BusyFlashStandby,
    BusyMeasuring,
    BusyInitializing,
    BusyDarkCalibration,
    ErrorHardware,
}

impl DeviceStatus {
    /// 是否可以开始下一次测量
    pub fn is_idle(self) -> bool {
        matches!(self, DeviceStatus::Idle | DeviceStatus::IdleOutOfMeasuringRange)
    }

    fn classify(st1: StatusFlags, st2: BusyFlags) -> Self {
        if st1.hardware_error() {
            DeviceStatus::ErrorHardware
        } else if st1.busy() {
            if st2.initializing() {
                DeviceStatus::BusyInitializing
            } else if st2.dark_calibration() {
                DeviceStatus::BusyDarkCalibration
            } else if st2.flash_standby() {
                DeviceStatus::BusyFlashStandby
            } else if st2.measuring() {
                DeviceStatus::BusyMeasuring
            } else {
                // st2 未给出细分时视为空闲
                DeviceStatus::Idle
            }
        } else if st1.out_of_range() {
            DeviceStatus::IdleOutOfMeasuringRange
        } else {
            DeviceStatus::Idle
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceStatus::Idle => "Idle",
            DeviceStatus::IdleOutOfMeasuringRange => "Idle (out of measuring range)",
            DeviceStatus::BusyFlashStandby => "Busy (flash standby)",
            DeviceStatus::BusyMeasuring => "Busy (measuring)",
            DeviceStatus::BusyInitializing => "Busy (initializing)",
            DeviceStatus::BusyDarkCalibration => "Busy (dark calibration)",
            DeviceStatus::ErrorHardware => "Hardware error",
        };
        f.write_str(name)
    }
}

/// 远程模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteMode {
    #[default]
    Off,
    On,
}

impl fmt::Display for RemoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteMode::Off => f.write_str("Off"),
            RemoteMode::On => f.write_str("On"),
        }
    }
}

impl fmt::Display for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RingPosition::Unpositioned => "Unpositioned",
            RingPosition::Cal => "Cal",
            RingPosition::Low => "Low",
            RingPosition::High => "High",
        };
        f.write_str(name)
    }
}

/// 按键位掩码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Buttons(u8);

impl Buttons {
    pub const MASK: u8 = 0x1F;

    pub const NONE: Buttons = Buttons(0);
    pub const POWER: Buttons = Buttons(0x01);
    pub const MEASURING: Buttons = Buttons(0x02);
    pub const MEMORY: Buttons = Buttons(0x04);
    pub const MENU: Buttons = Buttons(0x08);
    pub const PANEL: Buttons = Buttons(0x10);

    pub fn from_bits(bits: u8) -> Self {
        Buttons(bits & Self::MASK)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Buttons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names = [
            (Buttons::POWER, "Power"),
            (Buttons::MEASURING, "Measuring"),
            (Buttons::MEMORY, "Memory"),
            (Buttons::MENU, "Menu"),
            (Buttons::PANEL, "Panel"),
        ];
        let pressed: Vec<&str> = names
            .iter()
            .filter(|(button, _)| self.contains(*button))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&pressed.join("|"))
    }
}

/// 设备状态快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    pub status: DeviceStatus,
    pub remote: RemoteMode,
    pub buttons: Buttons,
    pub ring: RingPosition,
}

/// 就绪检查结果（由轮询方决定如何处理）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// 空闲，可以开始下一步
    Ready,
    /// 仍在忙，继续轮询
    Busy,
    /// 量程环不在 Low 位置（硬性前置条件）
    RingNotLow(RingPosition),
    /// 测量按键被按下（硬性前置条件）
    MeasuringButtonPressed,
}

impl DeviceState {
    /// 从 ST 响应的三个原始字节解析
    pub fn from_bytes(st1: u8, st2: u8, key: u8) -> Self {
        let st1 = StatusFlags::from(u8::new(st1));
        let st2 = BusyFlags::from(u8::new(st2));
        let key = KeyFlags::from(u8::new(key));

        let remote = if st1.remote() {
            RemoteMode::On
        } else {
            RemoteMode::Off
        };

        Self {
            status: DeviceStatus::classify(st1, st2),
            remote,
            buttons: Buttons::from_bits(key.buttons().value()),
            ring: key.ring(),
        }
    }

    /// 测量前置条件与空闲检查
    ///
    /// 检查顺序：量程环 → 测量按键 → 工作状态。
    pub fn readiness(&self) -> Readiness {
        if self.ring != RingPosition::Low {
            return Readiness::RingNotLow(self.ring);
        }
        if self.buttons == Buttons::MEASURING {
            return Readiness::MeasuringButtonPressed;
        }
        if self.status.is_idle() {
            Readiness::Ready
        } else {
            Readiness::Busy
        }
    }
}
