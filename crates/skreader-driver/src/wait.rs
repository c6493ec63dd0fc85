//! 就绪等待
//!
//! 轮询设备状态直到空闲。状态完全由设备上报，这里只做观察：
//!
//! - 查询失败：忽略，下个周期重试
//! - 量程环不在 Low / 测量键按下：立即失败
//! - 空闲（含超出测量范围的空闲）：成功
//! - 其他：继续轮询，直到超时

use skreader_protocol::{DeviceState, Readiness};
use skreader_usb::Transport;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::device::Spectrometer;
use crate::error::DriverError;

/// 等待设备开始测量的默认超时
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// 等待测量结束的默认超时
pub const DEFAULT_MEASUREMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// `measure()` 使用的等待参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// 测量前等待空闲的超时
    pub connect_timeout: Duration,
    /// 测量后等待结束的超时
    pub measurement_timeout: Duration,
    /// 状态轮询间隔
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            measurement_timeout: DEFAULT_MEASUREMENT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl<T: Transport> Spectrometer<T> {
    /// 等待设备空闲，返回最后一次观察到的状态
    ///
    /// 每个周期先休眠 `poll_interval`，再检查超时，然后查询状态。
    pub fn wait_ready(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<DeviceState, DriverError> {
        let start = Instant::now();

        loop {
            std::thread::sleep(poll_interval);

            if start.elapsed() >= timeout {
                return Err(DriverError::Timeout(timeout));
            }

            let state = match self.state() {
                Ok(state) => state,
                Err(e) => {
                    debug!("Ignoring state query error while waiting: {}", e);
                    continue;
                },
            };

            match state.readiness() {
                Readiness::Ready => return Ok(state),
                Readiness::Busy => debug!("Device busy: {}", state.status),
                Readiness::RingNotLow(ring) => return Err(DriverError::RingNotLow(ring)),
                Readiness::MeasuringButtonPressed => {
                    return Err(DriverError::MeasuringButtonPressed);
                },
            }
        }
    }
}
