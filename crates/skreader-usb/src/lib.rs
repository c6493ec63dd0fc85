//! # skreader USB Transport
//!
//! 分光照度计的字节级传输抽象。驱动层只依赖 [`Transport`] trait，
//! 生产环境使用 [`RusbTransport`]（libusb），测试使用 `mock` feature
//! 下的脚本化 `MockTransport`。

use thiserror::Error;

pub mod libusb;

pub use libusb::{RusbTransport, UsbConfig};

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockProbe, MockTransport};

/// SEKONIC USB Vendor ID
pub const SEKONIC_VENDOR_ID: u16 = 0x0A41;

/// C-700 / C-800 / C-7000 Product ID
pub const SEKONIC_PRODUCT_ID: u16 = 0x7003;

/// Bulk OUT 端点
pub const ENDPOINT_OUT: u8 = 0x02;

/// Bulk IN 端点
pub const ENDPOINT_IN: u8 = 0x81;

/// 传输层错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    /// USB 错误（来自 rusb）
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    /// 设备未找到
    #[error("Device {vendor_id:04x}:{product_id:04x} not found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    /// 设备未打开
    #[error("Device not open")]
    NotOpen,

    /// 读取超时
    #[error("Read timeout")]
    ReadTimeout,

    /// 写入超时
    #[error("Write timeout")]
    WriteTimeout,

    /// 其他设备错误
    #[error("Device error: {0}")]
    Device(String),
}

impl TransportError {
    /// 检查是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::ReadTimeout
                | TransportError::WriteTimeout
                | TransportError::Usb(rusb::Error::Timeout)
        )
    }
}

/// 字节级传输能力
///
/// 实现不需要线程安全，驱动层负责串行化访问。
pub trait Transport {
    /// 打开设备，保证其处于可通信状态
    fn open(&mut self) -> Result<(), TransportError>;

    /// 释放所有已分配的资源
    fn close(&mut self) -> Result<(), TransportError>;

    /// 读取一帧原始数据，返回读取的字节数
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// 写入原始数据，返回实际写入的字节数
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// 厂商名称（没有描述符时为空字符串）
    fn manufacturer(&mut self) -> Result<String, TransportError>;

    /// 产品名称（没有描述符时为空字符串）
    fn product(&mut self) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        (**self).write(data)
    }

    fn manufacturer(&mut self) -> Result<String, TransportError> {
        (**self).manufacturer()
    }

    fn product(&mut self) -> Result<String, TransportError> {
        (**self).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_from_rusb_error() {
        let err: TransportError = rusb::Error::NotFound.into();
        assert!(matches!(err, TransportError::Usb(rusb::Error::NotFound)));
    }

    #[test]
    fn test_transport_error_is_timeout() {
        assert!(TransportError::ReadTimeout.is_timeout());
        assert!(TransportError::WriteTimeout.is_timeout());
        assert!(TransportError::Usb(rusb::Error::Timeout).is_timeout());

        assert!(!TransportError::NotOpen.is_timeout());
        assert!(!TransportError::Usb(rusb::Error::NoDevice).is_timeout());
        assert!(!TransportError::Device("stall".to_string()).is_timeout());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::DeviceNotFound {
            vendor_id: SEKONIC_VENDOR_ID,
            product_id: SEKONIC_PRODUCT_ID,
        };
        assert_eq!(err.to_string(), "Device 0a41:7003 not found");
        assert!(TransportError::NotOpen.to_string().contains("not open"));
    }
}
