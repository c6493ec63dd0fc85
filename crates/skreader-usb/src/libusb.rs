//! libusb 传输实现
//!
//! 设备只有一个接口（0），使用一对 Bulk 端点收发数据。

use rusb::{DeviceHandle, GlobalContext};
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::{
    ENDPOINT_IN, ENDPOINT_OUT, SEKONIC_PRODUCT_ID, SEKONIC_VENDOR_ID, Transport, TransportError,
};

/// USB 连接参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub interface: u8,
    pub endpoint_in: u8,
    pub endpoint_out: u8,
    /// Bulk 传输超时
    pub timeout: Duration,
}

impl Default for UsbConfig {
    fn default() -> Self {
        Self {
            vendor_id: SEKONIC_VENDOR_ID,
            product_id: SEKONIC_PRODUCT_ID,
            interface: 0,
            endpoint_in: ENDPOINT_IN,
            endpoint_out: ENDPOINT_OUT,
            timeout: Duration::from_secs(5),
        }
    }
}

/// 基于 rusb 的生产传输
pub struct RusbTransport {
    config: UsbConfig,
    handle: Option<DeviceHandle<GlobalContext>>,
    /// 记录是否已经 claim 了接口（用于正确的资源清理）
    interface_claimed: bool,
}

impl RusbTransport {
    pub fn new() -> Self {
        Self::with_config(UsbConfig::default())
    }

    pub fn with_config(config: UsbConfig) -> Self {
        Self {
            config,
            handle: None,
            interface_claimed: false,
        }
    }

    pub fn config(&self) -> &UsbConfig {
        &self.config
    }

    fn handle(&self) -> Result<&DeviceHandle<GlobalContext>, TransportError> {
        self.handle.as_ref().ok_or(TransportError::NotOpen)
    }

    /// detach 内核驱动并 claim 接口
    fn prepare_interface(&mut self) -> Result<(), TransportError> {
        if self.interface_claimed {
            return Ok(());
        }
        let interface = self.config.interface;
        let handle = self.handle.as_mut().ok_or(TransportError::NotOpen)?;

        #[cfg(any(target_os = "linux", target_os = "macos"))]
        {
            if handle.kernel_driver_active(interface).unwrap_or(false) {
                handle.detach_kernel_driver(interface)?;
                trace!("Detached kernel driver from interface {}", interface);
            }
        }

        handle.claim_interface(interface)?;
        self.interface_claimed = true;
        Ok(())
    }

    /// 释放 USB 接口（交还给操作系统）
    fn release_interface(&mut self) {
        if !self.interface_claimed {
            return;
        }
        if let Some(handle) = self.handle.as_mut()
            && let Err(e) = handle.release_interface(self.config.interface)
        {
            warn!("Failed to release USB interface: {}", e);
        }
        self.interface_claimed = false;
        trace!("USB interface released");
    }
}

impl Default for RusbTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RusbTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.handle.is_some() {
            return Ok(());
        }

        let handle = rusb::open_device_with_vid_pid(self.config.vendor_id, self.config.product_id)
            .ok_or(TransportError::DeviceNotFound {
                vendor_id: self.config.vendor_id,
                product_id: self.config.product_id,
            })?;
        self.handle = Some(handle);

        if let Err(e) = self.prepare_interface() {
            self.handle = None;
            return Err(e);
        }

        debug!(
            "Opened USB device {:04x}:{:04x}",
            self.config.vendor_id, self.config.product_id
        );
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.release_interface();
        if self.handle.take().is_some() {
            debug!("Closed USB device");
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let timeout = self.config.timeout;
        let n = self
            .handle()?
            .read_bulk(self.config.endpoint_in, buf, timeout)
            .map_err(|e| match e {
                rusb::Error::Timeout => TransportError::ReadTimeout,
                other => TransportError::Usb(other),
            })?;
        trace!("IN {} bytes", n);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let timeout = self.config.timeout;
        let n = self
            .handle()?
            .write_bulk(self.config.endpoint_out, data, timeout)
            .map_err(|e| match e {
                rusb::Error::Timeout => TransportError::WriteTimeout,
                other => TransportError::Usb(other),
            })?;
        trace!("OUT {} bytes", n);
        Ok(n)
    }

    fn manufacturer(&mut self) -> Result<String, TransportError> {
        let handle = self.handle()?;
        let desc = handle.device().device_descriptor()?;
        if desc.manufacturer_string_index().is_none() {
            return Ok(String::new());
        }
        Ok(handle.read_manufacturer_string_ascii(&desc)?)
    }

    fn product(&mut self) -> Result<String, TransportError> {
        let handle = self.handle()?;
        let desc = handle.device().device_descriptor()?;
        if desc.product_string_index().is_none() {
            return Ok(String::new());
        }
        Ok(handle.read_product_string_ascii(&desc)?)
    }
}

impl Drop for RusbTransport {
    fn drop(&mut self) {
        self.release_interface();
    }
}
