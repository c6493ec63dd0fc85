//! 脚本化的内存传输（用于确定性的协议测试）
//!
//! 读取按预先排好的队列依次返回；队列为空时返回 `ReadTimeout`。
//! 传输被驱动层接管后，通过 [`MockProbe`] 继续排队响应并检查写入的命令。

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::{Transport, TransportError};

/// 一次读取的脚本
#[derive(Debug)]
enum ReadStep {
    Frame(Vec<u8>),
    Error(TransportError),
}

#[derive(Debug, Default)]
struct MockState {
    reads: VecDeque<ReadStep>,
    written: Vec<Vec<u8>>,
    open: bool,
    open_count: usize,
    close_count: usize,
    fail_write: bool,
    short_write: bool,
}

/// 脚本化传输
#[derive(Debug)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    manufacturer: Option<String>,
    product: Option<String>,
    fail_open: bool,
}

/// 共享同一脚本状态的观察/控制句柄
#[derive(Debug, Clone)]
pub struct MockProbe {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            manufacturer: Some(String::new()),
            product: Some(String::new()),
            fail_open: false,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// `open()` 返回错误
    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// `manufacturer()` 返回错误
    pub fn fail_manufacturer(mut self) -> Self {
        self.manufacturer = None;
        self
    }

    /// `product()` 返回错误
    pub fn fail_product(mut self) -> Self {
        self.product = None;
        self
    }

    pub fn probe(&self) -> MockProbe {
        MockProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl MockProbe {
    /// 排队一帧原始数据
    pub fn push_read(&self, frame: impl Into<Vec<u8>>) {
        self.state.lock().reads.push_back(ReadStep::Frame(frame.into()));
    }

    /// 排队一次读取错误
    pub fn push_read_error(&self, error: TransportError) {
        self.state.lock().reads.push_back(ReadStep::Error(error));
    }

    /// 排队 ACK 帧
    pub fn push_ack(&self) {
        self.push_read(vec![0x06, 0x30]);
    }

    /// 排队 ACK + 响应帧
    pub fn push_response(&self, payload: impl Into<Vec<u8>>) {
        self.push_ack();
        self.push_read(payload);
    }

    /// 之后的写入全部失败
    pub fn set_fail_write(&self, fail: bool) {
        self.state.lock().fail_write = fail;
    }

    /// 之后的写入少写 1 个字节
    pub fn set_short_write(&self, short: bool) {
        self.state.lock().short_write = short;
    }

    /// 已写入的原始帧
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().written.clone()
    }

    /// 已写入的命令文本
    pub fn written_commands(&self) -> Vec<String> {
        self.state
            .lock()
            .written
            .iter()
            .map(|frame| String::from_utf8_lossy(frame).into_owned())
            .collect()
    }

    pub fn clear_written(&self) {
        self.state.lock().written.clear();
    }

    /// 尚未消费的读取脚本数量
    pub fn pending_reads(&self) -> usize {
        self.state.lock().reads.len()
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    pub fn open_count(&self) -> usize {
        self.state.lock().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().close_count
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.fail_open {
            return Err(TransportError::Device("mock open failure".to_string()));
        }
        let mut state = self.state.lock();
        state.open = true;
        state.open_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.open = false;
        state.close_count += 1;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        match state.reads.pop_front() {
            Some(ReadStep::Frame(frame)) => {
                let n = frame.len().min(buf.len());
                buf[..n].copy_from_slice(&frame[..n]);
                Ok(n)
            },
            Some(ReadStep::Error(e)) => Err(e),
            None => Err(TransportError::ReadTimeout),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        if state.fail_write {
            return Err(TransportError::Device("mock write failure".to_string()));
        }
        state.written.push(data.to_vec());
        if state.short_write {
            Ok(data.len().saturating_sub(1))
        } else {
            Ok(data.len())
        }
    }

    fn manufacturer(&mut self) -> Result<String, TransportError> {
        self.manufacturer
            .clone()
            .ok_or_else(|| TransportError::Device("mock manufacturer failure".to_string()))
    }

    fn product(&mut self) -> Result<String, TransportError> {
        self.product
            .clone()
            .ok_or_else(|| TransportError::Device("mock product failure".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_reads_in_order() {
        let mut transport = MockTransport::new();
        let probe = transport.probe();
        transport.open().unwrap();

        probe.push_response(b"ST@@@".to_vec());

        let mut buf = [0u8; 16];
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[0x06, 0x30]);
        assert_eq!(transport.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"ST@@@");
        assert!(matches!(transport.read(&mut buf), Err(TransportError::ReadTimeout)));
    }

    #[test]
    fn test_read_truncates_to_buffer() {
        let mut transport = MockTransport::new();
        let probe = transport.probe();
        transport.open().unwrap();
        probe.push_read(vec![1, 2, 3, 4]);

        let mut buf = [0u8; 2];
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
    }

    #[test]
    fn test_scripted_read_error() {
        let mut transport = MockTransport::new();
        let probe = transport.probe();
        transport.open().unwrap();
        probe.push_read_error(TransportError::Device("stall".to_string()));

        let mut buf = [0u8; 4];
        assert!(matches!(transport.read(&mut buf), Err(TransportError::Device(_))));
        assert_eq!(probe.pending_reads(), 0);
    }

    #[test]
    fn test_writes_are_recorded() {
        let mut transport = MockTransport::new();
        let probe = transport.probe();
        transport.open().unwrap();

        assert_eq!(transport.write(b"RT1").unwrap(), 3);
        probe.set_short_write(true);
        assert_eq!(transport.write(b"RM0").unwrap(), 2);
        probe.set_fail_write(true);
        assert!(transport.write(b"NR").is_err());

        assert_eq!(probe.written_commands(), vec!["RT1", "RM0"]);
    }

    #[test]
    fn test_io_requires_open() {
        let mut transport = MockTransport::new();
        let mut buf = [0u8; 4];
        assert!(matches!(transport.read(&mut buf), Err(TransportError::NotOpen)));
        assert!(matches!(transport.write(b"ST"), Err(TransportError::NotOpen)));
    }

    #[test]
    fn test_open_close_tracking() {
        let mut transport = MockTransport::new();
        let probe = transport.probe();
        transport.open().unwrap();
        assert!(probe.is_open());
        assert_eq!(probe.open_count(), 1);
        transport.close().unwrap();
        assert!(!probe.is_open());
        assert_eq!(probe.close_count(), 1);
    }

    #[test]
    fn test_failure_switches() {
        let mut transport = MockTransport::new().fail_open();
        assert!(transport.open().is_err());

        let mut transport = MockTransport::new()
            .with_manufacturer("SEKONIC")
            .fail_product();
        assert_eq!(transport.manufacturer().unwrap(), "SEKONIC");
        assert!(transport.product().is_err());
    }
}
