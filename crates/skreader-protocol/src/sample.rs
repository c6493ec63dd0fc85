//! 规范样本数据
//!
//! 按字段偏移表写入固定数值构造的 NR 响应帧，用作解码回归测试的黄金输入，
//! 也用于 CLI 的 `--fake-device` 模式。

use crate::MEASUREMENT_DATA_MIN_LEN;

/// 样本中写入的特殊显色指数 R1..R15
pub const SAMPLE_RI: [f32; 15] = [
    80.1, 88.6, 92.3, 79.8, 78.4, 83.2, 85.9, 66.7, 12.3, 70.5, 77.8, 60.2, 81.4, 96.1, 74.9,
];

/// 样本光谱：以 555 nm 为中心的高斯分布，峰值 0.5
pub fn sample_spectral_value(nm: u16) -> f32 {
    let d = (f64::from(nm) - 555.0) / 60.0;
    (0.5 * (-d * d).exp()) as f32
}

/// 在 `offset` 处写入大端 binary32
pub fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// 在 `offset` 处写入大端 binary64
pub fn put_f64(buf: &mut [u8], offset: usize, value: f64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
}

/// 构造一份量程内的完整测量结果帧
pub fn sample_measurement_data() -> Vec<u8> {
    let mut data = vec![0u8; MEASUREMENT_DATA_MIN_LEN];
    data[..5].copy_from_slice(b"NR@@@");

    put_f32(&mut data, 50, 5000.0); // CCT
    put_f32(&mut data, 55, 0.0025); // ΔUv
    put_f32(&mut data, 271, 1234.5); // lx
    put_f32(&mut data, 276, 114.7); // fc

    put_f64(&mut data, 281, 1172.25);
    put_f64(&mut data, 290, 1230.5);
    put_f64(&mut data, 299, 1010.125);

    put_f32(&mut data, 308, 0.3447);
    put_f32(&mut data, 313, 0.3516);
    put_f32(&mut data, 328, 0.2114);
    put_f32(&mut data, 333, 0.4856);

    put_f32(&mut data, 338, 576.0);
    put_f32(&mut data, 343, 12.5);

    put_f32(&mut data, 348, 82.4);
    for (i, ri) in SAMPLE_RI.iter().enumerate() {
        put_f32(&mut data, 353 + i * 5, *ri);
    }

    for i in 0..81u16 {
        put_f32(&mut data, 428 + usize::from(i) * 4, sample_spectral_value(380 + i * 5));
    }
    for i in 0..401u16 {
        put_f32(&mut data, 753 + usize::from(i) * 4, sample_spectral_value(380 + i));
    }

    put_f32(&mut data, 2376, 21.5); // PPFD

    data
}
