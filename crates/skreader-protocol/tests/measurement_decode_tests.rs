//! 测量结果解码测试
//!
//! 以样本帧为黄金输入，验证字段解析与跨字段量程修正。

use skreader_protocol::sample::{put_f32, sample_measurement_data, sample_spectral_value};
use skreader_protocol::*;

fn decode(data: &[u8]) -> Measurement {
    Measurement::decode(data).expect("sample data should decode")
}

/// 样本帧解码出固定的参考值
#[test]
fn test_golden_sample_values() {
    let m = decode(&sample_measurement_data());

    assert_eq!(m.color_temperature.tcp.formatted, "5000");
    assert_eq!(m.color_temperature.delta_uv.formatted, "0.0025");
    assert_eq!(m.illuminance.lux.formatted, "1230");
    assert_eq!(m.illuminance.lux.value, 1230.0);
    assert_eq!(m.illuminance.foot_candle.formatted, "115");

    assert_eq!(m.tristimulus.x.formatted, "1172.2500");
    assert_eq!(m.tristimulus.y.formatted, "1230.5000");
    assert_eq!(m.tristimulus.z.formatted, "1010.1250");

    assert_eq!(m.cie1931.x.formatted, "0.3447");
    assert_eq!(m.cie1931.y.formatted, "0.3516");
    assert_eq!(m.cie1931.z.formatted, "0.3037");
    assert_eq!(m.cie1976.u_prime.formatted, "0.2114");
    assert_eq!(m.cie1976.v_prime.formatted, "0.4856");

    assert_eq!(m.dominant_wavelength.wavelength.formatted, "576");
    assert_eq!(m.dominant_wavelength.excitation_purity.formatted, "12.5");

    assert_eq!(m.color_rendition.ra.formatted, "82.4");
    assert_eq!(m.color_rendition.ri[8].formatted, "12.3");
    assert_eq!(m.color_rendition.ri[13].formatted, "96.1");

    assert_eq!(m.ppfd.formatted, "21.5");
}

#[test]
fn test_golden_sample_spectra() {
    let m = decode(&sample_measurement_data());

    assert_eq!(m.peak_wavelength, Some(555));
    assert_eq!(m.spectral_1nm[175].formatted, "0.50000000");
    assert_eq!(m.spectral_1nm[175].value, 0.5);
    assert_eq!(m.spectral_5nm[35].value, 0.5);
    assert_eq!(
        m.spectral_1nm[0].value,
        f64::from(sample_spectral_value(380))
    );
    assert!(m.spectral_1nm.iter().all(DecimalValue::is_ok));
    assert!(m.spectral_5nm.iter().all(DecimalValue::is_ok));
}

#[test]
fn test_all_ranges_ok_for_sample() {
    let m = decode(&sample_measurement_data());
    let scalars = [
        &m.color_temperature.tcp,
        &m.color_temperature.delta_uv,
        &m.illuminance.lux,
        &m.illuminance.foot_candle,
        &m.tristimulus.x,
        &m.tristimulus.y,
        &m.tristimulus.z,
        &m.cie1931.x,
        &m.cie1931.y,
        &m.cie1931.z,
        &m.cie1976.u_prime,
        &m.cie1976.v_prime,
        &m.dominant_wavelength.wavelength,
        &m.dominant_wavelength.excitation_purity,
        &m.color_rendition.ra,
        &m.ppfd,
    ];
    assert!(scalars.iter().all(|v| v.is_ok()));
    assert!(m.color_rendition.ri.iter().all(DecimalValue::is_ok));
}

#[test]
fn test_measurement_display() {
    let m = decode(&sample_measurement_data());
    assert_eq!(m.to_string(), "Lux=1230 x=0.3447 y=0.3516 CCT=5000");
}

/// 照度低于下限：全部光谱数据为 Under，且不计算峰值波长
#[test]
fn test_lux_under_invalidates_spectra() {
    let mut data = sample_measurement_data();
    put_f32(&mut data, 271, 50.0);

    let m = decode(&data);

    assert_eq!(m.illuminance.lux.range, ValueRange::Under);
    assert_eq!(m.illuminance.lux.formatted, "Under");
    assert_eq!(m.spectral_1nm.len(), 401);
    assert_eq!(m.spectral_5nm.len(), 81);
    assert!(m.spectral_1nm.iter().all(|v| v.range == ValueRange::Under));
    assert!(m.spectral_5nm.iter().all(|v| v.formatted == "Under"));
    assert_eq!(m.peak_wavelength, None);

    // 其他字段不受照度欠量程影响
    assert!(m.color_temperature.tcp.is_ok());
    assert!(m.ppfd.is_ok());
}

/// 照度高于上限：全部光谱数据为 Over，数值固定为 9999.9
#[test]
fn test_lux_over_saturates_spectra() {
    let mut data = sample_measurement_data();
    put_f32(&mut data, 271, 250_000.0);

    let m = decode(&data);

    assert_eq!(m.illuminance.lux.range, ValueRange::Over);
    assert!(
        m.spectral_1nm
            .iter()
            .chain(m.spectral_5nm.iter())
            .all(|v| v.range == ValueRange::Over && v.value == 9999.9 && v.formatted == "Over")
    );
    assert_eq!(m.peak_wavelength, None);
}

/// ΔUv 超量程：CCT 跟随，并继续传播到显色指数
#[test]
fn test_delta_uv_out_of_range_propagates() {
    let mut data = sample_measurement_data();
    put_f32(&mut data, 55, 0.2);

    let m = decode(&data);

    assert_eq!(m.color_temperature.delta_uv.range, ValueRange::Over);
    assert_eq!(m.color_temperature.tcp.range, ValueRange::Over);
    assert_eq!(m.color_temperature.tcp.formatted, "Over");
    assert_eq!(m.color_temperature.tcp.value, 5000.0);
    assert_eq!(m.color_rendition.ra.range, ValueRange::Over);
    assert!(m.color_rendition.ri.iter().all(|ri| ri.range == ValueRange::Over));

    // 色度坐标不受影响
    assert!(m.cie1931.x.is_ok());
}

/// CCT 自身欠量程：ΔUv 与显色指数跟随
#[test]
fn test_cct_under_propagates() {
    let mut data = sample_measurement_data();
    put_f32(&mut data, 50, 1000.0);

    let m = decode(&data);

    assert_eq!(m.color_temperature.tcp.range, ValueRange::Under);
    assert_eq!(m.color_temperature.delta_uv.range, ValueRange::Under);
    assert_eq!(m.color_temperature.delta_uv.formatted, "Under");
    assert_eq!(m.color_rendition.ra.range, ValueRange::Under);
    assert_eq!(m.color_rendition.ri[0].range, ValueRange::Under);
}

/// z 继承 x 的量程优先于 y
#[test]
fn test_cie1931_z_inherits_x_then_y() {
    let mut data = sample_measurement_data();
    put_f32(&mut data, 308, 1.5);
    put_f32(&mut data, 313, -0.5);
    let m = decode(&data);
    assert_eq!(m.cie1931.z.range, ValueRange::Over);

    let mut data = sample_measurement_data();
    put_f32(&mut data, 313, -0.5);
    let m = decode(&data);
    assert_eq!(m.cie1931.z.range, ValueRange::Under);
    assert_eq!(m.cie1931.z.formatted, "Under");
}

#[test]
fn test_peak_wavelength_follows_spectrum() {
    let mut data = sample_measurement_data();
    // 在 700 nm 处放置更高的峰
    put_f32(&mut data, 753 + (700 - 380) * 4, 2.0);

    let m = decode(&data);
    assert_eq!(m.peak_wavelength, Some(700));
}

#[test]
fn test_peak_wavelength_dark_spectrum_reports_start() {
    let mut data = sample_measurement_data();
    for i in 0..401 {
        put_f32(&mut data, 753 + i * 4, 0.0);
    }

    let m = decode(&data);
    assert!(m.illuminance.lux.is_ok());
    assert_eq!(m.peak_wavelength, Some(380));
}

#[test]
fn test_short_buffer_rejected() {
    let data = sample_measurement_data();
    let err = Measurement::decode(&data[..2379]).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::InvalidLength {
            expected: MEASUREMENT_DATA_MIN_LEN,
            actual: 2379
        }
    );
}

#[test]
fn test_longer_buffer_accepted() {
    let mut data = sample_measurement_data();
    data.extend_from_slice(&[0xFF; 16]);
    let m = decode(&data);
    assert_eq!(m.illuminance.lux.formatted, "1230");
}
