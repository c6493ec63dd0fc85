//! 测量命令
//!
//! 执行一次测量并按选项输出对应的数据段。未选择任何数据段时输出
//! 灯光设计常用的 LDi 段（LUX、CCT、ΔUv、Ra、R9）。

use anyhow::Result;
use clap::Args;
use skreader_protocol::Measurement;

use crate::device::{AppContext, sample_measurement};

const SEPARATOR: &str = "------------";

/// 测量命令参数
#[derive(Args, Debug, Default)]
pub struct MeasureCommand {
    /// 灯光设计常用数据（LUX、CCT、ΔUv、Ra、R9）
    #[arg(short = 'l', long)]
    pub ldi: bool,

    /// 全部数据
    #[arg(short = 'a', long)]
    pub all: bool,

    /// 全部简单数据（不含光谱与显色指数）
    #[arg(short = 's', long)]
    pub simple: bool,

    /// 照度（lx、fc）
    #[arg(short = 'i', long, visible_alias = "ill")]
    pub illuminance: bool,

    /// 色温（K、ΔUv）
    #[arg(short = 'c', long, visible_alias = "cct")]
    pub color_temperature: bool,

    /// 三刺激值 XYZ
    #[arg(short = 't', long, visible_alias = "tri")]
    pub tristimulus: bool,

    /// CIE1931 (x, y) 色坐标
    #[arg(short = 'x', long, visible_alias = "xy")]
    pub cie1931: bool,

    /// CIE1976 (u', v') 色坐标
    #[arg(short = 'u', long, visible_alias = "uv")]
    pub cie1976: bool,

    /// 主波长与兴奋纯度
    #[arg(short = 'd', long)]
    pub dwl: bool,

    /// 显色指数（Ra、R1..R15）
    #[arg(short = 'r', long)]
    pub cri: bool,

    /// 1nm 光谱数据
    #[arg(short = '1', long)]
    pub spectra1nm: bool,

    /// 5nm 光谱数据
    #[arg(short = '5', long)]
    pub spectra5nm: bool,

    /// 输出分段标题
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// 展开后的数据段选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sections {
    pub illuminance: bool,
    pub color_temperature: bool,
    pub tristimulus: bool,
    pub cie1931: bool,
    pub cie1976: bool,
    pub dwl: bool,
    pub cri: bool,
    pub spectra1nm: bool,
    pub spectra5nm: bool,
    pub ldi: bool,
}

impl MeasureCommand {
    pub fn sections(&self) -> Sections {
        let simple = self.all || self.simple;
        let mut sections = Sections {
            illuminance: self.illuminance || simple,
            color_temperature: self.color_temperature || simple,
            tristimulus: self.tristimulus || simple,
            cie1931: self.cie1931 || simple,
            cie1976: self.cie1976 || simple,
            dwl: self.dwl || simple,
            cri: self.cri || self.all,
            spectra1nm: self.spectra1nm || self.all,
            spectra5nm: self.spectra5nm || self.all,
            ldi: false,
        };
        sections.ldi = self.ldi || self.all || sections == Sections::default();
        sections
    }

    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        let measurement = if ctx.fake_device {
            sample_measurement()?
        } else {
            let device = ctx.connect()?;
            let measurement = device.measure()?;
            device.close()?;
            measurement
        };

        for line in render(&measurement, self.sections(), self.verbose) {
            println!("{}", line);
        }
        Ok(())
    }
}

/// 按数据段生成输出行
pub fn render(m: &Measurement, sections: Sections, verbose: bool) -> Vec<String> {
    let mut out = Vec::new();
    let header = |out: &mut Vec<String>, title: &str| {
        if verbose {
            out.push(SEPARATOR.to_string());
            if !title.is_empty() {
                out.push(format!("{}:", title));
            }
        }
    };

    if sections.illuminance {
        header(&mut out, "Illuminance");
        out.push(format!("LUX: {}", m.illuminance.lux));
        out.push(format!("Fc: {}", m.illuminance.foot_candle));
    }

    if sections.color_temperature {
        header(&mut out, "ColorTemperature");
        out.push(format!("CCT: {}", m.color_temperature.tcp));
        out.push(format!("CCT DeltaUv: {}", m.color_temperature.delta_uv));
    }

    if sections.tristimulus {
        header(&mut out, "Tristimulus");
        out.push(format!("X: {}", m.tristimulus.x));
        out.push(format!("Y: {}", m.tristimulus.y));
        out.push(format!("Z: {}", m.tristimulus.z));
    }

    if sections.cie1931 {
        header(&mut out, "CIE1931");
        out.push(format!("X: {}", m.cie1931.x));
        out.push(format!("Y: {}", m.cie1931.y));
    }

    if sections.cie1976 {
        header(&mut out, "CIE1976");
        out.push(format!("Ud: {}", m.cie1976.u_prime));
        out.push(format!("Vd: {}", m.cie1976.v_prime));
    }

    if sections.dwl {
        header(&mut out, "DominantWavelength");
        out.push(format!("DominantWavelength: {}", m.dominant_wavelength.wavelength));
        out.push(format!("ExcitationPurity: {}", m.dominant_wavelength.excitation_purity));
    }

    if sections.cri {
        header(&mut out, "CRI");
        out.push(format!("RA: {}", m.color_rendition.ra));
        for (i, ri) in m.color_rendition.ri.iter().enumerate() {
            out.push(format!("R{}: {}", i + 1, ri));
        }
    }

    if sections.spectra1nm {
        header(&mut out, "SpectralData 1nm");
        for (nm, v) in Measurement::wavelengths_1nm().zip(&m.spectral_1nm) {
            out.push(format!("{},{:.6}", nm, v.value));
        }
    }

    if sections.spectra5nm {
        header(&mut out, "SpectralData 5nm");
        for (nm, v) in Measurement::wavelengths_5nm().zip(&m.spectral_5nm) {
            out.push(format!("{},{:.6}", nm, v.value));
        }
    }

    if sections.ldi {
        header(&mut out, "");
        out.push(format!("LUX: {}", m.illuminance.lux));
        out.push(format!("CCT: {}", m.color_temperature.tcp));
        out.push(format!("CCT DeltaUv: {}", m.color_temperature.delta_uv));
        out.push(format!("RA: {}", m.color_rendition.ra));
        out.push(format!("R9: {}", m.color_rendition.ri[8]));
    }

    out
}
