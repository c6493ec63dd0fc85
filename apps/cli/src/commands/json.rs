//! JSON 报告命令

use anyhow::{Context, Result};
use clap::Args;
use skreader_tools::{DeviceReport, MeasurementReport};

use crate::device::{AppContext, sample_measurement, unix_timestamp};

/// JSON 命令参数
#[derive(Args, Debug)]
pub struct JsonCommand {
    /// 测量名称
    #[arg(long, visible_alias = "na")]
    pub name: String,

    /// 测量备注
    #[arg(long, visible_alias = "no")]
    pub note: String,
}

impl JsonCommand {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        let report = self.report(ctx)?;
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
        Ok(())
    }

    fn report(&self, ctx: &AppContext) -> Result<DeviceReport> {
        if ctx.fake_device {
            let measurement = sample_measurement()?;
            let entry = MeasurementReport::new(&measurement, &self.name, &self.note, unix_timestamp());
            return Ok(DeviceReport::fake().with_measurement(entry));
        }

        let device = ctx.connect()?;
        let measurement = device.measure()?;
        let timestamp = unix_timestamp();
        let state = device.state()?;
        let model = device.model_name().unwrap_or_default();
        let firmware = device.firmware_version().ok();

        let report = DeviceReport::new(&device.name(), &model, firmware, &state).with_measurement(
            MeasurementReport::new(&measurement, &self.name, &self.note, timestamp),
        );
        device.close()?;
        Ok(report)
    }
}
