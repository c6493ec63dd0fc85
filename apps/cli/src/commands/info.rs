//! 设备信息命令

use anyhow::Result;

use crate::device::AppContext;

pub fn execute(ctx: &AppContext) -> Result<()> {
    if ctx.fake_device {
        println!("Fake device");
        return Ok(());
    }

    let device = ctx.connect()?;
    let state = device.state()?;
    let model = device.model_name().unwrap_or_default();
    let firmware = device
        .firmware_version()
        .map(|v| v.to_string())
        .unwrap_or_default();

    println!("Device: {}", device);
    println!("Model: {}", model);
    println!("Firmware: {}", firmware);
    println!("Status: {}", state.status);
    println!("Remote: {}", state.remote);
    println!("Button: {}", state.buttons);
    println!("Ring: {}", state.ring);

    device.close()?;
    Ok(())
}
