//! Connect/disconnect commands - wifi bridging through adb

use anyhow::Result;
use colored::Colorize;
use mirrordeck_core::{AdbClient, Toolchain};

use super::{error, info, success};

pub async fn connect(toolchain: &Toolchain, ip: &str, port: u16) -> Result<()> {
    let client = AdbClient::new(toolchain);
    let target = format!("{}:{}", ip, port);

    info(&format!("Connecting to {}...", target.cyan()));

    match client.connect(ip, port).await {
        Ok(message) => {
            success(&message);
            Ok(())
        }
        Err(e) => {
            error(&format!("Connection failed: {}", e));
            println!();
            println!("{}", "Make sure wireless debugging is on:".dimmed());
            println!("  {} adb tcpip {} (over USB first)", "→".cyan(), port);
            println!();
            Err(e.into())
        }
    }
}

pub async fn disconnect(toolchain: &Toolchain, ip: &str, port: u16) -> Result<()> {
    let client = AdbClient::new(toolchain);
    let target = format!("{}:{}", ip, port);

    let message = client.disconnect(ip, port).await?;
    if message.is_empty() {
        info(&format!("Disconnected {}", target));
    } else {
        info(&message);
    }
    Ok(())
}
