//! Device Watcher Example
//!
//! Drives the reference router through a simulated call with device churn
//! (headphones plugged in, Bluetooth pairing and dropping) and prints every
//! device list the observer receives.
//!
//! Run with: cargo run --example device_watcher

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use audiobridge_core::{
    AudioBridge, AudioDeviceInfo, AudioEventHandler, AudioRouter, CommandFailure, DeviceType,
    MockDeviceHandler,
};

struct PrintHandler;

#[async_trait]
impl AudioEventHandler for PrintHandler {
    async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
        println!("  📋 available routes:");
        for device in &devices {
            let marker = if device.selected { "▶" } else { " " };
            println!("     {} {}", marker, device.device_type);
        }
    }

    async fn on_command_failed(&self, failure: CommandFailure) {
        println!("  ⚠️  {}", failure.detail);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for better output
    tracing_subscriber::fmt::init();

    println!("🎧 Device Watcher Example");
    println!("=========================\n");

    let router = Arc::new(AudioRouter::new(Arc::new(MockDeviceHandler::new())));
    let bridge = AudioBridge::with_handler(router.clone(), Arc::new(PrintHandler));

    println!("📱 Initial device scan:");
    router
        .replace_devices(vec![DeviceType::Earpiece, DeviceType::Speaker])
        .await;
    sleep(Duration::from_millis(100)).await;

    println!("\n📞 Audio call starts:");
    bridge.set_mode(true, false, false);
    sleep(Duration::from_millis(100)).await;

    println!("\n🎧 Headphones plugged in (earpiece disappears):");
    router.add_device(DeviceType::Headphones).await;
    sleep(Duration::from_millis(100)).await;

    println!("\n📶 Bluetooth headset connects (and wins the route):");
    router.add_device(DeviceType::Bluetooth).await;
    sleep(Duration::from_millis(100)).await;

    println!("\n👆 User taps the speaker button:");
    bridge.select_device("SPEAKER");
    sleep(Duration::from_millis(100)).await;

    println!("\n📶 Bluetooth headset drops off:");
    router.remove_device(DeviceType::Bluetooth).await;
    sleep(Duration::from_millis(100)).await;

    println!("\n📴 Call ends:");
    bridge.set_mode(false, false, false);
    sleep(Duration::from_millis(100)).await;

    bridge.close();
    println!("\n✨ Done!");
    Ok(())
}
