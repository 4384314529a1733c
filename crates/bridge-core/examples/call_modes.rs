//! Call Modes Example
//!
//! Shows how the audio mode is derived from the call state and how the
//! bridge reports rejected commands without ever raising to the caller.
//!
//! Run with: cargo run --example call_modes

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use audiobridge_core::backend::mock::paired_bluetooth_headset;
use audiobridge_core::{
    AudioBridge, AudioDeviceInfo, AudioEventHandler, CommandFailure, DeviceType, MockBackend,
};

struct ConsoleHandler;

#[async_trait]
impl AudioEventHandler for ConsoleHandler {
    async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
        for device in &devices {
            match &device.uid {
                Some(uid) => println!("  🔈 {} (uid {uid})", device.device_type),
                None => println!("  🔈 {}", device.device_type),
            }
        }
    }

    async fn on_command_failed(&self, failure: CommandFailure) {
        println!("  ⚠️  swallowed failure: {}", failure.detail);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("🎚️  Call Modes Example");
    println!("=====================\n");

    let backend = Arc::new(MockBackend::new());
    let bridge = AudioBridge::with_handler(backend.clone(), Arc::new(ConsoleHandler));

    println!("📡 Backend reports the available routes:");
    backend.push_devices(vec![
        AudioDeviceInfo::new(DeviceType::Speaker),
        paired_bluetooth_headset(),
    ]);
    sleep(Duration::from_millis(100)).await;

    println!("\n🗺️  Mode derivation from call state:");
    let transitions = [
        ("idle", false, false, false),
        ("audio call", true, false, false),
        ("video call", true, true, false),
        ("silenced call", true, true, true),
        ("hung up", false, true, true),
    ];
    for (label, in_call, is_video, is_silent) in transitions {
        bridge.set_mode(in_call, is_video, is_silent);
        println!("  {:14} -> {}", label, bridge.mode().unwrap());
    }
    sleep(Duration::from_millis(100)).await;

    println!("\n📜 Commands the backend received:");
    for command in backend.issued_commands() {
        println!("  {command:?}");
    }

    println!("\n💥 A rejected mode change is reported, never raised:");
    backend.reject_set_mode(true);
    bridge.set_mode(true, false, false);
    sleep(Duration::from_millis(100)).await;

    bridge.close();
    println!("\n✨ Done!");
    Ok(())
}
