//! Audio Router Integration Tests
//!
//! Exercises the routing policy through the public backend surface: snapshot
//! shape, preference order, user override, focus handling, and the typed
//! rejection paths.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tokio_test::assert_ok;

use audiobridge_core::backend::HandlerOp;
use audiobridge_core::{
    AudioBackend, AudioBridge, AudioDeviceInfo, AudioEventHandler, AudioMode, AudioRouter,
    BridgeError, DeviceType, FocusChange, MockDeviceHandler, RouterConfig,
};

fn new_router() -> (Arc<MockDeviceHandler>, AudioRouter) {
    let handler = Arc::new(MockDeviceHandler::new());
    let router = AudioRouter::new(handler.clone());
    (handler, router)
}

async fn expect_snapshot(
    rx: &mut broadcast::Receiver<Vec<AudioDeviceInfo>>,
) -> Vec<AudioDeviceInfo> {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a device snapshot")
        .expect("snapshot channel closed")
}

async fn expect_no_snapshot(rx: &mut broadcast::Receiver<Vec<AudioDeviceInfo>>) {
    let outcome = timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected snapshot: {outcome:?}");
}

fn entry(device_type: DeviceType, selected: bool) -> AudioDeviceInfo {
    AudioDeviceInfo {
        device_type,
        uid: None,
        selected,
    }
}

#[tokio::test]
async fn snapshot_omits_earpiece_when_headphones_present() {
    let (_handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router
        .replace_devices(vec![
            DeviceType::Earpiece,
            DeviceType::Speaker,
            DeviceType::Headphones,
        ])
        .await;

    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Headphones, false),
        ]
    );

    // Without headphones the earpiece is listed again.
    router
        .replace_devices(vec![DeviceType::Earpiece, DeviceType::Speaker])
        .await;
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Earpiece, false),
            entry(DeviceType::Speaker, false),
        ]
    );
}

#[tokio::test]
async fn preference_order_and_user_override() {
    let (handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router
        .replace_devices(vec![
            DeviceType::Earpiece,
            DeviceType::Speaker,
            DeviceType::Bluetooth,
            DeviceType::Headphones,
        ])
        .await;
    expect_snapshot(&mut rx).await;

    // Bluetooth wins the preference order.
    assert_ok!(router.set_mode(AudioMode::AudioCall).await);
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Bluetooth, true),
            entry(DeviceType::Headphones, false),
        ]
    );

    // The user override beats the preference order.
    assert_ok!(router.select_device("SPEAKER").await);
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, true),
            entry(DeviceType::Bluetooth, false),
            entry(DeviceType::Headphones, false),
        ]
    );

    // Any device change resets the selection; headphones are next in line.
    router.remove_device(DeviceType::Bluetooth).await;
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Headphones, true),
        ]
    );

    assert_eq!(
        handler.applied(),
        vec![
            HandlerOp::Mode(AudioMode::AudioCall),
            HandlerOp::Route(DeviceType::Bluetooth),
            HandlerOp::Mode(AudioMode::AudioCall),
            HandlerOp::Route(DeviceType::Speaker),
            HandlerOp::Mode(AudioMode::AudioCall),
            HandlerOp::Route(DeviceType::Headphones),
        ]
    );
}

#[tokio::test]
async fn default_mode_clears_route_and_selection() {
    let (_handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router
        .replace_devices(vec![DeviceType::Speaker, DeviceType::Headphones])
        .await;
    expect_snapshot(&mut rx).await;

    assert_ok!(router.set_mode(AudioMode::AudioCall).await);
    assert_ok!(router.select_device("SPEAKER").await);
    expect_snapshot(&mut rx).await;
    expect_snapshot(&mut rx).await;

    assert_ok!(router.set_mode(AudioMode::Default).await);
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Headphones, false),
        ]
    );
    assert_eq!(router.current_mode().await, Some(AudioMode::Default));
}

#[tokio::test]
async fn selection_is_validated_against_available_devices() {
    let (_handler, router) = new_router();

    router.replace_devices(vec![DeviceType::Speaker]).await;
    assert_ok!(router.set_mode(AudioMode::AudioCall).await);

    let err = router.select_device("BLUETOOTH").await.unwrap_err();
    assert!(matches!(err, BridgeError::DeviceRejected { .. }), "{err}");

    let err = router.select_device("CAR_AUDIO").await.unwrap_err();
    assert!(matches!(err, BridgeError::DeviceRejected { .. }), "{err}");
}

#[tokio::test]
async fn selection_outside_a_call_is_ignored() {
    let (handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router
        .replace_devices(vec![DeviceType::Speaker, DeviceType::Headphones])
        .await;
    expect_snapshot(&mut rx).await;

    // Accepted but not recorded; there is no route to apply it to.
    assert_ok!(router.select_device("SPEAKER").await);
    expect_no_snapshot(&mut rx).await;
    assert!(handler.applied().is_empty());

    // The next call starts from the preference order, not the stale tap.
    assert_ok!(router.set_mode(AudioMode::AudioCall).await);
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Headphones, true),
        ]
    );
}

#[tokio::test]
async fn focus_regain_reapplies_the_route() {
    let (handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router.replace_devices(vec![DeviceType::Speaker]).await;
    expect_snapshot(&mut rx).await;
    assert_ok!(router.set_mode(AudioMode::AudioCall).await);
    expect_snapshot(&mut rx).await;

    router.focus_changed(FocusChange::Lost).await;
    expect_no_snapshot(&mut rx).await;

    router.focus_changed(FocusChange::Gained).await;
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![entry(DeviceType::Speaker, true)]
    );

    // The unchanged route is applied again after the regain.
    assert_eq!(
        handler.applied(),
        vec![
            HandlerOp::Mode(AudioMode::AudioCall),
            HandlerOp::Route(DeviceType::Speaker),
            HandlerOp::Mode(AudioMode::AudioCall),
            HandlerOp::Route(DeviceType::Speaker),
        ]
    );

    // A regain without a preceding loss does nothing.
    router.focus_changed(FocusChange::Gained).await;
    expect_no_snapshot(&mut rx).await;
}

#[tokio::test]
async fn refresh_reemits_the_current_snapshot() {
    let (_handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router
        .replace_devices(vec![DeviceType::Earpiece, DeviceType::Speaker])
        .await;
    let first = expect_snapshot(&mut rx).await;

    assert!(router.supports_device_refresh());
    assert_ok!(router.refresh_devices().await);
    assert_eq!(expect_snapshot(&mut rx).await, first);
}

#[tokio::test]
async fn initial_devices_come_from_config() {
    let handler = Arc::new(MockDeviceHandler::new());
    let config = RouterConfig::new()
        .with_event_capacity(4)
        .with_initial_devices(vec![
            DeviceType::Speaker,
            DeviceType::Earpiece,
            DeviceType::Speaker,
        ]);
    let router = AudioRouter::with_config(handler, config);
    let mut rx = router.subscribe_devices();

    assert_ok!(router.refresh_devices().await);
    assert_eq!(
        expect_snapshot(&mut rx).await,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Earpiece, false),
        ]
    );
}

#[tokio::test]
async fn failed_mode_change_leaves_router_state_unchanged() {
    let (handler, router) = new_router();
    let mut rx = router.subscribe_devices();

    router.replace_devices(vec![DeviceType::Speaker]).await;
    expect_snapshot(&mut rx).await;

    handler.fail_set_mode(true);
    let err = router.set_mode(AudioMode::AudioCall).await.unwrap_err();
    assert!(matches!(err, BridgeError::ModeRejected { .. }), "{err}");
    assert_eq!(router.current_mode().await, None);
    expect_no_snapshot(&mut rx).await;

    handler.fail_set_mode(false);
    assert_ok!(router.set_mode(AudioMode::AudioCall).await);
    assert_eq!(router.current_mode().await, Some(AudioMode::AudioCall));
}

/// Full stack: router events flow through the bridge to the observer.
#[tokio::test]
async fn bridge_over_router_end_to_end() {
    struct Forwarder {
        tx: mpsc::UnboundedSender<Vec<AudioDeviceInfo>>,
    }

    #[async_trait]
    impl AudioEventHandler for Forwarder {
        async fn on_devices_updated(&self, devices: Vec<AudioDeviceInfo>) {
            let _ = self.tx.send(devices);
        }
    }

    let (tx, mut updates) = mpsc::unbounded_channel();
    let router = Arc::new(AudioRouter::new(Arc::new(MockDeviceHandler::new())));
    let bridge = AudioBridge::with_handler(router.clone(), Arc::new(Forwarder { tx }));

    router
        .replace_devices(vec![DeviceType::Earpiece, DeviceType::Speaker])
        .await;
    let received = timeout(Duration::from_secs(1), updates.recv())
        .await
        .expect("timed out waiting for the initial device list")
        .unwrap();
    assert_eq!(
        received,
        vec![
            entry(DeviceType::Earpiece, false),
            entry(DeviceType::Speaker, false),
        ]
    );

    // Entering an audio call routes to the speaker and notifies the observer.
    bridge.set_mode(true, false, false);
    let received = timeout(Duration::from_secs(1), updates.recv())
        .await
        .expect("timed out waiting for the in-call device list")
        .unwrap();
    assert_eq!(
        received,
        vec![
            entry(DeviceType::Earpiece, false),
            entry(DeviceType::Speaker, true),
        ]
    );

    // Plugging headphones re-routes and hides the earpiece.
    router.add_device(DeviceType::Headphones).await;
    let received = timeout(Duration::from_secs(1), updates.recv())
        .await
        .expect("timed out waiting for the re-routed device list")
        .unwrap();
    assert_eq!(
        received,
        vec![
            entry(DeviceType::Speaker, false),
            entry(DeviceType::Headphones, true),
        ]
    );

    bridge.close();
}
