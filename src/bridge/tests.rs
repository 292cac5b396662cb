// src/bridge/tests.rs

use super::*;
use crate::color::{decode_565_to_rgb888, BLACK_565, WHITE_565};
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use test_log::test;

const LOGICAL_W: u32 = 172;
const LOGICAL_H: u32 = 320;

fn bridge() -> FramebufferBridge {
    FramebufferBridge::new(LOGICAL_H, LOGICAL_W).unwrap()
}

fn solid(r: u8, g: u8, b: u8) -> RgbImage {
    RgbImage::from_pixel(LOGICAL_W, LOGICAL_H, Rgb([r, g, b]))
}

#[test]
fn it_should_start_all_black() {
    let bridge = bridge();
    let snapshot = bridge.read_snapshot();
    assert_eq!(snapshot.dimensions(), (320, 172));
    assert!(snapshot.pixels().iter().all(|&p| p == BLACK_565));
    assert_eq!(bridge.submissions(), 0);
}

#[test]
fn it_should_pack_a_solid_red_image_into_f800_everywhere() {
    let bridge = bridge();
    bridge.submit(&solid(255, 0, 0)).unwrap();

    let snapshot = bridge.read_snapshot();
    assert_eq!(snapshot.dimensions(), (320, 172));
    assert_eq!(snapshot.pixels().len(), 320 * 172);
    assert!(snapshot.pixels().iter().all(|&p| p == 0xF800));
}

#[test]
fn it_should_pack_all_black_and_all_white_images_to_the_extremes() {
    let bridge = bridge();

    bridge.submit(&solid(255, 255, 255)).unwrap();
    assert!(bridge.read_snapshot().pixels().iter().all(|&p| p == WHITE_565));

    bridge.submit(&solid(0, 0, 0)).unwrap();
    assert!(bridge.read_snapshot().pixels().iter().all(|&p| p == BLACK_565));
}

#[test]
fn it_should_rotate_the_logical_top_left_to_the_physical_top_right() {
    let bridge = bridge();
    let mut image = solid(0, 0, 0);
    image.put_pixel(0, 0, Rgb([0, 0, 255]));
    bridge.submit(&image).unwrap();

    let snapshot = bridge.read_snapshot();
    assert_eq!(snapshot.pixel(319, 0), Some(0x001F));
    assert_eq!(snapshot.pixel(0, 0), Some(BLACK_565));
}

#[test]
fn it_should_reject_an_image_with_the_wrong_geometry() {
    let bridge = bridge();
    // Already in physical orientation, so the rotation makes it wrong.
    let image = RgbImage::new(LOGICAL_H, LOGICAL_W);
    let err = bridge.submit(&image).unwrap_err();
    assert_eq!(
        err,
        BridgeError::GeometryMismatch {
            expected: (320, 172),
            actual: (172, 320),
        }
    );
    assert_eq!(bridge.submissions(), 0);
}

#[test]
fn it_should_refuse_zero_sized_framebuffers() {
    assert_eq!(
        FramebufferBridge::new(0, 10).unwrap_err(),
        BridgeError::EmptyGeometry { width: 0, height: 10 }
    );
}

#[test]
fn it_should_keep_an_old_snapshot_intact_after_a_new_submission() {
    let bridge = bridge();
    bridge.submit(&solid(255, 0, 0)).unwrap();
    let before = bridge.read_snapshot();

    bridge.submit(&solid(0, 255, 0)).unwrap();
    let after = bridge.read_snapshot();

    assert!(before.pixels().iter().all(|&p| p == 0xF800));
    assert!(after.pixels().iter().all(|&p| p == 0x07E0));
}

#[test]
fn it_should_not_block_submit_when_nobody_reads() {
    let bridge = bridge();
    let image = solid(10, 20, 30);
    let start = Instant::now();
    for _ in 0..50 {
        bridge.submit(&image).unwrap();
    }
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(bridge.submissions(), 50);
}

#[test]
fn it_should_never_expose_a_mix_of_two_submissions() {
    let bridge = Arc::new(bridge());
    let done = Arc::new(AtomicBool::new(false));

    // 32 distinguishable solid frames; red carries the tag.
    let tags: Vec<u16> = (0..32u16).map(|k| k << 11).collect();
    let frames: Vec<RgbImage> = (0..32u8).map(|k| solid(k << 3, 0, 0)).collect();

    let writer = {
        let bridge = Arc::clone(&bridge);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 0..20 {
                for frame in &frames {
                    bridge.submit(frame).unwrap();
                }
                log::trace!("writer round {}", round);
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut observed = 0;
    while !done.load(Ordering::Acquire) {
        let snapshot = bridge.read_snapshot();
        let first = snapshot.pixels()[0];
        assert!(first == BLACK_565 || tags.contains(&first));
        assert!(
            snapshot.pixels().iter().all(|&p| p == first),
            "snapshot mixed two frames"
        );
        observed += 1;
    }
    writer.join().unwrap();
    assert!(observed > 0);
}

#[test]
fn it_should_decode_what_it_encoded_up_to_precision() {
    let bridge = bridge();
    bridge.submit(&solid(201, 77, 13)).unwrap();
    let value = bridge.read_snapshot().pixels()[0];
    assert_eq!(decode_565_to_rgb888(value), (200, 76, 8));
}

#[test]
fn it_should_mark_itself_closed_once() {
    let bridge = bridge();
    assert!(!bridge.is_closed());
    DisplaySink::close(&bridge);
    DisplaySink::close(&bridge);
    assert!(bridge.is_closed());
}

#[test]
fn it_should_publish_the_bridge_through_the_handshake() {
    let (mut host, discovery) = handshake(LOGICAL_W, LOGICAL_H);
    assert!(matches!(
        discovery.poll(Duration::from_millis(1)),
        Discovery::Pending
    ));

    let opened = host.open_default().unwrap();
    assert_eq!(opened.dimensions(), (320, 172));

    match discovery.poll(Duration::from_millis(100)) {
        Discovery::Found(found) => assert!(Arc::ptr_eq(&found, &opened)),
        other => panic!("expected Found, got {:?}", other),
    }
}

#[test]
fn it_should_allow_only_one_display_per_host() {
    let (mut host, _discovery) = handshake(LOGICAL_W, LOGICAL_H);
    host.open_default().unwrap();
    assert_eq!(host.open_default().unwrap_err(), BridgeError::AlreadyOpen);
}

#[test]
fn it_should_keep_the_host_usable_after_a_bad_geometry() {
    let (mut host, discovery) = handshake(LOGICAL_W, LOGICAL_H);
    assert!(host.open(0, 0).is_err());
    host.open_default().unwrap();
    assert!(matches!(
        discovery.poll(Duration::from_millis(100)),
        Discovery::Found(_)
    ));
}

#[test]
fn it_should_report_a_dropped_host() {
    let (host, discovery) = handshake(LOGICAL_W, LOGICAL_H);
    drop(host);
    assert!(matches!(
        discovery.poll(Duration::from_millis(100)),
        Discovery::HostDropped
    ));
}

#[test]
fn it_should_fail_to_open_once_discovery_is_gone() {
    let (mut host, discovery) = handshake(LOGICAL_W, LOGICAL_H);
    drop(discovery);
    assert_eq!(host.open_default().unwrap_err(), BridgeError::ShutDown);
}
