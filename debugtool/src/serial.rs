// -*- coding: utf-8 -*-

use crate::frame::{Frame, FrameDecoder};
use anyhow::{self as ah, Context as _};
use std::{
    io::{ErrorKind, Read as _},
    sync::mpsc,
    time::Duration,
};

pub fn run_serial(port: &str, baud: u32, notify_tx: &mpsc::Sender<Frame>) -> ah::Result<()> {
    let mut serial = serialport::new(port, baud)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .stop_bits(serialport::StopBits::One)
        .timeout(Duration::from_millis(500))
        .open()
        .with_context(|| format!("Open serial port {port}"))?;

    let mut decoder = FrameDecoder::new();
    let mut buf = [0_u8; 64];
    loop {
        let count = match serial.read(&mut buf) {
            Ok(count) => count,
            Err(e) if e.kind() == ErrorKind::TimedOut => continue,
            Err(e) => return Err(e).context("Serial port read"),
        };
        for frame in decoder.push_slice(&buf[..count]) {
            notify_tx.send(frame).context("Frame channel closed")?;
        }
    }
}

// vim: ts=4 sw=4 expandtab
