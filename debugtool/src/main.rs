// -*- coding: utf-8 -*-

#![forbid(unsafe_code)]

mod frame;
mod serial;

use crate::{
    frame::{Frame, NR_VALUES, value_name},
    serial::run_serial,
};
use anyhow as ah;
use clap::Parser;
use std::{sync::mpsc, thread, time::Duration};

/// Microseconds per firmware timer tick.
const TICK_US: u32 = 16;

#[derive(Parser, Debug)]
struct Opts {
    /// Serial port of the debug UART.
    #[arg(default_value = "/dev/ttyUSB0")]
    port: String,

    /// Baud rate.
    #[arg(short, long, default_value_t = 19_200)]
    baud: u32,
}

fn format_value(id: u8, value: u16) -> String {
    let name = value_name(id).unwrap_or("?");
    match id {
        0 => format!("{name}={value} ({} us)", u32::from(value) * TICK_US),
        _ => format!("{name}={value}"),
    }
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();

    let (ser_notify_tx, ser_notify_rx) = mpsc::channel();

    thread::scope(|s| {
        s.spawn(|| {
            loop {
                if let Err(e) = run_serial(&opts.port, opts.baud, &ser_notify_tx) {
                    eprintln!("Serial error: {e:?}");
                }
                thread::sleep(Duration::from_millis(5000));
            }
        });

        let mut values: [Option<u16>; NR_VALUES] = Default::default();
        while let Ok(frame) = ser_notify_rx.recv() {
            match frame {
                Frame::Value { id, value } => {
                    if let Some(v) = values.get_mut(id as usize) {
                        *v = Some(value);
                    } else {
                        eprintln!("Unknown debug id {id}: {value}");
                    }
                }
                Frame::Sync => {
                    let line: Vec<String> = values
                        .iter()
                        .enumerate()
                        .filter_map(|(id, v)| v.map(|v| format_value(id as u8, v)))
                        .collect();
                    if !line.is_empty() {
                        println!("{}", line.join("  "));
                    }
                }
            }
        }
    });
    Ok(())
}


// vim: ts=4 sw=4 expandtab
