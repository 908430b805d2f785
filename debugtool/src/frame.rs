// -*- coding: utf-8 -*-

/// Bytes per frame: id, value low byte, value high byte.
pub const FRAME_LEN: usize = 3;

const SYNC: u8 = 0xFF;

/// Names of the firmware debug values, indexed by id.
const NAMES: [&str; 3] = ["delay", "halfwaves", "min_stack"];

pub const NR_VALUES: usize = NAMES.len();

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Frame {
    Value { id: u8, value: u16 },
    Sync,
}

pub fn value_name(id: u8) -> Option<&'static str> {
    NAMES.get(id as usize).copied()
}

/// Splits the debug byte stream into frames.
///
/// Decoding starts after the first sync frame.
/// A run of three or more 0xFF bytes can only occur in a sync frame,
/// because ids are never 0xFF. The first non-0xFF byte after such a run
/// starts the next frame.
#[derive(Default)]
pub struct FrameDecoder {
    buf: [u8; FRAME_LEN],
    len: usize,
    sync_run: usize,
    synced: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if !self.synced {
            if byte == SYNC {
                self.sync_run += 1;
                return None;
            }
            if self.sync_run < FRAME_LEN {
                self.sync_run = 0;
                return None;
            }
            self.synced = true;
            self.sync_run = 0;
            self.len = 0;
        }

        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < FRAME_LEN {
            return None;
        }
        self.len = 0;

        let [id, lo, hi] = self.buf;
        if id != SYNC {
            Some(Frame::Value {
                id,
                value: u16::from_le_bytes([lo, hi]),
            })
        } else if lo == SYNC && hi == SYNC {
            Some(Frame::Sync)
        } else {
            // Broken sync frame. Search again.
            self.synced = false;
            self.sync_run = self.buf.iter().rev().take_while(|b| **b == SYNC).count();
            None
        }
    }

    pub fn push_slice(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|b| self.push(*b)).collect()
    }
}


// vim: ts=4 sw=4 expandtab
