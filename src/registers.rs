/*
   Copyright 2018 Ilya Epifanov

   Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
   http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
   http://opensource.org/licenses/MIT>, at your option. This file may not be
   copied, modified, or distributed except according to those terms.
*/
//! Multisynth parameter encoding.
//!
//! Every fractional multisynth `a + b/c` is programmed through eight
//! consecutive registers holding
//!
//! ```text
//! P1 = 128 * a + floor(128 * b / c) - 512
//! P2 = 128 * b - c * floor(128 * b / c)
//! P3 = c
//! ```
//!
//! See AN619, "Manually Generating an Si5351 Register Map".

use crate::config::{Configuration, Divider, Path};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PLL {
    A,
    B,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackMultisynth {
    MSNA,
    MSNB,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Multisynth {
    MS0,
    MS1,
    MS2,
}

impl PLL {
    pub fn multisynth(&self) -> FeedbackMultisynth {
        match *self {
            PLL::A => FeedbackMultisynth::MSNA,
            PLL::B => FeedbackMultisynth::MSNB,
        }
    }
}

trait FractionalMultisynth {
    fn base_addr(&self) -> u8;
}

impl FractionalMultisynth for FeedbackMultisynth {
    fn base_addr(&self) -> u8 {
        match *self {
            FeedbackMultisynth::MSNA => 26,
            FeedbackMultisynth::MSNB => 34,
        }
    }
}

impl FractionalMultisynth for Multisynth {
    fn base_addr(&self) -> u8 {
        match *self {
            Multisynth::MS0 => 42,
            Multisynth::MS1 => 50,
            Multisynth::MS2 => 58,
        }
    }
}

bitflags! {
    /// Byte 3 of a parameter block
    pub struct MultisynthParams: u8 {
        const DIVBY4 = 0b0000_1100;
        const P1_HIGH = 0b0000_0011;
    }
}

/// The three packed fields of one multisynth
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameters {
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
}

impl Parameters {
    /// Packs `divider` into P1/P2/P3.
    ///
    /// Out-of-range dividers wrap instead of panicking, the result is only
    /// meaningful for a validated configuration.
    pub fn from_divider(divider: &Divider) -> Self {
        let scaled = 128 * divider.num as u64;
        let ratio = scaled.checked_div(divider.denom as u64).unwrap_or(0);

        let p1 = (128 * divider.int as u64 + ratio).wrapping_sub(512) as u32;
        let p2 = scaled.wrapping_sub(divider.denom as u64 * ratio) as u32;
        let p3 = divider.denom;

        Parameters { p1, p2, p3 }
    }

    pub fn from_config(config: &Configuration, path: Path) -> Self {
        Parameters::from_divider(config.divider(path))
    }

    /// Lays the parameters out as a register write starting at `address`.
    pub fn pack(&self, address: u8, flags: MultisynthParams) -> RegisterBlock {
        let (p1, p2, p3) = (self.p1, self.p2, self.p3);
        let p1_high = MultisynthParams::from_bits_truncate(((p1 & 0x00030000) >> 16) as u8)
            & MultisynthParams::P1_HIGH;

        RegisterBlock([
            address,
            ((p3 & 0x0000FF00) >> 8) as u8,
            p3 as u8,
            (p1_high | (flags - MultisynthParams::P1_HIGH)).bits(),
            ((p1 & 0x0000FF00) >> 8) as u8,
            p1 as u8,
            (((p3 & 0x000F0000) >> 12) | ((p2 & 0x000F0000) >> 16)) as u8,
            ((p2 & 0x0000FF00) >> 8) as u8,
            p2 as u8,
        ])
    }
}

pub fn p1(config: &Configuration, path: Path) -> u32 {
    Parameters::from_config(config, path).p1
}

pub fn p2(config: &Configuration, path: Path) -> u32 {
    Parameters::from_config(config, path).p2
}

pub fn p3(config: &Configuration, path: Path) -> u32 {
    Parameters::from_config(config, path).p3
}

/// Register address followed by the eight parameter bytes, ready to be sent
/// as a single I²C write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBlock([u8; 9]);

impl RegisterBlock {
    /// First register written
    pub fn address(&self) -> u8 {
        self.0[0]
    }

    pub fn params(&self) -> &[u8] {
        &self.0[1..]
    }

    pub fn as_bytes(&self) -> &[u8; 9] {
        &self.0
    }
}

impl AsRef<[u8]> for RegisterBlock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<RegisterBlock> for [u8; 9] {
    fn from(block: RegisterBlock) -> Self {
        block.0
    }
}

/// Register write for the feedback multisynth of `pll`.
pub fn encode_feedback_registers(config: &Configuration, pll: PLL) -> RegisterBlock {
    Parameters::from_config(config, Path::Feedback)
        .pack(pll.multisynth().base_addr(), MultisynthParams::empty())
}

/// Register write for output multisynth `ms`, with the divide-by-4 bits set
/// when the output divider is 4.
pub fn encode_output_registers(config: &Configuration, ms: Multisynth) -> RegisterBlock {
    let flags = if config.output.int == 4 {
        MultisynthParams::DIVBY4
    } else {
        MultisynthParams::empty()
    };

    Parameters::from_config(config, Path::Output).pack(ms.base_addr(), flags)
}
