/*
   Copyright 2018 Ilya Epifanov

   Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
   http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
   http://opensource.org/licenses/MIT>, at your option. This file may not be
   copied, modified, or distributed except according to those terms.
*/
/*!
Platform agnostic divider calculations for the [Si5351].

## The Device

The Silicon Labs [Si5351] is an any-frequency CMOS clock generator. Each
output is produced by two fractional dividers: a feedback multisynth which
multiplies the crystal up to a 600-900 MHz VCO, and an output multisynth which
divides the VCO down again.

This crate finds divider values for a requested frequency, checks them against
the chip's limits and encodes them into the register writes the chip expects.
It doesn't talk to the bus itself: every [`RegisterBlock`] starts with the
register address and can be passed as-is to any I²C `write`.

## Usage

```
use si5351_dividers::{
    compute_frequency, encode_feedback_registers, encode_output_registers,
    generate_configuration, Multisynth, Reference, PLL,
};

# fn main() -> Result<(), si5351_dividers::Error> {
let config = generate_configuration(14_175_000., Reference::Xtal25Mhz)?;
assert!((compute_frequency(&config) - 14_175_000.).abs() < 2.);

let pll = encode_feedback_registers(&config, PLL::A);
let ms = encode_output_registers(&config, Multisynth::MS0);
assert_eq!(pll.address(), 26);
assert_eq!(ms.address(), 42);
// i2c.write(ADDRESS, pll.as_ref())?;
// i2c.write(ADDRESS, ms.as_ref())?;
# Ok(())
# }
```

[Si5351]: https://www.silabs.com/documents/public/data-sheets/Si5351-B.pdf
*/
#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate bitflags;

#[macro_use]
mod fmt;

mod config;
mod registers;
mod search;
mod validate;

use core::fmt::{Display, Formatter};

pub use crate::config::{compute_frequency, Configuration, Divider, Path, Reference};
pub use crate::registers::{
    encode_feedback_registers, encode_output_registers, p1, p2, p3, FeedbackMultisynth,
    Multisynth, MultisynthParams, Parameters, RegisterBlock, PLL,
};
pub use crate::search::generate_configuration;
pub use crate::validate::{
    is_valid_configuration, is_valid_output_divider_int, is_valid_vco, Validity,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A divider or the VCO frequency is outside the chip's limits
    InvalidConfiguration,
    /// No legal output divider was found within [`MAX_SEARCH_ITERATIONS`]
    SearchExhausted,
    /// The requested frequency isn't a positive number
    InvalidFrequency,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidConfiguration => f.write_str("invalid divider configuration"),
            Error::SearchExhausted => f.write_str("no output divider found"),
            Error::InvalidFrequency => f.write_str("invalid target frequency"),
        }
    }
}

pub const MIN_VCO_FREQ: u32 = 600_000_000;
pub const MAX_VCO_FREQ: u32 = 900_000_000;

pub const MIN_FEEDBACK_INT: u32 = 15;
pub const MAX_FEEDBACK_INT: u32 = 90;

/// Smallest general output divider, 4 and 6 are allowed as special cases
pub const MIN_OUTPUT_INT: u32 = 8;
pub const MAX_OUTPUT_INT: u32 = 2048;

/// Largest numerator/denominator, the fraction registers are 20 bits wide
pub const MAX_DENOMINATOR: u32 = 1_048_575;

/// Targets at or above this use the fixed divide-by-4 output mode
pub const DIVIDE_BY_4_THRESHOLD: u32 = 150_000_000;

pub const MAX_SEARCH_ITERATIONS: usize = 10;

/// Accuracy in Hz that generated configurations normally achieve
pub const FREQUENCY_TOLERANCE: f64 = 2.;
