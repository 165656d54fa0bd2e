/*
   Copyright 2018 Ilya Epifanov

   Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
   http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
   http://opensource.org/licenses/MIT>, at your option. This file may not be
   copied, modified, or distributed except according to those terms.
*/
//! Legality checks for divider values and VCO frequencies

use crate::config::{Configuration, Divider};
use crate::{
    Error, MAX_DENOMINATOR, MAX_FEEDBACK_INT, MAX_OUTPUT_INT, MAX_VCO_FREQ, MIN_FEEDBACK_INT,
    MIN_OUTPUT_INT, MIN_VCO_FREQ,
};

/// Where a value sits relative to its legal range
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Validity {
    TooLow,
    Valid,
    TooHigh,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        *self == Validity::Valid
    }
}

/// Checks the integer part of an output multisynth divider.
///
/// 4, 6 and 8 are the special even-integer modes, everything else has to be
/// within `8..=2048`.
pub fn is_valid_output_divider_int(value: u32) -> Validity {
    match value {
        4 | 6 | 8 => Validity::Valid,
        v if v < MIN_OUTPUT_INT => Validity::TooLow,
        v if v > MAX_OUTPUT_INT => Validity::TooHigh,
        _ => Validity::Valid,
    }
}

pub fn is_valid_vco(frequency: f64) -> Validity {
    if frequency < MIN_VCO_FREQ as f64 {
        Validity::TooLow
    } else if frequency > MAX_VCO_FREQ as f64 {
        Validity::TooHigh
    } else {
        Validity::Valid
    }
}

fn valid_fraction(divider: &Divider) -> bool {
    divider.num <= MAX_DENOMINATOR && divider.denom != 0 && divider.denom <= MAX_DENOMINATOR
}

impl Configuration {
    /// Checks every register-level constraint of the chip.
    pub fn validate(&self) -> Result<(), Error> {
        let output = &self.output;
        if !is_valid_output_divider_int(output.int).is_valid() {
            debug!("output divider {} out of range", output.int);
            return Err(Error::InvalidConfiguration);
        }
        if output.int == MAX_OUTPUT_INT && output.num != 0 {
            debug!("output divider {} can't be fractional", output.int);
            return Err(Error::InvalidConfiguration);
        }
        if !valid_fraction(output) {
            debug!("output fraction {}/{} out of range", output.num, output.denom);
            return Err(Error::InvalidConfiguration);
        }

        let feedback = &self.feedback;
        if feedback.int < MIN_FEEDBACK_INT || feedback.int > MAX_FEEDBACK_INT {
            debug!("feedback multiplier {} out of range", feedback.int);
            return Err(Error::InvalidConfiguration);
        }
        if feedback.int == MAX_FEEDBACK_INT && feedback.num != 0 {
            debug!("feedback multiplier {} can't be fractional", feedback.int);
            return Err(Error::InvalidConfiguration);
        }
        if !valid_fraction(feedback) {
            debug!(
                "feedback fraction {}/{} out of range",
                feedback.num,
                feedback.denom
            );
            return Err(Error::InvalidConfiguration);
        }

        let vco = self.vco_frequency();
        if !is_valid_vco(vco).is_valid() {
            debug!("vco frequency {} out of range", vco);
            return Err(Error::InvalidConfiguration);
        }

        Ok(())
    }
}

pub fn is_valid_configuration(config: &Configuration) -> bool {
    config.validate().is_ok()
}
