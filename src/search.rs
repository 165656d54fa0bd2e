/*
   Copyright 2018 Ilya Epifanov

   Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
   http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
   http://opensource.org/licenses/MIT>, at your option. This file may not be
   copied, modified, or distributed except according to those terms.
*/
//! Finds divider settings for a requested output frequency.
//!
//! The output multisynth is kept integer and picked so that the VCO lands in
//! range, then the PLL feedback multisynth absorbs the fractional part with
//! the widest possible denominator.

use crate::config::{Configuration, Divider, Reference};
use crate::validate::{is_valid_output_divider_int, is_valid_vco, Validity};
use crate::{Error, DIVIDE_BY_4_THRESHOLD, MAX_DENOMINATOR, MAX_SEARCH_ITERATIONS, MIN_VCO_FREQ};

fn step(int: u32, validity: Validity) -> Result<u32, Error> {
    match validity {
        Validity::TooLow => int.checked_add(1),
        Validity::TooHigh => int.checked_sub(1),
        Validity::Valid => Some(int),
    }
    .ok_or(Error::SearchExhausted)
}

fn find_output_int(freq: f64) -> Result<u32, Error> {
    let mut int = (MIN_VCO_FREQ as f64 / freq) as u32;
    trace!("seeding output divider with {}", int);

    for _ in 0..MAX_SEARCH_ITERATIONS {
        // the VCO range is wider than `freq`, so this always lands inside it
        loop {
            match is_valid_vco(freq * int as f64) {
                Validity::Valid => break,
                validity => int = step(int, validity)?,
            }
        }

        match is_valid_output_divider_int(int) {
            Validity::Valid => return Ok(int),
            validity => {
                trace!("output divider {} is {}", int, validity);
                int = step(int, validity)?;
            }
        }
    }

    debug!("no output divider found for {} Hz", freq);
    Err(Error::SearchExhausted)
}

fn output_divider(freq: f64) -> Result<Divider, Error> {
    if freq >= DIVIDE_BY_4_THRESHOLD as f64 {
        Ok(Divider::integer(4))
    } else {
        Ok(Divider::integer(find_output_int(freq)?))
    }
}

fn feedback_divider(freq: f64, output_int: u32, reference: Reference) -> Divider {
    let fmd = freq * output_int as f64 / reference.hz() as f64;
    let int = fmd as u32;
    let num = ((fmd - int as f64) * MAX_DENOMINATOR as f64) as u32;

    Divider::new(int, num, MAX_DENOMINATOR)
}

/// Computes a configuration producing `freq` Hz from `reference`.
///
/// Fails with [`Error::SearchExhausted`] when no legal output divider puts the
/// VCO in range, and with [`Error::InvalidConfiguration`] when the resulting
/// PLL multiplier is out of bounds (e.g. for frequencies above ~225 MHz).
pub fn generate_configuration(freq: f64, reference: Reference) -> Result<Configuration, Error> {
    if !freq.is_finite() || freq <= 0. {
        return Err(Error::InvalidFrequency);
    }

    let output = output_divider(freq)?;
    let feedback = feedback_divider(freq, output.int, reference);
    let config = Configuration::new(feedback, output, reference);
    trace!("candidate configuration {}", config);

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_frequency, is_valid_configuration, FREQUENCY_TOLERANCE};
    use proptest::prelude::*;

    fn check(freq: f64, reference: Reference, tolerance: f64) -> Configuration {
        let config = generate_configuration(freq, reference).unwrap();
        assert!(is_valid_configuration(&config));
        let actual = compute_frequency(&config);
        assert!(
            (actual - freq).abs() <= tolerance,
            "{} Hz requested, {} Hz produced",
            freq,
            actual
        );
        config
    }

    #[test]
    fn hf_frequencies() {
        let config = check(28.567e6, Reference::Xtal25Mhz, FREQUENCY_TOLERANCE);
        assert_eq!(config.output, Divider::integer(22));
        assert_eq!(config.feedback.int, 25);
        assert_eq!(config.feedback.denom, MAX_DENOMINATOR);

        let config = check(10.7e6, Reference::Xtal25Mhz, FREQUENCY_TOLERANCE);
        assert_eq!(config.output, Divider::integer(57));
    }

    #[test]
    fn divide_by_4_mode() {
        let config = check(153.0125e6, Reference::Xtal25Mhz, FREQUENCY_TOLERANCE);
        assert_eq!(config.output, Divider::integer(4));
        assert_eq!(config.feedback.int, 24);
    }

    #[test]
    fn just_below_divide_by_4() {
        let config = check(130e6, Reference::Xtal25Mhz, 5.);
        assert_eq!(config.output, Divider::integer(6));
        assert_eq!(config.feedback.int, 31);
    }

    #[test]
    fn other_reference() {
        let config = check(28.567e6, Reference::Xtal27Mhz, FREQUENCY_TOLERANCE);
        assert_eq!(config.output, Divider::integer(22));
        assert_eq!(config.feedback.int, 23);
    }

    #[test]
    fn too_fast() {
        assert_eq!(
            generate_configuration(250e6, Reference::Xtal25Mhz),
            Err(Error::InvalidConfiguration)
        );
    }

    #[test]
    fn too_slow() {
        assert_eq!(
            generate_configuration(100e3, Reference::Xtal25Mhz),
            Err(Error::SearchExhausted)
        );
        assert_eq!(
            generate_configuration(0.01, Reference::Xtal25Mhz),
            Err(Error::SearchExhausted)
        );
    }

    #[test]
    fn rejects_nonsense() {
        for &freq in [0., -10e6, f64::NAN, f64::INFINITY].iter() {
            assert_eq!(
                generate_configuration(freq, Reference::Xtal25Mhz),
                Err(Error::InvalidFrequency)
            );
        }
    }

    proptest! {
        #[test]
        fn found_configurations_are_sound(freq in 1_000_000u32..140_000_000, xtal_27 in any::<bool>()) {
            let reference = if xtal_27 { Reference::Xtal27Mhz } else { Reference::Xtal25Mhz };
            let freq = freq as f64;
            match generate_configuration(freq, reference) {
                Ok(config) => {
                    prop_assert!(is_valid_configuration(&config));
                    prop_assert!(config.output.is_integer());
                    prop_assert!(is_valid_vco(freq * config.output.int as f64).is_valid());
                    prop_assert!(config.frequency_error(freq) < 5.);
                }
                Err(e) => prop_assert_eq!(e, Error::InvalidConfiguration),
            }
        }
    }
}
