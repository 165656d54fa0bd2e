/*
   Copyright 2018 Ilya Epifanov

   Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
   http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
   http://opensource.org/licenses/MIT>, at your option. This file may not be
   copied, modified, or distributed except according to those terms.
*/
//! Divider configuration and frequency evaluation

/// Crystal oscillator driving the PLLs
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    Xtal25Mhz = 25_000_000,
    Xtal27Mhz = 27_000_000,
}

impl Reference {
    /// Crystal frequency in Hz
    pub fn hz(&self) -> u32 {
        *self as u32
    }
}

/// Selects which divider of a [`Configuration`] is being looked at
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Path {
    /// PLL feedback multisynth (MSNA/MSNB)
    Feedback,
    /// Output multisynth (MS0..MS2)
    Output,
}

/// Fractional divider `int + num / denom`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Divider {
    pub int: u32,
    pub num: u32,
    pub denom: u32,
}

impl Divider {
    pub const fn new(int: u32, num: u32, denom: u32) -> Self {
        Divider { int, num, denom }
    }

    /// Integer-only divider, fraction `0/1`
    pub const fn integer(int: u32) -> Self {
        Divider::new(int, 0, 1)
    }

    /// Whether the chip can run this divider in integer mode
    pub fn is_integer(&self) -> bool {
        self.num == 0
    }

    pub fn value(&self) -> f64 {
        self.int as f64 + self.num as f64 / self.denom as f64
    }
}

/// A complete feedback + output divider setup for one clock path.
///
/// Either built by hand or produced by [`generate_configuration`](crate::generate_configuration).
/// Nothing in this crate checks the fields on construction; use
/// [`Configuration::validate`] before handing the result to the encoders.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub feedback: Divider,
    pub output: Divider,
    pub reference: Reference,
}

impl Configuration {
    pub fn new(feedback: Divider, output: Divider, reference: Reference) -> Self {
        Configuration {
            feedback,
            output,
            reference,
        }
    }

    pub fn divider(&self, path: Path) -> &Divider {
        match path {
            Path::Feedback => &self.feedback,
            Path::Output => &self.output,
        }
    }

    /// Frequency of the PLL this configuration sets up, in Hz
    pub fn vco_frequency(&self) -> f64 {
        self.reference.hz() as f64 * self.feedback.value()
    }

    /// Distance in Hz between the produced frequency and `target`
    pub fn frequency_error(&self, target: f64) -> f64 {
        let diff = compute_frequency(self) - target;
        if diff < 0. {
            -diff
        } else {
            diff
        }
    }
}

/// Output frequency in Hz produced by `config`.
///
/// The result is meaningless for configurations that don't pass validation.
pub fn compute_frequency(config: &Configuration) -> f64 {
    config.reference.hz() as f64 * config.feedback.value() / config.output.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_hz(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {} Hz, got {} Hz",
            expected,
            actual
        );
    }

    #[test]
    fn integer_dividers() {
        let config = Configuration::new(
            Divider::integer(24),
            Divider::integer(8),
            Reference::Xtal25Mhz,
        );
        assert_hz(compute_frequency(&config), 75e6);
        assert_hz(config.vco_frequency(), 600e6);
    }

    #[test]
    fn fractional_feedback() {
        let mut config = Configuration::new(
            Divider::new(24, 6, 10),
            Divider::integer(4),
            Reference::Xtal25Mhz,
        );
        assert_hz(compute_frequency(&config), 153.75e6);

        config.feedback = Divider::new(24, 482, 1000);
        assert_hz(compute_frequency(&config), 153.0125e6);
    }

    #[test]
    fn fractional_output() {
        let config = Configuration::new(
            Divider::integer(32),
            Divider::new(8, 1, 2),
            Reference::Xtal27Mhz,
        );
        assert_hz(compute_frequency(&config), 27e6 * 32. / 8.5);
    }

    #[test]
    fn error_is_absolute() {
        let config = Configuration::new(
            Divider::integer(24),
            Divider::integer(8),
            Reference::Xtal25Mhz,
        );
        assert_hz(config.frequency_error(75e6 + 3.), 3.);
        assert_hz(config.frequency_error(75e6 - 3.), 3.);
    }

    #[test]
    fn path_selects_divider() {
        let config = Configuration::new(
            Divider::new(30, 1, 3),
            Divider::integer(6),
            Reference::Xtal27Mhz,
        );
        assert_eq!(config.divider(Path::Feedback), &Divider::new(30, 1, 3));
        assert_eq!(config.divider(Path::Output), &Divider::integer(6));
        assert!(config.output.is_integer());
        assert!(!config.feedback.is_integer());
        assert_eq!(Reference::Xtal27Mhz.hz(), 27_000_000);
    }
}
