//! [§ 8.3.11 \<length\>](https://www.w3.org/TR/ttml2/#style-value-length)

use std::str::FromStr;

use strum_macros::{Display, EnumString};

/// Length units understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LengthUnit {
    /// Pixels.
    #[strum(serialize = "px")]
    Pixel,
    /// Multiples of the font size.
    #[strum(serialize = "em")]
    Em,
    /// Multiples of the cell height.
    #[strum(serialize = "c")]
    Cell,
    /// Percentage of a reference length.
    #[strum(serialize = "%")]
    Percentage,
}

/// A number with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    /// Magnitude.
    pub value: f64,
    /// Unit.
    pub unit: LengthUnit,
}

impl Length {
    /// Parse a single length. A unitless number counts as pixels.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-')))
            .unwrap_or(s.len());
        let value: f64 = s[..split].parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = match &s[split..] {
            "" => LengthUnit::Pixel,
            suffix => LengthUnit::from_str(suffix).ok()?,
        };
        Some(Self { value, unit })
    }

    /// Parse a whitespace separated list of lengths.
    #[must_use]
    pub fn parse_list(s: &str) -> Option<Vec<Self>> {
        s.split_whitespace().map(Self::parse).collect()
    }

    /// Resolve to pixels. `reference` is the font size (for em and
    /// percentages) and `cell` the cell height.
    #[must_use]
    pub fn resolve(&self, reference: f64, cell: f64) -> f64 {
        match self.unit {
            LengthUnit::Pixel => self.value,
            LengthUnit::Em => self.value * reference,
            LengthUnit::Cell => self.value * cell,
            LengthUnit::Percentage => self.value / 100.0 * reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(
            Length::parse("12px"),
            Some(Length { value: 12.0, unit: LengthUnit::Pixel })
        );
        assert_eq!(Length::parse("-1.5EM").map(|l| l.unit), Some(LengthUnit::Em));
        assert_eq!(Length::parse("50%").map(|l| l.resolve(24.0, 0.0)), Some(12.0));
        assert_eq!(Length::parse("2c").map(|l| l.resolve(0.0, 48.0)), Some(96.0));
        assert_eq!(Length::parse("7"), Some(Length { value: 7.0, unit: LengthUnit::Pixel }));
        assert_eq!(Length::parse("px"), None);
        assert_eq!(Length::parse("3pt"), None);
        assert_eq!(Length::parse_list("1px 2px").map(|l| l.len()), Some(2));
    }
}
