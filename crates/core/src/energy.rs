//! The user's energy level, used to pick what kind of work to suggest.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    /// Default energy for an hour of the day (0-23), following the profile's
    /// energy pattern: mornings low, mid-day high, afternoons medium, evenings low.
    ///
    /// This departs from the older hour split (before 10 low, before 14 high,
    /// medium otherwise): hours 18-23 are low here rather than medium.
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            10..=13 => EnergyLevel::High,
            14..=17 => EnergyLevel::Medium,
            _ => EnergyLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "LOW",
            EnergyLevel::Medium => "MEDIUM",
            EnergyLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(EnergyLevel::Low),
            "MEDIUM" => Ok(EnergyLevel::Medium),
            "HIGH" => Ok(EnergyLevel::High),
            other => Err(format!("unknown energy level '{other}' (expected low, medium or high)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_defaults_follow_energy_pattern() {
        assert_eq!(EnergyLevel::for_hour(7), EnergyLevel::Low);
        assert_eq!(EnergyLevel::for_hour(11), EnergyLevel::High);
        assert_eq!(EnergyLevel::for_hour(15), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::for_hour(21), EnergyLevel::Low);
    }

    #[test]
    fn evenings_are_low_not_medium() {
        for hour in 18..=23 {
            assert_eq!(EnergyLevel::for_hour(hour), EnergyLevel::Low, "hour {hour}");
        }
        assert_eq!(EnergyLevel::for_hour(17), EnergyLevel::Medium);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("high".parse::<EnergyLevel>().unwrap(), EnergyLevel::High);
        assert_eq!(" Low ".parse::<EnergyLevel>().unwrap(), EnergyLevel::Low);
        assert!("turbo".parse::<EnergyLevel>().is_err());
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&EnergyLevel::Medium).unwrap(), "\"MEDIUM\"");
    }
}
