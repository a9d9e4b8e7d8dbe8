//! Shared data types for the application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Year value meaning "not chosen yet".
pub const YEAR_UNSET: u16 = 0;

/// Model years offered by the form.
pub const YEARS: RangeInclusive<u16> = 2010..=2021;

/// Represents a car record as stored by the backend.
///
/// `color` and `manufacturer` keep the wire string so records coming from the
/// server round-trip unchanged; an empty string means "not chosen".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub license_plate_number: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: u16,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for Car {
    fn default() -> Self {
        Self {
            license_plate_number: String::new(),
            color: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            year: YEAR_UNSET,
            active: default_active(),
        }
    }
}

impl Car {
    /// Create an empty car for new record creation.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Paint colors the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Silver,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Silver];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Silver => "Silver",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manufacturers the form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manufacturer {
    Bmw,
    Audi,
    Volkswagen,
}

impl Manufacturer {
    pub const ALL: [Manufacturer; 3] = [
        Manufacturer::Bmw,
        Manufacturer::Audi,
        Manufacturer::Volkswagen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Manufacturer::Bmw => "BMW",
            Manufacturer::Audi => "Audi",
            Manufacturer::Volkswagen => "Volkswagen",
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let car = Car {
            license_plate_number: "AB123".to_string(),
            color: Color::Red.to_string(),
            manufacturer: Manufacturer::Bmw.to_string(),
            model: "X5".to_string(),
            year: 2015,
            active: true,
        };

        let json = serde_json::to_value(&car).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "licensePlateNumber": "AB123",
                "color": "Red",
                "manufacturer": "BMW",
                "model": "X5",
                "year": 2015,
                "active": true,
            })
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let car: Car = serde_json::from_str(r#"{"licensePlateNumber":"Z9"}"#).unwrap();
        assert_eq!(car.license_plate_number, "Z9");
        assert_eq!(car.year, YEAR_UNSET);
        assert!(car.active);
        assert!(car.color.is_empty());
    }

    #[test]
    fn new_car_is_active_and_unset() {
        let car = Car::new();
        assert!(car.active);
        assert_eq!(car.year, YEAR_UNSET);
        assert!(car.license_plate_number.is_empty());
    }
}
