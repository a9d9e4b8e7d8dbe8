//! Field validation for the car form.

use crate::form::Field;
use crate::models::{Car, YEAR_UNSET};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const EMPTY_FIELD: &str = "Empty field";
pub const NOT_ALPHANUMERIC: &str = "The field must contain only characters and number";

static LICENSE_PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("license plate pattern is valid"));

/// Inline error state of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldError {
    pub visible: bool,
    pub message: String,
}

impl FieldError {
    fn shown(message: &str) -> Self {
        Self {
            visible: true,
            message: message.to_string(),
        }
    }
}

/// Error state for every field of the form, keyed by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<Field, FieldError>,
}

impl Default for FieldErrors {
    fn default() -> Self {
        Self {
            entries: Field::ALL
                .into_iter()
                .map(|field| (field, FieldError::default()))
                .collect(),
        }
    }
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> &FieldError {
        // Every field has a slot; the fallback only satisfies the type.
        static HIDDEN: FieldError = FieldError {
            visible: false,
            message: String::new(),
        };
        self.entries.get(&field).unwrap_or(&HIDDEN)
    }

    /// Message to show under `field`, if any.
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        let error = self.get(field);
        error.visible.then_some(error.message.as_str())
    }

    pub fn any_visible(&self) -> bool {
        self.entries.values().any(|e| e.visible)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn show(&mut self, field: Field, message: &str) {
        self.entries.insert(field, FieldError::shown(message));
    }
}

/// Result of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        !self.errors.any_visible()
    }
}

fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}

/// Check every field of `car`. Each field reports at most one error.
pub fn validate(car: &Car) -> Validation {
    let mut errors = FieldErrors::default();

    if is_blank(&car.license_plate_number) {
        errors.show(Field::LicensePlateNumber, EMPTY_FIELD);
    } else if !LICENSE_PLATE.is_match(&car.license_plate_number) {
        errors.show(Field::LicensePlateNumber, NOT_ALPHANUMERIC);
    }

    for (field, value) in [
        (Field::Color, &car.color),
        (Field::Manufacturer, &car.manufacturer),
        (Field::Model, &car.model),
    ] {
        if is_blank(value) {
            errors.show(field, EMPTY_FIELD);
        }
    }

    if car.year == YEAR_UNSET {
        errors.show(Field::Year, EMPTY_FIELD);
    }

    Validation { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete_car() -> Car {
        Car {
            license_plate_number: "AB123".to_string(),
            color: "Red".to_string(),
            manufacturer: "BMW".to_string(),
            model: "X5".to_string(),
            year: 2015,
            active: true,
        }
    }

    #[test]
    fn complete_car_is_valid() {
        let validation = validate(&complete_car());
        assert!(validation.is_valid());
        assert_eq!(validation.errors.len(), Field::ALL.len());
    }

    #[test]
    fn empty_car_flags_every_required_field() {
        let validation = validate(&Car::new());
        assert!(!validation.is_valid());
        for field in [
            Field::LicensePlateNumber,
            Field::Color,
            Field::Manufacturer,
            Field::Model,
            Field::Year,
        ] {
            assert_eq!(validation.errors.visible_error(field), Some(EMPTY_FIELD));
        }
        assert_eq!(validation.errors.visible_error(Field::Active), None);
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut car = complete_car();
        car.license_plate_number = " \t ".to_string();
        car.model = "   ".to_string();
        let validation = validate(&car);
        assert_eq!(
            validation.errors.visible_error(Field::LicensePlateNumber),
            Some(EMPTY_FIELD)
        );
        assert_eq!(validation.errors.visible_error(Field::Model), Some(EMPTY_FIELD));
    }

    #[test]
    fn plate_with_symbols_or_spaces_is_rejected() {
        for plate in ["AB-123", "AB 123", " AB123", "ÄB123"] {
            let mut car = complete_car();
            car.license_plate_number = plate.to_string();
            let validation = validate(&car);
            assert_eq!(
                validation.errors.visible_error(Field::LicensePlateNumber),
                Some(NOT_ALPHANUMERIC),
                "plate {plate:?}"
            );
        }
    }

    #[test]
    fn errors_are_recomputed_from_scratch() {
        let first = validate(&Car::new());
        assert!(first.errors.any_visible());
        let second = validate(&complete_car());
        assert_eq!(second.errors, FieldErrors::default());
    }

    fn arb_choice(options: &'static [&'static str]) -> impl Strategy<Value = String> {
        prop::sample::select(options).prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn non_alphanumeric_plate_always_fails(
            prefix in "[A-Za-z0-9]{0,4}",
            bad in "[^A-Za-z0-9]",
            suffix in "[A-Za-z0-9]{0,4}",
        ) {
            let mut car = complete_car();
            car.license_plate_number = format!("{prefix}{bad}{suffix}");
            let validation = validate(&car);
            prop_assert!(!validation.is_valid());
            prop_assert!(validation.errors.get(Field::LicensePlateNumber).visible);
        }

        #[test]
        fn populated_car_always_passes(
            plate in "[A-Za-z0-9]{1,10}",
            color in arb_choice(&["Red", "Green", "Silver"]),
            manufacturer in arb_choice(&["BMW", "Audi", "Volkswagen"]),
            model in "[A-Za-z0-9][A-Za-z0-9 ]{0,12}",
            year in 2010u16..=2021,
            active in any::<bool>(),
        ) {
            let car = Car {
                license_plate_number: plate,
                color,
                manufacturer,
                model,
                year,
                active,
            };
            let validation = validate(&car);
            prop_assert!(validation.is_valid());
            for field in Field::ALL {
                prop_assert!(validation.errors.visible_error(field).is_none());
            }
        }
    }
}
