//! Form state for the car dialog.

use crate::error::FormError;
use crate::models::{Car, Color, Manufacturer, YEARS, YEAR_UNSET};
use std::fmt;
use std::str::FromStr;

/// The editable fields of a car, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    LicensePlateNumber,
    Color,
    Manufacturer,
    Model,
    Year,
    Active,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::LicensePlateNumber,
        Field::Color,
        Field::Manufacturer,
        Field::Model,
        Field::Year,
        Field::Active,
    ];

    /// JSON name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::LicensePlateNumber => "licensePlateNumber",
            Field::Color => "color",
            Field::Manufacturer => "manufacturer",
            Field::Model => "model",
            Field::Year => "year",
            Field::Active => "active",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::LicensePlateNumber => "License plate number",
            Field::Color => "Color",
            Field::Manufacturer => "Manufacturer",
            Field::Model => "Model",
            Field::Year => "Year",
            Field::Active => "Active",
        }
    }

    /// Whether the field takes free text (as opposed to a choice).
    pub fn is_text(self) -> bool {
        matches!(self, Field::LicensePlateNumber | Field::Model)
    }

    /// Text shown for an unset choice field.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Color => "Choose color...",
            Field::Manufacturer => "Choose manufacturer...",
            Field::Year => "Choose year...",
            _ => "",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Whether the form creates a new car or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Updates are addressed by the identifier the record had when the form opened.
    Update { original_id: String },
}

/// Mutable record behind the dialog.
#[derive(Debug, Clone)]
pub struct CarForm {
    car: Car,
    mode: FormMode,
}

impl CarForm {
    /// Create form state, copying `initial` when editing an existing car.
    pub fn new(initial: Option<&Car>) -> Self {
        match initial {
            Some(existing) => Self {
                car: Car {
                    license_plate_number: existing.license_plate_number.clone(),
                    color: existing.color.clone(),
                    manufacturer: existing.manufacturer.clone(),
                    model: existing.model.clone(),
                    year: existing.year,
                    // Records always reopen as active, including inactive ones.
                    active: true,
                },
                mode: FormMode::Update {
                    original_id: existing.license_plate_number.clone(),
                },
            },
            None => Self {
                car: Car::new(),
                mode: FormMode::Create,
            },
        }
    }

    /// Current snapshot of the record.
    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_update(&self) -> bool {
        matches!(self.mode, FormMode::Update { .. })
    }

    /// Display text for a field, using the placeholder for unset choices.
    pub fn display_value(&self, field: Field) -> String {
        let raw = match field {
            Field::LicensePlateNumber => self.car.license_plate_number.clone(),
            Field::Color => self.car.color.clone(),
            Field::Manufacturer => self.car.manufacturer.clone(),
            Field::Model => self.car.model.clone(),
            Field::Year if self.car.year == YEAR_UNSET => String::new(),
            Field::Year => self.car.year.to_string(),
            Field::Active => (if self.car.active { "Yes" } else { "No" }).to_string(),
        };
        if raw.is_empty() {
            field.placeholder().to_string()
        } else {
            raw
        }
    }

    /// Replace one field's value, leaving the others untouched.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        match field {
            Field::LicensePlateNumber => self.car.license_plate_number = value.to_string(),
            Field::Color => self.car.color = value.to_string(),
            Field::Manufacturer => self.car.manufacturer = value.to_string(),
            Field::Model => self.car.model = value.to_string(),
            Field::Year => self.car.year = parse_year(value)?,
            Field::Active => {
                self.car.active = value
                    .trim()
                    .parse()
                    .map_err(|_| FormError::InvalidFlag(value.to_string()))?
            }
        }
        tracing::debug!("Field {} set to {:?}", field, value);
        Ok(())
    }

    /// Same as [`CarForm::set`], keyed by the field's JSON name.
    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let field: Field = name.parse()?;
        self.set(field, value)
    }

    /// Step a choice field to its next (or previous) option, wrapping around.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        match field {
            Field::Color => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(Color::ALL.iter().map(|c| c.as_str()))
                    .collect();
                self.car.color = step(&options, &self.car.color.as_str(), forward).to_string();
            }
            Field::Manufacturer => {
                let options: Vec<&str> = std::iter::once("")
                    .chain(Manufacturer::ALL.iter().map(|m| m.as_str()))
                    .collect();
                self.car.manufacturer =
                    step(&options, &self.car.manufacturer.as_str(), forward).to_string();
            }
            Field::Year => {
                let options: Vec<u16> = std::iter::once(YEAR_UNSET).chain(YEARS).collect();
                self.car.year = step(&options, &self.car.year, forward);
            }
            Field::Active => self.car.active = !self.car.active,
            Field::LicensePlateNumber | Field::Model => {}
        }
    }

    /// Append a character to a text field.
    pub fn push_char(&mut self, field: Field, c: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(c);
        }
    }

    /// Remove the last character of a text field.
    pub fn pop_char(&mut self, field: Field) {
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::LicensePlateNumber => Some(&mut self.car.license_plate_number),
            Field::Model => Some(&mut self.car.model),
            _ => None,
        }
    }
}

fn parse_year(value: &str) -> Result<u16, FormError> {
    let year: u16 = value
        .trim()
        .parse()
        .map_err(|_| FormError::InvalidYear(value.to_string()))?;
    if year == YEAR_UNSET || YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(FormError::InvalidYear(value.to_string()))
    }
}

/// Pick the neighbour of `current` in `options`; unknown values restart at the first option.
fn step<T: PartialEq + Clone>(options: &[T], current: &T, forward: bool) -> T {
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Car {
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
    fn create_mode_starts_from_defaults() {
        let form = CarForm::new(None);
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.car(), &Car::new());
    }

    #[test]
    fn update_mode_remembers_original_id() {
        let form = CarForm::new(Some(&existing()));
        assert_eq!(
            form.mode(),
            &FormMode::Update {
                original_id: "AB123".to_string()
            }
        );
        assert_eq!(form.car(), &existing());
    }

    #[test]
    fn inactive_record_reopens_as_active() {
        let mut car = existing();
        car.active = false;
        let form = CarForm::new(Some(&car));
        assert!(form.car().active);
    }

    #[test]
    fn set_replaces_only_one_field() {
        let mut form = CarForm::new(Some(&existing()));
        form.set(Field::Model, "X6").unwrap();

        let mut expected = existing();
        expected.model = "X6".to_string();
        assert_eq!(form.car(), &expected);
    }

    #[test]
    fn set_by_name_uses_json_names() {
        let mut form = CarForm::new(None);
        form.set_by_name("licensePlateNumber", "AB123").unwrap();
        form.set_by_name("year", "2015").unwrap();
        form.set_by_name("active", "false").unwrap();

        assert_eq!(form.car().license_plate_number, "AB123");
        assert_eq!(form.car().year, 2015);
        assert!(!form.car().active);
        assert_eq!(
            form.set_by_name("plate", "x"),
            Err(FormError::UnknownField("plate".to_string()))
        );
    }

    #[test]
    fn bad_year_leaves_state_untouched() {
        let mut form = CarForm::new(Some(&existing()));
        assert!(matches!(form.set(Field::Year, "soon"), Err(FormError::InvalidYear(_))));
        assert!(matches!(form.set(Field::Year, "1999"), Err(FormError::InvalidYear(_))));
        assert_eq!(form.car().year, 2015);

        form.set(Field::Year, "0").unwrap();
        assert_eq!(form.car().year, YEAR_UNSET);
    }

    #[test]
    fn cycle_wraps_through_unset_option() {
        let mut form = CarForm::new(None);
        form.cycle(Field::Color, true);
        assert_eq!(form.car().color, "Red");
        form.cycle(Field::Color, false);
        assert_eq!(form.car().color, "");
        form.cycle(Field::Color, false);
        assert_eq!(form.car().color, "Silver");

        form.cycle(Field::Year, true);
        assert_eq!(form.car().year, 2010);
        form.cycle(Field::Year, false);
        form.cycle(Field::Year, false);
        assert_eq!(form.car().year, 2021);

        form.cycle(Field::Manufacturer, true);
        assert_eq!(form.car().manufacturer, "BMW");
    }

    #[test]
    fn cycle_from_unknown_value_restarts() {
        let mut car = existing();
        car.color = "Blue".to_string();
        let mut form = CarForm::new(Some(&car));
        form.cycle(Field::Color, true);
        assert_eq!(form.car().color, "");
    }

    #[test]
    fn text_editing_ignores_choice_fields() {
        let mut form = CarForm::new(None);
        form.push_char(Field::LicensePlateNumber, 'A');
        form.push_char(Field::LicensePlateNumber, 'B');
        form.pop_char(Field::LicensePlateNumber);
        form.push_char(Field::Color, 'R');
        form.cycle(Field::Model, true);

        assert_eq!(form.car().license_plate_number, "A");
        assert_eq!(form.car().color, "");
        assert_eq!(form.car().model, "");
    }

    #[test]
    fn display_value_uses_placeholders() {
        let form = CarForm::new(None);
        assert_eq!(form.display_value(Field::Year), "Choose year...");
        assert_eq!(form.display_value(Field::Model), "");
        assert_eq!(form.display_value(Field::Active), "Yes");
    }
}
