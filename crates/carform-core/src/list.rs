//! The car list owned by the caller of the dialog.

use crate::models::Car;
use std::cmp::Ordering;

/// A change to apply to the car list once the backend confirmed a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    /// A new car; the list is re-sorted afterwards.
    Added(Car),
    /// An existing car, matched by the identifier it had before editing.
    Replaced { original_id: String, car: Car },
}

impl ListChange {
    pub fn apply(self, cars: &mut Vec<Car>) {
        match self {
            ListChange::Added(car) => {
                cars.push(car);
                sort_by_plate(cars);
            }
            ListChange::Replaced { original_id, car } => {
                for existing in cars
                    .iter_mut()
                    .filter(|c| c.license_plate_number == original_id)
                {
                    *existing = car.clone();
                }
            }
        }
    }
}

fn sort_by_plate(cars: &mut [Car]) {
    cars.sort_by(|a, b| compare_plates(&a.license_plate_number, &b.license_plate_number));
}

/// Case-insensitive order; on a tie the lowercase spelling comes first.
fn compare_plates(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

/// Cars shown by the application, kept in license plate order on load.
#[derive(Debug, Clone, Default)]
pub struct CarList {
    cars: Vec<Car>,
}

impl CarList {
    pub fn new(mut cars: Vec<Car>) -> Self {
        sort_by_plate(&mut cars);
        Self { cars }
    }

    /// Replace the whole list.
    pub fn replace(&mut self, cars: Vec<Car>) {
        *self = Self::new(cars);
    }

    /// Apply an update computed from the previous list.
    pub fn apply(&mut self, change: ListChange) {
        tracing::debug!("Applying list change: {:?}", change);
        change.apply(&mut self.cars);
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn get(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    pub fn position(&self, license_plate_number: &str) -> Option<usize> {
        self.cars
            .iter()
            .position(|c| c.license_plate_number == license_plate_number)
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}
