//! Random fake values used to fill simulated responses.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

const CAR_TYPES: &[&str] = &[
    "Passenger car compact",
    "Passenger car mini",
    "Passenger car medium",
    "Passenger car heavy",
    "Sport utility vehicle",
    "Pickup truck",
    "Van",
];

const CAR_FUEL_TYPES: &[&str] = &[
    "Gasoline",
    "Diesel",
    "Electric",
    "Hybrid",
    "Ethanol",
    "CNG",
    "LPG",
];

const CAR_TRANSMISSION_TYPES: &[&str] = &["Manual", "Automatic"];

const CAR_MAKERS: &[(&str, &[&str])] = &[
    ("Toyota", &["Corolla", "Camry", "RAV4", "Prius", "Tacoma"]),
    ("Ford", &["Focus", "Mustang", "F-150", "Explorer", "Transit"]),
    ("Volkswagen", &["Golf", "Passat", "Tiguan", "Polo", "ID.4"]),
    ("Honda", &["Civic", "Accord", "CR-V", "Fit", "Odyssey"]),
    ("BMW", &["3 Series", "5 Series", "X3", "X5", "i4"]),
    ("Tesla", &["Model 3", "Model S", "Model X", "Model Y"]),
    ("Volvo", &["XC60", "XC90", "S60", "V70"]),
    ("Hyundai", &["Elantra", "Sonata", "Tucson", "Kona"]),
];

const CAR_YEARS: std::ops::RangeInclusive<u16> = 1990..=2025;

/// A randomly generated vehicle description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub car_type: &'static str,
    pub fuel: &'static str,
    pub transmission: &'static str,
    pub brand: &'static str,
    pub model: &'static str,
    pub year: u16,
}

impl Car {
    pub fn fake<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (brand, models) = pick(rng, CAR_MAKERS);
        Car {
            car_type: pick(rng, CAR_TYPES),
            fuel: pick(rng, CAR_FUEL_TYPES),
            transmission: pick(rng, CAR_TRANSMISSION_TYPES),
            brand,
            model: pick(rng, models),
            year: rng.gen_range(CAR_YEARS),
        }
    }
}

/// Renders as `[YEAR] MODEL-TYPE-BRAND-FUEL-TRANSMISSION`.
impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}-{}-{}-{}-{}",
            self.year, self.model, self.car_type, self.brand, self.fuel, self.transmission
        )
    }
}

// The tables above are non-empty constants
fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, items: &[T]) -> T {
    *items.choose(rng).unwrap_or(&items[0])
}
