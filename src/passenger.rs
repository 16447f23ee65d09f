//! Passenger attributes and their samplers
//!
//! A passenger is three independent draws: an age category from an
//! [`AgeTable`], a trip distance from the bucketed distance table, and a set
//! of add-ons from three independent flags. [`PassengerModel`] precomputes
//! the distributions once and is then shared by every simulated day.
//!
//! ## Distance buckets
//! Trip lengths are roughly bimodal on a log scale. They are approximated by
//! picking one of ten ranges, then drawing uniformly inside it:
//!
//! | Range        | Probability |
//! |--------------|-------------|
//! | 45-99        | 0.059       |
//! | 100-199      | 0.899       |
//! | 200-299      | 0.0005      |
//! | 300-399      | 0.013       |
//! | 400-499      | 0.0005      |
//! | 500-599      | 0.002       |
//! | 600-699      | 0.008       |
//! | 700-799      | 0.003       |
//! | 805          | 0.014       |
//! | 806-2200     | 0.001       |

use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FareError, Result};
use crate::sampling::{Categorical, Flag};

pub const MIN_DISTANCE: u32 = 45;
pub const MAX_DISTANCE: u32 = 2200;

/// (low, high, probability); low == high means no second draw.
pub const DISTANCE_BUCKETS: [(u32, u32, f64); 10] = [
    (MIN_DISTANCE, 99, 0.059),
    (100, 199, 0.899),
    (200, 299, 0.0005),
    (300, 399, 0.013),
    (400, 499, 0.0005),
    (500, 599, 0.002),
    (600, 699, 0.008),
    (700, 799, 0.003),
    (805, 805, 0.014),
    (806, MAX_DISTANCE, 0.001),
];

pub const PET_PROBABILITY: f64 = 0.05;
pub const BIKE_PROBABILITY: f64 = 0.10;
pub const GOLF_PROBABILITY: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeCategory {
    Child,
    Adult,
    Senior,
}

impl AgeCategory {
    pub fn all() -> Vec<Self> {
        vec![Self::Child, Self::Adult, Self::Senior]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgeCategory {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "child" => Ok(Self::Child),
            "adult" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            other => Err(FareError::InvalidCategory(other.to_string())),
        }
    }
}

/// Probability of each age category for a single passenger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgeTable {
    pub child: f64,
    pub adult: f64,
    pub senior: f64,
}

impl AgeTable {
    /// Adults dominate: child 15%, adult 72.6%, senior 12.4%.
    pub const ADULT_MAJORITY: Self = Self {
        child: 0.15,
        adult: 0.726,
        senior: 0.124,
    };

    /// Seniors dominate: child 12.4%, adult 15%, senior 72.6%.
    pub const SENIOR_MAJORITY: Self = Self {
        child: 0.124,
        adult: 0.15,
        senior: 0.726,
    };

    pub fn weight(&self, category: AgeCategory) -> f64 {
        match category {
            AgeCategory::Child => self.child,
            AgeCategory::Adult => self.adult,
            AgeCategory::Senior => self.senior,
        }
    }
}

/// Named age tables. There is no default preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePreset {
    AdultMajority,
    SeniorMajority,
}

impl AgePreset {
    pub fn all() -> Vec<Self> {
        vec![Self::AdultMajority, Self::SeniorMajority]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AdultMajority => "Adult majority (15/72.6/12.4)",
            Self::SeniorMajority => "Senior majority (12.4/15/72.6)",
        }
    }

    pub fn table(&self) -> AgeTable {
        match self {
            Self::AdultMajority => AgeTable::ADULT_MAJORITY,
            Self::SeniorMajority => AgeTable::SENIOR_MAJORITY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AddOn {
    Pet,
    Bike,
    Golf,
}

impl AddOn {
    pub fn all() -> Vec<Self> {
        vec![Self::Pet, Self::Bike, Self::Golf]
    }

    fn bit(self) -> u8 {
        match self {
            Self::Pet => 0b001,
            Self::Bike => 0b010,
            Self::Golf => 0b100,
        }
    }
}

/// Subset of {pet, bike, golf}. Each add-on is present at most once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AddOnSet {
    bits: u8,
}

impl AddOnSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, add_on: AddOn) {
        self.bits |= add_on.bit();
    }

    pub fn contains(&self, add_on: AddOn) -> bool {
        self.bits & add_on.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = AddOn> + '_ {
        AddOn::all().into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<AddOn> for AddOnSet {
    fn from_iter<I: IntoIterator<Item = AddOn>>(iter: I) -> Self {
        let mut set = Self::empty();
        for add_on in iter {
            set.insert(add_on);
        }
        set
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Passenger {
    pub age: AgeCategory,
    pub distance_miles: u32,
    pub add_ons: AddOnSet,
}

impl Passenger {
    pub fn new(age: AgeCategory, distance_miles: u32, add_ons: AddOnSet) -> Self {
        Self {
            age,
            distance_miles,
            add_ons,
        }
    }
}

/// Precomputed attribute distributions for one scenario.
#[derive(Clone, Debug)]
pub struct PassengerModel {
    age: Categorical<AgeCategory>,
    bucket: Categorical<usize>,
    add_ons: [(AddOn, Flag); 3],
}

impl PassengerModel {
    pub fn new(age_table: AgeTable) -> Result<Self> {
        let age = Categorical::new(
            AgeCategory::all()
                .into_iter()
                .map(|c| (c, age_table.weight(c))),
        )?;

        let bucket = Categorical::new(
            DISTANCE_BUCKETS
                .iter()
                .enumerate()
                .map(|(i, &(_, _, p))| (i, p)),
        )?;

        let add_ons = [
            (AddOn::Pet, Flag::new(PET_PROBABILITY)?),
            (AddOn::Bike, Flag::new(BIKE_PROBABILITY)?),
            (AddOn::Golf, Flag::new(GOLF_PROBABILITY)?),
        ];

        Ok(Self {
            age,
            bucket,
            add_ons,
        })
    }

    pub fn sample_age_category<R: Rng + ?Sized>(&self, rng: &mut R) -> AgeCategory {
        self.age.sample(rng)
    }

    /// Index into [`DISTANCE_BUCKETS`].
    pub fn sample_distance_bucket<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.bucket.sample(rng)
    }

    pub fn sample_distance<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (low, high, _) = DISTANCE_BUCKETS[self.sample_distance_bucket(rng)];
        if low == high {
            return low;
        }
        Uniform::new_inclusive(low, high).sample(rng)
    }

    pub fn sample_add_ons<R: Rng + ?Sized>(&self, rng: &mut R) -> AddOnSet {
        let mut set = AddOnSet::empty();
        for (add_on, flag) in &self.add_ons {
            if flag.sample(rng) {
                set.insert(*add_on);
            }
        }
        set
    }

    pub fn sample_passenger<R: Rng + ?Sized>(&self, rng: &mut R) -> Passenger {
        let age = self.sample_age_category(rng);
        let distance = self.sample_distance(rng);
        let add_ons = self.sample_add_ons(rng);
        Passenger::new(age, distance, add_ons)
    }
}

impl Distribution<Passenger> for PassengerModel {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Passenger {
        self.sample_passenger(rng)
    }
}
