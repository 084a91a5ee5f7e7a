use std::ops::RangeInclusive;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named range preset bounding the hidden target
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Display order of the level picker
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn bounds(self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (5, 20),
            Difficulty::Medium => (10, 35),
            Difficulty::Hard => (20, 50),
        }
    }

    pub fn range(self) -> RangeInclusive<u32> {
        let (min, max) = self.bounds();
        min..=max
    }

    /// Uniform draw from the inclusive range
    pub fn draw_target<R: Rng + ?Sized>(self, rng: &mut R) -> u32 {
        rng.gen_range(self.range())
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}
