use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::concern::{join_names, Concern};

/// Ages the wizard accepts from the user.
pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;

/// Age value meaning the user did not disclose it.
pub const AGE_UNDISCLOSED: u32 = 0;

/// An age is acceptable on the API when it is undisclosed or within [`AGE_RANGE`].
pub fn is_acceptable_age(age: u32) -> bool {
    age == AGE_UNDISCLOSED || AGE_RANGE.contains(&age)
}

/// The user's picks for one wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    concerns: BTreeSet<Concern>,
    age: u32,
}

impl Selection {
    pub fn new<I>(concerns: I, age: u32) -> Self
    where
        I: IntoIterator<Item = Concern>,
    {
        Self {
            concerns: concerns.into_iter().collect(),
            age,
        }
    }

    /// Adds the concern if absent, removes it otherwise.
    pub fn toggle(&mut self, concern: Concern) {
        if !self.concerns.remove(&concern) {
            self.concerns.insert(concern);
        }
    }

    pub fn contains(&self, concern: Concern) -> bool {
        self.concerns.contains(&concern)
    }

    /// Concerns in catalog order.
    pub fn concerns(&self) -> impl Iterator<Item = Concern> + '_ {
        self.concerns.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.concerns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concerns.is_empty()
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    pub fn age_disclosed(&self) -> bool {
        self.age != AGE_UNDISCLOSED
    }

    pub fn names(&self, sep: &str) -> String {
        join_names(self.concerns(), sep)
    }

    pub fn clear(&mut self) {
        self.concerns.clear();
        self.age = AGE_UNDISCLOSED;
    }
}
