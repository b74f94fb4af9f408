use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ProfileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    #[serde(rename = "Athletic Performance")]
    AthleticPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Gym,
    Home,
    Outdoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    #[serde(rename = "Non-Veg")]
    NonVeg,
    Veg,
    Vegan,
    Keto,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Goal {
    pub fn label(self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::AthleticPerformance => "Athletic Performance",
        }
    }
}

impl Location {
    pub fn label(self) -> &'static str {
        match self {
            Location::Gym => "Gym",
            Location::Home => "Home",
            Location::Outdoor => "Outdoor",
        }
    }
}

impl Diet {
    pub fn label(self) -> &'static str {
        match self {
            Diet::NonVeg => "Non-Veg",
            Diet::Veg => "Veg",
            Diet::Vegan => "Vegan",
            Diet::Keto => "Keto",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(Gender, Goal, Location, Diet);

/// Biometrics and preferences submitted by the form.
///
/// Numeric fields accept JSON numbers or numeric strings, since HTML number
/// inputs are posted as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub age: u32,
    pub gender: Gender,
    #[serde(deserialize_with = "lenient_number")]
    pub weight: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub height: f64,
    pub goal: Goal,
    pub location: Location,
    pub diet: Diet,
}

impl ProfileInput {
    /// Check the field ranges the form requires. Every problem is reported,
    /// not just the first.
    pub fn validate(&self) -> Result<(), Vec<ProfileError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ProfileError::EmptyName);
        }
        if self.age == 0 {
            errors.push(ProfileError::NonPositiveAge);
        }
        for (field, value) in [("weight", self.weight), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ProfileError::NonPositive { field, value });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrText::<T>::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}"))),
    }
}
