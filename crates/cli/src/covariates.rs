use anyhow::{bail, Result};
use dump_protocol::{User, GENDER_FEMALE, GENDER_MALE, ZODIAC_FIELD};
use dump_store::Database;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

const TALL_CM: u32 = 183;

/// A yes/no property of a profile that bio words are correlated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Covariate {
    /// Location geocoded into the given country.
    Country(String),
    Gender(Gender),
    Under24,
    Over40,
    OverSixFoot,
    /// Profile lists a zodiac sign.
    Zodiac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn code(self) -> i32 {
        match self {
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }
}

/// Evaluated covariate, applied to each user of one correlation pass.
pub type Predicate = Box<dyn Fn(&User) -> bool>;

impl Covariate {
    /// Everything the `correlations` command reports when none is chosen.
    pub fn presets() -> Vec<Covariate> {
        vec![
            Self::Country("us".to_string()),
            Self::Gender(Gender::Male),
            Self::Gender(Gender::Female),
            Self::Under24,
            Self::Over40,
            Self::OverSixFoot,
            Self::Zodiac,
        ]
    }

    pub fn heading(&self) -> String {
        match self {
            Self::Country(code) => format!("Country = {code} correlations:"),
            Self::Gender(Gender::Male) => "Gender = Male correlations:".to_string(),
            Self::Gender(Gender::Female) => "Gender = Female correlations:".to_string(),
            Self::Under24 => "Age < 24 correlations:".to_string(),
            Self::Over40 => "Age >= 40 correlations:".to_string(),
            Self::OverSixFoot => "Height > 6ft correlations:".to_string(),
            Self::Zodiac => "Zodiac sign correlations:".to_string(),
        }
    }

    /// Build the profile test. Country lookups read the stored locations.
    pub fn predicate(&self, db: &dyn Database) -> Result<Predicate> {
        Ok(match self {
            Self::Country(code) => {
                let mut names = HashSet::new();
                for location in db.all_locations() {
                    let location = location?;
                    if location.country_code.eq_ignore_ascii_case(code) {
                        names.insert(location.name);
                    }
                }
                if names.is_empty() {
                    log::warn!("No stored locations in country {code}; run find-locations first");
                }
                Box::new(move |user: &User| names.contains(user.location()))
            }
            Self::Gender(gender) => {
                let code = gender.code();
                Box::new(move |user: &User| user.gender == code)
            }
            Self::Under24 => Box::new(|user: &User| user.age < 24),
            Self::Over40 => Box::new(|user: &User| user.age >= 40),
            Self::OverSixFoot => {
                Box::new(|user: &User| user.height_cm().is_some_and(|cm| cm >= TALL_CM))
            }
            Self::Zodiac => Box::new(|user: &User| user.has_field(ZODIAC_FIELD)),
        })
    }
}

impl FromStr for Covariate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(code) = s.strip_prefix("country:") {
            if code.is_empty() {
                bail!("Missing country code in '{s}'");
            }
            return Ok(Self::Country(code.to_ascii_lowercase()));
        }
        Ok(match s {
            "gender:male" => Self::Gender(Gender::Male),
            "gender:female" => Self::Gender(Gender::Female),
            "under-24" => Self::Under24,
            "over-40" => Self::Over40,
            "over-six-foot" => Self::OverSixFoot,
            "zodiac" => Self::Zodiac,
            other => bail!(
                "Unknown covariate '{other}' (expected country:<code>, gender:male, \
                 gender:female, under-24, over-40, over-six-foot or zodiac)"
            ),
        })
    }
}

impl fmt::Display for Covariate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country(code) => write!(f, "country:{code}"),
            Self::Gender(Gender::Male) => f.write_str("gender:male"),
            Self::Gender(Gender::Female) => f.write_str("gender:female"),
            Self::Under24 => f.write_str("under-24"),
            Self::Over40 => f.write_str("over-40"),
            Self::OverSixFoot => f.write_str("over-six-foot"),
            Self::Zodiac => f.write_str("zodiac"),
        }
    }
}
