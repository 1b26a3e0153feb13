use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Build classification derived from wrist circumference. The wrist bands
/// partition the whole range per gender, with the boundary values falling
/// into the middle band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Somatotype {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

/// Ideal body weight in kilograms: height scaled by a factor picked from the
/// gender-specific wrist band.
pub fn ideal_weight(gender: Gender, height_cm: f64, wrist_cm: f64) -> f64 {
    let factor = match gender {
        Gender::Male => {
            if wrist_cm < 18.0 {
                0.375
            } else if wrist_cm <= 20.0 {
                0.39
            } else {
                0.41
            }
        }
        Gender::Female => {
            if wrist_cm < 16.0 {
                0.325
            } else if wrist_cm <= 17.0 {
                0.34
            } else {
                0.355
            }
        }
    };
    height_cm * factor
}

pub fn somatotype(gender: Gender, wrist_cm: f64) -> Somatotype {
    match gender {
        Gender::Male => {
            if wrist_cm < 18.0 {
                Somatotype::Ectomorph
            } else if wrist_cm <= 20.0 {
                Somatotype::Mesomorph
            } else {
                Somatotype::Endomorph
            }
        }
        Gender::Female => {
            if wrist_cm < 16.0 {
                Somatotype::Ectomorph
            } else if wrist_cm <= 17.0 {
                Somatotype::Mesomorph
            } else {
                Somatotype::Endomorph
            }
        }
    }
}

/// Body mass index from measured weight, rounded to one decimal place.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round1(weight_kg / (height_m * height_m))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_wrist_bands_are_inclusive_in_the_middle() {
        assert_eq!(ideal_weight(Gender::Male, 175.0, 17.9), 175.0 * 0.375);
        assert_eq!(ideal_weight(Gender::Male, 175.0, 18.0), 175.0 * 0.39);
        assert_eq!(ideal_weight(Gender::Male, 175.0, 20.0), 175.0 * 0.39);
        assert_eq!(ideal_weight(Gender::Male, 175.0, 20.1), 175.0 * 0.41);
    }

    #[test]
    fn female_wrist_bands_are_inclusive_in_the_middle() {
        assert_eq!(ideal_weight(Gender::Female, 165.0, 15.9), 165.0 * 0.325);
        assert_eq!(ideal_weight(Gender::Female, 165.0, 16.0), 165.0 * 0.34);
        assert_eq!(ideal_weight(Gender::Female, 165.0, 17.0), 165.0 * 0.34);
        assert_eq!(ideal_weight(Gender::Female, 165.0, 17.1), 165.0 * 0.355);
    }

    #[test]
    fn somatotype_follows_the_same_bands() {
        assert_eq!(somatotype(Gender::Male, 16.0), Somatotype::Ectomorph);
        assert_eq!(somatotype(Gender::Male, 19.0), Somatotype::Mesomorph);
        assert_eq!(somatotype(Gender::Male, 21.0), Somatotype::Endomorph);
        assert_eq!(somatotype(Gender::Female, 15.0), Somatotype::Ectomorph);
        assert_eq!(somatotype(Gender::Female, 16.5), Somatotype::Mesomorph);
        assert_eq!(somatotype(Gender::Female, 18.0), Somatotype::Endomorph);
    }

    #[test]
    fn every_wrist_value_lands_in_exactly_one_band() {
        // Sweep across the whole plausible wrist range, including the band
        // boundaries, for both genders.
        for gender in [Gender::Male, Gender::Female] {
            let mut wrist = 10.0;
            while wrist <= 30.0 {
                let factor = ideal_weight(gender, 100.0, wrist) / 100.0;
                let expected = match (gender, somatotype(gender, wrist)) {
                    (Gender::Male, Somatotype::Ectomorph) => 0.375,
                    (Gender::Male, Somatotype::Mesomorph) => 0.39,
                    (Gender::Male, Somatotype::Endomorph) => 0.41,
                    (Gender::Female, Somatotype::Ectomorph) => 0.325,
                    (Gender::Female, Somatotype::Mesomorph) => 0.34,
                    (Gender::Female, Somatotype::Endomorph) => 0.355,
                };
                assert!(
                    (factor - expected).abs() < 1e-9,
                    "factor/somatotype disagree at {gender:?} wrist {wrist}"
                );
                wrist += 0.05;
            }
        }
    }

    #[test]
    fn bmi_rounds_to_one_decimal() {
        assert_eq!(bmi(80.0, 175.0), 26.1);
        assert_eq!(bmi(80.0, 165.0), 29.4);
    }

    #[test]
    fn gender_round_trips_through_storage_form() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
        assert_eq!(Gender::parse(Gender::Male.as_str()), Some(Gender::Male));
    }
}
