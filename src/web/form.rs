// src/web/form.rs
//! Field-by-field decoding of the submitted form. A field that does not
//! parse keeps its widget default and is reported, the rest are kept so the
//! form can be shown again as the user filled it.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use url::form_urlencoded;

use crate::models::RawInput;

pub const FIELDS: [&str; 13] = [
    "age",
    "time_in_hospital",
    "num_lab_procedures",
    "num_procedures",
    "num_diagnoses",
    "num_medications",
    "emergency",
    "insulin",
    "diabetes_med",
    "a1c_result",
    "glucose_serum",
    "gender",
    "admission_type",
];

fn set_parsed<T>(slot: &mut T, raw: &str) -> Result<(), String>
where
    T: FromStr,
    T::Err: Display,
{
    *slot = raw.parse::<T>().map_err(|e| e.to_string())?;
    Ok(())
}

/// Choice fields go through their serde names so aliases are honored.
fn set_choice<T: DeserializeOwned>(slot: &mut T, raw: &str) -> Result<(), String> {
    *slot = serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|e| e.to_string())?;
    Ok(())
}

pub fn decode_form(body: &[u8]) -> (RawInput, Vec<String>) {
    let mut input = RawInput::default();
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (key, value) in form_urlencoded::parse(body) {
        let raw = value.trim();
        let applied = match &*key {
            "age" => set_parsed(&mut input.age, raw),
            "time_in_hospital" => set_parsed(&mut input.time_in_hospital, raw),
            "num_lab_procedures" => set_parsed(&mut input.num_lab_procedures, raw),
            "num_procedures" => set_parsed(&mut input.num_procedures, raw),
            "num_diagnoses" => set_parsed(&mut input.num_diagnoses, raw),
            "num_medications" => set_parsed(&mut input.num_medications, raw),
            "emergency" => set_parsed(&mut input.emergency, raw),
            "diabetes_med" => set_parsed(&mut input.diabetes_med, raw),
            "insulin" => set_choice(&mut input.insulin, raw),
            "a1c_result" => set_choice(&mut input.a1c_result, raw),
            "glucose_serum" => set_choice(&mut input.glucose_serum, raw),
            "gender" => set_choice(&mut input.gender, raw),
            "admission_type" => set_choice(&mut input.admission_type, raw),
            _ => continue,
        };
        if let Err(e) = applied {
            problems.push(format!("{}: '{}' is not accepted ({})", key, raw, e));
        }
        seen.insert(key.into_owned());
    }

    for field in FIELDS {
        if !seen.contains(field) {
            problems.push(format!("{}: missing", field));
        }
    }
    (input, problems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{A1cResult, AgeBracket, Gender, InsulinUsage};

    fn encode(pairs: &[(&str, &str)]) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }

    fn full_submission() -> Vec<(&'static str, &'static str)> {
        vec![
            ("age", "8"),
            ("time_in_hospital", "10"),
            ("num_lab_procedures", "90"),
            ("num_procedures", "2"),
            ("num_diagnoses", "9"),
            ("num_medications", "40"),
            ("emergency", "true"),
            ("insulin", "Steady"),
            ("diabetes_med", "true"),
            ("a1c_result", ">8"),
            ("glucose_serum", "None"),
            ("gender", "Kadın"),
            ("admission_type", "Acil"),
        ]
    }

    #[test]
    fn test_full_submission_decodes_cleanly() {
        let (input, problems) = decode_form(encode(&full_submission()).as_bytes());
        assert!(problems.is_empty(), "{:?}", problems);
        assert_eq!(input.age, AgeBracket::from_code(8).unwrap());
        assert_eq!(input.num_medications, 40);
        assert!(input.emergency);
        assert_eq!(input.insulin, InsulinUsage::Steady);
        assert_eq!(input.a1c_result, A1cResult::Above8);
        assert_eq!(input.gender, Gender::Female);
    }

    #[test]
    fn test_bad_field_keeps_the_rest_of_the_submission() {
        let mut pairs = full_submission();
        pairs[5] = ("num_medications", "forty");
        let (input, problems) = decode_form(encode(&pairs).as_bytes());

        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("num_medications: 'forty'"));
        assert_eq!(input.num_medications, RawInput::default().num_medications);
        assert_eq!(input.time_in_hospital, 10);
        assert_eq!(input.gender, Gender::Female);
        assert_eq!(input.a1c_result, A1cResult::Above8);
    }

    #[test]
    fn test_missing_and_unknown_choices_are_reported() {
        let mut pairs = full_submission();
        pairs.retain(|(k, _)| *k != "num_lab_procedures");
        pairs[6] = ("insulin", "Sometimes");
        let (_, problems) = decode_form(encode(&pairs).as_bytes());

        assert!(problems.iter().any(|p| p.starts_with("insulin: 'Sometimes'")));
        assert!(problems.contains(&"num_lab_procedures: missing".to_string()));
    }
}
