//! Height/weight parsing and size recommendation.
//!
//! A turn is treated as a measurement message only when the detector fires;
//! parsing then pulls out height (cm, meters, feet-inches) and weight
//! (kg, lb) independently, so users can answer across multiple turns.

use once_cell::sync::Lazy;
use regex::Regex;

/// Pounds per kilogram conversion factor.
const LB_TO_KG: f32 = 0.45359237;
/// Centimeters per inch.
const CM_PER_INCH: f32 = 2.54;

/// Sizes in ascending order; recommendation distance is index distance here.
pub const SIZE_ORDER: &[&str] = &["XS", "S", "M", "L", "XL", "XXL"];

static UNIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(cm|kg|lb|lbs|kgs|kilogram|kilograms|pound|pounds)").unwrap());
static FEET_LOOKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b\d\s*(?:ft|')\s*\d{0,2}\s*(?:in|")?"#).unwrap());
static CM_LOOKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{2,3}\s*cm\b").unwrap());
static METERS_LOOKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d(?:\.\d{1,2})?\s*m\b").unwrap());

static HEIGHT_CM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{2,3})\s*cm\b").unwrap());
static HEIGHT_M_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d(?:\.\d{1,2})?)\s*m\b").unwrap());
static HEIGHT_FEET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(\d)\s*(?:ft|')\s*(\d{1,2})?\s*(?:in|")?"#).unwrap());
static WEIGHT_KG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{2,3}(?:\.\d{1,2})?)\s*(?:kg|kgs|kilogram|kilograms)\b").unwrap()
});
static WEIGHT_LB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{2,3}(?:\.\d{1,2})?)\s*(?:lb|lbs|pound|pounds)\b").unwrap()
});

/// Collapse separators and bracketing so the measurement regexes see
/// space-delimited tokens.
pub fn clean_measurement_text(text: &str) -> String {
    let mut t = text.to_lowercase();
    for ch in [',', ';', '|', '(', ')', '[', ']', '{', '}'] {
        t = t.replace(ch, " ");
    }
    t.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Heuristic: does this turn look like a measurement message at all?
pub fn looks_like_measurements(text: &str) -> bool {
    let t = text.to_lowercase();
    UNIT_RE.is_match(&t)
        || FEET_LOOKS_RE.is_match(&t)
        || CM_LOOKS_RE.is_match(&t)
        || METERS_LOOKS_RE.is_match(&t)
}

/// Height in centimeters: `177cm`, `1.77m` (within the plausible human
/// range) or `5'11` / `5 ft 11 in`.
pub fn parse_height_cm(text: &str) -> Option<f32> {
    let t = clean_measurement_text(text);

    if let Some(c) = HEIGHT_CM_RE.captures(&t) {
        return c[1].parse::<f32>().ok();
    }

    if let Some(c) = HEIGHT_M_RE.captures(&t) {
        if let Ok(meters) = c[1].parse::<f32>() {
            if (1.2..=2.3).contains(&meters) {
                return Some(meters * 100.0);
            }
        }
    }

    if let Some(c) = HEIGHT_FEET_RE.captures(&t) {
        let feet: f32 = c[1].parse().ok()?;
        let inches: f32 = c
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);
        return Some((feet * 12.0 + inches) * CM_PER_INCH);
    }

    None
}

/// Weight in kilograms: `77kg` or `165lb` (converted).
pub fn parse_weight_kg(text: &str) -> Option<f32> {
    let t = clean_measurement_text(text);

    if let Some(c) = WEIGHT_KG_RE.captures(&t) {
        return c[1].parse::<f32>().ok();
    }

    if let Some(c) = WEIGHT_LB_RE.captures(&t) {
        return c[1].parse::<f32>().ok().map(|lb| lb * LB_TO_KG);
    }

    None
}

/// BMI-banded size, snapped to the closest available size by index distance
/// in [`SIZE_ORDER`]. Sizes outside the fixed order carry a large penalty.
pub fn recommend_size(height_cm: f32, weight_kg: f32, available: &[String]) -> String {
    let h_m = height_cm / 100.0;
    let bmi = weight_kg / (h_m * h_m);

    let size = if bmi < 20.0 {
        "S"
    } else if bmi < 24.0 {
        "M"
    } else if bmi < 28.0 {
        "L"
    } else {
        "XL"
    };

    let upper: Vec<String> = available.iter().map(|s| s.to_uppercase()).collect();
    if upper.iter().any(|s| s == size) {
        return size.to_string();
    }

    if !upper.is_empty() {
        let target = SIZE_ORDER.iter().position(|s| *s == size).unwrap_or(2);
        return upper
            .iter()
            .min_by_key(|s| {
                SIZE_ORDER
                    .iter()
                    .position(|o| *o == s.as_str())
                    .map(|i| i.abs_diff(target))
                    .unwrap_or(999)
            })
            .cloned()
            .unwrap_or_else(|| size.to_string());
    }

    size.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detector() {
        assert!(looks_like_measurements("177cm 77kg"));
        assert!(looks_like_measurements("5'11 165lb"));
        assert!(looks_like_measurements("about 1.8 m"));
        assert!(!looks_like_measurements("show me jackets"));
    }

    #[test]
    fn test_parse_height_variants() {
        assert_eq!(parse_height_cm("im 177cm"), Some(177.0));
        assert_eq!(parse_height_cm("1.77m tall"), Some(177.0));
        let feet = parse_height_cm("5'11").unwrap();
        assert!((feet - 180.34).abs() < 0.01);
        // Implausible meter values are rejected.
        assert_eq!(parse_height_cm("3.5m"), None);
    }

    #[test]
    fn test_parse_weight_variants() {
        assert_eq!(parse_weight_kg("77kg"), Some(77.0));
        let lb = parse_weight_kg("165 lbs").unwrap();
        assert!((lb - 74.84).abs() < 0.01);
        assert_eq!(parse_weight_kg("tall"), None);
    }

    #[test]
    fn test_recommend_size_bands() {
        // BMI ≈ 30.9 → XL.
        assert_eq!(
            recommend_size(180.0, 100.0, &sizes(&["S", "M", "L", "XL"])),
            "XL"
        );
        // BMI ≈ 21.6 → M.
        assert_eq!(
            recommend_size(185.0, 74.0, &sizes(&["S", "M", "L"])),
            "M"
        );
    }

    #[test]
    fn test_recommend_size_snaps_to_closest_available() {
        // XL wanted but only S/M/L stocked → L (index distance 1).
        assert_eq!(
            recommend_size(180.0, 100.0, &sizes(&["S", "M", "L"])),
            "L"
        );
        // Unknown size labels are deprioritized.
        assert_eq!(
            recommend_size(180.0, 100.0, &sizes(&["ONESIZE", "L"])),
            "L"
        );
    }

    #[test]
    fn test_recommend_size_with_no_availability_returns_band() {
        assert_eq!(recommend_size(180.0, 100.0, &[]), "XL");
    }
}
