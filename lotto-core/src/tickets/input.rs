//! Parse-and-validate boundary between loosely typed request payloads and the
//! services. Nothing past this module sees unvalidated numbers.

use crate::error::{LottoError, Result};
use crate::lottery::config::{DrawValidation, NumberRules};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::HashSet;
use std::fmt;

/// Numbers as they arrive from a form field, a JSON body or a command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumbers {
    /// `"1,2,3"`, `"1 2 3"` or a JSON array literal `"[1,2,3]"`
    Text(String),
    Json(Value),
}

impl RawNumbers {
    /// Flatten into a sequence of entries. `None` when the payload is not a
    /// sequence at all.
    fn to_sequence(&self) -> Option<Vec<Entry>> {
        match self {
            RawNumbers::Text(text) => parse_text(text),
            RawNumbers::Json(value) => parse_json(value),
        }
    }
}

/// One element of a numbers payload. Integers are kept exact; anything that
/// cannot be held as an `i64` without loss is never rounded into one.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Integer(i64),
    /// A number with a non-zero fractional part
    Fraction(String),
    /// A whole number outside the `i64` range, or a float too large to be exact
    Oversized(String),
    NotANumber,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Integer(n) => write!(f, "{}", n),
            Entry::Fraction(text) | Entry::Oversized(text) => f.write_str(text),
            Entry::NotANumber => f.write_str("(not a number)"),
        }
    }
}

// 2^53: beyond this an f64 no longer holds every integer
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn parse_text(text: &str) -> Option<Vec<Entry>> {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed).ok()?;
        return parse_json(&value);
    }

    Some(
        trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(parse_token)
            .collect(),
    )
}

fn parse_json(value: &Value) -> Option<Vec<Entry>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => number_entry(n),
                    Value::String(s) => parse_token(s.trim()),
                    _ => Entry::NotANumber,
                })
                .collect(),
        ),
        Value::String(text) => parse_text(text),
        _ => None,
    }
}

fn number_entry(n: &Number) -> Entry {
    if let Some(v) = n.as_i64() {
        return Entry::Integer(v);
    }
    if n.is_u64() {
        return Entry::Oversized(n.to_string());
    }

    match n.as_f64() {
        Some(v) if v.fract() != 0.0 => Entry::Fraction(n.to_string()),
        Some(v) if v.abs() < MAX_EXACT_FLOAT => Entry::Integer(v as i64),
        _ => Entry::Oversized(n.to_string()),
    }
}

/// Plain decimal notation only: an optional `-`, digits, and an optional
/// `.digits` part. Exponents, a leading `+`, `inf` and `NaN` are not numbers.
fn parse_token(token: &str) -> Entry {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || fraction.is_some_and(|f| !all_digits(f)) {
        return Entry::NotANumber;
    }

    if fraction.is_some_and(|f| f.bytes().any(|b| b != b'0')) {
        return Entry::Fraction(token.to_string());
    }

    let integral = &token[..token.len() - fraction.map_or(0, |f| f.len() + 1)];
    match integral.parse::<i64>() {
        Ok(n) => Entry::Integer(n),
        // only digits remain, so the one failure left is overflow
        Err(_) => Entry::Oversized(token.to_string()),
    }
}

impl From<&str> for RawNumbers {
    fn from(text: &str) -> Self {
        RawNumbers::Text(text.to_string())
    }
}

impl From<String> for RawNumbers {
    fn from(text: String) -> Self {
        RawNumbers::Text(text)
    }
}

impl From<Value> for RawNumbers {
    fn from(value: Value) -> Self {
        RawNumbers::Json(value)
    }
}

impl<const N: usize> From<[i64; N]> for RawNumbers {
    fn from(numbers: [i64; N]) -> Self {
        RawNumbers::Json(Value::from(numbers.to_vec()))
    }
}

impl From<Vec<i64>> for RawNumbers {
    fn from(numbers: Vec<i64>) -> Self {
        RawNumbers::Json(Value::from(numbers))
    }
}

/// Unvalidated ticket submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRequest {
    pub personal_id: String,
    pub numbers: RawNumbers,
}

impl TicketRequest {
    pub fn new(personal_id: impl Into<String>, numbers: impl Into<RawNumbers>) -> Self {
        Self {
            personal_id: personal_id.into(),
            numbers: numbers.into(),
        }
    }

    /// Checks run in order and the first failure wins: personal id, count,
    /// range, duplicates.
    pub fn validate(&self, rules: &NumberRules) -> Result<ValidatedTicketInput> {
        validate_personal_id(&self.personal_id, rules)?;

        let entries = self
            .numbers
            .to_sequence()
            .filter(|seq| !seq.contains(&Entry::NotANumber))
            .ok_or_else(|| LottoError::invalid_count("numbers must be a list of integers"))?;

        let numbers = check_numbers(&entries, rules)?;

        Ok(ValidatedTicketInput {
            personal_id: self.personal_id.clone(),
            numbers,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTicketInput {
    personal_id: String,
    numbers: Vec<u8>,
}

impl ValidatedTicketInput {
    pub fn personal_id(&self) -> &str {
        &self.personal_id
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDrawInput {
    numbers: Vec<i64>,
}

impl ValidatedDrawInput {
    pub fn parse(raw: &RawNumbers, policy: DrawValidation, rules: &NumberRules) -> Result<Self> {
        let entries = raw
            .to_sequence()
            .ok_or_else(|| LottoError::invalid_draw_numbers("numbers must be a list"))?;

        if entries.is_empty() {
            return Err(LottoError::invalid_draw_numbers("no numbers given"));
        }

        if entries.contains(&Entry::NotANumber) {
            return Err(LottoError::invalid_draw_numbers("every entry must be a number"));
        }

        let numbers = match policy {
            DrawValidation::ShapeOnly => entries
                .iter()
                .map(|entry| match entry {
                    Entry::Integer(n) => Ok(*n),
                    other => Err(LottoError::invalid_draw_numbers(format!(
                        "{} is not a 64-bit integer",
                        other
                    ))),
                })
                .collect::<Result<Vec<i64>>>()?,
            DrawValidation::TicketRules => check_numbers(&entries, rules)?
                .into_iter()
                .map(i64::from)
                .collect(),
        };

        Ok(Self { numbers })
    }

    pub fn into_numbers(self) -> Vec<i64> {
        self.numbers
    }
}

fn validate_personal_id(personal_id: &str, rules: &NumberRules) -> Result<()> {
    if personal_id.is_empty() {
        return Err(LottoError::invalid_personal_id("must not be empty"));
    }

    if personal_id.chars().count() > rules.max_personal_id_len {
        return Err(LottoError::invalid_personal_id(format!(
            "must be at most {} characters",
            rules.max_personal_id_len
        )));
    }

    if !personal_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LottoError::invalid_personal_id(
            "only letters A-Z, a-z and digits 0-9 are allowed",
        ));
    }

    Ok(())
}

/// Count, range and distinctness, in that order
fn check_numbers(entries: &[Entry], rules: &NumberRules) -> Result<Vec<u8>> {
    if entries.len() < rules.min_count || entries.len() > rules.max_count {
        return Err(LottoError::invalid_count(format!(
            "expected {} to {} numbers, got {}",
            rules.min_count,
            rules.max_count,
            entries.len()
        )));
    }

    let mut numbers = Vec::with_capacity(entries.len());
    for entry in entries {
        let number = match entry {
            Entry::Integer(n) => u8::try_from(*n)
                .ok()
                .filter(|n| (rules.min_number..=rules.max_number).contains(n)),
            _ => None,
        };
        let Some(number) = number else {
            return Err(LottoError::invalid_range(format!(
                "{} is not a whole number between {} and {}",
                entry, rules.min_number, rules.max_number
            )));
        };
        numbers.push(number);
    }

    let mut seen = HashSet::with_capacity(numbers.len());
    if let Some(dup) = numbers.iter().find(|n| !seen.insert(**n)) {
        return Err(LottoError::duplicate_numbers(format!(
            "{} appears more than once",
            dup
        )));
    }

    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> NumberRules {
        NumberRules::default()
    }

    #[test]
    fn test_accepts_text_and_json_forms() {
        let expected = vec![1u8, 2, 3, 4, 5, 6];
        for raw in [
            RawNumbers::from("1,2,3,4,5,6"),
            RawNumbers::from(" 1, 2 ,3 4  5,6 "),
            RawNumbers::from("[1,2,3,4,5,6]"),
            RawNumbers::from(json!([1, 2, "3", 4, 5.0, 6])),
        ] {
            let input = TicketRequest { personal_id: "abc123".into(), numbers: raw }
                .validate(&rules())
                .unwrap();
            assert_eq!(input.numbers(), expected.as_slice());
        }
    }

    #[test]
    fn test_keeps_submission_order() {
        let input = TicketRequest::new("P1", [45, 7, 3, 19, 1, 22])
            .validate(&rules())
            .unwrap();
        assert_eq!(input.numbers(), &[45, 7, 3, 19, 1, 22]);
    }

    #[test]
    fn test_personal_id_rules() {
        for bad in ["", "has space", "dash-ed", "ümlaut", "abcdefghijklmnopqrstu"] {
            let err = TicketRequest::new(bad, [1, 2, 3, 4, 5, 6])
                .validate(&rules())
                .unwrap_err();
            assert!(matches!(err, LottoError::InvalidPersonalId(_)), "{bad}");
        }

        assert!(TicketRequest::new("abcdefghijklmnopqrst", [1, 2, 3, 4, 5, 6])
            .validate(&rules())
            .is_ok());
    }

    #[test]
    fn test_count_bounds() {
        let err = TicketRequest::new("P1", [1, 2, 3, 4, 5]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidCount(_)));

        let err = TicketRequest::new("P1", [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])
            .validate(&rules())
            .unwrap_err();
        assert!(matches!(err, LottoError::InvalidCount(_)));

        assert!(TicketRequest::new("P1", [1, 2, 3, 4, 5, 6, 7, 8, 9, 10])
            .validate(&rules())
            .is_ok());
    }

    #[test]
    fn test_unparseable_numbers_count_as_invalid_count() {
        for raw in [
            RawNumbers::from("1,2,three,4,5,6"),
            RawNumbers::from(json!({"a": 1})),
            RawNumbers::from(json!([1, 2, 3, null, 5, 6])),
            RawNumbers::from("[1,2,"),
        ] {
            let err = TicketRequest { personal_id: "P1".into(), numbers: raw }
                .validate(&rules())
                .unwrap_err();
            assert!(matches!(err, LottoError::InvalidCount(_)));
        }
    }

    #[test]
    fn test_range_and_integrality() {
        let err = TicketRequest::new("P1", [1, 2, 3, 4, 5, 46]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidRange(_)));

        let err = TicketRequest::new("P1", [0, 2, 3, 4, 5, 6]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidRange(_)));

        let err = TicketRequest::new("P1", "1,2,3,4,5,6.5").validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidRange(_)));
    }

    #[test]
    fn test_duplicates() {
        let err = TicketRequest::new("P1", [1, 1, 2, 3, 4, 5]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::DuplicateNumbers(_)));
    }

    #[test]
    fn test_first_failure_wins() {
        // bad id and bad count: id reported
        let err = TicketRequest::new("", [1]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidPersonalId(_)));

        // out of range and duplicated: range reported
        let err = TicketRequest::new("P1", [50, 50, 1, 2, 3, 4]).validate(&rules()).unwrap_err();
        assert!(matches!(err, LottoError::InvalidRange(_)));
    }

    #[test]
    fn test_draw_shape_only() {
        let draw = ValidatedDrawInput::parse(
            &RawNumbers::from([99, 3, 3]),
            DrawValidation::ShapeOnly,
            &rules(),
        )
        .unwrap();
        assert_eq!(draw.into_numbers(), vec![99, 3, 3]);

        for raw in [
            RawNumbers::from(json!("")),
            RawNumbers::from(json!(null)),
            RawNumbers::from(json!(7)),
            RawNumbers::from(json!([1, "x"])),
            RawNumbers::from(json!([1.5])),
        ] {
            let err = ValidatedDrawInput::parse(&raw, DrawValidation::ShapeOnly, &rules()).unwrap_err();
            assert!(matches!(err, LottoError::MissingOrInvalidNumbers(_)));
        }
    }

    #[test]
    fn test_draw_keeps_large_integers_exact() {
        // 2^53 + 1 has no exact f64 representation
        for raw in [
            RawNumbers::from(json!([9007199254740993i64, 1])),
            RawNumbers::from("9007199254740993 1"),
            RawNumbers::from("[9007199254740993, 1]"),
        ] {
            let draw = ValidatedDrawInput::parse(&raw, DrawValidation::ShapeOnly, &rules()).unwrap();
            assert_eq!(draw.into_numbers(), vec![9_007_199_254_740_993, 1]);
        }

        let draw = ValidatedDrawInput::parse(
            &RawNumbers::from(vec![i64::MIN, i64::MAX]),
            DrawValidation::ShapeOnly,
            &rules(),
        )
        .unwrap();
        assert_eq!(draw.into_numbers(), vec![i64::MIN, i64::MAX]);

        // 2^63 and beyond do not fit and are never clamped
        for raw in [
            RawNumbers::from(json!([9223372036854775808u64])),
            RawNumbers::from("9223372036854775808"),
            RawNumbers::from("-9223372036854775809"),
            RawNumbers::from(json!([1e300])),
        ] {
            let err = ValidatedDrawInput::parse(&raw, DrawValidation::ShapeOnly, &rules()).unwrap_err();
            assert!(matches!(err, LottoError::MissingOrInvalidNumbers(_)), "{raw:?}");
        }
    }

    #[test]
    fn test_only_plain_decimal_tokens_are_numbers() {
        for text in ["1e1,2,3,4,5,6", "+5,2,3,4,5,6", "inf,2,3,4,5,6", "NaN,2,3,4,5,6", "0x5,2,3,4,5,6"] {
            let err = TicketRequest::new("P1", text).validate(&rules()).unwrap_err();
            assert!(matches!(err, LottoError::InvalidCount(_)), "{text}");
        }

        let err = ValidatedDrawInput::parse(
            &RawNumbers::from("1e1 2"),
            DrawValidation::ShapeOnly,
            &rules(),
        )
        .unwrap_err();
        assert!(matches!(err, LottoError::MissingOrInvalidNumbers(_)));

        // trailing zero fraction still names a whole number
        let input = TicketRequest::new("P1", "1,2,3,4,5,6.00").validate(&rules()).unwrap();
        assert_eq!(input.numbers(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_oversized_ticket_number_is_out_of_range() {
        for raw in [
            RawNumbers::from("1,2,3,4,5,99999999999999999999"),
            RawNumbers::from(json!([1, 2, 3, 4, 5, 18446744073709551615u64])),
            RawNumbers::from("1,2,3,4,5,-1"),
        ] {
            let err = TicketRequest { personal_id: "P1".into(), numbers: raw }
                .validate(&rules())
                .unwrap_err();
            assert!(matches!(err, LottoError::InvalidRange(_)));
        }
    }

    #[test]
    fn test_draw_ticket_rules() {
        let err = ValidatedDrawInput::parse(
            &RawNumbers::from([1, 2, 3, 4, 5, 5]),
            DrawValidation::TicketRules,
            &rules(),
        )
        .unwrap_err();
        assert!(matches!(err, LottoError::DuplicateNumbers(_)));

        let draw = ValidatedDrawInput::parse(
            &RawNumbers::from("6 5 4 3 2 1"),
            DrawValidation::TicketRules,
            &rules(),
        )
        .unwrap();
        assert_eq!(draw.into_numbers(), vec![6, 5, 4, 3, 2, 1]);
    }
}
