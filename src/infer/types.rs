//! Built-in value types for inferred text and attribute values.
//!
//! Every observed value narrows a [`TypeSet`] of candidate types; the
//! inferred type is the first remaining candidate in lattice order, which
//! always ends in `xs:string`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Boolean,
    UnsignedByte,
    Byte,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    UnsignedLong,
    Long,
    Integer,
    Decimal,
    Double,
    DateTime,
    Date,
    Time,
    String,
}

impl ValueType {
    /// Candidates from narrowest to widest.
    pub const LATTICE: [ValueType; 16] = [
        Self::Boolean,
        Self::UnsignedByte,
        Self::Byte,
        Self::UnsignedShort,
        Self::Short,
        Self::UnsignedInt,
        Self::Int,
        Self::UnsignedLong,
        Self::Long,
        Self::Integer,
        Self::Decimal,
        Self::Double,
        Self::DateTime,
        Self::Date,
        Self::Time,
        Self::String,
    ];

    /// Prefixed schema name, e.g. `xs:int`.
    pub fn xsd_name(self) -> &'static str {
        match self {
            Self::Boolean => "xs:boolean",
            Self::UnsignedByte => "xs:unsignedByte",
            Self::Byte => "xs:byte",
            Self::UnsignedShort => "xs:unsignedShort",
            Self::Short => "xs:short",
            Self::UnsignedInt => "xs:unsignedInt",
            Self::Int => "xs:int",
            Self::UnsignedLong => "xs:unsignedLong",
            Self::Long => "xs:long",
            Self::Integer => "xs:integer",
            Self::Decimal => "xs:decimal",
            Self::Double => "xs:double",
            Self::DateTime => "xs:dateTime",
            Self::Date => "xs:date",
            Self::Time => "xs:time",
            Self::String => "xs:string",
        }
    }

    /// Whether `value` (already trimmed) is in the lexical space of this type.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Boolean => matches!(value, "true" | "false"),
            Self::UnsignedByte => value.parse::<u8>().is_ok(),
            Self::Byte => value.parse::<i8>().is_ok(),
            Self::UnsignedShort => value.parse::<u16>().is_ok(),
            Self::Short => value.parse::<i16>().is_ok(),
            Self::UnsignedInt => value.parse::<u32>().is_ok(),
            Self::Int => value.parse::<i32>().is_ok(),
            Self::UnsignedLong => value.parse::<u64>().is_ok(),
            Self::Long => value.parse::<i64>().is_ok(),
            Self::Integer => is_integer(value),
            Self::Decimal => is_decimal(value),
            Self::Double => is_double(value),
            Self::DateTime => {
                NaiveDateTime::parse_from_str(strip_timezone(value), "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            }
            Self::Date => NaiveDate::parse_from_str(strip_timezone(value), "%Y-%m-%d").is_ok(),
            Self::Time => NaiveTime::parse_from_str(strip_timezone(value), "%H:%M:%S%.f").is_ok(),
            Self::String => true,
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Candidate types still accepting every value observed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSet(u16);

impl Default for TypeSet {
    fn default() -> Self {
        Self(ValueType::LATTICE.iter().fold(0, |bits, ty| bits | ty.bit()))
    }
}

impl TypeSet {
    pub fn observe(&mut self, value: &str) {
        let value = value.trim();
        for ty in ValueType::LATTICE {
            if self.0 & ty.bit() != 0 && !ty.accepts(value) {
                self.0 &= !ty.bit();
            }
        }
    }

    pub fn narrowest(self) -> ValueType {
        ValueType::LATTICE
            .into_iter()
            .find(|ty| self.0 & ty.bit() != 0)
            .unwrap_or(ValueType::String)
    }
}

fn split_sign(value: &str) -> &str {
    value
        .strip_prefix('+')
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value)
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer(value: &str) -> bool {
    is_digits(split_sign(value))
}

fn is_decimal(value: &str) -> bool {
    let unsigned = split_sign(value);
    match unsigned.split_once('.') {
        Some((whole, fraction)) => {
            (whole.is_empty() || is_digits(whole))
                && (fraction.is_empty() || is_digits(fraction))
                && !(whole.is_empty() && fraction.is_empty())
        }
        None => is_digits(unsigned),
    }
}

fn is_double(value: &str) -> bool {
    if matches!(value, "INF" | "-INF" | "+INF" | "NaN") {
        return true;
    }
    match value.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => is_decimal(mantissa) && is_integer(exponent),
        None => is_decimal(value),
    }
}

/// Drop a trailing `Z` or `±hh:mm` zone designator.
fn strip_timezone(value: &str) -> &str {
    if let Some(rest) = value.strip_suffix('Z') {
        return rest;
    }
    let bytes = value.as_bytes();
    let len = bytes.len();
    if len > 6 && matches!(bytes[len - 6], b'+' | b'-') && bytes[len - 3] == b':' {
        return &value[..len - 6];
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn infer(values: &[&str]) -> ValueType {
        let mut set = TypeSet::default();
        for value in values {
            set.observe(value);
        }
        set.narrowest()
    }

    #[rstest]
    #[case(&["true", "false"], ValueType::Boolean)]
    #[case(&["1", "42"], ValueType::UnsignedByte)]
    #[case(&["-5"], ValueType::Byte)]
    #[case(&["200", "-5"], ValueType::Short)]
    #[case(&["70000"], ValueType::UnsignedInt)]
    #[case(&["-70000"], ValueType::Int)]
    #[case(&["99999999999999999999999"], ValueType::Integer)]
    #[case(&["3.14", "2"], ValueType::Decimal)]
    #[case(&["1e10"], ValueType::Double)]
    #[case(&["INF", "0.5"], ValueType::Double)]
    #[case(&["2024-01-02T03:04:05"], ValueType::DateTime)]
    #[case(&["2024-01-02T03:04:05.123Z"], ValueType::DateTime)]
    #[case(&["2024-01-02", "2024-12-31+02:00"], ValueType::Date)]
    #[case(&["13:45:00"], ValueType::Time)]
    #[case(&["hello"], ValueType::String)]
    #[case(&["1", "x"], ValueType::String)]
    #[case(&["true", "1"], ValueType::String)]
    #[case(&[""], ValueType::String)]
    fn test_narrowest_type(#[case] values: &[&str], #[case] expected: ValueType) {
        assert_eq!(infer(values), expected);
    }

    #[test]
    fn test_values_are_trimmed() {
        assert_eq!(infer(&["  7\n"]), ValueType::UnsignedByte);
    }

    #[test]
    fn test_strip_timezone() {
        assert_eq!(strip_timezone("2024-01-02Z"), "2024-01-02");
        assert_eq!(strip_timezone("10:00:00-05:00"), "10:00:00");
        assert_eq!(strip_timezone("2024-01-02"), "2024-01-02");
    }
}
