use std::cmp::Ordering;
use std::fmt;

/// A single typed datum within a [`Row`](crate::Row).
///
/// Cross-kind comparisons between `String` and a numeric kind are defined
/// as equal to match the source engine's observed grouping/set
/// semantics; this is intentional, not a gap.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parses a textual field using the rule in the grammar: trim, optional
    /// sign, digits and at most one dot, optional trailing whitespace.
    /// All-digits -> Integer; digits+dot -> Double; empty after trim ->
    /// Null; otherwise String (trimmed on both ends).
    pub fn parse_cell(text: &str) -> Value {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }

        let body = trimmed
            .strip_prefix(['+', '-'])
            .unwrap_or(trimmed);
        if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::Integer(i);
            }
        }
        if let Some((int_part, frac_part)) = body.split_once('.') {
            let is_numeric_split = !int_part.is_empty()
                && int_part.chars().all(|c| c.is_ascii_digit())
                && !frac_part.is_empty()
                && frac_part.chars().all(|c| c.is_ascii_digit());
            if is_numeric_split {
                if let Ok(d) = trimmed.parse::<f64>() {
                    return Value::Double(d);
                }
            }
        }
        Value::String(trimmed.to_string())
    }

    /// Value-equality rule used by GROUP BY/DISTINCT/set operations and the
    /// `=` comparison operator alike: `compare(a, b) == Ordering::Equal`.
    pub fn value_eq(&self, other: &Value) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Total-order comparison per the grammar: Null == Null, Null < anything
    /// non-null, two numerics compare by promoting Integer to Double, two
    /// Strings compare lexicographically, and an incompatible cross-kind
    /// comparison (String vs numeric) is defined as Equal.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let (a, b) = (a.as_f64().unwrap(), b.as_f64().unwrap());
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Formats the value the way `CONCAT` and text-form rendering do:
    /// `%lld` for integers, two fixed decimals for doubles.
    pub fn format_concat(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format!("{:.2}", d),
            Value::String(s) => s.clone(),
        }
    }

    /// Key-part formatting for the GROUP BY fast path and general path:
    /// integers via `%lld`, doubles with 6 fixed decimals, strings raw,
    /// null as the literal text `"NULL"`.
    pub fn group_key_part(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format!("{:.6}", d),
            Value::String(s) => s.clone(),
        }
    }

    /// Key-part formatting for PARTITION BY: doubles use
    /// `%.10g`-equivalent precision rather than the 6-decimal GROUP BY
    /// form. Kept as a distinct formatter (see SPEC_FULL.md) because
    /// unifying the two would change which near-integral doubles collapse
    /// into the same partition vs. group.
    pub fn partition_key_part(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format_g10(*d),
            Value::String(s) => s.clone(),
        }
    }

    /// Renders a cell for writing back out to CSV: `Null` is an
    /// empty field, `Integer` decimal, `Double` via `%.15g`-equivalent
    /// precision, `String` verbatim (quoting is the writer's job, not
    /// this value's).
    pub fn csv_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Double(d) => format_g15(*d),
            Value::String(s) => s.clone(),
        }
    }
}

/// Approximates C's `%.10g`: up to 10 significant digits, trailing zeros
/// and a trailing decimal point stripped.
fn format_g10(value: f64) -> String {
    format_g(value, 10)
}

/// Approximates C's `%.15g`, used when writing a `Double` cell back out to
/// CSV: enough precision to round-trip without the group/partition
/// key formatters' deliberate precision loss.
fn format_g15(value: f64) -> String {
    format_g(value, 15)
}

fn format_g(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let mut s = format!("{:.*}", digits, value);
    if let Ok(parsed) = s.parse::<f64>() {
        s = format!("{:.*}", digits, parsed);
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
    }
    s
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_doubles_strings_and_null() {
        assert_eq!(Value::parse_cell("  42 "), Value::Integer(42));
        assert_eq!(Value::parse_cell("-7"), Value::Integer(-7));
        assert_eq!(Value::parse_cell("3.14"), Value::Double(3.14));
        assert_eq!(Value::parse_cell(""), Value::Null);
        assert_eq!(Value::parse_cell("   "), Value::Null);
        assert_eq!(Value::parse_cell(" admin "), Value::String("admin".into()));
        assert_eq!(Value::parse_cell("1.2.3"), Value::String("1.2.3".into()));
    }

    #[test]
    fn null_orders_below_everything() {
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
        assert_eq!(Value::Null.compare(&Value::Integer(0)), Ordering::Less);
        assert_eq!(Value::Integer(0).compare(&Value::Null), Ordering::Greater);
    }

    #[test]
    fn numeric_promotion_compares_across_kinds() {
        assert_eq!(
            Value::Integer(2).compare(&Value::Double(2.0)),
            Ordering::Equal
        );
        assert_eq!(
            Value::Integer(1).compare(&Value::Double(1.5)),
            Ordering::Less
        );
    }

    #[test]
    fn cross_kind_non_numeric_is_equal() {
        assert!(Value::String("x".into()).value_eq(&Value::Integer(5)));
    }
}
