use cq_core::Value;

/// Dispatches a scalar function call by case-insensitive name.
/// Every function returns `Null` on unsupported argument types unless
/// stated otherwise.
pub fn call_scalar(name: &str, args: &[Value]) -> Value {
    match name.to_ascii_uppercase().as_str() {
        "CONCAT" => Value::String(args.iter().map(Value::format_concat).collect()),
        "LOWER" => string_fn(args, |s| s.to_ascii_lowercase()),
        "UPPER" => string_fn(args, |s| s.to_ascii_uppercase()),
        "LENGTH" => match args.first() {
            Some(Value::String(s)) => Value::Integer(s.len() as i64),
            _ => Value::Null,
        },
        "SUBSTRING" => substring(args),
        "REPLACE" => replace(args),
        "COALESCE" => args
            .iter()
            .find(|v| !v.is_null())
            .cloned()
            .unwrap_or(Value::Null),
        "POWER" => binary_f64(args, f64::powf),
        "SQRT" => match args.first().and_then(Value::as_f64) {
            Some(n) if n >= 0.0 => Value::Double(n.sqrt()),
            _ => Value::Null,
        },
        "CEIL" => unary_rounding(args, f64::ceil),
        "FLOOR" => unary_rounding(args, f64::floor),
        "ROUND" => round(args),
        "ABS" => abs(args),
        "EXP" => unary_f64(args, f64::exp),
        "LN" | "LOG" => match args.first().and_then(Value::as_f64) {
            Some(n) if n > 0.0 => Value::Double(n.ln()),
            _ => Value::Null,
        },
        "MOD" => modulo(args),
        other => {
            log::warn!("unknown function: {other}");
            Value::Null
        }
    }
}

fn string_fn(args: &[Value], f: impl Fn(&str) -> String) -> Value {
    match args.first() {
        Some(Value::String(s)) => Value::String(f(s)),
        _ => Value::Null,
    }
}

fn unary_f64(args: &[Value], f: impl Fn(f64) -> f64) -> Value {
    match args.first().and_then(Value::as_f64) {
        Some(n) => Value::Double(f(n)),
        None => Value::Null,
    }
}

fn binary_f64(args: &[Value], f: impl Fn(f64, f64) -> f64) -> Value {
    match (args.first().and_then(Value::as_f64), args.get(1).and_then(Value::as_f64)) {
        (Some(a), Some(b)) => Value::Double(f(a, b)),
        _ => Value::Null,
    }
}

/// `CEIL`/`FLOOR` preserve the input's kind: an `Integer` argument passes
/// through unchanged, only a `Double` is actually rounded.
fn unary_rounding(args: &[Value], f: impl Fn(f64) -> f64) -> Value {
    match args.first() {
        Some(Value::Integer(i)) => Value::Integer(*i),
        Some(Value::Double(d)) => Value::Double(f(*d)),
        _ => Value::Null,
    }
}

fn abs(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Integer(i)) => Value::Integer(i.abs()),
        Some(Value::Double(d)) => Value::Double(d.abs()),
        _ => Value::Null,
    }
}

/// `ROUND(n [, decimals])`: integral when `decimals` is 0 (or omitted)
/// and the input is already integral.
fn round(args: &[Value]) -> Value {
    let Some(n) = args.first().and_then(Value::as_f64) else {
        return Value::Null;
    };
    let decimals = match args.get(1) {
        Some(Value::Integer(d)) => *d,
        Some(Value::Double(d)) => *d as i64,
        _ => 0,
    };
    let factor = 10f64.powi(decimals as i32);
    let rounded = (n * factor).round() / factor;
    if decimals <= 0 && rounded.fract() == 0.0 {
        Value::Integer(rounded as i64)
    } else {
        Value::Double(rounded)
    }
}

fn modulo(args: &[Value]) -> Value {
    match (args.first(), args.get(1)) {
        (Some(Value::Integer(a)), Some(Value::Integer(b))) => {
            if *b == 0 {
                Value::Null
            } else {
                Value::Integer(a % b)
            }
        }
        _ => match (
            args.first().and_then(Value::as_f64),
            args.get(1).and_then(Value::as_f64),
        ) {
            (Some(a), Some(b)) if b != 0.0 => Value::Double(a % b),
            _ => Value::Null,
        },
    }
}

/// `SUBSTRING(str, start, length)`: 1-based start, bounds clamped.
fn substring(args: &[Value]) -> Value {
    let Some(Value::String(s)) = args.first() else {
        return Value::Null;
    };
    let chars: Vec<char> = s.chars().collect();
    let start = match args.get(1) {
        Some(v) => v.as_f64().unwrap_or(1.0) as i64,
        None => 1,
    };
    let length = match args.get(2) {
        Some(v) => v.as_f64().unwrap_or(chars.len() as f64) as i64,
        None => chars.len() as i64,
    };
    let start0 = (start - 1).max(0) as usize;
    if start0 >= chars.len() || length <= 0 {
        return Value::String(String::new());
    }
    let end = (start0 + length as usize).min(chars.len());
    Value::String(chars[start0..end].iter().collect())
}

/// `REPLACE(haystack, from, to)`: an empty `from` returns `haystack`
/// unchanged.
fn replace(args: &[Value]) -> Value {
    match (args.first(), args.get(1), args.get(2)) {
        (Some(Value::String(haystack)), Some(Value::String(from)), Some(Value::String(to))) => {
            if from.is_empty() {
                Value::String(haystack.clone())
            } else {
                Value::String(haystack.replace(from.as_str(), to))
            }
        }
        _ => Value::Null,
    }
}

/// Aggregate functions operate over a column of an arbitrary row set.
/// `values` is the already-resolved per-row column values, in row order,
/// including nulls.
pub fn call_aggregate(name: &str, values: &[Value]) -> Value {
    match name.to_ascii_uppercase().as_str() {
        "COUNT" => Value::Integer(values.len() as i64),
        "SUM" => sum(values),
        "AVG" => {
            let numeric: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
            if numeric.is_empty() {
                Value::Double(0.0)
            } else {
                Value::Double(numeric.iter().sum::<f64>() / numeric.len() as f64)
            }
        }
        "MIN" => extreme(values, std::cmp::Ordering::Less),
        "MAX" => extreme(values, std::cmp::Ordering::Greater),
        "STDDEV" | "STDDEV_POP" => stddev(values),
        "MEDIAN" => median(values),
        other => {
            log::warn!("unknown aggregate function: {other}");
            Value::Null
        }
    }
}

/// Integer-exact when every contributing cell was an `Integer`, matching
/// the no-surprise-promotion rule elsewhere in the evaluator (the grammar's
/// arithmetic promotion note). `0.0` (not `0`) on an empty/all-null group
/// per the grammar's boundary cases.
fn sum(values: &[Value]) -> Value {
    let non_null: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return Value::Double(0.0);
    }
    let total: f64 = non_null.iter().filter_map(|v| v.as_f64()).sum();
    let all_integer = non_null.iter().all(|v| matches!(v, Value::Integer(_)));
    if all_integer && total.fract() == 0.0 {
        Value::Integer(total as i64)
    } else {
        Value::Double(total)
    }
}

fn extreme(values: &[Value], want: std::cmp::Ordering) -> Value {
    values
        .iter()
        .filter(|v| !v.is_null())
        .fold(None::<&Value>, |best, v| match best {
            None => Some(v),
            Some(b) => {
                if v.compare(b) == want {
                    Some(v)
                } else {
                    Some(b)
                }
            }
        })
        .cloned()
        .unwrap_or(Value::Null)
}

fn stddev(values: &[Value]) -> Value {
    let numeric: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if numeric.is_empty() {
        return Value::Double(0.0);
    }
    let mean = numeric.iter().sum::<f64>() / numeric.len() as f64;
    let variance = numeric.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / numeric.len() as f64;
    Value::Double(variance.sqrt())
}

fn median(values: &[Value]) -> Value {
    let mut numeric: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if numeric.is_empty() {
        return Value::Null;
    }
    numeric.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = numeric.len() / 2;
    if numeric.len() % 2 == 1 {
        Value::Double(numeric[mid])
    } else {
        Value::Double((numeric[mid - 1] + numeric[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_formats_numbers() {
        let result = call_scalar(
            "CONCAT",
            &[Value::String("n=".into()), Value::Integer(3), Value::Double(1.5)],
        );
        assert_eq!(result, Value::String("n=31.50".into()));
    }

    #[test]
    fn sqrt_of_negative_is_null() {
        assert_eq!(call_scalar("SQRT", &[Value::Integer(-1)]), Value::Null);
    }

    #[test]
    fn replace_with_empty_from_is_identity() {
        let result = call_scalar(
            "REPLACE",
            &[
                Value::String("hello".into()),
                Value::String("".into()),
                Value::String("x".into()),
            ],
        );
        assert_eq!(result, Value::String("hello".into()));
    }

    #[test]
    fn count_star_includes_nulls() {
        assert_eq!(
            call_aggregate("COUNT", &[Value::Integer(1), Value::Null, Value::Integer(2)]),
            Value::Integer(3)
        );
    }

    #[test]
    fn avg_of_empty_is_zero() {
        assert_eq!(call_aggregate("AVG", &[]), Value::Double(0.0));
    }

    #[test]
    fn median_of_even_count_averages_middle_two() {
        let values = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3), Value::Integer(4)];
        assert_eq!(call_aggregate("MEDIAN", &values), Value::Double(2.5));
    }
}
