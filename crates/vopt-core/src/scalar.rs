use std::fmt::{self, Display, Formatter};

#[cfg(feature = "tree-json")]
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A scalar value as found in node attributes and in the variant map.
#[cfg_attr(feature = "tree-json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "tree-json", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(SmolStr),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Converts the value the way JavaScript's implicit `String(value)` does.
    ///
    /// Object keys are always strings, so this is the domain `select` branch
    /// keys are compared in.
    pub fn to_js_string(&self) -> SmolStr {
        match self {
            Scalar::Null => SmolStr::new_static("null"),
            Scalar::Bool(true) => SmolStr::new_static("true"),
            Scalar::Bool(false) => SmolStr::new_static("false"),
            Scalar::Int(n) => SmolStr::from(n.to_string()),
            Scalar::Float(f) => SmolStr::from(js_number_string(*f)),
            Scalar::String(s) => s.clone(),
        }
    }

    /// Standard truthiness: `false`, `0`, `NaN`, `""` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0 && !f.is_nan(),
            Scalar::String(s) => !s.is_empty(),
        }
    }

    /// Equality used when folding `==`/`===`/`!=`/`!==` between two literals.
    ///
    /// Numbers compare by value across int/float, booleans compare as `0`/`1`
    /// against numbers, strings only equal strings and `null` only equals `null`.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Null | Scalar::String(_) => None,
        }
    }
}

fn js_number_string(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let sign = if f < 0.0 { "-" } else { "" };
    if f.is_infinite() {
        return format!("{sign}Infinity");
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.5e-7`.
    let scientific = format!("{:e}", f.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits = mantissa.replace('.', "");
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (integer, fraction) = digits.split_at(n as usize);
        format!("{integer}.{fraction}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(n.unsigned_abs() as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        let exponent_sign = if n > 0 { "+" } else { "-" };
        format!("{first}{fraction}e{exponent_sign}{}", (n - 1).abs())
    };
    format!("{sign}{body}")
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_js_string()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(SmolStr::from(value))
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(SmolStr::from(value))
    }
}

impl From<SmolStr> for Scalar {
    fn from(value: SmolStr) -> Self {
        Scalar::String(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}
