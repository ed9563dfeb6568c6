use crate::common::{Error, Result};
use crate::errdata;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A dynamically typed value extracted from a record, used as a sort key,
/// group key or aggregate input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Field {
    Null,
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
}

impl PartialEq for Field {
    fn eq(&self, other: &Field) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Field {} // implement Eq trait for Field, uses PartialEq

impl std::hash::Hash for Field {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Field::Null => {}
            Field::Integer(i) => i.hash(state),
            Field::Float(f) => {
                if f.is_nan() {
                    0.hash(state);
                } else {
                    // -0.0 and 0.0 compare equal
                    (f + 0.0).to_bits().hash(state);
                }
            }
            Field::String(s) => s.hash(state),
            Field::Date(d) => d.hash(state),
        }
    }
}

// for use in sorting: Null sorts before every value, NaN after every float
impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        use Field::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Integer(i), Integer(i2)) => i.cmp(i2),
            (Float(f), Float(f2)) => match (f.is_nan(), f2.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => f.partial_cmp(f2).unwrap_or(Ordering::Equal),
            },
            (String(s), String(s2)) => s.cmp(s2),
            (Date(d), Date(d2)) => d.cmp(d2),
            (lhs, rhs) => lhs.rank().cmp(&rhs.rank()),
        }
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Float(float) => write!(f, "{float}"),
            Self::String(string) => f.write_str(string),
            Self::Date(date) => write!(f, "{date}"),
        }
    }
}

impl From<f64> for Field {
    fn from(v: f64) -> Self {
        Field::Float(v)
    }
}

impl From<i64> for Field {
    fn from(v: i64) -> Self {
        Field::Integer(v)
    }
}

impl From<i32> for Field {
    fn from(v: i32) -> Self {
        Field::Integer(v as i64)
    }
}

impl From<u32> for Field {
    fn from(v: u32) -> Self {
        Field::Integer(v as i64)
    }
}

impl From<String> for Field {
    fn from(v: String) -> Self {
        Field::String(v)
    }
}

impl From<&str> for Field {
    fn from(v: &str) -> Self {
        Field::String(v.to_owned())
    }
}

impl From<NaiveDate> for Field {
    fn from(v: NaiveDate) -> Self {
        Field::Date(v)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(v: Option<T>) -> Self {
        v.map_or(Field::Null, Into::into)
    }
}

impl Field {
    /// Cross-type ordering, only consulted when the variants differ.
    fn rank(&self) -> u8 {
        match self {
            Field::Null => 0,
            Field::Integer(_) => 1,
            Field::Float(_) => 2,
            Field::String(_) => 3,
            Field::Date(_) => 4,
        }
    }

    pub fn checked_add(&self, other: &Field) -> Result<Field> {
        use Field::*;
        match (self, other) {
            (Integer(lhs), Integer(rhs)) => match lhs.checked_add(*rhs) {
                Some(v) => Ok(Integer(v)),
                None => Result::from(Error::OverflowError),
            },
            (Integer(lhs), Float(rhs)) => Ok(Float(*lhs as f64 + rhs)),
            (Float(lhs), Integer(rhs)) => Ok(Float(lhs + *rhs as f64)),
            (Float(lhs), Float(rhs)) => Ok(Float(lhs + rhs)),
            (Null, Integer(_) | Float(_) | Null) | (Integer(_) | Float(_), Null) => Ok(Null),
            _ => errdata!("cannot add {self:?} and {other:?}"),
        }
    }

    /// Divides two numbers. Integer division yields a float unless exact.
    pub fn checked_div(&self, other: &Field) -> Result<Field> {
        use Field::*;

        if matches!(other, Integer(0)) || matches!(other, Float(f) if *f == 0.0) {
            return errdata!("division by zero");
        }

        match (self, other) {
            (Integer(lhs), Integer(rhs)) => match (lhs.checked_rem(*rhs), lhs.checked_div(*rhs)) {
                (Some(0), Some(quotient)) => Ok(Integer(quotient)),
                (Some(_), _) => Ok(Float(*lhs as f64 / *rhs as f64)),
                _ => Result::from(Error::OverflowError),
            },
            (Integer(lhs), Float(rhs)) => Ok(Float(*lhs as f64 / rhs)),
            (Float(lhs), Integer(rhs)) => Ok(Float(lhs / *rhs as f64)),
            (Float(lhs), Float(rhs)) => Ok(Float(lhs / rhs)),
            (Null, Integer(_) | Float(_) | Null) | (Integer(_) | Float(_), Null) => Ok(Null),
            _ => errdata!("cannot divide {self:?} and {other:?}"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    /// Returns the value as a float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Integer(i) => Some(*i as f64),
            Field::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Field::Integer(i) => Some(*i),
            _ => None,
        }
    }
}
