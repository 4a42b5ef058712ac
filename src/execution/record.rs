//! Positional tuple of values passed between operators.

use std::fmt;

use smallvec::SmallVec;

use super::FromValue;
use crate::model::Value;
use crate::{Error, Result};

/// One row of an operator's output.
///
/// Fields are positional; names live in an external header owned by
/// whoever built the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: SmallVec<[Value; 8]>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` empty-string scalars, to be overwritten positionally.
    pub fn with_placeholders(n: usize) -> Self {
        Self { fields: (0..n).map(|_| Value::from("")).collect() }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.fields.push(value.into());
    }

    /// Append every field of `other`.
    pub fn extend(&mut self, other: &Record) {
        self.fields.extend(other.fields.iter().cloned());
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Overwrite the field at `index`. Fails if out of range.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let len = self.fields.len();
        let slot = self.fields.get_mut(index).ok_or_else(|| {
            Error::ExecutionError(format!("field {index} out of range for record of {len}"))
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Field at `index`, converted.
    pub fn get_as<T: FromValue>(&self, index: usize) -> Result<T> {
        let val = self.get(index).ok_or_else(|| {
            Error::ExecutionError(format!("field {index} out of range for record of {}", self.len()))
        })?;
        T::from_value(val)
    }

    /// Field named `name` in `header`, if both exist.
    pub fn get_by_name<S: AsRef<str>>(&self, header: &[S], name: &str) -> Option<&Value> {
        header
            .iter()
            .position(|h| h.as_ref() == name)
            .and_then(|i| self.get(i))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.fields.iter()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.fields.into_vec()
    }
}

impl FromIterator<Value> for Record {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.fields.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}
