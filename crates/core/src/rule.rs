//! Best-before date comparisons for cart/pricing rules.
//!
//! A rule compares the structured date stored in a product's custom fields
//! with a fixed date. Products without a date only satisfy the negative
//! operators (`!=` and `empty`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::sync::CustomFields;
use crate::token;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("invalid comparison date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Empty,
}

impl RuleOperator {
    /// Operators that hold for products without a date.
    pub fn is_negative(self) -> bool {
        matches!(self, Self::Ne | Self::Empty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Empty => "empty",
        }
    }
}

impl FromStr for RuleOperator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(Self::Eq),
            "!=" | "<>" | "ne" => Ok(Self::Ne),
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "lte" => Ok(Self::Le),
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "gte" => Ok(Self::Ge),
            "empty" => Ok(Self::Empty),
            other => Err(RuleError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<stored best-before date> <operator> <date>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MhdDateRule {
    pub operator: RuleOperator,
    /// Ignored for [`RuleOperator::Empty`].
    pub date: Option<NaiveDate>,
}

impl MhdDateRule {
    pub fn new(operator: RuleOperator, date: Option<NaiveDate>) -> Self {
        Self { operator, date }
    }

    /// Build a rule from user input; the date may be any stored-date format.
    pub fn parse(operator: &str, date: Option<&str>) -> Result<Self, RuleError> {
        let operator: RuleOperator = operator.parse()?;
        let date = match date {
            Some(raw) => Some(
                token::parse_storage_value(raw)
                    .ok_or_else(|| RuleError::InvalidDate(raw.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { operator, date })
    }

    /// Evaluate against one record's custom fields.
    pub fn matches(&self, custom_fields: Option<&CustomFields>, field: &str) -> bool {
        let stored = custom_fields
            .and_then(|fields| fields.get(field))
            .and_then(Value::as_str)
            .and_then(token::parse_storage_value);

        let Some(stored) = stored else {
            return self.operator.is_negative();
        };

        let Some(date) = self.date else {
            return false;
        };

        match self.operator {
            RuleOperator::Eq => stored == date,
            RuleOperator::Ne => stored != date,
            RuleOperator::Lt => stored < date,
            RuleOperator::Le => stored <= date,
            RuleOperator::Gt => stored > date,
            RuleOperator::Ge => stored >= date,
            RuleOperator::Empty => false,
        }
    }

    /// True if any of the records matches (cart semantics).
    pub fn matches_any<'f, I>(&self, records: I, field: &str) -> bool
    where
        I: IntoIterator<Item = Option<&'f CustomFields>>,
    {
        records.into_iter().any(|fields| self.matches(fields, field))
    }
}
