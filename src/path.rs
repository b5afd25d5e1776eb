//! Typed column paths.
//!
//! Paths are the only way callers are expected to build atomic comparisons:
//! a [`NumberPath`] only accepts integers and a [`StringPath`] only accepts
//! text, so comparing incompatible types fails to compile instead of failing
//! at run time. Subqueries keep the type of the path they select from.

use crate::predicate::{Aggregate, Column, ComparisonOp, InSet, Operand, Predicate, Subquery, Value};
use crate::query::{Direction, OrderSpecifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberPath(Column);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringPath(Column);

/// Aggregate of a numeric column over the rows matching a filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberSubquery(Operand);

/// Numeric column of the rows matching a filter, for `in`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberSelect(Subquery);

/// Text column of the rows matching a filter, for `in`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringSelect(Subquery);

fn scalar(aggregate: Aggregate, column: Column, filter: Predicate) -> Operand {
    Operand::Scalar(aggregate, Box::new(Subquery::new(column, filter)))
}

fn in_values(column: Column, values: Vec<Value>) -> Predicate {
    Predicate::In {
        column,
        set: InSet::Values(values),
    }
}

fn in_subquery(column: Column, subquery: Subquery) -> Predicate {
    Predicate::In {
        column,
        set: InSet::Subquery(Box::new(subquery)),
    }
}

impl NumberPath {
    pub const fn column(self) -> Column {
        self.0
    }
    pub fn eq(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::Equal, value)
    }
    pub fn ne(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::NotEqual, value)
    }
    pub fn lt(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::LessThan, value)
    }
    /// Less than or equal.
    pub fn loe(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::LessThanOrEqual, value)
    }
    pub fn gt(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::GreaterThan, value)
    }
    /// Greater than or equal.
    pub fn goe(self, value: i64) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::GreaterThanOrEqual, value)
    }
    /// Inclusive range.
    pub fn between(self, low: i64, high: i64) -> Predicate {
        Predicate::Between {
            column: self.0,
            low: Value::Integer(low),
            high: Value::Integer(high),
        }
    }
    pub fn in_(self, values: impl IntoIterator<Item = i64>) -> Predicate {
        in_values(self.0, values.into_iter().map(Value::Integer).collect())
    }
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self.0)
    }

    pub fn max_where(self, filter: Predicate) -> NumberSubquery {
        NumberSubquery(scalar(Aggregate::Max, self.0, filter))
    }
    pub fn min_where(self, filter: Predicate) -> NumberSubquery {
        NumberSubquery(scalar(Aggregate::Min, self.0, filter))
    }
    pub fn avg_where(self, filter: Predicate) -> NumberSubquery {
        NumberSubquery(scalar(Aggregate::Avg, self.0, filter))
    }
    pub fn select_where(self, filter: Predicate) -> NumberSelect {
        NumberSelect(Subquery::new(self.0, filter))
    }

    pub fn eq_sub(self, subquery: NumberSubquery) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::Equal, subquery.0)
    }
    pub fn lt_sub(self, subquery: NumberSubquery) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::LessThan, subquery.0)
    }
    pub fn loe_sub(self, subquery: NumberSubquery) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::LessThanOrEqual, subquery.0)
    }
    pub fn gt_sub(self, subquery: NumberSubquery) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::GreaterThan, subquery.0)
    }
    pub fn goe_sub(self, subquery: NumberSubquery) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::GreaterThanOrEqual, subquery.0)
    }
    pub fn in_sub(self, select: NumberSelect) -> Predicate {
        in_subquery(self.0, select.0)
    }

    pub fn asc(self) -> OrderSpecifier {
        OrderSpecifier::new(self.0, Direction::Asc)
    }
    pub fn desc(self) -> OrderSpecifier {
        OrderSpecifier::new(self.0, Direction::Desc)
    }
}

impl StringPath {
    pub const fn column(self) -> Column {
        self.0
    }
    pub fn eq(self, value: &str) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::Equal, value)
    }
    pub fn ne(self, value: &str) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::NotEqual, value)
    }
    pub fn lt(self, value: &str) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::LessThan, value)
    }
    pub fn gt(self, value: &str) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::GreaterThan, value)
    }
    pub fn contains(self, value: &str) -> Predicate {
        Predicate::compare(self.0, ComparisonOp::Contains, value)
    }
    pub fn in_<'a>(self, values: impl IntoIterator<Item = &'a str>) -> Predicate {
        in_values(self.0, values.into_iter().map(Value::from).collect())
    }
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self.0)
    }
    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNull(self.0).not()
    }
    pub fn select_where(self, filter: Predicate) -> StringSelect {
        StringSelect(Subquery::new(self.0, filter))
    }
    pub fn in_sub(self, select: StringSelect) -> Predicate {
        in_subquery(self.0, select.0)
    }
    pub fn asc(self) -> OrderSpecifier {
        OrderSpecifier::new(self.0, Direction::Asc)
    }
    pub fn desc(self) -> OrderSpecifier {
        OrderSpecifier::new(self.0, Direction::Desc)
    }
}

pub mod member {
    use super::{NumberPath, StringPath};
    use crate::predicate::Column;

    pub const ID: NumberPath = NumberPath(Column::MemberId);
    pub const USERNAME: StringPath = StringPath(Column::Username);
    pub const AGE: NumberPath = NumberPath(Column::Age);
    pub const TEAM_ID: NumberPath = NumberPath(Column::TeamId);
}

pub mod team {
    use super::StringPath;
    use crate::predicate::Column;

    pub const NAME: StringPath = StringPath(Column::TeamName);
}
