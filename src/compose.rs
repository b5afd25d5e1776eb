//! Turns a [`SearchCondition`] into a single [`Predicate`].
//!
//! Each field maps to at most one atomic comparison; the comparisons are
//! folded with AND in field-declaration order. With no field present the
//! result is [`Predicate::True`], which callers can detect with
//! [`Predicate::is_match_all`] before running an unbounded search.

use crate::condition::SearchCondition;
use crate::path::{member, team};
use crate::predicate::Predicate;

pub fn compose(condition: &SearchCondition) -> Predicate {
    Predicate::all(clauses(condition))
}

/// One slot per condition field, in declaration order.
pub fn clauses(condition: &SearchCondition) -> [Option<Predicate>; 4] {
    [
        username_eq(condition.username.as_deref()),
        team_name_eq(condition.team_name.as_deref()),
        age_goe(condition.age_goe),
        age_loe(condition.age_loe),
    ]
}

pub fn username_eq(username: Option<&str>) -> Option<Predicate> {
    username.map(|u| member::USERNAME.eq(u))
}

pub fn team_name_eq(team_name: Option<&str>) -> Option<Predicate> {
    team_name.map(|t| team::NAME.eq(t))
}

pub fn age_goe(age: Option<i64>) -> Option<Predicate> {
    age.map(|a| member::AGE.goe(a))
}

pub fn age_loe(age: Option<i64>) -> Option<Predicate> {
    age.map(|a| member::AGE.loe(a))
}
