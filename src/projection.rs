//! Flat, immutable values assembled from selected columns of the member/team join.

use rusqlite::Row;
use serde::Serialize;

use crate::entity::{Member, MemberId, TeamId};
use crate::predicate::{Column, Record, Value};

/// A result shape: which columns to select and how to build the value from them.
pub trait Projection: Sized {
    const COLUMNS: &'static [Column];
    /// Columns arrive in the order of `COLUMNS`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Denormalised member row paired with its team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: MemberId,
    pub username: Option<String>,
    pub age: i64,
    pub team_id: Option<TeamId>,
    pub team_name: Option<String>,
}

impl Projection for MemberTeamDto {
    const COLUMNS: &'static [Column] = &[
        Column::MemberId,
        Column::Username,
        Column::Age,
        Column::TeamId,
        Column::TeamName,
    ];
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            member_id: row.get(0)?,
            username: row.get(1)?,
            age: row.get(2)?,
            team_id: row.get(3)?,
            team_name: row.get(4)?,
        })
    }
}

impl Record for MemberTeamDto {
    fn value(&self, column: Column) -> Option<Value> {
        match column {
            Column::MemberId => Some(Value::Integer(self.member_id.0)),
            Column::Username => self.username.clone().map(Value::Text),
            Column::Age => Some(Value::Integer(self.age)),
            Column::TeamId => self.team_id.map(|t| Value::Integer(t.0)),
            Column::TeamName => self.team_name.clone().map(Value::Text),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i64,
}

impl Projection for MemberDto {
    const COLUMNS: &'static [Column] = &[Column::Username, Column::Age];
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            age: row.get(1)?,
        })
    }
}

impl Projection for Member {
    const COLUMNS: &'static [Column] = &[
        Column::MemberId,
        Column::Username,
        Column::Age,
        Column::TeamId,
    ];
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Member::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }
}

/// Aggregates over the member ages matched by a query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgeSummary {
    pub count: u64,
    pub sum: i64,
    /// `None` when nothing matched, as are `max` and `min`.
    pub avg: Option<f64>,
    pub max: Option<i64>,
    pub min: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAverageAge {
    pub team_name: String,
    pub average_age: f64,
}
