//! Query object handed to SQLite.
//!
//! [`MemberQuery`] collects a predicate, an ordering and a paging window and
//! renders them against the member ⟕ team join. It holds no connection; the
//! terminal operations borrow one for the duration of a single statement.

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::error::{MemberQueryError, Result};
use crate::predicate::{Column, Predicate, SqlFragment, Value};
use crate::projection::{AgeSummary, MemberTeamDto, Projection, TeamAverageAge};

pub(crate) const FROM_MEMBER_JOIN_TEAM: &str =
    "from member m left join team t on t.team_id = m.team_id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NullOrdering {
    /// Whatever the engine does; SQLite puts nulls first when ascending.
    #[default]
    Default,
    First,
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderSpecifier {
    pub column: Column,
    pub direction: Direction,
    pub nulls: NullOrdering,
}

impl OrderSpecifier {
    pub fn new(column: Column, direction: Direction) -> Self {
        Self {
            column,
            direction,
            nulls: NullOrdering::Default,
        }
    }
    #[must_use]
    pub fn nulls_first(mut self) -> Self {
        self.nulls = NullOrdering::First;
        self
    }
    #[must_use]
    pub fn nulls_last(mut self) -> Self {
        self.nulls = NullOrdering::Last;
        self
    }
    fn write_sql(&self, out: &mut String) {
        out.push_str(self.column.sql());
        out.push_str(match self.direction {
            Direction::Asc => " asc",
            Direction::Desc => " desc",
        });
        out.push_str(match self.nulls {
            NullOrdering::Default => "",
            NullOrdering::First => " nulls first",
            NullOrdering::Last => " nulls last",
        });
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberQuery {
    predicate: Predicate,
    order: Vec<OrderSpecifier>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl Default for MemberQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberQuery {
    pub fn new() -> Self {
        Self {
            predicate: Predicate::True,
            order: Vec::new(),
            offset: None,
            limit: None,
        }
    }
    /// ANDs `predicate` onto whatever filter is already present.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = std::mem::replace(&mut self.predicate, Predicate::True).and(predicate);
        self
    }
    #[must_use]
    pub fn order_by(mut self, order: OrderSpecifier) -> Self {
        self.order.push(order);
        self
    }
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The select statement for projection `P`, parameters included.
    pub fn to_sql<P: Projection>(&self) -> SqlFragment {
        let SqlFragment {
            sql: where_sql,
            mut params,
        } = self.predicate.to_sql();
        let columns: Vec<&str> = P::COLUMNS.iter().map(|c| c.sql()).collect();
        let mut sql = format!(
            "select {} {} where {}",
            columns.join(", "),
            FROM_MEMBER_JOIN_TEAM,
            where_sql
        );
        if !self.order.is_empty() {
            sql.push_str(" order by ");
            for (i, order) in self.order.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                order.write_sql(&mut sql);
            }
        }
        if self.limit.is_some() || self.offset.is_some() {
            // SQLite only accepts an offset after a limit; -1 means unbounded
            sql.push_str(" limit ? offset ?");
            params.push(Value::Integer(self.limit.map_or(-1, saturating_i64)));
            params.push(Value::Integer(self.offset.map_or(0, saturating_i64)));
        }
        SqlFragment { sql, params }
    }

    pub fn fetch_as<P: Projection>(&self, connection: &Connection) -> Result<Vec<P>> {
        let SqlFragment { sql, params } = self.to_sql::<P>();
        debug!(%sql, params = params.len(), "fetch");
        let mut statement = connection.prepare_cached(&sql)?;
        let rows = statement
            .query_map(params_from_iter(params.iter()), |row| P::from_row(row))?
            .collect::<rusqlite::Result<Vec<P>>>()?;
        Ok(rows)
    }

    pub fn fetch(&self, connection: &Connection) -> Result<Vec<MemberTeamDto>> {
        self.fetch_as(connection)
    }

    /// `Ok(None)` when nothing matched, an error when more than one row did.
    /// At most two rows are read.
    pub fn fetch_one(&self, connection: &Connection) -> Result<Option<MemberTeamDto>> {
        let bounded = self.clone().limit(self.limit.map_or(2, |l| l.min(2)));
        let mut rows = bounded.fetch(connection)?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            _ => Err(MemberQueryError::NonUnique),
        }
    }

    /// Like [`fetch_one`](Self::fetch_one) but an empty result is an error too.
    pub fn fetch_unique(&self, connection: &Connection) -> Result<MemberTeamDto> {
        self.fetch_one(connection)?.ok_or(MemberQueryError::NotFound)
    }

    pub fn fetch_first(&self, connection: &Connection) -> Result<Option<MemberTeamDto>> {
        let bounded = self.clone().limit(self.limit.map_or(1, |l| l.min(1)));
        Ok(bounded.fetch(connection)?.into_iter().next())
    }

    /// Number of matching rows; ordering and paging are ignored.
    pub fn fetch_count(&self, connection: &Connection) -> Result<u64> {
        let SqlFragment { sql: where_sql, params } = self.predicate.to_sql();
        let sql = format!("select count(*) {FROM_MEMBER_JOIN_TEAM} where {where_sql}");
        debug!(%sql, params = params.len(), "count");
        let count: i64 = connection
            .prepare_cached(&sql)?
            .query_row(params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub fn age_summary(&self, connection: &Connection) -> Result<AgeSummary> {
        let SqlFragment { sql: where_sql, params } = self.predicate.to_sql();
        let sql = format!(
            "select count(*), coalesce(sum(m.age), 0), avg(m.age), max(m.age), min(m.age) \
             {FROM_MEMBER_JOIN_TEAM} where {where_sql}"
        );
        debug!(%sql, params = params.len(), "age summary");
        let summary = connection
            .prepare_cached(&sql)?
            .query_row(params_from_iter(params.iter()), |row| {
                let count: i64 = row.get(0)?;
                Ok(AgeSummary {
                    count: u64::try_from(count).unwrap_or_default(),
                    sum: row.get(1)?,
                    avg: row.get(2)?,
                    max: row.get(3)?,
                    min: row.get(4)?,
                })
            })?;
        Ok(summary)
    }

    /// Average age per team; members without a team are left out.
    pub fn team_average_ages(&self, connection: &Connection) -> Result<Vec<TeamAverageAge>> {
        let SqlFragment { sql: where_sql, params } = self.predicate.to_sql();
        let sql = format!(
            "select t.name, avg(m.age) from member m join team t on t.team_id = m.team_id \
             where {where_sql} group by t.name order by t.name"
        );
        debug!(%sql, params = params.len(), "team average ages");
        let mut statement = connection.prepare_cached(&sql)?;
        let rows = statement
            .query_map(params_from_iter(params.iter()), |row| {
                Ok(TeamAverageAge {
                    team_name: row.get(0)?,
                    average_age: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
