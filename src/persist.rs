// used for persistence
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::entity::{Member, MemberId, NewMember, Team, TeamId};
use crate::error::Result;
use crate::predicate::{Predicate, SqlFragment, Value};
use crate::projection::Projection;
use crate::query::{FROM_MEMBER_JOIN_TEAM, MemberQuery};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(PathBuf),
}

// ------------- Persistence -------------
pub struct Persistor {
    connection: Connection,
}

impl Persistor {
    pub fn open(mode: &PersistenceMode) -> Result<Self> {
        let connection = match mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        debug!(?mode, "opened connection");
        Self::new(connection)
    }

    /// Takes over `connection` and makes sure the schema exists.
    pub fn new(connection: Connection) -> Result<Self> {
        connection.execute_batch(
            "
            create table if not exists team (
                team_id integer not null,
                name text not null,
                constraint referenceable_team_id primary key (
                    team_id
                )
            );
            create table if not exists member (
                member_id integer not null,
                username text null,
                age integer not null,
                team_id integer null,
                constraint referenceable_member_id primary key (
                    member_id
                ),
                constraint member_belongs_to_team foreign key (
                    team_id
                ) references team(team_id)
            );
            ",
        )?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn persist_team(&mut self, name: &str) -> Result<Team> {
        self.connection
            .prepare_cached("insert into team (name) values (?)")?
            .execute(params![name])?;
        let team = Team::new(TeamId(self.connection.last_insert_rowid()), name.to_owned());
        debug!(%team, "persisted");
        Ok(team)
    }

    pub fn persist_member(&mut self, new: NewMember) -> Result<Member> {
        self.connection
            .prepare_cached("insert into member (username, age, team_id) values (?, ?, ?)")?
            .execute(params![&new.username, &new.age, &new.team_id])?;
        let member = Member::new(
            MemberId(self.connection.last_insert_rowid()),
            new.username,
            new.age,
            new.team_id,
        );
        debug!(%member, "persisted");
        Ok(member)
    }

    pub fn find_member(&self, id: MemberId) -> Result<Option<Member>> {
        let columns: Vec<&str> = Member::COLUMNS.iter().map(|c| c.sql()).collect();
        let sql = format!("select {} from member m where m.member_id = ?", columns.join(", "));
        let member = self
            .connection
            .prepare_cached(&sql)?
            .query_row(params![id], |row| Member::from_row(row))
            .optional()?;
        Ok(member)
    }

    pub fn find_members(&self, predicate: Predicate) -> Result<Vec<Member>> {
        MemberQuery::new()
            .filter(predicate)
            .order_by(crate::path::member::ID.asc())
            .fetch_as(&self.connection)
    }

    /// Bulk update bypassing any loaded entities; returns the affected row count.
    pub fn update_username_where(
        &mut self,
        predicate: &Predicate,
        username: &str,
    ) -> Result<usize> {
        let affected = self.mutate_where(
            "update member set username = ?",
            vec![Value::from(username)],
            predicate,
        )?;
        info!(affected, %predicate, "bulk username update");
        Ok(affected)
    }

    pub fn add_age_where(&mut self, predicate: &Predicate, delta: i64) -> Result<usize> {
        let affected = self.mutate_where(
            "update member set age = age + ?",
            vec![Value::Integer(delta)],
            predicate,
        )?;
        info!(affected, delta, %predicate, "bulk age update");
        Ok(affected)
    }

    pub fn delete_where(&mut self, predicate: &Predicate) -> Result<usize> {
        let affected = self.mutate_where("delete from member", Vec::new(), predicate)?;
        info!(affected, %predicate, "bulk delete");
        Ok(affected)
    }

    // predicates may refer to the team, so rows are picked through the join
    fn mutate_where(
        &mut self,
        head: &str,
        mut params: Vec<Value>,
        predicate: &Predicate,
    ) -> Result<usize> {
        let SqlFragment {
            sql: where_sql,
            params: where_params,
        } = predicate.to_sql();
        let sql = format!(
            "{head} where member_id in \
             (select m.member_id {FROM_MEMBER_JOIN_TEAM} where {where_sql})"
        );
        params.extend(where_params);
        debug!(%sql, params = params.len(), "mutate");
        let affected = self
            .connection
            .prepare_cached(&sql)?
            .execute(params_from_iter(params.iter()))?;
        Ok(affected)
    }
}
