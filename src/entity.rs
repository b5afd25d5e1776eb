// used for persistence
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

// used to print out readable forms of an entity
use std::fmt;

// ------------- Identities -------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

macro_rules! sql_identity {
    ($($id:ident),+) => {
        $(
            impl ToSql for $id {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    self.0.to_sql()
                }
            }
            impl FromSql for $id {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    i64::column_result(value).map($id)
                }
            }
            impl fmt::Display for $id {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )+
    };
}
sql_identity!(MemberId, TeamId);

// ------------- Team -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Team {
    id: TeamId,
    name: String,
}

impl Team {
    pub fn new(id: TeamId, name: String) -> Self {
        Self { id, name }
    }
    pub fn id(&self) -> TeamId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Team({}, {})", self.id, self.name)
    }
}

// ------------- Member -------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Member {
    id: MemberId,
    username: Option<String>,
    age: i64,
    team_id: Option<TeamId>,
}

impl Member {
    pub fn new(id: MemberId, username: Option<String>, age: i64, team_id: Option<TeamId>) -> Self {
        Self {
            id,
            username,
            age,
            team_id,
        }
    }
    pub fn id(&self) -> MemberId {
        self.id
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
    pub fn age(&self) -> i64 {
        self.age
    }
    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }
}
impl fmt::Display for Member {
    // the team is left out on purpose, printing it is the caller's business
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member({}, {}, {})",
            self.id,
            self.username.as_deref().unwrap_or("<null>"),
            self.age
        )
    }
}

/// A member that has not been assigned an identity yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMember {
    pub username: Option<String>,
    pub age: i64,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    pub fn new(username: impl Into<String>, age: i64) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }
    /// A member without a username; sorts according to the null ordering in use.
    pub fn anonymous(age: i64) -> Self {
        Self {
            username: None,
            age,
            team_id: None,
        }
    }
    pub fn in_team(mut self, team: &Team) -> Self {
        self.team_id = Some(team.id());
        self
    }
}
