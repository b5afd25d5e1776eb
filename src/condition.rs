use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Optional, independent criteria for one member search.
///
/// Every field is absent by default; an absent field never narrows the
/// result. Bounds are inclusive and are not checked against each other, so
/// `age_goe > age_loe` simply matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i64>,
    pub age_loe: Option<i64>,
}

impl SearchCondition {
    pub fn new() -> Self {
        Self::default()
    }
    /// Parses the JSON form, e.g. `{"ageGoe": 35, "teamName": "teamB"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }
    pub fn age_goe(mut self, age: i64) -> Self {
        self.age_goe = Some(age);
        self
    }
    pub fn age_loe(mut self, age: i64) -> Self {
        self.age_loe = Some(age);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.team_name.is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
    }
}
