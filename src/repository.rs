use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::compose::compose;
use crate::condition::SearchCondition;
use crate::entity::{Member, MemberId, NewMember, Team};
use crate::error::{MemberQueryError, Result};
use crate::path::member;
use crate::persist::Persistor;
use crate::predicate::Predicate;
use crate::projection::MemberTeamDto;
use crate::query::MemberQuery;
use crate::settings::{SearchSettings, Settings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    /// `None` falls back to the configured default page size.
    pub size: Option<u64>,
}

impl PageRequest {
    pub fn new(offset: u64, size: u64) -> Self {
        Self {
            offset,
            size: Some(size),
        }
    }
    pub fn first() -> Self {
        Self { offset: 0, size: None }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Rows matching the condition regardless of paging.
    pub total: u64,
    pub offset: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.offset + (self.content.len() as u64) < self.total
    }
}

/// Member storage and search over a single serialized connection.
pub struct MemberRepository {
    persistor: Mutex<Persistor>,
    settings: SearchSettings,
}

impl MemberRepository {
    pub fn new(persistor: Persistor, settings: SearchSettings) -> Self {
        Self {
            persistor: Mutex::new(persistor),
            settings,
        }
    }

    pub fn open(settings: &Settings) -> Result<Self> {
        let persistor = Persistor::open(&settings.persistence_mode())?;
        Ok(Self::new(persistor, settings.search.clone()))
    }

    pub fn search_settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Runs `f` while holding the connection.
    pub fn with_persistor<T>(&self, f: impl FnOnce(&mut Persistor) -> Result<T>) -> Result<T> {
        let mut persistor = self.lock()?;
        f(&mut *persistor)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Persistor>> {
        self.persistor
            .lock()
            .map_err(|e| MemberQueryError::Lock(e.to_string()))
    }

    pub fn save_team(&self, name: &str) -> Result<Team> {
        self.lock()?.persist_team(name)
    }

    pub fn save(&self, member: NewMember) -> Result<Member> {
        self.lock()?.persist_member(member)
    }

    pub fn find_by_id(&self, id: MemberId) -> Result<Option<Member>> {
        self.lock()?.find_member(id)
    }

    pub fn find_all(&self) -> Result<Vec<Member>> {
        self.lock()?.find_members(Predicate::True)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Vec<Member>> {
        self.lock()?.find_members(member::USERNAME.eq(username))
    }

    /// Members matching `condition`, joined with their team, in identity order.
    ///
    /// A condition without criteria reads the whole table; that is refused
    /// when `allow_unconstrained` is off.
    pub fn search(&self, condition: &SearchCondition) -> Result<Vec<MemberTeamDto>> {
        let predicate = compose(condition);
        if predicate.is_match_all() && !self.settings.allow_unconstrained {
            warn!("rejected search without criteria");
            return Err(MemberQueryError::Unconstrained);
        }
        debug!(%predicate, "search");
        let query = MemberQuery::new()
            .filter(predicate)
            .order_by(member::ID.asc());
        query.fetch(self.lock()?.connection())
    }

    /// One page of [`search`](Self::search) results plus the total count.
    pub fn search_page(
        &self,
        condition: &SearchCondition,
        page: PageRequest,
    ) -> Result<Page<MemberTeamDto>> {
        let size = page
            .size
            .unwrap_or(self.settings.default_page_size)
            .min(self.settings.max_page_size);
        let predicate = compose(condition);
        debug!(%predicate, offset = page.offset, size, "search page");
        let query = MemberQuery::new()
            .filter(predicate)
            .order_by(member::ID.asc());
        let persistor = self.lock()?;
        let total = query.fetch_count(persistor.connection())?;
        let content = query
            .offset(page.offset)
            .limit(size)
            .fetch(persistor.connection())?;
        Ok(Page {
            content,
            total,
            offset: page.offset,
            size,
        })
    }

    pub fn update_username_where(&self, predicate: &Predicate, username: &str) -> Result<usize> {
        self.lock()?.update_username_where(predicate, username)
    }

    pub fn add_age_where(&self, predicate: &Predicate, delta: i64) -> Result<usize> {
        self.lock()?.add_age_where(predicate, delta)
    }

    pub fn delete_where(&self, predicate: &Predicate) -> Result<usize> {
        self.lock()?.delete_where(predicate)
    }
}
