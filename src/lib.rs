//! Memberquery – type-safe, dynamically composed search predicates over a member/team store.
//!
//! The crate is built around one idea: a search request is a set of optional,
//! independent criteria, and turning it into a filter must neither fail when
//! some criteria are missing nor silently drop the ones that are present.
//!
//! * A [`condition::SearchCondition`] holds the optional criteria
//!   (username, team name, minimum and maximum age).
//! * [`compose::compose`] folds the present criteria into a single
//!   [`predicate::Predicate`] with AND; no criteria yields the explicit
//!   match-all predicate.
//! * [`path`] offers typed column paths (`member::AGE.goe(35)`,
//!   `team::NAME.eq("teamB")`) so incompatible comparisons do not compile.
//!
//! ## Modules
//! * [`predicate`] – The predicate tree, SQL rendering and in-memory evaluation.
//! * [`path`] – Typed column paths producing predicates and orderings.
//! * [`condition`] / [`compose`] – Search criteria and the composer.
//! * [`query`] – A query object (filter, ordering, paging, projections,
//!   aggregates) executed by SQLite.
//! * [`projection`] – Flat result rows such as [`projection::MemberTeamDto`].
//! * [`persist`] – Schema creation, inserts and predicate-driven bulk mutations.
//! * [`repository`] – The member repository with `search` and `search_page`.
//! * [`settings`] / [`telemetry`] – Configuration and logging setup.
//!
//! ## Quick Start
//! ```
//! use memberquery::condition::SearchCondition;
//! use memberquery::repository::MemberRepository;
//! use memberquery::{sample, settings::Settings};
//! let repository = MemberRepository::open(&Settings::default()).unwrap();
//! sample::seed(&repository).unwrap();
//! let condition = SearchCondition::new().age_goe(35).age_loe(40).team_name("teamB");
//! let rows = repository.search(&condition).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].username.as_deref(), Some("member4"));
//! ```
//!
//! ## Unconstrained searches
//! A condition without criteria matches every row. That is not an error in
//! the composer, but reading a large table in one go is rarely intended; set
//! `search.allow_unconstrained = false` to make [`repository::MemberRepository::search`]
//! refuse it and route such requests through `search_page`.

pub mod compose;
pub mod condition;
pub mod entity;
pub mod error;
pub mod path;
pub mod persist;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod repository;
pub mod sample;
pub mod settings;
pub mod telemetry;

pub use error::{MemberQueryError, Result};
