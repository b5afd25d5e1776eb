use memberquery::MemberQueryError;
use memberquery::entity::{Member, NewMember};
use memberquery::path::{member, team};
use memberquery::projection::{MemberDto, MemberTeamDto};
use memberquery::query::MemberQuery;
use memberquery::repository::MemberRepository;
use memberquery::sample;
use memberquery::settings::Settings;

fn setup() -> MemberRepository {
    let repository = MemberRepository::open(&Settings::default()).unwrap();
    sample::seed(&repository).unwrap();
    repository
}

fn run<T>(
    repository: &MemberRepository,
    f: impl FnOnce(&rusqlite::Connection) -> memberquery::Result<T>,
) -> T {
    repository.with_persistor(|p| f(p.connection())).unwrap()
}

#[test]
fn sort_with_nulls_last() {
    let repository = setup();
    repository.save(NewMember::anonymous(100)).unwrap();
    repository.save(NewMember::new("member5", 100)).unwrap();
    repository.save(NewMember::new("member6", 100)).unwrap();

    let query = MemberQuery::new()
        .filter(member::AGE.eq(100))
        .order_by(member::AGE.desc())
        .order_by(member::USERNAME.asc().nulls_last());
    let rows = run(&repository, |c| query.fetch(c));
    let names: Vec<Option<&str>> = rows.iter().map(|r| r.username.as_deref()).collect();
    assert_eq!(names, vec![Some("member5"), Some("member6"), None]);

    let query = MemberQuery::new()
        .filter(member::AGE.eq(100))
        .order_by(member::USERNAME.asc().nulls_first());
    let first = run(&repository, |c| query.fetch_first(c)).unwrap();
    assert_eq!(first.username, None);
}

#[test]
fn offset_and_limit() {
    let repository = setup();
    let query = MemberQuery::new()
        .order_by(member::USERNAME.desc())
        .offset(1)
        .limit(2);
    let rows = run(&repository, |c| query.fetch(c));
    let names: Vec<&str> = rows.iter().filter_map(|r| r.username.as_deref()).collect();
    assert_eq!(names, vec!["member3", "member2"]);

    // offset without a limit runs to the end
    let query = MemberQuery::new().order_by(member::ID.asc()).offset(3);
    let rows = run(&repository, |c| query.fetch(c));
    assert_eq!(rows.len(), 1);
}

#[test]
fn count_ignores_paging() {
    let repository = setup();
    let query = MemberQuery::new().filter(team::NAME.eq("teamA")).limit(1);
    assert_eq!(run(&repository, |c| query.fetch_count(c)), 2);
    assert_eq!(run(&repository, |c| query.fetch(c)).len(), 1);
}

#[test]
fn fetch_one_and_unique() {
    let repository = setup();
    let query = MemberQuery::new().filter(member::USERNAME.eq("member1"));
    let one = run(&repository, |c| query.fetch_one(c));
    assert_eq!(one.map(|r| r.age), Some(10));

    let query = MemberQuery::new().filter(member::USERNAME.eq("ghost"));
    let none = run(&repository, |c| query.fetch_one(c));
    assert!(none.is_none());

    let query = MemberQuery::new().filter(team::NAME.eq("teamB"));
    let err = repository
        .with_persistor(|p| query.fetch_one(p.connection()))
        .unwrap_err();
    assert!(matches!(err, MemberQueryError::NonUnique));

    let query = MemberQuery::new().filter(member::AGE.gt(99));
    let err = repository
        .with_persistor(|p| query.fetch_unique(p.connection()))
        .unwrap_err();
    assert!(matches!(err, MemberQueryError::NotFound));
}

#[test]
fn fetch_one_and_first_respect_an_existing_limit() {
    let repository = setup();
    let several = MemberQuery::new().order_by(member::AGE.desc());

    // the caller's limit applies before uniqueness is judged
    let one = run(&repository, |c| several.clone().limit(1).fetch_one(c));
    assert_eq!(one.map(|r| r.age), Some(40));
    let nothing = run(&repository, |c| several.clone().limit(0).fetch_one(c));
    assert!(nothing.is_none());

    let first = run(&repository, |c| several.clone().limit(0).fetch_first(c));
    assert!(first.is_none());
    let first = run(&repository, |c| several.clone().offset(1).fetch_first(c));
    assert_eq!(first.map(|r| r.age), Some(30));
}

#[test]
fn projections() {
    let repository = setup();
    let query = MemberQuery::new().filter(member::AGE.goe(30)).order_by(member::AGE.asc());
    let dtos: Vec<MemberDto> = run(&repository, |c| query.fetch_as(c));
    assert_eq!(
        dtos,
        vec![
            MemberDto { username: Some("member3".into()), age: 30 },
            MemberDto { username: Some("member4".into()), age: 40 },
        ]
    );
    let members: Vec<Member> = run(&repository, |c| query.fetch_as(c));
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.team_id().is_some()));

    let sql = query.to_sql::<MemberDto>().sql;
    assert!(sql.starts_with("select m.username, m.age from member m left join team t"));
}

#[test]
fn members_without_team_still_join() {
    let repository = setup();
    repository.save(NewMember::new("loner", 50)).unwrap();
    let query = MemberQuery::new().filter(team::NAME.is_null());
    let rows: Vec<MemberTeamDto> = run(&repository, |c| query.fetch(c));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username.as_deref(), Some("loner"));
    assert_eq!(rows[0].team_id, None);
}

#[test]
fn substring_and_alternatives() {
    let repository = setup();
    let query = MemberQuery::new()
        .filter(member::USERNAME.contains("ber4").or(member::AGE.lt(15)))
        .order_by(member::ID.asc());
    let rows = run(&repository, |c| query.fetch(c));
    let ages: Vec<i64> = rows.iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![10, 40]);
}

#[test]
fn aggregation() {
    let repository = setup();
    let summary = run(&repository, |c| MemberQuery::new().age_summary(c));
    assert_eq!(summary.count, 4);
    assert_eq!(summary.sum, 100);
    assert_eq!(summary.avg, Some(25.0));
    assert_eq!(summary.max, Some(40));
    assert_eq!(summary.min, Some(10));

    let query = MemberQuery::new().filter(member::AGE.gt(100));
    let empty = run(&repository, |c| query.age_summary(c));
    assert_eq!(empty.count, 0);
    assert_eq!(empty.sum, 0);
    assert_eq!(empty.avg, None);
}

#[test]
fn average_age_per_team() {
    let repository = setup();
    repository.save(NewMember::new("loner", 99)).unwrap();
    let teams = run(&repository, |c| MemberQuery::new().team_average_ages(c));
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].team_name, "teamA");
    assert_eq!(teams[0].average_age, 15.0);
    assert_eq!(teams[1].team_name, "teamB");
    assert_eq!(teams[1].average_age, 35.0);
}
