use memberquery::compose::{clauses, compose};
use memberquery::condition::SearchCondition;
use memberquery::path::{member, team};
use memberquery::predicate::{Predicate, Value};

#[test]
fn no_criteria_is_match_all() {
    let predicate = compose(&SearchCondition::new());
    assert_eq!(predicate, Predicate::True);
    assert!(predicate.is_match_all());
    assert_eq!(predicate.to_sql().sql, "1 = 1");
    assert!(predicate.to_sql().params.is_empty());
}

#[test]
fn single_criterion_is_the_atomic_comparison() {
    assert_eq!(
        compose(&SearchCondition::new().username("member1")),
        member::USERNAME.eq("member1")
    );
    assert_eq!(
        compose(&SearchCondition::new().team_name("teamB")),
        team::NAME.eq("teamB")
    );
    assert_eq!(compose(&SearchCondition::new().age_goe(35)), member::AGE.goe(35));
    assert_eq!(compose(&SearchCondition::new().age_loe(40)), member::AGE.loe(40));
}

#[test]
fn criteria_are_anded_in_declaration_order() {
    let condition = SearchCondition::new().age_loe(40).age_goe(35).team_name("teamB");
    let predicate = compose(&condition);
    assert_eq!(
        predicate,
        Predicate::And(vec![
            team::NAME.eq("teamB"),
            member::AGE.goe(35),
            member::AGE.loe(40),
        ])
    );
    let fragment = predicate.to_sql();
    assert_eq!(fragment.sql, "(t.name = ? AND m.age >= ? AND m.age <= ?)");
    assert_eq!(
        fragment.params,
        vec![Value::from("teamB"), Value::Integer(35), Value::Integer(40)]
    );
}

#[test]
fn composing_twice_gives_the_same_predicate() {
    let condition = SearchCondition::new().username("member1").age_goe(5);
    assert_eq!(compose(&condition), compose(&condition));
}

#[test]
fn bounds_are_not_validated() {
    // min above max is forwarded as is and simply matches nothing
    let predicate = compose(&SearchCondition::new().age_goe(40).age_loe(35));
    assert_eq!(
        predicate,
        Predicate::And(vec![member::AGE.goe(40), member::AGE.loe(35)])
    );
}

#[test]
fn clause_slots_follow_presence() {
    let slots = clauses(&SearchCondition::new().team_name("teamA"));
    assert!(slots[0].is_none());
    assert_eq!(slots[1], Some(team::NAME.eq("teamA")));
    assert!(slots[2].is_none());
    assert!(slots[3].is_none());
}

#[test]
fn zero_is_a_present_value() {
    let predicate = compose(&SearchCondition::new().age_goe(0));
    assert!(!predicate.is_match_all());
    assert_eq!(predicate, member::AGE.goe(0));
}

#[test]
fn condition_from_json() {
    let json = r#"{"ageGoe": 35, "ageLoe": 40, "teamName": "teamB"}"#;
    let condition = SearchCondition::from_json(json).unwrap();
    assert_eq!(condition, SearchCondition::new().age_goe(35).age_loe(40).team_name("teamB"));
    let empty = SearchCondition::from_json("{}").unwrap();
    assert!(empty.is_empty());
    let err = SearchCondition::from_json(r#"{"ageGoe": "old"}"#).unwrap_err();
    assert!(format!("{err}").contains("Invalid search condition"));
}

#[test]
fn combinators_flatten_and_absorb() {
    let a = member::AGE.gt(1);
    let b = member::AGE.lt(9);
    let c = member::USERNAME.is_null();
    let conjunction = a.clone().and(b.clone()).and(c.clone());
    assert_eq!(conjunction, Predicate::And(vec![a.clone(), b.clone(), c.clone()]));
    assert_eq!(Predicate::True.and(a.clone()), a);
    assert_eq!(a.clone().or(Predicate::True), Predicate::True);
    let disjunction = a.clone().or(b.clone().or(c.clone()));
    assert_eq!(disjunction, Predicate::Or(vec![a, b, c]));
}

#[test]
fn rendering_keeps_values_out_of_sql() {
    let predicate = member::USERNAME
        .contains("'; drop table member; --")
        .or(team::NAME.is_null())
        .not();
    let fragment = predicate.to_sql();
    assert_eq!(fragment.sql, "NOT ((instr(m.username, ?) > 0 OR t.name IS NULL))");
    assert_eq!(fragment.params, vec![Value::from("'; drop table member; --")]);
}

#[test]
fn predicates_cross_threads() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Predicate>();
    let predicate = compose(&SearchCondition::new().age_goe(35));
    let handle = std::thread::spawn(move || predicate.to_sql().params.len());
    assert_eq!(handle.join().unwrap(), 1);
}
