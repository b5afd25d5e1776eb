use memberquery::condition::SearchCondition;
use memberquery::entity::NewMember;
use memberquery::persist::{PersistenceMode, Persistor};
use memberquery::repository::MemberRepository;
use memberquery::sample;
use memberquery::settings::{SearchSettings, Settings};
use std::path::PathBuf;

#[test]
fn in_memory_mode_allows_basic_operations() {
    let mut persistor = Persistor::open(&PersistenceMode::InMemory).expect("persistor");
    let team = persistor.persist_team("teamA").unwrap();
    let member = persistor.persist_member(NewMember::new("member1", 10).in_team(&team)).unwrap();
    assert_eq!(persistor.find_member(member.id()).unwrap(), Some(member));
}

#[test]
fn file_mode_survives_reopen() {
    // Use a temp path, unique to this test
    let path = PathBuf::from("test_memberquery_temp.db");
    let _ = std::fs::remove_file(&path);
    let settings = Settings {
        database_path: Some(path.clone()),
        ..Settings::default()
    };
    assert_eq!(settings.persistence_mode(), PersistenceMode::File(path.clone()));
    {
        let repository = MemberRepository::open(&settings).expect("repository");
        sample::seed(&repository).unwrap();
    }
    let reopened = MemberRepository::new(
        Persistor::open(&settings.persistence_mode()).unwrap(),
        SearchSettings::default(),
    );
    let rows = reopened.search(&SearchCondition::new().team_name("teamB")).unwrap();
    assert_eq!(rows.len(), 2);
    // Clean up
    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn reopened_file_is_seeded_once() {
    let path = PathBuf::from("test_memberquery_seed_once.db");
    let _ = std::fs::remove_file(&path);
    let settings = Settings {
        database_path: Some(path.clone()),
        ..Settings::default()
    };
    {
        let repository = MemberRepository::open(&settings).expect("repository");
        let data = sample::seed_if_empty(&repository).unwrap();
        assert_eq!(data.map(|d| d.members.len()), Some(4));
    }
    let reopened = MemberRepository::open(&settings).expect("repository");
    assert!(sample::seed_if_empty(&reopened).unwrap().is_none());
    assert_eq!(reopened.find_all().unwrap().len(), 4);
    assert_eq!(reopened.find_by_username("member1").unwrap().len(), 1);
    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
