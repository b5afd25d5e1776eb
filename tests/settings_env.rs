// Environment overrides live in their own test binary so the variables set
// here cannot leak into the default-value tests in settings.rs.
use memberquery::condition::SearchCondition;
use memberquery::error::MemberQueryError;
use memberquery::repository::{MemberRepository, PageRequest};
use memberquery::sample;
use memberquery::settings::Settings;

#[test]
fn environment_overrides_search_settings() {
    // SAFETY: the only test in this binary, so no other thread reads the environment.
    unsafe {
        std::env::set_var("MEMBERQUERY__SEARCH__ALLOW_UNCONSTRAINED", "false");
        std::env::set_var("MEMBERQUERY__SEARCH__MAX_PAGE_SIZE", "7");
    }
    let settings = Settings::load(None);
    unsafe {
        std::env::remove_var("MEMBERQUERY__SEARCH__ALLOW_UNCONSTRAINED");
        std::env::remove_var("MEMBERQUERY__SEARCH__MAX_PAGE_SIZE");
    }
    let settings = settings.expect("settings");
    assert!(!settings.search.allow_unconstrained);
    assert_eq!(settings.search.max_page_size, 7);
    assert_eq!(settings.search.default_page_size, 20);

    let repository = MemberRepository::open(&settings).expect("repository");
    sample::seed(&repository).unwrap();
    let err = repository.search(&SearchCondition::new()).unwrap_err();
    assert!(matches!(err, MemberQueryError::Unconstrained));
    let page = repository
        .search_page(&SearchCondition::new(), PageRequest::new(0, 50))
        .unwrap();
    assert_eq!(page.size, 7);
    assert_eq!(page.total, 4);
}
