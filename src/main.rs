use memberquery::condition::SearchCondition;
use memberquery::repository::MemberRepository;
use memberquery::settings::Settings;
use memberquery::{sample, telemetry};
use std::path::PathBuf;
use tracing::info;

// Usage: memberquery ['{"ageGoe": 35, "teamName": "teamB"}']
// MEMBERQUERY_CONFIG may point at a settings file.
fn main() -> memberquery::Result<()> {
    let config_path = std::env::var_os("MEMBERQUERY_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;
    telemetry::init(&settings.log_filter);

    let repository = MemberRepository::open(&settings)?;
    match sample::seed_if_empty(&repository)? {
        Some(data) => info!(teams = 2, members = data.members.len(), "seeded sample data"),
        None => info!("store already holds members; not seeding"),
    }

    let condition = match std::env::args().nth(1) {
        Some(json) => SearchCondition::from_json(&json)?,
        None => SearchCondition::new(),
    };
    let rows = repository.search(&condition)?;
    info!(rows = rows.len(), "search complete");
    for row in rows {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}
