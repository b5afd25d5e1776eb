//! The two-team, four-member data set used by the demo binary and the tests.

use crate::entity::{Member, NewMember, Team};
use crate::error::Result;
use crate::repository::MemberRepository;

pub struct SampleData {
    pub team_a: Team,
    pub team_b: Team,
    /// member1..member4, aged 10, 20, 30 and 40.
    pub members: Vec<Member>,
}

pub fn seed(repository: &MemberRepository) -> Result<SampleData> {
    let team_a = repository.save_team("teamA")?;
    let team_b = repository.save_team("teamB")?;
    let members = vec![
        repository.save(NewMember::new("member1", 10).in_team(&team_a))?,
        repository.save(NewMember::new("member2", 20).in_team(&team_a))?,
        repository.save(NewMember::new("member3", 30).in_team(&team_b))?,
        repository.save(NewMember::new("member4", 40).in_team(&team_b))?,
    ];
    Ok(SampleData {
        team_a,
        team_b,
        members,
    })
}

/// Seeds only a store without members; `None` when data was already there.
pub fn seed_if_empty(repository: &MemberRepository) -> Result<Option<SampleData>> {
    if !repository.find_all()?.is_empty() {
        return Ok(None);
    }
    seed(repository).map(Some)
}
