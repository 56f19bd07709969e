use crate::{
    calendar,
    data::{Error, Membership},
    read::MembershipUser,
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Team name to total days, in the order teams were first seen.
pub type Teams = IndexMap<String, i64>;

type Interval = (NaiveDate, NaiveDate);

/// The accumulator: player to team to total days. Players and teams keep the
/// order in which they first showed up in the input.
#[derive(Debug, Default)]
pub struct Memberships {
    players: IndexMap<String, Teams>,
    // converted bounds of every interval, per (player, team)
    intervals: HashMap<(String, String), Vec<Interval>>,
}

fn overlaps((start, end): Interval, (other_start, other_end): Interval) -> bool {
    start <= other_end && end >= other_start
}

impl Memberships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_days(&self, player: &str, team: &str) -> Option<i64> {
        self.players.get(player)?.get(team).copied()
    }

    pub fn players(&self) -> impl Iterator<Item = (&str, &Teams)> {
        self.players
            .iter()
            .map(|(player, teams)| (player.as_str(), teams))
    }

    /// Records `interval` for the player and team, logging every earlier
    /// interval it shares days with. Their days still get added up.
    fn record_interval(&mut self, membership: &Membership, interval: Interval) {
        let seen = self
            .intervals
            .entry((membership.player.clone(), membership.team.clone()))
            .or_default();
        for &(first_start, first_end) in seen.iter().filter(|&&other| overlaps(other, interval)) {
            tracing::warn!(
                player = %membership.player,
                team = %membership.team,
                first = %format!("{first_start}..{first_end}"),
                second = %format!("{}..{}", interval.0, interval.1),
                "overlapping memberships"
            );
        }
        seen.push(interval);
    }
}

impl MembershipUser for Memberships {
    fn use_membership(&mut self, membership: Membership) -> Result<(), Error> {
        let (start, end) = membership.dates()?;
        let days = calendar::inclusive_days(start, end);
        self.record_interval(&membership, (start, end));
        let total = self
            .players
            .entry(membership.player.clone())
            .or_default()
            .entry(membership.team.clone())
            .or_insert(0);
        *total += days;
        tracing::trace!(
            player = %membership.player,
            team = %membership.team,
            days,
            total = *total,
            "membership added"
        );
        Ok(())
    }
}

/// Sums up every row into a fresh accumulator. Stops at the first row whose
/// dates can't be converted, so either all rows count or nothing is returned.
pub fn aggregate<I>(rows: I) -> Result<Memberships, Error>
where
    I: IntoIterator<Item = Membership>,
{
    let mut memberships = Memberships::new();
    for row in rows {
        memberships.use_membership(row)?;
    }
    Ok(memberships)
}
