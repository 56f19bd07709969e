use crate::compute::Memberships;

/// Plain-text report of `Memberships`: a block per player, one line per team.
pub fn write_report<W: std::io::Write>(
    mut writer: W,
    memberships: &Memberships,
) -> Result<(), anyhow::Error> {
    for (player, teams) in memberships.players() {
        writeln!(writer, "Player: {player}")?;
        for (team, days) in teams {
            writeln!(writer, "  Team: {team} - Total Membership Days: {days}")?;
        }
        writeln!(writer, "--------------------\n")?;
    }
    writer.flush()?;
    Ok(())
}
