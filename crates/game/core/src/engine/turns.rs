use crate::state::{CombatantId, Roster};

/// This round's acting order: every combatant, fastest first.
///
/// The sort is stable, so equal speeds keep roster order (Dreamers before
/// Fixers, then squad order). The order is a snapshot; speed changes during
/// the round take effect next round. Dead combatants are included and skipped
/// by the caller when their turn comes up.
pub fn turn_order(roster: &Roster) -> Vec<CombatantId> {
    let mut order: Vec<(CombatantId, i32)> = roster.iter().map(|c| (c.id, c.spd)).collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::roster;

    #[test]
    fn fastest_first_with_stable_ties() {
        let mut roster = roster(&["Ana", "Bo"], &["Cy", "Di"]);
        roster[CombatantId(0)].spd = 10;
        roster[CombatantId(1)].spd = 30;
        roster[CombatantId(2)].spd = 10;
        roster[CombatantId(3)].spd = 20;
        roster[CombatantId(3)].hp = 0;

        assert_eq!(
            turn_order(&roster),
            vec![CombatantId(1), CombatantId(3), CombatantId(0), CombatantId(2)]
        );
    }
}
