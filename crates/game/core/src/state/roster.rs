use super::{Position, Unit, UnitId};
use crate::grid::Occupancy;

/// The two sides of an encounter. Player, allies and summons share the
/// party roster; order within each roster is the acting order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rosters {
    pub party: Vec<Unit>,
    pub enemies: Vec<Unit>,
}

impl Rosters {
    pub fn new(party: Vec<Unit>, enemies: Vec<Unit>) -> Self {
        Self { party, enemies }
    }

    /// Appends a unit to the roster matching its allegiance.
    pub fn insert(&mut self, unit: Unit) {
        if unit.is_party() {
            self.party.push(unit);
        } else {
            self.enemies.push(unit);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.party.iter().chain(self.enemies.iter())
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.party
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|u| u.id == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Unit> {
        self.iter().filter(|u| u.is_alive())
    }

    pub fn living_party(&self) -> impl Iterator<Item = &Unit> {
        self.party.iter().filter(|u| u.is_alive())
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Unit> {
        self.enemies.iter().filter(|u| u.is_alive())
    }

    /// Living unit standing on `position`.
    pub fn at(&self, position: Position) -> Option<&Unit> {
        self.living().find(|u| u.position == position)
    }

    /// Ids in acting order (party first).
    pub fn ids(&self) -> Vec<UnitId> {
        self.iter().map(|u| u.id).collect()
    }

    /// Removes every unit at 0 HP and returns them in roster order.
    pub fn remove_dead(&mut self) -> Vec<Unit> {
        let mut dead = Vec::new();
        for roster in [&mut self.party, &mut self.enemies] {
            let (alive, fallen): (Vec<Unit>, Vec<Unit>) =
                roster.drain(..).partition(|u| u.is_alive());
            *roster = alive;
            dead.extend(fallen);
        }
        dead
    }
}

impl Occupancy for Rosters {
    fn is_occupied(&self, pos: Position) -> bool {
        self.at(pos).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Allegiance;
    use crate::state::testing::unit_at;

    #[test]
    fn remove_dead_keeps_order() {
        let mut rosters = Rosters::new(
            vec![
                unit_at(0, Allegiance::Player, Position::new(1, 1)),
                unit_at(1, Allegiance::Ally, Position::new(2, 1)),
                unit_at(2, Allegiance::Ally, Position::new(3, 1)),
            ],
            vec![unit_at(10, Allegiance::Enemy, Position::new(5, 5))],
        );
        rosters.unit_mut(UnitId(1)).unwrap().hp = 0;
        rosters.unit_mut(UnitId(10)).unwrap().hp = 0;

        let dead: Vec<_> = rosters.remove_dead().into_iter().map(|u| u.id).collect();
        assert_eq!(dead, vec![UnitId(1), UnitId(10)]);
        assert_eq!(rosters.ids(), vec![UnitId(0), UnitId(2)]);
        assert!(rosters.enemies.is_empty());
    }

    #[test]
    fn occupancy_ignores_the_dead() {
        let mut rosters = Rosters::default();
        rosters.insert(unit_at(10, Allegiance::Enemy, Position::new(4, 4)));
        assert!(rosters.is_occupied(Position::new(4, 4)));

        rosters.unit_mut(UnitId(10)).unwrap().hp = 0;
        assert!(!rosters.is_occupied(Position::new(4, 4)));
        assert!(rosters.at(Position::new(4, 4)).is_none());
    }
}
