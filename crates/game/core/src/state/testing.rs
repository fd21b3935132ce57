//! Shared fixtures for unit tests.

use super::{Allegiance, Position, Unit, UnitId, UnitTemplate};
use crate::skill::Element;
use crate::stats::Attributes;

pub(crate) fn template(name: &str) -> UnitTemplate {
    UnitTemplate {
        name: name.to_string(),
        level: 5,
        attributes: Attributes::new(10, 10, 10, 10, 10, 10),
        element: Element::Neutral,
        move_range: 3,
        attack_range: 1,
        ranged_attack: 0,
        skills: Vec::new(),
    }
}

pub(crate) fn unit_at(id: u32, allegiance: Allegiance, position: Position) -> Unit {
    Unit::from_template(UnitId(id), &template("knight"), allegiance, position)
}

pub(crate) fn unit(id: u32) -> Unit {
    unit_at(id, Allegiance::Player, Position::new(5, 5))
}
