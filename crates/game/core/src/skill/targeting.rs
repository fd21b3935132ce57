//! Skill geometry: legal target cells and affected areas.

use std::collections::{BTreeMap, BTreeSet};

use super::{AreaShape, RangeShape, SkillDescriptor};
use crate::grid::Grid;
use crate::state::{Position, Rosters, Unit, UnitId};

/// Cells the caster may aim `skill` at, with their distance.
///
/// Self skills yield only the caster's cell. Global skills (range 0, not
/// self) yield nothing; the caller resolves them against every valid unit.
/// Ally and heal shapes yield the caster plus living same-side units within
/// Chebyshev range. Cross yields the four orthogonal lines. Everything else
/// yields in-bounds cells at Manhattan distance `1..=range`.
pub fn reachable_skill_cells(
    grid: &Grid,
    rosters: &Rosters,
    caster: &Unit,
    skill: &SkillDescriptor,
) -> BTreeMap<Position, u32> {
    let origin = caster.position;
    let range = skill.range as i32;

    if skill.shape == RangeShape::SelfOnly {
        return BTreeMap::from([(origin, 0)]);
    }
    if skill.is_global() {
        return BTreeMap::new();
    }

    match skill.shape {
        RangeShape::Ally | RangeShape::Heal => {
            let mut cells = BTreeMap::from([(origin, 0)]);
            cells.extend(
                rosters
                    .living()
                    .filter(|u| !u.allegiance.is_hostile_to(caster.allegiance))
                    .map(|u| (u.position, origin.chebyshev(u.position)))
                    .filter(|(_, distance)| *distance <= skill.range),
            );
            cells
        }
        RangeShape::Cross => (1..=range)
            .flat_map(|step| {
                [
                    origin.offset(0, -step),
                    origin.offset(0, step),
                    origin.offset(-step, 0),
                    origin.offset(step, 0),
                ]
            })
            .filter(|cell| grid.contains(*cell))
            .map(|cell| (cell, origin.manhattan(cell)))
            .collect(),
        _ => (-range..=range)
            .flat_map(|dy| (-range..=range).map(move |dx| origin.offset(dx, dy)))
            .filter(|cell| grid.contains(*cell))
            .map(|cell| (cell, origin.manhattan(cell)))
            .filter(|(_, distance)| (1..=skill.range).contains(distance))
            .collect(),
    }
}

/// Cells affected when `skill` is aimed at `target` from `caster`.
pub fn area_of_effect(
    grid: &Grid,
    skill: &SkillDescriptor,
    target: Position,
    caster: Position,
) -> BTreeSet<Position> {
    if skill.shape == RangeShape::Unknown {
        return BTreeSet::new();
    }
    if skill.shape == RangeShape::Line {
        return line_from(grid, caster, target, skill.range);
    }
    if let Some(area) = skill.area.filter(|a| a.radius > 0) {
        let radius = area.radius as i32;
        return (-radius..=radius)
            .flat_map(|dy| (-radius..=radius).map(move |dx| target.offset(dx, dy)))
            .filter(|cell| grid.contains(*cell))
            .filter(|cell| {
                let distance = match area.shape {
                    AreaShape::Diamond => target.manhattan(*cell),
                    AreaShape::Square => target.chebyshev(*cell),
                };
                distance <= area.radius
            })
            .collect();
    }
    if skill.shape == RangeShape::SelfOnly {
        return BTreeSet::from([caster]);
    }
    if grid.contains(target) {
        BTreeSet::from([target])
    } else {
        BTreeSet::new()
    }
}

/// Steps from the caster along the dominant signed axis toward `target`.
fn line_from(grid: &Grid, caster: Position, target: Position, range: u32) -> BTreeSet<Position> {
    let dx = target.x - caster.x;
    let dy = target.y - caster.y;
    let step = if dx == 0 && dy == 0 {
        return BTreeSet::new();
    } else if dx.abs() >= dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    };

    (1..=range as i32)
        .map(|n| caster.offset(step.0 * n, step.1 * n))
        .take_while(|cell| grid.contains(*cell))
        .collect()
}

/// Resolved targets of a skill use.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillTargets {
    pub area: BTreeSet<Position>,
    /// Living units inside the area on the side the skill is aimed at, in
    /// roster order.
    pub units: Vec<UnitId>,
}

/// Resolves a skill use against the current rosters.
///
/// Returns `None` when `target` is not a legal cell for the skill. Global
/// skills ignore `target` and affect every living unit on the aimed side.
pub fn skill_targets(
    grid: &Grid,
    rosters: &Rosters,
    caster: &Unit,
    skill: &SkillDescriptor,
    target: Position,
) -> Option<SkillTargets> {
    let aimed_side = |unit: &&Unit| {
        let hostile = unit.allegiance.is_hostile_to(caster.allegiance);
        if skill.targets_allies() { !hostile } else { hostile }
    };

    if skill.is_global() {
        let units: Vec<&Unit> = rosters.living().filter(aimed_side).collect();
        return Some(SkillTargets {
            area: units.iter().map(|u| u.position).collect(),
            units: units.iter().map(|u| u.id).collect(),
        });
    }

    let cells = reachable_skill_cells(grid, rosters, caster, skill);
    if !cells.contains_key(&target) {
        return None;
    }

    let area = area_of_effect(grid, skill, target, caster.position);
    let units = rosters
        .living()
        .filter(|u| area.contains(&u.position))
        .filter(aimed_side)
        .map(|u| u.id)
        .collect();
    Some(SkillTargets { area, units })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::{AreaOfEffect, RawSkill, SkillKind};
    use crate::state::Allegiance;
    use crate::state::testing::{unit, unit_at};

    fn skill(kind: SkillKind, shape: RangeShape, range: u32) -> SkillDescriptor {
        SkillDescriptor {
            kind,
            shape,
            range,
            ..SkillDescriptor::canonicalize(RawSkill {
                id: "test".to_string(),
                ..RawSkill::default()
            })
        }
    }

    #[test]
    fn self_skill_targets_only_the_caster() {
        let grid = Grid::open(9, 9);
        let caster = unit_at(0, Allegiance::Player, Position::new(5, 5));
        let rosters = Rosters::new(vec![caster.clone()], vec![]);
        let focus = skill(SkillKind::Buff, RangeShape::SelfOnly, 0);

        let cells = reachable_skill_cells(&grid, &rosters, &caster, &focus);
        assert_eq!(cells, BTreeMap::from([(Position::new(5, 5), 0)]));
    }

    #[test]
    fn damage_diamond_excludes_origin() {
        let grid = Grid::open(9, 9);
        let caster = unit(0);
        let rosters = Rosters::new(vec![caster.clone()], vec![]);
        let bolt = skill(SkillKind::Magic, RangeShape::Diamond, 2);

        let cells = reachable_skill_cells(&grid, &rosters, &caster, &bolt);
        assert_eq!(cells.len(), 12);
        assert!(!cells.contains_key(&caster.position));
    }

    #[test]
    fn global_skills_have_no_cells() {
        let grid = Grid::open(9, 9);
        let caster = unit(0);
        let rosters = Rosters::new(vec![caster.clone()], vec![]);
        let mass_heal = skill(SkillKind::Heal, RangeShape::Heal, 0);
        assert!(reachable_skill_cells(&grid, &rosters, &caster, &mass_heal).is_empty());
    }

    #[test]
    fn heal_reaches_allies_by_chebyshev() {
        let grid = Grid::open(9, 9);
        let caster = unit_at(0, Allegiance::Player, Position::new(5, 5));
        let near = unit_at(1, Allegiance::Ally, Position::new(7, 7));
        let far = unit_at(2, Allegiance::Ally, Position::new(8, 5));
        let enemy = unit_at(3, Allegiance::Enemy, Position::new(6, 5));
        let rosters = Rosters::new(vec![caster.clone(), near, far], vec![enemy]);
        let heal = skill(SkillKind::Heal, RangeShape::Heal, 2);

        let cells = reachable_skill_cells(&grid, &rosters, &caster, &heal);
        let expected = BTreeMap::from([(Position::new(5, 5), 0), (Position::new(7, 7), 2)]);
        assert_eq!(cells, expected);
    }

    #[test]
    fn cross_reaches_orthogonal_lines() {
        let grid = Grid::open(9, 9);
        let caster = unit_at(0, Allegiance::Player, Position::new(1, 1));
        let rosters = Rosters::new(vec![caster.clone()], vec![]);
        let cross = skill(SkillKind::Damage, RangeShape::Cross, 2);

        let cells: Vec<_> = reachable_skill_cells(&grid, &rosters, &caster, &cross)
            .into_keys()
            .collect();
        assert_eq!(
            cells,
            vec![
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 1),
                Position::new(3, 1)
            ]
        );
    }

    #[test]
    fn line_follows_dominant_axis_and_stops_at_bounds() {
        let grid = Grid::open(6, 6);
        let pierce = skill(SkillKind::Damage, RangeShape::Line, 4);

        let area = area_of_effect(&grid, &pierce, Position::new(5, 4), Position::new(3, 3));
        let expected: BTreeSet<_> = [Position::new(4, 3), Position::new(5, 3), Position::new(6, 3)]
            .into_iter()
            .collect();
        assert_eq!(area, expected);
    }

    #[test]
    fn radius_uses_shape_metric() {
        let grid = Grid::open(9, 9);
        let mut blast = skill(SkillKind::Magic, RangeShape::Circle, 4);
        blast.area = Some(AreaOfEffect {
            radius: 1,
            shape: AreaShape::Diamond,
        });
        assert_eq!(
            area_of_effect(&grid, &blast, Position::new(5, 5), Position::new(1, 1)).len(),
            5
        );

        blast.area = Some(AreaOfEffect {
            radius: 1,
            shape: AreaShape::Square,
        });
        assert_eq!(
            area_of_effect(&grid, &blast, Position::new(5, 5), Position::new(1, 1)).len(),
            9
        );
    }

    #[test]
    fn unknown_shape_is_empty() {
        let grid = Grid::open(9, 9);
        let odd = skill(SkillKind::Damage, RangeShape::Unknown, 2);
        assert!(area_of_effect(&grid, &odd, Position::new(4, 4), Position::new(3, 3)).is_empty());
    }

    #[test]
    fn targets_filter_by_side() {
        let grid = Grid::open(9, 9);
        let caster = unit_at(0, Allegiance::Player, Position::new(2, 2));
        let ally = unit_at(1, Allegiance::Ally, Position::new(4, 3));
        let enemy = unit_at(10, Allegiance::Enemy, Position::new(4, 2));
        let rosters = Rosters::new(vec![caster.clone(), ally], vec![enemy]);

        let mut blast = skill(SkillKind::Magic, RangeShape::Circle, 3);
        blast.area = Some(AreaOfEffect {
            radius: 1,
            shape: AreaShape::Square,
        });

        let targets = skill_targets(&grid, &rosters, &caster, &blast, Position::new(4, 2)).unwrap();
        assert_eq!(targets.units, vec![UnitId(10)]);
        assert!(skill_targets(&grid, &rosters, &caster, &blast, Position::new(8, 8)).is_none());
    }
}
