//! Sensing and movement behaviors, run only when a logic tick fires

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::GridPos;
use crate::entity::agent::Agent;
use crate::environment::ResourceField;

/// The 8 neighbor offsets, in scan order before shuffling
const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Agent {
    /// Centroid of every resource-bearing cell within `radius` (square
    /// neighborhood, clipped to the grid). Integer average, truncated.
    pub fn survey_area(&self, environment: &ResourceField, radius: usize) -> Option<GridPos> {
        let grid = environment.grid();
        // Past the grid span the square already covers every cell
        let r = radius.min(grid.width().max(grid.height())) as i64;
        let (cx, cy) = (self.grid_x as i64, self.grid_y as i64);

        let mut count = 0usize;
        let mut sum_x = 0usize;
        let mut sum_y = 0usize;
        for dy in -r..=r {
            for dx in -r..=r {
                let (tx, ty) = (cx + dx, cy + dy);
                if !grid.contains_signed(tx, ty) {
                    continue;
                }
                let (tx, ty) = (tx as usize, ty as usize);
                if environment.get_resource(tx, ty) > 0 {
                    count += 1;
                    sum_x += tx;
                    sum_y += ty;
                }
            }
        }

        if count == 0 {
            return None;
        }
        Some(GridPos::new(sum_x / count, sum_y / count))
    }

    /// Step onto a food-bearing neighbor if there is one, otherwise wander.
    ///
    /// Neighbors are scanned in shuffled order so no direction is favoured.
    /// With no food around, each of the 8 neighbors and staying put are
    /// equally likely. The result is clamped into the grid.
    pub fn sense_and_move<R: Rng + ?Sized>(&mut self, environment: &ResourceField, rng: &mut R) {
        let grid = environment.grid();
        let (cx, cy) = (self.grid_x as i64, self.grid_y as i64);

        let mut moves = NEIGHBOR_OFFSETS;
        moves.shuffle(rng);

        let food_move = moves.iter().copied().find(|&(dx, dy)| {
            let (tx, ty) = (cx + dx, cy + dy);
            grid.contains_signed(tx, ty) && environment.get_resource(tx as usize, ty as usize) > 0
        });

        let (dx, dy) = food_move.unwrap_or_else(|| {
            let pick = rng.gen_range(0..=moves.len());
            moves.get(pick).copied().unwrap_or((0, 0))
        });

        let next = grid.clamp(cx + dx, cy + dy);
        self.grid_x = next.x;
        self.grid_y = next.y;
    }

    /// One step per axis toward `target` (sign of the delta on each axis).
    ///
    /// Returns true once the agent stands exactly on `target`.
    pub fn step_toward(&mut self, target: GridPos) -> bool {
        self.grid_x = step_axis(self.grid_x, target.x);
        self.grid_y = step_axis(self.grid_y, target.y);
        self.cell() == target
    }

    /// Harvest the current cell, never past the inventory cap.
    ///
    /// Returns the amount taken.
    pub fn harvest(&mut self, environment: &mut ResourceField) -> u32 {
        let (x, y) = (self.grid_x, self.grid_y);
        if environment.get_resource(x, y) == 0 {
            return 0;
        }
        let taken = environment.consume(x, y, self.gather_rate.min(self.room()));
        self.inventory += taken;
        taken
    }
}

fn step_axis(from: usize, to: usize) -> usize {
    match to.cmp(&from) {
        std::cmp::Ordering::Greater => from + 1,
        std::cmp::Ordering::Less => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentId;
    use crate::entity::agent::AgentTraits;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn agent_at(x: usize, y: usize) -> Agent {
        let traits = AgentTraits {
            max_age: 100,
            inventory_cap: 10,
            gather_rate: 2,
            move_speed: 0.2,
            think_delay: 0.1,
        };
        Agent::new(AgentId(0), GridPos::new(x, y), traits, 20.0)
    }

    #[test]
    fn test_survey_centroid_truncates() {
        let mut field = ResourceField::uniform(10, 10, 0).unwrap();
        field.set_resource(1, 1, 3).unwrap();
        field.set_resource(2, 4, 1).unwrap();

        // (1 + 2) / 2 = 1, (1 + 4) / 2 = 2
        let agent = agent_at(2, 2);
        assert_eq!(agent.survey_area(&field, 4), Some(GridPos::new(1, 2)));
    }

    #[test]
    fn test_survey_ignores_cells_outside_radius() {
        let mut field = ResourceField::uniform(20, 20, 0).unwrap();
        field.set_resource(15, 15, 5).unwrap();

        let agent = agent_at(0, 0);
        assert_eq!(agent.survey_area(&field, 4), None);
        assert_eq!(agent.survey_area(&field, 15), Some(GridPos::new(15, 15)));
    }

    #[test]
    fn test_survey_full_field_from_corner() {
        let field = ResourceField::uniform(10, 10, 10).unwrap();
        // Cells 0..=4 on each axis: mean 2
        assert_eq!(agent_at(0, 0).survey_area(&field, 4), Some(GridPos::new(2, 2)));
    }

    #[test]
    fn test_survey_huge_radius_covers_grid() {
        let field = ResourceField::uniform(10, 10, 10).unwrap();
        // Whole grid: mean of 0..=9 is 4 on each axis
        assert_eq!(agent_at(0, 0).survey_area(&field, usize::MAX), Some(GridPos::new(4, 4)));
        assert_eq!(agent_at(9, 3).survey_area(&field, usize::MAX), Some(GridPos::new(4, 4)));
    }

    #[test]
    fn test_sense_moves_to_only_food_neighbor() {
        let mut field = ResourceField::uniform(5, 5, 0).unwrap();
        field.set_resource(3, 1, 4).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let mut agent = agent_at(2, 2);
            agent.sense_and_move(&field, &mut rng);
            assert_eq!(agent.cell(), GridPos::new(3, 1));
        }
    }

    #[test]
    fn test_sense_wander_stays_in_bounds() {
        let field = ResourceField::uniform(3, 3, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut agent = agent_at(0, 0);

        let mut seen_stay = false;
        for _ in 0..500 {
            let before = agent.cell();
            agent.sense_and_move(&field, &mut rng);
            assert!(agent.grid_x < 3 && agent.grid_y < 3);
            assert!(before.chebyshev(&agent.cell()) <= 1);
            seen_stay |= before == agent.cell();
        }
        assert!(seen_stay);
    }

    #[test]
    fn test_step_toward_is_per_axis() {
        let mut agent = agent_at(0, 0);
        assert!(!agent.step_toward(GridPos::new(3, 1)));
        assert_eq!(agent.cell(), GridPos::new(1, 1));
        assert!(!agent.step_toward(GridPos::new(3, 1)));
        assert!(agent.step_toward(GridPos::new(3, 1)));

        // Already there: stays and reports arrival
        assert!(agent.step_toward(GridPos::new(3, 1)));
        assert_eq!(agent.cell(), GridPos::new(3, 1));

        assert!(!agent.step_toward(GridPos::new(0, 5)));
        assert_eq!(agent.cell(), GridPos::new(2, 2));
    }

    #[test]
    fn test_harvest_respects_cap_and_level() {
        let mut field = ResourceField::uniform(2, 2, 3).unwrap();
        let mut agent = agent_at(0, 0);

        assert_eq!(agent.harvest(&mut field), 2);
        assert_eq!(agent.harvest(&mut field), 1);
        assert_eq!(agent.harvest(&mut field), 0);
        assert_eq!(agent.inventory, 3);

        agent.grid_x = 1;
        agent.inventory = 9;
        assert_eq!(agent.harvest(&mut field), 1);
        assert_eq!(agent.inventory, 10);
        assert_eq!(field.get_resource(1, 0), 2);
        assert_eq!(agent.harvest(&mut field), 0);
    }
}
