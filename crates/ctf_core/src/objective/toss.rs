//! Drop toss: where a released objective lands and how it moves off.
//!
//! Five candidate spots around the holder's feet are offered to the
//! movement collaborator in order. If none is accepted the objective is put
//! exactly at the holder's feet with movement disabled, so it can still be
//! touched but never pushed through a wall by penetration resolution.

use super::host::MovementCollaborator;
use crate::config::TossConfig;
use crate::types::{Candidate, ObjectiveId, Position};
use rand::Rng;
use rand_distr::{Distribution, UnitSphere};

#[derive(Debug, Clone, PartialEq)]
pub struct TossPlan {
    /// Where the holder was standing
    pub origin: Position,
    /// Spots to try, best first
    pub spots: [Position; 5],
    pub velocity: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TossOutcome {
    pub location: Position,
    pub velocity: Position,
    pub movement_enabled: bool,
}

pub fn plan_toss(holder: &Candidate, cfg: &TossConfig, rng: &mut impl Rng) -> TossPlan {
    let throw = if holder.alive && holder.facing.norm() > f32::EPSILON {
        holder.facing.normalize() * cfg.throw_speed
    } else {
        Position::zeros()
    };

    let mut feet = holder.location;
    feet.z -= holder.half_height;
    feet.z += cfg.object_half_height * 1.1;

    let adjust = holder.collision_radius * cfg.adjust_fraction;
    let spots = [
        feet,
        feet + Position::new(adjust, 0.0, 0.0),
        feet - Position::new(adjust, 0.0, 0.0),
        feet + Position::new(0.0, adjust, 0.0),
        feet - Position::new(0.0, adjust, 0.0),
    ];

    let dir: [f32; 3] = UnitSphere.sample(rng);
    let scatter_speed = cfg.scatter_speed * (0.5 + rng.gen::<f32>());
    let scatter = Position::new(dir[0], dir[1], dir[2]) * scatter_speed;
    let velocity = holder.velocity * cfg.inherit_velocity
        + throw
        + scatter
        + Position::new(0.0, 0.0, cfg.lift_speed);

    TossPlan { origin: holder.location, spots, velocity }
}

pub fn resolve_toss(
    objective: ObjectiveId,
    plan: &TossPlan,
    movement: &mut impl MovementCollaborator,
) -> TossOutcome {
    for spot in plan.spots.iter() {
        if movement.try_place(objective, plan.origin, *spot) {
            return TossOutcome { location: *spot, velocity: plan.velocity, movement_enabled: true };
        }
    }
    tracing::debug!(%objective, "no free drop spot, pinning at holder feet");
    TossOutcome { location: plan.spots[0], velocity: Position::zeros(), movement_enabled: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{pos, HolderId, TeamId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Blocked(usize);

    impl MovementCollaborator for Blocked {
        fn try_place(&mut self, _: ObjectiveId, _: Position, _: Position) -> bool {
            if self.0 == 0 {
                true
            } else {
                self.0 -= 1;
                false
            }
        }
    }

    fn holder() -> Candidate {
        let mut c = Candidate::new(HolderId(1), TeamId(0), pos([0.0, 0.0, 92.0]));
        c.velocity = pos([200.0, 0.0, 0.0]);
        c
    }

    #[test]
    fn test_plan_spots_sit_at_holder_feet() {
        let cfg = TossConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = plan_toss(&holder(), &cfg, &mut rng);

        assert!((plan.spots[0].z - 33.0).abs() < 0.001);
        assert!((plan.spots[1].x - 21.0).abs() < 0.001);
        assert!((plan.spots[4].y + 21.0).abs() < 0.001);
    }

    #[test]
    fn test_living_holder_throws_forward() {
        let cfg = TossConfig { scatter_speed: 0.0, ..TossConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_toss(&holder(), &cfg, &mut rng);
        // 0.5 * 200 inherited + 900 thrown
        assert!((plan.velocity.x - 1000.0).abs() < 0.01);
        assert!((plan.velocity.z - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_dead_holder_only_inherits() {
        let cfg = TossConfig { scatter_speed: 0.0, ..TossConfig::default() };
        let mut dead = holder();
        dead.alive = false;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = plan_toss(&dead, &cfg, &mut rng);
        assert!((plan.velocity.x - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_plan_is_deterministic_per_seed() {
        let cfg = TossConfig::default();
        let a = plan_toss(&holder(), &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        let b = plan_toss(&holder(), &cfg, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_uses_first_free_spot() {
        let cfg = TossConfig::default();
        let plan = plan_toss(&holder(), &cfg, &mut ChaCha8Rng::seed_from_u64(3));
        let outcome = resolve_toss(ObjectiveId(0), &plan, &mut Blocked(2));
        assert_eq!(outcome.location, plan.spots[2]);
        assert!(outcome.movement_enabled);
        assert_eq!(outcome.velocity, plan.velocity);
    }

    #[test]
    fn test_resolve_falls_back_with_movement_disabled() {
        let cfg = TossConfig::default();
        let plan = plan_toss(&holder(), &cfg, &mut ChaCha8Rng::seed_from_u64(3));
        let outcome = resolve_toss(ObjectiveId(0), &plan, &mut Blocked(usize::MAX));
        assert_eq!(outcome.location, plan.spots[0]);
        assert!(!outcome.movement_enabled);
        assert_eq!(outcome.velocity, Position::zeros());
    }
}
