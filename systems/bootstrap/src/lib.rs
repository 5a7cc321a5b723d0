#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Harmonics experience.

use harmonics_core::{TargetWave, Term};
use harmonics_world::{query, World};

/// Produces data required to greet the player and seed the first frame.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the starting approximation terms required for presentation.
    #[must_use]
    pub fn terms<'world>(&self, world: &'world World) -> &'world [Term] {
        query::terms(world)
    }

    /// Exposes the starting target wave required for presentation.
    #[must_use]
    pub fn target<'world>(&self, world: &'world World) -> &'world TargetWave {
        query::target(world)
    }
}

#[cfg(test)]
mod tests {
    use super::Bootstrap;
    use harmonics_core::{TargetWave, WELCOME_BANNER};
    use harmonics_world::World;

    #[test]
    fn banner_matches_the_canonical_greeting() {
        let world = World::new();
        let bootstrap = Bootstrap;
        assert_eq!(bootstrap.welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn fresh_sessions_start_on_the_square_target() {
        let world = World::new();
        let bootstrap = Bootstrap;
        assert_eq!(bootstrap.target(&world), &TargetWave::Square);
        assert_eq!(bootstrap.terms(&world).len(), 3);
    }
}
