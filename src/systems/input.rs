//! Input systems.
//!
//! - [`update_input_state`] folds the host's [`InputSnapshot`] for this tick
//!   into [`crate::resources::input::InputState`].
use bevy_ecs::prelude::*;

use crate::events::input::InputAction;
use crate::resources::input::{InputSnapshot, InputState};

/// Apply the pressed set of this tick to the `InputState` resource.
pub fn update_input_state(snapshot: Res<InputSnapshot>, mut input: ResMut<InputState>) {
    for action in InputAction::ALL {
        input.get_mut(action).set(snapshot.is_pressed(action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_replaces_held_actions_each_tick() {
        let mut world = World::new();
        world.insert_resource(InputState::default());
        world.insert_resource(InputSnapshot::new().with(InputAction::Jump));
        let mut schedule = Schedule::default();
        schedule.add_systems(update_input_state);

        schedule.run(&mut world);
        let input = world.resource::<InputState>();
        assert!(input.jump.active);
        assert!(!input.shoot.active);

        world.insert_resource(InputSnapshot::new().with(InputAction::Shoot));
        schedule.run(&mut world);
        let input = world.resource::<InputState>();
        assert!(!input.jump.active);
        assert!(input.shoot.active);
    }
}
