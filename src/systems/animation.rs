//! Animation systems.
//!
//! - [`select_animation_group`] decides which frame sequence a mobile shows,
//!   from a plain [`GroupInput`] snapshot of its state. It never mutates; a
//!   requested frame reset is part of the returned [`GroupSelection`].
//! - [`animation_frame_system`] runs the frame timer of every mobile: once per
//!   frame delay it advances the frame index, reselects the group and looks up
//!   the frame data of the facing direction.
//! - [`asset_load_system`] completes the frame loads queued by the previous
//!   tick when the [`AnimationStore`] runs in deferred mode.
//!
//! # Animation Flow
//!
//! 1. Frame counts per graphic, group and direction live in [`AnimationStore`]
//! 2. Every mobile carries a [`MobileAnimation`] with its timer and frame index
//! 3. `animation_frame_system` builds a [`GroupInput`] and calls the selector
//! 4. The facing is remapped to one of the five stored directions, with a
//!    mirror flag for the other three
//!
//! # Related
//!
//! - [`crate::components::mobileanimation::MobileAnimation`] – per-mobile playback state
//! - [`crate::resources::animationstore::AnimationStore`] – group tables and frame data
//! - [`crate::systems::motion`] – supplies the walking state through the queue

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::direction::COMPASS_MASK;
use crate::components::equipment::{Equipment, Layer};
use crate::components::mobile::{Mobile, Race};
use crate::components::mobileanimation::MobileAnimation;
use crate::components::motionqueue::MotionQueue;
use crate::components::tileposition::Facing;
use crate::resources::animationstore::{
    AnimationStore, BodyCategory, LowGroup, PeopleGroup, TallGroup,
};
use crate::resources::clientversion::ClientVersion;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::motion::animation_facing;

/// Group value meaning "no group chosen yet".
pub const GROUP_UNSET: u8 = 0xFF;

/// Tall-creature graphic whose groups are shifted by one in the asset files.
const SHIFTED_TALL_GRAPHIC: u16 = 151;

/// Everything the group selector looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInput {
    pub category: BodyCategory,
    pub graphic: u16,
    pub group_override: Option<u8>,
    pub walking: bool,
    pub running: bool,
    pub mounted: bool,
    pub right_hand: bool,
    pub left_hand: bool,
    pub war_mode: bool,
    pub dead: bool,
    pub flying: bool,
    pub race: Race,
    pub has_fly_variant: bool,
}

impl GroupInput {
    /// Snapshot the selector input of one mobile at tick `now`.
    #[allow(clippy::too_many_arguments)]
    pub fn gather(
        mobile: &Mobile,
        facing: &Facing,
        queue: &MotionQueue,
        equipment: &Equipment,
        animation: &MobileAnimation,
        store: &AnimationStore,
        version: ClientVersion,
        now: u64,
        walking_window: u64,
    ) -> Self {
        let graphic = mobile.animation_graphic();
        Self {
            category: store.classify_graphic(graphic),
            graphic,
            group_override: animation.group_override,
            walking: queue.is_walking(now, walking_window),
            running: queue
                .front()
                .map(|step| step.run)
                .unwrap_or_else(|| facing.0.is_running()),
            mounted: equipment.is_mounted(),
            right_hand: equipment.has(Layer::RightHand),
            left_hand: equipment.has(Layer::LeftHand),
            war_mode: mobile.war_mode(),
            dead: mobile.is_dead(),
            flying: mobile.is_flying(version),
            race: mobile.race(),
            has_fly_variant: store.has_fly_variant(graphic),
        }
    }

    fn armed(&self) -> bool {
        self.right_hand || self.left_hand
    }
}

/// Output of the group selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSelection {
    pub group: u8,
    /// The caller should restart the frame index.
    pub reset_frame: bool,
}

/// Pick the animation group for a mobile.
///
/// Starts from the override (or [`GROUP_UNSET`]). Movement always picks a
/// movement group; standing still only picks a stand group when no override
/// is set, and asks for a frame reset in that case.
pub fn select_animation_group(input: &GroupInput) -> GroupSelection {
    let idle_default = input.group_override.is_none();
    let mut group = input.group_override.unwrap_or(GROUP_UNSET);
    let mut reset_frame = false;

    match input.category {
        BodyCategory::Low => {
            if input.walking {
                group = if input.running {
                    LowGroup::Run as u8
                } else {
                    LowGroup::Walk as u8
                };
            } else if idle_default {
                group = LowGroup::Stand as u8;
                reset_frame = true;
            }
        }
        BodyCategory::Tall => {
            if input.walking {
                group = if input.running && input.has_fly_variant {
                    TallGroup::Fly as u8
                } else {
                    TallGroup::Walk as u8
                };
            } else if idle_default {
                group = TallGroup::Stand as u8;
                reset_frame = true;
            }
            if input.graphic == SHIFTED_TALL_GRAPHIC {
                group = group.wrapping_add(1);
            }
        }
        BodyCategory::People => {
            if input.walking {
                group = if input.running {
                    if input.mounted {
                        PeopleGroup::OnMountRideFast as u8
                    } else if input.armed() {
                        PeopleGroup::RunArmed as u8
                    } else {
                        PeopleGroup::RunUnarmed as u8
                    }
                } else if input.mounted {
                    PeopleGroup::OnMountRideSlow as u8
                } else if input.armed() && !input.dead {
                    if input.war_mode {
                        PeopleGroup::WalkWarMode as u8
                    } else {
                        PeopleGroup::WalkArmed as u8
                    }
                } else if input.war_mode && !input.dead {
                    PeopleGroup::WalkWarMode as u8
                } else {
                    PeopleGroup::WalkUnarmed as u8
                };
            } else if idle_default {
                group = if input.mounted {
                    PeopleGroup::OnMountStand as u8
                } else if input.war_mode && !input.dead {
                    if input.left_hand {
                        PeopleGroup::StandOneHandedAttack as u8
                    } else if input.right_hand {
                        PeopleGroup::StandTwoHandedAttack as u8
                    } else {
                        PeopleGroup::StandOneHandedAttack as u8
                    }
                } else {
                    PeopleGroup::Stand as u8
                };
                reset_frame = true;
            }

            if input.race == Race::Gargoyle && input.flying {
                group = gargoyle_flight_group(group);
            }
        }
    }

    GroupSelection { group, reset_frame }
}

/// Flying gargoyles have their own set of groups.
pub fn gargoyle_flight_group(group: u8) -> u8 {
    match group {
        0 | 1 | 15 => 62,
        2 | 3 => 63,
        4 => 64,
        6 => 66,
        7 | 8 => 65,
        9..=11 | 31 => 71,
        12..=14 => 72,
        20 => 77,
        34 => 78,
        200.. => 75,
        other => other,
    }
}

/// Advance the frame timer of every mobile that is due.
///
/// Contract
/// - Reads [`WorldTime`], [`EngineConfig`] and [`ClientVersion`].
/// - Mutates [`MobileAnimation`]: group, frame index, direction bucket,
///   mirror flag and the next frame time.
/// - Looks up frames through [`AnimationStore::frame_data`], which may queue
///   a deferred load. Missing or unloaded frames leave the index alone.
pub fn animation_frame_system(
    time: Res<WorldTime>,
    config: Res<EngineConfig>,
    version: Res<ClientVersion>,
    mut store: ResMut<AnimationStore>,
    mut query: Query<(
        &Mobile,
        &Facing,
        &MotionQueue,
        &Equipment,
        &mut MobileAnimation,
    )>,
) {
    let now = time.ticks;
    let version = *version;

    for (mobile, facing, queue, equipment, mut animation) in query.iter_mut() {
        if now < animation.next_frame_at {
            continue;
        }

        let input = GroupInput::gather(
            mobile,
            facing,
            queue,
            equipment,
            &animation,
            &store,
            version,
            now,
            config.walking_window,
        );
        let selection = select_animation_group(&input);

        let mut frame_index = animation.frame_index.wrapping_add(1);
        if animation.group != Some(selection.group) {
            if selection.reset_frame {
                frame_index = 0;
            }
            animation.group = Some(selection.group);
        }

        let code = animation_facing(queue, facing).bits() & COMPASS_MASK;
        let (bucket, mirrored) = AnimationStore::remap_direction(code);
        animation.direction_bucket = bucket;
        animation.mirrored = mirrored;

        let frames = store.frame_data(input.graphic, selection.group, bucket);
        if frames.loaded && frames.frame_count > 0 {
            if frame_index >= frames.frame_count {
                frame_index = 0;
            }
            animation.frame_index = frame_index;
        }

        animation.next_frame_at = now + config.frame_delay;
    }
}

/// Complete frame loads queued during the previous tick.
pub fn asset_load_system(mut store: ResMut<AnimationStore>) {
    if store.pending_loads() == 0 {
        return;
    }
    let loaded = store.complete_pending_loads();
    debug!("loaded {} animation directions", loaded);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> GroupInput {
        GroupInput {
            category: BodyCategory::People,
            graphic: 400,
            group_override: None,
            walking: false,
            running: false,
            mounted: false,
            right_hand: false,
            left_hand: false,
            war_mode: false,
            dead: false,
            flying: false,
            race: Race::Human,
            has_fly_variant: false,
        }
    }

    fn select(input: GroupInput) -> u8 {
        select_animation_group(&input).group
    }

    #[test]
    fn test_selector_is_pure() {
        let input = GroupInput {
            walking: true,
            running: true,
            right_hand: true,
            ..people()
        };
        let first = select_animation_group(&input);
        for _ in 0..10 {
            assert_eq!(select_animation_group(&input), first);
        }
        assert_eq!(first.group, PeopleGroup::RunArmed as u8);
    }

    #[test]
    fn test_people_idle_stands_and_resets() {
        let selection = select_animation_group(&people());
        assert_eq!(selection.group, PeopleGroup::Stand as u8);
        assert!(selection.reset_frame);
    }

    #[test]
    fn test_people_idle_keeps_override() {
        let selection = select_animation_group(&GroupInput {
            group_override: Some(PeopleGroup::EmoteBow as u8),
            ..people()
        });
        assert_eq!(selection.group, PeopleGroup::EmoteBow as u8);
        assert!(!selection.reset_frame);
    }

    #[test]
    fn test_people_movement_overrides_override() {
        let input = GroupInput {
            group_override: Some(PeopleGroup::EmoteBow as u8),
            walking: true,
            ..people()
        };
        assert_eq!(select(input), PeopleGroup::WalkUnarmed as u8);
    }

    #[test]
    fn test_people_running() {
        let running = GroupInput {
            walking: true,
            running: true,
            ..people()
        };
        assert_eq!(select(running), PeopleGroup::RunUnarmed as u8);
        assert_eq!(
            select(GroupInput {
                left_hand: true,
                ..running
            }),
            PeopleGroup::RunArmed as u8
        );
        assert_eq!(
            select(GroupInput {
                mounted: true,
                right_hand: true,
                ..running
            }),
            PeopleGroup::OnMountRideFast as u8
        );
    }

    #[test]
    fn test_people_walking() {
        let walking = GroupInput {
            walking: true,
            ..people()
        };
        assert_eq!(
            select(GroupInput {
                mounted: true,
                ..walking
            }),
            PeopleGroup::OnMountRideSlow as u8
        );
        assert_eq!(
            select(GroupInput {
                right_hand: true,
                ..walking
            }),
            PeopleGroup::WalkArmed as u8
        );
        assert_eq!(
            select(GroupInput {
                right_hand: true,
                war_mode: true,
                ..walking
            }),
            PeopleGroup::WalkWarMode as u8
        );
        assert_eq!(
            select(GroupInput {
                war_mode: true,
                ..walking
            }),
            PeopleGroup::WalkWarMode as u8
        );
        // the dead never walk in war stance
        assert_eq!(
            select(GroupInput {
                war_mode: true,
                right_hand: true,
                dead: true,
                ..walking
            }),
            PeopleGroup::WalkUnarmed as u8
        );
    }

    #[test]
    fn test_people_war_stance() {
        let war = GroupInput {
            war_mode: true,
            ..people()
        };
        assert_eq!(select(war), PeopleGroup::StandOneHandedAttack as u8);
        assert_eq!(
            select(GroupInput {
                right_hand: true,
                ..war
            }),
            PeopleGroup::StandTwoHandedAttack as u8
        );
        assert_eq!(
            select(GroupInput {
                right_hand: true,
                left_hand: true,
                ..war
            }),
            PeopleGroup::StandOneHandedAttack as u8
        );
        assert_eq!(
            select(GroupInput {
                mounted: true,
                ..war
            }),
            PeopleGroup::OnMountStand as u8
        );
        assert_eq!(
            select(GroupInput {
                dead: true,
                ..war
            }),
            PeopleGroup::Stand as u8
        );
    }

    #[test]
    fn test_low_creatures() {
        let low = GroupInput {
            category: BodyCategory::Low,
            graphic: 220,
            ..people()
        };
        let idle = select_animation_group(&low);
        assert_eq!(idle.group, LowGroup::Stand as u8);
        assert!(idle.reset_frame);
        assert_eq!(
            select(GroupInput {
                walking: true,
                ..low
            }),
            LowGroup::Walk as u8
        );
        assert_eq!(
            select(GroupInput {
                walking: true,
                running: true,
                ..low
            }),
            LowGroup::Run as u8
        );
    }

    #[test]
    fn test_tall_creatures_fly_only_when_running() {
        let tall = GroupInput {
            category: BodyCategory::Tall,
            graphic: 9,
            has_fly_variant: true,
            ..people()
        };
        assert_eq!(select(tall), TallGroup::Stand as u8);
        assert_eq!(
            select(GroupInput {
                walking: true,
                ..tall
            }),
            TallGroup::Walk as u8
        );
        assert_eq!(
            select(GroupInput {
                walking: true,
                running: true,
                ..tall
            }),
            TallGroup::Fly as u8
        );
        assert_eq!(
            select(GroupInput {
                walking: true,
                running: true,
                has_fly_variant: false,
                ..tall
            }),
            TallGroup::Walk as u8
        );
    }

    #[test]
    fn test_tall_shifted_graphic() {
        let tall = GroupInput {
            category: BodyCategory::Tall,
            graphic: SHIFTED_TALL_GRAPHIC,
            ..people()
        };
        assert_eq!(select(tall), TallGroup::Stand as u8 + 1);
    }

    #[test]
    fn test_gargoyle_flight_table() {
        assert_eq!(gargoyle_flight_group(2), 63);
        assert_eq!(gargoyle_flight_group(3), 63);
        for group in 200..=u8::MAX {
            assert_eq!(gargoyle_flight_group(group), 75);
        }
        assert_eq!(gargoyle_flight_group(0), 62);
        assert_eq!(gargoyle_flight_group(15), 62);
        assert_eq!(gargoyle_flight_group(31), 71);
        assert_eq!(gargoyle_flight_group(34), 78);
        assert_eq!(gargoyle_flight_group(5), 5);
        assert_eq!(gargoyle_flight_group(16), 16);
        assert_eq!(gargoyle_flight_group(199), 199);
    }

    #[test]
    fn test_flying_gargoyle_remaps_selection() {
        let gargoyle = GroupInput {
            race: Race::Gargoyle,
            flying: true,
            walking: true,
            running: true,
            ..people()
        };
        assert_eq!(select(gargoyle), 63);
        assert_eq!(
            select(GroupInput {
                flying: false,
                ..gargoyle
            }),
            PeopleGroup::RunUnarmed as u8
        );
    }
}
