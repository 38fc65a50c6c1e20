//! Game state of a mobile.
//!
//! [`Mobile`] holds the fields the server updates piecemeal: identity, body
//! graphic, status flags, vitals, notoriety and stance. Every setter is a
//! state transition returning the [`ChangeSet`] it produced, empty when the
//! value did not change.
//!
//! Two fields change meaning with the protocol version. Before 7.0.0.0 the
//! `0x04` status bit means poisoned; from 7.0.0.0 on it means flying and the
//! poison state arrives as a separate sub-flag. [`Mobile::is_poisoned`] and
//! [`Mobile::is_flying`] resolve the right source from the
//! [`ClientVersion`] at read time.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::changes::{Aspect, ChangeSet};
use crate::resources::clientversion::ClientVersion;

/// Server-assigned entity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Serial(pub u32);

/// Body graphics that belong to a dead mobile.
const DEAD_GRAPHICS: [u16; 5] = [402, 403, 607, 608, 970];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Notoriety {
    #[default]
    Unknown = 0x00,
    Innocent = 0x01,
    Ally = 0x02,
    Gray = 0x03,
    Criminal = 0x04,
    Enemy = 0x05,
    Murderer = 0x06,
    Invulnerable = 0x07,
}

impl Notoriety {
    pub fn from_byte(value: u8) -> Self {
        match value {
            0x01 => Notoriety::Innocent,
            0x02 => Notoriety::Ally,
            0x03 => Notoriety::Gray,
            0x04 => Notoriety::Criminal,
            0x05 => Notoriety::Enemy,
            0x06 => Notoriety::Murderer,
            0x07 => Notoriety::Invulnerable,
            _ => Notoriety::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Race {
    #[default]
    Human = 1,
    Elf = 2,
    Gargoyle = 3,
}

/// Status bits as sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusFlags(pub u8);

impl StatusFlags {
    pub const FROZEN: u8 = 0x01;
    pub const FEMALE: u8 = 0x02;
    /// Poisoned before 7.0.0.0, flying from 7.0.0.0 on.
    pub const POISONED_OR_FLYING: u8 = 0x04;
    pub const YELLOW_BAR: u8 = 0x08;
    pub const IGNORE_MOBILES: u8 = 0x10;
    pub const MOVABLE: u8 = 0x20;
    pub const WAR_MODE: u8 = 0x40;
    pub const HIDDEN: u8 = 0x80;

    pub fn has(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }
}

/// Identity, vitals and stance of a mobile.
#[derive(Component, Debug, Clone)]
pub struct Mobile {
    serial: Serial,
    graphic: u16,
    flags: StatusFlags,
    hits: u16,
    hits_max: u16,
    mana: u16,
    mana_max: u16,
    stamina: u16,
    stamina_max: u16,
    notoriety: Notoriety,
    war_mode: bool,
    renamable: bool,
    race: Race,
    sa_poisoned: bool,
}

/// Assign `value` to `field`, reporting `aspect` when it differed.
fn assign<T: PartialEq>(field: &mut T, value: T, aspect: Aspect) -> ChangeSet {
    if *field == value {
        return ChangeSet::EMPTY;
    }
    *field = value;
    ChangeSet::of(aspect)
}

impl Mobile {
    pub fn new(serial: Serial, graphic: u16) -> Self {
        Self {
            serial,
            graphic,
            flags: StatusFlags::default(),
            hits: 0,
            hits_max: 0,
            mana: 0,
            mana_max: 0,
            stamina: 0,
            stamina_max: 0,
            notoriety: Notoriety::Unknown,
            war_mode: false,
            renamable: false,
            race: Race::Human,
            sa_poisoned: false,
        }
    }

    pub fn serial(&self) -> Serial {
        self.serial
    }
    pub fn graphic(&self) -> u16 {
        self.graphic
    }
    pub fn flags(&self) -> StatusFlags {
        self.flags
    }
    pub fn hits(&self) -> (u16, u16) {
        (self.hits, self.hits_max)
    }
    pub fn mana(&self) -> (u16, u16) {
        (self.mana, self.mana_max)
    }
    pub fn stamina(&self) -> (u16, u16) {
        (self.stamina, self.stamina_max)
    }
    pub fn notoriety(&self) -> Notoriety {
        self.notoriety
    }
    pub fn war_mode(&self) -> bool {
        self.war_mode
    }
    pub fn renamable(&self) -> bool {
        self.renamable
    }
    pub fn race(&self) -> Race {
        self.race
    }

    pub fn set_graphic(&mut self, graphic: u16) -> ChangeSet {
        assign(&mut self.graphic, graphic, Aspect::Appearance)
    }
    pub fn set_flags(&mut self, flags: StatusFlags) -> ChangeSet {
        assign(&mut self.flags, flags, Aspect::Attributes)
    }
    pub fn set_hits(&mut self, hits: u16) -> ChangeSet {
        assign(&mut self.hits, hits, Aspect::Hits)
    }
    pub fn set_hits_max(&mut self, hits_max: u16) -> ChangeSet {
        assign(&mut self.hits_max, hits_max, Aspect::Hits)
    }
    pub fn set_mana(&mut self, mana: u16) -> ChangeSet {
        assign(&mut self.mana, mana, Aspect::Mana)
    }
    pub fn set_mana_max(&mut self, mana_max: u16) -> ChangeSet {
        assign(&mut self.mana_max, mana_max, Aspect::Mana)
    }
    pub fn set_stamina(&mut self, stamina: u16) -> ChangeSet {
        assign(&mut self.stamina, stamina, Aspect::Stamina)
    }
    pub fn set_stamina_max(&mut self, stamina_max: u16) -> ChangeSet {
        assign(&mut self.stamina_max, stamina_max, Aspect::Stamina)
    }
    pub fn set_notoriety(&mut self, notoriety: Notoriety) -> ChangeSet {
        assign(&mut self.notoriety, notoriety, Aspect::Attributes)
    }
    pub fn set_war_mode(&mut self, war_mode: bool) -> ChangeSet {
        assign(&mut self.war_mode, war_mode, Aspect::Attributes)
    }
    pub fn set_renamable(&mut self, renamable: bool) -> ChangeSet {
        assign(&mut self.renamable, renamable, Aspect::Attributes)
    }
    pub fn set_race(&mut self, race: Race) -> ChangeSet {
        assign(&mut self.race, race, Aspect::Appearance)
    }
    /// Poison sub-flag used from 7.0.0.0 on.
    pub fn set_sa_poisoned(&mut self, poisoned: bool) -> ChangeSet {
        assign(&mut self.sa_poisoned, poisoned, Aspect::Attributes)
    }

    pub fn is_poisoned(&self, version: ClientVersion) -> bool {
        if version.has_stygian_abyss() {
            self.sa_poisoned
        } else {
            self.flags.has(StatusFlags::POISONED_OR_FLYING)
        }
    }

    pub fn is_flying(&self, version: ClientVersion) -> bool {
        version.has_stygian_abyss() && self.flags.has(StatusFlags::POISONED_OR_FLYING)
    }

    pub fn is_paralyzed(&self) -> bool {
        self.flags.has(StatusFlags::FROZEN)
    }
    pub fn is_female(&self) -> bool {
        self.flags.has(StatusFlags::FEMALE)
    }
    pub fn has_yellow_bar(&self) -> bool {
        self.flags.has(StatusFlags::YELLOW_BAR)
    }
    pub fn is_hidden(&self) -> bool {
        self.flags.has(StatusFlags::HIDDEN)
    }
    /// War mode as carried by the status flags, which can lag the explicit
    /// war-mode update.
    pub fn has_war_mode_flag(&self) -> bool {
        self.flags.has(StatusFlags::WAR_MODE)
    }

    pub fn is_dead(&self) -> bool {
        DEAD_GRAPHICS.contains(&self.graphic)
    }

    pub fn is_human(&self) -> bool {
        matches!(
            self.graphic,
            0x0190..=0x0193
                | 0x00B7..=0x00BA
                | 0x025D..=0x0260
                | 0x029A..=0x029B
                | 0x02B6..=0x02B7
                | 0x03DB
                | 0x03DF
                | 0x03E2
        )
    }

    /// Graphic whose frames animate this mobile. Ghost bodies reuse the
    /// living body's frames.
    pub fn animation_graphic(&self) -> u16 {
        match self.graphic {
            0x0192 | 0x0193 => self.graphic - 2,
            g => g,
        }
    }
}
