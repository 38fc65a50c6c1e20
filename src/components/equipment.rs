//! Worn items indexed by equipment layer.
//!
//! Only presence matters to this engine: a filled [`Layer::Mount`] slot
//! selects mounted speed and mounted animation groups, and filled hand slots
//! select armed groups. Slots hold the item's [`Serial`].

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::changes::{Aspect, ChangeSet};
use crate::components::mobile::Serial;

/// Equipment slot, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Layer {
    Invalid = 0,
    RightHand,
    LeftHand,
    Shoes,
    Pants,
    Shirt,
    Helmet,
    Gloves,
    Ring,
    Talisman,
    Necklace,
    Hair,
    Waist,
    Torso,
    Bracelet,
    Face,
    Beard,
    Tunic,
    Earrings,
    Arms,
    Cloak,
    Backpack,
    Robe,
    Skirt,
    Legs,
    Mount,
    ShopBuyRestock,
    ShopBuy,
    ShopSell,
    Bank,
}

impl Layer {
    /// Number of slots: the highest layer index plus one.
    pub const COUNT: usize = Layer::Bank as usize + 1;
}

#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Equipment {
    slots: [Option<Serial>; Layer::COUNT],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, layer: Layer) -> Option<Serial> {
        self.slots[layer as usize]
    }

    pub fn has(&self, layer: Layer) -> bool {
        self.slots[layer as usize].is_some()
    }

    /// Put `item` on `layer`, replacing whatever was there.
    pub fn equip(&mut self, layer: Layer, item: Serial) -> ChangeSet {
        let slot = &mut self.slots[layer as usize];
        let changed = *slot != Some(item);
        *slot = Some(item);
        ChangeSet::when(changed, Aspect::Appearance)
    }

    pub fn unequip(&mut self, layer: Layer) -> ChangeSet {
        ChangeSet::when(self.slots[layer as usize].take().is_some(), Aspect::Appearance)
    }

    /// Remove `item` from whichever layer holds it.
    pub fn remove_item(&mut self, item: Serial) -> ChangeSet {
        let mut changes = ChangeSet::EMPTY;
        for slot in self.slots.iter_mut().filter(|s| **s == Some(item)) {
            *slot = None;
            changes.insert(Aspect::Appearance);
        }
        changes
    }

    pub fn is_mounted(&self) -> bool {
        self.has(Layer::Mount)
    }

    pub fn is_armed(&self) -> bool {
        self.has(Layer::RightHand) || self.has(Layer::LeftHand)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_count_covers_bank() {
        let equipment = Equipment::new();
        assert_eq!(equipment.len(), 30);
        assert!(equipment.is_empty());
    }

    #[test]
    fn test_mount_presence() {
        let mut equipment = Equipment::new();
        assert!(!equipment.is_mounted());
        let changes = equipment.equip(Layer::Mount, Serial(0x4000_0001));
        assert!(changes.contains(Aspect::Appearance));
        assert!(equipment.is_mounted());
        // same item again is not a change
        assert!(equipment.equip(Layer::Mount, Serial(0x4000_0001)).is_empty());
        assert!(!equipment.unequip(Layer::Mount).is_empty());
        assert!(!equipment.is_mounted());
    }

    #[test]
    fn test_remove_item_by_serial() {
        let mut equipment = Equipment::new();
        equipment.equip(Layer::LeftHand, Serial(0x4000_0010));
        assert!(equipment.is_armed());
        assert!(!equipment.remove_item(Serial(0x4000_0010)).is_empty());
        assert!(!equipment.is_armed());
        assert!(equipment.remove_item(Serial(0x4000_0010)).is_empty());
    }
}
