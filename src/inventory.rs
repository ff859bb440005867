use crate::grid::Item;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of distinct stacks the backpack holds
pub const BACKPACK_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Consumable,
    Weapon,
    Armor,
    Helmet,
    Pants,
    Belt,
    Ring,
    Clothing,
    Treasure,
    Key,
    Misc,
}

impl ItemKind {
    /// Guess the kind from an item name found on the map
    pub fn classify(name: &str) -> ItemKind {
        if name == "key" || name.starts_with("key_") {
            ItemKind::Key
        } else if name.contains("potion") {
            ItemKind::Consumable
        } else if name.contains("armor") {
            ItemKind::Armor
        } else if name.contains("helmet") {
            ItemKind::Helmet
        } else if name.contains("sword") || name.contains("weapon") {
            ItemKind::Weapon
        } else if name.contains("ring") {
            ItemKind::Ring
        } else {
            ItemKind::Misc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Ring,
    Clothing,
    Armor,
    Helmet,
    RightHand,
    LeftHand,
    Belt,
    Pants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub kind: ItemKind,
    pub count: u32,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, kind: ItemKind, count: u32) -> Self {
        InventoryItem {
            name: name.into(),
            kind,
            count,
        }
    }

    pub fn can_equip_in(&self, slot: EquipmentSlot) -> bool {
        match slot {
            EquipmentSlot::Ring => self.kind == ItemKind::Ring,
            EquipmentSlot::Clothing => self.kind == ItemKind::Clothing,
            EquipmentSlot::Armor => self.kind == ItemKind::Armor,
            EquipmentSlot::Helmet => self.kind == ItemKind::Helmet,
            EquipmentSlot::RightHand | EquipmentSlot::LeftHand => self.kind == ItemKind::Weapon,
            EquipmentSlot::Belt => self.kind == ItemKind::Belt,
            EquipmentSlot::Pants => self.kind == ItemKind::Pants,
        }
    }

    fn same_stack(&self, other: &InventoryItem) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl From<&Item> for InventoryItem {
    fn from(item: &Item) -> Self {
        InventoryItem::new(item.kind.clone(), ItemKind::classify(&item.kind), item.count)
    }
}

/// Backpack plus equipped items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    backpack: Vec<InventoryItem>,
    equipment: HashMap<EquipmentSlot, InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backpack(&self) -> &[InventoryItem] {
        &self.backpack
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&InventoryItem> {
        self.equipment.get(&slot)
    }

    /// Whether the backpack has at least one of `name`
    pub fn holds(&self, name: &str, kind: ItemKind) -> bool {
        self.backpack
            .iter()
            .any(|e| e.name == name && e.kind == kind && e.count > 0)
    }

    pub fn is_full(&self) -> bool {
        self.backpack.len() >= BACKPACK_CAPACITY
    }

    /// Add an item, merging into an existing stack of the same name and kind.
    /// Returns false (and keeps nothing) when the backpack is full.
    pub fn add(&mut self, item: InventoryItem) -> bool {
        // Full means no room at all, even for an existing stack
        if self.is_full() {
            return false;
        }
        if let Some(existing) = self.backpack.iter_mut().find(|e| e.same_stack(&item)) {
            existing.count += item.count;
            return true;
        }
        self.backpack.push(item);
        true
    }

    /// Remove `count` units of a stack. Fails if fewer are held.
    pub fn remove(&mut self, name: &str, kind: ItemKind, count: u32) -> bool {
        let Some(pos) = self
            .backpack
            .iter()
            .position(|e| e.name == name && e.kind == kind)
        else {
            return false;
        };
        if self.backpack[pos].count < count {
            return false;
        }
        self.backpack[pos].count -= count;
        if self.backpack[pos].count == 0 {
            self.backpack.remove(pos);
        }
        true
    }

    /// Move one unit of a backpack stack into `slot`, returning whatever was
    /// equipped there to the backpack first
    pub fn equip(&mut self, name: &str, kind: ItemKind, slot: EquipmentSlot) -> bool {
        let candidate = InventoryItem::new(name, kind, 1);
        if !candidate.can_equip_in(slot) || !self.holds(name, kind) {
            return false;
        }
        if self.equipment.contains_key(&slot) && !self.unequip(slot) {
            return false;
        }
        if !self.remove(name, kind, 1) {
            return false;
        }
        self.equipment.insert(slot, candidate);
        true
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> bool {
        if self.is_full() {
            return false;
        }
        match self.equipment.remove(&slot) {
            Some(item) => self.add(item),
            None => false,
        }
    }
}
