//! Slot-based cargo storage.
//!
//! A cargo bay is a fixed number of slots of identical capacity. A slot
//! holds at most one resource type; a resource may occupy several slots.
//! All movement is saturating: `give` and `take` return the quantity
//! actually moved, never more than free space or stock.

use sectordata::ResourceId;
use serde::{Deserialize, Serialize};

/// One storage slot. Empty slots carry no resource and zero quantity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CargoSlot {
    pub resource: Option<ResourceId>,
    pub quantity: u32,
}

/// Fixed-geometry resource storage.
///
/// Invariant: for every slot, `quantity <= slot_capacity`, and
/// `resource.is_none()` exactly when `quantity == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CargoBay {
    slot_capacity: u32,
    slots: Vec<CargoSlot>,
}

impl CargoBay {
    pub fn new(slot_count: u32, slot_capacity: u32) -> Self {
        Self {
            slot_capacity,
            slots: (0..slot_count).map(|_| CargoSlot::default()).collect(),
        }
    }

    pub fn slot_count(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Capacity of a single slot.
    pub fn slot_capacity(&self) -> u32 {
        self.slot_capacity
    }

    pub fn slots(&self) -> &[CargoSlot] {
        &self.slots
    }

    /// Total capacity across all slots.
    pub fn capacity(&self) -> u32 {
        self.slot_count() * self.slot_capacity
    }

    /// Total quantity of `resource` across all slots.
    pub fn quantity(&self, resource: ResourceId) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.resource == Some(resource))
            .map(|s| s.quantity)
            .sum()
    }

    /// Space available for `resource`: headroom in its partial slots plus
    /// every empty slot.
    pub fn free_space_for(&self, resource: ResourceId) -> u32 {
        self.slots
            .iter()
            .map(|s| match s.resource {
                Some(r) if r == resource => self.slot_capacity - s.quantity,
                Some(_) => 0,
                None => self.slot_capacity,
            })
            .sum()
    }

    /// Store up to `quantity` units of `resource`. Returns the quantity
    /// actually stored. Partial slots fill before empty slots.
    pub fn give(&mut self, resource: ResourceId, quantity: u32) -> u32 {
        let mut remaining = quantity;

        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.resource == Some(resource))
        {
            if remaining == 0 {
                break;
            }
            let space = self.slot_capacity - slot.quantity;
            let stored = remaining.min(space);
            slot.quantity += stored;
            remaining -= stored;
        }

        for slot in self.slots.iter_mut().filter(|s| s.resource.is_none()) {
            if remaining == 0 {
                break;
            }
            let stored = remaining.min(self.slot_capacity);
            slot.resource = Some(resource);
            slot.quantity = stored;
            remaining -= stored;
        }

        quantity - remaining
    }

    /// Remove up to `max` units of `resource`. Returns the quantity
    /// actually removed. Emptied slots are released.
    pub fn take(&mut self, resource: ResourceId, max: u32) -> u32 {
        let mut remaining = max;

        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.resource == Some(resource))
        {
            if remaining == 0 {
                break;
            }
            let taken = remaining.min(slot.quantity);
            slot.quantity -= taken;
            remaining -= taken;
            if slot.quantity == 0 {
                slot.resource = None;
            }
        }

        max - remaining
    }
}
