use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Archer,
    Swordsman,
    Knight,
    Skirmisher,
    Nobleman,
}

impl UnitKind {
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Archer,
        UnitKind::Swordsman,
        UnitKind::Knight,
        UnitKind::Skirmisher,
        UnitKind::Nobleman,
    ];
}

/// Combat category a unit fights in. Spies take part in no engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Melee,
    Ranged,
    Spy,
}

/// Per-kind unit counts, used for garrisons, movements and battle math.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSet {
    pub archer: u32,
    pub swordsman: u32,
    pub knight: u32,
    pub skirmisher: u32,
    pub nobleman: u32,
}

impl UnitSet {
    pub fn get(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Archer => self.archer,
            UnitKind::Swordsman => self.swordsman,
            UnitKind::Knight => self.knight,
            UnitKind::Skirmisher => self.skirmisher,
            UnitKind::Nobleman => self.nobleman,
        }
    }

    pub fn set(&mut self, kind: UnitKind, amount: u32) {
        match kind {
            UnitKind::Archer => self.archer = amount,
            UnitKind::Swordsman => self.swordsman = amount,
            UnitKind::Knight => self.knight = amount,
            UnitKind::Skirmisher => self.skirmisher = amount,
            UnitKind::Nobleman => self.nobleman = amount,
        }
    }

    pub fn add(&mut self, kind: UnitKind, amount: u32) {
        self.set(kind, self.get(kind) + amount);
    }

    pub fn total(&self) -> u32 {
        UnitKind::ALL.iter().map(|&k| self.get(k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitKind, u32)> + '_ {
        UnitKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Checks that every kind of `other` is covered by this set.
    pub fn covers(&self, other: &UnitSet) -> bool {
        UnitKind::ALL.iter().all(|&k| self.get(k) >= other.get(k))
    }

    pub fn saturating_sub(&self, other: &UnitSet) -> UnitSet {
        let mut result = UnitSet::default();
        for (kind, amount) in self.iter() {
            result.set(kind, amount.saturating_sub(other.get(kind)));
        }
        result
    }
}

impl core::ops::Add for UnitSet {
    type Output = UnitSet;

    fn add(self, rhs: UnitSet) -> Self::Output {
        let mut result = UnitSet::default();
        for (kind, amount) in self.iter() {
            result.set(kind, amount + rhs.get(kind));
        }
        result
    }
}
