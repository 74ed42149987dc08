use serde::{Deserialize, Serialize};

/// The three stockpiled resources of a village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Wood,
    Clay,
    Iron,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Wood, Resource::Clay, Resource::Iron];
}

/// An amount of (wood, clay, iron).
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup(pub u32, pub u32, pub u32);

impl ResourceGroup {
    pub const fn new(wood: u32, clay: u32, iron: u32) -> Self {
        Self(wood, clay, iron)
    }

    pub fn total(&self) -> u32 {
        self.0 + self.1 + self.2
    }

    pub fn wood(&self) -> u32 {
        self.0
    }
    pub fn clay(&self) -> u32 {
        self.1
    }
    pub fn iron(&self) -> u32 {
        self.2
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.0,
            Resource::Clay => self.1,
            Resource::Iron => self.2,
        }
    }
}

impl core::ops::Mul<f64> for ResourceGroup {
    type Output = ResourceGroup;

    fn mul(self, rhs: f64) -> Self::Output {
        let wood = (self.0 as f64 * rhs).floor() as u32;
        let clay = (self.1 as f64 * rhs).floor() as u32;
        let iron = (self.2 as f64 * rhs).floor() as u32;
        ResourceGroup(wood, clay, iron)
    }
}

impl core::ops::Add for ResourceGroup {
    type Output = ResourceGroup;

    fn add(self, rhs: ResourceGroup) -> Self::Output {
        ResourceGroup(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// A coordinate on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Euclidean distance in tiles.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_group_total() {
        let rg = ResourceGroup::new(100, 200, 300);
        assert_eq!(rg.total(), 600);

        let rg_zero = ResourceGroup::new(0, 0, 0);
        assert_eq!(rg_zero.total(), 0);
    }

    #[test]
    fn test_resource_group_scaling_floors() {
        let rg = ResourceGroup::new(10, 11, 13) * 0.5;
        assert_eq!(rg, ResourceGroup::new(5, 5, 6));
    }

    #[test]
    fn test_position_distance() {
        let a = Position { x: 0, y: 0 };
        let b = Position { x: 3, y: 4 };
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
