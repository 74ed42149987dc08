use serde::{Deserialize, Serialize};

use crate::common::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Headquarters,
    Woodcutter,
    ClayPit,
    IronMine,
    Farm,
    Storage,
    Barracks,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 7] = [
        BuildingKind::Headquarters,
        BuildingKind::Woodcutter,
        BuildingKind::ClayPit,
        BuildingKind::IronMine,
        BuildingKind::Farm,
        BuildingKind::Storage,
        BuildingKind::Barracks,
    ];

    /// The resource this building produces, if it is a production building.
    pub fn produces(&self) -> Option<Resource> {
        match self {
            BuildingKind::Woodcutter => Some(Resource::Wood),
            BuildingKind::ClayPit => Some(Resource::Clay),
            BuildingKind::IronMine => Some(Resource::Iron),
            _ => None,
        }
    }
}
