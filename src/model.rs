use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room {}", self.0)
    }
}

/// Cell coordinate on a room grid. Signed so that a drag can express a
/// candidate left of or above the room before validation rejects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Physical size of a piece of equipment, in metres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_m: f64,
    pub length_m: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Rack,
    CoolingUnit,
    PowerPanel,
    Ups,
    Pdu,
    #[serde(other)]
    Other,
}

impl ItemKind {
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Rack,
        ItemKind::CoolingUnit,
        ItemKind::PowerPanel,
        ItemKind::Ups,
        ItemKind::Pdu,
        ItemKind::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Rack => "Rack",
            ItemKind::CoolingUnit => "Cooling unit",
            ItemKind::PowerPanel => "Power panel",
            ItemKind::Ups => "UPS",
            ItemKind::Pdu => "PDU",
            ItemKind::Other => "Other",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ItemKind::Rack => 0,
            ItemKind::CoolingUnit => 1,
            ItemKind::PowerPanel => 2,
            ItemKind::Ups => 3,
            ItemKind::Pdu => 4,
            ItemKind::Other => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    PendingApproval,
    Confirmed,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::PendingApproval => "Pending approval",
            ItemStatus::Confirmed => "Confirmed",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn from_color32(c: egui::Color32) -> Self {
        let [r, g, b, a] = c.to_srgba_unmultiplied();
        Self { r, g, b, a }
    }
}

/// Carried along with an item but never interpreted by the engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ItemMeta {
    pub notes: String,
    pub color: Option<Rgba>,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlacedItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    pub position: GridPos,
    #[serde(default)]
    pub footprint: Option<Footprint>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub meta: ItemMeta,
}

/// An item that has not been given an id or a position yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub kind: ItemKind,
    pub footprint: Option<Footprint>,
    pub status: ItemStatus,
    pub meta: ItemMeta,
}

impl NewItem {
    pub fn into_placed(self, id: ItemId, position: GridPos) -> PlacedItem {
        PlacedItem {
            id,
            name: self.name,
            kind: self.kind,
            position,
            footprint: self.footprint,
            status: self.status,
            meta: self.meta,
        }
    }
}

/// Physical dimensions of a room. Missing room sizes fall back to the
/// configured default room when the grid is resolved.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomGeometry {
    #[serde(default)]
    pub width_m: Option<f64>,
    #[serde(default)]
    pub length_m: Option<f64>,
    pub tile_width_cm: f64,
    pub tile_length_cm: f64,
}

impl RoomGeometry {
    pub fn new(width_m: f64, length_m: f64, tile_width_cm: f64, tile_length_cm: f64) -> Self {
        Self {
            width_m: Some(width_m),
            length_m: Some(length_m),
            tile_width_cm,
            tile_length_cm,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub geometry: RoomGeometry,
    #[serde(default)]
    pub items: Vec<PlacedItem>,
}
