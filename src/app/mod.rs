//! Desktop view over the floor-plan engine.

use crate::engine::{FloorPlan, KeyListener, KeyboardHub};
use crate::model::ItemId;
use crate::store::JsonFileStore;
use eframe::egui;

mod actions;
mod command_palette;
mod editor;
mod help;
mod render;
mod settings;
mod update;

pub use settings::{AppSettings, KindPalette, KindStyle, SettingsError};

/// The room currently on screen together with its keyboard subscription.
/// Both are replaced together when the room changes.
struct FloorView {
    plan: FloorPlan,
    keys: KeyListener,
}

pub struct FloorPlanApp {
    store: Option<JsonFileStore>,
    floor: Option<FloorView>,
    keyboard: KeyboardHub,
    settings: settings::AppSettings,
    settings_path: String,
    kinds: settings::KindPalette,
    command_palette: command_palette::CommandPalette,
    editor: Option<editor::ItemEditor>,
    new_item: Option<editor::NewItemForm>,
    confirm_delete: Option<ItemId>,
    canvas_size: egui::Vec2,
    status: Option<String>,
    show_help: bool,
}

impl FloorPlanApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (settings_path, settings) = settings::load_or_default();
        let kinds = settings::KindPalette::resolve(&settings.kind_styles);
        let mut app = Self {
            store: None,
            floor: None,
            keyboard: KeyboardHub::new(),
            settings,
            settings_path,
            kinds,
            command_palette: command_palette::CommandPalette::default(),
            editor: None,
            new_item: None,
            confirm_delete: None,
            canvas_size: egui::vec2(800.0, 600.0),
            status: None,
            show_help: false,
        };
        let path = app.settings.floor_path.clone();
        app.open_floor(&path);
        app
    }
}
