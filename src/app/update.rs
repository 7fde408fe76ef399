use crate::engine::{DropOutcome, FloorKey};
use crate::model::RoomId;
use eframe::egui;

use super::command_palette::{
    CommandContext, CommandId, CommandPalette, Entry, PaletteChoice, PaletteMode,
};
use super::editor::EditorAction;
use super::render::draw_floor;
use super::FloorPlanApp;

const KEYMAP: &[(egui::Key, FloorKey)] = &[
    (egui::Key::Delete, FloorKey::Delete),
    (egui::Key::Backspace, FloorKey::Backspace),
    (egui::Key::Escape, FloorKey::Escape),
    (egui::Key::ArrowLeft, FloorKey::ArrowLeft),
    (egui::Key::ArrowRight, FloorKey::ArrowRight),
    (egui::Key::ArrowUp, FloorKey::ArrowUp),
    (egui::Key::ArrowDown, FloorKey::ArrowDown),
];

const ZOOM_STEP: f32 = 1.25;

impl eframe::App for FloorPlanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open floor... (⌘O)").clicked() {
                        self.open_floor_dialog();
                        ui.close();
                    }
                    if ui.button("Reload").clicked() {
                        self.reload_floor();
                        ui.close();
                    }
                    ui.separator();
                    ui.small(format!("Floor: {}", self.settings.floor_path));
                    ui.small(format!("Settings: {}", self.settings_path));
                });
                ui.menu_button("Item", |ui| {
                    let has_floor = self.floor.is_some();
                    let selected = self.floor.as_ref().and_then(|v| v.plan.selected());
                    let saving = match (&self.floor, selected) {
                        (Some(view), Some(id)) => view.plan.is_saving(id),
                        _ => false,
                    };
                    if ui.add_enabled(has_floor, egui::Button::new("Add... (⌘N)")).clicked() {
                        self.open_new_item(None);
                        ui.close();
                    }
                    if ui.add_enabled(has_floor, egui::Button::new("Find... (⌘F)")).clicked() {
                        self.command_palette.open(PaletteMode::Items);
                        ui.close();
                    }
                    ui.separator();
                    let can_edit = selected.is_some() && !saving;
                    if ui.add_enabled(can_edit, egui::Button::new("Edit")).clicked() {
                        self.edit_selected();
                        ui.close();
                    }
                    if ui.add_enabled(can_edit, egui::Button::new("Delete")).clicked() {
                        self.request_delete_selected();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    let size = self.canvas_size;
                    if ui.button("Reset (⌘0)").clicked() {
                        if let Some(view) = &mut self.floor {
                            view.plan.reset_viewport();
                        }
                        ui.close();
                    }
                    if ui.button("Zoom in").clicked() {
                        if let Some(view) = &mut self.floor {
                            view.plan.step_zoom(ZOOM_STEP, size);
                        }
                    }
                    if ui.button("Zoom out").clicked() {
                        if let Some(view) = &mut self.floor {
                            view.plan.step_zoom(1.0 / ZOOM_STEP, size);
                        }
                    }
                });
                if ui.button("Help").clicked() {
                    self.show_help = true;
                }
                ui.separator();
                self.room_picker(ui);
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label("Ready");
                }
                if let Some(view) = &self.floor {
                    let plan = &view.plan;
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("Zoom: {:.0}%", plan.viewport().scale * 100.0));
                        ui.separator();
                        let grid = plan.grid();
                        ui.label(format!("Tiles: {}×{}", grid.cols, grid.rows));
                        ui.separator();
                        ui.label(format!("Items: {}", plan.items().len()));
                        if let Some(item) = plan.selected().and_then(|id| plan.item(id)) {
                            ui.separator();
                            let saving = if plan.is_saving(item.id()) { " (saving)" } else { "" };
                            ui.label(format!(
                                "{} at {}{saving}",
                                item.committed.name, item.committed.position
                            ));
                        }
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            self.canvas_size = rect.size();
            let Some(view) = &mut self.floor else {
                ui.put(rect, egui::Label::new("No room loaded. Use File → Open floor."));
                return;
            };
            let local = |p: egui::Pos2| (p - rect.min).to_pos2();

            // egui reports wheel deltas with positive y meaning "scroll up"
            let (scroll, zoom_modifier) =
                ctx.input(|i| (i.raw_scroll_delta, i.modifiers.command || i.modifiers.ctrl));
            if scroll != egui::Vec2::ZERO {
                if let Some(hover) = response.hover_pos() {
                    view.plan.wheel(local(hover), -scroll, zoom_modifier);
                }
            }

            if response.double_clicked() {
                if let Some(p) = response.interact_pointer_pos() {
                    view.plan.double_activate(local(p));
                }
            } else if response.clicked() {
                if let Some(p) = response.interact_pointer_pos() {
                    view.plan.pointer_down(local(p));
                    view.plan.pointer_up(local(p));
                }
            }
            if response.drag_started() {
                if let Some(p) = ctx.input(|i| i.pointer.press_origin()) {
                    view.plan.pointer_down(local(p));
                }
            }
            if response.dragged() {
                if let Some(p) = response.interact_pointer_pos() {
                    view.plan.pointer_move(local(p));
                }
            }
            if response.drag_stopped() {
                let p = response
                    .interact_pointer_pos()
                    .or_else(|| ctx.input(|i| i.pointer.latest_pos()));
                if let Some(p) = p {
                    if let DropOutcome::Reverted { id, reason, .. } = view.plan.pointer_up(local(p)) {
                        tracing::debug!(item = %id, %reason, "drop snapped back");
                    }
                } else {
                    view.plan.cancel_gesture();
                }
            }

            let mut add_at = None;
            let menu_cell = response
                .interact_pointer_pos()
                .map(|p| view.plan.cell_at(local(p)));
            response.context_menu(|ui| {
                if let Some(cell) = menu_cell {
                    if ui.button(format!("Add item at {cell}")).clicked() {
                        add_at = Some(cell);
                        ui.close();
                    }
                }
            });

            let painter = ui.painter_at(rect);
            draw_floor(&painter, rect, &view.plan, &self.kinds);

            if let Some(cell) = add_at {
                self.open_new_item(Some(cell));
            }
        });

        self.show_windows(ctx);
        self.process_events();
        self.sync_editor();

        super::help::draw_help_window(ctx, &mut self.show_help);
    }
}

impl FloorPlanApp {
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let wants_keyboard = ctx.wants_keyboard_input();
        let modal = self.command_palette.open
            || self.editor.is_some()
            || self.new_item.is_some()
            || self.confirm_delete.is_some();
        let mut open_dialog = false;
        let mut floor_keys = Vec::new();
        ctx.input_mut(|i| {
            if !self.command_palette.open
                && i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::P)
            {
                self.command_palette.open(PaletteMode::Commands);
            }
            if !self.command_palette.open && i.consume_key(egui::Modifiers::COMMAND, egui::Key::F) {
                self.command_palette.open(PaletteMode::Items);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                open_dialog = true;
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = true;
            }
            if wants_keyboard || modal {
                return;
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::N) {
                self.open_new_item(None);
                return;
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Num0) {
                if let Some(view) = &mut self.floor {
                    view.plan.reset_viewport();
                }
            }
            for &(key, floor_key) in KEYMAP {
                if i.consume_key(egui::Modifiers::NONE, key) {
                    floor_keys.push(floor_key);
                }
            }
        });
        if open_dialog {
            self.open_floor_dialog();
        }
        if let Some(view) = &mut self.floor {
            for key in floor_keys {
                view.plan.handle_key(&view.keys, key);
            }
        }
    }

    fn room_picker(&mut self, ui: &mut egui::Ui) {
        let Some(store) = &self.store else {
            return;
        };
        let current = self.floor.as_ref().map(|v| v.plan.room_id());
        let current_name = self
            .floor
            .as_ref()
            .map(|v| v.plan.room_name().to_string())
            .unwrap_or_else(|| "No room".to_string());
        let mut picked = None;
        egui::ComboBox::from_id_salt("room_picker")
            .selected_text(current_name)
            .show_ui(ui, |ui| {
                for room in store.rooms() {
                    if ui.selectable_label(current == Some(room.id), &room.name).clicked() {
                        picked = Some(room.id);
                    }
                }
            });
        if let Some(id) = picked.filter(|id| Some(*id) != current) {
            self.open_room(id);
        }
    }

    fn show_windows(&mut self, ctx: &egui::Context) {
        let action = match (&mut self.editor, &self.floor) {
            (Some(editor), Some(view)) => {
                let saving = view.plan.is_saving(editor.item_id());
                editor.show(ctx, view.plan.grid(), saving)
            }
            _ => EditorAction::None,
        };
        match action {
            EditorAction::Save(edited) => {
                if self.save_edit(edited) {
                    self.close_editor();
                }
            }
            EditorAction::Close => self.close_editor(),
            EditorAction::None | EditorAction::Create(..) => {}
        }

        let action = match (&mut self.new_item, &self.floor) {
            (Some(form), Some(view)) => form.show(ctx, view.plan.grid()),
            _ => EditorAction::None,
        };
        match action {
            EditorAction::Create(draft, at) => {
                if self.create_item(draft, at) {
                    self.new_item = None;
                }
            }
            EditorAction::Close => self.new_item = None,
            EditorAction::None | EditorAction::Save(_) => {}
        }

        if let Some(id) = self.confirm_delete {
            let name = self
                .floor
                .as_ref()
                .and_then(|v| v.plan.item(id))
                .map(|w| w.committed.name.clone());
            match name {
                Some(name) => {
                    let mut answer = None;
                    egui::Window::new("Delete item")
                        .collapsible(false)
                        .resizable(false)
                        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                        .show(ctx, |ui| {
                            ui.label(format!("Delete {name}? This cannot be undone."));
                            ui.horizontal(|ui| {
                                if ui.button("Delete").clicked() {
                                    answer = Some(true);
                                }
                                if ui.button("Keep").clicked() {
                                    answer = Some(false);
                                }
                            });
                        });
                    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                        answer = Some(false);
                    }
                    match answer {
                        Some(true) => {
                            self.confirm_delete = None;
                            self.delete_confirmed(id);
                        }
                        Some(false) => self.confirm_delete = None,
                        None => {}
                    }
                }
                None => self.confirm_delete = None,
            }
        }

        let entries = self.palette_entries();
        if let Some(choice) = self.command_palette.ui(ctx, &entries) {
            self.run_palette_choice(choice);
            ctx.request_repaint();
        }
    }

    fn palette_entries(&self) -> Vec<Entry> {
        match self.command_palette.mode {
            PaletteMode::Commands => {
                let selected = self.floor.as_ref().and_then(|v| v.plan.selected());
                let cx = CommandContext {
                    has_floor: self.floor.is_some(),
                    has_selection: selected.is_some(),
                    selection_saving: match (&self.floor, selected) {
                        (Some(view), Some(id)) => view.plan.is_saving(id),
                        _ => false,
                    },
                };
                CommandPalette::command_entries(cx)
            }
            PaletteMode::Items => self
                .floor
                .iter()
                .flat_map(|v| v.plan.items())
                .map(|w| Entry {
                    label: format!("{} ({})", w.committed.name, w.committed.kind.label()),
                    search: format!("{} {}", w.committed.name, w.committed.kind.label()),
                    choice: PaletteChoice::Item(w.id()),
                    enabled: true,
                })
                .collect(),
            PaletteMode::Rooms => self
                .store
                .iter()
                .flat_map(|s| s.rooms())
                .map(|r| Entry {
                    label: r.name.clone(),
                    search: r.name.clone(),
                    choice: PaletteChoice::Room(r.id),
                    enabled: true,
                })
                .collect(),
        }
    }

    fn run_palette_choice(&mut self, choice: PaletteChoice) {
        match choice {
            PaletteChoice::Command(id) => self.run_command(id),
            PaletteChoice::Item(id) => {
                let size = self.canvas_size;
                if let Some(view) = &mut self.floor {
                    view.plan.focus_item(id, size);
                }
            }
            PaletteChoice::Room(id) => self.switch_room(id),
        }
    }

    fn switch_room(&mut self, id: RoomId) {
        if self.floor.as_ref().map(|v| v.plan.room_id()) != Some(id) {
            self.open_room(id);
        }
    }

    fn run_command(&mut self, id: CommandId) {
        let size = self.canvas_size;
        match id {
            CommandId::AddItem => self.open_new_item(None),
            CommandId::FindItem => self.command_palette.open(PaletteMode::Items),
            CommandId::SwitchRoom => self.command_palette.open(PaletteMode::Rooms),
            CommandId::EditSelected => self.edit_selected(),
            CommandId::DeleteSelected => self.request_delete_selected(),
            CommandId::ClearSelection => {
                if let Some(view) = &mut self.floor {
                    view.plan.handle_key(&view.keys, FloorKey::Escape);
                }
            }
            CommandId::ResetView => {
                if let Some(view) = &mut self.floor {
                    view.plan.reset_viewport();
                }
            }
            CommandId::ZoomIn => {
                if let Some(view) = &mut self.floor {
                    view.plan.step_zoom(ZOOM_STEP, size);
                }
            }
            CommandId::ZoomOut => {
                if let Some(view) = &mut self.floor {
                    view.plan.step_zoom(1.0 / ZOOM_STEP, size);
                }
            }
            CommandId::OpenFloor => self.open_floor_dialog(),
            CommandId::ReloadFloor => self.reload_floor(),
            CommandId::Help => self.show_help = true,
        }
    }

    fn close_editor(&mut self) {
        self.editor = None;
        if let Some(view) = &mut self.floor {
            view.plan.close_editor();
        }
    }

    /// Escape and deletions close the engine's editor; the window follows.
    fn sync_editor(&mut self) {
        let editing = self.floor.as_ref().and_then(|v| v.plan.editing());
        if let Some(editor) = &self.editor {
            if editing != Some(editor.item_id()) {
                self.editor = None;
            }
        }
    }
}
