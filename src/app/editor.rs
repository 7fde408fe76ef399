use crate::engine::Grid;
use crate::model::{Footprint, GridPos, ItemKind, ItemStatus, NewItem, PlacedItem, Rgba};
use eframe::egui;

/// Form state shared by the edit and add windows.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ItemForm {
    pub name: String,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub notes: String,
    pub sized: bool,
    pub width_m: f64,
    pub length_m: f64,
    pub color: Option<Rgba>,
    pub x: i32,
    pub y: i32,
}

impl ItemForm {
    fn footprint(&self) -> Option<Footprint> {
        self.sized.then_some(Footprint {
            width_m: self.width_m,
            length_m: self.length_m,
        })
    }
}

/// Editor for an existing item, opened by double-clicking it.
pub(super) struct ItemEditor {
    original: PlacedItem,
    form: ItemForm,
}

/// Add-item window. `at` is set when the item goes on a chosen tile rather
/// than the first free one.
pub(super) struct NewItemForm {
    form: ItemForm,
    pub at: Option<GridPos>,
}

pub(super) enum EditorAction {
    None,
    Save(PlacedItem),
    Create(NewItem, Option<GridPos>),
    Close,
}

impl ItemEditor {
    pub fn new(item: PlacedItem, grid: &Grid) -> Self {
        let fallback = grid.footprint_for(grid.span_for(None));
        let footprint = item.footprint.unwrap_or(fallback);
        let form = ItemForm {
            name: item.name.clone(),
            kind: item.kind,
            status: item.status,
            notes: item.meta.notes.clone(),
            sized: item.footprint.is_some(),
            width_m: footprint.width_m,
            length_m: footprint.length_m,
            color: item.meta.color,
            x: item.position.x,
            y: item.position.y,
        };
        Self {
            original: item,
            form,
        }
    }

    pub fn item_id(&self) -> crate::model::ItemId {
        self.original.id
    }

    /// The item as the form currently describes it.
    pub fn edited(&self) -> PlacedItem {
        let mut item = self.original.clone();
        item.name = self.form.name.trim().to_string();
        item.kind = self.form.kind;
        item.status = self.form.status;
        item.position = GridPos::new(self.form.x, self.form.y);
        item.footprint = self.form.footprint();
        item.meta.notes = self.form.notes.clone();
        item.meta.color = self.form.color;
        item
    }

    pub fn show(&mut self, ctx: &egui::Context, grid: &Grid, saving: bool) -> EditorAction {
        let mut action = EditorAction::None;
        let mut open = true;
        egui::Window::new(format!("Edit {}", self.original.name))
            .id(egui::Id::new("item_editor"))
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                form_ui(ui, &mut self.form, grid, true);
                ui.separator();
                if let Some(by) = &self.original.meta.created_by {
                    ui.small(format!("Created by {by}"));
                }
                ui.horizontal(|ui| {
                    let can_save = !saving && !self.form.name.trim().is_empty();
                    if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                        action = EditorAction::Save(self.edited());
                    }
                    if ui.button("Cancel").clicked() {
                        action = EditorAction::Close;
                    }
                    if saving {
                        ui.spinner();
                        ui.small("saving…");
                    }
                });
            });
        if !open {
            action = EditorAction::Close;
        }
        action
    }
}

impl NewItemForm {
    pub fn new(at: Option<GridPos>, grid: &Grid) -> Self {
        let footprint = grid.footprint_for(grid.span_for(None));
        let pos = at.unwrap_or(GridPos::ORIGIN);
        Self {
            form: ItemForm {
                name: String::new(),
                kind: ItemKind::Rack,
                status: ItemStatus::PendingApproval,
                notes: String::new(),
                sized: false,
                width_m: footprint.width_m,
                length_m: footprint.length_m,
                color: None,
                x: pos.x,
                y: pos.y,
            },
            at,
        }
    }

    pub fn draft(&self) -> NewItem {
        let mut draft = NewItem {
            name: self.form.name.trim().to_string(),
            kind: self.form.kind,
            footprint: self.form.footprint(),
            status: self.form.status,
            ..Default::default()
        };
        draft.meta.notes = self.form.notes.clone();
        draft.meta.color = self.form.color;
        draft.meta.created_by = std::env::var("USER").ok();
        draft
    }

    pub fn show(&mut self, ctx: &egui::Context, grid: &Grid) -> EditorAction {
        let mut action = EditorAction::None;
        let mut open = true;
        egui::Window::new("Add item")
            .id(egui::Id::new("new_item"))
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                form_ui(ui, &mut self.form, grid, self.at.is_some());
                if self.at.is_none() {
                    ui.small("Goes on the first free tile, row by row.");
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let can_add = !self.form.name.trim().is_empty();
                    if ui.add_enabled(can_add, egui::Button::new("Add")).clicked() {
                        let at = self.at.map(|_| GridPos::new(self.form.x, self.form.y));
                        action = EditorAction::Create(self.draft(), at);
                    }
                    if ui.button("Cancel").clicked() {
                        action = EditorAction::Close;
                    }
                });
            });
        if !open {
            action = EditorAction::Close;
        }
        action
    }
}

fn form_ui(ui: &mut egui::Ui, form: &mut ItemForm, grid: &Grid, with_position: bool) {
    egui::Grid::new("item_form").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
        ui.label("Name");
        ui.text_edit_singleline(&mut form.name);
        ui.end_row();

        ui.label("Kind");
        egui::ComboBox::from_id_salt("item_kind")
            .selected_text(form.kind.label())
            .show_ui(ui, |ui| {
                for kind in ItemKind::ALL {
                    ui.selectable_value(&mut form.kind, kind, kind.label());
                }
            });
        ui.end_row();

        ui.label("Status");
        egui::ComboBox::from_id_salt("item_status")
            .selected_text(form.status.label())
            .show_ui(ui, |ui| {
                for status in [ItemStatus::PendingApproval, ItemStatus::Confirmed] {
                    ui.selectable_value(&mut form.status, status, status.label());
                }
            });
        ui.end_row();

        if with_position {
            ui.label("Tile");
            ui.horizontal(|ui| {
                ui.label("x");
                ui.add(egui::DragValue::new(&mut form.x).range(0..=grid.cols.saturating_sub(1)));
                ui.label("y");
                ui.add(egui::DragValue::new(&mut form.y).range(0..=grid.rows.saturating_sub(1)));
            });
            ui.end_row();
        }

        ui.label("Footprint");
        ui.vertical(|ui| {
            ui.checkbox(&mut form.sized, "Custom size");
            ui.add_enabled_ui(form.sized, |ui| {
                ui.horizontal(|ui| {
                    ui.label("W");
                    ui.add(
                        egui::DragValue::new(&mut form.width_m)
                            .range(0.1..=50.0)
                            .speed(0.05)
                            .suffix(" m"),
                    );
                    ui.label("L");
                    ui.add(
                        egui::DragValue::new(&mut form.length_m)
                            .range(0.1..=50.0)
                            .speed(0.05)
                            .suffix(" m"),
                    );
                });
            });
            let span = grid.span_for(form.footprint());
            ui.small(format!("{span} tiles"));
        });
        ui.end_row();

        ui.label("Colour");
        ui.horizontal(|ui| {
            let mut custom = form.color.is_some();
            if ui.checkbox(&mut custom, "Override").changed() {
                form.color = custom.then_some(form.color.unwrap_or(Rgba::rgb(120, 120, 120)));
            }
            if let Some(color) = &mut form.color {
                let mut arr = [color.r, color.g, color.b, color.a];
                if ui.color_edit_button_srgba_unmultiplied(&mut arr).changed() {
                    *color = Rgba {
                        r: arr[0],
                        g: arr[1],
                        b: arr[2],
                        a: arr[3],
                    };
                }
            }
        });
        ui.end_row();

        ui.label("Notes");
        ui.add(egui::TextEdit::multiline(&mut form.notes).desired_rows(3));
        ui.end_row();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridDefaults;
    use crate::engine::grid::resolve;
    use crate::model::{ItemId, ItemMeta, RoomGeometry};

    fn grid() -> Grid {
        resolve(&RoomGeometry::new(12.0, 12.0, 60.0, 60.0), &GridDefaults::default())
    }

    fn rack() -> PlacedItem {
        PlacedItem {
            id: ItemId(3),
            name: "A-03".to_string(),
            kind: ItemKind::Rack,
            position: GridPos::new(4, 2),
            footprint: None,
            status: ItemStatus::Confirmed,
            meta: ItemMeta {
                created_by: Some("ops".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn untouched_editor_reproduces_item() {
        let editor = ItemEditor::new(rack(), &grid());
        assert_eq!(editor.edited(), rack());
        assert_eq!(editor.item_id(), ItemId(3));
    }

    #[test]
    fn editor_applies_form_fields() {
        let mut editor = ItemEditor::new(rack(), &grid());
        editor.form.name = "  A-03b ".to_string();
        editor.form.sized = true;
        editor.form.width_m = 1.2;
        editor.form.x = 6;
        let edited = editor.edited();
        assert_eq!(edited.name, "A-03b");
        assert_eq!(edited.position, GridPos::new(6, 2));
        assert_eq!(
            edited.footprint,
            Some(Footprint {
                width_m: 1.2,
                length_m: 0.6
            })
        );
        assert_eq!(edited.meta.created_by.as_deref(), Some("ops"));
    }

    #[test]
    fn new_item_form_defaults_to_one_tile() {
        let form = NewItemForm::new(Some(GridPos::new(2, 5)), &grid());
        let draft = form.draft();
        assert_eq!(draft.footprint, None);
        assert_eq!(draft.kind, ItemKind::Rack);
        assert_eq!((form.form.x, form.form.y), (2, 5));
    }
}
