use crate::model::{ItemId, RoomId};
use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CommandId {
    AddItem,
    FindItem,
    SwitchRoom,
    EditSelected,
    DeleteSelected,
    ClearSelection,
    ResetView,
    ZoomIn,
    ZoomOut,
    OpenFloor,
    ReloadFloor,
    Help,
}

pub(super) struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub search: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { id: CommandId::AddItem, name: "Item: Add...", search: "add new item rack place" },
    CommandSpec { id: CommandId::FindItem, name: "Item: Find...", search: "find item search go to" },
    CommandSpec { id: CommandId::EditSelected, name: "Item: Edit selected", search: "edit selected item properties" },
    CommandSpec { id: CommandId::DeleteSelected, name: "Item: Delete selected", search: "delete remove selected item" },
    CommandSpec { id: CommandId::ClearSelection, name: "Item: Clear selection", search: "clear deselect selection escape" },
    CommandSpec { id: CommandId::SwitchRoom, name: "Room: Switch...", search: "room switch hall open" },
    CommandSpec { id: CommandId::ResetView, name: "View: Reset", search: "view reset zoom home" },
    CommandSpec { id: CommandId::ZoomIn, name: "View: Zoom in", search: "zoom in view" },
    CommandSpec { id: CommandId::ZoomOut, name: "View: Zoom out", search: "zoom out view" },
    CommandSpec { id: CommandId::OpenFloor, name: "File: Open floor...", search: "open load floor file json" },
    CommandSpec { id: CommandId::ReloadFloor, name: "File: Reload floor", search: "reload refresh floor file" },
    CommandSpec { id: CommandId::Help, name: "Help", search: "help shortcuts keys" },
];

/// What the palette is listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) enum PaletteMode {
    #[default]
    Commands,
    Items,
    Rooms,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum PaletteChoice {
    Command(CommandId),
    Item(ItemId),
    Room(RoomId),
}

/// One selectable row.
#[derive(Clone, Debug)]
pub(super) struct Entry {
    pub label: String,
    pub search: String,
    pub choice: PaletteChoice,
    pub enabled: bool,
}

#[derive(Clone, Copy)]
pub(super) struct CommandContext {
    pub has_floor: bool,
    pub has_selection: bool,
    pub selection_saving: bool,
}

#[derive(Default)]
pub(super) struct CommandPalette {
    pub open: bool,
    pub mode: PaletteMode,
    pub query: String,
    pub selected: usize,
    request_focus: bool,
}

impl CommandPalette {
    pub fn open(&mut self, mode: PaletteMode) {
        self.open = true;
        self.mode = mode;
        self.query.clear();
        self.selected = 0;
        self.request_focus = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
        self.request_focus = false;
    }

    fn is_enabled(cx: CommandContext, id: CommandId) -> bool {
        match id {
            CommandId::AddItem | CommandId::FindItem | CommandId::ResetView => cx.has_floor,
            CommandId::ZoomIn | CommandId::ZoomOut | CommandId::SwitchRoom => cx.has_floor,
            CommandId::EditSelected | CommandId::DeleteSelected => {
                cx.has_selection && !cx.selection_saving
            }
            CommandId::ClearSelection => cx.has_selection,
            CommandId::OpenFloor | CommandId::ReloadFloor | CommandId::Help => true,
        }
    }

    pub fn command_entries(cx: CommandContext) -> Vec<Entry> {
        COMMANDS
            .iter()
            .map(|c| Entry {
                label: c.name.to_string(),
                search: c.search.to_string(),
                choice: PaletteChoice::Command(c.id),
                enabled: Self::is_enabled(cx, c.id),
            })
            .collect()
    }

    pub fn ui(&mut self, ctx: &egui::Context, entries: &[Entry]) -> Option<PaletteChoice> {
        if !self.open {
            return None;
        }
        let matches = rank(&self.query, entries);
        if self.selected >= matches.len() {
            self.selected = matches.len().saturating_sub(1);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
            return None;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) && !matches.is_empty() {
            self.selected = (self.selected + 1).min(matches.len() - 1);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) && !matches.is_empty() {
            self.selected = self.selected.saturating_sub(1);
        }
        let mut run_selected = ctx.input(|i| i.key_pressed(egui::Key::Enter));

        let hint = match self.mode {
            PaletteMode::Commands => "Search commands",
            PaletteMode::Items => "Find item by name",
            PaletteMode::Rooms => "Switch to room",
        };
        let screen = ctx.content_rect();
        let width = 480.0;
        let height = 300.0;
        let pos = egui::pos2(screen.center().x - width * 0.5, screen.top() + 48.0);
        egui::Area::new(egui::Id::new("command_palette"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 240))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255)))
                    .inner_margin(10.0)
                    .corner_radius(egui::CornerRadius::same(8));
                frame.show(ui, |ui| {
                    ui.set_min_size(egui::vec2(width, height));
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.query)
                            .desired_width(f32::INFINITY)
                            .hint_text(hint),
                    );
                    if self.request_focus {
                        resp.request_focus();
                        self.request_focus = false;
                    }
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(height - 64.0).show(ui, |ui| {
                        if matches.is_empty() {
                            ui.weak("No matches");
                        }
                        for (idx, &(entry_idx, _score)) in matches.iter().take(40).enumerate() {
                            let entry = &entries[entry_idx];
                            let resp = ui.add_enabled(
                                entry.enabled,
                                egui::Button::new(entry.label.as_str()).selected(idx == self.selected),
                            );
                            if resp.clicked() {
                                self.selected = idx;
                                run_selected = true;
                            }
                        }
                    });
                });
            });

        if !run_selected {
            return None;
        }
        let entry = matches.get(self.selected).map(|&(idx, _)| &entries[idx])?;
        if !entry.enabled {
            return None;
        }
        let choice = entry.choice;
        self.close();
        Some(choice)
    }
}

/// Indices of entries matching `query`, best first. An empty query keeps
/// every entry in its original order.
pub(super) fn rank(query: &str, entries: &[Entry]) -> Vec<(usize, i64)> {
    let q = query.trim();
    if q.is_empty() {
        return (0..entries.len()).map(|i| (i, 0)).collect();
    }
    let matcher = SkimMatcherV2::default();
    let mut out: Vec<(usize, i64)> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            let by_label = matcher.fuzzy_match(&e.label, q);
            let by_search = matcher.fuzzy_match(&e.search, q);
            by_label.max(by_search).map(|score| (i, score))
        })
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| entries[a.0].label.cmp(&entries[b.0].label)));
    out
}
