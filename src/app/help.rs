use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help & Shortcuts")
        .open(open)
        .resizable(true)
        .default_width(520.0)
        .default_height(440.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                ui.label("General");
                help_row(ui, "⌘⇧P", "Open command palette");
                help_row(ui, "⌘F", "Find item by name");
                help_row(ui, "⌘N", "Add item");
                help_row(ui, "⌘O", "Open floor file");
                help_row(ui, "⌘0", "Reset view");
                help_row(ui, "F1", "This window");

                ui.add_space(10.0);
                ui.label("Selection");
                help_row(ui, "Delete / Backspace", "Delete selected item (asks first)");
                help_row(ui, "Escape", "Clear selection and close the editor");
                help_row(ui, "Arrow keys", "Move selected item by one tile");

                ui.add_space(10.0);
                ui.label("Canvas");
                help_row(ui, "Drag item", "Move it; an invalid drop snaps back");
                help_row(ui, "Drag background", "Pan");
                help_row(ui, "Scroll wheel", "Scroll");
                help_row(ui, "⌘ + Scroll wheel", "Zoom around the cursor");
                help_row(ui, "Double-click item", "Open the item editor");
                help_row(ui, "Right-click", "Add an item on that tile");

                ui.add_space(20.0);
                ui.heading("Saving");
                ui.separator();
                ui.label("• Every accepted move or edit is written to the floor file at once");
                ui.label("• Items drawn with a dashed outline are still being saved");
                ui.label("• A failed save puts the item back where it was last saved");

                ui.add_space(20.0);
                ui.heading("Item Styles");
                ui.separator();
                ui.label("Override colours and glyphs per item kind in settings.toml:");
                ui.add_space(5.0);
                ui.code(
                    r##"[[kind_styles]]
kind = "cooling_unit"
glyph = "AC"
color = { r = 40, g = 170, b = 200, a = 255 }"##,
                );

                ui.add_space(20.0);
                ui.heading("Files");
                ui.separator();
                ui.label("• Floors are JSON files (floor.json by default)");
                ui.label("• Settings are read from ~/.config/rackfloor.toml or settings.toml");
                ui.label("• Set RUST_LOG=rackfloor=debug to trace gestures and saves");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [130.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
