use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use ride_dashboard::dashboard::Page;
use ride_dashboard::data::filter::Selection;
use ride_dashboard::data::model::CategoryColumn;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: page selector and the three filter selectors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    let mut page = state.page;
    for p in Page::ALL {
        ui.radio_value(&mut page, p, p.label());
    }
    state.set_page(page);

    ui.add_space(8.0);
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let options = match &state.dashboard {
        Some(d) => d.options().clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in CategoryColumn::ALL {
                ui.strong(col.label());
                let current = state.filters.get(col).to_string();
                let mut chosen = None;
                egui::ComboBox::from_id_salt(col.label())
                    .selected_text(&current)
                    .width(ui.available_width())
                    .show_ui(ui, |ui: &mut Ui| {
                        for value in options.get(col) {
                            if ui.selectable_label(current == *value, value).clicked() {
                                chosen = Some(Selection::from(value.as_str()));
                            }
                        }
                    });
                if let Some(selection) = chosen {
                    state.set_filter(col, selection);
                }
                ui.add_space(6.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(d), Some(view)) = (&state.dashboard, &state.view) {
            ui.label(format!(
                "{} rides loaded, {} matching",
                d.table().len(),
                view.matching_rides
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open ride data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
