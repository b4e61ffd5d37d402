use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use ride_dashboard::dashboard::{PageView, ViewModel};
use ride_dashboard::data::aggregate::KeyMetrics;
use ride_dashboard::data::model::Rating;

use crate::color::ColorMap;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;
const NO_DATA: &str = "No data";

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the current page in the central panel.
pub fn page(ui: &mut Ui, state: &AppState) {
    let view = match &state.view {
        Some(v) => v,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a ride dataset to start  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(format!("Ride Analytics: {}", view.page));
    warnings(ui, view);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match &view.view {
            PageView::Overall {
                metrics,
                rides_over_time,
                status_breakdown,
            } => {
                ui.strong("Key Metrics");
                key_metrics(ui, metrics);
                ui.add_space(12.0);

                ui.strong("Ride Volume Over Time");
                rides_line_chart(ui, rides_over_time);
                ui.add_space(12.0);

                ui.strong("Booking Status Breakdown");
                category_bar_chart(ui, "status", &as_f64(status_breakdown), &state.color_map);
            }
            PageView::VehicleType { top_vehicle_types } => {
                ui.strong(format!("Top {} Vehicle Types by Ride Distance", state.top_n));
                category_bar_chart(ui, "vehicles", top_vehicle_types, &state.color_map);
            }
            PageView::Revenue {
                revenue_by_payment,
                top_customers,
            } => {
                ui.strong("Revenue by Payment Method");
                category_bar_chart(ui, "payment", revenue_by_payment, &state.color_map);
                ui.add_space(12.0);

                ui.strong(format!(
                    "Top {} Customers by Total Booking Value",
                    state.top_n
                ));
                ranked_table(ui, "customers", "Customer", "Booking value (₹)", top_customers);
            }
            PageView::Cancellation {
                breakdown,
                ignores_filters,
            } => {
                ui.strong("Cancellation Type Breakdown");
                if *ignores_filters {
                    ui.label(
                        RichText::new("Computed over all rides; the filters above do not apply.")
                            .italics(),
                    );
                }
                category_bar_chart(ui, "cancellation", &as_f64(breakdown), &state.color_map);
            }
            PageView::Ratings { driver, customer } => {
                ui.strong("Driver Ratings Distribution");
                rating_chart(ui, "driver_ratings", driver, Color32::LIGHT_BLUE);
                ui.add_space(12.0);

                ui.strong("Customer Ratings Distribution");
                rating_chart(ui, "customer_ratings", customer, Color32::LIGHT_GREEN);
            }
        });
}

fn warnings(ui: &mut Ui, view: &ViewModel) {
    for w in &view.warnings {
        ui.label(RichText::new(w.to_string()).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn key_metrics(ui: &mut Ui, m: &KeyMetrics) {
    ui.columns(4, |cols| {
        metric_card(&mut cols[0], "TOTAL RIDES", m.total_rides.to_string());
        metric_card(
            &mut cols[1],
            "TOTAL REVENUE (₹)",
            m.total_revenue
                .map(|v| group_thousands(v.round() as i64))
                .unwrap_or_else(|| NO_DATA.to_string()),
        );
        metric_card(
            &mut cols[2],
            "AVG CUSTOMER RATING",
            format_opt(m.avg_customer_rating),
        );
        metric_card(
            &mut cols[3],
            "TOTAL RIDE DISTANCE (KM)",
            format_opt(m.total_distance),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).heading().strong());
    });
}

fn format_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// `1234567` → `1,234,567`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn as_f64(counts: &[(String, usize)]) -> Vec<(String, f64)> {
    counts.iter().map(|(k, n)| (k.clone(), *n as f64)).collect()
}

fn rides_line_chart(ui: &mut Ui, series: &[(NaiveDate, usize)]) {
    if series.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    let points: PlotPoints = series
        .iter()
        .map(|(date, n)| [date.num_days_from_ce() as f64, *n as f64])
        .collect();

    Plot::new("rides_over_time")
        .height(CHART_HEIGHT)
        .y_axis_label("Rides")
        .x_axis_formatter(|mark, _range| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.to_string())
                .unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Rides")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}

/// One bar per category, labelled on the x axis.
fn category_bar_chart(ui: &mut Ui, id: &str, values: &[(String, f64)], colors: &ColorMap) {
    if values.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, (label, v))| {
            Bar::new(i as f64, *v)
                .name(label)
                .fill(colors.color_for(label))
                .width(0.6)
        })
        .collect();

    let labels: Vec<String> = values.iter().map(|(label, _)| label.clone()).collect();
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn rating_chart(ui: &mut Ui, id: &str, counts: &[(Rating, usize)], color: Color32) {
    if counts.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    let bars: Vec<Bar> = counts
        .iter()
        .map(|(rating, n)| Bar::new(rating.0, *n as f64).name(rating).width(0.08))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label("Rating")
        .y_axis_label("Rides")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// Ranked (label, value) rows as a two-column table.
fn ranked_table(ui: &mut Ui, id: &str, key_header: &str, value_header: &str, rows: &[(String, f64)]) {
    if rows.is_empty() {
        ui.label(NO_DATA);
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(key_header);
                });
                header.col(|ui| {
                    ui.strong(value_header);
                });
            })
            .body(|mut body| {
                for (label, value) in rows {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.label(format!("{value:.2}"));
                        });
                    });
                }
            });
    });
}
