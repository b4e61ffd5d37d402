use std::collections::BTreeSet;
use std::path::Path;

use ride_dashboard::config::DashboardConfig;
use ride_dashboard::dashboard::{Dashboard, Page, ViewModel};
use ride_dashboard::data::cache::DatasetLoader;
use ride_dashboard::data::filter::{FilterState, Selection};
use ride_dashboard::data::model::CategoryColumn;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Memoized reader for the current file; reused while the path is unchanged.
    loader: Option<DatasetLoader>,

    /// Loaded dataset (None until a file loads successfully).
    pub dashboard: Option<Dashboard>,

    /// Active filter selections.
    pub filters: FilterState,

    /// Page shown in the central panel.
    pub page: Page,

    /// Result of the last render (cached until page or filters change).
    pub view: Option<ViewModel>,

    /// Stable colours for every category value in the dataset.
    pub color_map: ColorMap,

    /// Ranked lists length.
    pub top_n: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            loader: None,
            dashboard: None,
            filters: FilterState::default(),
            page: Page::default(),
            view: None,
            color_map: ColorMap::default(),
            top_n: config.top_n,
            status_message: None,
        }
    }

    /// Read a dataset and make it current. Reopening the current file is
    /// served from the loader's memoized table. On failure the previous
    /// dataset is dropped and the error is shown instead.
    pub fn load(&mut self, path: &Path) {
        let loader = match self.loader.take() {
            Some(loader) if loader.path() == path => loader,
            _ => DatasetLoader::new(path),
        };
        let opened = Dashboard::open(&loader, self.top_n);
        self.loader = Some(loader);
        match opened {
            Ok(dashboard) => self.set_dashboard(dashboard),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dashboard = None;
                self.view = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters and colours.
    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        let mut labels = BTreeSet::new();
        for col in CategoryColumn::ALL {
            labels.extend(dashboard.table().distinct_values(col));
        }
        labels.extend(
            dashboard
                .table()
                .iter()
                .filter_map(|t| t.cancellation_type.clone()),
        );
        self.color_map = ColorMap::new(&labels);

        self.filters = FilterState::default();
        self.dashboard = Some(dashboard);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the current page after a page or filter change.
    pub fn refresh(&mut self) {
        self.view = self
            .dashboard
            .as_ref()
            .map(|d| d.render(self.page, &self.filters));
    }

    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.refresh();
        }
    }

    pub fn set_filter(&mut self, column: CategoryColumn, selection: Selection) {
        let current = self.filters.get_mut(column);
        if *current != selection {
            *current = selection;
            self.refresh();
        }
    }
}
