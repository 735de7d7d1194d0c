//! Layout diagnostics logged at startup and after resizes

use crate::config::LayoutConfig;
use crate::surface::Metrics;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutReport {
    pub viewport_width: f64,
    pub cards: usize,
    pub stylesheets: u32,
    pub container_width: Option<f64>,
    /// Whether two card columns fit; unknown without a container
    pub two_columns: Option<bool>,
}

impl LayoutReport {
    pub fn new(metrics: Metrics, cards: usize, layout: &LayoutConfig) -> Self {
        let min_width = layout.two_column_min_width();
        Self {
            viewport_width: metrics.viewport_width,
            cards,
            stylesheets: metrics.stylesheets,
            container_width: metrics.container_width,
            two_columns: metrics.container_width.map(|w| w >= min_width),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            viewport_width = self.viewport_width,
            cards = self.cards,
            stylesheets = self.stylesheets,
            "Page layout"
        );

        match (self.two_columns, self.container_width) {
            (Some(false), Some(width)) => {
                tracing::warn!(container_width = width, "Screen too narrow for two columns")
            }
            (Some(true), Some(width)) => {
                tracing::info!(container_width = width, "Screen wide enough for two columns")
            }
            _ => {}
        }
    }
}
