//! Scheduler configuration.
//!
//! Explicit values come from the bon builder; [`TilingConfig::from_env`]
//! reads the `KGEN_*` environment overrides on top of the defaults.

use bon::bon;
use kgen_ir::{GranularityMode, ScanOrder, Size};

// ============================================================================
// TILING CONFIGURATION
// ============================================================================

/// Knobs of the tiling analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilingConfig {
    pub mode: GranularityMode,
    pub scan_order: ScanOrder,
    /// Work-groups to slice over; the device's compute-unit count otherwise.
    pub nb_work_groups: Option<usize>,
    /// Work-items per group; the unit's compute-element count otherwise.
    pub nb_work_items: Option<usize>,
    /// Fixed external tile in pixels per dimension; derived from the
    /// local-memory budget otherwise.
    pub tile: Option<Size>,
}

#[bon]
impl TilingConfig {
    #[builder(finish_fn = build)]
    pub fn builder(
        #[builder(default)] mode: GranularityMode,
        #[builder(default)] scan_order: ScanOrder,
        nb_work_groups: Option<usize>,
        nb_work_items: Option<usize>,
        tile: Option<Size>,
    ) -> Self {
        Self {
            mode,
            scan_order,
            nb_work_groups: nb_work_groups.filter(|&n| n > 0),
            nb_work_items: nb_work_items.filter(|&n| n > 0),
            tile,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `KGEN_GRANULARITY` - `image`, `tile` or `wg`
    /// * `KGEN_SCAN_ORDER` - `rows` or `columns`
    /// * `KGEN_NB_WG=N` - work-groups to slice over
    /// * `KGEN_NB_WI=N` - work-items per group
    /// * `KGEN_TILE=WxH` - fixed external tile in pixels
    pub fn from_env() -> Self {
        let mode = std::env::var("KGEN_GRANULARITY").ok().and_then(|s| s.parse().ok()).unwrap_or_default();
        let scan_order = std::env::var("KGEN_SCAN_ORDER").ok().and_then(|s| s.parse().ok()).unwrap_or_default();
        let nb_work_groups = std::env::var("KGEN_NB_WG").ok().and_then(|s| s.parse().ok());
        let nb_work_items = std::env::var("KGEN_NB_WI").ok().and_then(|s| s.parse().ok());
        let tile = std::env::var("KGEN_TILE").ok().and_then(|s| parse_tile(&s));

        Self::builder()
            .mode(mode)
            .scan_order(scan_order)
            .maybe_nb_work_groups(nb_work_groups)
            .maybe_nb_work_items(nb_work_items)
            .maybe_tile(tile)
            .build()
    }

    /// Check if the external tile is fixed rather than derived.
    pub fn is_fixed_tile(&self) -> bool {
        self.mode == GranularityMode::ExternalTiling && self.tile.is_some()
    }
}

/// Parse `W`, `WxH` (dimension 0 first) into a pixel tile.
pub fn parse_tile(text: &str) -> Option<Size> {
    let dims: Option<Vec<i64>> = text.split(['x', 'X']).map(|s| s.trim().parse::<i64>().ok().filter(|&n| n > 0)).collect();
    dims.filter(|d| !d.is_empty()).map(Size::new)
}
