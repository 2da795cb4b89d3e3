//! Grid layout and popover geometry
//!
//! Pixel budgets per density preset, the fit-mode column width computation,
//! and the popover placement function. Geometry is pure over rectangles so
//! it unit-tests without a real DOM; the "measure own height after first
//! paint" step is an explicit second placement call.

use plan_store::prefs::Density;
use serde::{Deserialize, Serialize};

/// Upper bound on a fitted week column
pub const MAX_FIT_WEEK_WIDTH: f64 = 120.0;

/// Gap between a popover and its anchor
const POPOVER_GAP: f64 = 8.0;
/// Margin kept from the clamping bounds
const POPOVER_MARGIN: f64 = 4.0;

/// Fixed pixel budgets for one density preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityBudget {
    /// Row-header column on the left
    pub row_header_width: f64,
    /// Each of the two right-hand summary columns
    pub summary_width: f64,
    /// Per-week column when fit mode is off
    pub week_width: f64,
    /// Smallest week column fit mode may produce
    pub min_fit_width: f64,
}

/// Budgets per preset, in the spirit of configuration preset constructors.
pub fn density_budget(density: Density) -> DensityBudget {
    match density {
        Density::Normal => DensityBudget {
            row_header_width: 220.0,
            summary_width: 120.0,
            week_width: 88.0,
            min_fit_width: 56.0,
        },
        Density::Compact => DensityBudget {
            row_header_width: 180.0,
            summary_width: 104.0,
            week_width: 72.0,
            min_fit_width: 56.0,
        },
        Density::Ultra => DensityBudget {
            row_header_width: 148.0,
            summary_width: 88.0,
            week_width: 56.0,
            min_fit_width: 48.0,
        },
    }
}

/// Week column width under fit mode: spread the wrapper across the visible
/// weeks after the fixed columns take their share, clamped to the preset
/// minimum and the global maximum.
pub fn fit_week_width(wrapper_width: f64, density: Density, week_count: usize) -> f64 {
    let budget = density_budget(density);
    if week_count == 0 {
        return budget.week_width;
    }
    let available = wrapper_width - budget.row_header_width - 2.0 * budget.summary_width;
    (available / week_count as f64).clamp(budget.min_fit_width, MAX_FIT_WEEK_WIDTH)
}

// ============================================================================
// Popover geometry
// ============================================================================

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Which side of the anchor the popover hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Right,
    Left,
    Below,
    Above,
}

/// A resolved popover position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub top: f64,
    pub left: f64,
    pub side: Side,
}

/// Place a popover against its anchor.
///
/// Picks a side by available viewport space unless `preferred` overrides
/// it, then clamps horizontally to the container bounds (or the viewport
/// when no container is supplied). An `Above` placement made with an
/// estimated height must be corrected through [`correct_above`] once the
/// rendered height is known.
pub fn place_popover(
    anchor: Rect,
    popover: Size,
    container: Option<Rect>,
    viewport: Size,
    preferred: Option<Side>,
) -> Placement {
    let side = preferred.unwrap_or_else(|| pick_side(anchor, popover, viewport));

    let (top, left) = match side {
        Side::Right => (anchor.y, anchor.right() + POPOVER_GAP),
        Side::Left => (anchor.y, anchor.x - popover.width - POPOVER_GAP),
        Side::Below => (
            anchor.bottom() + POPOVER_GAP,
            anchor.x + anchor.width / 2.0 - popover.width / 2.0,
        ),
        Side::Above => (
            anchor.y - popover.height - POPOVER_GAP,
            anchor.x + anchor.width / 2.0 - popover.width / 2.0,
        ),
    };

    let bounds = container.unwrap_or(Rect::new(0.0, 0.0, viewport.width, viewport.height));
    let min_left = bounds.x + POPOVER_MARGIN;
    let max_left = (bounds.right() - popover.width - POPOVER_MARGIN).max(min_left);

    Placement {
        top: top.max(POPOVER_MARGIN),
        left: left.clamp(min_left, max_left),
        side,
    }
}

/// Second placement pass for `Above` popovers: once the rendered height is
/// known, pull the top up so the popover ends at the anchor without clipping
/// the top of the viewport. Other sides pass through unchanged.
pub fn correct_above(placement: Placement, anchor: Rect, measured_height: f64) -> Placement {
    if placement.side != Side::Above {
        return placement;
    }
    Placement {
        top: (anchor.y - measured_height - POPOVER_GAP).max(POPOVER_MARGIN),
        ..placement
    }
}

fn pick_side(anchor: Rect, popover: Size, viewport: Size) -> Side {
    let space_right = viewport.width - anchor.right();
    let space_left = anchor.x;
    let space_below = viewport.height - anchor.bottom();

    if space_right >= popover.width + POPOVER_GAP {
        Side::Right
    } else if space_left >= popover.width + POPOVER_GAP {
        Side::Left
    } else if space_below >= popover.height + POPOVER_GAP {
        Side::Below
    } else {
        Side::Above
    }
}
