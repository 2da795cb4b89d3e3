//! Matrix WASM - Browser Bindings for the Week-Matrix Engine
//!
//! Exposes one [`MatrixHandle`] per rendered plan to the host page. The host
//! supplies two functions bridging the persisted store (localStorage or
//! whatever else backs it); every mutation commits through them immediately.
//! Data crosses the boundary as JSON strings, matching the persisted shapes.
//!
//! ## Usage in JavaScript
//!
//! ```javascript
//! import init, { MatrixHandle, score_color } from 'matrix-wasm';
//!
//! await init();
//!
//! const handle = new MatrixHandle(
//!     planId,
//!     (key) => localStorage.getItem(key),
//!     (key, value) => localStorage.setItem(key, value),
//! );
//!
//! const rows = JSON.parse(handle.row_model());
//! const bars = JSON.parse(handle.row_summary("outcome", "luk-1"));
//! handle.begin_artifact_drag(artifactId);
//! handle.drop_on_week(9);
//! ```
//!
//! ## Build
//!
//! ```bash
//! wasm-pack build --target web --out-dir pkg
//! ```

use matrix_core::{
    correct_above, place_popover, MatrixSession, Placement, Rect, RowSelector, Side, Size,
    VraakBars,
};
use plan_store::model::{ArtifactKind, Perspective, PortfolioPlan};
use plan_store::plans::PlanStore;
use plan_store::prefs::{Density, FilterMode};
use plan_store::store::KeyValueStore;
use serde::Deserialize;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

// Log macro for debugging (uses console.log in WASM)
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// Initialize panic hook for better error messages in browser console
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Get current time in milliseconds
fn current_time_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        use js_sys::Date;
        Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// ============================================================================
// Host storage bridge
// ============================================================================

/// Key-value store backed by two host-supplied JS functions.
///
/// `read(key)` returns the stored string or null; `write(key, value)`
/// replaces it. Exceptions from the host are swallowed: a failing read
/// behaves as a missing key, a failing write as a dropped write.
struct JsStore {
    read: js_sys::Function,
    write: js_sys::Function,
}

impl KeyValueStore for JsStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.read
            .call1(&JsValue::NULL, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_string())
    }

    fn put_raw(&self, key: &str, value: &str) {
        let _ = self.write.call2(
            &JsValue::NULL,
            &JsValue::from_str(key),
            &JsValue::from_str(value),
        );
    }
}

// ============================================================================
// Matrix handle
// ============================================================================

fn parse_selector(row_type: &str, row_id: &str) -> Option<RowSelector> {
    match row_type {
        "outcome" => Some(RowSelector::Outcome(row_id.to_string())),
        "case" => Some(RowSelector::Case(row_id.to_string())),
        "knowledge" => Some(RowSelector::Knowledge(row_id.to_string())),
        _ => None,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// The week-matrix session for one plan, driven from the host page.
#[wasm_bindgen]
pub struct MatrixHandle {
    session: MatrixSession,
}

#[wasm_bindgen]
impl MatrixHandle {
    /// Open a session for a plan id. A plan missing from the store opens as
    /// an empty plan with that id: the grid renders, just without chips.
    #[wasm_bindgen(constructor)]
    pub fn new(plan_id: &str, read: js_sys::Function, write: js_sys::Function) -> MatrixHandle {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let store: Arc<dyn KeyValueStore> = Arc::new(JsStore { read, write });
        let plan = PlanStore::new(store.clone())
            .find(plan_id)
            .unwrap_or_else(|| {
                log(&format!("matrix: plan {} not found, opening empty", plan_id));
                PortfolioPlan {
                    id: plan_id.to_string(),
                    ..Default::default()
                }
            });

        MatrixHandle {
            session: MatrixSession::new(store, plan),
        }
    }

    // --- read surface -------------------------------------------------

    /// Derived row model as JSON
    pub fn row_model(&self) -> String {
        to_json(self.session.rows())
    }

    /// Visible week numbers, in calendar order
    pub fn visible_weeks(&self) -> Vec<u32> {
        self.session.visible_weeks().to_vec()
    }

    /// Rendered column headers (dates, holidays, codes) for the visible
    /// weeks, as JSON
    pub fn week_headers(&self) -> String {
        to_json(&self.session.week_headers())
    }

    /// Artifacts in one cell as JSON, after hide-mode filtering
    pub fn cell_artifacts(&self, row_type: &str, row_id: &str, week: u32) -> String {
        match parse_selector(row_type, row_id) {
            Some(selector) => to_json(&self.session.cell_artifacts(&selector, week)),
            None => "[]".to_string(),
        }
    }

    /// VRAAK summary bars for a row across all visible weeks, as JSON
    pub fn row_summary(&self, row_type: &str, row_id: &str) -> String {
        match parse_selector(row_type, row_id) {
            Some(selector) => to_json(&self.session.row_summary(&selector, current_time_ms())),
            None => to_json(&VraakBars::floor()),
        }
    }

    /// VRAAK summary bars for a collapsed block, as JSON (null when the
    /// block id is unknown)
    pub fn block_summary(&self, block_id: &str) -> String {
        match self.session.block_summary(block_id, current_time_ms()) {
            Some(bars) => to_json(&bars),
            None => "null".to_string(),
        }
    }

    /// Kind/perspective tallies for a row, as JSON
    pub fn row_counters(&self, row_type: &str, row_id: &str) -> String {
        match parse_selector(row_type, row_id) {
            Some(selector) => to_json(&self.session.row_counters(&selector)),
            None => "null".to_string(),
        }
    }

    /// Session statistics snapshot, as JSON
    pub fn stats(&self) -> String {
        to_json(&self.session.stats())
    }

    /// Rebuild rows and visible weeks after the host changed the plan
    /// elsewhere (e.g. the authoring dialog added an artifact)
    pub fn refresh(&mut self) {
        self.session.refresh();
    }

    // --- expand/collapse ----------------------------------------------

    pub fn is_open(&self, section_id: &str) -> bool {
        self.session.is_open(section_id)
    }

    pub fn toggle_section(&mut self, section_id: &str) {
        self.session.toggle_section(section_id);
    }

    pub fn toggle_all(&mut self) {
        self.session.toggle_all();
    }

    // --- density / fit / layout ---------------------------------------

    pub fn density(&self) -> String {
        self.session.density().as_str().to_string()
    }

    /// Ignores unknown density names
    pub fn set_density(&mut self, density: &str) {
        if let Some(density) = Density::parse(density) {
            self.session.set_density(density);
        }
    }

    pub fn fit_mode(&self) -> bool {
        self.session.fit_mode()
    }

    pub fn set_fit_mode(&mut self, fit: bool) {
        self.session.set_fit_mode(fit);
    }

    /// Report the wrapper width (mount and every resize)
    pub fn set_wrapper_width(&mut self, width: f64) {
        self.session.set_wrapper_width(width);
    }

    /// Effective per-week column width
    pub fn week_width(&self) -> f64 {
        self.session.week_width()
    }

    // --- filter --------------------------------------------------------

    pub fn toggle_filter_kind(&mut self, kind: &str) {
        if let Some(kind) = ArtifactKind::parse(kind) {
            self.session.toggle_filter_kind(kind);
        }
    }

    pub fn toggle_filter_perspective(&mut self, perspective: &str) {
        if let Some(perspective) = Perspective::parse(perspective) {
            self.session.toggle_filter_perspective(perspective);
        }
    }

    pub fn set_filter_mode(&mut self, mode: &str) {
        match mode {
            "dim" => self.session.set_filter_mode(FilterMode::Dim),
            "hide" => self.session.set_filter_mode(FilterMode::Hide),
            _ => {}
        }
    }

    pub fn clear_filter(&mut self) {
        self.session.clear_filter();
    }

    /// Kinds still reachable under the current perspective selection, as a
    /// JSON string array. Drives option availability, never the selection.
    pub fn available_filter_kinds(&self) -> String {
        let kinds: Vec<&str> = self
            .session
            .filter()
            .available_kinds(&self.session.plan().artifacts)
            .into_iter()
            .map(|k| k.as_str())
            .collect();
        to_json(&kinds)
    }

    /// Perspectives still reachable under the current kind selection
    pub fn available_filter_perspectives(&self) -> String {
        let perspectives: Vec<&str> = self
            .session
            .filter()
            .available_perspectives(&self.session.plan().artifacts)
            .into_iter()
            .map(|p| p.as_str())
            .collect();
        to_json(&perspectives)
    }

    // --- drag / pan / scroll ------------------------------------------

    pub fn begin_artifact_drag(&mut self, artifact_id: &str) {
        self.session.begin_artifact_drag(artifact_id);
    }

    pub fn cancel_artifact_drag(&mut self) {
        self.session.cancel_artifact_drag();
    }

    /// Drop the dragged artifact on a week; commits and patches in memory
    pub fn drop_on_week(&mut self, week: u32) {
        self.session.drop_on_week(week, current_time_ms());
    }

    /// Direct move without a drag gesture (keyboard reassignment)
    pub fn move_artifact(&mut self, artifact_id: &str, week: u32) {
        self.session.move_artifact(artifact_id, week, current_time_ms());
    }

    pub fn pointer_down_background(&mut self, x: f64, scroll_left: f64) {
        self.session.pointer_down_background(x, scroll_left);
    }

    /// Returns the scroll position to apply while panning
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        self.session.pointer_move(x)
    }

    /// Returns true when the gesture was a plain click
    pub fn pointer_up(&mut self) -> bool {
        self.session.pointer_up()
    }

    /// Id of the artifact currently being dragged, if any
    pub fn dragged_artifact_id(&self) -> Option<String> {
        self.session.dragged_artifact().map(|(id, _)| id.to_string())
    }

    /// Origin week of the current artifact drag, for styling the source cell
    pub fn drag_origin_week(&self) -> Option<u32> {
        self.session.dragged_artifact().map(|(_, week)| week)
    }

    /// Scroll event from the matrix or its proxy scrollbar; returns the
    /// position to mirror onto the other element, or null for the echo
    pub fn mirror_scroll(&mut self, scroll_left: f64) -> Option<f64> {
        self.session.scroll_sync().mirror(scroll_left)
    }

    /// Forget a pending mirror echo (the mirrored element did not actually
    /// move, e.g. it was already at the clamped position)
    pub fn reset_scroll_sync(&mut self) {
        self.session.scroll_sync().reset();
    }

    // --- hover / edit --------------------------------------------------

    pub fn set_hovered(&mut self, artifact_id: Option<String>) {
        self.session.set_hovered(artifact_id);
    }

    pub fn hovered(&self) -> Option<String> {
        self.session.hovered().map(String::from)
    }

    /// Wire the host's artifact edit flow; receives the artifact as JSON
    pub fn set_edit_callback(&mut self, callback: js_sys::Function) {
        self.session.set_edit_callback(Box::new(move |artifact| {
            let json = serde_json::to_string(artifact).unwrap_or_else(|_| "null".to_string());
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
        }));
    }

    pub fn request_edit(&self, artifact_id: &str) {
        self.session.request_edit(artifact_id);
    }

    // --- self-assessment -----------------------------------------------

    /// Mean assessed level for a section; `sub_ids_json` is a JSON string array
    pub fn section_assessment(&self, sub_ids_json: &str) -> f64 {
        let sub_ids: Vec<String> = serde_json::from_str(sub_ids_json).unwrap_or_default();
        self.session.section_assessment(&sub_ids)
    }

    pub fn begin_slider(&mut self, category_id: &str) {
        self.session.begin_slider(category_id);
    }

    pub fn slide_to(&mut self, value: u8) {
        self.session.slide_to(value);
    }

    pub fn commit_slider(&mut self) {
        self.session.commit_slider(current_time_ms());
    }

    pub fn set_assessment(&mut self, category_id: &str, level: u8) {
        self.session.set_assessment(category_id, level, current_time_ms());
    }

    /// Clear a whole section's assessments in one write
    pub fn reset_section_assessments(&mut self, sub_ids_json: &str) {
        let sub_ids: Vec<String> = serde_json::from_str(sub_ids_json).unwrap_or_default();
        self.session
            .reset_section_assessments(&sub_ids, current_time_ms());
    }
}

// ============================================================================
// Pure helpers exposed to the host
// ============================================================================

/// CSS color for a 1..=5 score on the red-to-green scale
#[wasm_bindgen]
pub fn score_color(score: f64) -> String {
    matrix_core::score_color(score)
}

/// Proportional fill width (0..=100) for a 1..=5 score
#[wasm_bindgen]
pub fn fill_percent(score: f64) -> f64 {
    matrix_core::fill_percent(score)
}

/// Popover placement request, decoded from the host's JSON
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PopoverQuery {
    anchor: Rect,
    popover: Size,
    container: Option<Rect>,
    viewport: Size,
    preferred: Option<Side>,
}

/// Compute a popover placement from a JSON query:
/// `{anchor, popover, viewport, container?, preferred?}` with rects as
/// `{x, y, width, height}` and sizes as `{width, height}`.
#[wasm_bindgen]
pub fn popover_placement(query_json: &str) -> String {
    let query: PopoverQuery = serde_json::from_str(query_json).unwrap_or_default();
    let placement = place_popover(
        query.anchor,
        query.popover,
        query.container,
        query.viewport,
        query.preferred,
    );
    to_json(&placement)
}

/// Second placement pass once the popover's rendered height is known
#[wasm_bindgen]
pub fn popover_correct_above(
    placement_json: &str,
    anchor_json: &str,
    measured_height: f64,
) -> String {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PlacementIn {
        top: f64,
        left: f64,
        side: Side,
    }
    let Ok(placement) = serde_json::from_str::<PlacementIn>(placement_json) else {
        return "null".to_string();
    };
    let anchor: Rect = serde_json::from_str(anchor_json).unwrap_or_default();
    let corrected = correct_above(
        Placement {
            top: placement.top,
            left: placement.left,
            side: placement.side,
        },
        anchor,
        measured_height,
    );
    to_json(&corrected)
}

/// Get the WASM module version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            parse_selector("outcome", "luk-1"),
            Some(RowSelector::Outcome("luk-1".into()))
        );
        assert_eq!(
            parse_selector("case", "c-1"),
            Some(RowSelector::Case("c-1".into()))
        );
        assert_eq!(parse_selector("banana", "x"), None);
    }

    #[test]
    fn test_popover_placement_json_round_trip() {
        let json = popover_placement(
            r#"{
                "anchor": {"x": 100, "y": 100, "width": 60, "height": 24},
                "popover": {"width": 200, "height": 150},
                "viewport": {"width": 1280, "height": 720}
            }"#,
        );
        let placement: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(placement["side"], "right");
        assert_eq!(placement["left"], 168.0);
    }

    #[test]
    fn test_popover_correction_pass() {
        let placed = popover_placement(
            r#"{
                "anchor": {"x": 100, "y": 200, "width": 60, "height": 24},
                "popover": {"width": 200, "height": 120},
                "viewport": {"width": 1280, "height": 720},
                "preferred": "above"
            }"#,
        );
        let corrected = popover_correct_above(
            &placed,
            r#"{"x": 100, "y": 200, "width": 60, "height": 24}"#,
            180.0,
        );
        let value: serde_json::Value = serde_json::from_str(&corrected).unwrap();
        assert_eq!(value["top"], 12.0);

        assert_eq!(popover_correct_above("not json", "{}", 10.0), "null");
    }

    #[test]
    fn test_malformed_query_defaults_instead_of_panicking() {
        let json = popover_placement("{{{");
        let placement: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(placement.get("side").is_some());
    }
}

// ============================================================================
// WASM-specific Tests
// ============================================================================

#[cfg(test)]
mod wasm_tests {
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    use super::*;

    fn null_store() -> (js_sys::Function, js_sys::Function) {
        (
            js_sys::Function::new_with_args("key", "return null;"),
            js_sys::Function::new_with_args("key, value", "return undefined;"),
        )
    }

    #[wasm_bindgen_test]
    fn test_missing_plan_opens_empty_session() {
        let (read, write) = null_store();
        let handle = MatrixHandle::new("nope", read, write);

        assert!(handle.visible_weeks().is_empty());
        let stats: serde_json::Value = serde_json::from_str(&handle.stats()).unwrap();
        assert_eq!(stats["artifactCount"], 0);
    }

    #[wasm_bindgen_test]
    fn test_score_color_in_browser() {
        assert_eq!(score_color(5.0), "hsl(120, 70%, 45%)");
    }
}
