//! WASM bridge for JSON Graph — exposes the sync engine to a JS renderer.
//!
//! Compiled via `wasm-pack build --target web`. The renderer owns drawing,
//! pan/zoom, and hit testing; it calls in with text edits and drag events
//! and gets back JSON node/edge lists and position updates.

use jg_core::id::NodeId;
use jg_editor::input::DragEvent;
use jg_editor::sync::{DisplayMode, SyncEngine};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The main WASM-facing diagram controller.
///
/// Holds the sync engine. All interaction from the page goes through this
/// struct.
#[wasm_bindgen]
pub struct JsonCanvas {
    engine: SyncEngine,
    /// Last parse error, empty when the text is valid.
    last_error: String,
}

impl Default for JsonCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsonCanvas {
    /// Create a controller in edit mode with no text.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        init_logging();
        Self {
            engine: SyncEngine::default(),
            last_error: String::new(),
        }
    }

    /// Set the JSON source text. Returns `true` if it parsed.
    /// While visualizing, a successful parse rebuilds the graph.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self.engine.set_text(text) {
            Ok(_) => {
                self.last_error.clear();
                true
            }
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }

    pub fn get_text(&self) -> String {
        self.engine.text.clone()
    }

    /// The last parse error message, or empty string.
    pub fn get_error(&self) -> String {
        self.last_error.clone()
    }

    /// Switch between `"edit"` and `"visualize"`. Unknown names select edit.
    /// Returns `false` if entering visualize mode failed to parse the text.
    pub fn set_mode(&mut self, name: &str) -> bool {
        let mode = match name {
            "visualize" => DisplayMode::Visualize,
            _ => DisplayMode::Edit,
        };
        match self.engine.set_mode(mode) {
            Ok(()) => true,
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }

    pub fn get_mode(&self) -> String {
        mode_to_name(self.engine.mode()).to_string()
    }

    /// Nodes at their live positions as a JSON array.
    pub fn nodes_json(&self) -> String {
        serde_json::to_string(&self.engine.render_nodes()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Edges as a JSON array.
    pub fn edges_json(&self) -> String {
        serde_json::to_string(self.engine.edges()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parent → children index as a JSON object.
    pub fn relations_json(&self) -> String {
        self.engine
            .relations()
            .and_then(|r| serde_json::to_string(r).ok())
            .unwrap_or_else(|| "{}".to_string())
    }

    // ─── Drag API ────────────────────────────────────────────────────────

    /// Begin dragging a node. Returns `true` if a drag is now active for it.
    pub fn drag_start(&mut self, node_id: &str, x: f64, y: f64) -> bool {
        let id = NodeId::intern(node_id);
        self.engine.handle_drag(DragEvent::from_drag_start(id, x, y));
        self.engine.drags().is_active(id)
    }

    /// Move a dragged node. Returns the JSON array of
    /// `{"id":…,"position":{"x":…,"y":…}}` updates to apply.
    pub fn drag_move(&mut self, node_id: &str, x: f64, y: f64) -> String {
        let updates = self
            .engine
            .handle_drag(DragEvent::from_drag_move(NodeId::intern(node_id), x, y));
        serde_json::to_string(&updates).unwrap_or_else(|_| "[]".to_string())
    }

    /// End a drag. Returns `true` if one was active.
    pub fn drag_stop(&mut self, node_id: &str) -> bool {
        let id = NodeId::intern(node_id);
        let was_active = self.engine.drags().is_active(id);
        self.engine.handle_drag(DragEvent::from_drag_stop(id));
        was_active
    }

    /// Pretty-print the current text.
    /// Returns JSON `{"ok":true,"text":"..."}` or `{"ok":false,"error":"..."}`.
    pub fn format_text(&self) -> String {
        match self.engine.formatted_text() {
            Ok(text) => json!({ "ok": true, "text": text }).to_string(),
            Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
        }
    }
}

fn mode_to_name(mode: DisplayMode) -> &'static str {
    match mode {
        DisplayMode::Edit => "edit",
        DisplayMode::Visualize => "visualize",
    }
}

// ─── Logging & panic hook ────────────────────────────────────────────────

fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = console_log::init_with_level(log::Level::Info);
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("JSON Graph WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no controller needed) ─────────────────────────

/// Validate JSON text. Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(source: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(source) {
        Ok(_) => json!({ "ok": true }).to_string(),
        Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

/// Parse JSON text and return the built graph.
/// Returns JSON `{"ok":true,"graph":{...}}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn build_graph_json(source: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(source) {
        Ok(v) => v,
        Err(e) => return json!({ "ok": false, "error": e.to_string() }).to_string(),
    };
    let graph = jg_core::build(&value);
    match serde_json::to_value(&graph) {
        Ok(graph) => json!({ "ok": true, "graph": graph }).to_string(),
        Err(e) => json!({ "ok": false, "error": format!("Serialization error: {e}") }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn controller_round_trip() {
        let mut canvas = JsonCanvas::new();
        assert!(canvas.set_text(r#"{"a": 1, "b": {"c": 2}}"#));
        assert!(canvas.set_mode("visualize"));
        assert_eq!(canvas.get_mode(), "visualize");

        let nodes = parse(&canvas.nodes_json());
        assert_eq!(nodes.as_array().unwrap().len(), 5);
        assert_eq!(parse(&canvas.edges_json())[0]["id"], "e1-2");

        assert!(canvas.drag_start("4", 75.0, 200.0));
        let updates = parse(&canvas.drag_move("4", 125.0, 230.0));
        assert_eq!(updates.as_array().unwrap().len(), 2);
        assert_eq!(updates[1]["id"], "5");
        assert_eq!(updates[1]["position"], json!({ "x": 125.0, "y": 330.0 }));
        assert!(canvas.drag_stop("4"));
        assert!(!canvas.drag_stop("4"));
    }

    #[test]
    fn invalid_text_reports_error() {
        let mut canvas = JsonCanvas::new();
        assert!(!canvas.set_text("{"));
        assert!(canvas.get_error().starts_with("invalid JSON"));
        assert_eq!(parse(&canvas.format_text())["ok"], false);
        assert!(canvas.set_text("[]"));
        assert!(canvas.get_error().is_empty());
    }

    #[test]
    fn nested_drag_is_refused() {
        let mut canvas = JsonCanvas::new();
        canvas.set_text("[[1]]");
        canvas.set_mode("visualize");
        assert!(canvas.drag_start("2", 0.0, 100.0));
        assert!(!canvas.drag_start("4", 0.0, 300.0));
        assert_eq!(canvas.drag_move("4", 1.0, 1.0), "[]");
    }

    #[test]
    fn unknown_node_drag_is_refused() {
        let mut canvas = JsonCanvas::new();
        canvas.set_text("[1]");
        canvas.set_mode("visualize");
        assert!(!canvas.drag_start("999", 0.0, 0.0));
        assert_eq!(canvas.drag_move("999", 10.0, 10.0), "[]");
        assert_eq!(parse(&canvas.nodes_json()).as_array().unwrap().len(), 2);
        assert!(!canvas.drag_stop("999"));
    }

    #[test]
    fn standalone_build() {
        let out = parse(&build_graph_json("[]"));
        assert_eq!(out["ok"], true);
        assert_eq!(out["graph"]["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(out["graph"]["relations"], json!({}));
        assert_eq!(parse(&validate("nope"))["ok"], false);
    }
}
