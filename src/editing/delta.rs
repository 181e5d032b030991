//! Layout deltas and the delta store
//!
//! A delta is an additive override to a region's base rect, never an
//! absolute position: storing deltas is what lets the same override compose
//! correctly even if the underlying template's base layout changes between
//! sessions. The [`LayoutDeltaStore`] is the single write path for every
//! editing operation (drag commits, keyboard nudges, multi-select ops).

use std::collections::BTreeMap;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::core::settings::MAX_DELTA_MAGNITUDE;

/// Additive override to a region's base rect
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDelta {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutDelta {
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    /// Degrade corrupt components to zero: a persisted record with one bad
    /// field falls back to "no override" for that field only.
    pub fn sanitized(&self) -> LayoutDelta {
        fn component(value: f64) -> f64 {
            if value.is_finite() && value.abs() <= MAX_DELTA_MAGNITUDE {
                value
            } else {
                0.0
            }
        }
        LayoutDelta {
            x: component(self.x),
            y: component(self.y),
            width: component(self.width),
            height: component(self.height),
        }
    }

    /// The base rect translated by `(x, y)` and expanded by
    /// `(width, height)`
    pub fn apply_to(&self, base: Rect) -> Rect {
        Rect::from_origin_size(
            (base.x0 + self.x, base.y0 + self.y),
            (base.width() + self.width, base.height() + self.height),
        )
    }
}

/// Partial delta update: only the present components are written
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl DeltaPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn all(delta: LayoutDelta) -> Self {
        Self {
            x: Some(delta.x),
            y: Some(delta.y),
            width: Some(delta.width),
            height: Some(delta.height),
        }
    }
}

/// Persisted shape of an override record: region id → delta
pub type OverrideRecord = BTreeMap<String, LayoutDelta>;

/// In-progress edit set: region id → delta relative to the base layout
#[derive(Default)]
pub struct LayoutDeltaStore {
    deltas: BTreeMap<String, LayoutDelta>,
}

impl LayoutDeltaStore {
    /// The region's current delta, zero when the region was never edited
    pub fn get(&self, id: &str) -> LayoutDelta {
        self.deltas.get(id).copied().unwrap_or_default()
    }

    /// Merge a partial delta into the region's entry
    pub fn set(&mut self, id: &str, patch: DeltaPatch) {
        let entry = self.deltas.entry(id.to_string()).or_default();
        if let Some(x) = patch.x {
            entry.x = x;
        }
        if let Some(y) = patch.y {
            entry.y = y;
        }
        if let Some(width) = patch.width {
            entry.width = width;
        }
        if let Some(height) = patch.height {
            entry.height = height;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.deltas.remove(id);
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// The region's base rect composed with its delta
    pub fn effective_rect(&self, id: &str, base: Rect) -> Rect {
        self.get(id).apply_to(base)
    }

    /// Load a persisted record, sanitizing every component
    pub fn load_record(&mut self, record: &OverrideRecord) {
        for (id, delta) in record {
            let delta = delta.sanitized();
            if !delta.is_zero() {
                self.deltas.insert(id.clone(), delta);
            }
        }
    }

    /// Export the current edit set, omitting zero entries
    pub fn record(&self) -> OverrideRecord {
        self.deltas
            .iter()
            .filter(|(_, delta)| !delta.is_zero())
            .map(|(id, delta)| (id.clone(), *delta))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_rect_composes_translation_and_expansion() {
        let mut store = LayoutDeltaStore::default();
        store.set(
            "a",
            DeltaPatch::all(LayoutDelta {
                x: 10.0,
                y: -5.0,
                width: 20.0,
                height: 4.0,
            }),
        );
        let base = Rect::new(100.0, 50.0, 180.0, 90.0);
        let rect = store.effective_rect("a", base);
        assert_eq!(rect, Rect::new(110.0, 45.0, 210.0, 89.0));
    }

    #[test]
    fn zero_delta_is_the_identity() {
        let store = LayoutDeltaStore::default();
        let base = Rect::new(0.0, 0.0, 50.0, 20.0);
        assert_eq!(store.effective_rect("unknown", base), base);
    }

    #[test]
    fn set_merges_components_instead_of_replacing() {
        let mut store = LayoutDeltaStore::default();
        store.set("a", DeltaPatch::position(5.0, 6.0));
        store.set("a", DeltaPatch::size(7.0, 8.0));
        assert_eq!(
            store.get("a"),
            LayoutDelta {
                x: 5.0,
                y: 6.0,
                width: 7.0,
                height: 8.0,
            }
        );
    }

    #[test]
    fn sanitize_zeroes_only_the_corrupt_components() {
        let delta = LayoutDelta {
            x: f64::NAN,
            y: -12.0,
            width: 9000.0,
            height: 3.0,
        };
        assert_eq!(
            delta.sanitized(),
            LayoutDelta {
                x: 0.0,
                y: -12.0,
                width: 0.0,
                height: 3.0,
            }
        );
    }

    #[test]
    fn record_round_trip_through_a_fresh_store() {
        let mut store = LayoutDeltaStore::default();
        store.set(
            "A",
            DeltaPatch::all(LayoutDelta {
                x: 10.0,
                y: -5.0,
                width: 0.0,
                height: 0.0,
            }),
        );
        let record = store.record();

        let mut fresh = LayoutDeltaStore::default();
        fresh.load_record(&record);
        let base = Rect::new(30.0, 40.0, 90.0, 70.0);
        assert_eq!(
            fresh.effective_rect("A", base),
            Rect::new(40.0, 35.0, 100.0, 65.0)
        );
    }

    #[test]
    fn load_record_drops_out_of_range_entries() {
        let mut record = OverrideRecord::new();
        record.insert(
            "bad".into(),
            LayoutDelta {
                x: 1200.0,
                y: f64::INFINITY,
                width: 0.0,
                height: 0.0,
            },
        );
        let mut store = LayoutDeltaStore::default();
        store.load_record(&record);
        assert!(store.is_empty());
    }
}
