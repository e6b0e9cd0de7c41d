//! Pointer-gesture interpreter for the activity grid.
//!
//! Turns raw down/move/enter/up events into either a click-toggle or a
//! rectangular drag selection, spreadsheet-style: a short press without
//! movement is a click, crossing a small movement threshold turns the press
//! into a paint-drag. The engine owns the selected set and the debounce that
//! pops the edit dialog shortly after a selection settles.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use super::model::CellKey;

/// Manhattan distance (in points) the pointer must travel before an armed
/// press becomes a drag.
const DRAG_SLOP: f32 = 5.0;
/// A press released within this window (and under the slop) counts as a click.
const CLICK_WINDOW: Duration = Duration::from_millis(300);
/// Delay before a settled selection auto-opens the edit dialog.
const OPEN_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy)]
enum Pointer {
    Idle,
    Armed {
        anchor: CellKey,
        origin: (f32, f32),
        pressed_at: Instant,
    },
    Dragging {
        anchor: CellKey,
    },
}

/// Owns the set of selected cells and the pointer state machine. One instance
/// lives in the app for the lifetime of the grid view; nothing here touches
/// the UI framework, so the whole gesture logic is unit-testable.
#[derive(Debug)]
pub struct SelectionEngine {
    selected: BTreeSet<CellKey>,
    pointer: Pointer,
    /// Selection as it was when the current drag started; additive drags
    /// union the live rectangle onto this.
    drag_base: BTreeSet<CellKey>,
    open_deadline: Option<Instant>,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
            pointer: Pointer::Idle,
            drag_base: BTreeSet::new(),
            open_deadline: None,
        }
    }

    pub fn selected(&self) -> &BTreeSet<CellKey> {
        &self.selected
    }

    pub fn is_selected(&self, cell: CellKey) -> bool {
        self.selected.contains(&cell)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, Pointer::Dragging { .. })
    }

    /// A press that started on a cell is still in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self.pointer, Pointer::Idle)
    }

    /// Drop the selection and any pending auto-open.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.open_deadline = None;
    }

    /// Primary button pressed while over `cell`. A plain press resets the
    /// selection scope; holding ctrl/cmd keeps it for additive edits.
    pub fn pointer_down(&mut self, cell: CellKey, x: f32, y: f32, now: Instant, additive: bool) {
        self.open_deadline = None;
        if !additive {
            self.selected.clear();
        }
        self.pointer = Pointer::Armed {
            anchor: cell,
            origin: (x, y),
            pressed_at: now,
        };
    }

    /// Pointer moved to `(x, y)`. Promotes an armed press to a drag once the
    /// slop is exceeded; the drag starts out covering just the anchor.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Pointer::Armed { anchor, origin, .. } = self.pointer else {
            return;
        };
        let distance = (x - origin.0).abs() + (y - origin.1).abs();
        if distance > DRAG_SLOP {
            self.pointer = Pointer::Dragging { anchor };
            self.drag_base = self.selected.clone();
            self.apply_drag(anchor, anchor, true);
        }
    }

    /// Pointer crossed into `cell`. Only meaningful mid-drag: the selection
    /// becomes the rectangle spanned by the anchor and `cell`, unioned with
    /// the pre-drag selection when additive.
    pub fn pointer_enter(&mut self, cell: CellKey, additive: bool) {
        let Pointer::Dragging { anchor } = self.pointer else {
            return;
        };
        self.apply_drag(anchor, cell, additive);
    }

    /// Primary button released. A quick, unmoved press is a click: additive
    /// toggles the anchor, plain selects it (the press already cleared the
    /// rest). Always returns to idle and, if cells remain selected, schedules
    /// the edit dialog to open after a short debounce.
    pub fn pointer_up(&mut self, now: Instant, additive: bool) {
        if let Pointer::Armed { anchor, pressed_at, .. } = self.pointer {
            if now.duration_since(pressed_at) < CLICK_WINDOW {
                if additive {
                    if !self.selected.remove(&anchor) {
                        self.selected.insert(anchor);
                    }
                } else if !self.selected.contains(&anchor) {
                    self.selected.clear();
                    self.selected.insert(anchor);
                }
            }
        }
        self.pointer = Pointer::Idle;
        self.drag_base.clear();
        if !self.selected.is_empty() {
            self.open_deadline = Some(now + OPEN_DELAY);
        }
    }

    /// True exactly once after the debounce elapses with a live selection.
    /// The caller opens the edit dialog on `true`.
    pub fn take_auto_open(&mut self, now: Instant) -> bool {
        match self.open_deadline {
            Some(deadline) if now >= deadline => {
                self.open_deadline = None;
                !self.selected.is_empty()
            }
            _ => false,
        }
    }

    /// Whether a debounce is pending, so the UI keeps repainting until it fires.
    pub fn auto_open_pending(&self) -> bool {
        self.open_deadline.is_some()
    }

    fn apply_drag(&mut self, anchor: CellKey, hovered: CellKey, additive: bool) {
        let mut next = if additive {
            self.drag_base.clone()
        } else {
            BTreeSet::new()
        };
        next.extend(CellKey::span(anchor, hovered));
        self.selected = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(hour: u8, day: u8) -> CellKey {
        CellKey::new(hour, day).unwrap()
    }

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    /// Press, wiggle past the slop, sweep to `to`, release.
    fn drag(engine: &mut SelectionEngine, from: CellKey, to: CellKey, additive: bool) {
        let t0 = Instant::now();
        engine.pointer_down(from, 0.0, 0.0, t0, additive);
        engine.pointer_move(10.0, 0.0);
        engine.pointer_enter(to, additive);
        engine.pointer_up(ms(t0, 100), additive);
    }

    #[test]
    fn quick_click_selects_only_anchor() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 3.0, 4.0, t0, false);
        engine.pointer_up(ms(t0, 50), false);
        assert_eq!(engine.selected().len(), 1);
        assert!(engine.is_selected(cell(17, 1)));
    }

    #[test]
    fn plain_click_resets_previous_selection() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, cell(17, 1), cell(18, 2), false);
        assert_eq!(engine.selected().len(), 4);

        let t0 = Instant::now();
        engine.pointer_down(cell(20, 5), 0.0, 0.0, t0, false);
        assert!(engine.selected().is_empty());
        engine.pointer_up(ms(t0, 50), false);
        assert_eq!(engine.selected().len(), 1);
        assert!(engine.is_selected(cell(20, 5)));
    }

    #[test]
    fn slow_press_is_not_a_click() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_up(ms(t0, 400), false);
        assert!(engine.selected().is_empty());
    }

    #[test]
    fn additive_click_toggles_membership() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(19, 2), 0.0, 0.0, t0, true);
        engine.pointer_up(ms(t0, 50), true);
        assert!(engine.is_selected(cell(19, 2)));

        let t1 = ms(t0, 500);
        engine.pointer_down(cell(19, 2), 0.0, 0.0, t1, true);
        engine.pointer_up(ms(t1, 50), true);
        assert!(!engine.is_selected(cell(19, 2)));
        assert!(engine.selected().is_empty());
    }

    #[test]
    fn movement_under_slop_stays_a_click() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(18, 3), 10.0, 10.0, t0, false);
        engine.pointer_move(12.0, 12.0); // 4 units manhattan
        assert!(!engine.is_dragging());
        engine.pointer_up(ms(t0, 80), false);
        assert_eq!(engine.selected().len(), 1);
    }

    #[test]
    fn drag_selects_full_rectangle() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, cell(19, 3), cell(18, 2), false);

        let expected: BTreeSet<CellKey> =
            [cell(18, 2), cell(18, 3), cell(19, 2), cell(19, 3)].into();
        assert_eq!(engine.selected(), &expected);
    }

    #[test]
    fn drag_rectangle_follows_the_hovered_cell() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_move(10.0, 0.0);
        assert!(engine.is_dragging());
        engine.pointer_enter(cell(20, 4), false);
        assert_eq!(engine.selected().len(), 4 * 4);
        // Sweeping back shrinks the rectangle, it does not accumulate
        engine.pointer_enter(cell(18, 1), false);
        assert_eq!(engine.selected().len(), 2);
        engine.pointer_up(ms(t0, 200), false);
        assert_eq!(engine.selected().len(), 2);
    }

    #[test]
    fn additive_drag_unions_with_prior_selection() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, cell(17, 1), cell(17, 1), false);
        assert_eq!(engine.selected().len(), 1);

        drag(&mut engine, cell(20, 4), cell(21, 5), true);
        assert_eq!(engine.selected().len(), 5);
        assert!(engine.is_selected(cell(17, 1)));
        assert!(engine.is_selected(cell(21, 5)));
    }

    #[test]
    fn plain_drag_replaces_prior_selection() {
        let mut engine = SelectionEngine::new();
        drag(&mut engine, cell(17, 1), cell(17, 2), false);
        drag(&mut engine, cell(20, 4), cell(20, 5), false);
        assert_eq!(engine.selected().len(), 2);
        assert!(!engine.is_selected(cell(17, 1)));
    }

    #[test]
    fn auto_open_fires_once_after_debounce() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_up(ms(t0, 50), false);

        assert!(!engine.take_auto_open(ms(t0, 100)));
        assert!(engine.take_auto_open(ms(t0, 250)));
        assert!(!engine.take_auto_open(ms(t0, 300)));
    }

    #[test]
    fn new_press_cancels_pending_auto_open() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_up(ms(t0, 50), false);
        assert!(engine.auto_open_pending());

        engine.pointer_down(cell(18, 1), 0.0, 0.0, ms(t0, 100), false);
        assert!(!engine.auto_open_pending());
        assert!(!engine.take_auto_open(ms(t0, 400)));
    }

    #[test]
    fn clearing_selection_cancels_auto_open() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_up(ms(t0, 50), false);
        engine.clear();
        assert!(!engine.take_auto_open(ms(t0, 400)));
    }

    #[test]
    fn no_auto_open_while_dragging() {
        let mut engine = SelectionEngine::new();
        let t0 = Instant::now();
        engine.pointer_down(cell(17, 1), 0.0, 0.0, t0, false);
        engine.pointer_move(10.0, 0.0);
        engine.pointer_enter(cell(19, 3), false);
        // Mid-drag nothing is scheduled
        assert!(!engine.auto_open_pending());
        engine.pointer_up(ms(t0, 500), false);
        assert!(engine.auto_open_pending());
    }
}
