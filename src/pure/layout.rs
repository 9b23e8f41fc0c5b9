//! Tiling layout policies.
//!
//! Layouts are pure functions from the current client ordering and the
//! screen dimensions to a set of screen positions. Nothing in this module
//! talks to the X server: the window manager core applies the computed
//! positions itself.
use crate::{
    pure::{clients::ClientList, geometry::Rect},
    Xid,
};

/// The lower bound for the master region split ratio.
pub const MIN_RATIO: f32 = 0.1;
/// The upper bound for the master region split ratio.
pub const MAX_RATIO: f32 = 0.9;

/// The tiling policies known to minwm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// A uniform grid: `ceil(sqrt(n))` columns filled row major.
    Grid,
    /// A master region on the left with the remaining clients stacked
    /// vertically on the right.
    MainAndStack,
}

impl LayoutKind {
    /// A short name for displaying in logs.
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::Grid => "Grid",
            LayoutKind::MainAndStack => "Side",
        }
    }
}

/// The active layout policy along with its runtime parameters.
///
/// The ratio is kept within [MIN_RATIO]..=[MAX_RATIO] at all times:
/// adjustments past either bound clamp rather than error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    kind: LayoutKind,
    ratio: f32,
    ratio_step: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            kind: LayoutKind::MainAndStack,
            ratio: 0.6,
            ratio_step: 0.1,
        }
    }
}

impl Layout {
    /// Create a new [Layout] with the given policy and split parameters.
    ///
    /// The ratio is clamped into [MIN_RATIO]..=[MAX_RATIO].
    pub fn new(kind: LayoutKind, ratio: f32, ratio_step: f32) -> Self {
        Self {
            kind,
            ratio: ratio.clamp(MIN_RATIO, MAX_RATIO),
            ratio_step,
        }
    }

    /// The currently active policy.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// The current master region split ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// The step used by [adjust_ratio][Layout::adjust_ratio] callers.
    pub fn ratio_step(&self) -> f32 {
        self.ratio_step
    }

    /// Grow or shrink the master region by `delta`, clamping the result
    /// into [MIN_RATIO]..=[MAX_RATIO].
    pub fn adjust_ratio(&mut self, delta: f32) {
        self.ratio = (self.ratio + delta).clamp(MIN_RATIO, MAX_RATIO);
    }

    /// Flip between the known policies, keeping the split parameters.
    pub fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            LayoutKind::Grid => LayoutKind::MainAndStack,
            LayoutKind::MainAndStack => LayoutKind::Grid,
        };
    }

    /// Compute the screen position for every managed client.
    ///
    /// Clients are positioned in registry order; the result always contains
    /// exactly one entry per managed client.
    pub fn positions(&self, clients: &ClientList, r: Rect) -> Vec<(Xid, Rect)> {
        match self.kind {
            LayoutKind::Grid => grid(clients, r),
            LayoutKind::MainAndStack => main_and_stack(clients, r, self.ratio),
        }
    }
}

/// Position clients over a `cols x rows` grid in row major order, with
/// `cols` minimal such that `cols * cols >= n`.
///
/// Cell sizes truncate: any remainder pixels at the right and bottom screen
/// edges are left unused rather than redistributed.
fn grid(clients: &ClientList, r: Rect) -> Vec<(Xid, Rect)> {
    let n = clients.len() as u32;
    if n == 0 {
        return Vec::new();
    }

    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    let rows = (n + cols - 1) / cols;

    let (cw, ch) = (r.w / cols, r.h / rows);

    clients
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (row, col) = (i as u32 / cols, i as u32 % cols);
            let cell = Rect::new(r.x + col * cw, r.y + row * ch, cw, ch);

            (c.id(), cell)
        })
        .collect()
}

/// Master on the left at `ratio` of the screen width, remaining clients
/// stacked top to bottom on the right.
///
/// The last stack client absorbs the integer division remainder so that the
/// stack column tiles the full screen height with no gap or overlap.
fn main_and_stack(clients: &ClientList, r: Rect, ratio: f32) -> Vec<(Xid, Rect)> {
    let n = clients.len();
    let mut positions = Vec::with_capacity(n);

    let mut it = clients.iter();
    let master = match it.next() {
        Some(c) => c,
        None => return positions,
    };

    if n == 1 {
        positions.push((master.id(), r));
        return positions;
    }

    let ratio = ratio.clamp(MIN_RATIO, MAX_RATIO);
    let master_w = std::cmp::max(1, (r.w as f32 * ratio) as u32);
    let (main, stack) = match r.split_at_width(master_w) {
        Some((main, stack)) => (main, stack),
        // Degenerate screens narrower than the master split: give the
        // stack a minimal column rather than dropping clients.
        None => (
            Rect::new(r.x, r.y, r.w, r.h),
            Rect::new(r.x + r.w, r.y, 1, r.h),
        ),
    };
    positions.push((master.id(), main));

    let rows = (n - 1) as u32;
    let each = stack.h / rows;
    for (i, c) in it.enumerate() {
        let i = i as u32;
        let h = if i == rows - 1 {
            stack.h - (rows - 1) * each
        } else {
            each
        };

        positions.push((c.id(), Rect::new(stack.x, stack.y + i * each, stack.w, h)));
    }

    positions
}
