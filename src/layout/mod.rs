//! Tab strip geometry.
//!
//! A layout pass turns the visible labels plus the container area into an
//! immutable [`LayoutResult`]: label rectangles with row/column membership
//! and neighbours, overflow, ghost slots, and the frame/content rectangles
//! the chrome and the host content are placed into.

pub mod single_row;
pub mod table;

pub use single_row::SingleRowLayout;
pub use table::TableLayout;

use ratatui::layout::{Rect, Size};

use crate::constants::DEFAULT_BORDER;
use crate::tabs::TabId;
use crate::tabs::presentation::{Insets, LayoutMode, TabsPosition};

/// Preferred size of one visible label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMetrics {
    pub id: TabId,
    /// Columns the label wants, borders included.
    pub width: u16,
}

/// Space reserved for the selected tab's side toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarSlot {
    pub size: Size,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub area: Rect,
    pub labels: &'a [LabelMetrics],
    pub selected: Option<TabId>,
    pub position: TabsPosition,
    pub ghosts_visible: bool,
    pub hide_tabs: bool,
    pub stealth: bool,
    pub border: Insets,
    pub inner: Insets,
    pub toolbar: Option<ToolbarSlot>,
}

impl<'a> LayoutInput<'a> {
    pub fn new(area: Rect, labels: &'a [LabelMetrics]) -> Self {
        Self {
            area,
            labels,
            selected: labels.first().map(|l| l.id),
            position: TabsPosition::Top,
            ghosts_visible: false,
            hide_tabs: false,
            stealth: false,
            border: Insets::uniform(DEFAULT_BORDER),
            inner: Insets::default(),
            toolbar: None,
        }
    }
}

/// Where one label landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabPlacement {
    pub id: TabId,
    pub rect: Rect,
    pub row: usize,
    pub column: usize,
    pub previous: Option<TabId>,
    pub next: Option<TabId>,
    /// The frame line continues past the label's far edge, so the selected
    /// label can curve into it instead of ending on a straight edge.
    pub curve_space: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub tabs: Vec<TabId>,
    pub rect: Rect,
    /// The row holding the selection blends into the content frame.
    pub selection_row: bool,
}

/// Leading or trailing drop-target placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GhostSlot {
    pub rect: Rect,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResult {
    pub mode: LayoutMode,
    pub position: TabsPosition,
    pub area: Rect,
    /// Region holding the labels. Empty when tabs are hidden.
    pub strip: Rect,
    /// Box whose outline is the content border.
    pub frame: Rect,
    pub content: Rect,
    pub toolbar: Option<Rect>,
    pub border: Insets,
    pub placements: Vec<TabPlacement>,
    pub rows: Vec<LayoutRow>,
    pub overflow: Vec<TabId>,
    pub more: Option<Rect>,
    pub first_ghost: GhostSlot,
    pub last_ghost: GhostSlot,
    pub selected: Option<TabId>,
    pub stealth: bool,
    pub tabs_hidden: bool,
}

impl LayoutResult {
    pub fn placement(&self, id: TabId) -> Option<&TabPlacement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn rect_for(&self, id: TabId) -> Option<Rect> {
        self.placement(id).map(|p| p.rect)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.tabs.len())
    }

    pub fn previous_for(&self, id: TabId) -> Option<TabId> {
        self.placement(id).and_then(|p| p.previous)
    }

    pub fn next_for(&self, id: TabId) -> Option<TabId> {
        self.placement(id).and_then(|p| p.next)
    }

    pub fn has_curve_space_for(&self, id: TabId) -> bool {
        self.placement(id).is_some_and(|p| p.curve_space)
    }

    pub fn is_in_selection_row(&self, id: TabId) -> bool {
        self.placement(id)
            .and_then(|p| self.rows.get(p.row))
            .is_some_and(|r| r.selection_row)
    }

    pub fn is_more_visible(&self) -> bool {
        self.more.is_some()
    }

    /// Label under the given cell.
    pub fn tab_at(&self, column: u16, row: u16) -> Option<TabId> {
        self.placements
            .iter()
            .find(|p| rect_contains(p.rect, column, row))
            .map(|p| p.id)
    }

    pub fn is_more_at(&self, column: u16, row: u16) -> bool {
        self.more.is_some_and(|r| rect_contains(r, column, row))
    }
}

/// Contract shared by the layout engines.
pub trait TabLayout {
    fn compute_layout(&self, input: &LayoutInput<'_>) -> LayoutResult;
}

/// Run the engine selected by `mode`. Table layout needs a horizontal strip.
pub fn compute_layout(mode: LayoutMode, input: &LayoutInput<'_>) -> LayoutResult {
    let result = match mode {
        LayoutMode::Table if input.position.is_horizontal() => TableLayout.compute_layout(input),
        _ => SingleRowLayout.compute_layout(input),
    };
    tracing::trace!(
        mode = ?result.mode,
        placed = result.placements.len(),
        overflow = result.overflow.len(),
        rows = result.rows.len(),
        "layout pass"
    );
    result
}

/// Outer regions derived from the strip size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Regions {
    pub strip: Rect,
    pub frame: Rect,
    pub content: Rect,
    pub toolbar: Option<Rect>,
    pub border: Insets,
}

/// Split the area into strip and frame, then carve content and toolbar out of
/// the frame. `extent` is the strip size across the strip axis.
pub(crate) fn split_regions(input: &LayoutInput<'_>, extent: u16) -> Regions {
    let area = input.area;
    let border = if input.hide_tabs || input.stealth {
        Insets::uniform(DEFAULT_BORDER)
    } else {
        input.border
    };
    let (strip, frame) = if input.hide_tabs {
        (
            Rect {
                x: area.x,
                y: area.y,
                width: 0,
                height: 0,
            },
            area,
        )
    } else {
        match input.position {
            TabsPosition::Top => {
                let h = extent.min(area.height);
                (
                    Rect { height: h, ..area },
                    Rect {
                        y: area.y + h,
                        height: area.height - h,
                        ..area
                    },
                )
            }
            TabsPosition::Bottom => {
                let h = extent.min(area.height);
                (
                    Rect {
                        y: area.y + area.height - h,
                        height: h,
                        ..area
                    },
                    Rect {
                        height: area.height - h,
                        ..area
                    },
                )
            }
            TabsPosition::Left => {
                let w = extent.min(area.width);
                (
                    Rect { width: w, ..area },
                    Rect {
                        x: area.x + w,
                        width: area.width - w,
                        ..area
                    },
                )
            }
            TabsPosition::Right => {
                let w = extent.min(area.width);
                (
                    Rect {
                        x: area.x + area.width - w,
                        width: w,
                        ..area
                    },
                    Rect {
                        width: area.width - w,
                        ..area
                    },
                )
            }
        }
    };

    let mut content = border.add(input.inner).shrink(frame);
    let toolbar = input.toolbar.and_then(|slot| {
        if content.width == 0 || content.height == 0 {
            return None;
        }
        if slot.vertical {
            let w = slot.size.width.min(content.width);
            let rect = Rect { width: w, ..content };
            content.x += w;
            content.width -= w;
            Some(rect)
        } else {
            let h = slot.size.height.min(content.height);
            let rect = Rect { height: h, ..content };
            content.y += h;
            content.height -= h;
            Some(rect)
        }
    });

    Regions {
        strip,
        frame,
        content,
        toolbar,
        border,
    }
}

/// Rectangle of a slot at `offset` along the strip, `length` long and
/// `cross` thick, anchored to the strip edge that faces the frame.
pub(crate) fn slot_rect(
    strip: Rect,
    position: TabsPosition,
    offset: u16,
    length: u16,
    cross: u16,
) -> Rect {
    if position.is_horizontal() {
        let y = match position {
            TabsPosition::Bottom => strip.y,
            _ => strip.y + strip.height.saturating_sub(cross),
        };
        Rect {
            x: strip.x.saturating_add(offset),
            y,
            width: length,
            height: cross.min(strip.height),
        }
    } else {
        let x = match position {
            TabsPosition::Right => strip.x,
            _ => strip.x + strip.width.saturating_sub(cross),
        };
        Rect {
            x,
            y: strip.y.saturating_add(offset),
            width: cross.min(strip.width),
            height: length,
        }
    }
}

/// Length of the strip along its axis.
pub(crate) fn strip_length(strip: Rect, position: TabsPosition) -> u16 {
    if position.is_horizontal() {
        strip.width
    } else {
        strip.height
    }
}

/// Fill in row-local neighbour links for placements grouped by row.
pub(crate) fn link_neighbours(placements: &mut [TabPlacement]) {
    for i in 0..placements.len() {
        let row = placements[i].row;
        let previous = i
            .checked_sub(1)
            .filter(|&p| placements[p].row == row)
            .map(|p| placements[p].id);
        let next = placements
            .get(i + 1)
            .filter(|p| p.row == row)
            .map(|p| p.id);
        placements[i].previous = previous;
        placements[i].next = next;
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabEntry;

    fn labels(widths: &[u16]) -> Vec<LabelMetrics> {
        widths
            .iter()
            .map(|&width| LabelMetrics {
                id: TabEntry::new("t").id(),
                width,
            })
            .collect()
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect {
            x: 2,
            y: 2,
            width: 3,
            height: 2,
        };
        assert!(rect_contains(r, 2, 2));
        assert!(rect_contains(r, 4, 3));
        assert!(!rect_contains(r, 5, 3));
        assert!(!rect_contains(r, 4, 4));
    }

    #[test]
    fn top_strip_sits_above_frame() {
        let ls = labels(&[6]);
        let input = LayoutInput::new(Rect::new(0, 0, 20, 10), &ls);
        let regions = split_regions(&input, 2);
        assert_eq!(regions.strip, Rect::new(0, 0, 20, 2));
        assert_eq!(regions.frame, Rect::new(0, 2, 20, 8));
        assert_eq!(regions.content, Rect::new(1, 3, 18, 6));
    }

    #[test]
    fn right_strip_and_vertical_toolbar() {
        let ls = labels(&[6]);
        let mut input = LayoutInput::new(Rect::new(0, 0, 20, 10), &ls);
        input.position = TabsPosition::Right;
        input.toolbar = Some(ToolbarSlot {
            size: Size::new(4, 2),
            vertical: true,
        });
        let regions = split_regions(&input, 6);
        assert_eq!(regions.strip, Rect::new(14, 0, 6, 10));
        assert_eq!(regions.frame, Rect::new(0, 0, 14, 10));
        assert_eq!(regions.toolbar, Some(Rect::new(1, 1, 4, 8)));
        assert_eq!(regions.content, Rect::new(5, 1, 8, 8));
    }

    #[test]
    fn hidden_tabs_use_default_border_everywhere() {
        let ls = labels(&[6]);
        let mut input = LayoutInput::new(Rect::new(0, 0, 10, 5), &ls);
        input.hide_tabs = true;
        input.border = Insets::default();
        let regions = split_regions(&input, 2);
        assert_eq!(regions.strip.width, 0);
        assert_eq!(regions.frame, input.area);
        assert_eq!(regions.content, Rect::new(1, 1, 8, 3));
    }

    #[test]
    fn neighbours_stay_within_rows() {
        let ls = labels(&[4, 4, 4]);
        let mut placements: Vec<TabPlacement> = ls
            .iter()
            .enumerate()
            .map(|(i, l)| TabPlacement {
                id: l.id,
                rect: Rect::default(),
                row: if i < 2 { 0 } else { 1 },
                column: i % 2,
                previous: None,
                next: None,
                curve_space: false,
            })
            .collect();
        link_neighbours(&mut placements);
        assert_eq!(placements[0].next, Some(ls[1].id));
        assert_eq!(placements[1].previous, Some(ls[0].id));
        assert_eq!(placements[1].next, None);
        assert_eq!(placements[2].previous, None);
    }
}
