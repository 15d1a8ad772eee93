use ratatui::layout::Rect;

use super::{
    GhostSlot, LayoutInput, LayoutResult, LayoutRow, Regions, TabLayout, TabPlacement,
    link_neighbours, split_regions,
};
use crate::constants::{CLOSED_TAB_HEIGHT, TAB_HEIGHT};
use crate::tabs::presentation::{LayoutMode, TabsPosition};

/// Labels wrapped into balanced rows. Every label stays visible while the
/// rows fit the area; otherwise the rows farthest from the content overflow.
/// There are no ghosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLayout;

impl TableLayout {
    /// Group label indices into rows no longer than `target`, an oversized
    /// label taking a row of its own.
    fn rows(lengths: &[u16], available: u16) -> Vec<Vec<usize>> {
        let total: u32 = lengths.iter().map(|&l| u32::from(l)).sum();
        let available = u32::from(available.max(1));
        let rows_needed = total.div_ceil(available).max(1);
        let target = total.div_ceil(rows_needed).min(available);

        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut used: u32 = 0;
        for (index, &length) in lengths.iter().enumerate() {
            let length = u32::from(length);
            if !current.is_empty() && used + length > target {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(index);
            used += length;
        }
        if !current.is_empty() {
            rows.push(current);
        }
        rows
    }
}

impl TabLayout for TableLayout {
    fn compute_layout(&self, input: &LayoutInput<'_>) -> LayoutResult {
        let lengths: Vec<u16> = input.labels.iter().map(|l| l.width.max(1)).collect();
        let width = input.area.width;
        let mut grouped = if input.hide_tabs || input.stealth {
            Vec::new()
        } else {
            Self::rows(&lengths, width)
        };

        let selected_row = input.selected.and_then(|id| {
            grouped
                .iter()
                .position(|row| row.iter().any(|&i| input.labels[i].id == id))
        });
        // The selection row always touches the content frame.
        let bottom = input.position == TabsPosition::Bottom;
        if let Some(index) = selected_row {
            let row = grouped.remove(index);
            if bottom {
                grouped.insert(0, row);
            } else {
                grouped.push(row);
            }
        }
        let selection_at =
            |len: usize| selected_row.map(|_| if bottom { 0 } else { len.saturating_sub(1) });
        let extent_for = |len: usize| -> u16 {
            if len == 0 {
                return TAB_HEIGHT;
            }
            let selection = selection_at(len);
            (0..len)
                .map(|row| {
                    if Some(row) == selection {
                        TAB_HEIGHT
                    } else {
                        CLOSED_TAB_HEIGHT
                    }
                })
                .fold(0, u16::saturating_add)
        };

        // Rows farthest from the content give way when the strip would not
        // fit; their labels are listed by the more popup.
        let mut dropped: Vec<usize> = Vec::new();
        if input.position.is_horizontal() {
            while grouped.len() > 1 && extent_for(grouped.len()) > input.area.height {
                let far = if bottom {
                    grouped.pop()
                } else {
                    Some(grouped.remove(0))
                };
                dropped.extend(far.into_iter().flatten());
            }
        }
        dropped.sort_unstable();

        let selection_index = selection_at(grouped.len());
        let height_of = |row: usize| {
            if Some(row) == selection_index {
                TAB_HEIGHT
            } else {
                CLOSED_TAB_HEIGHT
            }
        };
        let extent = extent_for(grouped.len());

        let Regions {
            strip,
            frame,
            content,
            toolbar,
            border,
        } = split_regions(input, extent);

        let mut result = LayoutResult {
            mode: LayoutMode::Table,
            position: input.position,
            area: input.area,
            strip,
            frame,
            content,
            toolbar,
            border,
            placements: Vec::new(),
            rows: Vec::new(),
            overflow: dropped.iter().map(|&i| input.labels[i].id).collect(),
            more: None,
            first_ghost: GhostSlot::default(),
            last_ghost: GhostSlot::default(),
            selected: input.selected,
            stealth: input.stealth,
            tabs_hidden: input.hide_tabs,
        };
        if grouped.is_empty() {
            return result;
        }

        let stretch = grouped.len() > 1;
        let mut y = strip.y;
        for (row_index, row) in grouped.iter().enumerate() {
            let height = height_of(row_index);
            let row_rect = Rect {
                x: strip.x,
                y,
                width: strip.width,
                height,
            };
            let natural: u16 = row.iter().map(|&i| lengths[i].min(width)).sum();
            let extra = if stretch {
                width.saturating_sub(natural)
            } else {
                0
            };
            let share = extra / row.len() as u16;
            let mut remainder = extra % row.len() as u16;

            let mut x = strip.x;
            for (column, &index) in row.iter().enumerate() {
                let mut length = lengths[index].min(width) + share;
                if remainder > 0 {
                    length += 1;
                    remainder -= 1;
                }
                let rect = Rect {
                    x,
                    y,
                    width: length,
                    height,
                };
                x = x.saturating_add(length);
                result.placements.push(TabPlacement {
                    id: input.labels[index].id,
                    rect,
                    row: row_index,
                    column,
                    previous: None,
                    next: None,
                    curve_space: x < strip.x.saturating_add(strip.width),
                });
            }
            result.rows.push(LayoutRow {
                tabs: row.iter().map(|&i| input.labels[i].id).collect(),
                rect: row_rect,
                selection_row: Some(row_index) == selection_index,
            });
            y = y.saturating_add(height);
        }
        link_neighbours(&mut result.placements);
        result
    }
}
