use ratatui::layout::Rect;

use super::{
    GhostSlot, LabelMetrics, LayoutInput, LayoutResult, LayoutRow, Regions, TabLayout,
    TabPlacement, link_neighbours, slot_rect, split_regions, strip_length,
};
use crate::constants::{
    GHOST_TAB_LENGTH, GHOST_TAB_LENGTH_VERTICAL, MORE_BUTTON_LENGTH, MORE_BUTTON_LENGTH_VERTICAL,
    TAB_HEIGHT, VERTICAL_TAB_HEIGHT,
};
use crate::tabs::TabId;
use crate::tabs::presentation::LayoutMode;

/// All labels on one line; what does not fit goes behind the "more" button.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleRowLayout;

impl SingleRowLayout {
    fn extent(input: &LayoutInput<'_>) -> u16 {
        if input.position.is_horizontal() {
            return TAB_HEIGHT;
        }
        let widest = input.labels.iter().map(|l| l.width).max().unwrap_or(0);
        widest.min(input.area.width / 2)
    }

    fn lengths(input: &LayoutInput<'_>) -> Vec<u16> {
        if input.position.is_horizontal() {
            input.labels.iter().map(|l| l.width.max(1)).collect()
        } else {
            vec![VERTICAL_TAB_HEIGHT; input.labels.len()]
        }
    }

    fn cross(input: &LayoutInput<'_>, strip: Rect) -> u16 {
        if input.position.is_horizontal() {
            TAB_HEIGHT
        } else {
            strip.width
        }
    }

    /// Indices of the labels that stay on screen, in display order, plus the
    /// clamped length of a selected label that is wider than the strip.
    fn fit(
        labels: &[LabelMetrics],
        lengths: &[u16],
        selected: Option<TabId>,
        available: u16,
    ) -> (Vec<usize>, Option<u16>) {
        let mut placed = Vec::new();
        let mut used: u32 = 0;
        for (index, &length) in lengths.iter().enumerate() {
            if used + u32::from(length) > u32::from(available) {
                break;
            }
            used += u32::from(length);
            placed.push(index);
        }

        let Some(selected_index) = selected.and_then(|id| labels.iter().position(|l| l.id == id))
        else {
            return (placed, None);
        };
        if placed.contains(&selected_index) {
            return (placed, None);
        }

        let selected_length = u32::from(lengths[selected_index]);
        while !placed.is_empty() && used + selected_length > u32::from(available) {
            if let Some(dropped) = placed.pop() {
                used -= u32::from(lengths[dropped]);
            }
        }
        placed.push(selected_index);
        let clamp = (selected_length > u32::from(available)).then(|| available.max(1));
        (placed, clamp)
    }
}

impl TabLayout for SingleRowLayout {
    fn compute_layout(&self, input: &LayoutInput<'_>) -> LayoutResult {
        let regions = split_regions(input, Self::extent(input));
        let Regions {
            strip,
            frame,
            content,
            toolbar,
            border,
        } = regions;
        let position = input.position;
        let mut result = LayoutResult {
            mode: LayoutMode::SingleRow,
            position,
            area: input.area,
            strip,
            frame,
            content,
            toolbar,
            border,
            placements: Vec::new(),
            rows: Vec::new(),
            overflow: Vec::new(),
            more: None,
            first_ghost: GhostSlot::default(),
            last_ghost: GhostSlot::default(),
            selected: input.selected,
            stealth: input.stealth,
            tabs_hidden: input.hide_tabs,
        };
        if input.hide_tabs || input.labels.is_empty() {
            return result;
        }

        let total_length = strip_length(strip, position);
        let cross = Self::cross(input, strip);

        if input.stealth {
            let id = input.selected.unwrap_or(input.labels[0].id);
            let rect = slot_rect(strip, position, 0, total_length, cross);
            result.placements.push(TabPlacement {
                id,
                rect,
                row: 0,
                column: 0,
                previous: None,
                next: None,
                curve_space: false,
            });
            result.rows.push(LayoutRow {
                tabs: vec![id],
                rect: strip,
                selection_row: true,
            });
            return result;
        }

        let (ghost_length, more_length) = if position.is_horizontal() {
            (GHOST_TAB_LENGTH, MORE_BUTTON_LENGTH)
        } else {
            (GHOST_TAB_LENGTH_VERTICAL, MORE_BUTTON_LENGTH_VERTICAL)
        };
        let ghosts = if input.ghosts_visible { ghost_length } else { 0 };
        let lengths = Self::lengths(input);
        let available = total_length.saturating_sub(ghosts * 2);
        let wanted: u32 = lengths.iter().map(|&l| u32::from(l)).sum();

        let overflowing = wanted > u32::from(available);
        let (placed, clamp) = if overflowing {
            Self::fit(
                input.labels,
                &lengths,
                input.selected,
                available.saturating_sub(more_length),
            )
        } else {
            ((0..lengths.len()).collect(), None)
        };

        let mut offset = ghosts;
        for (column, &index) in placed.iter().enumerate() {
            let label = input.labels[index];
            let length = match clamp {
                Some(clamped) if Some(label.id) == input.selected => clamped,
                _ => lengths[index],
            };
            let rect = slot_rect(strip, position, offset, length, cross);
            offset = offset.saturating_add(length);
            result.placements.push(TabPlacement {
                id: label.id,
                rect,
                row: 0,
                column,
                previous: None,
                next: None,
                curve_space: offset < total_length,
            });
        }
        link_neighbours(&mut result.placements);

        if input.ghosts_visible {
            result.first_ghost = GhostSlot {
                rect: slot_rect(strip, position, 0, ghost_length, cross),
                visible: true,
            };
            result.last_ghost = GhostSlot {
                rect: slot_rect(strip, position, offset, ghost_length, cross),
                visible: true,
            };
        }

        if overflowing {
            result.overflow = input
                .labels
                .iter()
                .enumerate()
                .filter(|(index, _)| !placed.contains(index))
                .map(|(_, l)| l.id)
                .collect();
            let more_offset = total_length.saturating_sub(more_length);
            result.more = Some(slot_rect(strip, position, more_offset, more_length, cross));
        }

        result.rows.push(LayoutRow {
            tabs: result.placements.iter().map(|p| p.id).collect(),
            rect: strip,
            selection_row: true,
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabEntry;
    use crate::tabs::presentation::TabsPosition;

    fn labels(widths: &[u16]) -> Vec<LabelMetrics> {
        widths
            .iter()
            .map(|&width| LabelMetrics {
                id: TabEntry::new("t").id(),
                width,
            })
            .collect()
    }

    fn area(width: u16) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width,
            height: 10,
        }
    }

    #[test]
    fn everything_fits_without_more() {
        let ls = labels(&[5, 6, 7]);
        let input = LayoutInput::new(area(30), &ls);
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.placements.len(), 3);
        assert!(result.overflow.is_empty());
        assert!(!result.is_more_visible());
        assert_eq!(result.rect_for(ls[1].id), Some(Rect::new(5, 0, 6, 2)));
        assert_eq!(result.previous_for(ls[1].id), Some(ls[0].id));
        assert_eq!(result.next_for(ls[1].id), Some(ls[2].id));
        assert!(result.has_curve_space_for(ls[2].id));
        assert_eq!(result.row_count(), 1);
    }

    #[test]
    fn last_tab_flush_with_edge_has_no_curve_space() {
        let ls = labels(&[5, 5]);
        let input = LayoutInput::new(area(10), &ls);
        let result = SingleRowLayout.compute_layout(&input);
        assert!(result.has_curve_space_for(ls[0].id));
        assert!(!result.has_curve_space_for(ls[1].id));
    }

    #[test]
    fn overflow_moves_trailing_tabs_behind_more() {
        let ls = labels(&[8, 8, 8]);
        let input = LayoutInput::new(area(14), &ls);
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(0, 0, 8, 2)));
        assert_eq!(result.overflow, vec![ls[1].id, ls[2].id]);
        assert_eq!(result.more, Some(Rect::new(11, 0, 3, 2)));
    }

    #[test]
    fn selected_tab_is_never_dropped() {
        let ls = labels(&[6, 6, 6, 6]);
        let mut input = LayoutInput::new(area(16), &ls);
        input.selected = Some(ls[3].id);
        let result = SingleRowLayout.compute_layout(&input);
        // 13 columns left after the more button: two labels fit, the second
        // gives way to the selection.
        let placed: Vec<TabId> = result.placements.iter().map(|p| p.id).collect();
        assert_eq!(placed, vec![ls[0].id, ls[3].id]);
        assert_eq!(result.rect_for(ls[3].id), Some(Rect::new(6, 0, 6, 2)));
        assert_eq!(result.overflow, vec![ls[1].id, ls[2].id]);
    }

    #[test]
    fn oversized_selection_is_clamped() {
        let ls = labels(&[4, 40]);
        let mut input = LayoutInput::new(area(12), &ls);
        input.selected = Some(ls[1].id);
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.placements.len(), 1);
        assert_eq!(result.rect_for(ls[1].id).map(|r| r.width), Some(9));
    }

    #[test]
    fn ghosts_frame_the_labels() {
        let ls = labels(&[5, 5]);
        let mut input = LayoutInput::new(area(20), &ls);
        input.ghosts_visible = true;
        let result = SingleRowLayout.compute_layout(&input);
        assert!(result.first_ghost.visible);
        assert_eq!(result.first_ghost.rect, Rect::new(0, 0, 2, 2));
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(2, 0, 5, 2)));
        assert_eq!(result.last_ghost.rect, Rect::new(12, 0, 2, 2));
    }

    #[test]
    fn trailing_ghost_follows_the_last_label_when_overflowing() {
        // 20 columns less two ghosts leave 16; the more button takes 3 more.
        let ls = labels(&[9, 9, 11]);
        let mut input = LayoutInput::new(area(20), &ls);
        input.ghosts_visible = true;
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.first_ghost.rect, Rect::new(0, 0, 2, 2));
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(2, 0, 9, 2)));
        assert_eq!(result.last_ghost.rect, Rect::new(11, 0, 2, 2));
        assert!(result.last_ghost.visible);
        assert_eq!(result.more, Some(Rect::new(17, 0, 3, 2)));
        assert_eq!(result.overflow, vec![ls[1].id, ls[2].id]);
        let more = result.more.unwrap_or_default();
        assert!(result.last_ghost.rect.right() <= more.x);
    }

    #[test]
    fn stealth_spans_the_strip() {
        let ls = labels(&[5]);
        let mut input = LayoutInput::new(area(20), &ls);
        input.stealth = true;
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(0, 0, 20, 2)));
        assert!(!result.has_curve_space_for(ls[0].id));
    }

    #[test]
    fn left_strip_stacks_labels() {
        let ls = labels(&[7, 9]);
        let mut input = LayoutInput::new(area(40), &ls);
        input.position = TabsPosition::Left;
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.strip, Rect::new(0, 0, 9, 10));
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(0, 0, 9, 3)));
        assert_eq!(result.rect_for(ls[1].id), Some(Rect::new(0, 3, 9, 3)));
        assert_eq!(result.frame.x, 9);
    }

    #[test]
    fn bottom_strip_sits_below_frame() {
        let ls = labels(&[5]);
        let mut input = LayoutInput::new(area(20), &ls);
        input.position = TabsPosition::Bottom;
        let result = SingleRowLayout.compute_layout(&input);
        assert_eq!(result.strip, Rect::new(0, 8, 20, 2));
        assert_eq!(result.rect_for(ls[0].id), Some(Rect::new(0, 8, 5, 2)));
        assert_eq!(result.frame, Rect::new(0, 0, 20, 8));
    }

    #[test]
    fn hidden_tabs_place_nothing() {
        let ls = labels(&[5, 5]);
        let mut input = LayoutInput::new(area(20), &ls);
        input.hide_tabs = true;
        let result = SingleRowLayout.compute_layout(&input);
        assert!(result.placements.is_empty());
        assert_eq!(result.tab_at(1, 0), None);
    }
}
