use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use term_tabs::constants::MORE_GLYPH;
use term_tabs::tabs::{TabContainer, TabEntry, TabId};
use term_tabs::ui::UiFrame;

fn row(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()).to_string())
        .collect()
}

fn render(tabs: &mut TabContainer, area: Rect) -> Buffer {
    let mut buf = Buffer::empty(area);
    let mut frame = UiFrame::from_parts(area, &mut buf);
    tabs.render(&mut frame, area);
    buf
}

fn container(labels: &[&str]) -> (TabContainer, Vec<TabId>) {
    let mut tabs = TabContainer::default();
    let ids = labels
        .iter()
        .map(|label| tabs.add_tab(TabEntry::new(label.to_string())))
        .collect();
    (tabs, ids)
}

#[test]
fn narrow_strip_sends_the_rest_behind_more() {
    // Labels are 9, 9 and 11 wide; 14 columns hold Alpha and part of Bravo.
    let (mut tabs, ids) = container(&["Alpha", "Bravo", "Charlie"]);
    let layout = tabs.do_layout(Rect::new(0, 0, 14, 6)).clone();

    assert_eq!(layout.placements.len(), 1);
    assert_eq!(layout.rect_for(ids[0]), Some(Rect::new(0, 0, 9, 2)));
    assert_eq!(layout.overflow, vec![ids[1], ids[2]]);
    assert!(layout.is_more_visible());
    assert_eq!(layout.more, Some(Rect::new(11, 0, 3, 2)));

    let buf = render(&mut tabs, Rect::new(0, 0, 14, 6));
    assert_eq!(buf.cell((12, 1)).map(|c| c.symbol()), Some(MORE_GLYPH));
}

#[test]
fn overflow_never_hides_the_selection() {
    let (mut tabs, ids) = container(&["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);
    for width in 4..48 {
        for &id in &ids {
            tabs.select(id, false);
            let layout = tabs.do_layout(Rect::new(0, 0, width, 8));
            let rect = layout.rect_for(id).expect("selected tab is placed");
            assert!(rect.width > 0 && rect.height > 0, "width {width}");
            assert!(!layout.overflow.contains(&id));
        }
    }
}

#[test]
fn table_mode_keeps_every_tab_on_screen() {
    let (mut tabs, ids) = container(&["abcd", "efgh", "ijkl", "mnop"]);
    tabs.set_single_row(false);
    let layout = tabs.do_layout(Rect::new(0, 0, 20, 10)).clone();

    assert_eq!(layout.row_count(), 2);
    assert!(layout.overflow.is_empty());
    assert!(!layout.is_more_visible());
    assert!(layout.rows[1].selection_row);
    assert_eq!(layout.rows[1].tabs, vec![ids[0], ids[1]]);
    assert_eq!(layout.frame.y, 5);

    tabs.select(ids[3], false);
    let layout = tabs.layout().expect("relayout after selection");
    assert_eq!(layout.rows[1].tabs, vec![ids[2], ids[3]]);
}

#[test]
fn short_table_keeps_the_selection_row_in_view() {
    let (mut tabs, ids) = container(&["abcd", "efgh", "ijkl", "mnop", "qrst", "uvwx"]);
    tabs.set_single_row(false);
    let area = Rect::new(0, 0, 20, 5);

    for &id in &ids {
        tabs.select(id, false);
        let layout = tabs.do_layout(area);
        let rect = layout.rect_for(id).expect("selected tab is placed");
        assert!(rect.y + rect.height <= area.y + area.height, "{rect:?}");
        assert!(!layout.overflow.contains(&id));
        assert!(layout.strip.height <= area.height);
        for placement in &layout.placements {
            assert!(placement.rect.y + placement.rect.height <= area.height);
        }
        assert_eq!(layout.placements.len() + layout.overflow.len(), ids.len());
    }

    tabs.select(ids[0], false);
    let layout = tabs.do_layout(area).clone();
    assert_eq!(layout.rect_for(ids[0]), Some(Rect::new(0, 3, 10, 2)));
    assert_eq!(layout.overflow, vec![ids[2], ids[3]]);
    assert_eq!(tabs.find_tab_label_by(1, 4), Some(ids[0]));
}

#[test]
fn chrome_opens_the_selected_label_into_the_frame() {
    let (mut tabs, _) = container(&["a", "b"]);
    let area = Rect::new(0, 0, 14, 4);
    let buf = render(&mut tabs, area);
    assert_eq!(row(&buf, 0), "╭───╮┌───╮    ");
    assert_eq!(row(&buf, 1), "│ a ││ b │    ");
    assert_eq!(row(&buf, 2), "│   └┴───┴───┐");
    assert_eq!(row(&buf, 3), "└────────────┘");
    assert!(!tabs.needs_repaint());
    assert_eq!(tabs.content_area(), Some(Rect::new(1, 3, 12, 0)));
}

#[test]
fn clicking_a_label_selects_it() {
    let (mut tabs, ids) = container(&["a", "b"]);
    render(&mut tabs, Rect::new(0, 0, 14, 4));
    let click = Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(crossterm::event::MouseButton::Left),
        column: 6,
        row: 1,
        modifiers: KeyModifiers::NONE,
    });
    assert!(tabs.handle_event(&click));
    assert_eq!(tabs.selected(), Some(ids[1]));
    assert_eq!(tabs.find_at(3, 3), Some(ids[1]));
    assert_eq!(tabs.find_at(13, 0), None);
}

#[test]
fn navigation_keys_walk_the_visible_tabs() {
    let (mut tabs, ids) = container(&["a", "b", "c"]);
    let next = Event::Key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::CONTROL));
    let previous = Event::Key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::CONTROL));

    assert!(!tabs.can_select_previous());
    assert!(tabs.handle_event(&next));
    assert!(tabs.handle_event(&next));
    assert_eq!(tabs.selected(), Some(ids[2]));
    assert!(!tabs.can_select_next());
    assert!(!tabs.handle_event(&next));
    assert!(tabs.handle_event(&previous));
    assert_eq!(tabs.selected(), Some(ids[1]));
}

#[test]
fn attraction_runs_the_animator_while_any_tab_blinks() {
    let (mut tabs, ids) = container(&["a", "b"]);
    assert!(!tabs.is_animating());

    tabs.update_tab(ids[0], |e| e.fire_attraction()).unwrap();
    assert!(tabs.is_animating());
    tabs.update_tab(ids[1], |e| e.fire_attraction()).unwrap();
    assert!(tabs.is_animating());
    tabs.update_tab(ids[1], |e| e.fire_attraction()).unwrap();
    assert_eq!(tabs.attracting_tabs().count(), 2);

    let now = Instant::now();
    assert!(tabs.tick(now));
    assert_eq!(tabs.entry(ids[0]).map(TabEntry::blink_count), Some(1));
    tabs.tick(now + Duration::from_secs(1));
    assert_eq!(tabs.entry(ids[1]).map(TabEntry::blink_count), Some(2));

    tabs.update_tab(ids[0], |e| e.stop_attraction()).unwrap();
    assert!(tabs.is_animating());
    assert_eq!(tabs.entry(ids[0]).map(TabEntry::blink_count), Some(0));
    tabs.update_tab(ids[1], |e| e.stop_attraction()).unwrap();
    assert!(!tabs.is_animating());
    tabs.update_tab(ids[1], |e| e.stop_attraction()).unwrap();
    assert!(!tabs.is_animating());
}

#[test]
fn hidden_strip_draws_only_the_frame() {
    let (mut tabs, _) = container(&["a", "b"]);
    tabs.set_hide_tabs(true);
    let buf = render(&mut tabs, Rect::new(0, 0, 6, 3));
    assert_eq!(row(&buf, 0), "┌────┐");
    assert_eq!(row(&buf, 1), "│    │");
    assert_eq!(row(&buf, 2), "└────┘");
    assert_eq!(tabs.find_tab_label_by(1, 0), None);
}
