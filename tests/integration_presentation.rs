use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use term_tabs::chrome::{ChromeScene, TabDecorator};
use term_tabs::keybindings::{KeyBindings, KeyCombo, TabAction};
use term_tabs::tabs::{ActionGroup, Insets, TabContainer, TabEntry, TabId, TextActionService};
use term_tabs::theme;
use term_tabs::ui::UiFrame;

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 20,
    height: 10,
};

fn render(tabs: &mut TabContainer, area: Rect) -> Buffer {
    let mut buf = Buffer::empty(area);
    let mut frame = UiFrame::from_parts(area, &mut buf);
    tabs.render(&mut frame, area);
    buf
}

fn run_stop() -> ActionGroup {
    ActionGroup::new("runner", vec!["Run".to_string(), "Stop".to_string()])
}

fn bg_at(buf: &Buffer, x: u16, y: u16) -> Option<Color> {
    buf.cell((x, y)).map(|c| c.bg)
}

#[test]
fn stealth_needs_a_single_tab_and_vertical_toolbars() {
    let mut tabs = TabContainer::default();
    let a = tabs.add_tab(TabEntry::new("a"));
    tabs.set_stealth_tab_mode(true);
    assert!(!tabs.is_stealth_mode_effective());

    tabs.set_side_component_vertical(true);
    assert!(tabs.is_stealth_mode_effective());
    let layout = tabs.do_layout(AREA);
    assert!(layout.stealth);
    assert_eq!(layout.rect_for(a), Some(Rect::new(0, 0, 20, 2)));

    tabs.add_tab(TabEntry::new("b"));
    assert!(!tabs.is_stealth_mode_effective());
    assert!(!tabs.do_layout(AREA).stealth);
}

#[test]
fn border_and_inner_insets_shrink_the_content() {
    let mut tabs = TabContainer::default();
    tabs.add_tab(TabEntry::new("a"));
    tabs.do_layout(AREA);
    assert_eq!(tabs.content_area(), Some(Rect::new(1, 3, 18, 6)));

    tabs.set_border(Insets::border(Some(2), None, None, None));
    assert_eq!(tabs.content_area(), Some(Rect::new(1, 4, 18, 5)));

    tabs.set_inner_insets(Insets::uniform(1));
    assert_eq!(tabs.content_area(), Some(Rect::new(2, 5, 16, 3)));
}

#[test]
fn icon_changes_relayout_and_tooltips_only_repaint() {
    let mut tabs = TabContainer::default();
    let a = tabs.add_tab(TabEntry::new("a"));
    let b = tabs.add_tab(TabEntry::new("b").with_icon("*"));
    render(&mut tabs, AREA);
    let layout = tabs.layout().expect("rendered");
    assert_eq!(layout.rect_for(a), Some(Rect::new(0, 0, 5, 2)));
    assert_eq!(layout.rect_for(b), Some(Rect::new(5, 0, 7, 2)));

    tabs.update_tab(a, |e| e.set_icon(Some("#".to_string())))
        .unwrap();
    let layout = tabs.layout().expect("relayout");
    assert_eq!(layout.rect_for(a), Some(Rect::new(0, 0, 7, 2)));
    assert_eq!(layout.rect_for(b), Some(Rect::new(7, 0, 7, 2)));

    render(&mut tabs, AREA);
    assert!(!tabs.needs_repaint());
    tabs.update_tab(b, |e| e.set_tooltip(Some("second".to_string())))
        .unwrap();
    assert!(tabs.needs_repaint());
    assert_eq!(tabs.tooltip_at(9, 1), Some("second"));
    assert_eq!(tabs.tooltip_at(2, 1), None);
    assert_eq!(tabs.tooltip_at(19, 9), None);
}

#[test]
fn selected_label_fill_follows_focus_painting() {
    let mut tabs = TabContainer::default();
    tabs.add_tab(TabEntry::new("a"));
    tabs.add_tab(TabEntry::new("b"));

    let buf = render(&mut tabs, AREA);
    assert_eq!(bg_at(&buf, 2, 1), Some(theme::selected_tab_bg()));

    tabs.set_focused(true);
    let buf = render(&mut tabs, AREA);
    assert_eq!(bg_at(&buf, 2, 1), Some(theme::focused_tab_bg()));

    tabs.set_paint_focus(false);
    assert!(tabs.needs_repaint());
    let buf = render(&mut tabs, AREA);
    assert_eq!(bg_at(&buf, 2, 1), Some(theme::tab_bg()));

    tabs.set_active_tab_fill_in(Some(Color::Magenta));
    let buf = render(&mut tabs, AREA);
    assert_eq!(bg_at(&buf, 1, 1), Some(Color::Magenta));
    assert_eq!(bg_at(&buf, 2, 1), Some(Color::Magenta));
    assert_ne!(bg_at(&buf, 7, 1), Some(Color::Magenta));
}

#[test]
fn hidden_strip_can_drop_its_top_border() {
    let mut tabs = TabContainer::default();
    tabs.add_tab(TabEntry::new("a"));
    tabs.set_hide_tabs(true).set_draw_border_if_tabs_hidden(false);
    let area = Rect::new(0, 0, 6, 3);
    let buf = render(&mut tabs, area);
    let top: String = (0..6)
        .map(|x| buf.cell((x, 0)).map_or(" ", |c| c.symbol()).to_string())
        .collect();
    assert!(!top.contains('─'));
    assert_eq!(buf.cell((0, 2)).map(|c| c.symbol()), Some("└"));
}

#[test]
fn custom_keybindings_replace_the_navigation_keys() {
    let mut bindings = KeyBindings::new();
    bindings.add(
        TabAction::SelectNext,
        KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE),
    );
    let mut tabs = TabContainer::default().with_keybindings(bindings);
    let _a = tabs.add_tab(TabEntry::new("a"));
    let b = tabs.add_tab(TabEntry::new("b"));

    let page_down = Event::Key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::CONTROL));
    assert!(!tabs.handle_event(&page_down));
    let tab = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
    assert!(tabs.handle_event(&tab));
    assert_eq!(tabs.selected(), Some(b));
}

#[derive(Debug, Default)]
struct CountingDecorator {
    calls: Rc<Cell<usize>>,
    last_tab_count: Rc<Cell<usize>>,
}

impl TabDecorator for CountingDecorator {
    fn render_tabs(&self, _frame: &mut UiFrame<'_>, scene: &ChromeScene<'_>) {
        self.calls.set(self.calls.get() + 1);
        self.last_tab_count.set(scene.layout.placements.len());
    }
}

#[test]
fn custom_decorator_paints_the_chrome() {
    let decorator = CountingDecorator::default();
    let calls = decorator.calls.clone();
    let count = decorator.last_tab_count.clone();
    let mut tabs = TabContainer::default().with_decorator(Box::new(decorator));
    tabs.add_tab(TabEntry::new("a"));
    tabs.add_tab(TabEntry::new("b"));

    let buf = render(&mut tabs, AREA);
    assert_eq!(calls.get(), 1);
    assert_eq!(count.get(), 2);
    assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some(" "));
}

#[test]
fn side_toolbar_follows_group_and_orientation() {
    let mut tabs = TabContainer::default().with_action_service(Box::new(TextActionService::new()));
    let a = tabs.add_tab(TabEntry::new("a"));
    tabs.do_layout(AREA);
    assert_eq!(tabs.toolbar_area(), None);

    tabs.update_tab(a, |e| e.set_group(Some(run_stop()), Some("editor".to_string())))
        .unwrap();
    assert_eq!(tabs.toolbar_area(), Some(Rect::new(1, 3, 18, 1)));
    assert_eq!(tabs.content_area(), Some(Rect::new(1, 4, 18, 5)));

    tabs.set_side_component_vertical(true);
    assert_eq!(tabs.toolbar_area(), Some(Rect::new(1, 3, 6, 6)));
    assert_eq!(tabs.content_area(), Some(Rect::new(7, 3, 12, 6)));

    tabs.update_tab(a, |e| e.set_group(None, None)).unwrap();
    assert_eq!(tabs.toolbar_area(), None);
    assert_eq!(tabs.content_area(), Some(Rect::new(1, 3, 18, 6)));
}

#[test]
fn label_actions_widen_the_label() {
    let mut tabs = TabContainer::default();
    let a = tabs.add_tab(TabEntry::new("a"));
    tabs.do_layout(AREA);
    assert_eq!(tabs.layout().and_then(|l| l.rect_for(a)), Some(Rect::new(0, 0, 5, 2)));

    let close = ActionGroup::new("label", vec!["Close".to_string()]);
    tabs.update_tab(a, |e| e.set_tab_label_actions(Some(close)))
        .unwrap();
    assert_eq!(tabs.layout().and_then(|l| l.rect_for(a)), Some(Rect::new(0, 0, 7, 2)));

    let buf = render(&mut tabs, AREA);
    assert_eq!(buf.cell((4, 1)).map(|c| c.symbol()), Some("C"));
}

#[test]
fn table_rows_report_their_columns() {
    let mut tabs = TabContainer::default();
    for label in ["abcd", "efgh", "ijkl", "mnop", "qrst"] {
        tabs.add_tab(TabEntry::new(label));
    }
    tabs.set_single_row(false);
    let layout = tabs.do_layout(AREA);
    let columns: Vec<usize> = (0..layout.row_count())
        .map(|row| layout.column_count(row))
        .collect();
    assert_eq!(columns.iter().sum::<usize>(), 5);
    assert!(columns.iter().all(|&n| n > 0));
    assert_eq!(layout.column_count(layout.row_count()), 0);
}

#[test]
fn showing_flag_round_trips() {
    let mut tabs = TabContainer::default();
    assert!(!tabs.is_showing());
    tabs.set_showing(true);
    assert!(tabs.is_showing());
    let id: TabId = tabs.add_tab(TabEntry::new("a"));
    assert_eq!(tabs.selected(), Some(id));
}
