use cgmath::Vector2;
use plume::headless::HeadlessBackend;
use plume::rect::Rect;
use plume::{ControlState, Orientation, Tab, TabAdapter, ViewId, ViewTree};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (ViewTree, Tab) {
    init_logging();
    let mut tree = ViewTree::new(Box::new(HeadlessBackend::new()));
    let window = tree.create_window(Vector2::new(300., 200.)).unwrap();
    let tab = Tab::new(&mut tree);
    tree.set_content_view(window, tab.view()).unwrap();
    (tree, tab)
}

fn count_notifications(tab: &Tab) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    tab.on_selected_page_change.connect(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    count
}

fn visible(tree: &ViewTree, view: ViewId) -> bool {
    tree.get(view).unwrap().is_visible()
}

/// Exactly one visible content view and one pressed item, both at the selected index.
fn assert_consistent(tree: &ViewTree, tab: &Tab) {
    let adapter = tree.adapter::<TabAdapter>(tab.view()).unwrap();
    let count = adapter.page_count();
    match adapter.selected_item_index() {
        None => assert_eq!(count, 0),
        Some(selected) => {
            assert!(selected < count);
            for index in 0..count {
                let content = adapter.page_at(index).unwrap();
                let item = adapter.item_at(index).unwrap();
                assert_eq!(visible(tree, content), index == selected);
                assert_eq!(
                    tree.get(item).unwrap().state() == ControlState::Pressed,
                    index == selected
                );
            }
        }
    }
}

#[test]
fn end_to_end() {
    let (mut tree, tab) = setup();
    let a = tree.create_view();
    let b = tree.create_view();
    let c = tree.create_view();
    tab.add_page(&mut tree, "One", a);
    tab.add_page(&mut tree, "Two", b);
    tab.add_page(&mut tree, "Three", c);

    assert_eq!(tab.selected_page_index(&tree), Some(0));
    assert!(visible(&tree, a));
    assert!(!visible(&tree, b));
    assert!(!visible(&tree, c));

    let notifications = count_notifications(&tab);
    tab.select_page_at(&mut tree, 2);
    assert_eq!(tab.selected_page_index(&tree), Some(2));
    assert!(!visible(&tree, a));
    assert!(!visible(&tree, b));
    assert!(visible(&tree, c));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);

    tab.remove_page_at(&mut tree, 2);
    assert_eq!(tab.page_count(&tree), 2);
    assert_eq!(tab.selected_page_index(&tree), Some(0));
    assert!(visible(&tree, a));
    assert!(!visible(&tree, b));
    assert_consistent(&tree, &tab);
}

#[test]
fn removing_the_selected_page_selects_the_next_one() {
    let (mut tree, tab) = setup();
    let pages: Vec<_> = (0..4).map(|_| tree.create_view()).collect();
    for page in &pages {
        tab.add_page(&mut tree, "Page", *page);
    }
    tab.select_page_at(&mut tree, 1);

    let notifications = count_notifications(&tab);
    tab.remove_page_at(&mut tree, 1);
    assert_eq!(tab.selected_page_index(&tree), Some(1));
    assert_eq!(tab.page_at(&tree, 1), Some(pages[2]));
    assert_eq!(notifications.load(Ordering::SeqCst), 1);
    assert_consistent(&tree, &tab);

    // the first removal only shifts the index; the other two re-target the selection
    while tab.page_count(&tree) > 0 {
        tab.remove_page_at(&mut tree, 0);
        assert_consistent(&tree, &tab);
    }
    assert_eq!(tab.selected_page_index(&tree), None);
    assert_eq!(notifications.load(Ordering::SeqCst), 3);
}

#[test]
fn first_page_and_last_removal_notify_once() {
    let (mut tree, tab) = setup();
    let received = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let r = Arc::clone(&received);
    tab.on_selected_page_change.connect(move |index| r.lock().push(*index));

    let a = tree.create_view();
    let b = tree.create_view();
    tab.add_page(&mut tree, "A", a);
    assert_eq!(*received.lock(), vec![Some(0)]);
    tab.add_page(&mut tree, "B", b);
    assert_eq!(*received.lock(), vec![Some(0)]);

    // removing the unselected page only
    tab.remove_page_at(&mut tree, 1);
    assert_eq!(*received.lock(), vec![Some(0)]);

    tab.remove_page_at(&mut tree, 0);
    assert_eq!(*received.lock(), vec![Some(0), None]);
    assert_eq!(tab.selected_page_index(&tree), None);

    tab.remove_page_at(&mut tree, 0);
    assert_eq!(received.lock().len(), 2);
}

#[test]
fn removing_other_pages_does_not_notify() {
    let (mut tree, tab) = setup();
    let pages: Vec<_> = (0..3).map(|_| tree.create_view()).collect();
    for page in &pages {
        tab.add_page(&mut tree, "Page", *page);
    }
    tab.select_page_at(&mut tree, 1);

    let notifications = count_notifications(&tab);
    tab.remove_page(&mut tree, pages[0]);
    tab.remove_page(&mut tree, pages[2]);
    assert_eq!(notifications.load(Ordering::SeqCst), 0);
    assert_eq!(tab.selected_page_index(&tree), Some(0));
    assert_eq!(tab.page_at(&tree, 0), Some(pages[1]));
}

#[test]
fn selecting_twice_is_idempotent_but_notifies_each_time() {
    let (mut tree, tab) = setup();
    let a = tree.create_view();
    let b = tree.create_view();
    tab.add_page(&mut tree, "A", a);
    tab.add_page(&mut tree, "B", b);

    let notifications = count_notifications(&tab);
    tab.select_page_at(&mut tree, 1);
    let allocation = tree.get(b).unwrap().size_allocation();
    tab.select_page_at(&mut tree, 1);

    assert_eq!(notifications.load(Ordering::SeqCst), 2);
    assert!(visible(&tree, b));
    assert!(!visible(&tree, a));
    assert_eq!(tree.get(b).unwrap().size_allocation(), allocation);
    assert_consistent(&tree, &tab);
}

#[test]
fn selection_stays_valid_under_arbitrary_edits() {
    let (mut tree, tab) = setup();
    let mut seed: u32 = 12345;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
        (seed >> 16) as usize
    };

    for _ in 0..200 {
        let count = tab.page_count(&tree);
        match next() % 3 {
            0 => {
                let page = tree.create_view();
                tab.add_page(&mut tree, "Page", page);
            }
            1 => {
                // includes out-of-range indices
                tab.remove_page_at(&mut tree, next() % (count + 1));
            }
            _ => tab.select_page_at(&mut tree, next() % (count + 1)),
        }
        assert_consistent(&tree, &tab);
    }
}

#[test]
fn minimum_size_grows_and_shrinks_monotonically() {
    let (mut tree, tab) = setup();
    let mut last = tab.minimum_size(&mut tree);
    let mut pages = Vec::new();
    for i in 0..5 {
        let page = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.set_preferred_size(leaf, Vector2::new(20. * i as f64, 10. * i as f64));
        tree.add_child_view(page, leaf).unwrap();
        tab.add_page(&mut tree, &"x".repeat(i + 1), page);
        pages.push(page);

        let size = tab.minimum_size(&mut tree);
        assert!(size.x >= last.x && size.y >= last.y);
        last = size;
    }
    for page in pages {
        tab.remove_page(&mut tree, page);
        let size = tab.minimum_size(&mut tree);
        assert!(size.x <= last.x && size.y <= last.y);
        last = size;
    }
}

#[test]
fn destroying_a_page_view_removes_its_page() {
    let (mut tree, tab) = setup();
    let a = tree.create_view();
    let b = tree.create_view();
    tab.add_page(&mut tree, "A", a);
    tab.add_page(&mut tree, "B", b);

    tree.destroy_view(a).unwrap();
    assert_eq!(tab.page_count(&tree), 1);
    assert_eq!(tab.page_at(&tree, 0), Some(b));
    assert_eq!(tab.selected_page_index(&tree), Some(0));
    assert!(visible(&tree, b));
}

#[test]
fn destroying_the_tab_destroys_items_and_pages() {
    let (mut tree, tab) = setup();
    let a = tree.create_view();
    tab.add_page(&mut tree, "A", a);
    let item = tree
        .adapter::<TabAdapter>(tab.view())
        .unwrap()
        .item_at(0)
        .unwrap();

    tree.destroy_view(tab.view()).unwrap();
    assert!(!tree.contains(item));
    assert!(!tree.contains(a));
}

#[test]
fn scale_factor_changes_remeasure_the_strip() {
    let (mut tree, tab) = setup();
    let a = tree.create_view();
    tab.add_page(&mut tree, "A", a);
    let item = tree
        .adapter::<TabAdapter>(tab.view())
        .unwrap()
        .item_at(0)
        .unwrap();
    // "bp": 15 tall + (2 * 1 + 1) + 1
    assert_eq!(
        tree.get(item).unwrap().size_allocation(),
        Rect::from_xywh(0., 0., 10., 19.)
    );

    let window = tree.get(tab.view()).unwrap().window().unwrap();
    tree.set_window_scale_factor(window, 2.);
    // 30 + (2 * 1 + 1) * 2 + 1, and "A" is 12 + 4 wide
    assert_eq!(
        tree.get(item).unwrap().size_allocation(),
        Rect::from_xywh(0., 0., 16., 37.)
    );
    let item_widget = tree.widget::<plume::TabItem>(item).unwrap();
    assert_eq!(item_widget.title(), "A");
    assert!(item_widget.is_selected());
}

#[test]
fn moving_a_view_between_tabs() {
    let (mut tree, first) = setup();
    let second = Tab::new(&mut tree);
    let page = tree.create_view();
    first.add_page(&mut tree, "Page", page);
    second.add_page(&mut tree, "Page", page);

    assert_eq!(first.page_count(&tree), 0);
    assert_eq!(first.selected_page_index(&tree), None);
    assert_eq!(second.page_at(&tree, 0), Some(page));
    assert_eq!(tree.get(page).unwrap().parent(), Some(second.view()));
}
