// Example: segmented fixed-height lists with load-more waypoints.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use waterfall::{FetchMode, SegmentOptions, SegmentedList};

fn main() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let fetches_seen = fetches.clone();

    let mut list = SegmentedList::new().with_fetch_mode(FetchMode::OnBottom);
    list.set_viewport_height(800.0);

    // Two feed sections stacked in one scroller; the host measured where
    // each one starts.
    let posts = list.push_segment(
        SegmentOptions::new(40, 72.0)
            .with_boundary(3)
            .with_fetch_more(Some(move || {
                fetches_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    let comments = list.push_segment(SegmentOptions::new(25, 48.0).with_render_gap(8.0));
    list.set_offset_top(posts, 0.0);
    list.set_offset_top(comments, list.segment_extent(posts));

    list.apply_scroll_event(500.0, 0);
    println!("posts window={:?}", list.window(posts));
    println!("comments window={:?}", list.window(comments));

    // Scrolling the posts segment's bottom edge into view trips its
    // load-more waypoint once.
    list.apply_scroll_event(2_400.0, 160);
    println!(
        "current_segment={} fetches={}",
        list.current_segment(),
        fetches.load(Ordering::SeqCst)
    );
    println!("comments window={:?}", list.window(comments));
}
