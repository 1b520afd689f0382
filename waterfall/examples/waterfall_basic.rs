// Example: minimal waterfall layout and visible-band queries.
use waterfall::{HeightProducer, Waterfall, WaterfallOptions};

fn main() {
    let heights = [120.0, 80.0, 200.0, 150.0, 90.0, 260.0, 110.0, 170.0];
    let mut w = Waterfall::new(
        WaterfallOptions::new(1_000, HeightProducer::sync_fn(move |i| heights[i % 8]))
            .with_columns(3)
            .with_width(900.0)
            .with_height(600.0),
    );

    println!("phase={:?}", w.phase());
    println!("content_height={}", w.content_height());
    println!("width_per_column={}", w.width_per_column());
    println!("visible={:?}", w.visible_indices());

    // Scroll events carry a millisecond timestamp from the host.
    w.apply_scroll_event(12_345.0, 16);
    println!("after scroll: visible={:?}", w.visible_indices());

    // Each mounted item gets an absolute-position style block.
    if let Some(&index) = w.visible_indices().first() {
        println!("item {index}: {}", w.item_css(index).unwrap_or_default());
    }
}
