// Example: column-count changes and the left-transition window.
use waterfall::{HeightProducer, Waterfall, WaterfallOptions, COLUMN_TRANSITION_MS};

fn main() {
    let heights = [100.0, 150.0, 80.0, 200.0, 120.0, 90.0];
    let mut w = Waterfall::new(
        WaterfallOptions::new(6, HeightProducer::sync_fn(move |i| heights[i]))
            .with_columns(2)
            .with_width(400.0)
            .with_height(600.0),
    );

    for p in w.placements() {
        println!("item {}: column={} top={} left={}", p.index, p.column, p.top, p.left);
    }

    // Re-seat into three columns at t=1000. Items that land in a different
    // column than in the settled layout animate `left` for a short window.
    w.set_columns(3, 1_000);
    for p in w.placements() {
        if p.animate_left {
            println!("item {} moved to column {} (animated)", p.index, p.column);
        }
    }

    // A frame pulse past the window settles the layout and clears the flags.
    w.tick(1_000 + COLUMN_TRANSITION_MS);
    let animating = w.placements().iter().filter(|p| p.animate_left).count();
    println!("after {COLUMN_TRANSITION_MS}ms: animating={animating}");
}
