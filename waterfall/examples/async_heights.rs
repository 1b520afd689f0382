// Example: asynchronous height production, polled by the host loop.
use std::future::ready;

use waterfall::{HeightProducer, Phase, Waterfall, WaterfallOptions};

fn main() {
    // A real adapter would decode image dimensions or await a measurement
    // here; `ready` stands in for a future that resolves on its own.
    let producer = HeightProducer::async_fn(|index| {
        Box::pin(ready(Ok(80.0 + (index % 5) as f64 * 40.0)))
    });

    let mut w = Waterfall::new(
        WaterfallOptions::new(12, producer)
            .with_columns(2)
            .with_width(600.0)
            .with_height(800.0),
    );
    println!("phase={:?} pending={}", w.phase(), w.pending_heights());

    // Drive the pool until every height lands. Hosts call this once per
    // frame alongside `tick`.
    let mut now_ms = 0;
    while w.phase() == Phase::Measuring {
        now_ms += 16;
        let applied = w.poll_heights(now_ms);
        if applied > 0 {
            println!("t={now_ms}ms: applied {applied} heights");
        }
    }

    println!("phase={:?} content_height={}", w.phase(), w.content_height());
}
