use crate::*;

use crate::geometry::{argmax, argmin};

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::task::{Context, Poll, Waker};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }

    /// Integer-valued heights keep every float accumulation exact.
    fn gen_height(&mut self) -> f64 {
        self.gen_range_usize(10, 300) as f64
    }
}

const WORKED_HEIGHTS: [f64; 6] = [100.0, 150.0, 80.0, 200.0, 120.0, 90.0];

fn sync_producer(heights: &'static [f64]) -> HeightProducer {
    HeightProducer::sync_fn(move |index| heights[index])
}

fn counted_producer(height: f64, calls: Arc<AtomicUsize>) -> HeightProducer {
    HeightProducer::sync_fn(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        height
    })
}

fn worked_example() -> Waterfall {
    Waterfall::new(
        WaterfallOptions::new(6, sync_producer(&WORKED_HEIGHTS))
            .with_columns(2)
            .with_width(400.0)
            .with_height(600.0),
    )
}

/// Reference shelf packing: per-item column plus raw accumulators.
fn expected_pack(heights: &[f64], columns: usize, space_y: f64) -> (Vec<usize>, Vec<f64>) {
    let columns = columns.max(1);
    let mut assignment = Vec::with_capacity(heights.len());
    let mut acc: Vec<f64> = Vec::new();
    for (i, &height) in heights.iter().enumerate() {
        let column = if i < columns {
            acc.push(0.0);
            i
        } else {
            let mut best = 0;
            for c in 1..acc.len() {
                if acc[c] < acc[best] {
                    best = c;
                }
            }
            best
        };
        assignment.push(column);
        acc[column] += height + space_y;
    }
    (assignment, acc)
}

fn expected_single_column_height(heights: &[f64], gap: f64) -> f64 {
    if heights.is_empty() {
        return 0.0;
    }
    heights.iter().sum::<f64>() + (heights.len() - 1) as f64 * gap
}

// ---------------------------------------------------------------------------
// Geometry

#[test]
fn padding_parses_shorthand_forms() {
    assert_eq!(Padding::parse("", "px"), Ok(Padding::ZERO));
    assert_eq!(Padding::parse("10px", "px"), Ok(Padding::uniform(10.0)));
    assert_eq!(
        Padding::parse("10px 20px", "px"),
        Ok(Padding {
            top: 10.0,
            right: 20.0,
            bottom: 10.0,
            left: 20.0,
        })
    );
    assert_eq!(
        Padding::parse("1px 2px 3px", "px"),
        Ok(Padding {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 2.0,
        })
    );
    assert_eq!(
        Padding::parse("1px 2px 3px 4px", "px"),
        Ok(Padding {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        })
    );
    // Unitless components and foreign units still parse.
    assert_eq!(Padding::parse("8", "px"), Ok(Padding::uniform(8.0)));
    assert_eq!(Padding::parse("1.5em", "px"), Ok(Padding::uniform(1.5)));
}

#[test]
fn padding_rejects_bad_input() {
    assert!(matches!(
        Padding::parse("abc", "px"),
        Err(PaddingError::InvalidComponent(_))
    ));
    assert_eq!(
        Padding::parse("1px 2px 3px 4px 5px", "px"),
        Err(PaddingError::TooManyComponents(5))
    );
}

#[test]
fn scrollbar_width_is_offset_minus_client_clamped() {
    assert_eq!(scrollbar_width(120.0, 100.0), 20.0);
    assert_eq!(scrollbar_width(100.0, 100.0), 0.0);
    assert_eq!(scrollbar_width(90.0, 100.0), 0.0);
}

#[test]
fn extreme_indexes_are_stable_and_skip_nan() {
    assert_eq!(argmin(&[]), None);
    assert_eq!(argmin(&[3.0]), Some(0));
    assert_eq!(argmin(&[5.0, 2.0, 2.0, 4.0]), Some(1));
    assert_eq!(argmin(&[f64::NAN, 7.0, 7.0]), Some(1));
    assert_eq!(argmin(&[f64::NAN]), None);

    assert_eq!(argmax(&[]), None);
    assert_eq!(argmax(&[3.0]), Some(0));
    assert_eq!(argmax(&[2.0, 5.0, 5.0, 4.0]), Some(1));
    assert_eq!(argmax(&[f64::NAN, 7.0, 7.0]), Some(1));
    assert_eq!(argmax(&[f64::NAN]), None);
}

// ---------------------------------------------------------------------------
// Throttle

#[test]
fn throttle_fires_leading_edge_with_strict_window() {
    let mut throttle = Throttle::new(250);
    assert!(throttle.try_fire(1000));
    assert!(!throttle.try_fire(1100));
    // Exactly the interval is still inside the window.
    assert!(!throttle.try_fire(1250));
    assert!(throttle.try_fire(1251));
    assert!(!throttle.try_fire(1400));
    throttle.reset();
    assert!(throttle.try_fire(1400));
}

// ---------------------------------------------------------------------------
// Packing

#[test]
fn packs_the_worked_example() {
    let w = worked_example();
    let columns: Vec<usize> = w.placements().iter().map(|p| p.column).collect();
    let tops: Vec<f64> = w.placements().iter().map(|p| p.top).collect();
    let lefts: Vec<f64> = w.placements().iter().map(|p| p.left).collect();
    assert_eq!(columns, vec![0, 1, 0, 1, 0, 0]);
    assert_eq!(tops, vec![0.0, 0.0, 120.0, 170.0, 220.0, 360.0]);
    assert_eq!(lefts, vec![0.0, 210.0, 0.0, 210.0, 0.0, 0.0]);
    assert_eq!(w.column_heights(), &[470.0, 390.0]);
    assert_eq!(w.content_height(), 450.0);
    assert_eq!(w.width_per_column(), 190.0);
    assert_eq!(w.phase(), Phase::LaidOut);
    // The whole list fits in the 600px viewport.
    assert_eq!(w.visible_indices(), &[0, 1, 2, 3, 4, 5]);
}

#[test]
fn single_column_has_no_trailing_gap() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let count = rng.gen_range_usize(1, 40);
        let heights: Vec<f64> = (0..count).map(|_| rng.gen_height()).collect();
        let produced = heights.clone();
        let w = Waterfall::new(
            WaterfallOptions::new(count, HeightProducer::sync_fn(move |i| produced[i]))
                .with_width(300.0)
                .with_height(400.0),
        );
        assert_eq!(
            w.content_height(),
            expected_single_column_height(&heights, 20.0)
        );
        assert_eq!(w.column_heights().len(), 1);
    }
}

#[test]
fn multi_column_matches_reference_packing() {
    let mut rng = Lcg::new(42);
    for _ in 0..50 {
        let count = rng.gen_range_usize(0, 60);
        let columns = rng.gen_range_usize(1, 6);
        let heights: Vec<f64> = (0..count).map(|_| rng.gen_height()).collect();
        let produced = heights.clone();
        let w = Waterfall::new(
            WaterfallOptions::new(count, HeightProducer::sync_fn(move |i| produced[i]))
                .with_columns(columns)
                .with_width(800.0)
                .with_height(500.0),
        );
        let (assignment, acc) = expected_pack(&heights, columns, 20.0);
        let got: Vec<usize> = w.placements().iter().map(|p| p.column).collect();
        assert_eq!(got, assignment);
        assert_eq!(w.column_heights(), &acc[..]);
    }
}

#[test]
fn packing_is_deterministic() {
    let a = worked_example();
    let b = worked_example();
    assert_eq!(a.placements(), b.placements());
    assert_eq!(a.column_heights(), b.column_heights());
}

#[test]
fn first_row_fills_even_when_items_are_fewer_than_columns() {
    let w = Waterfall::new(
        WaterfallOptions::new(2, sync_producer(&WORKED_HEIGHTS))
            .with_columns(5)
            .with_width(1000.0)
            .with_height(400.0),
    );
    let columns: Vec<usize> = w.placements().iter().map(|p| p.column).collect();
    assert_eq!(columns, vec![0, 1]);
    assert_eq!(w.column_heights().len(), 2);
    assert_eq!(w.content_height(), 150.0);
}

#[test]
fn zero_columns_behaves_as_single_column() {
    let zero = Waterfall::new(
        WaterfallOptions::new(4, sync_producer(&WORKED_HEIGHTS))
            .with_columns(0)
            .with_width(300.0)
            .with_height(400.0),
    );
    let one = Waterfall::new(
        WaterfallOptions::new(4, sync_producer(&WORKED_HEIGHTS))
            .with_columns(1)
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(zero.placements(), one.placements());
    assert_eq!(zero.content_height(), one.content_height());
}

#[test]
fn empty_list_is_idle_with_no_content() {
    let w = Waterfall::new(
        WaterfallOptions::new(0, HeightProducer::fixed(100.0))
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(w.phase(), Phase::Idle);
    assert!(w.placements().is_empty());
    assert_eq!(w.content_height(), 0.0);
    assert!(w.visible_indices().is_empty());
}

#[test]
fn ties_go_to_the_leftmost_column() {
    const EQUAL: [f64; 4] = [50.0, 50.0, 50.0, 50.0];
    let w = Waterfall::new(
        WaterfallOptions::new(4, sync_producer(&EQUAL))
            .with_columns(3)
            .with_width(600.0)
            .with_height(400.0),
    );
    assert_eq!(w.placements()[3].column, 0);
}

#[test]
fn width_per_column_splits_the_padded_width() {
    let padding = Padding {
        top: 0.0,
        right: 10.0,
        bottom: 0.0,
        left: 10.0,
    };
    // Multi column subtracts gaps and the scrollbar.
    assert_eq!(width_per_column(400.0, 2, 20.0, padding, 10.0), 175.0);
    // Single column keeps the full padded width.
    assert_eq!(width_per_column(400.0, 1, 20.0, padding, 10.0), 380.0);
}

// ---------------------------------------------------------------------------
// Height resolution

#[test]
fn sync_heights_are_memoized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut w = Waterfall::new(
        WaterfallOptions::new(8, counted_producer(100.0, calls.clone()))
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(calls.load(Ordering::SeqCst), 8);
    w.apply_scroll_event(50.0, 16);
    w.set_measured_size(320.0, 400.0);
    assert_eq!(calls.load(Ordering::SeqCst), 8);
    assert_eq!(w.height_slot(3), HeightSlot::Resolved(100.0));
}

#[test]
fn producer_change_consults_only_unresolved_slots() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut w = Waterfall::new(
        WaterfallOptions::new(3, counted_producer(100.0, first.clone()))
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(first.load(Ordering::SeqCst), 3);

    w.set_producer(counted_producer(40.0, second.clone()));
    assert_eq!(second.load(Ordering::SeqCst), 0);
    assert_eq!(w.height_slot(0), HeightSlot::Resolved(100.0));

    w.set_item_count(5);
    assert_eq!(second.load(Ordering::SeqCst), 2);
    assert_eq!(first.load(Ordering::SeqCst), 3);
    assert_eq!(w.height_slot(4), HeightSlot::Resolved(40.0));
}

#[test]
fn emptying_the_list_resets_the_cache() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut w = Waterfall::new(
        WaterfallOptions::new(3, counted_producer(100.0, calls.clone()))
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // Shrinking keeps the surviving prefix.
    w.set_item_count(2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    w.set_item_count(0);
    assert_eq!(w.phase(), Phase::Idle);

    w.set_item_count(3);
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[test]
fn resolved_heights_clamp_to_non_negative() {
    let w = Waterfall::new(
        WaterfallOptions::new(
            2,
            HeightProducer::sync_fn(|i| if i == 0 { -5.0 } else { f64::NAN }),
        )
        .with_width(300.0)
        .with_height(400.0),
    );
    assert_eq!(w.height_slot(0), HeightSlot::Resolved(0.0));
    assert_eq!(w.height_slot(1), HeightSlot::Resolved(0.0));
    assert_eq!(w.placements()[0].height, 0.0);
}

// A future the test completes by hand, with a real waker handshake.
struct ManualHeight {
    slot: Arc<ManualSlot>,
}

#[derive(Default)]
struct ManualSlot {
    result: Mutex<Option<Result<f64, HeightError>>>,
    waker: Mutex<Option<Waker>>,
}

impl ManualSlot {
    fn complete(&self, result: Result<f64, HeightError>) {
        *self.result.lock().unwrap() = Some(result);
        if let Some(waker) = self.waker.lock().unwrap().take() {
            waker.wake();
        }
    }
}

impl Future for ManualHeight {
    type Output = Result<f64, HeightError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(result) = self.slot.result.lock().unwrap().take() {
            return Poll::Ready(result);
        }
        *self.slot.waker.lock().unwrap() = Some(cx.waker().clone());
        Poll::Pending
    }
}

type ManualSlots = Arc<Vec<Arc<ManualSlot>>>;

fn manual_async_producer(count: usize) -> (HeightProducer, ManualSlots, Arc<AtomicUsize>) {
    let slots: ManualSlots =
        Arc::new((0..count).map(|_| Arc::new(ManualSlot::default())).collect());
    let calls = Arc::new(AtomicUsize::new(0));
    let producer_slots = slots.clone();
    let producer_calls = calls.clone();
    let producer = HeightProducer::async_fn(move |index| {
        producer_calls.fetch_add(1, Ordering::SeqCst);
        let slot = producer_slots[index].clone();
        Box::pin(ManualHeight { slot })
    });
    (producer, slots, calls)
}

#[test]
fn async_heights_resolve_through_the_task_pool() {
    let (producer, slots, _calls) = manual_async_producer(2);
    let mut w = Waterfall::new(
        WaterfallOptions::new(2, producer)
            .with_width(300.0)
            .with_height(400.0),
    );

    assert_eq!(w.phase(), Phase::Measuring);
    assert_eq!(w.pending_heights(), 2);
    // Pending items lay out at height 0 but keep their gap slot.
    assert_eq!(w.content_height(), 20.0);

    slots[1].complete(Ok(100.0));
    assert_eq!(w.poll_heights(10), 1);
    assert_eq!(w.height_slot(1), HeightSlot::Resolved(100.0));
    assert_eq!(w.phase(), Phase::Measuring);

    slots[0].complete(Err(HeightError::new("image failed to load")));
    assert_eq!(w.poll_heights(20), 1);
    assert_eq!(w.height_slot(0), HeightSlot::Failed);
    assert_eq!(w.phase(), Phase::LaidOut);
    assert_eq!(w.pending_heights(), 0);
    assert_eq!(w.content_height(), 120.0);
}

#[test]
fn pending_heights_distribute_across_columns() {
    let (producer, slots, _calls) = manual_async_producer(4);
    let mut w = Waterfall::new(
        WaterfallOptions::new(4, producer)
            .with_columns(2)
            .with_width(300.0)
            .with_height(400.0),
    );

    // All pending: each zero-height item still consumes its gap slot, so
    // the run spreads across columns instead of piling into column 0.
    let columns: Vec<usize> = w.placements().iter().map(|p| p.column).collect();
    assert_eq!(columns, vec![0, 1, 0, 1]);

    // A resolved height repacks the layout; later items chase the
    // now-shorter column.
    slots[0].complete(Ok(100.0));
    assert_eq!(w.poll_heights(10), 1);
    let columns: Vec<usize> = w.placements().iter().map(|p| p.column).collect();
    assert_eq!(columns, vec![0, 1, 1, 1]);
    assert_eq!(w.content_height(), 100.0);
}

#[test]
fn poll_without_completions_is_a_no_op() {
    let (producer, _slots, _calls) = manual_async_producer(2);
    let changes = Arc::new(AtomicUsize::new(0));
    let changes_seen = changes.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(2, producer)
            .with_width(300.0)
            .with_height(400.0)
            .with_on_change(Some(move |_: &Waterfall| {
                changes_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    assert_eq!(w.poll_heights(5), 0);
    assert_eq!(w.poll_heights(6), 0);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
    assert_eq!(w.pending_heights(), 2);
}

#[test]
fn truncation_cancels_in_flight_tasks() {
    let (producer, slots, calls) = manual_async_producer(3);
    let mut w = Waterfall::new(
        WaterfallOptions::new(3, producer)
            .with_width(300.0)
            .with_height(400.0),
    );
    assert_eq!(w.pending_heights(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    w.set_item_count(2);
    assert_eq!(w.pending_heights(), 2);

    // The truncated index completes anyway; the dropped task can no longer
    // write it back.
    slots[2].complete(Ok(640.0));
    assert_eq!(w.poll_heights(10), 0);
    assert_eq!(w.height_slot(2), HeightSlot::Unresolved);

    // Growing back re-consults the producer for the new index.
    w.set_item_count(3);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(w.pending_heights(), 3);
}

#[test]
fn emptying_drops_every_task() {
    let (producer, slots, _calls) = manual_async_producer(2);
    let mut w = Waterfall::new(
        WaterfallOptions::new(2, producer)
            .with_width(300.0)
            .with_height(400.0),
    );
    w.set_item_count(0);
    assert_eq!(w.pending_heights(), 0);
    slots[0].complete(Ok(50.0));
    assert_eq!(w.poll_heights(10), 0);
    assert_eq!(w.phase(), Phase::Idle);
}

// ---------------------------------------------------------------------------
// Visibility

#[test]
fn visibility_uses_inclusive_bounds() {
    const HUNDREDS: [f64; 10] = [100.0; 10];
    let mut w = Waterfall::new(
        WaterfallOptions::new(10, sync_producer(&HUNDREDS))
            .with_width(300.0)
            .with_height(200.0)
            .with_space_y(0.0),
    );
    // Items occupy [i*100, (i+1)*100).
    w.apply_scroll_event(100.0, 0);
    // Item 0 ends exactly at the scroll offset and item 3 starts exactly at
    // the viewport bottom: both edges count as visible.
    assert_eq!(w.visible_indices(), &[0, 1, 2, 3]);

    w.apply_scroll_event(101.0, 16);
    assert_eq!(w.visible_indices(), &[1, 2, 3, 4]);
}

#[test]
fn overscan_widens_the_band() {
    const HUNDREDS: [f64; 10] = [100.0; 10];
    let w = Waterfall::new(
        WaterfallOptions::new(10, sync_producer(&HUNDREDS))
            .with_width(300.0)
            .with_height(200.0)
            .with_space_y(0.0)
            .with_overscan(50.0),
    );
    // Band is [-50, 250]: item 2 ([200, 300)) now qualifies.
    assert_eq!(w.visible_indices(), &[0, 1, 2]);
}

#[test]
fn window_scroller_offsets_the_band() {
    const HUNDREDS: [f64; 5] = [100.0; 5];
    let mut w = Waterfall::new(
        WaterfallOptions::new(5, sync_producer(&HUNDREDS))
            .with_width(300.0)
            .with_height(200.0)
            .with_space_y(0.0)
            .with_scroller(ScrollerType::Window),
    );
    w.set_offset_top(500.0);
    // Page scroll 600, viewport 200: the band is [600, 800] in page space.
    // Item 0 spans [500, 600) and item 3 starts at 800: edge items stay in.
    w.apply_scroll_event(600.0, 0);
    assert_eq!(w.visible_indices(), &[0, 1, 2, 3]);

    w.apply_scroll_event(601.0, 16);
    assert_eq!(w.visible_indices(), &[1, 2, 3]);
}

// ---------------------------------------------------------------------------
// End detection

#[test]
fn end_callback_fires_near_bottom_and_respects_the_throttle() {
    const HUNDREDS: [f64; 20] = [100.0; 20];
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_seen = fired.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(20, sync_producer(&HUNDREDS))
            .with_width(300.0)
            .with_height(300.0)
            .with_space_y(0.0)
            .with_on_end(Some(move || {
                fired_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    // Content is 2000 tall; with the default 150 end offset the trigger
    // line is scroll 1550.
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    w.apply_scroll_event(1540.0, 1000);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    w.apply_scroll_event(1550.0, 1100);
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Still inside the 250ms window.
    w.apply_scroll_event(1560.0, 1300);
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Strictly past it.
    w.apply_scroll_event(1570.0, 1351);
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn end_detection_measures_the_shortest_column() {
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_seen = fired.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(6, sync_producer(&WORKED_HEIGHTS))
            .with_columns(2)
            .with_width(400.0)
            .with_height(100.0)
            .with_end_offset(0.0)
            .with_on_end(Some(move || {
                fired_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    // Accumulators are [470, 390]: the short column governs.
    w.apply_scroll_event(200.0, 1000);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    w.apply_scroll_event(290.0, 2000);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn window_scroller_end_subtracts_the_list_offset() {
    const HUNDREDS: [f64; 10] = [100.0; 10];
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_seen = fired.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(10, sync_producer(&HUNDREDS))
            .with_width(300.0)
            .with_height(300.0)
            .with_space_y(0.0)
            .with_end_offset(0.0)
            .with_scroller(ScrollerType::Window)
            .with_on_end(Some(move || {
                fired_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    w.set_offset_top(500.0);
    // Content is 1000 tall and starts at page offset 500: the viewport
    // bottom reaches its end at page scroll 1200.
    w.apply_scroll_event(1190.0, 1000);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    w.apply_scroll_event(1200.0, 2000);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Column transitions

#[test]
fn column_change_animates_moved_items_for_the_window() {
    let mut w = worked_example();
    w.set_columns(3, 1000);

    // Three columns re-seat items 2, 3, and 5.
    let animated: Vec<bool> = w.placements().iter().map(|p| p.animate_left).collect();
    assert_eq!(animated, vec![false, false, true, true, false, true]);
    let css = w.item_css(2).unwrap();
    assert!(css.ends_with(";transition:left 0.1s linear"), "{css}");

    // Still inside the window.
    w.tick(1000 + COLUMN_TRANSITION_MS - 1);
    assert!(w.placements()[2].animate_left);

    // The window elapses: the baseline settles and the flags clear.
    w.tick(1000 + COLUMN_TRANSITION_MS);
    assert!(w.placements().iter().all(|p| !p.animate_left));

    // A later scroll re-layout does not animate.
    w.apply_scroll_event(40.0, 1300);
    assert!(w.placements().iter().all(|p| !p.animate_left));
}

#[test]
fn scroll_past_the_window_settles_the_transition() {
    let mut w = worked_example();
    w.set_columns(3, 1000);
    assert!(w.placements().iter().any(|p| p.animate_left));

    // A same-offset scroll notification after the window also settles.
    w.apply_scroll_event(w.scroll_top(), 1200);
    assert!(w.placements().iter().all(|p| !p.animate_left));
}

#[test]
fn returning_to_the_settled_column_count_does_not_animate() {
    let mut w = worked_example();
    // 2 -> 2 is a no-op.
    w.set_columns(2, 1000);
    assert!(w.placements().iter().all(|p| !p.animate_left));

    // 0 behaves as 1, so 1 -> 0 opens no window either.
    let mut single = Waterfall::new(
        WaterfallOptions::new(4, sync_producer(&WORKED_HEIGHTS))
            .with_width(300.0)
            .with_height(400.0),
    );
    single.set_columns(0, 500);
    assert!(single.placements().iter().all(|p| !p.animate_left));
}

// ---------------------------------------------------------------------------
// Notification and options

#[test]
fn batch_update_coalesces_on_change() {
    let changes = Arc::new(AtomicUsize::new(0));
    let changes_seen = changes.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(4, HeightProducer::fixed(100.0))
            .with_width(300.0)
            .with_height(400.0)
            .with_on_change(Some(move |_: &Waterfall| {
                changes_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );

    w.batch_update(|w| {
        w.set_item_count(6);
        w.set_columns(2, 0);
        w.apply_scroll_event(10.0, 0);
    });
    assert_eq!(changes.load(Ordering::SeqCst), 1);
}

#[test]
fn no_op_setters_do_not_notify() {
    let changes = Arc::new(AtomicUsize::new(0));
    let changes_seen = changes.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(4, HeightProducer::fixed(100.0))
            .with_width(300.0)
            .with_height(400.0)
            .with_initial_scroll_top(25.0)
            .with_on_change(Some(move |_: &Waterfall| {
                changes_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );

    w.set_item_count(4);
    w.set_columns(1, 0);
    w.set_measured_size(0.0, 0.0);
    w.set_offset_top(0.0);
    w.apply_scroll_event(25.0, 16);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
}

#[test]
fn set_options_preserves_resolved_heights() {
    let calls = Arc::new(AtomicUsize::new(0));
    let changes = Arc::new(AtomicUsize::new(0));
    let changes_seen = changes.clone();
    let mut w = Waterfall::new(
        WaterfallOptions::new(4, counted_producer(100.0, calls.clone()))
            .with_width(300.0)
            .with_height(400.0)
            .with_on_change(Some(move |_: &Waterfall| {
                changes_seen.fetch_add(1, Ordering::SeqCst);
            })),
    );
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    w.update_options(|o| o.space_y = 10.0);
    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(w.content_height(), 430.0);
}

#[test]
fn scroll_clamps_negative_offsets() {
    let mut w = Waterfall::new(
        WaterfallOptions::new(4, HeightProducer::fixed(100.0))
            .with_width(300.0)
            .with_height(400.0)
            .with_initial_scroll_top(-30.0),
    );
    assert_eq!(w.scroll_top(), 0.0);
    w.apply_scroll_event(-5.0, 16);
    assert_eq!(w.scroll_top(), 0.0);
}

#[test]
fn item_css_emits_the_mandatory_style_block() {
    let w = worked_example();
    assert_eq!(
        w.item_css(0).unwrap(),
        "position:absolute;box-sizing:border-box;top:0px;left:0px;width:190px;height:100px"
    );
    assert_eq!(
        w.item_css(3).unwrap(),
        "position:absolute;box-sizing:border-box;top:170px;left:210px;width:190px;height:200px"
    );
    assert_eq!(w.item_css(6), None);

    let em = Waterfall::new(
        WaterfallOptions::new(1, HeightProducer::fixed(2.0))
            .with_width(10.0)
            .with_height(5.0)
            .with_unit("em"),
    );
    assert_eq!(
        em.item_css(0).unwrap(),
        "position:absolute;box-sizing:border-box;top:0em;left:0em;width:10em;height:2em"
    );
}

#[test]
fn viewport_state_prefers_pinned_sizes() {
    let mut w = Waterfall::new(
        WaterfallOptions::new(2, HeightProducer::fixed(100.0)).with_width(300.0),
    );
    w.set_measured_size(280.0, 640.0);
    let state = w.viewport_state();
    assert_eq!(state.width, 300.0);
    assert_eq!(state.height, 640.0);
}

#[test]
fn layout_frame_snapshot_matches_accessors() {
    let w = worked_example();
    let frame = w.layout_frame();
    assert_eq!(frame.placements, w.placements());
    assert_eq!(frame.visible, w.visible_indices());
    assert_eq!(frame.content_height, w.content_height());
    assert_eq!(frame.phase, w.phase());
}

// ---------------------------------------------------------------------------
// Segments

#[test]
fn segment_extent_counts_items_and_gaps() {
    let mut list = SegmentedList::new();
    let seg = list.push_segment(SegmentOptions::new(3, 100.0).with_render_gap(10.0));
    assert_eq!(list.segment_extent(seg), 320.0);
    list.set_item_count(seg, 0);
    assert_eq!(list.segment_extent(seg), 0.0);
    list.set_item_count(seg, 1);
    assert_eq!(list.segment_extent(seg), 100.0);
}

#[test]
fn segment_window_is_empty_until_measured() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(250.0);
    let seg = list.push_segment(SegmentOptions::new(100, 100.0));
    assert!(list.window(seg).is_empty());
    list.set_offset_top(seg, 0.0);
    assert_eq!(list.window(seg), SegmentWindow { start: 0, end: 3 });
}

#[test]
fn segment_window_tracks_scroll() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(250.0);
    let seg = list.push_segment(SegmentOptions::new(100, 100.0));
    list.set_offset_top(seg, 0.0);

    list.apply_scroll_event(120.0, 0);
    assert_eq!(list.window(seg), SegmentWindow { start: 1, end: 4 });
    assert_eq!(list.item_top(seg, 1), 100.0);

    // Scrolled far past the segment: the window stays well formed.
    list.apply_scroll_event(100_000.0, 16);
    assert!(list.window(seg).is_empty());
}

#[test]
fn segment_boundary_widens_the_window() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(250.0);
    let seg = list.push_segment(SegmentOptions::new(100, 100.0).with_boundary(1));
    list.set_offset_top(seg, 0.0);
    list.apply_scroll_event(120.0, 0);
    assert_eq!(list.window(seg), SegmentWindow { start: 0, end: 5 });
}

#[test]
fn segment_below_the_viewport_renders_nothing() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(500.0);
    let seg = list.push_segment(SegmentOptions::new(10, 100.0));
    list.set_offset_top(seg, 1000.0);
    assert!(list.window(seg).is_empty());

    list.apply_scroll_event(600.0, 0);
    assert_eq!(list.window(seg), SegmentWindow { start: 0, end: 2 });
}

#[test]
fn segment_gap_changes_the_step() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(250.0);
    let seg = list.push_segment(SegmentOptions::new(100, 100.0).with_render_gap(20.0));
    list.set_offset_top(seg, 0.0);
    list.apply_scroll_event(130.0, 0);
    // Step is 120: local offset 130 starts the window at index 1.
    assert_eq!(list.window(seg), SegmentWindow { start: 1, end: 4 });
    assert_eq!(list.item_top(seg, 2), 240.0);
}

#[test]
fn bottom_waypoint_is_edge_triggered() {
    let fetched = Arc::new(AtomicUsize::new(0));
    let fetched_seen = fetched.clone();
    let mut list = SegmentedList::new().with_fetch_mode(FetchMode::OnBottom);
    list.set_viewport_height(300.0);
    let seg = list.push_segment(SegmentOptions::new(5, 100.0).with_fetch_more(Some(move || {
        fetched_seen.fetch_add(1, Ordering::SeqCst);
    })));
    list.set_offset_top(seg, 0.0);

    // The bottom edge sits at 500; the band is [scroll, scroll + 300].
    list.apply_scroll_event(100.0, 0);
    assert_eq!(fetched.load(Ordering::SeqCst), 0);

    list.apply_scroll_event(200.0, 16);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);
    assert_eq!(list.current_segment(), seg);

    // Staying in the band does not re-fire.
    list.apply_scroll_event(250.0, 32);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);

    // Leaving and re-entering does.
    list.apply_scroll_event(600.0, 48);
    list.apply_scroll_event(200.0, 64);
    assert_eq!(fetched.load(Ordering::SeqCst), 2);
}

#[test]
fn scroll_fetch_is_throttled_per_window() {
    let fetched = Arc::new(AtomicUsize::new(0));
    let fetched_seen = fetched.clone();
    let mut list = SegmentedList::new();
    list.set_viewport_height(300.0);
    let seg = list.push_segment(SegmentOptions::new(50, 100.0).with_fetch_more(Some(move || {
        fetched_seen.fetch_add(1, Ordering::SeqCst);
    })));
    list.set_offset_top(seg, 0.0);

    list.apply_scroll_event(10.0, 0);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);
    list.apply_scroll_event(20.0, 1000);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);
    // Exactly the interval is still inside the window.
    list.apply_scroll_event(30.0, 2000);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);
    list.apply_scroll_event(40.0, 2001);
    assert_eq!(fetched.load(Ordering::SeqCst), 2);
}

#[test]
fn scroll_fetch_follows_the_cursor() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let first_seen = first.clone();
    let second_seen = second.clone();
    let mut list = SegmentedList::new();
    list.set_viewport_height(300.0);
    let a = list.push_segment(SegmentOptions::new(5, 100.0).with_fetch_more(Some(move || {
        first_seen.fetch_add(1, Ordering::SeqCst);
    })));
    let b = list.push_segment(SegmentOptions::new(5, 100.0).with_fetch_more(Some(move || {
        second_seen.fetch_add(1, Ordering::SeqCst);
    })));
    list.set_offset_top(a, 0.0);
    list.set_offset_top(b, 500.0);

    // Segment a's bottom (500) enters the band: the cursor points at a and
    // the scroll fetch hits it.
    list.apply_scroll_event(250.0, 0);
    assert_eq!(list.current_segment(), a);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);

    // Segment b's bottom (1000) enters: the cursor advances and the next
    // throttle window fetches b instead.
    list.apply_scroll_event(700.0, 3000);
    assert_eq!(list.current_segment(), b);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn unmeasured_segments_do_not_trip_waypoints() {
    let fetched = Arc::new(AtomicUsize::new(0));
    let fetched_seen = fetched.clone();
    let mut list = SegmentedList::new().with_fetch_mode(FetchMode::OnBottom);
    list.set_viewport_height(300.0);
    let seg = list.push_segment(SegmentOptions::new(2, 100.0).with_fetch_more(Some(move || {
        fetched_seen.fetch_add(1, Ordering::SeqCst);
    })));

    list.apply_scroll_event(0.0, 0);
    assert_eq!(fetched.load(Ordering::SeqCst), 0);

    // Measuring makes the already-in-band bottom edge fire on the next event.
    list.set_offset_top(seg, 0.0);
    list.apply_scroll_event(1.0, 16);
    assert_eq!(fetched.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Example smoke tests (mirror examples/)

#[test]
fn example_basic_smoke() {
    let mut w = Waterfall::new(
        WaterfallOptions::new(1000, HeightProducer::sync_fn(|i| 80.0 + (i % 7) as f64 * 30.0))
            .with_columns(3)
            .with_width(900.0)
            .with_height(600.0),
    );
    assert_eq!(w.phase(), Phase::LaidOut);
    assert!(w.content_height() > 0.0);
    assert!(!w.visible_items().is_empty());
    assert!(w.visible_items().len() < w.item_count());

    w.apply_scroll_event(5000.0, 16);
    assert_eq!(w.visible_items().len(), w.visible_indices().len());
    for placement in w.visible_items() {
        assert!(placement.column < 3);
        assert!(placement.bottom() <= w.content_height());
    }
}

#[test]
fn example_segments_smoke() {
    let mut list = SegmentedList::new();
    list.set_viewport_height(800.0);
    for segment in 0..4 {
        let seg = list.push_segment(SegmentOptions::new(30, 48.0).with_boundary(2));
        list.set_offset_top(seg, segment as f64 * 1440.0);
    }
    list.apply_scroll_event(1500.0, 0);
    let mut rendered = 0;
    for segment in 0..list.segment_count() {
        rendered += list.window(segment).len();
    }
    assert!(rendered > 0);
    assert!(rendered < 4 * 30);
}
