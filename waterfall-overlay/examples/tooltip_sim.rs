use waterfall::{Rect, Size};
use waterfall_overlay::{
    ContentConfig, FloatingOptions, OffsetSolver, Placement, PointerKind, PortalRegistry, Tooltip,
    TooltipOptions, TransitionPhase, TriggerAction, TriggerBinding,
};

fn main() {
    // Example: drive a hover + click tooltip through one interaction.
    //
    // The host flow is typically:
    // 1) acquire a portal node for the overlay container
    // 2) feed reference events (pointer_enter, click, ...) into the tooltip
    // 3) tick the transitions and read back style + position each frame
    // 4) release the portal node when the overlay unmounts
    let mut registry = PortalRegistry::new();
    let node = registry.acquire("overlay-root");
    println!("portal outer: {}", node.outer_style());
    println!("portal inner: {}", node.inner_style());

    let mut tooltip = Tooltip::new(
        OffsetSolver,
        TooltipOptions::new()
            .with_bindings(vec![
                TriggerBinding::new(TriggerAction::Hover),
                TriggerBinding::new(TriggerAction::Click).with_stop_propagation(true),
            ])
            .with_floating(
                FloatingOptions::new()
                    .with_placement(Placement::TopStart)
                    .with_offset(8.0),
            ),
    );
    tooltip.register_content(ContentConfig::new(
        "tip",
        &[TriggerAction::Hover, TriggerAction::Click],
    ));

    // Measurements from the host: anchor rect and tooltip size.
    tooltip.set_reference(Rect::new(120.0, 480.0, 160.0, 36.0));
    tooltip.set_floating_size(Size::new(220.0, 48.0));

    tooltip.pointer_enter();
    println!(
        "after enter: open={} active={:?}",
        tooltip.is_open(),
        tooltip.active_content()
    );

    let mut now_ms = 0u64;
    while tooltip.content_phase("tip") != Some(TransitionPhase::Entered) {
        now_ms += 16;
        tooltip.tick(now_ms);
    }
    let position = tooltip
        .position()
        .expect("reference and size were measured");
    println!("entered at {now_ms}ms: {}", position.css());
    println!(
        "style: {}",
        tooltip.content_style("tip").expect("registered above")
    );

    // A mouse click on the hover-opened tooltip switches the trigger but
    // leaves the close to pointer_leave.
    tooltip.click(PointerKind::Mouse);
    println!(
        "after click: open={} trigger={:?}",
        tooltip.is_open(),
        tooltip.current_trigger()
    );

    tooltip.pointer_leave();
    while tooltip.content_phase("tip") != Some(TransitionPhase::Exited) {
        now_ms += 16;
        tooltip.tick(now_ms);
    }
    println!(
        "exited at {now_ms}ms, style: {}",
        tooltip.content_style("tip").expect("registered above")
    );

    let released = registry.release(&"overlay-root");
    println!("portal released: {released}");
}
