use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use waterfall::{Rect, Size};

use crate::floating::{FloatingOptions, FloatingPosition, PositionSolver};
use crate::transition::{TransitionPhase, TransitionStyles, TransitionTracker};
use crate::trigger::{PointerKind, TriggerAction, TriggerBinding};

/// Configuration shared by every content of one tooltip.
#[derive(Clone, Debug)]
pub struct TooltipOptions {
    /// Trigger actions enabled on the reference element.
    pub bindings: Vec<TriggerBinding>,
    /// Positioning used when the active content has no override.
    pub floating: FloatingOptions,
    pub transition_timeout_ms: u64,
    /// Transition styles used when a content has no override.
    pub transition_styles: TransitionStyles,
}

impl TooltipOptions {
    pub fn new() -> Self {
        Self {
            bindings: vec![TriggerBinding::new(TriggerAction::Click)],
            floating: FloatingOptions::new(),
            transition_timeout_ms: 300,
            transition_styles: TransitionStyles::default(),
        }
    }

    pub fn with_bindings(mut self, bindings: impl Into<Vec<TriggerBinding>>) -> Self {
        self.bindings = bindings.into();
        self
    }

    pub fn with_floating(mut self, floating: FloatingOptions) -> Self {
        self.floating = floating;
        self
    }

    pub fn with_transition_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.transition_timeout_ms = timeout_ms;
        self
    }

    pub fn with_transition_styles(mut self, styles: TransitionStyles) -> Self {
        self.transition_styles = styles;
        self
    }
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// One registered content of a tooltip.
///
/// A tooltip can carry several contents reacting to different trigger
/// actions; at most one is visible at a time, picked by the most recent
/// action on the reference.
#[derive(Clone, Debug)]
pub struct ContentConfig {
    id: String,
    triggers: Vec<TriggerAction>,
    floating: Option<FloatingOptions>,
    transition_styles: Option<TransitionStyles>,
}

impl ContentConfig {
    pub fn new(id: impl Into<String>, triggers: &[TriggerAction]) -> Self {
        Self {
            id: id.into(),
            triggers: triggers.to_vec(),
            floating: None,
            transition_styles: None,
        }
    }

    /// Positioning override active while this content is current.
    pub fn with_floating(mut self, floating: FloatingOptions) -> Self {
        self.floating = Some(floating);
        self
    }

    pub fn with_transition_styles(mut self, styles: TransitionStyles) -> Self {
        self.transition_styles = Some(styles);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn triggers(&self) -> &[TriggerAction] {
        &self.triggers
    }
}

#[derive(Debug)]
struct ContentEntry {
    config: ContentConfig,
    transition: TransitionTracker,
}

/// Headless tooltip controller.
///
/// Holds the open flag, the current trigger, the registered contents with
/// their transition trackers, and the floating measurements. Hosts feed it
/// reference events (`pointer_enter`, `click`, ...) and a clock (`tick`),
/// and read back which content to show, its style, and where to place the
/// floating element.
pub struct Tooltip<S> {
    solver: S,
    options: TooltipOptions,
    contents: Vec<ContentEntry>,
    open: bool,
    /// Action that opened the tooltip, while open.
    opened_by: Option<TriggerAction>,
    /// Most recent action on the reference. Selects the active content.
    current: TriggerAction,
    /// Set by `manual_close` until the next click consumes it.
    manual_closing: bool,
    reference: Option<Rect>,
    floating_size: Option<Size>,
}

impl<S: PositionSolver> Tooltip<S> {
    pub fn new(solver: S, options: TooltipOptions) -> Self {
        Self {
            solver,
            options,
            contents: Vec::new(),
            open: false,
            opened_by: None,
            current: TriggerAction::Hover,
            manual_closing: false,
            reference: None,
            floating_size: None,
        }
    }

    pub fn options(&self) -> &TooltipOptions {
        &self.options
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Adds a content, or replaces the configuration of an existing id.
    ///
    /// Replacing keeps the content's transition state so re-registration
    /// (e.g. on host re-render) does not restart a running animation.
    pub fn register_content(&mut self, config: ContentConfig) {
        if let Some(entry) = self
            .contents
            .iter_mut()
            .find(|entry| entry.config.id == config.id)
        {
            entry.config = config;
        } else {
            self.contents.push(ContentEntry {
                config,
                transition: TransitionTracker::new(self.options.transition_timeout_ms),
            });
        }
    }

    /// Removes a content. Returns whether it was registered.
    pub fn unregister_content(&mut self, id: &str) -> bool {
        let before = self.contents.len();
        self.contents.retain(|entry| entry.config.id != id);
        self.contents.len() != before
    }

    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn opened_by(&self) -> Option<TriggerAction> {
        self.opened_by
    }

    pub fn current_trigger(&self) -> TriggerAction {
        self.current
    }

    pub fn manual_closing(&self) -> bool {
        self.manual_closing
    }

    /// Whether the host should stop propagation of `action`'s events.
    pub fn stop_propagation(&self, action: TriggerAction) -> bool {
        self.options
            .bindings
            .iter()
            .any(|binding| binding.action == action && binding.stop_propagation)
    }

    /// Pointer entered the reference.
    pub fn pointer_enter(&mut self) {
        if !self.has_binding(TriggerAction::Hover) {
            return;
        }
        self.current = TriggerAction::Hover;
        if !self.open {
            self.open = true;
            self.opened_by = Some(TriggerAction::Hover);
        }
    }

    /// Pointer left the reference. Closes only what hover opened.
    pub fn pointer_leave(&mut self) {
        if !self.has_binding(TriggerAction::Hover) {
            return;
        }
        if self.open && self.opened_by == Some(TriggerAction::Hover) {
            self.close();
        }
    }

    /// Reference received keyboard focus.
    pub fn focus(&mut self) {
        if !self.has_binding(TriggerAction::Focus) {
            return;
        }
        self.current = TriggerAction::Focus;
        if !self.open {
            self.open = true;
            self.opened_by = Some(TriggerAction::Focus);
        }
    }

    /// Reference lost focus. Closes only what focus opened.
    pub fn blur(&mut self) {
        if !self.has_binding(TriggerAction::Focus) {
            return;
        }
        if self.open && self.opened_by == Some(TriggerAction::Focus) {
            self.close();
        }
    }

    /// Click on the reference.
    ///
    /// Opens when closed and toggles when open, with two exceptions:
    /// with several contents a click re-targets the click content instead
    /// of closing, and a mouse click on a hover-opened single-content
    /// tooltip leaves the close to `pointer_leave`.
    pub fn click(&mut self, kind: PointerKind) {
        if !self.has_binding(TriggerAction::Click) {
            return;
        }
        if self.manual_closing {
            self.manual_closing = false;
            self.current = TriggerAction::Click;
            return;
        }
        if !self.open {
            self.current = TriggerAction::Click;
            self.open = true;
            self.opened_by = Some(TriggerAction::Click);
            return;
        }
        if self.contents.len() > 1 {
            self.current = TriggerAction::Click;
            self.opened_by = Some(TriggerAction::Click);
            return;
        }
        if kind == PointerKind::Mouse && self.opened_by == Some(TriggerAction::Hover) {
            self.current = TriggerAction::Click;
            return;
        }
        self.close();
    }

    /// Outside dismissal (escape, outside press).
    pub fn dismiss(&mut self) {
        if self.open {
            self.close();
        }
    }

    /// Imperative close that keeps the current trigger.
    ///
    /// Also suppresses the reopening half of the click that usually follows
    /// (a menu item closing its own tooltip sees that click next).
    pub fn manual_close(&mut self) {
        self.manual_closing = true;
        self.open = false;
        self.opened_by = None;
    }

    fn close(&mut self) {
        self.open = false;
        self.opened_by = None;
        self.current = TriggerAction::Hover;
    }

    fn has_binding(&self, action: TriggerAction) -> bool {
        self.options
            .bindings
            .iter()
            .any(|binding| binding.action == action)
    }

    /// Advances every content's transition toward its visibility target.
    pub fn tick(&mut self, now_ms: u64) {
        let open = self.open;
        let current = self.current;
        for entry in &mut self.contents {
            let visible = open && entry.config.triggers.contains(&current);
            entry.transition.update(visible, now_ms);
        }
    }

    /// Id of the content selected by the current trigger, while open.
    pub fn active_content(&self) -> Option<&str> {
        self.active_entry().map(|entry| entry.config.id())
    }

    /// Whether `id` is the content the tooltip is showing.
    pub fn content_visible(&self, id: &str) -> bool {
        self.open
            && self
                .entry(id)
                .is_some_and(|entry| entry.config.triggers.contains(&self.current))
    }

    pub fn content_phase(&self, id: &str) -> Option<TransitionPhase> {
        self.entry(id).map(|entry| entry.transition.phase())
    }

    /// Inline style for `id` at its current transition phase.
    pub fn content_style(&self, id: &str) -> Option<String> {
        let entry = self.entry(id)?;
        let styles = entry
            .config
            .transition_styles
            .unwrap_or(self.options.transition_styles);
        Some(styles.css(entry.transition.phase()))
    }

    /// Positioning in effect: the active content's override, if any, else
    /// the tooltip-wide options.
    pub fn floating_options(&self) -> &FloatingOptions {
        self.active_entry()
            .and_then(|entry| entry.config.floating.as_ref())
            .unwrap_or(&self.options.floating)
    }

    pub fn set_reference(&mut self, reference: Rect) {
        self.reference = Some(reference);
    }

    pub fn set_floating_size(&mut self, size: Size) {
        self.floating_size = Some(size);
    }

    /// Computes the floating position from the current measurements.
    pub fn position(&self) -> Option<FloatingPosition> {
        let reference = self.reference?;
        let size = self.floating_size?;
        let options = *self.floating_options();
        Some(self.solver.compute(reference, size, &options))
    }

    fn entry(&self, id: &str) -> Option<&ContentEntry> {
        self.contents.iter().find(|entry| entry.config.id == id)
    }

    fn active_entry(&self) -> Option<&ContentEntry> {
        if !self.open {
            return None;
        }
        self.contents
            .iter()
            .find(|entry| entry.config.triggers.contains(&self.current))
    }
}

impl<S> fmt::Debug for Tooltip<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tooltip")
            .field("open", &self.open)
            .field("current", &self.current)
            .field("contents", &self.contents.len())
            .finish_non_exhaustive()
    }
}
