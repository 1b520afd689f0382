use alloc::format;
use alloc::string::String;

/// Lifecycle of a floating element's enter/exit animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    Entering,
    Entered,
    Exiting,
    #[default]
    Exited,
}

impl TransitionPhase {
    /// Whether the element should still receive pointer events.
    ///
    /// Exiting elements are already invisible to input so a fading tooltip
    /// cannot block clicks on the content behind it.
    pub fn pointer_events(self) -> bool {
        matches!(self, TransitionPhase::Entering | TransitionPhase::Entered)
    }
}

/// Style snapshot applied during one transition phase.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatStyle {
    pub opacity: f64,
    pub z_index: i32,
}

impl FloatStyle {
    pub const fn new(opacity: f64, z_index: i32) -> Self {
        Self { opacity, z_index }
    }
}

/// Per-phase styles for a fading floating element.
///
/// The default map fades opacity between 0 and 1 and parks exited elements
/// at a negative z-index so they stack below live content.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionStyles {
    pub entering: FloatStyle,
    pub entered: FloatStyle,
    pub exiting: FloatStyle,
    pub exited: FloatStyle,
}

impl TransitionStyles {
    pub fn style_for(&self, phase: TransitionPhase) -> FloatStyle {
        match phase {
            TransitionPhase::Entering => self.entering,
            TransitionPhase::Entered => self.entered,
            TransitionPhase::Exiting => self.exiting,
            TransitionPhase::Exited => self.exited,
        }
    }

    /// Inline style for `phase`, including the pointer-events gate.
    pub fn css(&self, phase: TransitionPhase) -> String {
        let style = self.style_for(phase);
        let pointer_events = if phase.pointer_events() { "auto" } else { "none" };
        format!(
            "opacity:{};z-index:{};pointer-events:{pointer_events}",
            style.opacity, style.z_index
        )
    }
}

impl Default for TransitionStyles {
    fn default() -> Self {
        Self {
            entering: FloatStyle::new(1.0, 1),
            entered: FloatStyle::new(1.0, 1),
            exiting: FloatStyle::new(0.0, -99),
            exited: FloatStyle::new(0.0, -99),
        }
    }
}

/// Drives one element's [`TransitionPhase`] from a visibility target and a
/// clock.
///
/// Target changes take effect immediately (`Exited -> Entering` on show,
/// `Entered -> Exiting` on hide); the in-between phases settle once
/// `timeout_ms` has elapsed since the last change. Reversing mid-flight
/// restarts the timer.
#[derive(Clone, Copy, Debug)]
pub struct TransitionTracker {
    phase: TransitionPhase,
    changed_at_ms: Option<u64>,
    timeout_ms: u64,
}

impl TransitionTracker {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            phase: TransitionPhase::Exited,
            changed_at_ms: None,
            timeout_ms,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Advances the phase toward `visible` at time `now_ms` and returns the
    /// phase after the step.
    pub fn update(&mut self, visible: bool, now_ms: u64) -> TransitionPhase {
        match (self.phase, visible) {
            (TransitionPhase::Exiting | TransitionPhase::Exited, true) => {
                self.phase = TransitionPhase::Entering;
                self.changed_at_ms = Some(now_ms);
            }
            (TransitionPhase::Entering | TransitionPhase::Entered, false) => {
                self.phase = TransitionPhase::Exiting;
                self.changed_at_ms = Some(now_ms);
            }
            _ => {}
        }
        if let Some(changed_at) = self.changed_at_ms {
            if now_ms.saturating_sub(changed_at) >= self.timeout_ms {
                self.phase = match self.phase {
                    TransitionPhase::Entering => TransitionPhase::Entered,
                    TransitionPhase::Exiting => TransitionPhase::Exited,
                    settled => settled,
                };
                self.changed_at_ms = None;
            }
        }
        self.phase
    }
}
