/// User gesture classes a tooltip can react to.
///
/// `Hover` doubles as the rest state: closing a tooltip through anything but
/// [`crate::Tooltip::manual_close`] resets the current trigger to `Hover`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerAction {
    Click,
    #[default]
    Hover,
    Focus,
}

/// A trigger action enabled on the reference element, plus its event options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerBinding {
    pub action: TriggerAction,
    /// Ask the host to stop event propagation for this action's events.
    pub stop_propagation: bool,
}

impl TriggerBinding {
    pub fn new(action: TriggerAction) -> Self {
        Self {
            action,
            stop_propagation: false,
        }
    }

    pub fn with_stop_propagation(mut self, stop: bool) -> Self {
        self.stop_propagation = stop;
        self
    }
}

/// Pointer device class reported with click events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}
