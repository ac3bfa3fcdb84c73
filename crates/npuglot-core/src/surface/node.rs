//! Node kinds held by the surface.

/// Semantic color class of a label. Mapped to terminal styles by the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Danger,
    /// Highlighted member of a badge group.
    Active,
    /// Non-highlighted member of a badge group.
    Inactive,
}

/// Fill color treatment of the frequency bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Nominal,
    Overclock,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Badge {
    pub text: String,
    pub tone: Tone,
}

impl Badge {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Bar fill. `percent == None` means no bar can be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fill {
    pub percent: Option<u8>,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Drop-down bound to a mutable device field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Select {
    pub options: Vec<SelectOption>,
    /// Currently shown value. While `edit_lock` is set it is the user's
    /// pending choice and polls leave it alone.
    pub value: String,
    pub edit_lock: bool,
    /// Set while a write triggered by this control is in flight.
    pub disabled: bool,
}

impl Select {
    pub fn position(&self) -> Option<usize> {
        self.options.iter().position(|o| o.value == self.value)
    }

    /// Moves the value by `delta` options, clamped to the list.
    pub fn step(&mut self, delta: isize) {
        if self.options.is_empty() {
            return;
        }
        let last = self.options.len() as isize - 1;
        let next = match self.position() {
            Some(pos) => (pos as isize + delta).clamp(0, last),
            None => 0,
        };
        self.value = self.options[next as usize].value.clone();
    }

    pub fn selected_label(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.value == self.value)
            .map(|o| o.label.as_str())
            .unwrap_or(self.value.as_str())
    }
}

/// Free text entry (overclock MHz).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Input {
    pub value: String,
    pub edit_lock: bool,
    pub disabled: bool,
}

/// One rendered flow-offload row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowRow {
    pub index: String,
    pub state: Badge,
    pub kind: String,
    pub orig: String,
    pub new_flow: String,
    pub eth: String,
    pub packets: String,
    pub bytes: String,
}

impl FlowRow {
    pub fn cells(&self) -> [&str; 8] {
        [
            self.index.as_str(),
            self.state.text.as_str(),
            self.kind.as_str(),
            self.orig.as_str(),
            self.new_flow.as_str(),
            self.eth.as_str(),
            self.packets.as_str(),
            self.bytes.as_str(),
        ]
    }
}

/// Flow table: fixed header plus a body rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowTable {
    pub header: Vec<&'static str>,
    pub rows: Vec<FlowRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Badge(Badge),
    Badges(Vec<Badge>),
    Fill(Fill),
    Select(Select),
    Input(Input),
    Table(FlowTable),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(values: &[&str], value: &str) -> Select {
        Select {
            options: values
                .iter()
                .map(|v| SelectOption {
                    value: v.to_string(),
                    label: v.to_uppercase(),
                })
                .collect(),
            value: value.to_string(),
            ..Select::default()
        }
    }

    #[test]
    fn step_clamps_to_options() {
        let mut s = select(&["a", "b", "c"], "b");
        s.step(1);
        assert_eq!(s.value, "c");
        s.step(1);
        assert_eq!(s.value, "c");
        s.step(-5);
        assert_eq!(s.value, "a");
    }

    #[test]
    fn step_from_unknown_value_picks_first() {
        let mut s = select(&["a", "b"], "zzz");
        s.step(1);
        assert_eq!(s.value, "a");
        assert_eq!(s.selected_label(), "A");
    }

    #[test]
    fn step_without_options_is_noop() {
        let mut s = select(&[], "x");
        s.step(1);
        assert_eq!(s.value, "x");
        assert_eq!(s.selected_label(), "x");
    }
}
