/// The three main-view panels, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelId {
    Chapters,
    Verses,
    Content,
}

impl PanelId {
    pub const RING: [PanelId; 3] = [PanelId::Chapters, PanelId::Verses, PanelId::Content];

    pub fn name(&self) -> &'static str {
        match self {
            PanelId::Chapters => "Chapters",
            PanelId::Verses => "Verses",
            PanelId::Content => "Scripture",
        }
    }

    fn position(self) -> usize {
        match self {
            PanelId::Chapters => 0,
            PanelId::Verses => 1,
            PanelId::Content => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub id: PanelId,
    pub focused: bool,
}

/// Which panel receives input.
///
/// At most one panel is focused, and none while an overlay has captured
/// input. Focus requests during a capture are refused.
#[derive(Debug, Clone)]
pub struct FocusController {
    panels: [PanelState; 3],
    captured: bool,
}

impl FocusController {
    pub fn new(initial: PanelId) -> Self {
        let mut controller = Self {
            panels: PanelId::RING.map(|id| PanelState { id, focused: false }),
            captured: false,
        };
        controller.focus(initial);
        controller
    }

    pub fn panels(&self) -> &[PanelState] {
        &self.panels
    }

    pub fn focused(&self) -> Option<PanelId> {
        self.panels.iter().find(|p| p.focused).map(|p| p.id)
    }

    pub fn is_focused(&self, id: PanelId) -> bool {
        self.panels[id.position()].focused
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Focus `id` and blur the others. Returns `false` while input is captured.
    pub fn focus(&mut self, id: PanelId) -> bool {
        if self.captured {
            return false;
        }
        for panel in &mut self.panels {
            panel.focused = panel.id == id;
        }
        true
    }

    pub fn cycle_forward(&mut self) -> bool {
        let next = match self.focused() {
            Some(id) => PanelId::RING[(id.position() + 1) % PanelId::RING.len()],
            None => PanelId::Chapters,
        };
        self.focus(next)
    }

    pub fn cycle_backward(&mut self) -> bool {
        let len = PanelId::RING.len();
        let prev = match self.focused() {
            Some(id) => PanelId::RING[(id.position() + len - 1) % len],
            None => PanelId::Content,
        };
        self.focus(prev)
    }

    /// Hand input to an overlay. Returns the panel that had focus.
    pub fn capture(&mut self) -> Option<PanelId> {
        let previous = self.focused();
        for panel in &mut self.panels {
            panel.focused = false;
        }
        self.captured = true;
        previous
    }

    /// End an overlay capture and focus `to`.
    pub fn release(&mut self, to: PanelId) {
        self.captured = false;
        self.focus(to);
    }

    /// `"[*] Name"` when focused, `"[ ] Name"` otherwise.
    pub fn label(&self, id: PanelId) -> String {
        let marker = if self.is_focused(id) { "[*]" } else { "[ ]" };
        format!("{} {}", marker, id.name())
    }
}
