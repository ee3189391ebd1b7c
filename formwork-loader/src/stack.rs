use log::debug;

use crate::class::ObjectKind;

/// One open container on the placement stack.
#[derive(Debug, Clone)]
pub struct Placed<O> {
    pub object: O,
    pub kind: ObjectKind,
    pub class: String,
}

/// The hierarchical cursor over currently open containers.
///
/// Pushes and pops mirror the document's nesting exactly: a handler that
/// pushes must pop once before returning. The nearest enclosing widget (as
/// opposed to layout) is tracked as derived state and recomputed whenever a
/// widget is popped.
#[derive(Debug, Default)]
pub struct PlacementStack<O> {
    entries: Vec<Placed<O>>,
    top_widget: Option<usize>,
}

impl<O> PlacementStack<O> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            top_widget: None,
        }
    }

    pub fn push(&mut self, entry: Placed<O>) {
        debug!("push {} ({:?})", entry.class, entry.kind);
        if entry.kind.is_widget() {
            self.top_widget = Some(self.entries.len());
        }
        self.entries.push(entry);
    }

    pub fn pop_widget(&mut self) -> Option<Placed<O>> {
        let entry = self.entries.pop()?;
        self.top_widget = self.entries.iter().rposition(|e| e.kind.is_widget());
        debug!("pop widget {}", entry.class);
        Some(entry)
    }

    pub fn pop_layout(&mut self) -> Option<Placed<O>> {
        let entry = self.entries.pop()?;
        debug!("pop layout {}", entry.class);
        Some(entry)
    }

    pub fn peek(&self) -> Option<&Placed<O>> {
        self.entries.last()
    }

    pub fn top_is_layout(&self) -> bool {
        self.peek().is_some_and(|e| e.kind.is_layout())
    }

    /// The most recently pushed widget-kind entry still on the stack.
    pub fn top_widget(&self) -> Option<&Placed<O>> {
        self.top_widget.map(|i| &self.entries[i])
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.top_widget = None;
    }
}
