use std::collections::BTreeSet;

/// Selection state over the currently visible flat task ordering.
///
/// Pure state transitions; the caller supplies the ordering snapshot when a
/// range is resolved. The anchor survives toggles so a later range select
/// extends from the original pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<String>,
    anchor: Option<String>,
    last: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click: the selection becomes exactly `{id}`
    pub fn select(&mut self, id: &str) {
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.anchor = Some(id.to_string());
        self.last = Some(id.to_string());
    }

    /// Ctrl-click: membership flips, the anchor stays put. Only a plain
    /// select establishes an anchor.
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        self.last = Some(id.to_string());
    }

    /// Shift-click: select the contiguous slice between the anchor and `id`
    /// in `visible`, inclusive, in either direction. A missing anchor or an
    /// id absent from the ordering is a no-op.
    pub fn select_range(&mut self, id: &str, visible: &[String]) {
        let Some(anchor) = self.anchor.clone() else {
            return;
        };
        let Some(a) = visible.iter().position(|v| *v == anchor) else {
            return;
        };
        let Some(b) = visible.iter().position(|v| *v == id) else {
            return;
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        self.selected.clear();
        for v in &visible[lo..=hi] {
            self.selected.insert(v.clone());
        }
        self.last = Some(id.to_string());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.last = None;
    }

    /// Drop selected ids that no longer exist after a refresh
    pub fn retain_present(&mut self, present: &BTreeSet<String>) {
        self.selected.retain(|id| present.contains(id));
        if self
            .anchor
            .as_ref()
            .is_some_and(|anchor| !present.contains(anchor))
        {
            self.anchor = None;
        }
        if self.last.as_ref().is_some_and(|last| !present.contains(last)) {
            self.last = None;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
