//! Pending-input buffer: per-module drafts of resources not yet created.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::entities::ResourceKind;
use crate::domain::ids::NodeId;

/// Raw payload input of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftPayload {
    /// URL typed by the user (or any literal reference).
    Text(String),
    /// File picked by the user, resolved into a reference on commit.
    File(PathBuf),
}

impl Default for DraftPayload {
    fn default() -> Self {
        DraftPayload::Text(String::new())
    }
}

/// In-progress resource definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDraft {
    pub title: String,
    pub kind: ResourceKind,
    pub payload: DraftPayload,
}

/// A single field edit applied to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    Title(String),
    Kind(ResourceKind),
    Url(String),
    File(PathBuf),
}

/// Drafts keyed by the module they will be added to.
#[derive(Debug, Clone, Default)]
pub struct DraftBuffer {
    drafts: HashMap<NodeId, ResourceDraft>,
}

impl DraftBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one field into the module's draft, starting from the default
    /// draft (`link`, empty title and payload) if there is none.
    pub fn set(&mut self, module_id: NodeId, update: DraftUpdate) -> &ResourceDraft {
        let draft = self.drafts.entry(module_id).or_default();
        match update {
            DraftUpdate::Title(title) => draft.title = title,
            DraftUpdate::Kind(kind) => draft.kind = kind,
            DraftUpdate::Url(url) => draft.payload = DraftPayload::Text(url),
            DraftUpdate::File(path) => draft.payload = DraftPayload::File(path),
        }
        draft
    }

    pub fn get(&self, module_id: NodeId) -> Option<&ResourceDraft> {
        self.drafts.get(&module_id)
    }

    /// Current draft for the module, or the default draft.
    pub fn peek(&self, module_id: NodeId) -> ResourceDraft {
        self.drafts.get(&module_id).cloned().unwrap_or_default()
    }

    /// Returns the module's draft and resets it to the default draft.
    pub fn consume_and_clear(&mut self, module_id: NodeId) -> ResourceDraft {
        let entry = self.drafts.entry(module_id).or_default();
        std::mem::take(entry)
    }

    /// Drops drafts for modules that no longer exist.
    pub fn discard(&mut self, module_ids: &[NodeId]) {
        for id in module_ids {
            self.drafts.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_draft_when_setting_title_then_default_kind_is_link() {
        let mut buffer = DraftBuffer::new();
        let draft = buffer.set(NodeId::new(1), DraftUpdate::Title("Slides".into()));

        assert_eq!(draft.title, "Slides");
        assert_eq!(draft.kind, ResourceKind::Link);
        assert_eq!(draft.payload, DraftPayload::Text(String::new()));
    }

    #[test]
    fn given_fields_set_when_consuming_then_returns_draft_and_resets() {
        let mut buffer = DraftBuffer::new();
        let module = NodeId::new(4);
        buffer.set(module, DraftUpdate::Title("Diagram".into()));
        buffer.set(module, DraftUpdate::Kind(ResourceKind::Image));
        buffer.set(module, DraftUpdate::File(PathBuf::from("/tmp/diagram.png")));

        let draft = buffer.consume_and_clear(module);

        assert_eq!(draft.title, "Diagram");
        assert_eq!(draft.kind, ResourceKind::Image);
        assert_eq!(draft.payload, DraftPayload::File(PathBuf::from("/tmp/diagram.png")));
        assert_eq!(buffer.get(module), Some(&ResourceDraft::default()));
    }

    #[test]
    fn given_drafts_for_two_modules_when_editing_one_then_other_is_untouched() {
        let mut buffer = DraftBuffer::new();
        buffer.set(NodeId::new(1), DraftUpdate::Url("https://a".into()));
        buffer.set(NodeId::new(2), DraftUpdate::Url("https://b".into()));

        buffer.consume_and_clear(NodeId::new(1));

        assert_eq!(
            buffer.peek(NodeId::new(2)).payload,
            DraftPayload::Text("https://b".into())
        );
    }

    #[test]
    fn given_deleted_modules_when_discarding_then_drafts_dropped() {
        let mut buffer = DraftBuffer::new();
        buffer.set(NodeId::new(1), DraftUpdate::Title("x".into()));
        buffer.set(NodeId::new(2), DraftUpdate::Title("y".into()));

        buffer.discard(&[NodeId::new(1)]);

        assert_eq!(buffer.len(), 1);
        assert!(buffer.get(NodeId::new(1)).is_none());
    }
}
