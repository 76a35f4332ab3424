//! Mutation journal - the MutationObserver analog.
//!
//! Every arena write that actually changes DOM state appends a record here.
//! Writes that would leave the tree byte-identical append nothing; the host
//! editor relies on journal silence to distinguish user input from
//! programmatic updates, so a redundant record is as much a bug as a
//! redundant DOM write.

use super::arena::NodeId;

/// One observed DOM mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// A child was inserted under (or moved within/into) `parent`.
    ChildInserted { parent: NodeId, child: NodeId },
    /// A child was detached from `parent`.
    ChildRemoved { parent: NodeId, child: NodeId },
    /// An attribute on `node` was written or removed.
    AttributeChanged { node: NodeId, name: String },
    /// A text node's content was rewritten.
    CharacterData { node: NodeId },
}

impl MutationRecord {
    /// Whether this record is a text-content rewrite.
    pub fn is_character_data(&self) -> bool {
        matches!(self, MutationRecord::CharacterData { .. })
    }

    /// Whether this record is a child-list change (insert or remove).
    pub fn is_child_list(&self) -> bool {
        matches!(
            self,
            MutationRecord::ChildInserted { .. } | MutationRecord::ChildRemoved { .. }
        )
    }
}

/// Append-only journal of arena mutations.
///
/// Drained by the consumer (typically a test or the editor's observer
/// bridge) via [`MutationJournal::take`].
#[derive(Debug, Default)]
pub struct MutationJournal {
    records: Vec<MutationRecord>,
}

impl MutationJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one mutation.
    pub fn push(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    /// Drain all accumulated records.
    pub fn take(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no mutations have been recorded since the last drain.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of character-data records currently held.
    pub fn character_data_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_character_data()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomArena;

    #[test]
    fn test_take_drains() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let child = dom.create_text("hi");
        dom.append_child(parent, child);

        assert!(!dom.journal().is_empty());
        let records = dom.take_records();
        assert_eq!(records.len(), 1);
        assert!(dom.journal().is_empty());
    }

    #[test]
    fn test_record_kinds() {
        let mut dom = DomArena::new();
        let parent = dom.create_element("div");
        let text = dom.create_text("a");
        dom.append_child(parent, text);
        dom.set_text(text, "b");
        dom.set_attribute(parent, "class", "c");
        dom.remove_child(parent, text);

        let records = dom.take_records();
        assert_eq!(records.len(), 4);
        assert!(records[0].is_child_list());
        assert!(records[1].is_character_data());
        assert_eq!(
            records[2],
            MutationRecord::AttributeChanged {
                node: parent,
                name: "class".to_string()
            }
        );
        assert!(records[3].is_child_list());
    }
}
