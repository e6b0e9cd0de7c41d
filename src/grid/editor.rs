use std::collections::BTreeSet;

use super::model::{Activity, CellKey, Grid};

/// The draft can never be committed blank; the dialog re-prompts instead of
/// silently writing empty cells.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("activity text is empty")]
    EmptyText,
}

/// One batch-edit dialog over the current selection. Holds the target cells
/// and the draft text; the grid itself is only touched by the owner applying
/// a successful commit. Dropping the session is a cancel.
#[derive(Debug, Clone)]
pub struct EditSession {
    cells: Vec<CellKey>,
    pub draft: String,
}

impl EditSession {
    /// Open an editor over `selection`. Empty selections are a no-op. The
    /// draft is prefilled when every selected cell already shares one
    /// identical non-empty text, so a re-label starts from the current value.
    pub fn open(selection: &BTreeSet<CellKey>, grid: &Grid) -> Option<Self> {
        if selection.is_empty() {
            return None;
        }
        // Prefill only when every cell carries the same non-empty text; a
        // blank cell in the mix means the values differ.
        let mut cells = selection.iter();
        let first = cells.next().and_then(|&c| grid.get(c));
        let draft = match first {
            Some(text) => {
                if cells.all(|&c| grid.get(c) == Some(text)) {
                    text.to_string()
                } else {
                    String::new()
                }
            }
            None => String::new(),
        };
        Some(Self {
            cells: selection.iter().copied().collect(),
            draft,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Produce the upsert batch: the trimmed draft applied uniformly to every
    /// selected cell. Fails without side effects when the draft is blank.
    pub fn commit(&self) -> Result<Vec<Activity>, CommitError> {
        let text = self.draft.trim();
        if text.is_empty() {
            return Err(CommitError::EmptyText);
        }
        Ok(self
            .cells
            .iter()
            .map(|cell| Activity {
                time_hour: cell.hour(),
                day_of_week: cell.day(),
                activity_text: text.to_string(),
            })
            .collect())
    }
}
