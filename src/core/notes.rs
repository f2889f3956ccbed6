//! Per-entry notes on expense listings.
//!
//! Two shapes hang off an expense category, both keyed by the row index of
//! the entry they annotate: a plain text note, and a sheet of structured
//! rows (person, amount, description) for splitting a cost across people.
//! Each category stores its notes under its own sanitized key, so `Kira`
//! notes never bleed into `Personel Maaş`.

use crate::{
    errors::Result,
    storage::{StorageKey, Store},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plain notes for one category, keyed by entry index.
pub type ExpenseNotes = BTreeMap<u32, String>;

/// Structured note sheets for one category, keyed by entry index.
pub type StructuredNotes = BTreeMap<u32, Vec<StructuredNote>>;

/// One row of a structured note sheet. The amount stays text, exactly as
/// typed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuredNote {
    /// Who the row concerns
    pub person: String,
    /// Amount as typed, not parsed
    pub amount: String,
    /// What the row is about
    pub description: String,
}

impl StructuredNote {
    /// Whether every field is empty after trimming. Blank rows are
    /// dropped on save.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.person.trim().is_empty()
            && self.amount.trim().is_empty()
            && self.description.trim().is_empty()
    }
}

/// Loads the plain notes of a category. Absent and corrupt values read as
/// empty.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_expense_notes(store: &Store, category: &str) -> Result<ExpenseNotes> {
    store
        .load_or_default(&StorageKey::expense_notes(category))
        .await
}

/// Saves the plain notes of a category, dropping entries whose text is
/// empty after trimming.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn save_expense_notes(
    store: &Store,
    category: &str,
    notes: &ExpenseNotes,
) -> Result<()> {
    let kept: ExpenseNotes = notes
        .iter()
        .filter(|(_, note)| !note.trim().is_empty())
        .map(|(index, note)| (*index, note.clone()))
        .collect();
    store
        .save_json(&StorageKey::expense_notes(category), &kept)
        .await
}

/// Loads the structured note sheets of a category. Absent and corrupt
/// values read as empty.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn load_structured_notes(store: &Store, category: &str) -> Result<StructuredNotes> {
    store
        .load_or_default(&StorageKey::structured_notes(category))
        .await
}

/// Saves the structured note sheets of a category. Blank rows are pruned
/// and an index whose rows are all blank disappears entirely.
///
/// # Errors
/// Returns an error if encoding or the database query fails.
pub async fn save_structured_notes(
    store: &Store,
    category: &str,
    notes: &StructuredNotes,
) -> Result<()> {
    let kept: StructuredNotes = notes
        .iter()
        .filter_map(|(index, rows)| {
            let rows: Vec<StructuredNote> = rows
                .iter()
                .filter(|row| !row.is_blank())
                .cloned()
                .collect();
            if rows.is_empty() {
                None
            } else {
                Some((*index, rows))
            }
        })
        .collect();
    store
        .save_json(&StorageKey::structured_notes(category), &kept)
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::test_utils::setup_test_store;

    fn note_row(person: &str, amount: &str, description: &str) -> StructuredNote {
        StructuredNote {
            person: person.to_owned(),
            amount: amount.to_owned(),
            description: description.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_plain_notes_round_trip_per_category() -> Result<()> {
        let store = setup_test_store().await?;

        let mut rent_notes = ExpenseNotes::new();
        rent_notes.insert(0, "Haziran kirası elden ödendi".to_owned());
        save_expense_notes(&store, "Kira", &rent_notes).await?;

        let mut payroll_notes = ExpenseNotes::new();
        payroll_notes.insert(0, "Avans düşüldü".to_owned());
        save_expense_notes(&store, "Personel Maaş", &payroll_notes).await?;

        assert_eq!(load_expense_notes(&store, "Kira").await?, rent_notes);
        assert_eq!(
            load_expense_notes(&store, "Personel Maaş").await?,
            payroll_notes
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_saving_drops_emptied_plain_notes() -> Result<()> {
        let store = setup_test_store().await?;

        let mut notes = ExpenseNotes::new();
        notes.insert(0, "kalıcı not".to_owned());
        notes.insert(1, "   ".to_owned());
        notes.insert(2, String::new());
        save_expense_notes(&store, "Reklam", &notes).await?;

        let loaded = load_expense_notes(&store, "Reklam").await?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&0).map(String::as_str), Some("kalıcı not"));
        Ok(())
    }

    #[tokio::test]
    async fn test_structured_save_prunes_blank_rows() -> Result<()> {
        let store = setup_test_store().await?;

        let mut notes = StructuredNotes::new();
        notes.insert(
            0,
            vec![
                note_row("Safa", "15000", "Haziran kaşesi"),
                note_row("", "  ", ""),
                note_row("", "6000", ""),
            ],
        );
        notes.insert(1, vec![note_row("", "", "")]);
        save_structured_notes(&store, "Ekip", &notes).await?;

        let loaded = load_structured_notes(&store, "Ekip").await?;
        assert_eq!(loaded.len(), 1);
        let rows = loaded.get(&0).unwrap();
        // The all-blank row is gone; the amount-only row survives.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].person, "Safa");
        assert_eq!(rows[1].amount, "6000");
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_notes_read_as_empty() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .write_raw(&StorageKey::expense_notes("Kira"), "[broken".to_owned())
            .await?;
        store
            .write_raw(&StorageKey::structured_notes("Kira"), "broken".to_owned())
            .await?;

        assert!(load_expense_notes(&store, "Kira").await?.is_empty());
        assert!(load_structured_notes(&store, "Kira").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_note_keys_share_the_category_slug() -> Result<()> {
        let store = setup_test_store().await?;
        let mut notes = ExpenseNotes::new();
        notes.insert(0, "not".to_owned());
        save_expense_notes(&store, "Personel Maaş", &notes).await?;

        // The sanitized category name is embedded in the stored key.
        let raw = store
            .read_raw(&StorageKey::expense_notes("Personel Maaş"))
            .await?;
        assert!(raw.is_some());
        assert_eq!(
            StorageKey::expense_notes("Personel Maaş").as_str(),
            "expenseNotes_Personel_Maa"
        );
        Ok(())
    }
}
