//! The request bodies for creating and editing transactions.

use serde::{Deserialize, Deserializer};
use time::Date;

use crate::{
    auth::UserID,
    transaction::{Category, Transaction, TransactionType},
};

/// The JSON body for creating a transaction.
///
/// Clients may send a `user_id`, but it is never trusted: the owner is
/// replaced with the caller by [authorize_write](crate::ownership::authorize_write).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionDraft {
    /// A short name for the transaction.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free text about the transaction.
    #[serde(default)]
    pub note: Option<String>,
    /// The owner claimed by the client.
    #[serde(default)]
    pub user_id: Option<UserID>,
}

/// The JSON body for editing a transaction.
///
/// Fields that are left out keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionPatch {
    /// The new title.
    pub title: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new transaction type.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// The new category.
    pub category: Option<Category>,
    /// The new date.
    pub date: Option<Date>,
    /// The new note. `Some(None)` is an explicit `null` and clears the note.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub note: Option<Option<String>>,
    /// The owner claimed by the client.
    pub user_id: Option<UserID>,
}

impl TransactionPatch {
    /// Apply the patch on top of the `stored` transaction.
    ///
    /// The result still has to go through
    /// [authorize_write](crate::ownership::authorize_write) and the category
    /// check like any other write.
    pub fn apply_to(self, stored: Transaction) -> TransactionDraft {
        TransactionDraft {
            title: self.title.unwrap_or(stored.title),
            amount: self.amount.unwrap_or(stored.amount),
            transaction_type: self.transaction_type.unwrap_or(stored.transaction_type),
            category: self.category.unwrap_or(stored.category),
            date: self.date.unwrap_or(stored.date),
            note: self.note.unwrap_or(stored.note),
            user_id: self.user_id.or(Some(stored.user_id)),
        }
    }
}

/// Deserialize a field that is present in the body, even if it is `null`.
///
/// Combined with `#[serde(default)]` this tells a missing field (`None`)
/// apart from an explicit `null` (`Some(None)`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod form_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        auth::UserID,
        transaction::{Category, Transaction, TransactionDraft, TransactionPatch, TransactionType},
    };

    fn stored_transaction() -> Transaction {
        Transaction {
            id: 7,
            title: "Rent".to_owned(),
            amount: 500.0,
            transaction_type: TransactionType::Expense,
            category: Category::Rent,
            date: date!(2025 - 10 - 01),
            note: Some("October".to_owned()),
            user_id: UserID::new(1),
        }
    }

    #[test]
    fn draft_parses_without_optional_fields() {
        let draft: TransactionDraft = serde_json::from_value(json!({
            "title": "Lunch",
            "amount": 12.5,
            "type": "EXPENSE",
            "category": "FOOD",
            "date": "2025-10-26"
        }))
        .unwrap();

        assert_eq!(draft.note, None);
        assert_eq!(draft.user_id, None);
        assert_eq!(draft.date, date!(2025 - 10 - 26));
    }

    #[test]
    fn draft_rejects_unknown_category() {
        let result = serde_json::from_value::<TransactionDraft>(json!({
            "title": "Lunch",
            "amount": 12.5,
            "type": "EXPENSE",
            "category": "LOTTERY",
            "date": "2025-10-26"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn empty_patch_keeps_stored_values() {
        let stored = stored_transaction();

        let draft = TransactionPatch::default().apply_to(stored.clone());

        assert_eq!(draft.title, stored.title);
        assert_eq!(draft.amount, stored.amount);
        assert_eq!(draft.transaction_type, stored.transaction_type);
        assert_eq!(draft.category, stored.category);
        assert_eq!(draft.date, stored.date);
        assert_eq!(draft.note, stored.note);
        assert_eq!(draft.user_id, Some(stored.user_id));
    }

    #[test]
    fn patch_overrides_given_fields() {
        let patch: TransactionPatch =
            serde_json::from_value(json!({"note": "November", "type": "INCOME"})).unwrap();

        let draft = patch.apply_to(stored_transaction());

        assert_eq!(draft.note, Some("November".to_owned()));
        assert_eq!(draft.transaction_type, TransactionType::Income);
        assert_eq!(draft.category, Category::Rent);
    }

    #[test]
    fn null_note_clears_stored_note() {
        let patch: TransactionPatch = serde_json::from_value(json!({"note": null})).unwrap();

        let draft = patch.apply_to(stored_transaction());

        assert_eq!(draft.note, None);
    }

    #[test]
    fn missing_note_keeps_stored_note() {
        let patch: TransactionPatch = serde_json::from_value(json!({"amount": 1.0})).unwrap();

        let draft = patch.apply_to(stored_transaction());

        assert_eq!(draft.note, Some("October".to_owned()));
    }
}
