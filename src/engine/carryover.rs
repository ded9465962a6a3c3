//! Shared primitive for carrying a category into another window and
//! reassigning its transactions, used by both the migrator and the
//! recurring replicator.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DateWindow, FamilyLedger};

/// Outcome of carrying one category forward.
pub(crate) struct Carried {
    pub target_id: Uuid,
    /// False when a matching category already existed in the target window
    /// (success-with-skip).
    pub created: bool,
}

/// Ensures a copy of `source_id` exists in the window starting at
/// `target_start`, matched by normalized name plus kind. The copy gets a
/// fresh id and a cleared `realized` flag; everything else is preserved.
pub(crate) fn carry_category(
    family: &mut FamilyLedger,
    source_id: Uuid,
    target_start: NaiveDate,
) -> Option<Carried> {
    let source = family.category(source_id)?.clone();
    if let Some(existing) = family
        .categories_in(target_start)
        .find(|c| c.matches(&source.name, source.kind))
    {
        return Some(Carried {
            target_id: existing.id,
            created: false,
        });
    }
    let copy = source.carry_to(target_start);
    let target_id = family.add_category(copy);
    Some(Carried {
        target_id,
        created: true,
    })
}

/// Moves transactions of `from_category` dated inside `window` onto
/// `to_category`. Returns how many moved.
pub(crate) fn move_transactions_in_window(
    family: &mut FamilyLedger,
    from_category: Uuid,
    to_category: Uuid,
    window: DateWindow,
) -> usize {
    let mut moved = 0;
    for txn in &mut family.transactions {
        if txn.category_id == from_category && window.contains(txn.date) {
            txn.category_id = to_category;
            moved += 1;
        }
    }
    if moved > 0 {
        family.touch();
    }
    moved
}
