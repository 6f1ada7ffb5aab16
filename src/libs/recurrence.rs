//! Date arithmetic for recurring tasks.

use super::todo::{Recurrence, Todo};
use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Due date and reminder of the occurrence that follows a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextOccurrence {
    pub due_date: NaiveDate,
    pub reminder_at: Option<NaiveDateTime>,
}

/// Next due date for a recurrence rule.
///
/// Monthly steps keep the day of month when it exists and otherwise clamp to
/// the last day of the target month, so Jan 31 is followed by Feb 28/29.
pub fn next_due_date(due: NaiveDate, recurrence: Recurrence) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::None => None,
        Recurrence::Daily => due.checked_add_days(Days::new(1)),
        Recurrence::Weekly => due.checked_add_days(Days::new(7)),
        Recurrence::Monthly => due.checked_add_months(Months::new(1)),
    }
}

/// Shifts a reminder so it keeps its offset from the due date.
///
/// The offset is measured from midnight of `due`, so a reminder the evening
/// before stays the evening before.
pub fn next_reminder_at(reminder: NaiveDateTime, due: NaiveDate, next_due: NaiveDate) -> Option<NaiveDateTime> {
    let offset = reminder - due.and_time(NaiveTime::MIN);
    next_due.and_time(NaiveTime::MIN).checked_add_signed(offset)
}

/// Computes the follow-up occurrence of `todo`, if it recurs and has a due date.
pub fn next_occurrence(todo: &Todo) -> Option<NextOccurrence> {
    if !todo.recurrence.is_enabled() {
        return None;
    }
    let due = todo.due_date?;
    let next_due = next_due_date(due, todo.recurrence)?;
    let reminder_at = todo.reminder_at.and_then(|reminder| next_reminder_at(reminder, due, next_due));

    Some(NextOccurrence {
        due_date: next_due,
        reminder_at,
    })
}
