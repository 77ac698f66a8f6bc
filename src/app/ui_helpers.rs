use crate::domain::CategoryStatus;

pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + 1) % len }
}

/// `Stop <cat>` while running, `Start <cat>` otherwise, with the total
/// appended when minutes are displayed.
pub fn button_label(
    category: &str,
    status: CategoryStatus,
    total_minutes: u64,
    display_minutes: bool,
) -> String {
    let verb = match status {
        CategoryStatus::Running => "Stop",
        CategoryStatus::Stopped => "Start",
    };

    if display_minutes {
        format!("{} {} ({} min)", verb, category, total_minutes)
    } else {
        format!("{} {}", verb, category)
    }
}
