// NFL season calendar.

use chrono::{Datelike, Local, NaiveDate};

/// The season a date belongs to. Games run September through early
/// February, so January to August still count toward the previous year.
pub fn current_season(today: NaiveDate) -> u16 {
    let year = today.year();
    let season = if today.month() >= 9 { year } else { year - 1 };
    u16::try_from(season).unwrap_or(u16::MAX)
}

/// `current_season` for the local date.
pub fn current_season_today() -> u16 {
    current_season(Local::now().date_naive())
}
