use chrono::{DateTime, Duration, Local};

/// What the user picked in the deferral prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    /// Run the action right away.
    Now,
    /// Postpone the action by this delay.
    Defer(Duration),
}

/// When the scheduled job fires.
///
/// A tagged variant instead of a nullable timestamp, so the descriptor
/// writer has to handle both shapes explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Fire as soon as the supervisor loads the job, including on the next
    /// boot if the machine goes down first.
    Immediate,
    /// Fire at this local wall-clock time.
    At(DateTime<Local>),
}

/// Resolves a prompt selection into a concrete activation.
///
/// `now` is read exactly once per invocation by the caller; all arithmetic
/// happens on that single reading so a stalled process cannot drift the
/// scheduled time.
pub fn resolve(choice: UserChoice, now: DateTime<Local>) -> Activation {
    match choice {
        UserChoice::Now => Activation::Immediate,
        UserChoice::Defer(delay) => Activation::At(now + delay),
    }
}

/// Human-readable activation time for the confirmation dialog,
/// e.g. "January 1 at 2:00 PM".
pub fn human_date(when: &DateTime<Local>) -> String {
    when.format("%B %-d at %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn now_resolves_to_immediate() {
        let resolved = resolve(UserChoice::Now, at(2024, 1, 1, 10, 0));
        assert_eq!(resolved, Activation::Immediate);
    }

    #[test]
    fn four_hour_delay_resolves_against_the_captured_reading() {
        let now = at(2024, 1, 1, 10, 0);
        let resolved = resolve(UserChoice::Defer(Duration::hours(4)), now);
        assert_eq!(resolved, Activation::At(at(2024, 1, 1, 14, 0)));
    }

    #[test]
    fn delay_crossing_midnight_lands_on_the_next_day() {
        let now = at(2024, 1, 1, 22, 30);
        let resolved = resolve(UserChoice::Defer(Duration::hours(4)), now);
        assert_eq!(resolved, Activation::At(at(2024, 1, 2, 2, 30)));
    }

    #[test]
    fn human_date_reads_like_a_sentence() {
        let formatted = human_date(&at(2024, 1, 1, 14, 5));
        assert_eq!(formatted, "January 1 at 2:05 PM");
    }
}
