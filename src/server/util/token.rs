//! Token and appointment window allocation.
//!
//! A slot's time range is split evenly between its seats. The patient holding token `n`
//! gets the `n`-th window: `start + (n - 1) * minutes_per_patient`, lasting
//! `minutes_per_patient` minutes. Clock arithmetic wraps at midnight.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Minutes in one day; clock arithmetic wraps modulo this value.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time '{0}', expected HH:MM in 24-hour format")]
pub struct InvalidTimeOfDay(pub String);

/// Wall-clock time stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(i32);

impl TimeOfDay {
    /// Parses a strict "HH:MM" 24-hour time.
    pub fn parse(value: &str) -> Result<Self, InvalidTimeOfDay> {
        let invalid = || InvalidTimeOfDay(value.to_string());

        let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }

        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
            return Err(invalid());
        }

        Ok(Self(hours * 60 + minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> i32 {
        self.0
    }

    /// Adds (or with a negative value subtracts) minutes, wrapping past midnight.
    pub fn add_minutes(self, minutes: i32) -> Self {
        let total = self.0 as i64 + minutes as i64;
        Self(total.rem_euclid(MINUTES_PER_DAY as i64) as i32)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A patient's position and appointment window within a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAllocation {
    pub token_number: i32,
    pub token_id: String,
    pub appointment_time: TimeOfDay,
    pub appointment_end_time: TimeOfDay,
}

/// Length of each patient's window, floored to whole minutes.
///
/// Zero when the slot has more seats than minutes; every token then shares the slot start.
pub fn minutes_per_patient(start: TimeOfDay, end: TimeOfDay, max_seats: i32) -> i32 {
    (end.minutes() - start.minutes()).div_euclid(max_seats.max(1))
}

/// "T-" followed by the token number padded to at least two digits.
pub fn token_id(token_number: i32) -> String {
    format!("T-{:02}", token_number)
}

/// Picks the token number for a seat just claimed on a slot.
///
/// `booked_seats` is the counter after the claim and `taken` the token numbers held by
/// live bookings. The counter value is used when free, otherwise the lowest number a
/// cancellation left open, so live tokens stay within `1..=booked_seats`.
pub fn next_token_number(booked_seats: i32, taken: &[i32]) -> i32 {
    if !taken.contains(&booked_seats) {
        return booked_seats;
    }

    (1..booked_seats)
        .find(|n| !taken.contains(n))
        .unwrap_or_else(|| taken.iter().copied().max().unwrap_or(0) + 1)
}

/// Derives token id and appointment window for a 1-based token number.
pub fn allocate(
    start: TimeOfDay,
    end: TimeOfDay,
    max_seats: i32,
    token_number: i32,
) -> TokenAllocation {
    let per_patient = minutes_per_patient(start, end, max_seats);
    let appointment_time = start.add_minutes((token_number - 1) * per_patient);

    TokenAllocation {
        token_number,
        token_id: token_id(token_number),
        appointment_time,
        appointment_end_time: appointment_time.add_minutes(per_patient),
    }
}
