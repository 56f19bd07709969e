//! Per-player totals of days spent on each team, from membership intervals
//! written in the Solar Hijri (Jalali) calendar.

pub mod calendar;
pub mod compute;
pub mod data;
pub mod logging;
pub mod read;
pub mod write;
