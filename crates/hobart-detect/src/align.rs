//! Series alignment.
//!
//! Merges a security's daily bars with a benchmark's daily bars by calendar
//! date into one ordered sequence of paired percent returns. Only dates
//! present in both series survive (inner join); gaps are simply absent, no
//! interpolation. Dates are compared by calendar date only.

use crate::model::DailyBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A calendar date for which both the security and the benchmark have a
/// valid return, with the security's same-day volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Security return, in percent.
    pub stock_return: f64,
    /// Benchmark return, in percent.
    pub market_return: f64,
    /// Security share volume that day.
    pub volume: u64,
}

/// A dated percent return derived from two consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReturnPoint {
    date: NaiveDate,
    value: f64,
    volume: u64,
}

/// Align two unordered bar sets into an ascending sequence of paired
/// returns.
///
/// Bars with a non-positive or non-finite close are dropped before any
/// return is computed, so a previous close is always strictly positive by
/// the time it is used as a denominator. The first surviving bar of each
/// series contributes no return. Input dates are expected to be unique per
/// instrument; the alignment itself never introduces duplicates.
///
/// Returns an empty sequence when either input has fewer than two usable
/// bars.
pub fn align(stock: &[DailyBar], market: &[DailyBar]) -> Vec<AlignedDay> {
    let stock_returns = percent_returns(stock);
    let market_returns = percent_returns(market);

    if stock_returns.is_empty() || market_returns.is_empty() {
        return Vec::new();
    }

    let market_by_date: HashMap<NaiveDate, f64> = market_returns
        .iter()
        .map(|point| (point.date, point.value))
        .collect();

    stock_returns
        .iter()
        .filter_map(|point| {
            market_by_date.get(&point.date).map(|&market_return| AlignedDay {
                date: point.date,
                stock_return: point.value,
                market_return,
                volume: point.volume,
            })
        })
        .collect()
}

/// Sort, validate, and difference a bar set into dated percent returns.
fn percent_returns(bars: &[DailyBar]) -> Vec<ReturnPoint> {
    let mut valid: Vec<&DailyBar> = bars.iter().filter(|bar| bar.is_valid()).collect();
    if valid.len() < 2 {
        return Vec::new();
    }
    valid.sort_by_key(|bar| bar.date);

    valid
        .windows(2)
        .map(|pair| ReturnPoint {
            date: pair[1].date,
            value: (pair[1].close - pair[0].close) / pair[0].close * 100.0,
            volume: pair[1].volume,
        })
        .collect()
}
