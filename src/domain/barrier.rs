//! Profit-take / stop-loss barriers and first-trigger detection.

use std::fmt;
use std::str::FromStr;

/// Thresholds on combined position PnL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    take: Option<f64>,
    stop: Option<f64>,
}

impl Barrier {
    pub fn new(take: Option<f64>, stop: Option<f64>) -> Self {
        Barrier { take, stop }
    }

    /// True when at least one threshold is set.
    pub fn is_active(&self) -> bool {
        self.take.is_some() || self.stop.is_some()
    }

    /// `pnl >= take` or `pnl <= stop`; an unset side never fires.
    pub fn is_triggered(&self, pnl: f64) -> bool {
        let take = self.take.unwrap_or(f64::INFINITY);
        let stop = self.stop.unwrap_or(f64::NEG_INFINITY);
        pnl >= take || pnl <= stop
    }

    /// Per-bar signal. Rows before `entry_row` never fire.
    pub fn signal(&self, pnl: &[f64], entry_row: usize) -> Vec<bool> {
        pnl.iter()
            .enumerate()
            .map(|(row, &value)| row >= entry_row && self.is_triggered(value))
            .collect()
    }
}

/// How the first fired bar is located in a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierSearch {
    /// Scan rows in order and stop at the first fired bar.
    #[default]
    Linear,
    /// Binary search for the false → true boundary.
    ///
    /// Only correct when the signal never reverts from true to false; a PnL
    /// path that crosses a threshold and comes back can report a later bar
    /// or none at all.
    Sorted,
}

impl BarrierSearch {
    pub fn first_trigger(&self, signal: &[bool]) -> Option<usize> {
        let row = match self {
            BarrierSearch::Linear => signal.iter().position(|&fired| fired)?,
            BarrierSearch::Sorted => signal.partition_point(|&fired| !fired),
        };
        (row < signal.len()).then_some(row)
    }
}

impl fmt::Display for BarrierSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierSearch::Linear => write!(f, "linear"),
            BarrierSearch::Sorted => write!(f, "sorted"),
        }
    }
}

impl FromStr for BarrierSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(BarrierSearch::Linear),
            "sorted" => Ok(BarrierSearch::Sorted),
            other => Err(format!(
                "unknown barrier search '{}', expected linear or sorted",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_without_thresholds() {
        let barrier = Barrier::new(None, None);
        assert!(!barrier.is_active());
        assert!(!barrier.is_triggered(1e12));
        assert!(!barrier.is_triggered(-1e12));
    }

    #[test]
    fn take_fires_at_threshold() {
        let barrier = Barrier::new(Some(2.0), None);
        assert!(barrier.is_active());
        assert!(!barrier.is_triggered(1.9));
        assert!(barrier.is_triggered(2.0));
        assert!(barrier.is_triggered(2.1));
    }

    #[test]
    fn stop_fires_at_threshold() {
        let barrier = Barrier::new(None, Some(-2.0));
        assert!(!barrier.is_triggered(-1.9));
        assert!(barrier.is_triggered(-2.0));
        assert!(barrier.is_triggered(-5.0));
    }

    #[test]
    fn signal_masks_pre_entry_rows() {
        let barrier = Barrier::new(Some(0.0), None);
        let signal = barrier.signal(&[0.0, 0.0, 1.0], 1);
        assert_eq!(signal, vec![false, true, true]);
    }

    #[test]
    fn linear_finds_first_crossing_in_non_monotonic_signal() {
        let signal = [false, true, false, false, true];
        assert_eq!(BarrierSearch::Linear.first_trigger(&signal), Some(1));
    }

    #[test]
    fn sorted_agrees_on_monotonic_signal() {
        let signal = [false, false, true, true];
        assert_eq!(BarrierSearch::Linear.first_trigger(&signal), Some(2));
        assert_eq!(BarrierSearch::Sorted.first_trigger(&signal), Some(2));
    }

    #[test]
    fn sorted_can_miss_a_reverting_crossing() {
        let mut signal = [false; 8];
        signal[0] = true;
        assert_eq!(BarrierSearch::Linear.first_trigger(&signal), Some(0));
        assert_ne!(BarrierSearch::Sorted.first_trigger(&signal), Some(0));
    }

    #[test]
    fn no_trigger_is_none() {
        let signal = [false; 4];
        assert_eq!(BarrierSearch::Linear.first_trigger(&signal), None);
        assert_eq!(BarrierSearch::Sorted.first_trigger(&signal), None);
        assert_eq!(BarrierSearch::Linear.first_trigger(&[]), None);
    }

    #[test]
    fn parse_search_mode() {
        assert_eq!("linear".parse(), Ok(BarrierSearch::Linear));
        assert_eq!(" Sorted ".parse(), Ok(BarrierSearch::Sorted));
        assert!("binary".parse::<BarrierSearch>().is_err());
        assert_eq!(BarrierSearch::Sorted.to_string(), "sorted");
    }
}
