// analysis/aggregation.rs

use std::collections::BTreeMap;

use crate::analysis::ber::BitCounts;

/// One plotted point: accumulated counters at `x` and the spread of the
/// per-run error rates that went into it.
#[derive(Debug, Clone, PartialEq)]
pub struct BerPoint {
    pub x: u32,
    pub counts: BitCounts,
    pub ber: f64,
    pub min_ber: f64,
    pub max_ber: f64,
    pub runs: usize,
}

#[derive(Debug, Clone, Default)]
struct Accumulator {
    counts: BitCounts,
    run_bers: Vec<f64>,
    runs: usize,
}

/// Bit counters keyed by series label, then by x value.
#[derive(Debug, Clone, Default)]
pub struct BerTable {
    series: BTreeMap<String, BTreeMap<u32, Accumulator>>,
}

impl BerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, series: &str, x: u32, counts: BitCounts) {
        let acc = self
            .series
            .entry(series.to_string())
            .or_default()
            .entry(x)
            .or_default();
        acc.counts += counts;
        acc.runs += 1;
        if let Some(ber) = counts.ber() {
            acc.run_bers.push(ber);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Whether any point received bits, and so has an error rate.
    pub fn has_received_bits(&self) -> bool {
        self.series
            .values()
            .flat_map(|by_x| by_x.values())
            .any(|acc| acc.counts.received > 0)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Points of a series in ascending x order. Points where nothing was
    /// received have no error rate and are left out.
    pub fn points(&self, series: &str) -> Vec<BerPoint> {
        let Some(by_x) = self.series.get(series) else {
            return Vec::new();
        };
        by_x.iter()
            .filter_map(|(&x, acc)| {
                let Some(ber) = acc.counts.ber() else {
                    log::warn!("Series {} at x={}: no bits received, point skipped", series, x);
                    return None;
                };
                let min_ber = acc.run_bers.iter().copied().fold(f64::INFINITY, f64::min);
                let max_ber = acc.run_bers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                Some(BerPoint {
                    x,
                    counts: acc.counts,
                    ber,
                    min_ber,
                    max_ber,
                    runs: acc.runs,
                })
            })
            .collect()
    }

    /// Largest x at which the series still received bits.
    pub fn max_reach(&self, series: &str) -> Option<u32> {
        self.series
            .get(series)?
            .iter()
            .filter(|(_, acc)| acc.counts.received > 0)
            .map(|(&x, _)| x)
            .max()
    }

    /// Every x value present in any series, ascending.
    pub fn x_values(&self) -> Vec<u32> {
        let mut xs: Vec<u32> = self
            .series
            .values()
            .flat_map(|by_x| by_x.keys().copied())
            .collect();
        xs.sort_unstable();
        xs.dedup();
        xs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repetitions_are_summed_per_point() {
        let mut table = BerTable::new();
        table.add("3dB CM1", 50, BitCounts::new(10, 1000));
        table.add("3dB CM1", 50, BitCounts::new(30, 1000));
        table.add("3dB CM1", 7, BitCounts::new(0, 1000));

        let points = table.points("3dB CM1");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].x, 7);
        assert_eq!(points[1].counts, BitCounts::new(40, 2000));
        assert_eq!(points[1].ber, 0.02);
        assert_eq!(points[1].min_ber, 0.01);
        assert_eq!(points[1].max_ber, 0.03);
        assert_eq!(points[1].runs, 2);
    }

    #[test]
    fn points_without_received_bits_are_skipped() {
        let mut table = BerTable::new();
        table.add("1dB", 100, BitCounts::new(0, 0));
        table.add("1dB", 50, BitCounts::new(5, 500));
        let points = table.points("1dB");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 50);
    }

    #[test]
    fn x_values_are_merged_across_series() {
        let mut table = BerTable::new();
        table.add("a", 100, BitCounts::new(1, 10));
        table.add("b", 7, BitCounts::new(1, 10));
        table.add("b", 100, BitCounts::new(1, 10));
        assert_eq!(table.x_values(), vec![7, 100]);
        assert_eq!(table.labels(), vec!["a", "b"]);
    }

    #[test]
    fn reach_ends_at_last_received_bit() {
        let mut table = BerTable::new();
        table.add("10dB", 7, BitCounts::new(0, 100));
        table.add("10dB", 50, BitCounts::new(3, 100));
        table.add("10dB", 100, BitCounts::new(0, 0));
        assert_eq!(table.max_reach("10dB"), Some(50));
        assert_eq!(table.max_reach("1dB"), None);
    }

    #[test]
    fn unknown_series_has_no_points() {
        assert!(BerTable::new().points("missing").is_empty());
    }
}
