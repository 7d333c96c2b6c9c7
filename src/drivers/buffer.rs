use std::collections::VecDeque;
use crate::types::{SensorRecord, Sample, Signal};
/// Fixed-capacity history of recent samples for one signal; the oldest entry is
/// evicted once capacity is exceeded.
#[derive(Clone, Debug)]
pub struct SignalHistory {
    samples: VecDeque<Sample>,
    capacity: usize,
}
impl SignalHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }
    pub fn append(&mut self, sample: Sample) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }
    /// Samples in insertion order. The iterator is `Clone`, so a caller can walk
    /// the trail more than once.
    pub fn all(&self) -> impl Iterator<Item = Sample> + Clone + '_ {
        self.samples.iter().copied()
    }
    /// The newest `n` samples (fewer if not that many exist), oldest first,
    /// paired with their index in the whole history.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = (usize, Sample)> + '_ {
        let start = self.samples.len().saturating_sub(n);
        self.samples
            .iter()
            .copied()
            .enumerate()
            .skip(start)
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
/// The three histories, advanced in lock-step: one decoded record appends
/// exactly one sample to each.
#[derive(Clone, Debug)]
pub struct SensorHistories {
    acc: SignalHistory,
    gyr: SignalHistory,
    mag: SignalHistory,
    latest_temperature: Option<f64>,
}
impl SensorHistories {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            acc: SignalHistory::with_capacity(capacity),
            gyr: SignalHistory::with_capacity(capacity),
            mag: SignalHistory::with_capacity(capacity),
            latest_temperature: None,
        }
    }
    pub fn push(&mut self, record: &SensorRecord) {
        for signal in Signal::ALL {
            self.get_mut(signal).append(record.sample(signal));
        }
        if record.temperature.is_some() {
            self.latest_temperature = record.temperature;
        }
    }
    pub fn get(&self, signal: Signal) -> &SignalHistory {
        match signal {
            Signal::Accelerometer => &self.acc,
            Signal::Gyroscope => &self.gyr,
            Signal::Magnetometer => &self.mag,
        }
    }
    fn get_mut(&mut self, signal: Signal) -> &mut SignalHistory {
        match signal {
            Signal::Accelerometer => &mut self.acc,
            Signal::Gyroscope => &mut self.gyr,
            Signal::Magnetometer => &mut self.mag,
        }
    }
    pub fn latest_temperature(&self) -> Option<f64> {
        self.latest_temperature
    }
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.acc.len()
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.acc.is_empty()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn s(v: f64) -> Sample {
        Sample::new(v, v * 2.0, v * 3.0)
    }
    #[test]
    fn never_exceeds_capacity_and_keeps_suffix() {
        for cap in [1usize, 3, 10] {
            let mut history = SignalHistory::with_capacity(cap);
            let mut appended = Vec::new();
            for i in 0..(cap * 3 + 1) {
                history.append(s(i as f64));
                appended.push(s(i as f64));
                assert!(history.len() <= cap);
                let start = appended.len().saturating_sub(cap);
                let expected: Vec<Sample> = appended[start..].to_vec();
                assert_eq!(history.all().collect::<Vec<_>>(), expected);
            }
        }
    }
    #[test]
    fn short_history_is_not_padded() {
        let mut history = SignalHistory::with_capacity(100);
        for i in 0..7 {
            history.append(s(i as f64));
        }
        assert_eq!(history.len(), 7);
        assert_eq!(history.all().count(), 7);
    }
    #[test]
    fn overflow_by_five_yields_last_n_in_order() {
        let n = 100;
        let mut history = SignalHistory::with_capacity(n);
        for i in 0..(n + 5) {
            history.append(s(i as f64));
        }
        let all: Vec<Sample> = history.all().collect();
        assert_eq!(all.len(), n);
        assert_eq!(all[0], s(5.0));
        assert_eq!(all[n - 1], s((n + 4) as f64));
        assert!(all.windows(2).all(|w| w[0].x < w[1].x));
    }
    #[test]
    fn latest_and_empty() {
        let mut history = SignalHistory::with_capacity(4);
        assert_eq!(history.latest(), None);
        assert!(history.is_empty());
        history.append(s(1.0));
        history.append(s(2.0));
        assert_eq!(history.latest(), Some(s(2.0)));
    }
    #[test]
    fn all_is_restartable() {
        let mut history = SignalHistory::with_capacity(4);
        history.append(s(1.0));
        history.append(s(2.0));
        let iter = history.all();
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(history.all().count(), 2);
    }
    #[test]
    fn recent_returns_tail_with_indices() {
        let mut history = SignalHistory::with_capacity(20);
        for i in 0..15 {
            history.append(s(i as f64));
        }
        let recent: Vec<(usize, Sample)> = history.recent(10).collect();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], (5, s(5.0)));
        assert_eq!(recent[9], (14, s(14.0)));
        assert_eq!(history.recent(50).count(), 15);
    }
    #[test]
    fn histories_advance_in_lock_step() {
        let mut histories = SensorHistories::with_capacity(3);
        for i in 0..5 {
            let record = SensorRecord {
                acc: s(i as f64),
                gyr: s(i as f64 + 0.5),
                mag: s(i as f64 + 0.25),
                temperature: if i == 1 { Some(24.5) } else { None },
            };
            histories.push(&record);
            for signal in Signal::ALL {
                assert_eq!(histories.get(signal).len(), histories.len());
            }
        }
        assert_eq!(histories.len(), 3);
        assert_eq!(histories.get(Signal::Gyroscope).latest(), Some(s(4.5)));
        assert_eq!(histories.latest_temperature(), Some(24.5));
    }
}
