use std::collections::VecDeque;

/// Bounded scrolling window of accepted samples, ready for plotting.
///
/// Indices are assigned monotonically for the lifetime of the process and
/// are never reset; the Y bounds only ever widen.
pub struct ChartWindow {
    points: VecDeque<[f64; 2]>,
    next_index: u64,
    max_points: usize,
    y_min: f64,
    y_max: f64,
}

impl ChartWindow {
    pub const DEFAULT_MAX_POINTS: usize = 600;

    pub fn new(max_points: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_points.min(4096)),
            next_index: 0,
            max_points: max_points.max(1),
            // Initial view matches the generator defaults comfortably.
            y_min: -10.0,
            y_max: 10.0,
        }
    }

    pub fn push_sample(&mut self, value: f64) {
        if value < self.y_min {
            self.y_min = value - 1.0;
        }
        if value > self.y_max {
            self.y_max = value + 1.0;
        }

        self.points.push_back([self.next_index as f64, value]);
        self.next_index += 1;

        while self.points.len() > self.max_points {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Visible X span: the last `max_points` indices, clamped at 0.
    pub fn x_range(&self) -> (f64, f64) {
        let end = self.next_index;
        let start = end.saturating_sub(self.max_points as u64);
        (start as f64, end as f64)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }
}

impl Default for ChartWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_a_contiguous_suffix() {
        let mut chart = ChartWindow::new(5);
        for i in 0..12 {
            chart.push_sample(i as f64);
        }
        let xs: Vec<f64> = chart.points().map(|p| p[0]).collect();
        assert_eq!(xs, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
        assert_eq!(chart.x_range(), (7.0, 12.0));
    }

    #[test]
    fn window_shorter_than_capacity_keeps_everything() {
        let mut chart = ChartWindow::new(600);
        for i in 0..3 {
            chart.push_sample(i as f64);
        }
        assert_eq!(chart.len(), 3);
        assert_eq!(chart.x_range(), (0.0, 3.0));
    }

    #[test]
    fn y_bounds_widen_and_never_shrink() {
        let mut chart = ChartWindow::default();
        assert_eq!(chart.y_range(), (-10.0, 10.0));
        chart.push_sample(25.0);
        assert_eq!(chart.y_range(), (-10.0, 26.0));
        chart.push_sample(-40.0);
        assert_eq!(chart.y_range(), (-41.0, 26.0));
        chart.push_sample(0.0);
        assert_eq!(chart.y_range(), (-41.0, 26.0));
    }
}
