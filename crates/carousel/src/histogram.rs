use std::fmt;

pub const BUCKETS: usize = 256;

/// Fixed-range frequency tally for debug logging. Values past the last
/// bucket all land in the last bucket.
#[derive(Debug, Clone)]
pub struct Histogram {
    name: String,
    buckets: Box<[u64; BUCKETS]>,
}

impl Histogram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buckets: Box::new([0; BUCKETS]),
        }
    }

    pub fn inc(&mut self, value: usize) {
        self.buckets[value.min(BUCKETS - 1)] += 1;
    }

    pub fn count(&self, value: usize) -> u64 {
        self.buckets.get(value).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    pub fn reset(&mut self) {
        self.buckets.fill(0);
    }
}

impl fmt::Display for Histogram {
    /// Compact single-line form, meant for log output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: total {}", self.name, self.total())?;
        for (value, count) in self.buckets.iter().enumerate().filter(|&(_, &c)| c != 0) {
            write!(f, " [{value}]={count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_totals() {
        let mut h = Histogram::new("activations");
        h.inc(0);
        h.inc(0);
        h.inc(3);
        assert_eq!(h.count(0), 2);
        assert_eq!(h.count(3), 1);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn overflow_lands_in_last_bucket() {
        let mut h = Histogram::new("overflow");
        h.inc(BUCKETS - 1);
        h.inc(BUCKETS);
        h.inc(BUCKETS * 4);
        assert_eq!(h.count(BUCKETS - 1), 3);
    }

    #[test]
    fn reset_clears_everything() {
        let mut h = Histogram::new("reset");
        h.inc(7);
        h.reset();
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn display_skips_empty_buckets() {
        let mut h = Histogram::new("disp");
        h.inc(1);
        h.inc(1);
        h.inc(4);
        assert_eq!(h.to_string(), "disp: total 3 [1]=2 [4]=1");
    }
}
