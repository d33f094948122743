use std::sync::Arc;

/// Number of taps in the compiled-in coefficient table
pub const TABLE_LEN: usize = 51;

/// Compiled-in filter taps.
///
/// 51-tap Hamming-windowed sinc lowpass, cutoff 0.1 x sample rate
/// (4.8 kHz at 48 kHz), unity DC gain. Linear phase: the table is mirror
/// symmetric about tap 25.
#[rustfmt::skip]
static TABLE: [f32; TABLE_LEN] = [
    0.0, 6.503955367e-04, 1.240254576e-03, 1.541688566e-03,
    1.216807264e-03, 0.0, -2.010717396e-03, -4.140710578e-03,
    -5.214551722e-03, -4.014746619e-03, 0.0, 6.050369490e-03,
    1.187422065e-02, 1.431762165e-02, 1.062571675e-02, 0.0,
    -1.526134569e-02, -2.969111861e-02, -3.594907682e-02, -2.723073777e-02,
    0.0, 4.400877615e-02, 9.741972658e-02, 1.488252365e-01,
    1.859785643e-01, 1.995272546e-01, 1.859785643e-01, 1.488252365e-01,
    9.741972658e-02, 4.400877615e-02, 0.0, -2.723073777e-02,
    -3.594907682e-02, -2.969111861e-02, -1.526134569e-02, 0.0,
    1.062571675e-02, 1.431762165e-02, 1.187422065e-02, 6.050369490e-03,
    0.0, -4.014746619e-03, -5.214551722e-03, -4.140710578e-03,
    -2.010717396e-03, 0.0, 1.216807264e-03, 1.541688566e-03,
    1.240254576e-03, 6.503955367e-04, 0.0,
];

/// Immutable ordered list of FIR taps
///
/// Cloning shares the underlying storage, so every engine built from one
/// set reads the same taps without copying them.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    taps: Arc<[f32]>,
}

impl CoefficientSet {
    /// Load the compiled-in coefficient table
    pub fn load() -> Self {
        Self::from_taps(TABLE.to_vec())
    }

    /// Build a set from arbitrary taps, in tap index order
    pub fn from_taps(taps: Vec<f32>) -> Self {
        Self { taps: taps.into() }
    }

    /// Number of taps (N)
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// True when `taps[k] == taps[N-1-k]` for every k
    ///
    /// Informational only; no engine checks this before running.
    pub fn is_symmetric(&self) -> bool {
        self.taps
            .iter()
            .zip(self.taps.iter().rev())
            .take(self.taps.len() / 2)
            .all(|(a, b)| a == b)
    }

    /// Group delay in samples for a linear-phase set
    pub fn group_delay_samples(&self) -> usize {
        self.taps.len().saturating_sub(1) / 2
    }
}

impl Default for CoefficientSet {
    fn default() -> Self {
        Self::load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_linear_phase() {
        let coeffs = CoefficientSet::load();
        assert_eq!(coeffs.len(), TABLE_LEN);
        assert!(coeffs.is_symmetric());
        assert_eq!(coeffs.group_delay_samples(), 25);
    }

    #[test]
    fn test_table_unity_dc_gain() {
        let gain: f32 = CoefficientSet::load().taps().iter().sum();
        assert!((gain - 1.0).abs() < 1e-5, "DC gain {}", gain);
    }

    #[test]
    fn test_asymmetric_detected() {
        assert!(!CoefficientSet::from_taps(vec![1.0, 2.0, 3.0]).is_symmetric());
        assert!(CoefficientSet::from_taps(vec![1.0, 2.0, 1.0]).is_symmetric());
        assert!(CoefficientSet::from_taps(vec![0.5, 0.5]).is_symmetric());
    }

    #[test]
    fn test_degenerate_sets() {
        let empty = CoefficientSet::from_taps(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.is_symmetric());
        assert_eq!(empty.group_delay_samples(), 0);

        let single = CoefficientSet::from_taps(vec![2.0]);
        assert_eq!(single.len(), 1);
        assert_eq!(single.group_delay_samples(), 0);
    }

    #[test]
    fn test_clone_shares_taps() {
        let a = CoefficientSet::load();
        let b = a.clone();
        assert!(std::ptr::eq(a.taps().as_ptr(), b.taps().as_ptr()));
    }
}
