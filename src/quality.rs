//! Resolution tiers for accepting or rejecting a decoded image.
//!
//! Thresholds are on total pixel count, not on either edge: a 800×600 image
//! and a 600×800 image are the same tier.

/// Minimum acceptable resolution, classified by total pixel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QualityTier {
    /// No resolution requirement.
    Any,
    /// At least 480,000 pixels (800×600).
    Medium,
    /// At least 2,073,600 pixels (1920×1080).
    High,
}

impl QualityTier {
    /// Whether an image of the given dimensions meets this tier.
    pub fn accepts(self, width: u32, height: u32) -> bool {
        let total = u64::from(width) * u64::from(height);
        match self {
            QualityTier::Any => true,
            QualityTier::Medium => total >= 480_000,
            QualityTier::High => total >= 2_073_600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_accepts_a_single_pixel() {
        assert!(QualityTier::Any.accepts(1, 1));
    }

    #[test]
    fn medium_rejects_below_threshold() {
        assert!(!QualityTier::Medium.accepts(799, 600));
    }

    #[test]
    fn medium_accepts_exact_threshold() {
        assert!(QualityTier::Medium.accepts(800, 600));
    }

    #[test]
    fn medium_accepts_rotated_dimensions() {
        assert!(QualityTier::Medium.accepts(600, 800));
    }

    #[test]
    fn high_rejects_hd_ready() {
        assert!(!QualityTier::High.accepts(1280, 720));
    }

    #[test]
    fn high_accepts_full_hd_and_above() {
        assert!(QualityTier::High.accepts(1920, 1080));
        assert!(QualityTier::High.accepts(4000, 3000));
    }

    #[test]
    fn huge_dimensions_do_not_overflow() {
        assert!(QualityTier::High.accepts(u32::MAX, u32::MAX));
    }
}
