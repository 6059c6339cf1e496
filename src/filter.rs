//! Windowed averaging of orientation samples
//!
//! Samples (radians) are summed per axis. When the window fills, the sums are
//! averaged, converted to degrees and emitted, and the accumulator starts over.
//! Windows never overlap: each sample contributes to exactly one output.

use crate::dmp::{OrientationSample, RAD_TO_DEG};

/// Samples per averaged output unless configured otherwise
pub const DEFAULT_WINDOW: u16 = 10;

/// Per-axis running sum with a shared sample count
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothingFilter {
    window: u16,
    sums: OrientationSample,
    count: u16,
}

impl SmoothingFilter {
    /// Create a filter averaging over `window` samples
    ///
    /// Returns `None` for a zero window.
    pub const fn new(window: u16) -> Option<Self> {
        if window == 0 {
            return None;
        }
        Some(Self {
            window,
            sums: OrientationSample::new(0.0, 0.0, 0.0),
            count: 0,
        })
    }

    /// Configured window length
    pub const fn window(&self) -> u16 {
        self.window
    }

    /// Samples accumulated since the last output, always below the window length
    pub const fn count(&self) -> u16 {
        self.count
    }

    /// Current per-axis sums in radians
    pub const fn sums(&self) -> OrientationSample {
        self.sums
    }

    /// Add one sample (radians)
    ///
    /// The sums stay in radians; only the emitted average is converted. After an
    /// emission the sums and count restart from zero.
    ///
    /// # Arguments
    ///
    /// * `sample` - Yaw, pitch and roll of one decoded packet, in radians
    ///
    /// # Returns
    ///
    /// The window average in degrees when this sample completes a window,
    /// otherwise `None`.
    pub fn push(&mut self, sample: OrientationSample) -> Option<OrientationSample> {
        self.sums.yaw += sample.yaw;
        self.sums.pitch += sample.pitch;
        self.sums.roll += sample.roll;
        self.count += 1;

        if self.count < self.window {
            return None;
        }

        let scale = RAD_TO_DEG / f32::from(self.window);
        let average = OrientationSample::new(
            self.sums.yaw * scale,
            self.sums.pitch * scale,
            self.sums.roll * scale,
        );
        self.reset();

        Some(average)
    }

    /// Drop any partial window
    pub fn reset(&mut self) {
        self.sums = OrientationSample::default();
        self.count = 0;
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            sums: OrientationSample::default(),
            count: 0,
        }
    }
}
