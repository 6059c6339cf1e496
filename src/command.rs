//! Deadband command encoding
//!
//! Each averaged angle (degrees) becomes one of three motor commands for its
//! axis. Values strictly beyond the threshold move the axis; values on or inside
//! it stop the axis.

pub use crate::dmp::Axis;
use crate::dmp::OrientationSample;

/// Deadband half-width used unless configured otherwise (degrees)
pub const DEFAULT_THRESHOLD_DEG: f32 = 10.0;

/// Command for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// Drive the axis forward
    Forward,
    /// Drive the axis in reverse
    Reverse,
    /// Hold the axis
    Stop,
}

/// Sign pairing between angle and motion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Positive angle → [`Motion::Forward`], negative → [`Motion::Reverse`]
    #[default]
    Normal,
    /// Negative angle → [`Motion::Forward`], positive → [`Motion::Reverse`]
    Inverted,
}

/// One symbolic command for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandEvent {
    /// Axis the command applies to
    pub axis: Axis,
    /// Requested motion
    pub motion: Motion,
}

impl CommandEvent {
    /// Create a new event
    pub const fn new(axis: Axis, motion: Motion) -> Self {
        Self { axis, motion }
    }

    /// Token for textual command channels, e.g. `StartX_Forward`
    pub const fn as_str(&self) -> &'static str {
        match (self.axis, self.motion) {
            (Axis::X, Motion::Forward) => "StartX_Forward",
            (Axis::X, Motion::Reverse) => "StartX_Reverse",
            (Axis::X, Motion::Stop) => "StartX_Stop",
            (Axis::Y, Motion::Forward) => "StartY_Forward",
            (Axis::Y, Motion::Reverse) => "StartY_Reverse",
            (Axis::Y, Motion::Stop) => "StartY_Stop",
            (Axis::Z, Motion::Forward) => "StartZ_Forward",
            (Axis::Z, Motion::Reverse) => "StartZ_Reverse",
            (Axis::Z, Motion::Stop) => "StartZ_Stop",
        }
    }
}

impl core::fmt::Display for CommandEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commands for all three axes from one averaging window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandSet {
    /// X axis (yaw)
    pub x: Motion,
    /// Y axis (pitch)
    pub y: Motion,
    /// Z axis (roll)
    pub z: Motion,
}

impl CommandSet {
    /// Motion for one axis
    pub const fn motion(&self, axis: Axis) -> Motion {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Events in reporting order: X, then Z, then Y
    pub const fn events(&self) -> [CommandEvent; 3] {
        [
            CommandEvent::new(Axis::X, self.x),
            CommandEvent::new(Axis::Z, self.z),
            CommandEvent::new(Axis::Y, self.y),
        ]
    }
}

/// Maps averaged angles to per-axis commands
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandEncoder {
    threshold: f32,
    polarity: Polarity,
}

impl CommandEncoder {
    /// Create an encoder
    ///
    /// Returns `None` unless `threshold` is finite and non-negative.
    pub fn new(threshold: f32, polarity: Polarity) -> Option<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return None;
        }
        Some(Self {
            threshold,
            polarity,
        })
    }

    /// Deadband half-width in degrees
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Sign pairing in use
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Command for a single angle (degrees)
    ///
    /// Angles inside the deadband, exactly on its edge, or NaN give
    /// [`Motion::Stop`]. Outside it the sign and [`Polarity`] pick the direction.
    ///
    /// # Arguments
    ///
    /// * `degrees` - Averaged angle for one axis
    pub fn motion(&self, degrees: f32) -> Motion {
        let (above, below) = match self.polarity {
            Polarity::Normal => (Motion::Forward, Motion::Reverse),
            Polarity::Inverted => (Motion::Reverse, Motion::Forward),
        };

        if degrees > self.threshold {
            above
        } else if degrees < -self.threshold {
            below
        } else {
            // Inside the deadband, on its edge, or NaN
            Motion::Stop
        }
    }

    /// Commands for an averaged sample (degrees)
    ///
    /// Yaw drives X, pitch drives Y and roll drives Z.
    ///
    /// # Returns
    ///
    /// One [`Motion`] per axis. Use [`CommandSet::events`] for the reporting order.
    pub fn encode(&self, average: &OrientationSample) -> CommandSet {
        CommandSet {
            x: self.motion(average.axis(Axis::X)),
            y: self.motion(average.axis(Axis::Y)),
            z: self.motion(average.axis(Axis::Z)),
        }
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_DEG,
            polarity: Polarity::Normal,
        }
    }
}
