use crate::types::Axes;

/// Steps per unit for one axis.
///
/// Both factors are integers so that field values can be converted to steps without floating
/// point arithmetic.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Calibration {
    pub steps_per_m: u32,
    pub steps_per_inch: u32,
}

impl Calibration {
    /// Builds a calibration from a steps per metre figure, deriving the steps per inch with
    /// round-half-up.
    pub const fn from_steps_per_m(steps_per_m: u32) -> Self {
        // 1 inch is 0.0254m
        let steps_per_inch = (steps_per_m as u64 * 254 + 5_000) / 10_000;
        Self {
            steps_per_m,
            steps_per_inch: steps_per_inch as u32,
        }
    }

    /// Same as [`Calibration::from_steps_per_m`] for machines described in whole steps per
    /// millimetre. Saturates at `u32::MAX` steps per metre.
    pub const fn from_steps_per_mm(steps_per_mm: u32) -> Self {
        Self::from_steps_per_m(steps_per_mm.saturating_mul(1000))
    }
}

/// Where the checksum window closes relative to the `*` marker.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChecksumPolicy {
    /// The `*` byte is not part of the checksum.
    ExcludeMarker,
    /// The `*` byte is folded into the checksum before the window closes.
    IncludeMarker,
}

impl Default for ChecksumPolicy {
    fn default() -> Self {
        if cfg!(feature = "checksum-includes-marker") {
            Self::IncludeMarker
        } else {
            Self::ExcludeMarker
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    pub calibration: Axes<Calibration>,
    /// Factor applied to `S` on heater PID commands (M130 to M132).
    pub pid_scale: u32,
    pub require_line_number: bool,
    pub require_checksum: bool,
    pub checksum_policy: ChecksumPolicy,
    /// Echo every decoded field back on the reply channel.
    pub echo: bool,
}

impl Config {
    pub const DEFAULT_PID_SCALE: u32 = 1024;

    pub fn with_calibration(mut self, calibration: Axes<Calibration>) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_pid_scale(mut self, pid_scale: u32) -> Self {
        self.pid_scale = pid_scale;
        self
    }

    pub fn require_line_number(mut self, required: bool) -> Self {
        self.require_line_number = required;
        self
    }

    pub fn require_checksum(mut self, required: bool) -> Self {
        self.require_checksum = required;
        self
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calibration: Axes {
                x: Calibration::from_steps_per_mm(80),
                y: Calibration::from_steps_per_mm(80),
                z: Calibration::from_steps_per_mm(400),
                e: Calibration::from_steps_per_m(96_275),
            },
            pid_scale: Self::DEFAULT_PID_SCALE,
            require_line_number: cfg!(feature = "require-line-number"),
            require_checksum: cfg!(feature = "require-checksum"),
            checksum_policy: ChecksumPolicy::default(),
            echo: false,
        }
    }
}
