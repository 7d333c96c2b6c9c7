// src/types.rs

/// One instantaneous (x, y, z) reading of a single signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

// 三路传感器信号
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    Accelerometer,
    Gyroscope,
    Magnetometer,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Accelerometer, Signal::Gyroscope, Signal::Magnetometer];

    pub fn title(&self) -> &'static str {
        match self {
            Signal::Accelerometer => "Accelerometer",
            Signal::Gyroscope => "Gyroscope",
            Signal::Magnetometer => "Magnetometer",
        }
    }

    /// Short tag used in text overlays.
    pub fn tag(&self) -> &'static str {
        match self {
            Signal::Accelerometer => "ACC",
            Signal::Gyroscope => "GYR",
            Signal::Magnetometer => "MAG",
        }
    }

    /// Display color as RGB.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Signal::Accelerometer => (220, 30, 30),
            Signal::Gyroscope => (30, 60, 220),
            Signal::Magnetometer => (20, 160, 40),
        }
    }
}

/// One decoded line: a sample for every signal plus the optional die temperature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorRecord {
    pub acc: Sample,
    pub gyr: Sample,
    pub mag: Sample,
    pub temperature: Option<f64>,
}

impl SensorRecord {
    pub fn sample(&self, signal: Signal) -> Sample {
        match signal {
            Signal::Accelerometer => self.acc,
            Signal::Gyroscope => self.gyr,
            Signal::Magnetometer => self.mag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_and_scaling() {
        let s = Sample::new(3.0, 4.0, 12.0);
        assert!((s.magnitude() - 13.0).abs() < 1e-12);
        assert_eq!(s.scaled(0.1).as_tuple(), (3.0 * 0.1, 4.0 * 0.1, 12.0 * 0.1));
        assert_eq!(Sample::default().magnitude(), 0.0);
    }

    #[test]
    fn record_selects_signal() {
        let rec = SensorRecord {
            acc: Sample::new(1.0, 0.0, 0.0),
            gyr: Sample::new(0.0, 1.0, 0.0),
            mag: Sample::new(0.0, 0.0, 1.0),
            temperature: None,
        };
        assert_eq!(rec.sample(Signal::Gyroscope), Sample::new(0.0, 1.0, 0.0));
        assert_eq!(rec.sample(Signal::Magnetometer).z, 1.0);
    }
}
