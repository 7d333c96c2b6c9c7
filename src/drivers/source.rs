use std::io::{self, BufRead, BufReader, Read};
use std::thread;
use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use crate::drivers::VizError;
/// Something that yields one text record at a time.
///
/// `Ok(None)` means nothing arrived (a read timeout or a blank line); the caller
/// is expected to simply ask again.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>, VizError>;
    fn describe(&self) -> String;
}
impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn next_line(&mut self) -> Result<Option<String>, VizError> {
        (**self).next_line()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}
/// Newline-delimited reader over any byte stream (a serial port in production,
/// a cursor in tests).
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    label: String,
}
impl<R: Read> LineReader<R> {
    pub fn new(inner: R, label: impl Into<String>) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::with_capacity(256),
            label: label.into(),
        }
    }
    fn take_line(&mut self) -> Result<Option<String>, VizError> {
        let bytes = std::mem::take(&mut self.pending);
        let text = String::from_utf8(bytes)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(trimmed.to_owned()))
    }
}
impl<R: Read> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>, VizError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            // a full line, or the tail of a stream that ended mid-line
            Ok(_) => self.take_line(),
            // bytes read before the timeout stay in `pending` for the next call
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(VizError::Device(e)),
        }
    }
    fn describe(&self) -> String {
        self.label.clone()
    }
}
/// Open the serial device as 8N1 without flow control.
pub fn open_serial(
    port_name: &str,
    baud_rate: u32,
    timeout: Duration,
) -> Result<LineReader<Box<dyn SerialPort>>, VizError> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(timeout)
        .open()
        .map_err(|source| VizError::Serial {
            port: port_name.to_string(),
            source,
        })?;
    log::info!("Opened {port_name} at {baud_rate} baud");
    Ok(LineReader::new(port, format!("{port_name}@{baud_rate}")))
}
/// Synthetic firmware output for running without hardware.
pub struct SimulatedSource {
    rng: StdRng,
    phase: f64,
    interval: Duration,
}
impl SimulatedSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            phase: 0.0,
            interval,
        }
    }
    pub fn with_seed(seed: u64, interval: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            phase: 0.0,
            interval,
        }
    }
    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.gen_range(-amplitude..=amplitude)
    }
    fn render_line(&mut self) -> String {
        self.phase += 0.02;
        let p = self.phase;
        // gravity swinging around the board, in mg
        let acc = [
            1000.0 * (p * 0.7).sin() * 0.3 + self.noise(8.0),
            1000.0 * (p * 0.5).cos() * 0.3 + self.noise(8.0),
            1000.0 * (1.0 - 0.09 * (p * 0.6).sin().powi(2)).sqrt() + self.noise(8.0),
        ];
        // the derivative of the above, roughly, in dps
        let gyr = [
            4.0 * (p * 0.7).cos() + self.noise(0.3),
            -3.0 * (p * 0.5).sin() + self.noise(0.3),
            1.5 * (p * 0.3).sin() + self.noise(0.3),
        ];
        // a ~50 uT field slowly turning in the horizontal plane
        let mag = [
            45.0 * (p * 0.2).cos() + self.noise(1.5),
            45.0 * (p * 0.2).sin() + self.noise(1.5),
            -20.0 + self.noise(1.5),
        ];
        let temp = 26.0 + 0.5 * (p * 0.01).sin();
        serde_json::json!({
            "accX": acc[0], "accY": acc[1], "accZ": acc[2],
            "gyrX": gyr[0], "gyrY": gyr[1], "gyrZ": gyr[2],
            "magX": mag[0], "magY": mag[1], "magZ": mag[2],
            "temp": temp,
        })
        .to_string()
    }
}
impl LineSource for SimulatedSource {
    fn next_line(&mut self) -> Result<Option<String>, VizError> {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        Ok(Some(self.render_line()))
    }
    fn describe(&self) -> String {
        "simulated".to_owned()
    }
}
/// In-memory source for driving the loop from a fixed list of lines.
#[cfg(test)]
pub struct ManualSource {
    queue: std::collections::VecDeque<String>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            queue: lines.into_iter().map(Into::into).collect(),
        }
    }
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}
#[cfg(test)]
impl LineSource for ManualSource {
    fn next_line(&mut self) -> Result<Option<String>, VizError> {
        Ok(self
            .queue
            .pop_front()
            .map(|l| l.trim().to_owned())
            .filter(|l| !l.is_empty()))
    }
    fn describe(&self) -> String {
        "manual".to_owned()
    }
}
