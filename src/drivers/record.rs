use serde::Deserialize;
use crate::drivers::VizError;
use crate::types::{SensorRecord, Sample};
/// Wire shape of one line, as printed by the sensor firmware.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    acc_x: f64,
    acc_y: f64,
    acc_z: f64,
    gyr_x: f64,
    gyr_y: f64,
    gyr_z: f64,
    mag_x: f64,
    mag_y: f64,
    mag_z: f64,
    temp: Option<f64>,
}
impl From<WireRecord> for SensorRecord {
    fn from(w: WireRecord) -> Self {
        SensorRecord {
            acc: Sample::new(w.acc_x, w.acc_y, w.acc_z),
            gyr: Sample::new(w.gyr_x, w.gyr_y, w.gyr_z),
            mag: Sample::new(w.mag_x, w.mag_y, w.mag_z),
            temperature: w.temp,
        }
    }
}
/// Decode one trimmed text line into a record.
///
/// Malformed JSON fails with [`VizError::Decode`]; well-formed JSON that lacks one
/// of the nine numeric fields (or carries a non-numeric value) fails with
/// [`VizError::Field`]. Nothing is returned on failure.
pub fn decode_record(line: &str) -> Result<SensorRecord, VizError> {
    let wire: WireRecord = serde_json::from_str(line)?;
    Ok(wire.into())
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::error::ErrorKind;
    #[test]
    fn decodes_nine_fields() {
        let line = r#"{"accX":1,"accY":2,"accZ":3,"gyrX":0.1,"gyrY":0.2,"gyrZ":0.3,"magX":10,"magY":20,"magZ":30}"#;
        let rec = decode_record(line).unwrap();
        assert_eq!(rec.acc, Sample::new(1.0, 2.0, 3.0));
        assert_eq!(rec.gyr, Sample::new(0.1, 0.2, 0.3));
        assert_eq!(rec.mag, Sample::new(10.0, 20.0, 30.0));
        assert_eq!(rec.temperature, None);
    }
    #[test]
    fn accepts_firmware_temperature() {
        let line = r#"{"accX":-12.5000,"accY":3.0000,"accZ":1002.1000,"gyrX":0.1000,"gyrY":-0.2000,"gyrZ":0.0000,"magX":12.0000,"magY":-4.5000,"magZ":40.0000,"temp":27.3000}"#;
        let rec = decode_record(line).unwrap();
        assert_eq!(rec.temperature, Some(27.3));
        assert_eq!(rec.acc.z, 1002.1);
    }
    #[test]
    fn missing_field_is_field_error() {
        let line = r#"{"accX":1,"accY":2,"accZ":3,"gyrX":0.1,"gyrY":0.2,"gyrZ":0.3,"magX":10,"magY":20}"#;
        let err = decode_record(line).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
        assert!(err.to_string().contains("magZ"));
    }
    #[test]
    fn non_numeric_field_is_field_error() {
        let line = r#"{"accX":"one","accY":2,"accZ":3,"gyrX":0.1,"gyrY":0.2,"gyrZ":0.3,"magX":10,"magY":20,"magZ":30}"#;
        let err = decode_record(line).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Field);
    }
    #[test]
    fn not_json_is_decode_error() {
        let err = decode_record("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        let err = decode_record(r#"{"accX":1,"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
    #[test]
    fn well_formed_non_object_is_field_error() {
        assert_eq!(decode_record("42").unwrap_err().kind(), ErrorKind::Field);
    }
}
