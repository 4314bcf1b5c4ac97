use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Calibration fit types of the Satlantic instrument file format.
///
/// Parsing is case-insensitive and never fails: a name outside the known
/// set becomes [`FitType::Unrecognized`] and is rejected when applied.
///
/// # Examples
/// ```
/// use seaframe_core::calibration::FitType;
///
/// assert_eq!("polyu".parse::<FitType>().unwrap(), FitType::PolyU);
/// assert_eq!(
///     "SPLINE".parse::<FitType>().unwrap(),
///     FitType::Unrecognized("SPLINE".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum FitType {
    Optic1,
    Optic2,
    Optic3,
    Therm1,
    Pow10,
    PolyU,
    PolyF,
    Count,
    None,
    GpsTime,
    GpsPos,
    GpsHemi,
    GpsMode,
    GpsStatus,
    Ddmm,
    Hhmmss,
    Ddmmyy,
    Time2,
    Delimiter,
    Unrecognized(String),
}

impl FitType {
    pub fn name(&self) -> &str {
        match self {
            FitType::Optic1 => "OPTIC1",
            FitType::Optic2 => "OPTIC2",
            FitType::Optic3 => "OPTIC3",
            FitType::Therm1 => "THERM1",
            FitType::Pow10 => "POW10",
            FitType::PolyU => "POLYU",
            FitType::PolyF => "POLYF",
            FitType::Count => "COUNT",
            FitType::None => "NONE",
            FitType::GpsTime => "GPSTIME",
            FitType::GpsPos => "GPSPOS",
            FitType::GpsHemi => "GPSHEMI",
            FitType::GpsMode => "GPSMODE",
            FitType::GpsStatus => "GPSSTATUS",
            FitType::Ddmm => "DDMM",
            FitType::Hhmmss => "HHMMSS",
            FitType::Ddmmyy => "DDMMYY",
            FitType::Time2 => "TIME2",
            FitType::Delimiter => "DELIMITER",
            FitType::Unrecognized(name) => name,
        }
    }

    /// Fit types that only describe text fields (positions, times,
    /// delimiters) and have no numeric form.
    pub fn is_text_only(&self) -> bool {
        matches!(
            self,
            FitType::GpsTime
                | FitType::GpsPos
                | FitType::GpsHemi
                | FitType::GpsMode
                | FitType::GpsStatus
                | FitType::Ddmm
                | FitType::Hhmmss
                | FitType::Ddmmyy
                | FitType::Time2
                | FitType::Delimiter
        )
    }

    /// Fit types that are recognised but have no numeric body yet. Applying
    /// one yields `0.0`, the value legacy deployments published.
    pub fn is_unimplemented(&self) -> bool {
        matches!(
            self,
            FitType::Optic1 | FitType::Optic3 | FitType::Therm1 | FitType::Pow10
        )
    }
}

impl FromStr for FitType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let fit = match value.to_ascii_uppercase().as_str() {
            "OPTIC1" => FitType::Optic1,
            "OPTIC2" => FitType::Optic2,
            "OPTIC3" => FitType::Optic3,
            "THERM1" => FitType::Therm1,
            "POW10" => FitType::Pow10,
            "POLYU" => FitType::PolyU,
            "POLYF" => FitType::PolyF,
            "COUNT" => FitType::Count,
            "NONE" => FitType::None,
            "GPSTIME" => FitType::GpsTime,
            "GPSPOS" => FitType::GpsPos,
            "GPSHEMI" => FitType::GpsHemi,
            "GPSMODE" => FitType::GpsMode,
            "GPSSTATUS" => FitType::GpsStatus,
            "DDMM" => FitType::Ddmm,
            "HHMMSS" => FitType::Hhmmss,
            "DDMMYY" => FitType::Ddmmyy,
            "TIME2" => FitType::Time2,
            "DELIMITER" => FitType::Delimiter,
            _ => FitType::Unrecognized(value.to_string()),
        };
        Ok(fit)
    }
}

impl fmt::Display for FitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FitType> for String {
    fn from(value: FitType) -> Self {
        value.name().to_string()
    }
}
