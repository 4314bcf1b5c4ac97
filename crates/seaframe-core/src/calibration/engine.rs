use super::catalog::{CalibrationCatalog, CalibrationEntry};
use super::error::CalibrationError;
use super::fit::FitType;

const OPTIC2_COEFFICIENTS: usize = 3;

/// Applies catalog fits to raw values.
///
/// The engine only borrows the catalog; engines on several threads may
/// read the same catalog at once.
///
/// # Examples
/// ```
/// use seaframe_core::calibration::CalibrationCatalog;
///
/// let catalog: CalibrationCatalog = "\
/// PAR NONE 'uE' 2 BU 1 OPTIC2
/// 1.0 2.0 0.5
/// "
/// .parse()
/// .unwrap();
/// let engine = catalog.engine();
/// assert_eq!(engine.apply(5.0, true, "PAR").unwrap(), 4.0);
/// assert_eq!(engine.apply(5.0, false, "PAR").unwrap(), 8.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CalibrationEngine<'a> {
    catalog: &'a CalibrationCatalog,
}

impl<'a> CalibrationEngine<'a> {
    pub fn new(catalog: &'a CalibrationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a CalibrationCatalog {
        self.catalog
    }

    /// Calibrate `raw` with the fit recorded for `variable`.
    pub fn apply(&self, raw: f64, is_immersed: bool, variable: &str) -> Result<f64, CalibrationError> {
        let entry = self.entry(variable)?;
        if !raw.is_finite() {
            return Err(CalibrationError::NonFiniteInput {
                name: variable.to_string(),
                value: raw,
            });
        }
        let value = apply_fit(&entry.fit_type, &entry.coefficients, raw, is_immersed)?;
        if !value.is_finite() {
            return Err(CalibrationError::NonFiniteResult {
                name: variable.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Calibrate a text field. Only the identity fits are defined for text;
    /// every other fit type is rejected.
    pub fn apply_text(&self, raw: &str, fit_type: &str) -> Result<String, CalibrationError> {
        let fit = match fit_type.parse::<FitType>() {
            Ok(fit) => fit,
            Err(never) => match never {},
        };
        apply_text_fit(&fit, raw)
    }

    fn entry(&self, variable: &str) -> Result<&'a CalibrationEntry, CalibrationError> {
        self.catalog
            .get(variable)
            .ok_or_else(|| CalibrationError::UnknownVariable {
                name: variable.to_string(),
            })
    }
}

/// Evaluate one fit over `raw` in 64-bit floating point.
pub fn apply_fit(
    fit: &FitType,
    coefficients: &[f64],
    raw: f64,
    is_immersed: bool,
) -> Result<f64, CalibrationError> {
    match fit {
        FitType::PolyU => {
            require_at_least(fit, coefficients, 1)?;
            Ok(coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| c * raw.powi(power as i32))
                .sum())
        }
        FitType::PolyF => {
            require_at_least(fit, coefficients, 1)?;
            let (first, rest) = (coefficients[0], &coefficients[1..]);
            Ok(rest.iter().fold(first, |acc, c| acc * (raw - c)))
        }
        FitType::Optic2 => {
            if coefficients.len() != OPTIC2_COEFFICIENTS {
                return Err(insufficient(fit, OPTIC2_COEFFICIENTS, coefficients.len()));
            }
            let (a0, a1, im) = (coefficients[0], coefficients[1], coefficients[2]);
            let immersion = if is_immersed { im } else { 1.0 };
            Ok(immersion * a1 * (raw - a0))
        }
        FitType::Count | FitType::None => Ok(raw),
        // Unimplemented placeholders (`FitType::is_unimplemented`) calibrate to 0.0.
        FitType::Optic1 | FitType::Optic3 | FitType::Therm1 | FitType::Pow10 => Ok(0.0),
        FitType::GpsTime
        | FitType::GpsPos
        | FitType::GpsHemi
        | FitType::GpsMode
        | FitType::GpsStatus
        | FitType::Ddmm
        | FitType::Hhmmss
        | FitType::Ddmmyy
        | FitType::Time2
        | FitType::Delimiter => Err(CalibrationError::UnsupportedFit {
            fit: fit.name().to_string(),
            kind: "numeric",
        }),
        FitType::Unrecognized(name) => Err(CalibrationError::UnknownFitType { name: name.clone() }),
    }
}

pub fn apply_text_fit(fit: &FitType, raw: &str) -> Result<String, CalibrationError> {
    match fit {
        FitType::Count | FitType::None => Ok(raw.to_string()),
        FitType::Unrecognized(name) => Err(CalibrationError::UnknownFitType { name: name.clone() }),
        _ => Err(CalibrationError::UnsupportedFit {
            fit: fit.name().to_string(),
            kind: "text",
        }),
    }
}

fn require_at_least(fit: &FitType, coefficients: &[f64], required: usize) -> Result<(), CalibrationError> {
    if coefficients.len() < required {
        return Err(insufficient(fit, required, coefficients.len()));
    }
    Ok(())
}

fn insufficient(fit: &FitType, required: usize, actual: usize) -> CalibrationError {
    CalibrationError::InsufficientCoefficients {
        fit: fit.name().to_string(),
        required,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_fit, apply_text_fit};
    use crate::calibration::catalog::CalibrationCatalog;
    use crate::calibration::error::CalibrationError;
    use crate::calibration::fit::FitType;

    const CAL: &str = "\
AUX_1 NONE 'V' 2 BU 1 POLYU
0.25 0.000382698
AUX_2 NONE 'V' 2 BU 1 POLYF
5.0 2.0 3.0
PAR NONE 'uE' 2 BU 1 OPTIC2
1.0 2.0 0.5
SV NONE 'V' 2 BU 0 COUNT
T_INT NONE 'C' 2 BU 1 THERM1
1.0 2.0
LAT NONE '' 4 AS 0 GPSPOS
ODD NONE '' 2 BU 0 SPLINE
EMPTY NONE '' 2 BU 0 POLYU
";

    fn catalog() -> CalibrationCatalog {
        CAL.parse().unwrap()
    }

    #[test]
    fn polyu_matches_instrument_example() {
        let catalog = catalog();
        let value = catalog.engine().apply(32787.0, true, "AUX_1").unwrap();
        assert!((value - 12.797519326).abs() < 1e-9);
    }

    #[test]
    fn polyu_single_coefficient_is_constant() {
        for raw in [-1.0e6, -1.0, 0.0, 0.5, 42.0, 1.0e9] {
            assert_eq!(apply_fit(&FitType::PolyU, &[7.25], raw, false).unwrap(), 7.25);
        }
    }

    #[test]
    fn polyf_is_factored() {
        let catalog = catalog();
        assert_eq!(catalog.engine().apply(10.0, false, "AUX_2").unwrap(), 280.0);
    }

    #[test]
    fn optic2_wet_and_dry() {
        let catalog = catalog();
        let engine = catalog.engine();
        assert_eq!(engine.apply(5.0, true, "PAR").unwrap(), 4.0);
        assert_eq!(engine.apply(5.0, false, "PAR").unwrap(), 8.0);
    }

    #[test]
    fn optic2_needs_exactly_three_coefficients() {
        let err = apply_fit(&FitType::Optic2, &[1.0, 2.0], 5.0, true).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::InsufficientCoefficients {
                fit: "OPTIC2".to_string(),
                required: 3,
                actual: 2
            }
        );
        assert!(apply_fit(&FitType::Optic2, &[1.0, 2.0, 3.0, 4.0], 5.0, true).is_err());
    }

    #[test]
    fn identity_and_placeholder_fits() {
        let catalog = catalog();
        let engine = catalog.engine();
        assert_eq!(engine.apply(1234.0, true, "SV").unwrap(), 1234.0);
        assert_eq!(engine.apply(1234.0, true, "T_INT").unwrap(), 0.0);
        for fit in [FitType::Optic1, FitType::Optic3, FitType::Pow10] {
            assert_eq!(apply_fit(&fit, &[], 3.0, true).unwrap(), 0.0);
        }
    }

    #[test]
    fn only_unimplemented_fits_yield_placeholder_zero() {
        let names = [
            "POLYU", "POLYF", "OPTIC1", "OPTIC2", "OPTIC3", "THERM1", "POW10", "COUNT", "NONE",
        ];
        for name in names {
            let fit: FitType = name.parse().unwrap();
            let value = apply_fit(&fit, &[2.0, 0.5, 1.0], 7.0, true).unwrap();
            if fit.is_unimplemented() {
                assert_eq!(value, 0.0, "{name}");
            } else {
                assert_ne!(value, 0.0, "{name}");
            }
        }
    }

    #[test]
    fn lookup_and_dispatch_errors() {
        let catalog = catalog();
        let engine = catalog.engine();
        assert_eq!(
            engine.apply(1.0, true, "MISSING").unwrap_err(),
            CalibrationError::UnknownVariable {
                name: "MISSING".to_string()
            }
        );
        assert_eq!(
            engine.apply(1.0, true, "ODD").unwrap_err(),
            CalibrationError::UnknownFitType {
                name: "SPLINE".to_string()
            }
        );
        assert!(matches!(
            engine.apply(1.0, true, "LAT").unwrap_err(),
            CalibrationError::UnsupportedFit { .. }
        ));
        assert!(matches!(
            engine.apply(1.0, true, "EMPTY").unwrap_err(),
            CalibrationError::InsufficientCoefficients { required: 1, actual: 0, .. }
        ));
    }

    #[test]
    fn non_finite_values_are_errors() {
        let catalog = catalog();
        let engine = catalog.engine();
        assert!(matches!(
            engine.apply(f64::NAN, true, "SV").unwrap_err(),
            CalibrationError::NonFiniteInput { .. }
        ));
        assert!(matches!(
            engine.apply(f64::MAX, true, "AUX_2").unwrap_err(),
            CalibrationError::NonFiniteResult { .. }
        ));
    }

    #[test]
    fn text_fits() {
        let catalog = catalog();
        let engine = catalog.engine();
        assert_eq!(engine.apply_text("2130.5", "COUNT").unwrap(), "2130.5");
        assert_eq!(engine.apply_text("abc", "none").unwrap(), "abc");
        assert!(matches!(
            engine.apply_text("2130.5", "GPSPOS").unwrap_err(),
            CalibrationError::UnsupportedFit { kind: "text", .. }
        ));
        assert!(matches!(
            apply_text_fit(&FitType::Unrecognized("X".to_string()), "1"),
            Err(CalibrationError::UnknownFitType { .. })
        ));
    }

    #[test]
    fn concurrent_reads_match_sequential() {
        let catalog = catalog();
        let sequential: Vec<f64> = (0..100)
            .map(|i| catalog.engine().apply(i as f64, true, "AUX_1").unwrap())
            .collect();
        let sequential_f: Vec<f64> = (0..100)
            .map(|i| catalog.engine().apply(i as f64, true, "AUX_2").unwrap())
            .collect();
        let (left, right) = std::thread::scope(|scope| {
            let left = scope.spawn(|| {
                (0..100)
                    .map(|i| catalog.engine().apply(i as f64, true, "AUX_1").unwrap())
                    .collect::<Vec<f64>>()
            });
            let right = scope.spawn(|| {
                (0..100)
                    .map(|i| catalog.engine().apply(i as f64, true, "AUX_2").unwrap())
                    .collect::<Vec<f64>>()
            });
            (left.join().unwrap(), right.join().unwrap())
        });
        assert_eq!(left, sequential);
        assert_eq!(right, sequential_f);
    }
}
