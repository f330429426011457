//! Number formatting and uncertainty fields for SimaPro rows.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Decimal numbers with more than three fractional digits.
static LONG_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d{4,}").expect("Invalid decimal regex"));

/// Scientific notation with three mantissa decimals and a signed,
/// at least two-digit exponent: `5.000E+00`, `-1.235E-04`.
pub fn format_scientific(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    let raw = format!("{value:.3E}");
    let Some((mantissa, exponent)) = raw.split_once('E') else {
        return raw;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}E{sign}{digits:0>2}")
}

/// Round long decimals inside free text to three places.
pub fn round_floats_in_string(text: &str) -> Cow<'_, str> {
    LONG_DECIMAL.replace_all(text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        match matched.parse::<f64>() {
            Ok(value) => shortest_rounded(value),
            Err(_) => matched.to_string(),
        }
    })
}

fn shortest_rounded(value: f64) -> String {
    let rounded = format!("{value:.3}");
    let trimmed = rounded.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// SimaPro distribution names for Brightway uncertainty codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimaproUncertainty {
    #[default]
    NotDefined,
    Lognormal,
    Normal,
    Uniform,
    Triangular,
}

impl SimaproUncertainty {
    /// Codes 0 and 1 (undefined, no uncertainty) and unknown codes map to
    /// `not defined`.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(2) => Self::Lognormal,
            Some(3) => Self::Normal,
            Some(4) => Self::Uniform,
            Some(5) => Self::Triangular,
            _ => Self::NotDefined,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDefined => "not defined",
            Self::Lognormal => "Lognormal",
            Self::Normal => "Normal",
            Self::Uniform => "Uniform",
            Self::Triangular => "Triangular",
        }
    }

    /// Distribution named in a SimaPro row, matched case-insensitively.
    pub fn from_simapro(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "lognormal" => Self::Lognormal,
            "normal" => Self::Normal,
            "uniform" => Self::Uniform,
            "triangular" => Self::Triangular,
            _ => Self::NotDefined,
        }
    }

    /// Brightway code; `not defined` reads back as 0.
    pub fn code(self) -> i64 {
        match self {
            Self::NotDefined => 0,
            Self::Lognormal => 2,
            Self::Normal => 3,
            Self::Uniform => 4,
            Self::Triangular => 5,
        }
    }
}

impl fmt::Display for SimaproUncertainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SimaPro's spread column from a Brightway `scale`.
///
/// Lognormal takes the squared geometric standard deviation, normal twice
/// the standard deviation; other distributions carry none.
pub fn convert_sd_to_sd2(scale: f64, uncertainty: SimaproUncertainty) -> f64 {
    match uncertainty {
        SimaproUncertainty::Lognormal => scale.exp().powi(2),
        SimaproUncertainty::Normal => 2.0 * scale,
        _ => 0.0,
    }
}

/// Brightway `scale` from SimaPro's spread column; the inverse of
/// [`convert_sd_to_sd2`]. Distributions without a spread give `None`.
pub fn convert_sd2_to_sd(sd2: f64, uncertainty: SimaproUncertainty) -> Option<f64> {
    match uncertainty {
        SimaproUncertainty::Lognormal if sd2 > 0.0 => Some(sd2.sqrt().ln()),
        SimaproUncertainty::Normal => Some(sd2 / 2.0),
        _ => None,
    }
}
