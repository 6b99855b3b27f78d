/**
 * Screen Parameters
 *
 * Target parameters for halftone screen generation, consumed from a
 * configuration-style record of key/value entries. Recognized keys,
 * ranges and defaults:
 *
 *   Angle          number  0-360    0       target screen angle, degrees
 *   Frequency      number  1-32767  75      target lines per inch
 *   HResolution    number  >0       300     device pixels per inch
 *   VResolution    number  >0       300     device pixels per inch
 *   Levels         integer 1-32767  256     requested gray levels
 *   SuperCellSize  integer 1-32767  1       forces lattice cell size
 *   DotShape       integer 0-8      0       growth metric selector
 *   Holladay       bool    -        false   legacy truncating rounding
 *   OutputType     name    -        Type3   output encoding
 *
 * Unknown keys are ignored, matching dictionary semantics.
 */

use crate::encode::OutputFormat;
use crate::error::{Result, ScreenError};

/// Dot shape used by the turn-on growth metric
///
/// The numeric indices are part of the external contract; `Custom` (index
/// 9) is reserved and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotShape {
    /// Circular dot, Euclidean growth
    Round,
    /// Elliptical dot, anisotropic Euclidean growth
    Ellipse,
    /// White dot: grows from the cell corners inward
    Inverted,
    /// Flattened diamond
    Rhomboid,
    /// Horizontal line screen
    LineX,
    /// Vertical line screen
    LineY,
    /// Diamond dot, L1 growth
    Diamond,
    /// Square dot, Chebyshev growth
    Square,
    /// Euclidean composite approximating the Adobe red-book round spot
    RedBook,
}

impl DotShape {
    /// Map an external index to a shape. Valid range is 0..=8; index 9
    /// (custom spot functions) is outside this core.
    pub fn from_index(index: i64) -> Result<Self> {
        Ok(match index {
            0 => DotShape::Round,
            1 => DotShape::Ellipse,
            2 => DotShape::Inverted,
            3 => DotShape::Rhomboid,
            4 => DotShape::LineX,
            5 => DotShape::LineY,
            6 => DotShape::Diamond,
            7 => DotShape::Square,
            8 => DotShape::RedBook,
            _ => return Err(ScreenError::Range(format!("DotShape {index}"))),
        })
    }

    /// Parse a shape name as used by the CLI
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(match name {
            "round" => DotShape::Round,
            "ellipse" => DotShape::Ellipse,
            "inverted" => DotShape::Inverted,
            "rhomboid" => DotShape::Rhomboid,
            "line-x" => DotShape::LineX,
            "line-y" => DotShape::LineY,
            "diamond" => DotShape::Diamond,
            "square" => DotShape::Square,
            "redbook" => DotShape::RedBook,
            _ => return Err(ScreenError::Undefined(format!("dot shape {name:?}"))),
        })
    }
}

/// Rounding policy used when the solver snaps the continuous target cell
/// area to an achievable integer area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    /// Round half away from zero
    Nearest,
    /// Truncate, matching Holladay-era legacy behavior
    Holladay,
}

/// Immutable target parameters for one screen generation call
#[derive(Debug, Clone)]
pub struct ScreenParams {
    /// Target screen angle in degrees, 0-360
    pub angle: f64,
    /// Target frequency in lines per inch
    pub frequency: f64,
    /// Horizontal device resolution in dpi
    pub hres: f64,
    /// Vertical device resolution in dpi
    pub vres: f64,
    /// Requested gray-level count
    pub levels: u16,
    /// Forced supercell size; 1 leaves the solver free
    pub supercell_size: u16,
    /// Dot shape selector
    pub dot_shape: DotShape,
    /// Cell-area rounding policy
    pub rounding: RoundingPolicy,
    /// Requested output encoding
    pub output: OutputFormat,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            angle: 0.0,
            frequency: 75.0,
            hres: 300.0,
            vres: 300.0,
            levels: 256,
            supercell_size: 1,
            dot_shape: DotShape::Round,
            rounding: RoundingPolicy::Nearest,
            output: OutputFormat::Type3,
        }
    }
}

impl ScreenParams {
    /// Check numeric bounds. Called eagerly at pipeline entry; later
    /// stages assume a validated parameter set.
    pub fn validate(&self) -> Result<()> {
        if !self.angle.is_finite() || !(0.0..=360.0).contains(&self.angle) {
            return Err(ScreenError::Range(format!("Angle {}", self.angle)));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 || self.frequency > 32767.0 {
            return Err(ScreenError::Range(format!("Frequency {}", self.frequency)));
        }
        if !self.hres.is_finite() || self.hres <= 0.0 {
            return Err(ScreenError::Range(format!("HResolution {}", self.hres)));
        }
        if !self.vres.is_finite() || self.vres <= 0.0 {
            return Err(ScreenError::Range(format!("VResolution {}", self.vres)));
        }
        if self.levels == 0 || self.levels > 32767 {
            return Err(ScreenError::Range(format!("Levels {}", self.levels)));
        }
        if self.supercell_size == 0 || self.supercell_size > 32767 {
            return Err(ScreenError::Range(format!(
                "SuperCellSize {}",
                self.supercell_size
            )));
        }
        Ok(())
    }

    /// Vertical-to-horizontal pitch correction applied by the growth
    /// metric so dots stay round in ink space on anisotropic devices
    pub fn aspect(&self) -> f64 {
        self.hres / self.vres
    }
}

/// A value in a configuration-style record
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer-valued entry
    Integer(i64),
    /// Real-valued entry
    Real(f64),
    /// Boolean entry
    Boolean(bool),
    /// Name (enum string) entry
    Name(String),
}

impl Value {
    fn as_number(&self, key: &str) -> Result<f64> {
        match self {
            Value::Integer(i) => Ok(*i as f64),
            Value::Real(r) => Ok(*r),
            _ => Err(ScreenError::Type(format!("{key} expects a number"))),
        }
    }

    fn as_integer(&self, key: &str) -> Result<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(ScreenError::Type(format!("{key} expects an integer"))),
        }
    }

    fn as_boolean(&self, key: &str) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(ScreenError::Type(format!("{key} expects a boolean"))),
        }
    }

    fn as_name(&self, key: &str) -> Result<&str> {
        match self {
            Value::Name(n) => Ok(n),
            _ => Err(ScreenError::Type(format!("{key} expects a name"))),
        }
    }
}

fn int_in_range(value: &Value, key: &str, lo: i64, hi: i64) -> Result<i64> {
    let v = value.as_integer(key)?;
    if v < lo || v > hi {
        return Err(ScreenError::Range(format!("{key} {v}")));
    }
    Ok(v)
}

impl ScreenParams {
    /// Build parameters from a configuration record, applying defaults for
    /// absent keys and ignoring unrecognized ones
    pub fn from_entries(entries: &[(&str, Value)]) -> Result<Self> {
        let mut params = ScreenParams::default();

        for (key, value) in entries {
            match *key {
                "Angle" => {
                    let a = value.as_number(key)?;
                    if !a.is_finite() || !(0.0..=360.0).contains(&a) {
                        return Err(ScreenError::Range(format!("Angle {a}")));
                    }
                    params.angle = a;
                }
                "Frequency" => {
                    let f = value.as_number(key)?;
                    if !f.is_finite() || f < 1.0 || f > 32767.0 {
                        return Err(ScreenError::Range(format!("Frequency {f}")));
                    }
                    params.frequency = f;
                }
                "HResolution" => {
                    let r = value.as_number(key)?;
                    if !r.is_finite() || r <= 0.0 {
                        return Err(ScreenError::Range(format!("HResolution {r}")));
                    }
                    params.hres = r;
                }
                "VResolution" => {
                    let r = value.as_number(key)?;
                    if !r.is_finite() || r <= 0.0 {
                        return Err(ScreenError::Range(format!("VResolution {r}")));
                    }
                    params.vres = r;
                }
                "Levels" => {
                    params.levels = int_in_range(value, key, 1, 32767)? as u16;
                }
                "SuperCellSize" => {
                    params.supercell_size = int_in_range(value, key, 1, 32767)? as u16;
                }
                "DotShape" => {
                    params.dot_shape = DotShape::from_index(value.as_integer(key)?)?;
                }
                "Holladay" => {
                    params.rounding = if value.as_boolean(key)? {
                        RoundingPolicy::Holladay
                    } else {
                        RoundingPolicy::Nearest
                    };
                }
                "OutputType" => {
                    params.output = value.as_name(key)?.parse()?;
                }
                _ => {}
            }
        }

        params.validate()?;
        Ok(params)
    }
}
