//! 单位系统
//!
//! 建筑尺寸习惯用英尺和英寸书写（如 `29'9"`）。模型内部统一以英寸存储，
//! 只在叶子处（尺寸常量）换算一次，之后所有运算都在同一单位下进行。
//!
//! ```rust
//! use archplan_core::units::{ft, ftin};
//!
//! assert_eq!(ft(18.0), 216.0);
//! assert_eq!(ftin(29.0, 9.0), 357.0);
//! ```

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// 长度度量，单位为英寸
pub type Measurement = f64;

/// 每英尺的英寸数
pub const INCHES_PER_FOOT: f64 = 12.0;

/// 英尺转英寸
#[inline]
pub fn ft(feet: f64) -> Measurement {
    feet * INCHES_PER_FOOT
}

/// 英尺 + 英寸转英寸（英寸可以是小数，如 2.25）
#[inline]
pub fn ftin(feet: f64, inches: f64) -> Measurement {
    feet * INCHES_PER_FOOT + inches
}

/// 英寸（恒等换算，用于让尺寸常量读起来统一）
#[inline]
pub fn inch(inches: f64) -> Measurement {
    inches
}

/// 拆分为（英尺, 英寸）
///
/// 英尺取整，英寸为余数，可能带小数。
pub fn to_ft_in(measure: Measurement) -> (f64, f64) {
    let measure = round_micro(measure);
    let feet = (measure / INCHES_PER_FOOT).floor();
    let inches = round_micro(measure % INCHES_PER_FOOT);
    (feet, inches)
}

/// 格式化为 `F'I"`，如 `13'9"`、`4'10.5"`
pub fn format_ft_in(measure: Measurement) -> String {
    let (feet, inches) = to_ft_in(measure);
    format!("{}'{}\"", feet, inches)
}

/// 消除浮点累积误差（保留到百万分之一英寸）
fn round_micro(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// 校验尺寸参数：必须是有限且非负的数
pub fn check_dimension(name: &'static str, value: Measurement) -> Result<Measurement, ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidDimension { name, value })
    }
}

/// 校验坐标或角度：只要求有限，可以为负
pub fn check_finite(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidDimension { name, value })
    }
}

/// 绘图单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    /// 英寸（默认）
    #[default]
    Inch,
    /// 英尺 (12 英寸)
    Foot,
    /// 毫米
    Millimeter,
    /// 厘米
    Centimeter,
    /// 米
    Meter,
}

impl Unit {
    /// 获取单位符号（SVG/DXF 中使用的缩写）
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Inch => "in",
            Unit::Foot => "ft",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn test_feet_and_inches() {
        assert_eq!(ft(18.0), 216.0);
        assert_eq!(ftin(29.0, 9.0), 357.0);
        assert_eq!(ftin(2.0, 10.0), 34.0);
        assert_eq!(ftin(0.0, 2.25), 2.25);
    }

    #[test]
    fn test_ftin_agrees_with_ft() {
        for f in [0.0, 1.0, 4.5, 13.0, 38.0] {
            assert_eq!(ftin(f, 0.0), ft(f));
            for i in [0.0, 0.5, 7.75, 11.0] {
                assert!(approx_eq(ftin(f, i), ft(f) + i));
            }
        }
    }

    #[test]
    fn test_to_ft_in() {
        assert_eq!(to_ft_in(ftin(13.0, 9.0)), (13.0, 9.0));
        assert_eq!(to_ft_in(ftin(4.0, 10.5)), (4.0, 10.5));
        assert_eq!(format_ft_in(ft(20.0)), "20'0\"");
        assert_eq!(format_ft_in(ftin(8.0, 5.0)), "8'5\"");
        assert_eq!(format_ft_in(ftin(2.0, 2.5)), "2'2.5\"");
    }

    #[test]
    fn test_check_dimension() {
        assert_eq!(check_dimension("width", 34.0), Ok(34.0));
        assert_eq!(check_dimension("width", 0.0), Ok(0.0));
        assert!(check_dimension("width", -1.0).is_err());
        assert!(check_dimension("width", f64::NAN).is_err());
        assert!(check_dimension("width", f64::INFINITY).is_err());
        assert_eq!(check_finite("x", -3.0), Ok(-3.0));
        assert!(check_finite("x", f64::NAN).is_err());
    }
}
