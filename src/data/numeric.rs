use std::ops::Div;

use super::model::CellValue;

/// A number that may be missing.
///
/// Coercion failures become `Numeric::NULL` instead of errors. Arithmetic on a
/// null operand yields null, and every comparison involving null is false, so
/// a null row can never satisfy a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric(Option<f64>);

impl Numeric {
    pub const NULL: Numeric = Numeric(None);

    /// NaN is stored as null.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Numeric::NULL
        } else {
            Numeric(Some(value))
        }
    }

    /// Lenient numeric coercion of a cell. Numbers pass through, booleans map
    /// to 0/1, text is parsed after trimming; anything else is null.
    pub fn coerce(cell: &CellValue) -> Self {
        match cell {
            CellValue::Integer(i) => Numeric::new(*i as f64),
            CellValue::Float(v) => Numeric::new(*v),
            CellValue::Bool(b) => Numeric::new(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Numeric::new)
                .unwrap_or(Numeric::NULL),
            CellValue::Date(_) | CellValue::Null => Numeric::NULL,
        }
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_none()
    }

    pub fn le(self, bound: f64) -> bool {
        self.0.is_some_and(|v| v <= bound)
    }

    pub fn ge(self, bound: f64) -> bool {
        self.0.is_some_and(|v| v >= bound)
    }

    pub fn gt(self, bound: f64) -> bool {
        self.0.is_some_and(|v| v > bound)
    }

    pub fn to_cell(self) -> CellValue {
        self.0.map_or(CellValue::Null, CellValue::Float)
    }
}

impl Div for Numeric {
    type Output = Numeric;

    /// Division by zero yields null rather than an infinity.
    fn div(self, rhs: Numeric) -> Numeric {
        match (self.0, rhs.0) {
            (Some(_), Some(d)) if d == 0.0 => Numeric::NULL,
            (Some(n), Some(d)) => Numeric::new(n / d),
            _ => Numeric::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_accepts_numbers_and_numeric_text() {
        assert_eq!(Numeric::coerce(&CellValue::Integer(4)).value(), Some(4.0));
        assert_eq!(Numeric::coerce(&CellValue::from(" 2.5 ")).value(), Some(2.5));
        assert!(Numeric::coerce(&CellValue::from("abc")).is_null());
        assert!(Numeric::coerce(&CellValue::Null).is_null());
        assert!(Numeric::coerce(&CellValue::Float(f64::NAN)).is_null());
    }

    #[test]
    fn null_propagates_through_division() {
        assert!((Numeric::NULL / Numeric::new(2.0)).is_null());
        assert!((Numeric::new(2.0) / Numeric::NULL).is_null());
        assert!((Numeric::new(2.0) / Numeric::new(0.0)).is_null());
        assert_eq!((Numeric::new(120.0) / Numeric::new(4.0)).value(), Some(30.0));
    }

    #[test]
    fn comparisons_against_null_are_false() {
        assert!(!Numeric::NULL.le(f64::MAX));
        assert!(!Numeric::NULL.ge(f64::MIN));
        assert!(!Numeric::NULL.gt(0.0));
        assert!(Numeric::new(3.0).ge(3.0));
        assert!(Numeric::new(3.0).le(3.0));
    }
}
