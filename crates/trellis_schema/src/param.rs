// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter widgets and raw-value resolution.
//!
//! Parameters are scalar knobs sourced from UI widgets, not ports. The core
//! only coerces raw widget state into a scalar of the declared kind; widget
//! rendering belongs to the host.

use crate::port::PrimitiveKind;
use crate::value::ScalarValue;
use serde::{Deserialize, Serialize};

/// Widget kind and default value of one node parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Widget {
    /// Numeric slider over a closed range
    Slider {
        /// Lower bound
        min: f64,
        /// Upper bound, must be >= `min`
        max: f64,
        /// Value used when no raw value is supplied
        default: f64,
    },
    /// Free numeric entry field
    NumberField {
        /// Value used when no raw value is supplied
        default: f64,
    },
    /// Boolean toggle
    CheckBox {
        /// Value used when no raw value is supplied
        default: bool,
    },
    /// Read-only text shown on the node
    TextDisplay {
        /// Displayed content
        content: String,
    },
    /// File path chooser
    FilePicker {
        /// Path used when no raw value is supplied
        default: String,
    },
}

impl Widget {
    /// The scalar this parameter resolves to when no raw value exists
    pub fn default_value(&self) -> ScalarValue {
        match self {
            Self::Slider { default, .. } | Self::NumberField { default } => {
                ScalarValue::Float(*default)
            }
            Self::CheckBox { default } => ScalarValue::Boolean(*default),
            Self::TextDisplay { content } => ScalarValue::String(content.clone()),
            Self::FilePicker { default } => ScalarValue::String(default.clone()),
        }
    }

    /// Coerce a raw widget value into the declared scalar kind.
    ///
    /// Absent raw values resolve to the default. Sliders clamp out-of-range
    /// values to `[min, max]` rather than rejecting them, so a value that was
    /// valid under old bounds stays usable after the bounds change. Fails
    /// only when the raw value cannot be read as the expected coarse kind.
    pub fn resolve(&self, raw: Option<&ScalarValue>) -> Result<ScalarValue, ParameterError> {
        match self {
            Self::Slider { min, max, default } => match raw {
                None => Ok(ScalarValue::Float(*default)),
                Some(v) => numeric(v)
                    .map(|x| ScalarValue::Float(x.clamp(*min, *max)))
                    .ok_or_else(|| ParameterError::kind_mismatch("number", v)),
            },
            Self::NumberField { default } => match raw {
                None => Ok(ScalarValue::Float(*default)),
                Some(v) => numeric(v)
                    .map(ScalarValue::Float)
                    .ok_or_else(|| ParameterError::kind_mismatch("number", v)),
            },
            Self::CheckBox { default } => match raw {
                None => Ok(ScalarValue::Boolean(*default)),
                Some(ScalarValue::Boolean(b)) => Ok(ScalarValue::Boolean(*b)),
                // 0/1 come from loosely typed widget sources
                Some(ScalarValue::Integer(0)) => Ok(ScalarValue::Boolean(false)),
                Some(ScalarValue::Integer(1)) => Ok(ScalarValue::Boolean(true)),
                Some(v) => Err(ParameterError::kind_mismatch("boolean", v)),
            },
            // Read-only: the raw value is widget state we ignore
            Self::TextDisplay { content } => Ok(ScalarValue::String(content.clone())),
            Self::FilePicker { default } => match raw {
                None => Ok(ScalarValue::String(default.clone())),
                Some(ScalarValue::String(s)) => Ok(ScalarValue::String(s.clone())),
                Some(v) => Err(ParameterError::kind_mismatch("string", v)),
            },
        }
    }

    /// Check the widget's own invariants: ordered slider bounds, finite
    /// numeric defaults.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        match self {
            Self::Slider { min, max, default } => {
                if !(min.is_finite() && max.is_finite() && default.is_finite()) {
                    Err("non-finite slider bound or default")
                } else if min > max {
                    Err("slider bounds inverted")
                } else {
                    Ok(())
                }
            }
            Self::NumberField { default } => {
                if default.is_finite() {
                    Ok(())
                } else {
                    Err("non-finite default")
                }
            }
            Self::CheckBox { .. } | Self::TextDisplay { .. } | Self::FilePicker { .. } => Ok(()),
        }
    }
}

fn numeric(v: &ScalarValue) -> Option<f64> {
    v.as_f64()
}

/// Raw parameter value could not be read as the declared kind.
///
/// Recoverable: callers fall back to the declared default and continue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// Raw value has the wrong coarse kind
    #[error("parameter kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        /// Coarse kind the widget expects
        expected: &'static str,
        /// Kind of the raw value that was supplied
        found: PrimitiveKind,
    },
}

impl ParameterError {
    fn kind_mismatch(expected: &'static str, found: &ScalarValue) -> Self {
        Self::KindMismatch {
            expected,
            found: found.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider() -> Widget {
        Widget::Slider {
            min: 0.0,
            max: 1.0,
            default: 0.5,
        }
    }

    #[test]
    fn slider_clamps_out_of_range() {
        assert_eq!(
            slider().resolve(Some(&ScalarValue::Float(5.0))),
            Ok(ScalarValue::Float(1.0))
        );
        assert_eq!(
            slider().resolve(Some(&ScalarValue::Integer(-3))),
            Ok(ScalarValue::Float(0.0))
        );
    }

    #[test]
    fn slider_absent_resolves_to_default() {
        assert_eq!(slider().resolve(None), Ok(ScalarValue::Float(0.5)));
    }

    #[test]
    fn number_field_accepts_integers() {
        let field = Widget::NumberField { default: 4.0 };
        assert_eq!(
            field.resolve(Some(&ScalarValue::Integer(7))),
            Ok(ScalarValue::Float(7.0))
        );
        assert_eq!(field.resolve(None), Ok(ScalarValue::Float(4.0)));
    }

    #[test]
    fn number_field_rejects_strings() {
        let field = Widget::NumberField { default: 4.0 };
        assert_eq!(
            field.resolve(Some(&ScalarValue::String("ten".into()))),
            Err(ParameterError::KindMismatch {
                expected: "number",
                found: PrimitiveKind::String,
            })
        );
    }

    #[test]
    fn checkbox_accepts_zero_one() {
        let cb = Widget::CheckBox { default: true };
        assert_eq!(
            cb.resolve(Some(&ScalarValue::Integer(0))),
            Ok(ScalarValue::Boolean(false))
        );
        assert_eq!(
            cb.resolve(Some(&ScalarValue::Integer(1))),
            Ok(ScalarValue::Boolean(true))
        );
        assert_eq!(cb.resolve(None), Ok(ScalarValue::Boolean(true)));
        assert!(cb.resolve(Some(&ScalarValue::Integer(2))).is_err());
    }

    #[test]
    fn text_display_always_yields_content() {
        let text = Widget::TextDisplay {
            content: "hello".into(),
        };
        assert_eq!(text.resolve(None), Ok(ScalarValue::String("hello".into())));
        assert_eq!(
            text.resolve(Some(&ScalarValue::Integer(3))),
            Ok(ScalarValue::String("hello".into()))
        );
    }

    #[test]
    fn file_picker_prefers_raw_path() {
        let picker = Widget::FilePicker {
            default: "/tmp/a".into(),
        };
        assert_eq!(
            picker.resolve(Some(&ScalarValue::String("/tmp/b".into()))),
            Ok(ScalarValue::String("/tmp/b".into()))
        );
        assert_eq!(
            picker.resolve(None),
            Ok(ScalarValue::String("/tmp/a".into()))
        );
    }

    #[test]
    fn widget_invariants() {
        assert!(Widget::Slider {
            min: 1.0,
            max: 0.0,
            default: 0.5
        }
        .check()
        .is_err());
        assert!(Widget::NumberField {
            default: f64::NAN
        }
        .check()
        .is_err());
        assert!(slider().check().is_ok());
    }
}
