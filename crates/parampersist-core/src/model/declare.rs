//! `parameterized!`: declare a persistable struct
//!
//! Generates the struct with typed fields, a `Default` impl built from the
//! declared defaults, and the [`Parameterized`](crate::model::Parameterized)
//! and [`ParameterizedClass`](crate::model::ParameterizedClass) impls.
//!
//! ```
//! use parampersist_core::parameterized;
//! use parampersist_core::model::{Parameterized, ParamValue};
//!
//! parameterized! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct Gauge {
//!         pub reading: Number = 0.5,
//!         pub samples: Integer = 1,
//!         pub label: String = "gauge",
//!         pub active: Boolean = false,
//!     }
//! }
//!
//! let gauge = Gauge::default();
//! assert_eq!(gauge.samples, 1);
//! assert_eq!(gauge.get_param("label"), Some(ParamValue::from("gauge")));
//! ```

#[macro_export]
macro_rules! parameterized {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $kind:ident = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $crate::__param_rust_type!($kind),
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $crate::__param_default!($kind, $default), )*
                }
            }
        }

        impl $name {
            const FIELD_SPECS: &'static [$crate::model::FieldSpec] = &[
                $(
                    $crate::model::FieldSpec::new(
                        stringify!($field),
                        $crate::model::ParamType::$kind,
                    ),
                )*
            ];
        }

        impl $crate::model::Parameterized for $name {
            fn class_path(&self) -> ::std::string::String {
                <Self as $crate::model::ParameterizedClass>::qualified_name()
            }

            fn fields(&self) -> &'static [$crate::model::FieldSpec] {
                Self::FIELD_SPECS
            }

            fn get_param(&self, name: &str) -> ::core::option::Option<$crate::model::ParamValue> {
                match name {
                    $(
                        stringify!($field) => ::core::option::Option::Some(
                            $crate::model::ParamValue::from(self.$field.clone()),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_param(
                &mut self,
                name: &str,
                value: $crate::model::ParamValue,
            ) -> $crate::errors::Result<()> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field =
                                <$crate::__param_rust_type!($kind) as $crate::model::ScalarParam>::from_param_value(value, name)?;
                            ::core::result::Result::Ok(())
                        }
                    )*
                    _ => ::core::result::Result::Err(
                        $crate::errors::ParamPersistError::UnknownField {
                            field: name.to_string(),
                        },
                    ),
                }
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }
        }

        impl $crate::model::ParameterizedClass for $name {
            fn qualified_name() -> ::std::string::String {
                $crate::model::dotted_path(module_path!(), stringify!($name))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __param_rust_type {
    (Integer) => { i64 };
    (Number) => { f64 };
    (String) => { ::std::string::String };
    (Boolean) => { bool };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __param_default {
    (Integer, $default:expr) => {{
        let value: i64 = $default;
        value
    }};
    (Number, $default:expr) => {{
        let value: f64 = $default;
        value
    }};
    (String, $default:expr) => {
        ::std::string::String::from($default)
    };
    (Boolean, $default:expr) => {{
        let value: bool = $default;
        value
    }};
}
