//! Parameter types a tool function may accept.
//!
//! Every argument type implements [`ToolParam`], which supplies two things:
//! the schema shape the model sees ([`ParamKind`]) and the coercion from the
//! model's JSON value into the Rust value.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Closed set of parameter shapes understood by the schema deriver.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
    /// Closed choice, rendered as a string with an `enum` list.
    Enum(&'static [&'static str]),
    /// Sequence with a recursively derived element shape.
    Array(Box<ParamKind>),
    /// Maps and any other structured value.
    Object,
    /// Host-supplied schema fragment, used verbatim.
    Schema(Value),
    /// Filled from the run's context variables; never shown to the model.
    Context,
}

impl ParamKind {
    /// Schema fragment for this shape, without a description.
    pub fn fragment(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match self {
            Self::String => {
                out.insert("type".into(), "string".into());
            }
            Self::Number => {
                out.insert("type".into(), "number".into());
            }
            Self::Boolean => {
                out.insert("type".into(), "boolean".into());
            }
            Self::Enum(values) => {
                out.insert("type".into(), "string".into());
                out.insert("enum".into(), (*values).into());
            }
            Self::Array(items) => {
                out.insert("type".into(), "array".into());
                out.insert("items".into(), Value::Object(items.fragment()));
            }
            Self::Object | Self::Context => {
                out.insert("type".into(), "object".into());
            }
            Self::Schema(schema) => match schema {
                Value::Object(obj) => out = obj.clone(),
                _ => {
                    out.insert("type".into(), "object".into());
                }
            },
        }
        out
    }

    /// Property schema: the fragment with `description` placed after `type`.
    pub fn property(&self, description: &str) -> Value {
        let fragment = self.fragment();
        let mut out = Map::new();
        if let Some(ty) = fragment.get("type") {
            out.insert("type".into(), ty.clone());
        }
        out.insert("description".into(), description.into());
        for (key, value) in fragment {
            if key != "type" {
                out.insert(key, value);
            }
        }
        Value::Object(out)
    }
}

/// A type usable as a tool function argument.
pub trait ToolParam: Sized {
    /// Schema shape of this type.
    fn kind() -> ParamKind;

    /// Whether the parameter may be absent from the model's arguments.
    fn optional() -> bool {
        false
    }

    /// Coerce the model-supplied value. `Value::Null` stands for an absent
    /// optional argument.
    fn from_argument(value: &Value) -> Result<Self, String>;
}

fn type_error(expected: &str, value: &Value) -> String {
    format!("expected {expected}, got {value}")
}

impl ToolParam for String {
    fn kind() -> ParamKind {
        ParamKind::String
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(type_error("string", other)),
        }
    }
}

impl ToolParam for bool {
    fn kind() -> ParamKind {
        ParamKind::Boolean
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => s
                .trim()
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| type_error("boolean", value)),
            other => Err(type_error("boolean", other)),
        }
    }
}

macro_rules! int_param {
    ($($ty:ty),*) => {$(
        impl ToolParam for $ty {
            fn kind() -> ParamKind {
                ParamKind::Number
            }

            fn from_argument(value: &Value) -> Result<Self, String> {
                let wide: i128 = match value {
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            i128::from(i)
                        } else if let Some(u) = n.as_u64() {
                            i128::from(u)
                        } else {
                            let f = n.as_f64().unwrap_or(f64::NAN);
                            if f.fract() != 0.0 || !f.is_finite() {
                                return Err(type_error("integer", value));
                            }
                            f as i128
                        }
                    }
                    Value::String(s) => s
                        .trim()
                        .parse::<i128>()
                        .map_err(|_| type_error("integer", value))?,
                    other => return Err(type_error("integer", other)),
                };
                <$ty>::try_from(wide)
                    .map_err(|_| format!("{wide} is out of range for {}", stringify!($ty)))
            }
        }
    )*};
}

int_param!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_param {
    ($($ty:ty),*) => {$(
        impl ToolParam for $ty {
            fn kind() -> ParamKind {
                ParamKind::Number
            }

            fn from_argument(value: &Value) -> Result<Self, String> {
                match value {
                    Value::Number(n) => n
                        .as_f64()
                        .map(|f| f as $ty)
                        .ok_or_else(|| type_error("number", value)),
                    Value::String(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|_| type_error("number", value)),
                    other => Err(type_error("number", other)),
                }
            }
        }
    )*};
}

float_param!(f32, f64);

impl<T: ToolParam> ToolParam for Option<T> {
    fn kind() -> ParamKind {
        T::kind()
    }

    fn optional() -> bool {
        true
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_argument(other).map(Some),
        }
    }
}

impl<T: ToolParam> ToolParam for Vec<T> {
    fn kind() -> ParamKind {
        ParamKind::Array(Box::new(T::kind()))
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        let items = value.as_array().ok_or_else(|| type_error("array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_argument(item).map_err(|e| format!("item {i}: {e}")))
            .collect()
    }
}

impl<V: ToolParam, S: BuildHasher + Default> ToolParam for HashMap<String, V, S> {
    fn kind() -> ParamKind {
        ParamKind::Object
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        let obj = value.as_object().ok_or_else(|| type_error("object", value))?;
        obj.iter()
            .map(|(k, v)| {
                V::from_argument(v)
                    .map(|v| (k.clone(), v))
                    .map_err(|e| format!("key {k}: {e}"))
            })
            .collect()
    }
}

impl<V: ToolParam> ToolParam for BTreeMap<String, V> {
    fn kind() -> ParamKind {
        ParamKind::Object
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        let obj = value.as_object().ok_or_else(|| type_error("object", value))?;
        obj.iter()
            .map(|(k, v)| {
                V::from_argument(v)
                    .map(|v| (k.clone(), v))
                    .map_err(|e| format!("key {k}: {e}"))
            })
            .collect()
    }
}

impl ToolParam for Value {
    fn kind() -> ParamKind {
        ParamKind::Object
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

/// Structured argument or return value carried through serde.
///
/// As an argument it is advertised as a plain `"object"`; as a return value
/// it is serialized to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> ToolParam for Json<T> {
    fn kind() -> ParamKind {
        ParamKind::Object
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        serde_json::from_value(value.clone())
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

/// Run-scoped key/value context handed to tools that ask for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextVariables(pub HashMap<String, String>);

impl ContextVariables {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }
}

impl ToolParam for ContextVariables {
    fn kind() -> ParamKind {
        ParamKind::Context
    }

    fn optional() -> bool {
        true
    }

    fn from_argument(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(obj) => Ok(Self(
                obj.iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), text)
                    })
                    .collect(),
            )),
            other => Err(type_error("object", other)),
        }
    }
}

/// Implement [`ToolParam`] for a closed-choice enum.
///
/// The enum must derive `strum::VariantNames` and `strum::EnumString`; the
/// variant names become the schema's `enum` list.
///
/// ```
/// use agentforge::tool_enum;
///
/// #[derive(Debug, strum::VariantNames, strum::EnumString)]
/// enum Unit {
///     Celsius,
///     Fahrenheit,
/// }
///
/// tool_enum!(Unit);
/// ```
#[macro_export]
macro_rules! tool_enum {
    ($ty:ty) => {
        impl $crate::tools::ToolParam for $ty {
            fn kind() -> $crate::tools::ParamKind {
                $crate::tools::ParamKind::Enum(
                    <$ty as $crate::__private::strum::VariantNames>::VARIANTS,
                )
            }

            fn from_argument(
                value: &$crate::__private::serde_json::Value,
            ) -> ::std::result::Result<Self, ::std::string::String> {
                let raw = value
                    .as_str()
                    .ok_or_else(|| ::std::format!("expected string, got {value}"))?;
                raw.parse::<$ty>()
                    .map_err(|_| ::std::format!("'{raw}' is not a valid choice"))
            }
        }
    };
}
