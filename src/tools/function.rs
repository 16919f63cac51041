//! Host functions registered as tools.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use super::output::{IntoToolOutput, ToolOutput};
use super::param::{ParamKind, ToolParam};
use super::schema::ToolDescriptor;
use crate::error::{ForgeError, Result};

static NULL: Value = Value::Null;

/// One declared parameter of a [`Function`].
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    /// Declared by the type itself (`Option<T>`, context variables).
    pub optional: bool,
    /// Used when the model omits the argument.
    pub default: Option<Value>,
}

impl Parameter {
    /// Whether the model must supply this argument.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

/// Type-erased invocation adapter built at registration time.
pub type Invoker = dyn for<'a> Fn(&mut ArgumentCursor<'a>) -> Result<ToolOutput> + Send + Sync;

fn invoker<F>(f: F) -> Arc<Invoker>
where
    F: for<'a> Fn(&mut ArgumentCursor<'a>) -> Result<ToolOutput> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Hands out coerced arguments to the invocation adapter in declaration
/// order.
pub struct ArgumentCursor<'a> {
    function: &'a str,
    parameters: std::slice::Iter<'a, Parameter>,
    arguments: &'a Map<String, Value>,
    context: &'a HashMap<String, String>,
}

impl ArgumentCursor<'_> {
    /// Coerce the next declared parameter into `T`.
    pub fn take<T: ToolParam>(&mut self) -> Result<T> {
        let param = self.parameters.next().ok_or_else(|| {
            ForgeError::InvalidState(format!(
                "tool {} read more arguments than it declares",
                self.function
            ))
        })?;

        let context_value;
        let value = match param.kind {
            ParamKind::Context => {
                context_value = Value::Object(
                    self.context
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                );
                &context_value
            }
            _ => match self.arguments.get(&param.name).or(param.default.as_ref()) {
                Some(value) => value,
                None if param.optional => &NULL,
                None => {
                    return Err(ForgeError::MissingArgument {
                        function: self.function.to_string(),
                        parameter: param.name.clone(),
                    })
                }
            },
        };

        T::from_argument(value).map_err(|message| ForgeError::InvalidArgument {
            function: self.function.to_string(),
            parameter: param.name.clone(),
            message,
        })
    }
}

/// Closures and fns that can back a [`Function`].
///
/// Implemented for `Fn(A, B, ..) -> R` up to eight arguments, where every
/// argument is a [`ToolParam`] and `R` is an [`IntoToolOutput`]. `N` is the
/// arity, so the parameter-name list is checked at compile time.
pub trait IntoFunction<Args, const N: usize>: Send + Sync + 'static {
    /// Kind and optionality of each argument, in order.
    fn signature() -> Vec<(ParamKind, bool)>;

    fn into_invoker(self) -> Arc<Invoker>;
}

macro_rules! impl_into_function {
    ($n:literal $(, $arg:ident)*) => {
        impl<Func, Out, $($arg,)*> IntoFunction<($($arg,)*), $n> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: IntoToolOutput,
            $($arg: ToolParam,)*
        {
            fn signature() -> Vec<(ParamKind, bool)> {
                vec![$(($arg::kind(), $arg::optional())),*]
            }

            #[allow(unused_variables, unused_mut)]
            fn into_invoker(self) -> Arc<Invoker> {
                invoker(move |args| (self)($(args.take::<$arg>()?),*).into_tool_output())
            }
        }
    };
}

impl_into_function!(0);
impl_into_function!(1, A1);
impl_into_function!(2, A1, A2);
impl_into_function!(3, A1, A2, A3);
impl_into_function!(4, A1, A2, A3, A4);
impl_into_function!(5, A1, A2, A3, A4, A5);
impl_into_function!(6, A1, A2, A3, A4, A5, A6);
impl_into_function!(7, A1, A2, A3, A4, A5, A6, A7);
impl_into_function!(8, A1, A2, A3, A4, A5, A6, A7, A8);

/// A named host function the model can call.
///
/// ```
/// use agentforge::tools::Function;
///
/// let add = Function::new("add", ["a", "b"], |a: i64, b: i64| a + b)
///     .with_description("Add two numbers")
///     .describe("a", "First addend");
/// assert_eq!(add.parameters().len(), 2);
/// ```
#[derive(Clone)]
pub struct Function {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    invoker: Arc<Invoker>,
}

impl Function {
    /// Register `func` under `name`, naming its parameters in order.
    pub fn new<F, Args, const N: usize>(name: impl Into<String>, params: [&str; N], func: F) -> Self
    where
        F: IntoFunction<Args, N>,
    {
        let parameters = params
            .iter()
            .zip(F::signature())
            .map(|(param, (kind, optional))| Parameter {
                name: (*param).to_string(),
                kind,
                description: String::new(),
                optional,
                default: None,
            })
            .collect();

        Self {
            name: name.into(),
            description: String::new(),
            parameters,
            invoker: func.into_invoker(),
        }
    }

    /// Set the function description shown to the model.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set a parameter's description.
    pub fn describe(mut self, param: &str, description: impl Into<String>) -> Self {
        match self.parameters.iter_mut().find(|p| p.name == param) {
            Some(p) => p.description = description.into(),
            None => warn!(tool = %self.name, param, "describe: unknown parameter"),
        }
        self
    }

    /// Give a parameter a default value, making it optional for the model.
    pub fn with_default(mut self, param: &str, value: impl Into<Value>) -> Self {
        match self.parameters.iter_mut().find(|p| p.name == param) {
            Some(p) => p.default = Some(value.into()),
            None => warn!(tool = %self.name, param, "with_default: unknown parameter"),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Derive the model-facing descriptor.
    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::from_function(self)
    }

    /// Coerce `raw_arguments` and call the function.
    pub fn invoke(
        &self,
        raw_arguments: &str,
        context: &HashMap<String, String>,
    ) -> Result<ToolOutput> {
        let arguments = parse_arguments(&self.name, raw_arguments)?;
        let mut cursor = ArgumentCursor {
            function: &self.name,
            parameters: self.parameters.iter(),
            arguments: &arguments,
            context,
        };
        (self.invoker)(&mut cursor)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn parse_arguments(function: &str, raw: &str) -> Result<Map<String, Value>> {
    let invalid = |message: String| ForgeError::InvalidArgument {
        function: function.to_string(),
        parameter: "arguments".to_string(),
        message,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(invalid(format!("expected a JSON object, got {other}"))),
        Err(e) => Err(invalid(e.to_string())),
    }
}
