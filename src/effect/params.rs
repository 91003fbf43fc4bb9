use crate::foundation::error::{FxError, FxResult};

/// Value held by one effect parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    /// Checkbox.
    Bool(bool),
    /// Integer slider.
    Int(i64),
    /// Floating point slider.
    Double(f64),
    /// Straight-alpha RGBA in `[0, 1]`.
    Color([f64; 4]),
    /// Free text (file paths, labels).
    Text(String),
    /// Index into a fixed list of options.
    Choice(u32),
}

impl ParamValue {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::Color(_) => "color",
            Self::Text(_) => "text",
            Self::Choice(_) => "choice",
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A named parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Stable name; also the lookup key.
    pub name: String,
    /// Current value.
    pub value: ParamValue,
}

/// Ordered parameter list of one effect.
///
/// Declaration order is the order parameters are fed to the fingerprint, so it must not
/// depend on runtime state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamSet {
    params: Vec<Param>,
}

impl ParamSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration of a parameter with its default value.
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.declare(name, value);
        self
    }

    /// Declare a parameter. Re-declaring an existing name replaces its default.
    pub fn declare(&mut self, name: &str, value: ParamValue) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(p) => p.value = value,
            None => self.params.push(Param {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Set an existing parameter. The new value must have the declared type.
    pub fn set(&mut self, name: &str, value: ParamValue) -> FxResult<()> {
        let p = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| FxError::validation(format!("unknown parameter '{name}'")))?;
        if !p.value.same_kind(&value) {
            return Err(FxError::validation(format!(
                "parameter '{name}' expects {} but got {}",
                p.value.kind_name(),
                value.kind_name()
            )));
        }
        p.value = value;
        Ok(())
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Return `true` when no parameter is declared.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Read a `Double` (integers are widened).
    pub fn double(&self, name: &str) -> FxResult<f64> {
        match self.get(name) {
            Some(ParamValue::Double(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v as f64),
            other => Err(type_mismatch(name, "double", other)),
        }
    }

    /// Read an `Int`.
    pub fn int(&self, name: &str) -> FxResult<i64> {
        match self.get(name) {
            Some(ParamValue::Int(v)) => Ok(*v),
            other => Err(type_mismatch(name, "int", other)),
        }
    }

    /// Read a `Bool`.
    pub fn bool(&self, name: &str) -> FxResult<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            other => Err(type_mismatch(name, "bool", other)),
        }
    }

    /// Read a `Color`.
    pub fn color(&self, name: &str) -> FxResult<[f64; 4]> {
        match self.get(name) {
            Some(ParamValue::Color(v)) => Ok(*v),
            other => Err(type_mismatch(name, "color", other)),
        }
    }

    /// Read a `Text`.
    pub fn text(&self, name: &str) -> FxResult<&str> {
        match self.get(name) {
            Some(ParamValue::Text(v)) => Ok(v),
            other => Err(type_mismatch(name, "text", other)),
        }
    }
}

fn type_mismatch(name: &str, want: &str, got: Option<&ParamValue>) -> FxError {
    match got {
        Some(v) => FxError::validation(format!(
            "parameter '{name}' is {} not {want}",
            v.kind_name()
        )),
        None => FxError::validation(format!("unknown parameter '{name}'")),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/params.rs"]
mod tests;
