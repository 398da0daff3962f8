//! Variables: the values behind plain `{{...}}` placeholders.
//!
//! A variable is identified by its default text, the literal between the
//! braces. Its kind follows from that text:
//!
//! | text        | kind                                   |
//! |-------------|----------------------------------------|
//! | `-?\d+`     | [`VariableKind::Integer`]              |
//! | `-?\d+\.\d+`| [`VariableKind::Float`] (keeps decimals)|
//! | anything else | [`VariableKind::Name`]               |
//!
//! A variable draws its random value once; every later resolution returns the
//! same value. A [`Scope`] maps default texts to variables so repeated
//! placeholders agree.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::{Rng, RngCore};
use regex::Regex;

use crate::names::NameGenerator;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("valid integer pattern"));
static FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.(\d+)$").expect("valid float pattern"));

/// Kind and typed default of a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    Integer(i64),
    /// `decimals` is the number of digits after the dot in the default text.
    Float { value: f64, decimals: usize },
    Name,
}

impl VariableKind {
    /// Infers the kind from a default text.
    ///
    /// An integer literal too large for `i64` is treated as a name.
    pub fn infer(text: &str) -> Self {
        if INTEGER.is_match(text) {
            if let Ok(value) = text.parse::<i64>() {
                return VariableKind::Integer(value);
            }
        } else if let Some(caps) = FLOAT.captures(text) {
            if let Ok(value) = text.parse::<f64>() {
                let decimals = caps.get(1).map_or(0, |m| m.as_str().len());
                return VariableKind::Float { value, decimals };
            }
        }
        VariableKind::Name
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, VariableKind::Name)
    }
}

/// A placeholder value with a memoized random draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    default: String,
    kind: VariableKind,
    random: Option<String>,
}

impl Variable {
    pub fn new(default: impl Into<String>) -> Self {
        let default = default.into();
        let kind = VariableKind::infer(&default);
        Self {
            default,
            kind,
            random: None,
        }
    }

    /// A variable whose random value is fixed in advance.
    ///
    /// Hosts use this to preload a scope so that a placeholder resolves to a
    /// known value when randomizing.
    pub fn with_value(default: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            random: Some(value.into()),
            ..Self::new(default)
        }
    }

    pub fn default_text(&self) -> &str {
        &self.default
    }

    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// The random value, if one has been drawn.
    pub fn random_value(&self) -> Option<&str> {
        self.random.as_deref()
    }

    /// Returns the random value, drawing it on first use.
    pub fn random(&mut self, rng: &mut dyn RngCore, names: &dyn NameGenerator) -> &str {
        if self.random.is_none() {
            let value = self.draw(rng, names);
            tracing::trace!(default = %self.default, value = %value, "drew variable value");
            self.random = Some(value);
        }
        self.random.as_deref().unwrap_or(&self.default)
    }

    /// Text a placeholder resolves to.
    pub fn resolve(
        &mut self,
        randomize: bool,
        rng: &mut dyn RngCore,
        names: &dyn NameGenerator,
    ) -> String {
        if randomize {
            self.random(rng, names).to_string()
        } else {
            self.default.clone()
        }
    }

    fn draw(&self, rng: &mut dyn RngCore, names: &dyn NameGenerator) -> String {
        match self.kind {
            VariableKind::Integer(default) => {
                let (low, high) = integer_range(default);
                rng.gen_range(low..=high).to_string()
            }
            VariableKind::Float { value, decimals } => {
                let (low, high) = float_range(value);
                let drawn = rng.gen_range(low..=high);
                format_truncated(drawn, decimals)
            }
            VariableKind::Name => names.random_name(Some(&self.default), rng),
        }
    }
}

/// Inclusive bounds for a random integer around `default`.
pub fn integer_range(default: i64) -> (i64, i64) {
    let double = default.saturating_mul(2);
    match default {
        d if d > 100 => (d / 2, double),
        d if d > 0 => (0, double),
        0 => (-50, 50),
        d if d > -100 => (double, 0),
        // Division truncates toward zero, which is the ceiling for negatives.
        d => (double, d / 2),
    }
}

/// Inclusive bounds for a random float around `default`.
pub fn float_range(default: f64) -> (f64, f64) {
    if default > 100.0 {
        ((default / 2.0).floor(), (default * 2.0).ceil())
    } else if default > 0.0 {
        (0.0, default * 2.0)
    } else if default == 0.0 {
        (-50.0, 50.0)
    } else if default > -100.0 {
        (default * 2.0, 0.0)
    } else {
        ((default * 2.0).floor(), (default / 2.0).ceil())
    }
}

/// Truncates toward negative infinity at `decimals` digits and prints exactly
/// that many.
fn format_truncated(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals.min(i32::MAX as usize) as i32);
    let truncated = (value * scale).floor() / scale;
    format!("{:.*}", decimals, truncated)
}

/// Variables visible to one block, keyed by default text.
///
/// Cloning a scope gives a branch its own copy: later draws in the branch do
/// not leak back to the parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    variables: HashMap<String, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, default: &str) -> Option<&Variable> {
        self.variables.get(default)
    }

    /// Returns the variable for `default`, creating it on first sight.
    pub fn variable(&mut self, default: &str) -> &mut Variable {
        self.variables
            .entry(default.to_string())
            .or_insert_with(|| {
                tracing::trace!(default, "new variable");
                Variable::new(default)
            })
    }

    /// Adds or replaces a variable.
    pub fn insert(&mut self, variable: Variable) -> Option<Variable> {
        self.variables
            .insert(variable.default_text().to_string(), variable)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }
}

impl FromIterator<Variable> for Scope {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut scope = Scope::new();
        for variable in iter {
            scope.insert(variable);
        }
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameTable;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_kind_inference() {
        assert_eq!(VariableKind::infer("10"), VariableKind::Integer(10));
        assert_eq!(VariableKind::infer("-7"), VariableKind::Integer(-7));
        assert_eq!(
            VariableKind::infer("10.23"),
            VariableKind::Float {
                value: 10.23,
                decimals: 2
            }
        );
        assert_eq!(VariableKind::infer("Mary"), VariableKind::Name);
        assert_eq!(VariableKind::infer("1."), VariableKind::Name);
        assert_eq!(VariableKind::infer(".5"), VariableKind::Name);
        assert_eq!(VariableKind::infer("99999999999999999999"), VariableKind::Name);
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(integer_range(1000), (500, 2000));
        assert_eq!(integer_range(101), (50, 202));
        assert_eq!(integer_range(100), (0, 200));
        assert_eq!(integer_range(1), (0, 2));
        assert_eq!(integer_range(0), (-50, 50));
        assert_eq!(integer_range(-99), (-198, 0));
        assert_eq!(integer_range(-100), (-200, -50));
        assert_eq!(integer_range(-1000), (-2000, -500));
        assert_eq!(integer_range(-1001), (-2002, -500));
    }

    #[test]
    fn test_integer_range_saturates() {
        let (low, high) = integer_range(i64::MAX);
        assert!(low <= high);
        let (low, high) = integer_range(i64::MIN);
        assert!(low <= high);
    }

    #[test]
    fn test_float_ranges() {
        assert_eq!(float_range(10.23), (0.0, 20.46));
        assert_eq!(float_range(0.0), (-50.0, 50.0));
        assert_eq!(float_range(201.5), (100.0, 403.0));
        assert_eq!(float_range(-201.5), (-403.0, -100.0));
    }

    #[test]
    fn test_format_truncated() {
        assert_eq!(format_truncated(3.14159, 2), "3.14");
        assert_eq!(format_truncated(3.0, 2), "3.00");
        assert_eq!(format_truncated(3.999, 1), "3.9");
    }

    #[test]
    fn test_resolve_without_randomize_is_default() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut variable = Variable::new("11");
        assert_eq!(variable.resolve(false, &mut rng, &NameTable), "11");
        assert!(variable.random_value().is_none());
    }

    #[test]
    fn test_random_value_is_memoized() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut variable = Variable::new("1000");
        let first = variable.resolve(true, &mut rng, &NameTable);
        for _ in 0..10 {
            assert_eq!(variable.resolve(true, &mut rng, &NameTable), first);
        }
        let value: i64 = first.parse().unwrap();
        assert!((500..=2000).contains(&value));
    }

    #[test]
    fn test_float_keeps_decimal_count() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let mut variable = Variable::new("10.23");
            let value = variable.resolve(true, &mut rng, &NameTable);
            let (_, fraction) = value.split_once('.').unwrap();
            assert_eq!(fraction.len(), 2, "{value}");
            let number: f64 = value.parse().unwrap();
            assert!((0.0..=20.46).contains(&number), "{value}");
        }
    }

    #[test]
    fn test_preloaded_value() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut variable = Variable::with_value("5", "42");
        assert_eq!(variable.resolve(true, &mut rng, &NameTable), "42");
        assert_eq!(variable.resolve(false, &mut rng, &NameTable), "5");
    }

    #[test]
    fn test_scope_reuses_variables() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scope = Scope::new();
        let first = scope.variable("11").resolve(true, &mut rng, &NameTable);
        let second = scope.variable("11").resolve(true, &mut rng, &NameTable);
        assert_eq!(first, second);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_scope_clone_is_independent() {
        let mut rng = StdRng::seed_from_u64(11);
        let parent = Scope::new();
        let mut branch = parent.clone();
        branch.variable("11").resolve(true, &mut rng, &NameTable);
        assert!(parent.is_empty());
        assert_eq!(branch.len(), 1);
    }
}
