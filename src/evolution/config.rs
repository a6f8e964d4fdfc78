//! Environment configuration.
//!
//! [`EnvironmentConfig`] holds every parameter of the evolutionary loop. It
//! can be assembled with the `with_*` builders or read from a key/value
//! object with `EnvironmentConfig::from_value` (requires the `serde`
//! feature).

#[cfg(feature = "serde")]
use serde_json::{Map, Value};

#[cfg(feature = "serde")]
use reader::{as_bool, as_f64, as_name, as_u32, as_u64, as_usize, optional, required};

use super::crossover::CrossoverFunction;
use super::fitness::FitnessFunction;
use super::selection::SelectionFunction;
use super::types::GenomeKind;
use crate::codec::{MAX_INPUTS, VALUE_MAX_LIMIT};
use crate::error::{Result, SymregError};
use crate::grammar::GeneSampler;

/// Configuration for the symbolic regression environment.
///
/// # Defaults
///
/// ```
/// use u_symreg::evolution::EnvironmentConfig;
///
/// let config = EnvironmentConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_symreg::evolution::{EnvironmentConfig, GenomeKind, SelectionFunction};
///
/// let config = EnvironmentConfig::default()
///     .with_population_size(50)
///     .with_genome_kind(GenomeKind::Grammar)
///     .with_selection_function(SelectionFunction::Roulette)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentConfig {
    /// Individuals per generation.
    pub population_size: usize,

    /// Attempts allowed to build or mutate a valid genome before failing.
    pub validity_attempts: usize,

    /// Fixed genome length.
    pub individual_size: usize,

    /// Bound on constant magnitude. Also the codec clamp.
    pub numerical_value_max: f64,

    /// Maximum number of targets of a tree `Sum` node (≥ 2).
    pub targets_max: usize,

    pub fitness_function: FitnessFunction,

    pub selection_function: SelectionFunction,

    /// Individuals per selection block.
    pub selection_group_size: usize,

    /// Number of selections performed per epoch.
    pub selection_population_size: usize,

    /// Best individuals copied unchanged into the next generation.
    pub elitism_size: usize,

    pub crossover_function: CrossoverFunction,

    /// Probability of a target/value mutation when no type mutation applied.
    ///
    /// Tree genomes also use it as the per-target resampling probability.
    pub mutation_target_probability: f64,

    /// Probability of a structural mutation.
    pub mutation_type_probability: f64,

    /// Upper bound of the random factor applied to mutated constants.
    pub mutation_constants_factor_max: f64,

    /// Decimals kept on generated constants (≤ 6).
    pub precision: u32,

    /// Which genome implementation populates the environment.
    pub genome_kind: GenomeKind,

    /// Inputs per sample available to grammar genomes (1–10).
    pub input_size: usize,

    /// Capacity of the evaluator's operator memo. `0` disables it.
    pub cache_capacity: usize,

    /// Whether fitness is evaluated on the rayon pool.
    ///
    /// Only honored when the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            validity_attempts: 100,
            individual_size: 10,
            numerical_value_max: 10.0,
            targets_max: 3,
            fitness_function: FitnessFunction::default(),
            selection_function: SelectionFunction::default(),
            selection_group_size: 3,
            selection_population_size: 100,
            elitism_size: 5,
            crossover_function: CrossoverFunction::default(),
            mutation_target_probability: 0.1,
            mutation_type_probability: 0.1,
            mutation_constants_factor_max: 2.0,
            precision: 4,
            genome_kind: GenomeKind::default(),
            input_size: 1,
            cache_capacity: 1024,
            parallel: false,
            seed: None,
        }
    }
}

impl EnvironmentConfig {
    /// Reads a configuration from a key/value object.
    ///
    /// Numbers may be JSON numbers or numeric strings. Function names are
    /// upper-cased, trimmed and have spaces replaced by underscores before
    /// matching. The result is validated.
    ///
    /// ```
    /// # #[cfg(feature = "serde")]
    /// # {
    /// use u_symreg::evolution::{EnvironmentConfig, FitnessFunction};
    /// use serde_json::json;
    ///
    /// let config = EnvironmentConfig::from_value(&json!({
    ///     "population_size": 20,
    ///     "validity_attempts": "50",
    ///     "individual_size": 6,
    ///     "numerical_value_max": 5.0,
    ///     "targets_max": 3,
    ///     "fitness_function": "root mean squared error",
    ///     "selection_function": "tournament",
    ///     "selection_group_size": 3,
    ///     "selection_population_size": 20,
    ///     "elitism_size": 2,
    ///     "crossover_function": "random reproduction",
    ///     "mutation_target_probability": 0.2,
    ///     "mutation_type_probability": 0.1,
    ///     "mutation_constants_factor_max": 1.5,
    ///     "precision": 3
    /// }))
    /// .unwrap();
    /// assert_eq!(config.fitness_function, FitnessFunction::Rmse);
    /// # }
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SymregError::config("configuration", "expected a key/value object"))?;
        let defaults = Self::default();

        let config = Self {
            population_size: required(map, "population_size", as_usize)?,
            validity_attempts: required(map, "validity_attempts", as_usize)?,
            individual_size: required(map, "individual_size", as_usize)?,
            numerical_value_max: required(map, "numerical_value_max", as_f64)?,
            targets_max: required(map, "targets_max", as_usize)?,
            fitness_function: required(map, "fitness_function", as_name)?.parse()?,
            selection_function: required(map, "selection_function", as_name)?.parse()?,
            selection_group_size: required(map, "selection_group_size", as_usize)?,
            selection_population_size: required(map, "selection_population_size", as_usize)?,
            elitism_size: required(map, "elitism_size", as_usize)?,
            crossover_function: required(map, "crossover_function", as_name)?.parse()?,
            mutation_target_probability: required(map, "mutation_target_probability", as_f64)?,
            mutation_type_probability: required(map, "mutation_type_probability", as_f64)?,
            mutation_constants_factor_max: required(map, "mutation_constants_factor_max", as_f64)?,
            precision: required(map, "precision", as_u32)?,
            genome_kind: match optional(map, "genome_kind", as_name)? {
                Some(name) => name.parse()?,
                None => defaults.genome_kind,
            },
            input_size: optional(map, "input_size", as_usize)?.unwrap_or(defaults.input_size),
            cache_capacity: optional(map, "cache_capacity", as_usize)?
                .unwrap_or(defaults.cache_capacity),
            parallel: optional(map, "parallel", as_bool)?.unwrap_or(defaults.parallel),
            seed: optional(map, "seed", as_u64)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the validity-repair attempt budget.
    pub fn with_validity_attempts(mut self, n: usize) -> Self {
        self.validity_attempts = n;
        self
    }

    /// Sets the genome length.
    pub fn with_individual_size(mut self, n: usize) -> Self {
        self.individual_size = n;
        self
    }

    /// Sets the constant magnitude bound (also the codec clamp).
    pub fn with_numerical_value_max(mut self, max: f64) -> Self {
        self.numerical_value_max = max;
        self
    }

    /// Sets the maximum arity of a tree `Sum` node.
    pub fn with_targets_max(mut self, n: usize) -> Self {
        self.targets_max = n;
        self
    }

    /// Sets the error reduction.
    pub fn with_fitness_function(mut self, f: FitnessFunction) -> Self {
        self.fitness_function = f;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection_function(mut self, f: SelectionFunction) -> Self {
        self.selection_function = f;
        self
    }

    /// Sets the selection block size.
    pub fn with_selection_group_size(mut self, n: usize) -> Self {
        self.selection_group_size = n;
        self
    }

    /// Sets how many selections each epoch performs.
    pub fn with_selection_population_size(mut self, n: usize) -> Self {
        self.selection_population_size = n;
        self
    }

    /// Sets how many of the fittest individuals are carried over unchanged.
    pub fn with_elitism_size(mut self, n: usize) -> Self {
        self.elitism_size = n;
        self
    }

    /// Sets the breeding strategy.
    pub fn with_crossover_function(mut self, f: CrossoverFunction) -> Self {
        self.crossover_function = f;
        self
    }

    /// Sets the target mutation probability.
    pub fn with_mutation_target_probability(mut self, p: f64) -> Self {
        self.mutation_target_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the type mutation probability.
    pub fn with_mutation_type_probability(mut self, p: f64) -> Self {
        self.mutation_type_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the constant perturbation bound (negative values become 0).
    pub fn with_mutation_constants_factor_max(mut self, factor: f64) -> Self {
        self.mutation_constants_factor_max = factor.max(0.0);
        self
    }

    /// Sets the decimals kept on generated constants.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the genome implementation.
    pub fn with_genome_kind(mut self, kind: GenomeKind) -> Self {
        self.genome_kind = kind;
        self
    }

    /// Sets the number of inputs per sample.
    pub fn with_input_size(mut self, n: usize) -> Self {
        self.input_size = n;
        self
    }

    /// Sets the operator memo capacity (0 disables it).
    pub fn with_cache_capacity(mut self, n: usize) -> Self {
        self.cache_capacity = n;
        self
    }

    /// Sets whether fitness is evaluated in parallel (`parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sampler for terminal genes of grammar genomes.
    pub fn gene_sampler(&self) -> GeneSampler {
        GeneSampler::new(self.input_size, self.numerical_value_max, self.precision)
    }

    /// Validates the configuration for its own `genome_kind`.
    ///
    /// Returns [`SymregError::Configuration`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.validate_for(self.genome_kind)
    }

    /// Validates the configuration for genomes of `kind`.
    ///
    /// Statically typed environments pass the kind of their genome type, so
    /// an `Environment<Genotype>` is not held to the tree size floor.
    pub fn validate_for(&self, kind: GenomeKind) -> Result<()> {
        let positive = [
            ("population_size", self.population_size),
            ("validity_attempts", self.validity_attempts),
            ("individual_size", self.individual_size),
            ("selection_group_size", self.selection_group_size),
            ("selection_population_size", self.selection_population_size),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(SymregError::config(key, "must be at least 1"));
            }
        }
        if self.targets_max < 2 {
            return Err(SymregError::config("targets_max", "must be at least 2"));
        }
        if self.elitism_size > self.population_size {
            return Err(SymregError::config(
                "elitism_size",
                format!(
                    "{} exceeds population_size {}",
                    self.elitism_size, self.population_size
                ),
            ));
        }
        for (key, p) in [
            ("mutation_target_probability", self.mutation_target_probability),
            ("mutation_type_probability", self.mutation_type_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SymregError::config(key, format!("{p} is not within [0, 1]")));
            }
        }
        if !(self.mutation_constants_factor_max >= 0.0
            && self.mutation_constants_factor_max.is_finite())
        {
            return Err(SymregError::config(
                "mutation_constants_factor_max",
                "must be finite and non-negative",
            ));
        }
        if !(self.numerical_value_max > 0.0 && self.numerical_value_max <= VALUE_MAX_LIMIT) {
            return Err(SymregError::config(
                "numerical_value_max",
                format!("must be in (0, {VALUE_MAX_LIMIT:e}]"),
            ));
        }
        if self.precision > 6 {
            return Err(SymregError::config("precision", "at most 6 decimals are encodable"));
        }
        if !(1..=MAX_INPUTS).contains(&self.input_size) {
            return Err(SymregError::config(
                "input_size",
                format!("must be within 1..={MAX_INPUTS}"),
            ));
        }
        if kind == GenomeKind::Tree && self.individual_size < 3 {
            return Err(SymregError::config(
                "individual_size",
                "tree genomes need at least 3 nodes",
            ));
        }
        Ok(())
    }
}

/// Upper-cases, trims and replaces spaces with underscores.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase().replace(' ', "_")
}

// ---- key/value readers ----

#[cfg(feature = "serde")]
mod reader {
    use super::*;

    pub(super) fn required<T>(
        map: &Map<String, Value>,
        key: &str,
        read: fn(&str, &Value) -> Result<T>,
    ) -> Result<T> {
        optional(map, key, read)?.ok_or_else(|| SymregError::config(key, "missing required key"))
    }

    pub(super) fn optional<T>(
        map: &Map<String, Value>,
        key: &str,
        read: fn(&str, &Value) -> Result<T>,
    ) -> Result<Option<T>> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => read(key, value).map(Some),
        }
    }

    pub(super) fn as_f64(key: &str, value: &Value) -> Result<f64> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| SymregError::config(key, format!("expected a number, got {value}")))
    }

    pub(super) fn as_u64(key: &str, value: &Value) -> Result<u64> {
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            SymregError::config(key, format!("expected a non-negative integer, got {value}"))
        })
    }

    pub(super) fn as_usize(key: &str, value: &Value) -> Result<usize> {
        // Integral floats such as `10.0` are accepted.
        let x = as_f64(key, value)?;
        if x < 0.0 || x.fract() != 0.0 || x > usize::MAX as f64 {
            return Err(SymregError::config(
                key,
                format!("expected a non-negative integer, got {value}"),
            ));
        }
        Ok(x as usize)
    }

    pub(super) fn as_u32(key: &str, value: &Value) -> Result<u32> {
        let x = as_usize(key, value)?;
        u32::try_from(x).map_err(|_| SymregError::config(key, format!("{x} is too large")))
    }

    pub(super) fn as_bool(key: &str, value: &Value) -> Result<bool> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match normalize_name(s).as_str() {
                "TRUE" => Ok(true),
                "FALSE" => Ok(false),
                _ => Err(SymregError::config(key, format!("expected a boolean, got {s:?}"))),
            },
            other => Err(SymregError::config(key, format!("expected a boolean, got {other}"))),
        }
    }

    pub(super) fn as_name(key: &str, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(normalize_name(s)),
            other => Err(SymregError::config(key, format!("expected a name, got {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.validity_attempts, 100);
        assert_eq!(config.individual_size, 10);
        assert_eq!(config.targets_max, 3);
        assert_eq!(config.fitness_function, FitnessFunction::Mse);
        assert_eq!(config.selection_function, SelectionFunction::Tournament);
        assert_eq!(config.crossover_function, CrossoverFunction::RandomReproduction);
        assert_eq!(config.genome_kind, GenomeKind::Tree);
        assert_eq!(config.input_size, 1);
        assert_eq!(config.cache_capacity, 1024);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EnvironmentConfig::default()
            .with_population_size(20)
            .with_validity_attempts(7)
            .with_individual_size(12)
            .with_numerical_value_max(2.0)
            .with_targets_max(5)
            .with_fitness_function(FitnessFunction::Rmse)
            .with_selection_function(SelectionFunction::Roulette)
            .with_selection_group_size(4)
            .with_selection_population_size(16)
            .with_elitism_size(2)
            .with_precision(5)
            .with_genome_kind(GenomeKind::Grammar)
            .with_input_size(3)
            .with_cache_capacity(0)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 20);
        assert_eq!(config.validity_attempts, 7);
        assert_eq!(config.individual_size, 12);
        assert_eq!(config.targets_max, 5);
        assert_eq!(config.fitness_function, FitnessFunction::Rmse);
        assert_eq!(config.selection_function, SelectionFunction::Roulette);
        assert_eq!(config.selection_group_size, 4);
        assert_eq!(config.selection_population_size, 16);
        assert_eq!(config.elitism_size, 2);
        assert_eq!(config.precision, 5);
        assert_eq!(config.genome_kind, GenomeKind::Grammar);
        assert_eq!(config.input_size, 3);
        assert_eq!(config.cache_capacity, 0);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_probabilities() {
        let config = EnvironmentConfig::default()
            .with_mutation_target_probability(1.5)
            .with_mutation_type_probability(-0.5)
            .with_mutation_constants_factor_max(-2.0);
        assert!((config.mutation_target_probability - 1.0).abs() < 1e-12);
        assert!(config.mutation_type_probability.abs() < 1e-12);
        assert!(config.mutation_constants_factor_max.abs() < 1e-12);
    }

    // ---- from_value ----

    #[cfg(feature = "serde")]
    mod from_value {
        use super::*;
        use serde_json::json;

        fn full() -> Value {
            json!({
                "population_size": 30,
                "validity_attempts": 40,
                "individual_size": 7,
                "numerical_value_max": 3.5,
                "targets_max": 4,
                "fitness_function": "MSE",
                "selection_function": "ROULETTE",
                "selection_group_size": 5,
                "selection_population_size": 25,
                "elitism_size": 3,
                "crossover_function": "RANDOM_REPRODUCTION",
                "mutation_target_probability": 0.25,
                "mutation_type_probability": 0.5,
                "mutation_constants_factor_max": 1.25,
                "precision": 2
            })
        }

        fn with(key: &str, value: Value) -> Value {
            let mut v = full();
            v[key] = value;
            v
        }

        #[test]
        fn test_from_value_full() {
            let config = EnvironmentConfig::from_value(&full()).unwrap();
            assert_eq!(config.population_size, 30);
            assert_eq!(config.validity_attempts, 40);
            assert_eq!(config.individual_size, 7);
            assert!((config.numerical_value_max - 3.5).abs() < 1e-12);
            assert_eq!(config.selection_function, SelectionFunction::Roulette);
            assert_eq!(config.selection_population_size, 25);
            assert_eq!(config.precision, 2);
            // Optional keys fall back to defaults.
            assert_eq!(config.genome_kind, GenomeKind::Tree);
            assert_eq!(config.input_size, 1);
            assert_eq!(config.cache_capacity, 1024);
            assert!(config.seed.is_none());
        }

        #[test]
        fn test_from_value_numeric_strings_and_aliases() {
            let mut v = full();
            v["population_size"] = json!("30");
            v["numerical_value_max"] = json!(" 2.5 ");
            v["individual_size"] = json!(7.0);
            v["fitness_function"] = json!(" root mean squared deviation ");
            v["selection_function"] = json!("Tournament Selection");
            v["crossover_function"] = json!("reproduction");
            v["genome_kind"] = json!("grammar");
            v["input_size"] = json!(2);
            v["parallel"] = json!("true");
            v["seed"] = json!(7);
            let config = EnvironmentConfig::from_value(&v).unwrap();
            assert_eq!(config.population_size, 30);
            assert!((config.numerical_value_max - 2.5).abs() < 1e-12);
            assert_eq!(config.individual_size, 7);
            assert_eq!(config.fitness_function, FitnessFunction::Rmse);
            assert_eq!(config.selection_function, SelectionFunction::Tournament);
            assert_eq!(config.crossover_function, CrossoverFunction::RandomReproduction);
            assert_eq!(config.genome_kind, GenomeKind::Grammar);
            assert_eq!(config.input_size, 2);
            assert!(config.parallel);
            assert_eq!(config.seed, Some(7));
        }

        #[test]
        fn test_from_value_missing_key() {
            let mut v = full();
            v.as_object_mut().unwrap().remove("targets_max");
            assert!(matches!(
                EnvironmentConfig::from_value(&v),
                Err(SymregError::Configuration { key, .. }) if key == "targets_max"
            ));
        }

        #[test]
        fn test_from_value_bad_values() {
            for (key, value) in [
                ("population_size", json!(-1)),
                ("population_size", json!(2.5)),
                ("population_size", json!("many")),
                ("numerical_value_max", json!(true)),
                ("precision", json!(7)),
                ("elitism_size", json!(31)),
                ("mutation_type_probability", json!(1.5)),
            ] {
                assert!(
                    matches!(
                        EnvironmentConfig::from_value(&with(key, value.clone())),
                        Err(SymregError::Configuration { key: k, .. }) if k == key
                    ),
                    "{key} = {value} should be rejected"
                );
            }
            assert!(EnvironmentConfig::from_value(&json!([1, 2])).is_err());
        }

        #[test]
        fn test_from_value_unknown_names() {
            assert!(matches!(
                EnvironmentConfig::from_value(&with("fitness_function", json!("MAE"))),
                Err(SymregError::UnknownFitnessFunction(name)) if name == "MAE"
            ));
            assert!(matches!(
                EnvironmentConfig::from_value(&with("selection_function", json!("rank"))),
                Err(SymregError::UnknownSelectionFunction(name)) if name == "RANK"
            ));
            assert!(matches!(
                EnvironmentConfig::from_value(&with("crossover_function", json!("blend"))),
                Err(SymregError::UnknownCrossoverFunction(_))
            ));
            assert!(matches!(
                EnvironmentConfig::from_value(&with("genome_kind", json!("graph"))),
                Err(SymregError::UnknownGenomeKind(_))
            ));
        }
    }

    // ---- validate ----

    #[test]
    fn test_validate_rejects() {
        let base = EnvironmentConfig::default();
        let cases = [
            ("population_size", base.clone().with_population_size(0)),
            ("validity_attempts", base.clone().with_validity_attempts(0)),
            ("individual_size", base.clone().with_individual_size(0)),
            ("targets_max", base.clone().with_targets_max(1)),
            ("elitism_size", base.clone().with_elitism_size(101)),
            ("numerical_value_max", base.clone().with_numerical_value_max(0.0)),
            ("numerical_value_max", base.clone().with_numerical_value_max(1e13)),
            ("precision", base.clone().with_precision(7)),
            ("input_size", base.clone().with_input_size(11)),
            ("input_size", base.clone().with_input_size(0)),
            ("individual_size", base.clone().with_individual_size(2)),
        ];
        for (key, config) in cases {
            assert!(
                matches!(
                    config.validate(),
                    Err(SymregError::Configuration { key: ref k, .. }) if k == key
                ),
                "expected {key} to be rejected"
            );
        }
    }

    #[test]
    fn test_small_grammar_genomes_allowed() {
        let config = EnvironmentConfig::default()
            .with_genome_kind(GenomeKind::Grammar)
            .with_individual_size(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_for_uses_given_kind() {
        // The configured kind is Tree, but the size floor follows `kind`.
        let config = EnvironmentConfig::default().with_individual_size(2);
        assert!(config.validate_for(GenomeKind::Grammar).is_ok());
        assert!(matches!(
            config.validate_for(GenomeKind::Tree),
            Err(SymregError::Configuration { ref key, .. }) if key == "individual_size"
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  mean squared error "), "MEAN_SQUARED_ERROR");
        assert_eq!(normalize_name("Roulette"), "ROULETTE");
    }

    #[test]
    fn test_gene_sampler() {
        let sampler = EnvironmentConfig::default()
            .with_input_size(4)
            .with_numerical_value_max(2.0)
            .with_precision(3)
            .gene_sampler();
        assert_eq!(sampler.input_size, 4);
        assert!((sampler.numerical_value_max - 2.0).abs() < 1e-12);
        assert_eq!(sampler.precision, 3);
    }
}
