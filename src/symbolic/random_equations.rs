//! Random generator of systems of nonlinear ODE right-hand sides.
//!
//! Every equation is a sum of addends, every addend is a product over the state variables
//! of nonlinearities applied to them:
//!
//! f_i = sum_a  prod_j  nl_p(y_j) * nl_q(y_j) * ...
//!
//! The structure keeps palette indices only, the functions themselves are resolved
//! at evaluation or rendering time.
use crate::symbolic::equations_error::EquationsError;
use crate::symbolic::nonlinearities::{Palette, latex_subscript};
use crate::symbolic::prng_key::PRNGKey;
use itertools::Itertools;
use log::{debug, info};
use std::collections::BTreeMap;

pub const DEFAULT_SEED: u64 = 42;

/// content of one variable position inside an addend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// variable absent from the addend (multiplied by 1)
    Identity,
    /// nonlinearities (palette indices, draw order) applied to the variable and multiplied
    Applied(Vec<usize>),
}

impl Slot {
    pub fn is_identity(&self) -> bool {
        matches!(self, Slot::Identity)
    }

    pub fn non_lins(&self) -> &[usize] {
        match self {
            Slot::Identity => &[],
            Slot::Applied(idxs) => idxs,
        }
    }
}

/// one addend of an equation, exactly one slot per state variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    slots: Vec<Slot>,
}

impl Term {
    pub fn identity(n_vars: usize) -> Term {
        Term {
            slots: vec![Slot::Identity; n_vars],
        }
    }

    pub fn from_slots(slots: Vec<Slot>) -> Term {
        Term { slots }
    }

    /// Group (nonlinearity, variable) pairs by variable: every variable that was drawn gets
    /// the nonlinearities paired with it, in draw order; the rest stay identity.
    pub fn from_pairs(
        n_vars: usize,
        non_lins_idxs: &[usize],
        var_idxs: &[usize],
    ) -> Result<Term, EquationsError> {
        if non_lins_idxs.len() != var_idxs.len() {
            return Err(EquationsError::Configuration(format!(
                "{} nonlinearity indices but {} variable indices",
                non_lins_idxs.len(),
                var_idxs.len()
            )));
        }
        if let Some(&var) = var_idxs.iter().find(|&&var| var >= n_vars) {
            return Err(EquationsError::Configuration(format!(
                "variable index {} out of range for {} variables",
                var, n_vars
            )));
        }
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (&nl, &var) in non_lins_idxs.iter().zip(var_idxs) {
            groups.entry(var).or_default().push(nl);
        }
        let mut term = Term::identity(n_vars);
        for (var, nls) in groups {
            term.slots[var] = Slot::Applied(nls);
        }
        Ok(term)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn n_vars(&self) -> usize {
        self.slots.len()
    }

    /// indices of non-identity slots
    pub fn active_variables(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_identity())
            .map(|(j, _)| j)
            .collect()
    }

    /// number of nonlinearities applied over all slots
    pub fn n_applied(&self) -> usize {
        self.slots.iter().map(|slot| slot.non_lins().len()).sum()
    }

    /// all-identity addend, i.e. the constant 1
    pub fn is_constant(&self) -> bool {
        self.slots.iter().all(Slot::is_identity)
    }

    /// e.g. "sin(y_1)cos(y_1)exp(y_3)"; variables go in ascending order
    pub fn sym_addend(&self, palette: &Palette) -> String {
        self.slots
            .iter()
            .enumerate()
            .flat_map(|(j, slot)| {
                slot.non_lins()
                    .iter()
                    .map(move |&k| format!("{}(y_{})", palette[k].name, latex_subscript(j + 1)))
            })
            .join("")
    }
}

pub type Equation = Vec<Term>;

/// "f_i = a + b + ..." for the equation with zero-based index `i`
pub fn sym_equation(i: usize, equation: &[Term], palette: &Palette) -> String {
    format!(
        "f_{} = {}",
        latex_subscript(i + 1),
        equation.iter().map(|term| term.sym_addend(palette)).join(" + ")
    )
}

/// generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub n_vars: usize,
    pub n_eqs: usize,
    /// inclusive upper bound of addends per equation
    pub max_sum_terms: usize,
    /// inclusive upper bound of nonlinearities drawn per addend
    pub max_mult_terms: usize,
    pub seed: u64,
}

impl GeneratorConfig {
    pub fn new(
        n_vars: usize,
        n_eqs: usize,
        max_sum_terms: usize,
        max_mult_terms: usize,
        seed: Option<u64>,
    ) -> GeneratorConfig {
        GeneratorConfig {
            n_vars,
            n_eqs,
            max_sum_terms,
            max_mult_terms,
            seed: seed.unwrap_or(DEFAULT_SEED),
        }
    }

    pub fn validate(&self) -> Result<(), EquationsError> {
        let checks = [
            (self.n_vars, "n_vars"),
            (self.n_eqs, "n_eqs"),
            (self.max_sum_terms, "max_sum_terms"),
            (self.max_mult_terms, "max_mult_terms"),
        ];
        for (value, name) in checks {
            if value < 1 {
                return Err(EquationsError::Configuration(format!(
                    "{} must be at least 1, got {}",
                    name, value
                )));
            }
        }
        // the draws take half-open ranges [1, bound + 1)
        for (value, name) in [
            (self.max_sum_terms, "max_sum_terms"),
            (self.max_mult_terms, "max_mult_terms"),
        ] {
            if value.checked_add(1).is_none() {
                return Err(EquationsError::Configuration(format!(
                    "{} must be below {}, got {}",
                    name,
                    usize::MAX,
                    value
                )));
            }
        }
        Ok(())
    }
}

/// Generate the equation structures and their symbolic strings.
///
/// Addend counts of all equations are drawn at once with the root key. After that the key is
/// split exactly once per addend, and the single subkey drives all three draws of the addend
/// (number of multiplicands, nonlinearity indices, variable indices). Reusing the subkey
/// correlates those draws; it is kept that way so that a seed always yields the same systems.
pub fn generate(
    config: &GeneratorConfig,
    palette: &Palette,
) -> Result<(Vec<Equation>, Vec<String>), EquationsError> {
    config.validate()?;
    if palette.is_empty() {
        return Err(EquationsError::Configuration(
            "palette of nonlinearities is empty".to_string(),
        ));
    }
    let GeneratorConfig {
        n_vars,
        n_eqs,
        max_sum_terms,
        max_mult_terms,
        seed,
    } = *config;

    let mut key = PRNGKey::new(seed);
    let n_sum_terms = key.randint(n_eqs, 1, max_sum_terms + 1);

    let mut equations: Vec<Equation> = Vec::with_capacity(n_eqs);
    let mut sym_expr: Vec<String> = Vec::with_capacity(n_eqs);
    for (i, &n_addends) in n_sum_terms.iter().enumerate() {
        let mut equation: Equation = Vec::with_capacity(n_addends);
        for _ in 0..n_addends {
            let (next_key, subkey) = key.split();
            key = next_key;
            let n_mult_terms = subkey.randint(1, 1, max_mult_terms + 1)[0];
            let non_lins_idxs = subkey.randint(n_mult_terms, 0, palette.len());
            let var_idxs = subkey.randint(n_mult_terms, 0, n_vars);

            equation.push(Term::from_pairs(n_vars, &non_lins_idxs, &var_idxs)?);
        }
        let sym_eq = sym_equation(i, &equation, palette);
        debug!("equation {} of {}: {}", i + 1, n_eqs, sym_eq);
        equations.push(equation);
        sym_expr.push(sym_eq);
    }
    info!(
        "generated {} equations in {} variables with seed {}",
        n_eqs, n_vars, seed
    );
    Ok((equations, sym_expr))
}

/// Generated system: equation structures paired 1:1 with their symbolic strings.
/// Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Equations {
    config: GeneratorConfig,
    palette: Palette,
    equations: Vec<Equation>,
    sym_expr: Vec<String>,
}

impl Equations {
    /// ```
    /// use RustedODEgen::symbolic::nonlinearities::Palette;
    /// use RustedODEgen::symbolic::random_equations::Equations;
    /// let palette = Palette::new(vec![f64::sin, f64::cos], Some(vec!["sin".into(), "cos".into()])).unwrap();
    /// let eqs = Equations::new(3, 2, 3, 2, palette, None).unwrap();
    /// let (terms, sym) = eqs.get(0).unwrap();
    /// assert!(sym.starts_with("f_1 = "));
    /// assert!(terms.iter().all(|term| term.n_vars() == 3));
    /// let rhs = eqs.evaluate(0.0, &[0.1, 0.2, 0.3]).unwrap();
    /// assert_eq!(rhs.len(), 2);
    /// ```
    pub fn new(
        n_vars: usize,
        n_eqs: usize,
        max_sum_terms: usize,
        max_mult_terms: usize,
        palette: Palette,
        seed: Option<u64>,
    ) -> Result<Equations, EquationsError> {
        let config = GeneratorConfig::new(n_vars, n_eqs, max_sum_terms, max_mult_terms, seed);
        Equations::from_config(config, palette)
    }

    pub fn from_config(config: GeneratorConfig, palette: Palette) -> Result<Equations, EquationsError> {
        let (equations, sym_expr) = generate(&config, &palette)?;
        Ok(Equations {
            config,
            palette,
            equations,
            sym_expr,
        })
    }

    /// Assemble a system from hand-made structures. All structural invariants are checked;
    /// strings are regenerated from the structures when `sym_expr` is None.
    pub fn from_parts(
        config: GeneratorConfig,
        palette: Palette,
        equations: Vec<Equation>,
        sym_expr: Option<Vec<String>>,
    ) -> Result<Equations, EquationsError> {
        config.validate()?;
        if equations.len() != config.n_eqs {
            return Err(EquationsError::Configuration(format!(
                "expected {} equations, got {}",
                config.n_eqs,
                equations.len()
            )));
        }
        for (i, equation) in equations.iter().enumerate() {
            if equation.is_empty() || equation.len() > config.max_sum_terms {
                return Err(EquationsError::Configuration(format!(
                    "equation {} has {} addends, allowed 1..={}",
                    i + 1,
                    equation.len(),
                    config.max_sum_terms
                )));
            }
            for term in equation {
                if term.n_vars() != config.n_vars {
                    return Err(EquationsError::Configuration(format!(
                        "addend of equation {} has {} slots instead of {}",
                        i + 1,
                        term.n_vars(),
                        config.n_vars
                    )));
                }
                if term.n_applied() > config.max_mult_terms {
                    return Err(EquationsError::Configuration(format!(
                        "addend of equation {} applies {} nonlinearities, allowed at most {}",
                        i + 1,
                        term.n_applied(),
                        config.max_mult_terms
                    )));
                }
                for slot in term.slots() {
                    if let Slot::Applied(idxs) = slot {
                        if idxs.is_empty() || idxs.iter().any(|&k| k >= palette.len()) {
                            return Err(EquationsError::Configuration(format!(
                                "invalid nonlinearity indices {:?} in equation {}",
                                idxs,
                                i + 1
                            )));
                        }
                    }
                }
            }
        }
        let sym_expr = match sym_expr {
            Some(sym_expr) => {
                if sym_expr.len() != equations.len() {
                    return Err(EquationsError::Configuration(format!(
                        "{} equations but {} symbolic expressions",
                        equations.len(),
                        sym_expr.len()
                    )));
                }
                sym_expr
            }
            None => equations
                .iter()
                .enumerate()
                .map(|(i, eq)| sym_equation(i, eq, &palette))
                .collect(),
        };
        Ok(Equations {
            config,
            palette,
            equations,
            sym_expr,
        })
    }

    /// (addends of the idx-th equation, its symbolic string)
    pub fn get(&self, idx: usize) -> Option<(&[Term], &str)> {
        match (self.equations.get(idx), self.sym_expr.get(idx)) {
            (Some(eq), Some(sym)) => Some((eq.as_slice(), sym.as_str())),
            _ => None,
        }
    }

    pub fn equation(&self, idx: usize) -> Option<&[Term]> {
        self.equations.get(idx).map(|eq| eq.as_slice())
    }

    pub fn symbolic(&self, idx: usize) -> Option<&str> {
        self.sym_expr.get(idx).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[Term], &str)> {
        self.equations
            .iter()
            .zip(self.sym_expr.iter())
            .map(|(eq, sym)| (eq.as_slice(), sym.as_str()))
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn sym_expr(&self) -> &[String] {
        &self.sym_expr
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn n_vars(&self) -> usize {
        self.config.n_vars
    }

    pub fn n_eqs(&self) -> usize {
        self.config.n_eqs
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }
}
