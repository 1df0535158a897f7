//! palette of unary nonlinearities f: R -> R used as building blocks of random equations
use crate::symbolic::equations_error::EquationsError;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

pub type NonLinFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
pub type DomainFn = Arc<dyn Fn(f64) -> bool + Send + Sync>;

/// LaTeX subscript: single digits stay bare (y_1), longer indices are braced (y_{12})
pub fn latex_subscript(i: usize) -> String {
    if i < 10 {
        i.to_string()
    } else {
        format!("{{{}}}", i)
    }
}

/// placeholder display name of the i-th (0-based) nonlinearity
pub fn placeholder_name(i: usize) -> String {
    format!("\\text{{nl}}_{}", latex_subscript(i + 1))
}

/// unary function together with its display name and optional domain predicate
#[derive(Clone)]
pub struct NonLinearity {
    pub func: NonLinFn,
    pub domain: Option<DomainFn>,
    pub name: String,
}

impl fmt::Debug for NonLinearity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NonLinearity")
            .field("name", &self.name)
            .field("has_domain", &self.domain.is_some())
            .finish()
    }
}

impl NonLinearity {
    pub fn new<F>(func: F, name: &str) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        NonLinearity {
            func: Arc::new(func),
            domain: None,
            name: name.to_string(),
        }
    }

    pub fn with_domain<D>(mut self, domain: D) -> Self
    where
        D: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.domain = Some(Arc::new(domain));
        self
    }

    /// Apply the function. The argument is checked against the domain predicate (if any),
    /// and a NaN produced from a non-NaN argument is reported as a domain violation too.
    pub fn apply(&self, x: f64) -> Result<f64, EquationsError> {
        if let Some(domain) = &self.domain {
            if !domain(x) {
                return Err(EquationsError::Domain(format!(
                    "{}({}) is outside of the function domain",
                    self.name, x
                )));
            }
        }
        let res = (self.func)(x);
        if res.is_nan() && !x.is_nan() {
            return Err(EquationsError::Domain(format!(
                "{}({}) is not a number",
                self.name, x
            )));
        }
        Ok(res)
    }
}

/// catalogue of commonly used nonlinearities, parseable from their names
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StandardNonLinearity {
    Sin,
    Cos,
    Tan,
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    Sqrt,
    Tanh,
    Sigmoid,
    Square,
    Cube,
    Abs,
    #[strum(to_string = "id", serialize = "identity")]
    Identity,
}

impl StandardNonLinearity {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            StandardNonLinearity::Sin => x.sin(),
            StandardNonLinearity::Cos => x.cos(),
            StandardNonLinearity::Tan => x.tan(),
            StandardNonLinearity::Exp => x.exp(),
            StandardNonLinearity::Ln => x.ln(),
            StandardNonLinearity::Sqrt => x.sqrt(),
            StandardNonLinearity::Tanh => x.tanh(),
            StandardNonLinearity::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            StandardNonLinearity::Square => x * x,
            StandardNonLinearity::Cube => x * x * x,
            StandardNonLinearity::Abs => x.abs(),
            StandardNonLinearity::Identity => x,
        }
    }

    pub fn to_nonlinearity(self) -> NonLinearity {
        let nl = NonLinearity::new(move |x| self.eval(x), &self.to_string());
        match self {
            StandardNonLinearity::Ln => nl.with_domain(|x| x > 0.0),
            StandardNonLinearity::Sqrt => nl.with_domain(|x| x >= 0.0),
            _ => nl,
        }
    }
}

/// Ordered, immutable set of nonlinearities. Equations store indices into it.
#[derive(Clone, Debug)]
pub struct Palette {
    non_lins: Vec<NonLinearity>,
}

impl Palette {
    /// Palette from plain functions. Without `sym_non_lins` the display names are
    /// \text{nl}_1 ... \text{nl}_K
    pub fn new(
        funcs: Vec<fn(f64) -> f64>,
        sym_non_lins: Option<Vec<String>>,
    ) -> Result<Palette, EquationsError> {
        let names = match sym_non_lins {
            Some(names) => {
                if names.len() != funcs.len() {
                    return Err(EquationsError::Configuration(format!(
                        "{} nonlinearities but {} symbolic names",
                        funcs.len(),
                        names.len()
                    )));
                }
                names
            }
            None => (0..funcs.len()).map(placeholder_name).collect(),
        };
        let non_lins = funcs
            .into_iter()
            .zip(names)
            .map(|(f, name)| NonLinearity::new(f, &name))
            .collect();
        Palette::from_nonlinearities(non_lins)
    }

    pub fn from_nonlinearities(non_lins: Vec<NonLinearity>) -> Result<Palette, EquationsError> {
        if non_lins.is_empty() {
            return Err(EquationsError::Configuration(
                "palette of nonlinearities is empty".to_string(),
            ));
        }
        Ok(Palette { non_lins })
    }

    pub fn from_standard(list: &[StandardNonLinearity]) -> Result<Palette, EquationsError> {
        Palette::from_nonlinearities(list.iter().map(|nl| nl.to_nonlinearity()).collect())
    }

    /// e.g. ["sin", "exp", "ln"]; `sym_non_lins` overrides the display names
    pub fn from_names(
        names: &[String],
        sym_non_lins: Option<Vec<String>>,
    ) -> Result<Palette, EquationsError> {
        let mut non_lins = Vec::with_capacity(names.len());
        for name in names {
            let standard = StandardNonLinearity::from_str(name.trim()).map_err(|_| {
                EquationsError::Configuration(format!("unknown nonlinearity '{}'", name))
            })?;
            non_lins.push(standard.to_nonlinearity());
        }
        if let Some(sym) = sym_non_lins {
            if sym.len() != non_lins.len() {
                return Err(EquationsError::Configuration(format!(
                    "{} nonlinearities but {} symbolic names",
                    non_lins.len(),
                    sym.len()
                )));
            }
            for (nl, s) in non_lins.iter_mut().zip(sym) {
                nl.name = s;
            }
        }
        Palette::from_nonlinearities(non_lins)
    }

    pub fn len(&self) -> usize {
        self.non_lins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.non_lins.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&NonLinearity> {
        self.non_lins.get(idx)
    }

    pub fn names(&self) -> Vec<&str> {
        self.non_lins.iter().map(|nl| nl.name.as_str()).collect()
    }

    pub fn apply(&self, idx: usize, x: f64) -> Result<f64, EquationsError> {
        match self.non_lins.get(idx) {
            Some(nl) => nl.apply(x),
            None => Err(EquationsError::Domain(format!(
                "nonlinearity index {} out of palette of size {}",
                idx,
                self.non_lins.len()
            ))),
        }
    }
}

impl Index<usize> for Palette {
    type Output = NonLinearity;
    fn index(&self, idx: usize) -> &NonLinearity {
        &self.non_lins[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_placeholder_names() {
        let palette = Palette::new(vec![f64::sin, f64::cos], None).unwrap();
        assert_eq!(palette.names(), vec!["\\text{nl}_1", "\\text{nl}_2"]);
        assert_eq!(placeholder_name(11), "\\text{nl}_{12}");
    }

    #[test]
    fn test_names_mismatch() {
        let res = Palette::new(vec![f64::sin], Some(vec!["sin".into(), "cos".into()]));
        assert!(matches!(res, Err(EquationsError::Configuration(_))));
    }

    #[test]
    fn test_empty_palette() {
        let res = Palette::new(vec![], None);
        assert!(matches!(res, Err(EquationsError::Configuration(_))));
        assert!(Palette::from_standard(&[]).is_err());
    }

    #[test]
    fn test_standard_from_names() {
        let names = vec!["sin".to_string(), "log".to_string(), "sqrt".to_string()];
        let palette = Palette::from_names(&names, None).unwrap();
        assert_eq!(palette.names(), vec!["sin", "ln", "sqrt"]);
        assert_relative_eq!(palette.apply(1, 1.0).unwrap(), 0.0);
        assert!(Palette::from_names(&["sinh".to_string()], None).is_err());
    }

    #[test]
    fn test_standard_catalogue_round_trip() {
        for nl in StandardNonLinearity::iter() {
            let parsed = StandardNonLinearity::from_str(&nl.to_string()).unwrap();
            assert_eq!(parsed, nl);
        }
    }

    #[test]
    fn test_domain_violations() {
        let ln = StandardNonLinearity::Ln.to_nonlinearity();
        assert!(matches!(ln.apply(-1.0), Err(EquationsError::Domain(_))));
        assert!(matches!(ln.apply(0.0), Err(EquationsError::Domain(_))));
        assert_relative_eq!(ln.apply(std::f64::consts::E).unwrap(), 1.0);
        // no predicate, but NaN out of a finite argument is still an error
        let acos = NonLinearity::new(f64::acos, "acos");
        assert!(matches!(acos.apply(2.0), Err(EquationsError::Domain(_))));
    }

    #[test]
    fn test_index_out_of_palette() {
        let palette = Palette::from_standard(&[StandardNonLinearity::Sin]).unwrap();
        assert!(palette.apply(3, 0.5).is_err());
        assert_eq!(palette[0].name, "sin");
    }
}
