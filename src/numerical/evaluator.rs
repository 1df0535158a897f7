//! numerical right-hand side of a generated system, f(t, y), ready to be handed to an IVP solver
use crate::symbolic::equations_error::EquationsError;
use crate::symbolic::nonlinearities::Palette;
use crate::symbolic::random_equations::{Equation, Equations, Slot, Term};
use nalgebra::DVector;

impl Term {
    /// product over non-identity slots of the slot nonlinearities applied to y[slot];
    /// an all-identity addend gives exactly 1.0
    pub fn evaluate(&self, palette: &Palette, y: &[f64]) -> Result<f64, EquationsError> {
        let mut addend = 1.0;
        for (k, slot) in self.slots().iter().enumerate() {
            if let Slot::Applied(non_lins) = slot {
                let y_k = *y.get(k).ok_or_else(|| {
                    EquationsError::Domain(format!(
                        "state vector of length {} has no variable y[{}]",
                        y.len(),
                        k
                    ))
                })?;
                for &nl in non_lins {
                    addend *= palette.apply(nl, y_k)?;
                }
            }
        }
        Ok(addend)
    }
}

/// sum of the addends of one equation
pub fn evaluate_equation(
    equation: &[Term],
    palette: &Palette,
    y: &[f64],
) -> Result<f64, EquationsError> {
    let mut eq = 0.0;
    for addend in equation {
        eq += addend.evaluate(palette, y)?;
    }
    Ok(eq)
}

/// `t` is not used: the systems are autonomous, the argument only mirrors the dy/dt = f(t, y)
/// convention of IVP solvers
pub fn evaluate_system(
    equations: &[Equation],
    palette: &Palette,
    n_vars: usize,
    _t: f64,
    y: &[f64],
) -> Result<Vec<f64>, EquationsError> {
    if y.len() < n_vars {
        return Err(EquationsError::Domain(format!(
            "state vector has {} components, system has {} variables",
            y.len(),
            n_vars
        )));
    }
    equations
        .iter()
        .map(|equation| evaluate_equation(equation, palette, y))
        .collect()
}

impl Equations {
    pub fn evaluate(&self, t: f64, y: &[f64]) -> Result<Vec<f64>, EquationsError> {
        evaluate_system(self.equations(), self.palette(), self.n_vars(), t, y)
    }

    pub fn evaluate_DVector(&self, t: f64, y: &DVector<f64>) -> Result<DVector<f64>, EquationsError> {
        let f = self.evaluate(t, y.as_slice())?;
        Ok(DVector::from_vec(f))
    }

    /// Boxed f(t, y) with the signature the IVP solvers take. That signature has no room for an
    /// error, so a domain error aborts the caller with a panic carrying the error message.
    pub fn rhs_DVector(&self) -> Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>> {
        let system = self.clone();
        Box::new(move |t: f64, y: &DVector<f64>| match system.evaluate_DVector(t, y) {
            Ok(f) => f,
            Err(e) => panic!("{}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::nonlinearities::StandardNonLinearity;
    use crate::symbolic::random_equations::GeneratorConfig;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn palette() -> Palette {
        Palette::from_standard(&[
            StandardNonLinearity::Sin,
            StandardNonLinearity::Cos,
            StandardNonLinearity::Exp,
            StandardNonLinearity::Ln,
        ])
        .unwrap()
    }

    /// f_1 = sin(y_1)cos(y_1)exp(y_2) + ln(y_2)
    /// f_2 = 1
    fn hand_made() -> Equations {
        let eq1 = vec![
            Term::from_slots(vec![Slot::Applied(vec![0, 1]), Slot::Applied(vec![2])]),
            Term::from_slots(vec![Slot::Identity, Slot::Applied(vec![3])]),
        ];
        let eq2 = vec![Term::identity(2)];
        let config = GeneratorConfig::new(2, 2, 2, 3, None);
        Equations::from_parts(config, palette(), vec![eq1, eq2], None).unwrap()
    }

    #[test]
    fn test_hand_made_system() {
        let system = hand_made();
        assert_eq!(
            system.symbolic(0).unwrap(),
            "f_1 = sin(y_1)cos(y_1)exp(y_2) + ln(y_2)"
        );
        let y = [0.3, 1.7];
        let f = system.evaluate(0.0, &y).unwrap();
        assert_eq!(f.len(), 2);
        let expected = 0.3f64.sin() * 0.3f64.cos() * 1.7f64.exp() + 1.7f64.ln();
        assert_relative_eq!(f[0], expected, epsilon = 1e-12);
        assert_eq!(f[1], 1.0);
    }

    #[test]
    fn test_identity_term_is_one() {
        let term = Term::identity(4);
        let p = palette();
        for y in [[0.0; 4], [-3.0, 1e6, f64::MAX, 2.5]] {
            assert_eq!(term.evaluate(&p, &y).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_time_is_ignored() {
        let system = hand_made();
        let y = [0.5, 2.0];
        assert_eq!(
            system.evaluate(0.0, &y).unwrap(),
            system.evaluate(123.4, &y).unwrap()
        );
    }

    #[test]
    fn test_short_state_vector() {
        let system = hand_made();
        let res = system.evaluate(0.0, &[0.5]);
        assert!(matches!(res, Err(EquationsError::Domain(_))));
    }

    #[test]
    fn test_domain_error_propagates() {
        let system = hand_made();
        let res = system.evaluate(0.0, &[0.5, -1.0]);
        assert!(matches!(res, Err(EquationsError::Domain(_))));
    }

    #[test]
    fn test_dvector_interface() {
        let system = hand_made();
        let y = DVector::from_vec(vec![0.3, 1.7]);
        let f = system.evaluate_DVector(0.0, &y).unwrap();
        let rhs = system.rhs_DVector();
        assert_eq!(rhs(0.0, &y), f);
        assert_eq!(f.len(), 2);
    }

    #[test]
    #[should_panic(expected = "Domain error")]
    fn test_rhs_panics_on_domain_error() {
        let rhs = hand_made().rhs_DVector();
        rhs(0.0, &DVector::from_vec(vec![0.3, -1.7]));
    }

    #[test]
    fn test_shared_between_threads() {
        let system = Arc::new(hand_made());
        let y = [0.3, 1.7];
        let expected = system.evaluate(0.0, &y).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let system = Arc::clone(&system);
                std::thread::spawn(move || system.evaluate(0.0, &y).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
