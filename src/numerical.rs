/// right-hand side f(t, y) of a generated system
/// Example#1
/// ```
/// use RustedODEgen::symbolic::nonlinearities::{Palette, StandardNonLinearity};
/// use RustedODEgen::symbolic::random_equations::Equations;
/// use nalgebra::DVector;
/// let palette = Palette::from_standard(&[StandardNonLinearity::Cos, StandardNonLinearity::Tanh]).unwrap();
/// let system = Equations::new(2, 2, 2, 2, palette, None).unwrap();
/// // the same closure type the IVP solvers take
/// let rhs = system.rhs_DVector();
/// let dy_dt = rhs(0.0, &DVector::from_vec(vec![0.5, -0.5]));
/// assert_eq!(dy_dt.len(), 2);
/// ```
pub mod evaluator;
