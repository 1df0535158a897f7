#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// error type shared by generator, evaluator and renderers
pub mod equations_error;
///____________________________________________________________________________________________________________________________
/// palette of unary nonlinearities: plain functions with display names, optional domain checks,
/// and a catalogue of standard ones (sin, cos, exp, ln, sqrt, tanh ...)
/// ```
/// use RustedODEgen::symbolic::nonlinearities::Palette;
/// let palette = Palette::from_names(&["sin".to_string(), "ln".to_string()], None).unwrap();
/// assert_eq!(palette.names(), vec!["sin", "ln"]);
/// assert!(palette.apply(1, -1.0).is_err());
/// ```
pub mod nonlinearities;
/// explicit splittable random key, no global random state
pub mod prng_key;
///____________________________________________________________________________________________________________________________
/// # Random equation systems
/// every equation is a sum of addends, every addend a product of nonlinearities applied to the variables
/// ```
/// use RustedODEgen::symbolic::nonlinearities::{Palette, StandardNonLinearity};
/// use RustedODEgen::symbolic::random_equations::Equations;
/// let palette = Palette::from_standard(&[StandardNonLinearity::Sin, StandardNonLinearity::Exp]).unwrap();
/// let system = Equations::new(4, 3, 3, 2, palette, Some(42)).unwrap();
/// for (terms, sym) in system.iter() {
///     println!("{} ({} addends)", sym, terms.len());
/// }
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod random_equations;
