#![allow(non_snake_case)]

use crate::Utils::dependency_graph::DependencyGraph;
use crate::Utils::logger::init_logger;
use crate::Utils::plots::show_equations;
use crate::Utils::task_parser::GeneratorTask;
use crate::symbolic::equations_error::EquationsError;
use crate::symbolic::nonlinearities::{NonLinearity, Palette, StandardNonLinearity};
use crate::symbolic::random_equations::Equations;
use nalgebra::DVector;

const TASK_DOCUMENT: &str = "
generator
n_vars: 4
n_eqs: 4
max_sum_terms: 3
max_mult_terms: 3
seed: 42
palette
nonlinearities: sin, cos, exp, tanh
logging
loglevel: info
";

#[allow(dead_code)]
pub fn generator_examples(example: usize) -> Result<(), EquationsError> {
    match example {
        0 => {
            // plain functions, placeholder names \text{nl}_1 ... \text{nl}_K
            let palette = Palette::new(vec![f64::sin, f64::cos, f64::exp], None)?;
            let system = Equations::new(3, 3, 3, 2, palette, None)?;
            for i in 0..system.len() {
                if let Some((terms, sym)) = system.get(i) {
                    println!("{}\n  structure: {:?}", sym, terms);
                }
            }
            let y = vec![0.1, 0.2, 0.3];
            println!("f(0, {:?}) = {:?}", y, system.evaluate(0.0, &y)?);
        }
        1 => {
            // standard nonlinearities with domain checks, ln needs positive arguments
            let palette = Palette::from_standard(&[
                StandardNonLinearity::Sin,
                StandardNonLinearity::Ln,
                StandardNonLinearity::Sqrt,
            ])?;
            let system = Equations::new(2, 3, 2, 2, palette, Some(1))?;
            show_equations(system.sym_expr(), false, None)?;
            match system.evaluate(0.0, &[-1.0, -2.0]) {
                Ok(f) => println!("f = {:?}", f),
                Err(e) => println!("evaluation failed: {}", e),
            }
        }
        2 => {
            // custom closure with its own domain
            let reciprocal = NonLinearity::new(|x| 1.0 / x, "\\frac{1}{\\cdot}").with_domain(|x| x != 0.0);
            let palette = Palette::from_nonlinearities(vec![
                reciprocal,
                StandardNonLinearity::Square.to_nonlinearity(),
            ])?;
            let system = Equations::new(3, 2, 2, 3, palette, Some(5))?;
            show_equations(system.sym_expr(), false, None)?;
        }
        3 => {
            // hand the right-hand side to an IVP solver: Box<dyn Fn(f64, &DVector<f64>) -> DVector<f64>>
            let palette = Palette::from_standard(&[StandardNonLinearity::Tanh, StandardNonLinearity::Cos])?;
            let system = Equations::new(3, 3, 2, 2, palette, None)?;
            let rhs = system.rhs_DVector();
            let y0 = DVector::from_vec(vec![1.0, 0.5, -0.5]);
            println!("dy/dt at y0 = {}", rhs(0.0, &y0));
        }
        4 => {
            // from a task document, then pictures of the equations and of the dependency graph
            let task = GeneratorTask::from_document(TASK_DOCUMENT)?;
            init_logger(task.loglevel.as_deref(), false)?;
            let system = task.build()?;
            show_equations(system.sym_expr(), true, None)?;
            let graph = DependencyGraph::from_equations(&system);
            println!("{}", graph.to_dot());
            graph.show_graph(true, None)?;
        }
        _ => {
            println!("example {} does not exist", example);
        }
    }
    Ok(())
}
