use crate::symbolic::equations_error::EquationsError;
use log::info;
use plotters::prelude::*;

pub const DEFAULT_EQUATIONS_FILE: &str = "expressions.png";

pub(crate) fn render_error<E: std::fmt::Display>(e: E) -> EquationsError {
    EquationsError::Render(e.to_string())
}

/// Show the symbolic right-hand sides one per line. With `save` the list is drawn into a
/// png (`filename` or expressions.png), otherwise it is printed to the terminal.
pub fn show_equations(
    sym_expr: &[String],
    save: bool,
    filename: Option<&str>,
) -> Result<(), EquationsError> {
    if !save {
        for expr in sym_expr {
            println!("{}", expr);
        }
        return Ok(());
    }
    let filename = filename.unwrap_or(DEFAULT_EQUATIONS_FILE);
    let longest = sym_expr.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    let width = (longest as u32 * 14 + 80).max(400);
    let height = sym_expr.len() as u32 * 60 + 60;

    let root_area = BitMapBackend::new(filename, (width, height)).into_drawing_area();
    root_area.fill(&WHITE).map_err(render_error)?;
    for (idx, expr) in sym_expr.iter().enumerate() {
        root_area
            .draw(&Text::new(
                expr.clone(),
                (40, 30 + idx as i32 * 60),
                ("sans-serif", 28).into_font(),
            ))
            .map_err(render_error)?;
    }
    root_area.present().map_err(render_error)?;
    info!("{} equations saved to {}", sym_expr.len(), filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_on_terminal() {
        let sym = vec!["f_1 = sin(y_1)".to_string(), "f_2 = cos(y_2)".to_string()];
        assert!(show_equations(&sym, false, None).is_ok());
        assert!(show_equations(&[], false, None).is_ok());
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eqs.png");
        let sym = vec!["f_1 = sin(y_1) + exp(y_2)".to_string()];
        // font lookup may fail on machines without fonts; then the error must be a render error
        match show_equations(&sym, true, path.to_str()) {
            Ok(()) => assert!(path.exists()),
            Err(e) => assert!(matches!(e, EquationsError::Render(_))),
        }
    }
}
