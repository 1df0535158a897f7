#![allow(non_snake_case)]
use RustedODEgen::Examples::generator_examples::generator_examples;
use RustedODEgen::Utils::dependency_graph::DependencyGraph;
use RustedODEgen::Utils::logger::init_logger;
use RustedODEgen::Utils::plots::show_equations;
use RustedODEgen::Utils::task_parser::GeneratorTask;
use std::path::Path;

/// `RustedODEgen task.txt [save]` builds the system described in task.txt,
/// without arguments a collection of examples is run
fn main() {
    let args: Vec<String> = std::env::args().collect();
    if let Some(task_path) = args.get(1) {
        let save = args.get(2).map(|s| s == "save").unwrap_or(false);
        let result = GeneratorTask::from_file(Path::new(task_path)).and_then(|task| {
            init_logger(task.loglevel.as_deref(), save)?;
            let system = task.build()?;
            show_equations(system.sym_expr(), save, None)?;
            DependencyGraph::from_equations(&system).show_graph(save, None)
        });
        if let Err(e) = result {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    let example = 0;
    match example {
        0 => {
            for i in 0..4 {
                if let Err(e) = generator_examples(i) {
                    eprintln!("example {} failed: {}", i, e);
                }
            }
        }
        1 => {
            if let Err(e) = generator_examples(4) {
                eprintln!("{}", e);
            }
        }
        _ => println!("nothing to run"),
    }
}
