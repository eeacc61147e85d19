pub mod env;
pub mod types;
pub(crate) mod check;
pub(crate) mod infer;
pub(crate) mod register;
pub(crate) mod resolve;
pub(crate) mod scope;

use crossbeam_channel::unbounded;

use crate::config::AnalyzerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::parser::ast::Program;
use env::{ClassId, ClassTable};

/// Run semantic analysis over a whole program and return every diagnostic,
/// ordered by source position.
///
/// Declarations are registered first so that class bodies can be checked
/// against a complete, read-only class table. With `config.jobs > 1` the
/// bodies are checked on worker threads; the result is identical either way.
pub fn type_check(program: &Program, config: &AnalyzerConfig) -> Vec<Diagnostic> {
    let mut sink = DiagnosticSink::new();
    let table = register::build_class_table(program, &mut sink);

    let jobs = config.jobs.clamp(1, table.len().max(1));
    if jobs == 1 {
        for id in table.ids() {
            check_class(program, &table, id, &mut sink);
        }
    } else {
        check_parallel(program, &table, jobs, &mut sink);
    }

    tracing::debug!(diagnostics = sink.len(), "type check finished");
    sink.into_sorted()
}

/// Class table for a program, without checking any bodies.
pub fn class_table(program: &Program) -> (ClassTable, Vec<Diagnostic>) {
    let mut sink = DiagnosticSink::new();
    let table = register::build_class_table(program, &mut sink);
    (table, sink.into_sorted())
}

fn check_class(program: &Program, table: &ClassTable, id: ClassId, sink: &mut DiagnosticSink) {
    let info = table.get(id);
    tracing::trace!(class = %info.name.node, "checking class");
    if id.0 == 0 {
        check::check_main(table, id, &program.main_class.node, sink);
        return;
    }
    let Some(decl) = program.classes.get(id.0 - 1) else { return };
    for (method, sig) in decl.node.methods.iter().zip(&info.methods) {
        check::check_method(table, sig, &method.node, sink);
    }
}

fn check_parallel(program: &Program, table: &ClassTable, jobs: usize, sink: &mut DiagnosticSink) {
    let (tx, rx) = unbounded::<Vec<Diagnostic>>();
    let ids: Vec<ClassId> = table.ids().collect();

    std::thread::scope(|s| {
        for worker in 0..jobs {
            let tx = tx.clone();
            let ids = &ids;
            s.spawn(move || {
                for &id in ids.iter().skip(worker).step_by(jobs) {
                    let mut local = DiagnosticSink::new();
                    check_class(program, table, id, &mut local);
                    if tx.send(local.into_sorted()).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(tx);

    for batch in rx {
        sink.extend(batch);
    }
}
