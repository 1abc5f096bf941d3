//! Final textual module serialisation (§6): one parenthesised tuple of
//! block-vertex tuples per line.

use std::fmt::Write as _;

use crate::interval::Orientation;
use crate::module::Module;

fn orientation_char(o: Orientation) -> char {
    match o {
        Orientation::Plus => '+',
        Orientation::Minus => '-',
    }
}

/// Render one module as `((seq, (lo, hi), orient), ...)`.
pub fn format_module(module: &Module) -> String {
    let mut out = String::from("(");
    for (i, v) in module.vertices().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(
            out,
            "({}, ({}, {}), {})",
            v.seq,
            v.interval.lo,
            v.interval.hi,
            orientation_char(v.orientation)
        )
        .expect("writing to a String never fails");
    }
    out.push(')');
    out
}

/// Render every module, one per line, in the order given.
pub fn format_modules<'a>(modules: impl IntoIterator<Item = &'a Module>) -> String {
    modules
        .into_iter()
        .map(format_module)
        .collect::<Vec<_>>()
        .join("\n")
}
