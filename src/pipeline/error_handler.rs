//! Error decoration for pipeline runs.

use crate::error::{GenError, MultiError};

/// Attach the input's name to every error in `errs` when a namer is set.
pub fn annotate_for_input<I>(
    namer: Option<&dyn Fn(&I) -> String>,
    input: &I,
    errs: MultiError,
) -> MultiError {
    let Some(namer) = namer else {
        return errs;
    };
    let name = namer(input);
    errs.into_iter()
        .map(|source| GenError::ForInput {
            input: name.clone(),
            source: Box::new(source),
        })
        .collect()
}

/// Log a one-line summary per error at debug level; callers decide how to present them.
pub fn log_run_errors(label: &str, errs: &MultiError) {
    for err in errs.iter() {
        log::debug!("{}: {}", label, err);
    }
}
