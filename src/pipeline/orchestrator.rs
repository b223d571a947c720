//! Pipeline: an ordered list of generators run as one unit over a batch of inputs.

use log::debug;

use crate::error::{GenError, MultiError};
use crate::generator::{Generator, ManyToMany, ManyToOne, Named, OneToMany, OneToOne};
use crate::tree::FileTree;
use crate::types::{File, Files};

use super::context::RunContext;
use super::error_handler::{annotate_for_input, log_run_errors};
use super::postprocess::{FileMapper, apply_postprocessors};

/// Names an input for error messages.
pub type InputNamer<I> = Box<dyn Fn(&I) -> String>;

/// Ordered collection of generators over input type `I`, plus post-processors.
///
/// All generators write into one relative path namespace; the pipeline never rewrites
/// paths. Generators run in the order they were appended. Every error from every
/// generator and input is collected before [`Pipeline::generate`] returns.
///
/// A pipeline is itself a many-to-many generator ([`Pipeline::into_generator`]), so
/// pipelines nest.
pub struct Pipeline<I> {
    label: String,
    generators: Vec<Generator<I>>,
    post: Vec<FileMapper>,
    namer: Option<InputNamer<I>>,
}

impl<I> Pipeline<I> {
    /// Empty pipeline. `label` names it in diagnostics and provenance stacks.
    pub fn new(label: impl Into<String>) -> Self {
        Pipeline {
            label: label.into(),
            generators: Vec::new(),
            post: Vec::new(),
            namer: None,
        }
    }

    /// Like [`Pipeline::new`], with errors decorated by `namer(input)`.
    pub fn with_namer(label: impl Into<String>, namer: impl Fn(&I) -> String + 'static) -> Self {
        let mut p = Self::new(label);
        p.namer = Some(Box::new(namer));
        p
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Names of registered generators, in run order.
    pub fn generator_names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub fn append(&mut self, generator: Generator<I>) -> &mut Self {
        self.generators.push(generator);
        self
    }

    pub fn append_one_to_one(&mut self, g: impl OneToOne<I> + 'static) -> &mut Self {
        self.append(Generator::one_to_one(g))
    }

    pub fn append_one_to_many(&mut self, g: impl OneToMany<I> + 'static) -> &mut Self {
        self.append(Generator::one_to_many(g))
    }

    pub fn append_many_to_one(&mut self, g: impl ManyToOne<I> + 'static) -> &mut Self {
        self.append(Generator::many_to_one(g))
    }

    pub fn append_many_to_many(&mut self, g: impl ManyToMany<I> + 'static) -> &mut Self {
        self.append(Generator::many_to_many(g))
    }

    /// Register a post-processor. Post-processors run FIFO on every produced file.
    pub fn add_postprocessor(
        &mut self,
        f: impl Fn(File) -> crate::Result<File> + 'static,
    ) -> &mut Self {
        self.post.push(Box::new(f));
        self
    }

    /// Run every generator over `inputs` and collect the output into a fresh tree.
    ///
    /// Per-input generators run once per element in slice order; many-input generators
    /// run once with the whole slice. Fails with every recorded error once all generators
    /// have run.
    pub fn generate(&self, inputs: &[I]) -> Result<FileTree, MultiError> {
        let mut run = RunContext::new();
        for generator in &self.generators {
            let name = generator.name();
            debug!(
                "{}: running {} ({})",
                self.label,
                name,
                generator.shape()
            );
            match generator {
                Generator::OneToOne(g) => {
                    for input in inputs {
                        let out = g.generate(input).map(single);
                        self.handle_for_input(&mut run, name, input, out);
                    }
                }
                Generator::OneToMany(g) => {
                    for input in inputs {
                        let out = g.generate(input);
                        self.handle_for_input(&mut run, name, input, out);
                    }
                }
                Generator::ManyToOne(g) => {
                    let out = g.generate(inputs).map(single);
                    if let Err(errs) = self.handle_output(&mut run, name, out) {
                        run.record_all(errs);
                    }
                }
                Generator::ManyToMany(g) => {
                    let out = g.generate(inputs);
                    if let Err(errs) = self.handle_output(&mut run, name, out) {
                        run.record_all(errs);
                    }
                }
            }
        }
        let result = run.finish(&self.label);
        if let Err(errs) = &result {
            log_run_errors(&self.label, errs);
        }
        result
    }

    /// [`Pipeline::generate`], flattened into a file list sorted by path.
    pub fn generate_files(&self, inputs: &[I]) -> Result<Files, MultiError> {
        Ok(self.generate(inputs)?.to_files())
    }

    fn handle_for_input(
        &self,
        run: &mut RunContext,
        name: &str,
        input: &I,
        out: crate::Result<Files>,
    ) {
        if let Err(errs) = self.handle_output(run, name, out) {
            run.record_all(annotate_for_input(self.namer.as_deref(), input, errs));
        }
    }

    /// Stamp, validate, post-process and insert one raw generator output.
    fn handle_output(
        &self,
        run: &mut RunContext,
        name: &str,
        out: crate::Result<Files>,
    ) -> Result<(), MultiError> {
        let files = out.map_err(|source| GenError::Generator {
            generator: name.to_string(),
            source,
        })?;
        if files.is_empty() {
            return Ok(());
        }
        let files: Files = files.into_iter().map(|f| stamp(f, name)).collect();
        files.validate().map_err(|source| GenError::InvalidOutput {
            generator: name.to_string(),
            source,
        })?;

        let mut errs = MultiError::new();
        let mut processed = Files::new();
        for f in files {
            match apply_postprocessors(&self.post, f) {
                Ok(f) => processed.push(f),
                Err(e) => errs.push(e),
            }
        }
        if let Err(conflicts) = run.accept(processed) {
            errs.extend(conflicts);
        }
        errs.into_result()
    }
}

/// Normalize a single-file output; a nonexistent file contributes nothing.
fn single(f: File) -> Files {
    if f.exists() {
        Files(vec![f])
    } else {
        Files::new()
    }
}

/// Put `name` at the outer end of the provenance stack unless it is already there.
fn stamp(mut f: File, name: &str) -> File {
    if f.from.first().map(String::as_str) != Some(name) {
        f.from.insert(0, name.to_string());
    }
    f
}

impl<I> Named for Pipeline<I> {
    fn name(&self) -> &str {
        &self.label
    }
}

impl<I> ManyToMany<I> for Pipeline<I> {
    fn generate(&self, inputs: &[I]) -> crate::Result<Files> {
        Ok(self.generate_files(inputs)?)
    }
}

impl<I: 'static> Pipeline<I> {
    /// Use this pipeline as a many-to-many generator in another pipeline.
    pub fn into_generator(self) -> Generator<I> {
        Generator::many_to_many(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_does_not_repeat_name() {
        let f = stamp(File::new("a", ""), "gen");
        assert_eq!(f.from, vec!["gen".to_string()]);
        let f = stamp(f, "gen");
        assert_eq!(f.from, vec!["gen".to_string()]);
        let f = stamp(f, "outer");
        assert_eq!(f.stack().to_string(), "outer:gen");
    }

    #[test]
    fn test_single_drops_sentinel() {
        assert!(single(File::none()).is_empty());
        assert_eq!(single(File::new("a", "")).len(), 1);
    }
}
