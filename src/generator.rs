//! Generator contracts.
//!
//! Every generator has a stable name and exactly one of four shapes:
//!
//! - [`OneToOne`]: one input in, zero or one [`File`] out
//! - [`OneToMany`]: one input in, a [`Files`] set out
//! - [`ManyToOne`]: all inputs in, zero or one [`File`] out
//! - [`ManyToMany`]: all inputs in, a [`Files`] set out
//!
//! A "no-op" is signalled by a nonexistent file ([`File::none`]) or an empty set.
//! [`Generator`] is the closed union of the four shapes that a
//! [`Pipeline`](crate::pipeline::Pipeline) dispatches on.

use std::fmt;

use crate::Result;
use crate::types::{File, Files};

/// Name reported in diagnostics and provenance stacks.
pub trait Named {
    fn name(&self) -> &str;
}

pub trait OneToOne<I>: Named {
    /// Generate one file for `input`, or [`File::none`] when there is nothing to emit.
    fn generate(&self, input: &I) -> Result<File>;
}

pub trait OneToMany<I>: Named {
    fn generate(&self, input: &I) -> Result<Files>;
}

pub trait ManyToOne<I>: Named {
    fn generate(&self, inputs: &[I]) -> Result<File>;
}

pub trait ManyToMany<I>: Named {
    fn generate(&self, inputs: &[I]) -> Result<Files>;
}

impl<T: Named + ?Sized> Named for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<I, T: OneToOne<I> + ?Sized> OneToOne<I> for Box<T> {
    fn generate(&self, input: &I) -> Result<File> {
        (**self).generate(input)
    }
}

impl<I, T: OneToMany<I> + ?Sized> OneToMany<I> for Box<T> {
    fn generate(&self, input: &I) -> Result<Files> {
        (**self).generate(input)
    }
}

impl<I, T: ManyToOne<I> + ?Sized> ManyToOne<I> for Box<T> {
    fn generate(&self, inputs: &[I]) -> Result<File> {
        (**self).generate(inputs)
    }
}

impl<I, T: ManyToMany<I> + ?Sized> ManyToMany<I> for Box<T> {
    fn generate(&self, inputs: &[I]) -> Result<Files> {
        (**self).generate(inputs)
    }
}

/// Capability shape of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Shape {
    /// True when the generator is invoked once per input element.
    pub fn per_input(self) -> bool {
        matches!(self, Shape::OneToOne | Shape::OneToMany)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::OneToOne => "one-to-one",
            Shape::OneToMany => "one-to-many",
            Shape::ManyToOne => "many-to-one",
            Shape::ManyToMany => "many-to-many",
        };
        f.write_str(s)
    }
}

/// A registered generator, tagged with its shape.
pub enum Generator<I> {
    OneToOne(Box<dyn OneToOne<I>>),
    OneToMany(Box<dyn OneToMany<I>>),
    ManyToOne(Box<dyn ManyToOne<I>>),
    ManyToMany(Box<dyn ManyToMany<I>>),
}

impl<I> Generator<I> {
    pub fn one_to_one(g: impl OneToOne<I> + 'static) -> Self {
        Generator::OneToOne(Box::new(g))
    }

    pub fn one_to_many(g: impl OneToMany<I> + 'static) -> Self {
        Generator::OneToMany(Box::new(g))
    }

    pub fn many_to_one(g: impl ManyToOne<I> + 'static) -> Self {
        Generator::ManyToOne(Box::new(g))
    }

    pub fn many_to_many(g: impl ManyToMany<I> + 'static) -> Self {
        Generator::ManyToMany(Box::new(g))
    }

    pub fn name(&self) -> &str {
        match self {
            Generator::OneToOne(g) => g.name(),
            Generator::OneToMany(g) => g.name(),
            Generator::ManyToOne(g) => g.name(),
            Generator::ManyToMany(g) => g.name(),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Generator::OneToOne(_) => Shape::OneToOne,
            Generator::OneToMany(_) => Shape::OneToMany,
            Generator::ManyToOne(_) => Shape::ManyToOne,
            Generator::ManyToMany(_) => Shape::ManyToMany,
        }
    }
}

impl<I: 'static> Generator<I> {
    /// One-to-one generator backed by a closure.
    pub fn one_to_one_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&I) -> Result<File> + 'static,
    {
        Generator::one_to_one(FnGenerator::new(name, f))
    }

    pub fn one_to_many_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&I) -> Result<Files> + 'static,
    {
        Generator::one_to_many(FnGenerator::new(name, f))
    }

    pub fn many_to_one_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[I]) -> Result<File> + 'static,
    {
        Generator::many_to_one(FnGenerator::new(name, f))
    }

    pub fn many_to_many_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[I]) -> Result<Files> + 'static,
    {
        Generator::many_to_many(FnGenerator::new(name, f))
    }
}

impl<I> fmt::Debug for Generator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name())
            .field("shape", &self.shape())
            .finish()
    }
}

/// Named closure usable as any shape its signature fits.
pub struct FnGenerator<F> {
    name: String,
    f: F,
}

impl<F> FnGenerator<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        FnGenerator {
            name: name.into(),
            f,
        }
    }
}

impl<F> Named for FnGenerator<F> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<I, F: Fn(&I) -> Result<File>> OneToOne<I> for FnGenerator<F> {
    fn generate(&self, input: &I) -> Result<File> {
        (self.f)(input)
    }
}

impl<I, F: Fn(&I) -> Result<Files>> OneToMany<I> for FnGenerator<F> {
    fn generate(&self, input: &I) -> Result<Files> {
        (self.f)(input)
    }
}

impl<I, F: Fn(&[I]) -> Result<File>> ManyToOne<I> for FnGenerator<F> {
    fn generate(&self, inputs: &[I]) -> Result<File> {
        (self.f)(inputs)
    }
}

impl<I, F: Fn(&[I]) -> Result<Files>> ManyToMany<I> for FnGenerator<F> {
    fn generate(&self, inputs: &[I]) -> Result<Files> {
        (self.f)(inputs)
    }
}
