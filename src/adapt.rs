//! Input adapters: reuse a generator written for one input type in a pipeline over another.
//!
//! Adapting keeps the wrapped generator's name and shape. For the many-input shapes the
//! transform is applied element-wise before delegating. Output is exactly what the
//! wrapped generator returns for the transformed input.

use std::marker::PhantomData;

use crate::Result;
use crate::generator::{Generator, ManyToMany, ManyToOne, Named, OneToMany, OneToOne};
use crate::types::{File, Files};

/// Generator over `P` that converts each input with `f` and delegates to `inner`, a
/// generator over `Q`.
pub struct Adapt<G, F, Q> {
    inner: G,
    f: F,
    _input: PhantomData<fn() -> Q>,
}

impl<G, F, Q> Adapt<G, F, Q> {
    pub fn new(inner: G, f: F) -> Self {
        Adapt {
            inner,
            f,
            _input: PhantomData,
        }
    }

    fn map_all<P>(&self, inputs: &[P]) -> Vec<Q>
    where
        F: Fn(&P) -> Q,
    {
        inputs.iter().map(|p| (self.f)(p)).collect()
    }
}

impl<G: Named, F, Q> Named for Adapt<G, F, Q> {
    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<P, Q, G, F> OneToOne<P> for Adapt<G, F, Q>
where
    G: OneToOne<Q>,
    F: Fn(&P) -> Q,
{
    fn generate(&self, input: &P) -> Result<File> {
        self.inner.generate(&(self.f)(input))
    }
}

impl<P, Q, G, F> OneToMany<P> for Adapt<G, F, Q>
where
    G: OneToMany<Q>,
    F: Fn(&P) -> Q,
{
    fn generate(&self, input: &P) -> Result<Files> {
        self.inner.generate(&(self.f)(input))
    }
}

impl<P, Q, G, F> ManyToOne<P> for Adapt<G, F, Q>
where
    G: ManyToOne<Q>,
    F: Fn(&P) -> Q,
{
    fn generate(&self, inputs: &[P]) -> Result<File> {
        self.inner.generate(&self.map_all(inputs))
    }
}

impl<P, Q, G, F> ManyToMany<P> for Adapt<G, F, Q>
where
    G: ManyToMany<Q>,
    F: Fn(&P) -> Q,
{
    fn generate(&self, inputs: &[P]) -> Result<Files> {
        self.inner.generate(&self.map_all(inputs))
    }
}

pub fn adapt_one_to_one<P, Q, G, F>(inner: G, f: F) -> impl OneToOne<P>
where
    G: OneToOne<Q>,
    F: Fn(&P) -> Q,
{
    Adapt::new(inner, f)
}

pub fn adapt_one_to_many<P, Q, G, F>(inner: G, f: F) -> impl OneToMany<P>
where
    G: OneToMany<Q>,
    F: Fn(&P) -> Q,
{
    Adapt::new(inner, f)
}

pub fn adapt_many_to_one<P, Q, G, F>(inner: G, f: F) -> impl ManyToOne<P>
where
    G: ManyToOne<Q>,
    F: Fn(&P) -> Q,
{
    Adapt::new(inner, f)
}

pub fn adapt_many_to_many<P, Q, G, F>(inner: G, f: F) -> impl ManyToMany<P>
where
    G: ManyToMany<Q>,
    F: Fn(&P) -> Q,
{
    Adapt::new(inner, f)
}

impl<Q: 'static> Generator<Q> {
    /// Wrap this generator so it accepts `P`, converting each input with `f`.
    pub fn adapt<P: 'static>(self, f: impl Fn(&P) -> Q + 'static) -> Generator<P> {
        match self {
            Generator::OneToOne(g) => Generator::one_to_one(Adapt::new(g, f)),
            Generator::OneToMany(g) => Generator::one_to_many(Adapt::new(g, f)),
            Generator::ManyToOne(g) => Generator::many_to_one(Adapt::new(g, f)),
            Generator::ManyToMany(g) => Generator::many_to_many(Adapt::new(g, f)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Shape;

    struct Upper;

    impl Named for Upper {
        fn name(&self) -> &str {
            "upper"
        }
    }

    impl OneToOne<String> for Upper {
        fn generate(&self, input: &String) -> Result<File> {
            Ok(File::new(format!("{input}.txt"), input.to_uppercase()))
        }
    }

    #[test]
    fn test_adapted_output_matches_direct_call() {
        let to_string = |n: &u32| format!("n{n}");
        let adapted = adapt_one_to_one(Upper, to_string);
        let direct = Upper.generate(&to_string(&7)).unwrap();
        assert_eq!(adapted.generate(&7).unwrap(), direct);
        assert_eq!(adapted.name(), "upper");
    }

    #[test]
    fn test_generator_adapt_keeps_shape() {
        let g: Generator<String> = Generator::many_to_many_fn("all", |xs: &[String]| {
            Ok(xs.iter().map(|x| File::new(x.clone(), "")).collect())
        });
        let adapted: Generator<u8> = g.adapt(|b: &u8| format!("f{b}"));
        assert_eq!(adapted.shape(), Shape::ManyToMany);
        assert_eq!(adapted.name(), "all");
        let Generator::ManyToMany(inner) = adapted else {
            panic!("shape changed");
        };
        let files = inner.generate(&[1, 2]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.get("f1").is_some());
    }
}
