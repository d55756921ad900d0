//! Runtime support for source-transformation automatic differentiation.
//!
//! An external generator rewrites annotated functions into their derivatives.
//! This crate carries everything that generator and its callers need at the
//! seam between them:
//!
//! - the signature transforms that say what shape a derivative must have,
//!   given the source callable's shape and the requested mode ([`modes`]),
//! - the [`DiffFunction`] handle wrapping a generated derivative together
//!   with its source text, with trailing-argument padding and receiver
//!   rebinding,
//! - the [`Tape`] reverse-mode code records forward-sweep values on.
//!
//! Requests go through a [`Differentiator`], one entry point per mode. A
//! request the generator never filled in degrades to an invalid handle whose
//! calls are diagnosed no-ops, so builds with generation disabled stay
//! runnable.

mod function;
pub mod helper;
pub mod modes;
pub mod tape;
mod types;

pub use function::{Arg, Callable, DiffFunction};
pub use tape::Tape;
pub use types::{CallableSignature, Mode, ParamKind, QualifierSet, RefQual, SignatureError};

/// Whether derivative generation is active for the requests made through one
/// [`Differentiator`]. Decided once, at construction.
#[derive(Debug, Copy, Clone)]
pub struct Config {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { enabled: true }
    }
}

/// The request surface the external generator recognizes.
///
/// Every entry point takes the target callable's signature (passing `None`
/// is a fatal caller error), the parameter-selection specifier, the slot the
/// generator fills with the derived callable, and the generated source text.
/// The returned handle is built around the mode's derived signature.
pub struct Differentiator {
    config: Config,
}

impl Differentiator {
    pub fn new(config: Config) -> Self {
        Differentiator { config }
    }

    /// Forward-mode request, marker "D". `order` is the derivative order.
    pub fn differentiate<T, R, C>(
        &self,
        order: usize,
        target: Option<&CallableSignature>,
        arg_spec: &str,
        derived: Option<Callable<T, R, C>>,
        code: &str,
    ) -> DiffFunction<T, R, C> {
        let target = target.expect("differentiate: must pass a non-null target callable");
        self.build(Mode::Forward, target, arg_spec, derived, code)
            .with_order(order)
    }

    /// Reverse-mode request, marker "G". The handle returns nothing; all
    /// partials come back through the injected output slots.
    pub fn gradient<T, C>(
        &self,
        target: Option<&CallableSignature>,
        arg_spec: &str,
        derived: Option<Callable<T, (), C>>,
        code: &str,
    ) -> DiffFunction<T, (), C> {
        let target = target.expect("gradient: must pass a non-null target callable");
        self.build(Mode::Gradient, target, arg_spec, derived, code)
    }

    /// Hessian request, marker "H". The second derivatives come back through
    /// one trailing output slot.
    pub fn hessian<T, C>(
        &self,
        target: Option<&CallableSignature>,
        arg_spec: &str,
        derived: Option<Callable<T, (), C>>,
        code: &str,
    ) -> DiffFunction<T, (), C> {
        let target = target.expect("hessian: must pass a non-null target callable");
        self.build(Mode::Hessian, target, arg_spec, derived, code)
    }

    /// Jacobian request, marker "J".
    pub fn jacobian<T, C>(
        &self,
        target: Option<&CallableSignature>,
        arg_spec: &str,
        derived: Option<Callable<T, (), C>>,
        code: &str,
    ) -> DiffFunction<T, (), C> {
        let target = target.expect("jacobian: must pass a non-null target callable");
        self.build(Mode::Jacobian, target, arg_spec, derived, code)
    }

    fn build<T, R, C>(
        &self,
        mode: Mode,
        target: &CallableSignature,
        arg_spec: &str,
        derived: Option<Callable<T, R, C>>,
        code: &str,
    ) -> DiffFunction<T, R, C> {
        let signature = mode.derive(target);
        // With generation disabled the code slot stays empty, which makes
        // the handle invalid.
        let code = if self.config.enabled { code } else { "" };
        DiffFunction::new(
            derived,
            code.to_owned(),
            signature,
            mode,
            arg_spec.to_owned(),
        )
    }
}
