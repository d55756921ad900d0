//! The differentiated-function handle.
//!
//! A [`DiffFunction`] owns the callable the external generator produced plus
//! the source text it emitted, and forwards calls to it. Callers may supply
//! fewer trailing arguments than the derived signature declares; the handle
//! synthesizes the rest, zeros for scalars and absent slots for pointers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use num_traits::Zero;
use quote::ToTokens;

use crate::types::{CallableSignature, Mode, ParamKind};

/// One call argument. `T` is the scalar type the derivative works in.
pub enum Arg<'a, T> {
    /// A by-value scalar.
    Val(T),
    /// A live output slot the derivative writes into.
    Out(&'a mut T),
    /// An absent output slot (a padded null pointer, in calling-convention
    /// terms).
    Null,
}

impl<'a, T> Arg<'a, T> {
    fn kind(&self) -> ParamKind {
        match self {
            Arg::Val(_) => ParamKind::Scalar,
            Arg::Out(_) | Arg::Null => ParamKind::Pointer,
        }
    }
}

/// The stored derivative, tagged by calling shape so member and free
/// callables go through one dispatch point.
pub enum Callable<T, R = T, C = ()> {
    Free(Box<dyn for<'a, 'b> FnMut(&'a mut [Arg<'b, T>]) -> R>),
    Member(Box<dyn for<'a, 'b> FnMut(&mut C, &'a mut [Arg<'b, T>]) -> R>),
}

impl<T, R, C> Callable<T, R, C> {
    pub fn free(f: impl for<'a, 'b> FnMut(&'a mut [Arg<'b, T>]) -> R + 'static) -> Self {
        Callable::Free(Box::new(f))
    }

    pub fn member(
        f: impl for<'a, 'b> FnMut(&mut C, &'a mut [Arg<'b, T>]) -> R + 'static,
    ) -> Self {
        Callable::Member(Box::new(f))
    }
}

/// A handle around one generated derivative.
///
/// `T` is the scalar type, `R` the declared return type and `C` the receiver
/// type for member callables (`()` for free ones). The generated source text
/// lives exactly as long as the handle.
pub struct DiffFunction<T, R = T, C = ()> {
    callable: Option<Callable<T, R, C>>,
    code: String,
    signature: CallableSignature,
    mode: Mode,
    arg_spec: String,
    order: usize,
    receiver: Option<Weak<RefCell<C>>>,
}

impl<T, R, C> DiffFunction<T, R, C> {
    /// Wrap a generated derivative.
    ///
    /// A non-empty `code` is the witness that generation succeeded. Without
    /// it the handle is invalid no matter what `callable` holds: the
    /// diagnostic is emitted here and every later [`execute`] degrades to a
    /// no-op.
    ///
    /// [`execute`]: DiffFunction::execute
    pub fn new(
        callable: Option<Callable<T, R, C>>,
        code: String,
        signature: CallableSignature,
        mode: Mode,
        arg_spec: String,
    ) -> Self {
        let callable = if code.is_empty() {
            log::error!("no generated derivative was placed in this handle");
            log::error!("make sure derivative generation is enabled for the target function");
            None
        } else {
            callable
        };
        DiffFunction {
            callable,
            code,
            signature,
            mode,
            arg_spec,
            order: 1,
            receiver: None,
        }
    }

    pub(crate) fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.callable.is_some()
    }

    pub fn callable(&self) -> Option<&Callable<T, R, C>> {
        self.callable.as_ref()
    }

    /// The derived signature calls are checked and padded against.
    pub fn signature(&self) -> &CallableSignature {
        &self.signature
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The parameter-selection specifier the request was made with.
    pub fn arg_spec(&self) -> &str {
        &self.arg_spec
    }

    /// Derivative order of a forward-mode request.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The generated source text, or a sentinel when there is none.
    pub fn code(&self) -> &str {
        if self.code.is_empty() {
            "<invalid>"
        } else {
            &self.code
        }
    }

    pub fn dump(&self) {
        println!("The code is: {}", self.code());
    }

    /// Bind the receiver later member calls go to. Has no effect on a handle
    /// around a free callable.
    pub fn set_receiver(&mut self, obj: &Rc<RefCell<C>>) {
        if self.signature.is_member() {
            self.receiver = Some(Rc::downgrade(obj));
        } else {
            log::warn!("set_receiver on a free callable has no effect");
        }
    }

    /// Drop the bound receiver; later member calls need an explicit one.
    pub fn clear_receiver(&mut self) {
        if !self.signature.is_member() {
            log::warn!("clear_receiver on a free callable has no effect");
        }
        self.receiver = None;
    }
}

impl<T: Zero, R: Default, C> DiffFunction<T, R, C> {
    /// Invoke the stored derivative.
    ///
    /// `args` must match a prefix of the derived signature's parameters; the
    /// omitted suffix is synthesized. An invalid handle diagnoses and returns
    /// the return type's default value, as does a member callable with no
    /// bound receiver.
    pub fn execute(&mut self, args: Vec<Arg<'_, T>>) -> R {
        if self.callable.is_none() {
            log::error!("differentiated function handle is invalid");
            return R::default();
        }
        let mut args = pad(&self.signature, args);
        let bound = self.receiver.as_ref().and_then(Weak::upgrade);
        match self.callable.as_mut() {
            Some(Callable::Free(f)) => f(&mut args),
            Some(Callable::Member(f)) => {
                let obj = match bound {
                    Some(obj) => obj,
                    None => {
                        log::error!("member derivative invoked without a bound receiver");
                        return R::default();
                    }
                };
                let mut obj = obj.borrow_mut();
                f(&mut obj, &mut args)
            }
            None => unreachable!(),
        }
    }

    /// Invoke a member derivative on an explicit receiver.
    ///
    /// An explicit receiver always wins over one bound with
    /// [`set_receiver`](DiffFunction::set_receiver). Calling this on a free
    /// callable is a caller error.
    pub fn execute_on(&mut self, obj: &mut C, args: Vec<Arg<'_, T>>) -> R {
        if self.callable.is_none() {
            log::error!("differentiated function handle is invalid");
            return R::default();
        }
        let mut args = pad(&self.signature, args);
        match self.callable.as_mut() {
            Some(Callable::Member(f)) => f(obj, &mut args),
            Some(Callable::Free(_)) => {
                panic!("explicit receiver passed to a free callable")
            }
            None => unreachable!(),
        }
    }
}

/// Check the supplied prefix against the signature and synthesize the
/// omitted trailing arguments.
fn pad<'a, T: Zero>(
    signature: &CallableSignature,
    mut args: Vec<Arg<'a, T>>,
) -> Vec<Arg<'a, T>> {
    let full = signature.param_count();
    assert!(
        args.len() <= full,
        "expected at most {} arguments, got {}",
        full,
        args.len()
    );

    // 1. The supplied arguments must match the sub-signature left over after
    // dropping the omitted suffix.
    let prefix = signature.drop_trailing(full - args.len());
    for (arg, ty) in args.iter().zip(prefix.inputs.iter()) {
        assert_eq!(
            arg.kind(),
            CallableSignature::param_kind(ty),
            "supplied argument does not match parameter type `{}`",
            ty.to_token_stream()
        );
    }

    // 2. Make up for the omitted suffix: zeros for scalars, absent slots for
    // pointers.
    for ty in &signature.inputs[args.len()..] {
        args.push(match CallableSignature::param_kind(ty) {
            ParamKind::Scalar => Arg::Val(T::zero()),
            ParamKind::Pointer => Arg::Null,
        });
    }
    args
}
