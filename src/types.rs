//! Core data model: callable signatures, their qualifier sets and the
//! differentiation modes.

use syn::parse::{Parse, ParseStream};
use syn::{Ident, ReturnType, Type};
use thiserror::Error;

/// Reference category a member callable may carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RefQual {
    #[default]
    None,
    LValue,
    RValue,
}

/// The closed set of calling-convention qualifiers of a callable.
///
/// Membership (free vs. member callable) is not part of this record; it is
/// encoded by [`CallableSignature::receiver`], so a signature cannot claim to
/// be a member callable without naming its receiver type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct QualifierSet {
    pub is_const: bool,
    pub is_volatile: bool,
    pub ref_qual: RefQual,
    pub is_variadic: bool,
    pub may_throw: bool,
}

impl QualifierSet {
    /// Every member of the qualifier space, in a fixed order.
    ///
    /// The set is finite and known up front, so the transforms are checked
    /// against all 48 combinations instead of hand-writing one rule each.
    pub fn enumerate() -> Vec<QualifierSet> {
        let mut all = Vec::with_capacity(48);
        for &is_const in &[false, true] {
            for &is_volatile in &[false, true] {
                for &ref_qual in &[RefQual::None, RefQual::LValue, RefQual::RValue] {
                    for &is_variadic in &[false, true] {
                        for &may_throw in &[false, true] {
                            all.push(QualifierSet {
                                is_const,
                                is_volatile,
                                ref_qual,
                                is_variadic,
                                may_throw,
                            });
                        }
                    }
                }
            }
        }
        all
    }
}

/// How a parameter participates in a call: by value, or through a
/// pointer-like slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    Pointer,
}

/// An immutable description of one callable's invocable shape.
///
/// `receiver` is present exactly for member callables and is never counted
/// among `inputs`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableSignature {
    pub receiver: Option<Type>,
    pub inputs: Vec<Type>,
    pub output: ReturnType,
    pub quals: QualifierSet,
}

impl CallableSignature {
    /// A free callable with the given parameter and return types.
    pub fn free(inputs: Vec<Type>, output: ReturnType) -> Self {
        CallableSignature {
            receiver: None,
            inputs,
            output,
            quals: QualifierSet::default(),
        }
    }

    /// A member callable bound to a receiver of type `receiver`.
    pub fn member(receiver: Type, inputs: Vec<Type>, output: ReturnType) -> Self {
        CallableSignature {
            receiver: Some(receiver),
            inputs,
            output,
            quals: QualifierSet::default(),
        }
    }

    pub fn with_quals(mut self, quals: QualifierSet) -> Self {
        self.quals = quals;
        self
    }

    /// Turn a free signature into a member one.
    pub fn with_receiver(mut self, receiver: Type) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Parse a bare-fn type such as `"fn(f64, f64) -> f64"` into a free
    /// signature. A trailing `...` marks the signature variadic.
    pub fn parse_str(sig: &str) -> Result<Self, SignatureError> {
        let ty: Type = syn::parse_str(sig)?;
        let bare = match ty {
            Type::BareFn(bare) => bare,
            other => return Err(SignatureError::NotAFunction(format!("{:?}", other))),
        };
        let inputs = bare.inputs.into_iter().map(|arg| arg.ty).collect();
        let quals = QualifierSet {
            is_variadic: bare.variadic.is_some(),
            ..QualifierSet::default()
        };
        Ok(CallableSignature::free(inputs, bare.output).with_quals(quals))
    }

    pub fn is_member(&self) -> bool {
        self.receiver.is_some()
    }

    /// Number of declared parameters, the receiver excluded.
    pub fn param_count(&self) -> usize {
        self.inputs.len()
    }

    /// The declared return type, uniform for free and member callables.
    pub fn return_type(&self) -> &ReturnType {
        &self.output
    }

    /// The sub-signature with the last `n` parameters removed.
    ///
    /// `n` must not exceed the parameter count; asking to drop more
    /// parameters than the signature has is a programmer error.
    pub fn drop_trailing(&self, n: usize) -> Self {
        assert!(
            n <= self.inputs.len(),
            "cannot drop {} trailing parameters from a {}-parameter signature",
            n,
            self.inputs.len()
        );
        let mut sub = self.clone();
        sub.inputs.truncate(self.inputs.len() - n);
        sub
    }

    /// Classify a parameter type for argument synthesis: pointers and
    /// references take a null slot, everything else a numeric zero.
    pub fn param_kind(ty: &Type) -> ParamKind {
        match ty {
            Type::Ptr(_) | Type::Reference(_) => ParamKind::Pointer,
            _ => ParamKind::Scalar,
        }
    }
}

/// A signature that could not be understood.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("failed to parse callable signature: {0}")]
    Parse(#[from] syn::Error),
    #[error("expected a bare `fn(..)` type, got {0}")]
    NotAFunction(String),
}

/// The requested differentiation mode. Hessian and Jacobian requests share
/// one signature transform; they differ only in what the generator emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Forward,
    Gradient,
    Hessian,
    Jacobian,
}

impl Mode {
    /// The one-letter marker the external generator tags requests with.
    pub fn marker(&self) -> &'static str {
        match self {
            Mode::Forward => "D",
            Mode::Gradient => "G",
            Mode::Hessian => "H",
            Mode::Jacobian => "J",
        }
    }

    /// The signature a derivative generated in this mode must have.
    pub fn derive(&self, sig: &CallableSignature) -> CallableSignature {
        match self {
            Mode::Forward => crate::modes::forward::derive(sig),
            Mode::Gradient => crate::modes::reverse::derive(sig),
            Mode::Hessian | Mode::Jacobian => crate::modes::extract::derive(sig),
        }
    }
}

impl Parse for Mode {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "Forward" | "D" => Ok(Mode::Forward),
            "Gradient" | "G" => Ok(Mode::Gradient),
            "Hessian" | "H" => Ok(Mode::Hessian),
            "Jacobian" | "J" => Ok(Mode::Jacobian),
            other => Err(syn::Error::new(
                ident.span(),
                format!(
                    "expected Forward, Gradient, Hessian or Jacobian, got {}",
                    other
                ),
            )),
        }
    }
}
