//! Rendering of derived signatures into Rust declarations.
//!
//! This is the query surface the external generator consumes: it asks for the
//! declaration a derivative must have and emits a body to match.

use proc_macro2::Span;
use quote::{quote, ToTokens};
use syn::punctuated::Punctuated;
use syn::{FnArg, ForeignItemFn, Ident, Pat, PatIdent, PatType, Token, Type, TypeReference};

use crate::types::CallableSignature;

fn make_arg(ty: Type, arg_name: &str) -> FnArg {
    FnArg::Typed(PatType {
        attrs: vec![],
        pat: Box::new(Pat::Ident(PatIdent {
            attrs: vec![],
            by_ref: None,
            mutability: None,
            ident: Ident::new(arg_name, Span::mixed_site()),
            subpat: None,
        })),
        colon_token: Default::default(),
        ty: Box::new(ty),
    })
}

// Member callables are declared with an explicit leading `this` parameter.
// A const receiver becomes a shared borrow, everything else a mutable one.
fn this_type(receiver: &Type, is_const: bool) -> Type {
    Type::Reference(TypeReference {
        and_token: Default::default(),
        lifetime: None,
        mutability: if is_const { None } else { Some(Default::default()) },
        elem: Box::new(receiver.clone()),
    })
}

/// Build the foreign-fn declaration matching `sig`, with parameters named
/// `x0..xN`.
pub fn to_foreign_fn(sig: &CallableSignature, name: &Ident) -> ForeignItemFn {
    let mut inputs: Punctuated<FnArg, Token![,]> = Punctuated::new();
    if let Some(receiver) = &sig.receiver {
        inputs.push(make_arg(this_type(receiver, sig.quals.is_const), "this"));
    }
    for (arg_num, ty) in sig.inputs.iter().enumerate() {
        inputs.push(make_arg(
            ty.clone(),
            &("x".to_owned() + &arg_num.to_string()),
        ));
    }
    let output = &sig.output;
    let variadic = if sig.quals.is_variadic {
        if inputs.is_empty() {
            quote! { ... }
        } else {
            quote! { , ... }
        }
    } else {
        quote! {}
    };
    let tokens = quote! { fn #name(#inputs #variadic) #output ; };
    syn::parse2(tokens).expect("rendered declaration must parse")
}

/// The declaration as source text, for embedding into generated code.
pub fn declaration(sig: &CallableSignature, name: &str) -> String {
    let ident = Ident::new(name, Span::call_site());
    to_foreign_fn(sig, &ident).into_token_stream().to_string()
}
