use proc_macro::TokenStream;
use quote::quote;
use selroute_core::{Selector, Signature};
use syn::{LitStr, parse_macro_input};

/// Compute a call selector at compile time.
///
/// Takes a canonical signature literal and expands to a `selroute::Selector`
/// constant expression.
///
/// ```rust,ignore
/// const TRANSFER: Selector = selector!("transfer(address,uint256)");
/// ```
///
/// The literal must pass [`Signature::parse`]: no whitespace, an identifier
/// name, and parameter types from the same grammar the interface extractor
/// uses, already in canonical spelling (`uint256`, not `uint`). Anything else
/// is a compile error.
#[proc_macro]
pub fn selector(input: TokenStream) -> TokenStream {
    let lit = parse_macro_input!(input as LitStr);

    let selector = match check_signature(&lit.value()) {
        Ok(selector) => selector,
        Err(msg) => return syn::Error::new_spanned(&lit, msg).to_compile_error().into(),
    };
    let [b0, b1, b2, b3] = *selector.as_bytes();

    let expanded = quote! {
        ::selroute::Selector::from_bytes([#b0, #b1, #b2, #b3])
    };

    TokenStream::from(expanded)
}

fn check_signature(signature: &str) -> Result<Selector, String> {
    Signature::parse(signature)
        .map(|sig| sig.selector())
        .map_err(|err| err.to_string())
}
