use proc_macro::TokenStream;
use quote::quote;
use std::mem::replace;

use syn::{parse_macro_input, parse_quote, Block, ItemFn};

/// Turns an `async fn main` into a synchronous entry point that drives the
/// future on a freshly built runtime.
///
/// ```ignore
/// #[horus::main]
/// async fn main() -> std::io::Result<()> {
///     // async code
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(_: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input);
    let item = transform(item);
    quote!(#item).into()
}

/// Like [`macro@main`], but for tests: the async body runs to completion on
/// its own runtime.
#[proc_macro_attribute]
pub fn test(_: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input);
    let item = transform(item);
    quote!(#[test] #item).into()
}

fn transform(mut item: ItemFn) -> ItemFn {
    let block = item.block.clone();
    let new_block: Block = parse_quote!({ horus::block_on(async { #block }).unwrap() });
    let _ = replace(&mut item.block, Box::new(new_block));
    item.sig.asyncness = None;
    item
}
