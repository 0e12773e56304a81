#![crate_type = "proc-macro"]
use syn::{
    self, parse, parse_macro_input, spanned::Spanned, visit_mut::VisitMut, Expr, ExprCall, ItemFn,
    Path,
};

use proc_macro::TokenStream;
use quote::{self, ToTokens};

mod kw {
    syn::custom_keyword!(Store);
    syn::custom_keyword!(CustomHasher);
    syn::custom_keyword!(HasherInit);
    syn::custom_punctuation!(Colon, :);
}

#[derive(Default, Clone)]
struct CacheOptions {
    store: Option<(syn::Visibility, syn::Ident)>,
    custom_hasher: Option<Path>,
    custom_hasher_initializer: Option<ExprCall>,
}

#[derive(Clone)]
enum CacheOption {
    Store(syn::Visibility, syn::Ident),
    CustomHasher(Path),
    HasherInit(ExprCall),
}

// To extend option parsing, add functionality here.
impl parse::Parse for CacheOption {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let la = input.lookahead1();
        if la.peek(kw::Store) {
            input.parse::<kw::Store>()?;
            input.parse::<kw::Colon>()?;
            let vis: syn::Visibility = input.parse()?;
            let name: syn::Ident = input.parse()?;
            return Ok(CacheOption::Store(vis, name));
        }
        if la.peek(kw::CustomHasher) {
            input.parse::<kw::CustomHasher>()?;
            input.parse::<kw::Colon>()?;
            let hasher: syn::Path = input.parse()?;
            return Ok(CacheOption::CustomHasher(hasher));
        }
        if la.peek(kw::HasherInit) {
            input.parse::<kw::HasherInit>()?;
            input.parse::<kw::Colon>()?;
            let init: syn::ExprCall = input.parse()?;
            return Ok(CacheOption::HasherInit(init));
        }
        Err(la.error())
    }
}

impl parse::Parse for CacheOptions {
    fn parse(input: parse::ParseStream) -> syn::Result<Self> {
        let f: syn::punctuated::Punctuated<CacheOption, syn::Token![,]> =
            input.parse_terminated(CacheOption::parse)?;
        let mut opts = Self::default();

        for opt in f {
            match opt {
                CacheOption::Store(vis, name) => opts.store = Some((vis, name)),
                CacheOption::CustomHasher(hasher) => opts.custom_hasher = Some(hasher),
                CacheOption::HasherInit(init) => opts.custom_hasher_initializer = Some(init),
            }
        }
        Ok(opts)
    }
}

mod store {
    use crate::CacheOptions;

    /// Returns TokenStreams to be used in quote!{} for the type of the map inside the store, and
    /// the expression initializing it.
    ///
    /// First return value: Type of map ("Container<K,V>").
    /// Second return value: Initializer syntax ("Container::<K,V>::new()").
    pub(crate) fn construct_map(
        options: &CacheOptions,
        key_type: proc_macro2::TokenStream,
        value_type: proc_macro2::TokenStream,
    ) -> (proc_macro2::TokenStream, proc_macro2::TokenStream) {
        match (&options.custom_hasher, &options.custom_hasher_initializer) {
            (Some(hasher), Some(hasher_init)) => (
                quote::quote! { #hasher<#key_type, #value_type> },
                quote::quote! { #hasher_init },
            ),
            (Some(hasher), None) => (
                quote::quote! { #hasher<#key_type, #value_type> },
                quote::quote! { #hasher::new() },
            ),
            // This is the unbounded default.
            (None, _) => (
                quote::quote! { ::std::collections::HashMap<#key_type, #value_type> },
                quote::quote! { ::std::collections::HashMap::new() },
            ),
        }
    }
}

/// Rewrites direct calls `name(..)` into `self.name(..)`, so that recursion inside a memoized
/// body goes through the store.
struct SelfCalls<'a> {
    name: &'a syn::Ident,
}

impl VisitMut for SelfCalls<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        syn::visit_mut::visit_expr_mut(self, expr);

        let replacement: Option<Expr> = match expr {
            Expr::Call(call) => match &*call.func {
                Expr::Path(path) if path.qself.is_none() && path.path.is_ident(self.name) => {
                    let name = self.name;
                    let args = &call.args;
                    Some(syn::parse_quote! { self.#name(#args) })
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(replacement) = replacement {
            *expr = replacement;
        }
    }
}

/**
 * memoize turns a (simple enough) free function into a method on a generated memoization store.
 *
 * The function's arguments must be `Clone`- and `Hash`-able and bound by plain identifiers; the
 * return value must be `Clone`-able. The store owns a map from the argument tuple to the result.
 * There is no global state: every store value is an independent cache, owned by whoever created
 * it, and grows until it is dropped or `clear()`ed.
 *
 * ```ignore
 * use fibmemo::memoize;
 *
 * #[memoize(Store: pub Squares)]
 * fn square(x: u64) -> u64 {
 *     x * x
 * }
 *
 * let mut squares = Squares::new();
 * assert_eq!(squares.square(12), 144);
 * assert_eq!(squares.len(), 1);
 * squares.clear();
 * assert!(squares.is_empty());
 * ```
 *
 * Recursive calls to the function inside its own body are routed through the store, so a
 * recursive definition computes every distinct argument at most once per store.
 *
 * Options:
 *
 * `Store: <visibility> Name` (required) names the generated struct. The memoized method keeps the
 * visibility of the annotated function, which lets a crate expose the store while keeping the
 * raw method private.
 *
 * `CustomHasher: ahash::HashMap` replaces `std::collections::HashMap`. As some maps don't have a
 * `new()` method, `HasherInit` gives the initializer instead:
 * `#[memoize(Store: Cache, CustomHasher: FxHashMap, HasherInit: FxHashMap::default())]`.
 *
 * The unmemoized body stays available as a private method `memoized_original_{fn}`.
 */
#[proc_macro_attribute]
pub fn memoize(attr: TokenStream, item: TokenStream) -> TokenStream {
    let func = parse_macro_input!(item as ItemFn);
    let sig = &func.sig;

    // Parse options from macro attributes
    let options: CacheOptions = match syn::parse(attr) {
        Ok(options) => options,
        Err(e) => return e.to_compile_error().into(),
    };
    let (store_vis, store_ident) = match &options.store {
        Some(store) => store.clone(),
        None => {
            return syn::Error::new(
                sig.span(),
                "memoize error: a store must be named, e.g. #[memoize(Store: pub MyCache)]",
            )
            .to_compile_error()
            .into()
        }
    };

    let fn_name = &sig.ident;
    let renamed_name = syn::Ident::new(&format!("memoized_original_{}", fn_name), sig.span());

    // Extracted from the function signature.
    let (input_types, input_names) = match check_signature(sig) {
        Ok(extracted) => extracted,
        Err(e) => return e.to_compile_error().into(),
    };

    let input_tuple_type = quote::quote! { (#(#input_types),*) };
    let return_type = match &sig.output {
        syn::ReturnType::Default => quote::quote! { () },
        syn::ReturnType::Type(_, ty) => ty.to_token_stream(),
    };

    let (map_type, map_init) = store::construct_map(&options, input_tuple_type, return_type);

    // Rename original function and make it a method, so recursive calls can reach the store.
    let mut renamed_fn = func.clone();
    renamed_fn.vis = syn::Visibility::Inherited;
    renamed_fn.sig.ident = renamed_name.clone();
    renamed_fn
        .sig
        .inputs
        .insert(0, syn::parse_quote! { &mut self });
    SelfCalls { name: fn_name }.visit_block_mut(&mut renamed_fn.block);

    let mut memoized_sig = sig.clone();
    memoized_sig
        .inputs
        .insert(0, syn::parse_quote! { &mut self });

    // Construct memoizer method, which calls the original body.
    let syntax_names_tuple = quote::quote! { (#(#input_names),*) };
    let syntax_names_tuple_cloned = quote::quote! { (#(#input_names.clone()),*) };
    let vis = &func.vis;
    let attrs = &func.attrs;

    quote::quote! {
        #store_vis struct #store_ident {
            map: #map_type,
        }

        #[allow(dead_code)]
        impl #store_ident {
            /// Creates an empty store.
            #store_vis fn new() -> Self {
                Self { map: #map_init }
            }

            /// Discards every stored result.
            #store_vis fn clear(&mut self) {
                self.map.clear();
            }

            /// Number of stored results.
            #store_vis fn len(&self) -> usize {
                self.map.len()
            }

            #store_vis fn is_empty(&self) -> bool {
                self.map.is_empty()
            }

            #(#attrs)*
            #[allow(unused_variables)]
            #vis #memoized_sig {
                if let Some(memoized_result) = self.map.get(&#syntax_names_tuple_cloned) {
                    return memoized_result.clone();
                }
                let memoized_result = self.#renamed_name(#(#input_names.clone()),*);
                self.map.insert(#syntax_names_tuple, memoized_result.clone());
                memoized_result
            }

            #renamed_fn
        }

        impl ::std::default::Default for #store_ident {
            fn default() -> Self {
                Self::new()
            }
        }
    }
    .into()
}

fn check_signature(
    sig: &syn::Signature,
) -> Result<(Vec<Box<syn::Type>>, Vec<syn::Ident>), syn::Error> {
    if sig.inputs.is_empty() {
        return Ok((vec![], vec![]));
    }
    if let syn::FnArg::Receiver(_) = sig.inputs[0] {
        return Err(syn::Error::new(sig.span(), "Cannot memoize methods!"));
    }

    let mut types = vec![];
    let mut names = vec![];
    for a in &sig.inputs {
        if let syn::FnArg::Typed(ref arg) = a {
            types.push(arg.ty.clone());

            if let syn::Pat::Ident(patident) = &*arg.pat {
                names.push(patident.ident.clone());
            } else {
                return Err(syn::Error::new(
                    sig.span(),
                    "Cannot memoize arbitrary patterns!",
                ));
            }
        }
    }
    Ok((types, names))
}
