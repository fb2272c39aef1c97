//! Derive macros for evloop.
//!
//! This crate provides the `#[derive(EventKind)]` macro for mapping a
//! fieldless enum onto numeric user event types.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields};

/// Derives the `EventKind` trait for fieldless enums.
///
/// Variants without an explicit discriminant are numbered
/// `EVENT_PRE_USER + 1 + index`, where `index` is the variant's position in
/// the declaration. A variant with a discriminant (`Shutdown = 500`) uses that
/// value as its event type; it must still be above `EVENT_PRE_USER` to be
/// constructible.
///
/// # Examples
///
/// ```rust,ignore
/// use evloop::EventKind;
///
/// #[derive(EventKind, Clone, Copy, Debug, PartialEq)]
/// enum UiEvent {
///     Click,
///     KeyPress,
///     Resize = 900,
/// }
///
/// assert_eq!(UiEvent::Click.event_type(), 101);
/// assert_eq!(UiEvent::Resize.event_type(), 900);
/// assert_eq!(UiEvent::KeyPress.kind_name(), "KeyPress");
/// ```
#[proc_macro_derive(EventKind)]
pub fn derive_event_kind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_event_kind(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(error) => TokenStream::from(error.to_compile_error()),
    }
}

fn expand_event_kind(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    check_fieldless_enum(input)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => unreachable!("checked by check_fieldless_enum"),
    };

    let mut to_type = Vec::with_capacity(variants.len());
    let mut from_type = Vec::with_capacity(variants.len());
    let mut names = Vec::with_capacity(variants.len());

    for (index, variant) in variants.iter().enumerate() {
        let ident = &variant.ident;
        let value = generate_type_value(index, variant.discriminant.as_ref().map(|(_, e)| e));
        let label = ident.to_string();

        to_type.push(quote! { #name::#ident => #value });
        from_type.push(quote! {
            if event_type == (#value) {
                return ::std::option::Option::Some(#name::#ident);
            }
        });
        names.push(quote! { #name::#ident => #label });
    }

    Ok(quote! {
        impl #impl_generics ::evloop::EventKind for #name #ty_generics #where_clause {
            fn event_type(self) -> u64 {
                match self {
                    #(#to_type,)*
                }
            }

            fn from_event_type(event_type: u64) -> ::std::option::Option<Self> {
                #(#from_type)*
                ::std::option::Option::None
            }

            fn kind_name(self) -> &'static str {
                match self {
                    #(#names,)*
                }
            }
        }
    })
}

/// Rejects structs, unions and enums whose variants carry data.
fn check_fieldless_enum(input: &DeriveInput) -> syn::Result<()> {
    match &input.data {
        Data::Enum(data) => {
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        &variant.ident,
                        "EventKind variants cannot carry fields",
                    ));
                }
            }
            Ok(())
        }
        Data::Struct(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "EventKind can only be derived for enums",
        )),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "EventKind cannot be derived for union types",
        )),
    }
}

fn generate_type_value(index: usize, discriminant: Option<&Expr>) -> proc_macro2::TokenStream {
    match discriminant {
        Some(expr) => quote! { (#expr) as u64 },
        None => {
            let offset = index as u64 + 1;
            quote! { ::evloop::EVENT_PRE_USER + #offset }
        }
    }
}
