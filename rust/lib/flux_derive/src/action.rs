//! `#[action("path")]` macro expansion.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemStruct;

pub fn expand(attr: TokenStream, mut item: ItemStruct) -> syn::Result<TokenStream> {
    let path = parse_path(attr)?;

    let present = collect_derives(&item);
    let missing: Vec<_> = ["Debug", "Clone"]
        .iter()
        .filter(|name| !present.iter().any(|p| p == *name))
        .map(|name| syn::Ident::new(name, proc_macro2::Span::call_site()))
        .collect();
    if !missing.is_empty() {
        item.attrs.push(syn::parse_quote!(#[derive(#(#missing),*)]));
    }

    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics ::helpdesk_flux::Action for #name #ty_generics #where_clause {
            const TYPE: &'static str = #path;
        }
    })
}

/// Accept a concrete path: non-empty levels, no wildcards.
fn parse_path(attr: TokenStream) -> syn::Result<String> {
    let lit: syn::LitStr = syn::parse2(attr)?;
    let path = lit.value();
    if path.is_empty() {
        return Err(syn::Error::new(lit.span(), "action path cannot be empty"));
    }
    for level in path.split('/') {
        match level {
            "" => return Err(syn::Error::new(lit.span(), "action path has an empty level")),
            "+" | "#" => {
                return Err(syn::Error::new(
                    lit.span(),
                    "action path cannot contain wildcards",
                ));
            }
            _ => {}
        }
    }
    Ok(path)
}

fn collect_derives(item: &ItemStruct) -> Vec<String> {
    let mut derives = Vec::new();
    for attr in item.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        if let Ok(paths) = attr.parse_args_with(
            syn::punctuated::Punctuated::<syn::Path, syn::Token![,]>::parse_terminated,
        ) {
            derives.extend(
                paths
                    .iter()
                    .filter_map(|p| p.segments.last())
                    .map(|seg| seg.ident.to_string()),
            );
        }
    }
    derives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(attr: &str, item: &str) -> syn::Result<String> {
        let attr: TokenStream = attr.parse().unwrap();
        let item: ItemStruct = syn::parse_str(item).unwrap();
        expand(attr, item).map(|ts| ts.to_string())
    }

    #[test]
    fn adds_trait_impl_and_derives() {
        let out = expand_str(
            r#""conversations/setSortFilter""#,
            "pub struct SetSortFilter(pub SortFilter);",
        )
        .unwrap();
        assert!(out.contains(":: helpdesk_flux :: Action for SetSortFilter"));
        assert!(out.contains("\"conversations/setSortFilter\""));
        assert!(out.contains("derive (Debug , Clone)"));
    }

    #[test]
    fn keeps_existing_derives() {
        let out = expand_str(
            r#""conversations/addMessage""#,
            "#[derive(Debug, Clone, PartialEq)] pub struct AddMessage { pub message: Message }",
        )
        .unwrap();
        assert!(!out.contains("derive (Debug , Clone)"));
        assert!(out.contains("PartialEq"));
    }

    #[test]
    fn adds_only_missing_derive() {
        let out = expand_str(
            r#""conversations/clearConversation""#,
            "#[derive(Debug)] pub struct ClearConversation(pub u64);",
        )
        .unwrap();
        assert!(out.contains("derive (Clone)"));
    }

    #[test]
    fn rejects_bad_paths() {
        let item = "pub struct X;";
        assert!(expand_str(r#""""#, item).is_err());
        assert!(expand_str(r#""conversations/+""#, item).is_err());
        assert!(expand_str(r#""conversations//x""#, item).is_err());
        assert!(expand_str("42", item).is_err());
    }
}
