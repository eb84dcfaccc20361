//! Flux proc macros.
//!
//! - `#[action("path")]`: mark a struct as a Flux action or request
//!
//! Generates:
//! - `impl helpdesk_flux::Action for StructName { const TYPE: &str = "the/path"; }`
//! - `#[derive(Debug, Clone)]` for whichever of the two is not already derived

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod action;

/// Define a Flux action.
///
/// ```ignore
/// #[action("conversations/setSortFilter")]
/// pub struct SetSortFilter(pub SortFilter);
/// ```
///
/// Generates:
/// - `#[derive(Debug, Clone)]` (if not already present)
/// - `impl helpdesk_flux::Action for SetSortFilter { const TYPE: &'static str = "conversations/setSortFilter"; }`
///
/// The path must be concrete: no empty levels and no `+` / `#`.
#[proc_macro_attribute]
pub fn action(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::ItemStruct);
    action::expand(attr.into(), item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
