//! Derive macro for `dtoguard_validation::Payload`.

use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, UnOp};

/// Derive `dtoguard_validation::Payload` from `#[validate(...)]` attributes.
///
/// Field attributes:
/// - any rule tag, bare or with a literal parameter: `required`, `min = 3`,
///   `oneof = "admin user"`, `required_if = "Kind company"`
/// - `rules = "required,min=3"`: a comma-separated rule list
/// - `field = "Name"`: display name used in violations
/// - `nested`: include a field without rules so its payload is walked
///
/// Container attributes:
/// - `normalize`: return `Normalize::normalize(self)` after validation
/// - `messages`: render violations through the type's `FormatViolations`
///
/// Fields without a `validate` attribute are not inspected.
#[proc_macro_derive(Payload, attributes(validate))]
pub fn derive_payload(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_payload(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_payload(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let capabilities = parse_capabilities(&input.attrs)?;
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Payload can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Payload requires named fields",
            ));
        },
    };

    let mut declared_fields = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        declared_fields.push((ident, parse_field(&field.attrs, ident)?));
    }

    // Fields named by a cross-field rule are exposed even without rules of
    // their own so the rule can read them.
    let referenced: Vec<String> = declared_fields
        .iter()
        .filter_map(|(_, declared)| declared.as_ref())
        .flat_map(|declared| &declared.rules)
        .flat_map(|(tag, param)| referenced_fields(tag, param.as_deref()))
        .collect();

    let mut entries = Vec::new();
    for (ident, declared) in declared_fields {
        let declared = declared.or_else(|| {
            let name = ident.to_string();
            referenced.contains(&name).then(|| DeclaredField {
                display: name,
                rules: Vec::new(),
            })
        });
        if let Some(declared) = declared {
            entries.push(expand_field(ident, &declared));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let formatter = capabilities.messages.then(|| {
        quote! {
            fn violation_formatter(
                &self,
            ) -> ::std::option::Option<&dyn ::dtoguard_validation::FormatViolations> {
                ::std::option::Option::Some(self)
            }
        }
    });
    let normalizer = capabilities.normalize.then(|| {
        quote! {
            fn normalized(self) -> Self
            where
                Self: ::std::marker::Sized,
            {
                ::dtoguard_validation::Normalize::normalize(self)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::dtoguard_validation::Payload for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::dtoguard_validation::Field<'_>> {
                ::std::vec![#(#entries),*]
            }

            #formatter
            #normalizer
        }

        impl #impl_generics ::dtoguard_validation::AsFieldValue for #name #ty_generics #where_clause {
            fn as_field_value(&self) -> ::dtoguard_validation::FieldValue<'_> {
                ::dtoguard_validation::FieldValue::Nested(self)
            }
        }
    })
}

#[derive(Debug, Default)]
struct Capabilities {
    normalize: bool,
    messages: bool,
}

fn parse_capabilities(attrs: &[Attribute]) -> Result<Capabilities, syn::Error> {
    let mut capabilities = Capabilities::default();
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("normalize") {
                capabilities.normalize = true;
                return Ok(());
            }
            if meta.path.is_ident("messages") {
                capabilities.messages = true;
                return Ok(());
            }
            Err(meta.error("unsupported validate attribute on container"))
        })?;
    }
    Ok(capabilities)
}

#[derive(Debug)]
struct DeclaredField {
    display: String,
    rules: Vec<(String, Option<String>)>,
}

fn parse_field(attrs: &[Attribute], ident: &Ident) -> Result<Option<DeclaredField>, syn::Error> {
    let mut seen = false;
    let mut rules = Vec::new();
    let mut display_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        seen = true;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value: syn::LitStr = meta.value()?.parse()?;
                if display_override.is_some() {
                    return Err(meta.error("duplicate validate(field = ...)"));
                }
                display_override = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("nested") {
                return Ok(());
            }
            if meta.path.is_ident("rules") {
                let value: syn::LitStr = meta.value()?.parse()?;
                let parsed = parse_rule_list(&value.value())
                    .map_err(|message| syn::Error::new_spanned(&value, message))?;
                rules.extend(parsed);
                return Ok(());
            }
            let Some(tag) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected a rule tag"));
            };
            if meta.input.peek(syn::Token![=]) {
                let expr: Expr = meta.value()?.parse()?;
                rules.push((tag, Some(param_text(&expr)?)));
            } else if meta.input.peek(syn::token::Paren) {
                return Err(meta.error("rule parameters are written as `tag = value`"));
            } else {
                rules.push((tag, None));
            }
            Ok(())
        })?;
    }
    if !seen {
        return Ok(None);
    }
    let display = display_override.unwrap_or_else(|| ident.to_string());
    Ok(Some(DeclaredField { display, rules }))
}

/// Sibling names read by a cross-field rule.
///
/// `required_if` alternates field names and expected values.
fn referenced_fields(tag: &str, param: Option<&str>) -> Vec<String> {
    let words = param.unwrap_or_default().split_whitespace();
    match tag {
        "eqfield" | "nefield" | "required_with" | "required_with_all" | "required_without"
        | "required_without_all" => words.map(str::to_string).collect(),
        "required_if" => words.step_by(2).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Split `required,min=3` into tag/parameter pairs.
fn parse_rule_list(input: &str) -> Result<Vec<(String, Option<String>)>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .enumerate()
        .map(|(position, segment)| {
            let segment = segment.trim();
            let (tag, param) = match segment.split_once('=') {
                Some((tag, param)) => (tag.trim(), Some(param.trim().to_string())),
                None => (segment, None),
            };
            if tag.is_empty() {
                return Err(format!("empty rule at position {position}"));
            }
            Ok((tag.to_string(), param.filter(|param| !param.is_empty())))
        })
        .collect()
}

fn param_text(expr: &Expr) -> Result<String, syn::Error> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => lit_to_string(lit),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            Ok(format!("-{}", param_text(&unary.expr)?))
        },
        Expr::Group(group) => param_text(&group.expr),
        other => Err(syn::Error::new_spanned(
            other,
            "rule parameters must be literals",
        )),
    }
}

fn lit_to_string(lit: &Lit) -> Result<String, syn::Error> {
    match lit {
        Lit::Int(value) => Ok(value.base10_digits().to_string()),
        Lit::Float(value) => Ok(value.base10_digits().to_string()),
        Lit::Str(value) => Ok(value.value()),
        Lit::Bool(value) => Ok(value.value.to_string()),
        _ => Err(syn::Error::new_spanned(
            lit.to_token_stream(),
            "unsupported rule parameter literal",
        )),
    }
}

fn expand_field(ident: &Ident, declared: &DeclaredField) -> proc_macro2::TokenStream {
    let name = ident.to_string();
    let display = &declared.display;
    let rules = declared.rules.iter().map(|(tag, param)| {
        let param = param.as_ref().map_or_else(
            || quote! { ::std::option::Option::None },
            |param| quote! { ::std::option::Option::Some(#param) },
        );
        quote! { ::dtoguard_validation::Rule::from_static(#tag, #param) }
    });
    quote! {
        {
            const RULES: &[::dtoguard_validation::Rule] = &[#(#rules),*];
            ::dtoguard_validation::Field::new(
                #name,
                #display,
                ::dtoguard_validation::AsFieldValue::as_field_value(&self.#ident),
                RULES,
            )
        }
    }
}
