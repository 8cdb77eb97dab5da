//! 服务提供者宏实现

use crate::utils::{class_name_tokens, ensure_not_generic, parse_named_args, priority_tokens};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Error, Expr,
    ItemStruct, Meta, Result, Token,
};

/// 服务提供者参数
pub struct ProviderArgs {
    /// 服务名称
    pub name: Expr,
    /// 目标类型
    pub target: Expr,
    /// 优先级，默认为 0
    pub priority: Option<Expr>,
    /// 自定义类型名称
    pub class: Option<Expr>,
    /// 自定义构造函数 `fn(&dyn ContainerBuilder) -> Self`
    pub constructor: Option<Expr>,
}

impl Parse for ProviderArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let span = input.span();
        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        let mut name = None;
        let mut target = None;
        let mut priority = None;
        let mut class = None;
        let mut constructor = None;

        for arg in parse_named_args(parsed)? {
            match arg.name.as_str() {
                "name" => name = Some(arg.value),
                "target" => target = Some(arg.value),
                "priority" => priority = Some(arg.value),
                "class" => class = Some(arg.value),
                "constructor" => constructor = Some(arg.value),
                other => {
                    return Err(Error::new_spanned(
                        arg.value,
                        format!("未知参数 `{other}`，可用参数: name, target, priority, class, constructor"),
                    ))
                }
            }
        }

        Ok(Self {
            name: name.ok_or_else(|| Error::new(span, "缺少参数 `name`"))?,
            target: target.ok_or_else(|| Error::new(span, "缺少参数 `target`"))?,
            priority,
            class,
            constructor,
        })
    }
}

/// 实现 #[service_provider] 宏
pub fn service_provider_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let provider_args = match syn::parse::<ProviderArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let input_struct = parse_macro_input!(input as ItemStruct);
    if let Err(e) = ensure_not_generic(&input_struct, "service_provider") {
        return e.to_compile_error().into();
    }

    let struct_name = &input_struct.ident;
    let class_name = class_name_tokens(&input_struct, provider_args.class.as_ref());
    let name = &provider_args.name;
    let target = &provider_args.target;
    let priority = priority_tokens(provider_args.priority.as_ref());

    let construct = match &provider_args.constructor {
        Some(constructor) => quote! { #constructor(container) },
        None => quote! {
            {
                let _ = container;
                <#struct_name as ::std::default::Default>::default()
            }
        },
    };

    let expanded = quote! {
        #input_struct

        impl ::di_abstractions::Describe for #struct_name {
            fn describe() -> ::di_abstractions::ClassEntry {
                fn construct(
                    container: &dyn ::di_abstractions::ContainerBuilder,
                ) -> ::std::boxed::Box<dyn ::di_abstractions::ServiceProvider> {
                    ::std::boxed::Box::new(#construct)
                }

                ::di_abstractions::ClassEntry::new(#class_name)
                    .provides(#name, #target, #priority)
                    .with_provider(construct)
            }
        }
    };

    TokenStream::from(expanded)
}
