//! 异常处理器宏实现

use crate::utils::{class_name_tokens, ensure_not_generic, parse_named_args, priority_tokens};
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Error, Expr,
    ItemStruct, Meta, Result, Token,
};

/// 异常处理器参数
pub struct HandlerArgs {
    pub target: Expr,
    pub priority: Option<Expr>,
    pub class: Option<Expr>,
    /// 自定义构造函数 `fn() -> Self`
    pub constructor: Option<Expr>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let span = input.span();
        let parsed = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;

        let mut target = None;
        let mut priority = None;
        let mut class = None;
        let mut constructor = None;

        for arg in parse_named_args(parsed)? {
            match arg.name.as_str() {
                "target" => target = Some(arg.value),
                "priority" => priority = Some(arg.value),
                "class" => class = Some(arg.value),
                "constructor" => constructor = Some(arg.value),
                other => {
                    return Err(Error::new_spanned(
                        arg.value,
                        format!("未知参数 `{other}`，可用参数: target, priority, class, constructor"),
                    ))
                }
            }
        }

        Ok(Self {
            target: target.ok_or_else(|| Error::new(span, "缺少参数 `target`"))?,
            priority,
            class,
            constructor,
        })
    }
}

/// 实现 #[exception_handler] 宏
pub fn exception_handler_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let handler_args = match syn::parse::<HandlerArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let input_struct = parse_macro_input!(input as ItemStruct);
    if let Err(e) = ensure_not_generic(&input_struct, "exception_handler") {
        return e.to_compile_error().into();
    }

    let struct_name = &input_struct.ident;
    let class_name = class_name_tokens(&input_struct, handler_args.class.as_ref());
    let target = &handler_args.target;
    let priority = priority_tokens(handler_args.priority.as_ref());

    let construct = match &handler_args.constructor {
        Some(constructor) => quote! { #constructor() },
        None => quote! { <#struct_name as ::std::default::Default>::default() },
    };

    let expanded = quote! {
        #input_struct

        impl ::di_abstractions::Describe for #struct_name {
            fn describe() -> ::di_abstractions::ClassEntry {
                fn construct() -> ::std::boxed::Box<dyn ::di_abstractions::ExceptionHandler> {
                    ::std::boxed::Box::new(#construct)
                }

                ::di_abstractions::ClassEntry::new(#class_name)
                    .handles(#target, #priority)
                    .with_handler(construct)
            }
        }
    };

    TokenStream::from(expanded)
}
