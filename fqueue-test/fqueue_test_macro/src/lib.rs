/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use proc_macro::TokenStream;

use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemFn};

/// Runs an `async fn` test on a dedicated multi-threaded Tokio runtime.
///
/// Actor tasks spawned by the test run on worker threads named after the test.
/// A panic raised on one of those threads (for example an assertion inside a
/// consumer) fails the test after the body returns, even though the pipeline
/// itself caught it.
#[proc_macro_attribute]
pub fn fqueue_test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let attrs = &input.attrs;
    let sig = &input.sig;
    let body = &input.block;
    let name = &sig.ident;
    let inputs = &sig.inputs;
    let output = &sig.output;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(sig.fn_token, "#[fqueue_test] requires an async fn")
            .to_compile_error()
            .into();
    }

    let async_name = format_ident!("__{}_body", name);

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() #output {
            let watch = ::fqueue_test::__private::PanicWatch::install(stringify!(#name));

            let runtime = ::fqueue_test::__private::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .thread_name(watch.thread_name())
                .build()
                .expect("failed to build the fqueue test runtime");

            let span = ::fqueue_test::__private::tracing::info_span!("fqueue_test", name = stringify!(#name));
            let result = runtime.block_on(
                ::fqueue_test::__private::tracing::Instrument::instrument(#async_name(), span),
            );

            // Actor tasks still alive are dropped with the runtime.
            drop(runtime);
            watch.check();

            result
        }

        async fn #async_name(#inputs) #output #body
    };

    expanded.into()
}
