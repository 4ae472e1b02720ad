use leptos::prelude::*;

use crate::components::circuit::{CircuitCanvas, SchemeKind};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// One palette for the whole page; swap the variant to re-skin the
	// backdrop.
	let scheme = Signal::derive(move || SchemeKind::Cyan);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<CircuitCanvas scheme=scheme />
			<div class="page-content">
				<h1>"Circuit Canvas"</h1>
				<p class="subtitle">
					"A generative circuit-board backdrop: packets, traces and sparks simulated per frame in WASM."
				</p>
			</div>
		</ErrorBoundary>
	}
}
