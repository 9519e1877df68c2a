use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{ConsoleCtx, ConsoleStore};

#[function_component(LoginScreen)]
pub(crate) fn login_screen() -> Html {
    let (store, _) = use_store::<ConsoleStore>();
    let Some(ctx) = use_context::<ConsoleCtx>() else {
        return html! {};
    };
    let login = &store.state.login;

    let on_input = {
        let ctx = ctx.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                ctx.console.set_credential_input(&input.value());
            }
        })
    };
    let on_submit = Callback::from(move |event: SubmitEvent| {
        event.prevent_default();
        ctx.spawn(|console| async move { console.login().await });
    });

    html! {
        <div class="login-screen">
            <form class="card login-card" onsubmit={on_submit}>
                <header>
                    <h1>{"Command Gateway"}</h1>
                    <p class="muted">{"Sign in with your API key."}</p>
                </header>
                <label class="stack">
                    <span>{"API key"}</span>
                    <input
                        type="password"
                        autocomplete="off"
                        value={login.key.clone()}
                        oninput={on_input}
                    />
                </label>
                {login.error.as_ref().map_or_else(
                    || html! {},
                    |error| html! { <p class="error-text">{error.clone()}</p> },
                )}
                <button class="solid" type="submit">{"Sign in"}</button>
            </form>
        </div>
    }
}
